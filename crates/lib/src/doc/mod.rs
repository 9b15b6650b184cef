//! Document model for player records.
//!
//! This module provides the main data types for the store. The [`Doc`] type is
//! both the per-player record and every nested mapping node inside it,
//! providing a unified tree structure addressed by dotted [`Path`]s.
//!
//! # Usage
//!
//! ```
//! use coffer::doc::{Doc, PathBuf, Value};
//!
//! let mut doc = Doc::new();
//! doc.insert("name", "Alice");
//! doc.set_path(&PathBuf::normalize("stats.wins"), 3.0).unwrap();
//!
//! assert_eq!(doc.get("stats.wins"), Some(&Value::Number(3.0)));
//! ```

use std::{collections::HashMap, fmt};

// Submodules
pub mod errors;
pub mod path;
pub mod value;

pub use errors::DocError;
pub use path::{Path, PathBuf, normalize_path};
pub use value::Value;

/// A nested string-keyed mapping of [`Value`]s.
///
/// `Doc` is serde-transparent over its backing map, so a record serializes as a
/// plain JSON object and round-trips through any JSON-speaking store.
///
/// # Navigation
///
/// All navigation walks dotted paths segment by segment. Reads
/// ([`Doc::get`]) never mutate and yield `None` for missing paths. Mutations
/// ([`Doc::set_path`], [`Doc::remove_path`], [`Doc::resolve_mut`]) auto-vivify:
/// missing intermediate segments become empty nested `Doc`s, and an
/// intermediate segment currently holding a non-mapping value is overwritten
/// with a fresh empty `Doc` so the target remains reachable.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Doc {
    entries: HashMap<String, Value>,
}

impl Doc {
    /// Creates a new empty document
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Returns the number of top-level fields
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the document has no fields
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Checks if a top-level field exists
    pub fn contains_key(&self, key: impl AsRef<str>) -> bool {
        self.entries.contains_key(key.as_ref())
    }

    /// Sets a top-level field, returning the prior value if present
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    /// Removes a top-level field, returning its value if present
    pub fn remove(&mut self, key: impl AsRef<str>) -> Option<Value> {
        self.entries.remove(key.as_ref())
    }

    /// Gets a value by path (immutable reference), without mutating.
    ///
    /// Descends nested `Doc` nodes by key. A `List` intermediate is navigable
    /// when the next segment parses as an index. Missing paths yield `None`.
    pub fn get(&self, path: impl AsRef<Path>) -> Option<&Value> {
        let path = path.as_ref();
        let mut segments = path.components();

        let first = segments.next()?;
        let mut current = self.entries.get(first)?;

        for segment in segments {
            match current {
                Value::Doc(doc) => {
                    current = doc.entries.get(segment)?;
                }
                Value::List(list) => {
                    let index: usize = segment.parse().ok()?;
                    current = list.get(index)?;
                }
                _ => return None, // Can't navigate through a leaf
            }
        }

        Some(current)
    }

    /// Gets a value by path with automatic type conversion using TryFrom.
    ///
    /// Returns `None` if the path doesn't exist or the conversion fails.
    ///
    /// ```
    /// # use coffer::doc::Doc;
    /// let mut doc = Doc::new();
    /// doc.insert("name", "Alice");
    /// doc.insert("wins", 3.0);
    ///
    /// assert_eq!(doc.get_as::<&str>("name"), Some("Alice"));
    /// assert_eq!(doc.get_as::<f64>("wins"), Some(3.0));
    /// assert_eq!(doc.get_as::<f64>("name"), None);
    /// ```
    pub fn get_as<'a, T>(&'a self, path: impl AsRef<Path>) -> Option<T>
    where
        T: TryFrom<&'a Value, Error = DocError>,
    {
        let value = self.get(path)?;
        T::try_from(value).ok()
    }

    /// Gets a mutable reference to a value by path, without vivifying.
    ///
    /// Only `Doc` intermediates are navigable mutably; missing paths yield
    /// `None`.
    pub fn get_mut(&mut self, path: impl AsRef<Path>) -> Option<&mut Value> {
        let path = path.as_ref();
        let segments: Vec<&str> = path.components().collect();
        let (last, parents) = segments.split_last()?;

        let mut current = self;
        for segment in parents {
            match current.entries.get_mut(*segment) {
                Some(Value::Doc(doc)) => current = doc,
                _ => return None,
            }
        }

        current.entries.get_mut(*last)
    }

    /// Navigates to the parent container of a path's final segment, vivifying
    /// intermediate mappings as needed.
    ///
    /// Returns the mutable parent document together with the final segment, so
    /// callers can inspect, replace, or remove the terminal field in place.
    /// Intermediate segments that are missing, or currently hold a non-mapping
    /// value, are (over)written with fresh empty documents.
    ///
    /// # Errors
    /// Returns [`DocError::EmptyPath`] if the path has no components.
    pub fn resolve_mut<'d, 'p>(
        &'d mut self,
        path: &'p Path,
    ) -> Result<(&'d mut Doc, &'p str), DocError> {
        let segments: Vec<&str> = path.components().collect();
        let (last, parents) = segments.split_last().ok_or(DocError::EmptyPath)?;

        let mut current = self;
        for segment in parents {
            let entry = current
                .entries
                .entry(segment.to_string())
                .or_insert_with(|| Value::Doc(Doc::new()));
            if !matches!(entry, Value::Doc(_)) {
                // Vivification wins over whatever leaf was here
                *entry = Value::Doc(Doc::new());
            }
            match entry {
                Value::Doc(doc) => current = doc,
                _ => unreachable!(),
            }
        }

        Ok((current, *last))
    }

    /// Sets a value at a path, creating intermediate mappings as needed.
    ///
    /// Returns the prior value of the terminal field, if any.
    pub fn set_path(
        &mut self,
        path: impl AsRef<Path>,
        value: impl Into<Value>,
    ) -> Result<Option<Value>, DocError> {
        let (container, field) = self.resolve_mut(path.as_ref())?;
        Ok(container.entries.insert(field.to_string(), value.into()))
    }

    /// Removes the field addressed by a path, returning the captured value.
    ///
    /// A path whose terminal field does not exist is a no-op returning `None`.
    /// Intermediate segments vivify exactly as for [`Doc::set_path`].
    pub fn remove_path(&mut self, path: impl AsRef<Path>) -> Result<Option<Value>, DocError> {
        let (container, field) = self.resolve_mut(path.as_ref())?;
        Ok(container.entries.remove(field))
    }

    /// Shallow-merges another document over this one.
    ///
    /// Top-level keys only: nested structures are replaced wholesale, not
    /// merged recursively.
    pub fn merge_from(&mut self, other: Doc) {
        for (key, value) in other.entries {
            self.entries.insert(key, value);
        }
    }

    /// Returns an iterator over all top-level key-value pairs
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }

    /// Returns an iterator over all top-level keys
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    /// Builder-style insertion of a top-level field
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }
}

impl IntoIterator for Doc {
    type Item = (String, Value);
    type IntoIter = std::collections::hash_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl FromIterator<(String, Value)> for Doc {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Doc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => write!(f, "{json}"),
            Err(_) => write!(f, "<doc>"),
        }
    }
}

//! Path types for hierarchical document access.
//!
//! This module provides type-safe path construction for addressing nested
//! fields in player documents. The Path/PathBuf pair follows the same
//! borrowed/owned pattern as std::path::Path/PathBuf.
//!
//! # Usage
//!
//! ```rust
//! use coffer::doc::PathBuf;
//!
//! // Construct from string (automatically normalized)
//! let path = PathBuf::normalize("inventory.sword.count");
//!
//! // Build incrementally (infallible)
//! let path = PathBuf::new().push("inventory").push("sword").push("count");
//! assert_eq!(path.as_str(), "inventory.sword.count");
//! ```

use std::{borrow::Borrow, fmt, ops::Deref, str::FromStr};

/// Normalizes a path string by cleaning up dots and empty components.
///
/// - Empty string "" → empty string
/// - Leading dots ".user" → "user"
/// - Trailing dots "user." → "user"
/// - Consecutive dots "user..profile" → "user.profile"
/// - Pure dots "..." → empty string
pub fn normalize_path(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }

    input
        .split('.')
        .filter(|component| !component.is_empty())
        .collect::<Vec<_>>()
        .join(".")
}

/// An owned, normalized path for hierarchical document access.
///
/// Always holds a normalized dotted path: no empty components, no leading or
/// trailing dots.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathBuf {
    inner: String,
}

/// A borrowed, normalized path for hierarchical document access.
///
/// `Path` is the borrowed counterpart to [`PathBuf`], similar to how `&str`
/// relates to `String`. This type is unsized and must always be used behind a
/// reference.
#[derive(Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Path {
    inner: str,
}

impl PathBuf {
    /// Creates a new empty path.
    pub fn new() -> Self {
        Self {
            inner: String::new(),
        }
    }

    /// Creates a PathBuf by normalizing the input string.
    pub fn normalize(path: &str) -> Self {
        Self {
            inner: normalize_path(path),
        }
    }

    /// Adds a path to the end of this path.
    ///
    /// Accepts both strings and Path types, normalizing the input. Infallible;
    /// all joining cases are handled through normalization.
    pub fn push(mut self, path: impl AsRef<str>) -> Self {
        let normalized = normalize_path(path.as_ref());
        if normalized.is_empty() {
            return self;
        }

        if self.inner.is_empty() {
            self.inner = normalized;
        } else {
            self.inner.push('.');
            self.inner.push_str(&normalized);
        }
        self
    }

    /// Returns the parent path, or `None` if the path has at most one component.
    pub fn parent(&self) -> Option<PathBuf> {
        self.inner.rfind('.').map(|last_dot| PathBuf {
            inner: self.inner[..last_dot].to_string(),
        })
    }
}

impl Path {
    /// Creates a Path from an already-normalized string.
    ///
    /// Callers outside this module go through [`PathBuf::normalize`]; this is
    /// the layout-punning step shared by the `AsRef`/`Deref` impls. Passing a
    /// non-normalized string yields a path with empty components, which
    /// `components()` silently skips.
    fn from_normalized(s: &str) -> &Path {
        // SAFETY: Path is repr(transparent) over str
        unsafe { &*(s as *const str as *const Path) }
    }

    /// Returns an iterator over the path components as string slices.
    pub fn components(&self) -> impl Iterator<Item = &str> {
        self.inner.split('.').filter(|s| !s.is_empty())
    }

    /// Returns the number of components in the path.
    pub fn len(&self) -> usize {
        if self.inner.is_empty() {
            0
        } else {
            self.inner.split('.').count()
        }
    }

    /// Returns `true` if the path has no components.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the last component of the path, or `None` if empty.
    pub fn last(&self) -> Option<&str> {
        if self.inner.is_empty() {
            None
        } else {
            self.inner.split('.').next_back()
        }
    }

    /// Returns the path as a string slice.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Converts this `Path` to an owned `PathBuf`.
    pub fn to_path_buf(&self) -> PathBuf {
        PathBuf {
            inner: self.inner.to_string(),
        }
    }
}

impl Default for PathBuf {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for PathBuf {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        Path::from_normalized(self.inner.as_str())
    }
}

impl AsRef<Path> for PathBuf {
    fn as_ref(&self) -> &Path {
        self.deref()
    }
}

impl AsRef<Path> for Path {
    fn as_ref(&self) -> &Path {
        self
    }
}

impl AsRef<str> for Path {
    fn as_ref(&self) -> &str {
        &self.inner
    }
}

// Plain strings work anywhere a path is accepted. Normalization is not
// required first because components() skips empty segments.
impl AsRef<Path> for str {
    fn as_ref(&self) -> &Path {
        Path::from_normalized(self)
    }
}

impl AsRef<Path> for String {
    fn as_ref(&self) -> &Path {
        Path::from_normalized(self)
    }
}

impl AsRef<str> for PathBuf {
    fn as_ref(&self) -> &str {
        &self.inner
    }
}

impl Borrow<Path> for PathBuf {
    fn borrow(&self) -> &Path {
        self.deref()
    }
}

impl FromStr for PathBuf {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::normalize(s))
    }
}

impl From<&str> for PathBuf {
    fn from(s: &str) -> Self {
        Self::normalize(s)
    }
}

impl From<&Path> for PathBuf {
    fn from(path: &Path) -> Self {
        path.to_path_buf()
    }
}

impl fmt::Display for PathBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.inner.is_empty() {
            write!(f, "(empty path)")
        } else {
            write!(f, "{}", self.inner)
        }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.inner.is_empty() {
            write!(f, "(empty path)")
        } else {
            write!(f, "{}", &self.inner)
        }
    }
}

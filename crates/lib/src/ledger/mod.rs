//! The record store adapter.
//!
//! [`Ledger`] wraps a [`Backend`] and owns everything the command layer should
//! not care about: mapping a player id to a storage key, supplying the default
//! record for players that have never been written, shallow-merge versus full
//! replacement on persist, and the rounding/formatting contract on the
//! distinguished `currency` field.

use tracing::debug;

use crate::Result;
use crate::backend::Backend;
use crate::doc::{Doc, Value};

/// Name of the distinguished numeric field every record carries.
pub const CURRENCY_FIELD: &str = "currency";

/// Prefix prepended to player ids to form storage keys.
const STORE_KEY_PREFIX: &str = "cur_";

/// Host-supplied configuration for rounding, formatting, and the default
/// record.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Config {
    /// Number of fractional digits currency is rounded to and rendered with
    #[serde(default = "Config::default_decimal_places")]
    pub decimal_places: u32,
    /// Prefix prepended to formatted amounts, e.g. `"$"`
    #[serde(default = "Config::default_prefix")]
    pub prefix: String,
    /// Currency granted to players that have never been written
    #[serde(default)]
    pub base_currency: f64,
}

impl Config {
    fn default_decimal_places() -> u32 {
        2
    }

    fn default_prefix() -> String {
        "$".to_string()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            decimal_places: Self::default_decimal_places(),
            prefix: Self::default_prefix(),
            base_currency: 0.0,
        }
    }
}

/// Read/write access to per-player records with the currency contract applied.
///
/// Every write path rounds a numeric `currency` field before handing the
/// record to the backend, so a stored record never carries more fractional
/// digits than configured. A non-numeric `currency` (a caller can place one
/// there via `set.currency`) is left untouched by the rounding step.
pub struct Ledger<B> {
    config: Config,
    backend: B,
}

impl<B: Backend> Ledger<B> {
    /// Creates a ledger over the given backend.
    pub fn new(config: Config, backend: B) -> Self {
        Self { config, backend }
    }

    /// The configuration this ledger was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The record given to players that have never been written.
    pub fn default_record(&self) -> Doc {
        Doc::new().with(CURRENCY_FIELD, self.config.base_currency)
    }

    /// Whether a top-level field is part of the default record.
    ///
    /// Base fields are protected from deletion.
    pub fn is_base_field(&self, field: &str) -> bool {
        field == CURRENCY_FIELD
    }

    fn storage_key(&self, player: &str) -> String {
        format!("{STORE_KEY_PREFIX}{player}")
    }

    /// Fetches a player's record, substituting the default record when absent.
    ///
    /// The default is never persisted implicitly; a record only reaches the
    /// backend through [`Ledger::replace`] or [`Ledger::merge`].
    pub async fn record(&self, player: &str) -> Result<Doc> {
        let stored = self.backend.get(&self.storage_key(player)).await?;
        Ok(stored.unwrap_or_else(|| self.default_record()))
    }

    /// Persists a full record, overwriting any prior value.
    pub async fn replace(&self, player: &str, mut record: Doc) -> Result<()> {
        self.round_currency_field(&mut record);
        debug!(player = %player, "replacing record");
        self.backend.set(&self.storage_key(player), record).await
    }

    /// Shallow-merges a partial record over the player's current record and
    /// persists the result.
    ///
    /// Top-level keys only: nested structures in `partial` replace their
    /// counterparts wholesale.
    pub async fn merge(&self, player: &str, mut partial: Doc) -> Result<()> {
        self.round_currency_field(&mut partial);
        let mut record = self.record(player).await?;
        record.merge_from(partial);
        debug!(player = %player, "merging record");
        self.backend.set(&self.storage_key(player), record).await
    }

    /// Rounds an amount to the configured number of fractional digits, ties
    /// away from zero.
    pub fn round(&self, amount: f64) -> f64 {
        let pow = 10f64.powi(self.config.decimal_places as i32);
        (amount * pow).round() / pow
    }

    /// Renders an amount as `prefix` + rounded value with exactly
    /// `decimal_places` fractional digits.
    pub fn format(&self, amount: f64) -> String {
        format!(
            "{}{:.*}",
            self.config.prefix,
            self.config.decimal_places as usize,
            self.round(amount)
        )
    }

    /// The formatted balance query exposed toward the front end:
    /// `format(record.currency or 0)`.
    pub async fn balance(&self, player: &str) -> Result<String> {
        let record = self.record(player).await?;
        let amount = record
            .get(CURRENCY_FIELD)
            .map(Value::as_number_or_zero)
            .unwrap_or(0.0);
        Ok(self.format(amount))
    }

    fn round_currency_field(&self, record: &mut Doc) {
        if let Some(amount) = record.get_as::<f64>(CURRENCY_FIELD) {
            record.insert(CURRENCY_FIELD, self.round(amount));
        }
    }
}

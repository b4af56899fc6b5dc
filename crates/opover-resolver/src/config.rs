//! TOML configuration for the method-name table.
//!
//! ```toml
//! # Start from the built-in names (the default) or from empty token maps.
//! inherit_defaults = true
//!
//! index_get = ["get", "getAt"]
//! index_set = ["set", "put", "putAt"]
//! value_of = "valueOf"
//!
//! [binary]
//! "**" = "pow"
//!
//! [unary]
//! "!" = "negate"
//!
//! [comparison]
//! "<" = "compareTo"
//! ```
//!
//! `inherit_defaults = false` clears the `binary`, `unary` and `comparison`
//! maps before the file's entries are applied. The candidate lists and the
//! conversion factory keep their defaults unless the file sets them.

use std::collections::BTreeMap;

use serde::Deserialize;
use tracing::debug;

use crate::error::ConfigError;
use crate::names::OperatorTable;

/// Deserialized operator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OperatorConfig {
    /// Keep the built-in token maps and layer this file on top.
    pub inherit_defaults: bool,
    pub binary: BTreeMap<String, String>,
    pub unary: BTreeMap<String, String>,
    pub comparison: BTreeMap<String, String>,
    pub index_get: Option<Vec<String>>,
    pub index_set: Option<Vec<String>>,
    pub value_of: Option<String>,
}

impl Default for OperatorConfig {
    fn default() -> Self {
        Self {
            inherit_defaults: true,
            binary: BTreeMap::new(),
            unary: BTreeMap::new(),
            comparison: BTreeMap::new(),
            index_get: None,
            index_set: None,
            value_of: None,
        }
    }
}

impl OperatorConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Validate and build the immutable table on top of the defaults.
    pub fn build(self) -> Result<OperatorTable, ConfigError> {
        self.apply_to(OperatorTable::default())
    }

    fn apply_to(self, mut table: OperatorTable) -> Result<OperatorTable, ConfigError> {
        if !self.inherit_defaults {
            table.binary.clear();
            table.unary.clear();
            table.comparison.clear();
        }

        merge_section("binary", &mut table.binary, self.binary)?;
        merge_section("unary", &mut table.unary, self.unary)?;
        merge_section("comparison", &mut table.comparison, self.comparison)?;

        if let Some(names) = self.index_get {
            table.index_get = validate_candidates("index_get", names)?;
        }
        if let Some(names) = self.index_set {
            table.index_set = validate_candidates("index_set", names)?;
        }
        if let Some(name) = self.value_of {
            if name.is_empty() {
                return Err(ConfigError::EmptyValueOf);
            }
            table.value_of = name;
        }

        debug!(
            binary = table.binary.len(),
            unary = table.unary.len(),
            comparison = table.comparison.len(),
            "built operator table"
        );
        Ok(table)
    }
}

impl OperatorTable {
    /// Build a table from a TOML document.
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        OperatorConfig::from_toml_str(source)?.build()
    }

    /// A copy of this table with `config` layered on top.
    ///
    /// `inherit_defaults = false` clears this table's token maps, not the
    /// built-in ones.
    pub fn with_overrides(&self, config: OperatorConfig) -> Result<Self, ConfigError> {
        config.apply_to(self.clone())
    }
}

fn merge_section(
    section: &'static str,
    target: &mut rustc_hash::FxHashMap<String, String>,
    entries: BTreeMap<String, String>,
) -> Result<(), ConfigError> {
    for (token, name) in entries {
        if token.is_empty() {
            return Err(ConfigError::EmptyToken { section });
        }
        if name.is_empty() {
            return Err(ConfigError::EmptyMethodName { section, token });
        }
        target.insert(token, name);
    }
    Ok(())
}

fn validate_candidates(key: &'static str, names: Vec<String>) -> Result<Vec<String>, ConfigError> {
    if names.is_empty() || names.iter().any(String::is_empty) {
        return Err(ConfigError::InvalidCandidates { key });
    }
    Ok(names)
}

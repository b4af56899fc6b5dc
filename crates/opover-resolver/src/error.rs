//! Configuration errors.

use thiserror::Error;

/// Errors raised while building an [`crate::OperatorTable`] from configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document is not valid TOML or does not match the expected shape.
    #[error("invalid operator configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// A table entry has an empty operator token.
    #[error("empty operator token in [{section}]")]
    EmptyToken { section: &'static str },

    /// A table entry maps a token to an empty method name.
    #[error("operator '{token}' in [{section}] maps to an empty method name")]
    EmptyMethodName { section: &'static str, token: String },

    /// A candidate list is empty or contains an empty name.
    #[error("'{key}' must list at least one non-empty method name")]
    InvalidCandidates { key: &'static str },

    /// The conversion factory name is empty.
    #[error("'value_of' must not be empty")]
    EmptyValueOf,
}

use std::io;
use std::path::PathBuf;

use opover_core::Cancelled;
use opover_registry::RegistrationError;
use opover_resolver::ConfigError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, OpoverError>;

/// Every failure the crate surfaces to a host.
///
/// "No overload applies" is never an error; it is
/// [`Resolution::Unresolved`](crate::Resolution::Unresolved).
#[derive(Debug, Error)]
pub enum OpoverError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Registration(#[from] RegistrationError),

    #[error(transparent)]
    Cancelled(#[from] Cancelled),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl OpoverError {
    /// Whether the host aborted the analysis.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, OpoverError::Cancelled(_))
    }

    /// The configuration problem, if this is one.
    pub fn as_config_error(&self) -> Option<&ConfigError> {
        match self {
            OpoverError::Config(err) => Some(err),
            _ => None,
        }
    }
}

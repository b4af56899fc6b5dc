//! Registration errors.

use thiserror::Error;

use crate::{ClassId, TypeVarId};

/// Errors raised while populating a [`crate::ClassRegistry`].
///
/// Lookups never fail with these; they only guard registration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// A class with this name is already registered.
    #[error("class '{name}' is already registered")]
    DuplicateClass { name: String },

    /// No class is registered under this name.
    #[error("unknown class '{name}'")]
    UnknownClass { name: String },

    /// A declaration references a type parameter this registry never allocated.
    #[error("class '{class}' references unknown type parameter {param:?}")]
    UnknownTypeParam { class: String, param: TypeVarId },

    /// Wrong number of type arguments for a generic class.
    #[error("class '{class}' expects {expected} type arguments, got {got}")]
    TypeArgCountMismatch {
        class: String,
        expected: usize,
        got: usize,
    },

    /// A boxing or root registration names a class that is not registered.
    #[error("well-known class {id:?} is not registered")]
    UnregisteredWellKnown { id: ClassId },
}

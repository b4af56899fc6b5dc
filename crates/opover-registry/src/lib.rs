//! opover Registry crate.
//!
//! A small nominal type system with generic classes, single inheritance plus
//! interfaces, primitive widening and boxing. [`ClassRegistry`] implements the
//! [`opover_core::TypeSystem`] capability, so hosts without a type system of
//! their own (and every test in this workspace) can drive the resolver.
//!
//! ## Modules
//!
//! - [`ids`]: deterministic class identities and type parameter ids
//! - [`ty`]: the [`Type`] model
//! - [`class`]: class and method declarations
//! - [`substitution`]: type parameter substitution
//! - [`assignability`]: the `is_assignable` relation
//! - [`cancel`]: host cancellation flag
//! - [`registry`]: [`ClassRegistry`] storage and the capability impl

pub mod assignability;
pub mod cancel;
pub mod class;
pub mod error;
pub mod ids;
pub mod registry;
pub mod substitution;
pub mod ty;

pub use cancel::CancellationFlag;
pub use class::{ClassDef, ClassFlags, MethodDef, MethodFlags, TypeParamDef};
pub use error::RegistrationError;
pub use ids::{ClassId, TypeVarId};
pub use registry::ClassRegistry;
pub use substitution::Substitution;
pub use ty::{ClassType, PrimitiveKind, Type};

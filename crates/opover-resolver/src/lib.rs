//! opover Resolver
//!
//! Decides whether an operator expression that the host rejects has a
//! user-defined method behind it, and what type that method produces.
//!
//! ## Architecture
//!
//! - **Method-name table** ([`OperatorTable`]): operator token to
//!   conventional method name (`+` to `add`, `[]` to `get`, ...)
//! - **Overload resolver** ([`resolve_method`]): receiver type, method name and
//!   argument types to the first applicable method's substituted return type
//! - **Classifier** ([`OverloadClassifier`]): one entry point per expression
//!   shape, built on the two above
//!
//! ## Modules
//!
//! - [`names`]: the method-name table and its defaults
//! - [`config`]: TOML overrides for the table
//! - [`overload`]: first-match overload resolution with generic substitution
//! - [`classify`]: binary fold, unary, index get/set, implicit conversion

pub mod classify;
pub mod config;
pub mod error;
pub mod names;
pub mod overload;

pub use classify::OverloadClassifier;
pub use config::OperatorConfig;
pub use error::ConfigError;
pub use names::OperatorTable;
pub use overload::{resolve_method, resolve_method_from_expressions};

pub use opover_core::{Cancellable, Cancelled, Resolution};

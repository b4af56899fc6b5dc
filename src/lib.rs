//! User-defined operator overloading for nominally typed languages.
//!
//! A host checker that knows nothing about operator overloading rejects
//! `a + b` when `a` is a `BigInteger`. This crate decides whether such an
//! expression is legal after all, because `a.add(b)` exists, and what type it
//! has. The host keeps its own checker and runs [`OverloadPass`] after it; the
//! pass retracts the errors a user-defined method makes moot.
//!
//! ## Crates
//!
//! - [`opover_core`]: `Resolution`, `Cancelled`, `Span` and the host
//!   capability traits
//! - [`opover_resolver`]: operator method names, overload resolution and the
//!   per-shape classifier
//! - [`registry`]: an in-memory nominal type system implementing the
//!   capability traits
//!
//! ## Example
//!
//! ```rust
//! use opover::prelude::*;
//! use opover::registry::{ClassDef, ClassRegistry, MethodDef, Type};
//!
//! let mut types = ClassRegistry::with_builtins();
//! let vec2 = Type::named("Vec2", vec![]);
//! types
//!     .register_class(
//!         ClassDef::new("Vec2").with_method(MethodDef::new("add", vec![vec2.clone()], vec2.clone())),
//!     )
//!     .unwrap();
//!
//! // `a + b`, which the host rejected with an error on 0..5
//! let expr = Expr::polyadic(
//!     vec![
//!         Expr::leaf(Some(vec2.clone()), Span::new(0, 1)),
//!         Expr::leaf(Some(vec2.clone()), Span::new(4, 5)),
//!     ],
//!     ["+"],
//! );
//! let mut diagnostics = DiagnosticBuffer::new();
//! diagnostics.add_diagnostic(Diagnostic::error(expr.span, "bad operand types for binary operator '+'"));
//!
//! let pass = OverloadPass::new(&types);
//! assert!(pass.after_expression(&expr, &mut diagnostics).unwrap());
//! assert!(!diagnostics.has_errors());
//! ```

use std::path::Path;

pub mod ast;
pub mod diagnostics;
pub mod error;
pub mod pass;

pub use ast::{Expr, ExprKind, VarDecl};
pub use diagnostics::{Diagnostic, DiagnosticBuffer, DiagnosticKind, DiagnosticSink};
pub use error::{OpoverError, Result};
pub use pass::OverloadPass;

pub use opover_core::{
    Cancellable, Cancelled, MethodSignature, Resolution, Span, Substitutor, TypeSystem, TypedExpr,
};
pub use opover_registry as registry;
pub use opover_resolver::{
    ConfigError, OperatorConfig, OperatorTable, OverloadClassifier, resolve_method,
    resolve_method_from_expressions,
};

/// Load an operator table from a TOML file.
///
/// See [`opover_resolver::config`] for the format.
pub fn load_operator_table(path: impl AsRef<Path>) -> Result<OperatorTable> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path).map_err(|source| OpoverError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let table = OperatorTable::from_toml(&source)?;
    tracing::debug!(path = %path.display(), "loaded operator table");
    Ok(table)
}

pub mod prelude {
    pub use crate::ast::{Expr, ExprKind, VarDecl};
    pub use crate::diagnostics::{Diagnostic, DiagnosticBuffer, DiagnosticKind, DiagnosticSink};
    pub use crate::error::OpoverError;
    pub use crate::pass::OverloadPass;
    pub use opover_core::{Cancellable, Cancelled, Resolution, Span, TypeSystem};
    pub use opover_resolver::{OperatorTable, OverloadClassifier};
}

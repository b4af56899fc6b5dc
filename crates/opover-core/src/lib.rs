//! opover core types.
//!
//! This crate holds the vocabulary shared by every other opover crate:
//!
//! - [`Resolution`]: the outcome of an overload lookup (`Resolved(T)` or `Unresolved`)
//! - [`Cancelled`]: the host's cancellation signal, propagated unchanged
//! - [`Span`]: byte ranges used to match host diagnostics to expressions
//! - [`TypeSystem`], [`Substitutor`], [`TypedExpr`]: the capabilities the
//!   resolver needs from the host
//!
//! Nothing in here owns type information. Types are opaque handles supplied by
//! whichever [`TypeSystem`] implementation the host plugs in.

pub mod error;
pub mod expr;
pub mod resolution;
pub mod span;
pub mod type_system;

pub use error::{Cancellable, Cancelled};
pub use expr::TypedExpr;
pub use resolution::Resolution;
pub use span::Span;
pub use type_system::{MethodSignature, Substitutor, TypeSystem};

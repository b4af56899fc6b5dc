//! Host type system capability.
//!
//! The resolver never builds types of its own. Everything it learns about a
//! receiver (its declaration, its generic instantiation, its methods, and
//! which types flow into which) comes through [`TypeSystem`].
//!
//! Every method may observe host cancellation and return [`Cancelled`].
//!
//! [`Cancelled`]: crate::Cancelled

use std::fmt;

use crate::Cancellable;

/// Maps a declaration's type parameters to a receiver's type arguments.
pub trait Substitutor<T> {
    /// Replace every type parameter occurring in `ty`.
    fn substitute(&self, ty: &T) -> T;
}

/// A declared method as seen by overload resolution.
///
/// Parameter and return types may still mention the declaring class's type
/// parameters; callers substitute them through the receiver's [`Substitutor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSignature<T> {
    /// Ordered parameter types.
    pub params: Vec<T>,
    /// Declared return type.
    pub return_type: T,
}

impl<T> MethodSignature<T> {
    /// Create a signature.
    pub fn new(params: Vec<T>, return_type: T) -> Self {
        Self {
            params,
            return_type,
        }
    }

    /// Number of declared parameters.
    #[inline]
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

/// Read-only view of the host's nominal type system.
pub trait TypeSystem {
    /// Opaque type handle.
    type Ty: Clone + PartialEq + fmt::Debug;
    /// Handle to a resolved class declaration.
    type Class;
    /// Substitutor produced for a receiver type.
    type Substitutor: Substitutor<Self::Ty>;

    /// Resolve the nominal declaration behind `ty`.
    ///
    /// Returns `None` for primitives, arrays, and class types whose
    /// declaration cannot be found (for example an import that does not
    /// resolve yet).
    fn resolve_declaration(&self, ty: &Self::Ty) -> Cancellable<Option<Self::Class>>;

    /// The substitutor for however `ty` instantiates its declaration.
    fn substitutor_for(&self, ty: &Self::Ty) -> Cancellable<Self::Substitutor>;

    /// All methods named `name` visible on `class`, inherited ones included.
    ///
    /// Order is the host's enumeration order. Overload resolution picks the
    /// first applicable entry, so the order is observable.
    fn methods_named(
        &self,
        class: &Self::Class,
        name: &str,
    ) -> Cancellable<Vec<MethodSignature<Self::Ty>>>;

    /// Whether a value of type `source` may be passed where `target` is expected.
    fn is_assignable(&self, target: &Self::Ty, source: &Self::Ty) -> Cancellable<bool>;
}

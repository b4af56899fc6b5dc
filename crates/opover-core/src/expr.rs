//! Expression capability.

/// An expression node whose inferred type the host can report.
///
/// `None` means the host could not type the expression (incomplete code,
/// unresolved import). The resolver treats that as "cannot determine".
pub trait TypedExpr<T> {
    /// The expression's type, if known.
    fn expr_type(&self) -> Option<T>;
}

impl<T, E: TypedExpr<T> + ?Sized> TypedExpr<T> for &E {
    fn expr_type(&self) -> Option<T> {
        (**self).expr_type()
    }
}

impl<T, E: TypedExpr<T> + ?Sized> TypedExpr<T> for Box<E> {
    fn expr_type(&self) -> Option<T> {
        (**self).expr_type()
    }
}

//! Typed expression tree handed over by the host.
//!
//! Only the shapes that can carry a user-defined operator are modelled in
//! detail:
//! - n-ary operator chains (`a + b - c`)
//! - prefix operators (`-a`, `++a`)
//! - index access (`a[i]`)
//! - assignment (`a = b`, `a[i] = v`)
//!
//! Everything else is a [`ExprKind::Leaf`]. Every node carries the type the
//! host inferred for it, if any, and its source span. Sub-expressions that
//! may be missing in incomplete code are `Option`s.

use opover_core::{Span, TypedExpr};

/// An expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr<T> {
    /// The expression shape
    pub kind: ExprKind<T>,
    /// Inferred type, `None` when the host could not type the node
    pub ty: Option<T>,
    /// Source location
    pub span: Span,
}

/// The shape of an expression.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind<T> {
    /// Operator chain. `tokens[i]` sits between `operands[i]` and `operands[i + 1]`.
    Polyadic {
        operands: Vec<Expr<T>>,
        tokens: Vec<String>,
    },
    /// Prefix operator.
    Prefix {
        token: String,
        operand: Option<Box<Expr<T>>>,
    },
    /// `container[index]`.
    IndexAccess {
        container: Box<Expr<T>>,
        index: Option<Box<Expr<T>>>,
    },
    /// `lhs token rhs` where `token` is `=` or a compound assignment.
    Assignment {
        token: String,
        lhs: Box<Expr<T>>,
        rhs: Option<Box<Expr<T>>>,
    },
    /// Identifiers, literals, calls and anything else.
    Leaf,
}

impl<T> Expr<T> {
    /// A leaf expression.
    pub fn leaf(ty: Option<T>, span: Span) -> Self {
        Self {
            kind: ExprKind::Leaf,
            ty,
            span,
        }
    }

    /// An operator chain spanning from its first to its last operand.
    ///
    /// Host checkers that reject the chain leave its type unset.
    pub fn polyadic<S: Into<String>>(
        operands: Vec<Expr<T>>,
        tokens: impl IntoIterator<Item = S>,
    ) -> Self {
        let span = match (operands.first(), operands.last()) {
            (Some(first), Some(last)) => first.span.to(last.span),
            _ => Span::default(),
        };
        Self {
            kind: ExprKind::Polyadic {
                operands,
                tokens: tokens.into_iter().map(Into::into).collect(),
            },
            ty: None,
            span,
        }
    }

    /// A prefix operator expression.
    pub fn prefix(token: impl Into<String>, operand: Option<Expr<T>>, span: Span) -> Self {
        Self {
            kind: ExprKind::Prefix {
                token: token.into(),
                operand: operand.map(Box::new),
            },
            ty: None,
            span,
        }
    }

    /// An index access expression.
    pub fn index(container: Expr<T>, index: Option<Expr<T>>, span: Span) -> Self {
        Self {
            kind: ExprKind::IndexAccess {
                container: Box::new(container),
                index: index.map(Box::new),
            },
            ty: None,
            span,
        }
    }

    /// An assignment spanning from the target to the value.
    pub fn assign(token: impl Into<String>, lhs: Expr<T>, rhs: Option<Expr<T>>) -> Self {
        let span = match &rhs {
            Some(rhs) => lhs.span.to(rhs.span),
            None => lhs.span,
        };
        Self {
            kind: ExprKind::Assignment {
                token: token.into(),
                lhs: Box::new(lhs),
                rhs: rhs.map(Box::new),
            },
            ty: None,
            span,
        }
    }

    /// Set the inferred type.
    pub fn with_type(mut self, ty: T) -> Self {
        self.ty = Some(ty);
        self
    }

    /// Override the source span.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }
}

impl<T: Clone> TypedExpr<T> for Expr<T> {
    fn expr_type(&self) -> Option<T> {
        self.ty.clone()
    }
}

/// A local variable or field declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl<T> {
    /// Declared type, `None` when it does not resolve
    pub ty: Option<T>,
    /// Span of the type element
    pub type_span: Span,
    /// Span of the whole declaration
    pub span: Span,
    pub initializer: Option<Expr<T>>,
}

impl<T> VarDecl<T> {
    pub fn new(ty: Option<T>, type_span: Span, span: Span, initializer: Option<Expr<T>>) -> Self {
        Self {
            ty,
            type_span,
            span,
            initializer,
        }
    }

    /// Range a host flags for an incompatible initializer: from the start of
    /// the type element to the end of the declaration.
    #[inline]
    pub fn flagged_range(&self) -> Span {
        self.type_span.to(self.span)
    }
}

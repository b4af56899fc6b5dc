//! Diagnostic suppression for operator expressions.
//!
//! The host checks each node first and may report "bad operand types",
//! "array type expected" or "incompatible types". Right after that the host
//! calls the matching hook here. When the error sits exactly on the node and
//! a user-defined method makes the expression legal, the hook retracts it.
//!
//! | Hook | Flagged range | Legal when |
//! |------|---------------|------------|
//! | [`after_polyadic`](OverloadPass::after_polyadic) | whole chain | binary fold (or `compareTo`) resolves |
//! | [`after_prefix`](OverloadPass::after_prefix) | whole expression | unary method resolves |
//! | [`after_index_access`](OverloadPass::after_index_access) | container | an index-get method resolves |
//! | [`after_assignment`](OverloadPass::after_assignment) | indexed target | an index-set method resolves |
//! | [`after_assignment`](OverloadPass::after_assignment) | whole assignment | the value converts via `valueOf` |
//! | [`after_variable`](OverloadPass::after_variable) | type to end of declaration | the initializer converts via `valueOf` |
//!
//! Only `=` assignments are considered. Compound assignments are left to
//! the host.

use opover_core::{Cancellable, Resolution, TypeSystem};
use opover_resolver::{OperatorTable, OverloadClassifier};
use tracing::debug;

use crate::ast::{Expr, ExprKind, VarDecl};
use crate::diagnostics::DiagnosticSink;

/// Runs after the host's own checks and retracts errors that a
/// user-defined operator method makes moot.
///
/// Holds only shared references, so one pass can serve any number of
/// concurrent analyses.
pub struct OverloadPass<'a, S: ?Sized> {
    classifier: OverloadClassifier<'a, S>,
}

impl<S: ?Sized> Clone for OverloadPass<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: ?Sized> Copy for OverloadPass<'_, S> {}

impl<'a, S: TypeSystem + ?Sized> OverloadPass<'a, S> {
    /// Pass using the built-in method names.
    pub fn new(types: &'a S) -> Self {
        Self {
            classifier: OverloadClassifier::new(types),
        }
    }

    /// Pass using a custom method-name table.
    pub fn with_table(types: &'a S, table: &'a OperatorTable) -> Self {
        Self {
            classifier: OverloadClassifier::with_table(types, table),
        }
    }

    /// The classifier behind the hooks.
    pub fn classifier(&self) -> OverloadClassifier<'a, S> {
        self.classifier
    }

    /// Dispatch on the node's shape.
    ///
    /// Returns whether a diagnostic was retracted.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn after_expression<D>(&self, expr: &Expr<S::Ty>, sink: &mut D) -> Cancellable<bool>
    where
        D: DiagnosticSink + ?Sized,
    {
        match &expr.kind {
            ExprKind::Polyadic { .. } => self.after_polyadic(expr, sink),
            ExprKind::Prefix { .. } => self.after_prefix(expr, sink),
            ExprKind::IndexAccess { .. } => self.after_index_access(expr, sink),
            ExprKind::Assignment { .. } => self.after_assignment(expr, sink),
            ExprKind::Leaf => Ok(false),
        }
    }

    /// Operator chain rejected by the host.
    ///
    /// A two-operand relational expression goes through `compareTo`; every
    /// other chain is folded left to right.
    pub fn after_polyadic<D>(&self, expr: &Expr<S::Ty>, sink: &mut D) -> Cancellable<bool>
    where
        D: DiagnosticSink + ?Sized,
    {
        let ExprKind::Polyadic { operands, tokens } = &expr.kind else {
            return Ok(false);
        };
        if !sink.is_flagged(expr.span) {
            return Ok(false);
        }

        let result = match (operands.as_slice(), tokens.as_slice()) {
            ([lhs, rhs], [token]) if self.classifier.table().is_comparison(token) => logged(
                "comparison",
                self.classifier
                    .classify_comparison(lhs.ty.as_ref(), rhs.ty.as_ref(), token),
            )?,
            _ => {
                let operand_types: Vec<Option<S::Ty>> =
                    operands.iter().map(|operand| operand.ty.clone()).collect();
                let tokens: Vec<&str> = tokens.iter().map(String::as_str).collect();
                logged(
                    "polyadic",
                    self.classifier.classify_binary(&operand_types, &tokens),
                )?
            }
        };
        Ok(retract_if_resolved(sink, &result, "polyadic"))
    }

    /// Prefix operator rejected by the host.
    pub fn after_prefix<D>(&self, expr: &Expr<S::Ty>, sink: &mut D) -> Cancellable<bool>
    where
        D: DiagnosticSink + ?Sized,
    {
        let ExprKind::Prefix { token, operand } = &expr.kind else {
            return Ok(false);
        };
        if !sink.is_flagged(expr.span) {
            return Ok(false);
        }

        let operand_ty = operand.as_ref().and_then(|operand| operand.ty.as_ref());
        let result = logged("prefix", self.classifier.classify_unary(operand_ty, token))?;
        Ok(retract_if_resolved(sink, &result, "prefix"))
    }

    /// Index read on a non-array container.
    ///
    /// Hosts flag the container, not the whole access.
    pub fn after_index_access<D>(&self, expr: &Expr<S::Ty>, sink: &mut D) -> Cancellable<bool>
    where
        D: DiagnosticSink + ?Sized,
    {
        let ExprKind::IndexAccess { container, index } = &expr.kind else {
            return Ok(false);
        };
        if !sink.is_flagged(container.span) {
            return Ok(false);
        }

        let result = logged(
            "index-get",
            self.classifier
                .classify_index_get(Some(&**container), index.as_deref()),
        )?;
        Ok(retract_if_resolved(sink, &result, "index-get"))
    }

    /// Plain assignment: indexed store first, then implicit conversion.
    ///
    /// Both checks may retract, one diagnostic each.
    pub fn after_assignment<D>(&self, expr: &Expr<S::Ty>, sink: &mut D) -> Cancellable<bool>
    where
        D: DiagnosticSink + ?Sized,
    {
        let ExprKind::Assignment { token, lhs, rhs } = &expr.kind else {
            return Ok(false);
        };
        if token != "=" {
            return Ok(false);
        }

        let mut retracted = false;
        if let ExprKind::IndexAccess { container, index } = &lhs.kind {
            if sink.is_flagged(lhs.span) {
                let result = logged(
                    "index-set",
                    self.classifier.classify_index_set(
                        Some(&**container),
                        index.as_deref(),
                        rhs.as_deref(),
                    ),
                )?;
                retracted |= retract_if_resolved(sink, &result, "index-set");
            }
        }

        if sink.is_flagged(expr.span) {
            let convertible = logged(
                "assignment",
                self.classifier.is_convertible(lhs.ty.as_ref(), rhs.as_deref()),
            )?;
            if convertible {
                retracted |= retract(sink, "assignment");
            }
        }
        Ok(retracted)
    }

    /// Declaration whose initializer the host rejected.
    pub fn after_variable<D>(&self, var: &VarDecl<S::Ty>, sink: &mut D) -> Cancellable<bool>
    where
        D: DiagnosticSink + ?Sized,
    {
        let Some(initializer) = &var.initializer else {
            return Ok(false);
        };
        if !sink.is_flagged(var.flagged_range()) {
            return Ok(false);
        }

        let convertible = logged(
            "variable",
            self.classifier
                .is_convertible(var.ty.as_ref(), Some(initializer)),
        )?;
        Ok(convertible && retract(sink, "variable"))
    }
}

fn logged<T>(shape: &'static str, result: Cancellable<T>) -> Cancellable<T> {
    result.inspect_err(|_| debug!(shape, "overload check cancelled"))
}

fn retract_if_resolved<T, D>(sink: &mut D, result: &Resolution<T>, shape: &'static str) -> bool
where
    D: DiagnosticSink + ?Sized,
{
    result.is_resolved() && retract(sink, shape)
}

fn retract<D: DiagnosticSink + ?Sized>(sink: &mut D, shape: &'static str) -> bool {
    match sink.retract_last_error() {
        Some(diagnostic) => {
            debug!(shape, span = %diagnostic.span, "suppressed diagnostic");
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{Diagnostic, DiagnosticBuffer};
    use opover_core::{Cancelled, Span};
    use opover_registry::registry::builtins;
    use opover_registry::{ClassDef, ClassRegistry, MethodDef, Type};

    fn named(name: &str) -> Type {
        Type::named(name, vec![])
    }

    fn registry() -> ClassRegistry {
        let mut registry = ClassRegistry::with_builtins();
        let vec2 = named("Vec2");
        registry
            .register_class(ClassDef::new("Vec2").with_methods([
                MethodDef::new("add", vec![vec2.clone()], vec2.clone()),
                MethodDef::new("negate", vec![], vec2.clone()),
                MethodDef::new("compareTo", vec![vec2.clone()], Type::int()),
            ]))
            .unwrap();
        registry
            .register_class(ClassDef::new("Matrix").with_methods([
                MethodDef::new("get", vec![Type::int()], Type::float()),
                MethodDef::new("set", vec![Type::int(), Type::float()], named("Matrix")),
            ]))
            .unwrap();
        registry
            .register_class(ClassDef::new("Fraction").with_method(MethodDef::new_static(
                "valueOf",
                vec![Type::int()],
                named("Fraction"),
            )))
            .unwrap();
        registry
    }

    fn leaf(ty: Type, start: u32, end: u32) -> Expr<Type> {
        Expr::leaf(Some(ty), Span::new(start, end))
    }

    fn flagged(span: Span) -> DiagnosticBuffer {
        let mut sink = DiagnosticBuffer::new();
        sink.add_diagnostic(Diagnostic::error(span, "bad operand types"));
        sink
    }

    #[test]
    fn polyadic_error_is_retracted() {
        let registry = registry();
        let pass = OverloadPass::new(&registry);
        let expr = Expr::polyadic(
            vec![leaf(named("Vec2"), 0, 1), leaf(named("Vec2"), 4, 5), leaf(named("Vec2"), 8, 9)],
            ["+", "+"],
        );
        let mut sink = flagged(expr.span);

        assert!(pass.after_expression(&expr, &mut sink).unwrap());
        assert!(sink.is_empty());
        assert_eq!(sink.error_count(), 0);
    }

    #[test]
    fn mixed_chain_keeps_error() {
        let registry = registry();
        let pass = OverloadPass::new(&registry);
        let expr = Expr::polyadic(
            vec![leaf(named("Vec2"), 0, 1), leaf(named("Vec2"), 4, 5), leaf(Type::int(), 8, 9)],
            ["+", "+"],
        );
        let mut sink = flagged(expr.span);

        assert!(!pass.after_polyadic(&expr, &mut sink).unwrap());
        assert_eq!(sink.error_count(), 1);
    }

    #[test]
    fn unflagged_expression_is_untouched() {
        let registry = registry();
        let pass = OverloadPass::new(&registry);
        let expr = Expr::polyadic(vec![leaf(named("Vec2"), 0, 1), leaf(named("Vec2"), 4, 5)], ["+"]);

        // Error on a different range.
        let mut sink = flagged(Span::new(0, 4));
        assert!(!pass.after_polyadic(&expr, &mut sink).unwrap());
        assert_eq!(sink.count(), 1);

        // Warning on the exact range.
        let mut sink = DiagnosticBuffer::new();
        sink.add_diagnostic(Diagnostic::warning(expr.span, "suspicious"));
        assert!(!pass.after_polyadic(&expr, &mut sink).unwrap());
        assert_eq!(sink.count(), 1);
    }

    #[test]
    fn comparison_goes_through_compare_to() {
        let registry = registry();
        let pass = OverloadPass::new(&registry);
        let expr = Expr::polyadic(vec![leaf(named("Vec2"), 0, 1), leaf(named("Vec2"), 4, 5)], ["<"]);
        let mut sink = flagged(expr.span);
        assert!(pass.after_polyadic(&expr, &mut sink).unwrap());
    }

    #[test]
    fn prefix_error_is_retracted() {
        let registry = registry();
        let pass = OverloadPass::new(&registry);
        let expr = Expr::prefix("-", Some(leaf(named("Vec2"), 1, 2)), Span::new(0, 2));

        let mut sink = flagged(expr.span);
        assert!(pass.after_prefix(&expr, &mut sink).unwrap());

        let unknown = Expr::prefix("~", Some(leaf(named("Vec2"), 1, 2)), Span::new(0, 2));
        let mut sink = flagged(unknown.span);
        assert!(!pass.after_prefix(&unknown, &mut sink).unwrap());

        let missing = Expr::<Type>::prefix("-", None, Span::new(0, 1));
        let mut sink = flagged(missing.span);
        assert!(!pass.after_prefix(&missing, &mut sink).unwrap());
    }

    #[test]
    fn index_get_checks_container_range() {
        let registry = registry();
        let pass = OverloadPass::new(&registry);
        let container = leaf(named("Matrix"), 0, 1);
        let expr = Expr::index(container.clone(), Some(leaf(Type::int(), 2, 3)), Span::new(0, 4));

        let mut sink = flagged(container.span);
        assert!(pass.after_index_access(&expr, &mut sink).unwrap());

        let mut sink = flagged(expr.span);
        assert!(!pass.after_index_access(&expr, &mut sink).unwrap());
    }

    #[test]
    fn index_set_assignment() {
        let registry = registry();
        let pass = OverloadPass::new(&registry);
        let target = Expr::index(
            leaf(named("Matrix"), 0, 1),
            Some(leaf(Type::int(), 2, 3)),
            Span::new(0, 4),
        );
        let expr = Expr::assign("=", target.clone(), Some(leaf(Type::float(), 7, 10)));

        let mut sink = flagged(target.span);
        assert!(pass.after_assignment(&expr, &mut sink).unwrap());
        assert!(!sink.has_errors());
    }

    #[test]
    fn assignment_conversion() {
        let registry = registry();
        let pass = OverloadPass::new(&registry);
        let expr = Expr::assign(
            "=",
            leaf(named("Fraction"), 0, 1),
            Some(leaf(Type::int(), 4, 5)),
        );
        let mut sink = flagged(expr.span);
        assert!(pass.after_expression(&expr, &mut sink).unwrap());

        let expr = Expr::assign(
            "=",
            leaf(named("Fraction"), 0, 1),
            Some(leaf(named(builtins::STRING), 4, 9)),
        );
        let mut sink = flagged(expr.span);
        assert!(!pass.after_expression(&expr, &mut sink).unwrap());
    }

    #[test]
    fn compound_assignment_is_ignored() {
        let registry = registry();
        let pass = OverloadPass::new(&registry);
        let expr = Expr::assign(
            "+=",
            leaf(named("Fraction"), 0, 1),
            Some(leaf(Type::int(), 5, 6)),
        );
        let mut sink = flagged(expr.span);
        assert!(!pass.after_assignment(&expr, &mut sink).unwrap());
        assert_eq!(sink.error_count(), 1);
    }

    #[test]
    fn variable_initializer_conversion() {
        let registry = registry();
        let pass = OverloadPass::new(&registry);
        let decl = VarDecl::new(
            Some(named("Fraction")),
            Span::new(0, 8),
            Span::new(0, 15),
            Some(leaf(Type::int(), 13, 14)),
        );

        let mut sink = flagged(decl.flagged_range());
        assert!(pass.after_variable(&decl, &mut sink).unwrap());

        let no_init = VarDecl::new(Some(named("Fraction")), Span::new(0, 8), Span::new(0, 11), None);
        let mut sink = flagged(no_init.flagged_range());
        assert!(!pass.after_variable(&no_init, &mut sink).unwrap());

        // Hosts that flag only the initializer are not matched.
        let mut sink = flagged(Span::new(13, 14));
        assert!(!pass.after_variable(&decl, &mut sink).unwrap());
    }

    #[test]
    fn cancellation_is_not_swallowed() {
        let registry = registry();
        let pass = OverloadPass::new(&registry);
        registry.cancellation().cancel();

        let expr = Expr::polyadic(vec![leaf(named("Vec2"), 0, 1), leaf(named("Vec2"), 4, 5)], ["+"]);
        let mut sink = flagged(expr.span);
        assert_eq!(pass.after_expression(&expr, &mut sink), Err(Cancelled));
        assert_eq!(sink.error_count(), 1);
    }

    #[test]
    fn leaves_are_ignored() {
        let registry = registry();
        let pass = OverloadPass::new(&registry);
        let expr = leaf(named("Vec2"), 0, 1);
        let mut sink = flagged(expr.span);
        assert!(!pass.after_expression(&expr, &mut sink).unwrap());
    }
}

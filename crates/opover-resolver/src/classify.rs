//! Expression-shape classification.
//!
//! [`OverloadClassifier`] answers, for one syntactic shape at a time, which
//! type the expression would have if its operator were the conventional
//! method call. Every entry point is a pure function of its inputs: the
//! classifier holds two shared references and nothing else, so it is `Copy`
//! and may be used from any number of analysis threads at once.

use opover_core::{Cancellable, Resolution, TypeSystem, TypedExpr};
use tracing::trace;

use crate::names::OperatorTable;
use crate::overload::resolve_method;

/// Maps operator expressions to user-defined method calls.
pub struct OverloadClassifier<'a, S: ?Sized> {
    types: &'a S,
    table: &'a OperatorTable,
}

impl<S: ?Sized> Clone for OverloadClassifier<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: ?Sized> Copy for OverloadClassifier<'_, S> {}

impl<'a, S: TypeSystem + ?Sized> OverloadClassifier<'a, S> {
    /// Classifier using the built-in method names.
    pub fn new(types: &'a S) -> Self {
        Self::with_table(types, OperatorTable::standard())
    }

    /// Classifier using a custom method-name table.
    pub fn with_table(types: &'a S, table: &'a OperatorTable) -> Self {
        Self { types, table }
    }

    /// The type system lookups go through.
    #[inline]
    pub fn types(&self) -> &'a S {
        self.types
    }

    /// The method-name table in use.
    #[inline]
    pub fn table(&self) -> &'a OperatorTable {
        self.table
    }

    /// One binary step: `lhs token rhs` as `lhs.name(rhs)`.
    pub fn binary_step(
        &self,
        lhs: Option<&S::Ty>,
        rhs: Option<&S::Ty>,
        token: &str,
    ) -> Cancellable<Resolution<S::Ty>> {
        let Some(name) = self.table.name_for_binary(token) else {
            return Ok(Resolution::Unresolved);
        };
        resolve_method(self.types, lhs, name, &[rhs])
    }

    /// Left fold over an operator chain `o0 t0 o1 t1 o2 ...`.
    ///
    /// `tokens[i]` sits between `operand_types[i]` and `operand_types[i + 1]`.
    /// A failed step leaves the accumulator unknown and the fold carries on,
    /// so every later step fails too. `Vec2 + Vec2 + int` with no `add(int)`
    /// is therefore unresolved even though the first step succeeds.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn classify_binary(
        &self,
        operand_types: &[Option<S::Ty>],
        tokens: &[&str],
    ) -> Cancellable<Resolution<S::Ty>> {
        let Some((first, rest)) = operand_types.split_first() else {
            return Ok(Resolution::Unresolved);
        };
        if rest.is_empty() {
            return Ok(Resolution::Unresolved);
        }

        let mut acc = first.clone();
        for (index, rhs) in rest.iter().enumerate() {
            let step = match tokens.get(index) {
                Some(token) => self.binary_step(acc.as_ref(), rhs.as_ref(), token)?,
                None => Resolution::Unresolved,
            };
            if step.is_unresolved() {
                trace!(step = index, "binary fold step unresolved");
            }
            acc = step.resolved();
        }
        Ok(acc.into())
    }

    /// Relational operator as `lhs.compareTo(rhs)`.
    ///
    /// The result is whatever the comparison method returns. Deciding what
    /// that means for the relational expression is left to the host.
    pub fn classify_comparison(
        &self,
        lhs: Option<&S::Ty>,
        rhs: Option<&S::Ty>,
        token: &str,
    ) -> Cancellable<Resolution<S::Ty>> {
        let Some(name) = self.table.name_for_comparison(token) else {
            return Ok(Resolution::Unresolved);
        };
        resolve_method(self.types, lhs, name, &[rhs])
    }

    /// Prefix operator as a zero-argument call on the operand.
    pub fn classify_unary(
        &self,
        operand: Option<&S::Ty>,
        token: &str,
    ) -> Cancellable<Resolution<S::Ty>> {
        let Some(name) = self.table.name_for_unary(token) else {
            return Ok(Resolution::Unresolved);
        };
        resolve_method(self.types, operand, name, &[])
    }

    /// `container[index]` read, trying each index-get name in order.
    pub fn classify_index_get<E>(
        &self,
        container: Option<&E>,
        index: Option<&E>,
    ) -> Cancellable<Resolution<S::Ty>>
    where
        E: TypedExpr<S::Ty> + ?Sized,
    {
        let (Some(container_ty), Some(index_ty)) = (
            container.and_then(|expr| expr.expr_type()),
            index.and_then(|expr| expr.expr_type()),
        ) else {
            return Ok(Resolution::Unresolved);
        };
        for name in self.table.index_get_candidates() {
            let result = resolve_method(self.types, Some(&container_ty), name, &[Some(&index_ty)])?;
            if result.is_resolved() {
                return Ok(result);
            }
        }
        Ok(Resolution::Unresolved)
    }

    /// `container[index] = value`, trying each index-set name in order.
    pub fn classify_index_set<E>(
        &self,
        container: Option<&E>,
        index: Option<&E>,
        value: Option<&E>,
    ) -> Cancellable<Resolution<S::Ty>>
    where
        E: TypedExpr<S::Ty> + ?Sized,
    {
        let (Some(container_ty), Some(index_ty), Some(value_ty)) = (
            container.and_then(|expr| expr.expr_type()),
            index.and_then(|expr| expr.expr_type()),
            value.and_then(|expr| expr.expr_type()),
        ) else {
            return Ok(Resolution::Unresolved);
        };
        let args = [Some(&index_ty), Some(&value_ty)];
        for name in self.table.index_set_candidates() {
            let result = resolve_method(self.types, Some(&container_ty), name, &args)?;
            if result.is_resolved() {
                return Ok(result);
            }
        }
        Ok(Resolution::Unresolved)
    }

    /// Whether `target` has a conversion factory accepting `source`'s type.
    pub fn is_convertible<E>(&self, target: Option<&S::Ty>, source: Option<&E>) -> Cancellable<bool>
    where
        E: TypedExpr<S::Ty> + ?Sized,
    {
        let Some(source_ty) = source.and_then(|expr| expr.expr_type()) else {
            return Ok(false);
        };
        let result = resolve_method(self.types, target, self.table.value_of_name(), &[Some(&source_ty)])?;
        Ok(result.is_resolved())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opover_core::Cancelled;
    use opover_registry::registry::builtins;
    use opover_registry::{ClassDef, ClassRegistry, MethodDef, Type};

    struct Typed(Option<Type>);

    impl TypedExpr<Type> for Typed {
        fn expr_type(&self) -> Option<Type> {
            self.0.clone()
        }
    }

    fn typed(ty: Type) -> Typed {
        Typed(Some(ty))
    }

    fn named(name: &str) -> Type {
        Type::named(name, vec![])
    }

    fn registry() -> ClassRegistry {
        let mut registry = ClassRegistry::with_builtins();
        let vec2 = named("Vec2");
        registry
            .register_class(ClassDef::new("Vec2").with_methods([
                MethodDef::new("add", vec![vec2.clone()], vec2.clone()),
                MethodDef::new("subtract", vec![vec2.clone()], vec2.clone()),
                MethodDef::new("multiply", vec![Type::float()], vec2.clone()),
                MethodDef::new("negate", vec![], vec2.clone()),
                MethodDef::new("compareTo", vec![vec2.clone()], Type::int()),
            ]))
            .unwrap();
        registry
            .register_class(ClassDef::new("Matrix").with_methods([
                MethodDef::new("get", vec![Type::int()], Type::float()),
                MethodDef::new("set", vec![Type::int(), Type::float()], named("Matrix")),
                MethodDef::new("put", vec![named(builtins::STRING), Type::float()], Type::void()),
            ]))
            .unwrap();
        registry
            .register_class(ClassDef::new("Dict").with_methods([
                MethodDef::new("put", vec![named(builtins::STRING), Type::int()], Type::int()),
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

    #[test]
    fn binary_fold_resolves_every_step() {
        let registry = registry();
        let classifier = OverloadClassifier::new(&registry);
        let operands = [Some(named("Vec2")), Some(named("Vec2")), Some(named("Vec2"))];
        assert_eq!(
            classifier.classify_binary(&operands, &["+", "+"]).unwrap(),
            Resolution::Resolved(named("Vec2"))
        );
        assert_eq!(
            classifier.classify_binary(&operands, &["+", "-"]).unwrap(),
            Resolution::Resolved(named("Vec2"))
        );
    }

    #[test]
    fn mixed_fold_is_unresolved() {
        let registry = registry();
        let classifier = OverloadClassifier::new(&registry);
        let operands = [Some(named("Vec2")), Some(named("Vec2")), Some(Type::int())];
        assert_eq!(
            classifier.classify_binary(&operands, &["+", "+"]).unwrap(),
            Resolution::Unresolved
        );
    }

    #[test]
    fn fold_continues_past_failed_step() {
        let registry = registry();
        let classifier = OverloadClassifier::new(&registry);
        // First step fails, so the accumulator is unknown for the second.
        let operands = [Some(Type::int()), Some(named("Vec2")), Some(named("Vec2"))];
        assert!(classifier.classify_binary(&operands, &["+", "+"]).unwrap().is_unresolved());
    }

    #[test]
    fn fold_with_primitive_argument() {
        let registry = registry();
        let classifier = OverloadClassifier::new(&registry);
        let operands = [Some(named("Vec2")), Some(Type::float()), Some(named("Vec2"))];
        assert_eq!(
            classifier.classify_binary(&operands, &["*", "+"]).unwrap(),
            Resolution::Resolved(named("Vec2"))
        );
    }

    #[test]
    fn fold_edge_cases() {
        let registry = registry();
        let classifier = OverloadClassifier::new(&registry);
        assert!(classifier.classify_binary(&[], &[]).unwrap().is_unresolved());
        assert!(
            classifier
                .classify_binary(&[Some(named("Vec2"))], &[])
                .unwrap()
                .is_unresolved()
        );
        // Missing token for the second step.
        let operands = [Some(named("Vec2")), Some(named("Vec2")), Some(named("Vec2"))];
        assert!(classifier.classify_binary(&operands, &["+"]).unwrap().is_unresolved());
        // Unknown operand type.
        let operands = [Some(named("Vec2")), None];
        assert!(classifier.classify_binary(&operands, &["+"]).unwrap().is_unresolved());
    }

    #[test]
    fn unknown_tokens_are_unresolved() {
        let registry = registry();
        let classifier = OverloadClassifier::new(&registry);
        let vec2 = named("Vec2");
        let matrix = typed(named("Matrix"));
        let index = typed(Type::int());

        assert!(classifier.binary_step(Some(&vec2), Some(&vec2), "&&").unwrap().is_unresolved());
        assert!(
            classifier
                .classify_binary(&[Some(vec2.clone()), Some(vec2.clone())], &["=="])
                .unwrap()
                .is_unresolved()
        );
        assert!(classifier.classify_unary(Some(&vec2), "*").unwrap().is_unresolved());
        assert!(classifier.classify_comparison(Some(&vec2), Some(&vec2), "+").unwrap().is_unresolved());

        let table = OperatorTable::from_toml("index_get = [\"at\"]\nindex_set = [\"store\"]\n").unwrap();
        let custom = OverloadClassifier::with_table(&registry, &table);
        assert!(custom.classify_index_get(Some(&matrix), Some(&index)).unwrap().is_unresolved());
        assert!(
            custom
                .classify_index_set(Some(&matrix), Some(&index), Some(&typed(Type::float())))
                .unwrap()
                .is_unresolved()
        );
    }

    #[test]
    fn unary_prefix() {
        let registry = registry();
        let classifier = OverloadClassifier::new(&registry);
        let vec2 = named("Vec2");
        assert_eq!(
            classifier.classify_unary(Some(&vec2), "-").unwrap(),
            Resolution::Resolved(vec2.clone())
        );
        assert!(classifier.classify_unary(Some(&vec2), "++").unwrap().is_unresolved());
        assert!(classifier.classify_unary(None, "-").unwrap().is_unresolved());
    }

    #[test]
    fn comparison_uses_compare_to() {
        let registry = registry();
        let classifier = OverloadClassifier::new(&registry);
        let vec2 = named("Vec2");
        assert_eq!(
            classifier.classify_comparison(Some(&vec2), Some(&vec2), "<=").unwrap(),
            Resolution::Resolved(Type::int())
        );
        assert!(
            classifier
                .classify_comparison(Some(&vec2), Some(&Type::int()), "<")
                .unwrap()
                .is_unresolved()
        );
    }

    #[test]
    fn index_get() {
        let registry = registry();
        let classifier = OverloadClassifier::new(&registry);
        let matrix = typed(named("Matrix"));
        assert_eq!(
            classifier.classify_index_get(Some(&matrix), Some(&typed(Type::int()))).unwrap(),
            Resolution::Resolved(Type::float())
        );
        assert!(
            classifier
                .classify_index_get(Some(&matrix), Some(&typed(named(builtins::STRING))))
                .unwrap()
                .is_unresolved()
        );
        assert!(classifier.classify_index_get(Some(&matrix), None).unwrap().is_unresolved());
    }

    #[test]
    fn index_set_stops_at_first_candidate() {
        let registry = registry();
        let classifier = OverloadClassifier::new(&registry);
        let matrix = typed(named("Matrix"));
        assert_eq!(
            classifier
                .classify_index_set(Some(&matrix), Some(&typed(Type::int())), Some(&typed(Type::float())))
                .unwrap(),
            Resolution::Resolved(named("Matrix"))
        );
        // Only `put(String, float)` accepts a string key.
        assert_eq!(
            classifier
                .classify_index_set(
                    Some(&matrix),
                    Some(&typed(named(builtins::STRING))),
                    Some(&typed(Type::float()))
                )
                .unwrap(),
            Resolution::Resolved(Type::void())
        );
    }

    #[test]
    fn index_set_falls_back_to_put() {
        let registry = registry();
        let classifier = OverloadClassifier::new(&registry);
        let dict = typed(named("Dict"));
        assert_eq!(
            classifier
                .classify_index_set(
                    Some(&dict),
                    Some(&typed(named(builtins::STRING))),
                    Some(&typed(Type::int()))
                )
                .unwrap(),
            Resolution::Resolved(Type::int())
        );
        assert!(
            classifier
                .classify_index_set(Some(&dict), Some(&typed(named(builtins::STRING))), None)
                .unwrap()
                .is_unresolved()
        );
    }

    #[test]
    fn conversion_through_value_of() {
        let registry = registry();
        let classifier = OverloadClassifier::new(&registry);
        let fraction = named("Fraction");
        assert!(classifier.is_convertible(Some(&fraction), Some(&typed(Type::int()))).unwrap());
        assert!(
            !classifier
                .is_convertible(Some(&fraction), Some(&typed(named(builtins::STRING))))
                .unwrap()
        );
        assert!(!classifier.is_convertible::<Typed>(Some(&fraction), None).unwrap());
        assert!(!classifier.is_convertible(None, Some(&typed(Type::int()))).unwrap());
        assert!(!classifier.is_convertible(Some(&fraction), Some(&Typed(None))).unwrap());
    }

    #[test]
    fn classification_is_idempotent() {
        let registry = registry();
        let classifier = OverloadClassifier::new(&registry);
        let operands = [Some(named("Vec2")), Some(named("Vec2"))];
        let first = classifier.classify_binary(&operands, &["+"]);
        let second = classifier.classify_binary(&operands, &["+"]);
        assert_eq!(first, second);
    }

    #[test]
    fn cancellation_propagates_through_every_shape() {
        let registry = registry();
        registry.cancellation().cancel();
        let classifier = OverloadClassifier::new(&registry);
        let vec2 = named("Vec2");
        let matrix = typed(named("Matrix"));
        let index = typed(Type::int());

        assert_eq!(
            classifier.classify_binary(&[Some(vec2.clone()), Some(vec2.clone())], &["+"]),
            Err(Cancelled)
        );
        assert_eq!(classifier.classify_unary(Some(&vec2), "-"), Err(Cancelled));
        assert_eq!(classifier.classify_index_get(Some(&matrix), Some(&index)), Err(Cancelled));
        assert_eq!(
            classifier.is_convertible(Some(&named("Fraction")), Some(&index)),
            Err(Cancelled)
        );
    }

    #[test]
    fn classifier_is_shareable_across_threads() {
        let registry = registry();
        let classifier = OverloadClassifier::new(&registry);
        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(move || {
                    let operands = [Some(named("Vec2")), Some(named("Vec2"))];
                    assert!(classifier.classify_binary(&operands, &["+"]).unwrap().is_resolved());
                });
            }
        });
    }
}

//! The assignability relation.
//!
//! `is_assignable(target, source)` answers whether a value of `source` may be
//! passed where `target` is expected:
//!
//! 1. Identity (except `void`)
//! 2. `null` into any reference type
//! 3. Primitive widening (`int -> long`, `char -> int`, ...)
//! 4. Unboxing followed by widening (`Integer -> long`)
//! 5. Boxing followed by reference widening (`int -> Integer`, `int -> Object`)
//! 6. Class subtyping through superclasses and interfaces, with invariant
//!    type arguments; raw types on either side match any instantiation
//! 7. Arrays: covariant for reference elements, exact for primitive elements
//! 8. Type variables flow wherever their bound flows

use std::collections::VecDeque;

use rustc_hash::FxHashSet;

use crate::{ClassRegistry, ClassType, PrimitiveKind, Type};

/// Recursion cap for bound chains and boxing detours.
const MAX_DEPTH: u8 = 16;

/// Whether `source` is assignable to `target` in `registry`.
pub fn is_assignable(registry: &ClassRegistry, target: &Type, source: &Type) -> bool {
    assignable(registry, target, source, 0)
}

fn assignable(registry: &ClassRegistry, target: &Type, source: &Type, depth: u8) -> bool {
    if depth > MAX_DEPTH {
        return false;
    }
    if target == source {
        return !matches!(target, Type::Primitive(PrimitiveKind::Void));
    }

    match (target, source) {
        (Type::Primitive(PrimitiveKind::Void), _) | (_, Type::Primitive(PrimitiveKind::Void)) => {
            false
        }
        (_, Type::Null) => target.is_reference(),
        (Type::Null, _) => false,

        (Type::Primitive(to), Type::Primitive(from)) => from.widens_to(*to),
        (Type::Primitive(to), Type::Class(boxed)) => registry
            .unbox(boxed.id)
            .is_some_and(|from| from.widens_to(*to)),
        (Type::Primitive(_), _) => false,

        (_, Type::Primitive(from)) => registry
            .box_of(*from)
            .is_some_and(|boxed| assignable(registry, target, &Type::simple(boxed), depth + 1)),

        (Type::Class(to), Type::Class(from)) => is_subclass(registry, from, to),
        (Type::Class(to), Type::Array(_)) => registry.root() == Some(to.id),

        (Type::Array(to), Type::Array(from)) => {
            if to.is_reference() && from.is_reference() {
                assignable(registry, to, from, depth + 1)
            } else {
                to == from
            }
        }

        (_, Type::TypeVar(var)) => match registry.type_param(*var).and_then(|p| p.bound.as_ref()) {
            Some(bound) => assignable(registry, target, bound, depth + 1),
            None => target
                .as_class()
                .is_some_and(|ct| registry.root() == Some(ct.id)),
        },

        _ => false,
    }
}

/// Whether `from` reaches `to` through the supertype graph.
fn is_subclass(registry: &ClassRegistry, from: &ClassType, to: &ClassType) -> bool {
    if registry.root() == Some(to.id) {
        return true;
    }

    let mut queue: VecDeque<ClassType> = VecDeque::new();
    let mut seen: FxHashSet<_> = FxHashSet::default();
    queue.push_back(from.clone());

    while let Some(current) = queue.pop_front() {
        if !seen.insert(current.id) {
            continue;
        }
        if current.id == to.id {
            if to.args.is_empty() || current.args.is_empty() || current.args == to.args {
                return true;
            }
            continue;
        }
        queue.extend(registry.supertypes_of(&current));
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::builtins;
    use crate::{ClassDef, ClassId};

    fn registry() -> ClassRegistry {
        let mut registry = ClassRegistry::with_builtins();
        let number = ClassDef::new("Number");
        registry.register_class(number).unwrap();
        registry
            .register_class(ClassDef::new("Shape"))
            .unwrap();
        registry
            .register_class(ClassDef::new("Circle").extends(ClassType::simple(ClassId::from_name("Shape"))))
            .unwrap();
        registry
    }

    fn class(name: &str) -> Type {
        Type::named(name, vec![])
    }

    #[test]
    fn identity() {
        let reg = registry();
        assert!(is_assignable(&reg, &Type::int(), &Type::int()));
        assert!(is_assignable(&reg, &class("Shape"), &class("Shape")));
        assert!(!is_assignable(&reg, &Type::void(), &Type::void()));
    }

    #[test]
    fn null_into_references_only() {
        let reg = registry();
        assert!(is_assignable(&reg, &class("Shape"), &Type::Null));
        assert!(is_assignable(&reg, &Type::array(Type::int()), &Type::Null));
        assert!(!is_assignable(&reg, &Type::int(), &Type::Null));
    }

    #[test]
    fn primitive_widening() {
        let reg = registry();
        assert!(is_assignable(&reg, &Type::primitive(PrimitiveKind::Long), &Type::int()));
        assert!(is_assignable(&reg, &Type::float(), &Type::int()));
        assert!(!is_assignable(&reg, &Type::int(), &Type::float()));
    }

    #[test]
    fn boxing_and_unboxing() {
        let reg = registry();
        let integer = class(builtins::INTEGER);
        assert!(is_assignable(&reg, &integer, &Type::int()));
        assert!(is_assignable(&reg, &Type::int(), &integer));
        assert!(is_assignable(&reg, &Type::primitive(PrimitiveKind::Long), &integer));
        assert!(is_assignable(&reg, &class(builtins::OBJECT), &Type::int()));
        assert!(!is_assignable(&reg, &class(builtins::LONG), &Type::int()));
        assert!(!is_assignable(&reg, &Type::primitive(PrimitiveKind::Short), &integer));
    }

    #[test]
    fn subclass_to_superclass() {
        let reg = registry();
        assert!(is_assignable(&reg, &class("Shape"), &class("Circle")));
        assert!(!is_assignable(&reg, &class("Circle"), &class("Shape")));
        assert!(is_assignable(&reg, &class(builtins::OBJECT), &class("Circle")));
    }

    #[test]
    fn unrelated_classes() {
        let reg = registry();
        assert!(!is_assignable(&reg, &class("Number"), &class("Shape")));
        assert!(!is_assignable(&reg, &class(builtins::STRING), &Type::int()));
    }

    #[test]
    fn generic_arguments_are_invariant() {
        let mut reg = registry();
        let t = reg.new_type_param("T", None);
        reg.register_class(ClassDef::new("Box").with_type_params([t]))
            .unwrap();
        let box_circle = Type::named("Box", vec![class("Circle")]);
        let box_shape = Type::named("Box", vec![class("Shape")]);
        let raw_box = class("Box");
        assert!(!is_assignable(&reg, &box_shape, &box_circle));
        assert!(is_assignable(&reg, &raw_box, &box_circle));
        assert!(is_assignable(&reg, &box_circle, &raw_box));
    }

    #[test]
    fn generic_superclass_arguments_are_substituted() {
        let mut reg = registry();
        let t = reg.new_type_param("T", None);
        let u = reg.new_type_param("U", None);
        reg.register_class(ClassDef::interface("Addable").with_type_params([t]))
            .unwrap();
        reg.register_class(
            ClassDef::new("Wrapper")
                .with_type_params([u])
                .implements(ClassType::new(ClassId::from_name("Addable"), vec![Type::var(u)])),
        )
        .unwrap();
        let wrapper_int = Type::named("Wrapper", vec![Type::int()]);
        assert!(is_assignable(&reg, &Type::named("Addable", vec![Type::int()]), &wrapper_int));
        assert!(!is_assignable(&reg, &Type::named("Addable", vec![Type::float()]), &wrapper_int));
    }

    #[test]
    fn arrays() {
        let reg = registry();
        assert!(is_assignable(
            &reg,
            &Type::array(class("Shape")),
            &Type::array(class("Circle"))
        ));
        assert!(!is_assignable(
            &reg,
            &Type::array(Type::primitive(PrimitiveKind::Long)),
            &Type::array(Type::int())
        ));
        assert!(is_assignable(&reg, &class(builtins::OBJECT), &Type::array(Type::int())));
    }

    #[test]
    fn type_variables_follow_bounds() {
        let mut reg = registry();
        let bounded = reg.new_type_param("S", Some(class("Shape")));
        let free = reg.new_type_param("F", None);
        assert!(is_assignable(&reg, &class("Shape"), &Type::var(bounded)));
        assert!(!is_assignable(&reg, &class("Circle"), &Type::var(bounded)));
        assert!(is_assignable(&reg, &class(builtins::OBJECT), &Type::var(free)));
        assert!(!is_assignable(&reg, &Type::var(free), &class("Shape")));
    }
}

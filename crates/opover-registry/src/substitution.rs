//! Type parameter substitution.
//!
//! A [`Substitution`] maps type parameters to concrete types. The registry
//! builds one per receiver instantiation (`Box<int>` maps `T -> int`) and
//! one per inheritance edge when rewriting inherited method signatures.

use rustc_hash::FxHashMap;

use opover_core::{MethodSignature, Substitutor};

use crate::{ClassType, Type, TypeVarId};

/// Map from type parameter to replacement type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Substitution {
    map: FxHashMap<TypeVarId, Type>,
}

impl Substitution {
    /// The identity substitution.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pair declared parameters with type arguments.
    ///
    /// A length mismatch (raw use, or malformed code mid-edit) yields the
    /// identity substitution rather than a partial one.
    pub fn for_params(params: &[TypeVarId], args: &[Type]) -> Self {
        if params.len() != args.len() {
            return Self::new();
        }
        let map = params.iter().copied().zip(args.iter().cloned()).collect();
        Self { map }
    }

    pub fn insert(&mut self, param: TypeVarId, replacement: Type) {
        self.map.insert(param, replacement);
    }

    pub fn get(&self, param: TypeVarId) -> Option<&Type> {
        self.map.get(&param)
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Substitute every mapped parameter occurring in `ty`.
    pub fn apply(&self, ty: &Type) -> Type {
        if self.map.is_empty() {
            return ty.clone();
        }
        match ty {
            Type::TypeVar(id) => self.map.get(id).cloned().unwrap_or(Type::TypeVar(*id)),
            Type::Class(ct) => Type::Class(self.apply_class(ct)),
            Type::Array(element) => Type::Array(Box::new(self.apply(element))),
            Type::Primitive(_) | Type::Null => ty.clone(),
        }
    }

    pub fn apply_class(&self, ct: &ClassType) -> ClassType {
        ClassType {
            id: ct.id,
            args: ct.args.iter().map(|arg| self.apply(arg)).collect(),
        }
    }

    /// Substitute a whole method signature.
    pub fn apply_signature(&self, sig: &MethodSignature<Type>) -> MethodSignature<Type> {
        MethodSignature {
            params: sig.params.iter().map(|p| self.apply(p)).collect(),
            return_type: self.apply(&sig.return_type),
        }
    }
}

impl Substitutor<Type> for Substitution {
    fn substitute(&self, ty: &Type) -> Type {
        self.apply(ty)
    }
}

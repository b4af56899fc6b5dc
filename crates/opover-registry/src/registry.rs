//! ClassRegistry - in-memory class table.
//!
//! [`ClassRegistry`] stores class declarations by [`ClassId`], owns the table
//! of declared type parameters, and records the well-known classes the
//! assignability relation needs (the root class and the primitive boxes).
//!
//! # Storage Model
//!
//! - **Classes**: one map keyed by `ClassId`. Ids are hashes of qualified
//!   names, so declarations may reference classes registered later.
//! - **Type parameters**: a flat table indexed by `TypeVarId`.
//! - **Well-known classes**: an optional root (every reference type is
//!   assignable to it) and a two-way primitive/box mapping.
//!
//! # Thread Safety
//!
//! Registration needs `&mut self`. Once populated the registry is only read,
//! so a shared `&ClassRegistry` can serve concurrent analysis passes.
//!
//! # Example
//!
//! ```
//! use opover_core::{Resolution, TypeSystem};
//! use opover_registry::{ClassDef, ClassRegistry, MethodDef, Type};
//!
//! let mut registry = ClassRegistry::with_builtins();
//! let t = registry.new_type_param("T", None);
//! let box_t = Type::named("Box", vec![Type::var(t)]);
//! registry
//!     .register_class(
//!         ClassDef::new("Box")
//!             .with_type_params([t])
//!             .with_method(MethodDef::new("add", vec![Type::var(t)], box_t)),
//!     )
//!     .unwrap();
//!
//! let box_int = Type::named("Box", vec![Type::int()]);
//! let class = registry.resolve_declaration(&box_int).unwrap().unwrap();
//! assert_eq!(registry.methods_named(&class, "add").unwrap().len(), 1);
//! ```

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::trace;

use opover_core::{Cancellable, MethodSignature, TypeSystem};

use crate::assignability;
use crate::{
    CancellationFlag, ClassDef, ClassId, ClassType, PrimitiveKind, RegistrationError,
    Substitution, Type, TypeParamDef, TypeVarId,
};

/// Supertype depth the method-name precheck walks before deferring to the
/// full enumeration.
const MAX_HIERARCHY_DEPTH: u8 = 64;

/// Names of the classes registered by [`ClassRegistry::register_builtins`].
pub mod builtins {
    use crate::PrimitiveKind;

    pub const OBJECT: &str = "Object";
    pub const STRING: &str = "String";
    pub const BOOLEAN: &str = "Boolean";
    pub const BYTE: &str = "Byte";
    pub const SHORT: &str = "Short";
    pub const CHARACTER: &str = "Character";
    pub const INTEGER: &str = "Integer";
    pub const LONG: &str = "Long";
    pub const FLOAT: &str = "Float";
    pub const DOUBLE: &str = "Double";

    /// Primitive kinds paired with their box class names.
    pub const BOXES: [(PrimitiveKind, &str); 8] = [
        (PrimitiveKind::Boolean, BOOLEAN),
        (PrimitiveKind::Byte, BYTE),
        (PrimitiveKind::Short, SHORT),
        (PrimitiveKind::Char, CHARACTER),
        (PrimitiveKind::Int, INTEGER),
        (PrimitiveKind::Long, LONG),
        (PrimitiveKind::Float, FLOAT),
        (PrimitiveKind::Double, DOUBLE),
    ];
}

/// In-memory class table implementing [`TypeSystem`].
#[derive(Debug, Default)]
pub struct ClassRegistry {
    /// Class declarations by id.
    classes: FxHashMap<ClassId, ClassDef>,

    /// Declared type parameters, indexed by `TypeVarId`.
    type_params: Vec<TypeParamDef>,

    // === Well-known classes ===
    /// Box class for each primitive.
    boxes: FxHashMap<PrimitiveKind, ClassId>,
    /// Primitive for each box class.
    unboxes: FxHashMap<ClassId, PrimitiveKind>,
    /// Root of the class hierarchy.
    root: Option<ClassId>,

    /// Raised by the host to abort lookups.
    cancellation: CancellationFlag,
}

impl ClassRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the root class, `String` and the primitive boxes.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register_builtins();
        registry
    }

    /// Register the root class, `String` and the primitive boxes.
    ///
    /// Classes that already exist are left untouched, so this is safe to call
    /// on a registry that declared some of them itself.
    pub fn register_builtins(&mut self) {
        let object = ClassId::from_name(builtins::OBJECT);
        self.classes
            .entry(object)
            .or_insert_with(|| ClassDef::new(builtins::OBJECT));
        self.root = Some(object);

        let names = std::iter::once(builtins::STRING).chain(builtins::BOXES.map(|(_, name)| name));
        for name in names {
            self.classes.entry(ClassId::from_name(name)).or_insert_with(|| {
                ClassDef::new(name).extends(ClassType::simple(object))
            });
        }

        for (kind, name) in builtins::BOXES {
            let id = ClassId::from_name(name);
            self.boxes.insert(kind, id);
            self.unboxes.insert(id, kind);
        }
    }

    // ==========================================================================
    // Registration
    // ==========================================================================

    /// Allocate a type parameter.
    pub fn new_type_param(&mut self, name: impl Into<String>, bound: Option<Type>) -> TypeVarId {
        let id = TypeVarId(self.type_params.len() as u32);
        self.type_params.push(TypeParamDef {
            name: name.into(),
            bound,
        });
        id
    }

    /// Register a class declaration.
    pub fn register_class(&mut self, def: ClassDef) -> Result<ClassId, RegistrationError> {
        if self.classes.contains_key(&def.id) {
            return Err(RegistrationError::DuplicateClass { name: def.name });
        }
        if let Some(param) = def
            .type_params
            .iter()
            .find(|p| p.index() >= self.type_params.len())
        {
            return Err(RegistrationError::UnknownTypeParam {
                class: def.name.clone(),
                param: *param,
            });
        }

        trace!(class = %def.name, methods = def.methods.len(), "registered class");
        let id = def.id;
        self.classes.insert(id, def);
        Ok(id)
    }

    /// Make `id` the root of the hierarchy.
    pub fn set_root(&mut self, id: ClassId) -> Result<(), RegistrationError> {
        if !self.classes.contains_key(&id) {
            return Err(RegistrationError::UnregisteredWellKnown { id });
        }
        self.root = Some(id);
        Ok(())
    }

    /// Declare `id` as the box class of `kind`.
    pub fn register_box(&mut self, kind: PrimitiveKind, id: ClassId) -> Result<(), RegistrationError> {
        if !self.classes.contains_key(&id) {
            return Err(RegistrationError::UnregisteredWellKnown { id });
        }
        if let Some(previous) = self.boxes.insert(kind, id) {
            self.unboxes.remove(&previous);
        }
        self.unboxes.insert(id, kind);
        Ok(())
    }

    /// Replace the cancellation flag checked by every lookup.
    pub fn set_cancellation(&mut self, flag: CancellationFlag) {
        self.cancellation = flag;
    }

    // ==========================================================================
    // Lookup
    // ==========================================================================

    pub fn class(&self, id: ClassId) -> Option<&ClassDef> {
        self.classes.get(&id)
    }

    pub fn class_by_name(&self, name: &str) -> Option<&ClassDef> {
        self.classes.get(&ClassId::from_name(name))
    }

    pub fn contains(&self, id: ClassId) -> bool {
        self.classes.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn type_param(&self, id: TypeVarId) -> Option<&TypeParamDef> {
        self.type_params.get(id.index())
    }

    pub fn root(&self) -> Option<ClassId> {
        self.root
    }

    pub fn box_of(&self, kind: PrimitiveKind) -> Option<ClassId> {
        self.boxes.get(&kind).copied()
    }

    pub fn unbox(&self, id: ClassId) -> Option<PrimitiveKind> {
        self.unboxes.get(&id).copied()
    }

    /// Handle shared with the host for raising cancellation.
    pub fn cancellation(&self) -> CancellationFlag {
        self.cancellation.clone()
    }

    /// Build a class type by name, checking the type argument count.
    ///
    /// An empty argument list is accepted for generic classes (raw use).
    pub fn instantiate(&self, name: &str, args: Vec<Type>) -> Result<Type, RegistrationError> {
        let def = self
            .class_by_name(name)
            .ok_or_else(|| RegistrationError::UnknownClass {
                name: name.to_string(),
            })?;
        if !args.is_empty() && args.len() != def.type_params.len() {
            return Err(RegistrationError::TypeArgCountMismatch {
                class: def.name.clone(),
                expected: def.type_params.len(),
                got: args.len(),
            });
        }
        Ok(Type::class(def.id, args))
    }

    /// Source-like rendering of a type, for logs and diagnostics.
    pub fn display_type(&self, ty: &Type) -> String {
        match ty {
            Type::Primitive(kind) => kind.name().to_string(),
            Type::Null => "null".to_string(),
            Type::TypeVar(id) => self
                .type_param(*id)
                .map(|p| p.name.clone())
                .unwrap_or_else(|| format!("?{}", id.index())),
            Type::Array(element) => format!("{}[]", self.display_type(element)),
            Type::Class(ct) => {
                let name = self
                    .class(ct.id)
                    .map(|d| d.name.clone())
                    .unwrap_or_else(|| format!("{:?}", ct.id));
                if ct.args.is_empty() {
                    name
                } else {
                    let args: Vec<String> = ct.args.iter().map(|a| self.display_type(a)).collect();
                    format!("{}<{}>", name, args.join(", "))
                }
            }
        }
    }

    // ==========================================================================
    // Generics and hierarchy
    // ==========================================================================

    /// Substitution for how `ct` instantiates its declaration.
    ///
    /// Raw uses of a generic class map each parameter to its erasure.
    pub fn substitution_for(&self, ct: &ClassType) -> Substitution {
        let Some(def) = self.classes.get(&ct.id) else {
            return Substitution::new();
        };
        if !def.is_generic() {
            return Substitution::new();
        }
        if ct.args.is_empty() {
            let mut subst = Substitution::new();
            for param in &def.type_params {
                if let Some(erased) = self.erasure_of(*param) {
                    subst.insert(*param, erased);
                }
            }
            return subst;
        }
        Substitution::for_params(&def.type_params, &ct.args)
    }

    /// Erasure of a type parameter: its bound's class, else the root class.
    fn erasure_of(&self, param: TypeVarId) -> Option<Type> {
        match self.type_param(param).and_then(|p| p.bound.as_ref()) {
            Some(Type::Class(bound)) => Some(Type::simple(bound.id)),
            Some(Type::Array(element)) => Some(Type::Array(element.clone())),
            _ => self.root.map(Type::simple),
        }
    }

    /// Direct supertypes of `ct`, instantiated through its type arguments.
    ///
    /// Classes without an explicit superclass get the root class.
    pub fn supertypes_of(&self, ct: &ClassType) -> Vec<ClassType> {
        let Some(def) = self.classes.get(&ct.id) else {
            return Vec::new();
        };
        let subst = self.substitution_for(ct);
        let mut supers: Vec<ClassType> = def
            .direct_supertypes()
            .map(|s| subst.apply_class(s))
            .collect();
        if def.superclass.is_none() {
            if let Some(root) = self.root.filter(|root| *root != def.id) {
                supers.push(ClassType::simple(root));
            }
        }
        supers
    }

    /// Methods named `name` on `id` and its supertypes.
    ///
    /// Order: the class's own declarations, then its superclass chain, then
    /// interfaces, depth first, each class once. Inherited signatures are
    /// rewritten in terms of `id`'s own type parameters, so the receiver's
    /// substitution applies to all of them alike.
    pub fn collect_methods(&self, id: ClassId, name: &str) -> Vec<MethodSignature<Type>> {
        let Some(def) = self.classes.get(&id) else {
            return Vec::new();
        };
        if !self.hierarchy_declares(id, name, MAX_HIERARCHY_DEPTH) {
            return Vec::new();
        }
        let mut out = Vec::new();
        let mut visited = FxHashSet::default();
        self.collect_from(&def.self_type(), name, &mut visited, &mut out);
        out
    }

    /// Whether `id` or any ancestor declares a method named `name`.
    ///
    /// Walks declarations only, without instantiating supertypes, so a miss
    /// costs no allocation. Running out of `depth` (cyclic or very deep
    /// hierarchies) answers `true` and leaves the decision to `collect_from`.
    fn hierarchy_declares(&self, id: ClassId, name: &str, depth: u8) -> bool {
        let Some(def) = self.classes.get(&id) else {
            return false;
        };
        if def.methods_named(name).next().is_some() {
            return true;
        }
        let Some(depth) = depth.checked_sub(1) else {
            return true;
        };
        if def
            .direct_supertypes()
            .any(|sup| self.hierarchy_declares(sup.id, name, depth))
        {
            return true;
        }
        match self.root {
            Some(root) if def.superclass.is_none() && root != id => {
                self.hierarchy_declares(root, name, depth)
            }
            _ => false,
        }
    }

    fn collect_from(
        &self,
        inst: &ClassType,
        name: &str,
        visited: &mut FxHashSet<ClassId>,
        out: &mut Vec<MethodSignature<Type>>,
    ) {
        if !visited.insert(inst.id) {
            return;
        }
        let Some(def) = self.classes.get(&inst.id) else {
            return;
        };

        let subst = self.substitution_for(inst);
        for method in def.methods_named(name) {
            out.push(MethodSignature::new(
                method.params.iter().map(|p| subst.apply(p)).collect(),
                subst.apply(&method.return_type),
            ));
        }

        for sup in self.supertypes_of(inst) {
            self.collect_from(&sup, name, visited, out);
        }
    }
}

impl TypeSystem for ClassRegistry {
    type Ty = Type;
    type Class = ClassId;
    type Substitutor = Substitution;

    fn resolve_declaration(&self, ty: &Type) -> Cancellable<Option<ClassId>> {
        self.cancellation.check()?;
        Ok(match ty {
            Type::Class(ct) if self.classes.contains_key(&ct.id) => Some(ct.id),
            _ => None,
        })
    }

    fn substitutor_for(&self, ty: &Type) -> Cancellable<Substitution> {
        self.cancellation.check()?;
        Ok(match ty {
            Type::Class(ct) => self.substitution_for(ct),
            _ => Substitution::new(),
        })
    }

    fn methods_named(&self, class: &ClassId, name: &str) -> Cancellable<Vec<MethodSignature<Type>>> {
        self.cancellation.check()?;
        Ok(self.collect_methods(*class, name))
    }

    fn is_assignable(&self, target: &Type, source: &Type) -> Cancellable<bool> {
        self.cancellation.check()?;
        Ok(assignability::is_assignable(self, target, source))
    }
}

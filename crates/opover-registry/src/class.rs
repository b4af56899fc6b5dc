//! Class and method declarations.
//!
//! Declarations are built with small builder methods and handed to
//! [`crate::ClassRegistry::register_class`]:
//!
//! ```
//! use opover_registry::{ClassDef, ClassRegistry, MethodDef, Type};
//!
//! let mut registry = ClassRegistry::new();
//! let vec2 = Type::named("Vec2", vec![]);
//! registry
//!     .register_class(
//!         ClassDef::new("Vec2").with_method(MethodDef::new("add", vec![vec2.clone()], vec2)),
//!     )
//!     .unwrap();
//! ```

use bitflags::bitflags;

use crate::{ClassId, ClassType, Type, TypeVarId};

bitflags! {
    /// Class declaration modifiers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ClassFlags: u8 {
        const INTERFACE = 1 << 0;
    }
}

bitflags! {
    /// Method declaration modifiers.
    ///
    /// Overload resolution does not filter on them: a static `valueOf`
    /// factory is found the same way an instance `add` is. Arity is matched
    /// exactly, so there is no variadic modifier.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MethodFlags: u8 {
        const STATIC = 1 << 0;
    }
}

/// A declared type parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeParamDef {
    /// Source name (`T`, `K`, ...).
    pub name: String,
    /// Declared upper bound, if any.
    pub bound: Option<Type>,
}

/// A declared method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDef {
    pub name: String,
    /// Parameter types in declaration order. May mention the owner's type parameters.
    pub params: Vec<Type>,
    pub return_type: Type,
    pub flags: MethodFlags,
}

impl MethodDef {
    /// Create an instance method.
    pub fn new(name: impl Into<String>, params: Vec<Type>, return_type: Type) -> Self {
        Self {
            name: name.into(),
            params,
            return_type,
            flags: MethodFlags::empty(),
        }
    }

    /// Create a static method.
    pub fn new_static(name: impl Into<String>, params: Vec<Type>, return_type: Type) -> Self {
        Self::new(name, params, return_type).with_flags(MethodFlags::STATIC)
    }

    pub fn with_flags(mut self, flags: MethodFlags) -> Self {
        self.flags |= flags;
        self
    }

    #[inline]
    pub fn is_static(&self) -> bool {
        self.flags.contains(MethodFlags::STATIC)
    }
}

/// A class or interface declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDef {
    /// Identity, derived from `name`.
    pub id: ClassId,
    /// Qualified name.
    pub name: String,
    pub flags: ClassFlags,

    // === Generics ===
    /// Declared type parameters, in order.
    pub type_params: Vec<TypeVarId>,

    // === Inheritance ===
    /// Direct superclass, expressed in terms of this class's type parameters.
    pub superclass: Option<ClassType>,
    /// Directly implemented interfaces, in declaration order.
    pub interfaces: Vec<ClassType>,

    // === Members ===
    /// Declared methods, in declaration order.
    pub methods: Vec<MethodDef>,
}

impl ClassDef {
    /// Create an empty class declaration.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: ClassId::from_name(&name),
            name,
            flags: ClassFlags::empty(),
            type_params: Vec::new(),
            superclass: None,
            interfaces: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Create an empty interface declaration.
    pub fn interface(name: impl Into<String>) -> Self {
        Self::new(name).with_flags(ClassFlags::INTERFACE)
    }

    // === Builder Methods ===

    pub fn with_flags(mut self, flags: ClassFlags) -> Self {
        self.flags |= flags;
        self
    }

    pub fn with_type_params(mut self, params: impl IntoIterator<Item = TypeVarId>) -> Self {
        self.type_params.extend(params);
        self
    }

    /// Set the direct superclass.
    pub fn extends(mut self, superclass: ClassType) -> Self {
        self.superclass = Some(superclass);
        self
    }

    /// Add a directly implemented interface.
    pub fn implements(mut self, interface: ClassType) -> Self {
        self.interfaces.push(interface);
        self
    }

    pub fn with_method(mut self, method: MethodDef) -> Self {
        self.methods.push(method);
        self
    }

    pub fn with_methods(mut self, methods: impl IntoIterator<Item = MethodDef>) -> Self {
        self.methods.extend(methods);
        self
    }

    // === Queries ===

    #[inline]
    pub fn is_interface(&self) -> bool {
        self.flags.contains(ClassFlags::INTERFACE)
    }

    #[inline]
    pub fn is_generic(&self) -> bool {
        !self.type_params.is_empty()
    }

    /// The class instantiated with its own type parameters (`Box<T>` inside `Box`).
    pub fn self_type(&self) -> ClassType {
        ClassType::new(
            self.id,
            self.type_params.iter().copied().map(Type::TypeVar).collect(),
        )
    }

    /// Direct supertypes: superclass first, then interfaces.
    pub fn direct_supertypes(&self) -> impl Iterator<Item = &ClassType> {
        self.superclass.iter().chain(self.interfaces.iter())
    }

    /// Declared methods named `name`, in declaration order.
    pub fn methods_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a MethodDef> {
        self.methods.iter().filter(move |m| m.name == name)
    }
}

//! Type model.

use crate::{ClassId, TypeVarId};

/// Built-in value types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrimitiveKind {
    Boolean,
    Byte,
    Short,
    Char,
    Int,
    Long,
    Float,
    Double,
    Void,
}

impl PrimitiveKind {
    /// Every primitive kind, `Void` included.
    pub const ALL: [PrimitiveKind; 9] = [
        PrimitiveKind::Boolean,
        PrimitiveKind::Byte,
        PrimitiveKind::Short,
        PrimitiveKind::Char,
        PrimitiveKind::Int,
        PrimitiveKind::Long,
        PrimitiveKind::Float,
        PrimitiveKind::Double,
        PrimitiveKind::Void,
    ];

    /// Source-level keyword.
    pub fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Byte => "byte",
            PrimitiveKind::Short => "short",
            PrimitiveKind::Char => "char",
            PrimitiveKind::Int => "int",
            PrimitiveKind::Long => "long",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Double => "double",
            PrimitiveKind::Void => "void",
        }
    }

    /// Position on the numeric widening ladder. `char` sits off the ladder.
    fn numeric_rank(self) -> Option<u8> {
        match self {
            PrimitiveKind::Byte => Some(1),
            PrimitiveKind::Short => Some(2),
            PrimitiveKind::Int => Some(3),
            PrimitiveKind::Long => Some(4),
            PrimitiveKind::Float => Some(5),
            PrimitiveKind::Double => Some(6),
            _ => None,
        }
    }

    /// Identity or primitive widening conversion from `self` to `target`.
    ///
    /// `char` widens to `int` and above; nothing widens to `char`;
    /// `boolean` and `void` only convert to themselves.
    pub fn widens_to(self, target: PrimitiveKind) -> bool {
        if self == target {
            return self != PrimitiveKind::Void;
        }
        match (self, target) {
            (PrimitiveKind::Char, t) => matches!(
                t,
                PrimitiveKind::Int | PrimitiveKind::Long | PrimitiveKind::Float | PrimitiveKind::Double
            ),
            (_, PrimitiveKind::Char) => false,
            (s, t) => match (s.numeric_rank(), t.numeric_rank()) {
                (Some(from), Some(to)) => from < to,
                _ => false,
            },
        }
    }
}

/// A class instantiated with type arguments.
///
/// An empty `args` list on a generic class is a raw use.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassType {
    pub id: ClassId,
    pub args: Vec<Type>,
}

impl ClassType {
    pub fn new(id: ClassId, args: Vec<Type>) -> Self {
        Self { id, args }
    }

    /// Non-generic (or raw) use of a class.
    pub fn simple(id: ClassId) -> Self {
        Self {
            id,
            args: Vec::new(),
        }
    }
}

/// A type as the registry understands it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Primitive(PrimitiveKind),
    Class(ClassType),
    TypeVar(TypeVarId),
    Array(Box<Type>),
    /// Type of the `null` literal.
    Null,
}

impl Type {
    #[inline]
    pub fn primitive(kind: PrimitiveKind) -> Self {
        Type::Primitive(kind)
    }

    #[inline]
    pub fn int() -> Self {
        Type::Primitive(PrimitiveKind::Int)
    }

    #[inline]
    pub fn float() -> Self {
        Type::Primitive(PrimitiveKind::Float)
    }

    #[inline]
    pub fn boolean() -> Self {
        Type::Primitive(PrimitiveKind::Boolean)
    }

    #[inline]
    pub fn void() -> Self {
        Type::Primitive(PrimitiveKind::Void)
    }

    /// Class type with explicit type arguments.
    pub fn class(id: ClassId, args: Vec<Type>) -> Self {
        Type::Class(ClassType::new(id, args))
    }

    /// Class type without type arguments.
    pub fn simple(id: ClassId) -> Self {
        Type::Class(ClassType::simple(id))
    }

    /// Class type looked up by qualified name.
    pub fn named(qualified_name: &str, args: Vec<Type>) -> Self {
        Type::class(ClassId::from_name(qualified_name), args)
    }

    pub fn var(id: TypeVarId) -> Self {
        Type::TypeVar(id)
    }

    pub fn array(element: Type) -> Self {
        Type::Array(Box::new(element))
    }

    /// Whether values of this type are references (may hold `null`).
    pub fn is_reference(&self) -> bool {
        !matches!(self, Type::Primitive(_))
    }

    pub fn as_class(&self) -> Option<&ClassType> {
        match self {
            Type::Class(ct) => Some(ct),
            _ => None,
        }
    }

    pub fn as_primitive(&self) -> Option<PrimitiveKind> {
        match self {
            Type::Primitive(kind) => Some(*kind),
            _ => None,
        }
    }
}

impl From<PrimitiveKind> for Type {
    fn from(kind: PrimitiveKind) -> Self {
        Type::Primitive(kind)
    }
}

impl From<ClassType> for Type {
    fn from(ct: ClassType) -> Self {
        Type::Class(ct)
    }
}

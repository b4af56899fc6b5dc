//! Deterministic identities.
//!
//! [`ClassId`] is a 64-bit hash of a class's qualified name. Because it is
//! computed from the name alone, a class can reference another class (or
//! itself, in a method's return type) before that class is registered.
//!
//! ```
//! use opover_registry::ClassId;
//!
//! assert_eq!(ClassId::from_name("Vec2"), ClassId::from_name("Vec2"));
//! assert_ne!(ClassId::from_name("Vec2"), ClassId::from_name("Vec3"));
//! ```

use std::fmt;
use xxhash_rust::xxh64::xxh64;

/// Domain seed for class hashes.
const CLASS_SEED: u64 = 0x2fac10b63a6cc57c;

/// Identity of a class declaration.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(pub u64);

impl ClassId {
    /// Hash a qualified class name.
    #[inline]
    pub fn from_name(qualified_name: &str) -> Self {
        ClassId(xxh64(qualified_name.as_bytes(), CLASS_SEED))
    }
}

impl fmt::Debug for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClassId({:#018x})", self.0)
    }
}

/// Identity of a declared type parameter.
///
/// Allocated by [`crate::ClassRegistry::new_type_param`]; indexes into the
/// registry's parameter table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeVarId(pub(crate) u32);

impl TypeVarId {
    /// Index into the owning registry's parameter table.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

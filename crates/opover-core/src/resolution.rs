//! Overload lookup outcome.

/// Result of trying to find a user-defined operator method.
///
/// `Unresolved` covers every "cannot determine" case: no matching method,
/// an unresolvable receiver, a missing operand, an unknown argument type.
/// It is the common case and carries no payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Resolution<T> {
    /// A method applies; the payload is its substituted return type.
    Resolved(T),
    /// No user-defined overload applies here.
    #[default]
    Unresolved,
}

impl<T> Resolution<T> {
    /// Whether a method was found.
    #[inline]
    pub fn is_resolved(&self) -> bool {
        matches!(self, Resolution::Resolved(_))
    }

    /// Whether no method was found.
    #[inline]
    pub fn is_unresolved(&self) -> bool {
        matches!(self, Resolution::Unresolved)
    }

    /// Borrow the resolved type, if any.
    #[inline]
    pub fn as_ref(&self) -> Resolution<&T> {
        match self {
            Resolution::Resolved(ty) => Resolution::Resolved(ty),
            Resolution::Unresolved => Resolution::Unresolved,
        }
    }

    /// The resolved type as an `Option`.
    #[inline]
    pub fn resolved(self) -> Option<T> {
        match self {
            Resolution::Resolved(ty) => Some(ty),
            Resolution::Unresolved => None,
        }
    }

    /// Borrow the resolved type as an `Option`.
    #[inline]
    pub fn resolved_ref(&self) -> Option<&T> {
        match self {
            Resolution::Resolved(ty) => Some(ty),
            Resolution::Unresolved => None,
        }
    }

    /// Map the resolved type.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Resolution<U> {
        match self {
            Resolution::Resolved(ty) => Resolution::Resolved(f(ty)),
            Resolution::Unresolved => Resolution::Unresolved,
        }
    }
}

impl<T> From<Option<T>> for Resolution<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(ty) => Resolution::Resolved(ty),
            None => Resolution::Unresolved,
        }
    }
}

//! Cancellation signal.
//!
//! The only failure that crosses the core's API boundary. "No overload
//! applies" is never an error; it is [`crate::Resolution::Unresolved`].

use thiserror::Error;

/// The host aborted a long-running lookup.
///
/// Every operation that touches the host type system returns
/// `Result<_, Cancelled>` and forwards this value with `?`. It is never
/// swallowed, never retried and never turned into `Unresolved`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Error)]
#[error("operation cancelled by the host")]
pub struct Cancelled;

/// Result alias for operations the host may cancel.
pub type Cancellable<T> = Result<T, Cancelled>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancelled_display() {
        assert_eq!(Cancelled.to_string(), "operation cancelled by the host");
    }

    #[test]
    fn cancelled_propagates_through_question_mark() {
        fn inner() -> Cancellable<u32> {
            Err(Cancelled)
        }
        fn outer() -> Cancellable<u32> {
            let value = inner()?;
            Ok(value + 1)
        }
        assert_eq!(outer(), Err(Cancelled));
    }
}

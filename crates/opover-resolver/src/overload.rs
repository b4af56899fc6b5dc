//! First-match overload resolution.
//!
//! Given a receiver type, a method name and argument types, find a declared
//! method the arguments can be passed to and report its return type.
//!
//! ## Algorithm
//!
//! 1. Bail out with [`Resolution::Unresolved`] if the receiver or any
//!    argument type is unknown
//! 2. Resolve the receiver's nominal declaration and the methods with that
//!    name (inherited included); with none the call is `Unresolved` before
//!    any substitutor is built
//! 3. Walk those methods in the host's enumeration order, skipping those
//!    with a different arity
//! 4. Substitute each parameter and check the argument is assignable to it
//! 5. The first candidate accepting every argument wins; its substituted
//!    return type is the result
//!
//! There is no ranking. When two overloads both accept the arguments the one
//! enumerated first is chosen, so results depend on the host's member order.

use opover_core::{Cancellable, Resolution, Substitutor, TypeSystem, TypedExpr};
use smallvec::SmallVec;
use tracing::{debug, trace};

/// Operator calls take at most two arguments (index-set).
const INLINE_ARGS: usize = 2;

/// Resolve `receiver.method_name(args...)` to the winning method's return type.
///
/// `None` entries stand for types the host could not infer. Any of them, or
/// a missing receiver, yields `Unresolved` without consulting the type
/// system. Cancellation raised by the type system is returned as `Err`.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn resolve_method<S: TypeSystem + ?Sized>(
    types: &S,
    receiver: Option<&S::Ty>,
    method_name: &str,
    arg_types: &[Option<&S::Ty>],
) -> Cancellable<Resolution<S::Ty>> {
    let Some(receiver) = receiver else {
        return Ok(Resolution::Unresolved);
    };
    if method_name.is_empty() {
        return Ok(Resolution::Unresolved);
    }
    if arg_types.iter().any(Option::is_none) {
        trace!(method = method_name, "argument type unknown");
        return Ok(Resolution::Unresolved);
    }

    let Some(class) = types.resolve_declaration(receiver)? else {
        trace!(method = method_name, ?receiver, "receiver has no declaration");
        return Ok(Resolution::Unresolved);
    };
    let candidates = types.methods_named(&class, method_name)?;
    if candidates.is_empty() {
        return Ok(Resolution::Unresolved);
    }
    let substitutor = types.substitutor_for(receiver)?;

    for candidate in candidates {
        if candidate.arity() != arg_types.len() {
            continue;
        }
        if accepts_all(types, &substitutor, &candidate.params, arg_types)? {
            let result = substitutor.substitute(&candidate.return_type);
            debug!(method = method_name, ?receiver, ?result, "resolved operator method");
            return Ok(Resolution::Resolved(result));
        }
        trace!(method = method_name, params = ?candidate.params, "candidate rejected");
    }

    Ok(Resolution::Unresolved)
}

/// Resolve a call whose receiver and arguments are expressions.
///
/// Types are read from the expressions first. A missing expression or one
/// the host could not type yields `Unresolved`; resolution never runs on
/// partial type information.
pub fn resolve_method_from_expressions<S, E>(
    types: &S,
    receiver: Option<&E>,
    method_name: &str,
    args: &[Option<&E>],
) -> Cancellable<Resolution<S::Ty>>
where
    S: TypeSystem + ?Sized,
    E: TypedExpr<S::Ty> + ?Sized,
{
    let Some(receiver_ty) = receiver.and_then(|expr| expr.expr_type()) else {
        return Ok(Resolution::Unresolved);
    };

    let mut arg_types: SmallVec<[S::Ty; INLINE_ARGS]> = SmallVec::with_capacity(args.len());
    for arg in args {
        match (*arg).and_then(|expr| expr.expr_type()) {
            Some(ty) => arg_types.push(ty),
            None => return Ok(Resolution::Unresolved),
        }
    }
    let arg_refs: SmallVec<[Option<&S::Ty>; INLINE_ARGS]> = arg_types.iter().map(Some).collect();

    resolve_method(types, Some(&receiver_ty), method_name, &arg_refs)
}

/// Whether every argument is assignable to its substituted parameter.
fn accepts_all<S: TypeSystem + ?Sized>(
    types: &S,
    substitutor: &S::Substitutor,
    params: &[S::Ty],
    arg_types: &[Option<&S::Ty>],
) -> Cancellable<bool> {
    for (param, arg) in params.iter().zip(arg_types.iter().flatten()) {
        let target = substitutor.substitute(param);
        if !types.is_assignable(&target, arg)? {
            return Ok(false);
        }
    }
    Ok(true)
}

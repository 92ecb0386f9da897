//! Functions with a declared failure type and their unchecked adapters.
//!
//! A [`ThrowingFunction`] maps an input to either an output or an error of a
//! statically known type. [`to_unchecked`] turns one into a plain `Fn(T) -> R`
//! that signals failure by unwinding with an [`UncheckedError`], the same way
//! an infallible function would signal a bug.
//!
//! # Failure capture
//!
//! The wrapper catches every failure that can be caught while the wrapped
//! function runs, not only its declared `Err`: a panic inside the function is
//! captured too and becomes the cause of the unchecked error. A process abort
//! (including the default allocation-failure handler, or any panic under
//! `panic = "abort"`) ends the process before any wrapper can observe it.

use std::cell::Cell;
use std::error::Error as StdError;
use std::panic::{self, AssertUnwindSafe};

use tracing::trace;

use crate::error::UncheckedError;

/// A function from `T` to `R` that may fail with a declared error `E`.
///
/// Implemented for every `Fn(T) -> Result<R, E>`, so closures and function
/// items can be passed wherever a `ThrowingFunction` is expected.
pub trait ThrowingFunction<T, R, E> {
    /// Applies this function to the given argument.
    ///
    /// # Errors
    ///
    /// Returns the declared error `E` when the function fails.
    fn apply(&self, input: T) -> Result<R, E>;

    /// Method form of [`to_unchecked`].
    fn unchecked(self) -> impl Fn(T) -> R
    where
        Self: Sized,
        E: StdError + Send + Sync + 'static,
    {
        to_unchecked(self)
    }
}

impl<T, R, E, F> ThrowingFunction<T, R, E> for F
where
    F: Fn(T) -> Result<R, E>,
{
    fn apply(&self, input: T) -> Result<R, E> {
        self(input)
    }
}

thread_local! {
    static CATCH_DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// Marks that an unchecked failure raised on this thread will be caught by
/// [`catch_unchecked`] or an enclosing wrapper.
struct CatchScope;

impl CatchScope {
    fn enter() -> Self {
        CATCH_DEPTH.with(|depth| depth.set(depth.get() + 1));
        Self
    }

    fn active() -> bool {
        CATCH_DEPTH.with(|depth| depth.get() > 0)
    }
}

impl Drop for CatchScope {
    fn drop(&mut self) {
        CATCH_DEPTH.with(|depth| depth.set(depth.get() - 1));
    }
}

/// Converts a throwing function into one whose failure is unchecked.
///
/// Each call of the returned closure calls `f.apply` exactly once. An `Ok`
/// value is returned as is. An `Err`, or a panic raised by `f`, unwinds with
/// an [`UncheckedError`] whose cause is that original failure. Use
/// [`catch_unchecked`] to get the error back as a value.
///
/// Nothing runs at wrap time; the closure only takes ownership of `f`.
///
/// # Panics
///
/// The returned closure unwinds whenever `f` fails:
///
/// - Inside [`catch_unchecked`], or inside another wrapper, the payload is the
///   typed [`UncheckedError`] and the panic hook is not invoked, so caught
///   failures print nothing.
/// - Anywhere else the failure is a regular panic whose message is the
///   error's `Display` text (`declared failure: invalid digit found in
///   string`), so the hook reports the cause. A plain
///   [`catch_unwind`](std::panic::catch_unwind) sees that message as a
///   `String` payload.
///
/// # Lifetimes
///
/// The input type `T` is a single type. For a function over `&str` the
/// wrapper accepts `&'x str` for one inferred `'x`, not every lifetime the
/// original accepts. Use [`to_unchecked_ref`] to keep the higher-ranked
/// `for<'a> Fn(&'a A)` signature.
///
/// # Examples
///
/// ```
/// use std::num::ParseIntError;
/// use unchecked::{catch_unchecked, to_unchecked};
///
/// let parse = to_unchecked(|s: &str| s.parse::<i32>());
/// assert_eq!(parse("42"), 42);
///
/// let err = catch_unchecked(|| parse("abc")).unwrap_err();
/// assert_eq!(
///     err.declared::<ParseIntError>(),
///     "abc".parse::<i32>().err().as_ref()
/// );
/// ```
pub fn to_unchecked<T, R, E, F>(f: F) -> impl Fn(T) -> R
where
    F: ThrowingFunction<T, R, E>,
    E: StdError + Send + Sync + 'static,
{
    move |input: T| call_unchecked(|| f.apply(input))
}

/// [`to_unchecked`] for functions that borrow their input.
///
/// The wrapper accepts a borrow of any lifetime, just like `f`.
///
/// # Panics
///
/// Same as [`to_unchecked`].
///
/// # Examples
///
/// ```
/// use unchecked::to_unchecked_ref;
///
/// let parse = to_unchecked_ref(|s: &str| s.parse::<i32>());
/// let owned = String::from("17");
/// assert_eq!(parse(&owned), 17);
/// assert_eq!(parse("25"), 25);
/// ```
pub fn to_unchecked_ref<A, R, E, F>(f: F) -> impl Fn(&A) -> R
where
    A: ?Sized,
    F: Fn(&A) -> Result<R, E>,
    E: StdError + Send + Sync + 'static,
{
    move |input: &A| call_unchecked(|| f(input))
}

fn call_unchecked<R, E>(call: impl FnOnce() -> Result<R, E>) -> R
where
    E: StdError + Send + Sync + 'static,
{
    let outcome = {
        let _scope = CatchScope::enter();
        panic::catch_unwind(AssertUnwindSafe(call))
    };

    match outcome {
        Ok(Ok(output)) => output,
        Ok(Err(err)) => raise(UncheckedError::from_declared(err)),
        Err(payload) => raise(UncheckedError::from_panic(payload)),
    }
}

fn raise(err: UncheckedError) -> ! {
    trace!(
        target: "unchecked",
        kind = err.kind(),
        error = %err,
        "Translating failure into unchecked error"
    );
    if CatchScope::active() {
        panic::resume_unwind(Box::new(err))
    }
    panic!("{err}")
}

/// Runs `f`, turning an [`UncheckedError`] unwind back into an `Err`.
///
/// Panics carrying any other payload are resumed unchanged.
///
/// # Errors
///
/// Returns the [`UncheckedError`] raised by an unchecked wrapper inside `f`.
pub fn catch_unchecked<R>(f: impl FnOnce() -> R) -> Result<R, UncheckedError> {
    let outcome = {
        let _scope = CatchScope::enter();
        panic::catch_unwind(AssertUnwindSafe(f))
    };

    match outcome {
        Ok(output) => Ok(output),
        Err(payload) => match payload.downcast::<UncheckedError>() {
            Ok(err) => Err(*err),
            Err(other) => panic::resume_unwind(other),
        },
    }
}

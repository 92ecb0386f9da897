//! The unchecked error signalled by wrappers from [`to_unchecked`](crate::to_unchecked).
//!
//! An [`UncheckedError`] always carries the failure the wrapped function
//! produced, either its declared `Err` value or the payload of a panic
//! raised while it ran.
//!
//! # Examples
//!
//! Recovering the original declared error:
//!
//! ```
//! use std::num::ParseIntError;
//! use unchecked::{catch_unchecked, to_unchecked};
//!
//! let parse = to_unchecked(|s: &str| s.parse::<i32>());
//! let err = catch_unchecked(|| parse("abc")).unwrap_err();
//!
//! assert!(err.declared::<ParseIntError>().is_some());
//! ```

use std::any::Any;
use std::error::Error as StdError;
use std::fmt;

use parking_lot::Mutex;
use thiserror::Error;

/// Boxed form of a declared error once its static type has been erased.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Failure signalled by an unchecked wrapper.
///
/// The original failure is never discarded: a declared error is kept as
/// the [`source`](StdError::source), a panic keeps its payload.
#[derive(Error, Debug)]
pub enum UncheckedError {
    /// The wrapped function returned `Err`.
    #[error("declared failure: {0}")]
    Declared(#[source] BoxError),

    /// The wrapped function panicked.
    #[error("panicked: {0}")]
    Panicked(PanicCause),
}

impl UncheckedError {
    pub(crate) fn from_declared<E>(err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::Declared(Box::new(err))
    }

    pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        Self::Panicked(PanicCause::new(payload))
    }

    /// Short label of the failure channel, `"declared"` or `"panic"`.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Declared(_) => "declared",
            Self::Panicked(_) => "panic",
        }
    }

    /// Whether the wrapped function returned its declared `Err`.
    #[must_use]
    pub const fn is_declared(&self) -> bool {
        matches!(self, Self::Declared(_))
    }

    /// Whether the wrapped function panicked.
    #[must_use]
    pub const fn is_panic(&self) -> bool {
        matches!(self, Self::Panicked(_))
    }

    /// Borrow the declared cause as its original type.
    ///
    /// Returns `None` for panics or when `E` is not the cause's type.
    #[must_use]
    pub fn declared<E>(&self) -> Option<&E>
    where
        E: StdError + 'static,
    {
        match self {
            Self::Declared(cause) => cause.downcast_ref::<E>(),
            Self::Panicked(_) => None,
        }
    }

    /// Take back ownership of the declared cause.
    ///
    /// # Errors
    ///
    /// Returns `self` unchanged when the failure was a panic or the cause
    /// is not an `E`.
    pub fn into_declared<E>(self) -> Result<E, Self>
    where
        E: StdError + 'static,
    {
        match self {
            Self::Declared(cause) => cause.downcast::<E>().map(|e| *e).map_err(Self::Declared),
            other => Err(other),
        }
    }

    /// Text of the panic, if the failure was a panic with a textual payload.
    #[must_use]
    pub fn panic_message(&self) -> Option<&str> {
        match self {
            Self::Panicked(cause) => cause.message(),
            Self::Declared(_) => None,
        }
    }

    /// Take the raw panic payload, e.g. to hand it to
    /// [`std::panic::resume_unwind`].
    #[must_use]
    pub fn into_panic_payload(self) -> Option<Box<dyn Any + Send>> {
        match self {
            Self::Panicked(cause) => Some(cause.into_payload()),
            Self::Declared(_) => None,
        }
    }
}

/// Payload of a panic captured from a wrapped function.
///
/// The payload sits behind a mutex so the error stays `Sync` and can travel
/// inside `anyhow::Error` and similar containers.
pub struct PanicCause {
    message: Option<String>,
    payload: Mutex<Box<dyn Any + Send>>,
}

impl PanicCause {
    fn new(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
            Some((*s).to_owned())
        } else if let Some(s) = payload.downcast_ref::<String>() {
            Some(s.clone())
        } else {
            // Nested wrappers unwind with our own error as the payload.
            payload
                .downcast_ref::<UncheckedError>()
                .map(ToString::to_string)
        };

        Self {
            message,
            payload: Mutex::new(payload),
        }
    }

    /// Text of the panic when the payload was a string or a nested
    /// [`UncheckedError`].
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Whether the payload is a `P`.
    #[must_use]
    pub fn payload_is<P: Any>(&self) -> bool {
        self.payload.lock().is::<P>()
    }

    /// Take the raw payload.
    #[must_use]
    pub fn into_payload(self) -> Box<dyn Any + Send> {
        self.payload.into_inner()
    }
}

impl fmt::Display for PanicCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message().unwrap_or("<non-string panic payload>"))
    }
}

impl fmt::Debug for PanicCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PanicCause")
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

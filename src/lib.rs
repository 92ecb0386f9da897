//! Unchecked - adapt fallible functions into unchecked ones.
//!
//! This crate provides one adapter: it takes a function whose failure type
//! is part of its signature and produces a plain `Fn(T) -> R` that signals
//! failure by unwinding instead, with the original failure kept as the cause.
//!
//! # Modules
//!
//! - [`function`] - The [`ThrowingFunction`] shape and the [`to_unchecked`] conversion
//!   (plus [`to_unchecked_ref`] for functions over borrowed input)
//! - [`error`] - [`UncheckedError`], the failure carried by an unchecked wrapper
//!
//! # Example
//!
//! ```
//! use unchecked::{catch_unchecked, to_unchecked};
//!
//! let lengths: Vec<usize> = ["1", "22", "333"]
//!     .into_iter()
//!     .map(to_unchecked(|s: &str| s.parse::<u64>().map(|n| n.to_string().len())))
//!     .collect();
//! assert_eq!(lengths, vec![1, 2, 3]);
//!
//! let parse = to_unchecked(|s: &str| s.parse::<u64>());
//! let err = catch_unchecked(|| parse("-1")).unwrap_err();
//! assert!(err.is_declared());
//! ```

pub mod error;
pub mod function;

pub use error::{BoxError, PanicCause, UncheckedError};
pub use function::{catch_unchecked, to_unchecked, to_unchecked_ref, ThrowingFunction};

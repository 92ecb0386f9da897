//! Tests for what the panic hook sees when a wrapper fails.
//!
//! Installs a process-wide hook, so everything runs in a single test.

use std::num::ParseIntError;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use parking_lot::Mutex;
use unchecked::{catch_unchecked, to_unchecked};

#[test]
fn hook_reports_only_uncaught_failures_with_their_cause() {
    let reported = Arc::new(Mutex::new(Vec::<String>::new()));
    let previous = panic::take_hook();
    {
        let reported = Arc::clone(&reported);
        panic::set_hook(Box::new(move |info| {
            let payload = info.payload();
            let message = payload
                .downcast_ref::<String>()
                .cloned()
                .or_else(|| payload.downcast_ref::<&str>().map(|s| (*s).to_owned()))
                .unwrap_or_else(|| "<opaque>".to_owned());
            reported.lock().push(message);
        }));
    }

    let parse = to_unchecked(|s: &str| s.parse::<i32>());

    let caught = catch_unchecked(|| parse("abc"));
    let uncaught = panic::catch_unwind(AssertUnwindSafe(|| parse("abc")));

    panic::set_hook(previous);

    let err = caught.unwrap_err();
    assert!(err.declared::<ParseIntError>().is_some());

    let payload = uncaught.unwrap_err();
    assert_eq!(
        payload.downcast_ref::<String>().map(String::as_str),
        Some("declared failure: invalid digit found in string")
    );

    assert_eq!(
        *reported.lock(),
        vec!["declared failure: invalid digit found in string".to_owned()]
    );
}

//! Once-per-process diagnostics for input that is tolerated but not understood.
//!
//! The selector parser reports skipped syntax here. Repeated queries with the
//! same selector would otherwise flood the log.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// `component: message` keys already logged.
static SEEN: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Log `message` at WARN level unless the same component already logged it.
///
/// Returns `true` when the warning was emitted.
///
/// ```ignore
/// warn_once("Selector", "ignoring unsupported combinator '>' in \"ul > li\"");
/// ```
pub fn warn_once(component: &str, message: &str) -> bool {
    let first_time = SEEN
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(format!("{component}: {message}"));

    if first_time {
        tracing::warn!(component, "{message}");
    }
    first_time
}

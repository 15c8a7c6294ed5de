//! Deduplicated warnings for markup the pipeline ignores or does not support.
//!
//! Parse errors are recovered locally, so the same complaint can fire once per
//! token on a large page. Each distinct `(component, message)` pair is emitted
//! through `tracing` only the first time it is seen.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use tracing::warn;

/// Global set of warnings we've already emitted (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

fn key(component: &str, message: &str) -> String {
    format!("[{component}] {message}")
}

/// Warn about ignored or unsupported markup (emitted once per unique message).
///
/// # Example
/// ```
/// wren_common::warning::warn_once("HTML Parser", "ignored duplicate <body> start tag");
/// ```
pub fn warn_once(component: &str, message: &str) {
    let first_time = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key(component, message));

    if first_time {
        warn!(component, "{message}");
    }
}

/// Returns true if `warn_once` has already emitted this message.
#[must_use]
pub fn has_warned(component: &str, message: &str) -> bool {
    WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .as_ref()
        .is_some_and(|set| set.contains(&key(component, message)))
}

/// Clear all recorded warnings (call before parsing a new document).
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}

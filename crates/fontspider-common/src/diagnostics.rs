//! Diagnostics with colored terminal output.
//!
//! Warnings are deduplicated so a site with hundreds of pages does not repeat
//! the same complaint for every page. Errors handed to [`report`] are always
//! printed; they are the failure channel of a resolution run.

use std::collections::HashSet;
use std::error::Error;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// ANSI color codes for terminal output
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

/// Global set of warnings we've already printed (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// A panic while printing must not silence every later warning.
fn warned() -> MutexGuard<'static, Option<HashSet<String>>> {
    WARNED.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Warn about something recoverable (prints once per unique message)
///
/// # Example
/// ```ignore
/// warn_once("CSS", "ignoring @import of 'print.css'");
/// ```
pub fn warn_once(component: &str, message: &str) {
    let key = format!("[{component}] {message}");
    let should_print = warned().get_or_insert_with(HashSet::new).insert(key);

    if should_print {
        eprintln!("{YELLOW}[fontspider {component}] ⚠ {message}{RESET}");
    }
}

/// Report an error that ended a run, together with its source chain.
///
/// ```text
/// [fontspider] ✖ site/index.html: failed to parse stylesheet
///     caused by: unclosed block at 3:1
/// ```
pub fn report(label: &str, error: &(dyn Error + 'static)) {
    eprintln!("{RED}[fontspider] ✖ {label}: {error}{RESET}");
    let mut source = error.source();
    while let Some(cause) = source {
        eprintln!("{RED}    caused by: {cause}{RESET}");
        source = cause.source();
    }
}

/// Clear all recorded warnings (call between independent runs)
pub fn clear_warnings() {
    if let Some(set) = warned().as_mut() {
        set.clear();
    }
}

#![allow(clippy::collapsible_if)]
pub mod debounce;
pub mod detail;
pub mod present;
pub mod search;
pub mod shell;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

pub use debounce::Debouncer;
pub use detail::{DetailController, DetailPhase, DetailView};
pub use search::{SearchController, SearchView};
pub use shell::{Screen, Shell};

/// Quiet period after the last keystroke before a search fires.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(350);
/// Queries shorter than this (after trimming) never reach the backend.
pub const MIN_QUERY_CHARS: usize = 2;

/// Tunables for the list and detail controllers.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerConfig {
    pub debounce: Duration,
    pub min_query_chars: usize,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            min_query_chars: MIN_QUERY_CHARS,
        }
    }
}

/// Controller state locks are never held across an await, so a poisoned
/// lock still holds consistent data.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

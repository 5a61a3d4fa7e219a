use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::lock;

/// Runs only the most recently scheduled action, once `delay` has passed
/// without another call to [`Debouncer::schedule`].
///
/// Rescheduling drops a pending timer but never an action that has already
/// started running.
pub struct Debouncer {
    delay: Duration,
    slot: Arc<Mutex<Slot>>,
}

#[derive(Default)]
struct Slot {
    ticket: u64,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            slot: Arc::new(Mutex::new(Slot::default())),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Replace any pending action with `action`. Must be called from within
    /// a tokio runtime.
    pub fn schedule<F>(&self, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut slot = lock(&*self.slot);
        slot.ticket += 1;
        let ticket = slot.ticket;
        if let Some(previous) = slot.pending.take() {
            previous.abort();
        }

        let delay = self.delay;
        let shared = Arc::clone(&self.slot);
        slot.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            {
                let mut slot = lock(&*shared);
                if slot.ticket != ticket {
                    return;
                }
                // Detach: from here on a reschedule must not abort us.
                slot.pending = None;
            }
            action.await;
        }));
    }

    /// Drop the pending action, if any. Returns whether one was pending.
    pub fn cancel(&self) -> bool {
        let mut slot = lock(&*self.slot);
        slot.ticket += 1;
        match slot.pending.take() {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        lock(&*self.slot).pending.is_some()
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        if let Some(handle) = lock(&*self.slot).pending.take() {
            handle.abort();
        }
    }
}

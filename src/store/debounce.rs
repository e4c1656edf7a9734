//! Replace-on-reschedule delayed tasks.

use std::future::Future;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;

/// Runs a task once input has been quiet for `delay`.
///
/// Scheduling again before the delay elapses aborts the waiting task, so at
/// most one timer is alive. A task whose delay already elapsed runs detached
/// and is never aborted.
pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    /// Must be called from within a tokio runtime.
    pub fn schedule<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let delay = self.delay;
        let timer = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tokio::spawn(task);
        });

        if let Some(previous) = self.pending.lock().replace(timer) {
            previous.abort();
        }
    }

    /// Drop the waiting task, if any.
    pub fn cancel(&self) {
        if let Some(previous) = self.pending.lock().take() {
            previous.abort();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

//! Cancellable timer ending the `Transitioning` status.

use std::future::Future;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Owner of the single outstanding transition timer.
///
/// Scheduling a new timer aborts the previous one, and dropping the owner
/// aborts whatever is still pending.
#[derive(Debug, Default)]
pub(crate) struct TransitionTimer {
    handle: Option<JoinHandle<()>>,
}

impl TransitionTimer {
    /// Run `on_elapsed` after `duration`, replacing any pending timer.
    ///
    /// Returns `false` without scheduling anything when called outside a
    /// tokio runtime.
    pub(crate) fn schedule<F>(&mut self, duration: Duration, on_elapsed: F) -> bool
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();

        let Ok(runtime) = Handle::try_current() else {
            return false;
        };

        self.handle = Some(runtime.spawn(async move {
            tokio::time::sleep(duration).await;
            on_elapsed.await;
        }));
        true
    }

    pub(crate) fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    pub(crate) fn is_pending(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for TransitionTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

//! Trailing-edge debounce for search input.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::AbortHandle;

/// Quiet period before a typed query reaches the filter engine.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Cancels one scheduled value.
#[derive(Debug, Clone)]
pub struct CancelHandle(AbortHandle);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.abort();
    }
}

/// Delays values until no new value has been scheduled for `delay`.
///
/// Each [`schedule`](Debouncer::schedule) cancels the pending value and restarts
/// the timer; only the last value of a burst is delivered on the receiver
/// returned by [`new`](Debouncer::new). Must be used inside a tokio runtime.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    sender: mpsc::UnboundedSender<T>,
    pending: Option<AbortHandle>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new(delay: Duration) -> (Self, mpsc::UnboundedReceiver<T>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (
            Self {
                delay,
                sender,
                pending: None,
            },
            receiver,
        )
    }

    /// Schedule `value`, replacing whatever was pending.
    pub fn schedule(&mut self, value: T) -> CancelHandle {
        self.cancel();

        let sender = self.sender.clone();
        let delay = self.delay;
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Receiver gone means the owner is shutting down
            let _ = sender.send(value);
        });

        let handle = task.abort_handle();
        self.pending = Some(handle.clone());
        CancelHandle(handle)
    }

    /// Drop the pending value, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// Whether a value is waiting for its quiet period to end.
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{sleep, timeout};

    const DELAY: Duration = Duration::from_millis(40);

    #[tokio::test]
    async fn delivers_only_the_last_value_of_a_burst() {
        let (mut debouncer, mut rx) = Debouncer::new(DELAY);

        debouncer.schedule("a".to_string());
        debouncer.schedule("au".to_string());
        debouncer.schedule("auth".to_string());

        let value = timeout(Duration::from_secs(2), rx.recv()).await.unwrap();
        assert_eq!(value.as_deref(), Some("auth"));

        sleep(DELAY * 3).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn waits_for_the_quiet_period() {
        let (mut debouncer, mut rx) = Debouncer::new(DELAY * 5);

        debouncer.schedule(1u32);
        assert!(debouncer.is_pending());

        sleep(DELAY).await;
        assert!(rx.try_recv().is_err());

        let value = timeout(Duration::from_secs(2), rx.recv()).await.unwrap();
        assert_eq!(value, Some(1));
    }

    #[tokio::test]
    async fn cancel_drops_pending_value() {
        let (mut debouncer, mut rx) = Debouncer::new(DELAY);

        debouncer.schedule(1u32);
        debouncer.cancel();
        assert!(!debouncer.is_pending());

        sleep(DELAY * 3).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn cancel_handle_aborts_its_schedule() {
        let (mut debouncer, mut rx) = Debouncer::new(DELAY);

        let handle = debouncer.schedule(7u32);
        handle.cancel();

        sleep(DELAY * 3).await;
        assert!(rx.try_recv().is_err());
    }
}

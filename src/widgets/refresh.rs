//! Background refresh for widgets that pull data from the backend.
//!
//! A [`Refresher`] owns one tokio task that calls a blocking fetch function
//! on the blocking pool, immediately and then on every interval tick or
//! manual trigger, writing the outcome into a shared [`FetchState`] slot.
//!
//! Cancelling (explicitly, or by dropping the refresher) aborts the task.
//! The slot is only written from the task itself after the blocking call
//! returns, so a fetch still in flight when the task is aborted has its
//! result discarded.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Latest outcome of a widget's background fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchState<T> {
    /// No fetch has completed yet.
    Loading,
    /// Most recent fetch succeeded.
    Ready(T),
    /// Most recent fetch failed with this message.
    Failed(String),
}

/// Data slot shared between a widget and its refresh task.
pub type Slot<T> = Arc<Mutex<FetchState<T>>>;

/// Creates a slot in the [`FetchState::Loading`] state.
pub fn slot<T>() -> Slot<T> {
    Arc::new(Mutex::new(FetchState::Loading))
}

/// Locks a slot, recovering from poisoning.
pub fn read<T>(slot: &Slot<T>) -> MutexGuard<'_, FetchState<T>> {
    slot.lock().unwrap_or_else(|e| e.into_inner())
}

/// Handle to a widget's periodic fetch task.
#[derive(Debug)]
pub struct Refresher {
    name: &'static str,
    handle: Option<JoinHandle<()>>,
    trigger: Arc<Notify>,
}

impl Refresher {
    /// Spawns a refresh loop writing into `slot`.
    ///
    /// Fetches once right away, then again every `interval` (when given)
    /// and whenever [`refresh_now`](Self::refresh_now) is called.
    ///
    /// Outside a tokio runtime no task is spawned and the slot keeps its
    /// current state.
    pub fn spawn<T, F>(
        name: &'static str,
        interval: Option<Duration>,
        slot: Slot<T>,
        fetch: F,
    ) -> Self
    where
        T: Send + 'static,
        F: Fn() -> Result<T, String> + Send + Sync + 'static,
    {
        let trigger = Arc::new(Notify::new());
        let Ok(runtime) = Handle::try_current() else {
            tracing::debug!(widget = name, "no async runtime, background refresh disabled");
            return Self {
                name,
                handle: None,
                trigger,
            };
        };

        let fetch = Arc::new(fetch);
        let wake = Arc::clone(&trigger);
        let period = interval.filter(|d| !d.is_zero());
        let handle = runtime.spawn(async move {
            let mut ticker = period.map(|p| tokio::time::interval_at(Instant::now() + p, p));
            loop {
                let fetch = Arc::clone(&fetch);
                let next = match tokio::task::spawn_blocking(move || (*fetch)()).await {
                    Ok(Ok(value)) => FetchState::Ready(value),
                    Ok(Err(message)) => {
                        tracing::warn!(widget = name, error = %message, "refresh failed");
                        FetchState::Failed(message)
                    }
                    Err(e) => {
                        tracing::warn!(widget = name, error = %e, "refresh task panicked");
                        FetchState::Failed(e.to_string())
                    }
                };
                *read(&slot) = next;

                match ticker.as_mut() {
                    Some(ticker) => {
                        tokio::select! {
                            _ = ticker.tick() => {}
                            _ = wake.notified() => {}
                        }
                    }
                    None => wake.notified().await,
                }
            }
        });
        tracing::debug!(widget = name, "refresh task started");

        Self {
            name,
            handle: Some(handle),
            trigger,
        }
    }

    /// Requests an immediate fetch.
    pub fn refresh_now(&self) {
        if self.handle.is_some() {
            self.trigger.notify_one();
        }
    }

    /// Whether a background task is running.
    pub fn is_active(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Aborts the background task. Idempotent.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            tracing::debug!(widget = self.name, "refresh task cancelled");
        }
    }
}

impl Drop for Refresher {
    fn drop(&mut self) {
        self.cancel();
    }
}

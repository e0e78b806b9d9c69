//! Cancellable quiet-period timer.
//!
//! [`Debouncer::schedule`] replaces any pending value and restarts the timer;
//! the sink only sees the last value of a burst. A sink that has already
//! started is never aborted, neither by a reschedule nor by cancel/drop.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::future::BoxFuture;
use tokio::task::JoinHandle;

type Sink<T> = Arc<dyn Fn(T) -> BoxFuture<'static, ()> + Send + Sync>;
type Slot<T> = Arc<Mutex<Option<T>>>;

struct Pending<T> {
    slot: Slot<T>,
    handle: JoinHandle<()>,
}

pub struct Debouncer<T> {
    delay: Duration,
    sink: Sink<T>,
    pending: Mutex<Option<Pending<T>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new<F, Fut>(delay: Duration, sink: F) -> Self
    where
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let sink: Sink<T> = Arc::new(move |value| Box::pin(sink(value)));
        Self {
            delay,
            sink,
            pending: Mutex::new(None),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Replace the pending value and restart the quiet period.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule(&self, value: T) {
        let slot: Slot<T> = Arc::new(Mutex::new(Some(value)));
        let handle = {
            let slot = slot.clone();
            let sink = self.sink.clone();
            let delay = self.delay;
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                let value = lock(&slot).take();
                if let Some(value) = value {
                    sink(value).await;
                }
            })
        };

        let previous = lock(&self.pending).replace(Pending { slot, handle });
        if let Some(previous) = previous {
            Self::discard(previous);
        }
    }

    /// Take the pending value without running the sink.
    ///
    /// Returns `None` when nothing is pending; a delivery already running is
    /// awaited first.
    pub async fn take_pending(&self) -> Option<T> {
        let pending = lock(&self.pending).take()?;
        let value = lock(&pending.slot).take();
        match value {
            Some(value) => {
                pending.handle.abort();
                Some(value)
            }
            None => {
                let _ = pending.handle.await;
                None
            }
        }
    }

    /// Drop the pending value without delivering it.
    pub fn cancel(&self) {
        let pending = lock(&self.pending).take();
        if let Some(pending) = pending {
            Self::discard(pending);
        }
    }

    /// Whether a value is waiting for its quiet period to end.
    pub fn is_pending(&self) -> bool {
        lock(&self.pending)
            .as_ref()
            .is_some_and(|pending| lock(&pending.slot).is_some())
    }

    fn discard(pending: Pending<T>) {
        // An empty slot means the sink already has the value; let it finish.
        if lock(&pending.slot).take().is_some() {
            pending.handle.abort();
        }
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        let pending = lock(&self.pending).take();
        if let Some(pending) = pending {
            if lock(&pending.slot).take().is_some() {
                pending.handle.abort();
            }
        }
    }
}

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

#[derive(Debug)]
struct Slot<T> {
    generation: u64,
    value: Option<T>,
}

/// Transient value that clears itself after a delay.
///
/// Setting a new value cancels the pending reset of the previous one.
/// Dropping the holder cancels any pending reset.
pub struct DelayedReset<T> {
    slot: Arc<watch::Sender<Slot<T>>>,
    pending: Option<JoinHandle<()>>,
}

impl<T> Default for DelayedReset<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> DelayedReset<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Creates an empty holder.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _receiver) = watch::channel(Slot {
            generation: 0,
            value: None,
        });
        Self {
            slot: Arc::new(sender),
            pending: None,
        }
    }

    /// Stores a value and schedules its reset. Must run inside a Tokio runtime.
    pub fn set(&mut self, value: T, delay: Duration) {
        self.cancel();

        let mut generation = 0;
        self.slot.send_modify(|slot| {
            slot.generation += 1;
            slot.value = Some(value);
            generation = slot.generation;
        });

        let slot = self.slot.clone();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let cleared = slot.send_if_modified(|slot| {
                if slot.generation != generation || slot.value.is_none() {
                    return false;
                }
                slot.value = None;
                true
            });
            if cleared {
                debug!(generation, "transient value reset");
            }
        }));
    }

    /// Cancels the pending reset, keeping the current value.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// Clears the value immediately.
    pub fn clear(&mut self) {
        self.cancel();
        self.slot.send_if_modified(|slot| slot.value.take().is_some());
    }

    /// Returns the current value.
    #[must_use]
    pub fn current(&self) -> Option<T> {
        self.slot.borrow().value.clone()
    }

    /// Resolves once no value is held.
    pub async fn cleared(&self) {
        let mut receiver = self.slot.subscribe();
        let _ = receiver.wait_for(|slot| slot.value.is_none()).await;
    }
}

impl<T> Drop for DelayedReset<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

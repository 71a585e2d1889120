//! Change notification and live snapshot streams.
//!
//! Writers bump a shared version through [`ChangeNotifier`]. Each [`Observer`]
//! holds its own receiver and re-fetches its [`Snapshot`] when the version moves,
//! so subscribers never poll and a burst of writes collapses into one snapshot.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, trace};

/// Produces the current value an observer hands out.
#[async_trait]
pub trait Snapshot: Send + Sync {
    type Output: Send;

    async fn fetch(&self) -> Self::Output;
}

/// Signals committed writes to every live observer.
#[derive(Clone)]
pub struct ChangeNotifier {
    sender: Arc<watch::Sender<u64>>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(0);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Call after a write has committed.
    pub fn notify(&self) {
        let mut version = 0;
        self.sender.send_modify(|v| {
            *v = v.wrapping_add(1);
            version = *v;
        });
        debug!(version, subscribers = self.subscriber_count(), "Tasks changed");
    }

    pub fn version(&self) -> u64 {
        *self.sender.borrow()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    pub fn observe<S>(&self, snapshot: S) -> Observer<S::Output>
    where
        S: Snapshot + 'static,
        S::Output: 'static,
    {
        let observer = Observer {
            changes: self.sender.subscribe(),
            snapshot: Arc::new(snapshot),
            stale: true,
        };
        debug!(subscribers = self.subscriber_count(), "Observer subscribed");
        observer
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new()
    }
}

/// A live view over a snapshot. Dropping it unsubscribes.
pub struct Observer<T> {
    changes: watch::Receiver<u64>,
    snapshot: Arc<dyn Snapshot<Output = T>>,
    // set until the value for the latest seen version has been fetched
    stale: bool,
}

impl<T: Send + 'static> Observer<T> {
    /// Yields the current value on the first call, then one value per change.
    ///
    /// Returns `None` once the notifier is gone. Cancel-safe: a change seen by a
    /// cancelled call is fetched by the next one.
    pub async fn next(&mut self) -> Option<T> {
        if !self.stale {
            self.changes.changed().await.ok()?;
            self.stale = true;
        }
        trace!(version = *self.changes.borrow(), "Fetching snapshot");
        let value = self.snapshot.fetch().await;
        self.stale = false;
        Some(value)
    }

    pub fn map<U, F>(self, f: F) -> Observer<U>
    where
        U: Send + 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        Observer {
            changes: self.changes,
            snapshot: Arc::new(Mapped {
                inner: self.snapshot,
                f,
            }),
            stale: self.stale,
        }
    }
}

struct Mapped<T, F> {
    inner: Arc<dyn Snapshot<Output = T>>,
    f: F,
}

#[async_trait]
impl<T, U, F> Snapshot for Mapped<T, F>
where
    T: Send + 'static,
    U: Send,
    F: Fn(T) -> U + Send + Sync,
{
    type Output = U;

    async fn fetch(&self) -> U {
        (self.f)(self.inner.fetch().await)
    }
}

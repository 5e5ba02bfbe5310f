//! Change hub fanning session snapshots out to observers.
//!
//! One store subscription feeds any number of local observers. Every store
//! change produces one complete, ordered, filtered snapshot per observer.
//!
//! ```text
//! RecordStore feed ──► pump task ──► HubState.latest
//!                                      ├── subscriber a (All)
//!                                      ├── subscriber b (MentorName)
//!                                      └── subscriber c (Participant)
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::domain::foundation::SubscriptionId;
use crate::domain::session::{FilterScope, SessionError, SessionList};
use crate::ports::ChangeFeed;

use crate::application::handlers::records::{decode_list, SessionRecords};

use super::subscription::{FeedListener, SessionSubscription};

struct Subscriber {
    scope: FilterScope,
    tx: mpsc::UnboundedSender<SessionList>,
}

#[derive(Default)]
struct HubState {
    latest: SessionList,
    subscribers: HashMap<SubscriptionId, Subscriber>,
    closed: bool,
}

/// Shared state behind the hub and its subscriptions.
pub(crate) struct HubInner {
    state: Mutex<HubState>,
}

impl HubInner {
    fn lock(&self) -> MutexGuard<'_, HubState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replaces the latest snapshot and delivers it to every observer.
    ///
    /// Delivery happens under the lock so a new subscriber never sees a
    /// snapshot older than the one it was seeded with.
    fn publish(&self, list: SessionList) {
        let mut state = self.lock();
        state.subscribers.retain(|id, sub| {
            let delivered = sub.tx.send(list.filtered(&sub.scope)).is_ok();
            if !delivered {
                warn!(subscription_id = %id, "Dropping subscriber with closed channel");
            }
            delivered
        });
        debug!(
            sessions = list.len(),
            subscribers = state.subscribers.len(),
            "Published session snapshot"
        );
        state.latest = list;
    }

    /// Ends every subscription; their receivers drain and then yield `None`.
    fn close(&self) {
        let mut state = self.lock();
        state.closed = true;
        state.subscribers.clear();
    }

    pub(crate) fn remove(&self, id: &SubscriptionId) {
        if self.lock().subscribers.remove(id).is_some() {
            debug!(subscription_id = %id, "Subscriber removed");
        }
    }
}

/// Live view of the session collection.
///
/// Started once per process; cheap to share behind an `Arc`.
pub struct ChangeHub {
    inner: Arc<HubInner>,
    pump: Mutex<Option<JoinHandle<()>>>,
}

impl ChangeHub {
    /// Subscribes to the store and waits for its first snapshot.
    ///
    /// # Errors
    ///
    /// - `UpstreamUnavailable` if the store rejects the subscription or the
    ///   feed closes before delivering anything
    pub async fn start(records: &SessionRecords) -> Result<Self, SessionError> {
        let mut feed = records
            .store()
            .subscribe(records.collection(), records.order_field())
            .await
            .map_err(SessionError::from)?;

        let first = feed
            .recv()
            .await
            .ok_or_else(|| SessionError::upstream("session feed closed before first snapshot"))?;

        let inner = Arc::new(HubInner {
            state: Mutex::new(HubState {
                latest: decode_list(first),
                ..HubState::default()
            }),
        });
        let pump = tokio::spawn(run_pump(feed, Arc::clone(&inner)));

        info!(collection = records.collection(), "Session feed started");
        Ok(Self {
            inner,
            pump: Mutex::new(Some(pump)),
        })
    }

    /// Registers an observer. The current snapshot, filtered by `scope`, is
    /// queued before this returns.
    pub fn subscribe(&self, scope: FilterScope) -> SessionSubscription {
        let id = SubscriptionId::new();
        let (tx, rx) = mpsc::unbounded_channel();

        let mut state = self.inner.lock();
        // The receiver is alive, so this send cannot fail.
        let _ = tx.send(state.latest.filtered(&scope));
        if !state.closed {
            state.subscribers.insert(id, Subscriber { scope, tx });
        }
        drop(state);

        debug!(subscription_id = %id, "Subscriber added");
        SessionSubscription::new(id, rx, Arc::downgrade(&self.inner))
    }

    /// Runs `callback` for every snapshot visible under `scope`, starting
    /// with the current one.
    pub fn listen<F>(&self, scope: FilterScope, callback: F) -> FeedListener
    where
        F: FnMut(SessionList) + Send + 'static,
    {
        FeedListener::spawn(self.subscribe(scope), callback)
    }

    /// Most recent unfiltered snapshot.
    pub fn latest(&self) -> SessionList {
        self.inner.lock().latest.clone()
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().subscribers.len()
    }

    pub fn is_closed(&self) -> bool {
        self.inner.lock().closed
    }

    /// Stops the pump and ends every subscription.
    pub async fn shutdown(&self) {
        let pump = self
            .pump
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(pump) = pump {
            pump.abort();
            let _ = pump.await;
        }
        self.inner.close();
        info!("Session feed stopped");
    }
}

impl Drop for ChangeHub {
    fn drop(&mut self) {
        let pump = self
            .pump
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(pump) = pump {
            pump.abort();
        }
    }
}

async fn run_pump(mut feed: ChangeFeed, inner: Arc<HubInner>) {
    while let Some(records) = feed.recv().await {
        inner.publish(decode_list(records));
    }
    warn!("Session feed ended; closing subscriptions");
    inner.close();
}

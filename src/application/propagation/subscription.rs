//! Observer handles returned by the change hub.

use std::pin::Pin;
use std::sync::Weak;
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::domain::foundation::SubscriptionId;
use crate::domain::session::SessionList;

use super::hub::HubInner;

/// Pull-style observer of filtered snapshots.
///
/// Dropping the subscription unregisters it.
pub struct SessionSubscription {
    id: SubscriptionId,
    rx: mpsc::UnboundedReceiver<SessionList>,
    hub: Weak<HubInner>,
}

impl SessionSubscription {
    pub(crate) fn new(
        id: SubscriptionId,
        rx: mpsc::UnboundedReceiver<SessionList>,
        hub: Weak<HubInner>,
    ) -> Self {
        Self { id, rx, hub }
    }

    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Next snapshot, or `None` once the hub has stopped and the queue is
    /// drained.
    pub async fn recv(&mut self) -> Option<SessionList> {
        self.rx.recv().await
    }

    /// Next queued snapshot without waiting.
    pub fn try_recv(&mut self) -> Option<SessionList> {
        self.rx.try_recv().ok()
    }

    /// Unregisters now. Snapshots already queued are discarded.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for SessionSubscription {
    fn drop(&mut self) {
        if let Some(hub) = self.hub.upgrade() {
            hub.remove(&self.id);
        }
    }
}

impl Stream for SessionSubscription {
    type Item = SessionList;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

/// Push-style observer running a callback on its own task.
pub struct FeedListener {
    id: SubscriptionId,
    task: Option<JoinHandle<()>>,
}

impl FeedListener {
    pub(crate) fn spawn<F>(mut subscription: SessionSubscription, mut callback: F) -> Self
    where
        F: FnMut(SessionList) + Send + 'static,
    {
        let id = subscription.id();
        let task = tokio::spawn(async move {
            while let Some(list) = subscription.recv().await {
                callback(list);
            }
        });
        Self {
            id,
            task: Some(task),
        }
    }

    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Stops the listener. Once this returns the callback never runs again.
    pub async fn unsubscribe(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            let _ = task.await;
        }
    }
}

impl Drop for FeedListener {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use gather_proto::{ChangeEvent, ChangeKind, TableId};
use gather_signals::{Broadcast, ListenerGuard};
use tracing::debug;

use crate::error::SubscriptionError;

pub type ChangeListener = Arc<dyn Fn(ChangeEvent) + Send + Sync + 'static>;

/// Publish/subscribe notifications of table changes. Events carry no delta.
#[async_trait]
pub trait ChangeFeed: Send + Sync {
    async fn subscribe(&self, table: &TableId, listener: ChangeListener) -> Result<FeedSubscription, SubscriptionError>;

    fn unsubscribe(&self, subscription: FeedSubscription) { drop(subscription) }
}

#[async_trait]
impl<F: ChangeFeed + ?Sized> ChangeFeed for Arc<F> {
    async fn subscribe(&self, table: &TableId, listener: ChangeListener) -> Result<FeedSubscription, SubscriptionError> {
        (**self).subscribe(table, listener).await
    }
}

/// An open feed subscription. Dropping it unsubscribes.
pub struct FeedSubscription {
    table: TableId,
    _guard: Box<dyn std::any::Any + Send + Sync>,
}

impl FeedSubscription {
    pub fn new(table: TableId, guard: impl Send + Sync + 'static) -> Self { Self { table, _guard: Box::new(guard) } }

    pub fn table(&self) -> &TableId { &self.table }
}

impl Drop for FeedSubscription {
    fn drop(&mut self) {
        debug!("FeedSubscription({}) closed", self.table);
    }
}

impl std::fmt::Debug for FeedSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "FeedSubscription({})", self.table) }
}

/// In-process feed: one broadcast per table
#[derive(Default)]
pub struct BroadcastFeed {
    tables: Mutex<HashMap<TableId, Broadcast<ChangeEvent>>>,
}

impl BroadcastFeed {
    pub fn new() -> Self { Self::default() }

    fn broadcast(&self, table: &TableId) -> Broadcast<ChangeEvent> {
        let mut tables = self.tables.lock().unwrap();
        tables.entry(table.clone()).or_default().clone()
    }

    pub fn publish(&self, table: &TableId, kind: ChangeKind) {
        let broadcast = {
            let tables = self.tables.lock().unwrap();
            tables.get(table).cloned()
        };
        if let Some(broadcast) = broadcast {
            debug!("feed: {} on {} to {} listeners", kind, table, broadcast.listener_count());
            broadcast.send(ChangeEvent::new(table.clone(), kind));
        }
    }

    pub fn listener_count(&self, table: &TableId) -> usize {
        self.tables.lock().unwrap().get(table).map(|b| b.listener_count()).unwrap_or(0)
    }

    pub fn listen(&self, table: &TableId, listener: ChangeListener) -> FeedSubscription {
        let guard: ListenerGuard = self.broadcast(table).listen(move |event: ChangeEvent| listener(event));
        FeedSubscription::new(table.clone(), guard)
    }
}

#[async_trait]
impl ChangeFeed for BroadcastFeed {
    async fn subscribe(&self, table: &TableId, listener: ChangeListener) -> Result<FeedSubscription, SubscriptionError> {
        Ok(self.listen(table, listener))
    }
}

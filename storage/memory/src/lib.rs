use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use gather_core::{
    error::{StoreError, SubscriptionError},
    feed::{BroadcastFeed, ChangeFeed, ChangeListener, FeedSubscription},
    storage::{sort_records, RecordStore},
};
use gather_proto::{ChangeKind, OrderBy, RawRecord, RecordId, TableId};
use tracing::debug;

/// Tables held in memory. Every mutation fires the table's feed, including `update` and
/// `delete`, which stand in for changes made by other clients.
#[derive(Default)]
pub struct MemoryStorageEngine {
    tables: RwLock<HashMap<TableId, Vec<RawRecord>>>,
    feed: BroadcastFeed,
}

impl MemoryStorageEngine {
    pub fn new() -> Self { Self::default() }

    /// Load rows as-is, keeping their ids and timestamps
    pub fn seed(&self, table: impl Into<TableId>, rows: impl IntoIterator<Item = RawRecord>) {
        let table = table.into();
        let count = {
            let mut tables = self.tables.write().unwrap();
            let existing = tables.entry(table.clone()).or_default();
            let before = existing.len();
            existing.extend(rows);
            existing.len() - before
        };
        debug!("MemoryStorageEngine seeded {} rows into {}", count, table);
        self.feed.publish(&table, ChangeKind::Insert);
    }

    /// Merge `fields` into an existing row
    pub fn update(&self, table: &TableId, id: RecordId, fields: serde_json::Value) -> Result<RawRecord, StoreError> {
        let updated = {
            let mut tables = self.tables.write().unwrap();
            let rows = tables.get_mut(table).ok_or_else(|| StoreError::TableNotFound(table.clone()))?;
            let row = rows.iter_mut().find(|r| r.id == id).ok_or(StoreError::RecordNotFound(id))?;
            match (&mut row.fields, fields) {
                (serde_json::Value::Object(current), serde_json::Value::Object(changes)) => current.extend(changes),
                (current, replacement) => *current = replacement,
            }
            row.clone()
        };
        self.feed.publish(table, ChangeKind::Update);
        Ok(updated)
    }

    pub fn delete(&self, table: &TableId, id: RecordId) -> Result<(), StoreError> {
        {
            let mut tables = self.tables.write().unwrap();
            let rows = tables.get_mut(table).ok_or_else(|| StoreError::TableNotFound(table.clone()))?;
            let index = rows.iter().position(|r| r.id == id).ok_or(StoreError::RecordNotFound(id))?;
            rows.remove(index);
        }
        self.feed.publish(table, ChangeKind::Delete);
        Ok(())
    }

    pub fn len(&self, table: &TableId) -> usize { self.tables.read().unwrap().get(table).map(|rows| rows.len()).unwrap_or(0) }

    pub fn subscriber_count(&self, table: &TableId) -> usize { self.feed.listener_count(table) }
}

#[async_trait]
impl RecordStore for MemoryStorageEngine {
    async fn insert(&self, table: &TableId, fields: serde_json::Value) -> Result<RawRecord, StoreError> {
        let row = RawRecord::new(fields);
        self.tables.write().unwrap().entry(table.clone()).or_default().push(row.clone());
        debug!("MemoryStorageEngine.insert {} into {}", row.id, table);
        self.feed.publish(table, ChangeKind::Insert);
        Ok(row)
    }

    async fn select_all(&self, table: &TableId, order: &OrderBy) -> Result<Vec<RawRecord>, StoreError> {
        let mut rows = self.tables.read().unwrap().get(table).cloned().unwrap_or_default();
        sort_records(&mut rows, order);
        Ok(rows)
    }
}

#[async_trait]
impl ChangeFeed for MemoryStorageEngine {
    async fn subscribe(&self, table: &TableId, listener: ChangeListener) -> Result<FeedSubscription, SubscriptionError> {
        Ok(self.feed.listen(table, listener))
    }
}

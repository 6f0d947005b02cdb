use std::sync::Arc;

use async_trait::async_trait;
use gather_proto::{OrderBy, RawRecord, TableId};

use crate::error::StoreError;

pub fn tree_name(table: &TableId) -> String { format!("table_{}", table) }

/// The hosted table API: create rows and read whole tables back in a stable order
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Store a new row. The store assigns `id` and `created_at`.
    async fn insert(&self, table: &TableId, fields: serde_json::Value) -> Result<RawRecord, StoreError>;

    /// Every row of `table` in `order`, ties broken by id in the same direction. An unknown table reads as empty.
    async fn select_all(&self, table: &TableId, order: &OrderBy) -> Result<Vec<RawRecord>, StoreError>;
}

#[async_trait]
impl<S: RecordStore + ?Sized> RecordStore for Arc<S> {
    async fn insert(&self, table: &TableId, fields: serde_json::Value) -> Result<RawRecord, StoreError> {
        (**self).insert(table, fields).await
    }

    async fn select_all(&self, table: &TableId, order: &OrderBy) -> Result<Vec<RawRecord>, StoreError> {
        (**self).select_all(table, order).await
    }
}

/// Sort rows the way every engine must return them
pub fn sort_records(records: &mut [RawRecord], order: &OrderBy) { records.sort_by(|a, b| a.compare(b, order)); }

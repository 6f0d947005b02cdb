mod error;

use std::path::PathBuf;

use async_trait::async_trait;
use gather_core::{
    error::{StoreError, SubscriptionError},
    feed::{BroadcastFeed, ChangeFeed, ChangeListener, FeedSubscription},
    storage::{sort_records, tree_name, RecordStore},
};
use gather_proto::{ChangeKind, OrderBy, RawRecord, RecordId, TableId};
use sled::Config;
use tokio::task;
use tracing::debug;

use crate::error::sled_error;

const TABLE_PREFIX: &str = "table_";

/// One sled tree per table, keyed by record id bytes, holding JSON rows.
/// Change notifications are delivered in-process to subscribers of this engine.
pub struct SledStorageEngine {
    pub db: sled::Db,
    feed: BroadcastFeed,
}

impl SledStorageEngine {
    pub fn with_homedir_folder(folder_name: &str) -> anyhow::Result<Self> {
        let dir = dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Failed to get home directory"))?.join(folder_name);

        Self::with_path(dir)
    }

    pub fn with_path(path: PathBuf) -> anyhow::Result<Self> {
        std::fs::create_dir_all(&path)?;
        let dbpath = path.join("sled");
        let db = sled::open(&dbpath)?;
        Ok(Self { db, feed: BroadcastFeed::new() })
    }

    pub fn new() -> anyhow::Result<Self> { Self::with_homedir_folder(".gather") }

    pub fn new_test() -> anyhow::Result<Self> {
        let db = Config::new().temporary(true).flush_every_ms(None).open()?;
        Ok(Self { db, feed: BroadcastFeed::new() })
    }

    /// List all tables by looking for trees that start with `table_`
    pub fn list_tables(&self) -> Vec<TableId> {
        self.db
            .tree_names()
            .into_iter()
            .filter_map(|name| {
                let name = String::from_utf8(name.to_vec()).ok()?;
                Some(name.strip_prefix(TABLE_PREFIX)?.into())
            })
            .collect()
    }

    fn tree(&self, table: &TableId) -> Result<sled::Tree, StoreError> { self.db.open_tree(tree_name(table)).map_err(sled_error) }

    /// Merge `fields` into an existing row, as another client would
    pub async fn update(&self, table: &TableId, id: RecordId, fields: serde_json::Value) -> Result<RawRecord, StoreError> {
        let tree = self.tree(table)?;
        let row = task::spawn_blocking(move || update_blocking(&tree, id, fields)).await??;
        self.feed.publish(table, ChangeKind::Update);
        Ok(row)
    }

    pub async fn delete(&self, table: &TableId, id: RecordId) -> Result<(), StoreError> {
        let tree = self.tree(table)?;
        task::spawn_blocking(move || match tree.remove(id.to_bytes()).map_err(sled_error)? {
            Some(_) => Ok(()),
            None => Err(StoreError::RecordNotFound(id)),
        })
        .await??;
        self.feed.publish(table, ChangeKind::Delete);
        Ok(())
    }

    /// Drop every table tree. Returns whether anything was dropped.
    pub fn delete_all_tables(&self) -> Result<bool, StoreError> {
        let mut any_deleted = false;
        for name in self.db.tree_names() {
            if !name.starts_with(TABLE_PREFIX.as_bytes()) {
                continue;
            }
            if self.db.drop_tree(&name).map_err(sled_error)? {
                any_deleted = true;
            }
        }
        Ok(any_deleted)
    }

    pub fn subscriber_count(&self, table: &TableId) -> usize { self.feed.listener_count(table) }
}

fn insert_blocking(tree: &sled::Tree, row: &RawRecord) -> Result<(), StoreError> {
    let bytes = serde_json::to_vec(row)?;
    tree.insert(row.id.to_bytes(), bytes).map_err(sled_error)?;
    Ok(())
}

fn update_blocking(tree: &sled::Tree, id: RecordId, fields: serde_json::Value) -> Result<RawRecord, StoreError> {
    let bytes = tree.get(id.to_bytes()).map_err(sled_error)?.ok_or(StoreError::RecordNotFound(id))?;
    let mut row: RawRecord = serde_json::from_slice(&bytes)?;
    match (&mut row.fields, fields) {
        (serde_json::Value::Object(current), serde_json::Value::Object(changes)) => current.extend(changes),
        (current, replacement) => *current = replacement,
    }
    insert_blocking(tree, &row)?;
    Ok(row)
}

fn select_all_blocking(tree: &sled::Tree, order: &OrderBy) -> Result<Vec<RawRecord>, StoreError> {
    let mut rows = Vec::new();
    for item in tree.iter() {
        let (_key, value) = item.map_err(sled_error)?;
        rows.push(serde_json::from_slice::<RawRecord>(&value)?);
    }
    sort_records(&mut rows, order);
    Ok(rows)
}

#[async_trait]
impl RecordStore for SledStorageEngine {
    async fn insert(&self, table: &TableId, fields: serde_json::Value) -> Result<RawRecord, StoreError> {
        let tree = self.tree(table)?;
        let row = RawRecord::new(fields);
        let stored = row.clone();
        task::spawn_blocking(move || insert_blocking(&tree, &stored)).await??;
        debug!("SledStorageEngine.insert {} into {}", row.id, table);
        self.feed.publish(table, ChangeKind::Insert);
        Ok(row)
    }

    async fn select_all(&self, table: &TableId, order: &OrderBy) -> Result<Vec<RawRecord>, StoreError> {
        let tree = self.tree(table)?;
        let order = order.clone();
        Ok(task::spawn_blocking(move || select_all_blocking(&tree, &order)).await??)
    }
}

#[async_trait]
impl ChangeFeed for SledStorageEngine {
    async fn subscribe(&self, table: &TableId, listener: ChangeListener) -> Result<FeedSubscription, SubscriptionError> {
        Ok(self.feed.listen(table, listener))
    }
}

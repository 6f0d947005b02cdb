use std::sync::Arc;

use gather_proto::TableId;
use tracing::{debug, warn};

use crate::{
    config::SyncConfig,
    error::{FetchError, WriteError},
    feed::ChangeFeed,
    livelist::LiveList,
    model::{Model, Record},
    notice::{NoticeKind, Notifier, TracingNotifier},
    storage::RecordStore,
};

/// Owned handle to the hosted table API: store, change feed and notification surface.
/// Cheap to clone; every synchronizer holds one.
#[derive(Clone)]
pub struct Client(Arc<Inner>);

struct Inner {
    store: Arc<dyn RecordStore>,
    feed: Arc<dyn ChangeFeed>,
    notifier: Arc<dyn Notifier>,
    config: SyncConfig,
}

pub struct ClientBuilder {
    store: Arc<dyn RecordStore>,
    feed: Arc<dyn ChangeFeed>,
    notifier: Option<Arc<dyn Notifier>>,
    config: SyncConfig,
}

impl ClientBuilder {
    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn config(mut self, config: SyncConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Client {
        Client(Arc::new(Inner {
            store: self.store,
            feed: self.feed,
            notifier: self.notifier.unwrap_or_else(|| Arc::new(TracingNotifier)),
            config: self.config,
        }))
    }
}

impl Client {
    /// For an engine that is both the store and the feed
    pub fn new<E>(engine: Arc<E>) -> Self
    where E: RecordStore + ChangeFeed + 'static {
        Self::builder(engine.clone(), engine).build()
    }

    pub fn builder(store: Arc<dyn RecordStore>, feed: Arc<dyn ChangeFeed>) -> ClientBuilder {
        ClientBuilder { store, feed, notifier: None, config: SyncConfig::default() }
    }

    pub fn store(&self) -> &Arc<dyn RecordStore> { &self.0.store }

    pub fn feed(&self) -> &Arc<dyn ChangeFeed> { &self.0.feed }

    pub fn config(&self) -> &SyncConfig { &self.0.config }

    pub fn notify(&self, kind: NoticeKind, message: &str) { self.0.notifier.notify(kind, message) }

    /// Validate and store a new row in `M`'s table
    pub async fn insert<M: Model>(&self, fields: M) -> Result<Record<M>, WriteError> { self.insert_into(&M::table(), fields).await }

    pub async fn insert_into<M: Model>(&self, table: &TableId, fields: M) -> Result<Record<M>, WriteError> {
        fields.validate()?;
        let value = serde_json::to_value(&fields)?;
        let raw = self.0.store.insert(table, value).await?;
        debug!("Client.insert {} into {}", raw.id, table);
        Ok(Record::try_from(raw)?)
    }

    /// Read all of `M`'s table in the configured order
    pub async fn fetch_all<M: Model>(&self) -> Result<Vec<Record<M>>, FetchError> { self.fetch_table(&M::table()).await }

    /// Read a table as `M`. One undecodable row fails the whole read.
    pub async fn fetch_table<M: Model>(&self, table: &TableId) -> Result<Vec<Record<M>>, FetchError> {
        let rows = self.0.store.select_all(table, &self.0.config.order_by).await.map_err(|e| FetchError::store(table, e))?;
        debug!("Client.fetch_table {} returned {} rows", table, rows.len());
        rows.into_iter()
            .map(|raw| {
                let id = raw.id;
                Record::try_from(raw).map_err(|e| FetchError::decode(table, id, e))
            })
            .collect()
    }

    /// The form write path: insert, then report the outcome exactly once on the notifier
    pub async fn submit<M: Model>(&self, fields: M, success_message: &str) -> Result<Record<M>, WriteError> {
        match self.insert(fields).await {
            Ok(record) => {
                self.notify(NoticeKind::Success, success_message);
                Ok(record)
            }
            Err(e) => {
                warn!("Client.submit to {} failed: {}", M::TABLE, e);
                self.notify(NoticeKind::Error, &e.to_string());
                Err(e)
            }
        }
    }

    /// A synchronizer for `M`'s table. Not started.
    pub fn live_list<M: Model>(&self) -> LiveList<M> { LiveList::new(self) }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.debug_struct("Client").field("config", &self.0.config).finish() }
}

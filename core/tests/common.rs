#![allow(unused)]
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use gather_core::{
    error::StoreError,
    feed::{BroadcastFeed, ChangeFeed, ChangeListener, FeedSubscription},
    notice::{Notice, NoticeKind, Notifier},
    storage::{sort_records, RecordStore},
    Model, SubscriptionError,
};
use gather_proto::{ChangeKind, OrderBy, RawRecord, RecordId, TableId};
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tracing::Level;

// Initialize tracing for tests
#[ctor::ctor]
fn init_tracing() {
    let level = std::env::var("LOG_LEVEL").ok().and_then(|l| l.parse().ok()).unwrap_or(Level::INFO);
    tracing_subscriber::fmt().with_max_level(level).with_test_writer().init();
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub title: String,
}

impl Model for Note {
    const TABLE: &'static str = "notes";
}

pub fn at(day: u32) -> DateTime<Utc> { Utc.with_ymd_and_hms(2025, 10, day, 9, 0, 0).unwrap() }

pub fn note(title: &str, day: u32) -> RawRecord { RawRecord::new(serde_json::json!({ "title": title })).with_created_at(at(day)) }

/// A store whose reads can be held open, counted and failed on demand
#[derive(Default)]
pub struct ScriptedStore {
    rows: Mutex<Vec<RawRecord>>,
    reads: AtomicUsize,
    completed: AtomicUsize,
    failures: Mutex<VecDeque<String>>,
    gate: Mutex<Option<Arc<Semaphore>>>,
    refuse_subscriptions: AtomicBool,
    pub feed: BroadcastFeed,
}

impl ScriptedStore {
    pub fn new() -> Arc<Self> { Arc::new(Self::default()) }

    pub fn with_rows(rows: Vec<RawRecord>) -> Arc<Self> {
        let store = Self::default();
        *store.rows.lock().unwrap() = rows;
        Arc::new(store)
    }

    /// Add a row the way another client would, firing the feed
    pub fn push(&self, row: RawRecord) {
        self.rows.lock().unwrap().push(row);
        self.feed.publish(&TableId::from(Note::TABLE), ChangeKind::Insert);
    }

    pub fn notify(&self) { self.feed.publish(&TableId::from(Note::TABLE), ChangeKind::Update); }

    pub fn fail_next_read(&self, message: &str) { self.failures.lock().unwrap().push_back(message.to_owned()); }

    pub fn refuse_subscriptions(&self) { self.refuse_subscriptions.store(true, Ordering::SeqCst); }

    /// Hold every read until `release` is called
    pub fn close_gate(&self) { *self.gate.lock().unwrap() = Some(Arc::new(Semaphore::new(0))); }

    pub fn release(&self, reads: usize) {
        if let Some(gate) = self.gate.lock().unwrap().as_ref() {
            gate.add_permits(reads);
        }
    }

    pub fn open_gate(&self) {
        if let Some(gate) = self.gate.lock().unwrap().take() {
            gate.add_permits(Semaphore::MAX_PERMITS / 2);
        }
    }

    /// Reads started
    pub fn reads(&self) -> usize { self.reads.load(Ordering::SeqCst) }

    pub fn completed(&self) -> usize { self.completed.load(Ordering::SeqCst) }

    pub fn ids(&self) -> Vec<RecordId> {
        let mut rows = self.rows.lock().unwrap().clone();
        sort_records(&mut rows, &OrderBy::newest_first());
        rows.into_iter().map(|r| r.id).collect()
    }

    pub fn listeners(&self) -> usize { self.feed.listener_count(&TableId::from(Note::TABLE)) }
}

#[async_trait]
impl RecordStore for ScriptedStore {
    async fn insert(&self, table: &TableId, fields: serde_json::Value) -> Result<RawRecord, StoreError> {
        let row = RawRecord::new(fields);
        self.rows.lock().unwrap().push(row.clone());
        self.feed.publish(table, ChangeKind::Insert);
        Ok(row)
    }

    async fn select_all(&self, _table: &TableId, order: &OrderBy) -> Result<Vec<RawRecord>, StoreError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.acquire().await.unwrap().forget();
        }
        self.completed.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = self.failures.lock().unwrap().pop_front() {
            return Err(StoreError::Backend(message.into()));
        }
        let mut rows = self.rows.lock().unwrap().clone();
        sort_records(&mut rows, order);
        Ok(rows)
    }
}

#[async_trait]
impl ChangeFeed for ScriptedStore {
    async fn subscribe(&self, table: &TableId, listener: ChangeListener) -> Result<FeedSubscription, SubscriptionError> {
        if self.refuse_subscriptions.load(Ordering::SeqCst) {
            return Err(SubscriptionError::Unavailable { table: table.clone(), message: "realtime disabled".into() });
        }
        self.feed.subscribe(table, listener).await
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Arc<Self> { Arc::new(Self::default()) }

    pub fn notices(&self) -> Vec<Notice> { self.notices.lock().unwrap().clone() }

    pub fn errors(&self) -> Vec<String> {
        self.notices().into_iter().filter(|n| n.kind == NoticeKind::Error).map(|n| n.message).collect()
    }

    pub fn successes(&self) -> Vec<String> {
        self.notices().into_iter().filter(|n| n.kind == NoticeKind::Success).map(|n| n.message).collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, kind: NoticeKind, message: &str) { self.notices.lock().unwrap().push(Notice { kind, message: message.to_owned() }); }
}

pub async fn eventually(what: &str, check: impl Fn() -> bool) {
    let reached = tokio::time::timeout(Duration::from_secs(5), async {
        while !check() {
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
    })
    .await;
    assert!(reached.is_ok(), "timed out waiting for {what}");
}

/// Let spawned tasks run for a while
pub async fn settle() { tokio::time::sleep(Duration::from_millis(50)).await; }

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, Weak,
    },
    time::Duration,
};

use gather_proto::{ChangeEvent, RecordId, TableId};
use gather_signals::{
    broadcast::BroadcastId, IntoSubscribeListener, ListenerGuard, Mut, Peek, Read, Signal, Subscribe, SubscriptionGuard, Wait, With,
};
use tokio::{sync::Notify, task::JoinHandle};
use tracing::{debug, info, warn};

use crate::{
    client::Client,
    feed::{ChangeListener, FeedSubscription},
    model::{Model, Record},
    notice::NoticeKind,
    selection::{self, Comparator, Criteria, Faceted, Predicate, Searchable, Sortable},
    state::SyncState,
    task,
};

/// The records produced by one full read. Replaced whole on every refresh.
pub struct Snapshot<M> {
    records: Arc<[Record<M>]>,
    loaded: bool,
    revision: u64,
}

impl<M> Snapshot<M> {
    pub fn records(&self) -> &[Record<M>] { &self.records }

    pub fn iter(&self) -> std::slice::Iter<'_, Record<M>> { self.records.iter() }

    pub fn len(&self) -> usize { self.records.len() }

    pub fn is_empty(&self) -> bool { self.records.is_empty() }

    /// Whether any read has been applied yet
    pub fn loaded(&self) -> bool { self.loaded }

    /// Incremented on every applied read
    pub fn revision(&self) -> u64 { self.revision }

    pub fn ids(&self) -> Vec<RecordId> { self.records.iter().map(|r| r.id).collect() }
}

impl<M> Default for Snapshot<M> {
    fn default() -> Self { Self { records: Arc::from(Vec::new()), loaded: false, revision: 0 } }
}

impl<M> Clone for Snapshot<M> {
    fn clone(&self) -> Self { Self { records: self.records.clone(), loaded: self.loaded, revision: self.revision } }
}

impl<M: std::fmt::Debug> std::fmt::Debug for Snapshot<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Snapshot").field("revision", &self.revision).field("loaded", &self.loaded).field("records", &self.records).finish()
    }
}

/// Mirrors one table locally and re-derives filtered, sorted views of it.
///
/// `start` subscribes to the table's change feed and performs a full read. Every change
/// notification triggers another full read that replaces the cache. Notifications that arrive
/// while a read is in flight collapse into a single follow-up read. `stop`, or dropping the last
/// handle, closes the subscription and cancels the sync task; nothing changes the cache afterwards.
pub struct LiveList<M: Model>(Arc<Inner<M>>);

/// Weak handle, for listeners that must not keep a synchronizer alive
pub struct WeakLiveList<M: Model>(Weak<Inner<M>>);

impl<M: Model> WeakLiveList<M> {
    pub fn upgrade(&self) -> Option<LiveList<M>> { self.0.upgrade().map(LiveList) }
}

impl<M: Model> Clone for WeakLiveList<M> {
    fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<M: Model> Clone for LiveList<M> {
    fn clone(&self) -> Self { Self(self.0.clone()) }
}

struct Inner<M: Model> {
    table: TableId,
    client: Client,
    state: Mut<SyncState>,
    snapshot: Mut<Snapshot<M>>,
    // generation, task and feed change together; results are applied under this lock
    control: Mutex<Control>,
    retry_requested: AtomicBool,
}

struct Control {
    generation: u64,
    task: Option<JoinHandle<()>>,
    feed: Option<FeedSubscription>,
    wake: Arc<Notify>,
}

impl<M: Model> LiveList<M> {
    pub fn new(client: &Client) -> Self { Self::for_table(client, M::table()) }

    /// Mirror `table` instead of `M::TABLE`
    pub fn for_table(client: &Client, table: impl Into<TableId>) -> Self {
        Self(Arc::new(Inner {
            table: table.into(),
            client: client.clone(),
            state: Mut::new(SyncState::Idle),
            snapshot: Mut::new(Snapshot::default()),
            control: Mutex::new(Control { generation: 0, task: None, feed: None, wake: Arc::new(Notify::new()) }),
            retry_requested: AtomicBool::new(false),
        }))
    }

    pub fn table(&self) -> &TableId { &self.0.table }

    pub fn weak(&self) -> WeakLiveList<M> { WeakLiveList(Arc::downgrade(&self.0)) }

    /// Begin mirroring. Returns immediately; the cache fills asynchronously. No-op if already running.
    pub fn start(&self) {
        {
            let mut control = self.0.control.lock().unwrap();
            if control.task.is_some() {
                debug!("LiveList({}) already started", self.0.table);
                return;
            }
            control.generation += 1;
            control.wake = Arc::new(Notify::new());
            self.0.retry_requested.store(false, Ordering::SeqCst);
            self.0.state.replace(SyncState::Loading);
            let generation = control.generation;
            control.task = Some(task::spawn(run(Arc::downgrade(&self.0), control.wake.clone(), generation)));
            info!("LiveList({}) started, generation {}", self.0.table, generation);
        }
        self.0.state.notify();
    }

    /// Close the subscription and cancel any pending read. The cache keeps its last value.
    pub fn stop(&self) {
        if self.0.teardown() {
            info!("LiveList({}) stopped", self.0.table);
        }
    }

    /// Re-read after a failure. From `Idle` this is `start`; in any other state it does nothing.
    pub fn retry(&self) {
        let wake = {
            let control = self.0.control.lock().unwrap();
            match self.0.state.peek() {
                SyncState::Idle => None,
                SyncState::Error(_) if control.task.is_some() => {
                    self.0.retry_requested.store(true, Ordering::SeqCst);
                    self.0.state.replace(SyncState::Loading);
                    Some(control.wake.clone())
                }
                state => {
                    debug!("LiveList({}) retry ignored while {}", self.0.table, state);
                    return;
                }
            }
        };
        match wake {
            Some(wake) => {
                info!("LiveList({}) retrying", self.0.table);
                self.0.state.notify();
                wake.notify_one();
            }
            None => self.start(),
        }
    }

    /// Something changed in the table. Schedules a full re-read unless idle or failed.
    pub fn on_change_notification(&self) { self.0.on_change(None) }

    pub fn state(&self) -> Read<SyncState> { self.0.state.read() }

    pub fn snapshot(&self) -> Snapshot<M> { self.0.snapshot.peek() }

    pub fn records(&self) -> Read<Snapshot<M>> { self.0.snapshot.read() }

    /// Filter and sort the current cache. Never touches the cache or the store.
    pub fn view<P, C>(&self, predicate: P, comparator: C) -> Vec<Record<M>>
    where
        P: Predicate<M>,
        C: Comparator<M>,
    {
        let snapshot = self.snapshot();
        selection::project(snapshot.records(), &predicate, &comparator)
    }

    /// Call `listener` with every applied snapshot
    pub fn subscribe<L>(&self, listener: L) -> SubscriptionGuard
    where L: IntoSubscribeListener<Snapshot<M>> {
        self.0.snapshot.read().subscribe(listener)
    }

    pub async fn wait_ready(&self) { self.state().wait_for(|s: &SyncState| s.is_ready()).await }

    /// Wait for `Ready` or `Error` and return whichever was reached
    pub async fn wait_settled(&self) -> SyncState {
        self.state().wait_for(|s: &SyncState| if s.is_settled() { Some(s.clone()) } else { None }).await
    }
}

impl<M: Model + Searchable + Faceted + Sortable> LiveList<M> {
    pub fn view_with(&self, criteria: &Criteria<M>) -> Vec<Record<M>> { criteria.apply(self.snapshot().records()) }
}

impl<M: Model> Signal for LiveList<M> {
    fn listen(&self, listener: Arc<dyn Fn() + Send + Sync + 'static>) -> ListenerGuard { self.0.snapshot.listen(listener) }

    fn broadcast_id(&self) -> BroadcastId { self.0.snapshot.broadcast_id() }
}

impl<M: Model> std::fmt::Debug for LiveList<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveList").field("table", &self.0.table).field("state", &self.0.state.peek()).finish()
    }
}

impl<M: Model> Inner<M> {
    fn on_change(&self, event: Option<&ChangeEvent>) {
        let wake = {
            let control = self.control.lock().unwrap();
            control.wake.clone()
        };
        let active = self.state.with(|s| matches!(s, SyncState::Ready | SyncState::Loading));
        if active {
            debug!("LiveList({}) change notification {:?}", self.table, event.map(|e| e.kind));
            wake.notify_one();
        } else {
            debug!("LiveList({}) ignoring change notification while {}", self.table, self.state.peek());
        }
    }

    /// Set the state if `generation` is still current. Returns false for a stale generation.
    fn transition(&self, generation: u64, next: SyncState) -> bool {
        let changed = {
            let control = self.control.lock().unwrap();
            if control.generation != generation {
                return false;
            }
            let changed = self.state.with(|s| *s != next);
            if changed {
                self.state.replace(next);
            }
            changed
        };
        if changed {
            self.state.notify();
        }
        true
    }

    fn apply(&self, generation: u64, records: Vec<Record<M>>) -> bool {
        let count = records.len();
        let revision = {
            let control = self.control.lock().unwrap();
            if control.generation != generation {
                debug!("LiveList({}) discarding {} rows from stale generation {}", self.table, count, generation);
                return false;
            }
            let revision = self.snapshot.with(|s| s.revision) + 1;
            self.snapshot.replace(Snapshot { records: records.into(), loaded: true, revision });
            self.state.replace(SyncState::Ready);
            revision
        };
        debug!("LiveList({}) applied {} rows, revision {}", self.table, count, revision);
        self.snapshot.notify();
        self.state.notify();
        true
    }

    /// One full read. Returns false once the generation is stale.
    async fn refresh(&self, generation: u64) -> bool {
        if !self.transition(generation, SyncState::Loading) {
            return false;
        }
        match self.client.fetch_table::<M>(&self.table).await {
            Ok(records) => self.apply(generation, records),
            Err(e) => {
                if !self.transition(generation, SyncState::Error(e.clone())) {
                    debug!("LiveList({}) discarding error from stale generation {}: {}", self.table, generation, e);
                    return false;
                }
                warn!("LiveList({}) read failed: {}", self.table, e);
                self.client.notify(NoticeKind::Error, &format!("Failed to load {}: {}", self.table, e));
                true
            }
        }
    }

    async fn connect(&self, weak: &Weak<Inner<M>>, generation: u64) {
        let listener: ChangeListener = {
            let weak = weak.clone();
            Arc::new(move |event: ChangeEvent| {
                if let Some(inner) = weak.upgrade() {
                    inner.on_change(Some(&event));
                }
            })
        };
        match self.client.feed().subscribe(&self.table, listener).await {
            Ok(subscription) => {
                let stale = {
                    let mut control = self.control.lock().unwrap();
                    if control.generation == generation {
                        control.feed = Some(subscription);
                        None
                    } else {
                        Some(subscription)
                    }
                };
                // dropped outside the lock
                drop(stale);
            }
            Err(e) => {
                warn!("LiveList({}) could not subscribe: {}", self.table, e);
                if self.client.config().surface_subscription_errors {
                    self.client.notify(NoticeKind::Error, &format!("Live updates unavailable for {}: {}", self.table, e));
                }
            }
        }
    }

    /// Whether a wake-up should lead to a read. Failed synchronizers only read again on retry.
    fn should_refresh(&self) -> bool {
        if self.retry_requested.swap(false, Ordering::SeqCst) {
            return true;
        }
        self.state.with(|s| matches!(s, SyncState::Ready | SyncState::Loading))
    }

    /// Bump the generation, cancel the task and close the feed. Returns whether a task was running.
    fn teardown(&self) -> bool {
        let (task, feed, changed) = {
            let mut control = self.control.lock().unwrap();
            control.generation += 1;
            let changed = self.state.with(|s| *s != SyncState::Idle);
            if changed {
                self.state.replace(SyncState::Idle);
            }
            (control.task.take(), control.feed.take(), changed)
        };
        let running = task.is_some();
        if let Some(task) = task {
            task.abort();
        }
        drop(feed);
        if changed {
            self.state.notify();
        }
        running
    }
}

impl<M: Model> Drop for Inner<M> {
    fn drop(&mut self) {
        if self.teardown() {
            debug!("LiveList({}) dropped while running", self.table);
        }
    }
}

async fn run<M: Model>(weak: Weak<Inner<M>>, wake: Arc<Notify>, generation: u64) {
    // subscribe before the first read so no change in between is missed
    match weak.upgrade() {
        Some(inner) => inner.connect(&weak, generation).await,
        None => return,
    }

    loop {
        let window: Duration = {
            let Some(inner) = weak.upgrade() else { return };
            if !inner.refresh(generation).await {
                return;
            }
            inner.client.config().coalesce_window
        };

        loop {
            wake.notified().await;
            let Some(inner) = weak.upgrade() else { return };
            if inner.should_refresh() {
                break;
            }
        }

        if !window.is_zero() {
            tokio::time::sleep(window).await;
            // changes that arrived during the window are covered by the coming read
            let _ = tokio::time::timeout(Duration::ZERO, wake.notified()).await;
        }
    }
}

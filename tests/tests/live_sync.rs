
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use common::*;
use gather::{
    proto::{OrderBy, RawRecord, TableId},
    signals::Peek,
    storage::RecordStore,
    Client, Criteria, Discussion, DiscussionCategory, LiveList, MemoryStorageEngine, SledStorageEngine, StoreError, SyncConfig, SyncState,
    Update, UpdateKind,
};
use rand::Rng;

/// Counts full reads on the way through to the memory engine
struct CountingStore {
    engine: Arc<MemoryStorageEngine>,
    reads: AtomicUsize,
}

#[async_trait]
impl RecordStore for CountingStore {
    async fn insert(&self, table: &TableId, fields: serde_json::Value) -> Result<RawRecord, StoreError> { self.engine.insert(table, fields).await }

    async fn select_all(&self, table: &TableId, order: &OrderBy) -> Result<Vec<RawRecord>, StoreError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(5)).await;
        self.engine.select_all(table, order).await
    }
}

fn update(i: usize) -> Update { Update::new(UpdateKind::News, format!("update {i}"), "details") }

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn quiescent_cache_equals_one_full_read() -> Result<(), anyhow::Error> {
    let engine = Arc::new(MemoryStorageEngine::new());
    let client = Client::new(engine.clone());
    let list = client.live_list::<Update>();
    list.start();
    list.wait_ready().await;

    let mut writers = Vec::new();
    for w in 0..4 {
        let client = client.clone();
        writers.push(tokio::spawn(async move {
            for i in 0..10 {
                client.insert(update(w * 10 + i)).await.unwrap();
                let pause = rand::thread_rng().gen_range(0..3);
                tokio::time::sleep(Duration::from_millis(pause)).await;
            }
        }));
    }
    for writer in writers {
        writer.await?;
    }

    let expected: Vec<_> = client.fetch_all::<Update>().await?.iter().map(|r| r.id).collect();
    assert_eq!(expected.len(), 40);
    eventually("cache to match the store", || list.snapshot().ids() == expected).await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(list.snapshot().ids(), expected);
    assert_eq!(list.state().peek(), SyncState::Ready);
    Ok(())
}

#[tokio::test]
async fn coalesce_window_batches_a_burst() -> Result<(), anyhow::Error> {
    let engine = Arc::new(MemoryStorageEngine::new());
    let store = Arc::new(CountingStore { engine: engine.clone(), reads: AtomicUsize::new(0) });
    let client = Client::builder(store.clone(), engine.clone()).config(SyncConfig::new().with_coalesce_window(Duration::from_millis(100))).build();
    let list = client.live_list::<Update>();
    list.start();
    list.wait_ready().await;
    assert_eq!(store.reads.load(Ordering::SeqCst), 1);

    for i in 0..10 {
        client.insert(update(i)).await?;
    }
    eventually("burst to land", || list.snapshot().len() == 10).await;
    tokio::time::sleep(Duration::from_millis(250)).await;
    assert_eq!(store.reads.load(Ordering::SeqCst), 2);
    assert_eq!(list.snapshot().len(), 10);
    Ok(())
}

#[tokio::test]
async fn discussions_over_sled() -> Result<(), anyhow::Error> {
    let engine = Arc::new(SledStorageEngine::new_test()?);
    let notifier = RecordingNotifier::new();
    let client = Client::builder(engine.clone(), engine.clone()).notifier(notifier.clone()).build();
    let board = LiveList::<Discussion>::new(&client);
    board.start();
    board.wait_ready().await;
    assert!(board.snapshot().is_empty());
    assert!(board.snapshot().loaded());

    client
        .submit(Discussion::new(DiscussionCategory::TeamFormation, "Looking for a designer", "We have two backend devs", "Sam", "sam@example.com"), "Discussion Created!")
        .await?;
    client.submit(Discussion::new(DiscussionCategory::Logistics, "Parking?", "Is there parking on site", "Ira", "ira@example.com"), "Discussion Created!").await?;
    eventually("both threads", || board.snapshot().len() == 2).await;

    let formation = board.view_with(&Criteria::new().facet(DiscussionCategory::TeamFormation));
    assert_eq!(formation.len(), 1);
    assert_eq!(formation[0].author_name, "Sam");
    assert_eq!(board.view_with(&Criteria::new().search("ira")).len(), 1);
    assert_eq!(notifier.errors(), 0);

    board.stop();
    assert_eq!(engine.subscriber_count(&table::<Discussion>()), 0);
    Ok(())
}

#[tokio::test]
async fn table_name_can_be_overridden() -> Result<(), anyhow::Error> {
    let engine = Arc::new(MemoryStorageEngine::new());
    let archive = TableId::from("updates_2024");
    engine.seed(archive.clone(), vec![row(&Update::new(UpdateKind::Deadline, "Last call", "Submit by Friday"), at(1, 9))]);
    let client = Client::new(engine.clone());

    let current = client.live_list::<Update>();
    let archived = LiveList::<Update>::for_table(&client, archive.clone());
    current.start();
    archived.start();
    current.wait_ready().await;
    archived.wait_ready().await;

    assert!(current.snapshot().is_empty());
    assert_eq!(archived.snapshot().len(), 1);
    assert_eq!(archived.table(), &archive);

    client.insert_into(&archive, Update::new(UpdateKind::Event, "Demo day", "Hall B")).await?;
    eventually("archive refresh", || archived.snapshot().len() == 2).await;
    assert!(current.snapshot().is_empty());
    Ok(())
}

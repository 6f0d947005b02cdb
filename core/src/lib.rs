pub mod client;
pub mod config;
pub mod error;
pub mod feed;
pub mod livelist;
pub mod model;
pub mod notice;
pub mod selection;
pub mod state;
pub mod storage;
pub mod task;

pub use client::{Client, ClientBuilder};
pub use config::SyncConfig;
pub use error::{DecodeError, FetchError, StoreError, SubscriptionError, ValidationError, WriteError};
pub use feed::{BroadcastFeed, ChangeFeed, ChangeListener, FeedSubscription};
pub use livelist::{LiveList, Snapshot, WeakLiveList};
pub use model::{Model, Record};
pub use notice::{BroadcastNotifier, Notice, NoticeKind, Notifier, TracingNotifier};
pub use state::SyncState;
pub use storage::RecordStore;

pub use gather_proto as proto;
pub use gather_signals as signals;

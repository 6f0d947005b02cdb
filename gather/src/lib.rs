//! # gather
//!
//! Live, filterable mirrors of hosted tables for an event-registration site. Attendees register,
//! form teams, submit projects, read announcements and discuss; every list view keeps a local
//! copy of its table fresh through change notifications and derives a filtered, sorted view
//! from it.
//!
//! ## Core Concepts
//!
//! - **Model**: a serde struct describing one table's rows, with a table name and validation
//! - **Record**: one typed row with a store-assigned id and creation time
//! - **LiveList**: the synchronizer that mirrors a table and re-reads it on every change
//! - **Snapshot**: the immutable result of one full read
//! - **Criteria**: search text, facet selection and sort order for a view
//! - **Client**: the store, change feed and notification surface shared by everything above
//!
//! ## Example
//!
//! ```rust
//! # use std::sync::Arc;
//! # use gather::{Client, Criteria, LiveList, MemoryStorageEngine, Project, ProjectTag, SortOrder};
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::new(Arc::new(MemoryStorageEngine::new()));
//!
//!     let gallery = LiveList::<Project>::new(&client);
//!     gallery.start();
//!     gallery.wait_ready().await;
//!
//!     client.submit(Project::new("Greenroute", "Leaf").tagged(ProjectTag::Sustainability), "Project submitted!").await?;
//!
//!     // the insert fires the feed and the gallery re-reads
//!     while gallery.snapshot().len() < 1 {
//!         tokio::task::yield_now().await;
//!     }
//!     let view = gallery.view_with(&Criteria::new().search("green").sort(SortOrder::MostLiked));
//!     assert_eq!(view[0].title, "Greenroute");
//!
//!     gallery.stop();
//!     Ok(())
//! # }
//! ```

pub use gather_core::*;
pub use gather_model::*;
pub use gather_core::selection::{Comparator, Criteria, FacetFilter, MatchAll, Predicate, Recency, Search, SortOrder};

#[cfg(feature = "memory")]
pub use gather_storage_memory::MemoryStorageEngine;
#[cfg(feature = "sled")]
pub use gather_storage_sled::SledStorageEngine;

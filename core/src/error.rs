use gather_proto::{RecordId, TableId};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("table not found: {0}")]
    TableNotFound(TableId),
    #[error("record {0} not found")]
    RecordNotFound(RecordId),
    #[error("serialization error: {0}")]
    Serialization(Box<dyn std::error::Error + Send + Sync + 'static>),
    #[error("storage backend error: {0}")]
    Backend(Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self { StoreError::Serialization(Box::new(e)) }
}

impl From<anyhow::Error> for StoreError {
    fn from(e: anyhow::Error) -> Self { StoreError::Backend(e.into()) }
}

impl From<tokio::task::JoinError> for StoreError {
    fn from(e: tokio::task::JoinError) -> Self { StoreError::Backend(Box::new(e)) }
}

/// A record failed its schema check
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("{field} is invalid: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// A raw row could not be turned into a typed record
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("malformed fields: {0}")]
    Fields(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// A full read of a table failed. Cloneable so it can be held in the sync state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("failed to read {table}: {message}")]
    Store { table: TableId, message: String },
    #[error("invalid row {id} in {table}: {message}")]
    Decode { table: TableId, id: RecordId, message: String },
}

impl FetchError {
    pub fn store(table: &TableId, err: StoreError) -> Self { FetchError::Store { table: table.clone(), message: err.to_string() } }

    pub fn decode(table: &TableId, id: RecordId, err: DecodeError) -> Self {
        FetchError::Decode { table: table.clone(), id, message: err.to_string() }
    }

    pub fn table(&self) -> &TableId {
        match self {
            FetchError::Store { table, .. } | FetchError::Decode { table, .. } => table,
        }
    }
}

#[derive(Error, Debug)]
pub enum WriteError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("failed to save: {0}")]
    Store(#[from] StoreError),
    #[error("store returned an invalid record: {0}")]
    Decode(#[from] DecodeError),
}

impl From<serde_json::Error> for WriteError {
    fn from(e: serde_json::Error) -> Self { WriteError::Store(e.into()) }
}

/// The change feed could not be established. The cache still holds its last read but will not refresh itself.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SubscriptionError {
    #[error("change feed unavailable for {table}: {message}")]
    Unavailable { table: TableId, message: String },
    #[error("change feed closed")]
    Closed,
}

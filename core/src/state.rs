use crate::error::FetchError;

/// Lifecycle of a synchronizer.
///
/// `Idle -> Loading -> Ready <-> Loading`, back to `Idle` on stop. `Error` is entered from `Loading`
/// when a read fails and left only through `retry` or `stop`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SyncState {
    #[default]
    Idle,
    Loading,
    Ready,
    Error(FetchError),
}

impl SyncState {
    pub fn is_ready(&self) -> bool { matches!(self, SyncState::Ready) }

    pub fn is_loading(&self) -> bool { matches!(self, SyncState::Loading) }

    /// Ready or failed: nothing more will happen without a notification or a retry
    pub fn is_settled(&self) -> bool { matches!(self, SyncState::Ready | SyncState::Error(_)) }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            SyncState::Error(e) => Some(e),
            _ => None,
        }
    }
}

impl std::fmt::Display for SyncState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncState::Idle => write!(f, "Idle"),
            SyncState::Loading => write!(f, "Loading"),
            SyncState::Ready => write!(f, "Ready"),
            SyncState::Error(e) => write!(f, "Error: {}", e),
        }
    }
}

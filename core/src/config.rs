use std::time::Duration;

use gather_proto::OrderBy;

/// Settings shared by every synchronizer a [`Client`](crate::Client) creates
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Order requested from the store on every full read
    pub order_by: OrderBy,
    /// Delay before each refetch so more of a notification burst lands in one read
    pub coalesce_window: Duration,
    /// Surface a failed feed subscription as an error notice
    pub surface_subscription_errors: bool,
}

impl Default for SyncConfig {
    fn default() -> Self { Self { order_by: OrderBy::newest_first(), coalesce_window: Duration::ZERO, surface_subscription_errors: true } }
}

impl SyncConfig {
    pub fn new() -> Self { Self::default() }

    pub fn with_order_by(mut self, order_by: OrderBy) -> Self {
        self.order_by = order_by;
        self
    }

    pub fn with_coalesce_window(mut self, window: Duration) -> Self {
        self.coalesce_window = window;
        self
    }

    pub fn with_subscription_errors(mut self, surface: bool) -> Self {
        self.surface_subscription_errors = surface;
        self
    }
}

use gather_signals::{Broadcast, ListenerGuard};
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Error,
}

/// A transient message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self { Self { kind: NoticeKind::Success, message: message.into() } }

    pub fn error(message: impl Into<String>) -> Self { Self { kind: NoticeKind::Error, message: message.into() } }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "[{}] {}", self.kind, self.message) }
}

/// The toast surface. Fire-and-forget.
pub trait Notifier: Send + Sync {
    fn notify(&self, kind: NoticeKind, message: &str);
}

impl<N: Notifier + ?Sized> Notifier for std::sync::Arc<N> {
    fn notify(&self, kind: NoticeKind, message: &str) { (**self).notify(kind, message) }
}

/// Writes notices to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, kind: NoticeKind, message: &str) {
        match kind {
            NoticeKind::Success => info!(target: "gather::notice", "{}", message),
            NoticeKind::Error => error!(target: "gather::notice", "{}", message),
        }
    }
}

/// Publishes notices for a display layer to render
#[derive(Debug, Clone, Default)]
pub struct BroadcastNotifier {
    broadcast: Broadcast<Notice>,
}

impl BroadcastNotifier {
    pub fn new() -> Self { Self::default() }

    pub fn listen(&self, listener: impl Fn(Notice) + Send + Sync + 'static) -> ListenerGuard { self.broadcast.listen(listener) }
}

impl Notifier for BroadcastNotifier {
    fn notify(&self, kind: NoticeKind, message: &str) { self.broadcast.send(Notice { kind, message: message.to_owned() }); }
}

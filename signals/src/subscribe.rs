use std::sync::Arc;

use crate::{broadcast::ListenerGuard, signal::Signal, Peek};

pub type SubscribeListener<T> = Box<dyn Fn(T) + Send + Sync + 'static>;

pub trait IntoSubscribeListener<T> {
    fn into_subscribe_listener(self) -> SubscribeListener<T>;
}

/// Subscribe to a value-carrying signal. The listener receives the new value on every change.
pub trait Subscribe<T: 'static> {
    fn subscribe<L>(&self, listener: L) -> SubscriptionGuard
    where L: IntoSubscribeListener<T>;
}

/// Keeps a subscription alive; unsubscribes on drop
pub struct SubscriptionGuard {
    _guard: ListenerGuard,
}

impl SubscriptionGuard {
    pub fn new(guard: ListenerGuard) -> Self { Self { _guard: guard } }
}

impl std::fmt::Debug for SubscriptionGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "SubscriptionGuard({:?})", self._guard) }
}

impl<S, T> Subscribe<T> for S
where
    S: Signal + Peek<T> + Clone + Send + Sync + 'static,
    T: 'static,
{
    fn subscribe<L>(&self, listener: L) -> SubscriptionGuard
    where L: IntoSubscribeListener<T> {
        let listener = listener.into_subscribe_listener();
        let me = self.clone();
        SubscriptionGuard::new(self.listen(Arc::new(move || listener(me.peek()))))
    }
}

impl<F, T> IntoSubscribeListener<T> for F
where F: Fn(T) + Send + Sync + 'static
{
    fn into_subscribe_listener(self) -> SubscribeListener<T> { Box::new(self) }
}

impl<T: Send + 'static> IntoSubscribeListener<T> for std::sync::mpsc::Sender<T> {
    fn into_subscribe_listener(self) -> SubscribeListener<T> {
        let sender = std::sync::Mutex::new(self);
        Box::new(move |value| {
            let _ = sender.lock().unwrap().send(value);
        })
    }
}

#[cfg(feature = "tokio")]
impl<T: Send + 'static> IntoSubscribeListener<T> for tokio::sync::mpsc::UnboundedSender<T> {
    fn into_subscribe_listener(self) -> SubscribeListener<T> {
        Box::new(move |value| {
            let _ = self.send(value);
        })
    }
}

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock, Weak};

/// Identifies a broadcast for deduplication. Derived from the allocation address, so it cannot be forged.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct BroadcastId(usize);

impl std::fmt::Display for BroadcastId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.0) }
}

/// A listener registered on a broadcast
#[derive(Clone)]
pub enum Listener<T> {
    /// Receives the sent value
    Payload(Arc<dyn Fn(T) + Send + Sync + 'static>),
    /// Only learns that something was sent
    NotifyOnly(Arc<dyn Fn() + Send + Sync + 'static>),
}

pub trait IntoListener<T> {
    fn into_listener(self) -> Listener<T>;
}

/// Fan-out of values to synchronous listeners.
///
/// Listeners are called outside the registry lock, so a listener may register or drop other
/// listeners while being called.
pub struct Broadcast<T = ()>(Arc<Inner<T>>);

struct Inner<T> {
    listeners: RwLock<BTreeMap<usize, Listener<T>>>,
    next_id: AtomicUsize,
}

impl<T> Clone for Broadcast<T> {
    fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<T> std::fmt::Debug for Broadcast<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Broadcast").field("listeners", &self.listener_count()).finish()
    }
}

impl<T: Clone> Default for Broadcast<T> {
    fn default() -> Self { Self::new() }
}

impl<T> Broadcast<T> {
    pub fn new() -> Self { Self(Arc::new(Inner { listeners: RwLock::new(BTreeMap::new()), next_id: AtomicUsize::new(0) })) }

    pub fn id(&self) -> BroadcastId { BroadcastId(Arc::as_ptr(&self.0) as *const () as usize) }

    /// Register a listener. It stays registered until the returned guard is dropped.
    pub fn listen<L>(&self, listener: L) -> ListenerGuard
    where L: IntoListener<T>, T: 'static {
        let id = self.0.next_id.fetch_add(1, Ordering::Relaxed);
        self.0.listeners.write().unwrap().insert(id, listener.into_listener());
        let weak: Weak<Inner<T>> = Arc::downgrade(&self.0);
        ListenerGuard { broadcast_id: self.id(), remove: Some(Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.listeners.write().unwrap().remove(&id);
            }
        })) }
    }

    pub fn listener_count(&self) -> usize { self.0.listeners.read().unwrap().len() }
}

impl<T: Clone> Broadcast<T> {
    /// Call every listener registered at the time of the call
    pub fn send(&self, value: T) {
        let listeners: Vec<Listener<T>> = {
            let listeners = self.0.listeners.read().unwrap();
            listeners.values().cloned().collect()
        };

        // clone for all but the last listener
        if let Some((last, rest)) = listeners.split_last() {
            for listener in rest {
                listener.call(value.clone());
            }
            last.call(value);
        }
    }
}

impl<T> Listener<T> {
    fn call(&self, value: T) {
        match self {
            Listener::Payload(f) => f(value),
            Listener::NotifyOnly(f) => f(),
        }
    }
}

/// Removes its listener from the broadcast when dropped. Does not keep the broadcast alive.
pub struct ListenerGuard {
    broadcast_id: BroadcastId,
    remove: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl ListenerGuard {
    pub fn broadcast_id(&self) -> BroadcastId { self.broadcast_id }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        if let Some(remove) = self.remove.take() {
            remove();
            tracing::trace!("listener removed from broadcast {}", self.broadcast_id);
        }
    }
}

impl std::fmt::Debug for ListenerGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "ListenerGuard({})", self.broadcast_id) }
}

impl<F, T> IntoListener<T> for F
where F: Fn(T) + Send + Sync + 'static
{
    fn into_listener(self) -> Listener<T> { Listener::Payload(Arc::new(self)) }
}

impl<T> IntoListener<T> for Listener<T> {
    fn into_listener(self) -> Listener<T> { self }
}

impl<T> IntoListener<T> for Arc<dyn Fn() + Send + Sync + 'static> {
    fn into_listener(self) -> Listener<T> { Listener::NotifyOnly(self) }
}

#[cfg(feature = "tokio")]
impl<T> IntoListener<T> for tokio::sync::mpsc::UnboundedSender<T>
where T: Send + 'static
{
    fn into_listener(self) -> Listener<T> {
        Listener::Payload(Arc::new(move |value| {
            let _ = self.send(value);
        }))
    }
}

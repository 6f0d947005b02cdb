use std::sync::{Arc, RwLock};

use crate::broadcast::{Broadcast, BroadcastId, IntoListener, ListenerGuard};

/// Something that can be observed for changes, without regard to its value
pub trait Signal {
    fn listen(&self, listener: Arc<dyn Fn() + Send + Sync + 'static>) -> ListenerGuard;

    fn broadcast_id(&self) -> BroadcastId;
}

/// Borrow the current value with a closure
pub trait With<T> {
    fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R;
}

/// Clone out the current value
pub trait Peek<T> {
    fn peek(&self) -> T;
}

impl<T: Clone, S: With<T>> Peek<T> for S {
    fn peek(&self) -> T { self.with(|v| v.clone()) }
}

/// Mutable state cell. Writers hold a `Mut`; observers get a [`Read`].
pub struct Mut<T> {
    value: Arc<RwLock<T>>,
    broadcast: Broadcast<()>,
}

/// Read-only handle onto a [`Mut`]
pub struct Read<T> {
    value: Arc<RwLock<T>>,
    broadcast: Broadcast<()>,
}

impl<T> Mut<T> {
    pub fn new(value: T) -> Self { Self { value: Arc::new(RwLock::new(value)), broadcast: Broadcast::new() } }

    /// Replace the value and notify listeners. The write lock is released before listeners run.
    pub fn set(&self, value: T) {
        *self.value.write().unwrap() = value;
        self.broadcast.send(());
    }

    /// Modify the value in place and notify listeners
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let result = f(&mut *self.value.write().unwrap());
        self.broadcast.send(());
        result
    }

    /// Swap in a new value without notifying. Pair with [`Mut::notify`] once any surrounding lock is released.
    pub fn replace(&self, value: T) -> T { std::mem::replace(&mut *self.value.write().unwrap(), value) }

    pub fn notify(&self) { self.broadcast.send(()); }

    pub fn read(&self) -> Read<T> { Read { value: self.value.clone(), broadcast: self.broadcast.clone() } }
}

impl<T: PartialEq> Mut<T> {
    /// Like `set`, but stays silent when the value is unchanged. Returns whether it changed.
    pub fn set_if_changed(&self, value: T) -> bool {
        {
            let mut current = self.value.write().unwrap();
            if *current == value {
                return false;
            }
            *current = value;
        }
        self.broadcast.send(());
        true
    }
}

impl<T> With<T> for Mut<T> {
    fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R { f(&*self.value.read().unwrap()) }
}

impl<T> With<T> for Read<T> {
    fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R { f(&*self.value.read().unwrap()) }
}

impl<T> Signal for Mut<T> {
    fn listen(&self, listener: Arc<dyn Fn() + Send + Sync + 'static>) -> ListenerGuard {
        self.broadcast.listen(IntoListener::<()>::into_listener(listener))
    }

    fn broadcast_id(&self) -> BroadcastId { self.broadcast.id() }
}

impl<T> Signal for Read<T> {
    fn listen(&self, listener: Arc<dyn Fn() + Send + Sync + 'static>) -> ListenerGuard {
        self.broadcast.listen(IntoListener::<()>::into_listener(listener))
    }

    fn broadcast_id(&self) -> BroadcastId { self.broadcast.id() }
}

impl<T> Clone for Read<T> {
    fn clone(&self) -> Self { Self { value: self.value.clone(), broadcast: self.broadcast.clone() } }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Read<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { self.with(|v| f.debug_tuple("Read").field(v).finish()) }
}

impl<T: std::fmt::Display> std::fmt::Display for Read<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { self.with(|v| write!(f, "{}", v)) }
}

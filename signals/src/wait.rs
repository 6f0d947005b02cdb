use std::future::Future;
use std::sync::Arc;

use crate::signal::{Signal, With};

/// Decides whether `wait_for` is done: `Some(output)` stops, `None` keeps waiting
pub trait WaitResult {
    type Output;
    fn result(self) -> Option<Self::Output>;
}

impl WaitResult for bool {
    type Output = ();
    fn result(self) -> Option<Self::Output> { if self { Some(()) } else { None } }
}

impl<T> WaitResult for Option<T> {
    type Output = T;
    fn result(self) -> Option<Self::Output> { self }
}

/// Await a signal reaching a value
pub trait Wait<T> {
    fn wait_for<F, R>(&self, predicate: F) -> impl Future<Output = R::Output> + Send
    where
        F: Fn(&T) -> R + Send + Sync + 'static,
        R: WaitResult;
}

impl<S, T> Wait<T> for S
where S: Signal + With<T> + Sync
{
    fn wait_for<F, R>(&self, predicate: F) -> impl Future<Output = R::Output> + Send
    where
        F: Fn(&T) -> R + Send + Sync + 'static,
        R: WaitResult,
    {
        async move {
            // listen before checking, so a change between the check and the await is not lost
            let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<()>();
            let _guard = self.listen(Arc::new(move || {
                let _ = tx.send(());
            }));

            loop {
                if let Some(output) = self.with(|value| predicate(value).result()) {
                    return output;
                }
                if rx.recv().await.is_none() {
                    unreachable!("listener dropped while the guard is held");
                }
            }
        }
    }
}

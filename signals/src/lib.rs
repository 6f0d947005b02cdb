/*!
Broadcasts and observable state cells.

Writers and readers are different types: a [`Mut`] can be set, while the [`Read`] handed out by
[`Mut::read`] can only be observed. Listeners are removed when their guard is dropped.

```rust
use gather_signals::*;

let state = Mut::new(1u32);
let reader = state.read();
let _guard = reader.subscribe(|value: u32| println!("now {value}"));
state.set(2);
assert_eq!(reader.peek(), 2);
```
*/

pub mod broadcast;
pub mod signal;
pub mod subscribe;
#[cfg(feature = "tokio")]
pub mod wait;

pub use broadcast::{Broadcast, BroadcastId, ListenerGuard};
pub use signal::*;
pub use subscribe::*;
#[cfg(feature = "tokio")]
pub use wait::*;

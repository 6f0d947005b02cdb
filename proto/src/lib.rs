pub mod change;
pub mod error;
pub mod id;
pub mod order;
pub mod record;
pub mod table;

pub use change::*;
pub use error::*;
pub use id::*;
pub use order::*;
pub use record::*;
pub use table::*;

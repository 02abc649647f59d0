//! Domain layer for the session module.

pub mod clock;
pub mod storage;
pub mod store;
pub mod token;

pub use clock::{Clock, FixedClock, SystemClock};
pub use storage::{FileStorage, InMemoryStorage};
pub use store::SessionStore;

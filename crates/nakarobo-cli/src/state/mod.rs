pub mod storage;

pub use storage::{PendingLink, Storage};

//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Storage (LocalStorage on web, in-memory elsewhere)
//! - Timers (setTimeout on web, a manual virtual clock elsewhere)
//! - Wall-clock time

pub mod scheduler;
pub mod storage;
pub mod time;

pub use scheduler::{ManualScheduler, Scheduler, Task, TaskId};
pub use storage::{MemoryStorage, Storage, StorageError};

#[cfg(target_arch = "wasm32")]
pub use scheduler::BrowserScheduler;
#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorage;

//! Planner State - persistence for a browser-based curriculum planner
//!
//! Core modules:
//! - `model`: Live planning state (courses, modules, dependency graph)
//! - `codec`: Live object graph <-> flat, id-only durable record
//! - `state`: Observable containers the UI mutates
//! - `persistence`: Save/load/clear facade with debounced autosave
//! - `platform`: Browser/native abstraction (storage, timers, time)
//! - `settings`: Persistence tuning

pub mod codec;
pub mod model;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod state;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use persistence::{PersistenceError, StateManager};
pub use settings::Settings;
pub use state::{AppState, Store};

/// Persistence configuration constants
pub mod consts {
    /// Storage slot of the planner state
    pub const DEFAULT_STORAGE_KEY: &str = "degree-companion-state";
    /// Autosave debounce window (ms)
    pub const DEFAULT_SAVE_DEBOUNCE_MS: u32 = 1000;
    /// Autosave blackout after a reset (ms)
    pub const DEFAULT_REENABLE_DELAY_MS: u32 = 100;
}

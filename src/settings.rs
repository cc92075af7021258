//! Persistence settings
//!
//! Persisted separately from the planner state in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_REENABLE_DELAY_MS, DEFAULT_SAVE_DEBOUNCE_MS, DEFAULT_STORAGE_KEY};
use crate::platform::Storage;

/// Persistence tuning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Storage slot the planner state is written to
    pub storage_key: String,
    /// Quiet period before a burst of changes is written
    pub save_debounce_ms: u32,
    /// How long autosave stays off after a reset
    pub reenable_delay_ms: u32,
    /// Indent the stored JSON (handy when inspecting storage by hand)
    pub pretty_json: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            save_debounce_ms: DEFAULT_SAVE_DEBOUNCE_MS,
            reenable_delay_ms: DEFAULT_REENABLE_DELAY_MS,
            pretty_json: false,
        }
    }
}

impl Settings {
    /// Storage key of the settings themselves
    const STORAGE_KEY: &'static str = "planner_settings";

    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Load settings, falling back to defaults when missing or invalid
    pub fn load(storage: &dyn Storage) -> Self {
        match storage.get_item(Self::STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from storage");
                    return settings;
                }
                Err(e) => log::warn!("Ignoring invalid stored settings: {}", e),
            },
            Ok(None) => {}
            Err(e) => log::warn!("Could not read settings: {}", e),
        }

        log::info!("Using default settings");
        Self::default()
    }

    pub fn save(&self, storage: &dyn Storage) {
        match serde_json::to_string(self) {
            Ok(json) => match storage.set_item(Self::STORAGE_KEY, &json) {
                Ok(()) => log::info!("Settings saved"),
                Err(e) => log::error!("Failed to save settings: {}", e),
            },
            Err(e) => log::error!("Failed to serialize settings: {}", e),
        }
    }
}

//! JavaScript bindings (WASM only)
//!
//! The UI talks to the live state through JSON strings in the durable record
//! shape; references are rebuilt on the Rust side.

use wasm_bindgen::prelude::*;

use crate::codec::{
    FlatCurriculum, FlatGraph, decode_curriculum, decode_graph, encode_curriculum, encode_graph,
};
use crate::platform::{BrowserScheduler, LocalStorage};
use crate::{AppState, Settings, StateManager};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    // Already initialized when the module is instantiated twice
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Planner state module loaded");
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Persistence handle exposed to the front-end
#[wasm_bindgen]
pub struct PlannerPersistence {
    manager: StateManager,
}

#[wasm_bindgen]
impl PlannerPersistence {
    /// Open LocalStorage and wire autosave
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<PlannerPersistence, JsValue> {
        let storage = LocalStorage::open().map_err(js_error)?;
        let settings = Settings::load(&storage);
        let manager = StateManager::new(AppState::new(), storage, BrowserScheduler, settings);
        manager.init();
        Ok(Self { manager })
    }

    pub fn save(&self) {
        self.manager.save();
    }

    pub fn load(&self) -> bool {
        self.manager.load()
    }

    #[wasm_bindgen(js_name = hasState)]
    pub fn has_state(&self) -> bool {
        self.manager.has_state()
    }

    pub fn clear(&self) {
        self.manager.clear();
    }

    pub fn flush(&self) {
        self.manager.flush();
    }

    #[wasm_bindgen(js_name = storedTimestamp)]
    pub fn stored_timestamp(&self) -> Option<f64> {
        self.manager.stored_timestamp()
    }

    #[wasm_bindgen(getter, js_name = resetSignal)]
    pub fn reset_signal(&self) -> f64 {
        self.manager.state().reset_signal.get() as f64
    }

    /// Call `callback(count)` whenever the state is reset
    #[wasm_bindgen(js_name = onReset)]
    pub fn on_reset(&self, callback: js_sys::Function) {
        self.manager.state().reset_signal.subscribe(move |count| {
            if let Err(e) = callback.call1(&JsValue::NULL, &JsValue::from_f64(*count as f64)) {
                log::warn!("Reset callback failed: {:?}", e);
            }
        });
    }

    #[wasm_bindgen(js_name = curriculumJson)]
    pub fn curriculum_json(&self) -> Result<String, JsValue> {
        let flat = self.manager.state().curriculum.with(encode_curriculum);
        serde_json::to_string(&flat).map_err(js_error)
    }

    #[wasm_bindgen(js_name = setCurriculumJson)]
    pub fn set_curriculum_json(&self, json: &str) -> Result<(), JsValue> {
        let flat: FlatCurriculum = serde_json::from_str(json).map_err(js_error)?;
        self.manager.state().curriculum.set(decode_curriculum(&flat));
        Ok(())
    }

    #[wasm_bindgen(js_name = graphJson)]
    pub fn graph_json(&self) -> Result<String, JsValue> {
        let flat = self.manager.state().graph.with(encode_graph);
        serde_json::to_string(&flat).map_err(js_error)
    }

    /// Course references resolve against the current curriculum
    #[wasm_bindgen(js_name = setGraphJson)]
    pub fn set_graph_json(&self, json: &str) -> Result<(), JsValue> {
        let flat: FlatGraph = serde_json::from_str(json).map_err(js_error)?;
        let state = self.manager.state();
        let graph = state.curriculum.with(|c| decode_graph(&flat, c));
        state.graph.set(graph);
        Ok(())
    }

    #[wasm_bindgen(js_name = csvJson)]
    pub fn csv_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.manager.state().csv.get()).map_err(js_error)
    }

    #[wasm_bindgen(js_name = setCsvJson)]
    pub fn set_csv_json(&self, json: &str) -> Result<(), JsValue> {
        let csv: serde_json::Value = serde_json::from_str(json).map_err(js_error)?;
        self.manager.state().csv.set(csv);
        Ok(())
    }
}

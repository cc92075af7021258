//! Save/load of the planner state
//!
//! Features:
//! - Single JSON record under one storage key
//! - Debounced autosave driven by state change notifications
//! - Reset with a short autosave blackout so the reset itself isn't saved
//!
//! The plain methods never return an error to the UI: failures are logged and
//! turned into `false` (load) or ignored (save, clear). The `try_*` variants
//! hand the error back. A failed load leaves the live state untouched.

pub mod error;

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use log::{debug, error, info, warn};

use crate::codec::record::StoredHeader;
use crate::codec::{
    StoredState, decode_curriculum, decode_graph, encode_curriculum, encode_graph,
};
use crate::platform::{Scheduler, Storage, TaskId, time};
use crate::settings::Settings;
use crate::state::{AppState, SubscriptionId};

pub use error::PersistenceError;

/// Persistence facade over the live [`AppState`].
///
/// Cheap to clone; clones drive the same state, storage and timers.
#[derive(Clone)]
pub struct StateManager {
    inner: Rc<Inner>,
}

struct Inner {
    state: AppState,
    storage: Box<dyn Storage>,
    scheduler: Box<dyn Scheduler>,
    settings: Settings,
    auto_save: Cell<bool>,
    pending_save: Cell<Option<TaskId>>,
    pending_reenable: Cell<Option<TaskId>>,
    subscriptions: RefCell<Option<Subscriptions>>,
}

struct Subscriptions {
    curriculum: SubscriptionId,
    graph: SubscriptionId,
    csv: SubscriptionId,
}

impl StateManager {
    pub fn new(
        state: AppState,
        storage: impl Storage + 'static,
        scheduler: impl Scheduler + 'static,
        settings: Settings,
    ) -> Self {
        Self {
            inner: Rc::new(Inner {
                state,
                storage: Box::new(storage),
                scheduler: Box::new(scheduler),
                settings,
                auto_save: Cell::new(true),
                pending_save: Cell::new(None),
                pending_reenable: Cell::new(None),
                subscriptions: RefCell::new(None),
            }),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.inner.state
    }

    pub fn settings(&self) -> &Settings {
        &self.inner.settings
    }

    pub fn auto_save_enabled(&self) -> bool {
        self.inner.auto_save.get()
    }

    pub fn has_pending_save(&self) -> bool {
        self.inner.pending_save.get().is_some()
    }

    /// Wire change notifications of curriculum, graph and csv to a debounced
    /// save. Calling it again is a no-op.
    pub fn init(&self) {
        if self.inner.subscriptions.borrow().is_some() {
            return;
        }

        let state = &self.inner.state;
        let subscriptions = Subscriptions {
            curriculum: state.curriculum.subscribe(self.change_listener()),
            graph: state.graph.subscribe(self.change_listener()),
            csv: state.csv.subscribe(self.change_listener()),
        };
        *self.inner.subscriptions.borrow_mut() = Some(subscriptions);
        debug!("Autosave wired to state changes");
    }

    fn change_listener<T: 'static>(&self) -> impl Fn(&T) + 'static {
        let weak = Rc::downgrade(&self.inner);
        move |_: &T| {
            if let Some(inner) = weak.upgrade() {
                inner.schedule_save();
            }
        }
    }

    /// Write the current state unless autosave is disabled
    pub fn save(&self) {
        self.inner.save();
    }

    /// Write the current state, reporting failures. Ignores the autosave flag.
    pub fn try_save(&self) -> Result<(), PersistenceError> {
        self.inner.try_save()
    }

    /// Replace the live state with the stored one.
    ///
    /// Returns false when nothing is stored or the record is unusable.
    pub fn load(&self) -> bool {
        match self.inner.try_load() {
            Ok(loaded) => loaded,
            Err(e) => {
                error!("Failed to load state: {}", e);
                false
            }
        }
    }

    pub fn try_load(&self) -> Result<bool, PersistenceError> {
        self.inner.try_load()
    }

    pub fn has_state(&self) -> bool {
        match self.inner.storage.get_item(&self.inner.settings.storage_key) {
            Ok(item) => item.is_some(),
            Err(e) => {
                warn!("Could not check for stored state: {}", e);
                false
            }
        }
    }

    /// Write time of the stored record, without decoding it
    pub fn stored_timestamp(&self) -> Option<f64> {
        let json = self
            .inner
            .storage
            .get_item(&self.inner.settings.storage_key)
            .ok()??;
        serde_json::from_str::<StoredHeader>(&json).ok()?.timestamp
    }

    /// Delete the stored state and reset every container to its default
    pub fn clear(&self) {
        self.inner.clear();
    }

    /// Run a pending debounced save right away (e.g. before unload)
    pub fn flush(&self) {
        if let Some(id) = self.inner.pending_save.take() {
            self.inner.scheduler.cancel(id);
            self.inner.save();
        }
    }
}

impl Inner {
    fn schedule_save(self: &Rc<Self>) {
        if !self.auto_save.get() {
            return;
        }
        if let Some(id) = self.pending_save.take() {
            self.scheduler.cancel(id);
        }

        let weak: Weak<Inner> = Rc::downgrade(self);
        let id = self.scheduler.schedule(
            self.settings.save_debounce_ms,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.pending_save.set(None);
                    inner.save();
                }
            }),
        );
        if id.is_none() {
            warn!("Could not schedule autosave");
        }
        self.pending_save.set(id);
    }

    fn save(&self) {
        if !self.auto_save.get() {
            debug!("Autosave disabled, skipping save");
            return;
        }
        if let Err(e) = self.try_save() {
            error!("Failed to save state: {}", e);
        }
    }

    fn snapshot(&self) -> StoredState {
        StoredState {
            curriculum: self.state.curriculum.with(encode_curriculum),
            graph: self.state.graph.with(encode_graph),
            csv: self.state.csv.get(),
            timestamp: time::now_ms(),
        }
    }

    fn try_save(&self) -> Result<(), PersistenceError> {
        let record = self.snapshot();
        let json = if self.settings.pretty_json {
            serde_json::to_string_pretty(&record)
        } else {
            serde_json::to_string(&record)
        }
        .map_err(PersistenceError::Serialize)?;

        self.storage.set_item(&self.settings.storage_key, &json)?;
        info!(
            "State saved ({} courses, {} nodes, {} bytes)",
            record.curriculum.courses.len(),
            record.graph.nodes.len(),
            json.len()
        );
        Ok(())
    }

    fn try_load(&self) -> Result<bool, PersistenceError> {
        let Some(json) = self.storage.get_item(&self.settings.storage_key)? else {
            info!("No saved state found");
            return Ok(false);
        };

        let record: StoredState = serde_json::from_str(&json).map_err(PersistenceError::Parse)?;

        // Decode everything before touching live state
        let curriculum = decode_curriculum(&record.curriculum);
        let graph = decode_graph(&record.graph, &curriculum);
        let course_count = curriculum.courses.len();
        let planned = curriculum.planned_credits();

        self.state.curriculum.set(curriculum);
        self.state.graph.set(graph);
        self.state.csv.set(record.csv);

        info!(
            "Loaded saved state ({} courses, {} credits planned)",
            course_count, planned
        );
        Ok(true)
    }

    fn clear(self: &Rc<Self>) {
        self.auto_save.set(false);
        if let Some(id) = self.pending_save.take() {
            self.scheduler.cancel(id);
        }
        if let Some(id) = self.pending_reenable.take() {
            self.scheduler.cancel(id);
        }

        match self.try_clear() {
            Ok(()) => self.schedule_reenable(),
            Err(e) => {
                error!("Failed to clear state: {}", e);
                self.auto_save.set(true);
            }
        }
    }

    fn try_clear(&self) -> Result<(), PersistenceError> {
        self.storage.remove_item(&self.settings.storage_key)?;
        self.state.reset();
        info!("Saved state cleared");
        Ok(())
    }

    fn schedule_reenable(self: &Rc<Self>) {
        let weak: Weak<Inner> = Rc::downgrade(self);
        let id = self.scheduler.schedule(
            self.settings.reenable_delay_ms,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.pending_reenable.set(None);
                    inner.auto_save.set(true);
                    debug!("Autosave re-enabled");
                }
            }),
        );
        match id {
            Some(id) => self.pending_reenable.set(Some(id)),
            None => self.auto_save.set(true),
        }
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        if let Some(subs) = self.subscriptions.get_mut().take() {
            self.state.curriculum.unsubscribe(subs.curriculum);
            self.state.graph.unsubscribe(subs.graph);
            self.state.csv.unsubscribe(subs.csv);
        }
        for id in [self.pending_save.get(), self.pending_reenable.get()]
            .into_iter()
            .flatten()
        {
            self.scheduler.cancel(id);
        }
    }
}

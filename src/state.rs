//! Live state containers
//!
//! The UI owns these and mutates them in place. Persistence only reads them,
//! replaces them wholesale on load, and listens for changes.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde_json::Value;

use crate::model::{Curriculum, Graph};

/// Handle returned by [`Store::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber<T> = Rc<dyn Fn(&T)>;

/// Observable value container.
///
/// Cloning the store clones the handle, not the value. Subscribers run after
/// every `set`/`update` with the new value; they must not write back to the
/// store that is notifying them.
pub struct Store<T> {
    value: Rc<RefCell<T>>,
    subscribers: Rc<RefCell<Vec<(SubscriptionId, Subscriber<T>)>>>,
    next_id: Rc<Cell<u64>>,
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            value: Rc::clone(&self.value),
            subscribers: Rc::clone(&self.subscribers),
            next_id: Rc::clone(&self.next_id),
        }
    }
}

impl<T: Default> Default for Store<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> Store<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: Rc::new(RefCell::new(value)),
            subscribers: Rc::new(RefCell::new(Vec::new())),
            next_id: Rc::new(Cell::new(0)),
        }
    }

    /// Read the value without cloning it
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&*self.value.borrow())
    }

    /// Replace the value and notify subscribers
    pub fn set(&self, value: T) {
        *self.value.borrow_mut() = value;
        self.notify();
    }

    /// Mutate in place and notify subscribers
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        f(&mut *self.value.borrow_mut());
        self.notify();
    }

    pub fn subscribe(&self, f: impl Fn(&T) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.subscribers.borrow_mut().push((id, Rc::new(f)));
        id
    }

    /// Returns false if the subscription was already gone
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.borrow_mut();
        let before = subscribers.len();
        subscribers.retain(|(sid, _)| *sid != id);
        subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }

    fn notify(&self) {
        // Snapshot so subscribers may (un)subscribe while being notified
        let subscribers: Vec<Subscriber<T>> = self
            .subscribers
            .borrow()
            .iter()
            .map(|(_, s)| Rc::clone(s))
            .collect();
        let value = self.value.borrow();
        for subscriber in subscribers {
            subscriber(&*value);
        }
    }
}

impl<T: Clone> Store<T> {
    pub fn get(&self) -> T {
        self.value.borrow().clone()
    }
}

/// Every container the planner UI works on
#[derive(Clone, Default)]
pub struct AppState {
    pub curriculum: Store<Curriculum>,
    pub graph: Store<Graph>,
    /// Raw CSV import, opaque to persistence
    pub csv: Store<Value>,
    /// Bumped on every reset so the UI can re-key its components
    pub reset_signal: Store<u64>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put every container back to its empty default
    pub fn reset(&self) {
        self.curriculum.set(Curriculum::default());
        self.graph.set(Graph::default());
        self.csv.set(Value::Null);
        self.reset_signal.update(|n| *n += 1);
    }
}

//! Deferred tasks (debounce timers)

use std::cell::RefCell;
use std::rc::Rc;

/// A deferred unit of work
pub type Task = Box<dyn FnOnce()>;

/// Handle for cancelling a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(pub u64);

/// setTimeout/clearTimeout-shaped timer service
pub trait Scheduler {
    /// Run `task` once after `delay_ms`. Returns None if the platform refused.
    fn schedule(&self, delay_ms: u32, task: Task) -> Option<TaskId>;
    /// Cancel a task that has not run yet. Unknown ids are ignored.
    fn cancel(&self, id: TaskId);
}

impl<S: Scheduler + ?Sized> Scheduler for Rc<S> {
    fn schedule(&self, delay_ms: u32, task: Task) -> Option<TaskId> {
        (**self).schedule(delay_ms, task)
    }

    fn cancel(&self, id: TaskId) {
        (**self).cancel(id)
    }
}

struct Pending {
    id: TaskId,
    due_ms: u64,
    task: Task,
}

#[derive(Default)]
struct Clock {
    now_ms: u64,
    next_id: u64,
    queue: Vec<Pending>,
}

/// Virtual-time scheduler: nothing runs until the clock is advanced.
///
/// Clones share the same clock and queue. Tasks due at the same time run in
/// scheduling order.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    clock: Rc<RefCell<Clock>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.borrow().now_ms
    }

    pub fn pending(&self) -> usize {
        self.clock.borrow().queue.len()
    }

    /// Move the clock forward, running every task that falls due on the way.
    /// Tasks scheduled by running tasks are honored if they fall in the window.
    pub fn advance(&self, ms: u64) -> usize {
        let target = self.clock.borrow().now_ms + ms;
        let mut ran = 0;
        while let Some(task) = self.pop_due(target) {
            task();
            ran += 1;
        }
        self.clock.borrow_mut().now_ms = target;
        ran
    }

    /// Advance until the queue is empty
    pub fn run_until_idle(&self) -> usize {
        let mut ran = 0;
        loop {
            let next_due = self.clock.borrow().queue.iter().map(|p| p.due_ms).min();
            let Some(due) = next_due else {
                return ran;
            };
            let now = self.now_ms();
            ran += self.advance(due.saturating_sub(now));
        }
    }

    fn pop_due(&self, target: u64) -> Option<Task> {
        let mut clock = self.clock.borrow_mut();
        let (pos, _) = clock
            .queue
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due_ms <= target)
            .min_by_key(|(_, p)| (p.due_ms, p.id.0))?;
        let pending = clock.queue.remove(pos);
        clock.now_ms = pending.due_ms;
        Some(pending.task)
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay_ms: u32, task: Task) -> Option<TaskId> {
        let mut clock = self.clock.borrow_mut();
        let id = TaskId(clock.next_id);
        clock.next_id += 1;
        let due_ms = clock.now_ms + u64::from(delay_ms);
        clock.queue.push(Pending { id, due_ms, task });
        Some(id)
    }

    fn cancel(&self, id: TaskId) {
        self.clock.borrow_mut().queue.retain(|p| p.id != id);
    }
}

/// window.setTimeout (WASM only)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserScheduler;

#[cfg(target_arch = "wasm32")]
impl Scheduler for BrowserScheduler {
    fn schedule(&self, delay_ms: u32, task: Task) -> Option<TaskId> {
        use wasm_bindgen::JsCast;
        use wasm_bindgen::closure::Closure;

        let window = web_sys::window()?;
        // Frees itself once called; a cancelled callback is leaked
        let callback = Closure::once_into_js(move || task());
        match window.set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.unchecked_ref(),
            delay_ms.min(i32::MAX as u32) as i32,
        ) {
            Ok(handle) => Some(TaskId(handle as u64)),
            Err(e) => {
                log::error!("setTimeout failed: {:?}", e);
                None
            }
        }
    }

    fn cancel(&self, id: TaskId) {
        if let Some(window) = web_sys::window() {
            window.clear_timeout_with_handle(id.0 as i32);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn recorder() -> (Rc<RefCell<Vec<&'static str>>>, impl Fn(&'static str) -> Task) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let handle = log.clone();
        let make = move |name: &'static str| -> Task {
            let log = handle.clone();
            Box::new(move || log.borrow_mut().push(name))
        };
        (log, make)
    }

    #[test]
    fn test_tasks_run_when_due_in_order() {
        let scheduler = ManualScheduler::new();
        let (log, task) = recorder();

        scheduler.schedule(100, task("late"));
        scheduler.schedule(10, task("early"));
        scheduler.schedule(10, task("early-2"));

        assert_eq!(scheduler.advance(9), 0);
        assert_eq!(scheduler.advance(1), 2);
        assert_eq!(*log.borrow(), vec!["early", "early-2"]);

        assert_eq!(scheduler.advance(1000), 1);
        assert_eq!(scheduler.now_ms(), 1010);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_cancel() {
        let scheduler = ManualScheduler::new();
        let (log, task) = recorder();

        let id = scheduler.schedule(5, task("cancelled")).unwrap();
        scheduler.schedule(5, task("kept"));
        scheduler.cancel(id);
        scheduler.cancel(id);

        scheduler.advance(5);
        assert_eq!(*log.borrow(), vec!["kept"]);
    }

    #[test]
    fn test_task_can_schedule_followup() {
        let scheduler = ManualScheduler::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let inner_scheduler = scheduler.clone();
        let inner_log = log.clone();
        scheduler.schedule(
            10,
            Box::new(move || {
                inner_log.borrow_mut().push(inner_scheduler.now_ms());
                let log = inner_log.clone();
                inner_scheduler.schedule(10, Box::new(move || log.borrow_mut().push(99)));
            }),
        );

        assert_eq!(scheduler.run_until_idle(), 2);
        assert_eq!(*log.borrow(), vec![10, 99]);
        assert_eq!(scheduler.now_ms(), 20);
    }
}

//! Scheduler backed by browser timers
//!
//! `Every` maps to `setInterval`, one-shot tasks to `setTimeout` and `Frame`
//! to a self-rescheduling `requestAnimationFrame` chain. Fired tasks go to a
//! single dispatch function that owns the round.

use game_core::scheduler::{Cadence, Scheduler, Task, TaskId};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Window;

/// Receives every fired task with its timestamp (performance clock, ms)
pub type Dispatch = Rc<dyn Fn(TaskId, Task, f64)>;

type FrameSlot = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

enum Timer {
    Interval {
        handle: i32,
        callback: Closure<dyn FnMut()>,
    },
    Timeout {
        handle: i32,
        callback: Closure<dyn FnMut()>,
    },
    Frame {
        handle: Rc<Cell<i32>>,
        slot: FrameSlot,
    },
}

/// A cancelled callback may still be on the stack (a task cancelling itself),
/// so it is parked here and dropped at the start of the next callback.
enum Retired {
    Callback(Closure<dyn FnMut()>),
    Frame(Closure<dyn FnMut(f64)>),
}

thread_local! {
    static RETIRED: RefCell<Vec<Retired>> = RefCell::new(Vec::new());
}

fn retire(closure: Retired) {
    RETIRED.with(|r| r.borrow_mut().push(closure));
}

fn drain_retired() {
    let dead = RETIRED.with(|r| std::mem::take(&mut *r.borrow_mut()));
    drop(dead);
}

fn stop(window: &Window, timer: Timer) {
    match timer {
        Timer::Interval { handle, callback } => {
            window.clear_interval_with_handle(handle);
            retire(Retired::Callback(callback));
        }
        Timer::Timeout { handle, callback } => {
            window.clear_timeout_with_handle(handle);
            retire(Retired::Callback(callback));
        }
        Timer::Frame { handle, slot } => {
            if let Err(err) = window.cancel_animation_frame(handle.get()) {
                log::warn!("Scheduler: cancelAnimationFrame failed: {err:?}");
            }
            // Emptying the slot also stops the chain from re-requesting
            if let Some(callback) = slot.borrow_mut().take() {
                retire(Retired::Frame(callback));
            }
        }
    }
}

pub struct BrowserScheduler {
    window: Window,
    dispatch: Dispatch,
    next_id: u32,
    timers: HashMap<TaskId, Timer>,
}

impl BrowserScheduler {
    pub fn new(window: Window, dispatch: Dispatch) -> Self {
        Self {
            window,
            dispatch,
            next_id: 1,
            timers: HashMap::new(),
        }
    }

    /// Called by the dispatcher before handling `id`; spent timeouts are released.
    pub fn fired(&mut self, id: TaskId) {
        if matches!(self.timers.get(&id), Some(Timer::Timeout { .. })) {
            if let Some(timer) = self.timers.remove(&id) {
                stop(&self.window, timer);
            }
        }
    }

    fn allocate(&mut self) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    fn callback(&self, id: TaskId, task: Task) -> Closure<dyn FnMut()> {
        let dispatch = self.dispatch.clone();
        let performance = self.window.performance();
        Closure::wrap(Box::new(move || {
            drain_retired();
            let now = performance.as_ref().map(|p| p.now()).unwrap_or(0.0);
            dispatch(id, task, now);
        }) as Box<dyn FnMut()>)
    }

    fn start_frames(&self, id: TaskId, task: Task) -> Option<Timer> {
        let slot: FrameSlot = Rc::new(RefCell::new(None));
        let handle = Rc::new(Cell::new(0));

        let next = slot.clone();
        let next_handle = handle.clone();
        let window = self.window.clone();
        let dispatch = self.dispatch.clone();
        *slot.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
            drain_retired();
            dispatch(id, task, ts);
            if let Some(callback) = next.borrow().as_ref() {
                match window.request_animation_frame(callback.as_ref().unchecked_ref()) {
                    Ok(h) => next_handle.set(h),
                    Err(err) => log::error!("Scheduler: requestAnimationFrame failed: {err:?}"),
                }
            }
        }) as Box<dyn FnMut(f64)>));

        let first = slot
            .borrow()
            .as_ref()
            .map(|callback| self.window.request_animation_frame(callback.as_ref().unchecked_ref()));
        match first {
            Some(Ok(h)) => {
                handle.set(h);
                Some(Timer::Frame { handle, slot })
            }
            Some(Err(err)) => {
                log::error!("Scheduler: requestAnimationFrame failed for {task:?}: {err:?}");
                slot.borrow_mut().take();
                None
            }
            None => None,
        }
    }

    fn start_interval(&self, id: TaskId, task: Task, period_ms: f64) -> Option<Timer> {
        let callback = self.callback(id, task);
        match self
            .window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                period_ms.round() as i32,
            ) {
            Ok(handle) => Some(Timer::Interval { handle, callback }),
            Err(err) => {
                log::error!("Scheduler: setInterval failed for {task:?}: {err:?}");
                None
            }
        }
    }
}

impl Scheduler for BrowserScheduler {
    fn repeat(&mut self, task: Task, cadence: Cadence) -> TaskId {
        let id = self.allocate();
        let timer = match cadence {
            Cadence::Frame => self.start_frames(id, task),
            Cadence::Every(period_ms) => self.start_interval(id, task, period_ms),
        };
        if let Some(timer) = timer {
            self.timers.insert(id, timer);
        }
        id
    }

    fn once(&mut self, task: Task, delay_ms: f64) -> TaskId {
        let id = self.allocate();
        let callback = self.callback(id, task);
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                delay_ms.round() as i32,
            ) {
            Ok(handle) => {
                self.timers.insert(id, Timer::Timeout { handle, callback });
            }
            Err(err) => log::error!("Scheduler: setTimeout failed for {task:?}: {err:?}"),
        }
        id
    }

    fn cancel(&mut self, id: TaskId) {
        if let Some(timer) = self.timers.remove(&id) {
            stop(&self.window, timer);
        }
    }
}

impl Drop for BrowserScheduler {
    fn drop(&mut self) {
        for (_, timer) in self.timers.drain() {
            stop(&self.window, timer);
        }
    }
}

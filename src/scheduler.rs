//! Cooperative single-threaded scheduling.
//!
//! Everything the engine animates is driven by callbacks handed to a
//! [`Scheduler`]: timers for the headline scramble, frame requests for the
//! wave and the outline morph. The browser build implements it on top of
//! `setTimeout`/`requestAnimationFrame`; [`ManualScheduler`] is a virtual
//! clock used by tests and headless runs.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::handle::AnimationHandle;

pub type TimerCallback = Box<dyn FnOnce()>;
/// Receives the frame timestamp in milliseconds.
pub type FrameCallback = Box<dyn FnOnce(f64)>;

pub trait Scheduler {
    fn set_timeout(&self, delay_ms: u32, callback: TimerCallback) -> AnimationHandle;
    fn request_frame(&self, callback: FrameCallback) -> AnimationHandle;
}

struct PendingTimer {
    id: u64,
    due: f64,
    callback: TimerCallback,
}

struct PendingFrame {
    id: u64,
    callback: FrameCallback,
}

#[derive(Default)]
struct ManualQueue {
    now: f64,
    next_id: u64,
    timers: Vec<PendingTimer>,
    frames: Vec<PendingFrame>,
    timers_fired: u64,
    frames_fired: u64,
}

impl ManualQueue {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn take_due_timer(&mut self, until: f64) -> Option<PendingTimer> {
        let idx = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= until)
            .min_by(|(_, a), (_, b)| a.due.total_cmp(&b.due).then(a.id.cmp(&b.id)))
            .map(|(idx, _)| idx)?;
        Some(self.timers.remove(idx))
    }
}

/// Deterministic virtual clock.
///
/// Nothing runs until the test advances time. Timers fire in due order
/// (ties in scheduling order); frame requests made during a tick are served
/// on the next tick, like the browser does.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    queue: Rc<RefCell<ManualQueue>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> f64 {
        self.queue.borrow().now
    }

    /// Moves the clock forward, running every timer that falls due.
    pub fn advance(&self, ms: f64) {
        let until = self.now() + ms;
        loop {
            let next = self.queue.borrow_mut().take_due_timer(until);
            let Some(timer) = next else { break };
            {
                let mut queue = self.queue.borrow_mut();
                queue.now = queue.now.max(timer.due);
                queue.timers_fired += 1;
            }
            (timer.callback)();
        }
        let mut queue = self.queue.borrow_mut();
        queue.now = queue.now.max(until);
    }

    /// Advances the clock by `dt` ms (running due timers) and then serves
    /// every frame request that was pending before the tick.
    pub fn tick_frame(&self, dt: f64) {
        self.advance(dt);
        let frames = std::mem::take(&mut self.queue.borrow_mut().frames);
        let now = self.now();
        for frame in frames {
            self.queue.borrow_mut().frames_fired += 1;
            (frame.callback)(now);
        }
    }

    /// Runs timers until none are left, bounded by `max_ms` of virtual time.
    pub fn run_timers(&self, max_ms: f64) {
        let deadline = self.now() + max_ms;
        loop {
            let next_due = self
                .queue
                .borrow()
                .timers
                .iter()
                .map(|t| t.due)
                .min_by(f64::total_cmp);
            match next_due {
                Some(due) if due <= deadline => self.advance(due - self.now()),
                _ => break,
            }
        }
    }

    pub fn pending_timers(&self) -> usize {
        self.queue.borrow().timers.len()
    }

    pub fn pending_frames(&self) -> usize {
        self.queue.borrow().frames.len()
    }

    pub fn timers_fired(&self) -> u64 {
        self.queue.borrow().timers_fired
    }

    pub fn frames_fired(&self) -> u64 {
        self.queue.borrow().frames_fired
    }

    fn cancel_timer(queue: &Weak<RefCell<ManualQueue>>, id: u64) {
        let Some(queue) = queue.upgrade() else { return };
        // The callback may own the last reference to whatever scheduled it;
        // drop it only after the queue borrow is released.
        let removed = {
            let mut queue = queue.borrow_mut();
            queue.timers.iter().position(|t| t.id == id).map(|idx| queue.timers.remove(idx))
        };
        drop(removed);
    }

    fn cancel_frame(queue: &Weak<RefCell<ManualQueue>>, id: u64) {
        let Some(queue) = queue.upgrade() else { return };
        let removed = {
            let mut queue = queue.borrow_mut();
            queue.frames.iter().position(|f| f.id == id).map(|idx| queue.frames.remove(idx))
        };
        drop(removed);
    }
}

impl Scheduler for ManualScheduler {
    fn set_timeout(&self, delay_ms: u32, callback: TimerCallback) -> AnimationHandle {
        let id = {
            let mut queue = self.queue.borrow_mut();
            let id = queue.next_id();
            let due = queue.now + f64::from(delay_ms);
            queue.timers.push(PendingTimer { id, due, callback });
            id
        };
        let queue = Rc::downgrade(&self.queue);
        AnimationHandle::new(move || Self::cancel_timer(&queue, id))
    }

    fn request_frame(&self, callback: FrameCallback) -> AnimationHandle {
        let id = {
            let mut queue = self.queue.borrow_mut();
            let id = queue.next_id();
            queue.frames.push(PendingFrame { id, callback });
            id
        };
        let queue = Rc::downgrade(&self.queue);
        AnimationHandle::new(move || Self::cancel_frame(&queue, id))
    }
}

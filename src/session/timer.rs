//! Idle Timer
//!
//! A [`Scheduler`] runs a one-shot callback after a delay and hands back a
//! cancellable [`TimerHandle`]. [`IdleTimer`] owns at most one handle and a
//! generation counter so a firing from a replaced timer can be recognised.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

/// Cancels a scheduled callback
pub trait TimerHandle {
    /// Cancel the callback if it has not run yet. Idempotent.
    fn cancel(&mut self);
}

/// Schedules one-shot callbacks on the current thread
pub trait Scheduler {
    type Handle: TimerHandle;

    fn schedule(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> Self::Handle;
}

/// The session's single idle timer slot
#[derive(Debug)]
pub struct IdleTimer<H: TimerHandle> {
    handle: Option<H>,
    generation: u64,
}

impl<H: TimerHandle> Default for IdleTimer<H> {
    fn default() -> Self {
        Self {
            handle: None,
            generation: 0,
        }
    }
}

impl<H: TimerHandle> IdleTimer<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_armed(&self) -> bool {
        self.handle.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.handle.is_some() && self.generation == generation
    }

    /// Cancel whatever is armed and reserve the generation for the next handle
    pub fn begin_arm(&mut self) -> u64 {
        self.disarm();
        self.generation
    }

    pub fn set_handle(&mut self, handle: H) {
        if let Some(mut previous) = self.handle.replace(handle) {
            previous.cancel();
        }
    }

    /// Cancel the armed timer. Returns whether one was armed.
    pub fn disarm(&mut self) -> bool {
        self.generation = self.generation.wrapping_add(1);
        match self.handle.take() {
            Some(mut handle) => {
                handle.cancel();
                true
            }
            None => false,
        }
    }
}

impl<H: TimerHandle> Drop for IdleTimer<H> {
    fn drop(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            handle.cancel();
        }
    }
}

// ============================================
// Manual scheduler
// ============================================

struct PendingTimer {
    id: u64,
    due: Duration,
    callback: Box<dyn FnOnce()>,
}

#[derive(Default)]
struct ManualClock {
    now: Duration,
    next_id: u64,
    pending: Vec<PendingTimer>,
}

/// Virtual clock that only moves when told to. Callbacks run from
/// [`ManualScheduler::advance`] in due order.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    clock: Rc<RefCell<ManualClock>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.clock.borrow().now
    }

    pub fn pending_count(&self) -> usize {
        self.clock.borrow().pending.len()
    }

    /// Move the clock forward, running every callback that comes due
    pub fn advance(&self, by: Duration) {
        let target = self.clock.borrow().now + by;
        loop {
            let next = {
                let mut clock = self.clock.borrow_mut();
                let due_index = clock
                    .pending
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.due <= target)
                    .min_by_key(|(_, t)| (t.due, t.id))
                    .map(|(i, _)| i);
                due_index.map(|i| {
                    let timer = clock.pending.remove(i);
                    clock.now = timer.due;
                    timer.callback
                })
            };
            match next {
                Some(callback) => callback(),
                None => break,
            }
        }
        self.clock.borrow_mut().now = target;
    }
}

impl Scheduler for ManualScheduler {
    type Handle = ManualTimerHandle;

    fn schedule(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> ManualTimerHandle {
        let mut clock = self.clock.borrow_mut();
        let id = clock.next_id;
        clock.next_id += 1;
        let due = clock.now + delay;
        clock.pending.push(PendingTimer { id, due, callback });
        ManualTimerHandle {
            id,
            clock: Rc::downgrade(&self.clock),
        }
    }
}

/// Handle into a [`ManualScheduler`]
pub struct ManualTimerHandle {
    id: u64,
    clock: Weak<RefCell<ManualClock>>,
}

impl TimerHandle for ManualTimerHandle {
    fn cancel(&mut self) {
        if let Some(clock) = self.clock.upgrade() {
            clock.borrow_mut().pending.retain(|t| t.id != self.id);
        }
    }
}

//! Browser Timers
//!
//! [`Scheduler`] backed by `setTimeout` through `gloo-timers`.

use std::time::Duration;

use bi_tool::session::{Scheduler, TimerHandle};
use gloo_timers::callback::Timeout;

#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserScheduler;

impl Scheduler for BrowserScheduler {
    type Handle = BrowserTimerHandle;

    fn schedule(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> BrowserTimerHandle {
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        BrowserTimerHandle {
            timeout: Some(Timeout::new(millis, callback)),
        }
    }
}

/// Dropping a `Timeout` clears it
pub struct BrowserTimerHandle {
    timeout: Option<Timeout>,
}

impl TimerHandle for BrowserTimerHandle {
    fn cancel(&mut self) {
        if let Some(timeout) = self.timeout.take() {
            timeout.cancel();
        }
    }
}

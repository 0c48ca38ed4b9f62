//! Tokio-backed scheduler
//!
//! Timers are `spawn_local` tasks, so callers must be inside a
//! [`tokio::task::LocalSet`].

use std::time::Duration;

use tokio::task::JoinHandle;

use super::timer::{Scheduler, TimerHandle};

#[derive(Debug, Clone, Copy, Default)]
pub struct TokioScheduler;

impl TokioScheduler {
    pub fn new() -> Self {
        Self
    }
}

impl Scheduler for TokioScheduler {
    type Handle = TokioTimerHandle;

    fn schedule(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TokioTimerHandle {
        let task = tokio::task::spawn_local(async move {
            tokio::time::sleep(delay).await;
            callback();
        });
        TokioTimerHandle { task: Some(task) }
    }
}

/// Aborts the timer task on cancel or drop
#[derive(Debug)]
pub struct TokioTimerHandle {
    task: Option<JoinHandle<()>>,
}

impl TimerHandle for TokioTimerHandle {
    fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for TokioTimerHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;
    use tokio::task::LocalSet;

    #[tokio::test(start_paused = true)]
    async fn test_fires_after_delay() {
        LocalSet::new()
            .run_until(async {
                let fired = Rc::new(Cell::new(false));
                let f = fired.clone();
                let _handle = TokioScheduler::new()
                    .schedule(Duration::from_secs(60), Box::new(move || f.set(true)));

                tokio::time::sleep(Duration::from_secs(59)).await;
                assert!(!fired.get());
                tokio::time::sleep(Duration::from_secs(2)).await;
                assert!(fired.get());
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_firing() {
        LocalSet::new()
            .run_until(async {
                let fired = Rc::new(Cell::new(false));
                let f = fired.clone();
                let mut handle = TokioScheduler::new()
                    .schedule(Duration::from_secs(1), Box::new(move || f.set(true)));
                handle.cancel();

                tokio::time::sleep(Duration::from_secs(5)).await;
                assert!(!fired.get());
            })
            .await;
    }
}

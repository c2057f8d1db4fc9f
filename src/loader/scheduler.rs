use std::{
    sync::{Condvar, Mutex},
    time::Duration,
};

/// Decides when the loader worker may start its next background batch.
///
/// Called on the worker thread between batches, never between slot 0 and its settlement.
pub trait IdleScheduler: Send + Sync {
    /// Block until the host is idle enough to accept more background work.
    fn yield_to_idle(&self);
}

/// Defers every batch by a fixed delay.
#[derive(Clone, Copy, Debug)]
pub struct FixedDelay(pub Duration);

impl IdleScheduler for FixedDelay {
    fn yield_to_idle(&self) {
        if !self.0.is_zero() {
            std::thread::sleep(self.0);
        }
    }
}

/// Host-driven idle gate with a timeout fallback.
///
/// The host calls [`IdleSignal::notify_idle`] from its event loop when it has spare time; the
/// worker proceeds on that signal, or after `fallback` if none arrives.
#[derive(Debug)]
pub struct IdleSignal {
    idle: Mutex<bool>,
    cv: Condvar,
    fallback: Duration,
}

impl IdleSignal {
    /// New gate that releases the worker after `fallback` without a signal.
    pub fn new(fallback: Duration) -> Self {
        Self {
            idle: Mutex::new(false),
            cv: Condvar::new(),
            fallback,
        }
    }

    /// Report an idle point. Releases one pending (or the next) batch.
    pub fn notify_idle(&self) {
        let mut idle = self.idle.lock().unwrap_or_else(|e| e.into_inner());
        *idle = true;
        self.cv.notify_all();
    }
}

impl IdleScheduler for IdleSignal {
    fn yield_to_idle(&self) {
        let guard = self.idle.lock().unwrap_or_else(|e| e.into_inner());
        let (mut idle, _) = self
            .cv
            .wait_timeout_while(guard, self.fallback, |idle| !*idle)
            .unwrap_or_else(|e| e.into_inner());
        *idle = false;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/loader/scheduler.rs"]
mod tests;

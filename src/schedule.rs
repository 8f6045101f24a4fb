//! Debounced update scheduling
//!
//! Collapses bursts of change events (edits, document switches,
//! configuration changes) into a single recomputation. A new request
//! cancels and replaces any pending one (last-call-wins, not queued).
//! The host event loop pumps [`DebounceScheduler::poll`] and may sleep
//! for [`DebounceScheduler::time_remaining`] between events.

use std::time::{Duration, Instant};

/// Default delay between the last change event and recomputation
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(50);

/// Cancellable deadline for the next recomputation
#[derive(Debug)]
pub struct DebounceScheduler {
    delay: Duration,
    deadline: Option<Instant>,
}

impl DebounceScheduler {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Request a recomputation, cancelling any pending one
    pub fn request(&mut self) {
        self.deadline = Some(Instant::now() + self.delay);
    }

    /// Drop the pending request, if any
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// True exactly once after the pending deadline passes
    pub fn poll(&mut self) -> bool {
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Time until the pending deadline; zero if already due
    pub fn time_remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }
}

impl Default for DebounceScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

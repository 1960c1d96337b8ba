//! Refetch sequencing for search-driven views
//!
//! User input is debounced, and each refetch gets a ticket. In-flight
//! requests are never cancelled; when one completes after a newer one was
//! issued, its result is dropped. The newest *issued* request wins, even if
//! an older one finishes last.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Default quiet period after the last keystroke
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(320);

/// Tracks the last input and says when the quiet period has elapsed
#[derive(Debug)]
pub struct Debouncer {
    quiet: Duration,
    last_input: Mutex<Option<Instant>>,
}

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            last_input: Mutex::new(None),
        }
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet
    }

    pub fn touch(&self) {
        self.touch_at(Instant::now());
    }

    pub fn touch_at(&self, now: Instant) {
        if let Ok(mut last) = self.last_input.lock() {
            *last = Some(now);
        }
    }

    /// True once per burst of input, after the quiet period
    pub fn take_due(&self) -> bool {
        self.take_due_at(Instant::now())
    }

    pub fn take_due_at(&self, now: Instant) -> bool {
        let Ok(mut last) = self.last_input.lock() else {
            return false;
        };
        match *last {
            Some(at) if now.saturating_duration_since(at) >= self.quiet => {
                *last = None;
                true
            }
            _ => false,
        }
    }

    /// Time left before a pending refetch is due
    pub fn remaining_at(&self, now: Instant) -> Option<Duration> {
        let last = self.last_input.lock().ok()?;
        last.map(|at| self.quiet.saturating_sub(now.saturating_duration_since(at)))
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

/// Identifies one issued request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// Hands out increasing tickets; only the latest is current
#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: AtomicU64,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }
}

/// Debounced, sequenced refresh of one view's data
#[derive(Debug)]
pub struct RefreshCoordinator<T> {
    debouncer: Debouncer,
    sequencer: RequestSequencer,
    value: Mutex<Option<T>>,
}

impl<T: Clone> RefreshCoordinator<T> {
    pub fn new(quiet: Duration) -> Self {
        Self {
            debouncer: Debouncer::new(quiet),
            sequencer: RequestSequencer::new(),
            value: Mutex::new(None),
        }
    }

    /// Filter or search text changed
    pub fn input_changed(&self) {
        self.debouncer.touch();
    }

    pub fn input_changed_at(&self, now: Instant) {
        self.debouncer.touch_at(now);
    }

    /// Ticket for an immediate refetch (initial load, explicit refresh)
    pub fn begin(&self) -> Ticket {
        self.sequencer.issue()
    }

    /// Ticket if the debounced refetch is due
    pub fn begin_if_due(&self) -> Option<Ticket> {
        self.begin_if_due_at(Instant::now())
    }

    pub fn begin_if_due_at(&self, now: Instant) -> Option<Ticket> {
        self.debouncer
            .take_due_at(now)
            .then(|| self.sequencer.issue())
    }

    /// Apply a completed response. Returns false (and drops it) when a
    /// newer request has been issued since.
    pub fn complete(&self, ticket: Ticket, value: T) -> bool {
        let Ok(mut current) = self.value.lock() else {
            return false;
        };
        // Checked under the lock so a stale completion cannot overwrite
        // a newer value applied concurrently
        if !self.sequencer.is_current(ticket) {
            return false;
        }
        *current = Some(value);
        true
    }

    pub fn latest(&self) -> Option<T> {
        self.value.lock().ok().and_then(|v| v.clone())
    }

    pub fn debouncer(&self) -> &Debouncer {
        &self.debouncer
    }
}

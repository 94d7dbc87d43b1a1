/*!
 * ID Generation and Logical Time
 * Explicit, injectable counters for process ids and the simulation clock
 */

use super::types::{Pid, Tick};
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;

// ============================================================================
// Process ID Generator
// ============================================================================

/// Monotonic process id generator
///
/// Owned by (or injected into) a scheduler rather than living in a global, so
/// independent schedulers hand out independent id sequences. Clones share the
/// same counter.
#[derive(Debug)]
pub struct PidGenerator {
    counter: Arc<AtomicU32>,
}

impl PidGenerator {
    /// Create new generator starting at given value
    #[inline]
    pub fn new(start: Pid) -> Self {
        Self {
            counter: Arc::new(AtomicU32::new(start)),
        }
    }

    /// Next unique id (lock-free, safe across threads)
    #[inline]
    pub fn next(&self) -> Pid {
        self.counter.fetch_add(1, Ordering::SeqCst)
    }

    /// Id the next call to `next` would return
    #[inline]
    pub fn peek(&self) -> Pid {
        self.counter.load(Ordering::SeqCst)
    }
}

impl Default for PidGenerator {
    fn default() -> Self {
        Self::new(1)
    }
}

impl Clone for PidGenerator {
    fn clone(&self) -> Self {
        Self {
            counter: Arc::clone(&self.counter),
        }
    }
}

// ============================================================================
// Logical Clock
// ============================================================================

/// Shared, monotonically increasing logical clock
///
/// Stands in for both arrival order and simulated elapsed time. The clock
/// only ever moves forward.
#[derive(Debug, Default)]
pub struct LogicalClock {
    now: Arc<AtomicU64>,
}

impl LogicalClock {
    pub fn new(start: Tick) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(start)),
        }
    }

    /// Current time
    #[inline]
    pub fn now(&self) -> Tick {
        self.now.load(Ordering::SeqCst)
    }

    /// Read the current time, then move the clock one unit forward
    #[inline]
    pub fn tick(&self) -> Tick {
        self.now.fetch_add(1, Ordering::SeqCst)
    }

    /// Advance by `units` and return the new time
    #[inline]
    pub fn advance(&self, units: Tick) -> Tick {
        self.now.fetch_add(units, Ordering::SeqCst) + units
    }
}

impl Clone for LogicalClock {
    fn clone(&self) -> Self {
        Self {
            now: Arc::clone(&self.now),
        }
    }
}

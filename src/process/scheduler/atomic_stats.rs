/*!
 * Lock-Free Scheduler Statistics
 * Atomic counters updated from scheduling paths without taking the table lock
 */

use super::stats::SchedulerStats;
use crate::core::types::Tick;
use crate::process::types::SchedulingPolicy;
use std::sync::atomic::{AtomicU64, Ordering};

/// Atomic scheduler counters
///
/// Relaxed ordering throughout; snapshots are advisory.
#[derive(Debug, Default)]
pub struct AtomicSchedulerStats {
    admitted: AtomicU64,
    selected: AtomicU64,
    batches: AtomicU64,
    dispatches: AtomicU64,
    completed: AtomicU64,
}

impl AtomicSchedulerStats {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline(always)]
    pub fn inc_admitted(&self) {
        self.admitted.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn inc_selected(&self) {
        self.selected.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn inc_batches(&self) {
        self.batches.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn add_dispatches(&self, n: u64) {
        self.dispatches.fetch_add(n, Ordering::Relaxed);
    }

    #[inline]
    pub fn add_completed(&self, n: u64) {
        self.completed.fetch_add(n, Ordering::Relaxed);
    }

    /// Read every counter into a plain snapshot
    pub fn snapshot(&self, policy: SchedulingPolicy, quantum: Tick, queued: usize) -> SchedulerStats {
        SchedulerStats {
            policy,
            quantum,
            admitted: self.admitted.load(Ordering::Relaxed),
            selected: self.selected.load(Ordering::Relaxed),
            batches: self.batches.load(Ordering::Relaxed),
            dispatches: self.dispatches.load(Ordering::Relaxed),
            completed: self.completed.load(Ordering::Relaxed),
            queued,
        }
    }
}

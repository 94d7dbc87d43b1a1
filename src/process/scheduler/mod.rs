/*!
 * Process Scheduler
 * Owns the process table and ready structure; policy fixed at construction
 */

use crate::core::id::{LogicalClock, PidGenerator};
use crate::core::limits::{DEFAULT_QUANTUM, DEFAULT_SLICE_LIMIT, MIN_QUANTUM};
use crate::core::types::Tick;
use crate::process::table::ProcessTable;
use crate::process::types::SchedulingPolicy;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::info;

mod atomic_stats;
mod batch;
mod entry;
mod operations;
mod policy;
mod stats;

pub use atomic_stats::AtomicSchedulerStats;
pub use batch::{Batch, BatchReport, CompletedProcess, SliceOutcome};
pub use policy::{
    strategy_for, Fcfs, PriorityOrder, RoundRobin, SchedulingStrategy, ShortestJobFirst,
};
pub use stats::SchedulerStats;

use entry::ReadyQueue;

/// Process scheduler
///
/// Lock order: `processes` before `ready`.
pub struct Scheduler {
    strategy: Arc<dyn SchedulingStrategy>,
    quantum: Tick,
    slice_limit: usize,

    // Every process ever admitted
    processes: Arc<RwLock<ProcessTable>>,

    // Ready structure; may carry stale pids between refreshes
    ready: Arc<RwLock<ReadyQueue>>,

    clock: LogicalClock,
    pids: PidGenerator,

    // Statistics - lock-free atomics
    stats: Arc<AtomicSchedulerStats>,
}

impl Scheduler {
    /// Create scheduler with the default quantum
    pub fn new(policy: SchedulingPolicy) -> Self {
        Self::with_quantum(policy, DEFAULT_QUANTUM)
    }

    /// Create scheduler with a custom quantum; zero is raised to one tick
    pub fn with_quantum(policy: SchedulingPolicy, quantum: Tick) -> Self {
        let quantum = quantum.max(MIN_QUANTUM);
        let strategy = policy::strategy_for(policy);
        let ready = if strategy.is_fifo() {
            ReadyQueue::fifo()
        } else {
            ReadyQueue::keyed()
        };

        info!(policy = %policy, quantum, "Scheduler initialized");

        Self {
            strategy,
            quantum,
            slice_limit: DEFAULT_SLICE_LIMIT,
            processes: Arc::new(RwLock::new(ProcessTable::new())),
            ready: Arc::new(RwLock::new(ready)),
            clock: LogicalClock::default(),
            pids: PidGenerator::default(),
            stats: Arc::new(AtomicSchedulerStats::new()),
        }
    }

    /// Cap on slices per round-robin batch
    pub fn with_slice_limit(mut self, limit: usize) -> Self {
        self.slice_limit = limit;
        self
    }

    /// Share an external clock
    pub fn with_clock(mut self, clock: LogicalClock) -> Self {
        self.clock = clock;
        self
    }

    /// Share an external pid generator
    pub fn with_pid_generator(mut self, pids: PidGenerator) -> Self {
        self.pids = pids;
        self
    }

    #[inline]
    pub fn policy(&self) -> SchedulingPolicy {
        self.strategy.policy()
    }

    #[inline]
    pub fn quantum(&self) -> Tick {
        self.quantum
    }

    #[inline]
    pub fn slice_limit(&self) -> usize {
        self.slice_limit
    }

    pub fn clock(&self) -> &LogicalClock {
        &self.clock
    }

    pub fn stats(&self) -> SchedulerStats {
        self.stats
            .snapshot(self.policy(), self.quantum, self.ready.read().len())
    }
}

impl Clone for Scheduler {
    fn clone(&self) -> Self {
        Self {
            strategy: Arc::clone(&self.strategy),
            quantum: self.quantum,
            slice_limit: self.slice_limit,
            processes: Arc::clone(&self.processes),
            ready: Arc::clone(&self.ready),
            clock: self.clock.clone(),
            pids: self.pids.clone(),
            stats: Arc::clone(&self.stats),
        }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(SchedulingPolicy::default())
    }
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("policy", &self.policy())
            .field("quantum", &self.quantum)
            .field("slice_limit", &self.slice_limit)
            .field("now", &self.clock.now())
            .finish_non_exhaustive()
    }
}

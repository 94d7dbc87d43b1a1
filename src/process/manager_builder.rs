/*!
 * Process Manager Builder
 * Builder pattern for ProcessManager construction
 */

use super::manager::ProcessManager;
use super::scheduler::Scheduler;
use super::types::SchedulingPolicy;
use crate::config::SimulationConfig;
use crate::core::id::{LogicalClock, PidGenerator};
use crate::core::limits::{DEFAULT_MEMORY_CAPACITY, DEFAULT_QUANTUM, DEFAULT_SLICE_LIMIT};
use crate::core::types::{MemoryUnits, Tick};
use crate::resources::ResourceManager;
use tracing::info;

/// Builder for ProcessManager
#[derive(Debug, Clone)]
pub struct ProcessManagerBuilder {
    policy: SchedulingPolicy,
    quantum: Tick,
    slice_limit: usize,
    memory_capacity: MemoryUnits,
    clock: Option<LogicalClock>,
    pids: Option<PidGenerator>,
}

impl ProcessManagerBuilder {
    /// Create a new ProcessManager builder
    pub fn new() -> Self {
        Self {
            policy: SchedulingPolicy::default(),
            quantum: DEFAULT_QUANTUM,
            slice_limit: DEFAULT_SLICE_LIMIT,
            memory_capacity: DEFAULT_MEMORY_CAPACITY,
            clock: None,
            pids: None,
        }
    }

    /// Seed every setting from a validated configuration
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new()
            .with_policy(config.policy)
            .with_quantum(config.quantum)
            .with_slice_limit(config.slice_limit)
            .with_memory_capacity(config.memory_capacity)
    }

    pub fn with_policy(mut self, policy: SchedulingPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Round-robin quantum; ignored by other policies
    pub fn with_quantum(mut self, quantum: Tick) -> Self {
        self.quantum = quantum;
        self
    }

    pub fn with_slice_limit(mut self, limit: usize) -> Self {
        self.slice_limit = limit;
        self
    }

    pub fn with_memory_capacity(mut self, capacity: MemoryUnits) -> Self {
        self.memory_capacity = capacity;
        self
    }

    /// Share a clock, e.g. to control arrival stamps in tests
    pub fn with_clock(mut self, clock: LogicalClock) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn with_pid_generator(mut self, pids: PidGenerator) -> Self {
        self.pids = Some(pids);
        self
    }

    /// Build the ProcessManager
    pub fn build(self) -> ProcessManager {
        let mut scheduler =
            Scheduler::with_quantum(self.policy, self.quantum).with_slice_limit(self.slice_limit);
        if let Some(clock) = self.clock {
            scheduler = scheduler.with_clock(clock);
        }
        if let Some(pids) = self.pids {
            scheduler = scheduler.with_pid_generator(pids);
        }
        let resources = ResourceManager::with_capacity(self.memory_capacity);

        info!(
            policy = %self.policy,
            quantum = scheduler.quantum(),
            memory = self.memory_capacity,
            "Process manager initialized"
        );
        ProcessManager::from_parts(scheduler, resources)
    }
}

impl Default for ProcessManagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/*!
 * Automatic Simulation
 * Seeded random workload driven end to end through the process manager
 *
 * Stages: workload generation with optional memory requests, random
 * messages between distinct processes, an optional CPU contention
 * scenario, then one batch under the configured policy.
 */

use crate::config::SimulationConfig;
use crate::core::errors::ProcessResult;
use crate::core::limits::{
    HIGHEST_PRIORITY, LOWEST_PRIORITY, SIM_MAX_BURST, SIM_MAX_MEMORY_REQUEST, SIM_MAX_MESSAGES,
    SIM_MAX_PROCESSES, SIM_MIN_BURST, SIM_MIN_MEMORY_REQUEST, SIM_MIN_MESSAGES,
    SIM_MIN_PROCESSES,
};
use crate::core::types::{MemoryUnits, Pid, Priority, Tick};
use crate::monitoring::{generate_run_id, span_stage};
use crate::process::{BatchReport, ProcessManager, ProcessManagerBuilder, ProcessRecord, SchedulingPolicy};
use crate::resources::{ReleaseReport, ResourceSnapshot};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::info;

/// Canned message bodies exchanged between simulated processes
pub const PREDEFINED_MESSAGES: [&str; 6] = [
    "Request resource",
    "Release resource",
    "Priority raised",
    "Priority lowered",
    "Run I/O task",
    "Finish execution",
];

/// One generated process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WorkloadEntry {
    pub pid: Pid,
    pub priority: Priority,
    pub burst: Tick,
    pub memory_request: Option<MemoryUnits>,
    pub granted: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SentMessage {
    pub from: Pid,
    pub to: Pid,
    pub content: String,
}

/// Outcome of the two-process CPU contention scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentionOutcome {
    pub holder: Pid,
    pub waiter: Pid,
    pub holder_granted: bool,
    pub waiter_granted: Option<bool>,
    pub release: Option<ReleaseReport>,
}

/// Everything one automatic run produced
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub run_id: String,
    pub seed: u64,
    pub policy: SchedulingPolicy,
    pub workload: Vec<WorkloadEntry>,
    pub messages: Vec<SentMessage>,
    pub contention: Option<ContentionOutcome>,
    pub batch: BatchReport,
    pub processes: Vec<ProcessRecord>,
    pub resources: ResourceSnapshot,
}

/// Seeded simulation driver
pub struct Simulation {
    manager: ProcessManager,
    rng: StdRng,
    seed: u64,
    run_id: String,
}

impl Simulation {
    pub fn new(config: &SimulationConfig) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        Self::with_manager(ProcessManagerBuilder::from_config(config).build(), seed)
    }

    pub fn with_manager(manager: ProcessManager, seed: u64) -> Self {
        Self {
            manager,
            rng: StdRng::seed_from_u64(seed),
            seed,
            run_id: generate_run_id(),
        }
    }

    pub fn manager(&self) -> &ProcessManager {
        &self.manager
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Run every stage and collect the report
    pub fn run(mut self) -> ProcessResult<SimulationReport> {
        info!(
            run_id = %self.run_id,
            seed = self.seed,
            policy = %self.manager.policy(),
            "Starting automatic simulation"
        );

        let workload = self.generate_workload()?;
        let messages = self.exchange_messages()?;
        let contention = if self.rng.gen_bool(0.5) {
            Some(self.contention_scenario()?)
        } else {
            None
        };

        let span = span_stage("batch", &self.run_id);
        let batch = {
            let _entered = span.enter();
            self.manager.run_batch()
        };
        span.record_items(batch.completed.len());
        span.record_result(true);
        drop(span);

        info!(
            run_id = %self.run_id,
            completed = batch.completed.len(),
            avg_waiting = batch.average_waiting(),
            avg_turnaround = batch.average_turnaround(),
            "Simulation finished"
        );

        Ok(SimulationReport {
            run_id: self.run_id,
            seed: self.seed,
            policy: self.manager.policy(),
            workload,
            messages,
            contention,
            batch,
            processes: self.manager.processes(),
            resources: self.manager.resource_snapshot(),
        })
    }

    /// Create 5 to 15 processes; each requests memory with probability one half
    pub fn generate_workload(&mut self) -> ProcessResult<Vec<WorkloadEntry>> {
        let span = span_stage("workload", &self.run_id);
        let _entered = span.enter();

        let count = self.rng.gen_range(SIM_MIN_PROCESSES..=SIM_MAX_PROCESSES);
        let mut workload = Vec::with_capacity(count);
        for _ in 0..count {
            let priority = self.rng.gen_range(HIGHEST_PRIORITY..=LOWEST_PRIORITY);
            let burst = self.rng.gen_range(SIM_MIN_BURST..=SIM_MAX_BURST);
            let pid = self.manager.create_process(priority, burst);

            let mut entry = WorkloadEntry {
                pid,
                priority,
                burst,
                memory_request: None,
                granted: None,
            };
            if self.rng.gen_bool(0.5) {
                let memory = self
                    .rng
                    .gen_range(SIM_MIN_MEMORY_REQUEST..=SIM_MAX_MEMORY_REQUEST);
                entry.memory_request = Some(memory);
                entry.granted = Some(self.manager.request(pid, memory)?);
            }
            workload.push(entry);
        }

        span.record_items(workload.len());
        Ok(workload)
    }

    /// Send 2 to 6 canned messages between distinct random processes
    pub fn exchange_messages(&mut self) -> ProcessResult<Vec<SentMessage>> {
        let span = span_stage("messages", &self.run_id);
        let _entered = span.enter();

        let pids: Vec<Pid> = self.manager.processes().iter().map(ProcessRecord::pid).collect();
        if pids.len() < 2 {
            return Ok(Vec::new());
        }

        let count = self.rng.gen_range(SIM_MIN_MESSAGES..=SIM_MAX_MESSAGES);
        let mut sent = Vec::with_capacity(count);
        for _ in 0..count {
            let pair: Vec<Pid> = pids.choose_multiple(&mut self.rng, 2).copied().collect();
            let (from, to) = (pair[0], pair[1]);
            let content = PREDEFINED_MESSAGES
                .choose(&mut self.rng)
                .copied()
                .unwrap_or(PREDEFINED_MESSAGES[0]);
            self.manager.send(from, to, content)?;
            sent.push(SentMessage {
                from,
                to,
                content: content.to_string(),
            });
        }

        span.record_items(sent.len());
        Ok(sent)
    }

    /// Two fresh processes contend for the CPU
    ///
    /// The holder asks for 200 units; if granted the waiter asks for 300,
    /// then the holder releases and the waiter wakes.
    pub fn contention_scenario(&mut self) -> ProcessResult<ContentionOutcome> {
        let span = span_stage("contention", &self.run_id);
        let _entered = span.enter();

        let holder = self.manager.create_process(1, 10);
        let waiter = self.manager.create_process(2, 15);
        let mut outcome = ContentionOutcome {
            holder,
            waiter,
            holder_granted: self.manager.request(holder, 200)?,
            waiter_granted: None,
            release: None,
        };

        if outcome.holder_granted {
            outcome.waiter_granted = Some(self.manager.request(waiter, 300)?);
            outcome.release = Some(self.manager.release(holder)?);
        }
        info!(holder, waiter, holder_granted = outcome.holder_granted, "Contention scenario done");
        Ok(outcome)
    }
}

/// Run one automatic simulation with `config`
pub fn run(config: &SimulationConfig) -> ProcessResult<SimulationReport> {
    Simulation::new(config).run()
}

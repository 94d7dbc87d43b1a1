/*!
 * Batch Execution
 * Simulated execution of every ready process with per-process outcomes
 */

use crate::core::id::LogicalClock;
use crate::core::types::{Pid, Priority, Tick};
use crate::process::record::ProcessRecord;
use crate::process::table::ProcessTable;
use crate::process::types::SchedulingPolicy;
use serde::Serialize;
use std::collections::VecDeque;
use tracing::{debug, warn};

/// Outcome row for a process that finished inside a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CompletedProcess {
    pub pid: Pid,
    pub arrival: Tick,
    pub burst: Tick,
    pub priority: Priority,
    pub completion: Tick,
    pub waiting: Tick,
    pub turnaround: Tick,
}

impl CompletedProcess {
    fn from_record(process: &ProcessRecord, completion: Tick) -> Self {
        Self {
            pid: process.pid(),
            arrival: process.arrival(),
            burst: process.burst(),
            priority: process.priority(),
            completion,
            waiting: process.waiting_time(),
            turnaround: process.turnaround_time().unwrap_or_default(),
        }
    }
}

/// Result of one batch run
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub policy: SchedulingPolicy,
    pub started_at: Tick,
    pub finished_at: Tick,
    /// Processes ready when the batch started
    pub ready_at_start: usize,
    /// Rows in completion order
    pub completed: Vec<CompletedProcess>,
    /// Executions handed out (slices under round-robin)
    pub dispatches: usize,
    pub slice_limit_hit: bool,
    /// Processes left ready with partial progress
    pub unfinished: Vec<Pid>,
}

impl BatchReport {
    /// True when the batch found no ready process
    pub fn nothing_to_run(&self) -> bool {
        self.ready_at_start == 0
    }

    pub fn average_waiting(&self) -> f64 {
        average(self.completed.iter().map(|c| c.waiting))
    }

    pub fn average_turnaround(&self) -> f64 {
        average(self.completed.iter().map(|c| c.turnaround))
    }

    pub fn elapsed(&self) -> Tick {
        self.finished_at.saturating_sub(self.started_at)
    }

    pub fn completed_pids(&self) -> Vec<Pid> {
        self.completed.iter().map(|c| c.pid).collect()
    }
}

fn average(values: impl ExactSizeIterator<Item = Tick>) -> f64 {
    let n = values.len();
    if n == 0 {
        return 0.0;
    }
    values.sum::<Tick>() as f64 / n as f64
}

/// What happened to a process given one time slice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliceOutcome {
    Completed,
    Preempted,
    /// Not ready when dispatched
    Skipped,
}

/// Execution context handed to a strategy for one batch
///
/// Holds the table exclusively for the duration of the batch.
pub struct Batch<'a> {
    table: &'a mut ProcessTable,
    clock: &'a LogicalClock,
    quantum: Tick,
    slice_limit: usize,
    report: BatchReport,
}

impl<'a> Batch<'a> {
    pub(super) fn new(
        table: &'a mut ProcessTable,
        clock: &'a LogicalClock,
        policy: SchedulingPolicy,
        quantum: Tick,
        slice_limit: usize,
    ) -> Self {
        let report = BatchReport {
            policy,
            started_at: clock.now(),
            ready_at_start: table.iter().filter(|p| p.is_ready()).count(),
            ..BatchReport::default()
        };
        Self {
            table,
            clock,
            quantum,
            slice_limit,
            report,
        }
    }

    pub fn quantum(&self) -> Tick {
        self.quantum
    }

    pub fn slice_limit(&self) -> usize {
        self.slice_limit
    }

    pub fn dispatches(&self) -> usize {
        self.report.dispatches
    }

    /// Ready pids in admission order
    pub fn ready_pids(&self) -> Vec<Pid> {
        self.table.ready_pids()
    }

    pub fn record(&self, pid: Pid) -> Option<&ProcessRecord> {
        self.table.get(pid)
    }

    /// Run a ready process for its whole remaining time
    ///
    /// Waiting time is the clock at start minus arrival.
    pub fn run_to_completion(&mut self, pid: Pid) -> SliceOutcome {
        let start = self.clock.now();
        let Some(process) = self.table.get_mut(pid) else {
            return SliceOutcome::Skipped;
        };
        if let Err(err) = process.start() {
            debug!(pid, %err, "Skipping dispatch");
            return SliceOutcome::Skipped;
        }
        self.report.dispatches += 1;

        process.add_waiting(start.saturating_sub(process.arrival()));
        let burst = process.remaining();
        process.execute(burst);
        let now = self.clock.advance(burst);
        finish(process, now, &mut self.report)
    }

    /// Run a ready process for at most one quantum
    ///
    /// Every process in `queued` waits for the length of the slice.
    pub fn run_slice(&mut self, pid: Pid, queued: &VecDeque<Pid>) -> SliceOutcome {
        let slice = match self.table.get_mut(pid) {
            Some(process) => match process.start() {
                Ok(()) => process.remaining().min(self.quantum),
                Err(err) => {
                    debug!(pid, %err, "Skipping slice");
                    return SliceOutcome::Skipped;
                }
            },
            None => return SliceOutcome::Skipped,
        };
        self.report.dispatches += 1;

        for &other in queued {
            if let Some(waiter) = self.table.get_mut(other) {
                waiter.add_waiting(slice);
            }
        }

        let now = self.clock.advance(slice);
        debug!(pid, slice, now, "Slice executed");
        let Some(process) = self.table.get_mut(pid) else {
            return SliceOutcome::Skipped;
        };
        process.execute(slice);
        if process.remaining() == 0 {
            return finish(process, now, &mut self.report);
        }
        if let Err(err) = process.preempt() {
            warn!(pid, %err, "Preemption rejected");
        }
        SliceOutcome::Preempted
    }

    /// Record processes still owed time when the batch stopped early
    pub fn mark_unfinished(&mut self, pids: impl IntoIterator<Item = Pid>) {
        self.report.slice_limit_hit = true;
        self.report.unfinished.extend(pids);
    }

    pub(super) fn finish(mut self) -> BatchReport {
        self.report.finished_at = self.clock.now();
        self.report
    }
}

fn finish(process: &mut ProcessRecord, now: Tick, report: &mut BatchReport) -> SliceOutcome {
    match process.complete(now) {
        Ok(()) => {
            debug!(pid = process.pid(), completion = now, "Process completed");
            report
                .completed
                .push(CompletedProcess::from_record(process, now));
            SliceOutcome::Completed
        }
        Err(err) => {
            warn!(pid = process.pid(), %err, "Completion rejected");
            SliceOutcome::Skipped
        }
    }
}

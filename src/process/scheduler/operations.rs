/*!
 * Scheduler Core Operations
 * Admission, selection, refresh, batch execution and table access
 */

use super::batch::{Batch, BatchReport};
use super::Scheduler;
use crate::core::types::{Pid, Priority, Tick};
use crate::process::record::{ProcessRecord, ProcessSpec};
use crate::process::table::ProcessTable;
use tracing::{debug, info};

impl Scheduler {
    /// Create a ready process with the next pid, arriving now
    pub fn create_process(&self, priority: Priority, burst: Tick) -> Pid {
        self.admit(ProcessSpec::new(priority, burst))
    }

    /// Append a new ready record to the table and the ready structure
    ///
    /// The pid always comes from the scheduler's generator.
    pub fn admit(&self, spec: ProcessSpec) -> Pid {
        let mut table = self.processes.write();
        let pid = self.pids.next();
        let arrival = spec.arrival.unwrap_or_else(|| self.clock.tick());
        let record = ProcessRecord::new(pid, spec.priority, spec.burst, arrival);

        self.ready
            .write()
            .push(pid, self.strategy.order_key(&record), arrival);
        table.push(record);
        drop(table);

        self.stats.inc_admitted();
        info!(pid, arrival, policy = %self.policy(), "Process admitted");
        pid
    }

    /// Next ready process by policy order
    ///
    /// Entries whose process is no longer ready are discarded. Under
    /// round-robin the selected pid goes back to the tail.
    pub fn select_next(&self) -> Option<ProcessRecord> {
        let table = self.processes.read();
        let mut ready = self.ready.write();

        while let Some(pid) = ready.pop() {
            let Some(process) = table.get(pid) else {
                continue;
            };
            if !process.is_ready() {
                debug!(pid, state = %process.state(), "Discarding stale ready entry");
                continue;
            }
            if self.strategy.rotates() {
                ready.push(pid, self.strategy.order_key(process), process.arrival());
            }
            self.stats.inc_selected();
            debug!(pid, "Process selected");
            return Some(process.clone());
        }
        None
    }

    /// Rebuild the ready structure from every ready process in admission order
    pub fn refresh(&self) {
        let table = self.processes.read();
        let mut ready = self.ready.write();
        ready.clear();
        for process in table.iter().filter(|p| p.is_ready()) {
            ready.push(
                process.pid(),
                self.strategy.order_key(process),
                process.arrival(),
            );
        }
        debug!(queued = ready.len(), "Ready structure rebuilt");
    }

    /// Simulate execution of every ready process under the configured policy
    pub fn run_batch(&self) -> BatchReport {
        let mut table = self.processes.write();
        let mut batch = Batch::new(
            &mut table,
            &self.clock,
            self.policy(),
            self.quantum,
            self.slice_limit,
        );
        self.strategy.run_batch(&mut batch);
        let report = batch.finish();
        drop(table);

        self.stats.inc_batches();
        self.stats.add_dispatches(report.dispatches as u64);
        self.stats.add_completed(report.completed.len() as u64);
        self.refresh();

        info!(
            policy = %report.policy,
            completed = report.completed.len(),
            dispatches = report.dispatches,
            elapsed = report.elapsed(),
            "Batch finished"
        );
        report
    }

    /// Read access to the table
    pub fn with_table<R>(&self, f: impl FnOnce(&ProcessTable) -> R) -> R {
        f(&self.processes.read())
    }

    /// Mutable access to the table
    ///
    /// Callers changing readiness must `refresh` afterwards.
    pub fn with_table_mut<R>(&self, f: impl FnOnce(&mut ProcessTable) -> R) -> R {
        f(&mut self.processes.write())
    }

    pub fn get_process(&self, pid: Pid) -> Option<ProcessRecord> {
        self.processes.read().get(pid).cloned()
    }

    /// Snapshot of every record in admission order
    pub fn processes(&self) -> Vec<ProcessRecord> {
        self.processes.read().records().to_vec()
    }

    /// Queued pids in selection order, stale entries included
    pub fn ready_queue(&self) -> Vec<Pid> {
        self.ready.read().ordered()
    }

    pub fn len(&self) -> usize {
        self.processes.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.read().is_empty()
    }
}

/*!
 * Process Management
 * Facade tying the scheduler and resource manager together
 */

use super::mailbox::Inbox;
use super::manager_builder::ProcessManagerBuilder;
use super::record::ProcessRecord;
use super::scheduler::{BatchReport, Scheduler};
use super::types::{ProcessState, SchedulingPolicy, StateAction, TerminationCause};
use crate::core::errors::{ProcessError, ProcessResult};
use crate::core::types::{MemoryUnits, Pid, Priority, Tick};
use crate::resources::{ReleaseReport, ResourceManager, ResourceSnapshot};
use serde::Serialize;
use tracing::{info, warn};

/// Outcome of creating a process together with its memory request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Admission {
    pub pid: Pid,
    pub granted: bool,
}

/// Process manager
///
/// Every mutation refreshes the ready structure before returning.
#[derive(Debug, Clone)]
pub struct ProcessManager {
    scheduler: Scheduler,
    resources: ResourceManager,
}

impl ProcessManager {
    /// FCFS scheduler and the default memory pool
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> ProcessManagerBuilder {
        ProcessManagerBuilder::new()
    }

    pub(super) fn from_parts(scheduler: Scheduler, resources: ResourceManager) -> Self {
        Self {
            scheduler,
            resources,
        }
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn resources(&self) -> &ResourceManager {
        &self.resources
    }

    pub fn policy(&self) -> SchedulingPolicy {
        self.scheduler.policy()
    }

    pub fn create_process(&self, priority: Priority, burst: Tick) -> Pid {
        self.scheduler.create_process(priority, burst)
    }

    /// Create a process and immediately request `memory` for it
    pub fn create_with_memory(
        &self,
        priority: Priority,
        burst: Tick,
        memory: MemoryUnits,
    ) -> ProcessResult<Admission> {
        let pid = self.create_process(priority, burst);
        let granted = self.request(pid, memory)?;
        Ok(Admission { pid, granted })
    }

    /// Request the CPU plus `memory` units for `pid`
    pub fn request(&self, pid: Pid, memory: MemoryUnits) -> ProcessResult<bool> {
        let granted = self.scheduler.with_table_mut(|table| -> ProcessResult<bool> {
            let process = table.lookup_mut(pid)?;
            self.resources.request(process, memory)
        })?;
        self.scheduler.refresh();
        Ok(granted)
    }

    /// Release everything `pid` holds
    pub fn release(&self, pid: Pid) -> ProcessResult<ReleaseReport> {
        let report = self
            .scheduler
            .with_table_mut(|table| self.resources.release(pid, table))?;
        self.scheduler.refresh();
        Ok(report)
    }

    pub fn suspend(&self, pid: Pid) -> ProcessResult<()> {
        self.transition(pid, ProcessRecord::suspend)?;
        info!(pid, "Process suspended");
        Ok(())
    }

    pub fn resume(&self, pid: Pid) -> ProcessResult<()> {
        self.transition(pid, ProcessRecord::resume)?;
        info!(pid, "Process resumed");
        Ok(())
    }

    /// Suspend a ready process or resume a suspended one, returning the new state
    pub fn toggle_suspend(&self, pid: Pid) -> ProcessResult<ProcessState> {
        let state = self
            .scheduler
            .get_process(pid)
            .ok_or(ProcessError::NotFound(pid))?
            .state();
        match state {
            ProcessState::Suspended => self.resume(pid)?,
            _ => self.suspend(pid)?,
        }
        Ok(if state == ProcessState::Suspended {
            ProcessState::Ready
        } else {
            ProcessState::Suspended
        })
    }

    /// Terminate at the user's request, returning whatever it held to the pool
    pub fn terminate(&self, pid: Pid) -> ProcessResult<ReleaseReport> {
        let report = self.scheduler.with_table_mut(|table| -> ProcessResult<ReleaseReport> {
            let process = table.lookup_mut(pid)?;
            if process.is_terminated() {
                return Err(ProcessError::InvalidTransition {
                    pid,
                    from: process.state(),
                    action: StateAction::Terminate,
                });
            }
            self.resources.withdraw(pid);
            let report = self.resources.release(pid, table)?;
            table.lookup_mut(pid)?.terminate(TerminationCause::UserRequested)?;
            Ok(report)
        })?;
        self.scheduler.refresh();
        info!(pid, freed_memory = report.freed_memory, "Process terminated by user");
        Ok(report)
    }

    /// Deliver a message; the sender need not exist
    pub fn send(&self, from: Pid, to: Pid, content: impl Into<String>) -> ProcessResult<()> {
        self.scheduler
            .with_table_mut(|table| table.send(from, to, content))
    }

    /// Take every pending message for `pid`
    pub fn drain_messages(&self, pid: Pid) -> ProcessResult<Inbox> {
        self.scheduler
            .with_table_mut(|table| -> ProcessResult<Inbox> {
                let inbox = table.lookup_mut(pid)?.mailbox_mut().drain_all();
                info!(pid, senders = inbox.len(), "Mailbox drained");
                Ok(inbox)
            })
    }

    /// Run a batch, then return resources held by processes that finished
    pub fn run_batch(&self) -> BatchReport {
        let report = self.scheduler.run_batch();
        for pid in report.completed_pids() {
            match self.release(pid) {
                Ok(release) if !release.is_noop() => {
                    info!(pid, unblocked = ?release.unblocked, "Released resources of finished process");
                }
                Ok(_) => {}
                Err(err) => warn!(pid, %err, "Release after completion failed"),
            }
        }
        report
    }

    pub fn select_next(&self) -> Option<ProcessRecord> {
        self.scheduler.select_next()
    }

    pub fn get_process(&self, pid: Pid) -> Option<ProcessRecord> {
        self.scheduler.get_process(pid)
    }

    pub fn processes(&self) -> Vec<ProcessRecord> {
        self.scheduler.processes()
    }

    pub fn blocked_processes(&self) -> Vec<ProcessRecord> {
        self.scheduler
            .with_table(|table| table.iter().filter(|p| p.is_blocked()).cloned().collect())
    }

    pub fn ready_queue(&self) -> Vec<Pid> {
        self.scheduler.ready_queue()
    }

    pub fn resource_snapshot(&self) -> ResourceSnapshot {
        self.resources.snapshot()
    }

    fn transition(
        &self,
        pid: Pid,
        apply: impl FnOnce(&mut ProcessRecord) -> ProcessResult<()>,
    ) -> ProcessResult<()> {
        self.scheduler
            .with_table_mut(|table| -> ProcessResult<()> { apply(table.lookup_mut(pid)?) })?;
        self.scheduler.refresh();
        Ok(())
    }
}

impl Default for ProcessManager {
    fn default() -> Self {
        Self::new()
    }
}

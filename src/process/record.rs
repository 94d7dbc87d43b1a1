/*!
 * Process Record
 * The unit of schedulable work and its state machine
 *
 * Transitions:
 * - Ready -> Running (selected for execution)
 * - Running -> Ready (time slice expired)
 * - Running -> Terminated(Normal) (execution time exhausted)
 * - Ready/Running -> Blocked (resource request denied)
 * - Blocked -> Ready (resources freed elsewhere)
 * - Ready <-> Suspended (explicit commands)
 * - any live state -> Terminated(UserRequested | Deadlock | Error)
 */

use super::mailbox::Mailbox;
use super::types::{ProcessState, Resource, StateAction, TerminationCause};
use crate::core::errors::{ProcessError, ProcessResult};
use crate::core::types::{MemoryUnits, Pid, Priority, Tick};
use serde::Serialize;
use std::collections::BTreeSet;

/// Admission request; the scheduler assigns the pid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessSpec {
    pub priority: Priority,
    pub burst: Tick,
    /// Explicit arrival stamp; `None` takes the next clock tick
    pub arrival: Option<Tick>,
}

impl ProcessSpec {
    pub fn new(priority: Priority, burst: Tick) -> Self {
        Self {
            priority,
            burst,
            arrival: None,
        }
    }

    #[must_use]
    pub fn arriving_at(mut self, arrival: Tick) -> Self {
        self.arrival = Some(arrival);
        self
    }
}

/// Process control block
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ProcessRecord {
    pid: Pid,
    state: ProcessState,
    priority: Priority,
    remaining: Tick,
    burst: Tick,
    arrival: Tick,
    completion: Option<Tick>,
    waiting: Tick,
    turnaround: Option<Tick>,
    assigned: BTreeSet<Resource>,
    awaited: BTreeSet<Resource>,
    mailbox: Mailbox,
}

impl ProcessRecord {
    /// Build a ready record with an explicit arrival stamp
    #[must_use]
    pub(crate) fn new(pid: Pid, priority: Priority, burst: Tick, arrival: Tick) -> Self {
        Self {
            pid,
            state: ProcessState::Ready,
            priority,
            remaining: burst,
            burst,
            arrival,
            completion: None,
            waiting: 0,
            turnaround: None,
            assigned: BTreeSet::new(),
            awaited: BTreeSet::new(),
            mailbox: Mailbox::new(),
        }
    }

    #[inline]
    pub fn pid(&self) -> Pid {
        self.pid
    }

    #[inline]
    pub fn state(&self) -> ProcessState {
        self.state
    }

    #[inline]
    pub fn priority(&self) -> Priority {
        self.priority
    }

    /// Execution time still owed
    #[inline]
    pub fn remaining(&self) -> Tick {
        self.remaining
    }

    /// Execution time fixed at creation
    #[inline]
    pub fn burst(&self) -> Tick {
        self.burst
    }

    #[inline]
    pub fn arrival(&self) -> Tick {
        self.arrival
    }

    /// Set only after normal completion
    #[inline]
    pub fn completion_time(&self) -> Option<Tick> {
        self.completion
    }

    #[inline]
    pub fn waiting_time(&self) -> Tick {
        self.waiting
    }

    /// Set only after normal completion
    #[inline]
    pub fn turnaround_time(&self) -> Option<Tick> {
        self.turnaround
    }

    pub fn assigned(&self) -> &BTreeSet<Resource> {
        &self.assigned
    }

    pub fn awaited(&self) -> &BTreeSet<Resource> {
        &self.awaited
    }

    pub fn mailbox(&self) -> &Mailbox {
        &self.mailbox
    }

    pub fn mailbox_mut(&mut self) -> &mut Mailbox {
        &mut self.mailbox
    }

    #[inline]
    pub fn termination_cause(&self) -> Option<TerminationCause> {
        self.state.termination_cause()
    }

    #[inline(always)]
    pub fn is_ready(&self) -> bool {
        matches!(self.state, ProcessState::Ready)
    }

    #[inline(always)]
    pub fn is_blocked(&self) -> bool {
        matches!(self.state, ProcessState::Blocked)
    }

    #[inline(always)]
    pub fn is_terminated(&self) -> bool {
        self.state.is_terminated()
    }

    pub fn holds_resources(&self) -> bool {
        !self.assigned.is_empty()
    }

    pub fn holds_cpu(&self) -> bool {
        self.assigned.contains(&Resource::Cpu)
    }

    /// Memory units this record claims to hold
    pub fn memory_held(&self) -> MemoryUnits {
        self.assigned
            .iter()
            .map(|r| match r {
                Resource::Memory(units) => *units,
                Resource::Cpu => 0,
            })
            .sum()
    }

    fn reject(&self, action: StateAction) -> ProcessError {
        ProcessError::InvalidTransition {
            pid: self.pid,
            from: self.state,
            action,
        }
    }

    // ------------------------------------------------------------------
    // Scheduler transitions
    // ------------------------------------------------------------------

    /// Ready -> Running
    pub(crate) fn start(&mut self) -> ProcessResult<()> {
        match self.state {
            ProcessState::Ready => {
                self.state = ProcessState::Running;
                Ok(())
            }
            _ => Err(self.reject(StateAction::Run)),
        }
    }

    /// Running -> Ready
    pub(crate) fn preempt(&mut self) -> ProcessResult<()> {
        match self.state {
            ProcessState::Running => {
                self.state = ProcessState::Ready;
                Ok(())
            }
            _ => Err(self.reject(StateAction::Preempt)),
        }
    }

    /// Consume up to `units` of remaining time, returning what was consumed
    pub(crate) fn execute(&mut self, units: Tick) -> Tick {
        let consumed = units.min(self.remaining);
        self.remaining -= consumed;
        consumed
    }

    pub(crate) fn add_waiting(&mut self, units: Tick) {
        self.waiting += units;
    }

    /// Running -> Terminated(Normal), stamping completion and turnaround
    pub(crate) fn complete(&mut self, now: Tick) -> ProcessResult<()> {
        if self.state != ProcessState::Running || self.remaining > 0 {
            return Err(self.reject(StateAction::Complete));
        }
        self.state = ProcessState::Terminated(TerminationCause::Normal);
        self.completion = Some(now);
        self.turnaround = Some(now.saturating_sub(self.arrival));
        Ok(())
    }

    // ------------------------------------------------------------------
    // Resource transitions
    // ------------------------------------------------------------------

    /// Record a CPU + memory grant; a blocked record becomes ready again
    pub(crate) fn grant(&mut self, memory: MemoryUnits) {
        self.assigned.insert(Resource::Cpu);
        self.assigned.insert(Resource::Memory(memory));
        self.awaited.clear();
        if self.state == ProcessState::Blocked {
            self.state = ProcessState::Ready;
        }
    }

    pub(crate) fn clear_assigned(&mut self) -> BTreeSet<Resource> {
        std::mem::take(&mut self.assigned)
    }

    /// Ready/Running/Blocked -> Blocked, awaiting `missing`
    pub(crate) fn block(&mut self, missing: BTreeSet<Resource>) -> ProcessResult<()> {
        match self.state {
            ProcessState::Ready | ProcessState::Running | ProcessState::Blocked => {
                self.state = ProcessState::Blocked;
                self.awaited = missing;
                Ok(())
            }
            _ => Err(self.reject(StateAction::Block)),
        }
    }

    /// Blocked -> Ready
    pub(crate) fn unblock(&mut self) -> ProcessResult<()> {
        match self.state {
            ProcessState::Blocked => {
                self.state = ProcessState::Ready;
                self.awaited.clear();
                Ok(())
            }
            _ => Err(self.reject(StateAction::Unblock)),
        }
    }

    // ------------------------------------------------------------------
    // Administrative transitions
    // ------------------------------------------------------------------

    /// Ready -> Suspended; blocked processes must be unblocked first
    pub(crate) fn suspend(&mut self) -> ProcessResult<()> {
        match self.state {
            ProcessState::Ready => {
                self.state = ProcessState::Suspended;
                Ok(())
            }
            _ => Err(self.reject(StateAction::Suspend)),
        }
    }

    /// Suspended -> Ready
    pub(crate) fn resume(&mut self) -> ProcessResult<()> {
        match self.state {
            ProcessState::Suspended => {
                self.state = ProcessState::Ready;
                Ok(())
            }
            _ => Err(self.reject(StateAction::Resume)),
        }
    }

    /// Any live state -> Terminated(cause)
    pub(crate) fn terminate(&mut self, cause: TerminationCause) -> ProcessResult<()> {
        if self.is_terminated() {
            return Err(self.reject(StateAction::Terminate));
        }
        self.state = ProcessState::Terminated(cause);
        self.awaited.clear();
        Ok(())
    }
}

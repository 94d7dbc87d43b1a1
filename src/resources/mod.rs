/*!
 * Resource Manager
 * One CPU token and a fixed memory pool granted all-or-nothing
 *
 * A request either receives the CPU plus the requested memory or blocks,
 * recording what it lacked in the wait table. Releases return everything
 * at once and move satisfiable waiters back to ready; a woken process must
 * request again to actually receive anything.
 */

mod deadlock;
mod ledger;
mod types;

pub use types::{ReleaseReport, ResourceSnapshot};

use crate::core::errors::{ProcessError, ProcessResult};
use crate::core::limits::DEFAULT_MEMORY_CAPACITY;
use crate::core::types::{MemoryUnits, Pid};
use crate::process::record::ProcessRecord;
use crate::process::table::ProcessTable;
use crate::process::types::{ProcessState, StateAction};
use ledger::Ledger;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Resource manager
///
/// Callers holding the process table must take it before this manager's lock.
pub struct ResourceManager {
    ledger: Arc<Mutex<Ledger>>,
}

impl ResourceManager {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MEMORY_CAPACITY)
    }

    pub fn with_capacity(total: MemoryUnits) -> Self {
        info!(total_memory = total, "Resource manager initialized");
        Self {
            ledger: Arc::new(Mutex::new(Ledger::new(total))),
        }
    }

    /// Request the CPU plus `amount` memory units for `process`
    ///
    /// `Ok(true)` on grant. `Ok(false)` means the process is now blocked, or
    /// was terminated by the deadlock heuristic.
    pub fn request(&self, process: &mut ProcessRecord, amount: MemoryUnits) -> ProcessResult<bool> {
        let pid = process.pid();
        if matches!(
            process.state(),
            ProcessState::Suspended | ProcessState::Terminated(_)
        ) {
            return Err(ProcessError::InvalidTransition {
                pid,
                from: process.state(),
                action: StateAction::Request,
            });
        }
        if process.holds_resources() {
            return Err(ProcessError::AlreadyHoldsResources(pid));
        }

        let mut ledger = self.ledger.lock();
        if amount > ledger.total {
            warn!(pid, amount, total = ledger.total, "Request exceeds pool capacity");
        }

        if ledger.can_grant(amount) {
            ledger.grant(pid, amount);
            process.grant(amount);
            debug_assert!(ledger.is_balanced());
            info!(pid, amount, available = ledger.available, "Resources granted");
            return Ok(true);
        }

        let missing = ledger.missing(amount);
        info!(pid, amount, missing = ?missing, "Request denied; process blocked");
        process.block(missing.clone())?;
        ledger.waiting.insert(pid, missing);

        if deadlock::detect(&ledger) {
            deadlock::resolve(&mut ledger, process)?;
        }
        Ok(false)
    }

    /// Return everything `pid` holds and wake satisfiable waiters
    ///
    /// A process holding nothing is a no-op and wakes nobody.
    pub fn release(&self, pid: Pid, table: &mut ProcessTable) -> ProcessResult<ReleaseReport> {
        let process = table.lookup_mut(pid)?;
        if !process.holds_resources() {
            debug!(pid, "Release with nothing held");
            return Ok(ReleaseReport::nothing_held(pid));
        }

        let mut ledger = self.ledger.lock();
        process.clear_assigned();
        let (freed_memory, freed_cpu) = ledger.reclaim(pid);
        debug_assert!(ledger.is_balanced());

        let unblocked = Self::wake_waiters(&mut ledger, table);
        info!(
            pid,
            freed_memory,
            freed_cpu,
            unblocked = ?unblocked,
            "Resources released"
        );

        Ok(ReleaseReport {
            pid,
            freed_memory,
            freed_cpu,
            unblocked,
        })
    }

    /// Move every waiter whose needs are now satisfiable back to ready
    fn wake_waiters(ledger: &mut Ledger, table: &mut ProcessTable) -> Vec<Pid> {
        let ready: Vec<Pid> = ledger
            .waiting
            .iter()
            .filter(|(_, awaited)| ledger.satisfiable(awaited))
            .map(|(&pid, _)| pid)
            .collect();

        let mut unblocked = Vec::with_capacity(ready.len());
        for pid in ready {
            ledger.waiting.remove(&pid);
            match table.get_mut(pid).map(ProcessRecord::unblock) {
                Some(Ok(())) => unblocked.push(pid),
                Some(Err(err)) => debug!(pid, %err, "Dropping stale wait entry"),
                None => debug!(pid, "Dropping wait entry for unknown process"),
            }
        }
        unblocked
    }

    /// Drop `pid` from the wait table; true if it was waiting
    pub fn withdraw(&self, pid: Pid) -> bool {
        self.ledger.lock().waiting.remove(&pid).is_some()
    }

    pub fn total_memory(&self) -> MemoryUnits {
        self.ledger.lock().total
    }

    pub fn available_memory(&self) -> MemoryUnits {
        self.ledger.lock().available
    }

    pub fn cpu_available(&self) -> bool {
        self.ledger.lock().cpu_available()
    }

    pub fn cpu_holder(&self) -> Option<Pid> {
        self.ledger.lock().cpu_holder
    }

    /// Memory currently recorded against `pid`
    pub fn memory_of(&self, pid: Pid) -> Option<MemoryUnits> {
        self.ledger.lock().memory.get(&pid).copied()
    }

    pub fn is_waiting(&self, pid: Pid) -> bool {
        self.ledger.lock().waiting.contains_key(&pid)
    }

    pub fn waiting_pids(&self) -> Vec<Pid> {
        self.ledger.lock().waiting.keys().copied().collect()
    }

    pub fn snapshot(&self) -> ResourceSnapshot {
        let ledger = self.ledger.lock();
        ResourceSnapshot {
            total_memory: ledger.total,
            available_memory: ledger.available,
            cpu_available: ledger.cpu_available(),
            cpu_holder: ledger.cpu_holder,
            memory_ledger: ledger.memory.clone(),
            wait_table: ledger
                .waiting
                .iter()
                .map(|(&pid, awaited)| (pid, awaited.iter().copied().collect()))
                .collect(),
        }
    }
}

impl Clone for ResourceManager {
    fn clone(&self) -> Self {
        Self {
            ledger: Arc::clone(&self.ledger),
        }
    }
}

impl Default for ResourceManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ResourceManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ledger = self.ledger.lock();
        f.debug_struct("ResourceManager")
            .field("total", &ledger.total)
            .field("available", &ledger.available)
            .field("cpu_holder", &ledger.cpu_holder)
            .field("waiting", &ledger.waiting.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::types::{Resource, TerminationCause};
    use pretty_assertions::assert_eq;

    fn table(n: u32) -> ProcessTable {
        let mut table = ProcessTable::new();
        for pid in 1..=n {
            table.push(ProcessRecord::new(pid, 5, 5, 0));
        }
        table
    }

    #[test]
    fn test_grant_and_release() {
        let manager = ResourceManager::new();
        let mut table = table(1);

        assert!(manager.request(table.get_mut(1).unwrap(), 1000).unwrap());
        assert_eq!(manager.available_memory(), 3096);
        assert_eq!(manager.cpu_holder(), Some(1));

        let report = manager.release(1, &mut table).unwrap();
        assert_eq!(report.freed_memory, 1000);
        assert!(report.freed_cpu);
        assert_eq!(manager.available_memory(), 4096);
        assert!(manager.cpu_available());
    }

    #[test]
    fn test_denied_request_blocks() {
        let manager = ResourceManager::new();
        let mut table = table(2);

        assert!(manager.request(table.get_mut(1).unwrap(), 200).unwrap());
        assert!(!manager.request(table.get_mut(2).unwrap(), 300).unwrap());

        let waiter = table.get(2).unwrap();
        assert!(waiter.is_blocked());
        assert!(waiter.awaited().contains(&Resource::Cpu));
        assert_eq!(manager.waiting_pids(), vec![2]);
        assert_eq!(manager.available_memory(), 3896);
    }

    #[test]
    fn test_release_wakes_waiter_without_granting() {
        let manager = ResourceManager::new();
        let mut table = table(2);
        manager.request(table.get_mut(1).unwrap(), 200).unwrap();
        manager.request(table.get_mut(2).unwrap(), 300).unwrap();

        let report = manager.release(1, &mut table).unwrap();
        assert_eq!(report.unblocked, vec![2]);
        assert!(table.get(2).unwrap().is_ready());
        assert!(!table.get(2).unwrap().holds_resources());
        assert!(manager.waiting_pids().is_empty());
    }

    #[test]
    fn test_release_with_nothing_held() {
        let manager = ResourceManager::new();
        let mut table = table(1);
        assert!(manager.release(1, &mut table).unwrap().is_noop());
        assert_eq!(
            manager.release(9, &mut table).unwrap_err(),
            ProcessError::NotFound(9)
        );
    }

    #[test]
    fn test_second_request_rejected() {
        let manager = ResourceManager::new();
        let mut table = table(1);
        manager.request(table.get_mut(1).unwrap(), 10).unwrap();
        assert_eq!(
            manager.request(table.get_mut(1).unwrap(), 10).unwrap_err(),
            ProcessError::AlreadyHoldsResources(1)
        );
    }

    #[test]
    fn test_deadlock_terminates_second_cpu_waiter() {
        let manager = ResourceManager::new();
        let mut table = table(3);
        manager.request(table.get_mut(1).unwrap(), 100).unwrap();
        manager.request(table.get_mut(2).unwrap(), 100).unwrap();
        assert!(!manager.request(table.get_mut(3).unwrap(), 100).unwrap());

        let victim = table.get(3).unwrap();
        assert_eq!(victim.termination_cause(), Some(TerminationCause::Deadlock));
        assert!(victim.awaited().is_empty());
        assert_eq!(manager.waiting_pids(), vec![2]);
    }

    #[test]
    fn test_request_while_suspended() {
        let manager = ResourceManager::new();
        let mut table = table(1);
        table.get_mut(1).unwrap().suspend().unwrap();
        assert!(matches!(
            manager.request(table.get_mut(1).unwrap(), 10),
            Err(ProcessError::InvalidTransition { action: StateAction::Request, .. })
        ));
        assert_eq!(manager.available_memory(), 4096);
    }
}

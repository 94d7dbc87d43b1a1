/*!
 * Resource Ledger
 * Bookkeeping for the CPU token, the memory pool and the wait table
 */

use crate::core::types::{MemoryUnits, Pid};
use crate::process::types::Resource;
use std::collections::{BTreeMap, BTreeSet};

/// Shared resource state guarded by the manager's mutex
///
/// `available + sum(memory) == total` after every operation.
#[derive(Debug)]
pub(super) struct Ledger {
    pub total: MemoryUnits,
    pub available: MemoryUnits,
    pub cpu_holder: Option<Pid>,
    pub memory: BTreeMap<Pid, MemoryUnits>,
    /// Blocked requesters and what they lacked, in ascending pid order
    pub waiting: BTreeMap<Pid, BTreeSet<Resource>>,
}

impl Ledger {
    pub fn new(total: MemoryUnits) -> Self {
        Self {
            total,
            available: total,
            cpu_holder: None,
            memory: BTreeMap::new(),
            waiting: BTreeMap::new(),
        }
    }

    #[inline]
    pub fn cpu_available(&self) -> bool {
        self.cpu_holder.is_none()
    }

    pub fn can_grant(&self, amount: MemoryUnits) -> bool {
        self.cpu_available() && amount <= self.available
    }

    /// Resources a request for `amount` would lack right now
    pub fn missing(&self, amount: MemoryUnits) -> BTreeSet<Resource> {
        let mut missing = BTreeSet::new();
        if !self.cpu_available() {
            missing.insert(Resource::Cpu);
        }
        if amount > self.available {
            missing.insert(Resource::Memory(amount));
        }
        missing
    }

    /// Whether every awaited resource could be granted now
    pub fn satisfiable(&self, awaited: &BTreeSet<Resource>) -> bool {
        awaited.iter().all(|resource| match resource {
            Resource::Cpu => self.cpu_available(),
            Resource::Memory(units) => *units <= self.available,
        })
    }

    pub fn grant(&mut self, pid: Pid, amount: MemoryUnits) {
        self.available -= amount;
        self.cpu_holder = Some(pid);
        self.memory.insert(pid, amount);
        self.waiting.remove(&pid);
    }

    /// Return whatever `pid` holds; yields freed memory and whether the CPU was freed
    pub fn reclaim(&mut self, pid: Pid) -> (MemoryUnits, bool) {
        let memory = self.memory.remove(&pid).unwrap_or(0);
        self.available += memory;
        let cpu = self.cpu_holder == Some(pid);
        if cpu {
            self.cpu_holder = None;
        }
        (memory, cpu)
    }

    /// Number of waiters that lacked the CPU
    pub fn cpu_waiters(&self) -> usize {
        self.waiting
            .values()
            .filter(|awaited| awaited.contains(&Resource::Cpu))
            .count()
    }

    pub fn is_balanced(&self) -> bool {
        self.available + self.memory.values().sum::<MemoryUnits>() == self.total
    }
}

/*!
 * Resource Types
 * Reports returned by the resource manager
 */

use crate::core::types::{MemoryUnits, Pid};
use crate::process::types::Resource;
use serde::Serialize;
use std::collections::BTreeMap;

/// What a release returned to the pool
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReleaseReport {
    pub pid: Pid,
    pub freed_memory: MemoryUnits,
    pub freed_cpu: bool,
    /// Waiters moved back to ready, ascending pid order
    pub unblocked: Vec<Pid>,
}

impl ReleaseReport {
    pub(crate) fn nothing_held(pid: Pid) -> Self {
        Self {
            pid,
            ..Self::default()
        }
    }

    /// True when the process held nothing
    pub fn is_noop(&self) -> bool {
        self.freed_memory == 0 && !self.freed_cpu && self.unblocked.is_empty()
    }
}

/// Point-in-time view of the resource ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceSnapshot {
    pub total_memory: MemoryUnits,
    pub available_memory: MemoryUnits,
    pub cpu_available: bool,
    pub cpu_holder: Option<Pid>,
    pub memory_ledger: BTreeMap<Pid, MemoryUnits>,
    pub wait_table: BTreeMap<Pid, Vec<Resource>>,
}

/*!
 * Scheduler Statistics
 * Point-in-time view of scheduler activity
 */

use crate::core::types::Tick;
use crate::process::types::SchedulingPolicy;
use serde::{Deserialize, Serialize};

/// Scheduler statistics snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SchedulerStats {
    pub policy: SchedulingPolicy,
    pub quantum: Tick,
    /// Processes admitted to the table
    pub admitted: u64,
    /// Successful `select_next` calls
    pub selected: u64,
    /// Batches executed
    pub batches: u64,
    /// Executions handed out inside batches (slices under round-robin)
    pub dispatches: u64,
    /// Processes that finished normally
    pub completed: u64,
    /// Current ready structure length, stale entries included
    pub queued: usize,
}

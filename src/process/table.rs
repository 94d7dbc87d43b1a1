/*!
 * Process Table
 * Authoritative, append-only list of every process ever admitted
 */

use super::record::ProcessRecord;
use crate::core::errors::{ProcessError, ProcessResult};
use crate::core::types::Pid;
use ahash::RandomState;
use std::collections::HashMap;
use tracing::info;

/// Ordered process list with a pid index
///
/// Records are never removed, only mutated in place.
#[derive(Debug, Clone, Default)]
pub struct ProcessTable {
    records: Vec<ProcessRecord>,
    index: HashMap<Pid, usize, RandomState>,
}

impl ProcessTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record in admission order
    ///
    /// Pids are strictly increasing; they come from one generator.
    pub(crate) fn push(&mut self, record: ProcessRecord) {
        let pid = record.pid();
        debug_assert!(
            self.records.last().map_or(true, |last| last.pid() < pid),
            "pid {pid} admitted out of order"
        );
        self.index.insert(pid, self.records.len());
        self.records.push(record);
    }

    pub fn get(&self, pid: Pid) -> Option<&ProcessRecord> {
        self.index.get(&pid).map(|&i| &self.records[i])
    }

    pub fn get_mut(&mut self, pid: Pid) -> Option<&mut ProcessRecord> {
        match self.index.get(&pid) {
            Some(&i) => Some(&mut self.records[i]),
            None => None,
        }
    }

    /// Like `get_mut`, reporting a lookup failure
    pub fn lookup_mut(&mut self, pid: Pid) -> ProcessResult<&mut ProcessRecord> {
        self.get_mut(pid).ok_or(ProcessError::NotFound(pid))
    }

    pub fn contains(&self, pid: Pid) -> bool {
        self.index.contains_key(&pid)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProcessRecord> {
        self.records.iter()
    }

    pub fn records(&self) -> &[ProcessRecord] {
        &self.records
    }

    /// Ready pids in admission order
    pub fn ready_pids(&self) -> Vec<Pid> {
        self.records
            .iter()
            .filter(|p| p.is_ready())
            .map(ProcessRecord::pid)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Deliver `content` into the target's inbox under `from`
    ///
    /// An unknown target is a lookup failure and mutates nothing.
    pub fn send(&mut self, from: Pid, to: Pid, content: impl Into<String>) -> ProcessResult<()> {
        let target = self.get_mut(to).ok_or(ProcessError::NotFound(to))?;
        target.mailbox_mut().deliver(from, content);
        info!(from, to, "Message delivered");
        Ok(())
    }
}

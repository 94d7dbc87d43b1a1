/*!
 * Ready Queue Entries
 * Ready structures for FIFO and keyed policies
 */

use crate::core::types::{Pid, Tick};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, VecDeque};

/// Keyed ready entry, ordered by key then arrival then insertion
///
/// Wrapped in `Reverse` so the `BinaryHeap` yields the smallest key first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(super) struct Entry {
    pub key: u64,
    pub arrival: Tick,
    pub seq: u64,
    pub pid: Pid,
}

/// Ready structure owned by the scheduler
///
/// May hold stale pids whose process has since left `Ready`;
/// selection skips them.
#[derive(Debug)]
pub(super) enum ReadyQueue {
    Fifo(VecDeque<Pid>),
    Keyed {
        heap: BinaryHeap<Reverse<Entry>>,
        seq: u64,
    },
}

impl ReadyQueue {
    pub fn fifo() -> Self {
        Self::Fifo(VecDeque::new())
    }

    pub fn keyed() -> Self {
        Self::Keyed {
            heap: BinaryHeap::new(),
            seq: 0,
        }
    }

    /// Insert a pid; `key` is ignored by FIFO queues
    pub fn push(&mut self, pid: Pid, key: u64, arrival: Tick) {
        match self {
            Self::Fifo(queue) => queue.push_back(pid),
            Self::Keyed { heap, seq } => {
                heap.push(Reverse(Entry {
                    key,
                    arrival,
                    seq: *seq,
                    pid,
                }));
                *seq += 1;
            }
        }
    }

    pub fn pop(&mut self) -> Option<Pid> {
        match self {
            Self::Fifo(queue) => queue.pop_front(),
            Self::Keyed { heap, .. } => heap.pop().map(|Reverse(entry)| entry.pid),
        }
    }

    /// Pids in the order they would be selected
    pub fn ordered(&self) -> Vec<Pid> {
        match self {
            Self::Fifo(queue) => queue.iter().copied().collect(),
            Self::Keyed { heap, .. } => {
                let mut entries: Vec<Entry> = heap.iter().map(|Reverse(e)| *e).collect();
                entries.sort_unstable();
                entries.into_iter().map(|e| e.pid).collect()
            }
        }
    }

    pub fn clear(&mut self) {
        match self {
            Self::Fifo(queue) => queue.clear(),
            Self::Keyed { heap, seq } => {
                heap.clear();
                *seq = 0;
            }
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Fifo(queue) => queue.len(),
            Self::Keyed { heap, .. } => heap.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

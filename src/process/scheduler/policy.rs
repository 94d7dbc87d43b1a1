/*!
 * Scheduling Strategies
 * One strategy per policy, selected once at scheduler construction
 */

use super::batch::{Batch, SliceOutcome};
use crate::core::types::Tick;
use crate::process::record::ProcessRecord;
use crate::process::types::SchedulingPolicy;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// Ordering and batch behavior for one scheduling policy
pub trait SchedulingStrategy: Send + Sync + fmt::Debug {
    fn policy(&self) -> SchedulingPolicy;

    /// Selection key; smaller runs first, ties fall back to arrival
    fn order_key(&self, process: &ProcessRecord) -> u64;

    /// Ready structure is a plain FIFO rather than a keyed heap
    fn is_fifo(&self) -> bool {
        false
    }

    /// Selected processes go back to the tail of the ready structure
    fn rotates(&self) -> bool {
        false
    }

    /// Execute every ready process
    ///
    /// Default: run-to-completion in `order_key` order, stable on arrival.
    fn run_batch(&self, batch: &mut Batch<'_>) {
        let mut order = batch.ready_pids();
        order.sort_by_cached_key(|&pid| {
            batch
                .record(pid)
                .map(|p| (self.order_key(p), p.arrival()))
                .unwrap_or((u64::MAX, Tick::MAX))
        });
        for pid in order {
            batch.run_to_completion(pid);
        }
    }
}

/// First come, first served
#[derive(Debug, Clone, Copy, Default)]
pub struct Fcfs;

impl SchedulingStrategy for Fcfs {
    fn policy(&self) -> SchedulingPolicy {
        SchedulingPolicy::Fcfs
    }

    fn order_key(&self, process: &ProcessRecord) -> u64 {
        process.arrival()
    }

    fn is_fifo(&self) -> bool {
        true
    }
}

/// Shortest job first, non-preemptive
#[derive(Debug, Clone, Copy, Default)]
pub struct ShortestJobFirst;

impl SchedulingStrategy for ShortestJobFirst {
    fn policy(&self) -> SchedulingPolicy {
        SchedulingPolicy::Sjf
    }

    fn order_key(&self, process: &ProcessRecord) -> u64 {
        process.remaining()
    }
}

/// Static priority, lower number first, non-preemptive
#[derive(Debug, Clone, Copy, Default)]
pub struct PriorityOrder;

impl SchedulingStrategy for PriorityOrder {
    fn policy(&self) -> SchedulingPolicy {
        SchedulingPolicy::Priority
    }

    fn order_key(&self, process: &ProcessRecord) -> u64 {
        u64::from(process.priority())
    }
}

/// Time-sliced rotation with a fixed quantum
#[derive(Debug, Clone, Copy, Default)]
pub struct RoundRobin;

impl SchedulingStrategy for RoundRobin {
    fn policy(&self) -> SchedulingPolicy {
        SchedulingPolicy::RoundRobin
    }

    fn order_key(&self, process: &ProcessRecord) -> u64 {
        process.arrival()
    }

    fn is_fifo(&self) -> bool {
        true
    }

    fn rotates(&self) -> bool {
        true
    }

    fn run_batch(&self, batch: &mut Batch<'_>) {
        let mut queue: VecDeque<_> = batch.ready_pids().into();
        let limit = batch.slice_limit();

        while batch.dispatches() < limit {
            let Some(pid) = queue.pop_front() else {
                break;
            };
            if batch.run_slice(pid, &queue) == SliceOutcome::Preempted {
                queue.push_back(pid);
            }
        }

        if !queue.is_empty() {
            warn!(
                limit,
                unfinished = queue.len(),
                "Slice limit reached; remaining processes stay ready"
            );
            batch.mark_unfinished(queue);
        }
    }
}

/// Strategy implementing `policy`
pub fn strategy_for(policy: SchedulingPolicy) -> Arc<dyn SchedulingStrategy> {
    match policy {
        SchedulingPolicy::Fcfs => Arc::new(Fcfs),
        SchedulingPolicy::Sjf => Arc::new(ShortestJobFirst),
        SchedulingPolicy::Priority => Arc::new(PriorityOrder),
        SchedulingPolicy::RoundRobin => Arc::new(RoundRobin),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_matches_policy() {
        for policy in SchedulingPolicy::ALL {
            assert_eq!(strategy_for(policy).policy(), policy);
        }
    }

    #[test]
    fn test_keys() {
        let process = ProcessRecord::new(1, 4, 9, 3);
        assert_eq!(Fcfs.order_key(&process), 3);
        assert_eq!(ShortestJobFirst.order_key(&process), 9);
        assert_eq!(PriorityOrder.order_key(&process), 4);
        assert!(RoundRobin.rotates());
        assert!(!PriorityOrder.is_fifo());
    }
}

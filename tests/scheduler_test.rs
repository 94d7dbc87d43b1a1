/*!
 * Scheduler Tests
 * Batch execution and selection under every policy
 */

use pretty_assertions::assert_eq;
use process_simulator::{ProcessSpec, Scheduler, SchedulingPolicy, TerminationCause};
use proptest::prelude::*;

fn scheduler_with(policy: SchedulingPolicy, jobs: &[(u8, u64)]) -> Scheduler {
    let scheduler = Scheduler::new(policy);
    for &(priority, burst) in jobs {
        scheduler.admit(ProcessSpec::new(priority, burst).arriving_at(0));
    }
    scheduler
}

#[test]
fn test_fcfs_waiting_and_turnaround() {
    let scheduler = scheduler_with(SchedulingPolicy::Fcfs, &[(5, 5), (5, 3), (5, 8)]);
    let report = scheduler.run_batch();

    let waiting: Vec<_> = report.completed.iter().map(|c| c.waiting).collect();
    let turnaround: Vec<_> = report.completed.iter().map(|c| c.turnaround).collect();
    assert_eq!(report.completed_pids(), vec![1, 2, 3]);
    assert_eq!(waiting, vec![0, 5, 8]);
    assert_eq!(turnaround, vec![5, 8, 16]);
    assert!((report.average_waiting() - 13.0 / 3.0).abs() < f64::EPSILON);
    assert_eq!(report.finished_at, 16);
}

#[test]
fn test_sjf_orders_by_remaining_time() {
    let scheduler = scheduler_with(SchedulingPolicy::Sjf, &[(5, 6), (5, 2), (5, 4), (5, 2)]);
    let report = scheduler.run_batch();

    assert_eq!(report.completed_pids(), vec![2, 4, 3, 1]);
    let waiting: Vec<_> = report.completed.iter().map(|c| c.waiting).collect();
    assert_eq!(waiting, vec![0, 2, 4, 8]);
}

#[test]
fn test_priority_orders_lowest_number_first() {
    let scheduler = scheduler_with(SchedulingPolicy::Priority, &[(3, 1), (1, 1), (3, 1), (2, 1)]);
    let report = scheduler.run_batch();
    assert_eq!(report.completed_pids(), vec![2, 4, 1, 3]);
}

#[test]
fn test_round_robin_slices() {
    let scheduler = Scheduler::with_quantum(SchedulingPolicy::RoundRobin, 2);
    scheduler.admit(ProcessSpec::new(5, 5).arriving_at(0));
    scheduler.admit(ProcessSpec::new(5, 3).arriving_at(0));

    let report = scheduler.run_batch();

    // 1:2, 2:2, 1:2, 2:1, 1:1
    assert_eq!(report.dispatches, 5);
    assert_eq!(report.completed_pids(), vec![2, 1]);
    assert_eq!(report.finished_at, 8);

    let p2 = scheduler.get_process(2).unwrap();
    assert_eq!(p2.completion_time(), Some(7));
    assert_eq!(p2.waiting_time(), 4);
    let p1 = scheduler.get_process(1).unwrap();
    assert_eq!(p1.completion_time(), Some(8));
    assert_eq!(p1.waiting_time(), 3);
}

#[test]
fn test_round_robin_slice_limit() {
    let scheduler =
        Scheduler::with_quantum(SchedulingPolicy::RoundRobin, 1).with_slice_limit(3);
    scheduler.admit(ProcessSpec::new(5, 10).arriving_at(0));
    scheduler.admit(ProcessSpec::new(5, 10).arriving_at(0));

    let report = scheduler.run_batch();
    assert!(report.slice_limit_hit);
    assert_eq!(report.dispatches, 3);
    assert!(report.completed.is_empty());
    assert_eq!(report.unfinished, vec![2, 1]);

    let p1 = scheduler.get_process(1).unwrap();
    assert!(p1.is_ready());
    assert_eq!(p1.remaining(), 8);
    assert_eq!(scheduler.ready_queue(), vec![1, 2]);
}

#[test]
fn test_batch_skips_non_ready() {
    let scheduler = scheduler_with(SchedulingPolicy::Fcfs, &[(5, 2), (5, 2)]);
    let first = scheduler.run_batch();
    assert_eq!(first.completed.len(), 2);

    let second = scheduler.run_batch();
    assert!(second.nothing_to_run());
    assert_eq!(
        scheduler.get_process(1).unwrap().termination_cause(),
        Some(TerminationCause::Normal)
    );
    assert_eq!(scheduler.stats().batches, 2);
}

#[test]
fn test_select_next_after_batch() {
    let scheduler = scheduler_with(SchedulingPolicy::Fcfs, &[(5, 2), (5, 2)]);
    scheduler.run_batch();
    let late = scheduler.admit(ProcessSpec::new(5, 2).arriving_at(0));

    assert_eq!(late, 3);
    assert_eq!(scheduler.select_next().map(|p| p.pid()), Some(3));
    assert!(scheduler.select_next().is_none());
}

#[test]
fn test_create_process_assigns_increasing_ids() {
    let scheduler = Scheduler::new(SchedulingPolicy::Fcfs);
    let pids: Vec<_> = (0..5).map(|_| scheduler.create_process(5, 1)).collect();
    assert_eq!(pids, vec![1, 2, 3, 4, 5]);

    let arrivals: Vec<_> = scheduler.processes().iter().map(|p| p.arrival()).collect();
    assert_eq!(arrivals, vec![0, 1, 2, 3, 4]);
}

#[test]
fn test_admissions_after_batch_still_run() {
    let scheduler = Scheduler::new(SchedulingPolicy::Fcfs);
    let first = scheduler.create_process(5, 3);
    let second = scheduler.admit(ProcessSpec::new(5, 4).arriving_at(0));
    assert_ne!(first, second);

    let report = scheduler.run_batch();
    assert_eq!(report.completed.len(), 2);
    assert!(scheduler
        .processes()
        .iter()
        .all(|p| p.termination_cause() == Some(TerminationCause::Normal)));
    assert!(scheduler.run_batch().nothing_to_run());
}

#[test]
fn test_round_robin_quantum_above_config_range() {
    let scheduler = Scheduler::with_quantum(SchedulingPolicy::RoundRobin, 20);
    scheduler.create_process(5, 20);
    scheduler.create_process(5, 20);

    let report = scheduler.run_batch();
    assert_eq!(scheduler.quantum(), 20);
    assert_eq!(report.dispatches, 2);
    assert_eq!(report.completed.len(), 2);
}

#[test]
fn test_zero_slice_limit_is_not_an_empty_batch() {
    let scheduler =
        Scheduler::with_quantum(SchedulingPolicy::RoundRobin, 2).with_slice_limit(0);
    scheduler.create_process(5, 4);
    scheduler.create_process(5, 4);

    let report = scheduler.run_batch();
    assert!(!report.nothing_to_run());
    assert!(report.slice_limit_hit);
    assert_eq!(report.unfinished, vec![1, 2]);
    assert_eq!(scheduler.ready_queue(), vec![1, 2]);
}

proptest! {
    #[test]
    fn prop_admissions_are_recorded(bursts in prop::collection::vec(1u64..20, 0..30)) {
        let scheduler = Scheduler::new(SchedulingPolicy::Sjf);
        let pids: Vec<_> = bursts
            .iter()
            .enumerate()
            .map(|(i, &b)| {
                if i % 2 == 0 {
                    scheduler.create_process(5, b)
                } else {
                    scheduler.admit(ProcessSpec::new(5, b).arriving_at(0))
                }
            })
            .collect();

        prop_assert_eq!(scheduler.len(), bursts.len());
        prop_assert!(pids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn prop_round_robin_single_slice(quantum in 1u64..=40, count in 1usize..20) {
        let scheduler = Scheduler::with_quantum(SchedulingPolicy::RoundRobin, quantum);
        for _ in 0..count {
            scheduler.admit(ProcessSpec::new(5, quantum).arriving_at(0));
        }

        let report = scheduler.run_batch();
        prop_assert_eq!(report.dispatches, count);
        prop_assert_eq!(report.completed.len(), count);
        prop_assert_eq!(report.elapsed(), quantum * count as u64);
    }

    #[test]
    fn prop_batch_elapsed_is_total_burst(
        bursts in prop::collection::vec(1u64..20, 1..15),
        policy in prop::sample::select(SchedulingPolicy::ALL.to_vec()),
    ) {
        let scheduler = Scheduler::with_quantum(policy, 3).with_slice_limit(10_000);
        for (i, &burst) in bursts.iter().enumerate() {
            scheduler.admit(ProcessSpec::new((i % 10) as u8 + 1, burst).arriving_at(0));
        }

        let report = scheduler.run_batch();
        prop_assert_eq!(report.completed.len(), bursts.len());
        prop_assert_eq!(report.elapsed(), bursts.iter().sum::<u64>());
        for row in &report.completed {
            prop_assert_eq!(row.turnaround, row.completion - row.arrival);
            prop_assert_eq!(row.turnaround, row.waiting + row.burst);
        }
    }
}

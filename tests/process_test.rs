/*!
 * Process Manager Tests
 * Lifecycle commands, messaging, and resource interplay through the facade
 */

use pretty_assertions::assert_eq;
use process_simulator::{
    LogicalClock, ProcessError, ProcessManager, ProcessState, SchedulingPolicy, StateAction,
    TerminationCause,
};

#[test]
fn test_blocked_process_cannot_be_suspended() {
    let manager = ProcessManager::new();
    manager.create_with_memory(5, 4, 100).unwrap();
    let waiter = manager.create_with_memory(5, 4, 100).unwrap();
    assert!(!waiter.granted);

    let err = manager.suspend(waiter.pid).unwrap_err();
    assert_eq!(
        err,
        ProcessError::InvalidTransition {
            pid: waiter.pid,
            from: ProcessState::Blocked,
            action: StateAction::Suspend,
        }
    );
    assert_eq!(manager.get_process(waiter.pid).unwrap().state(), ProcessState::Blocked);
}

#[test]
fn test_blocked_process_excluded_from_batch() {
    let manager = ProcessManager::new();
    let holder = manager.create_with_memory(5, 4, 100).unwrap().pid;
    let waiter = manager.create_with_memory(5, 4, 100).unwrap().pid;
    let free = manager.create_process(5, 2);

    assert_eq!(manager.ready_queue(), vec![holder, free]);

    let report = manager.run_batch();
    assert_eq!(report.completed_pids(), vec![holder, free]);

    // Holder finished, its release woke the waiter
    let waiter_record = manager.get_process(waiter).unwrap();
    assert!(waiter_record.is_ready());
    assert_eq!(manager.resources().available_memory(), 4096);
    assert_eq!(manager.ready_queue(), vec![waiter]);

    assert!(manager.request(waiter, 100).unwrap());
    let report = manager.run_batch();
    assert_eq!(report.completed_pids(), vec![waiter]);
    assert!(manager.resources().cpu_available());
}

#[test]
fn test_suspended_process_skipped_until_resumed() {
    let manager = ProcessManager::builder()
        .with_policy(SchedulingPolicy::Priority)
        .build();
    let low = manager.create_process(9, 3);
    let high = manager.create_process(1, 3);

    manager.suspend(high).unwrap();
    assert_eq!(manager.run_batch().completed_pids(), vec![low]);

    assert_eq!(manager.toggle_suspend(high).unwrap(), ProcessState::Ready);
    assert_eq!(manager.run_batch().completed_pids(), vec![high]);
}

#[test]
fn test_user_termination() {
    let manager = ProcessManager::new();
    let pid = manager.create_process(5, 3);
    manager.suspend(pid).unwrap();

    let report = manager.terminate(pid).unwrap();
    assert!(report.is_noop());

    let record = manager.get_process(pid).unwrap();
    assert_eq!(record.termination_cause(), Some(TerminationCause::UserRequested));
    assert!(manager.ready_queue().is_empty());
    assert!(manager.resume(pid).is_err());
    assert!(manager.request(pid, 10).is_err());
}

#[test]
fn test_terminating_holder_wakes_waiter() {
    let manager = ProcessManager::new();
    let holder = manager.create_with_memory(5, 3, 1000).unwrap().pid;
    let waiter = manager.create_with_memory(5, 3, 1000).unwrap().pid;

    let report = manager.terminate(holder).unwrap();
    assert_eq!(report.freed_memory, 1000);
    assert!(report.freed_cpu);
    assert_eq!(report.unblocked, vec![waiter]);
    assert!(manager.blocked_processes().is_empty());
}

#[test]
fn test_deadlock_through_manager() {
    let manager = ProcessManager::new();
    let holder = manager.create_with_memory(5, 3, 10).unwrap().pid;
    let first = manager.create_with_memory(5, 3, 10).unwrap().pid;
    let second = manager.create_with_memory(5, 3, 10).unwrap();

    assert!(!second.granted);
    assert_eq!(
        manager.get_process(second.pid).unwrap().termination_cause(),
        Some(TerminationCause::Deadlock)
    );
    assert_eq!(manager.resources().waiting_pids(), vec![first]);
    assert_eq!(manager.resources().cpu_holder(), Some(holder));
}

#[test]
fn test_unknown_pid_reports_not_found() {
    let manager = ProcessManager::new();
    assert_eq!(manager.suspend(42), Err(ProcessError::NotFound(42)));
    assert_eq!(manager.request(42, 1), Err(ProcessError::NotFound(42)));
    assert_eq!(manager.release(42).unwrap_err(), ProcessError::NotFound(42));
    assert_eq!(manager.terminate(42).unwrap_err(), ProcessError::NotFound(42));
    assert_eq!(manager.drain_messages(42).unwrap_err(), ProcessError::NotFound(42));
}

#[test]
fn test_mailbox_order_and_drain() {
    let manager = ProcessManager::new();
    let a = manager.create_process(5, 1);
    let b = manager.create_process(5, 1);
    let c = manager.create_process(5, 1);

    manager.send(a, c, "Request resource").unwrap();
    manager.send(b, c, "Priority raised").unwrap();
    manager.send(a, c, "Finish execution").unwrap();
    assert!(manager.send(a, 99, "lost").is_err());

    let inbox = manager.drain_messages(c).unwrap();
    assert_eq!(inbox[&a], vec!["Request resource", "Finish execution"]);
    assert_eq!(inbox[&b], vec!["Priority raised"]);
    assert!(manager.get_process(c).unwrap().mailbox().is_empty());
    assert!(manager.get_process(a).unwrap().mailbox().is_empty());
}

#[test]
fn test_shared_clock_stamps_arrivals() {
    let clock = LogicalClock::new(100);
    let manager = ProcessManager::builder().with_clock(clock.clone()).build();
    let pid = manager.create_process(5, 4);

    assert_eq!(manager.get_process(pid).unwrap().arrival(), 100);
    let report = manager.run_batch();
    assert_eq!(report.completed[0].completion, 105);
    assert_eq!(clock.now(), 105);
}

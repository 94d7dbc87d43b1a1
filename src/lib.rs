/*!
 * Process Simulator Library
 * Scheduling, resource arbitration, and producer/consumer synchronization
 */

pub mod config;
pub mod core;
pub mod ipc;
pub mod monitoring;
pub mod process;
pub mod resources;
pub mod simulation;

// Re-exports
pub use config::SimulationConfig;
pub use crate::core::errors::*;
pub use crate::core::id::{LogicalClock, PidGenerator};
pub use crate::core::types::{MemoryUnits, Pid, Priority, Tick};
pub use ipc::{BoundedBuffer, CancelToken, DemoReport, ProducerConsumer};
pub use monitoring::{generate_run_id, init_tracing};
pub use process::{
    Admission, BatchReport, CompletedProcess, Mailbox, ProcessManager, ProcessManagerBuilder,
    ProcessRecord, ProcessSpec, ProcessState, ProcessTable, Resource, Scheduler, SchedulingPolicy,
    StateAction, TerminationCause,
};
pub use resources::{ReleaseReport, ResourceManager, ResourceSnapshot};
pub use simulation::{Simulation, SimulationReport};

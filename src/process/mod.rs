/*!
 * Process Module
 * Process records, scheduling, and lifecycle management
 */

pub mod mailbox;
pub mod manager;
pub mod manager_builder;
pub mod record;
pub mod scheduler;
pub mod table;
pub mod types;

// Re-export for convenience
pub use mailbox::{Inbox, Mailbox};
pub use manager::{Admission, ProcessManager};
pub use manager_builder::ProcessManagerBuilder;
pub use record::{ProcessRecord, ProcessSpec};
pub use scheduler::{BatchReport, CompletedProcess, Scheduler, SchedulerStats, SchedulingStrategy};
pub use table::ProcessTable;
pub use types::{ProcessState, Resource, SchedulingPolicy, StateAction, TerminationCause};

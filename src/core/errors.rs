/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 */

use crate::core::types::Pid;
use crate::process::types::{ProcessState, StateAction};
use miette::Diagnostic;
use serde::Serialize;
use thiserror::Error;

/// Process operation result
pub type ProcessResult<T> = Result<T, ProcessError>;

/// Bounded buffer operation result
pub type BufferResult<T> = Result<T, BufferError>;

/// Configuration result
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Process-related errors
///
/// A denied resource request is not an error: it is reported as `Ok(false)`
/// plus a transition to `Blocked`.
#[derive(Error, Debug, Clone, Serialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum ProcessError {
    #[error("Process {0} not found")]
    #[diagnostic(
        code(process::not_found),
        help("The process id was never assigned. Check PID validity.")
    )]
    NotFound(Pid),

    #[error("Process {pid} cannot {action} while {from}")]
    #[diagnostic(
        code(process::invalid_transition),
        help("Operation cannot be performed in current process state.")
    )]
    InvalidTransition {
        pid: Pid,
        from: ProcessState,
        action: StateAction,
    },

    #[error("Process {0} already holds resources")]
    #[diagnostic(
        code(process::already_holds_resources),
        help("Release the current grant before requesting again.")
    )]
    AlreadyHoldsResources(Pid),
}

/// Producer/consumer errors
#[derive(Error, Debug, Clone, Serialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum BufferError {
    #[error("Buffer closed")]
    #[diagnostic(code(buffer::closed), help("The buffer was shut down; no further items move."))]
    Closed,

    #[error("Flow cancelled")]
    #[diagnostic(code(buffer::cancelled))]
    Cancelled,

    #[error("Buffer full ({0} slots)")]
    #[diagnostic(code(buffer::full), help("Use the blocking produce to wait for a free slot."))]
    Full(usize),

    #[error("Buffer empty")]
    #[diagnostic(code(buffer::empty), help("Use the blocking consume to wait for an item."))]
    Empty,

    #[error("Flow task failed: {0}")]
    #[diagnostic(code(buffer::task_failed))]
    TaskFailed(String),
}

/// Configuration errors
#[derive(Error, Debug, Clone, Serialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum ConfigError {
    #[error("Invalid policy '{0}'")]
    #[diagnostic(
        code(config::invalid_policy),
        help("Valid: fcfs, sjf, priority, round_robin")
    )]
    InvalidPolicy(String),

    #[error("Invalid quantum {value}: must be between {min} and {max}")]
    #[diagnostic(code(config::invalid_quantum))]
    InvalidQuantum { value: u64, min: u64, max: u64 },

    #[error("Invalid capacity for {0}: must be greater than zero")]
    #[diagnostic(code(config::invalid_capacity))]
    InvalidCapacity(&'static str),

    #[error("Invalid value '{value}' for {key}")]
    #[diagnostic(code(config::invalid_value))]
    InvalidValue { key: &'static str, value: String },
}

/// Unified simulator error type with miette diagnostics
#[derive(Error, Debug, Diagnostic)]
pub enum SimulatorError {
    #[error("Process error: {0}")]
    #[diagnostic(transparent)]
    Process(#[from] ProcessError),

    #[error("Buffer error: {0}")]
    #[diagnostic(transparent)]
    Buffer(#[from] BufferError),

    #[error("Configuration error: {0}")]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::types::TerminationCause;

    #[test]
    fn test_error_display() {
        let err = ProcessError::InvalidTransition {
            pid: 3,
            from: ProcessState::Blocked,
            action: StateAction::Suspend,
        };
        assert_eq!(err.to_string(), "Process 3 cannot suspend while blocked");

        let err = ProcessError::InvalidTransition {
            pid: 4,
            from: ProcessState::Terminated(TerminationCause::Deadlock),
            action: StateAction::Resume,
        };
        assert_eq!(
            err.to_string(),
            "Process 4 cannot resume while terminated (deadlock)"
        );
    }

    #[test]
    fn test_error_serialization() {
        let err = ProcessError::NotFound(42);
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(json, r#"{"error_type":"not_found","details":42}"#);
    }

    #[test]
    fn test_unified_conversion() {
        let err: SimulatorError = BufferError::Cancelled.into();
        assert!(matches!(err, SimulatorError::Buffer(BufferError::Cancelled)));
    }
}

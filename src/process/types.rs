/*!
 * Process Types
 * Common types for process management
 */

use crate::core::errors::ConfigError;
use crate::core::types::MemoryUnits;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Why a process reached `Terminated`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationCause {
    /// Execution time exhausted
    Normal,
    /// Failed during execution
    Error,
    /// Chosen as victim to resolve a detected deadlock
    Deadlock,
    /// Explicit administrative termination
    UserRequested,
}

impl TerminationCause {
    #[inline(always)]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Error => "error",
            Self::Deadlock => "deadlock",
            Self::UserRequested => "user_requested",
        }
    }
}

/// Process state
///
/// `Terminated` carries its cause, so a cause exists exactly when the
/// process is terminated. `Terminated` is absorbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessState {
    /// Eligible to run
    Ready,
    /// Currently consuming clock units
    Running,
    /// Waiting for resources held elsewhere
    Blocked,
    /// Parked by an explicit command
    Suspended,
    /// Finished; no transition leaves this state
    Terminated(TerminationCause),
}

impl ProcessState {
    #[inline(always)]
    pub const fn is_terminated(&self) -> bool {
        matches!(self, Self::Terminated(_))
    }

    #[inline(always)]
    pub const fn termination_cause(&self) -> Option<TerminationCause> {
        match self {
            Self::Terminated(cause) => Some(*cause),
            _ => None,
        }
    }
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready => write!(f, "ready"),
            Self::Running => write!(f, "running"),
            Self::Blocked => write!(f, "blocked"),
            Self::Suspended => write!(f, "suspended"),
            Self::Terminated(cause) => write!(f, "terminated ({})", cause.as_str()),
        }
    }
}

/// State-machine operation, used to report rejected transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateAction {
    Run,
    Preempt,
    Complete,
    Block,
    Unblock,
    Suspend,
    Resume,
    Terminate,
    Request,
}

impl fmt::Display for StateAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Run => "run",
            Self::Preempt => "be preempted",
            Self::Complete => "complete",
            Self::Block => "block",
            Self::Unblock => "unblock",
            Self::Suspend => "suspend",
            Self::Resume => "resume",
            Self::Terminate => "terminate",
            Self::Request => "request resources",
        };
        f.write_str(name)
    }
}

/// Resource tag held or awaited by a process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    /// The single exclusive CPU token
    Cpu,
    /// A grant of memory units from the shared pool
    Memory(MemoryUnits),
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cpu => write!(f, "cpu"),
            Self::Memory(units) => write!(f, "memory({})", units),
        }
    }
}

/// Scheduling policy, fixed for the lifetime of one simulation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SchedulingPolicy {
    /// First-Come-First-Served, by arrival
    #[default]
    Fcfs,
    /// Shortest-Job-First, by remaining time (non-preemptive)
    Sjf,
    /// Lowest priority value first
    Priority,
    /// Fixed time quantum, FIFO rotation
    RoundRobin,
}

impl SchedulingPolicy {
    /// All policies, in menu order
    pub const ALL: [SchedulingPolicy; 4] = [
        SchedulingPolicy::Fcfs,
        SchedulingPolicy::Sjf,
        SchedulingPolicy::RoundRobin,
        SchedulingPolicy::Priority,
    ];

    /// Convert to string representation
    #[inline(always)]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Fcfs => "fcfs",
            Self::Sjf => "sjf",
            Self::Priority => "priority",
            Self::RoundRobin => "round_robin",
        }
    }

    /// Whether the quantum affects this policy
    #[inline(always)]
    pub const fn uses_quantum(&self) -> bool {
        matches!(self, Self::RoundRobin)
    }
}

impl fmt::Display for SchedulingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchedulingPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fcfs" | "fifo" => Ok(Self::Fcfs),
            "sjf" => Ok(Self::Sjf),
            "priority" | "prio" => Ok(Self::Priority),
            "round_robin" | "roundrobin" | "rr" => Ok(Self::RoundRobin),
            _ => Err(ConfigError::InvalidPolicy(s.to_string())),
        }
    }
}

impl Serialize for SchedulingPolicy {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SchedulingPolicy {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/*!
 * Simulator Limits and Constants
 *
 * Centralized location for defaults and bounds, grouped by domain.
 */

use std::time::Duration;

// =============================================================================
// RESOURCE LIMITS
// =============================================================================

/// Total memory pool managed by the resource manager
pub const DEFAULT_MEMORY_CAPACITY: u64 = 4096;

// =============================================================================
// SCHEDULER LIMITS
// =============================================================================

/// Default Round-Robin time slice
pub const DEFAULT_QUANTUM: u64 = 2;

/// Smallest accepted Round-Robin quantum
pub const MIN_QUANTUM: u64 = 1;

/// Largest accepted Round-Robin quantum
pub const MAX_QUANTUM: u64 = 10;

/// Upper bound on Round-Robin slices per batch
/// Guards against runaway loops on pathological input
pub const DEFAULT_SLICE_LIMIT: usize = 100;

/// Most urgent priority value
pub const HIGHEST_PRIORITY: u8 = 1;

/// Least urgent priority value
pub const LOWEST_PRIORITY: u8 = 10;

// =============================================================================
// PRODUCER / CONSUMER
// =============================================================================

/// Default bounded buffer capacity
pub const DEFAULT_BUFFER_CAPACITY: usize = 5;

/// Items moved through the buffer by the demo
pub const DEFAULT_DEMO_ITEMS: usize = 10;

/// Delay between two produce calls in the demo
pub const PRODUCER_PACING: Duration = Duration::from_millis(250);

/// Delay between two consume calls in the demo
pub const CONSUMER_PACING: Duration = Duration::from_millis(400);

// =============================================================================
// AUTOMATIC SIMULATION
// =============================================================================

/// Inclusive range of generated processes
pub const SIM_MIN_PROCESSES: usize = 5;
pub const SIM_MAX_PROCESSES: usize = 15;

/// Inclusive range of generated burst lengths
pub const SIM_MIN_BURST: u64 = 1;
pub const SIM_MAX_BURST: u64 = 20;

/// Inclusive range of generated memory requests
pub const SIM_MIN_MEMORY_REQUEST: u64 = 100;
pub const SIM_MAX_MEMORY_REQUEST: u64 = 1099;

/// Inclusive range of generated messages
pub const SIM_MIN_MESSAGES: usize = 2;
pub const SIM_MAX_MESSAGES: usize = 6;

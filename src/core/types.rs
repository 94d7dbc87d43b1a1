/*!
 * Core Types
 * Common types used across the simulator
 */

/// Process ID type
pub type Pid = u32;

/// Priority level (lower value = more urgent)
pub type Priority = u8;

/// Logical clock units: arrival stamps, burst lengths and elapsed time
pub type Tick = u64;

/// Memory units granted by the resource manager
pub type MemoryUnits = u64;

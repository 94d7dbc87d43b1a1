/*!
 * Core Module
 * Fundamental simulator types, ids, limits and error handling
 */

pub mod errors;
pub mod id;
pub mod limits;
pub mod types;

// Re-export for convenience
pub use errors::*;
pub use id::{LogicalClock, PidGenerator};
pub use types::*;

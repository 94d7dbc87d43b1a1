/*!
 * IPC Module
 * Bounded buffer synchronization and the producer/consumer flows built on it
 */

pub mod buffer;
pub mod cancel;
pub mod producer_consumer;

pub use buffer::BoundedBuffer;
pub use cancel::CancelToken;
pub use producer_consumer::{DemoReport, ProducerConsumer};

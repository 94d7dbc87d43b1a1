/*!
 * Bounded Buffer
 * Fixed-capacity FIFO with classic producer/consumer synchronization
 *
 * Two counting semaphores track free and filled slots; a short critical
 * section guards the queue itself and never spans an await.
 */

use crate::core::errors::{BufferError, BufferResult};
use parking_lot::Mutex;
use std::collections::VecDeque;
use tokio::sync::{Semaphore, TryAcquireError};
use tracing::trace;

/// Bounded FIFO shared between one producer and one consumer flow
///
/// Waiting in `produce`/`consume` is cancel-safe: a dropped future leaves
/// both counts and the queue untouched.
#[derive(Debug)]
pub struct BoundedBuffer<T> {
    capacity: usize,
    items: Mutex<VecDeque<T>>,
    free_slots: Semaphore,
    filled_slots: Semaphore,
}

impl<T> BoundedBuffer<T> {
    /// Create a buffer with `capacity` slots; zero is raised to one
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            items: Mutex::new(VecDeque::with_capacity(capacity)),
            free_slots: Semaphore::new(capacity),
            filled_slots: Semaphore::new(0),
        }
    }

    /// Wait for a free slot, then append `item`
    pub async fn produce(&self, item: T) -> BufferResult<()> {
        let permit = self
            .free_slots
            .acquire()
            .await
            .map_err(|_| BufferError::Closed)?;
        permit.forget();
        self.push(item);
        Ok(())
    }

    /// Wait for an item, then remove and return the head
    pub async fn consume(&self) -> BufferResult<T> {
        let permit = self
            .filled_slots
            .acquire()
            .await
            .map_err(|_| BufferError::Closed)?;
        permit.forget();
        self.pop()
    }

    /// Append without waiting
    pub fn try_produce(&self, item: T) -> BufferResult<()> {
        match self.free_slots.try_acquire() {
            Ok(permit) => permit.forget(),
            Err(TryAcquireError::NoPermits) => return Err(BufferError::Full(self.capacity)),
            Err(TryAcquireError::Closed) => return Err(BufferError::Closed),
        }
        self.push(item);
        Ok(())
    }

    /// Remove the head without waiting
    pub fn try_consume(&self) -> BufferResult<T> {
        match self.filled_slots.try_acquire() {
            Ok(permit) => permit.forget(),
            Err(TryAcquireError::NoPermits) => return Err(BufferError::Empty),
            Err(TryAcquireError::Closed) => return Err(BufferError::Closed),
        }
        self.pop()
    }

    // Caller holds a forgotten free-slot permit
    fn push(&self, item: T) {
        let len = {
            let mut items = self.items.lock();
            items.push_back(item);
            items.len()
        };
        self.filled_slots.add_permits(1);
        trace!(len, capacity = self.capacity, "Item produced");
    }

    // Caller holds a forgotten filled-slot permit
    fn pop(&self) -> BufferResult<T> {
        let (item, len) = {
            let mut items = self.items.lock();
            (items.pop_front(), items.len())
        };
        let item = item.ok_or(BufferError::Empty)?;
        self.free_slots.add_permits(1);
        trace!(len, capacity = self.capacity, "Item consumed");
        Ok(item)
    }

    /// Wake every waiter with `Closed`; later calls fail immediately
    pub fn close(&self) {
        self.free_slots.close();
        self.filled_slots.close();
    }

    pub fn is_closed(&self) -> bool {
        self.free_slots.is_closed()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }
}

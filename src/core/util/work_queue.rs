// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mutex/condvar guarded FIFO used as one worker's home queue.
//!
//! The non-blocking variants give up as soon as the lock is contended,
//! which is what lets the pool spread submissions and steal work without
//! queueing up behind a busy peer.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError, TryLockError};

/// One-shot unit of work executed by the pool.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

struct QueueState<T> {
    items: VecDeque<T>,
    done: bool,
}

pub struct WorkQueue<T = Job> {
    state: Mutex<QueueState<T>>,
    ready: Condvar,
}

impl<T> Default for WorkQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> WorkQueue<T> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(QueueState {
                items: VecDeque::new(),
                done: false,
            }),
            ready: Condvar::new(),
        }
    }

    // Jobs run outside the lock, so a poisoned guard still holds a consistent queue.
    fn lock(&self) -> MutexGuard<'_, QueueState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Hold the queue lock until the returned guard is dropped.
    #[cfg(test)]
    pub(super) fn hold(&self) -> impl Drop + '_ {
        self.lock()
    }

    fn try_lock(&self) -> Option<MutexGuard<'_, QueueState<T>>> {
        match self.state.try_lock() {
            Ok(guard) => Some(guard),
            Err(TryLockError::Poisoned(poisoned)) => Some(poisoned.into_inner()),
            Err(TryLockError::WouldBlock) => None,
        }
    }

    /// Enqueue, waiting for the lock if necessary. Wakes one waiter.
    pub fn blocking_push(&self, item: T) {
        let mut state = self.lock();
        state.items.push_back(item);
        self.ready.notify_one();
    }

    /// Enqueue only if the lock is free right now. On contention the item
    /// is handed back to the caller.
    pub fn non_blocking_push(&self, item: T) -> Result<(), T> {
        let Some(mut state) = self.try_lock() else {
            return Err(item);
        };
        state.items.push_back(item);
        self.ready.notify_one();
        Ok(())
    }

    /// Wait for an item. Returns `None` only once the queue is done and empty.
    pub fn blocking_pop(&self) -> Option<T> {
        let mut state = self.lock();
        while state.items.is_empty() && !state.done {
            state = self
                .ready
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
        state.items.pop_front()
    }

    /// Pop if the lock is free and an item is waiting.
    pub fn non_blocking_pop(&self) -> Option<T> {
        self.try_lock()?.items.pop_front()
    }

    /// Mark the queue as shutting down and wake every waiter. Idempotent.
    pub fn set_done(&self) {
        let mut state = self.lock();
        state.done = true;
        self.ready.notify_all();
    }

    pub fn is_done(&self) -> bool {
        self.lock().done
    }

    pub fn is_empty(&self) -> bool {
        self.lock().items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lock().items.len()
    }
}

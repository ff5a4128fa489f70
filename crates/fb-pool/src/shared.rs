//! `SharedArrayPool`: a lock around an [`ArrayPool`] for multi-threaded use.
//!
//! The pipeline itself is single-threaded and owns a plain `ArrayPool`.  When
//! a decision function fans out over worker threads and wants pooled scratch
//! buffers, each worker either owns its own pool or clones one of these; every
//! clone shares the same underlying shelves.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::{ArrayPool, BufferSource, PoolElement, PoolResult, PoolStats, PooledBuffer};

#[derive(Clone)]
pub struct SharedArrayPool {
    inner: Arc<Mutex<ArrayPool>>,
}

impl SharedArrayPool {
    pub fn new(max_retained_per_shape: usize) -> Self {
        Self::from_pool(ArrayPool::new(max_retained_per_shape))
    }

    pub fn from_pool(pool: ArrayPool) -> Self {
        Self { inner: Arc::new(Mutex::new(pool)) }
    }

    /// The pool holds only spare storage and counters, so a panic on another
    /// thread while holding the lock cannot leave it logically inconsistent;
    /// poisoning is ignored.
    fn lock(&self) -> MutexGuard<'_, ArrayPool> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl BufferSource for SharedArrayPool {
    fn rent<T: PoolElement>(&mut self, len: usize) -> PooledBuffer<T> {
        self.lock().rent(len)
    }

    fn release<T: PoolElement>(&mut self, buffer: PooledBuffer<T>) -> PoolResult<()> {
        self.lock().release(buffer)
    }

    fn stats(&self) -> PoolStats {
        self.lock().stats()
    }
}

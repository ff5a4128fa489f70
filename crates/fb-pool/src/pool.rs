//! `ArrayPool` and `AllocatingPool`.
//!
//! # Design
//!
//! Returned storage is kept on per-shape shelves.  Each shelf holds
//! `Vec<Vec<T>>` behind a `Box<dyn Shelf>` in a map keyed by
//! `(TypeId, shape)`, so one pool serves ids, positions, health and command
//! arrays alike.  Shelves are created lazily on first release.
//!
//! Pooling is purely a performance device.  `AllocatingPool` implements the
//! same [`BufferSource`] contract by always allocating, and the pipeline
//! behaves identically with either.

use std::any::{Any, TypeId};
use std::sync::atomic::{AtomicU32, Ordering};

use rustc_hash::FxHashMap;

use crate::{PoolElement, PoolError, PoolId, PoolResult, PoolStats, PooledBuffer};

static NEXT_POOL_ID: AtomicU32 = AtomicU32::new(1);

fn next_pool_id() -> PoolId {
    PoolId(NEXT_POOL_ID.fetch_add(1, Ordering::Relaxed))
}

// ── BufferSource ──────────────────────────────────────────────────────────────

/// Rent/return contract shared by every pool flavour.
pub trait BufferSource {
    /// Rent a buffer of exactly `len` zeroed elements.
    fn rent<T: PoolElement>(&mut self, len: usize) -> PooledBuffer<T>;

    /// Hand a buffer back.  Fails if the buffer was issued by another pool;
    /// the buffer is dropped in that case.
    fn release<T: PoolElement>(&mut self, buffer: PooledBuffer<T>) -> PoolResult<()>;

    fn stats(&self) -> PoolStats;
}

// ── Type-erased shelf ─────────────────────────────────────────────────────────

/// Type-erased interface for one `(T, shape)` shelf of spare storage.
///
/// Sealed so only [`TypedShelf`] can live in the pool's map.
trait Shelf: Send + 'static + sealed::Sealed {
    fn len(&self) -> usize;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

mod sealed {
    pub trait Sealed {}
}

struct TypedShelf<T: PoolElement>(Vec<Vec<T>>);

impl<T: PoolElement> sealed::Sealed for TypedShelf<T> {}

impl<T: PoolElement> Shelf for TypedShelf<T> {
    fn len(&self) -> usize {
        self.0.len()
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// ── ArrayPool ─────────────────────────────────────────────────────────────────

/// Buffer reuse pool keyed by element type and exact length.
///
/// # Thread safety
///
/// Single-writer: `rent`/`release` take `&mut self`.  Share across threads
/// through [`SharedArrayPool`][crate::SharedArrayPool] or give each worker
/// its own pool.
pub struct ArrayPool {
    id:                     PoolId,
    max_retained_per_shape: usize,
    shelves:                FxHashMap<(TypeId, usize), Box<dyn Shelf>>,
    stats:                  PoolStats,
}

impl ArrayPool {
    /// `max_retained_per_shape` caps how many spare buffers one shape keeps;
    /// further returns of that shape are freed.
    pub fn new(max_retained_per_shape: usize) -> Self {
        Self {
            id: next_pool_id(),
            max_retained_per_shape,
            shelves: FxHashMap::default(),
            stats: PoolStats::default(),
        }
    }

    pub fn id(&self) -> PoolId {
        self.id
    }

    /// Number of spare buffers currently shelved for `(T, shape)`.
    pub fn retained<T: PoolElement>(&self, shape: usize) -> usize {
        self.shelves
            .get(&(TypeId::of::<T>(), shape))
            .map_or(0, |s| s.len())
    }

    /// Free every shelved buffer.  Outstanding buffers are unaffected and may
    /// still be returned.
    pub fn clear(&mut self) {
        self.shelves.clear();
        self.stats.retained = 0;
    }

    fn shelf_mut<T: PoolElement>(&mut self, shape: usize) -> Option<&mut Vec<Vec<T>>> {
        self.shelves
            .get_mut(&(TypeId::of::<T>(), shape))
            .and_then(|s| s.as_any_mut().downcast_mut::<TypedShelf<T>>())
            .map(|s| &mut s.0)
    }
}

impl BufferSource for ArrayPool {
    fn rent<T: PoolElement>(&mut self, len: usize) -> PooledBuffer<T> {
        self.stats.rents += 1;
        self.stats.outstanding += 1;

        let spare = self.shelf_mut::<T>(len).and_then(|shelf| shelf.pop());
        let storage = match spare {
            Some(v) => {
                self.stats.reuses += 1;
                self.stats.retained -= 1;
                v
            }
            None => {
                self.stats.allocations += 1;
                Vec::with_capacity(len)
            }
        };
        PooledBuffer::issue(storage, len, self.id)
    }

    fn release<T: PoolElement>(&mut self, buffer: PooledBuffer<T>) -> PoolResult<()> {
        let (storage, shape, origin) = buffer.into_storage();
        if origin != self.id {
            tracing::warn!(%origin, pool = %self.id, "buffer returned to the wrong pool");
            return Err(PoolError::ForeignBuffer { pool: self.id, origin });
        }

        self.stats.releases += 1;
        self.stats.outstanding = self.stats.outstanding.saturating_sub(1);

        let cap = self.max_retained_per_shape;
        let shelf = self
            .shelves
            .entry((TypeId::of::<T>(), shape))
            .or_insert_with(|| Box::new(TypedShelf::<T>(Vec::new())));
        let Some(shelf) = shelf.as_any_mut().downcast_mut::<TypedShelf<T>>() else {
            // Key includes the TypeId, so the downcast cannot miss.
            return Ok(());
        };
        if shelf.0.len() < cap {
            shelf.0.push(storage);
            self.stats.retained += 1;
        } else {
            self.stats.discarded += 1;
        }
        Ok(())
    }

    fn stats(&self) -> PoolStats {
        self.stats
    }
}

// ── AllocatingPool ────────────────────────────────────────────────────────────

/// A [`BufferSource`] that never reuses anything.
///
/// Useful as a baseline: the pipeline must behave identically whether it is
/// fed by this or by [`ArrayPool`].
pub struct AllocatingPool {
    id:    PoolId,
    stats: PoolStats,
}

impl AllocatingPool {
    pub fn new() -> Self {
        Self { id: next_pool_id(), stats: PoolStats::default() }
    }
}

impl Default for AllocatingPool {
    fn default() -> Self {
        Self::new()
    }
}

impl BufferSource for AllocatingPool {
    fn rent<T: PoolElement>(&mut self, len: usize) -> PooledBuffer<T> {
        self.stats.rents += 1;
        self.stats.allocations += 1;
        self.stats.outstanding += 1;
        PooledBuffer::issue(Vec::with_capacity(len), len, self.id)
    }

    fn release<T: PoolElement>(&mut self, buffer: PooledBuffer<T>) -> PoolResult<()> {
        if buffer.origin() != self.id {
            return Err(PoolError::ForeignBuffer { pool: self.id, origin: buffer.origin() });
        }
        self.stats.releases += 1;
        self.stats.discarded += 1;
        self.stats.outstanding = self.stats.outstanding.saturating_sub(1);
        Ok(())
    }

    fn stats(&self) -> PoolStats {
        self.stats
    }
}

//! `PooledBuffer<T>`: an owned, fixed-shape buffer on loan from a pool.
//!
//! # Ownership model
//!
//! A buffer is a plain owned `Vec<T>` tagged with the pool it came from and
//! the shape (length) it was rented at.  Handing it back to the pool moves it,
//! so using a buffer after return, or returning it twice, does not compile:
//!
//! ```compile_fail
//! use fb_pool::{ArrayPool, BufferSource};
//!
//! let mut pool = ArrayPool::new(4);
//! let buf = pool.rent::<f32>(8);
//! pool.release(buf).unwrap();
//! pool.release(buf).unwrap(); // use of moved value
//! ```
//!
//! Nothing in a snapshot or command batch holds a pointer into a buffer;
//! per-unit data is addressed by slot index only.

use std::ops::{Deref, DerefMut};

/// Identity of the pool that issued a buffer.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct PoolId(pub u32);

impl std::fmt::Display for PoolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "pool#{}", self.0)
    }
}

/// Element types a pool can hand out.  Rented buffers are filled with
/// `T::default()`, which is the zero value for every type the bridge stores.
pub trait PoolElement: Copy + Default + Send + 'static {}

impl<T: Copy + Default + Send + 'static> PoolElement for T {}

/// An owned buffer rented from a [`BufferSource`][crate::BufferSource].
///
/// Dereferences to `[T]` of the current logical length.  The logical length
/// starts at the rented shape and may only shrink (see [`truncate`](Self::truncate)).
#[derive(Debug)]
pub struct PooledBuffer<T: PoolElement> {
    data:   Vec<T>,
    shape:  usize,
    origin: PoolId,
}

impl<T: PoolElement> PooledBuffer<T> {
    /// Wrap `data`, zero it, and size it to `shape`.  Used by pools only.
    pub(crate) fn issue(mut data: Vec<T>, shape: usize, origin: PoolId) -> Self {
        data.clear();
        data.resize(shape, T::default());
        Self { data, shape, origin }
    }

    /// The length this buffer was rented at (the pool key).
    #[inline]
    pub fn shape(&self) -> usize {
        self.shape
    }

    #[inline]
    pub fn origin(&self) -> PoolId {
        self.origin
    }

    /// Shrink the logical length to `len`.  No-op if `len >= self.len()`.
    ///
    /// The buffer still returns to its original shape's shelf.
    pub fn truncate(&mut self, len: usize) {
        self.data.truncate(len);
    }

    pub(crate) fn into_storage(self) -> (Vec<T>, usize, PoolId) {
        (self.data, self.shape, self.origin)
    }
}

impl<T: PoolElement> Deref for PooledBuffer<T> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &[T] {
        &self.data
    }
}

impl<T: PoolElement> DerefMut for PooledBuffer<T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut [T] {
        &mut self.data
    }
}

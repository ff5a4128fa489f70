use fb_core::{Frame, UnitId};
use fb_native::NativeError;
use fb_pool::PoolError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("native read failed: {0}")]
    Native(#[from] NativeError),

    #[error("buffer pool: {0}")]
    Pool(#[from] PoolError),

    /// The unit population kept growing past every re-request.
    #[error("unit ids still overflow after {attempts} requests ({reported} reported)")]
    CapacityExceeded { reported: usize, attempts: u32 },

    /// A per-id fill wrote a different number of entries than ids requested.
    #[error("{call} wrote {actual} entries for {expected} ids")]
    LengthMismatch { call: &'static str, expected: usize, actual: usize },

    #[error("unit {id} reported twice")]
    DuplicateUnit { id: UnitId },

    #[error("snapshot for frame {frame} requested after frame {last}")]
    NonMonotonicFrame { frame: Frame, last: Frame },

    /// A per-unit array disagrees with the id array on length.
    #[error("{array} has {actual} entries, expected {expected}")]
    Misaligned { array: &'static str, expected: usize, actual: usize },
}

pub type SnapshotResult<T> = Result<T, SnapshotError>;

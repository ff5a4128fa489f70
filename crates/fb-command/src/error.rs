use thiserror::Error;

use fb_core::Frame;
use fb_native::NativeError;
use fb_pool::PoolError;

/// Failures of a whole batch.  Individual command failures are outcomes,
/// not errors.
#[derive(Debug, Error)]
pub enum ExecuteError {
    #[error("batch for frame {frame} is not newer than last executed frame {last}")]
    StaleBatch { frame: Frame, last: Frame },

    #[error("native submission failed: {0}")]
    Native(#[from] NativeError),

    #[error("buffer pool: {0}")]
    Pool(#[from] PoolError),
}

pub type ExecuteResult<T> = Result<T, ExecuteError>;

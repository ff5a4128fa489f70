use thiserror::Error;

use crate::PoolId;

#[derive(Debug, Error)]
pub enum PoolError {
    #[error("buffer issued by {origin} returned to {pool}")]
    ForeignBuffer { pool: PoolId, origin: PoolId },
}

pub type PoolResult<T> = Result<T, PoolError>;

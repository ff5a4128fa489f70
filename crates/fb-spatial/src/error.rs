//! Spatial-subsystem error type.

use thiserror::Error;

use fb_core::{Frame, SlotIndex, UnitId};

/// Errors produced by `fb-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("cell size must be finite and positive, got {0}")]
    InvalidCellSize(f32),

    #[error("unit {unit} at {slot} has a non-finite position")]
    NonFiniteCoordinate { unit: UnitId, slot: SlotIndex },

    #[error("grid of {cols}×{rows} cells exceeds the cell limit")]
    GridTooLarge { cols: u64, rows: u64 },

    /// The index was built from a different frame than the snapshot queried.
    #[error("index built for frame {index} queried with snapshot of frame {snapshot}")]
    StaleIndex { index: Frame, snapshot: Frame },

    #[error("invalid query: {0}")]
    InvalidQuery(&'static str),
}

pub type SpatialResult<T> = Result<T, SpatialError>;

//! Bridge configuration supplied by the host process.
//!
//! Nothing here is computed by the bridge.  Applications typically load it
//! from JSON (see `fb_bridge::config`) and pass it to the bridge builder.

use crate::{CoreError, CoreResult, FRAMES_PER_SECOND};

/// How often the spatial index is rebuilt.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RebuildPolicy {
    /// Rebuild from every snapshot.
    #[default]
    EveryFrame,
    /// Rebuild every `n` frames; in between, queries run against the
    /// snapshot the last index was built from.
    EveryNFrames(u32),
}

/// Top-level bridge configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BridgeConfig {
    /// Edge length of one spatial-grid cell, in world units.
    pub cell_size: f32,

    pub rebuild_policy: RebuildPolicy,

    /// Buffers kept per (element type, length) pair once returned to the pool.
    pub pool_max_retained_per_shape: usize,

    /// How many times the snapshot builder may re-request the id list when
    /// the native layer reports more units than the buffer holds.
    pub max_fill_attempts: u32,

    /// Wall-clock budget for one frame's pipeline, in milliseconds.  Frames
    /// over budget are logged, not aborted.
    pub frame_budget_ms: u64,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            cell_size:                   256.0,
            rebuild_policy:              RebuildPolicy::EveryFrame,
            pool_max_retained_per_shape: 4,
            max_fill_attempts:           3,
            frame_budget_ms:             1_000 / FRAMES_PER_SECOND as u64,
        }
    }
}

impl BridgeConfig {
    /// Reject values no pipeline stage can work with.
    pub fn validate(&self) -> CoreResult<()> {
        if !self.cell_size.is_finite() || self.cell_size <= 0.0 {
            return Err(CoreError::Config(format!(
                "cell_size must be finite and positive, got {}",
                self.cell_size
            )));
        }
        if let RebuildPolicy::EveryNFrames(0) = self.rebuild_policy {
            return Err(CoreError::Config("rebuild interval must be at least 1 frame".into()));
        }
        if self.max_fill_attempts == 0 {
            return Err(CoreError::Config("max_fill_attempts must be at least 1".into()));
        }
        if self.frame_budget_ms == 0 {
            return Err(CoreError::Config("frame_budget_ms must be positive".into()));
        }
        Ok(())
    }
}

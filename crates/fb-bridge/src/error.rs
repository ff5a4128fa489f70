use std::path::PathBuf;

use fb_command::ExecuteError;
use fb_core::{CoreError, Frame};
use fb_events::AccumulatorError;
use fb_native::NativeError;
use fb_snapshot::SnapshotError;
use fb_spatial::SpatialError;
use thiserror::Error;

/// Pipeline stage a frame was in when it aborted.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Stage {
    CloseEvents,
    Snapshot,
    Spatial,
    Execute,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::CloseEvents => "close_events",
            Stage::Snapshot    => "snapshot",
            Stage::Spatial     => "spatial",
            Stage::Execute     => "execute",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The contract violation behind an aborted frame.
#[derive(Debug, Error)]
pub enum StageError {
    #[error(transparent)]
    Events(#[from] AccumulatorError),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error(transparent)]
    Spatial(#[from] SpatialError),

    #[error(transparent)]
    Execute(#[from] ExecuteError),
}

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("configuration error: {0}")]
    Config(#[from] CoreError),

    #[error("cannot read config file {path:?}: {source}")]
    ConfigIo {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("native layer error during setup: {0}")]
    Native(#[from] NativeError),

    #[error("occurrence rejected: {0}")]
    Occurrence(#[from] AccumulatorError),

    #[error("frame {frame} aborted in {stage} stage: {source}")]
    FrameAborted {
        frame:  Frame,
        stage:  Stage,
        #[source]
        source: StageError,
    },
}

pub type BridgeResult<T> = Result<T, BridgeError>;

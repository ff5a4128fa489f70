//! Loading [`BridgeConfig`] from JSON.
//!
//! Missing fields take their defaults, so `{}` is a valid config.  Every
//! loaded config is validated before it is returned.
//!
//! ```json
//! {
//!   "cell_size": 128.0,
//!   "rebuild_policy": { "every_n_frames": 3 },
//!   "frame_budget_ms": 33
//! }
//! ```

use std::path::Path;

use fb_core::BridgeConfig;

use crate::{BridgeError, BridgeResult};

pub fn from_json_str(text: &str) -> BridgeResult<BridgeConfig> {
    let config: BridgeConfig = serde_json::from_str(text)?;
    config.validate()?;
    Ok(config)
}

pub fn load(path: &Path) -> BridgeResult<BridgeConfig> {
    let text = std::fs::read_to_string(path)
        .map_err(|source| BridgeError::ConfigIo { path: path.to_path_buf(), source })?;
    let config = from_json_str(&text)?;
    tracing::debug!(path = %path.display(), ?config, "bridge config loaded");
    Ok(config)
}

pub fn to_json_string(config: &BridgeConfig) -> BridgeResult<String> {
    Ok(serde_json::to_string_pretty(config)?)
}

//! Frame counter and frame clock.
//!
//! The simulation advances in fixed frames at 30 Hz.  `Frame` is the only
//! time unit the bridge uses for ordering: snapshots, grids, event batches and
//! command batches are all stamped with the frame that produced them, and a
//! mismatch between stamps is how staleness is detected.

use std::fmt;

/// Simulation frames per second.
pub const FRAMES_PER_SECOND: u32 = 30;

// ── Frame ─────────────────────────────────────────────────────────────────────

/// A monotonically increasing simulation frame counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Frame(pub u64);

impl Frame {
    pub const ZERO: Frame = Frame(0);

    /// The frame `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Frame {
        Frame(self.0 + n)
    }

    #[inline]
    pub fn next(self) -> Frame {
        self.offset(1)
    }

    /// Frames elapsed from `earlier` to `self`, saturating at zero.
    #[inline]
    pub fn since(self, earlier: Frame) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl std::ops::Add<u64> for Frame {
    type Output = Frame;
    #[inline]
    fn add(self, rhs: u64) -> Frame {
        Frame(self.0 + rhs)
    }
}

impl std::ops::Sub for Frame {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Frame) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "F{}", self.0)
    }
}

// ── FrameClock ────────────────────────────────────────────────────────────────

/// Maps frames to game time.
#[derive(Copy, Clone, Debug)]
pub struct FrameClock {
    pub frames_per_second: u32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self { frames_per_second: FRAMES_PER_SECOND }
    }
}

impl FrameClock {
    /// Game seconds elapsed at `frame`.
    #[inline]
    pub fn game_secs(&self, frame: Frame) -> f64 {
        frame.0 as f64 / self.frames_per_second as f64
    }

    /// Number of frames in `secs` game seconds.
    #[inline]
    pub fn frames_for_secs(&self, secs: u64) -> u64 {
        secs * self.frames_per_second as u64
    }

    /// Break `frame` into (minutes, seconds) of game time for log lines.
    pub fn game_ms(&self, frame: Frame) -> (u64, u64) {
        let secs = frame.0 / self.frames_per_second.max(1) as u64;
        (secs / 60, secs % 60)
    }
}

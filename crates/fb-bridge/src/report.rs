//! `FrameReport`: what one frame of the pipeline did and what it cost.

use std::time::Duration;

use fb_core::Frame;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameReport {
    pub frame: Frame,

    /// Units in this frame's snapshot.
    pub units: usize,

    /// Events in the closed batch; `late_events` of them were stamped with
    /// a frame that had already closed, including those put back by an
    /// aborted frame.
    pub events:      usize,
    pub late_events: usize,
    /// Occurrences refused since the previous completed frame.
    pub refused_events: usize,

    pub decisions:    usize,
    /// Commands handed to the native layer.
    pub submitted:    usize,
    pub succeeded:    usize,
    pub rejected:     usize,
    pub failed:       usize,
    /// Submitted without per-command attribution.
    pub unattributed: usize,

    /// Whether the spatial index was rebuilt this frame.
    pub grid_rebuilt: bool,
    /// Frame the spatial index reflects after this frame.
    pub grid_frame:   Frame,

    /// Native calls made by the snapshot build plus the command submission.
    pub native_calls: u32,

    pub elapsed:     Duration,
    pub over_budget: bool,
}

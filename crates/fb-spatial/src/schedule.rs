//! `RebuildSchedule`: decides which frames rebuild the spatial index.

use fb_core::{Frame, RebuildPolicy};

#[derive(Clone, Debug)]
pub struct RebuildSchedule {
    policy:     RebuildPolicy,
    last_built: Option<Frame>,
}

impl RebuildSchedule {
    pub fn new(policy: RebuildPolicy) -> Self {
        Self { policy, last_built: None }
    }

    pub fn policy(&self) -> RebuildPolicy {
        self.policy
    }

    pub fn last_built(&self) -> Option<Frame> {
        self.last_built
    }

    /// `true` if the index must be rebuilt for `frame`.  Always true before
    /// the first build.  An interval of 0 behaves like 1.
    pub fn is_due(&self, frame: Frame) -> bool {
        let Some(last) = self.last_built else { return true };
        match self.policy {
            RebuildPolicy::EveryFrame => true,
            RebuildPolicy::EveryNFrames(n) => frame.since(last) >= u64::from(n.max(1)),
        }
    }

    pub fn mark_built(&mut self, frame: Frame) {
        self.last_built = Some(frame);
    }

    /// Force a rebuild on the next frame.
    pub fn invalidate(&mut self) {
        self.last_built = None;
    }
}

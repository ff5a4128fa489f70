use fb_core::Frame;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AccumulatorError {
    /// `close_frame` was called for a frame that is not newer than the last
    /// closed one.
    #[error("frame {frame} already closed (last closed: {last_closed})")]
    FrameAlreadyClosed { frame: Frame, last_closed: Frame },

    /// An occurrence arrived stamped with a frame whose batch was handed out
    /// two or more closes ago.
    #[error("occurrence stamped {stamped} arrived after frame {closed} was closed")]
    CrossFrameOccurrence { stamped: Frame, closed: Frame },
}

pub type AccumulatorResult<T> = Result<T, AccumulatorError>;

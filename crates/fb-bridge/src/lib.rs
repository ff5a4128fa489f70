//! `fb-bridge`: the frame pipeline of the frame_bridge workspace.
//!
//! # Frame pipeline
//!
//! ```text
//! on_occurrence(frame, event)    : any number of times per frame
//!   ① Accumulate: append to the open EventBatch
//!
//! on_frame_update(frame)         : once per frame
//!   ② Close     : swap out the EventBatch for `frame`
//!   ③ Snapshot  : batched native reads into pooled SoA arrays
//!   ④ Spatial   : rebuild the grid when the rebuild policy says so
//!   ⑤ Decide    : DecisionModel::decide(&FrameContext)
//!   ⑥ Translate : validate decisions against the snapshot
//!   ⑦ Execute   : one batched native submission, outcomes per decision
//!   ⑧ Report    : FrameReport to the observer
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                   |
//! |------------|----------------------------------------------------------|
//! | `parallel` | Runs the subsystems of a `DecisionSet` on Rayon.         |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use fb_bridge::{BridgeBuilder, NoopDecision, TracingObserver};
//!
//! let config = fb_bridge::config::load(Path::new("bridge.json"))?;
//! let mut bridge = BridgeBuilder::new(config, native, defs, NoopDecision)
//!     .observer(TracingObserver::default())
//!     .build()?;
//! bridge.on_frame_update(Frame(1))?;
//! ```

pub mod bridge;
pub mod builder;
pub mod config;
pub mod context;
pub mod error;
pub mod model;
pub mod observer;
pub mod report;


pub use bridge::Bridge;
pub use builder::BridgeBuilder;
pub use context::FrameContext;
pub use error::{BridgeError, BridgeResult, Stage, StageError};
pub use model::{DecisionModel, DecisionSet, NoopDecision};
pub use observer::{BridgeObserver, NoopObserver, TracingObserver};
pub use report::FrameReport;

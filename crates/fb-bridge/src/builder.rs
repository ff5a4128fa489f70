//! Fluent builder for constructing a [`Bridge`].

use std::sync::Arc;

use fb_command::{CommandBatchExecutor, CommandTranslator};
use fb_core::{BridgeConfig, DefinitionTable, FrameClock};
use fb_events::EventAccumulator;
use fb_native::{NativeCommandSink, NativeWorld};
use fb_pool::ArrayPool;
use fb_snapshot::SnapshotBuilder;
use fb_spatial::RebuildSchedule;

use crate::{Bridge, BridgeObserver, BridgeResult, DecisionModel, NoopObserver};

/// Fluent builder for [`Bridge<N, M, O>`].
///
/// # Required inputs
///
/// - [`BridgeConfig`]: cell size, rebuild policy, pool sizing, ...
/// - `N: NativeWorld + NativeCommandSink`: the native handle
/// - [`DefinitionTable`]: loaded once by the host, immutable afterwards
/// - `M: DecisionModel`: the decision function
///
/// # Optional inputs (have defaults)
///
/// | Method          | Default                                            |
/// |-----------------|----------------------------------------------------|
/// | `.observer(o)`  | [`NoopObserver`]                                   |
/// | `.pool(p)`      | `ArrayPool::new(config.pool_max_retained_per_shape)` |
///
/// # Example
///
/// ```rust,ignore
/// let mut bridge = BridgeBuilder::new(config, native, defs, NoopDecision)
///     .observer(TracingObserver::default())
///     .build()?;
/// bridge.on_occurrence(frame, event)?;
/// let report = bridge.on_frame_update(frame)?;
/// ```
pub struct BridgeBuilder<N, M, O = NoopObserver> {
    config:   BridgeConfig,
    native:   N,
    defs:     Arc<DefinitionTable>,
    model:    M,
    observer: O,
    pool:     Option<ArrayPool>,
}

impl<N, M> BridgeBuilder<N, M, NoopObserver>
where
    N: NativeWorld + NativeCommandSink,
    M: DecisionModel,
{
    /// Create a builder with all required inputs.
    pub fn new(config: BridgeConfig, native: N, defs: Arc<DefinitionTable>, model: M) -> Self {
        Self { config, native, defs, model, observer: NoopObserver, pool: None }
    }
}

impl<N, M, O> BridgeBuilder<N, M, O>
where
    N: NativeWorld + NativeCommandSink,
    M: DecisionModel,
    O: BridgeObserver,
{
    pub fn observer<O2: BridgeObserver>(self, observer: O2) -> BridgeBuilder<N, M, O2> {
        BridgeBuilder {
            config:   self.config,
            native:   self.native,
            defs:     self.defs,
            model:    self.model,
            observer,
            pool:     self.pool,
        }
    }

    /// Supply a pre-warmed pool.
    pub fn pool(mut self, pool: ArrayPool) -> Self {
        self.pool = Some(pool);
        self
    }

    /// Validate the config, read the map extent and return a bridge ready
    /// for its first frame.
    pub fn build(mut self) -> BridgeResult<Bridge<N, M, O>> {
        self.config.validate()?;
        let map = self.native.map_extent()?;
        let pool = self.pool.unwrap_or_else(|| ArrayPool::new(self.config.pool_max_retained_per_shape));

        tracing::debug!(
            width = map.width,
            height = map.height,
            definitions = self.defs.len(),
            cell_size = self.config.cell_size,
            policy = ?self.config.rebuild_policy,
            "bridge built"
        );

        Ok(Bridge {
            clock:       FrameClock::default(),
            budget:      std::time::Duration::from_millis(self.config.frame_budget_ms),
            builder:     SnapshotBuilder::from_config(&self.config),
            translator:  CommandTranslator::new(Arc::clone(&self.defs), map),
            executor:    CommandBatchExecutor::new(),
            schedule:    RebuildSchedule::new(self.config.rebuild_policy),
            events:      EventAccumulator::new(),
            config:      self.config,
            native:      self.native,
            model:       self.model,
            observer:    self.observer,
            pool,
            defs:        self.defs,
            map,
            current:     None,
            previous:    None,
            view:        None,
            outcomes:    Vec::new(),
            last_report: None,
            completed:   0,
            aborted:     0,
            refused:     0,
        })
    }
}

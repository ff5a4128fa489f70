//! The `DecisionModel` trait: where the external decision function plugs in.

use fb_command::Decision;

use crate::FrameContext;

/// The decision function the bridge calls once per frame.
///
/// Decisions refer to units by id; the bridge validates every one of them
/// against `ctx.snapshot` before anything reaches the native layer, so a
/// model never has to guard against stale ids itself.  Outcomes come back
/// through `ctx.outcomes` on the next frame.
///
/// Implementations must be `Send + Sync`: a [`DecisionSet`] may run several
/// models in parallel over the same context.
///
/// Closures `Fn(&FrameContext) -> Vec<Decision>` implement this trait.
///
/// # Example
///
/// ```rust,ignore
/// struct HoldPosition;
///
/// impl DecisionModel for HoldPosition {
///     fn decide(&self, ctx: &FrameContext<'_>) -> Vec<Decision> {
///         ctx.own_units()
///             .filter(|u| !u.flags().is_idle())
///             .map(|u| Decision::Stop { unit: u.id() })
///             .collect()
///     }
/// }
/// ```
pub trait DecisionModel: Send + Sync + 'static {
    fn decide(&self, ctx: &FrameContext<'_>) -> Vec<Decision>;

    /// Short name for log lines.
    fn name(&self) -> &str {
        "decision-model"
    }
}

impl<F> DecisionModel for F
where
    F: Fn(&FrameContext<'_>) -> Vec<Decision> + Send + Sync + 'static,
{
    fn decide(&self, ctx: &FrameContext<'_>) -> Vec<Decision> {
        self(ctx)
    }
}

/// A [`DecisionModel`] that never decides anything.
pub struct NoopDecision;

impl DecisionModel for NoopDecision {
    fn decide(&self, _ctx: &FrameContext<'_>) -> Vec<Decision> {
        vec![]
    }

    fn name(&self) -> &str {
        "noop"
    }
}

// ── DecisionSet ───────────────────────────────────────────────────────────────

/// Several decision subsystems (economy, army, scouting, ...) run over the
/// same frame context.
///
/// Their outputs are concatenated in insertion order.  With the `parallel`
/// feature the subsystems run on Rayon's thread pool; the concatenation
/// order is unchanged, so the resulting decision list is the same either way.
#[derive(Default)]
pub struct DecisionSet {
    models: Vec<Box<dyn DecisionModel>>,
}

impl DecisionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<M: DecisionModel>(mut self, model: M) -> Self {
        self.push(model);
        self
    }

    pub fn push<M: DecisionModel>(&mut self, model: M) {
        self.models.push(Box::new(model));
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl DecisionModel for DecisionSet {
    fn decide(&self, ctx: &FrameContext<'_>) -> Vec<Decision> {
        #[cfg(not(feature = "parallel"))]
        {
            self.models.iter().flat_map(|m| m.decide(ctx)).collect()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            let parts: Vec<Vec<Decision>> = self.models.par_iter().map(|m| m.decide(ctx)).collect();
            parts.concat()
        }
    }

    fn name(&self) -> &str {
        "decision-set"
    }
}

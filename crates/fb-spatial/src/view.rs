//! `SpatialView`: an index bundled with the snapshot it was built from.
//!
//! Decision code queries through a view, so it cannot pair an index with the
//! wrong frame.  When the index is rebuilt only every few frames, the view
//! keeps answering from its own (older) snapshot; callers see the frame it
//! reflects through [`SpatialView::frame`].

use std::sync::Arc;

use fb_core::{Frame, Position, UnitId};
use fb_snapshot::{UnitView, WorldSnapshot};

use crate::{SpatialError, SpatialIndex, SpatialResult};

#[derive(Clone)]
pub struct SpatialView {
    index:    Arc<SpatialIndex>,
    snapshot: Arc<WorldSnapshot>,
}

impl SpatialView {
    /// Build an index over `snapshot` and pair the two.
    pub fn build(snapshot: Arc<WorldSnapshot>, cell_size: f32) -> SpatialResult<Self> {
        let index = SpatialIndex::build(&snapshot, cell_size)?;
        Ok(Self { index: Arc::new(index), snapshot })
    }

    /// Pair an existing index with its source snapshot.
    pub fn new(index: SpatialIndex, snapshot: Arc<WorldSnapshot>) -> SpatialResult<Self> {
        if index.frame() != snapshot.frame() {
            return Err(SpatialError::StaleIndex { index: index.frame(), snapshot: snapshot.frame() });
        }
        Ok(Self { index: Arc::new(index), snapshot })
    }

    /// Frame the view reflects.
    pub fn frame(&self) -> Frame {
        self.index.frame()
    }

    pub fn index(&self) -> &SpatialIndex {
        &self.index
    }

    pub fn snapshot(&self) -> &Arc<WorldSnapshot> {
        &self.snapshot
    }

    /// `true` if the view was built from `snapshot`'s frame.
    pub fn is_current_for(&self, snapshot: &WorldSnapshot) -> bool {
        self.frame() == snapshot.frame()
    }

    pub fn query_radius(&self, center: Position, radius: f32) -> SpatialResult<Vec<UnitId>> {
        self.index.query_radius(&self.snapshot, center, radius)
    }

    pub fn query_radius_limited(&self, center: Position, radius: f32, max_results: usize) -> SpatialResult<Vec<UnitId>> {
        self.index.query_radius_limited(&self.snapshot, center, radius, max_results)
    }

    pub fn query_area(&self, min: Position, max: Position) -> SpatialResult<Vec<UnitId>> {
        self.index.query_area(&self.snapshot, min, max)
    }

    pub fn nearest<F>(&self, center: Position, max_radius: f32, accept: F) -> SpatialResult<Option<(UnitId, f32)>>
    where
        F: FnMut(&UnitView<'_>) -> bool,
    {
        self.index.nearest(&self.snapshot, center, max_radius, accept)
    }

    /// Give up the snapshot reference so its buffers can be recycled.
    pub fn into_snapshot(self) -> Arc<WorldSnapshot> {
        self.snapshot
    }
}

impl std::fmt::Debug for SpatialView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpatialView")
            .field("frame", &self.frame())
            .field("dimensions", &self.index.dimensions())
            .field("units", &self.index.unit_count())
            .finish()
    }
}

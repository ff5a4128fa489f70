//! `SpatialIndex`: a uniform grid over one snapshot's positions.
//!
//! # Data layout
//!
//! Cells use **Compressed Sparse Row (CSR)** layout.  The slots of cell `c`
//! occupy:
//!
//! ```text
//! cell_slots[ cell_start[c] .. cell_start[c+1] ]
//! ```
//!
//! Cells are numbered row-major (`row * cols + col`) and slots within a cell
//! are ascending, so every query result has a fixed order for a given
//! snapshot.
//!
//! # Cell assignment
//!
//! Cells are aligned to the world origin: a position falls in cell
//! `floor(x / cell_size), floor(z / cell_size)`, rounding toward −∞.  The grid
//! spans only the occupied bounding box, offset by its minimum cell.
//!
//! The index stores slot numbers only, never positions, and carries the frame
//! of the snapshot it was built from.  Every query takes that snapshot and
//! refuses any other frame.

use fb_core::{Frame, Position, SlotIndex, UnitId};
use fb_snapshot::{UnitView, WorldSnapshot};

use crate::{SpatialError, SpatialResult};

/// Upper bound on `cols × rows`.  A grid this size costs 16 MiB of row
/// pointers; anything larger means the cell size is wrong for the map.
pub const MAX_CELLS: u64 = 1 << 22;

#[inline]
fn cell_coord(v: f32, cell_size: f32) -> i64 {
    (f64::from(v) / f64::from(cell_size)).floor() as i64
}

/// Clamp the absolute cell range `lo..=hi` to a grid axis starting at
/// `origin` with `len` cells.  Returns local indices.
#[inline]
fn clamp_axis(lo: i64, hi: i64, origin: i64, len: u32) -> Option<(usize, usize)> {
    if len == 0 {
        return None;
    }
    let lo = lo.max(origin);
    let hi = hi.min(origin + i64::from(len) - 1);
    (lo <= hi).then(|| ((lo - origin) as usize, (hi - origin) as usize))
}

/// Occupancy figures for one index.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct GridStats {
    pub cols:         u32,
    pub rows:         u32,
    pub occupied:     usize,
    pub max_per_cell: usize,
    pub units:        usize,
}

pub struct SpatialIndex {
    frame:      Frame,
    cell_size:  f32,
    origin_col: i64,
    origin_row: i64,
    cols:       u32,
    rows:       u32,
    /// CSR row pointer.  Length = `cols * rows + 1`.
    cell_start: Vec<u32>,
    cell_slots: Vec<SlotIndex>,
}

impl std::fmt::Debug for SpatialIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpatialIndex")
            .field("frame", &self.frame)
            .field("cell_size", &self.cell_size)
            .field("origin", &(self.origin_col, self.origin_row))
            .field("dimensions", &(self.cols, self.rows))
            .field("units", &self.cell_slots.len())
            .finish()
    }
}

impl SpatialIndex {
    /// Bucket every unit of `snapshot` into a grid of `cell_size` cells.
    ///
    /// Time complexity: O(N + cells), two passes over positions plus a
    /// counting sort.
    pub fn build(snapshot: &WorldSnapshot, cell_size: f32) -> SpatialResult<Self> {
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(SpatialError::InvalidCellSize(cell_size));
        }
        let frame = snapshot.frame();
        let positions = snapshot.positions();
        if positions.is_empty() {
            return Ok(Self {
                frame,
                cell_size,
                origin_col: 0,
                origin_row: 0,
                cols: 0,
                rows: 0,
                cell_start: vec![0],
                cell_slots: Vec::new(),
            });
        }

        let mut coords = Vec::with_capacity(positions.len());
        let (mut min_c, mut max_c) = (i64::MAX, i64::MIN);
        let (mut min_r, mut max_r) = (i64::MAX, i64::MIN);
        for (slot, pos) in positions.iter().enumerate() {
            if !pos.x.is_finite() || !pos.z.is_finite() {
                return Err(SpatialError::NonFiniteCoordinate {
                    unit: snapshot.ids()[slot],
                    slot: SlotIndex(slot as u32),
                });
            }
            let c = cell_coord(pos.x, cell_size);
            let r = cell_coord(pos.z, cell_size);
            min_c = min_c.min(c);
            max_c = max_c.max(c);
            min_r = min_r.min(r);
            max_r = max_r.max(r);
            coords.push((c, r));
        }

        let span = |lo: i64, hi: i64| u64::try_from(i128::from(hi) - i128::from(lo) + 1).unwrap_or(u64::MAX);
        let (cols, rows) = (span(min_c, max_c), span(min_r, max_r));
        if cols.saturating_mul(rows) > MAX_CELLS {
            return Err(SpatialError::GridTooLarge { cols, rows });
        }
        let cell_count = (cols * rows) as usize;
        let local = |(c, r): (i64, i64)| (r - min_r) as usize * cols as usize + (c - min_c) as usize;

        // Counting sort into CSR.
        let mut cell_start = vec![0u32; cell_count + 1];
        for &cr in &coords {
            cell_start[local(cr) + 1] += 1;
        }
        for i in 1..=cell_count {
            cell_start[i] += cell_start[i - 1];
        }
        let mut cursor = cell_start[..cell_count].to_vec();
        let mut cell_slots = vec![SlotIndex::INVALID; coords.len()];
        for (slot, &cr) in coords.iter().enumerate() {
            let cell = local(cr);
            cell_slots[cursor[cell] as usize] = SlotIndex(slot as u32);
            cursor[cell] += 1;
        }

        tracing::debug!(%frame, units = coords.len(), cols, rows, "spatial index built");
        Ok(Self {
            frame,
            cell_size,
            origin_col: min_c,
            origin_row: min_r,
            cols: cols as u32,
            rows: rows as u32,
            cell_start,
            cell_slots,
        })
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    #[inline]
    pub fn frame(&self) -> Frame {
        self.frame
    }

    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// `(cols, rows)`.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.cols, self.rows)
    }

    pub fn cell_count(&self) -> usize {
        self.cell_start.len() - 1
    }

    pub fn unit_count(&self) -> usize {
        self.cell_slots.len()
    }

    /// Slots of every cell, row-major.
    pub fn cells(&self) -> impl Iterator<Item = &[SlotIndex]> + '_ {
        self.cell_start.windows(2).map(|w| &self.cell_slots[w[0] as usize..w[1] as usize])
    }

    pub fn stats(&self) -> GridStats {
        let mut stats = GridStats { cols: self.cols, rows: self.rows, units: self.unit_count(), ..Default::default() };
        for cell in self.cells().filter(|c| !c.is_empty()) {
            stats.occupied += 1;
            stats.max_per_cell = stats.max_per_cell.max(cell.len());
        }
        stats
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Ids of all units within `radius` of `center` on the x/z plane,
    /// boundary inclusive.  Cell-major, slot-ascending order.
    ///
    /// A negative radius matches nothing.
    pub fn query_radius(&self, snapshot: &WorldSnapshot, center: Position, radius: f32) -> SpatialResult<Vec<UnitId>> {
        let ids = snapshot.ids();
        let mut out = Vec::new();
        self.for_each_in_radius(snapshot, center, radius, |slot| {
            out.push(ids[slot.index()]);
            true
        })?;
        Ok(out)
    }

    /// The first `max_results` ids [`query_radius`](Self::query_radius)
    /// would return.
    pub fn query_radius_limited(
        &self,
        snapshot:    &WorldSnapshot,
        center:      Position,
        radius:      f32,
        max_results: usize,
    ) -> SpatialResult<Vec<UnitId>> {
        let ids = snapshot.ids();
        let mut out = Vec::with_capacity(max_results.min(64));
        if max_results == 0 {
            self.check_frame(snapshot)?;
            return Ok(out);
        }
        self.for_each_in_radius(snapshot, center, radius, |slot| {
            out.push(ids[slot.index()]);
            out.len() < max_results
        })?;
        Ok(out)
    }

    /// Ids of all units inside the axis-aligned box `min..=max` on the x/z
    /// plane.  An inverted box matches nothing.
    pub fn query_area(&self, snapshot: &WorldSnapshot, min: Position, max: Position) -> SpatialResult<Vec<UnitId>> {
        self.check_frame(snapshot)?;
        if !(min.x.is_finite() && min.z.is_finite() && max.x.is_finite() && max.z.is_finite()) {
            return Err(SpatialError::InvalidQuery("non-finite area bounds"));
        }
        let mut out = Vec::new();
        if min.x > max.x || min.z > max.z {
            return Ok(out);
        }
        let cs = self.cell_size;
        let cols = clamp_axis(cell_coord(min.x, cs), cell_coord(max.x, cs), self.origin_col, self.cols);
        let rows = clamp_axis(cell_coord(min.z, cs), cell_coord(max.z, cs), self.origin_row, self.rows);
        let (Some((c0, c1)), Some((r0, r1))) = (cols, rows) else {
            return Ok(out);
        };

        let (ids, positions) = (snapshot.ids(), snapshot.positions());
        for row in r0..=r1 {
            for col in c0..=c1 {
                for &slot in self.cell(col, row) {
                    if positions[slot.index()].within_area(min, max) {
                        out.push(ids[slot.index()]);
                    }
                }
            }
        }
        Ok(out)
    }

    /// Closest unit to `center` within `max_radius` that satisfies `accept`,
    /// with its distance.  Searches outward ring by ring and stops once no
    /// closer unit can exist.  Ties go to the lower slot.
    pub fn nearest<F>(
        &self,
        snapshot:   &WorldSnapshot,
        center:     Position,
        max_radius: f32,
        mut accept: F,
    ) -> SpatialResult<Option<(UnitId, f32)>>
    where
        F: FnMut(&UnitView<'_>) -> bool,
    {
        self.check_frame(snapshot)?;
        check_query(center, max_radius)?;
        if max_radius < 0.0 || self.cols == 0 {
            return Ok(None);
        }

        let cs = self.cell_size;
        let (ccol, crow) = (cell_coord(center.x, cs), cell_coord(center.z, cs));
        let (gc0, gr0) = (self.origin_col, self.origin_row);
        let (gc1, gr1) = (gc0 + i64::from(self.cols) - 1, gr0 + i64::from(self.rows) - 1);

        // Rings closer than the grid are empty; rings past the far corner too.
        let first = [gc0.saturating_sub(ccol), ccol.saturating_sub(gc1), gr0.saturating_sub(crow), crow.saturating_sub(gr1), 0]
            .into_iter()
            .max()
            .unwrap_or(0);
        let last = [ccol.saturating_sub(gc0), gc1.saturating_sub(ccol), crow.saturating_sub(gr0), gr1.saturating_sub(crow)]
            .into_iter()
            .map(i64::abs)
            .max()
            .unwrap_or(0);

        let max_sq = max_radius * max_radius;
        let positions = snapshot.positions();
        let mut best: Option<(f32, SlotIndex)> = None;
        let mut visit = |slot: SlotIndex, best: &mut Option<(f32, SlotIndex)>| {
            let d2 = positions[slot.index()].distance_sq_2d(center);
            if d2 > max_sq {
                return;
            }
            let better = best.is_none_or(|(bd, bs)| d2 < bd || (d2 == bd && slot < bs));
            if better && accept(&snapshot.unit(slot)) {
                *best = Some((d2, slot));
            }
        };

        let mut k = first;
        while k <= last {
            let (r_lo, r_hi) = (crow.saturating_sub(k).max(gr0), crow.saturating_add(k).min(gr1));
            for r in r_lo..=r_hi {
                let row = (r - gr0) as usize;
                if (r - crow).abs() == k {
                    let (c_lo, c_hi) = (ccol.saturating_sub(k).max(gc0), ccol.saturating_add(k).min(gc1));
                    for c in c_lo..=c_hi {
                        for &slot in self.cell((c - gc0) as usize, row) {
                            visit(slot, &mut best);
                        }
                    }
                } else {
                    for c in [ccol.saturating_sub(k), ccol.saturating_add(k)] {
                        if (gc0..=gc1).contains(&c) {
                            for &slot in self.cell((c - gc0) as usize, row) {
                                visit(slot, &mut best);
                            }
                        }
                    }
                }
            }
            // Anything in ring k+1 is at least k cells away.
            let reach = k as f32 * cs;
            if best.is_some_and(|(d2, _)| d2 <= reach * reach) || reach > max_radius {
                break;
            }
            k += 1;
        }

        let ids = snapshot.ids();
        Ok(best.map(|(d2, slot)| (ids[slot.index()], d2.sqrt())))
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn check_frame(&self, snapshot: &WorldSnapshot) -> SpatialResult<()> {
        if snapshot.frame() == self.frame {
            Ok(())
        } else {
            Err(SpatialError::StaleIndex { index: self.frame, snapshot: snapshot.frame() })
        }
    }

    #[inline]
    fn cell(&self, col: usize, row: usize) -> &[SlotIndex] {
        let c = row * self.cols as usize + col;
        &self.cell_slots[self.cell_start[c] as usize..self.cell_start[c + 1] as usize]
    }

    /// Visit matching slots in result order until `visit` returns `false`.
    fn for_each_in_radius<F>(&self, snapshot: &WorldSnapshot, center: Position, radius: f32, mut visit: F) -> SpatialResult<()>
    where
        F: FnMut(SlotIndex) -> bool,
    {
        self.check_frame(snapshot)?;
        check_query(center, radius)?;
        if radius < 0.0 {
            return Ok(());
        }

        let cs = self.cell_size;
        let reach = radius + cs;
        let cols = clamp_axis(cell_coord(center.x - reach, cs), cell_coord(center.x + reach, cs), self.origin_col, self.cols);
        let rows = clamp_axis(cell_coord(center.z - reach, cs), cell_coord(center.z + reach, cs), self.origin_row, self.rows);
        let (Some((c0, c1)), Some((r0, r1))) = (cols, rows) else {
            return Ok(());
        };

        let (reach_sq, radius_sq) = (reach * reach, radius * radius);
        let positions = snapshot.positions();
        for row in r0..=r1 {
            let cz = ((self.origin_row + row as i64) as f32 + 0.5) * cs;
            for col in c0..=c1 {
                let cx = ((self.origin_col + col as i64) as f32 + 0.5) * cs;
                if Position::ground(cx, cz).distance_sq_2d(center) > reach_sq {
                    continue;
                }
                for &slot in self.cell(col, row) {
                    if positions[slot.index()].distance_sq_2d(center) <= radius_sq && !visit(slot) {
                        return Ok(());
                    }
                }
            }
        }
        Ok(())
    }
}

fn check_query(center: Position, radius: f32) -> SpatialResult<()> {
    if !center.x.is_finite() || !center.z.is_finite() || radius.is_nan() {
        return Err(SpatialError::InvalidQuery("non-finite center or radius"));
    }
    Ok(())
}

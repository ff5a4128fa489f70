//! Pool counters.

/// Running totals since the pool was created.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Calls to `rent`.
    pub rents:       u64,
    /// Rents served from a shelf.
    pub reuses:      u64,
    /// Rents that had to allocate.
    pub allocations: u64,
    pub releases:    u64,
    /// Releases freed because the shelf was full.
    pub discarded:   u64,
    /// Buffers currently on loan.
    pub outstanding: usize,
    /// Buffers currently shelved.
    pub retained:    usize,
}

impl PoolStats {
    /// Fraction of rents served without allocating.
    pub fn reuse_ratio(&self) -> f64 {
        if self.rents == 0 {
            0.0
        } else {
            self.reuses as f64 / self.rents as f64
        }
    }
}

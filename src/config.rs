//! Configuration for the allocation pipeline.

/// Options controlling one allocation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocatorConfig {
    /// Number of physical registers available (`k` in spec terms). Must be >= 1.
    pub k: usize,

    /// Safety bound on the number of spill rounds the driver will attempt
    /// before failing with [`crate::error::AllocError::UnallocatableProgram`].
    /// `None` uses the driver's default bound (`symbol_count + 1`).
    pub max_spill_rounds: Option<usize>,
}

impl AllocatorConfig {
    /// Creates a configuration for `k` physical registers, using the
    /// driver's default spill-round safety bound.
    #[must_use]
    pub const fn new(k: usize) -> Self {
        Self { k, max_spill_rounds: None }
    }

    /// Overrides the spill-round safety bound.
    #[must_use]
    pub const fn with_max_spill_rounds(mut self, rounds: usize) -> Self {
        self.max_spill_rounds = Some(rounds);
        self
    }
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self { k: 4, max_spill_rounds: None }
    }
}

//! # Error Module
//!
//! Error types surfaced at the [`crate::driver::AllocationDriver`] boundary.
//! No stage below the driver recovers locally: any detected invariant
//! violation or malformed input aborts the allocation and is reported here.

use crate::ir::Symbol;
use std::collections::BTreeSet;
use thiserror::Error;

/// Errors produced by the allocation pipeline.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AllocError {
    /// Malformed input: negative frequency, `k < 1`, a duplicate definition
    /// within one instruction, or an empty program.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The driver's safety bound on spill rounds was exceeded. Carries the
    /// accumulated spill set at the point of failure for diagnosis.
    #[error("program could not be allocated after {rounds} spill round(s); spilled so far: {spilled:?}")]
    UnallocatableProgram {
        /// Number of spill rounds attempted before giving up.
        rounds: usize,
        /// Symbols already selected for spilling when the bound was hit.
        spilled: BTreeSet<Symbol>,
    },

    /// A bug in the pipeline was detected: graph asymmetry, a degree
    /// mismatch, or a select-phase node with no available color.
    #[error("internal invariant violated: {0}")]
    InternalInvariantViolation(String),
}

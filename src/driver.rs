//! Orchestrates Liveness → Graph → Coalesce → Cost → Color to fixpoint,
//! rewriting spills between rounds.

use crate::coalesce::Coalescer;
use crate::color::{ColorResult, Colorer, Coloring};
use crate::config::AllocatorConfig;
use crate::cost::SpillCostEstimator;
use crate::error::AllocError;
use crate::graph::InterferenceGraph;
use crate::ir::{IntermediateProgram, Symbol};
use crate::liveness::LivenessAnalyzer;
use crate::spill::SpillRewriter;
use std::collections::BTreeSet;

/// Output of a successful allocation.
#[derive(Debug, Clone)]
pub struct Allocation {
    /// Symbol → color index in `[0, k)`, for every non-spilled symbol in
    /// the final program.
    pub coloring: Coloring,
    /// Original symbols demoted to memory across all spill rounds.
    pub spilled: BTreeSet<Symbol>,
    /// The final rewritten instruction sequence (equal to the input if no
    /// spills were required).
    pub program: IntermediateProgram,
}

/// Orchestrates the allocation pipeline to fixpoint.
#[derive(Debug, Default)]
pub struct AllocationDriver {
    config: AllocatorConfig,
}

impl AllocationDriver {
    #[must_use]
    pub const fn new(config: AllocatorConfig) -> Self {
        Self { config }
    }

    /// Runs the allocator on `program`, iterating spill rounds until a
    /// coloring is found or the safety bound is exceeded.
    ///
    /// # Errors
    ///
    /// Returns [`AllocError::InvalidInput`] if `k < 1`. Returns
    /// [`AllocError::UnallocatableProgram`] if the spill-round safety bound
    /// is exceeded. Propagates [`AllocError::InternalInvariantViolation`]
    /// from the graph builder or colorer.
    pub fn allocate(&self, program: IntermediateProgram) -> Result<Allocation, AllocError> {
        if self.config.k < 1 {
            return Err(AllocError::InvalidInput("k must be >= 1".into()));
        }

        let symbol_count = program.symbols().collect::<std::collections::HashSet<_>>().len();
        let max_rounds = self.config.max_spill_rounds.unwrap_or(symbol_count + 1);

        let mut current = program;
        let mut accumulated_spills: BTreeSet<Symbol> = BTreeSet::new();

        for round in 0..=max_rounds {
            let liveness = LivenessAnalyzer::new().analyze(&current);
            let mut graph = InterferenceGraph::build(&current, &liveness)?;
            let coalesced_instructions = Coalescer::new().run(&current, &mut graph);
            let coalesced = IntermediateProgram { instructions: coalesced_instructions, frequencies: current.frequencies.clone() };

            let costs = SpillCostEstimator::new().estimate(&coalesced);

            match Colorer::new().color(&graph, &costs, self.config.k)? {
                ColorResult::Colored(coloring) => {
                    return Ok(Allocation { coloring, spilled: accumulated_spills, program: coalesced });
                }
                ColorResult::Spill(spill_set) => {
                    eprintln!("allocation driver: spill round {round} spilling {} symbol(s)", spill_set.len());
                    accumulated_spills.extend(spill_set.iter().cloned());
                    current = SpillRewriter::new().rewrite(&coalesced, &spill_set);
                }
            }
        }

        Err(AllocError::UnallocatableProgram { rounds: max_rounds, spilled: accumulated_spills })
    }
}

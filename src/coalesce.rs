//! Folds copy instructions by merging source and target nodes when safe.

use crate::graph::InterferenceGraph;
use crate::ir::{Instruction, IntermediateProgram};

/// Repeatedly merges the two endpoints of any copy instruction when the
/// endpoints do not interfere, removing the copy from the instruction
/// stream. A copy whose endpoints already resolve to the same node is
/// removed as redundant; a copy whose endpoints interfere is left in place.
#[derive(Debug, Default)]
pub struct Coalescer;

impl Coalescer {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Coalesces `program` against `graph`, mutating `graph` in place with
    /// each successful merge, and returns the instruction list with
    /// subsumed copies removed.
    ///
    /// Scans in program order; ties are resolved by first occurrence.
    /// Iterates full scans until one produces no new merge, per spec.
    pub fn run(&self, program: &IntermediateProgram, graph: &mut InterferenceGraph) -> Vec<Instruction> {
        let mut instructions = program.instructions.clone();

        loop {
            let mut merged_any = false;
            let mut kept = Vec::with_capacity(instructions.len());

            for instr in instructions {
                if let Some((def, use_site)) = instr.copy_pair() {
                    let x = graph.get_or_create_node(&def.symbol);
                    let y = graph.get_or_create_node(&use_site.symbol);

                    if x == y {
                        // Already the same node: redundant copy, drop it.
                        merged_any = true;
                        continue;
                    }
                    if !graph.has_edge(x, y) {
                        graph.merge(x, y);
                        merged_any = true;
                        continue;
                    }
                }
                kept.push(instr);
            }

            instructions = kept;
            if !merged_any {
                break;
            }
        }

        instructions
    }
}

//! Assigns a numeric spill cost to every symbol.

use crate::ir::{IntermediateProgram, Symbol};
use std::collections::HashMap;

/// `Cost(s) = sum over instructions i that define or use s of frequency(block_of(i))`.
///
/// Each def and each use contributes one unit weighted by its block's
/// frequency. A symbol with no occurrences has cost 0.
#[derive(Debug, Default)]
pub struct SpillCostEstimator;

impl SpillCostEstimator {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    #[must_use]
    pub fn estimate(&self, program: &IntermediateProgram) -> HashMap<Symbol, f64> {
        let mut cost: HashMap<Symbol, f64> = HashMap::new();

        for instr in &program.instructions {
            let freq = program.frequency_of(&instr.block);
            for def in &instr.defs {
                *cost.entry(def.symbol.clone()).or_insert(0.0) += freq;
            }
            for use_site in &instr.uses {
                *cost.entry(use_site.symbol.clone()).or_insert(0.0) += freq;
            }
        }

        cost
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::InstructionDescriptor;
    use std::collections::HashMap as StdHashMap;

    #[test]
    fn s4_expected_costs() {
        // top=1, left=0.75, right=0.25, bottom=1
        let freqs: StdHashMap<String, f64> =
            [("top".into(), 1.0), ("left".into(), 0.75), ("right".into(), 0.25), ("bottom".into(), 1.0)]
                .into_iter()
                .collect();

        let descs = vec![
            InstructionDescriptor::new("a used in top", "top").with_use("a", false),
            InstructionDescriptor::new("a used in top 2", "top").with_use("a", false),
            InstructionDescriptor::new("b defined in left", "left").with_def("b", false),
            InstructionDescriptor::new("b used in left 2", "left").with_use("b", false),
            InstructionDescriptor::new("c used in top", "top").with_use("c", false),
            InstructionDescriptor::new("c used in right", "right").with_use("c", false),
        ];
        let program = IntermediateProgram::build(descs, freqs).unwrap();
        let costs = SpillCostEstimator::new().estimate(&program);

        assert!((costs[&Symbol::from("a")] - 2.0).abs() < 1e-9);
        assert!((costs[&Symbol::from("b")] - 1.5).abs() < 1e-9);
        assert!((costs[&Symbol::from("c")] - 1.25).abs() < 1e-9);
    }

    #[test]
    fn symbol_with_no_occurrences_has_zero_cost() {
        let descs = vec![InstructionDescriptor::new("noop", "entry")];
        let program = IntermediateProgram::build(descs, StdHashMap::new()).unwrap();
        let costs = SpillCostEstimator::new().estimate(&program);
        assert_eq!(costs.get(&Symbol::from("unused")), None);
    }
}

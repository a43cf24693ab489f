//! Single backward pass computing per-instruction live sets from last-use
//! markers.

use crate::ir::{IntermediateProgram, Symbol};
use std::collections::HashSet;

/// Live-in/live-out sets for every instruction in a program, indexed by
/// position in [`IntermediateProgram::instructions`].
#[derive(Debug, Clone, Default)]
pub struct LivenessInfo {
    pub live_in: Vec<HashSet<Symbol>>,
    pub live_out: Vec<HashSet<Symbol>>,
}

impl LivenessInfo {
    /// Live-out set of the instruction at `index`.
    #[must_use]
    pub fn live_out_at(&self, index: usize) -> &HashSet<Symbol> {
        &self.live_out[index]
    }

    /// Live-in set of the instruction at `index`.
    #[must_use]
    pub fn live_in_at(&self, index: usize) -> &HashSet<Symbol> {
        &self.live_in[index]
    }
}

/// Computes live-in/live-out sets by scanning the instruction stream
/// backward once, maintaining a running live set.
///
/// A use referencing a symbol with no prior definition anywhere in the
/// program is treated as a live-on-entry formal parameter: the backward
/// scan simply never removes it, so it stays live through the start of the
/// program. No error is raised for this case.
#[derive(Debug, Default)]
pub struct LivenessAnalyzer;

impl LivenessAnalyzer {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Runs the backward pass over `program`.
    #[must_use]
    pub fn analyze(&self, program: &IntermediateProgram) -> LivenessInfo {
        let len = program.instructions.len();
        let mut live_in = vec![HashSet::new(); len];
        let mut live_out = vec![HashSet::new(); len];
        let mut live: HashSet<Symbol> = HashSet::new();

        for i in (0..len).rev() {
            let instr = &program.instructions[i];

            live_out[i] = live.clone();

            for def in &instr.defs {
                live.remove(&def.symbol);
            }
            for use_site in &instr.uses {
                live.insert(use_site.symbol.clone());
            }

            live_in[i] = live.clone();
        }

        LivenessInfo { live_in, live_out }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{InstructionDescriptor};
    use std::collections::HashMap;

    fn prog() -> IntermediateProgram {
        // b := a+2; c := b*b; b := c+1; return b*a
        let descs = vec![
            InstructionDescriptor::new("b := a+2", "entry").with_def("b", false).with_use("a", false),
            InstructionDescriptor::new("c := b*b", "entry").with_def("c", false).with_use("b", true),
            InstructionDescriptor::new("b := c+1", "entry").with_def("b", false).with_use("c", true),
            InstructionDescriptor::new("return b*a", "entry").with_use("b", true).with_use("a", true),
        ];
        IntermediateProgram::build(descs, HashMap::new()).unwrap()
    }

    #[test]
    fn backward_scan_tracks_live_ranges() {
        let program = prog();
        let info = LivenessAnalyzer::new().analyze(&program);

        // 'a' is live on entry and stays live until its last use at instr 3.
        assert!(info.live_in_at(0).contains(&Symbol::from("a")));
        assert!(info.live_out_at(2).contains(&Symbol::from("a")));

        // first def of 'b' is live-out of instr 0 until its last use at instr 1.
        assert!(info.live_out_at(0).contains(&Symbol::from("b")));
        assert!(!info.live_out_at(1).contains(&Symbol::from("b")));

        // 'c' lives between its def at instr 1 and its use at instr 2.
        assert!(info.live_out_at(1).contains(&Symbol::from("c")));
        assert!(!info.live_out_at(2).contains(&Symbol::from("c")));

        // nothing is live past the final instruction.
        assert!(info.live_out_at(3).is_empty());
    }

    #[test]
    fn undefined_use_is_treated_as_live_on_entry() {
        let descs = vec![InstructionDescriptor::new("use p", "entry").with_use("p", true)];
        let program = IntermediateProgram::build(descs, HashMap::new()).unwrap();
        let info = LivenessAnalyzer::new().analyze(&program);
        assert!(info.live_in_at(0).contains(&Symbol::from("p")));
    }
}

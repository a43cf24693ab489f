//! Transforms the instruction stream to materialize spills and reloads.

use crate::color::SpillSet;
use crate::ir::{BlockId, DefSite, Instruction, InstructionKind, IntermediateProgram, Symbol, UseSite};

/// Rewrites a program so every spilled symbol lives in memory, reloaded
/// before each use and stored after each definition.
///
/// For each instruction that uses a spilled symbol `s`, a reload
/// pseudo-instruction is inserted immediately before it, defining a fresh
/// symbol from `s`'s memory slot; the use is rewritten to the fresh symbol
/// and marked `is_last_use = true`. For each instruction that defines `s`,
/// the def is rewritten to a fresh symbol and a store pseudo-instruction
/// is inserted immediately after it, using the fresh symbol (marked
/// last-use) and writing to `s`'s memory slot. Fresh symbols are unique per
/// instruction, so their live ranges are trivially short.
#[derive(Debug, Default)]
pub struct SpillRewriter {
    counter: usize,
}

impl SpillRewriter {
    #[must_use]
    pub const fn new() -> Self {
        Self { counter: 0 }
    }

    fn fresh(&mut self, original: &Symbol) -> Symbol {
        let name = format!("{}.spill{}", original.name(), self.counter);
        self.counter += 1;
        Symbol::from(name)
    }

    /// Produces the rewritten program. `spill_set` names the symbols to
    /// demote; symbols not in it pass through untouched.
    #[must_use]
    pub fn rewrite(&mut self, program: &IntermediateProgram, spill_set: &SpillSet) -> IntermediateProgram {
        let mut instructions = Vec::with_capacity(program.instructions.len());

        for instr in &program.instructions {
            let needs_reload = instr.uses.iter().any(|u| spill_set.contains(&u.symbol));
            let needs_store = instr.defs.iter().any(|d| spill_set.contains(&d.symbol));

            if !needs_reload && !needs_store {
                instructions.push(instr.clone());
                continue;
            }

            let mut new_uses = Vec::with_capacity(instr.uses.len());
            for use_site in &instr.uses {
                if spill_set.contains(&use_site.symbol) {
                    let fresh = self.fresh(&use_site.symbol);
                    instructions.push(reload_instruction(&fresh, &use_site.symbol, instr.block.clone()));
                    new_uses.push(UseSite::new(fresh, true));
                } else {
                    new_uses.push(use_site.clone());
                }
            }

            let mut new_defs = Vec::with_capacity(instr.defs.len());
            let mut stores = Vec::new();
            for def in &instr.defs {
                if spill_set.contains(&def.symbol) {
                    let fresh = self.fresh(&def.symbol);
                    stores.push(store_instruction(&def.symbol, &fresh, instr.block.clone()));
                    new_defs.push(DefSite::new(fresh, def.is_dead_def));
                } else {
                    new_defs.push(def.clone());
                }
            }

            instructions.push(Instruction::new(instr.display_text.clone(), instr.kind, new_defs, new_uses, instr.block.clone()));
            instructions.extend(stores);
        }

        IntermediateProgram { instructions, frequencies: program.frequencies.clone() }
    }
}

fn reload_instruction(fresh: &Symbol, slot: &Symbol, block: BlockId) -> Instruction {
    Instruction::new(
        format!("{fresh} := reload {slot}"),
        InstructionKind::Reload,
        vec![DefSite::new(fresh.clone(), false)],
        Vec::new(),
        block,
    )
}

fn store_instruction(slot: &Symbol, fresh: &Symbol, block: BlockId) -> Instruction {
    Instruction::new(
        format!("store {fresh} -> {slot}"),
        InstructionKind::Store,
        Vec::new(),
        vec![UseSite::new(fresh.clone(), true)],
        block,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::InstructionDescriptor;
    use std::collections::HashMap;

    #[test]
    fn spilled_def_gets_store_and_fresh_name() {
        let descs = vec![
            InstructionDescriptor::new("c := b*b", "entry").with_def("c", false).with_use("b", false),
            InstructionDescriptor::new("use c", "entry").with_use("c", true),
        ];
        let program = IntermediateProgram::build(descs, HashMap::new()).unwrap();
        let mut spill = SpillSet::new();
        spill.insert(Symbol::from("c"));

        let rewritten = SpillRewriter::new().rewrite(&program, &spill);

        // def of c is renamed, followed immediately by a store.
        assert!(rewritten.instructions[0].defs[0].symbol.name().starts_with("c.spill"));
        assert_eq!(rewritten.instructions[1].kind, InstructionKind::Store);

        // the use of c is preceded by a reload into a fresh symbol.
        assert_eq!(rewritten.instructions[2].kind, InstructionKind::Reload);
        assert!(rewritten.instructions[3].uses[0].symbol.name().starts_with("c.spill"));
        assert!(rewritten.instructions[3].uses[0].is_last_use);
    }

    #[test]
    fn non_spilled_symbols_pass_through() {
        let descs = vec![InstructionDescriptor::new("a := 1", "entry").with_def("a", false)];
        let program = IntermediateProgram::build(descs, HashMap::new()).unwrap();
        let rewritten = SpillRewriter::new().rewrite(&program, &SpillSet::new());
        assert_eq!(rewritten.instructions, program.instructions);
    }
}

// src/ir/program.rs
//! The mutable sequence of instructions with def/use metadata — the
//! substrate every other component reads and rewrites.

use super::instruction::{Instruction, InstructionKind};
use super::symbol::{BlockId, DefSite, Symbol, UseSite};
use crate::error::AllocError;
use std::collections::HashMap;

/// Per-block execution frequency. Missing entries default to 1.0.
pub type FrequencyMap = HashMap<BlockId, f64>;

/// A def descriptor in the external input surface.
#[derive(Debug, Clone)]
pub struct DefDescriptor {
    pub name: String,
    pub is_dead: bool,
}

impl DefDescriptor {
    #[must_use]
    pub fn new(name: impl Into<String>, is_dead: bool) -> Self {
        Self { name: name.into(), is_dead }
    }
}

/// A use descriptor in the external input surface.
#[derive(Debug, Clone)]
pub struct UseDescriptor {
    pub name: String,
    pub is_last_use: bool,
}

impl UseDescriptor {
    #[must_use]
    pub fn new(name: impl Into<String>, is_last_use: bool) -> Self {
        Self { name: name.into(), is_last_use }
    }
}

/// An instruction descriptor: the unit the programmatic constructor accepts.
#[derive(Debug, Clone)]
pub struct InstructionDescriptor {
    pub display_text: String,
    pub block: String,
    pub is_copy: bool,
    pub defs: Vec<DefDescriptor>,
    pub uses: Vec<UseDescriptor>,
}

impl InstructionDescriptor {
    #[must_use]
    pub fn new(display_text: impl Into<String>, block: impl Into<String>) -> Self {
        Self { display_text: display_text.into(), block: block.into(), is_copy: false, defs: Vec::new(), uses: Vec::new() }
    }

    #[must_use]
    pub fn copy(mut self) -> Self {
        self.is_copy = true;
        self
    }

    #[must_use]
    pub fn with_def(mut self, name: impl Into<String>, is_dead: bool) -> Self {
        self.defs.push(DefDescriptor::new(name, is_dead));
        self
    }

    #[must_use]
    pub fn with_use(mut self, name: impl Into<String>, is_last_use: bool) -> Self {
        self.uses.push(UseDescriptor::new(name, is_last_use));
        self
    }
}

/// The ordered list of instructions plus the block→frequency mapping.
///
/// Invariant: every instruction belongs to exactly one block; every use
/// references a symbol that is live into that instruction (enforced by
/// [`LivenessAnalyzer`](crate::liveness::LivenessAnalyzer), not by this type).
#[derive(Debug, Clone, Default)]
pub struct IntermediateProgram {
    pub instructions: Vec<Instruction>,
    pub frequencies: FrequencyMap,
}

impl IntermediateProgram {
    /// Builds a program from instruction descriptors and a block→frequency
    /// map. Missing frequency entries default to 1.0.
    ///
    /// # Errors
    ///
    /// Returns [`AllocError::InvalidInput`] for an empty descriptor list, a
    /// negative frequency, or a duplicate definition within one instruction.
    pub fn build(
        descriptors: Vec<InstructionDescriptor>, frequencies: HashMap<String, f64>,
    ) -> Result<Self, AllocError> {
        if descriptors.is_empty() {
            return Err(AllocError::InvalidInput("program must contain at least one instruction".into()));
        }

        for (block, freq) in &frequencies {
            if *freq < 0.0 {
                return Err(AllocError::InvalidInput(format!("negative frequency {freq} for block {block}")));
            }
        }

        let mut instructions = Vec::with_capacity(descriptors.len());
        for desc in descriptors {
            let mut seen = std::collections::HashSet::new();
            let mut defs = Vec::with_capacity(desc.defs.len());
            for d in desc.defs {
                if !seen.insert(d.name.clone()) {
                    return Err(AllocError::InvalidInput(format!(
                        "duplicate definition of '{}' within one instruction",
                        d.name
                    )));
                }
                defs.push(DefSite::new(Symbol::from(d.name), d.is_dead));
            }

            let uses = desc
                .uses
                .into_iter()
                .map(|u| UseSite::new(Symbol::from(u.name), u.is_last_use))
                .collect::<Vec<_>>();

            let kind = if desc.is_copy { InstructionKind::Copy } else { InstructionKind::Ordinary };

            instructions.push(Instruction::new(desc.display_text, kind, defs, uses, BlockId::from(desc.block)));
        }

        let frequencies = frequencies.into_iter().map(|(b, f)| (BlockId::from(b), f)).collect();

        Ok(Self { instructions, frequencies })
    }

    /// Execution frequency of `block`, defaulting to 1.0 if unspecified.
    #[must_use]
    pub fn frequency_of(&self, block: &BlockId) -> f64 {
        self.frequencies.get(block).copied().unwrap_or(1.0)
    }

    /// Iterates over all distinct symbols appearing in any def or use.
    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.instructions.iter().flat_map(|i| i.defs.iter().map(|d| &d.symbol).chain(i.uses.iter().map(|u| &u.symbol)))
    }
}

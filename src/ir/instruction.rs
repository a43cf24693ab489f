// src/ir/instruction.rs
use super::symbol::{BlockId, DefSite, UseSite};
use std::fmt;

/// Distinguishes copy instructions (exactly one def, exactly one use, no
/// side effect) from ordinary instructions, and tags the pseudo-instructions
/// the [`crate::spill::SpillRewriter`] inserts.
///
/// Coalescing only considers `Copy`; `Reload` and `Store` never appear in a
/// program handed to the allocator, only in the ones it produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstructionKind {
    /// An ordinary instruction: arithmetic, control flow, calls, etc.
    Ordinary,
    /// `x := y` — a plain register-to-register copy.
    Copy,
    /// A reload pseudo-instruction inserted by the spill rewriter: defines a
    /// fresh symbol from a spilled symbol's memory slot.
    Reload,
    /// A store pseudo-instruction inserted by the spill rewriter: writes a
    /// fresh symbol's value to a spilled symbol's memory slot.
    Store,
}

impl fmt::Display for InstructionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ordinary => f.write_str("ordinary"),
            Self::Copy => f.write_str("copy"),
            Self::Reload => f.write_str("reload"),
            Self::Store => f.write_str("store"),
        }
    }
}

/// One instruction in the intermediate program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    /// Opaque display text, carried through for diagnostics only.
    pub display_text: String,
    pub kind: InstructionKind,
    /// Ordered sequence of definitions produced by this instruction.
    pub defs: Vec<DefSite>,
    /// Ordered sequence of uses consumed by this instruction.
    pub uses: Vec<UseSite>,
    pub block: BlockId,
}

impl Instruction {
    #[must_use]
    pub fn new(
        display_text: impl Into<String>, kind: InstructionKind, defs: Vec<DefSite>, uses: Vec<UseSite>, block: BlockId,
    ) -> Self {
        Self { display_text: display_text.into(), kind, defs, uses, block }
    }

    /// True if this is a plain copy `x := y` (exactly one def, one use).
    #[must_use]
    pub fn is_copy(&self) -> bool {
        self.kind == InstructionKind::Copy && self.defs.len() == 1 && self.uses.len() == 1
    }

    /// For a copy instruction, returns `(def_site, use_site)`.
    #[must_use]
    pub fn copy_pair(&self) -> Option<(&DefSite, &UseSite)> {
        if self.is_copy() { Some((&self.defs[0], &self.uses[0])) } else { None }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_text)
    }
}

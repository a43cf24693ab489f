// src/ir/mod.rs
//! The intermediate program: instructions with def/use metadata, the
//! substrate all allocator stages read and rewrite.

mod instruction;
mod program;
mod symbol;

pub use instruction::{Instruction, InstructionKind};
pub use program::{DefDescriptor, FrequencyMap, InstructionDescriptor, IntermediateProgram, UseDescriptor};
pub use symbol::{BlockId, DefSite, Symbol, UseSite};

// src/ir/symbol.rs
use std::fmt;
use std::sync::Arc;

/// An identifier for a program variable. Symbols are value-equal by name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(Arc<str>);

impl Symbol {
    /// Creates a symbol with the given name.
    #[must_use]
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    /// Returns the symbol's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Symbol {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Symbol {
    fn from(name: String) -> Self {
        Self(Arc::from(name.as_str()))
    }
}

/// A basic block identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockId(Arc<str>);

impl BlockId {
    #[must_use]
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for BlockId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for BlockId {
    fn from(name: String) -> Self {
        Self(Arc::from(name.as_str()))
    }
}

/// A use of a symbol at one instruction.
///
/// `is_last_use` = true means this instruction is the final reference of the
/// named symbol's current live range within the enclosing block; the symbol
/// leaves the live set immediately after this instruction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UseSite {
    pub symbol: Symbol,
    pub is_last_use: bool,
}

impl UseSite {
    #[must_use]
    pub const fn new(symbol: Symbol, is_last_use: bool) -> Self {
        Self { symbol, is_last_use }
    }
}

/// A definition of a symbol at one instruction.
///
/// `is_dead_def` = true means the defined value is not consumed anywhere
/// (rare, supported for completeness).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DefSite {
    pub symbol: Symbol,
    pub is_dead_def: bool,
}

impl DefSite {
    #[must_use]
    pub const fn new(symbol: Symbol, is_dead_def: bool) -> Self {
        Self { symbol, is_dead_def }
    }
}

//! Undirected interference graph: nodes wrap one or more coalesced symbols,
//! edges are interferences.
//!
//! Mirrors the teacher's `petgraph`-payload-graph-beside-a-`HashMap` idiom
//! (`src/ir/cfg.rs`). Merged-away nodes are never physically removed from
//! the underlying `petgraph` graph — `petgraph::Graph::remove_node` swaps
//! the last node into the freed slot and would invalidate every other
//! `NodeIndex` stashed in `symbol_node`. Instead a node is "removed" by
//! dropping it from the `alive` set; nothing ever iterates a dead node
//! again.

use crate::error::AllocError;
use crate::ir::{IntermediateProgram, InstructionKind, Symbol};
use crate::liveness::LivenessInfo;
use petgraph::graph::{NodeIndex, UnGraph};
use std::collections::{BTreeSet, HashMap, HashSet};

/// A node in the interference graph: the union of symbols coalesced into it.
#[derive(Debug, Clone, Default)]
pub struct InterferenceNode {
    pub members: BTreeSet<Symbol>,
}

impl InterferenceNode {
    fn singleton(symbol: Symbol) -> Self {
        let mut members = BTreeSet::new();
        members.insert(symbol);
        Self { members }
    }
}

/// Undirected graph of symbols; edges are interferences.
///
/// Invariants: no self-loops; edges symmetric (guaranteed by `petgraph`'s
/// `UnGraph`); a node's degree equals the count of distinct *alive*
/// neighbors; when two nodes coalesce the merged node's neighbor set is the
/// union of the originals' (minus each other).
#[derive(Debug, Clone, Default)]
pub struct InterferenceGraph {
    graph: UnGraph<InterferenceNode, ()>,
    symbol_node: HashMap<Symbol, NodeIndex>,
    alive: HashSet<NodeIndex>,
}

impl InterferenceGraph {
    #[must_use]
    pub fn new() -> Self {
        Self { graph: UnGraph::new_undirected(), symbol_node: HashMap::new(), alive: HashSet::new() }
    }

    /// Returns the node for `symbol`, creating a fresh singleton node if
    /// this is the first time `symbol` is seen.
    pub fn get_or_create_node(&mut self, symbol: &Symbol) -> NodeIndex {
        if let Some(idx) = self.symbol_node.get(symbol) {
            return *idx;
        }
        let idx = self.graph.add_node(InterferenceNode::singleton(symbol.clone()));
        self.symbol_node.insert(symbol.clone(), idx);
        self.alive.insert(idx);
        idx
    }

    /// The canonical node currently representing `symbol`, if any.
    #[must_use]
    pub fn node_of(&self, symbol: &Symbol) -> Option<NodeIndex> {
        self.symbol_node.get(symbol).copied()
    }

    #[must_use]
    pub fn members(&self, node: NodeIndex) -> &BTreeSet<Symbol> {
        &self.graph[node].members
    }

    /// Adds an undirected edge between two (distinct) alive nodes. A
    /// self-loop request is ignored; adding an existing edge is a no-op.
    pub fn add_edge(&mut self, a: NodeIndex, b: NodeIndex) {
        if a == b {
            return;
        }
        if self.graph.find_edge(a, b).is_none() {
            self.graph.add_edge(a, b, ());
        }
    }

    #[must_use]
    pub fn has_edge(&self, a: NodeIndex, b: NodeIndex) -> bool {
        a != b && self.graph.find_edge(a, b).is_some()
    }

    /// Alive neighbors of `node`.
    #[must_use]
    pub fn neighbors(&self, node: NodeIndex) -> HashSet<NodeIndex> {
        self.graph.neighbors(node).filter(|n| self.alive.contains(n)).collect()
    }

    #[must_use]
    pub fn degree(&self, node: NodeIndex) -> usize {
        self.neighbors(node).len()
    }

    /// All currently-alive (canonical) nodes.
    pub fn nodes(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.alive.iter().copied()
    }

    /// Merges `other` into `keep`: unions their member sets, rewires every
    /// edge touching `other` onto `keep`, redirects `symbol_node` entries,
    /// and marks `other` dead. Panics if `keep` and `other` interfere — the
    /// caller (the coalescer) must check [`Self::has_edge`] first.
    pub fn merge(&mut self, keep: NodeIndex, other: NodeIndex) {
        assert!(!self.has_edge(keep, other), "cannot merge interfering nodes");
        debug_assert_ne!(keep, other);

        let other_members = std::mem::take(&mut self.graph[other].members);
        for symbol in &other_members {
            self.symbol_node.insert(symbol.clone(), keep);
        }
        self.graph[keep].members.extend(other_members);

        let other_neighbors: Vec<NodeIndex> = self.graph.neighbors(other).filter(|n| self.alive.contains(n)).collect();
        for neighbor in other_neighbors {
            if neighbor != keep {
                self.add_edge(keep, neighbor);
            }
        }

        self.alive.remove(&other);
    }

    /// Builds the interference graph for `program` given its liveness info.
    ///
    /// For each instruction `i`, for each symbol `s` defined at `i`, adds an
    /// edge from `s` to every symbol `t` in `live_out(i)` where `t != s`.
    /// Special rule: for a copy instruction `x := y`, the edge `(x, y)` is
    /// never added, so the copy's endpoints remain coalescable.
    ///
    /// # Errors
    ///
    /// Returns [`AllocError::InternalInvariantViolation`] if a defined
    /// symbol is found to already self-interfere (should be unreachable).
    pub fn build(program: &IntermediateProgram, liveness: &LivenessInfo) -> Result<Self, AllocError> {
        let mut graph = Self::new();

        for symbol in program.symbols() {
            graph.get_or_create_node(symbol);
        }

        for (i, instr) in program.instructions.iter().enumerate() {
            let copy_use = if instr.kind == InstructionKind::Copy { instr.copy_pair().map(|(_, u)| u.symbol.clone()) } else { None };

            for def in &instr.defs {
                let def_node = graph.get_or_create_node(&def.symbol);
                for t in liveness.live_out_at(i) {
                    if *t == def.symbol {
                        continue;
                    }
                    if let Some(ref y) = copy_use {
                        if *t == *y {
                            continue;
                        }
                    }
                    let t_node = graph.get_or_create_node(t);
                    graph.add_edge(def_node, t_node);
                }
            }
        }

        if graph.nodes().any(|n| graph.has_edge(n, n)) {
            return Err(AllocError::InternalInvariantViolation("self-loop detected in interference graph".into()));
        }

        Ok(graph)
    }
}

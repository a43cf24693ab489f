//! Chaitin's simplify/select graph coloring procedure.

use crate::error::AllocError;
use crate::graph::InterferenceGraph;
use crate::ir::Symbol;
use petgraph::graph::NodeIndex;
use std::collections::{HashMap, HashSet};

/// Partial mapping from symbol to color index in `[0, k)`.
pub type Coloring = HashMap<Symbol, usize>;

/// Symbols selected for memory residency by a coloring attempt.
pub type SpillSet = HashSet<Symbol>;

/// Either a complete coloring, or a non-empty set of symbols to spill.
#[derive(Debug, Clone)]
pub enum ColorResult {
    Colored(Coloring),
    Spill(SpillSet),
}

/// Chaitin simplify/select colorer. Operates on a private working copy of
/// the canonical interference graph; never mutates it.
#[derive(Debug, Default)]
pub struct Colorer;

impl Colorer {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Attempts to color `graph` with `k` colors, using `costs` to break
    /// ties when a spill candidate must be chosen.
    ///
    /// # Errors
    ///
    /// Returns [`AllocError::InternalInvariantViolation`] if the select
    /// phase cannot find an available color for a node that was pushed with
    /// degree `< k` (this would indicate a bug in the simplify phase).
    pub fn color(&self, graph: &InterferenceGraph, costs: &HashMap<Symbol, f64>, k: usize) -> Result<ColorResult, AllocError> {
        let mut removed: HashSet<NodeIndex> = HashSet::new();
        let mut stack: Vec<(NodeIndex, Vec<NodeIndex>)> = Vec::new();
        let mut spill_set: SpillSet = SpillSet::new();

        loop {
            let remaining: Vec<NodeIndex> = graph.nodes().filter(|n| !removed.contains(n)).collect();
            if remaining.is_empty() {
                break;
            }

            let degree_of = |n: NodeIndex| -> usize { graph.neighbors(n).into_iter().filter(|m| !removed.contains(m)).count() };

            let low_degree: Vec<NodeIndex> = remaining.iter().copied().filter(|&n| degree_of(n) < k).collect();

            if let Some(&pick) = low_degree.iter().min_by_key(|&&n| n) {
                let neighbor_snapshot: Vec<NodeIndex> =
                    graph.neighbors(pick).into_iter().filter(|m| !removed.contains(m)).collect();
                stack.push((pick, neighbor_snapshot));
                removed.insert(pick);
                continue;
            }

            // No node has degree < k: pick a spill candidate of minimum
            // cost, tie-broken on the node's index. Indices are assigned in
            // first-occurrence order when the graph is built fresh each
            // round, so this stays clear of the symbols' own names — a
            // respilled symbol's reload/store fragments get fresh names that
            // inherit the original's textual prefix (see `SpillRewriter`),
            // and a name-keyed tie-break would keep re-selecting the same
            // lineage every round instead of ever reaching the rest of the
            // graph.
            let node_cost = |n: NodeIndex| -> f64 { graph.members(n).iter().map(|s| costs.get(s).copied().unwrap_or(0.0)).sum() };

            let spill_node = remaining
                .iter()
                .copied()
                .min_by(|&a, &b| {
                    node_cost(a).partial_cmp(&node_cost(b)).unwrap_or(std::cmp::Ordering::Equal).then_with(|| a.cmp(&b))
                })
                .expect("remaining is non-empty");

            spill_set.extend(graph.members(spill_node).iter().cloned());
            removed.insert(spill_node);
        }

        if !spill_set.is_empty() {
            return Ok(ColorResult::Spill(spill_set));
        }

        let mut node_color: HashMap<NodeIndex, usize> = HashMap::new();
        while let Some((node, neighbors)) = stack.pop() {
            let used: HashSet<usize> = neighbors.iter().filter_map(|n| node_color.get(n).copied()).collect();
            let color = (0..k).find(|c| !used.contains(c)).ok_or_else(|| {
                AllocError::InternalInvariantViolation(format!(
                    "no available color for node containing '{}'; degree invariant violated",
                    graph.members(node).iter().next().map_or("?", Symbol::name)
                ))
            })?;
            node_color.insert(node, color);
        }

        let mut coloring = Coloring::new();
        for (node, color) in node_color {
            for symbol in graph.members(node) {
                coloring.insert(symbol.clone(), color);
            }
        }

        Ok(ColorResult::Colored(coloring))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::InstructionDescriptor;
    use crate::ir::IntermediateProgram;
    use crate::liveness::LivenessAnalyzer;
    use std::collections::HashMap as StdHashMap;

    fn graph_and_costs(descs: Vec<InstructionDescriptor>, freqs: StdHashMap<String, f64>) -> (InterferenceGraph, StdHashMap<Symbol, f64>) {
        let program = IntermediateProgram::build(descs, freqs).unwrap();
        let liveness = LivenessAnalyzer::new().analyze(&program);
        let graph = InterferenceGraph::build(&program, &liveness).unwrap();
        let costs = crate::cost::SpillCostEstimator::new().estimate(&program);
        (graph, costs)
    }

    #[test]
    fn s1_two_colors_suffice() {
        let descs = vec![
            InstructionDescriptor::new("b := a+2", "entry").with_def("b", false).with_use("a", false),
            InstructionDescriptor::new("c := b*b", "entry").with_def("c", false).with_use("b", true),
            InstructionDescriptor::new("b := c+1", "entry").with_def("b", false).with_use("c", true),
            InstructionDescriptor::new("return b*a", "entry").with_use("b", true).with_use("a", true),
        ];
        let (graph, costs) = graph_and_costs(descs, StdHashMap::new());

        match Colorer::new().color(&graph, &costs, 2).unwrap() {
            ColorResult::Colored(coloring) => {
                assert_ne!(coloring[&Symbol::from("a")], coloring[&Symbol::from("b")]);
                assert_ne!(coloring[&Symbol::from("a")], coloring[&Symbol::from("c")]);
                assert_eq!(coloring[&Symbol::from("b")], coloring[&Symbol::from("c")]);
            }
            ColorResult::Spill(_) => panic!("expected a successful coloring"),
        }
    }

    #[test]
    fn forces_spill_when_k_too_small() {
        // a, b, c, d mutually interfering (complete graph on 4 nodes), k=2.
        let mut graph = InterferenceGraph::new();
        let names = ["a", "b", "c", "d"];
        let nodes: Vec<_> = names.iter().map(|n| graph.get_or_create_node(&Symbol::from(*n))).collect();
        for i in 0..nodes.len() {
            for j in (i + 1)..nodes.len() {
                graph.add_edge(nodes[i], nodes[j]);
            }
        }
        let costs: StdHashMap<Symbol, f64> = names.iter().map(|n| (Symbol::from(*n), 1.0)).collect();

        match Colorer::new().color(&graph, &costs, 2).unwrap() {
            ColorResult::Spill(spilled) => assert!(!spilled.is_empty()),
            ColorResult::Colored(_) => panic!("expected a spill on a K4 graph with k=2"),
        }
    }
}

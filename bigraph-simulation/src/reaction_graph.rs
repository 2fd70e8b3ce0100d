//! The reaction graph: states discovered during exploration and the
//! rule applications connecting them.
//!
//! States are deduplicated by canonical form; the label map is the
//! single point where a canonical string is resolved to a vertex, so
//! no two vertices can ever share a label. Parallel edges are kept, as
//! distinct occurrences of distinct rules between the same states are
//! distinct transitions.

use std::collections::HashMap;
use std::fmt::Write as _;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use bigraph_core::Bigraph;

/// A state vertex: its display label and canonical form.
#[derive(Debug, Clone)]
pub struct StateNode {
    /// Short display label (`a:0` style), assigned in discovery order.
    pub label: String,
    /// The canonical form, the deduplication key.
    pub canonical: String,
}

/// A transition edge: which rule and which occurrence produced it.
#[derive(Debug, Clone)]
pub struct TransitionEdge {
    /// Name of the applied rule.
    pub rule: String,
    /// Index of the occurrence within that rule's match set.
    pub occurrence: usize,
}

/// Aggregate counters over a reaction graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReactionGraphStats {
    /// Number of distinct states.
    pub states: usize,
    /// Number of transitions, parallel edges included.
    pub transitions: usize,
    /// Number of occurrences observed, including rediscoveries.
    pub occurrences: usize,
}

/// Directed multigraph over canonical state labels.
pub struct ReactionGraph {
    graph: DiGraph<StateNode, TransitionEdge>,
    by_canonical: HashMap<String, NodeIndex>,
    /// The concrete bigraph per state, kept for predicate witnesses
    /// and export.
    states: HashMap<NodeIndex, Bigraph>,
    occurrence_count: usize,
}

impl Default for ReactionGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl ReactionGraph {
    /// Creates an empty reaction graph.
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            by_canonical: HashMap::new(),
            states: HashMap::new(),
            occurrence_count: 0,
        }
    }

    /// Returns the vertex for a canonical form, if present.
    pub fn state(&self, canonical: &str) -> Option<NodeIndex> {
        self.by_canonical.get(canonical).copied()
    }

    /// True if a state with this canonical form was already added.
    pub fn contains(&self, canonical: &str) -> bool {
        self.by_canonical.contains_key(canonical)
    }

    /// Adds a state, or returns the existing vertex for its canonical
    /// form. The boolean is true for a fresh state.
    pub fn add_state(&mut self, canonical: String, state: &Bigraph) -> (NodeIndex, bool) {
        if let Some(existing) = self.by_canonical.get(&canonical) {
            return (*existing, false);
        }
        let label = format!("a:{}", self.graph.node_count());
        let index = self.graph.add_node(StateNode {
            label,
            canonical: canonical.clone(),
        });
        self.by_canonical.insert(canonical, index);
        self.states.insert(index, state.clone());
        debug_assert_eq!(self.by_canonical.len(), self.graph.node_count());
        (index, true)
    }

    /// Adds a transition between two known states. Parallel edges are
    /// preserved.
    pub fn add_transition(
        &mut self,
        source: NodeIndex,
        target: NodeIndex,
        rule: &str,
        occurrence: usize,
    ) {
        self.graph.add_edge(
            source,
            target,
            TransitionEdge {
                rule: rule.to_owned(),
                occurrence,
            },
        );
        self.occurrence_count += 1;
    }

    /// The display label of a state.
    pub fn label(&self, index: NodeIndex) -> &str {
        &self.graph[index].label
    }

    /// The canonical form of a state.
    pub fn canonical_of(&self, index: NodeIndex) -> &str {
        &self.graph[index].canonical
    }

    /// The stored bigraph of a state.
    pub fn bigraph_of(&self, index: NodeIndex) -> Option<&Bigraph> {
        self.states.get(&index)
    }

    /// Iterates over all state vertices in discovery order.
    pub fn state_indices(&self) -> impl Iterator<Item = NodeIndex> {
        self.graph.node_indices()
    }

    /// Counters over the current graph.
    pub fn stats(&self) -> ReactionGraphStats {
        ReactionGraphStats {
            states: self.graph.node_count(),
            transitions: self.graph.edge_count(),
            occurrences: self.occurrence_count,
        }
    }

    /// Shortest path from `from` to `to` as state labels, unit edge
    /// weights. Used for predicate-violation witnesses.
    pub fn shortest_path(&self, from: NodeIndex, to: NodeIndex) -> Option<Vec<String>> {
        let (_, path) = petgraph::algo::astar(
            &self.graph,
            from,
            |finish| finish == to,
            |_| 1usize,
            |_| 0usize,
        )?;
        Some(
            path.into_iter()
                .map(|index| self.graph[index].label.clone())
                .collect(),
        )
    }

    /// Serializes the graph as Graphviz DOT text, transitions labelled
    /// with their rule names.
    pub fn to_dot(&self) -> String {
        let mut out = String::from("digraph reaction_graph {\n");
        for index in self.graph.node_indices() {
            let _ = writeln!(
                out,
                "    \"{}\" [shape=ellipse];",
                self.graph[index].label
            );
        }
        for edge in self.graph.edge_references() {
            let _ = writeln!(
                out,
                "    \"{}\" -> \"{}\" [label=\"{}[{}]\"];",
                self.graph[edge.source()].label,
                self.graph[edge.target()].label,
                edge.weight().rule,
                edge.weight().occurrence,
            );
        }
        out.push_str("}\n");
        out
    }
}

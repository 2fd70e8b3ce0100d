//! Candidate filter: fast necessary conditions for a redex node to
//! match an agent node, applied before the bipartite matching step.

use std::collections::BTreeMap;

use bigraph_core::{Bigraph, LinkId, NodeId, PointId};

/// The four monotone pruning conditions, in increasing cost order.
/// Failing any one rules the pair out for this match attempt.
pub struct CandidateFilter<'a> {
    redex: &'a Bigraph,
    agent: &'a Bigraph,
}

impl<'a> CandidateFilter<'a> {
    /// Creates a filter for one `(redex, agent)` pair.
    pub fn new(redex: &'a Bigraph, agent: &'a Bigraph) -> Self {
        Self { redex, agent }
    }

    /// Runs all four conditions.
    pub fn admissible(&self, redex_node: NodeId, agent_node: NodeId) -> bool {
        self.condition1(redex_node, agent_node)
            && self.condition2(redex_node, agent_node)
            && self.condition3(redex_node, agent_node)
            && self.condition4(redex_node, agent_node)
    }

    /// Label equality and degree containment.
    pub fn condition1(&self, redex_node: NodeId, agent_node: NodeId) -> bool {
        self.redex.control_of(redex_node).name() == self.agent.control_of(agent_node).name()
            && self.redex.degree(redex_node) <= self.agent.degree(agent_node)
    }

    /// Open-neighborhood size containment.
    pub fn condition2(&self, redex_node: NodeId, agent_node: NodeId) -> bool {
        self.redex.linked_neighbors(redex_node).len()
            <= self.agent.linked_neighbors(agent_node).len()
    }

    /// Arity containment of incident hyperedges, grouped by the number
    /// of distinct points each link spans. The agent may carry more
    /// edges than the redex, never fewer: a class with redex edges
    /// requires the agent's full incident edge set to cover it, and
    /// every redex edge must find some agent edge spanning the same
    /// number of distinct endpoint nodes. Classes without edges fall
    /// back to the plain count containment; classes present on only one
    /// side are skipped.
    pub fn condition3(&self, redex_node: NodeId, agent_node: NodeId) -> bool {
        let classes_r = incident_by_class(self.redex, redex_node);
        let classes_a = incident_by_class(self.agent, agent_node);
        let mut arities: Vec<usize> = classes_r.keys().chain(classes_a.keys()).copied().collect();
        arities.sort_unstable();
        arities.dedup();

        for arity in arities {
            let (links_r, links_a) = match (classes_r.get(&arity), classes_a.get(&arity)) {
                (Some(r), Some(a)) => (r, a),
                _ => continue,
            };
            let edges_r: Vec<LinkId> = links_r.iter().copied().filter(|l| l.is_edge()).collect();
            if !edges_r.is_empty() {
                let edges_a: Vec<LinkId> = classes_a
                    .values()
                    .flatten()
                    .copied()
                    .filter(|l| l.is_edge())
                    .collect();
                if edges_r.len() > edges_a.len() {
                    return false;
                }
                for er in &edges_r {
                    let span = distinct_endpoint_nodes(self.redex, *er);
                    if !edges_a
                        .iter()
                        .any(|ea| distinct_endpoint_nodes(self.agent, *ea) == span)
                    {
                        return false;
                    }
                }
            } else if links_r.len() > links_a.len() {
                return false;
            }
        }
        true
    }

    /// Label-partitioned endpoint counts: within the arity classes both
    /// sides share, some `(redex link, agent link)` pair must agree on
    /// the endpoint-node count of every control. Vacuously true when no
    /// class is shared.
    pub fn condition4(&self, redex_node: NodeId, agent_node: NodeId) -> bool {
        let classes_r = incident_by_class(self.redex, redex_node);
        let classes_a = incident_by_class(self.agent, agent_node);
        let mut shared = false;
        for (arity, links_r) in &classes_r {
            let links_a = match classes_a.get(arity) {
                Some(links) => links,
                None => continue,
            };
            shared = true;
            for lr in links_r {
                for la in links_a {
                    if self.endpoint_labels_agree(*lr, *la) {
                        return true;
                    }
                }
            }
        }
        !shared
    }

    fn endpoint_labels_agree(&self, redex_link: LinkId, agent_link: LinkId) -> bool {
        self.agent.signature().controls().all(|(_, control)| {
            endpoint_nodes_with_label(self.redex, redex_link, control.name())
                == endpoint_nodes_with_label(self.agent, agent_link, control.name())
        })
    }
}

/// Incident links of a node grouped by the number of distinct points
/// they span. A link incident via several ports appears once per port,
/// as each port is a separate matching obligation.
fn incident_by_class(bigraph: &Bigraph, node: NodeId) -> BTreeMap<usize, Vec<LinkId>> {
    let mut classes: BTreeMap<usize, Vec<LinkId>> = BTreeMap::new();
    for link in bigraph.ports_of(node).iter().flatten() {
        let span = bigraph.points_of(*link).len();
        classes.entry(span).or_default().push(*link);
    }
    classes
}

/// The number of distinct nodes a link touches via ports.
fn distinct_endpoint_nodes(bigraph: &Bigraph, link: LinkId) -> usize {
    let mut nodes: Vec<NodeId> = bigraph
        .points_of(link)
        .iter()
        .filter_map(|p| match p {
            PointId::Port(n, _) => Some(*n),
            PointId::Inner(_) => None,
        })
        .collect();
    nodes.sort_unstable();
    nodes.dedup();
    nodes.len()
}

/// The number of distinct nodes with the given control name a link
/// touches via ports.
fn endpoint_nodes_with_label(bigraph: &Bigraph, link: LinkId, label: &str) -> usize {
    let mut nodes: Vec<NodeId> = bigraph
        .points_of(link)
        .iter()
        .filter_map(|p| match p {
            PointId::Port(n, _) => Some(*n),
            PointId::Inner(_) => None,
        })
        .filter(|n| bigraph.control_of(*n).name() == label)
        .collect();
    nodes.sort_unstable();
    nodes.dedup();
    nodes.len()
}

//! Matching a redex against a ground agent.
//!
//! The matcher enumerates every occurrence of the redex: an injective
//! mapping of redex nodes into agent nodes that preserves parent/child
//! structure below each mapped node and the link topology, leaving a
//! well-formed residual context with one site per redex root and one
//! parameter per redex site.
//!
//! The pipeline per redex root: enumerate agent anchor places, prune
//! each parent/child frontier with the candidate filter and a
//! Hopcroft-Karp feasibility matching, then enumerate the concrete
//! injective child assignments recursively. Accepted embeddings are
//! combined across roots, checked for link consistency, and turned
//! into [`Occurrence`] records.

pub mod filter;
pub mod hopcroft_karp;

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::rc::Rc;

use log::{debug, trace};
use thiserror::Error;

use bigraph_core::{
    identity_linking, parallel_product, substitution, Bigraph, BigraphBuilder, BigraphError,
    CompositionError, LinkId, NodeId, PlaceId, PointId,
};

use crate::matching::filter::CandidateFilter;
use crate::matching::hopcroft_karp::{maximum_matching, BipartiteCandidates};

/// Errors signalled by the matcher. A redex that simply does not occur
/// in the agent is not an error but an empty result.
#[derive(Debug, Error)]
pub enum MatchingError {
    /// Agent and redex are built over different signatures.
    #[error("agent and redex carry different signatures")]
    IncompatibleSignature,
    /// The agent has sites or inner names.
    #[error("agent must be ground")]
    AgentNotGround,
    /// The redex has inner names, which matching does not support.
    #[error("redex must not have inner names")]
    RedexNotPrime,
    /// Assembling a context or parameter hit a construction invariant.
    #[error(transparent)]
    Construction(#[from] BigraphError),
    /// Assembling an identity wiring failed.
    #[error(transparent)]
    Composition(#[from] CompositionError),
}

/// One occurrence of a redex in an agent.
#[derive(Debug, Clone)]
pub struct Occurrence {
    /// Injective map from redex nodes to agent nodes.
    pub node_map: BTreeMap<NodeId, NodeId>,
    /// The agent place each redex root was anchored at.
    pub root_anchors: Vec<PlaceId>,
    /// Redex outer name to the agent link it matched.
    pub link_map: BTreeMap<String, LinkId>,
    /// The residual context, with one site per redex root and inner
    /// names for every link the rewritten part must reconnect to.
    pub context: Bigraph,
    /// One ground parameter per redex site.
    pub parameters: Vec<Bigraph>,
    /// Outer names exported by the parameters, sorted.
    pub parameter_names: Vec<String>,
    /// Identity linking on [`Self::parameter_names`], juxtaposed with
    /// the reactum when the reaction is built.
    pub redex_identity: Bigraph,
    /// Substitution wirings mapping the redex's outer names onto the
    /// matched agent links. Informational: the context already carries
    /// these joins as pre-wired inner names, so reaction building never
    /// composes this wiring; it exists for inspection and export.
    pub context_identity: Bigraph,
}

/// Matches one redex against one ground agent.
pub struct Matcher<'a> {
    agent: &'a Bigraph,
    redex: &'a Bigraph,
    filter: CandidateFilter<'a>,
    /// Memoized embeddings per (redex node, agent node) pair.
    memo: RefCell<HashMap<(NodeId, NodeId), Rc<Vec<BTreeMap<NodeId, NodeId>>>>>,
}

impl<'a> Matcher<'a> {
    /// Creates a matcher over the given agent and redex.
    pub fn new(agent: &'a Bigraph, redex: &'a Bigraph) -> Self {
        Self {
            agent,
            redex,
            filter: CandidateFilter::new(redex, agent),
            memo: RefCell::new(HashMap::new()),
        }
    }

    /// Enumerates all occurrences of the redex in the agent.
    pub fn occurrences(&self) -> Result<Vec<Occurrence>, MatchingError> {
        self.validate()?;

        // Anchor candidates per redex root.
        let mut per_root: Vec<Vec<(PlaceId, Rc<Vec<BTreeMap<NodeId, NodeId>>>)>> = Vec::new();
        for root in self.redex.roots() {
            let mut anchors = Vec::new();
            for place in self.agent_places() {
                let embeddings = self.embed_region(PlaceId::Root(root), place);
                if !embeddings.is_empty() {
                    anchors.push((place, Rc::new(embeddings)));
                }
            }
            if anchors.is_empty() {
                trace!("redex root {:?} has no anchor in the agent", root);
                return Ok(Vec::new());
            }
            per_root.push(anchors);
        }

        // Combine one anchor embedding per root, node-disjointly.
        let mut combined: Vec<(BTreeMap<NodeId, NodeId>, Vec<PlaceId>)> = Vec::new();
        let mut current = BTreeMap::new();
        let mut anchors = Vec::new();
        Self::combine_roots(&per_root, 0, &mut current, &mut anchors, &mut combined);

        let mut occurrences = Vec::new();
        for (node_map, root_anchors) in combined {
            if let Some(link_map) = self.check_links(&node_map) {
                if let Some(occurrence) =
                    self.build_occurrence(node_map, root_anchors, link_map)?
                {
                    occurrences.push(occurrence);
                }
            }
        }
        trace!(
            "{} occurrence(s) of a {}-node redex",
            occurrences.len(),
            self.redex.node_count()
        );
        Ok(occurrences)
    }

    fn validate(&self) -> Result<(), MatchingError> {
        if self.agent.signature() != self.redex.signature() {
            return Err(MatchingError::IncompatibleSignature);
        }
        if !self.agent.is_ground() {
            return Err(MatchingError::AgentNotGround);
        }
        if self.redex.inner_count() > 0 {
            return Err(MatchingError::RedexNotPrime);
        }
        Ok(())
    }

    /// Roots and nodes of the agent, the places a redex root can be
    /// anchored at.
    fn agent_places(&self) -> Vec<PlaceId> {
        let mut places: Vec<PlaceId> = self.agent.roots().map(PlaceId::Root).collect();
        places.extend(
            self.agent
                .nodes()
                .filter(|n| !self.agent.control_of(*n).is_atomic())
                .map(PlaceId::Node),
        );
        places
    }

    /// Embeds the children of a redex root at an agent place. Root
    /// regions without a site still admit leftover agent children;
    /// those stay in the context next to the inserted site.
    fn embed_region(
        &self,
        redex_root: PlaceId,
        anchor: PlaceId,
    ) -> Vec<BTreeMap<NodeId, NodeId>> {
        let redex_children: Vec<NodeId> = self.redex.child_nodes_of(redex_root).collect();
        let agent_children: Vec<NodeId> = self.agent.child_nodes_of(anchor).collect();
        self.assign_children(&redex_children, &agent_children, false)
    }

    /// All embeddings of redex node `u` at agent node `v`, memoized.
    fn embeddings(&self, u: NodeId, v: NodeId) -> Rc<Vec<BTreeMap<NodeId, NodeId>>> {
        if let Some(cached) = self.memo.borrow().get(&(u, v)) {
            return Rc::clone(cached);
        }
        let mut result = Vec::new();
        if self.filter.admissible(u, v) {
            let redex_children: Vec<NodeId> = self.redex.child_nodes_of(u.into()).collect();
            let agent_children: Vec<NodeId> = self.agent.child_nodes_of(v.into()).collect();
            let exact = !self.redex.has_site_child(u.into());
            for mut map in self.assign_children(&redex_children, &agent_children, exact) {
                map.insert(u, v);
                result.push(map);
            }
        }
        let result = Rc::new(result);
        self.memo.borrow_mut().insert((u, v), Rc::clone(&result));
        result
    }

    /// Injective assignments of redex children onto agent children.
    /// With `exact`, every agent child must be covered; otherwise
    /// leftovers are allowed (they become parameter or context
    /// content).
    fn assign_children(
        &self,
        redex_children: &[NodeId],
        agent_children: &[NodeId],
        exact: bool,
    ) -> Vec<BTreeMap<NodeId, NodeId>> {
        if exact && redex_children.len() != agent_children.len() {
            return Vec::new();
        }
        if redex_children.len() > agent_children.len() {
            return Vec::new();
        }
        if redex_children.is_empty() {
            return vec![BTreeMap::new()];
        }

        // Feasibility gate: a maximum matching over the viable pairs
        // must cover every redex child. A pair is viable only if it
        // passes the exact control/degree check and embeds, so the gate
        // and the enumeration below see the same edge set.
        let mut candidates =
            BipartiteCandidates::new(redex_children.len(), agent_children.len());
        let mut feasible: Vec<Vec<bool>> =
            vec![vec![false; agent_children.len()]; redex_children.len()];
        for (i, rc) in redex_children.iter().enumerate() {
            for (j, ac) in agent_children.iter().enumerate() {
                if self.post_filter(*rc, *ac) && !self.embeddings(*rc, *ac).is_empty() {
                    candidates.add_candidate(i, j);
                    feasible[i][j] = true;
                }
            }
        }
        let matching = maximum_matching(&candidates);
        if matching.size() < redex_children.len() {
            return Vec::new();
        }

        let mut results = Vec::new();
        let mut used = vec![false; agent_children.len()];
        let mut acc = BTreeMap::new();
        self.enumerate_assignments(
            redex_children,
            agent_children,
            &feasible,
            0,
            &mut used,
            &mut acc,
            &mut results,
        );
        results
    }

    /// Accepts a matched pair only if the controls are equal and both
    /// sides see the same number of connected ports; place roots are
    /// exempt but never appear in child frontiers.
    fn post_filter(&self, u: NodeId, v: NodeId) -> bool {
        self.redex.control_of(u).name() == self.agent.control_of(v).name()
            && self.redex.degree(u) == self.agent.degree(v)
    }

    #[allow(clippy::too_many_arguments)]
    fn enumerate_assignments(
        &self,
        redex_children: &[NodeId],
        agent_children: &[NodeId],
        feasible: &[Vec<bool>],
        index: usize,
        used: &mut Vec<bool>,
        acc: &mut BTreeMap<NodeId, NodeId>,
        results: &mut Vec<BTreeMap<NodeId, NodeId>>,
    ) {
        if index == redex_children.len() {
            results.push(acc.clone());
            return;
        }
        let rc = redex_children[index];
        for (j, ac) in agent_children.iter().enumerate() {
            if used[j] || !feasible[index][j] {
                continue;
            }
            for sub in self.embeddings(rc, *ac).iter() {
                // Sub-embeddings cover disjoint subtrees, so merging
                // cannot conflict.
                used[j] = true;
                for (key, value) in sub {
                    acc.insert(*key, *value);
                }
                self.enumerate_assignments(
                    redex_children,
                    agent_children,
                    feasible,
                    index + 1,
                    used,
                    acc,
                    results,
                );
                for key in sub.keys() {
                    acc.remove(key);
                }
                used[j] = false;
            }
        }
    }

    fn combine_roots(
        per_root: &[Vec<(PlaceId, Rc<Vec<BTreeMap<NodeId, NodeId>>>)>],
        index: usize,
        current: &mut BTreeMap<NodeId, NodeId>,
        anchors: &mut Vec<PlaceId>,
        out: &mut Vec<(BTreeMap<NodeId, NodeId>, Vec<PlaceId>)>,
    ) {
        if index == per_root.len() {
            out.push((current.clone(), anchors.clone()));
            return;
        }
        for (anchor, embeddings) in &per_root[index] {
            'embedding: for embedding in embeddings.iter() {
                for value in embedding.values() {
                    if current.values().any(|existing| existing == value) {
                        continue 'embedding;
                    }
                }
                let added: Vec<NodeId> = embedding.keys().copied().collect();
                for (key, value) in embedding {
                    current.insert(*key, *value);
                }
                anchors.push(*anchor);
                Self::combine_roots(per_root, index + 1, current, anchors, out);
                anchors.pop();
                for key in added {
                    current.remove(&key);
                }
            }
        }
    }

    /// Validates link connectivity of a full embedding and returns the
    /// redex-outer-name assignment. Redex edges must map exactly onto
    /// closed agent links; redex outer names map freely but
    /// consistently.
    fn check_links(&self, node_map: &BTreeMap<NodeId, NodeId>) -> Option<BTreeMap<String, LinkId>> {
        let mut assignment: BTreeMap<LinkId, LinkId> = BTreeMap::new();
        for (u, v) in node_map {
            let arity = self.redex.control_of(*u).arity();
            for port in 0..arity {
                let redex_link = self.redex.link_of(PointId::Port(*u, port));
                let agent_link = self.agent.link_of(PointId::Port(*v, port));
                match (redex_link, agent_link) {
                    (None, None) => {}
                    (Some(rl), Some(al)) => {
                        if let Some(existing) = assignment.get(&rl) {
                            if *existing != al {
                                return None;
                            }
                        } else {
                            assignment.insert(rl, al);
                        }
                    }
                    _ => return None,
                }
            }
        }

        // Exactness for redex edges: the matched agent link must be a
        // closed edge whose points are exactly the image of the redex
        // edge's ports.
        for (redex_link, agent_link) in &assignment {
            if !redex_link.is_edge() {
                continue;
            }
            if !agent_link.is_edge() {
                return None;
            }
            let redex_points = self.redex.points_of(*redex_link);
            let agent_points = self.agent.points_of(*agent_link);
            if redex_points.len() != agent_points.len() {
                return None;
            }
            for point in redex_points {
                let image = match point {
                    PointId::Port(n, p) => PointId::Port(node_map[n], *p),
                    PointId::Inner(_) => return None,
                };
                if !agent_points.contains(&image) {
                    return None;
                }
            }
        }

        let mut link_map = BTreeMap::new();
        for (redex_link, agent_link) in assignment {
            if let LinkId::Outer(_) = redex_link {
                link_map.insert(self.redex.link_name(redex_link).to_owned(), agent_link);
            }
        }
        Some(link_map)
    }

    /// The passthrough name a parameter exports for an agent link.
    fn passthrough_name(&self, link: LinkId) -> String {
        match link {
            LinkId::Edge(_) => format!("pe_{}", self.agent.link_name(link)),
            LinkId::Outer(_) => format!("py_{}", self.agent.link_name(link)),
        }
    }

    /// Builds the occurrence record for an accepted embedding, or
    /// `None` when the residual decomposition is not well-formed
    /// (overlapping regions in a multi-root redex).
    fn build_occurrence(
        &self,
        node_map: BTreeMap<NodeId, NodeId>,
        root_anchors: Vec<PlaceId>,
        link_map: BTreeMap<String, LinkId>,
    ) -> Result<Option<Occurrence>, MatchingError> {
        let image: BTreeSet<NodeId> = node_map.values().copied().collect();

        // Anchors must stay outside the image and the parameters.
        for anchor in &root_anchors {
            if let Some(node) = anchor.as_node() {
                if image.contains(&node) {
                    debug!("anchor {:?} inside another region's image, skipped", node);
                    return Ok(None);
                }
            }
        }

        // Parameter roots: the unmatched agent children at each mapped
        // parent that owns a redex site.
        let mut param_roots: Vec<Vec<NodeId>> = vec![Vec::new(); self.redex.site_count()];
        let mut claimed: BTreeSet<NodeId> = BTreeSet::new();
        for site in self.redex.sites() {
            let parent = self.redex.site_parent(site);
            let leftovers: Vec<NodeId> = match parent {
                PlaceId::Node(u) => {
                    let v = node_map[&u];
                    let matched: BTreeSet<NodeId> = self
                        .redex
                        .child_nodes_of(u.into())
                        .map(|rc| node_map[&rc])
                        .collect();
                    self.agent
                        .child_nodes_of(v.into())
                        .filter(|ac| !matched.contains(ac))
                        .collect()
                }
                PlaceId::Root(r) => {
                    let anchor = root_anchors[r.as_usize()];
                    let matched: BTreeSet<NodeId> = self
                        .redex
                        .child_nodes_of(parent)
                        .map(|rc| node_map[&rc])
                        .collect();
                    self.agent
                        .child_nodes_of(anchor)
                        .filter(|ac| !matched.contains(ac))
                        .collect()
                }
                PlaceId::Site(_) => unreachable!("sites cannot parent sites"),
            };
            for leftover in leftovers {
                if claimed.contains(&leftover) {
                    // Several sites under one parent: the first takes
                    // the leftovers, the rest stay barren.
                    continue;
                }
                claimed.insert(leftover);
                if image.contains(&leftover) {
                    debug!("parameter subtree overlaps the image, skipped");
                    return Ok(None);
                }
                param_roots[site.as_usize()].push(leftover);
            }
        }

        // Full parameter node sets, and overlap validation.
        let mut param_nodes: BTreeSet<NodeId> = BTreeSet::new();
        for roots in &param_roots {
            for top in roots {
                for node in self.agent.subtree_nodes((*top).into()) {
                    if image.contains(&node) || !param_nodes.insert(node) {
                        debug!("overlapping residual decomposition, skipped");
                        return Ok(None);
                    }
                }
            }
        }

        // Links fully consumed by the image through redex edges do not
        // surface in the context.
        let consumed: BTreeSet<LinkId> = self
            .redex
            .edges()
            .filter_map(|e| {
                self.redex
                    .points_of(LinkId::Edge(e))
                    .first()
                    .and_then(|point| match point {
                        PointId::Port(n, p) => self.agent.link_of(PointId::Port(node_map[n], *p)),
                        PointId::Inner(_) => None,
                    })
            })
            .collect();

        let (parameters, parameter_names) =
            self.build_parameters(&param_roots, &param_nodes)?;
        let context = self.build_context(
            &image,
            &param_nodes,
            &root_anchors,
            &link_map,
            &parameter_names,
            &consumed,
        )?;

        let name_refs: Vec<&str> = parameter_names.iter().map(|s| s.as_str()).collect();
        let redex_identity = identity_linking(self.agent.signature(), &name_refs)?;
        let context_identity = self.build_context_identity(&link_map)?;

        Ok(Some(Occurrence {
            node_map,
            root_anchors,
            link_map,
            context,
            parameters,
            parameter_names,
            redex_identity,
            context_identity,
        }))
    }

    /// Copies each parameter's subtrees into a fresh ground bigraph.
    /// Links reaching outside a parameter are exported as passthrough
    /// outer names; edges closed within it are copied as edges.
    fn build_parameters(
        &self,
        param_roots: &[Vec<NodeId>],
        param_nodes: &BTreeSet<NodeId>,
    ) -> Result<(Vec<Bigraph>, Vec<String>), MatchingError> {
        let mut parameters = Vec::with_capacity(param_roots.len());
        let mut names: BTreeSet<String> = BTreeSet::new();
        for roots in param_roots {
            let mut builder = BigraphBuilder::new(self.agent.signature().clone());
            let root = builder.add_root();
            let subtree: BTreeSet<NodeId> = roots
                .iter()
                .flat_map(|top| self.agent.subtree_nodes((*top).into()))
                .collect();
            let mut links: HashMap<LinkId, LinkId> = HashMap::new();
            let mut copied: HashMap<NodeId, NodeId> = HashMap::new();
            let mut stack: Vec<(NodeId, PlaceId)> =
                roots.iter().map(|top| (*top, PlaceId::Root(root))).collect();
            // Stack order flips siblings; structure, not order, is
            // identity.
            while let Some((node, parent)) = stack.pop() {
                let control = self.agent.control_of(node).name().to_owned();
                let new_node =
                    builder.add_labeled_node(&control, self.agent.node_name(node), parent)?;
                copied.insert(node, new_node);
                for (port, slot) in self.agent.ports_of(node).iter().enumerate() {
                    if let Some(agent_link) = slot {
                        let target = match links.get(agent_link) {
                            Some(t) => *t,
                            None => {
                                let closed_inside = agent_link.is_edge()
                                    && self.agent.points_of(*agent_link).iter().all(
                                        |point| match point {
                                            PointId::Port(n, _) => subtree.contains(n),
                                            PointId::Inner(_) => false,
                                        },
                                    );
                                let target = if closed_inside {
                                    LinkId::Edge(
                                        builder.add_edge(self.agent.link_name(*agent_link))?,
                                    )
                                } else {
                                    let name = self.passthrough_name(*agent_link);
                                    names.insert(name.clone());
                                    LinkId::Outer(builder.add_outer_name(&name)?)
                                };
                                links.insert(*agent_link, target);
                                target
                            }
                        };
                        builder.connect_port(new_node, port, target)?;
                    }
                }
                for child in self.agent.child_nodes_of(node.into()) {
                    debug_assert!(param_nodes.contains(&child));
                    stack.push((child, PlaceId::Node(new_node)));
                }
            }
            parameters.push(builder.finish()?);
        }
        Ok((parameters, names.into_iter().collect()))
    }

    /// Copies the agent minus image and parameters, inserts one site
    /// per redex root at its anchor, and exposes every link the
    /// rewritten part reconnects to as an inner name.
    #[allow(clippy::too_many_arguments)]
    fn build_context(
        &self,
        image: &BTreeSet<NodeId>,
        param_nodes: &BTreeSet<NodeId>,
        root_anchors: &[PlaceId],
        link_map: &BTreeMap<String, LinkId>,
        parameter_names: &[String],
        consumed: &BTreeSet<LinkId>,
    ) -> Result<Bigraph, MatchingError> {
        let mut builder = BigraphBuilder::new(self.agent.signature().clone());
        let mut links: HashMap<LinkId, LinkId> = HashMap::new();
        let mut place_map: HashMap<PlaceId, PlaceId> = HashMap::new();

        // All agent outer names survive into the context, connected or
        // not.
        for outer in self.agent.outer_names() {
            let agent_link = LinkId::Outer(outer);
            let copied = builder.add_outer_name(self.agent.link_name(agent_link))?;
            links.insert(agent_link, LinkId::Outer(copied));
        }

        let mut resolve_link = |builder: &mut BigraphBuilder,
                                agent_link: LinkId|
         -> Result<LinkId, BigraphError> {
            if let Some(existing) = links.get(&agent_link) {
                return Ok(*existing);
            }
            debug_assert!(agent_link.is_edge());
            let target = LinkId::Edge(builder.add_edge(self.agent.link_name(agent_link))?);
            links.insert(agent_link, target);
            Ok(target)
        };

        // Place structure, breadth-first, skipping image and parameter
        // subtrees.
        let mut queue: Vec<PlaceId> = Vec::new();
        for agent_root in self.agent.roots() {
            let copied = builder.add_root();
            place_map.insert(PlaceId::Root(agent_root), PlaceId::Root(copied));
            queue.push(PlaceId::Root(agent_root));
        }
        let mut head = 0;
        while head < queue.len() {
            let place = queue[head];
            head += 1;
            let parent = place_map[&place];
            for child in self.agent.child_nodes_of(place) {
                if image.contains(&child) || param_nodes.contains(&child) {
                    continue;
                }
                let control = self.agent.control_of(child).name().to_owned();
                let copied =
                    builder.add_labeled_node(&control, self.agent.node_name(child), parent)?;
                place_map.insert(PlaceId::Node(child), PlaceId::Node(copied));
                for (port, slot) in self.agent.ports_of(child).iter().enumerate() {
                    if let Some(agent_link) = slot {
                        debug_assert!(!consumed.contains(agent_link));
                        let target = resolve_link(&mut builder, *agent_link)?;
                        builder.connect_port(copied, port, target)?;
                    }
                }
                queue.push(PlaceId::Node(child));
            }
        }

        // One site per redex root, in root order.
        for anchor in root_anchors {
            let parent = place_map[anchor];
            builder.add_site(parent)?;
        }

        // Inner names: the redex's outer names and the parameter
        // passthroughs, each wired to the context image of its agent
        // link.
        for (redex_name, agent_link) in link_map {
            let target = resolve_link(&mut builder, *agent_link)?;
            let inner = builder.add_inner_name(redex_name)?;
            builder.connect_inner(inner, target)?;
        }
        for name in parameter_names {
            let agent_link = self
                .agent
                .links()
                .find(|l| self.passthrough_name(*l) == *name)
                .unwrap_or_else(|| unreachable!("passthrough names come from agent links"));
            let target = resolve_link(&mut builder, agent_link)?;
            let inner = builder.add_inner_name(name)?;
            builder.connect_inner(inner, target)?;
        }

        Ok(builder.finish()?)
    }

    /// One substitution per matched agent link, juxtaposed.
    fn build_context_identity(
        &self,
        link_map: &BTreeMap<String, LinkId>,
    ) -> Result<Bigraph, MatchingError> {
        let mut by_target: BTreeMap<LinkId, Vec<&str>> = BTreeMap::new();
        for (name, link) in link_map {
            by_target.entry(*link).or_default().push(name);
        }
        let mut identity = identity_linking(self.agent.signature(), &[])?;
        for (link, names) in by_target {
            let wiring = substitution(
                self.agent.signature(),
                self.agent.link_name(link),
                &names,
            )?;
            identity = parallel_product(&identity, &wiring)?;
        }
        Ok(identity)
    }
}

/// Convenience wrapper: all occurrences of `redex` in `agent`.
pub fn match_agent(agent: &Bigraph, redex: &Bigraph) -> Result<Vec<Occurrence>, MatchingError> {
    Matcher::new(agent, redex).occurrences()
}

//! The arena-stored bigraph: a place forest over a link hypergraph.

use std::collections::VecDeque;

use crate::index::{
    ControlId, EdgeId, InnerId, LinkId, NodeId, OuterId, PlaceId, PointId, RootId, SiteId,
};
use crate::signature::{Control, Signature};

#[derive(Clone, Debug)]
pub(crate) struct RootEntry {
    pub(crate) children: Vec<PlaceId>,
}

#[derive(Clone, Debug)]
pub(crate) struct NodeEntry {
    pub(crate) control: ControlId,
    pub(crate) name: String,
    pub(crate) parent: PlaceId,
    pub(crate) children: Vec<PlaceId>,
    /// One slot per port, length equals the control's arity.
    pub(crate) ports: Vec<Option<LinkId>>,
}

#[derive(Clone, Debug)]
pub(crate) struct SiteEntry {
    pub(crate) parent: PlaceId,
}

#[derive(Clone, Debug)]
pub(crate) struct EdgeEntry {
    pub(crate) name: String,
    pub(crate) points: Vec<PointId>,
}

#[derive(Clone, Debug)]
pub(crate) struct OuterEntry {
    pub(crate) name: String,
    pub(crate) points: Vec<PointId>,
}

#[derive(Clone, Debug)]
pub(crate) struct InnerEntry {
    pub(crate) name: String,
    pub(crate) link: Option<LinkId>,
}

/// A pure bigraph over a [`Signature`].
///
/// All entities live in flat arenas addressed by the index types of
/// [`crate::index`]; parent/child and link/point adjacency is stored on
/// both sides, so traversal in either direction is allocation-free.
#[derive(Clone, Debug)]
pub struct Bigraph {
    pub(crate) signature: Signature,
    pub(crate) roots: Vec<RootEntry>,
    pub(crate) nodes: Vec<NodeEntry>,
    pub(crate) sites: Vec<SiteEntry>,
    pub(crate) edges: Vec<EdgeEntry>,
    pub(crate) outer: Vec<OuterEntry>,
    pub(crate) inner: Vec<InnerEntry>,
}

impl Bigraph {
    /// The signature this bigraph is built over.
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// The number of roots.
    pub fn root_count(&self) -> usize {
        self.roots.len()
    }

    /// The number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// The number of sites.
    pub fn site_count(&self) -> usize {
        self.sites.len()
    }

    /// The number of closed edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// The number of outer names.
    pub fn outer_count(&self) -> usize {
        self.outer.len()
    }

    /// The number of inner names.
    pub fn inner_count(&self) -> usize {
        self.inner.len()
    }

    /// Iterates over all roots in index order.
    pub fn roots(&self) -> impl Iterator<Item = RootId> {
        (0..self.roots.len()).map(RootId::new)
    }

    /// Iterates over all nodes in index order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId::new)
    }

    /// Iterates over all sites in index order.
    pub fn sites(&self) -> impl Iterator<Item = SiteId> {
        (0..self.sites.len()).map(SiteId::new)
    }

    /// Iterates over all closed edges in index order.
    pub fn edges(&self) -> impl Iterator<Item = EdgeId> {
        (0..self.edges.len()).map(EdgeId::new)
    }

    /// Iterates over all outer names in index order.
    pub fn outer_names(&self) -> impl Iterator<Item = OuterId> {
        (0..self.outer.len()).map(OuterId::new)
    }

    /// Iterates over all inner names in index order.
    pub fn inner_names(&self) -> impl Iterator<Item = InnerId> {
        (0..self.inner.len()).map(InnerId::new)
    }

    /// Iterates over all links, edges first.
    pub fn links(&self) -> impl Iterator<Item = LinkId> {
        let edges = (0..self.edges.len()).map(|i| LinkId::Edge(EdgeId::new(i)));
        let outer = (0..self.outer.len()).map(|i| LinkId::Outer(OuterId::new(i)));
        edges.chain(outer)
    }

    /// The control carried by a node.
    pub fn control_of(&self, node: NodeId) -> &Control {
        self.signature.control(self.nodes[node.as_usize()].control)
    }

    /// The (not necessarily unique) label of a node.
    pub fn node_name(&self, node: NodeId) -> &str {
        &self.nodes[node.as_usize()].name
    }

    /// The parent of a place; `None` for roots.
    pub fn parent_of(&self, place: PlaceId) -> Option<PlaceId> {
        match place {
            PlaceId::Root(_) => None,
            PlaceId::Node(n) => Some(self.nodes[n.as_usize()].parent),
            PlaceId::Site(s) => Some(self.sites[s.as_usize()].parent),
        }
    }

    /// The children of a place in insertion order; sites have none.
    pub fn children_of(&self, place: PlaceId) -> &[PlaceId] {
        match place {
            PlaceId::Root(r) => &self.roots[r.as_usize()].children,
            PlaceId::Node(n) => &self.nodes[n.as_usize()].children,
            PlaceId::Site(_) => &[],
        }
    }

    /// The node children of a place, skipping sites.
    pub fn child_nodes_of(&self, place: PlaceId) -> impl Iterator<Item = NodeId> + '_ {
        self.children_of(place)
            .iter()
            .filter_map(|child| child.as_node())
    }

    /// Returns true if the place has a site among its children.
    pub fn has_site_child(&self, place: PlaceId) -> bool {
        self.children_of(place).iter().any(|child| child.is_site())
    }

    /// The port slots of a node, one per arity position.
    pub fn ports_of(&self, node: NodeId) -> &[Option<LinkId>] {
        &self.nodes[node.as_usize()].ports
    }

    /// The link a point is attached to, if any.
    pub fn link_of(&self, point: PointId) -> Option<LinkId> {
        match point {
            PointId::Port(node, port) => self.nodes[node.as_usize()].ports[port],
            PointId::Inner(inner) => self.inner[inner.as_usize()].link,
        }
    }

    /// All points attached to a link.
    pub fn points_of(&self, link: LinkId) -> &[PointId] {
        match link {
            LinkId::Edge(e) => &self.edges[e.as_usize()].points,
            LinkId::Outer(o) => &self.outer[o.as_usize()].points,
        }
    }

    /// The name of a link.
    pub fn link_name(&self, link: LinkId) -> &str {
        match link {
            LinkId::Edge(e) => &self.edges[e.as_usize()].name,
            LinkId::Outer(o) => &self.outer[o.as_usize()].name,
        }
    }

    /// Looks an outer name up by name.
    pub fn outer_by_name(&self, name: &str) -> Option<OuterId> {
        self.outer
            .iter()
            .position(|o| o.name == name)
            .map(OuterId::new)
    }

    /// Looks an inner name up by name.
    pub fn inner_by_name(&self, name: &str) -> Option<InnerId> {
        self.inner
            .iter()
            .position(|i| i.name == name)
            .map(InnerId::new)
    }

    /// The number of connected ports of a node.
    pub fn degree(&self, node: NodeId) -> usize {
        self.ports_of(node).iter().filter(|p| p.is_some()).count()
    }

    /// Returns true if the bigraph has no sites and no inner names.
    pub fn is_ground(&self) -> bool {
        self.sites.is_empty() && self.inner.is_empty()
    }

    /// Distinct nodes sharing a link with the given node, excluding the
    /// node itself.
    pub fn linked_neighbors(&self, node: NodeId) -> Vec<NodeId> {
        let mut neighbors = Vec::new();
        for port in self.ports_of(node).iter().flatten() {
            for point in self.points_of(*port) {
                if let PointId::Port(other, _) = point {
                    if *other != node && !neighbors.contains(other) {
                        neighbors.push(*other);
                    }
                }
            }
        }
        neighbors
    }

    /// All nodes in breadth-first order over the place forest, roots in
    /// index order. Uses an explicit queue; hierarchy depth is unbounded.
    pub fn nodes_breadth_first(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut queue: VecDeque<PlaceId> = self.roots().map(PlaceId::Root).collect();
        while let Some(place) = queue.pop_front() {
            if let Some(node) = place.as_node() {
                order.push(node);
            }
            for child in self.children_of(place) {
                queue.push_back(*child);
            }
        }
        order
    }

    /// All nodes of the subtree rooted at `place` (inclusive if `place`
    /// is a node), depth-first with an explicit stack.
    pub fn subtree_nodes(&self, place: PlaceId) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![place];
        while let Some(current) = stack.pop() {
            if let Some(node) = current.as_node() {
                order.push(node);
            }
            for child in self.children_of(current) {
                stack.push(*child);
            }
        }
        order
    }

    /// The parent of a site.
    pub fn site_parent(&self, site: SiteId) -> PlaceId {
        self.sites[site.as_usize()].parent
    }
}

//! Step-wise construction of bigraphs.
//!
//! The builder is consumed by [`BigraphBuilder::finish`], so a finished
//! builder cannot be touched again; reuse-after-finish is a compile
//! error instead of a runtime state check.

use crate::bigraph::{
    Bigraph, EdgeEntry, InnerEntry, NodeEntry, OuterEntry, RootEntry, SiteEntry,
};
use crate::error::BigraphError;
use crate::index::{EdgeId, InnerId, LinkId, NodeId, OuterId, PlaceId, PointId, RootId, SiteId};
use crate::signature::Signature;

/// Builds a [`Bigraph`] entity by entity.
///
/// Names are unique per class: outer names, inner names and edge names
/// each form their own namespace (an inner and an outer name may share
/// a name, which is how identity wirings are written).
#[derive(Debug)]
pub struct BigraphBuilder {
    signature: Signature,
    roots: Vec<RootEntry>,
    nodes: Vec<NodeEntry>,
    sites: Vec<SiteEntry>,
    edges: Vec<EdgeEntry>,
    outer: Vec<OuterEntry>,
    inner: Vec<InnerEntry>,
}

impl BigraphBuilder {
    /// Starts building over the given signature.
    pub fn new(signature: Signature) -> Self {
        Self {
            signature,
            roots: Vec::new(),
            nodes: Vec::new(),
            sites: Vec::new(),
            edges: Vec::new(),
            outer: Vec::new(),
            inner: Vec::new(),
        }
    }

    /// The signature being built over.
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Adds a fresh root.
    pub fn add_root(&mut self) -> RootId {
        self.roots.push(RootEntry {
            children: Vec::new(),
        });
        RootId::new(self.roots.len() - 1)
    }

    /// Adds a node of the named control under `parent`, with an
    /// auto-generated label.
    pub fn add_node(&mut self, control: &str, parent: PlaceId) -> Result<NodeId, BigraphError> {
        let label = format!("v{}", self.nodes.len());
        self.add_labeled_node(control, &label, parent)
    }

    /// Adds a node with an explicit label. Labels are not identity and
    /// need not be unique; they only surface in logs and exports.
    pub fn add_labeled_node(
        &mut self,
        control: &str,
        label: &str,
        parent: PlaceId,
    ) -> Result<NodeId, BigraphError> {
        let control_id = self
            .signature
            .control_id(control)
            .ok_or_else(|| BigraphError::UnknownControl(control.to_owned()))?;
        self.check_parent(parent)?;
        let arity = self.signature.control(control_id).arity();
        let node = NodeId::new(self.nodes.len());
        self.nodes.push(NodeEntry {
            control: control_id,
            name: label.to_owned(),
            parent,
            children: Vec::new(),
            ports: vec![None; arity],
        });
        self.attach_child(parent, PlaceId::Node(node));
        Ok(node)
    }

    /// Adds a site under `parent`.
    pub fn add_site(&mut self, parent: PlaceId) -> Result<SiteId, BigraphError> {
        self.check_parent(parent)?;
        let site = SiteId::new(self.sites.len());
        self.sites.push(SiteEntry { parent });
        self.attach_child(parent, PlaceId::Site(site));
        Ok(site)
    }

    /// Adds an outer name.
    pub fn add_outer_name(&mut self, name: &str) -> Result<OuterId, BigraphError> {
        if self.outer.iter().any(|o| o.name == name) {
            return Err(BigraphError::DuplicateName(name.to_owned()));
        }
        self.outer.push(OuterEntry {
            name: name.to_owned(),
            points: Vec::new(),
        });
        Ok(OuterId::new(self.outer.len() - 1))
    }

    /// Adds an inner name, initially idle.
    pub fn add_inner_name(&mut self, name: &str) -> Result<InnerId, BigraphError> {
        if self.inner.iter().any(|i| i.name == name) {
            return Err(BigraphError::DuplicateName(name.to_owned()));
        }
        self.inner.push(InnerEntry {
            name: name.to_owned(),
            link: None,
        });
        Ok(InnerId::new(self.inner.len() - 1))
    }

    /// Adds a closed edge with an explicit name.
    pub fn add_edge(&mut self, name: &str) -> Result<EdgeId, BigraphError> {
        if self.edges.iter().any(|e| e.name == name) {
            return Err(BigraphError::DuplicateName(name.to_owned()));
        }
        self.edges.push(EdgeEntry {
            name: name.to_owned(),
            points: Vec::new(),
        });
        Ok(EdgeId::new(self.edges.len() - 1))
    }

    /// Adds a closed edge with a fresh auto-generated name.
    pub fn fresh_edge(&mut self) -> EdgeId {
        let mut i = self.edges.len();
        loop {
            let name = format!("e{}", i);
            if !self.edges.iter().any(|e| e.name == name) {
                self.edges.push(EdgeEntry {
                    name,
                    points: Vec::new(),
                });
                return EdgeId::new(self.edges.len() - 1);
            }
            i += 1;
        }
    }

    /// Connects port `port` of `node` to `link`. Each port connects at
    /// most once.
    pub fn connect_port(
        &mut self,
        node: NodeId,
        port: usize,
        link: LinkId,
    ) -> Result<(), BigraphError> {
        let entry = self
            .nodes
            .get(node.as_usize())
            .ok_or(BigraphError::InvalidHandle)?;
        self.check_link(link)?;
        let control = self.signature.control(entry.control);
        if port >= control.arity() {
            return Err(BigraphError::PortOutOfRange {
                port,
                control: control.name().to_owned(),
                arity: control.arity(),
            });
        }
        if entry.ports[port].is_some() {
            return Err(BigraphError::PortOccupied {
                node: node.as_usize(),
                port,
            });
        }
        self.nodes[node.as_usize()].ports[port] = Some(link);
        self.attach_point(link, PointId::Port(node, port));
        Ok(())
    }

    /// Connects an inner name to a link.
    pub fn connect_inner(&mut self, inner: InnerId, link: LinkId) -> Result<(), BigraphError> {
        let entry = self
            .inner
            .get(inner.as_usize())
            .ok_or(BigraphError::InvalidHandle)?;
        self.check_link(link)?;
        if entry.link.is_some() {
            return Err(BigraphError::InnerOccupied(entry.name.clone()));
        }
        self.inner[inner.as_usize()].link = Some(link);
        self.attach_point(link, PointId::Inner(inner));
        Ok(())
    }

    /// Finishes building. Consumes the builder; all structural
    /// invariants were enforced on the way, so this cannot fail today,
    /// but the signature leaves room for deferred checks.
    pub fn finish(self) -> Result<Bigraph, BigraphError> {
        Ok(Bigraph {
            signature: self.signature,
            roots: self.roots,
            nodes: self.nodes,
            sites: self.sites,
            edges: self.edges,
            outer: self.outer,
            inner: self.inner,
        })
    }

    fn check_parent(&self, parent: PlaceId) -> Result<(), BigraphError> {
        match parent {
            PlaceId::Root(r) => {
                if r.as_usize() >= self.roots.len() {
                    return Err(BigraphError::InvalidHandle);
                }
            }
            PlaceId::Node(n) => {
                let entry = self
                    .nodes
                    .get(n.as_usize())
                    .ok_or(BigraphError::InvalidHandle)?;
                let control = self.signature.control(entry.control);
                if control.is_atomic() {
                    return Err(BigraphError::AtomicParent(control.name().to_owned()));
                }
            }
            PlaceId::Site(_) => return Err(BigraphError::InvalidHandle),
        }
        Ok(())
    }

    fn check_link(&self, link: LinkId) -> Result<(), BigraphError> {
        let in_range = match link {
            LinkId::Edge(e) => e.as_usize() < self.edges.len(),
            LinkId::Outer(o) => o.as_usize() < self.outer.len(),
        };
        if in_range {
            Ok(())
        } else {
            Err(BigraphError::InvalidHandle)
        }
    }

    fn attach_child(&mut self, parent: PlaceId, child: PlaceId) {
        match parent {
            PlaceId::Root(r) => self.roots[r.as_usize()].children.push(child),
            PlaceId::Node(n) => self.nodes[n.as_usize()].children.push(child),
            PlaceId::Site(_) => unreachable!("checked by check_parent"),
        }
    }

    fn attach_point(&mut self, link: LinkId, point: PointId) {
        match link {
            LinkId::Edge(e) => self.edges[e.as_usize()].points.push(point),
            LinkId::Outer(o) => self.outer[o.as_usize()].points.push(point),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::{Control, Signature};

    fn sig() -> Signature {
        Signature::from_controls(vec![
            Control::active("Room", 0),
            Control::active("Computer", 1),
            Control::atomic("Job", 0),
        ])
        .unwrap()
    }

    #[test]
    fn unknown_control_is_rejected() {
        let mut builder = BigraphBuilder::new(sig());
        let root = builder.add_root();
        let result = builder.add_node("Printer", root.into());
        assert!(matches!(result, Err(BigraphError::UnknownControl(name)) if name == "Printer"));
    }

    #[test]
    fn atomic_controls_are_childless() {
        let mut builder = BigraphBuilder::new(sig());
        let root = builder.add_root();
        let job = builder.add_node("Job", root.into()).unwrap();
        let node_err = builder.add_node("Room", job.into());
        assert!(matches!(node_err, Err(BigraphError::AtomicParent(_))));
        let site_err = builder.add_site(job.into());
        assert!(matches!(site_err, Err(BigraphError::AtomicParent(_))));
    }

    #[test]
    fn port_arity_and_occupancy_are_enforced() {
        let mut builder = BigraphBuilder::new(sig());
        let root = builder.add_root();
        let computer = builder.add_node("Computer", root.into()).unwrap();
        let link = builder.add_outer_name("network").unwrap();

        let overflow = builder.connect_port(computer, 1, LinkId::Outer(link));
        assert!(matches!(
            overflow,
            Err(BigraphError::PortOutOfRange { port: 1, arity: 1, .. })
        ));

        builder.connect_port(computer, 0, LinkId::Outer(link)).unwrap();
        let occupied = builder.connect_port(computer, 0, LinkId::Outer(link));
        assert!(matches!(occupied, Err(BigraphError::PortOccupied { .. })));
    }

    #[test]
    fn duplicate_link_names_per_class() {
        let mut builder = BigraphBuilder::new(sig());
        builder.add_outer_name("x").unwrap();
        assert!(builder.add_outer_name("x").is_err());
        // An inner name may reuse an outer name's name.
        builder.add_inner_name("x").unwrap();
        assert!(builder.add_inner_name("x").is_err());
    }

    #[test]
    fn fresh_edges_skip_taken_names() {
        let mut builder = BigraphBuilder::new(sig());
        builder.add_edge("e0").unwrap();
        let e = builder.fresh_edge();
        let bigraph = builder.finish().unwrap();
        assert_eq!(bigraph.link_name(LinkId::Edge(e)), "e1");
    }

    #[test]
    fn inner_names_connect_once() {
        let mut builder = BigraphBuilder::new(sig());
        let x = builder.add_inner_name("x").unwrap();
        let e = builder.add_edge("e0").unwrap();
        builder.connect_inner(x, LinkId::Edge(e)).unwrap();
        assert!(matches!(
            builder.connect_inner(x, LinkId::Edge(e)),
            Err(BigraphError::InnerOccupied(_))
        ));
    }
}

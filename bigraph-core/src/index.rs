//! Index newtypes for the arena-stored entities of a bigraph.
//!
//! Every entity class gets its own usize-backed index type, so a
//! `NodeId` cannot accidentally be used to address a root or an edge.

use std::fmt;

macro_rules! impl_entity_index {
    ($name:ident, $prefix:expr, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(usize);

        impl $name {
            /// Creates the index from a raw arena offset.
            pub fn new(index: usize) -> Self {
                Self(index)
            }

            /// Returns the raw arena offset of this index.
            pub fn as_usize(self) -> usize {
                self.0
            }
        }

        impl From<usize> for $name {
            fn from(index: usize) -> Self {
                Self(index)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

impl_entity_index!(RootId, "r", "Index of a root (region) in the place forest.");
impl_entity_index!(NodeId, "v", "Index of a control-carrying node in the place forest.");
impl_entity_index!(SiteId, "s", "Index of a site (hole) in the place forest.");
impl_entity_index!(EdgeId, "e", "Index of a closed hyperedge in the link graph.");
impl_entity_index!(OuterId, "y", "Index of an outer name in the link graph.");
impl_entity_index!(InnerId, "x", "Index of an inner name in the link graph.");
impl_entity_index!(ControlId, "c", "Index of a control in a signature.");

/// A place: root, node or site.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PlaceId {
    /// A root of the place forest.
    Root(RootId),
    /// A node carrying a control.
    Node(NodeId),
    /// A site, i.e. a hole to be filled by composition.
    Site(SiteId),
}

impl PlaceId {
    /// Returns the node index if this place is a node.
    pub fn as_node(self) -> Option<NodeId> {
        match self {
            PlaceId::Node(n) => Some(n),
            _ => None,
        }
    }

    /// Returns true if this place is a root.
    pub fn is_root(self) -> bool {
        matches!(self, PlaceId::Root(_))
    }

    /// Returns true if this place is a site.
    pub fn is_site(self) -> bool {
        matches!(self, PlaceId::Site(_))
    }
}

impl From<RootId> for PlaceId {
    fn from(id: RootId) -> Self {
        PlaceId::Root(id)
    }
}

impl From<NodeId> for PlaceId {
    fn from(id: NodeId) -> Self {
        PlaceId::Node(id)
    }
}

impl From<SiteId> for PlaceId {
    fn from(id: SiteId) -> Self {
        PlaceId::Site(id)
    }
}

/// A link: closed edge or outer name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LinkId {
    /// A closed hyperedge.
    Edge(EdgeId),
    /// An outer name, open towards the context.
    Outer(OuterId),
}

impl LinkId {
    /// Returns true if this link is a closed edge.
    pub fn is_edge(self) -> bool {
        matches!(self, LinkId::Edge(_))
    }
}

impl From<EdgeId> for LinkId {
    fn from(id: EdgeId) -> Self {
        LinkId::Edge(id)
    }
}

impl From<OuterId> for LinkId {
    fn from(id: OuterId) -> Self {
        LinkId::Outer(id)
    }
}

/// A point of a link: a node port or an inner name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PointId {
    /// Port `index` of a node, with `0 <= index < arity`.
    Port(NodeId, usize),
    /// An inner name, open towards composed parameters.
    Inner(InnerId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_roundtrip_and_formatting() {
        let n = NodeId::new(7);
        assert_eq!(n.as_usize(), 7);
        assert_eq!(NodeId::from(7), n);
        assert_eq!(format!("{}", n), "v7");
        assert_eq!(format!("{:?}", EdgeId::new(0)), "e0");
    }

    #[test]
    fn place_id_accessors() {
        let p: PlaceId = NodeId::new(2).into();
        assert_eq!(p.as_node(), Some(NodeId::new(2)));
        assert!(!p.is_root());
        assert!(PlaceId::Root(RootId::new(0)).is_root());
        assert!(PlaceId::Site(SiteId::new(1)).is_site());
    }

    #[test]
    fn link_id_ordering_is_stable() {
        let mut links = vec![
            LinkId::Outer(OuterId::new(0)),
            LinkId::Edge(EdgeId::new(1)),
            LinkId::Edge(EdgeId::new(0)),
        ];
        links.sort();
        assert_eq!(
            links,
            vec![
                LinkId::Edge(EdgeId::new(0)),
                LinkId::Edge(EdgeId::new(1)),
                LinkId::Outer(OuterId::new(0)),
            ]
        );
    }
}

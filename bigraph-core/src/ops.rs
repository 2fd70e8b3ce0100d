//! Composition and juxtaposition of bigraphs, plus the elementary
//! placings and linkings they are usually combined with.
//!
//! Both operations assemble the result arenas directly instead of going
//! through the builder; the operands are already validated, so the only
//! work left is index remapping.

use log::debug;

use crate::bigraph::{Bigraph, EdgeEntry, InnerEntry, OuterEntry, RootEntry, SiteEntry};
use crate::builder::BigraphBuilder;
use crate::error::CompositionError;
use crate::index::{EdgeId, LinkId, NodeId, OuterId, PlaceId, PointId, SiteId};
use crate::signature::Signature;

/// The barren bigraph: a single empty root, no links.
pub fn barren(signature: &Signature) -> Bigraph {
    let mut builder = BigraphBuilder::new(signature.clone());
    builder.add_root();
    builder
        .finish()
        .unwrap_or_else(|_| unreachable!("a single root violates no invariant"))
}

/// The identity linking on `names`: inner name `x` wired to outer name
/// `x` for each name, no places.
pub fn identity_linking(
    signature: &Signature,
    names: &[&str],
) -> Result<Bigraph, CompositionError> {
    let mut builder = BigraphBuilder::new(signature.clone());
    for name in names {
        let outer = builder.add_outer_name(name)?;
        let inner = builder.add_inner_name(name)?;
        builder.connect_inner(inner, LinkId::Outer(outer))?;
    }
    Ok(builder.finish()?)
}

/// The substitution linking all of `inners` to the single outer name
/// `outer`, no places.
pub fn substitution(
    signature: &Signature,
    outer: &str,
    inners: &[&str],
) -> Result<Bigraph, CompositionError> {
    let mut builder = BigraphBuilder::new(signature.clone());
    let target = builder.add_outer_name(outer)?;
    for name in inners {
        let inner = builder.add_inner_name(name)?;
        builder.connect_inner(inner, LinkId::Outer(target))?;
    }
    Ok(builder.finish()?)
}

fn unique_edge_name(taken: &[EdgeEntry], wanted: &str) -> String {
    if !taken.iter().any(|e| e.name == wanted) {
        return wanted.to_owned();
    }
    let mut i = taken.len();
    loop {
        let candidate = format!("e{}", i);
        if !taken.iter().any(|e| e.name == candidate) {
            return candidate;
        }
        i += 1;
    }
}

/// Juxtaposes `a` and `b`, sharing outer names by equal name.
///
/// Roots and sites of `b` are shifted behind those of `a`; inner names
/// must be disjoint, edge names of `b` are freshened on clash.
pub fn parallel_product(a: &Bigraph, b: &Bigraph) -> Result<Bigraph, CompositionError> {
    if a.signature != b.signature {
        return Err(CompositionError::IncompatibleSignature);
    }
    for inner in &b.inner {
        if a.inner.iter().any(|i| i.name == inner.name) {
            return Err(CompositionError::IncompatibleInterface(format!(
                "inner name '{}' present on both operands",
                inner.name
            )));
        }
    }

    let node_shift = a.nodes.len();
    let site_shift = a.sites.len();
    let root_shift = a.roots.len();
    let inner_shift = a.inner.len();
    let edge_shift = a.edges.len();

    let shift_place = |place: PlaceId| -> PlaceId {
        match place {
            PlaceId::Root(r) => PlaceId::Root((r.as_usize() + root_shift).into()),
            PlaceId::Node(n) => PlaceId::Node((n.as_usize() + node_shift).into()),
            PlaceId::Site(s) => PlaceId::Site((s.as_usize() + site_shift).into()),
        }
    };
    let shift_point = |point: PointId| -> PointId {
        match point {
            PointId::Port(n, p) => PointId::Port((n.as_usize() + node_shift).into(), p),
            PointId::Inner(i) => PointId::Inner((i.as_usize() + inner_shift).into()),
        }
    };

    let mut edges: Vec<EdgeEntry> = a.edges.clone();
    for edge in &b.edges {
        let name = unique_edge_name(&edges, &edge.name);
        edges.push(EdgeEntry {
            name,
            points: edge.points.iter().map(|p| shift_point(*p)).collect(),
        });
    }

    // Outer names of b merge into equally named entries of a.
    let mut outer: Vec<OuterEntry> = a.outer.clone();
    let mut b_outer_map: Vec<OuterId> = Vec::with_capacity(b.outer.len());
    for entry in &b.outer {
        let target = match outer.iter().position(|o| o.name == entry.name) {
            Some(i) => OuterId::new(i),
            None => {
                outer.push(OuterEntry {
                    name: entry.name.clone(),
                    points: Vec::new(),
                });
                OuterId::new(outer.len() - 1)
            }
        };
        for point in &entry.points {
            outer[target.as_usize()].points.push(shift_point(*point));
        }
        b_outer_map.push(target);
    }

    let shift_link = |link: LinkId| -> LinkId {
        match link {
            LinkId::Edge(e) => LinkId::Edge((e.as_usize() + edge_shift).into()),
            LinkId::Outer(o) => LinkId::Outer(b_outer_map[o.as_usize()]),
        }
    };

    let mut roots: Vec<RootEntry> = a.roots.clone();
    for root in &b.roots {
        roots.push(RootEntry {
            children: root.children.iter().map(|c| shift_place(*c)).collect(),
        });
    }

    let mut nodes = a.nodes.clone();
    for node in &b.nodes {
        let mut copied = node.clone();
        copied.parent = shift_place(copied.parent);
        copied.children = copied.children.iter().map(|c| shift_place(*c)).collect();
        copied.ports = copied.ports.iter().map(|p| p.map(shift_link)).collect();
        nodes.push(copied);
    }

    let mut sites: Vec<SiteEntry> = a.sites.clone();
    for site in &b.sites {
        sites.push(SiteEntry {
            parent: shift_place(site.parent),
        });
    }

    let mut inner: Vec<InnerEntry> = a.inner.clone();
    for entry in &b.inner {
        inner.push(InnerEntry {
            name: entry.name.clone(),
            link: entry.link.map(shift_link),
        });
    }

    Ok(Bigraph {
        signature: a.signature.clone(),
        roots,
        nodes,
        sites,
        edges,
        outer,
        inner,
    })
}

/// Composes `outer ∘ inner`: site *i* of `outer` is filled with root
/// *i* of `inner`, and `outer`'s inner name *x* is joined with
/// `inner`'s outer name *x*.
///
/// Outer names of `inner` with no matching inner name on `outer` are
/// hoisted into the result's outer interface, merged by name. Inner
/// names of `outer` with no partner are dropped (logged); a joined pair
/// whose `outer`-side inner name is idle closes into a fresh edge.
pub fn compose(outer: &Bigraph, inner: &Bigraph) -> Result<Bigraph, CompositionError> {
    if outer.signature != inner.signature {
        return Err(CompositionError::IncompatibleSignature);
    }
    if outer.site_count() != inner.root_count() {
        return Err(CompositionError::IncompatibleInterface(format!(
            "{} site(s) cannot be filled by {} root(s)",
            outer.site_count(),
            inner.root_count()
        )));
    }

    let node_shift = outer.nodes.len();
    let shift_node = |n: NodeId| -> NodeId { (n.as_usize() + node_shift).into() };

    // Edges: all of outer's, then inner's with freshened names. Inner
    // name points of the outer operand are consumed below.
    let mut edges: Vec<EdgeEntry> = outer
        .edges
        .iter()
        .map(|e| EdgeEntry {
            name: e.name.clone(),
            points: e
                .points
                .iter()
                .copied()
                .filter(|p| !matches!(p, PointId::Inner(_)))
                .collect(),
        })
        .collect();
    let mut inner_edge_map: Vec<EdgeId> = Vec::with_capacity(inner.edges.len());
    for edge in &inner.edges {
        let name = unique_edge_name(&edges, &edge.name);
        edges.push(EdgeEntry {
            name,
            points: Vec::new(),
        });
        inner_edge_map.push(EdgeId::new(edges.len() - 1));
    }

    let mut outer_names: Vec<OuterEntry> = outer
        .outer
        .iter()
        .map(|o| OuterEntry {
            name: o.name.clone(),
            points: o
                .points
                .iter()
                .copied()
                .filter(|p| !matches!(p, PointId::Inner(_)))
                .collect(),
        })
        .collect();

    // Resolve each outer name of the inner operand to a result link.
    let mut inner_outer_target: Vec<LinkId> = Vec::with_capacity(inner.outer.len());
    let mut consumed = vec![false; outer.inner.len()];
    for entry in &inner.outer {
        let target = match outer.inner.iter().position(|i| i.name == entry.name) {
            Some(xi) => {
                consumed[xi] = true;
                match outer.inner[xi].link {
                    Some(link) => link,
                    None => {
                        // Idle inner name: the joined points lose all
                        // context visibility and close into an edge.
                        let name = unique_edge_name(&edges, &format!("e{}", edges.len()));
                        edges.push(EdgeEntry {
                            name,
                            points: Vec::new(),
                        });
                        LinkId::Edge(EdgeId::new(edges.len() - 1))
                    }
                }
            }
            None => match outer_names.iter().position(|o| o.name == entry.name) {
                Some(i) => LinkId::Outer(OuterId::new(i)),
                None => {
                    outer_names.push(OuterEntry {
                        name: entry.name.clone(),
                        points: Vec::new(),
                    });
                    LinkId::Outer(OuterId::new(outer_names.len() - 1))
                }
            },
        };
        inner_outer_target.push(target);
    }
    for (xi, was_consumed) in consumed.iter().enumerate() {
        if !was_consumed {
            debug!(
                "compose drops unmatched inner name '{}' of the outer operand",
                outer.inner[xi].name
            );
        }
    }

    let map_inner_link = |link: LinkId| -> LinkId {
        match link {
            LinkId::Edge(e) => LinkId::Edge(inner_edge_map[e.as_usize()]),
            LinkId::Outer(o) => inner_outer_target[o.as_usize()],
        }
    };
    let map_inner_point = |point: PointId| -> PointId {
        match point {
            PointId::Port(n, p) => PointId::Port(shift_node(n), p),
            PointId::Inner(i) => PointId::Inner(i),
        }
    };

    // Place remapping. Outer nodes and roots keep their indices; inner
    // nodes shift; inner sites keep their indices (outer sites vanish).
    let map_inner_parent = |parent: PlaceId| -> PlaceId {
        match parent {
            PlaceId::Root(r) => outer.sites[r.as_usize()].parent,
            PlaceId::Node(n) => PlaceId::Node(shift_node(n)),
            PlaceId::Site(_) => unreachable!("sites have no children"),
        }
    };
    let map_inner_child = |child: PlaceId| -> PlaceId {
        match child {
            PlaceId::Node(n) => PlaceId::Node(shift_node(n)),
            PlaceId::Site(s) => PlaceId::Site(s),
            PlaceId::Root(_) => unreachable!("roots are not children"),
        }
    };
    // Site i of the outer operand is replaced in place by the children
    // of root i of the inner operand, keeping sibling order around it.
    let splice_children = |children: &[PlaceId]| -> Vec<PlaceId> {
        let mut result = Vec::with_capacity(children.len());
        for child in children {
            match child {
                PlaceId::Site(s) => {
                    for grafted in &inner.roots[s.as_usize()].children {
                        result.push(map_inner_child(*grafted));
                    }
                }
                other => result.push(*other),
            }
        }
        result
    };

    let roots: Vec<RootEntry> = outer
        .roots
        .iter()
        .map(|r| RootEntry {
            children: splice_children(&r.children),
        })
        .collect();

    let mut nodes = Vec::with_capacity(outer.nodes.len() + inner.nodes.len());
    for node in &outer.nodes {
        let mut copied = node.clone();
        copied.children = splice_children(&copied.children);
        nodes.push(copied);
    }
    for node in &inner.nodes {
        let mut copied = node.clone();
        copied.parent = map_inner_parent(copied.parent);
        copied.children = copied.children.iter().map(|c| map_inner_child(*c)).collect();
        copied.ports = copied.ports.iter().map(|p| p.map(map_inner_link)).collect();
        nodes.push(copied);
    }

    let sites: Vec<SiteEntry> = inner
        .sites
        .iter()
        .map(|s| SiteEntry {
            parent: map_inner_parent(s.parent),
        })
        .collect();

    let inner_names: Vec<InnerEntry> = inner
        .inner
        .iter()
        .map(|i| InnerEntry {
            name: i.name.clone(),
            link: i.link.map(map_inner_link),
        })
        .collect();

    // Attach the inner operand's points to their resolved links.
    let mut result = Bigraph {
        signature: outer.signature.clone(),
        roots,
        nodes,
        sites,
        edges,
        outer: outer_names,
        inner: inner_names,
    };
    for (i, entry) in inner.edges.iter().enumerate() {
        let target = inner_edge_map[i];
        for point in &entry.points {
            result.edges[target.as_usize()]
                .points
                .push(map_inner_point(*point));
        }
    }
    for (i, entry) in inner.outer.iter().enumerate() {
        let target = inner_outer_target[i];
        for point in &entry.points {
            let mapped = map_inner_point(*point);
            match target {
                LinkId::Edge(e) => result.edges[e.as_usize()].points.push(mapped),
                LinkId::Outer(o) => result.outer[o.as_usize()].points.push(mapped),
            }
        }
    }

    Ok(result)
}

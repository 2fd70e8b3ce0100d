//! Canonical string form of a bigraph.
//!
//! Two bigraphs that are isomorphic (same place structure up to
//! node/root renaming, same link topology up to link renaming) encode
//! to byte-identical strings; the encoding is used as the hash key for
//! state deduplication in the reaction graph.
//!
//! The encoder refines in passes over the place forest. The first pass
//! encodes places only, sorting child encodings so builder insertion
//! order cannot leak into the result. Links then receive relative
//! identifiers from the sorted `(place-encoding, port-index)` profiles
//! of their points, re-deriving the profiles with the identifiers
//! embedded until the partition stops splitting. Orderings the
//! profiles cannot fix are resolved by rendering every candidate
//! ordering and keeping the lexicographically least encoding, so no
//! arena order can surface in the result.

use std::collections::{BTreeMap, HashMap};

use bigraph_core::{Bigraph, LinkId, PlaceId, PointId};

/// Computes the canonical form of `bigraph`.
///
/// Pure function of structure; link and node names never appear in the
/// output, and neither arena insertion order nor symmetric link ties
/// can change the result.
pub fn canonical(bigraph: &Bigraph) -> String {
    let (mut link_ids, open) = assign_link_ids(bigraph);
    if open.is_empty() {
        return render(bigraph, &link_ids);
    }
    let mut best: Option<String> = None;
    search_tie_orders(bigraph, &open, 0, &mut link_ids, &mut best);
    best.unwrap_or_else(|| unreachable!("the tie search renders at least one ordering"))
}

/// Renders the full encoding for a complete link-id assignment.
fn render(bigraph: &Bigraph, link_ids: &HashMap<LinkId, String>) -> String {
    let final_pass = encode_places(bigraph, Some(link_ids));

    let mut out = format!("r{}$", bigraph.root_count());
    let mut root_encodings: Vec<&String> = bigraph
        .roots()
        .map(|r| &final_pass[&PlaceId::Root(r)])
        .collect();
    root_encodings.sort();
    for encoding in root_encodings {
        out.push_str(encoding);
        out.push('#');
    }

    // Inner-name wiring: one token per inner name, idle names first.
    if bigraph.inner_count() > 0 {
        let mut tokens: Vec<String> = bigraph
            .inner_names()
            .map(|i| match bigraph.link_of(PointId::Inner(i)) {
                Some(link) => link_ids[&link].clone(),
                None => "-".to_owned(),
            })
            .collect();
        tokens.sort();
        out.push('!');
        out.push_str(&tokens.join(","));
        out.push('#');
    }

    // Idle links are invisible in the place section but still part of
    // the interface; list their identifiers last.
    let mut idle: Vec<&String> = bigraph
        .links()
        .filter(|l| bigraph.points_of(*l).is_empty())
        .map(|l| &link_ids[&l])
        .collect();
    if !idle.is_empty() {
        idle.sort();
        out.push('%');
        out.push_str(
            &idle
                .iter()
                .map(|s| s.as_str())
                .collect::<Vec<_>>()
                .join(","),
        );
        out.push('#');
    }

    out
}

/// Encodes every place bottom-up. With `link_ids` present, node tokens
/// carry the relative link identifier of each port in port order.
fn encode_places(
    bigraph: &Bigraph,
    link_ids: Option<&HashMap<LinkId, String>>,
) -> HashMap<PlaceId, String> {
    let mut encodings: HashMap<PlaceId, String> = HashMap::new();
    // Post-order with an explicit stack; hierarchy depth is unbounded.
    let mut stack: Vec<(PlaceId, bool)> = bigraph
        .roots()
        .map(|r| (PlaceId::Root(r), false))
        .collect();
    while let Some((place, expanded)) = stack.pop() {
        if !expanded {
            stack.push((place, true));
            for child in bigraph.children_of(place) {
                stack.push((*child, false));
            }
            continue;
        }
        let mut children: Vec<&String> = bigraph
            .children_of(place)
            .iter()
            .map(|c| &encodings[c])
            .collect();
        children.sort();
        let children = children
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join("|");
        let encoding = match place {
            PlaceId::Root(_) => format!("({})", children),
            PlaceId::Site(s) => format!("${}", s.as_usize()),
            PlaceId::Node(n) => {
                let mut token = bigraph.control_of(n).name().to_owned();
                if let Some(ids) = link_ids {
                    let ports = bigraph.ports_of(n);
                    if !ports.is_empty() {
                        let slots: Vec<&str> = ports
                            .iter()
                            .map(|p| match p {
                                Some(link) => ids[link].as_str(),
                                None => "-",
                            })
                            .collect();
                        token.push('{');
                        token.push_str(&slots.join(","));
                        token.push('}');
                    }
                }
                if children.is_empty() {
                    token
                } else {
                    format!("{}({})", token, children)
                }
            }
        };
        encodings.insert(place, encoding);
    }
    encodings
}

/// A refinement class whose relative order the profiles could not fix:
/// `members` share one profile and occupy ranks `base..base + len`.
struct TieGroup {
    prefix: char,
    base: usize,
    members: Vec<LinkId>,
}

/// Partitions the links of each class by iterated profile refinement
/// and hands out relative identifiers, `e0..` for edges and `y0..` for
/// outer names. Classes the refinement cannot split come back as open
/// tie groups whose members carry no identifier yet; point-free groups
/// (idle links and pure inner-name wirings) are exempt, as their order
/// never reaches the output.
fn assign_link_ids(bigraph: &Bigraph) -> (HashMap<LinkId, String>, Vec<TieGroup>) {
    let (edge_groups, outer_groups) = refine_links(bigraph);
    let mut ids = HashMap::new();
    let mut open = Vec::new();
    for (prefix, groups) in [('e', edge_groups), ('y', outer_groups)] {
        let mut rank = 0;
        for group in groups {
            let len = group.len();
            if len == 1 || is_point_free(bigraph, &group) {
                for (offset, link) in group.into_iter().enumerate() {
                    ids.insert(link, format!("{}{}", prefix, rank + offset));
                }
            } else {
                open.push(TieGroup {
                    prefix,
                    base: rank,
                    members: group,
                });
            }
            rank += len;
        }
    }
    (ids, open)
}

fn is_point_free(bigraph: &Bigraph, group: &[LinkId]) -> bool {
    group.iter().all(|link| {
        bigraph
            .points_of(*link)
            .iter()
            .all(|point| !matches!(point, PointId::Port(..)))
    })
}

/// Splits the links of each class into groups of equal profile,
/// re-deriving the profiles with the current group ranks embedded until
/// no group splits further. Group order is determined by profile
/// content alone, never by arena position.
fn refine_links(bigraph: &Bigraph) -> (Vec<Vec<LinkId>>, Vec<Vec<LinkId>>) {
    let place_pass = encode_places(bigraph, None);
    let all_edges: Vec<LinkId> = bigraph.edges().map(LinkId::Edge).collect();
    let all_outer: Vec<LinkId> = bigraph.outer_names().map(LinkId::Outer).collect();
    let mut edge_groups = split_groups(bigraph, &[all_edges], &place_pass);
    let mut outer_groups = split_groups(bigraph, &[all_outer], &place_pass);
    loop {
        let ids = provisional_ids(&edge_groups, &outer_groups);
        let pass = encode_places(bigraph, Some(&ids));
        let next_edges = split_groups(bigraph, &edge_groups, &pass);
        let next_outer = split_groups(bigraph, &outer_groups, &pass);
        if next_edges.len() == edge_groups.len() && next_outer.len() == outer_groups.len() {
            break;
        }
        edge_groups = next_edges;
        outer_groups = next_outer;
    }
    (edge_groups, outer_groups)
}

fn split_groups(
    bigraph: &Bigraph,
    groups: &[Vec<LinkId>],
    place_pass: &HashMap<PlaceId, String>,
) -> Vec<Vec<LinkId>> {
    let mut result = Vec::new();
    for group in groups {
        let mut by_profile: BTreeMap<String, Vec<LinkId>> = BTreeMap::new();
        for link in group {
            by_profile
                .entry(link_profile(bigraph, *link, place_pass))
                .or_default()
                .push(*link);
        }
        result.extend(by_profile.into_values());
    }
    result
}

/// The sorted `(place-encoding, port-index)` entries of a link's
/// points; inner names contribute an anonymous `~` entry.
fn link_profile(
    bigraph: &Bigraph,
    link: LinkId,
    place_pass: &HashMap<PlaceId, String>,
) -> String {
    let mut entries: Vec<String> = bigraph
        .points_of(link)
        .iter()
        .map(|point| match point {
            PointId::Port(node, port) => {
                format!("{}:{}", place_pass[&PlaceId::Node(*node)], port)
            }
            PointId::Inner(_) => "~".to_owned(),
        })
        .collect();
    entries.sort();
    entries.join(";")
}

/// Shared per-group identifiers used while the partition is still being
/// refined; every member of a group encodes identically.
fn provisional_ids(
    edge_groups: &[Vec<LinkId>],
    outer_groups: &[Vec<LinkId>],
) -> HashMap<LinkId, String> {
    let mut ids = HashMap::new();
    for (rank, group) in edge_groups.iter().enumerate() {
        for link in group {
            ids.insert(*link, format!("e{}", rank));
        }
    }
    for (rank, group) in outer_groups.iter().enumerate() {
        for link in group {
            ids.insert(*link, format!("y{}", rank));
        }
    }
    ids
}

/// Exhausts the orderings of the open tie groups and keeps the least
/// rendered encoding. Surviving groups are symmetric families in
/// practice, so the product of their sizes stays tiny.
fn search_tie_orders(
    bigraph: &Bigraph,
    open: &[TieGroup],
    depth: usize,
    ids: &mut HashMap<LinkId, String>,
    best: &mut Option<String>,
) {
    if depth == open.len() {
        let rendered = render(bigraph, ids);
        if best.as_ref().map_or(true, |b| rendered < *b) {
            *best = Some(rendered);
        }
        return;
    }
    let group = &open[depth];
    for order in permutations(group.members.len()) {
        for (offset, member) in order.into_iter().enumerate() {
            ids.insert(
                group.members[member],
                format!("{}{}", group.prefix, group.base + offset),
            );
        }
        search_tie_orders(bigraph, open, depth + 1, ids, best);
    }
}

fn permutations(n: usize) -> Vec<Vec<usize>> {
    fn extend(
        n: usize,
        current: &mut Vec<usize>,
        used: &mut [bool],
        out: &mut Vec<Vec<usize>>,
    ) {
        if current.len() == n {
            out.push(current.clone());
            return;
        }
        for i in 0..n {
            if used[i] {
                continue;
            }
            used[i] = true;
            current.push(i);
            extend(n, current, used, out);
            current.pop();
            used[i] = false;
        }
    }
    let mut out = Vec::new();
    extend(n, &mut Vec::new(), &mut vec![false; n], &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigraph_core::{BigraphBuilder, Control, LinkId, Signature};

    fn sig() -> Signature {
        Signature::from_controls(vec![
            Control::active("Room", 0),
            Control::active("Computer", 1),
            Control::atomic("Job", 0),
        ])
        .unwrap()
    }

    /// Root -> Room -> { Computer(net), Job } with child insertion order
    /// and link names chosen by the caller.
    fn build(job_first: bool, link_name: &str) -> bigraph_core::Bigraph {
        let mut builder = BigraphBuilder::new(sig());
        let root = builder.add_root();
        let room = builder.add_node("Room", root.into()).unwrap();
        let net = builder.add_outer_name(link_name).unwrap();
        if job_first {
            builder.add_node("Job", room.into()).unwrap();
        }
        let computer = builder.add_node("Computer", room.into()).unwrap();
        builder
            .connect_port(computer, 0, LinkId::Outer(net))
            .unwrap();
        if !job_first {
            builder.add_node("Job", room.into()).unwrap();
        }
        builder.finish().unwrap()
    }

    #[test]
    fn insertion_order_and_link_names_do_not_matter() {
        let a = build(false, "network");
        let b = build(true, "wan");
        assert_eq!(canonical(&a), canonical(&b));
    }

    #[test]
    fn place_structure_differences_are_visible() {
        let a = build(false, "network");
        // Same controls, but the Job nested inside the Computer's Room
        // sibling position changed to under the root.
        let mut builder = BigraphBuilder::new(sig());
        let root = builder.add_root();
        let room = builder.add_node("Room", root.into()).unwrap();
        let net = builder.add_outer_name("network").unwrap();
        let computer = builder.add_node("Computer", room.into()).unwrap();
        builder
            .connect_port(computer, 0, LinkId::Outer(net))
            .unwrap();
        builder.add_node("Job", root.into()).unwrap();
        let b = builder.finish().unwrap();
        assert_ne!(canonical(&a), canonical(&b));
    }

    #[test]
    fn link_topology_differences_are_visible() {
        // Two computers on one shared link vs. two separate links.
        let shared = {
            let mut builder = BigraphBuilder::new(sig());
            let root = builder.add_root();
            let net = builder.add_outer_name("n").unwrap();
            for _ in 0..2 {
                let c = builder.add_node("Computer", root.into()).unwrap();
                builder.connect_port(c, 0, LinkId::Outer(net)).unwrap();
            }
            builder.finish().unwrap()
        };
        let separate = {
            let mut builder = BigraphBuilder::new(sig());
            let root = builder.add_root();
            for i in 0..2 {
                let net = builder.add_outer_name(&format!("n{}", i)).unwrap();
                let c = builder.add_node("Computer", root.into()).unwrap();
                builder.connect_port(c, 0, LinkId::Outer(net)).unwrap();
            }
            builder.finish().unwrap()
        };
        assert_ne!(canonical(&shared), canonical(&separate));
    }

    #[test]
    fn edge_and_outer_name_are_distinguished() {
        let with_outer = {
            let mut builder = BigraphBuilder::new(sig());
            let root = builder.add_root();
            let net = builder.add_outer_name("n").unwrap();
            let c = builder.add_node("Computer", root.into()).unwrap();
            builder.connect_port(c, 0, LinkId::Outer(net)).unwrap();
            builder.finish().unwrap()
        };
        let with_edge = {
            let mut builder = BigraphBuilder::new(sig());
            let root = builder.add_root();
            let e = builder.add_edge("e0").unwrap();
            let c = builder.add_node("Computer", root.into()).unwrap();
            builder.connect_port(c, 0, LinkId::Edge(e)).unwrap();
            builder.finish().unwrap()
        };
        assert_ne!(canonical(&with_outer), canonical(&with_edge));
    }

    /// Hub(2) chain `h1 -a- h2 -b- h3`: both edges span two ports on
    /// identically encoded places, so their first-pass profiles tie and
    /// only refinement can tell them apart.
    #[test]
    fn edge_arena_order_does_not_leak_into_tied_link_profiles() {
        let sig = Signature::from_controls(vec![Control::active("Hub", 2)]).unwrap();
        let build = |swap: bool| {
            let mut builder = BigraphBuilder::new(sig.clone());
            let root = builder.add_root();
            let h1 = builder.add_node("Hub", root.into()).unwrap();
            let h2 = builder.add_node("Hub", root.into()).unwrap();
            let h3 = builder.add_node("Hub", root.into()).unwrap();
            let first = builder.add_edge("first").unwrap();
            let second = builder.add_edge("second").unwrap();
            let (a, b) = if swap { (second, first) } else { (first, second) };
            builder.connect_port(h1, 0, LinkId::Edge(a)).unwrap();
            builder.connect_port(h2, 1, LinkId::Edge(a)).unwrap();
            builder.connect_port(h2, 0, LinkId::Edge(b)).unwrap();
            builder.connect_port(h3, 1, LinkId::Edge(b)).unwrap();
            builder.finish().unwrap()
        };
        assert_eq!(canonical(&build(false)), canonical(&build(true)));
    }

    /// Two disjoint Computer pairs, each closed over its own edge: the
    /// edges stay tied through refinement because the components are
    /// isomorphic, and the tie resolution must still be order-blind.
    #[test]
    fn symmetric_closed_pairs_encode_identically_in_any_order() {
        let build = |swap: bool| {
            let mut builder = BigraphBuilder::new(sig());
            let root = builder.add_root();
            let first = builder.add_edge("first").unwrap();
            let second = builder.add_edge("second").unwrap();
            let (a, b) = if swap { (second, first) } else { (first, second) };
            for edge in [a, b] {
                for _ in 0..2 {
                    let c = builder.add_node("Computer", root.into()).unwrap();
                    builder.connect_port(c, 0, LinkId::Edge(edge)).unwrap();
                }
            }
            builder.finish().unwrap()
        };
        assert_eq!(canonical(&build(false)), canonical(&build(true)));
    }

    #[test]
    fn idle_names_show_up_in_the_suffix() {
        let bare = {
            let mut builder = BigraphBuilder::new(sig());
            builder.add_root();
            builder.finish().unwrap()
        };
        let with_idle = {
            let mut builder = BigraphBuilder::new(sig());
            builder.add_root();
            builder.add_outer_name("idle").unwrap();
            builder.finish().unwrap()
        };
        assert_ne!(canonical(&bare), canonical(&with_idle));
    }
}

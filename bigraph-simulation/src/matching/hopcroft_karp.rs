//! Maximum-cardinality bipartite matching, Hopcroft-Karp style:
//! repeated BFS layering from unmatched left vertices followed by DFS
//! augmenting along shortest paths, O(E * sqrt(V)).
//!
//! Vertices are addressed 0-based through the public API; internally a
//! dummy vertex 0 doubles as the NIL partner.

use std::collections::VecDeque;

/// A candidate edge set between two vertex partitions.
#[derive(Debug, Clone)]
pub struct BipartiteCandidates {
    left_count: usize,
    right_count: usize,
    /// Adjacency per left vertex, right vertices 0-based.
    adj: Vec<Vec<usize>>,
}

impl BipartiteCandidates {
    /// Creates an empty candidate set over the given partition sizes.
    pub fn new(left_count: usize, right_count: usize) -> Self {
        Self {
            left_count,
            right_count,
            adj: vec![Vec::new(); left_count],
        }
    }

    /// Records `(left, right)` as a candidate pair.
    pub fn add_candidate(&mut self, left: usize, right: usize) {
        debug_assert!(left < self.left_count && right < self.right_count);
        self.adj[left].push(right);
    }
}

/// The result of [`maximum_matching`]: for each left vertex the matched
/// right vertex, if any.
#[derive(Debug, Clone)]
pub struct Matching {
    /// `pairs[left] == Some(right)` iff the pair is matched.
    pub pairs: Vec<Option<usize>>,
}

impl Matching {
    /// The cardinality of the matching.
    pub fn size(&self) -> usize {
        self.pairs.iter().filter(|p| p.is_some()).count()
    }
}

const NIL: usize = 0;
const INF: usize = usize::MAX;

struct Solver<'a> {
    graph: &'a BipartiteCandidates,
    /// 1-based: left vertex -> matched right vertex (1-based) or NIL.
    pair_left: Vec<usize>,
    /// 1-based: right vertex -> matched left vertex (1-based) or NIL.
    pair_right: Vec<usize>,
    dist: Vec<usize>,
    dist_nil: usize,
}

impl<'a> Solver<'a> {
    fn new(graph: &'a BipartiteCandidates) -> Self {
        Self {
            graph,
            pair_left: vec![NIL; graph.left_count + 1],
            pair_right: vec![NIL; graph.right_count + 1],
            dist: vec![INF; graph.left_count + 1],
            dist_nil: INF,
        }
    }

    /// Greedy warm start before the first phase.
    fn warm_start(&mut self) {
        for u in 1..=self.graph.left_count {
            for &r in &self.graph.adj[u - 1] {
                let v = r + 1;
                if self.pair_right[v] == NIL {
                    self.pair_left[u] = v;
                    self.pair_right[v] = u;
                    break;
                }
            }
        }
    }

    /// Layers the graph from all free left vertices; returns true if an
    /// augmenting path exists.
    fn bfs(&mut self) -> bool {
        let mut queue = VecDeque::new();
        for u in 1..=self.graph.left_count {
            if self.pair_left[u] == NIL {
                self.dist[u] = 0;
                queue.push_back(u);
            } else {
                self.dist[u] = INF;
            }
        }
        self.dist_nil = INF;
        while let Some(u) = queue.pop_front() {
            if self.dist[u] >= self.dist_nil {
                continue;
            }
            for &r in &self.graph.adj[u - 1] {
                let w = self.pair_right[r + 1];
                if w == NIL {
                    if self.dist_nil == INF {
                        self.dist_nil = self.dist[u] + 1;
                    }
                } else if self.dist[w] == INF {
                    self.dist[w] = self.dist[u] + 1;
                    queue.push_back(w);
                }
            }
        }
        self.dist_nil != INF
    }

    /// Augments along a shortest path from `u`; recursion depth is
    /// bounded by the path length of the current phase.
    fn dfs(&mut self, u: usize) -> bool {
        for i in 0..self.graph.adj[u - 1].len() {
            let v = self.graph.adj[u - 1][i] + 1;
            let w = self.pair_right[v];
            let reachable = if w == NIL {
                self.dist[u] + 1 == self.dist_nil
            } else {
                self.dist[w] == self.dist[u] + 1 && self.dfs(w)
            };
            if reachable {
                self.pair_left[u] = v;
                self.pair_right[v] = u;
                return true;
            }
        }
        self.dist[u] = INF;
        false
    }

    fn run(mut self) -> Matching {
        self.warm_start();
        while self.bfs() {
            for u in 1..=self.graph.left_count {
                if self.pair_left[u] == NIL {
                    self.dfs(u);
                }
            }
        }
        let pairs = self
            .pair_left
            .iter()
            .skip(1)
            .map(|&v| if v == NIL { None } else { Some(v - 1) })
            .collect();
        Matching { pairs }
    }
}

/// Computes a maximum-cardinality matching over the candidate set.
pub fn maximum_matching(graph: &BipartiteCandidates) -> Matching {
    Solver::new(graph).run()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_matching_on_a_cycle() {
        // 0-0, 0-1, 1-1, 1-2, 2-2, 2-0: a 6-cycle, perfect matching.
        let mut graph = BipartiteCandidates::new(3, 3);
        for (l, r) in [(0, 0), (0, 1), (1, 1), (1, 2), (2, 2), (2, 0)] {
            graph.add_candidate(l, r);
        }
        let matching = maximum_matching(&graph);
        assert_eq!(matching.size(), 3);
        let mut rights: Vec<usize> = matching.pairs.iter().map(|p| p.unwrap()).collect();
        rights.sort_unstable();
        assert_eq!(rights, vec![0, 1, 2]);
    }

    #[test]
    fn augmenting_path_improves_greedy_start() {
        // Greedy would match 0-0 and strand 1; HK augments to size 2.
        let mut graph = BipartiteCandidates::new(2, 2);
        graph.add_candidate(0, 0);
        graph.add_candidate(0, 1);
        graph.add_candidate(1, 0);
        let matching = maximum_matching(&graph);
        assert_eq!(matching.size(), 2);
        assert_eq!(matching.pairs[0], Some(1));
        assert_eq!(matching.pairs[1], Some(0));
    }

    #[test]
    fn deficient_side_limits_cardinality() {
        let mut graph = BipartiteCandidates::new(3, 1);
        for l in 0..3 {
            graph.add_candidate(l, 0);
        }
        let matching = maximum_matching(&graph);
        assert_eq!(matching.size(), 1);
    }

    #[test]
    fn empty_candidate_set_matches_nothing() {
        let graph = BipartiteCandidates::new(2, 2);
        let matching = maximum_matching(&graph);
        assert_eq!(matching.size(), 0);
        assert!(matching.pairs.iter().all(|p| p.is_none()));
    }
}

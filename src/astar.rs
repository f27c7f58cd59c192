//! A* search over the navigation graph.
//!
//! The open set is a `BinaryHeap` of scored entries ordered as a min-heap on
//! the f-score, with ties broken by insertion order so repeated searches over
//! the same graph expand nodes in the same sequence. Superseded heap entries
//! are skipped lazily on pop instead of being removed in place.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::geometry::euclidean;
use crate::graph::{NavGraph, NodeId};
use tracing::debug;

/// How a search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchOutcome {
    /// The goal was reached; the result carries the path.
    Found,
    /// The open set drained without reaching the goal.
    Unreachable,
    /// The expansion budget ran out before the search could conclude.
    LimitExceeded,
}

/// Result of a single shortest-path search.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchResult {
    /// Node sequence from start to goal, empty unless the outcome is
    /// [`SearchOutcome::Found`].
    pub path: Vec<NodeId>,
    /// Total edge weight along the path; `0.0` when no path was found.
    pub cost: f64,
    /// Number of nodes popped and expanded.
    pub nodes_expanded: usize,
    /// How the search ended.
    pub outcome: SearchOutcome,
}

impl core::fmt::Display for SearchResult {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.outcome {
            SearchOutcome::Found => write!(
                f,
                "path of {} nodes, cost {:.3} ({} expanded)",
                self.path.len(),
                self.cost,
                self.nodes_expanded
            ),
            SearchOutcome::Unreachable => {
                write!(f, "no path ({} expanded)", self.nodes_expanded)
            }
            SearchOutcome::LimitExceeded => {
                write!(f, "search limit hit after {} expansions", self.nodes_expanded)
            }
        }
    }
}

/// Scored open-set entry. Ordered as a min-heap on `f`, then FIFO on the
/// insertion sequence number.
struct OpenEntry {
    node: NodeId,
    f: f64,
    g: f64,
    seq: u64,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.seq == other.seq
    }
}

impl Eq for OpenEntry {}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Runs A* from `start` to `goal` with no expansion bound.
pub fn shortest_path(graph: &NavGraph, start: NodeId, goal: NodeId) -> SearchResult {
    shortest_path_bounded(graph, start, goal, usize::MAX)
}

/// Runs A* from `start` to `goal`, giving up after `max_expansions` node
/// expansions.
///
/// The heuristic is the straight-line distance between node centers, which
/// never exceeds the Euclidean edge weights, so the first time the goal is
/// popped its g-score is optimal.
pub fn shortest_path_bounded(
    graph: &NavGraph,
    start: NodeId,
    goal: NodeId,
    max_expansions: usize,
) -> SearchResult {
    let n = graph.node_count();
    if start >= n || goal >= n {
        return SearchResult {
            path: Vec::new(),
            cost: 0.0,
            nodes_expanded: 0,
            outcome: SearchOutcome::Unreachable,
        };
    }

    let heuristic = |node: NodeId| -> f64 {
        match (graph.node(node), graph.node(goal)) {
            (Some(a), Some(b)) => euclidean(&a.center, &b.center),
            _ => 0.0,
        }
    };

    let mut g_score = vec![f64::INFINITY; n];
    let mut came_from: Vec<Option<NodeId>> = vec![None; n];
    let mut open = BinaryHeap::new();
    let mut seq = 0u64;
    let mut expanded = 0usize;

    g_score[start] = 0.0;
    open.push(OpenEntry {
        node: start,
        f: heuristic(start),
        g: 0.0,
        seq,
    });

    while let Some(entry) = open.pop() {
        if entry.g > g_score[entry.node] {
            continue;
        }
        // Goal test happens on pop, before the budget check, so a search
        // from a node to itself succeeds even with a zero budget.
        if entry.node == goal {
            let path = reconstruct(&came_from, goal);
            debug!(
                cost = entry.g,
                nodes = path.len(),
                expanded,
                "path found"
            );
            return SearchResult {
                path,
                cost: entry.g,
                nodes_expanded: expanded,
                outcome: SearchOutcome::Found,
            };
        }
        if expanded >= max_expansions {
            debug!(expanded, max_expansions, "expansion budget exhausted");
            return SearchResult {
                path: Vec::new(),
                cost: 0.0,
                nodes_expanded: expanded,
                outcome: SearchOutcome::LimitExceeded,
            };
        }
        expanded += 1;

        for edge in graph.neighbors(entry.node) {
            let tentative = entry.g + edge.weight;
            if tentative < g_score[edge.to] {
                g_score[edge.to] = tentative;
                came_from[edge.to] = Some(entry.node);
                seq += 1;
                open.push(OpenEntry {
                    node: edge.to,
                    f: tentative + heuristic(edge.to),
                    g: tentative,
                    seq,
                });
            }
        }
    }

    debug!(expanded, "open set drained without reaching the goal");
    SearchResult {
        path: Vec::new(),
        cost: 0.0,
        nodes_expanded: expanded,
        outcome: SearchOutcome::Unreachable,
    }
}

fn reconstruct(came_from: &[Option<NodeId>], goal: NodeId) -> Vec<NodeId> {
    let mut path = vec![goal];
    let mut current = goal;
    while let Some(prev) = came_from[current] {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::map::CellId;

    /// Builds a graph from explicit node positions and undirected edges.
    fn build(positions: &[(f64, f64)], edges: &[(NodeId, NodeId)]) -> NavGraph {
        let mut g = NavGraph::default();
        for (i, &(x, y)) in positions.iter().enumerate() {
            g.add_node(CellId::Leaf(i), Point::new(x, y));
        }
        for &(a, b) in edges {
            g.connect(a, b);
        }
        g
    }

    /// Plain Dijkstra used as the correctness oracle.
    fn dijkstra_cost(g: &NavGraph, start: NodeId, goal: NodeId) -> Option<f64> {
        let mut dist = vec![f64::INFINITY; g.node_count()];
        let mut done = vec![false; g.node_count()];
        dist[start] = 0.0;
        loop {
            let next = (0..g.node_count())
                .filter(|&i| !done[i] && dist[i].is_finite())
                .min_by(|&a, &b| dist[a].total_cmp(&dist[b]))?;
            if next == goal {
                return Some(dist[next]);
            }
            done[next] = true;
            for e in g.neighbors(next) {
                if dist[next] + e.weight < dist[e.to] {
                    dist[e.to] = dist[next] + e.weight;
                }
            }
        }
    }

    #[test]
    fn test_start_equals_goal() {
        let g = build(&[(0.0, 0.0), (1.0, 0.0)], &[(0, 1)]);
        let result = shortest_path_bounded(&g, 0, 0, 0);
        assert_eq!(result.outcome, SearchOutcome::Found);
        assert_eq!(result.path, vec![0]);
        assert_eq!(result.cost, 0.0);
        assert_eq!(result.nodes_expanded, 0);
    }

    #[test]
    fn test_shorter_route_wins() {
        // 0 -> 1 -> 3 is a detour; 0 -> 2 -> 3 is direct.
        let g = build(
            &[(0.0, 0.0), (0.0, 5.0), (2.0, 0.0), (4.0, 0.0)],
            &[(0, 1), (1, 3), (0, 2), (2, 3)],
        );
        let result = shortest_path(&g, 0, 3);
        assert_eq!(result.outcome, SearchOutcome::Found);
        assert_eq!(result.path, vec![0, 2, 3]);
        assert!((result.cost - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_matches_dijkstra() {
        // Irregular mesh with several competing routes.
        let g = build(
            &[
                (0.0, 0.0),
                (3.0, 1.0),
                (1.0, 4.0),
                (5.0, 3.0),
                (7.0, 1.0),
                (6.0, 6.0),
                (9.0, 4.0),
            ],
            &[
                (0, 1),
                (0, 2),
                (1, 2),
                (1, 3),
                (1, 4),
                (2, 5),
                (3, 5),
                (3, 6),
                (4, 6),
                (5, 6),
            ],
        );
        for goal in 1..g.node_count() {
            let result = shortest_path(&g, 0, goal);
            let oracle = dijkstra_cost(&g, 0, goal).unwrap();
            assert_eq!(result.outcome, SearchOutcome::Found);
            assert!(
                (result.cost - oracle).abs() < 1e-9,
                "goal {}: a* {} vs dijkstra {}",
                goal,
                result.cost,
                oracle
            );
        }
    }

    #[test]
    fn test_unreachable_component() {
        let g = build(&[(0.0, 0.0), (1.0, 0.0), (10.0, 10.0)], &[(0, 1)]);
        let result = shortest_path(&g, 0, 2);
        assert_eq!(result.outcome, SearchOutcome::Unreachable);
        assert!(result.path.is_empty());
        assert_eq!(result.cost, 0.0);
    }

    #[test]
    fn test_out_of_range_nodes() {
        let g = build(&[(0.0, 0.0)], &[]);
        let result = shortest_path(&g, 0, 7);
        assert_eq!(result.outcome, SearchOutcome::Unreachable);
    }

    #[test]
    fn test_expansion_budget() {
        // A long chain: reaching the far end needs more expansions than the
        // budget allows.
        let positions: Vec<(f64, f64)> = (0..20).map(|i| (i as f64, 0.0)).collect();
        let edges: Vec<(NodeId, NodeId)> = (0..19).map(|i| (i, i + 1)).collect();
        let g = build(&positions, &edges);

        let bounded = shortest_path_bounded(&g, 0, 19, 5);
        assert_eq!(bounded.outcome, SearchOutcome::LimitExceeded);
        assert_eq!(bounded.nodes_expanded, 5);

        let unbounded = shortest_path(&g, 0, 19);
        assert_eq!(unbounded.outcome, SearchOutcome::Found);
        assert!((unbounded.cost - 19.0).abs() < 1e-12);
    }

    #[test]
    fn test_deterministic_tie_break() {
        // A symmetric diamond: both routes cost the same, so the tie-break
        // must pick the same one every run.
        let g = build(
            &[(0.0, 0.0), (1.0, 1.0), (1.0, -1.0), (2.0, 0.0)],
            &[(0, 1), (0, 2), (1, 3), (2, 3)],
        );
        let first = shortest_path(&g, 0, 3);
        for _ in 0..10 {
            let again = shortest_path(&g, 0, 3);
            assert_eq!(again.path, first.path);
            assert_eq!(again.nodes_expanded, first.nodes_expanded);
        }
    }
}

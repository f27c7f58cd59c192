//! Neighbor graph over a spatial decomposition.
//!
//! Nodes are navigable cells addressed by dense indices; edges are symmetric
//! and weighted by the Euclidean distance between cell centers. The graph is
//! immutable once built and holds no references back into the decomposition,
//! so searches can run concurrently over a shared world.

use std::collections::HashMap;

use crate::geometry::{Point, euclidean};
use crate::map::CellId;
use crate::map::grid::{Connectivity, GridMap};
use crate::map::quadtree::QuadTree;
use tracing::debug;

/// Dense index of a graph node.
pub type NodeId = usize;

/// A weighted, directed half of a symmetric adjacency.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    /// Target node.
    pub to: NodeId,
    /// Euclidean center-to-center distance.
    pub weight: f64,
}

/// A graph node: a navigable cell and its waypoint.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    /// The cell this node stands for.
    pub cell: CellId,
    /// Cell center, used both as path waypoint and heuristic anchor.
    pub center: Point,
}

/// Adjacency-list navigation graph.
#[derive(Debug, Clone, Default)]
pub struct NavGraph {
    nodes: Vec<Node>,
    adjacency: Vec<Vec<Edge>>,
    index: HashMap<CellId, NodeId>,
}

impl NavGraph {
    /// Builds the neighbor graph for a uniform grid decomposition.
    ///
    /// Orthogonal neighbors connect when the shared edge is open on both
    /// sides. With eight-way connectivity a diagonal additionally requires
    /// an open flanking cell, so the path never cuts the corner between two
    /// diagonally touching obstacles.
    pub fn from_grid(map: &GridMap, connectivity: Connectivity) -> Self {
        let mut graph = NavGraph::default();

        for y in 0..map.rows() {
            for x in 0..map.cols() {
                let passable = map.cell(x, y).is_some_and(|c| c.is_passable());
                if passable {
                    graph.add_node(CellId::Grid { x, y }, map.cell_center(x, y));
                }
            }
        }

        // Forward directions only; connect() inserts both halves.
        const ORTHO: [(isize, isize); 2] = [(1, 0), (0, 1)];
        const DIAG: [(isize, isize); 2] = [(1, 1), (1, -1)];

        for y in 0..map.rows() {
            for x in 0..map.cols() {
                let Some(from) = graph.node_id(&CellId::Grid { x, y }) else {
                    continue;
                };
                for (dx, dy) in ORTHO {
                    let Some((nx, ny)) = offset(x, dx, map.cols()).zip(offset(y, dy, map.rows()))
                    else {
                        continue;
                    };
                    let Some(to) = graph.node_id(&CellId::Grid { x: nx, y: ny }) else {
                        continue;
                    };
                    if map.edge_open(x, y, dx, dy) && map.edge_open(nx, ny, -dx, -dy) {
                        graph.connect(from, to);
                    }
                }
                if connectivity == Connectivity::Eight {
                    for (dx, dy) in DIAG {
                        let Some((nx, ny)) =
                            offset(x, dx, map.cols()).zip(offset(y, dy, map.rows()))
                        else {
                            continue;
                        };
                        let Some(to) = graph.node_id(&CellId::Grid { x: nx, y: ny }) else {
                            continue;
                        };
                        if !map.corner_open(x, y, dx, dy) || !map.corner_open(nx, ny, -dx, -dy) {
                            continue;
                        }
                        // The move must squeeze past at least one of the two
                        // cells flanking the shared corner.
                        let flank_c = map.corner_open(nx, y, -dx, dy);
                        let flank_d = map.corner_open(x, ny, dx, -dy);
                        if flank_c || flank_d {
                            graph.connect(from, to);
                        }
                    }
                }
            }
        }

        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            ?connectivity,
            "grid graph built"
        );
        graph
    }

    /// Builds the neighbor graph for a quadtree decomposition.
    ///
    /// Leaves of different sizes are adjacent when their boxes touch along
    /// an edge or corner and the straight segment between their centers
    /// stays clear of every obstacle. The segment test is what keeps mixed
    /// leaves usable without letting paths slice through obstacle interiors.
    pub fn from_quadtree(tree: &QuadTree) -> Self {
        let mut graph = NavGraph::default();

        for (i, leaf) in tree.leaves().iter().enumerate() {
            graph.add_node(CellId::Leaf(i), leaf.center());
        }

        let leaves = tree.leaves();
        for i in 0..leaves.len() {
            for j in (i + 1)..leaves.len() {
                if !leaves[i].bounds().touches(leaves[j].bounds()) {
                    continue;
                }
                if tree.segment_clear(&leaves[i].center(), &leaves[j].center()) {
                    graph.connect(i, j);
                }
            }
        }

        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "quadtree graph built"
        );
        graph
    }

    /// Inserts a node and returns its id. The cell is registered under its
    /// node key, so sub-cell lookups resolve to the parent cell's node.
    pub fn add_node(&mut self, cell: CellId, center: Point) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node { cell, center });
        self.adjacency.push(Vec::new());
        self.index.insert(cell.node_key(), id);
        id
    }

    /// Inserts the symmetric edge between two nodes, weighted by the
    /// distance between their centers. Re-connecting an existing pair is a
    /// no-op.
    pub fn connect(&mut self, a: NodeId, b: NodeId) {
        if a == b || self.adjacency[a].iter().any(|e| e.to == b) {
            return;
        }
        let weight = euclidean(&self.nodes[a].center, &self.nodes[b].center);
        self.adjacency[a].push(Edge { to: b, weight });
        self.adjacency[b].push(Edge { to: a, weight });
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum::<usize>() / 2
    }

    /// Node payload by id.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Outgoing edges of a node.
    pub fn neighbors(&self, id: NodeId) -> &[Edge] {
        self.adjacency.get(id).map_or(&[], Vec::as_slice)
    }

    /// Resolves a cell to its node id. Sub-cells collapse to their parent
    /// grid cell.
    pub fn node_id(&self, cell: &CellId) -> Option<NodeId> {
        self.index.get(&cell.node_key()).copied()
    }
}

/// Applies a signed step to an index, rejecting moves off either end.
fn offset(v: usize, d: isize, limit: usize) -> Option<usize> {
    let moved = v.checked_add_signed(d)?;
    (moved < limit).then_some(moved)
}

//! World assembly and the query facade.
//!
//! A [`NavWorld`] binds a decomposition, the neighbor graph derived from it,
//! and the obstacle set into one immutable value. Queries take shared
//! references only, so a built world can serve searches from many threads at
//! once.

use crate::astar::{self, SearchOutcome};
use crate::error::NavError;
use crate::geometry::{Point, Polygon};
use crate::graph::NavGraph;
use crate::map::CellId;
use crate::map::grid::{Connectivity, GridMap};
use crate::map::quadtree::QuadTree;
use tracing::info;

/// Which spatial decomposition to build and how to tune it.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DecompositionConfig {
    /// Uniform grid of `cell_size` squares.
    Grid {
        /// Edge length of each cell.
        cell_size: f64,
        /// Split boundary-straddling cells into 2x2 sub-cells.
        refine: bool,
        /// Four- or eight-way neighbor connectivity.
        connectivity: Connectivity,
    },
    /// Recursive quadtree, subdividing mixed regions up to `max_depth`.
    Quadtree {
        /// Maximum recursion depth.
        max_depth: u32,
    },
}

enum Decomposition {
    Grid(GridMap),
    Quadtree(QuadTree),
}

/// An immutable navigation world: decomposition plus derived graph.
pub struct NavWorld {
    width: f64,
    height: f64,
    decomposition: Decomposition,
    graph: NavGraph,
}

/// A resolved route through the world.
///
/// An empty path means no route exists; a single-cell path means start and
/// goal resolved to the same cell.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    /// Traversed cells, start first.
    pub cells: Vec<CellId>,
    /// Cell-center waypoints matching `cells`.
    pub waypoints: Vec<Point>,
    /// Total Euclidean cost; `0.0` for empty and single-cell paths.
    pub cost: f64,
}

impl Path {
    fn empty() -> Self {
        Path {
            cells: Vec::new(),
            waypoints: Vec::new(),
            cost: 0.0,
        }
    }

    /// Whether no route exists.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of cells on the route.
    pub fn len(&self) -> usize {
        self.cells.len()
    }
}

/// Builds a navigation world from scratch: validates the obstacle set,
/// decomposes the rectangle `[0, width) x [0, height)`, and derives the
/// neighbor graph.
///
/// # Errors
/// * `NavError::InvalidConfiguration` for non-positive dimensions or
///   decomposition parameters.
/// * `NavError::InvalidGeometry` surfaced from obstacle polygons with fewer
///   than three vertices or self-intersecting rings (validated at
///   [`Polygon`] construction, before this call).
pub fn build_world(
    width: f64,
    height: f64,
    config: DecompositionConfig,
    obstacles: Vec<Polygon>,
) -> Result<NavWorld, NavError> {
    let (decomposition, graph) = match config {
        DecompositionConfig::Grid {
            cell_size,
            refine,
            connectivity,
        } => {
            let map = GridMap::build(width, height, cell_size, refine, obstacles)?;
            let graph = NavGraph::from_grid(&map, connectivity);
            (Decomposition::Grid(map), graph)
        }
        DecompositionConfig::Quadtree { max_depth } => {
            let tree = QuadTree::build(width, height, max_depth, obstacles)?;
            let graph = NavGraph::from_quadtree(&tree);
            (Decomposition::Quadtree(tree), graph)
        }
    };

    info!(
        width,
        height,
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "navigation world ready"
    );
    Ok(NavWorld {
        width,
        height,
        decomposition,
        graph,
    })
}

impl NavWorld {
    /// World width.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// World height.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// The derived neighbor graph.
    pub fn graph(&self) -> &NavGraph {
        &self.graph
    }

    /// The grid decomposition, when the world was built with one.
    pub fn grid(&self) -> Option<&GridMap> {
        match &self.decomposition {
            Decomposition::Grid(map) => Some(map),
            Decomposition::Quadtree(_) => None,
        }
    }

    /// The quadtree decomposition, when the world was built with one.
    pub fn quadtree(&self) -> Option<&QuadTree> {
        match &self.decomposition {
            Decomposition::Quadtree(tree) => Some(tree),
            Decomposition::Grid(_) => None,
        }
    }

    /// Resolves a world point to the navigable cell containing it.
    ///
    /// Returns `Ok(None)` for points inside the world that land on blocked
    /// space.
    ///
    /// # Errors
    /// * `NavError::PointOutsideWorld` when the point falls outside
    ///   `[0, width) x [0, height)`.
    pub fn locate(&self, p: &Point) -> Result<Option<CellId>, NavError> {
        if p.x < 0.0 || p.y < 0.0 || p.x >= self.width || p.y >= self.height {
            return Err(NavError::PointOutsideWorld(
                "query point outside the world rectangle",
            ));
        }
        Ok(match &self.decomposition {
            Decomposition::Grid(map) => map.locate(p),
            Decomposition::Quadtree(tree) => tree.locate(p).map(CellId::Leaf),
        })
    }

    /// Finds the shortest route between two world points.
    ///
    /// Either endpoint landing on blocked space, or no route existing
    /// between the two cells, yields an empty path rather than an error.
    ///
    /// # Errors
    /// * `NavError::PointOutsideWorld` when either endpoint falls outside
    ///   the world rectangle.
    pub fn find_path(&self, start: &Point, goal: &Point) -> Result<Path, NavError> {
        self.find_path_bounded(start, goal, usize::MAX)
    }

    /// Like [`NavWorld::find_path`], but gives up after `max_expansions`
    /// search expansions, also yielding an empty path.
    pub fn find_path_bounded(
        &self,
        start: &Point,
        goal: &Point,
        max_expansions: usize,
    ) -> Result<Path, NavError> {
        let (Some(start_cell), Some(goal_cell)) = (self.locate(start)?, self.locate(goal)?)
        else {
            return Ok(Path::empty());
        };
        let (Some(from), Some(to)) = (
            self.graph.node_id(&start_cell),
            self.graph.node_id(&goal_cell),
        ) else {
            return Ok(Path::empty());
        };

        let result = astar::shortest_path_bounded(&self.graph, from, to, max_expansions);
        if result.outcome != SearchOutcome::Found {
            return Ok(Path::empty());
        }

        let mut cells = Vec::with_capacity(result.path.len());
        let mut waypoints = Vec::with_capacity(result.path.len());
        for id in &result.path {
            let Some(node) = self.graph.node(*id) else {
                return Ok(Path::empty());
            };
            cells.push(node.cell);
            waypoints.push(node.center);
        }
        Ok(Path {
            cells,
            waypoints,
            cost: result.cost,
        })
    }
}

/// Convenience wrapper over [`NavWorld::find_path`].
pub fn find_path(world: &NavWorld, start: &Point, goal: &Point) -> Result<Path, NavError> {
    world.find_path(start, goal)
}

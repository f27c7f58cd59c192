//! Obstacle-aware 2D path planning over polygonal worlds.
//!
//! The pipeline has three stages: decompose the world rectangle into
//! navigable cells (uniform grid or quadtree), derive a weighted neighbor
//! graph from the decomposition, and answer point-to-point shortest-path
//! queries with A*.
//!
//! ```
//! use planar_nav::{DecompositionConfig, Connectivity, Point, Polygon, build_world};
//!
//! # fn main() -> Result<(), planar_nav::NavError> {
//! let wall = Polygon::rectangle(Point::new(40.0, 0.0), Point::new(60.0, 90.0))?;
//! let world = build_world(
//!     100.0,
//!     100.0,
//!     DecompositionConfig::Grid {
//!         cell_size: 10.0,
//!         refine: false,
//!         connectivity: Connectivity::Eight,
//!     },
//!     vec![wall],
//! )?;
//! let path = world.find_path(&Point::new(10.0, 10.0), &Point::new(90.0, 10.0))?;
//! assert!(!path.is_empty());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod astar;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod map;
pub mod world;

pub use astar::{SearchOutcome, SearchResult, shortest_path, shortest_path_bounded};
pub use error::NavError;
pub use geometry::{Aabb, Point, Polygon};
pub use graph::{Edge, NavGraph, Node, NodeId};
pub use map::CellId;
pub use map::grid::{Connectivity, GridMap};
pub use map::quadtree::{LeafCell, QuadTree};
pub use world::{DecompositionConfig, NavWorld, Path, build_world, find_path};

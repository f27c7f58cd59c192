//! Recursive quadtree decomposition of the world rectangle.
//!
//! A box stops subdividing as soon as it is fully inside one obstacle
//! (blocked leaf) or intersects none (free leaf). Boxes still ambiguous at
//! the maximum depth become mixed leaves: they stay navigable, trading
//! precision at the resolution limit for a bounded decomposition cost.
//! The tree owns its children exclusively top-down; neighbor relations are
//! established afterwards over a flat, index-addressed leaf arena, so no
//! ownership cycles can arise.

use crate::error::NavError;
use crate::geometry::{Aabb, Point, Polygon};
use tracing::debug;

/// Number of subdivisions of the center-to-center segment sampled when
/// pruning leaf adjacency; the interior points `1..SEGMENT_SAMPLES` are
/// tested for obstacle containment.
pub(crate) const SEGMENT_SAMPLES: usize = 5;

/// Classification of a quadtree node.
#[derive(Debug)]
enum NodeKind {
    /// Leaf fully outside every obstacle.
    Free,
    /// Leaf fully inside a single obstacle; excluded from the navigable set.
    Blocked,
    /// Leaf at maximum depth that still straddles an obstacle boundary;
    /// kept navigable.
    Mixed,
    /// Interior node with four exclusively-owned children.
    Internal(Box<[QuadNode; 4]>),
}

#[derive(Debug)]
struct QuadNode {
    bounds: Aabb,
    depth: u32,
    kind: NodeKind,
}

/// A navigable quadtree leaf.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LeafCell {
    bounds: Aabb,
    depth: u32,
}

impl LeafCell {
    /// Bounding box of the leaf.
    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    /// Recursion depth at which the leaf was produced.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Center of the leaf, used as its navigation waypoint.
    pub fn center(&self) -> Point {
        self.bounds.center()
    }
}

/// Quadtree decomposition of the world.
pub struct QuadTree {
    width: f64,
    height: f64,
    max_depth: u32,
    root: QuadNode,
    leaves: Vec<LeafCell>,
    obstacles: Vec<Polygon>,
}

impl QuadTree {
    /// Builds the tree and collects the navigable leaf set.
    ///
    /// # Errors
    /// * `NavError::InvalidConfiguration` for non-positive dimensions or a
    ///   zero maximum depth.
    pub fn build(
        width: f64,
        height: f64,
        max_depth: u32,
        obstacles: Vec<Polygon>,
    ) -> Result<Self, NavError> {
        if !(width > 0.0) || !(height > 0.0) {
            return Err(NavError::InvalidConfiguration(
                "world dimensions must be positive",
            ));
        }
        if max_depth == 0 {
            return Err(NavError::InvalidConfiguration(
                "maximum recursion depth must be positive",
            ));
        }

        let bounds = Aabb::new(Point::new(0.0, 0.0), Point::new(width, height));
        let root = subdivide(bounds, 0, max_depth, &obstacles);

        let mut leaves = Vec::new();
        collect_navigable(&root, &mut leaves);

        debug!(
            max_depth,
            navigable = leaves.len(),
            obstacles = obstacles.len(),
            "quadtree decomposition complete"
        );
        Ok(QuadTree {
            width,
            height,
            max_depth,
            root,
            leaves,
            obstacles,
        })
    }

    /// The navigable leaf arena; blocked leaves are already discarded.
    pub fn leaves(&self) -> &[LeafCell] {
        &self.leaves
    }

    /// Maximum recursion depth the tree was built with.
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// World width.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// World height.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// The obstacle set the tree was built from.
    pub fn obstacles(&self) -> &[Polygon] {
        &self.obstacles
    }

    /// Bounding box of the whole tree.
    pub fn root_bounds(&self) -> &Aabb {
        self.root.bounds()
    }

    /// Resolves a world point to the index of the navigable leaf containing
    /// it, or `None` when the point lands on blocked space.
    pub fn locate(&self, p: &Point) -> Option<usize> {
        self.leaves.iter().position(|leaf| leaf.bounds.contains(p))
    }

    /// Tests whether the open segment between two waypoints stays clear of
    /// every obstacle, by sampling interior points. Endpoints are cell
    /// centers and are not themselves tested.
    pub(crate) fn segment_clear(&self, a: &Point, b: &Point) -> bool {
        for k in 1..SEGMENT_SAMPLES {
            let t = k as f64 / SEGMENT_SAMPLES as f64;
            let sample = Point::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t);
            if self.obstacles.iter().any(|o| o.contains(&sample)) {
                return false;
            }
        }
        true
    }
}

impl QuadNode {
    fn bounds(&self) -> &Aabb {
        &self.bounds
    }
}

fn subdivide(bounds: Aabb, depth: u32, max_depth: u32, obstacles: &[Polygon]) -> QuadNode {
    if obstacles.iter().any(|o| o.contains_box(&bounds)) {
        return QuadNode {
            bounds,
            depth,
            kind: NodeKind::Blocked,
        };
    }
    if !obstacles.iter().any(|o| o.intersects_box(&bounds)) {
        return QuadNode {
            bounds,
            depth,
            kind: NodeKind::Free,
        };
    }
    if depth == max_depth {
        return QuadNode {
            bounds,
            depth,
            kind: NodeKind::Mixed,
        };
    }

    let children = bounds
        .quadrants()
        .map(|quadrant| subdivide(quadrant, depth + 1, max_depth, obstacles));
    QuadNode {
        bounds,
        depth,
        kind: NodeKind::Internal(Box::new(children)),
    }
}

fn collect_navigable(node: &QuadNode, out: &mut Vec<LeafCell>) {
    match &node.kind {
        NodeKind::Internal(children) => {
            for child in children.iter() {
                collect_navigable(child, out);
            }
        }
        NodeKind::Blocked => {}
        NodeKind::Free | NodeKind::Mixed => out.push(LeafCell {
            bounds: node.bounds,
            depth: node.depth,
        }),
    }
}

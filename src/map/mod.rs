//! Spatial decomposition of a rectangular world into navigable cells.
//!
//! Two interchangeable strategies are provided: a uniform grid with optional
//! 2x2 boundary refinement ([`grid::GridMap`]) and a recursive quadtree
//! ([`quadtree::QuadTree`]).

pub mod grid;
pub mod quadtree;

/// Identity of a navigable cell, tagged by decomposition variant.
///
/// Sub-cells carry their parent grid coordinates plus a quadrant index
/// (`row * 2 + col` within the 2x2 mask) instead of encoding "is this a
/// sub-cell" into the coordinate values themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellId {
    /// A whole cell of the uniform grid.
    Grid {
        /// Column index.
        x: usize,
        /// Row index.
        y: usize,
    },
    /// One quadrant of a boundary-straddling grid cell.
    Sub {
        /// Parent column index.
        x: usize,
        /// Parent row index.
        y: usize,
        /// Mask index of the quadrant (`row * 2 + col`).
        index: u8,
    },
    /// A quadtree leaf, indexed into the navigable leaf arena.
    Leaf(usize),
}

impl CellId {
    /// Collapses a sub-cell to the grid cell that carries its graph node.
    /// Graph nodes exist at whole-cell granularity; the sub-cell identity is
    /// only a finer-grained geometric handle.
    pub fn node_key(self) -> CellId {
        match self {
            CellId::Sub { x, y, .. } => CellId::Grid { x, y },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_key_collapses_sub_cells() {
        let sub = CellId::Sub { x: 3, y: 7, index: 2 };
        assert_eq!(sub.node_key(), CellId::Grid { x: 3, y: 7 });
        assert_eq!(CellId::Leaf(5).node_key(), CellId::Leaf(5));
        assert_eq!(
            CellId::Grid { x: 1, y: 1 }.node_key(),
            CellId::Grid { x: 1, y: 1 }
        );
    }
}

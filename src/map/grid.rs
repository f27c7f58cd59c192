//! Uniform-grid decomposition with optional 2x2 boundary refinement.
//!
//! Obstacles are marked by sampling each polygon's bounding box at cell-size
//! resolution. This is an approximation, not exact rasterization: obstacles
//! smaller than a cell, or thin slivers between sample points, may be missed.
//! That fidelity/performance trade-off is inherited deliberately; shrinking
//! the cell size recovers precision.

use crate::error::NavError;
use crate::geometry::{Point, Polygon};
use crate::map::CellId;
use tracing::debug;

/// Neighbor connectivity for the grid graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Connectivity {
    /// Orthogonal neighbors only.
    Four,
    /// Orthogonal and diagonal neighbors.
    Eight,
}

/// State of a single grid cell.
///
/// A cell that straddles an obstacle boundary may carry a 2x2 occupancy mask;
/// `mask[row * 2 + col]` is `true` where the quadrant center is free. The
/// passable flag of a masked cell is "any quadrant open".
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    passable: bool,
    mask: Option<[bool; 4]>,
}

impl Cell {
    /// Whether the cell participates in the navigable graph.
    pub fn is_passable(&self) -> bool {
        self.passable
    }

    /// The sub-cell occupancy mask, present only for refined boundary cells.
    pub fn mask(&self) -> Option<&[bool; 4]> {
        self.mask.as_ref()
    }
}

/// Uniform grid over the world rectangle.
///
/// Cells are `cell_size` squares indexed `(x, y)` with `x` in `0..cols` and
/// `y` in `0..rows`; the last row/column may overhang the world edge when the
/// dimensions are not multiples of the cell size. Built once, immutable
/// afterwards.
pub struct GridMap {
    width: f64,
    height: f64,
    cell_size: f64,
    cols: usize,
    rows: usize,
    cells: Vec<Cell>,
    obstacles: Vec<Polygon>,
}

impl GridMap {
    /// Builds the grid and marks obstacle cells.
    ///
    /// # Arguments
    /// * `width`, `height` - world dimensions.
    /// * `cell_size` - edge length of each cell.
    /// * `refine` - when set, boundary-straddling cells get a 2x2 sub-cell mask.
    /// * `obstacles` - blocked region of the world; may be empty, may overlap.
    ///
    /// # Errors
    /// * `NavError::InvalidConfiguration` for non-positive dimensions or cell size.
    pub fn build(
        width: f64,
        height: f64,
        cell_size: f64,
        refine: bool,
        obstacles: Vec<Polygon>,
    ) -> Result<Self, NavError> {
        if !(width > 0.0) || !(height > 0.0) {
            return Err(NavError::InvalidConfiguration(
                "world dimensions must be positive",
            ));
        }
        if !(cell_size > 0.0) {
            return Err(NavError::InvalidConfiguration("cell size must be positive"));
        }

        let cols = (width / cell_size).ceil() as usize;
        let rows = (height / cell_size).ceil() as usize;
        let mut map = GridMap {
            width,
            height,
            cell_size,
            cols,
            rows,
            cells: vec![
                Cell {
                    passable: true,
                    mask: None
                };
                cols * rows
            ],
            obstacles,
        };

        map.mark_obstacles();
        if refine {
            map.refine_boundary_cells();
        }

        debug!(
            cols,
            rows,
            obstacles = map.obstacles.len(),
            refined = refine,
            "grid decomposition complete"
        );
        Ok(map)
    }

    /// Marks cells blocked by sampling each obstacle's bounding box at
    /// cell-size steps and testing each sample for containment.
    fn mark_obstacles(&mut self) {
        for poly in &self.obstacles {
            let bb = poly.bounding_box();
            let mut y = bb.min().y;
            while y <= bb.max().y {
                let mut x = bb.min().x;
                while x <= bb.max().x {
                    if x >= 0.0 && y >= 0.0 && poly.contains(&Point::new(x, y)) {
                        let cx = (x / self.cell_size).floor() as usize;
                        let cy = (y / self.cell_size).floor() as usize;
                        if cx < self.cols && cy < self.rows {
                            self.cells[cy * self.cols + cx].passable = false;
                        }
                    }
                    x += self.cell_size;
                }
                y += self.cell_size;
            }
        }
    }

    /// Splits every cell with at least one corner inside an obstacle into a
    /// 2x2 mask, testing each quadrant center independently. A cell blocked
    /// by coarse sampling can regain partial passability here.
    fn refine_boundary_cells(&mut self) {
        let half = self.cell_size / 2.0;
        for cy in 0..self.rows {
            for cx in 0..self.cols {
                let x0 = cx as f64 * self.cell_size;
                let y0 = cy as f64 * self.cell_size;
                let corners = [
                    Point::new(x0, y0),
                    Point::new(x0 + self.cell_size, y0),
                    Point::new(x0 + self.cell_size, y0 + self.cell_size),
                    Point::new(x0, y0 + self.cell_size),
                ];
                let straddles = corners
                    .iter()
                    .any(|c| self.obstacles.iter().any(|o| o.contains(c)));
                if !straddles {
                    continue;
                }

                let mut mask = [false; 4];
                for sy in 0..2 {
                    for sx in 0..2 {
                        let center = Point::new(
                            x0 + (sx as f64 + 0.5) * half,
                            y0 + (sy as f64 + 0.5) * half,
                        );
                        mask[sy * 2 + sx] = !self.obstacles.iter().any(|o| o.contains(&center));
                    }
                }

                let cell = &mut self.cells[cy * self.cols + cx];
                cell.passable = mask.iter().any(|&open| open);
                cell.mask = Some(mask);
            }
        }
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Cell edge length.
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// World width.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// World height.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// The obstacle set the grid was built from.
    pub fn obstacles(&self) -> &[Polygon] {
        &self.obstacles
    }

    /// Cell state at `(x, y)`, or `None` out of bounds.
    pub fn cell(&self, x: usize, y: usize) -> Option<&Cell> {
        (x < self.cols && y < self.rows).then(|| &self.cells[y * self.cols + x])
    }

    /// World coordinates of the center of cell `(x, y)`.
    pub fn cell_center(&self, x: usize, y: usize) -> Point {
        Point::new(
            (x as f64 + 0.5) * self.cell_size,
            (y as f64 + 0.5) * self.cell_size,
        )
    }

    /// Resolves a world point to the navigable cell containing it.
    ///
    /// Returns the `Sub` identity when the enclosing cell carries a mask and
    /// the enclosing quadrant is open, the `Grid` identity for plain passable
    /// cells, and `None` when the point lands on blocked space. Bounds are
    /// the caller's concern; points outside the grid also yield `None`.
    pub fn locate(&self, p: &Point) -> Option<CellId> {
        if p.x < 0.0 || p.y < 0.0 {
            return None;
        }
        let x = (p.x / self.cell_size).floor() as usize;
        let y = (p.y / self.cell_size).floor() as usize;
        let cell = self.cell(x, y)?;

        match cell.mask {
            Some(mask) => {
                let half = self.cell_size / 2.0;
                let sx = if p.x - x as f64 * self.cell_size >= half { 1 } else { 0 };
                let sy = if p.y - y as f64 * self.cell_size >= half { 1 } else { 0 };
                let index = sy * 2 + sx;
                mask[index].then_some(CellId::Sub {
                    x,
                    y,
                    index: index as u8,
                })
            }
            None => cell.passable.then_some(CellId::Grid { x, y }),
        }
    }

    /// Whether the edge of cell `(x, y)` facing the orthogonal direction
    /// `(dx, dy)` is open. For a masked cell the edge is open when at least
    /// one of its two quadrants along that edge is open.
    pub(crate) fn edge_open(&self, x: usize, y: usize, dx: isize, dy: isize) -> bool {
        let Some(cell) = self.cell(x, y) else {
            return false;
        };
        match cell.mask {
            None => cell.passable,
            Some(mask) => {
                let pair = match (dx, dy) {
                    (1, 0) => [1, 3],
                    (-1, 0) => [0, 2],
                    (0, 1) => [2, 3],
                    (0, -1) => [0, 1],
                    _ => return false,
                };
                mask[pair[0]] || mask[pair[1]]
            }
        }
    }

    /// Whether the quadrant of cell `(x, y)` at the corner toward the
    /// diagonal direction `(dx, dy)` is open.
    pub(crate) fn corner_open(&self, x: usize, y: usize, dx: isize, dy: isize) -> bool {
        let Some(cell) = self.cell(x, y) else {
            return false;
        };
        match cell.mask {
            None => cell.passable,
            Some(mask) => {
                let sx = usize::from(dx > 0);
                let sy = usize::from(dy > 0);
                mask[sy * 2 + sx]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Polygon {
        Polygon::rectangle(Point::new(x0, y0), Point::new(x1, y1)).unwrap()
    }

    #[test]
    fn test_build_dimensions() {
        let map = GridMap::build(100.0, 55.0, 10.0, false, vec![]).unwrap();
        assert_eq!(map.cols(), 10);
        assert_eq!(map.rows(), 6, "rows are rounded up for partial coverage");
        assert!(map.cell(9, 5).unwrap().is_passable());
    }

    #[test]
    fn test_invalid_configuration() {
        assert!(matches!(
            GridMap::build(0.0, 100.0, 10.0, false, vec![]),
            Err(NavError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            GridMap::build(100.0, -5.0, 10.0, false, vec![]),
            Err(NavError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            GridMap::build(100.0, 100.0, 0.0, false, vec![]),
            Err(NavError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_empty_obstacle_set_is_valid() {
        let map = GridMap::build(50.0, 50.0, 10.0, false, vec![]).unwrap();
        for y in 0..map.rows() {
            for x in 0..map.cols() {
                assert!(map.cell(x, y).unwrap().is_passable());
            }
        }
    }

    #[test]
    fn test_obstacle_marking_by_sampling() {
        // Samples of the 5..15 square land at (5,5) only; the three other
        // bounding-box samples fall on edges classified outside. Exactly one
        // cell is marked, which is the documented sampling approximation.
        let map = GridMap::build(20.0, 20.0, 10.0, false, vec![rect(5.0, 5.0, 15.0, 15.0)])
            .unwrap();
        assert!(!map.cell(0, 0).unwrap().is_passable());
        assert!(map.cell(1, 0).unwrap().is_passable());
        assert!(map.cell(0, 1).unwrap().is_passable());
        assert!(map.cell(1, 1).unwrap().is_passable());
    }

    #[test]
    fn test_full_cell_coverage_marking() {
        let map = GridMap::build(30.0, 30.0, 10.0, false, vec![rect(10.0, 10.0, 20.0, 20.0)])
            .unwrap();
        assert!(!map.cell(1, 1).unwrap().is_passable());
    }

    #[test]
    fn test_refinement_reopens_straddling_cell() {
        // The square covers only the (1,1) quadrant of cell (0,0); with
        // refinement the cell regains three open quadrants.
        let map =
            GridMap::build(20.0, 20.0, 10.0, true, vec![rect(5.0, 5.0, 15.0, 15.0)]).unwrap();
        let cell = map.cell(0, 0).unwrap();
        assert!(cell.is_passable(), "refined cell is partially open");
        assert_eq!(cell.mask(), Some(&[true, true, true, false]));
    }

    #[test]
    fn test_locate_variants() {
        let map =
            GridMap::build(30.0, 30.0, 10.0, true, vec![rect(5.0, 5.0, 15.0, 15.0)]).unwrap();

        // Plain passable cell, untouched by the obstacle.
        assert_eq!(
            map.locate(&Point::new(25.0, 3.0)),
            Some(CellId::Grid { x: 2, y: 0 })
        );
        // Open quadrant of a refined cell.
        assert_eq!(
            map.locate(&Point::new(2.0, 2.0)),
            Some(CellId::Sub { x: 0, y: 0, index: 0 })
        );
        // Blocked quadrant of a refined cell.
        assert_eq!(map.locate(&Point::new(8.0, 8.0)), None);
        // Outside the grid entirely.
        assert_eq!(map.locate(&Point::new(-1.0, 5.0)), None);
    }

    #[test]
    fn test_edge_and_corner_openness() {
        let map =
            GridMap::build(20.0, 20.0, 10.0, true, vec![rect(5.0, 5.0, 15.0, 15.0)]).unwrap();
        // Cell (0,0) has mask [true, true, true, false]: only the (1,1)
        // quadrant is blocked.
        assert!(map.edge_open(0, 0, 1, 0), "east edge has the open (1,0) quadrant");
        assert!(map.edge_open(0, 0, 0, 1), "north edge has the open (0,1) quadrant");
        assert!(!map.corner_open(0, 0, 1, 1), "blocked quadrant corner");
        assert!(map.corner_open(0, 0, -1, -1));
        // Out-of-bounds coordinates are closed.
        assert!(!map.edge_open(5, 0, 1, 0));
    }
}

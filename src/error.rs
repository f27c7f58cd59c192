//! This module defines the error types used by the `planar-nav` crate.

#![warn(missing_docs)]

/// Error type for world construction and path queries.
///
/// This enum encapsulates all fatal error conditions. An unreachable goal is
/// deliberately *not* represented here: "no path" is a normal outcome in
/// obstacle-dense worlds and is modeled as an empty [`crate::world::Path`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavError {
    /// Error for invalid build parameters.
    /// Returned when world dimensions, the grid cell size, or the quadtree
    /// recursion depth are not positive.
    InvalidConfiguration(&'static str),
    /// Error for malformed obstacle polygons.
    /// Returned when a polygon has fewer than three vertices or a
    /// self-intersecting ring.
    InvalidGeometry(&'static str),
    /// Error for a query point that falls outside the world bounds.
    /// Fatal for that specific query only; the world itself stays valid.
    PointOutsideWorld(&'static str),
}

impl core::fmt::Display for NavError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            NavError::InvalidConfiguration(msg) => write!(f, "Invalid configuration: {}", msg),
            NavError::InvalidGeometry(msg) => write!(f, "Invalid geometry: {}", msg),
            NavError::PointOutsideWorld(msg) => write!(f, "Point outside world: {}", msg),
        }
    }
}

impl core::error::Error for NavError {}

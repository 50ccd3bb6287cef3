//! Spatial partitioning data structures
//!
//! Provides the bounding-area primitive and the quad tree used for
//! broad-phase collision detection and raycast culling in 2D space.

mod bounding_area;
mod quad_tree;

pub use bounding_area::BoundingArea;
pub use quad_tree::{Bounded, QuadTree, QuadTreeConfig, QuadTreeNode, MAX_DEPTH_LIMIT};

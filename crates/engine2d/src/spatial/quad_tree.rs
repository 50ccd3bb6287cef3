//! Quad tree spatial partitioning structure
//!
//! Divides 2D space into hierarchical regions for fast broad-phase queries.
//! Each node subdivides into 4 quadrants once its item count reaches the
//! configured capacity. Items are stored in the smallest node whose bounds
//! fully contain their bounding area; items straddling a quadrant boundary
//! stay in the parent, and items outside the world bounds stay in the root.
//!
//! The physics module discards and rebuilds the whole tree every fixed tick,
//! so there is no removal or incremental update.

use super::bounding_area::BoundingArea;
use crate::foundation::math::Vec2;
use serde::{Deserialize, Serialize};

/// Hard ceiling on subdivision depth regardless of configuration
pub const MAX_DEPTH_LIMIT: u32 = 32;

/// Anything that can be stored in a [`QuadTree`]
pub trait Bounded {
    /// World-space bounding area of the item
    fn bounding_area(&self) -> BoundingArea;
}

impl Bounded for BoundingArea {
    fn bounding_area(&self) -> BoundingArea {
        *self
    }
}

/// Configuration for quad tree behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuadTreeConfig {
    /// Items a leaf holds before it subdivides
    pub max_items_per_node: usize,

    /// Maximum subdivision depth (root is depth 0)
    pub max_depth: u32,

    /// Minimum quadrant size (prevents excessive subdivision)
    pub min_node_size: f32,

    /// Area covered by the root node
    pub world_bounds: BoundingArea,
}

impl Default for QuadTreeConfig {
    fn default() -> Self {
        let half = 1_048_576.0;
        Self {
            max_items_per_node: 8,
            max_depth: 16,
            min_node_size: 1.0,
            world_bounds: BoundingArea::new(Vec2::new(-half, -half), Vec2::new(half, half)),
        }
    }
}

impl QuadTreeConfig {
    /// Return a copy with every out-of-range value clamped to something usable
    #[must_use]
    pub fn validated(mut self) -> Self {
        let defaults = Self::default();

        if self.max_items_per_node == 0 {
            log::warn!("Quad tree node capacity must be at least 1; using 1");
            self.max_items_per_node = 1;
        }
        if self.max_depth > MAX_DEPTH_LIMIT {
            log::warn!("Quad tree depth {} exceeds limit; clamping to {MAX_DEPTH_LIMIT}", self.max_depth);
            self.max_depth = MAX_DEPTH_LIMIT;
        }
        if !self.min_node_size.is_finite() || self.min_node_size < 0.0 {
            log::warn!("Invalid quad tree min node size {}; using {}", self.min_node_size, defaults.min_node_size);
            self.min_node_size = defaults.min_node_size;
        }
        if self.world_bounds.is_empty() {
            log::warn!("Quad tree world bounds are empty; using defaults");
            self.world_bounds = defaults.world_bounds;
        }
        self
    }
}

/// Single node in the quad tree hierarchy
#[derive(Debug, Clone)]
pub struct QuadTreeNode<T> {
    /// World-space bounds of this node
    pub bounds: BoundingArea,

    /// Items stored directly in this node
    pub items: Vec<T>,

    /// Child nodes (4 quadrants), None if this is a leaf
    pub children: Option<Box<[QuadTreeNode<T>; 4]>>,

    /// Depth in the tree (0 = root)
    pub depth: u32,
}

impl<T: Bounded> QuadTreeNode<T> {
    /// Create a new leaf node
    pub fn new(bounds: BoundingArea, depth: u32) -> Self {
        Self {
            bounds,
            items: Vec::new(),
            children: None,
            depth,
        }
    }

    /// Check if this node is a leaf (has no children)
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    fn can_subdivide(&self, config: &QuadTreeConfig) -> bool {
        let extents = self.bounds.extents();
        self.depth < config.max_depth
            && extents.x >= config.min_node_size
            && extents.y >= config.min_node_size
    }

    /// Index of the child quadrant fully containing `area`, if any
    fn fitting_child(children: &[QuadTreeNode<T>; 4], area: &BoundingArea) -> Option<usize> {
        children.iter().position(|child| child.bounds.contains_area(area))
    }

    /// Subdivide this node into 4 children and push down the items that fit
    fn subdivide(&mut self) {
        if self.children.is_some() {
            return;
        }

        let quadrants = self.bounds.quadrants();
        let depth = self.depth + 1;
        let mut children = Box::new(std::array::from_fn(|i| QuadTreeNode::new(quadrants[i], depth)));

        for item in std::mem::take(&mut self.items) {
            match Self::fitting_child(&children, &item.bounding_area()) {
                Some(index) => children[index].items.push(item),
                None => self.items.push(item),
            }
        }

        self.children = Some(children);
    }

    /// Insert an item whose (non-empty) bounding area is `area`
    fn insert(&mut self, item: T, area: &BoundingArea, config: &QuadTreeConfig) {
        if self.is_leaf() {
            if self.items.len() < config.max_items_per_node || !self.can_subdivide(config) {
                self.items.push(item);
                return;
            }
            self.subdivide();
        }

        if let Some(ref mut children) = self.children {
            if let Some(index) = Self::fitting_child(children, area) {
                children[index].insert(item, area, config);
                return;
            }
        }
        self.items.push(item);
    }

    /// Collect every item in this node and in children overlapping `area`
    fn retrieve<'a>(&'a self, area: &BoundingArea, results: &mut Vec<&'a T>) {
        results.extend(self.items.iter());

        if let Some(ref children) = self.children {
            for child in children.iter() {
                if child.bounds.overlaps(area) {
                    child.retrieve(area, results);
                }
            }
        }
    }

    /// Get all leaf nodes (for visualization)
    pub fn get_all_leaves<'a>(&'a self, leaves: &mut Vec<&'a QuadTreeNode<T>>) {
        match self.children {
            None => leaves.push(self),
            Some(ref children) => {
                for child in children.iter() {
                    child.get_all_leaves(leaves);
                }
            }
        }
    }

    fn visit<'a>(&'a self, visitor: &mut impl FnMut(&'a QuadTreeNode<T>)) {
        visitor(self);
        if let Some(ref children) = self.children {
            for child in children.iter() {
                child.visit(visitor);
            }
        }
    }
}

/// Quad tree spatial partitioning structure
#[derive(Debug, Clone)]
pub struct QuadTree<T> {
    /// Root node covering the world bounds
    root: QuadTreeNode<T>,

    /// Configuration
    config: QuadTreeConfig,

    /// Number of stored items
    len: usize,
}

impl<T: Bounded> Default for QuadTree<T> {
    fn default() -> Self {
        Self::new(QuadTreeConfig::default())
    }
}

impl<T: Bounded> QuadTree<T> {
    /// Create a new, empty quad tree
    pub fn new(config: QuadTreeConfig) -> Self {
        let config = config.validated();
        Self {
            root: QuadTreeNode::new(config.world_bounds, 0),
            config,
            len: 0,
        }
    }

    /// Create a tree with default tuning covering `world_bounds`
    pub fn with_bounds(world_bounds: BoundingArea) -> Self {
        Self::new(QuadTreeConfig {
            world_bounds,
            ..QuadTreeConfig::default()
        })
    }

    /// Tree configuration
    pub fn config(&self) -> &QuadTreeConfig {
        &self.config
    }

    /// Area covered by the root node
    pub fn bounds(&self) -> BoundingArea {
        self.root.bounds
    }

    /// Root node (for visualization)
    pub fn root(&self) -> &QuadTreeNode<T> {
        &self.root
    }

    /// Number of stored items
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check whether the tree holds no items
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Discard every node and item, leaving a single empty root
    pub fn clear(&mut self) {
        self.root = QuadTreeNode::new(self.config.world_bounds, 0);
        self.len = 0;
    }

    /// Insert an item into the tree
    ///
    /// Items with an empty bounding area have no collision footprint and are
    /// skipped; returns whether the item was stored.
    pub fn insert(&mut self, item: T) -> bool {
        let area = item.bounding_area();
        if area.is_empty() {
            return false;
        }
        self.root.insert(item, &area, &self.config);
        self.len += 1;
        true
    }

    /// Insert every item, returning how many were stored
    pub fn insert_many<I>(&mut self, items: I) -> usize
    where
        I: IntoIterator<Item = T>,
    {
        items.into_iter().fold(0, |stored, item| stored + usize::from(self.insert(item)))
    }

    /// Query every item whose bounding area could overlap `area`
    ///
    /// The result is a superset of the items that actually overlap: callers
    /// must filter it with an exact test.
    pub fn retrieve_potential_collisions(&self, area: &BoundingArea) -> Vec<&T> {
        let mut results = Vec::new();
        self.retrieve_into(area, &mut results);
        results
    }

    /// Like [`Self::retrieve_potential_collisions`], appending to `results`
    pub fn retrieve_into<'a>(&'a self, area: &BoundingArea, results: &mut Vec<&'a T>) {
        if area.is_empty() {
            return;
        }
        self.root.retrieve(area, results);
    }

    /// Get all leaf nodes (for visualization)
    pub fn get_all_leaves(&self) -> Vec<&QuadTreeNode<T>> {
        let mut leaves = Vec::new();
        self.root.get_all_leaves(&mut leaves);
        leaves
    }

    /// Total number of nodes, root included
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        self.root.visit(&mut |_| count += 1);
        count
    }

    /// Deepest node depth currently in the tree
    pub fn depth(&self) -> u32 {
        let mut depth = 0;
        self.root.visit(&mut |node| depth = depth.max(node.depth));
        depth
    }

    /// Iterate over every stored item in depth-first node order
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        let mut items = Vec::with_capacity(self.len);
        self.root.visit(&mut |node| items.extend(node.items.iter()));
        items.into_iter()
    }
}

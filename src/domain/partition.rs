//! Radial partition: weighted tree to angular/radial wedges.

use std::f64::consts::{FRAC_PI_2, TAU};

use generational_arena::Index;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::domain::arena::{NodeData, WeightedTree};
use crate::domain::entities::Padding;

/// One node's wedge. Angles in radians, clockwise from 12 o'clock.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slice {
    /// Arena index of the node this slice was laid out for
    #[serde(skip)]
    pub node: Index,
    /// Arena index of the parent node, None for the root
    #[serde(skip)]
    pub parent: Option<Index>,
    pub data: NodeData,
    pub depth: usize,
    pub weight: f64,
    /// True if the node has children in the hierarchy (visible or not)
    pub has_children: bool,
    pub x0: f64,
    pub x1: f64,
    pub y0: f64,
    pub y1: f64,
}

impl Slice {
    pub fn span(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn mid_angle(&self) -> f64 {
        self.x0 + (self.x1 - self.x0) / 2.0
    }

    pub fn mid_radius(&self) -> f64 {
        (self.y0 + self.y1) / 2.0
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Arc centroid in chart-local coordinates (y grows downwards).
    pub fn centroid(&self) -> (f64, f64) {
        let r = self.mid_radius();
        let a = (self.x0 + self.x1) / 2.0 - FRAC_PI_2;
        (a.cos() * r, a.sin() * r)
    }
}

/// Outer radius of the chart inside the padded area; never negative.
pub fn outer_radius(width: f64, height: f64, padding: &Padding) -> f64 {
    let usable_width = width - padding.left - padding.right;
    let usable_height = height - padding.top - padding.bottom;
    (usable_width.min(usable_height) / 2.0).max(0.0)
}

/// Partition layout over a full circle with a fixed outer radius.
#[derive(Debug, Clone, Copy)]
pub struct PartitionLayout {
    radius: f64,
}

impl PartitionLayout {
    pub fn new(radius: f64) -> Self {
        Self { radius }
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Number of rings for a tree of the given height.
    pub fn bands(height: usize) -> usize {
        height + 1
    }

    /// Lay out every node, depth-first preorder, root first.
    #[instrument(level = "debug", skip(self, tree), fields(radius = self.radius))]
    pub fn layout(&self, tree: &WeightedTree) -> Vec<Slice> {
        let Some(root) = tree.root() else {
            return Vec::new();
        };
        let band = self.radius / Self::bands(tree.height()) as f64;
        let mut slices = Vec::with_capacity(tree.len());
        let mut stack = vec![(root, 0.0, TAU)];

        while let Some((idx, x0, x1)) = stack.pop() {
            let Some(node) = tree.get_node(idx) else {
                continue;
            };

            slices.push(Slice {
                node: idx,
                parent: node.parent,
                data: node.data.clone(),
                depth: node.depth,
                weight: node.weight,
                has_children: !node.is_leaf(),
                x0,
                x1,
                y0: node.depth as f64 * band,
                y1: (node.depth + 1) as f64 * band,
            });

            // Children share the parent's span in proportion to weight
            let k = if node.weight > 0.0 {
                (x1 - x0) / node.weight
            } else {
                0.0
            };
            let mut cursor = x0;
            let mut extents = Vec::with_capacity(node.children.len());
            for &child in &node.children {
                let weight = tree.get_node(child).map(|c| c.weight).unwrap_or(0.0);
                let start = cursor;
                cursor += weight * k;
                extents.push((child, start, cursor));
            }
            stack.extend(extents.into_iter().rev());
        }

        debug!("partitioned {} slices, band width {}", slices.len(), band);
        slices
    }
}

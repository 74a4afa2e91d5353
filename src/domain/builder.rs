//! Hierarchy builder: caller tree to weighted arena tree.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use generational_arena::Index;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::domain::arena::{NodeData, WeightedNode, WeightedTree};
use crate::domain::entities::{SumBy, TreeNode};
use crate::domain::error::{DomainError, DomainResult};

/// Result type for tree operations.
pub type TreeResult<T> = DomainResult<T>;

/// Default bound on tree depth before the input is rejected as malformed.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Sibling comparator; receives two already weighted children.
pub type Comparator = Arc<dyn Fn(&WeightedNode, &WeightedNode) -> Ordering + Send + Sync>;

/// Ordering of siblings before layout.
#[derive(Clone, Default, Deserialize)]
#[serde(from = "bool")]
pub enum SortOrder {
    /// Keep input order
    #[default]
    Input,
    /// Heaviest first
    Descending,
    Custom(Comparator),
}

impl SortOrder {
    pub fn custom<F>(compare: F) -> Self
    where
        F: Fn(&WeightedNode, &WeightedNode) -> Ordering + Send + Sync + 'static,
    {
        SortOrder::Custom(Arc::new(compare))
    }
}

impl From<bool> for SortOrder {
    fn from(sort: bool) -> Self {
        if sort {
            SortOrder::Descending
        } else {
            SortOrder::Input
        }
    }
}

impl fmt::Debug for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Input => write!(f, "Input"),
            SortOrder::Descending => write!(f, "Descending"),
            SortOrder::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

/// Constructs weighted hierarchies from caller trees.
#[derive(Debug, Clone)]
pub struct HierarchyBuilder {
    sum_by: SumBy,
    sort: SortOrder,
    max_depth: usize,
}

impl Default for HierarchyBuilder {
    fn default() -> Self {
        Self::new(SumBy::Size)
    }
}

impl HierarchyBuilder {
    pub fn new(sum_by: SumBy) -> Self {
        Self {
            sum_by,
            sort: SortOrder::Input,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Build the weighted tree. The input is only read.
    #[instrument(level = "debug", skip(self, root), fields(root = %root.name, sum_by = %self.sum_by))]
    pub fn build(&self, root: &TreeNode) -> TreeResult<WeightedTree> {
        let mut tree = self.insert_all(root)?;
        self.sum(&mut tree);
        self.sort(&mut tree);
        debug!(
            "built hierarchy: {} nodes, height {}, total weight {}",
            tree.len(),
            tree.height(),
            tree.total_weight()
        );
        Ok(tree)
    }

    fn insert_all(&self, root: &TreeNode) -> TreeResult<WeightedTree> {
        let mut tree = WeightedTree::new();
        let mut stack: Vec<(&TreeNode, Option<Index>, usize)> = vec![(root, None, 0)];

        while let Some((node, parent_idx, depth)) = stack.pop() {
            if depth > self.max_depth {
                let path = match parent_idx {
                    Some(idx) => format!("{}/{}", tree.path_of(idx), node.name),
                    None => node.name.clone(),
                };
                return Err(DomainError::DepthLimitExceeded {
                    path,
                    limit: self.max_depth,
                });
            }

            if node.is_leaf() {
                if let Some(size) = node.size {
                    if !size.is_finite() || size < 0.0 {
                        let path = match parent_idx {
                            Some(idx) => format!("{}/{}", tree.path_of(idx), node.name),
                            None => node.name.clone(),
                        };
                        return Err(DomainError::InvalidSize { path, size });
                    }
                }
            }

            let current_idx = tree.insert_node(NodeData::from(node), parent_idx);

            // Reverse push keeps input order when popping
            for child in node.children().iter().rev() {
                stack.push((child, Some(current_idx), depth + 1));
            }
        }

        Ok(tree)
    }

    /// An empty `children` list still marks a branch, which contributes nothing.
    fn leaf_weight(&self, node: &WeightedNode) -> f64 {
        if node.data.empty_children {
            return 0.0;
        }
        match self.sum_by {
            SumBy::Size => node.data.size.unwrap_or(0.0),
            SumBy::Count => 1.0,
        }
    }

    fn sum(&self, tree: &mut WeightedTree) {
        let order: Vec<Index> = tree.iter_postorder().map(|(idx, _)| idx).collect();
        for idx in order {
            let weight = match tree.get_node(idx) {
                Some(node) if node.is_leaf() => self.leaf_weight(node),
                Some(node) => node
                    .children
                    .iter()
                    .filter_map(|&child| tree.get_node(child))
                    .map(|child| child.weight)
                    .sum(),
                None => continue,
            };
            if let Some(node) = tree.get_node_mut(idx) {
                node.weight = weight;
            }
        }
    }

    fn sort(&self, tree: &mut WeightedTree) {
        let compare: Comparator = match &self.sort {
            SortOrder::Input => return,
            SortOrder::Descending => Arc::new(|a: &WeightedNode, b: &WeightedNode| {
                b.weight.partial_cmp(&a.weight).unwrap_or(Ordering::Equal)
            }),
            SortOrder::Custom(compare) => Arc::clone(compare),
        };

        let parents: Vec<Index> = tree
            .iter()
            .filter(|(_, node)| !node.is_leaf())
            .map(|(idx, _)| idx)
            .collect();
        for idx in parents {
            let mut children = match tree.get_node(idx) {
                Some(node) => node.children.clone(),
                None => continue,
            };
            children.sort_by(|&a, &b| match (tree.get_node(a), tree.get_node(b)) {
                (Some(a), Some(b)) => compare(a, b),
                _ => Ordering::Equal,
            });
            if let Some(node) = tree.get_node_mut(idx) {
                node.children = children;
            }
        }
    }
}

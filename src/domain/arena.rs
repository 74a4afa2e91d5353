use std::collections::BTreeMap;
use std::fmt;

use generational_arena::{Arena, Index};
use serde::Serialize;
use termtree::Tree;
use tracing::instrument;

use crate::domain::entities::{format_number, LabelValue, TreeNode};
use crate::domain::style::StyleProps;

/// Data payload for weighted nodes: the caller's node without its children.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeData {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<LabelValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<StyleProps>,
    #[serde(rename = "eventKey", skip_serializing_if = "Option::is_none")]
    pub event_key: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
    /// Input carried a `children` list that turned out empty
    #[serde(skip)]
    pub empty_children: bool,
}

impl From<&TreeNode> for NodeData {
    fn from(node: &TreeNode) -> Self {
        Self {
            name: node.name.clone(),
            size: node.size,
            label: node.label.clone(),
            style: node.style.clone(),
            event_key: node.event_key.clone(),
            extra: node.extra.clone(),
            empty_children: node.children.as_ref().is_some_and(|c| c.is_empty()),
        }
    }
}

impl fmt::Display for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Node in the arena-based weighted hierarchy.
#[derive(Debug)]
pub struct WeightedNode {
    pub data: NodeData,
    /// Aggregate weight, filled in by the hierarchy builder
    pub weight: f64,
    /// Distance from the root (root = 0)
    pub depth: usize,
    /// Index of parent node in the arena, None for the root
    pub parent: Option<Index>,
    /// Indices of child nodes in the arena, in layout order
    pub children: Vec<Index>,
}

impl WeightedNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Arena-based tree holding computed weights.
///
/// Weights live here instead of on the caller's input, so building a layout
/// never touches caller-owned data.
#[derive(Debug)]
pub struct WeightedTree {
    arena: Arena<WeightedNode>,
    root: Option<Index>,
}

impl Default for WeightedTree {
    fn default() -> Self {
        Self::new()
    }
}

impl WeightedTree {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    #[instrument(level = "trace", skip(self, data), fields(name = %data.name))]
    pub fn insert_node(&mut self, data: NodeData, parent: Option<Index>) -> Index {
        let depth = parent
            .and_then(|idx| self.arena.get(idx))
            .map(|p| p.depth + 1)
            .unwrap_or(0);
        let node = WeightedNode {
            data,
            weight: 0.0,
            depth,
            parent,
            children: Vec::new(),
        };
        let node_idx = self.arena.insert(node);

        if let Some(parent_idx) = parent {
            if let Some(parent) = self.arena.get_mut(parent_idx) {
                parent.children.push(node_idx);
            }
        } else {
            self.root = Some(node_idx);
        }

        node_idx
    }

    pub fn get_node(&self, idx: Index) -> Option<&WeightedNode> {
        self.arena.get(idx)
    }

    pub fn get_node_mut(&mut self, idx: Index) -> Option<&mut WeightedNode> {
        self.arena.get_mut(idx)
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Weight of the root, 0 for an empty tree.
    pub fn total_weight(&self) -> f64 {
        self.root
            .and_then(|idx| self.get_node(idx))
            .map(|node| node.weight)
            .unwrap_or(0.0)
    }

    /// Depth-first preorder traversal, children left to right.
    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }

    pub fn iter_postorder(&self) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self)
    }

    /// Largest node depth (root only = 0).
    #[instrument(level = "debug", skip(self))]
    pub fn height(&self) -> usize {
        self.iter().map(|(_, node)| node.depth).max().unwrap_or(0)
    }

    /// Names of all leaf nodes, left to right.
    pub fn leaf_nodes(&self) -> Vec<String> {
        self.iter()
            .filter(|(_, node)| node.is_leaf())
            .map(|(_, node)| node.data.name.clone())
            .collect()
    }

    /// Slash separated names from the root down to `idx`.
    pub fn path_of(&self, idx: Index) -> String {
        let mut names = Vec::new();
        let mut current = Some(idx);
        while let Some(node) = current.and_then(|i| self.get_node(i)) {
            names.push(node.data.name.as_str());
            current = node.parent;
        }
        names.reverse();
        names.join("/")
    }

    /// Render as a `termtree` with weights, for display.
    pub fn to_tree_string(&self) -> Tree<String> {
        fn label(node: &WeightedNode) -> String {
            format!("{} ({})", node.data.name, format_number(node.weight))
        }

        fn build_tree(arena: &WeightedTree, node_idx: Index, parent_tree: &mut Tree<String>) {
            if let Some(node) = arena.get_node(node_idx) {
                for &child_idx in &node.children {
                    if let Some(child) = arena.get_node(child_idx) {
                        let mut child_tree = Tree::new(label(child));
                        build_tree(arena, child_idx, &mut child_tree);
                        parent_tree.push(child_tree);
                    }
                }
            }
        }

        match self.root.and_then(|idx| self.get_node(idx).map(|n| (idx, n))) {
            Some((root_idx, root)) => {
                let mut tree = Tree::new(label(root));
                build_tree(self, root_idx, &mut tree);
                tree
            }
            None => Tree::new("Empty tree".to_string()),
        }
    }
}

pub struct TreeIterator<'a> {
    tree: &'a WeightedTree,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(tree: &'a WeightedTree) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = tree.root() {
            stack.push(root);
        }
        Self { tree, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a WeightedNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}

pub struct PostOrderIterator<'a> {
    tree: &'a WeightedTree,
    stack: Vec<(Index, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(tree: &'a WeightedTree) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = tree.root() {
            stack.push((root, false));
        }
        Self { tree, stack }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (Index, &'a WeightedNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                if !visited {
                    self.stack.push((current_idx, true));
                    for &child in node.children.iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((current_idx, node));
                }
            }
        }
        None
    }
}

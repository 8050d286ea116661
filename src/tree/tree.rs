//! Flattened decision tree.

use crate::core::error::{LoaderError, Result};
use crate::core::types::NodeIndex;
use crate::tree::node::Node;

use serde::Serialize;
use std::fmt;

/// A decision tree stored as an index-addressed node array.
///
/// Position 0 holds the root. Every branch reference of a split is a valid
/// position in the same array, and every node is reachable from the root
/// along exactly one path. Trees are only produced by the builder, so the
/// array is never empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tree {
    nodes: Vec<Node>,
    num_features: usize,
}

impl Tree {
    pub(crate) fn new(nodes: Vec<Node>, num_features: usize) -> Self {
        Tree {
            nodes,
            num_features,
        }
    }

    /// All nodes, root first.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Returns the number of nodes in the tree.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of leaves in the tree.
    pub fn num_leaves(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Number of distinct feature indices used by this tree's splits.
    pub fn num_features(&self) -> usize {
        self.num_features
    }

    /// Gets a node by position.
    pub fn node(&self, index: NodeIndex) -> Option<&Node> {
        self.nodes.get(index)
    }

    /// Gets the root node.
    pub fn root(&self) -> &Node {
        &self.nodes[0]
    }

    /// Number of edges on the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack = vec![(0, 0)];
        while let Some((index, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            if let Some(Node::Split { yes, no, .. }) = self.nodes.get(index) {
                stack.push((*yes, depth + 1));
                stack.push((*no, depth + 1));
            }
        }
        max_depth
    }

    /// Check that branches stay in bounds and every node is reached from the
    /// root exactly once through `yes`/`no`. `missing` must repeat one of them.
    pub fn validate(&self) -> Result<()> {
        let mut visited = vec![false; self.nodes.len()];
        let mut stack = vec![(self.root().id(), 0)];

        while let Some((parent, index)) = stack.pop() {
            if std::mem::replace(&mut visited[index], true) {
                // Reached twice: a cycle or a child shared by two splits
                return Err(LoaderError::InvalidChildReference {
                    node_id: parent,
                    child: self.nodes[index].id(),
                });
            }
            let node = &self.nodes[index];
            if let Node::Split {
                id,
                yes,
                no,
                missing,
                ..
            } = *node
            {
                for child in [yes, no, missing] {
                    if child >= self.nodes.len() || child == index {
                        return Err(LoaderError::InvalidChildReference { node_id: id, child });
                    }
                }
                if yes == no || (missing != yes && missing != no) {
                    return Err(LoaderError::InvalidChildReference {
                        node_id: id,
                        child: missing,
                    });
                }
                stack.push((id, no));
                stack.push((id, yes));
            }
        }

        if let Some(orphan) = visited.iter().position(|&v| !v) {
            return Err(LoaderError::InvalidChildReference {
                node_id: self.root().id(),
                child: self.nodes[orphan].id(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in &self.nodes {
            writeln!(f, "{}", node)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stump() -> Tree {
        Tree::new(
            vec![
                Node::Split {
                    id: 0,
                    feature: 1,
                    threshold: 0.5,
                    yes: 1,
                    no: 2,
                    missing: 1,
                },
                Node::Leaf { id: 1, value: 1.0 },
                Node::Leaf { id: 2, value: -1.0 },
            ],
            1,
        )
    }

    #[test]
    fn test_tree_accessors() {
        let tree = stump();
        assert_eq!(tree.num_nodes(), 3);
        assert_eq!(tree.num_leaves(), 2);
        assert_eq!(tree.num_features(), 1);
        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.root().id(), 0);
        assert_eq!(tree.node(2).and_then(Node::leaf_value), Some(-1.0));
        assert!(tree.node(3).is_none());
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_single_leaf_tree() {
        let tree = Tree::new(vec![Node::Leaf { id: 0, value: 0.1 }], 0);
        assert_eq!(tree.depth(), 0);
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_bounds_branch() {
        let mut nodes = stump().nodes().to_vec();
        nodes[0] = Node::Split {
            id: 0,
            feature: 1,
            threshold: 0.5,
            yes: 1,
            no: 5,
            missing: 1,
        };
        let tree = Tree::new(nodes, 1);
        assert!(matches!(
            tree.validate(),
            Err(LoaderError::InvalidChildReference { child: 5, .. })
        ));
    }

    #[test]
    fn test_validate_rejects_orphan() {
        let mut nodes = stump().nodes().to_vec();
        nodes.push(Node::Leaf { id: 3, value: 0.0 });
        let tree = Tree::new(nodes, 1);
        assert!(matches!(
            tree.validate(),
            Err(LoaderError::InvalidChildReference { child: 3, .. })
        ));
    }

    #[test]
    fn test_validate_rejects_shared_child() {
        let tree = Tree::new(
            vec![
                Node::Split {
                    id: 0,
                    feature: 0,
                    threshold: 0.5,
                    yes: 1,
                    no: 2,
                    missing: 1,
                },
                Node::Split {
                    id: 1,
                    feature: 0,
                    threshold: 0.2,
                    yes: 3,
                    no: 2,
                    missing: 3,
                },
                Node::Leaf { id: 2, value: 0.0 },
                Node::Leaf { id: 3, value: 1.0 },
            ],
            1,
        );
        assert!(matches!(
            tree.validate(),
            Err(LoaderError::InvalidChildReference { child: 2, .. })
        ));
    }

    #[test]
    fn test_validate_rejects_cycle() {
        let tree = Tree::new(
            vec![
                Node::Split {
                    id: 0,
                    feature: 0,
                    threshold: 0.5,
                    yes: 1,
                    no: 2,
                    missing: 1,
                },
                Node::Split {
                    id: 1,
                    feature: 0,
                    threshold: 0.2,
                    yes: 0,
                    no: 2,
                    missing: 0,
                },
                Node::Leaf { id: 2, value: 0.0 },
            ],
            1,
        );
        assert!(matches!(
            tree.validate(),
            Err(LoaderError::InvalidChildReference { .. })
        ));
    }

    #[test]
    fn test_display_lists_nodes() {
        let text = stump().to_string();
        assert_eq!(text.lines().count(), 3);
        assert!(text.starts_with("0:[f1<0.500000]"));
    }
}

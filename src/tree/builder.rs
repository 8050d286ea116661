//! Flattening of decoded trees into index-addressed node arrays.
//!
//! The raw tree is walked with an explicit work list, so input depth never
//! translates into call-stack depth. Where a node lands depends on the
//! [`Placement`]:
//!
//! - `DepthHinted`: the node goes to the slot equal to its identifier in an
//!   array bounded by `2^(depth+1) - 1`. An identifier past that bound fails
//!   with [`LoaderError::DepthCapacityExceeded`].
//! - `SortById`: nodes are appended in work-list order and stably sorted by
//!   identifier at the end.
//!
//! Either way the result is in identifier order. When identifiers are dense
//! each node sits at the position equal to its identifier. Sparse
//! identifiers are compacted and branch references are rewritten from
//! identifiers to positions.

use crate::core::constants::capacity_for_depth;
use crate::core::error::{LoaderError, Result};
use crate::core::traits::FeatureResolver;
use crate::core::types::{FeatureIndex, NodeId, NodeIndex, Placement};
use crate::io::raw::RawNode;
use crate::tree::node::Node;
use crate::tree::tree::Tree;

use std::collections::HashSet;

/// Flatten one decoded tree.
///
/// Each split's feature is resolved from that split's own `split` field.
/// The returned tree records how many distinct feature indices its splits use.
pub fn build_tree(
    root: &RawNode,
    placement: Placement,
    resolver: &dyn FeatureResolver,
) -> Result<Tree> {
    let mut storage = NodeStorage::new(placement, root.node_count());
    let mut features: HashSet<FeatureIndex> = HashSet::new();
    let mut pending: Vec<&RawNode> = vec![root];

    while let Some(raw) = pending.pop() {
        let node = if raw.is_split() {
            check_branches(raw)?;
            let feature = resolver.resolve(&raw.split)?;
            features.insert(feature);
            pending.extend(raw.children());

            Node::Split {
                id: raw.nodeid,
                feature,
                threshold: raw.split_condition,
                yes: raw.yes,
                no: raw.no,
                missing: raw.missing,
            }
        } else {
            Node::Leaf {
                id: raw.nodeid,
                value: raw.leaf,
            }
        };
        storage.place(node)?;
    }

    let nodes = storage.finish()?;
    if nodes[0].id() != root.nodeid {
        return Err(LoaderError::MisplacedRoot {
            node_id: root.nodeid,
        });
    }

    log::trace!(
        "Built tree with {} nodes, {} distinct features ({})",
        nodes.len(),
        features.len(),
        placement
    );

    let tree = Tree::new(nodes, features.len());
    debug_assert!(tree.validate().is_ok());
    Ok(tree)
}

/// `yes` and `no` must name two different children of `raw`, no other
/// child may exist, and `missing` must repeat one of the two.
fn check_branches(raw: &RawNode) -> Result<()> {
    let invalid = |child: NodeId| LoaderError::InvalidChildReference {
        node_id: raw.nodeid,
        child,
    };
    let children = raw.children();
    let is_child = |id: NodeId| children.iter().any(|c| c.nodeid == id);

    for branch in [raw.yes, raw.no] {
        if !is_child(branch) {
            return Err(invalid(branch));
        }
    }
    if raw.yes == raw.no {
        return Err(invalid(raw.no));
    }
    if raw.missing != raw.yes && raw.missing != raw.no {
        return Err(invalid(raw.missing));
    }
    if let Some(extra) = children
        .iter()
        .map(|c| c.nodeid)
        .find(|&id| id != raw.yes && id != raw.no)
    {
        return Err(invalid(extra));
    }
    Ok(())
}

/// Destination array for one tree.
///
/// Depth-hinted slots never outgrow the tree's own node count. An identifier
/// past that count can only come from sparse numbering, so the slots are
/// spilled into an appended list that is sorted at the end.
struct NodeStorage {
    /// Hinted depth and the capacity it implies
    bound: Option<(u32, usize)>,
    layout: Layout,
}

enum Layout {
    Slots {
        limit: usize,
        slots: Vec<Option<Node>>,
    },
    Appended {
        nodes: Vec<Node>,
    },
}

impl NodeStorage {
    fn new(placement: Placement, node_count: usize) -> Self {
        match placement {
            Placement::DepthHinted { depth } => {
                let capacity = capacity_for_depth(depth);
                let limit = capacity.min(node_count);
                NodeStorage {
                    bound: Some((depth, capacity)),
                    layout: Layout::Slots {
                        limit,
                        slots: Vec::with_capacity(limit),
                    },
                }
            }
            Placement::SortById => NodeStorage {
                bound: None,
                layout: Layout::Appended {
                    nodes: Vec::with_capacity(node_count),
                },
            },
        }
    }

    fn place(&mut self, node: Node) -> Result<()> {
        let id = node.id();
        if let Some((depth, capacity)) = self.bound {
            if id >= capacity {
                return Err(LoaderError::DepthCapacityExceeded {
                    depth,
                    node_id: id,
                    capacity,
                });
            }
        }

        match &mut self.layout {
            Layout::Slots { limit, slots } if id < *limit => {
                if id >= slots.len() {
                    slots.resize_with(id + 1, || None);
                }
                if slots[id].is_some() {
                    return Err(LoaderError::DuplicateNodeId { node_id: id });
                }
                slots[id] = Some(node);
            }
            Layout::Slots { limit, slots } => {
                log::trace!(
                    "Node id {} is past the {} nodes of the tree, switching to sorted placement",
                    id,
                    limit
                );
                let mut nodes: Vec<Node> = std::mem::take(slots).into_iter().flatten().collect();
                nodes.push(node);
                self.layout = Layout::Appended { nodes };
            }
            Layout::Appended { nodes } => nodes.push(node),
        }
        Ok(())
    }

    /// Nodes in identifier order with branches addressing positions.
    fn finish(self) -> Result<Vec<Node>> {
        let mut nodes = match self.layout {
            Layout::Slots { slots, .. } => {
                let len = slots.len();
                let nodes: Vec<Node> = slots.into_iter().flatten().collect();
                if nodes.len() == len {
                    return Ok(nodes);
                }
                nodes
            }
            Layout::Appended { mut nodes } => {
                nodes.sort_by_key(Node::id);
                if let Some(pair) = nodes.windows(2).find(|w| w[0].id() == w[1].id()) {
                    return Err(LoaderError::DuplicateNodeId {
                        node_id: pair[0].id(),
                    });
                }
                nodes
            }
        };

        let ids: Vec<NodeId> = nodes.iter().map(Node::id).collect();
        if ids.iter().enumerate().all(|(pos, &id)| pos == id) {
            return Ok(nodes);
        }

        for node in nodes.iter_mut() {
            if let Node::Split {
                id,
                yes,
                no,
                missing,
                ..
            } = node
            {
                for branch in [yes, no, missing] {
                    *branch = position_of(&ids, *id, *branch)?;
                }
            }
        }
        Ok(nodes)
    }
}

fn position_of(ids: &[NodeId], node_id: NodeId, child: NodeId) -> Result<NodeIndex> {
    ids.binary_search(&child)
        .map_err(|_| LoaderError::InvalidChildReference { node_id, child })
}

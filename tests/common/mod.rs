//! Common test utilities for loader integration tests.

#![allow(dead_code)]

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use xgb_ensemble_loader::RawNode;

/// Complete binary tree of `depth` levels of splits with breadth-first ids.
///
/// Split `id` tests feature `f{(id * stride + offset) % modulo}`.
pub fn create_full_tree(depth: u32, stride: usize, offset: usize, modulo: usize) -> RawNode {
    fn build(id: usize, level: u32, depth: u32, f: &dyn Fn(usize) -> usize) -> RawNode {
        if level == depth {
            return RawNode::leaf(id, (id as f64 - 7.5) / 16.0);
        }
        RawNode::split(
            id,
            format!("f{}", f(id)),
            id as f64 * 0.25,
            build(2 * id + 1, level + 1, depth, f),
            build(2 * id + 2, level + 1, depth, f),
        )
    }
    let feature = move |id: usize| (id * stride + offset) % modulo;
    build(0, 0, depth, &feature)
}

/// Tree with dense ids assigned in split order, as XGBoost numbers nodes.
///
/// Each entry of `picks` selects an open leaf shallower than `max_depth` to
/// split; growth stops once no leaf can be split.
pub fn create_grown_tree(max_depth: u32, picks: &[usize]) -> RawNode {
    let mut children: Vec<Option<(usize, usize)>> = vec![None];
    let mut depth = vec![0u32];

    for &pick in picks {
        let open: Vec<usize> = (0..children.len())
            .filter(|&i| children[i].is_none() && depth[i] < max_depth)
            .collect();
        if open.is_empty() {
            break;
        }
        let id = open[pick % open.len()];
        let yes = children.len();
        children.push(None);
        children.push(None);
        depth.push(depth[id] + 1);
        depth.push(depth[id] + 1);
        children[id] = Some((yes, yes + 1));
    }

    fn materialize(id: usize, children: &[Option<(usize, usize)>]) -> RawNode {
        match children[id] {
            Some((yes, no)) => RawNode::split(
                id,
                format!("f{}", id % 4),
                id as f64,
                materialize(yes, children),
                materialize(no, children),
            ),
            None => RawNode::leaf(id, id as f64 / 100.0),
        }
    }
    materialize(0, &children)
}

/// Dump text holding one left-leaning chain of `levels` splits.
///
/// Written as text so arbitrarily deep chains never go through a recursive
/// serializer.
pub fn create_chain_dump(levels: usize) -> String {
    let mut text = String::from("[");
    for level in 0..levels {
        let id = 2 * level;
        text.push_str(&format!(
            r#"{{"nodeid":{},"split":"f{}","split_condition":{},"yes":{},"no":{},"missing":{},"children":[{{"nodeid":{},"leaf":{}}},"#,
            id,
            level % 5,
            level,
            id + 1,
            id + 2,
            id + 1,
            id + 1,
            level
        ));
    }
    text.push_str(&format!(r#"{{"nodeid":{},"leaf":0.0}}"#, 2 * levels));
    text.push_str(&"]}".repeat(levels));
    text.push(']');
    text
}

/// Distinct split feature names in a raw tree.
pub fn distinct_split_names(root: &RawNode) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_split() {
            names.insert(node.split.clone());
        }
        stack.extend(node.children());
    }
    names
}

/// (splits, leaves) in a raw tree.
pub fn count_kinds(root: &RawNode) -> (usize, usize) {
    let mut counts = (0, 0);
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_split() {
            counts.0 += 1;
        } else {
            counts.1 += 1;
        }
        stack.extend(node.children());
    }
    counts
}

/// Write trees as an XGBoost JSON dump.
pub fn create_test_model<P: AsRef<Path>>(dir: P, name: &str, trees: &[RawNode]) -> PathBuf {
    let path = dir.as_ref().join(name);
    let json = serde_json::to_string_pretty(trees).expect("serialize dump");
    fs::write(&path, json).expect("write dump");
    path
}

/// Write raw text, for hand-written dumps and feature maps.
pub fn create_test_file<P: AsRef<Path>>(dir: P, name: &str, contents: &str) -> PathBuf {
    let path = dir.as_ref().join(name);
    fs::write(&path, contents).expect("write test file");
    path
}

/// Path as the `&str` the entry point takes.
pub fn path_str(path: &Path) -> &str {
    path.to_str().expect("utf-8 temp path")
}

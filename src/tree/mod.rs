//! Flattened decision trees and the builder that produces them.

pub mod builder;
pub mod node;
pub mod tree;

pub use builder::build_tree;
pub use node::Node;
pub use tree::Tree;

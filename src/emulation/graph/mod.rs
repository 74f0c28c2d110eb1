//! Execution graphs.
//!
//! [`ContextGraph`] holds one [`NodePile`] per instruction address. Each pile starts
//! with a template [`ContextNode`] and grows by one clone per execution path that
//! reaches the address. [`NodeId`] addresses nodes across piles.

mod contextgraph;
mod dot;
mod node;

pub use contextgraph::ContextGraph;
pub use node::{ContextNode, NodeId, NodePile};

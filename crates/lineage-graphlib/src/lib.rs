//! Graph container used by `lineage-layout`.
//!
//! Nodes and edges are stored in insertion order and addressed either by string id or by
//! their dense index. Every iteration API walks that order, so algorithms built on top of this
//! crate are deterministic for a given input sequence.

pub mod alg;
pub mod graph;

pub use graph::{EdgeKey, EdgeRef, Graph};

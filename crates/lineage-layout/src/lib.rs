#![forbid(unsafe_code)]

//! Deterministic family-tree layout.
//!
//! `build_tree_layout` (or a reusable [`LayoutEngine`]) turns a `TreeData` snapshot into one
//! immutable [`TreeLayout`]: graph building, generation assignment, subtree widths, positions
//! and connection paths run in that order, and any change means a full rebuild.

pub use lineage_graphlib as graphlib;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod builder;
pub mod diagnostics;
pub mod export;
pub mod generation;
pub mod interact;
pub mod model;
pub mod pipeline;

mod forest;
mod position;
mod route;
mod width;

pub use builder::{FamilyGraph, KinEdge, Kinship, build_family_graph};
pub use diagnostics::Diagnostic;
pub use export::{ExportGeometry, ExportPath, NodeBox, export_geometry};
pub use generation::{Generations, Origin, assign_generations};
pub use interact::{DEFAULT_HIT_TOLERANCE, dispatch_pointer};
pub use model::{
    BoundingBox, ConnectionKind, ConnectionLine, Hit, PathDescriptor, PathStyle, Point,
    SpouseInfo, TreeLayout, TreeNode,
};
pub use pipeline::{LayoutEngine, NodeFlags, build_tree_layout};

#![forbid(unsafe_code)]

//! Family-tree data model and view state (headless).
//!
//! Design goals:
//! - plain, serde-friendly input types that mirror what a persistence layer hands over
//! - explicit configuration structs with validation up front
//! - view state as a value driven by a pure reducer

pub mod config;
pub mod error;
pub mod interaction;
pub mod model;
pub mod search;
pub mod view;

pub use config::{
    BuildTreeOptions, Direction, ExportFormat, ExportOptions, LayoutType, LineStyle,
    TreeLayoutConfig, TreeStyleConfig,
};
pub use error::{Error, Result};
pub use interaction::{PointerEvent, PointerKind, TreeInteraction};
pub use model::{Gender, Person, Relationship, RelationshipType, TreeData};
pub use search::{MatchRank, SearchHit, SearchIndex};
pub use view::{Reduced, TreeViewState, ViewAction, ViewStateManager, reduce};

//! Non-fatal findings collected while building the family graph.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(
    tag = "kind",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum Diagnostic {
    /// The relationship names a person that is not part of the input; it was skipped.
    DanglingRelationship {
        relationship_id: String,
        missing_person_ids: Vec<String>,
    },
    /// The parent edge closed an ancestry cycle and was dropped.
    CycleDetected {
        relationship_id: String,
        parent_id: String,
        child_id: String,
    },
}

impl Diagnostic {
    pub fn relationship_id(&self) -> &str {
        match self {
            Diagnostic::DanglingRelationship {
                relationship_id, ..
            }
            | Diagnostic::CycleDetected {
                relationship_id, ..
            } => relationship_id,
        }
    }

    pub fn is_dangling_relationship(&self) -> bool {
        matches!(self, Diagnostic::DanglingRelationship { .. })
    }

    pub fn is_cycle(&self) -> bool {
        matches!(self, Diagnostic::CycleDetected { .. })
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::DanglingRelationship {
                relationship_id,
                missing_person_ids,
            } => write!(
                f,
                "relationship {relationship_id} references unknown person(s): {}",
                missing_person_ids.join(", ")
            ),
            Diagnostic::CycleDetected {
                relationship_id,
                parent_id,
                child_id,
            } => write!(
                f,
                "relationship {relationship_id} ({parent_id} parent of {child_id}) closes an ancestry cycle; edge dropped"
            ),
        }
    }
}

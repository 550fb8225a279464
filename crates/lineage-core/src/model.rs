//! Input records handed over by the persistence layer.
//!
//! These are never mutated by the layout engine; a build takes a `TreeData` snapshot and shares
//! each `Person` with the nodes it produces.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
    #[default]
    Unknown,
}

fn default_living() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: String,
    #[serde(default)]
    pub gender: Gender,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maiden_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub death_date: Option<NaiveDate>,
    #[serde(default = "default_living")]
    pub is_living: bool,
}

impl Person {
    pub fn new(
        id: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            gender: Gender::Unknown,
            first_name: first_name.into(),
            last_name: last_name.into(),
            maiden_name: None,
            nickname: None,
            birth_date: None,
            death_date: None,
            is_living: true,
        }
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = gender;
        self
    }

    /// First and last name joined by a space; empty parts are skipped.
    pub fn display_name(&self) -> String {
        let first = self.first_name.trim();
        let last = self.last_name.trim();
        match (first.is_empty(), last.is_empty()) {
            (false, false) => format!("{first} {last}"),
            (false, true) => first.to_string(),
            (true, false) => last.to_string(),
            (true, true) => String::new(),
        }
    }

    /// Every name a person can be looked up by: the display name, then each name part.
    pub fn search_names(&self) -> Vec<String> {
        let mut out = vec![self.display_name()];
        out.push(self.first_name.trim().to_string());
        out.push(self.last_name.trim().to_string());
        out.extend(self.maiden_name.iter().map(|s| s.trim().to_string()));
        out.extend(self.nickname.iter().map(|s| s.trim().to_string()));
        out.retain(|s| !s.is_empty());
        out.dedup();
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationshipType {
    /// `person1` is a parent of `person2`.
    Parent,
    Spouse,
    Sibling,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub id: String,
    pub person1_id: String,
    pub person2_id: String,
    #[serde(rename = "type")]
    pub kind: RelationshipType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marriage_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub divorce_date: Option<NaiveDate>,
}

impl Relationship {
    pub fn new(
        id: impl Into<String>,
        kind: RelationshipType,
        person1_id: impl Into<String>,
        person2_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            person1_id: person1_id.into(),
            person2_id: person2_id.into(),
            kind,
            marriage_date: None,
            divorce_date: None,
        }
    }

    pub fn parent(
        id: impl Into<String>,
        parent_id: impl Into<String>,
        child_id: impl Into<String>,
    ) -> Self {
        Self::new(id, RelationshipType::Parent, parent_id, child_id)
    }

    pub fn spouse(id: impl Into<String>, a: impl Into<String>, b: impl Into<String>) -> Self {
        Self::new(id, RelationshipType::Spouse, a, b)
    }

    pub fn sibling(id: impl Into<String>, a: impl Into<String>, b: impl Into<String>) -> Self {
        Self::new(id, RelationshipType::Sibling, a, b)
    }

    pub fn with_divorce(mut self, date: NaiveDate) -> Self {
        self.divorce_date = Some(date);
        self
    }

    pub fn is_divorced(&self) -> bool {
        self.divorce_date.is_some()
    }
}

/// An immutable snapshot of one family tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeData {
    #[serde(default)]
    pub persons: Vec<Person>,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_person_id: Option<String>,
}

impl TreeData {
    pub fn person(&self, id: &str) -> Option<&Person> {
        self.persons.iter().find(|p| p.id == id)
    }
}

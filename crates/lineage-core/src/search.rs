//! Case-insensitive person lookup by name.

use crate::model::Person;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchRank {
    Exact,
    Prefix,
    Substring,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub person_id: String,
    pub rank: MatchRank,
}

#[derive(Debug, Clone)]
struct Entry {
    person_id: String,
    names: Vec<String>,
}

/// Lowercased names of the persons in one built graph, in graph order.
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    entries: Vec<Entry>,
}

impl SearchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_persons<'a>(persons: impl IntoIterator<Item = &'a Person>) -> Self {
        let mut index = Self::new();
        for p in persons {
            index.insert(p);
        }
        index
    }

    pub fn insert(&mut self, person: &Person) {
        self.entries.push(Entry {
            person_id: person.id.clone(),
            names: person
                .search_names()
                .into_iter()
                .map(|n| n.to_lowercase())
                .collect(),
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exact matches first, then prefix, then substring; ties keep index order.
    pub fn search(&self, query: &str) -> Vec<SearchHit> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }

        let mut hits: Vec<SearchHit> = self
            .entries
            .iter()
            .filter_map(|e| {
                let rank = e.names.iter().filter_map(|n| rank_name(n, &query)).min()?;
                Some(SearchHit {
                    person_id: e.person_id.clone(),
                    rank,
                })
            })
            .collect();
        hits.sort_by_key(|h| h.rank);
        hits
    }
}

fn rank_name(name: &str, query: &str) -> Option<MatchRank> {
    if name == query {
        Some(MatchRank::Exact)
    } else if name.starts_with(query) {
        Some(MatchRank::Prefix)
    } else if name.contains(query) {
        Some(MatchRank::Substring)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> SearchIndex {
        let persons = [
            Person::new("1", "Annabel", "Lee"),
            Person::new("2", "Joanna", "Anderson"),
            Person::new("3", "Ann", "Smith"),
            Person::new("4", "Bob", "Stone"),
        ];
        SearchIndex::from_persons(persons.iter())
    }

    #[test]
    fn ranks_exact_before_prefix_before_substring() {
        let hits = index().search("ANN");
        let ids: Vec<&str> = hits.iter().map(|h| h.person_id.as_str()).collect();
        assert_eq!(ids, vec!["3", "1", "2"]);
        assert_eq!(hits[0].rank, MatchRank::Exact);
        assert_eq!(hits[1].rank, MatchRank::Prefix);
        assert_eq!(hits[2].rank, MatchRank::Substring);
    }

    #[test]
    fn blank_query_matches_nothing() {
        assert!(index().search("   ").is_empty());
    }

    #[test]
    fn full_display_name_is_an_exact_match() {
        let hits = index().search(" bob stone ");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].rank, MatchRank::Exact);
    }
}

//! Flat person/relationship records to a family graph.
//!
//! Every person becomes a node (first record wins for duplicate ids). Relationships become named
//! edges: `parent` runs parent -> child, `spouse` and `sibling` are stored once per unordered
//! pair. Records naming unknown persons are skipped, and parent edges that close an ancestry
//! cycle are dropped; both produce a [`Diagnostic`] instead of failing the build.

use crate::diagnostics::Diagnostic;
use crate::graphlib::alg::back_edges;
use crate::graphlib::{EdgeKey, EdgeRef, Graph};
use lineage_core::{BuildTreeOptions, Error, Person, Relationship, RelationshipType, Result, TreeData};
use rustc_hash::FxHashSet;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Kinship {
    Parent,
    Spouse,
    Sibling,
}

impl Kinship {
    pub fn edge_name(self) -> &'static str {
        match self {
            Kinship::Parent => "parent",
            Kinship::Spouse => "spouse",
            Kinship::Sibling => "sibling",
        }
    }
}

impl From<RelationshipType> for Kinship {
    fn from(t: RelationshipType) -> Self {
        match t {
            RelationshipType::Parent => Kinship::Parent,
            RelationshipType::Spouse => Kinship::Spouse,
            RelationshipType::Sibling => Kinship::Sibling,
        }
    }
}

#[derive(Debug, Clone)]
pub struct KinEdge {
    pub kind: Kinship,
    pub relationship: Arc<Relationship>,
}

pub type KinGraph = Graph<Arc<Person>, KinEdge>;

/// The validated graph of one build plus the resolved root.
#[derive(Debug, Clone)]
pub struct FamilyGraph {
    graph: KinGraph,
    root: usize,
    diagnostics: Vec<Diagnostic>,
}

impl FamilyGraph {
    pub fn graph(&self) -> &KinGraph {
        &self.graph
    }

    pub fn root(&self) -> usize {
        self.root
    }

    pub fn root_id(&self) -> &str {
        self.graph.node_id(self.root)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn ix(&self, id: &str) -> Option<usize> {
        self.graph.node_ix(id)
    }

    pub fn id(&self, ix: usize) -> &str {
        self.graph.node_id(ix)
    }

    pub fn person(&self, ix: usize) -> &Arc<Person> {
        self.graph.node_label(ix)
    }

    /// Incoming parent edges of `child`, in relationship order.
    pub fn parent_edges(&self, child: usize) -> impl Iterator<Item = EdgeRef<'_, KinEdge>> {
        self.graph
            .in_edges(child)
            .filter(|e| e.label.kind == Kinship::Parent)
    }

    pub fn parents(&self, child: usize) -> Vec<usize> {
        self.parent_edges(child).map(|e| e.v).collect()
    }

    pub fn children(&self, parent: usize) -> Vec<usize> {
        self.graph
            .out_edges(parent)
            .filter(|e| e.label.kind == Kinship::Parent)
            .map(|e| e.w)
            .collect()
    }

    /// Partners of `ix` with the union record, in relationship order.
    pub fn spouses(&self, ix: usize) -> Vec<(usize, &Arc<Relationship>)> {
        self.undirected(ix, Kinship::Spouse)
            .into_iter()
            .map(|(other, e)| (other, &e.label.relationship))
            .collect()
    }

    /// Persons sharing at least one parent with `ix`, then declared siblings. No duplicates.
    pub fn siblings(&self, ix: usize) -> Vec<usize> {
        let mut out: Vec<usize> = Vec::new();
        for p in self.parents(ix) {
            for c in self.children(p) {
                if c != ix && !out.contains(&c) {
                    out.push(c);
                }
            }
        }
        for (other, _) in self.undirected(ix, Kinship::Sibling) {
            if other != ix && !out.contains(&other) {
                out.push(other);
            }
        }
        out
    }

    /// The declared sibling record joining `a` and `b`, if any.
    pub fn sibling_relationship(&self, a: usize, b: usize) -> Option<&Arc<Relationship>> {
        self.undirected(a, Kinship::Sibling)
            .into_iter()
            .find(|(other, _)| *other == b)
            .map(|(_, e)| &e.label.relationship)
    }

    fn undirected(&self, ix: usize, kind: Kinship) -> Vec<(usize, EdgeRef<'_, KinEdge>)> {
        let mut out: Vec<(usize, EdgeRef<'_, KinEdge>)> = self
            .graph
            .out_edges(ix)
            .filter(|e| e.label.kind == kind)
            .map(|e| (e.w, e))
            .chain(
                self.graph
                    .in_edges(ix)
                    .filter(|e| e.label.kind == kind)
                    .map(|e| (e.v, e)),
            )
            .collect();
        out.sort_by_key(|(_, e)| e.ix);
        out
    }
}

/// Resolves the root and builds the graph.
///
/// Root order: `root`, then `options.root_person_id`, then `data.root_person_id`, then the first
/// person. A named root that is not among `data.persons` is fatal.
pub fn build_family_graph(
    data: &TreeData,
    root: Option<&str>,
    options: &BuildTreeOptions,
) -> Result<FamilyGraph> {
    let requested = root
        .or(options.root_person_id.as_deref())
        .or(data.root_person_id.as_deref());
    let root_id = match requested {
        Some(id) => {
            if data.person(id).is_none() {
                return Err(Error::RootNotFound {
                    person_id: id.to_string(),
                });
            }
            id
        }
        None => match data.persons.first() {
            Some(p) => p.id.as_str(),
            None => return Err(Error::EmptyTree),
        },
    };

    let mut graph: KinGraph = Graph::new();
    for p in &data.persons {
        if graph.has_node(&p.id) {
            tracing::debug!(person_id = %p.id, "duplicate person record ignored");
            continue;
        }
        graph.set_node(p.id.clone(), Arc::new(p.clone()));
    }

    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    for rel in &data.relationships {
        let mut missing: Vec<String> = Vec::new();
        for id in [&rel.person1_id, &rel.person2_id] {
            if !graph.has_node(id) && !missing.contains(id) {
                missing.push(id.clone());
            }
        }
        if !missing.is_empty() {
            let d = Diagnostic::DanglingRelationship {
                relationship_id: rel.id.clone(),
                missing_person_ids: missing,
            };
            tracing::warn!("{d}");
            diagnostics.push(d);
            continue;
        }
        insert_relationship(&mut graph, rel);
    }

    let root_ix = graph.node_ix(root_id).ok_or_else(|| Error::RootNotFound {
        person_id: root_id.to_string(),
    })?;

    let dropped = back_edges(&graph, &[root_ix], |e: &KinEdge| e.kind == Kinship::Parent);
    if !dropped.is_empty() {
        for key in &dropped {
            let relationship_id = graph
                .edge(&key.v, &key.w, key.name.as_deref())
                .map(|e| e.relationship.id.clone())
                .unwrap_or_default();
            let d = Diagnostic::CycleDetected {
                relationship_id,
                parent_id: key.v.clone(),
                child_id: key.w.clone(),
            };
            tracing::warn!("{d}");
            diagnostics.push(d);
        }
        let dropped: FxHashSet<EdgeKey> = dropped.into_iter().collect();
        graph.retain_edges(|e| !dropped.contains(e.key));
    }

    tracing::debug!(
        persons = graph.node_count(),
        edges = graph.edge_count(),
        diagnostics = diagnostics.len(),
        root = root_id,
        "family graph built"
    );

    Ok(FamilyGraph {
        graph,
        root: root_ix,
        diagnostics,
    })
}

fn insert_relationship(graph: &mut KinGraph, rel: &Relationship) {
    let kind = Kinship::from(rel.kind);
    let name = kind.edge_name();
    let (a, b) = (rel.person1_id.as_str(), rel.person2_id.as_str());

    let inserted = match kind {
        // Self-parent edges are kept so cycle detection reports them.
        Kinship::Parent => graph.set_edge(a, b, Some(name), edge(kind, rel)),
        Kinship::Spouse | Kinship::Sibling => {
            a != b
                && !graph.has_edge(b, a, Some(name))
                && graph.set_edge(a, b, Some(name), edge(kind, rel))
        }
    };
    if !inserted {
        tracing::debug!(relationship_id = %rel.id, kind = name, "redundant relationship ignored");
    }
}

fn edge(kind: Kinship, rel: &Relationship) -> KinEdge {
    KinEdge {
        kind,
        relationship: Arc::new(rel.clone()),
    }
}

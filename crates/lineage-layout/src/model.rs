use crate::diagnostics::Diagnostic;
use indexmap::IndexMap;
use lineage_core::{Direction, LayoutType, Person, Relationship, SearchIndex};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn from_extents(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Self {
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
            width: max_x - min_x,
            height: max_y - min_y,
        }
    }

    pub fn empty() -> Self {
        Self::from_extents(0.0, 0.0, 0.0, 0.0)
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }
}

/// One union of a person: the partner, the record, and the children of that pairing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpouseInfo {
    pub partner_id: String,
    pub relationship: Arc<Relationship>,
    pub child_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    pub id: String,
    pub person: Arc<Person>,
    /// Center of the node box.
    pub x: f64,
    pub y: f64,
    pub level: i32,
    pub parent_ids: Vec<String>,
    pub child_ids: Vec<String>,
    pub spouses: Vec<SpouseInfo>,
    pub subtree_width: f64,
    pub is_collapsed: bool,
    pub is_highlighted: bool,
    /// `false` while hidden under a collapsed relative.
    pub is_visible: bool,
    /// Owner of the band that reserves this node's width; `None` for partners and forest roots.
    pub layout_parent_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConnectionKind {
    ParentChild,
    Spouse,
    Sibling,
}

impl ConnectionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ConnectionKind::ParentChild => "parent-child",
            ConnectionKind::Spouse => "spouse",
            ConnectionKind::Sibling => "sibling",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PathStyle {
    Straight,
    Curved,
    Stepped,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathDescriptor {
    pub style: PathStyle,
    pub points: Vec<Point>,
    /// SVG path data.
    pub d: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionLine {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ConnectionKind,
    pub from: String,
    pub to: String,
    pub relationship: Option<Arc<Relationship>>,
    pub path: PathDescriptor,
    pub stroke_color: String,
    pub stroke_width: f64,
    pub is_dashed: bool,
    /// Parent-child edge that reserves no width or skips generations.
    pub is_secondary: bool,
}

/// What a layout-space point lands on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Hit {
    Person {
        person_id: String,
    },
    Connection {
        connection_id: String,
        relationship_id: Option<String>,
    },
}

/// One complete, immutable layout. Rebuilt wholesale on any change.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeLayout {
    pub nodes: IndexMap<String, TreeNode>,
    pub connections: Vec<ConnectionLine>,
    pub bounds: BoundingBox,
    pub root_id: String,
    pub layout_type: LayoutType,
    pub direction: Direction,
    pub node_width: f64,
    pub node_height: f64,
    pub diagnostics: Vec<Diagnostic>,
}

impl TreeLayout {
    pub fn node(&self, id: &str) -> Option<&TreeNode> {
        self.nodes.get(id)
    }

    pub fn root(&self) -> Option<&TreeNode> {
        self.nodes.get(&self.root_id)
    }

    pub fn visible_nodes(&self) -> impl Iterator<Item = &TreeNode> {
        self.nodes.values().filter(|n| n.is_visible)
    }

    pub fn connection(&self, id: &str) -> Option<&ConnectionLine> {
        self.connections.iter().find(|c| c.id == id)
    }

    /// Index over the persons of this layout, for the view reducer's search.
    pub fn search_index(&self) -> SearchIndex {
        SearchIndex::from_persons(self.nodes.values().map(|n| n.person.as_ref()))
    }

    /// Resolves a layout-space point. Node boxes win over connections; a connection is hit when
    /// the point lies within `tolerance` of its path.
    pub fn hit_test(&self, x: f64, y: f64, tolerance: f64) -> Option<Hit> {
        let (hw, hh) = (self.node_width / 2.0, self.node_height / 2.0);
        if let Some(n) = self
            .visible_nodes()
            .find(|n| (x - n.x).abs() <= hw && (y - n.y).abs() <= hh)
        {
            return Some(Hit::Person {
                person_id: n.id.clone(),
            });
        }

        let tolerance = tolerance.max(0.0);
        self.connections
            .iter()
            .find(|c| distance_to_path(&c.path, x, y) <= tolerance)
            .map(|c| Hit::Connection {
                connection_id: c.id.clone(),
                relationship_id: c.relationship.as_ref().map(|r| r.id.clone()),
            })
    }
}

fn distance_to_path(path: &PathDescriptor, x: f64, y: f64) -> f64 {
    let polyline: Vec<Point> = match (path.style, path.points.as_slice()) {
        (PathStyle::Curved, [p0, p1, p2, p3]) => (0..=16)
            .map(|i| cubic_point(*p0, *p1, *p2, *p3, f64::from(i) / 16.0))
            .collect(),
        _ => path.points.clone(),
    };
    polyline
        .windows(2)
        .map(|w| distance_to_segment(w[0], w[1], x, y))
        .fold(f64::INFINITY, f64::min)
}

fn cubic_point(p0: Point, p1: Point, p2: Point, p3: Point, t: f64) -> Point {
    let u = 1.0 - t;
    let (a, b, c, d) = (u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t);
    Point {
        x: a * p0.x + b * p1.x + c * p2.x + d * p3.x,
        y: a * p0.y + b * p1.y + c * p2.y + d * p3.y,
    }
}

fn distance_to_segment(a: Point, b: Point, x: f64, y: f64) -> f64 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len2 = dx * dx + dy * dy;
    let t = if len2 > 0.0 {
        (((x - a.x) * dx + (y - a.y) * dy) / len2).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let (px, py) = (a.x + t * dx, a.y + t * dy);
    ((x - px).powi(2) + (y - py).powi(2)).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_distance_clamps_to_endpoints() {
        let a = Point { x: 0.0, y: 0.0 };
        let b = Point { x: 10.0, y: 0.0 };
        assert_eq!(distance_to_segment(a, b, 5.0, 3.0), 3.0);
        assert_eq!(distance_to_segment(a, b, 13.0, 4.0), 5.0);
        assert_eq!(distance_to_segment(a, a, 3.0, 4.0), 5.0);
    }

    #[test]
    fn curved_paths_are_sampled_not_read_as_a_polygon() {
        let p = |x, y| Point { x, y };
        let path = PathDescriptor {
            style: PathStyle::Curved,
            points: vec![p(0.0, 0.0), p(0.0, 50.0), p(100.0, 50.0), p(100.0, 100.0)],
            d: String::new(),
        };
        // midpoint of the curve by symmetry
        assert!(distance_to_path(&path, 50.0, 50.0) < 1e-9);
        // a control point is not on the curve
        assert!(distance_to_path(&path, 0.0, 50.0) > 5.0);
    }
}

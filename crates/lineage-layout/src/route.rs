//! Connection paths.
//!
//! Paths are a pure function of node positions: every coordinate is rounded to 3 decimals and
//! printed with JS number formatting, and the final list is sorted by (type, id), so the same
//! positions always produce the same strings.

use crate::builder::{FamilyGraph, Kinship};
use crate::forest::BandForest;
use crate::generation::Generations;
use crate::model::{ConnectionKind, ConnectionLine, PathDescriptor, PathStyle, Point};
use crate::position::Placement;
use lineage_core::{LineStyle, TreeLayoutConfig, TreeStyleConfig};

pub(crate) struct RouteInput<'a> {
    pub fg: &'a FamilyGraph,
    pub gens: &'a Generations,
    pub forest: &'a BandForest,
    pub placement: &'a Placement,
    pub config: &'a TreeLayoutConfig,
    pub style: &'a TreeStyleConfig,
}

impl RouteInput<'_> {
    fn shown(&self, ix: usize) -> bool {
        self.gens.is_retained(ix) && self.placement.visible[ix]
    }

    fn at(&self, ix: usize) -> Point {
        Point {
            x: self.placement.x[ix],
            y: self.placement.y[ix],
        }
    }

    fn visible_parents(&self, child: usize) -> Vec<usize> {
        self.fg
            .parents(child)
            .into_iter()
            .filter(|&p| self.shown(p))
            .collect()
    }
}

pub(crate) fn route(input: &RouteInput<'_>) -> Vec<ConnectionLine> {
    let mut out: Vec<ConnectionLine> = Vec::new();
    parent_child(input, &mut out);
    spouses(input, &mut out);
    if input.config.show_siblings {
        siblings(input, &mut out);
    }
    out.sort_by(|a, b| a.kind.cmp(&b.kind).then_with(|| a.id.cmp(&b.id)));
    tracing::debug!(connections = out.len(), "connections routed");
    out
}

fn parent_child(input: &RouteInput<'_>, out: &mut Vec<ConnectionLine>) {
    let RouteInput {
        fg,
        gens,
        forest,
        config,
        style,
        ..
    } = input;
    let half_h = config.node_height / 2.0;
    let line_style = path_style(style.line_style);

    for child in gens.retained().filter(|&c| input.shown(c)) {
        // Parents drawn in the same band share one connection from their midpoint.
        let mut groups: Vec<(Option<usize>, Vec<usize>)> = Vec::new();
        for p in input.visible_parents(child) {
            let band = forest.band_of[p];
            match groups.iter_mut().find(|(b, _)| band.is_some() && *b == band) {
                Some((_, members)) => members.push(p),
                None => groups.push((band, vec![p])),
            }
        }

        let child_level = gens.level(child).unwrap_or(0);
        let end = input.at(child);
        let end = Point {
            x: end.x,
            y: end.y - half_h,
        };

        for (_, parents) in groups {
            let Some(&first) = parents.first() else {
                continue;
            };
            let xs = parents.iter().map(|&p| input.at(p).x);
            let min_x = xs.clone().fold(f64::INFINITY, f64::min);
            let max_x = xs.fold(f64::NEG_INFINITY, f64::max);
            let start = Point {
                x: (min_x + max_x) / 2.0,
                y: input.at(first).y + half_h,
            };

            let primary = parents.iter().any(|&p| forest.is_primary_edge(p, child));
            let adjacent = parents
                .iter()
                .all(|&p| gens.level(p).is_some_and(|l| child_level - l == 1));
            let relationship = fg
                .parent_edges(child)
                .find(|e| e.v == first)
                .map(|e| e.label.relationship.clone());

            out.push(ConnectionLine {
                id: format!("parent-child:{}:{}", fg.id(first), fg.id(child)),
                kind: ConnectionKind::ParentChild,
                from: fg.id(first).to_string(),
                to: fg.id(child).to_string(),
                relationship,
                path: path(line_style, start, end),
                stroke_color: style.parent_child_line_color.clone(),
                stroke_width: style.line_width,
                is_dashed: false,
                is_secondary: !(primary && adjacent),
            });
        }
    }
}

fn spouses(input: &RouteInput<'_>, out: &mut Vec<ConnectionLine>) {
    let RouteInput {
        fg, config, style, ..
    } = input;
    let half_w = config.node_width / 2.0;

    for e in fg.graph().edges() {
        if e.label.kind != Kinship::Spouse || !input.shown(e.v) || !input.shown(e.w) {
            continue;
        }
        let (a, b) = (input.at(e.v), input.at(e.w));
        let (left, right) = if a.x <= b.x { (a, b) } else { (b, a) };
        let start = Point {
            x: left.x + half_w,
            y: left.y,
        };
        let end = Point {
            x: right.x - half_w,
            y: right.y,
        };
        let relationship = e.label.relationship.clone();
        out.push(ConnectionLine {
            id: format!("spouse:{}:{}", fg.id(e.v), fg.id(e.w)),
            kind: ConnectionKind::Spouse,
            from: fg.id(e.v).to_string(),
            to: fg.id(e.w).to_string(),
            is_dashed: relationship.is_divorced(),
            relationship: Some(relationship),
            path: path(PathStyle::Straight, start, end),
            stroke_color: style.spouse_line_color.clone(),
            stroke_width: style.line_width,
            is_secondary: false,
        });
    }
}

fn siblings(input: &RouteInput<'_>, out: &mut Vec<ConnectionLine>) {
    let RouteInput {
        fg,
        gens,
        config,
        style,
        ..
    } = input;
    let half_h = config.node_height / 2.0;

    for a in gens.retained().filter(|&ix| input.shown(ix)) {
        let a_parents = input.visible_parents(a);
        for b in fg.siblings(a) {
            if b <= a || !input.shown(b) || gens.level(a) != gens.level(b) {
                continue;
            }
            let b_parents = input.visible_parents(b);
            if !a_parents.is_empty() && same_set(&a_parents, &b_parents) {
                continue;
            }

            let (pa, pb) = (input.at(a), input.at(b));
            let top_a = pa.y - half_h;
            let top_b = pb.y - half_h;
            let bracket = top_a.min(top_b) - config.vertical_spacing / 4.0;
            let points = [
                Point { x: pa.x, y: top_a },
                Point {
                    x: pa.x,
                    y: bracket,
                },
                Point {
                    x: pb.x,
                    y: bracket,
                },
                Point { x: pb.x, y: top_b },
            ];

            out.push(ConnectionLine {
                id: format!("sibling:{}:{}", fg.id(a), fg.id(b)),
                kind: ConnectionKind::Sibling,
                from: fg.id(a).to_string(),
                to: fg.id(b).to_string(),
                relationship: fg.sibling_relationship(a, b).cloned(),
                path: descriptor(PathStyle::Stepped, points.to_vec()),
                stroke_color: style.sibling_line_color.clone(),
                stroke_width: style.line_width * 0.5,
                is_dashed: true,
                is_secondary: false,
            });
        }
    }
}

fn same_set(a: &[usize], b: &[usize]) -> bool {
    a.len() == b.len() && a.iter().all(|x| b.contains(x))
}

fn path_style(style: LineStyle) -> PathStyle {
    match style {
        LineStyle::Straight => PathStyle::Straight,
        LineStyle::Curved => PathStyle::Curved,
        LineStyle::Stepped => PathStyle::Stepped,
    }
}

/// The control points of a `style` path from `start` to `end`.
fn path(style: PathStyle, start: Point, end: Point) -> PathDescriptor {
    let points = match style {
        PathStyle::Straight => vec![start, end],
        PathStyle::Curved | PathStyle::Stepped => {
            let mid = (start.y + end.y) / 2.0;
            vec![
                start,
                Point {
                    x: start.x,
                    y: mid,
                },
                Point { x: end.x, y: mid },
                end,
            ]
        }
    };
    descriptor(style, points)
}

pub(crate) fn descriptor(style: PathStyle, points: Vec<Point>) -> PathDescriptor {
    let points: Vec<Point> = points
        .into_iter()
        .map(|p| Point {
            x: round3(p.x),
            y: round3(p.y),
        })
        .collect();
    let d = path_data(style, &points);
    PathDescriptor { style, points, d }
}

/// `M x,y` followed by `L` segments, or a single `C` for a curved 4-point path.
pub(crate) fn path_data(style: PathStyle, points: &[Point]) -> String {
    let mut buf = ryu_js::Buffer::new();
    let mut out = String::new();
    for (i, p) in points.iter().enumerate() {
        let cmd = match (i, style) {
            (0, _) => "M",
            (1, PathStyle::Curved) if points.len() == 4 => " C",
            (2 | 3, PathStyle::Curved) if points.len() == 4 => " ",
            _ => " L",
        };
        out.push_str(cmd);
        out.push_str(fmt_number(p.x, &mut buf));
        out.push(',');
        out.push_str(fmt_number(p.y, &mut buf));
    }
    out
}

pub(crate) fn round3(v: f64) -> f64 {
    if !v.is_finite() {
        return 0.0;
    }
    let r = (v * 1000.0).round() / 1000.0;
    if r == 0.0 { 0.0 } else { r }
}

fn fmt_number(v: f64, buf: &mut ryu_js::Buffer) -> &str {
    buf.format_finite(round3(v))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point {
        Point { x, y }
    }

    #[test]
    fn path_data_uses_js_number_formatting() {
        let d = path(PathStyle::Straight, p(-0.0, 40.0), p(50.5, 120.0004)).d;
        assert_eq!(d, "M0,40 L50.5,120");
    }

    #[test]
    fn curved_path_is_one_cubic_segment() {
        let d = path(PathStyle::Curved, p(0.0, 40.0), p(-50.0, 120.0)).d;
        assert_eq!(d, "M0,40 C0,80 -50,80 -50,120");
    }

    #[test]
    fn stepped_path_turns_at_the_midline() {
        let d = path(PathStyle::Stepped, p(0.0, 40.0), p(-50.0, 120.0)).d;
        assert_eq!(d, "M0,40 L0,80 L-50,80 L-50,120");
    }

    #[test]
    fn rounding_folds_negative_zero() {
        assert_eq!(round3(-0.0004).to_bits(), 0.0f64.to_bits());
        assert_eq!(round3(1.23456), 1.235);
    }
}

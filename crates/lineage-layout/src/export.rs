//! Pixel-space geometry for an export collaborator.
//!
//! Rasterization is out of scope; this only computes the final image size and maps every node
//! box and connection path into it: `px = (x - minX + padding) * scale`.

use crate::model::{ConnectionKind, PathDescriptor, Point, TreeLayout};
use crate::route::{descriptor, round3};
use lineage_core::{ExportFormat, ExportOptions, Gender, Result, TreeStyleConfig};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeBox {
    pub id: String,
    /// Top-left corner.
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: String,
    pub label: String,
    pub is_highlighted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportPath {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ConnectionKind,
    pub path: PathDescriptor,
    pub stroke_color: String,
    pub stroke_width: f64,
    pub is_dashed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportGeometry {
    pub format: ExportFormat,
    pub quality: f64,
    pub background_color: String,
    pub include_watermark: bool,
    /// Output size in pixels.
    pub width: u32,
    pub height: u32,
    pub scale: f64,
    /// Added to layout coordinates before scaling.
    pub translate_x: f64,
    pub translate_y: f64,
    pub font_family: String,
    pub font_size: f64,
    pub nodes: Vec<NodeBox>,
    pub connections: Vec<ExportPath>,
}

pub fn export_geometry(
    layout: &TreeLayout,
    style: &TreeStyleConfig,
    options: &ExportOptions,
) -> Result<ExportGeometry> {
    options.validate()?;

    let b = &layout.bounds;
    let scale = options.scale;
    let translate_x = options.padding - b.min_x;
    let translate_y = options.padding - b.min_y;
    let to_px = |p: Point| Point {
        x: (p.x + translate_x) * scale,
        y: (p.y + translate_y) * scale,
    };

    let nodes = layout
        .visible_nodes()
        .map(|n| {
            let corner = to_px(Point {
                x: n.x - layout.node_width / 2.0,
                y: n.y - layout.node_height / 2.0,
            });
            NodeBox {
                id: n.id.clone(),
                x: round3(corner.x),
                y: round3(corner.y),
                width: round3(layout.node_width * scale),
                height: round3(layout.node_height * scale),
                fill: match n.person.gender {
                    Gender::Male => style.male_color.clone(),
                    Gender::Female => style.female_color.clone(),
                    Gender::Other | Gender::Unknown => style.other_color.clone(),
                },
                label: n.person.display_name(),
                is_highlighted: n.is_highlighted,
            }
        })
        .collect();

    let connections = layout
        .connections
        .iter()
        .map(|c| ExportPath {
            id: c.id.clone(),
            kind: c.kind,
            path: descriptor(
                c.path.style,
                c.path.points.iter().copied().map(to_px).collect(),
            ),
            stroke_color: c.stroke_color.clone(),
            stroke_width: c.stroke_width * scale,
            is_dashed: c.is_dashed,
        })
        .collect();

    let width = pixels((b.width + 2.0 * options.padding) * scale);
    let height = pixels((b.height + 2.0 * options.padding) * scale);
    tracing::debug!(width, height, format = ?options.format, "export geometry computed");

    Ok(ExportGeometry {
        format: options.format,
        quality: options.quality,
        background_color: options.background_color.clone(),
        include_watermark: options.include_watermark,
        width,
        height,
        scale,
        translate_x,
        translate_y,
        font_family: style.font_family.clone(),
        font_size: style.font_size * scale,
        nodes,
        connections,
    })
}

fn pixels(v: f64) -> u32 {
    if v.is_finite() && v > 0.0 {
        v.ceil().min(f64::from(u32::MAX)) as u32
    } else {
        0
    }
}

//! Layout, style, build and export options.
//!
//! All structs are plain values with `Default` impls and camelCase serde names, so a
//! configuration collaborator can hand them over as JSON/YAML. Call `validate()` before use;
//! the layout engine does so before touching any data.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutType {
    #[default]
    Descendants,
    Ancestors,
    Hourglass,
    Full,
}

impl LayoutType {
    pub const ALL: [LayoutType; 4] = [
        LayoutType::Descendants,
        LayoutType::Ancestors,
        LayoutType::Hourglass,
        LayoutType::Full,
    ];

    /// The next layout in `ALL`, wrapping around.
    pub fn next(self) -> Self {
        match self {
            LayoutType::Descendants => LayoutType::Ancestors,
            LayoutType::Ancestors => LayoutType::Hourglass,
            LayoutType::Hourglass => LayoutType::Full,
            LayoutType::Full => LayoutType::Descendants,
        }
    }

    pub fn shows_ancestors(self) -> bool {
        !matches!(self, LayoutType::Descendants)
    }

    pub fn shows_descendants(self) -> bool {
        !matches!(self, LayoutType::Ancestors)
    }
}

impl std::str::FromStr for LayoutType {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "descendants" => Ok(Self::Descendants),
            "ancestors" => Ok(Self::Ancestors),
            "hourglass" => Ok(Self::Hourglass),
            "full" => Ok(Self::Full),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Ltr,
    Rtl,
}

impl Direction {
    pub fn toggled(self) -> Self {
        match self {
            Direction::Ltr => Direction::Rtl,
            Direction::Rtl => Direction::Ltr,
        }
    }
}

impl std::str::FromStr for Direction {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ltr" => Ok(Self::Ltr),
            "rtl" => Ok(Self::Rtl),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    Straight,
    #[default]
    Curved,
    Stepped,
}

impl std::str::FromStr for LineStyle {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "straight" => Ok(Self::Straight),
            "curved" => Ok(Self::Curved),
            "stepped" => Ok(Self::Stepped),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TreeLayoutConfig {
    pub layout_type: LayoutType,
    pub direction: Direction,
    pub node_width: f64,
    pub node_height: f64,
    pub horizontal_spacing: f64,
    pub vertical_spacing: f64,
    pub spouse_spacing: f64,
    pub max_generations: Option<u32>,
    /// Person translated to x = 0 instead of the root, when present in the layout.
    pub center_on_person: Option<String>,
    /// Emit `sibling` connectors.
    pub show_siblings: bool,
}

impl Default for TreeLayoutConfig {
    fn default() -> Self {
        Self {
            layout_type: LayoutType::Descendants,
            direction: Direction::Ltr,
            node_width: 160.0,
            node_height: 80.0,
            horizontal_spacing: 40.0,
            vertical_spacing: 80.0,
            spouse_spacing: 20.0,
            max_generations: None,
            center_on_person: None,
            show_siblings: false,
        }
    }
}

impl TreeLayoutConfig {
    pub fn validate(&self) -> Result<()> {
        positive("nodeWidth", self.node_width)?;
        positive("nodeHeight", self.node_height)?;
        non_negative("horizontalSpacing", self.horizontal_spacing)?;
        non_negative("verticalSpacing", self.vertical_spacing)?;
        non_negative("spouseSpacing", self.spouse_spacing)?;
        if self.max_generations == Some(0) {
            return Err(Error::config(
                "maxGenerations",
                "must be at least 1 when set",
            ));
        }
        Ok(())
    }

    /// Distance between two consecutive generation rows.
    pub fn row_height(&self) -> f64 {
        self.node_height + self.vertical_spacing
    }
}

fn positive(field: &'static str, v: f64) -> Result<()> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(Error::config(field, format!("must be a positive number, got {v}")))
    }
}

fn non_negative(field: &'static str, v: f64) -> Result<()> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(Error::config(
            field,
            format!("must be a non-negative number, got {v}"),
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TreeStyleConfig {
    pub male_color: String,
    pub female_color: String,
    pub other_color: String,
    pub parent_child_line_color: String,
    pub spouse_line_color: String,
    pub sibling_line_color: String,
    pub line_width: f64,
    pub font_family: String,
    pub font_size: f64,
    pub line_style: LineStyle,
}

impl Default for TreeStyleConfig {
    fn default() -> Self {
        Self {
            male_color: "#dbeafe".to_string(),
            female_color: "#fce7f3".to_string(),
            other_color: "#f3f4f6".to_string(),
            parent_child_line_color: "#64748b".to_string(),
            spouse_line_color: "#e11d48".to_string(),
            sibling_line_color: "#94a3b8".to_string(),
            line_width: 2.0,
            font_family: "\"trebuchet ms\", verdana, arial, sans-serif".to_string(),
            font_size: 14.0,
            line_style: LineStyle::Curved,
        }
    }
}

/// Per-build selection of which relatives to pull in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuildTreeOptions {
    pub root_person_id: Option<String>,
    /// Overrides `TreeLayoutConfig::max_generations` when set.
    pub max_generations: Option<u32>,
    pub include_ancestors: bool,
    pub include_descendants: bool,
    pub include_siblings: bool,
}

impl Default for BuildTreeOptions {
    fn default() -> Self {
        Self {
            root_person_id: None,
            max_generations: None,
            include_ancestors: true,
            include_descendants: true,
            include_siblings: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Png,
    Jpeg,
    Svg,
    Pdf,
}

impl std::str::FromStr for ExportFormat {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            "svg" => Ok(Self::Svg),
            "pdf" => Ok(Self::Pdf),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportOptions {
    pub format: ExportFormat,
    /// Encoder quality in `[0, 1]` (lossy formats only).
    pub quality: f64,
    pub background_color: String,
    pub scale: f64,
    pub include_watermark: bool,
    /// Margin around the bounding box, in layout units.
    pub padding: f64,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::Png,
            quality: 0.92,
            background_color: "#ffffff".to_string(),
            scale: 1.0,
            include_watermark: false,
            padding: 20.0,
        }
    }
}

impl ExportOptions {
    pub fn validate(&self) -> Result<()> {
        positive("scale", self.scale)?;
        non_negative("padding", self.padding)?;
        if !(0.0..=1.0).contains(&self.quality) {
            return Err(Error::config(
                "quality",
                format!("must be within [0, 1], got {}", self.quality),
            ));
        }
        Ok(())
    }
}

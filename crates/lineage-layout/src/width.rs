//! Subtree widths, children before parents.
//!
//! A band of `n` members is `n * nodeWidth + (n - 1) * spouseSpacing` wide. Its children are
//! centered under the band's anchor: the midpoint of the single union (or member) that has
//! visible children, or the band center when several do. The subtree width is wide enough for
//! both the band around that anchor and the children row below it.

use crate::forest::{Band, BandForest};
use lineage_core::TreeLayoutConfig;

pub(crate) fn band_width(members: usize, cfg: &TreeLayoutConfig) -> f64 {
    let n = members.max(1) as f64;
    n * cfg.node_width + (n - 1.0) * cfg.spouse_spacing
}

/// Center of member `i` relative to the center of an `n`-member band.
pub(crate) fn member_offset(i: usize, n: usize, cfg: &TreeLayoutConfig) -> f64 {
    (i as f64 - (n as f64 - 1.0) / 2.0) * (cfg.node_width + cfg.spouse_spacing)
}

/// Where the children row is centered, relative to the band center.
pub(crate) fn anchor_offset(band: &Band, cfg: &TreeLayoutConfig) -> f64 {
    let mut filled = band.visible_slots().filter(|s| !s.children.is_empty());
    let (Some(slot), None) = (filled.next(), filled.next()) else {
        return 0.0;
    };
    let n = band.members.len();
    let offsets: Vec<f64> = slot
        .anchors
        .iter()
        .filter_map(|&a| band.member_index(a))
        .map(|i| member_offset(i, n, cfg))
        .collect();
    if offsets.is_empty() {
        return 0.0;
    }
    offsets.iter().sum::<f64>() / offsets.len() as f64
}

/// Width of the visible children row of `band`.
pub(crate) fn children_span(band: &Band, widths: &[f64], cfg: &TreeLayoutConfig) -> f64 {
    let mut span = 0.0;
    let mut count = 0usize;
    for cb in band.visible_child_bands() {
        span += widths[cb];
        count += 1;
    }
    if count > 1 {
        span += (count - 1) as f64 * cfg.horizontal_spacing;
    }
    span
}

/// Subtree width per band id.
pub(crate) fn subtree_widths(forest: &BandForest, cfg: &TreeLayoutConfig) -> Vec<f64> {
    let mut widths = vec![0.0; forest.bands.len()];
    for id in (0..forest.bands.len()).rev() {
        let band = &forest.bands[id];
        let own = band_width(band.members.len(), cfg);
        let has_children = band.visible_child_bands().next().is_some();
        widths[id] = if !has_children {
            own
        } else {
            let anchored = own + 2.0 * anchor_offset(band, cfg).abs();
            anchored.max(children_span(band, &widths, cfg))
        };
    }
    tracing::debug!(bands = widths.len(), "subtree widths computed");
    widths
}

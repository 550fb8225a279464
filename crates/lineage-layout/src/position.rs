//! Coordinates, parents before children.
//!
//! Everything is placed in a canonical left-to-right space first: forest roots side by side,
//! each band's children packed left to right under its anchor. The upward tree is placed on its
//! own and shifted so its base sits on the root. Only then is the layout translated to the
//! centering person and, for right-to-left, mirrored.

use crate::builder::FamilyGraph;
use crate::forest::{BandForest, BandId};
use crate::generation::Generations;
use crate::width::{anchor_offset, children_span, member_offset};
use lineage_core::{Direction, TreeLayoutConfig};

#[derive(Debug, Clone)]
pub(crate) struct Placement {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub visible: Vec<bool>,
}

struct Placer<'a> {
    forest: &'a BandForest,
    widths: &'a [f64],
    cfg: &'a TreeLayoutConfig,
    x: Vec<f64>,
    // Collapsed person a hidden person is drawn under.
    cover: Vec<Option<usize>>,
}

impl Placer<'_> {
    fn place_tree(&mut self, root: BandId, anchor_x: f64) {
        let (forest, widths, cfg) = (self.forest, self.widths, self.cfg);
        let mut stack: Vec<(BandId, f64, Option<usize>)> = vec![(root, anchor_x, None)];
        while let Some((b, anchor_x, hidden)) = stack.pop() {
            let band = &forest.bands[b];
            let center = anchor_x - anchor_offset(band, cfg);
            if !band.pseudo {
                let n = band.members.len();
                for (i, &m) in band.members.iter().enumerate() {
                    self.x[m] = center + member_offset(i, n, cfg);
                    self.cover[m] = hidden;
                }
            }

            let span = children_span(band, widths, cfg);
            let mut cursor = anchor_x - span / 2.0;
            for slot in &band.slots {
                let slot_hidden = hidden.or(band.hidden_by(slot));
                for &cb in &slot.children {
                    if slot_hidden.is_some() {
                        // drawn under the collapsed anchor; takes no room in the row
                        stack.push((cb, anchor_x, slot_hidden));
                        continue;
                    }
                    let w = widths[cb];
                    stack.push((cb, cursor + w / 2.0, slot_hidden));
                    cursor += w + cfg.horizontal_spacing;
                }
            }
        }
    }
}

pub(crate) fn place(
    fg: &FamilyGraph,
    gens: &Generations,
    forest: &BandForest,
    widths: &[f64],
    cfg: &TreeLayoutConfig,
) -> Placement {
    let n = fg.len();
    let mut placer = Placer {
        forest,
        widths,
        cfg,
        x: vec![0.0; n],
        cover: vec![None; n],
    };

    let mut left = 0.0;
    for &r in &forest.roots {
        placer.place_tree(r, left + widths[r] / 2.0);
        left += widths[r] + cfg.horizontal_spacing;
    }
    if let Some(up) = forest.up_root {
        let root = fg.root();
        let anchor = placer.x[root] + anchor_offset(&forest.bands[up], cfg);
        placer.place_tree(up, anchor);
    }

    let Placer { mut x, cover, .. } = placer;
    let row = cfg.row_height();
    let mut y: Vec<f64> = (0..n)
        .map(|ix| f64::from(gens.level(ix).unwrap_or(0)) * row)
        .collect();
    for ix in gens.retained() {
        if let Some(c) = cover[ix] {
            x[ix] = x[c];
            y[ix] = y[c];
        }
    }

    let target = cfg
        .center_on_person
        .as_deref()
        .and_then(|id| fg.ix(id))
        .filter(|&ix| gens.is_retained(ix))
        .unwrap_or(fg.root());
    let dx = -x[target];
    let mirror = cfg.direction == Direction::Rtl;
    for v in &mut x {
        let shifted = *v + dx;
        // `+ 0.0` folds a negative zero.
        *v = if mirror { -shifted + 0.0 } else { shifted + 0.0 };
    }

    tracing::debug!(
        placed = gens.retained_count(),
        hidden = cover.iter().filter(|c| c.is_some()).count(),
        "positions assigned"
    );

    Placement {
        x,
        y,
        visible: cover.iter().map(Option::is_none).collect(),
    }
}

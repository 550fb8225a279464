//! The band forest the width and position passes run over.
//!
//! A band is one row entry: a primary person plus the partners drawn beside them. A band hangs
//! its children from slots, one per union (or one per member for upward bands), and every child
//! is itself the owner of a band. Each retained person belongs to exactly one band, so a child
//! of several parents reserves width under exactly one of them; its other parent edges are
//! secondary.
//!
//! Bands are appended parent-before-child, which makes reverse id order a valid post-order.

use crate::builder::FamilyGraph;
use crate::generation::{Generations, Origin};
use lineage_core::LayoutType;
use rustc_hash::FxHashSet;
use std::collections::VecDeque;

pub(crate) type BandId = usize;

#[derive(Debug, Clone)]
pub(crate) struct Slot {
    /// Band members the children hang from.
    pub anchors: Vec<usize>,
    pub children: Vec<BandId>,
}

#[derive(Debug, Clone)]
pub(crate) struct Band {
    pub owner: usize,
    /// Left to right.
    pub members: Vec<usize>,
    pub level: i32,
    pub slots: Vec<Slot>,
    /// Children are the bands of the members' parents, drawn above.
    pub upward: bool,
    /// Stand-in for the root at the base of the upward tree; owns no position.
    pub pseudo: bool,
    /// Upward bands only: the person these members are the parents of.
    pub anchored_at: Option<usize>,
    /// Collapsed members. Always empty on upward bands: ancestors are not children.
    pub collapsed: Vec<usize>,
}

impl Band {
    /// The collapsed anchor a slot's children are hidden under, if any.
    pub fn hidden_by(&self, slot: &Slot) -> Option<usize> {
        slot.anchors
            .iter()
            .copied()
            .find(|a| self.collapsed.contains(a))
    }

    pub fn visible_slots(&self) -> impl Iterator<Item = &Slot> + '_ {
        self.slots.iter().filter(|s| self.hidden_by(s).is_none())
    }

    pub fn member_index(&self, ix: usize) -> Option<usize> {
        self.members.iter().position(|&m| m == ix)
    }

    pub fn visible_child_bands(&self) -> impl Iterator<Item = BandId> + '_ {
        self.visible_slots().flat_map(|s| s.children.iter().copied())
    }
}

#[derive(Debug, Clone)]
pub(crate) struct BandForest {
    pub bands: Vec<Band>,
    /// Downward trees, left to right.
    pub roots: Vec<BandId>,
    pub up_root: Option<BandId>,
    pub band_of: Vec<Option<BandId>>,
    /// The band whose slot reserves width for this person's band.
    pub reserved_by: Vec<Option<BandId>>,
    /// Owner of the reserving band, for band owners.
    pub layout_parent: Vec<Option<usize>>,
}

impl BandForest {
    fn new(n: usize) -> Self {
        Self {
            bands: Vec::new(),
            roots: Vec::new(),
            up_root: None,
            band_of: vec![None; n],
            reserved_by: vec![None; n],
            layout_parent: vec![None; n],
        }
    }

    /// Whether the `parent -> child` edge is the one that reserves the child's width.
    pub fn is_primary_edge(&self, parent: usize, child: usize) -> bool {
        let Some(pb) = self.band_of[parent] else {
            return false;
        };
        if self.reserved_by[child] == Some(pb) {
            return true;
        }
        let band = &self.bands[pb];
        band.upward && band.anchored_at == Some(child)
    }

    fn open_band(
        &mut self,
        fg: &FamilyGraph,
        gens: &Generations,
        owner: usize,
        level: i32,
    ) -> BandId {
        let id = self.bands.len();
        self.band_of[owner] = Some(id);
        let mut order = vec![owner];
        for (s, _) in fg.spouses(owner) {
            if s != owner && self.band_of[s].is_none() && gens.level(s) == Some(level) {
                self.band_of[s] = Some(id);
                order.push(s);
            }
        }
        self.bands.push(Band {
            owner,
            members: arrange(&order),
            level,
            slots: Vec::new(),
            upward: false,
            pseudo: false,
            anchored_at: None,
            collapsed: Vec::new(),
        });
        id
    }

    fn grow_down(&mut self, fg: &FamilyGraph, gens: &Generations, queue: &mut VecDeque<BandId>) {
        while let Some(b) = queue.pop_front() {
            let owner = self.bands[b].owner;
            let level = self.bands[b].level;
            let members = self.bands[b].members.clone();
            let sources = std::iter::once(owner)
                .chain(members.iter().copied().filter(|&m| m != owner));

            for m in sources {
                for c in fg.children(m) {
                    if self.band_of[c].is_some() || gens.level(c) != Some(level + 1) {
                        continue;
                    }
                    let parents = fg.parents(c);
                    let anchors: Vec<usize> = members
                        .iter()
                        .copied()
                        .filter(|x| parents.contains(x))
                        .collect();
                    let cb = self.open_band(fg, gens, c, level + 1);
                    self.reserved_by[c] = Some(b);
                    self.layout_parent[c] = Some(owner);
                    self.add_to_slot(b, anchors, cb);
                    queue.push_back(cb);
                }
            }

            let band = &mut self.bands[b];
            let mut keyed: Vec<(f64, Slot)> = std::mem::take(&mut band.slots)
                .into_iter()
                .map(|s| (anchor_position(&members, &s.anchors), s))
                .collect();
            keyed.sort_by(|l, r| l.0.total_cmp(&r.0));
            band.slots = keyed.into_iter().map(|(_, s)| s).collect();
        }
    }

    fn add_to_slot(&mut self, band: BandId, anchors: Vec<usize>, child: BandId) {
        let slots = &mut self.bands[band].slots;
        if let Some(slot) = slots.iter_mut().find(|s| s.anchors == anchors) {
            slot.children.push(child);
        } else {
            slots.push(Slot {
                anchors,
                children: vec![child],
            });
        }
    }

    fn grow_up(&mut self, fg: &FamilyGraph, gens: &Generations) {
        let root = fg.root();
        let pseudo = self.bands.len();
        self.bands.push(Band {
            owner: root,
            members: vec![root],
            level: gens.level(root).unwrap_or(0),
            slots: Vec::new(),
            upward: true,
            pseudo: true,
            anchored_at: None,
            collapsed: Vec::new(),
        });
        self.up_root = Some(pseudo);

        let mut queue: VecDeque<BandId> = VecDeque::from([pseudo]);
        while let Some(b) = queue.pop_front() {
            let owner = self.bands[b].owner;
            let level = self.bands[b].level;
            let members = self.bands[b].members.clone();
            for m in members {
                let parents: Vec<usize> = fg
                    .parents(m)
                    .into_iter()
                    .filter(|&p| {
                        self.band_of[p].is_none()
                            && gens.level(p) == Some(level - 1)
                            && gens.origin(p) == Some(Origin::Ancestor)
                    })
                    .collect();
                let Some(&first) = parents.first() else {
                    continue;
                };
                let id = self.bands.len();
                for &p in &parents {
                    self.band_of[p] = Some(id);
                }
                self.layout_parent[first] = Some(owner);
                self.bands.push(Band {
                    owner: first,
                    members: arrange(&parents),
                    level: level - 1,
                    slots: Vec::new(),
                    upward: true,
                    pseudo: false,
                    anchored_at: Some(m),
                    collapsed: Vec::new(),
                });
                self.bands[b].slots.push(Slot {
                    anchors: vec![m],
                    children: vec![id],
                });
                queue.push_back(id);
            }
        }
    }
}

/// Owner first, then partners alternating right and left of it.
fn arrange(order: &[usize]) -> Vec<usize> {
    let Some((&owner, partners)) = order.split_first() else {
        return Vec::new();
    };
    let mut left: Vec<usize> = Vec::new();
    let mut right: Vec<usize> = Vec::new();
    for (i, &p) in partners.iter().enumerate() {
        if i % 2 == 0 {
            right.push(p);
        } else {
            left.push(p);
        }
    }
    left.reverse();
    left.push(owner);
    left.extend(right);
    left
}

fn anchor_position(members: &[usize], anchors: &[usize]) -> f64 {
    if anchors.is_empty() {
        return 0.0;
    }
    let sum: usize = anchors
        .iter()
        .filter_map(|a| members.iter().position(|m| m == a))
        .sum();
    sum as f64 / anchors.len() as f64
}

/// Groups every retained person into bands.
///
/// Non-`full` layouts grow one downward tree from the root (plus the upward tree when ancestors
/// are shown). Whatever is left, and every person in `full` mode, becomes an extra downward
/// root in (level, graph order), so `full` starts from the topmost ancestors.
pub(crate) fn grow_forest(
    fg: &FamilyGraph,
    gens: &Generations,
    layout_type: LayoutType,
    collapsed: &FxHashSet<usize>,
) -> BandForest {
    let mut forest = BandForest::new(fg.len());
    let mut queue: VecDeque<BandId> = VecDeque::new();

    if layout_type != LayoutType::Full {
        let root = fg.root();
        let b = forest.open_band(fg, gens, root, gens.level(root).unwrap_or(0));
        forest.roots.push(b);
        queue.push_back(b);
        forest.grow_down(fg, gens, &mut queue);
        if layout_type.shows_ancestors() {
            forest.grow_up(fg, gens);
        }
    }

    let mut pending: Vec<usize> = gens
        .retained()
        .filter(|&ix| forest.band_of[ix].is_none())
        .collect();
    pending.sort_by_key(|&ix| (gens.level(ix).unwrap_or(0), ix));
    for ix in pending {
        if forest.band_of[ix].is_some() {
            continue;
        }
        let b = forest.open_band(fg, gens, ix, gens.level(ix).unwrap_or(0));
        forest.roots.push(b);
        queue.push_back(b);
        forest.grow_down(fg, gens, &mut queue);
    }

    for band in forest.bands.iter_mut().filter(|b| !b.upward) {
        band.collapsed = band
            .members
            .iter()
            .copied()
            .filter(|m| collapsed.contains(m))
            .collect();
    }

    tracing::debug!(
        bands = forest.bands.len(),
        roots = forest.roots.len(),
        upward = forest.up_root.is_some(),
        "band forest grown"
    );
    forest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partners_alternate_around_the_owner() {
        assert_eq!(arrange(&[0]), vec![0]);
        assert_eq!(arrange(&[0, 1]), vec![0, 1]);
        assert_eq!(arrange(&[0, 1, 2]), vec![2, 0, 1]);
        assert_eq!(arrange(&[0, 1, 2, 3, 4]), vec![4, 2, 0, 1, 3]);
    }

    #[test]
    fn slot_position_is_the_mean_member_index() {
        assert_eq!(anchor_position(&[7, 8, 9], &[8, 9]), 1.5);
        assert_eq!(anchor_position(&[7, 8, 9], &[7]), 0.0);
    }

    #[test]
    fn only_slots_anchored_on_a_collapsed_member_are_hidden() {
        let band = Band {
            owner: 8,
            members: vec![7, 8, 9],
            level: 0,
            slots: vec![
                Slot {
                    anchors: vec![7, 8],
                    children: vec![1],
                },
                Slot {
                    anchors: vec![8, 9],
                    children: vec![2, 3],
                },
            ],
            upward: false,
            pseudo: false,
            anchored_at: None,
            collapsed: vec![7],
        };
        assert_eq!(band.hidden_by(&band.slots[0]), Some(7));
        assert_eq!(band.hidden_by(&band.slots[1]), None);
        assert_eq!(band.visible_child_bands().collect::<Vec<_>>(), vec![2, 3]);
    }
}

//! Generation (level) assignment.
//!
//! Levels are signed distances from the root along parent-child edges only: ancestors are
//! negative, descendants positive. Both passes are worklist relaxations that visit edges in
//! relationship order, so re-visits resolve the same way on every run:
//!
//! - the ancestor pass keeps the shallowest (maximum) level seen for a person;
//! - the descendant pass keeps the minimum parent level + 1 and never rewrites a level fixed by
//!   the root or the ancestor pass.
//!
//! Partners are attached afterwards at their partner's level and never move a level.

use crate::builder::FamilyGraph;
use lineage_core::{BuildTreeOptions, LayoutType};
use std::collections::VecDeque;

/// How a person entered the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Root,
    Ancestor,
    Descendant,
    Spouse,
    Sibling,
}

#[derive(Debug, Clone)]
pub struct Generations {
    level: Vec<Option<i32>>,
    origin: Vec<Option<Origin>>,
    order: Vec<usize>,
}

impl Generations {
    fn new(n: usize) -> Self {
        Self {
            level: vec![None; n],
            origin: vec![None; n],
            order: Vec::new(),
        }
    }

    fn set(&mut self, ix: usize, level: i32, origin: Origin) {
        if self.level[ix].is_none() {
            self.order.push(ix);
        }
        self.level[ix] = Some(level);
        self.origin[ix] = Some(origin);
    }

    pub fn level(&self, ix: usize) -> Option<i32> {
        self.level.get(ix).copied().flatten()
    }

    pub fn origin(&self, ix: usize) -> Option<Origin> {
        self.origin.get(ix).copied().flatten()
    }

    pub fn is_retained(&self, ix: usize) -> bool {
        self.level(ix).is_some()
    }

    /// Retained persons in graph order.
    pub fn retained(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.level.len()).filter(|&ix| self.level[ix].is_some())
    }

    /// Retained persons in the order they received a level.
    pub fn assignment_order(&self) -> &[usize] {
        &self.order
    }

    pub fn retained_count(&self) -> usize {
        self.order.len()
    }
}

/// Assigns levels for `layout_type`. `cap` bounds `|level|`.
pub fn assign_generations(
    fg: &FamilyGraph,
    layout_type: LayoutType,
    options: &BuildTreeOptions,
    cap: Option<u32>,
) -> Generations {
    let mut gens = Generations::new(fg.len());
    let root = fg.root();
    gens.set(root, 0, Origin::Root);

    let within_cap = |level: i32| cap.is_none_or(|c| level.unsigned_abs() <= c);

    let run_ancestors = options.include_ancestors && layout_type.shows_ancestors();
    let run_descendants = options.include_descendants && layout_type.shows_descendants();

    if run_ancestors {
        let mut queue: VecDeque<usize> = VecDeque::from([root]);
        while let Some(v) = queue.pop_front() {
            let Some(lv) = gens.level(v) else { continue };
            let candidate = lv - 1;
            if !within_cap(candidate) {
                continue;
            }
            for p in fg.parents(v) {
                match (gens.level(p), gens.origin(p)) {
                    (None, _) => {
                        gens.set(p, candidate, Origin::Ancestor);
                        queue.push_back(p);
                    }
                    (Some(cur), Some(Origin::Ancestor)) if candidate > cur => {
                        gens.set(p, candidate, Origin::Ancestor);
                        queue.push_back(p);
                    }
                    _ => {}
                }
            }
        }
    }

    if run_descendants {
        let mut queue: VecDeque<usize> = VecDeque::from([root]);
        if layout_type == LayoutType::Full {
            queue.extend(
                gens.assignment_order()
                    .iter()
                    .copied()
                    .filter(|&ix| gens.origin(ix) == Some(Origin::Ancestor)),
            );
        }
        while let Some(v) = queue.pop_front() {
            let Some(lv) = gens.level(v) else { continue };
            let candidate = lv + 1;
            if !within_cap(candidate) {
                continue;
            }
            for c in fg.children(v) {
                match (gens.level(c), gens.origin(c)) {
                    (None, _) => {
                        gens.set(c, candidate, Origin::Descendant);
                        queue.push_back(c);
                    }
                    (Some(cur), Some(Origin::Descendant)) if candidate < cur => {
                        gens.set(c, candidate, Origin::Descendant);
                        queue.push_back(c);
                    }
                    _ => {}
                }
            }
        }
    }

    if options.include_siblings && layout_type != LayoutType::Full {
        for s in fg.siblings(root) {
            if !gens.is_retained(s) {
                gens.set(s, 0, Origin::Sibling);
            }
        }
    }

    // The root's partners sit beside it in every mode; descendant partners only exist when the
    // descendant pass ran.
    let sources: Vec<usize> = gens
        .assignment_order()
        .iter()
        .copied()
        .filter(|&ix| matches!(gens.origin(ix), Some(Origin::Root | Origin::Descendant)))
        .collect();
    for v in sources {
        let Some(lv) = gens.level(v) else { continue };
        for (s, _) in fg.spouses(v) {
            if !gens.is_retained(s) {
                gens.set(s, lv, Origin::Spouse);
            }
        }
    }

    tracing::debug!(
        layout = ?layout_type,
        retained = gens.retained_count(),
        total = fg.len(),
        "generations assigned"
    );
    gens
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build_family_graph;
    use lineage_core::{Person, Relationship, TreeData};

    fn family() -> TreeData {
        // gp -> p -> root -> kid; root + sp; p -> sib
        let ids = ["root", "p", "gp", "kid", "sp", "sib", "other"];
        TreeData {
            persons: ids.iter().map(|id| Person::new(*id, *id, "")).collect(),
            relationships: vec![
                Relationship::parent("r1", "gp", "p"),
                Relationship::parent("r2", "p", "root"),
                Relationship::parent("r3", "root", "kid"),
                Relationship::spouse("r4", "root", "sp"),
                Relationship::parent("r5", "p", "sib"),
            ],
            root_person_id: Some("root".to_string()),
        }
    }

    fn levels(layout: LayoutType, options: &BuildTreeOptions) -> Vec<(String, i32)> {
        let data = family();
        let fg = build_family_graph(&data, None, options).unwrap();
        let gens = assign_generations(&fg, layout, options, None);
        gens.retained()
            .map(|ix| (fg.id(ix).to_string(), gens.level(ix).unwrap_or_default()))
            .collect()
    }

    fn pairs(v: &[(&str, i32)]) -> Vec<(String, i32)> {
        v.iter().map(|(id, l)| (id.to_string(), *l)).collect()
    }

    #[test]
    fn descendants_mode_pulls_in_partners_and_root_siblings() {
        let got = levels(LayoutType::Descendants, &BuildTreeOptions::default());
        assert_eq!(got, pairs(&[("root", 0), ("kid", 1), ("sp", 0), ("sib", 0)]));
    }

    #[test]
    fn ancestors_mode_keeps_the_root_partner_but_no_descendants() {
        let opts = BuildTreeOptions {
            include_siblings: false,
            ..Default::default()
        };
        let got = levels(LayoutType::Ancestors, &opts);
        assert_eq!(
            got,
            pairs(&[("root", 0), ("p", -1), ("gp", -2), ("sp", 0)])
        );
    }

    #[test]
    fn full_mode_reaches_collateral_relatives() {
        let got = levels(LayoutType::Full, &BuildTreeOptions::default());
        assert_eq!(
            got,
            pairs(&[
                ("root", 0),
                ("p", -1),
                ("gp", -2),
                ("kid", 1),
                ("sp", 0),
                ("sib", 0)
            ])
        );
    }

    #[test]
    fn cap_truncates_both_directions() {
        let data = family();
        let opts = BuildTreeOptions::default();
        let fg = build_family_graph(&data, None, &opts).unwrap();
        let gens = assign_generations(&fg, LayoutType::Hourglass, &opts, Some(1));
        let gp = fg.ix("gp").unwrap();
        let p = fg.ix("p").unwrap();
        assert!(!gens.is_retained(gp));
        assert_eq!(gens.level(p), Some(-1));
    }

    #[test]
    fn skewed_union_uses_the_minimum_parent_level() {
        // uncle (level 1) and niece (level 2) share child x
        let ids = ["r", "uncle", "brother", "niece", "x"];
        let data = TreeData {
            persons: ids.iter().map(|id| Person::new(*id, *id, "")).collect(),
            relationships: vec![
                Relationship::parent("1", "r", "uncle"),
                Relationship::parent("2", "r", "brother"),
                Relationship::parent("3", "brother", "niece"),
                Relationship::parent("4", "niece", "x"),
                Relationship::parent("5", "uncle", "x"),
            ],
            root_person_id: None,
        };
        let opts = BuildTreeOptions::default();
        let fg = build_family_graph(&data, None, &opts).unwrap();
        let gens = assign_generations(&fg, LayoutType::Descendants, &opts, None);
        assert_eq!(gens.level(fg.ix("x").unwrap()), Some(2));
        assert_eq!(gens.level(fg.ix("niece").unwrap()), Some(2));
    }
}

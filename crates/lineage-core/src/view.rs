//! View/interaction state and its reducer.
//!
//! `TreeViewState` lives independently of any built layout. Actions are applied by [`reduce`],
//! a pure function returning the next state and whether the layout must be rebuilt; the reducer
//! itself never calls into the layout pipeline.

use crate::config::{Direction, LayoutType, TreeLayoutConfig};
use crate::search::SearchIndex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const MIN_SCALE: f64 = 0.1;
pub const MAX_SCALE: f64 = 3.0;
pub const ZOOM_STEP: f64 = 1.2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TreeViewState {
    pub scale: f64,
    pub translate_x: f64,
    pub translate_y: f64,
    pub selected_person_id: Option<String>,
    pub highlighted_person_ids: BTreeSet<String>,
    /// Highlights set through `HighlightPersons`; clearing a search leaves them lit.
    pub pinned_person_ids: BTreeSet<String>,
    pub collapsed_node_ids: BTreeSet<String>,
    pub layout_type: LayoutType,
    pub direction: Direction,
    pub search_query: String,
    pub search_results: Vec<String>,
}

impl Default for TreeViewState {
    fn default() -> Self {
        Self {
            scale: 1.0,
            translate_x: 0.0,
            translate_y: 0.0,
            selected_person_id: None,
            highlighted_person_ids: BTreeSet::new(),
            pinned_person_ids: BTreeSet::new(),
            collapsed_node_ids: BTreeSet::new(),
            layout_type: LayoutType::Descendants,
            direction: Direction::Ltr,
            search_query: String::new(),
            search_results: Vec::new(),
        }
    }
}

impl TreeViewState {
    pub fn new(layout_type: LayoutType, direction: Direction) -> Self {
        Self {
            layout_type,
            direction,
            ..Default::default()
        }
    }

    /// `base` with this state's layout type and direction.
    pub fn apply_to(&self, base: &TreeLayoutConfig) -> TreeLayoutConfig {
        TreeLayoutConfig {
            layout_type: self.layout_type,
            direction: self.direction,
            ..base.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewAction {
    SelectPerson(Option<String>),
    HighlightPersons(Vec<String>),
    ClearHighlights,
    SetZoom(f64),
    SetTransform {
        scale: f64,
        translate_x: f64,
        translate_y: f64,
    },
    ZoomIn,
    ZoomOut,
    ResetView,
    ToggleLayout,
    ToggleDirection,
    ToggleCollapse(String),
    Search(String),
    ClearSearch,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reduced {
    pub state: TreeViewState,
    pub needs_relayout: bool,
}

fn clamp_scale(scale: f64) -> f64 {
    scale.clamp(MIN_SCALE, MAX_SCALE)
}

fn clear_search(state: &mut TreeViewState) {
    for id in std::mem::take(&mut state.search_results) {
        if !state.pinned_person_ids.contains(&id) {
            state.highlighted_person_ids.remove(&id);
        }
    }
    state.search_query.clear();
}

pub fn reduce(state: &TreeViewState, action: ViewAction, index: &SearchIndex) -> Reduced {
    tracing::trace!(?action, "view action");

    let mut next = state.clone();
    let mut needs_relayout = false;

    match action {
        ViewAction::SelectPerson(id) => next.selected_person_id = id,
        ViewAction::HighlightPersons(ids) => {
            next.pinned_person_ids = ids.into_iter().collect();
            next.highlighted_person_ids = next.pinned_person_ids.clone();
        }
        ViewAction::ClearHighlights => {
            next.pinned_person_ids.clear();
            next.highlighted_person_ids.clear();
        }
        ViewAction::SetZoom(scale) => {
            if scale.is_finite() {
                next.scale = clamp_scale(scale);
            }
        }
        ViewAction::SetTransform {
            scale,
            translate_x,
            translate_y,
        } => {
            if scale.is_finite() && translate_x.is_finite() && translate_y.is_finite() {
                next.scale = clamp_scale(scale);
                next.translate_x = translate_x;
                next.translate_y = translate_y;
            }
        }
        ViewAction::ZoomIn => next.scale = clamp_scale(state.scale * ZOOM_STEP),
        ViewAction::ZoomOut => next.scale = clamp_scale(state.scale / ZOOM_STEP),
        ViewAction::ResetView => {
            next.scale = 1.0;
            next.translate_x = 0.0;
            next.translate_y = 0.0;
        }
        ViewAction::ToggleLayout => {
            next.layout_type = state.layout_type.next();
            needs_relayout = true;
        }
        ViewAction::ToggleDirection => {
            next.direction = state.direction.toggled();
            needs_relayout = true;
        }
        ViewAction::ToggleCollapse(id) => {
            if !next.collapsed_node_ids.remove(&id) {
                next.collapsed_node_ids.insert(id);
            }
            needs_relayout = true;
        }
        ViewAction::Search(query) => {
            clear_search(&mut next);
            let results: Vec<String> = index
                .search(&query)
                .into_iter()
                .map(|h| h.person_id)
                .collect();
            if !query.trim().is_empty() {
                next.search_query = query;
            }
            next.highlighted_person_ids.extend(results.iter().cloned());
            next.search_results = results;
        }
        ViewAction::ClearSearch => clear_search(&mut next),
    }

    Reduced {
        state: next,
        needs_relayout,
    }
}

/// Owns a `TreeViewState` plus the search index of the currently built graph.
#[derive(Debug, Clone, Default)]
pub struct ViewStateManager {
    state: TreeViewState,
    index: SearchIndex,
}

impl ViewStateManager {
    pub fn new(state: TreeViewState) -> Self {
        Self {
            state,
            index: SearchIndex::new(),
        }
    }

    pub fn state(&self) -> &TreeViewState {
        &self.state
    }

    pub fn into_state(self) -> TreeViewState {
        self.state
    }

    /// Replaces the index after a rebuild. The current search is not re-run.
    pub fn set_search_index(&mut self, index: SearchIndex) {
        self.index = index;
    }

    /// Applies `action`; returns `true` when the layout must be rebuilt.
    pub fn dispatch(&mut self, action: ViewAction) -> bool {
        let Reduced {
            state,
            needs_relayout,
        } = reduce(&self.state, action, &self.index);
        self.state = state;
        needs_relayout
    }
}

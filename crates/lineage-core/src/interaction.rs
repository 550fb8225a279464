//! Callback contract for the input layer.
//!
//! The engine owns no event loop. An external input layer resolves pointer events against a
//! built layout (see `lineage_layout::interact`) and reports them through [`TreeInteraction`].

use crate::view::TreeViewState;

/// Every method defaults to a no-op so implementors only override what they need.
pub trait TreeInteraction {
    fn on_person_click(&mut self, _person_id: &str) {}

    /// `None` when the pointer left every person.
    fn on_person_hover(&mut self, _person_id: Option<&str>) {}

    fn on_person_double_click(&mut self, _person_id: &str) {}

    fn on_relationship_click(&mut self, _connection_id: &str, _relationship_id: Option<&str>) {}

    fn on_background_click(&mut self) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Click,
    DoubleClick,
    Hover,
}

/// A pointer event in screen space (before the view transform is undone).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub x: f64,
    pub y: f64,
}

impl PointerEvent {
    pub fn new(kind: PointerKind, x: f64, y: f64) -> Self {
        Self { kind, x, y }
    }

    /// The event position in layout space under `view`'s scale/translate.
    pub fn to_layout_space(&self, view: &TreeViewState) -> (f64, f64) {
        let scale = if view.scale > 0.0 { view.scale } else { 1.0 };
        (
            (self.x - view.translate_x) / scale,
            (self.y - view.translate_y) / scale,
        )
    }
}

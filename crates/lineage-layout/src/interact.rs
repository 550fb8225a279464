//! Pointer events to interaction callbacks.

use crate::model::{Hit, TreeLayout};
use lineage_core::{PointerEvent, PointerKind, TreeInteraction, TreeViewState};

/// Hit tolerance for connections, in screen pixels.
pub const DEFAULT_HIT_TOLERANCE: f64 = 4.0;

/// Resolves `event` (screen space) against `layout` under `view` and invokes the matching
/// callback on `handler`. Returns what was hit.
pub fn dispatch_pointer(
    layout: &TreeLayout,
    view: &TreeViewState,
    event: PointerEvent,
    handler: &mut dyn TreeInteraction,
) -> Option<Hit> {
    let (x, y) = event.to_layout_space(view);
    let scale = if view.scale > 0.0 { view.scale } else { 1.0 };
    let hit = layout.hit_test(x, y, DEFAULT_HIT_TOLERANCE / scale);

    match (event.kind, &hit) {
        (PointerKind::Click, Some(Hit::Person { person_id })) => handler.on_person_click(person_id),
        (
            PointerKind::Click,
            Some(Hit::Connection {
                connection_id,
                relationship_id,
            }),
        ) => handler.on_relationship_click(connection_id, relationship_id.as_deref()),
        (PointerKind::Click, None) => handler.on_background_click(),
        (PointerKind::DoubleClick, Some(Hit::Person { person_id })) => {
            handler.on_person_double_click(person_id)
        }
        (PointerKind::DoubleClick, _) => {}
        (PointerKind::Hover, Some(Hit::Person { person_id })) => {
            handler.on_person_hover(Some(person_id))
        }
        (PointerKind::Hover, _) => handler.on_person_hover(None),
    }
    hit
}

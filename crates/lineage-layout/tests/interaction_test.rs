use lineage_core::{
    BuildTreeOptions, Error, ExportFormat, ExportOptions, Gender, MatchRank, Person, PointerEvent,
    PointerKind, Relationship, TreeData, TreeInteraction, TreeLayoutConfig, TreeStyleConfig,
    TreeViewState, ViewAction, ViewStateManager,
};
use lineage_layout::{
    Hit, LayoutEngine, NodeFlags, TreeLayout, dispatch_pointer, export_geometry,
};

fn family() -> TreeData {
    TreeData {
        persons: vec![
            Person::new("A", "Alice", "Ng").with_gender(Gender::Female),
            Person::new("B", "Bob", "Ng").with_gender(Gender::Male),
            Person::new("C", "Carla", "Ng"),
            Person::new("D", "Alina", "Ng"),
        ],
        relationships: vec![
            Relationship::spouse("r-spouse", "A", "B"),
            Relationship::parent("r1", "A", "C"),
            Relationship::parent("r2", "B", "C"),
            Relationship::parent("r3", "A", "D"),
            Relationship::parent("r4", "B", "D"),
        ],
        root_person_id: Some("A".to_string()),
    }
}

fn engine() -> LayoutEngine {
    LayoutEngine::new(
        TreeLayoutConfig {
            node_width: 80.0,
            horizontal_spacing: 20.0,
            ..Default::default()
        },
        TreeStyleConfig::default(),
    )
    .unwrap()
}

fn layout() -> TreeLayout {
    engine().build(&family(), &BuildTreeOptions::default()).unwrap()
}

#[derive(Default)]
struct Recorder {
    events: Vec<String>,
}

impl TreeInteraction for Recorder {
    fn on_person_click(&mut self, person_id: &str) {
        self.events.push(format!("click:{person_id}"));
    }

    fn on_person_hover(&mut self, person_id: Option<&str>) {
        self.events
            .push(format!("hover:{}", person_id.unwrap_or("-")));
    }

    fn on_person_double_click(&mut self, person_id: &str) {
        self.events.push(format!("dblclick:{person_id}"));
    }

    fn on_relationship_click(&mut self, connection_id: &str, relationship_id: Option<&str>) {
        self.events.push(format!(
            "relationship:{connection_id}:{}",
            relationship_id.unwrap_or("-")
        ));
    }

    fn on_background_click(&mut self) {
        self.events.push("background".to_string());
    }
}

#[test]
fn hit_test_prefers_node_boxes() {
    let out = layout();
    assert_eq!(
        out.hit_test(10.0, 10.0, 4.0),
        Some(Hit::Person {
            person_id: "A".to_string()
        })
    );
    assert_eq!(
        out.hit_test(50.0, 1.0, 4.0),
        Some(Hit::Connection {
            connection_id: "spouse:A:B".to_string(),
            relationship_id: Some("r-spouse".to_string()),
        })
    );
    assert_eq!(out.hit_test(500.0, 500.0, 4.0), None);
}

#[test]
fn pointer_events_reach_the_matching_callbacks() {
    let out = layout();
    let view = TreeViewState {
        scale: 2.0,
        translate_x: 100.0,
        ..Default::default()
    };
    let mut rec = Recorder::default();

    // A is at layout (0, 0), i.e. screen (100, 0)
    dispatch_pointer(&out, &view, PointerEvent::new(PointerKind::Click, 100.0, 0.0), &mut rec);
    // B is at layout (100, 0)
    dispatch_pointer(&out, &view, PointerEvent::new(PointerKind::DoubleClick, 300.0, 0.0), &mut rec);
    // the spouse line between them
    dispatch_pointer(&out, &view, PointerEvent::new(PointerKind::Click, 200.0, 2.0), &mut rec);
    dispatch_pointer(&out, &view, PointerEvent::new(PointerKind::Click, -900.0, 0.0), &mut rec);
    dispatch_pointer(&out, &view, PointerEvent::new(PointerKind::Hover, 100.0, 320.0), &mut rec);
    dispatch_pointer(&out, &view, PointerEvent::new(PointerKind::Hover, -900.0, 0.0), &mut rec);
    dispatch_pointer(&out, &view, PointerEvent::new(PointerKind::DoubleClick, -900.0, 0.0), &mut rec);

    assert_eq!(
        rec.events,
        vec![
            "click:A",
            "dblclick:B",
            "relationship:spouse:A:B:r-spouse",
            "background",
            "hover:C",
            "hover:-",
        ]
    );
}

#[test]
fn search_runs_against_the_built_layout() {
    let out = layout();
    let index = out.search_index();
    let hits = index.search("ali");
    let ids: Vec<&str> = hits.iter().map(|h| h.person_id.as_str()).collect();
    assert_eq!(ids, vec!["A", "D"]);
    assert!(hits.iter().all(|h| h.rank == MatchRank::Prefix));

    let mut view = ViewStateManager::new(TreeViewState::default());
    view.set_search_index(index);
    assert!(!view.dispatch(ViewAction::Search("carla ng".to_string())));
    assert_eq!(view.state().search_results, vec!["C"]);

    // highlights flow back into the next build
    let flags = NodeFlags::from_view(view.state());
    let rebuilt = engine()
        .build_with(&family(), None, &BuildTreeOptions::default(), &flags)
        .unwrap();
    assert!(rebuilt.node("C").unwrap().is_highlighted);
    assert!(!rebuilt.node("A").unwrap().is_highlighted);
}

#[test]
fn toggle_collapse_round_trip_through_the_view_state() {
    let engine = engine();
    let data = family();
    let opts = BuildTreeOptions::default();
    let mut view = ViewStateManager::new(TreeViewState::default());
    let before = engine.build(&data, &opts).unwrap();

    assert!(view.dispatch(ViewAction::ToggleCollapse("A".to_string())));
    let collapsed = engine
        .build_with(&data, None, &opts, &NodeFlags::from_view(view.state()))
        .unwrap();
    assert!(!collapsed.node("C").unwrap().is_visible);
    assert_eq!(collapsed.visible_nodes().count(), 2);
    assert_eq!(collapsed.bounds.width, 180.0);

    assert!(view.dispatch(ViewAction::ToggleCollapse("A".to_string())));
    let expanded = engine
        .build_with(&data, None, &opts, &NodeFlags::from_view(view.state()))
        .unwrap();
    assert_eq!(expanded, before);
}

#[test]
fn export_maps_layout_space_to_pixels() {
    let out = layout();
    let options = ExportOptions {
        format: ExportFormat::Svg,
        scale: 2.0,
        padding: 10.0,
        ..Default::default()
    };
    let geo = export_geometry(&out, &TreeStyleConfig::default(), &options).unwrap();

    // bounds are 180 x 240
    assert_eq!((geo.width, geo.height), (400, 520));
    assert_eq!(geo.translate_x, 50.0);
    assert_eq!(geo.translate_y, 50.0);

    let a = geo.nodes.iter().find(|n| n.id == "A").unwrap();
    assert_eq!((a.x, a.y, a.width, a.height), (20.0, 20.0, 160.0, 160.0));
    assert_eq!(a.fill, TreeStyleConfig::default().female_color);
    assert_eq!(a.label, "Alice Ng");

    let spouse = geo
        .connections
        .iter()
        .find(|c| c.id == "spouse:A:B")
        .unwrap();
    assert_eq!(spouse.path.d, "M180,100 L220,100");
    assert_eq!(spouse.stroke_width, 4.0);
}

#[test]
fn export_rejects_invalid_options() {
    let out = layout();
    let options = ExportOptions {
        scale: 0.0,
        ..Default::default()
    };
    let err = export_geometry(&out, &TreeStyleConfig::default(), &options).unwrap_err();
    assert!(matches!(err, Error::Configuration { field: "scale", .. }));
}

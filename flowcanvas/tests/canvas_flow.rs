use flowcanvas::panels::ViewState;
use flowcanvas::{Canvas, CanvasEvent, ClickOutcome, DiscardReason, DragOutcome, Vec2, Viewport};
use serde_json::json;

fn pair_doc() -> serde_json::Value {
    json!({
        "nodes": [
            { "id": "A", "kind": "tool", "position": { "x": 50.0, "y": 50.0 },
              "outputs": [{ "id": "o1", "label": "out" }] },
            { "id": "B", "kind": "model", "position": { "x": 450.0, "y": 50.0 },
              "inputs": [{ "id": "i1", "label": "in" }] }
        ],
        "edges": []
    })
}

fn pair_canvas() -> Canvas {
    let mut c = Canvas::new();
    c.assemble_json(pair_doc()).unwrap();
    c.set_viewport(Viewport { width: 1200.0, height: 800.0, ..Viewport::default() });
    c.drain_events();
    c
}

#[test]
fn drag_connects_then_hover_delete_removes() {
    let mut c = pair_canvas();
    let src = c.graph().resolve_port_position("A", "o1").unwrap();
    let dst = c.graph().resolve_port_position("B", "i1").unwrap();
    assert_eq!(src, Vec2::new(290.0, 108.0));
    assert_eq!(dst, Vec2::new(450.0, 108.0));

    assert!(c.pointer_down(src));
    assert!(c.pointer_move(Vec2::new(380.0, 150.0)));
    assert!(c.drag_preview().unwrap().dashed);
    let out = c.pointer_up(dst).unwrap();
    let id = out.connection().unwrap().id.clone();
    assert_eq!(c.graph().connection_count(), 1);
    assert!(c.drag_preview().is_none());

    let events = c.drain_events();
    assert!(matches!(&events[..], [CanvasEvent::ConnectionAdded { edge }] if edge.id == id));

    // hover over the curve midpoint shows the delete affordance
    let mid = c.connection_views()[0].delete_anchor;
    assert!(c.pointer_move(mid));
    assert_eq!(c.hovered_connection(), Some(id.as_str()));
    assert!(c.connection_views()[0].hovered);

    assert!(c.delete_connection(&id));
    assert_eq!(c.graph().connection_count(), 0);
    assert!(c.hovered_connection().is_none());
    assert!(!c.delete_connection(&id), "second delete is a no-op");
}

#[test]
fn release_over_empty_canvas_leaves_edges_unchanged() {
    let mut c = pair_canvas();
    let ver = c.graph().geom_version();
    assert!(c.pointer_down(Vec2::new(290.0, 108.0)));
    let out = c.pointer_up(Vec2::new(900.0, 700.0)).unwrap();
    assert_eq!(out, DragOutcome::Discarded(DiscardReason::NoTarget));
    assert_eq!(c.graph().connection_count(), 0);
    assert_eq!(c.graph().geom_version(), ver);
    assert!(c.drain_events().is_empty());
}

#[test]
fn pointer_leave_discards_session() {
    let mut c = pair_canvas();
    assert!(c.pointer_down(Vec2::new(290.0, 108.0)));
    let out = c.pointer_leave().unwrap();
    assert_eq!(out.discard_reason(), Some(&DiscardReason::LeftCanvas));
    // the release that follows outside the canvas does nothing
    assert!(c.pointer_up(Vec2::new(450.0, 108.0)).is_none());
    assert_eq!(c.graph().connection_count(), 0);
}

#[test]
fn pointer_down_on_node_body_does_not_start_drag() {
    let mut c = pair_canvas();
    assert!(!c.pointer_down(Vec2::new(150.0, 70.0)));
    assert!(c.drag_preview().is_none());
}

#[test]
fn scrolled_viewport_translates_client_points() {
    let mut c = pair_canvas();
    c.set_viewport(Viewport {
        origin: Vec2::new(100.0, 20.0),
        scroll: Vec2::new(40.0, 10.0),
        width: 800.0,
        height: 600.0,
    });
    // local (290,108) is client (290 - 40 + 100, 108 - 10 + 20)
    let client = Vec2::new(350.0, 118.0);
    assert_eq!(c.viewport().to_local(client), Vec2::new(290.0, 108.0));
    assert!(c.pointer_down(client));
    let out = c.pointer_up(Vec2::new(510.0, 118.0)).unwrap();
    assert!(out.is_committed());
}

#[test]
fn port_element_gestures_bypass_hit_testing() {
    let mut c = pair_canvas();
    let src = flowcanvas::PortRef::new("A", "o1");
    let dst = flowcanvas::PortRef::new("B", "i1");
    assert!(c.port_pointer_down(&src, Vec2::new(0.0, 0.0)));
    let out = c.port_pointer_up(&dst, Vec2::new(0.0, 0.0)).unwrap();
    assert!(out.is_committed());
    // same pair again: no second connection, no second event
    c.drain_events();
    assert!(c.port_pointer_down(&src, Vec2::new(0.0, 0.0)));
    assert!(c.port_pointer_up(&dst, Vec2::new(0.0, 0.0)).unwrap().is_committed());
    assert_eq!(c.graph().connection_count(), 1);
    assert!(c.drain_events().is_empty());
}

#[test]
fn moving_a_node_moves_its_connection_endpoints() {
    let mut c = pair_canvas();
    c.add_connection(&flowcanvas::PortRef::new("A", "o1"), &flowcanvas::PortRef::new("B", "i1"))
        .unwrap();
    let before = c.connection_views()[0].d.clone();
    assert!(c.move_node("B", 500.0, 200.0));
    let after = c.connection_views()[0].d.clone();
    assert_ne!(before, after);
    assert!(after.ends_with("500 258"));
}

#[test]
fn remove_node_cascades_and_notifies() {
    let mut c = pair_canvas();
    let id = c
        .add_connection(&flowcanvas::PortRef::new("A", "o1"), &flowcanvas::PortRef::new("B", "i1"))
        .unwrap();
    assert_eq!(c.click_node("B"), ClickOutcome::Selected);
    c.drain_events();

    assert!(c.remove_node("B"));
    assert_eq!(c.graph().connection_count(), 0);
    let events = c.drain_events();
    assert_eq!(events[0], CanvasEvent::ConnectionRemoved { id });
    assert_eq!(events[1], CanvasEvent::NodeRemoved { id: "B".into() });
    assert_eq!(events[2], CanvasEvent::NodeSelected { node: None });
    assert!(c.selection().node().is_none());
    assert!(!c.remove_node("B"));
}

#[test]
fn frame_accounts_for_panels() {
    let c = pair_canvas();
    let mut view = ViewState::workflow_default();
    let f = c.frame(&view);
    assert_eq!(f.nodes.len(), 2);
    assert_eq!(f.visible.w, 1200.0 - 320.0 - 280.0);
    view.panel_mut(flowcanvas::panels::VIEWER_PANEL).unwrap().toggle();
    let f = c.frame(&view);
    assert_eq!(f.insets.left, 0.0);
    assert_eq!(f.visible.x, 0.0);
    // nodes plus margin extend past the viewport
    assert!(f.plane.w >= 1200.0);
    assert!(f.plane.x < 0.0);
}

#[test]
fn press_and_release_on_output_port_does_not_select_node() {
    let mut c = pair_canvas();
    let o1 = Vec2::new(290.0, 108.0);
    assert!(c.pointer_down(o1));
    let out = c.pointer_up(o1).unwrap();
    assert!(matches!(out.discard_reason(), Some(DiscardReason::Rejected(_))));
    // the browser follows up with a click on the same element
    assert_eq!(c.click(o1), ClickOutcome::Ignored);
    assert!(c.selection().node().is_none());
    assert!(c.drain_events().is_empty());
    // the node body is still selectable
    assert_eq!(c.click(Vec2::new(150.0, 70.0)), ClickOutcome::Selected);
    assert_eq!(c.selection().node(), Some("A"));
}

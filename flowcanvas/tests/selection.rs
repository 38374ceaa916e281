use flowcanvas::{Canvas, CanvasEvent, ClickOutcome, PortRef, Selection, ToolStatus, Vec2, Viewport};
use serde_json::json;

fn workflow_doc() -> serde_json::Value {
    json!({
        "nodes": [
            { "id": "m-in", "kind": "measurement", "role": "input", "position": { "x": 0.0, "y": 0.0 },
              "outputs": [
                  { "id": "d1", "label": "Run 1", "datasetId": "ds-1", "sampleId": "s-1" },
                  { "id": "d2", "label": "Run 2", "datasetId": "ds-2" }
              ] },
            { "id": "fit", "kind": "tool", "position": { "x": 400.0, "y": 0.0 },
              "inputs": [{ "id": "data", "label": "data" }],
              "outputs": [{ "id": "result", "label": "result" }] },
            { "id": "model", "kind": "model", "position": { "x": 800.0, "y": 0.0 },
              "inputs": [{ "id": "params", "label": "params" }] }
        ],
        "edges": [
            { "id": "e1", "source": "m-in", "sourceHandle": "d1", "target": "fit", "targetHandle": "data" }
        ]
    })
}

fn canvas() -> Canvas {
    let mut c = Canvas::new();
    c.assemble_json(workflow_doc()).unwrap();
    c.set_viewport(Viewport { width: 1400.0, height: 900.0, ..Viewport::default() });
    c
}

#[test]
fn assembly_auto_selects_first_input_dataset() {
    let mut c = canvas();
    let ds = c.selection().dataset().expect("auto-selected dataset");
    assert_eq!(ds.port, PortRef::new("m-in", "d1"));
    assert_eq!(ds.binding.sample_id.as_deref(), Some("s-1"));
    let events = c.drain_events();
    assert!(matches!(&events[..], [CanvasEvent::DatasetSelected { dataset: Some(_) }]));
}

#[test]
fn measurement_body_click_is_suppressed() {
    let mut c = canvas();
    c.deselect();
    c.drain_events();
    // header of the measurement node
    assert_eq!(c.click(Vec2::new(100.0, 20.0)), ClickOutcome::Suppressed);
    assert_eq!(c.selection(), &Selection::None);
    assert!(c.drain_events().is_empty());
}

#[test]
fn tool_and_model_clicks_select_and_toggle() {
    let mut c = canvas();
    c.drain_events();
    assert_eq!(c.click(Vec2::new(500.0, 20.0)), ClickOutcome::Selected);
    assert_eq!(c.selection().node(), Some("fit"));
    let events = c.drain_events();
    match &events[..] {
        [CanvasEvent::NodeSelected { node: Some(n) }, CanvasEvent::DatasetSelected { dataset: None }] => {
            assert_eq!(n.id, "fit");
        }
        other => panic!("unexpected events {:?}", other),
    }
    assert_eq!(c.click(Vec2::new(900.0, 20.0)), ClickOutcome::Selected);
    assert_eq!(c.selection().node(), Some("model"));
    assert_eq!(c.click_node("model"), ClickOutcome::Deselected);
    assert_eq!(c.selection(), &Selection::None);
}

#[test]
fn dataset_row_click_selects_binding() {
    let mut c = canvas();
    c.deselect();
    c.drain_events();
    // second output row of the measurement node: y = 44 + 28 + 14
    assert_eq!(c.click(Vec2::new(200.0, 86.0)), ClickOutcome::Selected);
    let ds = c.selection().dataset().unwrap();
    assert_eq!(ds.binding.dataset_id, "ds-2");
    // clicking the same row again deselects
    assert_eq!(c.click(Vec2::new(200.0, 86.0)), ClickOutcome::Deselected);
    assert!(c.selection().dataset().is_none());
}

#[test]
fn empty_canvas_click_keeps_selection() {
    let mut c = canvas();
    c.click_node("fit");
    assert_eq!(c.click(Vec2::new(600.0, 600.0)), ClickOutcome::Ignored);
    assert_eq!(c.selection().node(), Some("fit"));
}

#[test]
fn status_only_rendered_for_tools() {
    let mut c = canvas();
    assert!(c.set_tool_status("fit", ToolStatus::Running));
    assert!(!c.set_tool_status("model", ToolStatus::Running));
    let views = c.node_views();
    let fit = views.iter().find(|v| v.id == "fit").unwrap();
    assert_eq!(fit.status, Some(ToolStatus::Running));
    let m = views.iter().find(|v| v.id == "m-in").unwrap();
    assert!(m.status.is_none());
    assert!(m.ports.iter().any(|p| p.selected));
}

#[test]
fn reassembly_prunes_stale_selection() {
    let mut c = canvas();
    c.click_node("fit");
    c.drain_events();
    let doc = json!({
        "nodes": [{ "id": "other", "kind": "tool", "position": { "x": 0.0, "y": 0.0 } }],
        "edges": []
    });
    c.assemble_json(doc).unwrap();
    assert_eq!(c.selection(), &Selection::None);
    let events = c.drain_events();
    assert_eq!(events, vec![CanvasEvent::NodeSelected { node: None }]);
}

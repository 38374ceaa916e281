use crate::error;
use crate::interop::{self, new_obj, port_ref, set_kv, to_js, vec2};
use crate::{Canvas, ViewState};
use flowcanvas::panels::PanelSpec;
use flowcanvas::{CanvasConfig, DiscardReason, DragOutcome, ToolStatus};
use wasm_bindgen::prelude::*;
type JsValue = wasm_bindgen::JsValue;

#[wasm_bindgen]
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Routes core diagnostics to the browser console. `level` is one of
/// `off`, `error`, `warn`, `info`, `debug`, `trace`.
#[wasm_bindgen]
pub fn init_logging(level: &str) -> bool {
    match crate::logger::parse_level(level) {
        Some(filter) => {
            crate::logger::install(filter);
            true
        }
        None => false,
    }
}

fn outcome_js(o: &DragOutcome) -> JsValue {
    let obj = new_obj();
    set_kv(&obj, "committed", &JsValue::from_bool(o.is_committed()));
    match o {
        DragOutcome::Committed(c) => set_kv(&obj, "id", &JsValue::from_str(&c.id)),
        DragOutcome::Discarded(reason) => {
            let r = match reason {
                DiscardReason::NoTarget => "no_target",
                DiscardReason::Rejected(_) => "rejected",
                DiscardReason::LeftCanvas => "left_canvas",
                DiscardReason::Cancelled => "cancelled",
            };
            set_kv(&obj, "reason", &JsValue::from_str(r));
            if let DiscardReason::Rejected(e) = reason {
                set_kv(&obj, "error", &JsValue::from_str(e.code()));
            }
        }
    }
    obj.into()
}

fn opt_outcome(o: Option<DragOutcome>) -> JsValue {
    o.as_ref().map_or(JsValue::NULL, outcome_js)
}

fn parse_status(s: &str) -> Option<ToolStatus> {
    serde_json::from_value(serde_json::Value::String(s.to_string())).ok()
}

#[wasm_bindgen]
impl Canvas {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Canvas {
        crate::Canvas::rs_new()
    }
    /// Builds a canvas from a partial config object; missing fields take defaults.
    pub fn with_config(config: JsValue) -> Result<Canvas, JsValue> {
        let v = serde_wasm_bindgen::from_value::<serde_json::Value>(config)
            .map_err(|e| error::err("json_parse", format!("{}", e), None))?;
        let cfg = CanvasConfig::from_json_value(v).map_err(|e| error::from_graph_error(&e))?;
        Ok(Canvas { inner: flowcanvas::Canvas::with_config(cfg) })
    }
    pub fn geom_version(&self) -> u64 {
        self.rs_geom_version()
    }
    pub fn node_count(&self) -> u32 {
        self.inner.graph().node_count() as u32
    }
    pub fn connection_count(&self) -> u32 {
        self.inner.graph().connection_count() as u32
    }

    // Assembly + JSON
    pub fn assemble(&mut self, v: JsValue) -> bool {
        match serde_wasm_bindgen::from_value::<serde_json::Value>(v) {
            Ok(val) => self.inner.assemble_json(val).is_ok(),
            Err(_) => false,
        }
    }
    pub fn assemble_res(&mut self, v: JsValue) -> JsValue {
        match serde_wasm_bindgen::from_value::<serde_json::Value>(v) {
            Ok(val) => match self.inner.assemble_json(val) {
                Ok(report) => error::ok(to_js(&report)),
                Err(e) => error::from_graph_error(&e),
            },
            Err(e) => error::err("json_parse", format!("{}", e), None),
        }
    }
    pub fn to_json(&self) -> JsValue {
        to_js(&self.inner.description())
    }

    // Viewport
    pub fn set_viewport(&mut self, left: f32, top: f32, width: f32, height: f32) -> bool {
        let mut vp = *self.inner.viewport();
        vp.origin = vec2(left, top);
        vp.width = width;
        vp.height = height;
        self.inner.set_viewport(vp)
    }
    pub fn set_viewport_res(&mut self, left: f32, top: f32, width: f32, height: f32) -> JsValue {
        for (name, v) in [("left", left), ("top", top), ("width", width), ("height", height)] {
            if !v.is_finite() {
                return error::non_finite(name);
            }
        }
        error::ok(JsValue::from_bool(self.set_viewport(left, top, width, height)))
    }
    pub fn set_scroll(&mut self, x: f32, y: f32) -> bool {
        self.inner.set_scroll(x, y)
    }
    pub fn set_scroll_res(&mut self, x: f32, y: f32) -> JsValue {
        if !x.is_finite() {
            return error::non_finite("x");
        }
        if !y.is_finite() {
            return error::non_finite("y");
        }
        error::ok(JsValue::from_bool(self.inner.set_scroll(x, y)))
    }

    // Pointer gestures, in client coordinates
    pub fn pointer_down(&mut self, x: f32, y: f32) -> bool {
        self.inner.pointer_down(vec2(x, y))
    }
    pub fn port_pointer_down(&mut self, node_id: &str, port_id: &str, x: f32, y: f32) -> bool {
        self.inner.port_pointer_down(&port_ref(node_id, port_id), vec2(x, y))
    }
    pub fn pointer_move(&mut self, x: f32, y: f32) -> bool {
        self.inner.pointer_move(vec2(x, y))
    }
    pub fn pointer_up(&mut self, x: f32, y: f32) -> JsValue {
        opt_outcome(self.inner.pointer_up(vec2(x, y)))
    }
    pub fn port_pointer_up(&mut self, node_id: &str, port_id: &str, x: f32, y: f32) -> JsValue {
        opt_outcome(self.inner.port_pointer_up(&port_ref(node_id, port_id), vec2(x, y)))
    }
    pub fn pointer_leave(&mut self) -> JsValue {
        opt_outcome(self.inner.pointer_leave())
    }
    pub fn cancel_drag(&mut self) -> JsValue {
        opt_outcome(self.inner.cancel_drag())
    }
    pub fn is_dragging(&self) -> bool {
        !matches!(self.inner.drag_state(), flowcanvas::DragState::Idle)
    }

    // Selection
    pub fn click(&mut self, x: f32, y: f32) -> JsValue {
        to_js(&self.inner.click(vec2(x, y)))
    }
    pub fn click_node(&mut self, id: &str) -> JsValue {
        to_js(&self.inner.click_node(id))
    }
    pub fn click_port(&mut self, node_id: &str, port_id: &str) -> JsValue {
        to_js(&self.inner.click_port(&port_ref(node_id, port_id)))
    }
    pub fn deselect(&mut self) -> bool {
        self.inner.deselect()
    }
    pub fn selection(&self) -> JsValue {
        to_js(self.inner.selection())
    }

    // Edits
    pub fn add_connection(&mut self, src_node: &str, src_port: &str, dst_node: &str, dst_port: &str) -> Option<String> {
        self.inner
            .add_connection(&port_ref(src_node, src_port), &port_ref(dst_node, dst_port))
            .ok()
    }
    pub fn add_connection_res(&mut self, src_node: &str, src_port: &str, dst_node: &str, dst_port: &str) -> JsValue {
        match self.inner.add_connection(&port_ref(src_node, src_port), &port_ref(dst_node, dst_port)) {
            Ok(id) => error::ok(JsValue::from_str(&id)),
            Err(e) => error::from_graph_error(&e),
        }
    }
    pub fn delete_connection(&mut self, id: &str) -> bool {
        self.inner.delete_connection(id)
    }
    pub fn remove_node(&mut self, id: &str) -> bool {
        self.inner.remove_node(id)
    }
    pub fn remove_node_res(&mut self, id: &str) -> JsValue {
        if self.inner.graph().node(id).is_none() {
            return error::unknown_node(id);
        }
        error::ok(JsValue::from_bool(self.inner.remove_node(id)))
    }
    pub fn move_node(&mut self, id: &str, x: f32, y: f32) -> bool {
        self.inner.move_node(id, x, y)
    }
    pub fn move_node_res(&mut self, id: &str, x: f32, y: f32) -> JsValue {
        if !x.is_finite() {
            return error::non_finite("x");
        }
        if !y.is_finite() {
            return error::non_finite("y");
        }
        if self.inner.graph().node(id).is_none() {
            return error::unknown_node(id);
        }
        error::ok(JsValue::from_bool(self.inner.move_node(id, x, y)))
    }
    pub fn set_tool_status(&mut self, id: &str, status: &str) -> bool {
        match parse_status(status) {
            Some(s) => self.inner.set_tool_status(id, s),
            None => false,
        }
    }
    pub fn set_tool_status_res(&mut self, id: &str, status: &str) -> JsValue {
        let Some(s) = parse_status(status) else {
            return error::invalid_status(status);
        };
        if self.inner.graph().node(id).is_none() {
            return error::unknown_node(id);
        }
        error::ok(JsValue::from_bool(self.inner.set_tool_status(id, s)))
    }

    // Rendering + picking
    pub fn frame(&self, view: &ViewState) -> JsValue {
        to_js(&self.inner.frame(&view.inner))
    }
    pub fn connection_paths(&self) -> JsValue {
        let paths: Vec<String> = self.inner.connection_views().into_iter().map(|v| v.d).collect();
        interop::arr_str(&paths).into()
    }
    pub fn port_position(&self, node_id: &str, port_id: &str) -> JsValue {
        match self.inner.graph().resolve_port_position(node_id, port_id) {
            Some(p) => to_js(&p),
            None => JsValue::NULL,
        }
    }
    pub fn pick(&self, x: f32, y: f32) -> JsValue {
        match self.inner.pick(vec2(x, y)) {
            Some(p) => to_js(&p),
            None => JsValue::NULL,
        }
    }
    pub fn pick_res(&self, x: f32, y: f32) -> JsValue {
        if !x.is_finite() {
            return error::non_finite("x");
        }
        if !y.is_finite() {
            return error::non_finite("y");
        }
        error::ok(self.pick(x, y))
    }

    /// Outbound notifications since the last call, oldest first.
    pub fn drain_events(&mut self) -> JsValue {
        to_js(&self.inner.drain_events())
    }
}

#[wasm_bindgen]
impl ViewState {
    /// Viewer panel docked left, catalogue panel docked right.
    #[wasm_bindgen(constructor)]
    pub fn new() -> ViewState {
        ViewState { inner: flowcanvas::panels::ViewState::workflow_default() }
    }
    pub fn register_res(&mut self, name: &str, spec: JsValue) -> JsValue {
        match serde_wasm_bindgen::from_value::<PanelSpec>(spec) {
            Ok(spec) => error::ok(to_js(self.inner.register(name, spec))),
            Err(e) => error::err("json_parse", format!("{}", e), None),
        }
    }
    pub fn is_collapsed(&self, name: &str) -> bool {
        self.inner.is_collapsed(name)
    }
    pub fn toggle(&mut self, name: &str) -> bool {
        self.inner.panel_mut(name).map_or(false, |p| p.toggle())
    }
    pub fn toggle_res(&mut self, name: &str) -> JsValue {
        match self.inner.panel_mut(name) {
            Some(p) => error::ok(JsValue::from_bool(p.toggle())),
            None => error::unknown_panel(name),
        }
    }
    pub fn size(&self, name: &str) -> Option<f32> {
        self.inner.panel(name).map(|p| p.visible_size())
    }
    pub fn set_size_res(&mut self, name: &str, size: f32) -> JsValue {
        if !size.is_finite() {
            return error::non_finite("size");
        }
        match self.inner.panel_mut(name) {
            Some(p) => error::ok(JsValue::from_f64(p.set_size(size) as f64)),
            None => error::unknown_panel(name),
        }
    }
    pub fn begin_resize(&mut self, name: &str, pointer: f32) -> bool {
        self.inner.panel_mut(name).map_or(false, |p| p.begin_resize(pointer))
    }
    pub fn update_resize(&mut self, name: &str, pointer: f32) -> Option<f32> {
        self.inner.panel_mut(name).map(|p| p.update_resize(pointer))
    }
    pub fn end_resize(&mut self, name: &str) {
        if let Some(p) = self.inner.panel_mut(name) {
            p.end_resize();
        }
    }
    pub fn to_json(&self) -> JsValue {
        to_js(&self.inner)
    }
}

use crate::interop::{new_obj, set_kv};
use flowcanvas::{EndpointReason, GraphError};
use wasm_bindgen::prelude::*;

pub fn ok(v: JsValue) -> JsValue {
    let o = new_obj();
    set_kv(&o, "ok", &JsValue::from_bool(true));
    set_kv(&o, "value", &v);
    o.into()
}

pub fn err(code: &'static str, message: impl Into<String>, data: Option<JsValue>) -> JsValue {
    let root = new_obj();
    set_kv(&root, "ok", &JsValue::from_bool(false));
    let e = new_obj();
    set_kv(&e, "code", &JsValue::from_str(code));
    set_kv(&e, "message", &JsValue::from_str(&message.into()));
    if let Some(d) = data { set_kv(&e, "data", &d); }
    set_kv(&root, "error", &e.into());
    root.into()
}

#[inline]
pub fn non_finite(param: &str) -> JsValue {
    let d = new_obj(); set_kv(&d, "param", &JsValue::from_str(param));
    err("non_finite", format!("parameter '{}' must be finite", param), Some(d.into()))
}

#[inline]
pub fn unknown_node(id: &str) -> JsValue {
    from_graph_error(&GraphError::UnknownNode(id.to_string()))
}

#[inline]
pub fn unknown_panel(name: &str) -> JsValue {
    let d = new_obj(); set_kv(&d, "panel", &JsValue::from_str(name));
    err("unknown_panel", format!("no panel named '{}'", name), Some(d.into()))
}

#[inline]
pub fn invalid_status(got: &str) -> JsValue {
    let d = new_obj(); set_kv(&d, "got", &JsValue::from_str(got));
    err("invalid_status", "status must be pending, running, completed or error", Some(d.into()))
}

/// Error envelope carrying the core error's stable code and the offending ids.
pub fn from_graph_error(e: &GraphError) -> JsValue {
    let d = new_obj();
    match e {
        GraphError::InvalidEndpoint { node, port, reason } => {
            set_kv(&d, "node", &JsValue::from_str(node));
            set_kv(&d, "port", &JsValue::from_str(port));
            set_kv(&d, "reason", &JsValue::from_str(reason_code(*reason)));
        }
        GraphError::UnknownNode(id) | GraphError::UnknownConnection(id) | GraphError::DuplicateNode(id) => {
            set_kv(&d, "id", &JsValue::from_str(id));
        }
        GraphError::DuplicatePort { node, port } => {
            set_kv(&d, "node", &JsValue::from_str(node));
            set_kv(&d, "port", &JsValue::from_str(port));
        }
        GraphError::NonFinite(param) => set_kv(&d, "param", &JsValue::from_str(param)),
        GraphError::LimitExceeded { what, max } => {
            set_kv(&d, "what", &JsValue::from_str(what));
            set_kv(&d, "max", &JsValue::from_f64(*max as f64));
        }
        GraphError::InvalidConfig(_) | GraphError::Json(_) => return err(e.code(), e.to_string(), None),
    }
    err(e.code(), e.to_string(), Some(d.into()))
}

fn reason_code(r: EndpointReason) -> &'static str {
    match r {
        EndpointReason::UnknownNode => "unknown_node",
        EndpointReason::UnknownPort => "unknown_port",
        EndpointReason::NotAnOutput => "not_an_output",
        EndpointReason::NotAnInput => "not_an_input",
        EndpointReason::SameNode => "same_node",
    }
}

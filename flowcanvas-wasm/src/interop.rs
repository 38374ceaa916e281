use flowcanvas::{PortRef, Vec2};
use js_sys::{Array, Object, Reflect};
use serde::Serialize;
use wasm_bindgen::JsValue;

pub fn new_obj() -> Object { Object::new() }
pub fn set_kv(obj: &Object, k: &str, v: &JsValue) {
    let _ = Reflect::set(obj, &JsValue::from_str(k), v);
}

/// Serializes plain data; maps become JS objects so hosts can use dot access.
pub fn to_js<T: Serialize + ?Sized>(v: &T) -> JsValue {
    let ser = serde_wasm_bindgen::Serializer::json_compatible();
    v.serialize(&ser).unwrap_or(JsValue::NULL)
}

pub fn arr_str(items: &[String]) -> Array {
    items.iter().map(|s| JsValue::from_str(s)).collect()
}

pub fn port_ref(node_id: &str, port_id: &str) -> PortRef { PortRef::new(node_id, port_id) }

pub fn vec2(x: f32, y: f32) -> Vec2 { Vec2::new(x, y) }

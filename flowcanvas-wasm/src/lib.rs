use wasm_bindgen::prelude::*;
mod api;
mod error;
mod interop;
mod logger;

pub use logger::ConsoleLogger;

#[wasm_bindgen]
pub struct Canvas { pub(crate) inner: flowcanvas::Canvas }

/// Panel sizes and collapse flags shared by the canvas and its sibling panels.
#[wasm_bindgen]
pub struct ViewState { pub(crate) inner: flowcanvas::panels::ViewState }

impl Canvas {
    pub fn rs_new() -> Canvas { Canvas { inner: flowcanvas::Canvas::new() } }
    pub fn rs_geom_version(&self) -> u64 { self.inner.graph().geom_version() }
}

//! The canvas surface: owns the graph, the port registry, the drag controller
//! and the selection, and turns viewport pointer events into edits.
//!
//! All geometry below this layer is canvas-local. Pointer events arrive in
//! viewport coordinates and are translated once, here, by [`Viewport::to_local`].

use crate::algorithms::picking::{self, Pick};
use crate::config::CanvasConfig;
use crate::drag::{DragController, DragOutcome, DragState};
use crate::model::{
    BoundDataset, DatasetBinding, Node, NodeKind, NodeRole, PortDirection, PortRef, Rect,
    ToolStatus, Vec2,
};
use crate::panels::ViewState;
use crate::registry::PortRegistry;
use crate::render::{self, ConnectionView};
use crate::selection::{KindBehavior, Selection, SelectionChange};
use crate::wire::{EdgeDesc, GraphDescription, LoadReport, NodeDesc};
use crate::{Graph, GraphError};
use log::debug;
use serde::Serialize;
use std::cell::RefCell;

/// Placement of the scrollable canvas inside the browser viewport.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    /// Top-left of the canvas element's bounding box, in client coordinates.
    pub origin: Vec2,
    pub scroll: Vec2,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn to_local(&self, client: Vec2) -> Vec2 {
        client.sub(self.origin).add(self.scroll)
    }
}

/// Notifications for sibling panels, drained by the host after each gesture.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CanvasEvent {
    NodeSelected { node: Option<NodeDesc> },
    DatasetSelected { dataset: Option<BoundDataset> },
    ConnectionAdded { edge: EdgeDesc },
    ConnectionRemoved { id: String },
    NodeRemoved { id: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ClickOutcome {
    /// Nothing selectable under the pointer.
    Ignored,
    /// The click landed on a node whose kind forbids body selection.
    Suppressed,
    Selected,
    Deselected,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortView {
    pub id: String,
    pub direction: PortDirection,
    pub label: String,
    pub position: Vec2,
    pub row: Rect,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset: Option<DatasetBinding>,
    pub selected: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeView {
    pub id: String,
    pub kind: NodeKind,
    pub role: NodeRole,
    pub title: String,
    pub rect: Rect,
    pub behavior: KindBehavior,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ToolStatus>,
    pub selected: bool,
    pub ports: Vec<PortView>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Insets {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
}

/// Everything needed to draw one frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasFrame {
    pub geom_version: u64,
    pub plane: Rect,
    pub visible: Rect,
    pub insets: Insets,
    pub nodes: Vec<NodeView>,
    pub connections: Vec<ConnectionView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<ConnectionView>,
    pub selection: Selection,
}

pub struct Canvas {
    graph: Graph,
    config: CanvasConfig,
    viewport: Viewport,
    drag: DragController,
    selection: Selection,
    hovered: Option<String>,
    // Port positions keyed on the graph version they were built for
    registry: RefCell<Option<PortRegistry>>,
    events: Vec<CanvasEvent>,
}

impl Default for Canvas {
    fn default() -> Self {
        Canvas::new()
    }
}

impl Canvas {
    pub fn new() -> Self {
        Canvas::with_config(CanvasConfig::default())
    }

    pub fn with_config(config: CanvasConfig) -> Self {
        Canvas {
            graph: Graph::with_layout(config.layout),
            config,
            viewport: Viewport::default(),
            drag: DragController::new(),
            selection: Selection::None,
            hovered: None,
            registry: RefCell::new(None),
            events: Vec::new(),
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn drag_state(&self) -> &DragState {
        self.drag.state()
    }

    pub fn hovered_connection(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    pub fn set_viewport(&mut self, viewport: Viewport) -> bool {
        if !viewport.origin.is_finite()
            || !viewport.scroll.is_finite()
            || !viewport.width.is_finite()
            || !viewport.height.is_finite()
        {
            return false;
        }
        self.viewport = viewport;
        true
    }

    pub fn set_scroll(&mut self, x: f32, y: f32) -> bool {
        if !x.is_finite() || !y.is_finite() {
            return false;
        }
        self.viewport.scroll = Vec2 { x, y };
        true
    }

    fn with_registry<R>(&self, f: impl FnOnce(&PortRegistry) -> R) -> R {
        let mut slot = self.registry.borrow_mut();
        let stale = slot.as_ref().map_or(true, |r| !r.is_current(&self.graph));
        if stale {
            *slot = Some(PortRegistry::build(&self.graph));
        }
        match slot.as_ref() {
            Some(reg) => f(reg),
            None => f(&PortRegistry::build(&self.graph)),
        }
    }

    /// Port positions for the current graph version.
    pub fn port_registry(&self) -> PortRegistry {
        self.with_registry(|r| r.clone())
    }

    pub fn pick_local(&self, p: Vec2) -> Option<Pick> {
        self.with_registry(|reg| {
            picking::pick_impl(&self.graph, reg, &self.config.curve, p, self.config.port_hit_slop)
        })
    }

    pub fn pick(&self, client: Vec2) -> Option<Pick> {
        self.pick_local(self.viewport.to_local(client))
    }

    fn port_at_local(&self, p: Vec2) -> Option<PortRef> {
        self.with_registry(|reg| {
            match picking::pick_port(&self.graph, reg, p, self.config.port_hit_slop) {
                Some(Pick::Port { port, .. }) => Some(port),
                _ => None,
            }
        })
    }

    fn emit_selection(&mut self, change: SelectionChange) {
        if let Some(node) = change.node {
            let node = node.and_then(|id| self.graph.node(&id).map(NodeDesc::from));
            self.events.push(CanvasEvent::NodeSelected { node });
        }
        if let Some(dataset) = change.dataset {
            self.events.push(CanvasEvent::DatasetSelected { dataset });
        }
    }

    pub fn drain_events(&mut self) -> Vec<CanvasEvent> {
        std::mem::take(&mut self.events)
    }

    // Assembly
    /// Replaces the whole graph. On error the canvas is left untouched.
    pub fn assemble(&mut self, desc: GraphDescription) -> Result<LoadReport, GraphError> {
        let (mut graph, report) = Graph::from_description(desc, self.config.layout)?;
        // keep versions monotonic across reassembly so old registries read as stale
        graph.geom_ver = self.graph.geom_ver.wrapping_add(graph.geom_ver);
        self.graph = graph;
        self.registry.replace(None);
        self.drag.cancel();
        self.hovered = None;
        let pruned = self.selection.prune(&self.graph);
        self.emit_selection(pruned);
        let auto = self.selection.auto_select(&self.graph);
        self.emit_selection(auto);
        Ok(report)
    }

    pub fn assemble_json(&mut self, v: serde_json::Value) -> Result<LoadReport, GraphError> {
        let desc: GraphDescription = serde_json::from_value(v)?;
        self.assemble(desc)
    }

    pub fn description(&self) -> GraphDescription {
        self.graph.to_description()
    }

    // Pointer gestures
    /// Returns `true` when a drag started; the host must stop propagation so
    /// the node underneath does not also receive a click.
    pub fn pointer_down(&mut self, client: Vec2) -> bool {
        let local = self.viewport.to_local(client);
        let hit = self.port_at_local(local);
        self.drag.pointer_down(&self.graph, hit.as_ref(), local)
    }

    /// Pointer-down delivered by a specific port element.
    pub fn port_pointer_down(&mut self, port: &PortRef, client: Vec2) -> bool {
        let local = self.viewport.to_local(client);
        self.drag.pointer_down(&self.graph, Some(port), local)
    }

    /// Returns `true` when something visible changed (preview moved or hover changed).
    pub fn pointer_move(&mut self, client: Vec2) -> bool {
        let local = self.viewport.to_local(client);
        if self.drag.pointer_move(local) {
            return true;
        }
        let hovered = match self.pick_local(local) {
            Some(Pick::Connection { id, .. }) => Some(id),
            _ => None,
        };
        if hovered != self.hovered {
            self.hovered = hovered;
            return true;
        }
        false
    }

    pub fn pointer_up(&mut self, client: Vec2) -> Option<DragOutcome> {
        if !self.drag.is_dragging() {
            return None;
        }
        let local = self.viewport.to_local(client);
        let hit = self.port_at_local(local);
        self.finish_drag(hit, local)
    }

    /// Pointer-up delivered by a specific port element.
    pub fn port_pointer_up(&mut self, port: &PortRef, client: Vec2) -> Option<DragOutcome> {
        let local = self.viewport.to_local(client);
        self.finish_drag(Some(port.clone()), local)
    }

    fn finish_drag(&mut self, hit: Option<PortRef>, local: Vec2) -> Option<DragOutcome> {
        let before = self.graph.geom_version();
        let outcome = self.drag.pointer_up(&mut self.graph, hit.as_ref(), local)?;
        if let DragOutcome::Committed(c) = &outcome {
            // an existing identical connection leaves the version untouched
            if self.graph.geom_version() != before {
                self.events.push(CanvasEvent::ConnectionAdded { edge: EdgeDesc::from(c) });
            }
        }
        Some(outcome)
    }

    /// The pointer left the canvas: any drag in progress is discarded.
    pub fn pointer_leave(&mut self) -> Option<DragOutcome> {
        self.hovered = None;
        self.drag.pointer_leave()
    }

    pub fn cancel_drag(&mut self) -> Option<DragOutcome> {
        self.drag.cancel()
    }

    // Selection
    /// Click at a viewport position: dataset-bound port rows first, then node bodies.
    ///
    /// A port without a dataset binding belongs to the connect gesture, so the
    /// click that follows its press and release never selects the node.
    pub fn click(&mut self, client: Vec2) -> ClickOutcome {
        let local = self.viewport.to_local(client);
        match self.pick_local(local) {
            Some(Pick::Port { port, .. }) => self.click_port(&port),
            Some(Pick::Node { id }) => match self.dataset_row_at(&id, local) {
                Some(port) => self.click_port(&port),
                None => self.click_node(&id),
            },
            _ => ClickOutcome::Ignored,
        }
    }

    /// Dataset-bound port whose row contains `p`; the half of the row picks the side.
    fn dataset_row_at(&self, node_id: &str, p: Vec2) -> Option<PortRef> {
        let node = self.graph.node(node_id)?;
        let layout = &self.config.layout;
        let top = node.position.y + layout.header_height;
        if p.y < top {
            return None;
        }
        let row = ((p.y - top) / layout.port_row_height) as usize;
        let left_half = p.x < node.position.x + 0.5 * layout.node_width;
        let (near, far) = if left_half {
            (&node.inputs, &node.outputs)
        } else {
            (&node.outputs, &node.inputs)
        };
        [near.get(row), far.get(row)]
            .into_iter()
            .flatten()
            .find(|port| port.dataset.is_some())
            .map(|port| PortRef::new(node.id.clone(), port.id.clone()))
    }

    pub fn click_node(&mut self, id: &str) -> ClickOutcome {
        let Some(node) = self.graph.node(id) else {
            return ClickOutcome::Ignored;
        };
        match self.selection.click_node(node) {
            None => ClickOutcome::Suppressed,
            Some(change) => {
                let outcome = if self.selection.node() == Some(id) {
                    ClickOutcome::Selected
                } else {
                    ClickOutcome::Deselected
                };
                self.emit_selection(change);
                outcome
            }
        }
    }

    /// Selects the dataset binding carried by `port`; ports without one are ignored.
    pub fn click_port(&mut self, port: &PortRef) -> ClickOutcome {
        let Some(binding) = self.graph.port(port).and_then(|p| p.dataset.clone()) else {
            return ClickOutcome::Ignored;
        };
        let change = self.selection.click_dataset(BoundDataset {
            port: port.clone(),
            binding,
        });
        let outcome = if self.selection.dataset().is_some() {
            ClickOutcome::Selected
        } else {
            ClickOutcome::Deselected
        };
        self.emit_selection(change);
        outcome
    }

    pub fn deselect(&mut self) -> bool {
        let change = self.selection.clear();
        let changed = !change.is_empty();
        self.emit_selection(change);
        changed
    }

    // Edits
    /// Hover-delete affordance. Unknown ids are a no-op.
    pub fn delete_connection(&mut self, id: &str) -> bool {
        if self.hovered.as_deref() == Some(id) {
            self.hovered = None;
        }
        match self.graph.remove_connection(id) {
            Some(c) => {
                self.events.push(CanvasEvent::ConnectionRemoved { id: c.id });
                true
            }
            None => {
                debug!("delete of unknown connection '{}' ignored", id);
                false
            }
        }
    }

    pub fn remove_node(&mut self, id: &str) -> bool {
        let Some((node, dropped)) = self.graph.remove_node(id) else {
            return false;
        };
        if self.drag.session().map_or(false, |s| s.source.node_id == node.id) {
            self.drag.cancel();
        }
        if let Some(h) = &self.hovered {
            if dropped.iter().any(|c| &c.id == h) {
                self.hovered = None;
            }
        }
        for c in dropped {
            self.events.push(CanvasEvent::ConnectionRemoved { id: c.id });
        }
        self.events.push(CanvasEvent::NodeRemoved { id: node.id });
        let pruned = self.selection.prune(&self.graph);
        self.emit_selection(pruned);
        true
    }

    pub fn move_node(&mut self, id: &str, x: f32, y: f32) -> bool {
        self.graph.move_node(id, x, y)
    }

    pub fn set_tool_status(&mut self, id: &str, status: ToolStatus) -> bool {
        self.graph.set_tool_status(id, status)
    }

    pub fn add_connection(&mut self, source: &PortRef, target: &PortRef) -> Result<String, GraphError> {
        let before = self.graph.geom_version();
        let c = self.graph.add_connection(source, target)?;
        if self.graph.geom_version() != before {
            self.events.push(CanvasEvent::ConnectionAdded { edge: EdgeDesc::from(&c) });
        }
        Ok(c.id)
    }

    // Views
    fn node_view(&self, node: &Node) -> NodeView {
        let layout = &self.config.layout;
        let selected_port = self.selection.dataset().map(|d| &d.port);
        let mut ports = Vec::with_capacity(node.inputs.len() + node.outputs.len());
        for dir in [PortDirection::Input, PortDirection::Output] {
            for (i, p) in node.ports(dir).iter().enumerate() {
                let selected = selected_port
                    .map_or(false, |r| r.node_id == node.id && r.port_id == p.id);
                ports.push(PortView {
                    id: p.id.clone(),
                    direction: dir,
                    label: p.label.clone(),
                    position: layout.port_position(node.position, i, dir),
                    row: layout.port_row_rect(node.position, i),
                    dataset: p.dataset.clone(),
                    selected,
                });
            }
        }
        let behavior = *node.kind.behavior();
        NodeView {
            id: node.id.clone(),
            kind: node.kind,
            role: node.role,
            title: node.label.clone().unwrap_or_else(|| node.id.clone()),
            rect: layout.node_rect(node),
            behavior,
            status: if behavior.shows_status { node.status } else { None },
            selected: self.selection.node() == Some(node.id.as_str()),
            ports,
        }
    }

    /// Node views in render order (later entries draw on top).
    pub fn node_views(&self) -> Vec<NodeView> {
        self.graph.nodes().iter().map(|n| self.node_view(n)).collect()
    }

    pub fn connection_views(&self) -> Vec<ConnectionView> {
        render::connection_views(&self.graph, &self.config.curve, self.hovered.as_deref())
    }

    pub fn drag_preview(&self) -> Option<ConnectionView> {
        render::drag_view(&self.graph, &self.drag, &self.config.curve)
    }

    /// Size of the scrollable plane: node bounds plus margin, at least the viewport.
    pub fn plane_extent(&self) -> Rect {
        let m = self.config.plane_margin;
        let (mut minx, mut miny) = (0.0f32, 0.0f32);
        let (mut maxx, mut maxy) = (self.viewport.width.max(0.0), self.viewport.height.max(0.0));
        for n in self.graph.nodes() {
            let r = self.config.layout.node_rect(n);
            minx = minx.min(r.x - m);
            miny = miny.min(r.y - m);
            maxx = maxx.max(r.right() + m);
            maxy = maxy.max(r.bottom() + m);
        }
        Rect { x: minx, y: miny, w: maxx - minx, h: maxy - miny }
    }

    /// Part of the plane not covered by expanded side panels, in canvas-local coordinates.
    pub fn visible_rect(&self, view: &ViewState) -> Rect {
        let (left, right) = view.horizontal_insets();
        let bottom = view.bottom_inset();
        Rect {
            x: self.viewport.scroll.x + left,
            y: self.viewport.scroll.y,
            w: (self.viewport.width - left - right).max(0.0),
            h: (self.viewport.height - bottom).max(0.0),
        }
    }

    pub fn frame(&self, view: &ViewState) -> CanvasFrame {
        let (left, right) = view.horizontal_insets();
        CanvasFrame {
            geom_version: self.graph.geom_version(),
            plane: self.plane_extent(),
            visible: self.visible_rect(view),
            insets: Insets { left, right, bottom: view.bottom_inset() },
            nodes: self.node_views(),
            connections: self.connection_views(),
            preview: self.drag_preview(),
            selection: self.selection.clone(),
        }
    }
}

pub mod canvas;
pub mod config;
pub mod drag;
pub mod error;
pub mod model;
pub mod panels;
pub mod registry;
pub mod render;
pub mod selection;
pub mod wire;
pub mod geometry {
    pub mod curve;
    pub mod layout;
    pub mod limits;
    pub mod tolerance;
}
pub mod algorithms {
    pub mod picking;
}

pub use canvas::{Canvas, CanvasEvent, ClickOutcome, Viewport};
pub use config::CanvasConfig;
pub use drag::{DiscardReason, DragController, DragOutcome, DragSession, DragState};
pub use error::{EndpointReason, GraphError};
pub use model::{
    BoundDataset, Connection, DatasetBinding, Node, NodeKind, NodeRole, Port, PortDirection,
    PortRef, Rect, ToolStatus, Vec2, WirePosition,
};
pub use selection::Selection;
pub use wire::{GraphDescription, LoadReport};

use geometry::layout::LayoutConfig;
use geometry::limits;
use log::debug;

/// The authoritative set of nodes, ports and connections.
///
/// Node order is significant: it is the render order (later nodes draw on
/// top) and the order used when searching for the first dataset binding.
#[derive(Clone, Debug)]
pub struct Graph {
    pub(crate) nodes: Vec<Node>,
    pub(crate) connections: Vec<Connection>,
    pub(crate) layout: LayoutConfig,
    pub(crate) geom_ver: u64,
    pub(crate) next_conn_seq: u64,
}

impl Default for Graph {
    fn default() -> Self {
        Graph::new()
    }
}

impl Graph {
    pub fn new() -> Self {
        Graph::with_layout(LayoutConfig::default())
    }

    pub fn with_layout(layout: LayoutConfig) -> Self {
        Graph {
            nodes: Vec::new(),
            connections: Vec::new(),
            layout,
            geom_ver: 1,
            next_conn_seq: 1,
        }
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Monotonic version; increments on every node, port or connection edit.
    pub fn geom_version(&self) -> u64 {
        self.geom_ver
    }

    fn bump(&mut self) {
        self.geom_ver = self.geom_ver.wrapping_add(1);
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.connections.clear();
        self.next_conn_seq = 1;
        self.bump();
    }

    // Nodes
    pub fn add_node(&mut self, node: Node) -> Result<(), GraphError> {
        if self.nodes.len() >= limits::MAX_NODES {
            return Err(GraphError::LimitExceeded {
                what: "nodes",
                max: limits::MAX_NODES,
            });
        }
        if !limits::in_coord_bounds(node.position.x) {
            return Err(GraphError::NonFinite(format!("{}.position.x", node.id)));
        }
        if !limits::in_coord_bounds(node.position.y) {
            return Err(GraphError::NonFinite(format!("{}.position.y", node.id)));
        }
        if self.node_index(&node.id).is_some() {
            return Err(GraphError::DuplicateNode(node.id));
        }
        if node.inputs.len() + node.outputs.len() > limits::MAX_PORTS_PER_NODE {
            return Err(GraphError::LimitExceeded {
                what: "ports",
                max: limits::MAX_PORTS_PER_NODE,
            });
        }
        let mut seen = std::collections::HashSet::new();
        for p in node.all_ports() {
            if !seen.insert(p.id.as_str()) {
                return Err(GraphError::DuplicatePort {
                    node: node.id.clone(),
                    port: p.id.clone(),
                });
            }
        }
        self.nodes.push(node);
        self.bump();
        Ok(())
    }

    pub(crate) fn node_index(&self, id: &str) -> Option<usize> {
        self.nodes.iter().position(|n| n.id == id)
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn move_node(&mut self, id: &str, x: f32, y: f32) -> bool {
        if !limits::in_coord_bounds(x) || !limits::in_coord_bounds(y) {
            return false;
        }
        let Some(n) = self.nodes.iter_mut().find(|n| n.id == id) else {
            return false;
        };
        if n.position == (Vec2 { x, y }) {
            return true;
        }
        n.position = Vec2 { x, y };
        n.wire_position = None;
        self.bump();
        true
    }

    /// Removes the node and every connection that references it in one step.
    pub fn remove_node(&mut self, id: &str) -> Option<(Node, Vec<Connection>)> {
        let idx = self.node_index(id)?;
        let node = self.nodes.remove(idx);
        let (dropped, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.connections)
            .into_iter()
            .partition(|c| c.involves_node(id));
        self.connections = kept;
        debug!("removed node '{}' and {} incident connection(s)", id, dropped.len());
        self.bump();
        Some((node, dropped))
    }

    pub fn set_tool_status(&mut self, id: &str, status: ToolStatus) -> bool {
        match self.nodes.iter_mut().find(|n| n.id == id) {
            Some(n) if n.kind == NodeKind::Tool => {
                n.status = Some(status);
                true
            }
            _ => false,
        }
    }

    // Ports
    pub fn port(&self, r: &PortRef) -> Option<&Port> {
        self.node(&r.node_id)?.find_port(&r.port_id).map(|(_, p)| p)
    }

    /// Canvas-local position of a port, derived from its node's current position.
    pub fn resolve_port_position(&self, node_id: &str, port_id: &str) -> Option<Vec2> {
        let node = self.node(node_id)?;
        let (index, port) = node.find_port(port_id)?;
        Some(self.layout.port_position(node.position, index, port.direction))
    }

    /// Every dataset-bound port, in node order then port order (inputs before outputs).
    pub fn datasets(&self) -> impl Iterator<Item = (&Node, &Port, &DatasetBinding)> {
        self.nodes.iter().flat_map(|n| {
            n.all_ports()
                .filter_map(move |p| p.dataset.as_ref().map(|d| (n, p, d)))
        })
    }

    // Connections
    fn check_endpoint(
        &self,
        r: &PortRef,
        want: PortDirection,
    ) -> Result<(), GraphError> {
        let node = self
            .node(&r.node_id)
            .ok_or_else(|| GraphError::endpoint(&r.node_id, &r.port_id, EndpointReason::UnknownNode))?;
        let (_, port) = node
            .find_port(&r.port_id)
            .ok_or_else(|| GraphError::endpoint(&r.node_id, &r.port_id, EndpointReason::UnknownPort))?;
        if port.direction != want {
            let reason = match want {
                PortDirection::Output => EndpointReason::NotAnOutput,
                PortDirection::Input => EndpointReason::NotAnInput,
            };
            return Err(GraphError::endpoint(&r.node_id, &r.port_id, reason));
        }
        Ok(())
    }

    fn validate_connection(&self, source: &PortRef, target: &PortRef) -> Result<(), GraphError> {
        self.check_endpoint(source, PortDirection::Output)?;
        self.check_endpoint(target, PortDirection::Input)?;
        if source.node_id == target.node_id {
            return Err(GraphError::endpoint(
                &target.node_id,
                &target.port_id,
                EndpointReason::SameNode,
            ));
        }
        Ok(())
    }

    fn fresh_connection_id(&mut self) -> String {
        loop {
            let id = format!("edge-{}", self.next_conn_seq);
            self.next_conn_seq += 1;
            if self.connection(&id).is_none() {
                return id;
            }
        }
    }

    /// Connects an output port to an input port.
    ///
    /// Nothing is mutated on error. Connecting the same pair twice returns
    /// the existing connection.
    pub fn add_connection(
        &mut self,
        source: &PortRef,
        target: &PortRef,
    ) -> Result<Connection, GraphError> {
        self.validate_connection(source, target)?;
        if let Some(existing) = self
            .connections
            .iter()
            .find(|c| c.same_endpoints(source, target))
        {
            return Ok(existing.clone());
        }
        if self.connections.len() >= limits::MAX_EDGES {
            return Err(GraphError::LimitExceeded {
                what: "edges",
                max: limits::MAX_EDGES,
            });
        }
        let id = self.fresh_connection_id();
        let conn = Connection {
            id,
            source: source.clone(),
            target: target.clone(),
            extra: serde_json::Map::new(),
        };
        self.connections.push(conn.clone());
        self.bump();
        Ok(conn)
    }

    /// Inserts a connection that already carries an id (loading a description).
    pub(crate) fn insert_connection(&mut self, conn: Connection) -> Result<(), GraphError> {
        self.validate_connection(&conn.source, &conn.target)?;
        if self.connection(&conn.id).is_some() {
            return Err(GraphError::Json(format!("edge id '{}' appears more than once", conn.id)));
        }
        self.connections.push(conn);
        self.bump();
        Ok(())
    }

    /// Idempotent: removing an unknown id is a no-op that returns `None`.
    pub fn remove_connection(&mut self, id: &str) -> Option<Connection> {
        let idx = self.connections.iter().position(|c| c.id == id)?;
        let c = self.connections.remove(idx);
        self.bump();
        Some(c)
    }

    pub fn connection(&self, id: &str) -> Option<&Connection> {
        self.connections.iter().find(|c| c.id == id)
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    pub fn connections_of<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a Connection> {
        self.connections.iter().filter(move |c| c.involves_node(node_id))
    }

    /// Both endpoint positions of a connection, resolved against current node positions.
    pub fn connection_endpoints(&self, c: &Connection) -> Option<(Vec2, Vec2)> {
        let a = self.resolve_port_position(&c.source.node_id, &c.source.port_id)?;
        let b = self.resolve_port_position(&c.target.node_id, &c.target.port_id)?;
        Some((a, b))
    }
}

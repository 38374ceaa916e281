use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Vec2 { x, y }
    }
    pub fn add(self, o: Vec2) -> Vec2 {
        Vec2 { x: self.x + o.x, y: self.y + o.y }
    }
    pub fn sub(self, o: Vec2) -> Vec2 {
        Vec2 { x: self.x - o.x, y: self.y - o.y }
    }
    pub fn dist2(self, o: Vec2) -> f32 {
        let dx = self.x - o.x;
        let dy = self.y - o.y;
        dx * dx + dy * dy
    }
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Node position in the wire format's double precision.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WirePosition {
    pub x: f64,
    pub y: f64,
}

impl WirePosition {
    pub fn narrow(self) -> Vec2 {
        Vec2::new(self.x as f32, self.y as f32)
    }
}

impl From<Vec2> for WirePosition {
    fn from(v: Vec2) -> Self {
        WirePosition { x: v.x as f64, y: v.y as f64 }
    }
}

/// Axis-aligned rectangle in canvas-local coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.x + self.w && p.y >= self.y && p.y <= self.y + self.h
    }
    pub fn right(&self) -> f32 {
        self.x + self.w
    }
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Measurement,
    Tool,
    Model,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeRole {
    Input,
    Output,
    #[default]
    None,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolStatus {
    #[default]
    Pending,
    Running,
    Completed,
    Error,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortDirection {
    Input,
    Output,
}

/// A port bound to a concrete dataset/sample slot rather than an abstract parameter.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetBinding {
    pub dataset_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_id: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Port {
    pub id: String,
    pub direction: PortDirection,
    pub label: String,
    pub dataset: Option<DatasetBinding>,
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Port {
    pub fn new(id: impl Into<String>, direction: PortDirection, label: impl Into<String>) -> Self {
        let id = id.into();
        let label = label.into();
        Port {
            id,
            direction,
            label,
            dataset: None,
            extra: serde_json::Map::new(),
        }
    }
    pub fn input(id: impl Into<String>, label: impl Into<String>) -> Self {
        Port::new(id, PortDirection::Input, label)
    }
    pub fn output(id: impl Into<String>, label: impl Into<String>) -> Self {
        Port::new(id, PortDirection::Output, label)
    }
    pub fn with_dataset(mut self, dataset_id: impl Into<String>, sample_id: Option<String>) -> Self {
        self.dataset = Some(DatasetBinding {
            dataset_id: dataset_id.into(),
            sample_id,
        });
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub id: String,
    pub kind: NodeKind,
    pub role: NodeRole,
    pub label: Option<String>,
    pub position: Vec2,
    /// Position exactly as received on the wire; geometry only sees the
    /// narrowed `position`. Dropped once the node is moved.
    pub wire_position: Option<WirePosition>,
    pub inputs: Vec<Port>,
    pub outputs: Vec<Port>,
    pub status: Option<ToolStatus>,
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Node {
    pub fn new(id: impl Into<String>, kind: NodeKind, x: f32, y: f32) -> Self {
        Node {
            id: id.into(),
            kind,
            role: NodeRole::None,
            label: None,
            position: Vec2::new(x, y),
            wire_position: None,
            inputs: Vec::new(),
            outputs: Vec::new(),
            status: if kind == NodeKind::Tool { Some(ToolStatus::Pending) } else { None },
            extra: serde_json::Map::new(),
        }
    }
    pub fn with_role(mut self, role: NodeRole) -> Self {
        self.role = role;
        self
    }
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
    pub fn with_port(mut self, port: Port) -> Self {
        match port.direction {
            PortDirection::Input => self.inputs.push(port),
            PortDirection::Output => self.outputs.push(port),
        }
        self
    }

    pub fn ports(&self, dir: PortDirection) -> &[Port] {
        match dir {
            PortDirection::Input => &self.inputs,
            PortDirection::Output => &self.outputs,
        }
    }

    /// Finds a port by id across both directions, with its index among same-direction ports.
    pub fn find_port(&self, port_id: &str) -> Option<(usize, &Port)> {
        self.inputs
            .iter()
            .enumerate()
            .chain(self.outputs.iter().enumerate())
            .find(|(_, p)| p.id == port_id)
    }

    pub fn all_ports(&self) -> impl Iterator<Item = &Port> {
        self.inputs.iter().chain(self.outputs.iter())
    }

    pub fn row_count(&self) -> usize {
        self.inputs.len().max(self.outputs.len())
    }
}

/// `(nodeId, portId)` pair naming one port on the canvas.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortRef {
    pub node_id: String,
    pub port_id: String,
}

impl PortRef {
    pub fn new(node_id: impl Into<String>, port_id: impl Into<String>) -> Self {
        PortRef {
            node_id: node_id.into(),
            port_id: port_id.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Connection {
    pub id: String,
    pub source: PortRef,
    pub target: PortRef,
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Connection {
    pub fn involves_node(&self, node_id: &str) -> bool {
        self.source.node_id == node_id || self.target.node_id == node_id
    }
    pub fn same_endpoints(&self, source: &PortRef, target: &PortRef) -> bool {
        &self.source == source && &self.target == target
    }
}

/// Dataset binding together with the port that carries it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundDataset {
    pub port: PortRef,
    #[serde(flatten)]
    pub binding: DatasetBinding,
}

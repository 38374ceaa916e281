//! Graph description exchanged with the assembly backend.
//!
//! ```json
//! { "nodes": [{ "id", "kind", "role"?, "position": {"x","y"}, "inputs": [], "outputs": [], "status"? }],
//!   "edges": [{ "id", "source", "sourceHandle", "target", "targetHandle" }] }
//! ```
//!
//! Fields the canvas does not understand are kept in `extra` and written back
//! unchanged.

use crate::geometry::layout::LayoutConfig;
use crate::geometry::limits;
use crate::model::{
    Connection, DatasetBinding, Node, NodeKind, NodeRole, Port, PortDirection, PortRef,
    ToolStatus, WirePosition,
};
use crate::{Graph, GraphError};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDescription {
    #[serde(default)]
    pub nodes: Vec<NodeDesc>,
    #[serde(default)]
    pub edges: Vec<EdgeDesc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDesc {
    pub id: String,
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<NodeRole>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub position: WirePosition,
    #[serde(default)]
    pub inputs: Vec<PortDesc>,
    #[serde(default)]
    pub outputs: Vec<PortDesc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ToolStatus>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortDesc {
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeDesc {
    pub id: String,
    pub source: String,
    pub source_handle: String,
    pub target: String,
    pub target_handle: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// What happened while loading a description.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadReport {
    pub nodes: usize,
    pub edges: usize,
    /// Ids of edges that did not resolve to an output→input pair and were skipped.
    pub dropped_edges: Vec<String>,
}

fn port_from_desc(p: PortDesc, direction: PortDirection) -> Port {
    // a sample without a dataset has nothing to bind to; keep it on the wire only
    let (dataset, extra) = match (p.dataset_id, p.sample_id) {
        (Some(dataset_id), sample_id) => (Some(DatasetBinding { dataset_id, sample_id }), p.extra),
        (None, Some(sample)) => {
            let mut extra = p.extra;
            extra.insert("sampleId".to_string(), Value::String(sample));
            (None, extra)
        }
        (None, None) => (None, p.extra),
    };
    Port {
        id: p.id,
        direction,
        label: p.label,
        dataset,
        extra,
    }
}

fn port_to_desc(p: &Port) -> PortDesc {
    let mut extra = p.extra.clone();
    let (dataset_id, sample_id) = match &p.dataset {
        Some(d) => (Some(d.dataset_id.clone()), d.sample_id.clone()),
        None => {
            let s = extra.remove("sampleId").and_then(|v| v.as_str().map(str::to_string));
            (None, s)
        }
    };
    PortDesc {
        id: p.id.clone(),
        label: p.label.clone(),
        dataset_id,
        sample_id,
        extra,
    }
}

fn node_from_desc(n: NodeDesc) -> Node {
    Node {
        id: n.id,
        kind: n.kind,
        role: n.role.unwrap_or_default(),
        label: n.label,
        position: n.position.narrow(),
        wire_position: Some(n.position),
        inputs: n
            .inputs
            .into_iter()
            .map(|p| port_from_desc(p, PortDirection::Input))
            .collect(),
        outputs: n
            .outputs
            .into_iter()
            .map(|p| port_from_desc(p, PortDirection::Output))
            .collect(),
        status: n.status,
        extra: n.extra,
    }
}

/// The received position while it still narrows to the node's geometry,
/// otherwise the current position widened.
fn wire_position(n: &Node) -> WirePosition {
    match n.wire_position {
        Some(w) if w.narrow() == n.position => w,
        _ => WirePosition::from(n.position),
    }
}

impl From<&Node> for NodeDesc {
    fn from(n: &Node) -> Self {
        NodeDesc {
            id: n.id.clone(),
            kind: n.kind,
            role: (n.role != NodeRole::None).then_some(n.role),
            label: n.label.clone(),
            position: wire_position(n),
            inputs: n.inputs.iter().map(port_to_desc).collect(),
            outputs: n.outputs.iter().map(port_to_desc).collect(),
            status: n.status,
            extra: n.extra.clone(),
        }
    }
}

impl From<&Connection> for EdgeDesc {
    fn from(c: &Connection) -> Self {
        EdgeDesc {
            id: c.id.clone(),
            source: c.source.node_id.clone(),
            source_handle: c.source.port_id.clone(),
            target: c.target.node_id.clone(),
            target_handle: c.target.port_id.clone(),
            extra: c.extra.clone(),
        }
    }
}

impl Graph {
    /// Builds a graph from a description.
    ///
    /// Node and port identity problems are errors. Edges that do not resolve
    /// are skipped and listed in the report.
    pub fn from_description(
        desc: GraphDescription,
        layout: LayoutConfig,
    ) -> Result<(Graph, LoadReport), GraphError> {
        if desc.nodes.len() > limits::MAX_NODES {
            return Err(GraphError::LimitExceeded { what: "nodes", max: limits::MAX_NODES });
        }
        if desc.edges.len() > limits::MAX_EDGES {
            return Err(GraphError::LimitExceeded { what: "edges", max: limits::MAX_EDGES });
        }
        let mut g = Graph::with_layout(layout);
        let mut report = LoadReport::default();
        for n in desc.nodes {
            g.add_node(node_from_desc(n))?;
            report.nodes += 1;
        }
        for e in desc.edges {
            let conn = Connection {
                id: e.id,
                source: PortRef::new(e.source, e.source_handle),
                target: PortRef::new(e.target, e.target_handle),
                extra: e.extra,
            };
            let id = conn.id.clone();
            match g.insert_connection(conn) {
                Ok(()) => report.edges += 1,
                Err(err) => {
                    warn!("dropping edge '{}' from description: {}", id, err);
                    report.dropped_edges.push(id);
                }
            }
        }
        info!(
            "loaded graph description: {} node(s), {} edge(s), {} dropped",
            report.nodes,
            report.edges,
            report.dropped_edges.len()
        );
        Ok((g, report))
    }

    pub fn to_description(&self) -> GraphDescription {
        GraphDescription {
            nodes: self.nodes.iter().map(NodeDesc::from).collect(),
            edges: self.connections.iter().map(EdgeDesc::from).collect(),
        }
    }

    pub fn to_json_value(&self) -> Value {
        serde_json::to_value(self.to_description()).unwrap_or(Value::Null)
    }

    pub fn from_json_value(v: Value, layout: LayoutConfig) -> Result<(Graph, LoadReport), GraphError> {
        let desc: GraphDescription = serde_json::from_value(v)?;
        Graph::from_description(desc, layout)
    }
}

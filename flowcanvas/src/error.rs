use thiserror::Error;

/// Why a connection endpoint was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EndpointReason {
    UnknownNode,
    UnknownPort,
    NotAnOutput,
    NotAnInput,
    SameNode,
}

impl std::fmt::Display for EndpointReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EndpointReason::UnknownNode => "node does not exist",
            EndpointReason::UnknownPort => "port does not exist on node",
            EndpointReason::NotAnOutput => "source port is not an output",
            EndpointReason::NotAnInput => "target port is not an input",
            EndpointReason::SameNode => "source and target are on the same node",
        };
        f.write_str(s)
    }
}

/// Errors raised by the graph model and the description loader.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Invalid endpoint '{node}.{port}': {reason}")]
    InvalidEndpoint {
        node: String,
        port: String,
        reason: EndpointReason,
    },

    #[error("Node '{0}' not found")]
    UnknownNode(String),

    #[error("Connection '{0}' not found")]
    UnknownConnection(String),

    #[error("Node id '{0}' appears more than once")]
    DuplicateNode(String),

    #[error("Port id '{port}' appears more than once on node '{node}'")]
    DuplicatePort { node: String, port: String },

    #[error("Parameter '{0}' must be finite and within canvas bounds")]
    NonFinite(String),

    #[error("Too many {what}: limit is {max}")]
    LimitExceeded { what: &'static str, max: usize },

    #[error("Invalid canvas configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to parse graph description: {0}")]
    Json(String),
}

impl GraphError {
    /// Stable machine-readable code, used by the browser bindings.
    pub fn code(&self) -> &'static str {
        match self {
            GraphError::InvalidEndpoint { .. } => "invalid_endpoint",
            GraphError::UnknownNode(_) => "unknown_node",
            GraphError::UnknownConnection(_) => "unknown_connection",
            GraphError::DuplicateNode(_) => "duplicate_node",
            GraphError::DuplicatePort { .. } => "duplicate_port",
            GraphError::NonFinite(_) => "non_finite",
            GraphError::LimitExceeded { .. } => "limit_exceeded",
            GraphError::InvalidConfig(_) => "invalid_config",
            GraphError::Json(_) => "json_parse",
        }
    }

    pub(crate) fn endpoint(node: &str, port: &str, reason: EndpointReason) -> Self {
        GraphError::InvalidEndpoint {
            node: node.to_string(),
            port: port.to_string(),
            reason,
        }
    }
}

impl From<serde_json::Error> for GraphError {
    fn from(e: serde_json::Error) -> Self {
        GraphError::Json(e.to_string())
    }
}

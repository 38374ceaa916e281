//! Node / dataset selection and the per-kind behaviour table.
//!
//! ```text
//! None <-> Node(id) <-> Dataset(binding)
//! ```
//!
//! Selecting one kind of thing clears the other. Re-clicking the current
//! selection deselects it.

use crate::model::{BoundDataset, Node, NodeKind, NodeRole, PortRef};
use crate::Graph;
use serde::Serialize;

/// How a node kind renders and reacts to clicks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KindBehavior {
    /// Clicking the node body selects it.
    pub selectable: bool,
    /// Port rows render their dataset binding instead of a parameter label.
    pub dataset_rows: bool,
    pub shows_status: bool,
    pub css_class: &'static str,
}

const BEHAVIORS: [(NodeKind, KindBehavior); 3] = [
    (
        NodeKind::Measurement,
        KindBehavior {
            selectable: false,
            dataset_rows: true,
            shows_status: false,
            css_class: "node-measurement",
        },
    ),
    (
        NodeKind::Tool,
        KindBehavior {
            selectable: true,
            dataset_rows: false,
            shows_status: true,
            css_class: "node-tool",
        },
    ),
    (
        NodeKind::Model,
        KindBehavior {
            selectable: true,
            dataset_rows: false,
            shows_status: false,
            css_class: "node-model",
        },
    ),
];

impl NodeKind {
    pub fn behavior(self) -> &'static KindBehavior {
        match self {
            NodeKind::Measurement => &BEHAVIORS[0].1,
            NodeKind::Tool => &BEHAVIORS[1].1,
            NodeKind::Model => &BEHAVIORS[2].1,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Selection {
    #[default]
    None,
    Node(String),
    Dataset(BoundDataset),
}

/// Which outbound notifications a selection change requires.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SelectionChange {
    pub node: Option<Option<String>>,
    pub dataset: Option<Option<BoundDataset>>,
}

impl SelectionChange {
    pub fn is_empty(&self) -> bool {
        self.node.is_none() && self.dataset.is_none()
    }
}

impl Selection {
    pub fn node(&self) -> Option<&str> {
        match self {
            Selection::Node(id) => Some(id),
            _ => None,
        }
    }

    pub fn dataset(&self) -> Option<&BoundDataset> {
        match self {
            Selection::Dataset(d) => Some(d),
            _ => None,
        }
    }

    fn transition(&mut self, next: Selection) -> SelectionChange {
        let mut change = SelectionChange::default();
        if self.node() != next.node() {
            change.node = Some(next.node().map(str::to_string));
        }
        if self.dataset() != next.dataset() {
            change.dataset = Some(next.dataset().cloned());
        }
        *self = next;
        change
    }

    /// Returns `None` when the node's kind does not allow body selection.
    pub fn click_node(&mut self, node: &Node) -> Option<SelectionChange> {
        if !node.kind.behavior().selectable {
            return None;
        }
        let next = if self.node() == Some(node.id.as_str()) {
            Selection::None
        } else {
            Selection::Node(node.id.clone())
        };
        Some(self.transition(next))
    }

    pub fn click_dataset(&mut self, bound: BoundDataset) -> SelectionChange {
        let next = if self.dataset() == Some(&bound) {
            Selection::None
        } else {
            Selection::Dataset(bound)
        };
        self.transition(next)
    }

    pub fn clear(&mut self) -> SelectionChange {
        self.transition(Selection::None)
    }

    /// Drops the selection if it no longer resolves in `g`.
    pub fn prune(&mut self, g: &Graph) -> SelectionChange {
        let valid = match &*self {
            Selection::None => true,
            Selection::Node(id) => g.node(id).is_some(),
            Selection::Dataset(d) => g
                .port(&d.port)
                .and_then(|p| p.dataset.as_ref())
                .map_or(false, |b| b == &d.binding),
        };
        if valid {
            SelectionChange::default()
        } else {
            self.clear()
        }
    }

    /// After assembly with nothing selected, select the first dataset binding
    /// on the first input-role measurement node (node-array order).
    pub fn auto_select(&mut self, g: &Graph) -> SelectionChange {
        if *self != Selection::None {
            return SelectionChange::default();
        }
        let first = g
            .nodes()
            .iter()
            .filter(|n| n.kind == NodeKind::Measurement && n.role == NodeRole::Input)
            .find_map(|n| {
                n.all_ports().find_map(|p| {
                    p.dataset.as_ref().map(|b| BoundDataset {
                        port: PortRef::new(n.id.clone(), p.id.clone()),
                        binding: b.clone(),
                    })
                })
            });
        match first {
            Some(b) => self.transition(Selection::Dataset(b)),
            None => SelectionChange::default(),
        }
    }
}

//! Snapshot of every port's canvas-local position.
//!
//! The registry is built from a [`Graph`] at one geometry version and is only
//! valid for that version. Callers holding a registry check
//! [`PortRegistry::is_current`] and rebuild instead of reading stale
//! positions.

use crate::model::{DatasetBinding, PortDirection, PortRef, Vec2};
use crate::Graph;
use std::collections::HashMap;

#[derive(Clone, Debug)]
pub struct PortEntry {
    pub port: PortRef,
    pub direction: PortDirection,
    pub position: Vec2,
    /// Render order of the owning node; higher draws on top.
    pub z: usize,
    pub dataset: Option<DatasetBinding>,
}

#[derive(Clone, Debug, Default)]
pub struct PortRegistry {
    built_ver: u64,
    entries: Vec<PortEntry>,
    index: HashMap<PortRef, usize>,
}

impl PortRegistry {
    pub fn build(g: &Graph) -> Self {
        let mut entries = Vec::new();
        for (z, node) in g.nodes.iter().enumerate() {
            for dir in [PortDirection::Input, PortDirection::Output] {
                for (i, port) in node.ports(dir).iter().enumerate() {
                    entries.push(PortEntry {
                        port: PortRef::new(node.id.clone(), port.id.clone()),
                        direction: dir,
                        position: g.layout.port_position(node.position, i, dir),
                        z,
                        dataset: port.dataset.clone(),
                    });
                }
            }
        }
        let index = entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.port.clone(), i))
            .collect();
        PortRegistry {
            built_ver: g.geom_version(),
            entries,
            index,
        }
    }

    pub fn built_version(&self) -> u64 {
        self.built_ver
    }

    pub fn is_current(&self, g: &Graph) -> bool {
        self.built_ver == g.geom_version()
    }

    pub fn entries(&self) -> &[PortEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, r: &PortRef) -> Option<&PortEntry> {
        self.index.get(r).and_then(|&i| self.entries.get(i))
    }

    pub fn position(&self, r: &PortRef) -> Option<Vec2> {
        self.get(r).map(|e| e.position)
    }

    /// Ports whose hit circle (`radius`) contains `p`, top-most node first, then nearest.
    pub fn ports_near(&self, p: Vec2, radius: f32) -> Vec<&PortEntry> {
        let r2 = radius * radius;
        let mut hits: Vec<(&PortEntry, f32)> = self
            .entries
            .iter()
            .filter_map(|e| {
                let d2 = e.position.dist2(p);
                (d2 <= r2).then_some((e, d2))
            })
            .collect();
        hits.sort_by(|(a, da), (b, db)| {
            b.z.cmp(&a.z)
                .then(da.partial_cmp(db).unwrap_or(std::cmp::Ordering::Equal))
        });
        hits.into_iter().map(|(e, _)| e).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Node, NodeKind, Port};

    fn graph() -> Graph {
        let mut g = Graph::new();
        g.add_node(
            Node::new("a", NodeKind::Tool, 0.0, 0.0)
                .with_port(Port::input("i1", "in"))
                .with_port(Port::output("o1", "out"))
                .with_port(Port::output("o2", "out2")),
        )
        .unwrap();
        g
    }

    #[test]
    fn registry_matches_graph_resolution() {
        let g = graph();
        let reg = PortRegistry::build(&g);
        assert_eq!(reg.len(), 3);
        for e in reg.entries() {
            let p = g
                .resolve_port_position(&e.port.node_id, &e.port.port_id)
                .unwrap();
            assert_eq!(p, e.position);
        }
    }

    #[test]
    fn registry_goes_stale_after_move() {
        let mut g = graph();
        let reg = PortRegistry::build(&g);
        assert!(reg.is_current(&g));
        assert!(g.move_node("a", 10.0, 10.0));
        assert!(!reg.is_current(&g));
    }
}

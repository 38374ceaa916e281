use crate::geometry::curve::CurveConfig;
use crate::geometry::tolerance::clamp01;
use crate::model::{PortDirection, PortRef, Vec2};
use crate::registry::PortRegistry;
use crate::Graph;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Pick {
    Port {
        #[serde(flatten)]
        port: PortRef,
        direction: PortDirection,
        dist: f32,
    },
    Node {
        id: String,
    },
    Connection {
        id: String,
        t: f32,
        dist: f32,
    },
}

/// Index of the top-most node whose body contains `p`.
pub fn topmost_node_at(g: &Graph, p: Vec2) -> Option<usize> {
    g.nodes
        .iter()
        .enumerate()
        .rev()
        .find(|(_, n)| g.layout.node_rect(n).contains(p))
        .map(|(i, _)| i)
}

/// Port under `p`. A port is hidden if a node drawn above its own node covers the point.
pub fn pick_port(g: &Graph, reg: &PortRegistry, p: Vec2, slop: f32) -> Option<Pick> {
    let radius = g.layout.port_radius + slop.max(0.0);
    let cover = topmost_node_at(g, p);
    reg.ports_near(p, radius)
        .into_iter()
        .find(|e| cover.map_or(true, |c| e.z >= c))
        .map(|e| Pick::Port {
            port: e.port.clone(),
            direction: e.direction,
            dist: e.position.dist2(p).sqrt(),
        })
}

/// Connection whose hit stroke contains `p`; nearest wins.
pub fn pick_connection(g: &Graph, curve: &CurveConfig, p: Vec2) -> Option<Pick> {
    let half = 0.5 * curve.hit_width;
    let tol2 = half * half;
    let mut best: Option<(usize, f32, f32)> = None;
    for (i, c) in g.connections.iter().enumerate() {
        let Some((a, b)) = g.connection_endpoints(c) else {
            continue;
        };
        let bez = curve.connection_curve(a, b);
        let (minx, miny, maxx, maxy) = bez.hull_bounds();
        if p.x < minx - half || p.x > maxx + half || p.y < miny - half || p.y > maxy + half {
            continue;
        }
        let (d2, t) = bez.distance_sq(p);
        if d2 <= tol2 && best.map_or(true, |(_, bd, _)| d2 < bd) {
            best = Some((i, d2, t));
        }
    }
    best.map(|(i, d2, t)| Pick::Connection {
        id: g.connections[i].id.clone(),
        t: clamp01(t),
        dist: d2.sqrt(),
    })
}

/// Ports first, then node bodies, then connections (which draw beneath nodes).
pub fn pick_impl(g: &Graph, reg: &PortRegistry, curve: &CurveConfig, p: Vec2, slop: f32) -> Option<Pick> {
    if let Some(hit) = pick_port(g, reg, p, slop) {
        return Some(hit);
    }
    if let Some(i) = topmost_node_at(g, p) {
        return Some(Pick::Node { id: g.nodes[i].id.clone() });
    }
    pick_connection(g, curve, p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Node, NodeKind, Port};

    #[test]
    fn overlapping_nodes_hide_ports_underneath() {
        let mut g = Graph::new();
        g.add_node(Node::new("under", NodeKind::Tool, 0.0, 0.0).with_port(Port::output("o", "out")))
            .unwrap();
        // covers the right edge of "under"
        g.add_node(Node::new("over", NodeKind::Tool, 200.0, 0.0).with_port(Port::input("i", "in")))
            .unwrap();
        let reg = PortRegistry::build(&g);
        let o = g.resolve_port_position("under", "o").unwrap();
        match pick_port(&g, &reg, o, 0.0) {
            None => {}
            Some(Pick::Port { port, .. }) => assert_ne!(port.node_id, "under"),
            Some(other) => panic!("unexpected {:?}", other),
        }
        assert_eq!(
            pick_impl(&g, &reg, &CurveConfig::default(), o, 0.0),
            Some(Pick::Node { id: "over".into() })
        );
    }

    #[test]
    fn empty_space_picks_nothing() {
        let g = Graph::new();
        let reg = PortRegistry::build(&g);
        assert!(pick_impl(&g, &reg, &CurveConfig::default(), Vec2::new(5.0, 5.0), 2.0).is_none());
    }
}

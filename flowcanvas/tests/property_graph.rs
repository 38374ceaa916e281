use flowcanvas::{Graph, Node, NodeKind, Port, PortRef};
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    AddNode { x: i16, y: i16, ins: u8, outs: u8 },
    MoveNode { idx: u16, dx: i8, dy: i8 },
    RemoveNode { idx: u16 },
    Connect { a: u16, pa: u8, b: u16, pb: u8 },
    RemoveConnection { idx: u16 },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (any::<i16>(), any::<i16>(), 0u8..4, 0u8..4)
            .prop_map(|(x, y, ins, outs)| Op::AddNode { x, y, ins, outs }),
        (any::<u16>(), any::<i8>(), any::<i8>()).prop_map(|(idx, dx, dy)| Op::MoveNode { idx, dx, dy }),
        any::<u16>().prop_map(|idx| Op::RemoveNode { idx }),
        (any::<u16>(), any::<u8>(), any::<u16>(), any::<u8>())
            .prop_map(|(a, pa, b, pb)| Op::Connect { a, pa, b, pb }),
        any::<u16>().prop_map(|idx| Op::RemoveConnection { idx }),
    ]
}

fn nth_node(g: &Graph, idx: u16) -> Option<String> {
    let n = g.node_count();
    (n > 0).then(|| g.nodes()[idx as usize % n].id.clone())
}

/// Every node numbers its ports `in0..`/`out0..`, so a port id repeats across
/// nodes and only the (node, port) pair is unique.
fn port_of(g: &Graph, node: &str, pick: u8) -> PortRef {
    let ports: Vec<String> = g
        .node(node)
        .map(|n| n.all_ports().map(|p| p.id.clone()).collect())
        .unwrap_or_default();
    if ports.is_empty() {
        return PortRef::new(node, "none");
    }
    PortRef::new(node, ports[pick as usize % ports.len()].clone())
}

fn apply_op(g: &mut Graph, seq: &mut u32, op: Op) {
    match op {
        Op::AddNode { x, y, ins, outs } => {
            *seq += 1;
            let mut n = Node::new(format!("n{}", seq), NodeKind::Tool, x as f32 * 0.5, y as f32 * 0.5);
            for i in 0..ins {
                n = n.with_port(Port::input(format!("in{}", i), "in"));
            }
            for o in 0..outs {
                n = n.with_port(Port::output(format!("out{}", o), "out"));
            }
            g.add_node(n).unwrap();
        }
        Op::MoveNode { idx, dx, dy } => {
            if let Some(id) = nth_node(g, idx) {
                let p = g.node(&id).unwrap().position;
                assert!(g.move_node(&id, p.x + dx as f32, p.y + dy as f32));
            }
        }
        Op::RemoveNode { idx } => {
            if let Some(id) = nth_node(g, idx) {
                let (_, dropped) = g.remove_node(&id).unwrap();
                assert!(dropped.iter().all(|c| c.involves_node(&id)));
            }
        }
        Op::Connect { a, pa, b, pb } => {
            let (Some(na), Some(nb)) = (nth_node(g, a), nth_node(g, b)) else {
                return;
            };
            let src = port_of(g, &na, pa);
            let dst = port_of(g, &nb, pb);
            let ver = g.geom_version();
            let count = g.connection_count();
            match g.add_connection(&src, &dst) {
                Ok(c) => {
                    assert!(c.same_endpoints(&src, &dst));
                    assert!(g.connection_count() == count || g.connection_count() == count + 1);
                }
                Err(_) => {
                    assert_eq!(g.geom_version(), ver, "failed connect mutated the graph");
                    assert_eq!(g.connection_count(), count);
                }
            }
        }
        Op::RemoveConnection { idx } => {
            let n = g.connection_count();
            if n > 0 {
                let id = g.connections()[idx as usize % n].id.clone();
                assert!(g.remove_connection(&id).is_some());
                assert!(g.remove_connection(&id).is_none());
            }
        }
    }
}

fn check_invariants(g: &Graph) {
    for c in g.connections() {
        let src = g.port(&c.source).expect("dangling source");
        let dst = g.port(&c.target).expect("dangling target");
        assert_eq!(src.direction, flowcanvas::PortDirection::Output);
        assert_eq!(dst.direction, flowcanvas::PortDirection::Input);
        assert_ne!(c.source.node_id, c.target.node_id);
        assert!(g.connection_endpoints(c).is_some());
    }
    for (i, a) in g.connections().iter().enumerate() {
        for b in &g.connections()[i + 1..] {
            assert_ne!(a.id, b.id);
            assert!(!a.same_endpoints(&b.source, &b.target));
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn random_edits_keep_connections_resolvable(ops in proptest::collection::vec(op_strategy(), 1..80)) {
        let mut g = Graph::new();
        let mut seq = 0u32;
        for op in ops {
            apply_op(&mut g, &mut seq, op);
            check_invariants(&g);
        }
    }

    #[test]
    fn port_positions_depend_only_on_node_position(x in -5000i32..5000, y in -5000i32..5000, n in 1u8..6) {
        let mut node = Node::new("a", NodeKind::Model, x as f32, y as f32);
        for i in 0..n {
            node = node.with_port(Port::input(format!("i{}", i), ""));
        }
        let mut g = Graph::new();
        g.add_node(node).unwrap();
        let first: Vec<_> = (0..n).map(|i| g.resolve_port_position("a", &format!("i{}", i)).unwrap()).collect();
        g.move_node("a", 0.0, 0.0);
        g.move_node("a", x as f32, y as f32);
        for i in 0..n {
            prop_assert_eq!(g.resolve_port_position("a", &format!("i{}", i)).unwrap(), first[i as usize]);
        }
        for w in first.windows(2) {
            prop_assert!(w[1].y > w[0].y);
            prop_assert_eq!(w[1].x, w[0].x);
        }
    }
}

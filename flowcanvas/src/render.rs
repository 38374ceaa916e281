use crate::drag::DragController;
use crate::geometry::curve::{CubicBezier, CurveConfig};
use crate::model::{Connection, PortRef, Vec2};
use crate::Graph;
use serde::Serialize;

/// Render-ready description of one connection path.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionView {
    /// `None` for the in-progress drag connection.
    pub id: Option<String>,
    pub source: PortRef,
    pub target: Option<PortRef>,
    pub d: String,
    pub stroke_width: f32,
    /// Invisible stroke that receives hover and clicks; zero when not interactive.
    pub hit_width: f32,
    pub dashed: bool,
    pub hovered: bool,
    pub deletable: bool,
    /// Where the delete affordance is placed (curve midpoint).
    pub delete_anchor: Vec2,
}

fn view_of(
    bez: &CubicBezier,
    curve: &CurveConfig,
    c: Option<&Connection>,
    source: PortRef,
    hovered: bool,
) -> ConnectionView {
    let committed = c.is_some();
    ConnectionView {
        id: c.map(|c| c.id.clone()),
        source,
        target: c.map(|c| c.target.clone()),
        d: bez.to_path_data(),
        stroke_width: curve.stroke_width,
        hit_width: if committed { curve.hit_width } else { 0.0 },
        dashed: !committed,
        hovered,
        deletable: committed,
        delete_anchor: bez.eval(0.5),
    }
}

/// Every committed connection, with endpoints resolved against current node positions.
pub fn connection_views(g: &Graph, curve: &CurveConfig, hovered: Option<&str>) -> Vec<ConnectionView> {
    g.connections()
        .iter()
        .filter_map(|c| {
            let (a, b) = g.connection_endpoints(c)?;
            let bez = curve.connection_curve(a, b);
            let is_hovered = hovered == Some(c.id.as_str());
            Some(view_of(&bez, curve, Some(c), c.source.clone(), is_hovered))
        })
        .collect()
}

/// The in-progress drag connection, dashed and ending at the live pointer.
pub fn drag_view(g: &Graph, drag: &DragController, curve: &CurveConfig) -> Option<ConnectionView> {
    let bez = drag.preview(g, curve)?;
    let source = drag.session()?.source.clone();
    Some(view_of(&bez, curve, None, source, false))
}

pub fn to_svg_paths(g: &Graph, curve: &CurveConfig) -> Vec<String> {
    connection_views(g, curve, None).into_iter().map(|v| v.d).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Node, NodeKind, Port};

    #[test]
    fn committed_and_preview_views_differ_only_in_affordances() {
        let mut g = Graph::new();
        g.add_node(Node::new("A", NodeKind::Tool, 0.0, 0.0).with_port(Port::output("o", "out")))
            .unwrap();
        g.add_node(Node::new("B", NodeKind::Tool, 400.0, 0.0).with_port(Port::input("i", "in")))
            .unwrap();
        let c = g
            .add_connection(&PortRef::new("A", "o"), &PortRef::new("B", "i"))
            .unwrap();
        let curve = CurveConfig::default();
        let views = connection_views(&g, &curve, Some(&c.id));
        assert_eq!(views.len(), 1);
        assert!(views[0].deletable && !views[0].dashed && views[0].hovered);
        assert!(views[0].hit_width > views[0].stroke_width);
        assert!(views[0].d.starts_with("M 240 58 C"));

        let mut drag = DragController::new();
        drag.pointer_down(&g, Some(&PortRef::new("A", "o")), Vec2::new(240.0, 58.0));
        drag.pointer_move(Vec2::new(300.0, 90.0));
        let pv = drag_view(&g, &drag, &curve).unwrap();
        assert!(pv.dashed && !pv.deletable);
        assert!(pv.id.is_none() && pv.target.is_none());
        assert!(pv.d.ends_with("300 90"));
    }
}

//! Fixed per-node layout and the port position function.
//!
//! A port's position is never stored. It is derived from the owning node's
//! position, the port's index among ports of the same direction, and the
//! constants in [`LayoutConfig`]. Inputs sit on the left edge of the node,
//! outputs on the right edge, one row per index below the header.

use crate::model::{Node, PortDirection, Rect, Vec2};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    pub node_width: f32,
    pub header_height: f32,
    pub port_row_height: f32,
    /// Space below the last port row.
    pub body_padding: f32,
    pub port_radius: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            node_width: 240.0,
            header_height: 44.0,
            port_row_height: 28.0,
            body_padding: 12.0,
            port_radius: 6.0,
        }
    }
}

impl LayoutConfig {
    /// Canvas-local position of the `index`-th port of `direction` on a node at `node_pos`.
    pub fn port_position(&self, node_pos: Vec2, index: usize, direction: PortDirection) -> Vec2 {
        let x = match direction {
            PortDirection::Input => node_pos.x,
            PortDirection::Output => node_pos.x + self.node_width,
        };
        let y = node_pos.y
            + self.header_height
            + self.port_row_height * index as f32
            + 0.5 * self.port_row_height;
        Vec2 { x, y }
    }

    pub fn node_height(&self, rows: usize) -> f32 {
        self.header_height + self.port_row_height * rows as f32 + self.body_padding
    }

    pub fn node_rect(&self, node: &Node) -> Rect {
        Rect {
            x: node.position.x,
            y: node.position.y,
            w: self.node_width,
            h: self.node_height(node.row_count()),
        }
    }

    /// Bounding box of a port row: the full node width at the port's row.
    pub fn port_row_rect(&self, node_pos: Vec2, index: usize) -> Rect {
        Rect {
            x: node_pos.x,
            y: node_pos.y + self.header_height + self.port_row_height * index as f32,
            w: self.node_width,
            h: self.port_row_height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outputs_on_right_edge_inputs_on_left() {
        let cfg = LayoutConfig::default();
        let p = Vec2::new(50.0, 50.0);
        let o = cfg.port_position(p, 2, PortDirection::Output);
        let i = cfg.port_position(p, 2, PortDirection::Input);
        assert_eq!(o.x, 50.0 + cfg.node_width);
        assert_eq!(i.x, 50.0);
        assert_eq!(o.y, i.y);
        assert_eq!(o.y, 50.0 + cfg.header_height + 2.5 * cfg.port_row_height);
    }

    #[test]
    fn node_height_grows_with_rows() {
        let cfg = LayoutConfig::default();
        assert!(cfg.node_height(3) > cfg.node_height(1));
        assert_eq!(cfg.node_height(0), cfg.header_height + cfg.body_padding);
    }
}

use crate::geometry::curve::CurveConfig;
use crate::geometry::layout::LayoutConfig;
use crate::GraphError;
use serde::{Deserialize, Serialize};

/// Canvas tuning. Every field has a default, so partial JSON objects are accepted.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CanvasConfig {
    pub layout: LayoutConfig,
    pub curve: CurveConfig,
    /// Extra pointer tolerance around port circles.
    pub port_hit_slop: f32,
    /// Empty margin kept around the node bounding box on the scrollable plane.
    pub plane_margin: f32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        CanvasConfig {
            layout: LayoutConfig::default(),
            curve: CurveConfig::default(),
            port_hit_slop: 4.0,
            plane_margin: 200.0,
        }
    }
}

impl CanvasConfig {
    pub fn from_json_value(v: serde_json::Value) -> Result<Self, GraphError> {
        let cfg: CanvasConfig = serde_json::from_value(v)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), GraphError> {
        let checks = [
            ("layout.nodeWidth", self.layout.node_width, true),
            ("layout.headerHeight", self.layout.header_height, false),
            ("layout.portRowHeight", self.layout.port_row_height, true),
            ("layout.bodyPadding", self.layout.body_padding, false),
            ("layout.portRadius", self.layout.port_radius, false),
            ("curve.minOffset", self.curve.min_offset, false),
            ("curve.maxOffset", self.curve.max_offset, false),
            ("curve.strokeWidth", self.curve.stroke_width, true),
            ("curve.hitWidth", self.curve.hit_width, true),
            ("portHitSlop", self.port_hit_slop, false),
            ("planeMargin", self.plane_margin, false),
        ];
        for (name, v, positive) in checks {
            let ok = v.is_finite() && if positive { v > 0.0 } else { v >= 0.0 };
            if !ok {
                return Err(GraphError::NonFinite(name.to_string()));
            }
        }
        if self.curve.min_offset > self.curve.max_offset {
            return Err(GraphError::InvalidConfig(format!(
                "curve.minOffset {} exceeds curve.maxOffset {}",
                self.curve.min_offset, self.curve.max_offset
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn partial_config_keeps_defaults() {
        let cfg = CanvasConfig::from_json_value(json!({"curve": {"hitWidth": 24.0}})).unwrap();
        assert_eq!(cfg.curve.hit_width, 24.0);
        assert_eq!(cfg.curve.min_offset, 20.0);
        assert_eq!(cfg.layout, LayoutConfig::default());
    }

    #[test]
    fn inverted_offsets_rejected() {
        let err = CanvasConfig::from_json_value(json!({"curve": {"minOffset": 120.0}})).unwrap_err();
        assert_eq!(err.code(), "invalid_config");
        assert!(err.to_string().contains("curve.minOffset"));
    }
}

//! Resizable / collapsible side panels and the view-state store that owns them.
//!
//! The canvas reads panel state (to know how much of the viewport is covered)
//! but never writes it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "orientation", rename_all = "lowercase")]
pub enum PanelSpec {
    #[serde(rename_all = "camelCase")]
    Horizontal {
        side: Side,
        default_width: f32,
        min_width: f32,
        max_width: f32,
    },
    #[serde(rename_all = "camelCase")]
    Vertical {
        default_height: f32,
        min_height: f32,
        max_height: f32,
    },
}

impl PanelSpec {
    pub fn bounds(&self) -> (f32, f32) {
        match *self {
            PanelSpec::Horizontal { min_width, max_width, .. } => (min_width, max_width),
            PanelSpec::Vertical { min_height, max_height, .. } => (min_height, max_height),
        }
    }

    pub fn default_size(&self) -> f32 {
        let (lo, hi) = self.bounds();
        let d = match *self {
            PanelSpec::Horizontal { default_width, .. } => default_width,
            PanelSpec::Vertical { default_height, .. } => default_height,
        };
        d.max(lo).min(hi)
    }

    /// Growth in panel size per pointer pixel along the drag axis.
    fn grow_sign(&self) -> f32 {
        match self {
            // the handle sits on the inner edge: a left panel grows rightwards
            PanelSpec::Horizontal { side: Side::Left, .. } => 1.0,
            PanelSpec::Horizontal { side: Side::Right, .. } => -1.0,
            // bottom-docked: dragging the top edge up grows it
            PanelSpec::Vertical { .. } => -1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelState {
    pub spec: PanelSpec,
    pub size: f32,
    pub collapsed: bool,
    #[serde(skip)]
    resize: Option<(f32, f32)>, // (pointer at start, size at start)
}

impl PanelState {
    pub fn new(spec: PanelSpec) -> Self {
        PanelState {
            spec,
            size: spec.default_size(),
            collapsed: false,
            resize: None,
        }
    }

    /// Size actually occupied on screen.
    pub fn visible_size(&self) -> f32 {
        if self.collapsed { 0.0 } else { self.size }
    }

    pub fn toggle(&mut self) -> bool {
        self.collapsed = !self.collapsed;
        self.resize = None;
        self.collapsed
    }

    pub fn set_size(&mut self, size: f32) -> f32 {
        if size.is_finite() {
            let (lo, hi) = self.spec.bounds();
            self.size = size.max(lo).min(hi);
        }
        self.size
    }

    /// `pointer` is the coordinate along the panel's resize axis.
    pub fn begin_resize(&mut self, pointer: f32) -> bool {
        if self.collapsed || !pointer.is_finite() {
            return false;
        }
        self.resize = Some((pointer, self.size));
        true
    }

    pub fn update_resize(&mut self, pointer: f32) -> f32 {
        if let Some((start, base)) = self.resize {
            if pointer.is_finite() {
                return self.set_size(base + self.spec.grow_sign() * (pointer - start));
            }
        }
        self.size
    }

    pub fn end_resize(&mut self) {
        self.resize = None;
    }

    pub fn is_resizing(&self) -> bool {
        self.resize.is_some()
    }
}

pub const VIEWER_PANEL: &str = "viewer";
pub const CATALOGUE_PANEL: &str = "catalogue";

/// Single owner of the UI's collapsed/expanded flags and panel sizes.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ViewState {
    panels: BTreeMap<String, PanelState>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Viewer docked left, catalogue docked right.
    pub fn workflow_default() -> Self {
        let mut v = ViewState::new();
        v.register(
            VIEWER_PANEL,
            PanelSpec::Horizontal { side: Side::Left, default_width: 320.0, min_width: 200.0, max_width: 640.0 },
        );
        v.register(
            CATALOGUE_PANEL,
            PanelSpec::Horizontal { side: Side::Right, default_width: 280.0, min_width: 180.0, max_width: 520.0 },
        );
        v
    }

    pub fn register(&mut self, name: &str, spec: PanelSpec) -> &mut PanelState {
        self.panels
            .entry(name.to_string())
            .and_modify(|p| *p = PanelState::new(spec))
            .or_insert_with(|| PanelState::new(spec))
    }

    pub fn panel(&self, name: &str) -> Option<&PanelState> {
        self.panels.get(name)
    }

    pub fn panel_mut(&mut self, name: &str) -> Option<&mut PanelState> {
        self.panels.get_mut(name)
    }

    pub fn is_collapsed(&self, name: &str) -> bool {
        self.panels.get(name).map_or(true, |p| p.collapsed)
    }

    /// Horizontal space taken by expanded side panels, `(left, right)`.
    pub fn horizontal_insets(&self) -> (f32, f32) {
        self.panels.values().fold((0.0, 0.0), |(l, r), p| match p.spec {
            PanelSpec::Horizontal { side: Side::Left, .. } => (l + p.visible_size(), r),
            PanelSpec::Horizontal { side: Side::Right, .. } => (l, r + p.visible_size()),
            PanelSpec::Vertical { .. } => (l, r),
        })
    }

    /// Vertical space taken by expanded bottom panels.
    pub fn bottom_inset(&self) -> f32 {
        self.panels
            .values()
            .filter(|p| matches!(p.spec, PanelSpec::Vertical { .. }))
            .map(|p| p.visible_size())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resize_clamps_to_bounds() {
        let mut p = PanelState::new(PanelSpec::Horizontal {
            side: Side::Right,
            default_width: 300.0,
            min_width: 200.0,
            max_width: 400.0,
        });
        assert!(p.begin_resize(1000.0));
        // right panel: dragging left grows it
        assert_eq!(p.update_resize(950.0), 350.0);
        assert_eq!(p.update_resize(500.0), 400.0);
        assert_eq!(p.update_resize(1500.0), 200.0);
        p.end_resize();
        assert_eq!(p.update_resize(0.0), 200.0);
    }

    #[test]
    fn vertical_panel_and_collapse() {
        let mut p = PanelState::new(PanelSpec::Vertical {
            default_height: 500.0,
            min_height: 100.0,
            max_height: 300.0,
        });
        assert_eq!(p.size, 300.0);
        p.toggle();
        assert_eq!(p.visible_size(), 0.0);
        assert!(!p.begin_resize(10.0));
    }

    #[test]
    fn insets_follow_collapse_flags() {
        let mut v = ViewState::workflow_default();
        assert_eq!(v.horizontal_insets(), (320.0, 280.0));
        v.panel_mut(CATALOGUE_PANEL).unwrap().toggle();
        assert!(v.is_collapsed(CATALOGUE_PANEL));
        assert_eq!(v.horizontal_insets(), (320.0, 0.0));
    }
}

//! Cubic Bézier geometry for connections.
//!
//! A connection leaves its source port heading right and enters its target
//! port from the left. Both control points are offset horizontally by the
//! same adaptive amount, `clamp(|dx| / 2, min, max)`.

use super::tolerance::{approx_eq, clamp, clamp01, CURVE_SAMPLES, EPS_LEN, EPS_POS};
use crate::model::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CurveConfig {
    pub min_offset: f32,
    pub max_offset: f32,
    pub stroke_width: f32,
    /// Width of the invisible stroke that receives hover and clicks.
    pub hit_width: f32,
}

impl Default for CurveConfig {
    fn default() -> Self {
        CurveConfig {
            min_offset: 20.0,
            max_offset: 100.0,
            stroke_width: 2.0,
            hit_width: 16.0,
        }
    }
}

impl CurveConfig {
    pub fn control_offset(&self, start: Vec2, end: Vec2) -> f32 {
        clamp((end.x - start.x).abs() * 0.5, self.min_offset, self.max_offset)
    }

    pub fn connection_curve(&self, start: Vec2, end: Vec2) -> CubicBezier {
        let off = self.control_offset(start, end);
        CubicBezier::new(
            start,
            Vec2 { x: start.x + off, y: start.y },
            Vec2 { x: end.x - off, y: end.y },
            end,
        )
    }
}

/// Control points of a cubic Bézier curve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubicBezier {
    pub p0: Vec2,
    pub p1: Vec2,
    pub p2: Vec2,
    pub p3: Vec2,
}

impl CubicBezier {
    pub fn new(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2) -> Self {
        Self { p0, p1, p2, p3 }
    }

    /// Evaluate the curve at parameter t ∈ [0, 1].
    pub fn eval(&self, t: f32) -> Vec2 {
        let t2 = t * t;
        let t3 = t2 * t;
        let mt = 1.0 - t;
        let mt2 = mt * mt;
        let mt3 = mt2 * mt;

        Vec2 {
            x: mt3 * self.p0.x + 3.0 * mt2 * t * self.p1.x + 3.0 * mt * t2 * self.p2.x + t3 * self.p3.x,
            y: mt3 * self.p0.y + 3.0 * mt2 * t * self.p1.y + 3.0 * mt * t2 * self.p2.y + t3 * self.p3.y,
        }
    }

    fn is_degenerate(&self) -> bool {
        let pts = [self.p1, self.p2, self.p3];
        pts.iter()
            .all(|p| approx_eq(p.x, self.p0.x, EPS_POS) && approx_eq(p.y, self.p0.y, EPS_POS))
    }

    /// Squared distance from `p` to the curve and the parameter of the closest sample.
    pub fn distance_sq(&self, p: Vec2) -> (f32, f32) {
        if self.is_degenerate() {
            return (p.dist2(self.p0), 0.0);
        }
        let mut best_d2 = f32::INFINITY;
        let mut best_t = 0.0;
        let mut prev = self.p0;
        let mut prev_t = 0.0;
        for i in 1..=CURVE_SAMPLES {
            let t = i as f32 / CURVE_SAMPLES as f32;
            let cur = self.eval(t);
            let (d2, s) = seg_distance_sq(p, prev, cur);
            if d2 < best_d2 {
                best_d2 = d2;
                best_t = prev_t + s * (t - prev_t);
            }
            prev = cur;
            prev_t = t;
        }
        (best_d2, best_t)
    }

    /// SVG path data (`M x y C x1 y1, x2 y2, x y`).
    pub fn to_path_data(&self) -> String {
        format!(
            "M {} {} C {} {}, {} {}, {} {}",
            self.p0.x, self.p0.y, self.p1.x, self.p1.y, self.p2.x, self.p2.y, self.p3.x, self.p3.y
        )
    }

    /// Bounding box of the control polygon, which contains the curve.
    pub fn hull_bounds(&self) -> (f32, f32, f32, f32) {
        let xs = [self.p0.x, self.p1.x, self.p2.x, self.p3.x];
        let ys = [self.p0.y, self.p1.y, self.p2.y, self.p3.y];
        let minx = xs.iter().copied().fold(f32::INFINITY, f32::min);
        let maxx = xs.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let miny = ys.iter().copied().fold(f32::INFINITY, f32::min);
        let maxy = ys.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        (minx, miny, maxx, maxy)
    }
}

/// Squared distance from `p` to segment `ab` and the clamped projection parameter.
pub fn seg_distance_sq(p: Vec2, a: Vec2, b: Vec2) -> (f32, f32) {
    let vx = b.x - a.x;
    let vy = b.y - a.y;
    let wx = p.x - a.x;
    let wy = p.y - a.y;
    let vv = vx * vx + vy * vy;
    let t = if vv > EPS_LEN { clamp01((wx * vx + wy * vy) / vv) } else { 0.0 };
    let proj = Vec2 { x: a.x + t * vx, y: a.y + t * vy };
    (p.dist2(proj), t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_clamps_to_floor_for_close_nodes() {
        let c = CurveConfig::default();
        let off = c.control_offset(Vec2::new(100.0, 0.0), Vec2::new(140.0, 0.0));
        assert_eq!(off, 20.0);
    }

    #[test]
    fn offset_clamps_to_ceiling_for_far_nodes() {
        let c = CurveConfig::default();
        let off = c.control_offset(Vec2::new(0.0, 0.0), Vec2::new(1000.0, 300.0));
        assert_eq!(off, 100.0);
    }

    #[test]
    fn offset_is_half_dx_in_between() {
        let c = CurveConfig::default();
        let off = c.control_offset(Vec2::new(0.0, 0.0), Vec2::new(120.0, 50.0));
        assert_eq!(off, 60.0);
    }

    #[test]
    fn backwards_connection_still_leaves_rightwards() {
        // target left of source: the curve loops, control points keep their sides
        let c = CurveConfig::default();
        let b = c.connection_curve(Vec2::new(300.0, 0.0), Vec2::new(100.0, 80.0));
        assert!(b.p1.x > b.p0.x);
        assert!(b.p2.x < b.p3.x);
        assert_eq!(b.eval(0.0), b.p0);
        assert_eq!(b.eval(1.0), b.p3);
    }

    #[test]
    fn distance_to_curve_near_endpoints_and_middle() {
        let c = CurveConfig::default();
        let b = c.connection_curve(Vec2::new(0.0, 0.0), Vec2::new(200.0, 0.0));
        let (d2, _) = b.distance_sq(Vec2::new(100.0, 3.0));
        assert!((d2 - 9.0).abs() < 1e-2);
        let (d2, t) = b.distance_sq(Vec2::new(200.0, 0.0));
        assert!(d2 < 1e-6);
        assert!(t > 0.99);
    }

    #[test]
    fn degenerate_curve_measures_point_distance() {
        let p = Vec2::new(5.0, 5.0);
        let b = CubicBezier::new(p, p, p, p);
        let (d2, t) = b.distance_sq(Vec2::new(8.0, 9.0));
        assert_eq!(d2, 25.0);
        assert_eq!(t, 0.0);
    }
}

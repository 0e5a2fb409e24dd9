//! Ternary subplots. Data points are `(a, b)`; the third component is
//! implied by `c = sum - a - b`.

use egui::{pos2, Pos2, Rect};

use super::{
    finite_pos, is_finite_point, json_number, DataPoint, SubplotId, SubplotKind, SubplotTransform,
};

/// Tolerance on barycentric weights so that points on an edge stay inside.
const EDGE_EPS: f64 = 1e-9;

#[derive(Debug, Clone)]
pub struct TernaryTransform {
    pub id: SubplotId,
    /// `a` corner (top).
    pub vertex_a: Pos2,
    /// `b` corner (bottom left).
    pub vertex_b: Pos2,
    /// `c` corner (bottom right).
    pub vertex_c: Pos2,
    pub sum: f64,
}

impl TernaryTransform {
    /// Triangle inscribed in `area`: `a` at the top center, `b` bottom left,
    /// `c` bottom right.
    pub fn new(id: &str, area: Rect, sum: f64) -> Self {
        Self {
            id: SubplotId::new(id),
            vertex_a: pos2(area.center().x, area.top()),
            vertex_b: area.left_bottom(),
            vertex_c: area.right_bottom(),
            sum,
        }
    }

    /// Barycentric weights `(wa, wb, wc)` of a screen point.
    fn weights(&self, p: Pos2) -> Option<(f64, f64, f64)> {
        let (ax, ay) = (self.vertex_a.x as f64, self.vertex_a.y as f64);
        let (bx, by) = (self.vertex_b.x as f64, self.vertex_b.y as f64);
        let (cx, cy) = (self.vertex_c.x as f64, self.vertex_c.y as f64);
        let (px, py) = (p.x as f64, p.y as f64);
        let denom = (by - cy) * (ax - cx) + (cx - bx) * (ay - cy);
        if denom == 0.0 || !denom.is_finite() {
            return None;
        }
        let wa = ((by - cy) * (px - cx) + (cx - bx) * (py - cy)) / denom;
        let wb = ((cy - ay) * (px - cx) + (ax - cx) * (py - cy)) / denom;
        Some((wa, wb, 1.0 - wa - wb))
    }
}

impl SubplotTransform for TernaryTransform {
    fn id(&self) -> &SubplotId {
        &self.id
    }

    fn kind(&self) -> SubplotKind {
        SubplotKind::Ternary
    }

    fn plot_area(&self) -> Rect {
        Rect::from_points(&[self.vertex_a, self.vertex_b, self.vertex_c])
    }

    fn hit(&self, p: Pos2) -> bool {
        matches!(self.weights(p), Some((a, b, c)) if a >= -EDGE_EPS && b >= -EDGE_EPS && c >= -EDGE_EPS)
    }

    fn to_screen(&self, p: DataPoint) -> Option<Pos2> {
        if !is_finite_point(p) || self.sum <= 0.0 {
            return None;
        }
        let (a, b) = (p[0] / self.sum, p[1] / self.sum);
        let c = 1.0 - a - b;
        if a < -EDGE_EPS || b < -EDGE_EPS || c < -EDGE_EPS {
            return None;
        }
        let x = a * self.vertex_a.x as f64 + b * self.vertex_b.x as f64 + c * self.vertex_c.x as f64;
        let y = a * self.vertex_a.y as f64 + b * self.vertex_b.y as f64 + c * self.vertex_c.y as f64;
        finite_pos(x, y)
    }

    fn from_screen(&self, p: Pos2) -> Option<DataPoint> {
        let (wa, wb, wc) = self.weights(p)?;
        if wa < -EDGE_EPS || wb < -EDGE_EPS || wc < -EDGE_EPS {
            return None;
        }
        Some([wa * self.sum, wb * self.sum])
    }

    fn describe_point(&self, p: DataPoint) -> Vec<(String, serde_json::Value)> {
        vec![
            ("a".to_string(), json_number(p[0])),
            ("b".to_string(), json_number(p[1])),
            ("c".to_string(), json_number(self.sum - p[0] - p[1])),
        ]
    }
}

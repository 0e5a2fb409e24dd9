//! Polar subplots. Data points are `(r, theta)` with `theta` in degrees.

use egui::{vec2, Pos2, Rect};

use super::{finite_pos, is_finite_point, json_number, DataPoint, SubplotId, SubplotKind, SubplotTransform};

#[derive(Debug, Clone)]
pub struct PolarTransform {
    pub id: SubplotId,
    /// Screen position of the pole.
    pub center: Pos2,
    /// Pixel radius of the outer edge (`radial_range[1]`).
    pub radius_px: f32,
    pub radial_range: [f64; 2],
    /// Screen angle (degrees, counterclockwise from +x) where `theta = 0` lies.
    pub rotation: f64,
    pub clockwise: bool,
}

impl PolarTransform {
    pub fn new(id: &str, center: Pos2, radius_px: f32, radial_range: [f64; 2]) -> Self {
        Self {
            id: SubplotId::new(id),
            center,
            radius_px,
            radial_range,
            rotation: 0.0,
            clockwise: false,
        }
    }

    pub fn with_rotation(mut self, rotation: f64, clockwise: bool) -> Self {
        self.rotation = rotation;
        self.clockwise = clockwise;
        self
    }

    fn screen_angle(&self, theta: f64) -> f64 {
        if self.clockwise {
            self.rotation - theta
        } else {
            self.rotation + theta
        }
    }
}

impl SubplotTransform for PolarTransform {
    fn id(&self) -> &SubplotId {
        &self.id
    }

    fn kind(&self) -> SubplotKind {
        SubplotKind::Polar
    }

    fn plot_area(&self) -> Rect {
        Rect::from_center_size(self.center, vec2(self.radius_px, self.radius_px) * 2.0)
    }

    fn hit(&self, p: Pos2) -> bool {
        p.distance(self.center) <= self.radius_px
    }

    fn to_screen(&self, p: DataPoint) -> Option<Pos2> {
        if !is_finite_point(p) {
            return None;
        }
        let [r0, r1] = self.radial_range;
        if r1 == r0 || p[0] < r0.min(r1) {
            return None;
        }
        let rad = (p[0] - r0) / (r1 - r0) * self.radius_px as f64;
        let a = self.screen_angle(p[1]).to_radians();
        finite_pos(
            self.center.x as f64 + rad * a.cos(),
            self.center.y as f64 - rad * a.sin(),
        )
    }

    fn from_screen(&self, p: Pos2) -> Option<DataPoint> {
        if !(p.x.is_finite() && p.y.is_finite()) || self.radius_px <= 0.0 {
            return None;
        }
        let dx = (p.x - self.center.x) as f64;
        let dy = (self.center.y - p.y) as f64;
        let [r0, r1] = self.radial_range;
        let r = r0 + dx.hypot(dy) / self.radius_px as f64 * (r1 - r0);
        let a = dy.atan2(dx).to_degrees();
        let theta = if self.clockwise {
            self.rotation - a
        } else {
            a - self.rotation
        };
        Some([r, theta.rem_euclid(360.0)])
    }

    fn describe_point(&self, p: DataPoint) -> Vec<(String, serde_json::Value)> {
        vec![
            ("r".to_string(), json_number(p[0])),
            ("theta".to_string(), json_number(p[1])),
        ]
    }
}

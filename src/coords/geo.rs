//! Geographic subplots (`geo`) and tiled map subplots (`mapbox`).
//!
//! Data points are `(lon, lat)` in degrees. Projections that cannot show a
//! point (poles on mercator, the far hemisphere on orthographic) return
//! `None`, which keeps such points out of every selection.

use std::f64::consts::{FRAC_PI_4, PI};

use egui::{Pos2, Rect};
use serde::{Deserialize, Serialize};

use super::{
    finite_pos, is_finite_point, json_number, DataPoint, SubplotId, SubplotKind, SubplotTransform,
};

/// Latitude where web mercator is cut off.
pub const MERCATOR_MAX_LAT: f64 = 85.0511;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeoProjection {
    #[default]
    Equirectangular,
    Mercator,
    Orthographic,
    Robinson,
}

#[derive(Debug, Clone)]
pub struct GeoTransform {
    pub id: SubplotId,
    pub projection: GeoProjection,
    /// Screen rectangle of the map frame.
    pub area: Rect,
    /// Pixels per radian at the projection center.
    pub scale: f64,
    /// Projection center `(lon, lat)`; it lands on the center of `area`.
    pub center: DataPoint,
}

fn wrap_lon(dl: f64) -> f64 {
    (dl + 180.0).rem_euclid(360.0) - 180.0
}

fn mercator_y(lat_deg: f64) -> Option<f64> {
    if lat_deg.abs() >= MERCATOR_MAX_LAT {
        return None;
    }
    Some((FRAC_PI_4 + lat_deg.to_radians() / 2.0).tan().ln())
}

fn inverse_mercator_y(y: f64) -> f64 {
    (2.0 * y.exp().atan() - PI / 2.0).to_degrees()
}

// Robinson coefficients at 5° latitude steps.
const ROBINSON_X: [f64; 19] = [
    1.0000, 0.9986, 0.9954, 0.9900, 0.9822, 0.9730, 0.9600, 0.9427, 0.9216, 0.8962, 0.8679,
    0.8350, 0.7986, 0.7597, 0.7186, 0.6732, 0.6213, 0.5722, 0.5322,
];
const ROBINSON_Y: [f64; 19] = [
    0.0000, 0.0620, 0.1240, 0.1860, 0.2480, 0.3100, 0.3720, 0.4340, 0.4958, 0.5571, 0.6176,
    0.6769, 0.7346, 0.7903, 0.8435, 0.8936, 0.9394, 0.9761, 1.0000,
];

fn robinson_coeffs(lat_deg: f64) -> (f64, f64) {
    let a = lat_deg.abs().min(90.0) / 5.0;
    let i = (a.floor() as usize).min(17);
    let t = a - i as f64;
    let x = ROBINSON_X[i] + (ROBINSON_X[i + 1] - ROBINSON_X[i]) * t;
    let y = ROBINSON_Y[i] + (ROBINSON_Y[i + 1] - ROBINSON_Y[i]) * t;
    (x, y.copysign(lat_deg))
}

impl GeoTransform {
    pub fn new(id: &str, projection: GeoProjection, area: Rect) -> Self {
        // Fit a full-width world map into the frame.
        let scale = match projection {
            GeoProjection::Orthographic => area.width().min(area.height()) as f64 / 2.0,
            GeoProjection::Robinson => area.width() as f64 / (2.0 * PI * 0.8487),
            _ => area.width() as f64 / (2.0 * PI),
        };
        Self {
            id: SubplotId::new(id),
            projection,
            area,
            scale,
            center: [0.0, 0.0],
        }
    }

    pub fn with_center(mut self, center: DataPoint) -> Self {
        self.center = center;
        self
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Project to unscaled map units relative to the center (y up).
    fn project(&self, p: DataPoint) -> Option<(f64, f64)> {
        let [lon0, lat0] = self.center;
        let lambda = wrap_lon(p[0] - lon0).to_radians();
        match self.projection {
            GeoProjection::Equirectangular => Some((lambda, (p[1] - lat0).to_radians())),
            GeoProjection::Mercator => Some((lambda, mercator_y(p[1])? - mercator_y(lat0)?)),
            GeoProjection::Orthographic => {
                let (phi, phi0) = (p[1].to_radians(), lat0.to_radians());
                let cos_c = phi0.sin() * phi.sin() + phi0.cos() * phi.cos() * lambda.cos();
                if cos_c < 0.0 {
                    return None;
                }
                Some((
                    phi.cos() * lambda.sin(),
                    phi0.cos() * phi.sin() - phi0.sin() * phi.cos() * lambda.cos(),
                ))
            }
            GeoProjection::Robinson => {
                let (cx, cy) = robinson_coeffs(p[1]);
                Some((0.8487 * cx * lambda, 1.3523 * cy * PI / 2.0))
            }
        }
    }

    fn unproject(&self, x: f64, y: f64) -> Option<DataPoint> {
        let [lon0, lat0] = self.center;
        let (lambda, lat) = match self.projection {
            GeoProjection::Equirectangular => (x, y.to_degrees() + lat0),
            GeoProjection::Mercator => (x, inverse_mercator_y(y + mercator_y(lat0)?)),
            GeoProjection::Orthographic => {
                let rho = x.hypot(y);
                if rho > 1.0 {
                    return None;
                }
                let phi0 = lat0.to_radians();
                if rho == 0.0 {
                    return Some([lon0, lat0]);
                }
                let c = rho.asin();
                let phi = (c.cos() * phi0.sin() + y * c.sin() * phi0.cos() / rho).asin();
                let lambda = (x * c.sin()).atan2(rho * c.cos() * phi0.cos() - y * c.sin() * phi0.sin());
                (lambda, phi.to_degrees())
            }
            GeoProjection::Robinson => {
                let target = y / (1.3523 * PI / 2.0);
                if target.abs() > 1.0 {
                    return None;
                }
                let (mut lo, mut hi) = (0.0f64, 90.0f64);
                for _ in 0..60 {
                    let mid = (lo + hi) / 2.0;
                    if robinson_coeffs(mid).1 < target.abs() {
                        lo = mid;
                    } else {
                        hi = mid;
                    }
                }
                let lat = ((lo + hi) / 2.0).copysign(target);
                let (cx, _) = robinson_coeffs(lat);
                (x / (0.8487 * cx), lat)
            }
        };
        if lambda.abs() > PI + 1e-9 || lat.abs() > 90.0 + 1e-9 {
            return None;
        }
        Some([wrap_lon(lambda.to_degrees() + lon0), lat])
    }
}

impl SubplotTransform for GeoTransform {
    fn id(&self) -> &SubplotId {
        &self.id
    }

    fn kind(&self) -> SubplotKind {
        SubplotKind::Geo
    }

    fn plot_area(&self) -> Rect {
        self.area
    }

    fn hit(&self, p: Pos2) -> bool {
        self.area.contains(p) && self.from_screen(p).is_some()
    }

    fn to_screen(&self, p: DataPoint) -> Option<Pos2> {
        if !is_finite_point(p) || p[1].abs() > 90.0 {
            return None;
        }
        let (x, y) = self.project(p)?;
        let c = self.area.center();
        finite_pos(c.x as f64 + x * self.scale, c.y as f64 - y * self.scale)
    }

    fn from_screen(&self, p: Pos2) -> Option<DataPoint> {
        if !(p.x.is_finite() && p.y.is_finite()) || self.scale <= 0.0 {
            return None;
        }
        let c = self.area.center();
        let x = (p.x - c.x) as f64 / self.scale;
        let y = (c.y - p.y) as f64 / self.scale;
        self.unproject(x, y)
    }

    fn describe_point(&self, p: DataPoint) -> Vec<(String, serde_json::Value)> {
        vec![
            ("lon".to_string(), json_number(p[0])),
            ("lat".to_string(), json_number(p[1])),
        ]
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Mapbox
// ─────────────────────────────────────────────────────────────────────────────

/// Web-mercator tile map: 512 px world at zoom 0, doubled per zoom level.
#[derive(Debug, Clone)]
pub struct MapboxTransform {
    pub id: SubplotId,
    pub area: Rect,
    pub center: DataPoint,
    pub zoom: f64,
}

impl MapboxTransform {
    pub fn new(id: &str, area: Rect, center: DataPoint, zoom: f64) -> Self {
        Self {
            id: SubplotId::new(id),
            area,
            center,
            zoom,
        }
    }

    fn world_size(&self) -> f64 {
        512.0 * 2f64.powf(self.zoom)
    }

    fn world_xy(&self, p: DataPoint) -> Option<(f64, f64)> {
        let ws = self.world_size();
        let y = mercator_y(p[1])?;
        Some(((p[0] + 180.0) / 360.0 * ws, (1.0 - y / PI) / 2.0 * ws))
    }
}

impl SubplotTransform for MapboxTransform {
    fn id(&self) -> &SubplotId {
        &self.id
    }

    fn kind(&self) -> SubplotKind {
        SubplotKind::Mapbox
    }

    fn plot_area(&self) -> Rect {
        self.area
    }

    fn to_screen(&self, p: DataPoint) -> Option<Pos2> {
        if !is_finite_point(p) {
            return None;
        }
        let (x, y) = self.world_xy(p)?;
        let (cx, cy) = self.world_xy(self.center)?;
        let c = self.area.center();
        finite_pos(c.x as f64 + x - cx, c.y as f64 + y - cy)
    }

    fn from_screen(&self, p: Pos2) -> Option<DataPoint> {
        if !(p.x.is_finite() && p.y.is_finite()) {
            return None;
        }
        let ws = self.world_size();
        let (cx, cy) = self.world_xy(self.center)?;
        let c = self.area.center();
        let x = cx + (p.x - c.x) as f64;
        let y = cy + (p.y - c.y) as f64;
        let lon = x / ws * 360.0 - 180.0;
        let lat = inverse_mercator_y((1.0 - 2.0 * y / ws) * PI);
        Some([lon, lat])
    }

    fn describe_point(&self, p: DataPoint) -> Vec<(String, serde_json::Value)> {
        vec![
            ("lon".to_string(), json_number(p[0])),
            ("lat".to_string(), json_number(p[1])),
        ]
    }
}

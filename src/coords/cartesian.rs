//! Cartesian subplots: one x axis and one y axis, each linear, logarithmic,
//! date or category.

use egui::{Pos2, Rect};
use serde::{Deserialize, Serialize};

use super::{
    finite_pos, json_number, DataPoint, LassoEntry, LassoMap, RangeEntry, RangeMap, SubplotId,
    SubplotKind, SubplotTransform,
};
use crate::geometry::{BoxRegion, Polygon};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisType {
    #[default]
    Linear,
    /// Base-10 logarithmic; only positive values are placeable.
    Log,
    /// Milliseconds since the Unix epoch (UTC).
    Date,
    /// Category index; `categories[i]` names position `i`.
    Category,
}

/// One cartesian axis: a visible data range pinned to two pixel positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    /// Axis id used as key in reported ranges (`"x"`, `"y2"`, ...).
    pub id: String,
    pub axis_type: AxisType,
    /// Visible range in data units. `range[0]` sits at `pixels[0]`.
    pub range: [f64; 2],
    /// Screen positions of the two range ends along this axis.
    pub pixels: [f32; 2],
    #[serde(default)]
    pub categories: Vec<String>,
}

impl Axis {
    pub fn linear(id: &str, range: [f64; 2], pixels: [f32; 2]) -> Self {
        Self {
            id: id.to_string(),
            axis_type: AxisType::Linear,
            range,
            pixels,
            categories: Vec::new(),
        }
    }

    pub fn log(id: &str, range: [f64; 2], pixels: [f32; 2]) -> Self {
        Self {
            axis_type: AxisType::Log,
            ..Self::linear(id, range, pixels)
        }
    }

    pub fn date(id: &str, range_ms: [f64; 2], pixels: [f32; 2]) -> Self {
        Self {
            axis_type: AxisType::Date,
            ..Self::linear(id, range_ms, pixels)
        }
    }

    /// Category axis spanning all categories with half a slot of padding.
    pub fn category(id: &str, categories: Vec<String>, pixels: [f32; 2]) -> Self {
        let n = categories.len().max(1) as f64;
        Self {
            id: id.to_string(),
            axis_type: AxisType::Category,
            range: [-0.5, n - 0.5],
            pixels,
            categories,
        }
    }

    /// Convert a data value into the axis' linear space.
    fn to_linear(&self, v: f64) -> Option<f64> {
        if !v.is_finite() {
            return None;
        }
        match self.axis_type {
            AxisType::Log if v > 0.0 => Some(v.log10()),
            AxisType::Log => None,
            _ => Some(v),
        }
    }

    fn from_linear(&self, l: f64) -> f64 {
        match self.axis_type {
            AxisType::Log => 10f64.powf(l),
            _ => l,
        }
    }

    /// Data value → pixel position along this axis.
    pub fn d2p(&self, v: f64) -> Option<f64> {
        let l = self.to_linear(v)?;
        let r0 = self.to_linear(self.range[0])?;
        let r1 = self.to_linear(self.range[1])?;
        if r1 == r0 {
            return None;
        }
        let (p0, p1) = (self.pixels[0] as f64, self.pixels[1] as f64);
        Some(p0 + (l - r0) * (p1 - p0) / (r1 - r0))
    }

    /// Pixel position → data value.
    pub fn p2d(&self, px: f64) -> Option<f64> {
        if !px.is_finite() {
            return None;
        }
        let r0 = self.to_linear(self.range[0])?;
        let r1 = self.to_linear(self.range[1])?;
        let (p0, p1) = (self.pixels[0] as f64, self.pixels[1] as f64);
        if p1 == p0 {
            return None;
        }
        let v = self.from_linear(r0 + (px - p0) * (r1 - r0) / (p1 - p0));
        v.is_finite().then_some(v)
    }

    /// Public representation of a value on this axis.
    pub fn format_value(&self, v: f64) -> serde_json::Value {
        if !v.is_finite() {
            return serde_json::Value::Null;
        }
        match self.axis_type {
            AxisType::Date => match chrono::DateTime::from_timestamp_millis(v.round() as i64) {
                Some(dt) if dt.timestamp_subsec_millis() == 0 => {
                    serde_json::Value::String(dt.format("%Y-%m-%d %H:%M:%S").to_string())
                }
                Some(dt) => {
                    serde_json::Value::String(dt.format("%Y-%m-%d %H:%M:%S%.3f").to_string())
                }
                None => json_number(v),
            },
            AxisType::Category => {
                let idx = v.round();
                if idx >= 0.0 && (idx as usize) < self.categories.len() {
                    serde_json::Value::String(self.categories[idx as usize].clone())
                } else {
                    json_number(v)
                }
            }
            _ => json_number(v),
        }
    }
}

/// Milliseconds since the epoch for a UTC date-time, the value unit of
/// [`AxisType::Date`] axes.
pub fn date_value(dt: chrono::NaiveDateTime) -> f64 {
    use chrono::TimeZone;
    chrono::Utc.from_utc_datetime(&dt).timestamp_millis() as f64
}

/// A cartesian subplot (`xy`, `x2y2`, ...).
#[derive(Debug, Clone)]
pub struct CartesianTransform {
    pub id: SubplotId,
    pub x: Axis,
    pub y: Axis,
}

impl CartesianTransform {
    pub fn new(id: &str, x: Axis, y: Axis) -> Self {
        Self {
            id: SubplotId::new(id),
            x,
            y,
        }
    }

    /// Linear axes filling `area`, y growing upwards.
    pub fn linear(id: &str, area: Rect, x_range: [f64; 2], y_range: [f64; 2]) -> Self {
        Self::new(
            id,
            Axis::linear("x", x_range, [area.left(), area.right()]),
            Axis::linear("y", y_range, [area.bottom(), area.top()]),
        )
    }
}

impl SubplotTransform for CartesianTransform {
    fn id(&self) -> &SubplotId {
        &self.id
    }

    fn kind(&self) -> SubplotKind {
        SubplotKind::Cartesian
    }

    fn plot_area(&self) -> Rect {
        let (x0, x1) = (self.x.pixels[0], self.x.pixels[1]);
        let (y0, y1) = (self.y.pixels[0], self.y.pixels[1]);
        Rect::from_min_max(
            egui::pos2(x0.min(x1), y0.min(y1)),
            egui::pos2(x0.max(x1), y0.max(y1)),
        )
    }

    fn to_screen(&self, p: DataPoint) -> Option<Pos2> {
        finite_pos(self.x.d2p(p[0])?, self.y.d2p(p[1])?)
    }

    fn from_screen(&self, p: Pos2) -> Option<DataPoint> {
        Some([self.x.p2d(p.x as f64)?, self.y.p2d(p.y as f64)?])
    }

    fn describe_point(&self, p: DataPoint) -> Vec<(String, serde_json::Value)> {
        vec![
            ("x".to_string(), self.x.format_value(p[0])),
            ("y".to_string(), self.y.format_value(p[1])),
        ]
    }

    fn report_box(&self, region: &BoxRegion) -> RangeMap {
        let mut map = RangeMap::new();
        let (xa, xb) = region.x_span();
        let (ya, yb) = region.y_span();
        if let (Some(a), Some(b)) = (self.x.p2d(xa as f64), self.x.p2d(xb as f64)) {
            map.insert(self.x.id.clone(), RangeEntry::Span([a.min(b), a.max(b)]));
        }
        if let (Some(a), Some(b)) = (self.y.p2d(ya as f64), self.y.p2d(yb as f64)) {
            map.insert(self.y.id.clone(), RangeEntry::Span([a.min(b), a.max(b)]));
        }
        map
    }

    fn report_lasso(&self, polygon: &Polygon) -> LassoMap {
        let mut xs = Vec::with_capacity(polygon.vertices.len());
        let mut ys = Vec::with_capacity(polygon.vertices.len());
        for v in &polygon.vertices {
            if let Some([x, y]) = self.from_screen(*v) {
                xs.push(x);
                ys.push(y);
            }
        }
        let mut map = LassoMap::new();
        map.insert(self.x.id.clone(), LassoEntry::Values(xs));
        map.insert(self.y.id.clone(), LassoEntry::Values(ys));
        map
    }
}

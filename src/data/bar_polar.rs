//! Bars on polar subplots (wind roses). Regions pick a bar by its centroid
//! (middle radius, center angle); clicks hit the wedge.

use egui::Pos2;
use serde_json::{Map, Value};

use super::traces::{coordinate_fields, Hit, HitTarget, PointExtras, Selectable, SelectableItem, TraceMeta};
use crate::coords::{DataPoint, SubplotTransform};

#[derive(Debug, Clone)]
pub struct BarPolarTrace {
    pub meta: TraceMeta,
    pub r: Vec<f64>,
    /// Wedge center angles in degrees.
    pub theta: Vec<f64>,
    /// Radius the wedges start from.
    pub base: f64,
    /// Angular width in degrees. Defaults to an even split of the circle.
    pub width: Option<f64>,
    pub extras: PointExtras,
}

/// Signed angle from `b` to `a`, folded into `[-180, 180)`.
fn angle_between(a: f64, b: f64) -> f64 {
    (a - b + 180.0).rem_euclid(360.0) - 180.0
}

impl BarPolarTrace {
    pub fn new(name: &str, subplot: &str, r: Vec<f64>, theta: Vec<f64>) -> Self {
        Self {
            meta: TraceMeta::new(name, subplot),
            r,
            theta,
            base: 0.0,
            width: None,
            extras: PointExtras::default(),
        }
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    pub fn wedge_width(&self) -> f64 {
        self.width
            .unwrap_or_else(|| 360.0 / self.len().max(1) as f64)
    }

    fn centroid(&self, i: usize) -> DataPoint {
        [(self.base + self.r[i]) / 2.0, self.theta[i]]
    }

    /// Whether the data-space position `(r, theta)` lies in wedge `i`.
    fn wedge_contains(&self, i: usize, p: DataPoint) -> bool {
        let (lo, hi) = (self.base.min(self.r[i]), self.base.max(self.r[i]));
        (lo..=hi).contains(&p[0]) && angle_between(p[1], self.theta[i]).abs() <= self.wedge_width() / 2.0
    }
}

impl Selectable for BarPolarTrace {
    fn meta(&self) -> &TraceMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut TraceMeta {
        &mut self.meta
    }

    fn type_name(&self) -> &'static str {
        "barpolar"
    }

    fn len(&self) -> usize {
        self.r.len().min(self.theta.len())
    }

    fn items(&self, transform: &dyn SubplotTransform) -> Vec<SelectableItem> {
        (0..self.len())
            .map(|i| SelectableItem::place(transform, self.meta.index, i, self.centroid(i)))
            .collect()
    }

    fn hit_test(&self, transform: &dyn SubplotTransform, pos: Pos2, _radius: f32) -> Option<Hit> {
        let p = transform.from_screen(pos)?;
        (0..self.len())
            .find(|&i| self.wedge_contains(i, p))
            .map(|i| Hit {
                trace_index: self.meta.index,
                target: HitTarget::Point {
                    point_index: i,
                    point_numbers: None,
                },
                distance: 0.0,
            })
    }

    fn point_fields(&self, point: usize, transform: &dyn SubplotTransform) -> Map<String, Value> {
        if point >= self.len() {
            return Map::new();
        }
        let mut fields = coordinate_fields(transform, [self.r[point], self.theta[point]]);
        self.extras.write(point, &mut fields);
        fields
    }
}

//! Bar traces: regions select a bar by its center, clicks hit its rectangle.

use egui::{Pos2, Rect};
use serde_json::{Map, Value};

use super::traces::{
    coordinate_fields, Hit, HitTarget, PointExtras, Selectable, SelectableItem, TraceMeta,
};
use crate::coords::{DataPoint, SubplotTransform};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    /// Bars grow along y.
    #[default]
    Vertical,
    /// Bars grow along x.
    Horizontal,
}

#[derive(Debug, Clone)]
pub struct BarTrace {
    pub meta: TraceMeta,
    /// Bar position on the category/position axis.
    pub positions: Vec<f64>,
    /// Bar length measured from `base`.
    pub values: Vec<f64>,
    pub base: f64,
    /// Bar thickness in data units.
    pub width: f64,
    pub orientation: Orientation,
    pub extras: PointExtras,
}

impl BarTrace {
    pub fn new(name: &str, subplot: &str, positions: Vec<f64>, values: Vec<f64>) -> Self {
        Self {
            meta: TraceMeta::new(name, subplot),
            positions,
            values,
            base: 0.0,
            width: 0.8,
            orientation: Orientation::Vertical,
            extras: PointExtras::default(),
        }
    }

    pub fn horizontal(mut self) -> Self {
        self.orientation = Orientation::Horizontal;
        self
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    fn oriented(&self, pos: f64, val: f64) -> DataPoint {
        match self.orientation {
            Orientation::Vertical => [pos, val],
            Orientation::Horizontal => [val, pos],
        }
    }

    /// Screen rectangle of bar `i`.
    pub fn bar_rect(&self, transform: &dyn SubplotTransform, i: usize) -> Option<Rect> {
        let pos = *self.positions.get(i)?;
        let val = *self.values.get(i)?;
        let half = self.width / 2.0;
        let a: Pos2 = transform.to_screen(self.oriented(pos - half, self.base))?;
        let b: Pos2 = transform.to_screen(self.oriented(pos + half, val))?;
        Some(Rect::from_two_pos(a, b))
    }

    fn center(&self, i: usize) -> DataPoint {
        self.oriented(self.positions[i], (self.base + self.values[i]) / 2.0)
    }
}

impl Selectable for BarTrace {
    fn meta(&self) -> &TraceMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut TraceMeta {
        &mut self.meta
    }

    fn type_name(&self) -> &'static str {
        "bar"
    }

    fn len(&self) -> usize {
        self.positions.len().min(self.values.len())
    }

    fn items(&self, transform: &dyn SubplotTransform) -> Vec<SelectableItem> {
        (0..self.len())
            .map(|i| SelectableItem::place(transform, self.meta.index, i, self.center(i)))
            .collect()
    }

    fn hit_test(&self, transform: &dyn SubplotTransform, pos: Pos2, _radius: f32) -> Option<Hit> {
        (0..self.len())
            .find(|&i| self.bar_rect(transform, i).is_some_and(|r| r.contains(pos)))
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
        let mut fields =
            coordinate_fields(transform, self.oriented(self.positions[point], self.values[point]));
        self.extras.write(point, &mut fields);
        fields
    }
}

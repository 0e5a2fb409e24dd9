//! Carpet coordinates on cartesian subplots.
//!
//! A [`CarpetGrid`] samples the `(a, b)` → `(x, y)` mapping on a grid;
//! positions between grid lines are interpolated bilinearly. The carpet
//! itself ([`CarpetTrace`](super::CarpetTrace)) is never selectable, but
//! [`ScatterCarpetTrace`] markers placed on it are.

use serde_json::{Map, Value};

use super::traces::{PointExtras, Selectable, SelectableItem, TraceMeta};
use crate::coords::{json_number, DataPoint, SubplotTransform};

#[derive(Debug, Clone, PartialEq)]
pub struct CarpetGrid {
    /// Ascending `a` values of the grid columns.
    pub a: Vec<f64>,
    /// Ascending `b` values of the grid rows.
    pub b: Vec<f64>,
    /// `x[j][i]` is the x position of `(a[i], b[j])`.
    pub x: Vec<Vec<f64>>,
    pub y: Vec<Vec<f64>>,
}

/// Grid cell holding `v` and the fraction into it.
fn cell(axis: &[f64], v: f64) -> Option<(usize, f64)> {
    if !v.is_finite() || axis.len() < 2 {
        return None;
    }
    let i = axis.windows(2).position(|w| w[0] <= v && v <= w[1])?;
    let span = axis[i + 1] - axis[i];
    let t = if span > 0.0 { (v - axis[i]) / span } else { 0.0 };
    Some((i, t))
}

impl CarpetGrid {
    /// Parallelogram carpet: `(x, y) = origin + a * a_step + b * b_step`,
    /// sampled at the given `a` and `b` values.
    pub fn affine(a: Vec<f64>, b: Vec<f64>, origin: DataPoint, a_step: DataPoint, b_step: DataPoint) -> Self {
        let at = |ai: f64, bj: f64, k: usize| origin[k] + ai * a_step[k] + bj * b_step[k];
        let x = b.iter().map(|&bj| a.iter().map(|&ai| at(ai, bj, 0)).collect()).collect();
        let y = b.iter().map(|&bj| a.iter().map(|&ai| at(ai, bj, 1)).collect()).collect();
        Self { a, b, x, y }
    }

    /// Cartesian position of `(a, b)`. `None` outside the grid.
    pub fn to_xy(&self, ab: DataPoint) -> Option<DataPoint> {
        let (i, ta) = cell(&self.a, ab[0])?;
        let (j, tb) = cell(&self.b, ab[1])?;
        let lerp = |g: &Vec<Vec<f64>>| -> Option<f64> {
            let v00 = *g.get(j)?.get(i)?;
            let v10 = *g.get(j)?.get(i + 1)?;
            let v01 = *g.get(j + 1)?.get(i)?;
            let v11 = *g.get(j + 1)?.get(i + 1)?;
            let lo = v00 + (v10 - v00) * ta;
            let hi = v01 + (v11 - v01) * ta;
            Some(lo + (hi - lo) * tb)
        };
        Some([lerp(&self.x)?, lerp(&self.y)?])
    }
}

/// Markers positioned by carpet `(a, b)` coordinates.
#[derive(Debug, Clone)]
pub struct ScatterCarpetTrace {
    pub meta: TraceMeta,
    pub carpet: CarpetGrid,
    pub points: Vec<DataPoint>,
    pub extras: PointExtras,
}

impl ScatterCarpetTrace {
    pub fn new(name: &str, subplot: &str, carpet: CarpetGrid, points: Vec<DataPoint>) -> Self {
        Self {
            meta: TraceMeta::new(name, subplot),
            carpet,
            points,
            extras: PointExtras::default(),
        }
    }
}

impl Selectable for ScatterCarpetTrace {
    fn meta(&self) -> &TraceMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut TraceMeta {
        &mut self.meta
    }

    fn type_name(&self) -> &'static str {
        "scattercarpet"
    }

    fn len(&self) -> usize {
        self.points.len()
    }

    fn items(&self, transform: &dyn SubplotTransform) -> Vec<SelectableItem> {
        self.points
            .iter()
            .enumerate()
            .map(|(i, ab)| {
                // Off-carpet points stay unplaced.
                let xy = self.carpet.to_xy(*ab).unwrap_or([f64::NAN, f64::NAN]);
                let mut item = SelectableItem::place(transform, self.meta.index, i, xy);
                item.data = *ab;
                item
            })
            .collect()
    }

    fn point_fields(&self, point: usize, _transform: &dyn SubplotTransform) -> Map<String, Value> {
        let mut fields = Map::new();
        let Some(ab) = self.points.get(point) else {
            return fields;
        };
        fields.insert("a".to_string(), json_number(ab[0]));
        fields.insert("b".to_string(), json_number(ab[1]));
        self.extras.write(point, &mut fields);
        fields
    }
}

//! Box and violin plots. The sample points are selectable; the body (the
//! quartile box, or the violin's sample extent) can be clicked but never
//! enters a selection.

use egui::{Pos2, Rect};
use serde_json::{Map, Value};

use super::traces::{
    coordinate_fields, nearest_item, Hit, HitTarget, Selectable, SelectableItem, TraceMeta,
};
use crate::coords::SubplotTransform;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quartiles {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyShape {
    /// Quartile box.
    #[default]
    Box,
    /// Density outline over the full sample range.
    Violin,
}

#[derive(Debug, Clone)]
pub struct BoxTrace {
    pub meta: TraceMeta,
    pub shape: BodyShape,
    /// Position of the box along x.
    pub position: f64,
    pub samples: Vec<f64>,
    /// Body width in data units.
    pub width: f64,
}

impl BoxTrace {
    pub fn new(name: &str, subplot: &str, position: f64, samples: Vec<f64>) -> Self {
        Self {
            meta: TraceMeta::new(name, subplot),
            shape: BodyShape::Box,
            position,
            samples,
            width: 0.5,
        }
    }

    pub fn violin(name: &str, subplot: &str, position: f64, samples: Vec<f64>) -> Self {
        Self {
            shape: BodyShape::Violin,
            ..Self::new(name, subplot, position, samples)
        }
    }

    fn sample_extent(&self) -> Option<(f64, f64)> {
        self.samples
            .iter()
            .copied()
            .filter(|s| s.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// Linear-interpolated quartiles over the finite samples.
    pub fn quartiles(&self) -> Option<Quartiles> {
        let mut v: Vec<f64> = self.samples.iter().copied().filter(|s| s.is_finite()).collect();
        if v.is_empty() {
            return None;
        }
        v.sort_by(|a, b| a.total_cmp(b));
        let q = |p: f64| {
            let pos = p * (v.len() - 1) as f64;
            let lo = pos.floor() as usize;
            let hi = pos.ceil() as usize;
            v[lo] + (v[hi] - v[lo]) * (pos - lo as f64)
        };
        Some(Quartiles {
            q1: q(0.25),
            median: q(0.5),
            q3: q(0.75),
        })
    }

    pub fn body_rect(&self, transform: &dyn SubplotTransform) -> Option<Rect> {
        let (lo, hi) = match self.shape {
            BodyShape::Box => self.quartiles().map(|qs| (qs.q1, qs.q3))?,
            BodyShape::Violin => self.sample_extent()?,
        };
        let half = self.width / 2.0;
        let a: Pos2 = transform.to_screen([self.position - half, lo])?;
        let b: Pos2 = transform.to_screen([self.position + half, hi])?;
        Some(Rect::from_two_pos(a, b))
    }
}

impl Selectable for BoxTrace {
    fn meta(&self) -> &TraceMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut TraceMeta {
        &mut self.meta
    }

    fn type_name(&self) -> &'static str {
        match self.shape {
            BodyShape::Box => "box",
            BodyShape::Violin => "violin",
        }
    }

    fn len(&self) -> usize {
        self.samples.len()
    }

    fn items(&self, transform: &dyn SubplotTransform) -> Vec<SelectableItem> {
        self.samples
            .iter()
            .enumerate()
            .map(|(i, &y)| SelectableItem::place(transform, self.meta.index, i, [self.position, y]))
            .collect()
    }

    fn hit_test(&self, transform: &dyn SubplotTransform, pos: Pos2, radius: f32) -> Option<Hit> {
        if let Some(hit) = nearest_item(&self.items(transform), pos, radius) {
            return Some(hit);
        }
        self.body_rect(transform)
            .filter(|r| r.contains(pos))
            .map(|_| Hit {
                trace_index: self.meta.index,
                target: HitTarget::Element,
                distance: 0.0,
            })
    }

    fn point_fields(&self, point: usize, transform: &dyn SubplotTransform) -> Map<String, Value> {
        self.samples
            .get(point)
            .map(|&y| coordinate_fields(transform, [self.position, y]))
            .unwrap_or_default()
    }
}

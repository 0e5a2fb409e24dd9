//! Histogram traces. Each bin is one selectable item that stands for all the
//! samples falling into it.

use std::collections::BTreeMap;

use egui::{Pos2, Rect};
use serde_json::{Map, Value};

use super::traces::{coordinate_fields, Hit, HitTarget, Selectable, SelectableItem, TraceMeta};
use crate::coords::{json_number, SubplotTransform};

/// Bin numbers above this cannot be told apart in `f64`; such samples are
/// not counted.
const MAX_BIN_NUMBER: f64 = (1u64 << 53) as f64;

#[derive(Debug, Clone, PartialEq)]
pub struct Bin {
    /// Bin number counted from `bin_start`; reported as the point number.
    pub index: usize,
    pub start: f64,
    pub end: f64,
    /// Indices of the samples counted in this bin.
    pub point_numbers: Vec<usize>,
}

impl Bin {
    pub fn count(&self) -> usize {
        self.point_numbers.len()
    }

    pub fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }
}

#[derive(Debug, Clone)]
pub struct HistogramTrace {
    pub meta: TraceMeta,
    pub samples: Vec<f64>,
    /// Non-empty bins, ascending by [`Bin::index`].
    pub bins: Vec<Bin>,
}

impl HistogramTrace {
    /// Bin `samples` into bins of `bin_size` starting at `bin_start`. Only
    /// bins holding samples are kept. Non-finite samples, samples below
    /// `bin_start` and samples too far out to be binned are not counted.
    pub fn new(name: &str, subplot: &str, samples: Vec<f64>, bin_start: f64, bin_size: f64) -> Self {
        let mut grouped: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        if bin_size > 0.0 && bin_size.is_finite() && bin_start.is_finite() {
            for (i, &v) in samples.iter().enumerate() {
                if !v.is_finite() || v < bin_start {
                    continue;
                }
                let n = ((v - bin_start) / bin_size).floor();
                if !n.is_finite() || n >= MAX_BIN_NUMBER {
                    continue;
                }
                grouped.entry(n as usize).or_default().push(i);
            }
        }
        let bins = grouped
            .into_iter()
            .map(|(index, point_numbers)| {
                let start = bin_start + index as f64 * bin_size;
                Bin {
                    index,
                    start,
                    end: start + bin_size,
                    point_numbers,
                }
            })
            .collect();
        Self {
            meta: TraceMeta::new(name, subplot),
            samples,
            bins,
        }
    }

    /// Bin with number `index`, if it holds samples.
    pub fn bin(&self, index: usize) -> Option<&Bin> {
        self.bins
            .binary_search_by_key(&index, |b| b.index)
            .ok()
            .map(|i| &self.bins[i])
    }

    fn rect(transform: &dyn SubplotTransform, b: &Bin) -> Option<Rect> {
        let a: Pos2 = transform.to_screen([b.start, 0.0])?;
        let c: Pos2 = transform.to_screen([b.end, b.count() as f64])?;
        Some(Rect::from_two_pos(a, c))
    }

    pub fn bin_rect(&self, transform: &dyn SubplotTransform, bin: usize) -> Option<Rect> {
        Self::rect(transform, self.bin(bin)?)
    }
}

impl Selectable for HistogramTrace {
    fn meta(&self) -> &TraceMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut TraceMeta {
        &mut self.meta
    }

    fn type_name(&self) -> &'static str {
        "histogram"
    }

    fn len(&self) -> usize {
        self.bins.last().map_or(0, |b| b.index + 1)
    }

    fn items(&self, transform: &dyn SubplotTransform) -> Vec<SelectableItem> {
        self.bins
            .iter()
            .map(|b| {
                SelectableItem::place(transform, self.meta.index, b.index, [b.center(), b.count() as f64 / 2.0])
                    .with_point_numbers(b.point_numbers.clone())
            })
            .collect()
    }

    fn hit_test(&self, transform: &dyn SubplotTransform, pos: Pos2, _radius: f32) -> Option<Hit> {
        self.bins
            .iter()
            .find(|b| Self::rect(transform, b).is_some_and(|r| r.contains(pos)))
            .map(|b| Hit {
                trace_index: self.meta.index,
                target: HitTarget::Point {
                    point_index: b.index,
                    point_numbers: Some(b.point_numbers.clone()),
                },
                distance: 0.0,
            })
    }

    fn point_fields(&self, point: usize, transform: &dyn SubplotTransform) -> Map<String, Value> {
        let Some(b) = self.bin(point) else {
            return Map::new();
        };
        let mut fields = coordinate_fields(transform, [b.center(), b.count() as f64]);
        fields.insert(
            "binrange".to_string(),
            Value::Array(vec![json_number(b.start), json_number(b.end)]),
        );
        fields
    }
}

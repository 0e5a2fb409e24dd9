//! Trace capability shared by every selectable trace type.
//!
//! A trace turns its data into [`SelectableItem`]s through the transform of
//! the subplot it lives on. The selection engine never looks at trace data
//! directly; it only sees items, hits and the public fields of a point.

use downcast_rs::{impl_downcast, Downcast};
use egui::{pos2, Pos2};
use serde_json::{Map, Value};

use crate::coords::{DataPoint, SubplotId, SubplotTransform};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Visible,
    /// Listed in the legend but not drawn.
    LegendOnly,
    Hidden,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TraceMeta {
    /// Position in the chart's trace list (curve number); assigned on insert.
    pub index: usize,
    pub name: String,
    pub subplot: SubplotId,
    pub visible: Visibility,
}

impl TraceMeta {
    pub fn new(name: &str, subplot: &str) -> Self {
        Self {
            index: 0,
            name: name.to_string(),
            subplot: SubplotId::new(subplot),
            visible: Visibility::Visible,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible == Visibility::Visible
    }
}

/// One rendered, selectable unit (marker, bar, bin, sample).
#[derive(Debug, Clone, PartialEq)]
pub struct SelectableItem {
    pub trace_index: usize,
    pub point_index: usize,
    /// Sample indices aggregated into this item (histogram bins).
    pub point_numbers: Option<Vec<usize>>,
    /// Screen position; NaN when the point cannot be placed.
    pub screen: Pos2,
    pub data: DataPoint,
    /// Rendered at all (false for gaps and filtered points).
    pub visible: bool,
}

impl SelectableItem {
    /// Item with a screen position from `transform`, or an unplaced item when
    /// the data point is non-finite or outside the projection.
    pub fn place(
        transform: &dyn SubplotTransform,
        trace_index: usize,
        point_index: usize,
        data: DataPoint,
    ) -> Self {
        let screen = transform.to_screen(data);
        Self {
            trace_index,
            point_index,
            point_numbers: None,
            screen: screen.unwrap_or(pos2(f32::NAN, f32::NAN)),
            data,
            visible: screen.is_some(),
        }
    }

    pub fn with_point_numbers(mut self, point_numbers: Vec<usize>) -> Self {
        self.point_numbers = Some(point_numbers);
        self
    }

    /// Takes part in containment and hit tests.
    pub fn is_placed(&self) -> bool {
        self.visible && self.screen.x.is_finite() && self.screen.y.is_finite()
    }

    /// Indices stored in the selection set for this item: the aggregated
    /// samples of a bin, the item index otherwise.
    pub fn selection_keys(&self) -> Vec<usize> {
        match &self.point_numbers {
            Some(n) => n.clone(),
            None => vec![self.point_index],
        }
    }
}

/// What a click landed on.
#[derive(Debug, Clone, PartialEq)]
pub enum HitTarget {
    Point {
        point_index: usize,
        point_numbers: Option<Vec<usize>>,
    },
    /// A part of the trace that is not a selectable item (e.g. a box body).
    Element,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    pub trace_index: usize,
    pub target: HitTarget,
    /// Pixel distance from the pointer; zero when inside a shape.
    pub distance: f32,
}

impl Hit {
    pub fn point_index(&self) -> Option<usize> {
        match &self.target {
            HitTarget::Point { point_index, .. } => Some(*point_index),
            HitTarget::Element => None,
        }
    }

    /// Selection-set indices of the hit item; empty for element hits.
    pub fn selection_keys(&self) -> Vec<usize> {
        match &self.target {
            HitTarget::Point {
                point_numbers: Some(n),
                ..
            } => n.clone(),
            HitTarget::Point { point_index, .. } => vec![*point_index],
            HitTarget::Element => Vec::new(),
        }
    }
}

/// Closest placed item within `radius` of `pos`. Ties go to the lower index.
pub fn nearest_item(items: &[SelectableItem], pos: Pos2, radius: f32) -> Option<Hit> {
    let mut best: Option<(&SelectableItem, f32)> = None;
    for item in items.iter().filter(|it| it.is_placed()) {
        let d = item.screen.distance(pos);
        if d > radius {
            continue;
        }
        if best.map_or(true, |(_, bd)| d < bd) {
            best = Some((item, d));
        }
    }
    best.map(|(item, distance)| Hit {
        trace_index: item.trace_index,
        target: HitTarget::Point {
            point_index: item.point_index,
            point_numbers: item.point_numbers.clone(),
        },
        distance,
    })
}

/// Shared field helpers for traces carrying ids / customdata / text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointExtras {
    pub ids: Option<Vec<String>>,
    pub customdata: Option<Vec<Value>>,
    pub text: Option<Vec<String>>,
}

impl PointExtras {
    pub fn write(&self, point: usize, fields: &mut Map<String, Value>) {
        if let Some(id) = self.ids.as_ref().and_then(|v| v.get(point)) {
            fields.insert("id".to_string(), Value::String(id.clone()));
        }
        if let Some(cd) = self.customdata.as_ref().and_then(|v| v.get(point)) {
            fields.insert("customdata".to_string(), cd.clone());
        }
        if let Some(t) = self.text.as_ref().and_then(|v| v.get(point)) {
            fields.insert("text".to_string(), Value::String(t.clone()));
        }
    }
}

/// Subplot-specific coordinate fields of a data point.
pub fn coordinate_fields(transform: &dyn SubplotTransform, data: DataPoint) -> Map<String, Value> {
    transform.describe_point(data).into_iter().collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Selectable
// ─────────────────────────────────────────────────────────────────────────────

/// A trace the selection engine can work with.
pub trait Selectable: Downcast {
    fn meta(&self) -> &TraceMeta;
    fn meta_mut(&mut self) -> &mut TraceMeta;

    /// Trace type name (`"scatter"`, `"bar"`, ...).
    fn type_name(&self) -> &'static str;

    /// Whether a selection can ever be stored for this trace.
    fn supports_selection(&self) -> bool {
        true
    }

    /// Number of selectable points (bins for histograms).
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn items(&self, transform: &dyn SubplotTransform) -> Vec<SelectableItem>;

    fn hit_test(&self, transform: &dyn SubplotTransform, pos: Pos2, radius: f32) -> Option<Hit> {
        nearest_item(&self.items(transform), pos, radius)
    }

    /// Public fields reported for one point in event payloads.
    fn point_fields(&self, point: usize, transform: &dyn SubplotTransform) -> Map<String, Value>;
}
impl_downcast!(Selectable);

// ─────────────────────────────────────────────────────────────────────────────
// CarpetTrace
// ─────────────────────────────────────────────────────────────────────────────

/// Carpet grid geometry. Drawn, but never selectable.
#[derive(Debug, Clone)]
pub struct CarpetTrace {
    pub meta: TraceMeta,
    pub points: Vec<DataPoint>,
}

impl CarpetTrace {
    pub fn new(name: &str, subplot: &str, points: Vec<DataPoint>) -> Self {
        Self {
            meta: TraceMeta::new(name, subplot),
            points,
        }
    }
}

impl Selectable for CarpetTrace {
    fn meta(&self) -> &TraceMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut TraceMeta {
        &mut self.meta
    }

    fn type_name(&self) -> &'static str {
        "carpet"
    }

    fn supports_selection(&self) -> bool {
        false
    }

    fn len(&self) -> usize {
        self.points.len()
    }

    fn items(&self, _transform: &dyn SubplotTransform) -> Vec<SelectableItem> {
        Vec::new()
    }

    fn hit_test(&self, _: &dyn SubplotTransform, _: Pos2, _: f32) -> Option<Hit> {
        None
    }

    fn point_fields(&self, point: usize, transform: &dyn SubplotTransform) -> Map<String, Value> {
        self.points
            .get(point)
            .map(|p| coordinate_fields(transform, *p))
            .unwrap_or_default()
    }
}

//! Marker traces. The same type serves cartesian, polar (`r`, `theta`),
//! ternary (`a`, `b`), geo and mapbox (`lon`, `lat`) subplots; the subplot
//! transform decides what the two data components mean.

use serde_json::{Map, Value};

use super::traces::{coordinate_fields, PointExtras, Selectable, SelectableItem, TraceMeta};
use crate::coords::{DataPoint, SubplotTransform};

#[derive(Debug, Clone)]
pub struct ScatterTrace {
    pub meta: TraceMeta,
    pub points: Vec<DataPoint>,
    pub extras: PointExtras,
    /// Lines-only traces draw no markers and cannot be selected.
    pub markers: bool,
}

impl ScatterTrace {
    pub fn new(name: &str, subplot: &str, points: Vec<DataPoint>) -> Self {
        Self {
            meta: TraceMeta::new(name, subplot),
            points,
            extras: PointExtras::default(),
            markers: true,
        }
    }

    pub fn with_ids(mut self, ids: Vec<String>) -> Self {
        self.extras.ids = Some(ids);
        self
    }

    pub fn with_customdata(mut self, customdata: Vec<Value>) -> Self {
        self.extras.customdata = Some(customdata);
        self
    }

    pub fn with_text(mut self, text: Vec<String>) -> Self {
        self.extras.text = Some(text);
        self
    }

    pub fn lines_only(mut self) -> Self {
        self.markers = false;
        self
    }
}

impl Selectable for ScatterTrace {
    fn meta(&self) -> &TraceMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut TraceMeta {
        &mut self.meta
    }

    fn type_name(&self) -> &'static str {
        "scatter"
    }

    fn supports_selection(&self) -> bool {
        self.markers
    }

    fn len(&self) -> usize {
        self.points.len()
    }

    fn items(&self, transform: &dyn SubplotTransform) -> Vec<SelectableItem> {
        self.points
            .iter()
            .enumerate()
            .map(|(i, p)| SelectableItem::place(transform, self.meta.index, i, *p))
            .collect()
    }

    fn point_fields(&self, point: usize, transform: &dyn SubplotTransform) -> Map<String, Value> {
        let mut fields = match self.points.get(point) {
            Some(p) => coordinate_fields(transform, *p),
            None => Map::new(),
        };
        self.extras.write(point, &mut fields);
        fields
    }
}

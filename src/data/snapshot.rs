//! Traces backed by an item list captured from a rendering layer.
//!
//! Useful when the host already knows where every marker was drawn; the
//! subplot transform is then only used to describe points.

use serde_json::{Map, Value};

use super::traces::{coordinate_fields, PointExtras, Selectable, SelectableItem, TraceMeta};
use crate::coords::SubplotTransform;

#[derive(Debug, Clone)]
pub struct SnapshotTrace {
    pub meta: TraceMeta,
    pub items: Vec<SelectableItem>,
    pub extras: PointExtras,
}

impl SnapshotTrace {
    pub fn new(name: &str, subplot: &str, items: Vec<SelectableItem>) -> Self {
        Self {
            meta: TraceMeta::new(name, subplot),
            items,
            extras: PointExtras::default(),
        }
    }
}

impl Selectable for SnapshotTrace {
    fn meta(&self) -> &TraceMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut TraceMeta {
        &mut self.meta
    }

    fn type_name(&self) -> &'static str {
        "snapshot"
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn items(&self, _transform: &dyn SubplotTransform) -> Vec<SelectableItem> {
        // Captured items may come from another trace; relabel them.
        self.items
            .iter()
            .map(|it| SelectableItem {
                trace_index: self.meta.index,
                ..it.clone()
            })
            .collect()
    }

    fn point_fields(&self, point: usize, transform: &dyn SubplotTransform) -> Map<String, Value> {
        let mut fields = self
            .items
            .iter()
            .find(|it| it.point_index == point)
            .map(|it| coordinate_fields(transform, it.data))
            .unwrap_or_default();
        self.extras.write(point, &mut fields);
        fields
    }
}

//! Choropleth traces on geo subplots. Each location is one item placed at its
//! region's centroid; clicks land anywhere inside the region outline.

use egui::Pos2;
use serde_json::{Map, Value};

use super::traces::{nearest_item, Hit, HitTarget, PointExtras, Selectable, SelectableItem, TraceMeta};
use crate::coords::{json_number, DataPoint, SubplotTransform};
use crate::geometry::Polygon;

#[derive(Debug, Clone)]
pub struct ChoroplethTrace {
    pub meta: TraceMeta,
    pub locations: Vec<String>,
    pub z: Vec<f64>,
    /// `(lon, lat)` centroid of each location.
    pub centroids: Vec<DataPoint>,
    /// `(lon, lat)` outline of each location; may be empty.
    pub outlines: Vec<Vec<DataPoint>>,
    pub extras: PointExtras,
}

impl ChoroplethTrace {
    pub fn new(
        name: &str,
        subplot: &str,
        locations: Vec<String>,
        z: Vec<f64>,
        centroids: Vec<DataPoint>,
    ) -> Self {
        Self {
            meta: TraceMeta::new(name, subplot),
            locations,
            z,
            centroids,
            outlines: Vec::new(),
            extras: PointExtras::default(),
        }
    }

    pub fn with_outlines(mut self, outlines: Vec<Vec<DataPoint>>) -> Self {
        self.outlines = outlines;
        self
    }

    pub fn with_text(mut self, text: Vec<String>) -> Self {
        self.extras.text = Some(text);
        self
    }

    /// Screen outline of location `i`. Vertices the projection cannot show
    /// are left out.
    pub fn screen_outline(&self, transform: &dyn SubplotTransform, i: usize) -> Option<Polygon> {
        let outline = self.outlines.get(i)?;
        let vertices: Vec<Pos2> = outline.iter().filter_map(|p| transform.to_screen(*p)).collect();
        let poly = Polygon::new(vertices);
        (!poly.is_degenerate()).then_some(poly)
    }
}

impl Selectable for ChoroplethTrace {
    fn meta(&self) -> &TraceMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut TraceMeta {
        &mut self.meta
    }

    fn type_name(&self) -> &'static str {
        "choropleth"
    }

    fn len(&self) -> usize {
        self.locations.len().min(self.centroids.len())
    }

    fn items(&self, transform: &dyn SubplotTransform) -> Vec<SelectableItem> {
        (0..self.len())
            .map(|i| SelectableItem::place(transform, self.meta.index, i, self.centroids[i]))
            .collect()
    }

    fn hit_test(&self, transform: &dyn SubplotTransform, pos: Pos2, radius: f32) -> Option<Hit> {
        let inside = (0..self.len()).find(|&i| {
            self.screen_outline(transform, i)
                .is_some_and(|poly| poly.contains(pos))
        });
        match inside {
            Some(i) => Some(Hit {
                trace_index: self.meta.index,
                target: HitTarget::Point {
                    point_index: i,
                    point_numbers: None,
                },
                distance: 0.0,
            }),
            None => nearest_item(&self.items(transform), pos, radius),
        }
    }

    fn point_fields(&self, point: usize, _transform: &dyn SubplotTransform) -> Map<String, Value> {
        let mut fields = Map::new();
        let Some(location) = self.locations.get(point) else {
            return fields;
        };
        fields.insert("location".to_string(), Value::String(location.clone()));
        if let Some(z) = self.z.get(point) {
            fields.insert("z".to_string(), json_number(*z));
        }
        self.extras.write(point, &mut fields);
        fields
    }
}

//! Coordinate adapters between data space and screen space, one per subplot
//! kind.
//!
//! Every subplot exposes a [`SubplotTransform`]. The engine only ever asks it
//! for `to_screen` (to place items), `from_screen` (to report what a region
//! covers in data units) and the plot area (to stretch `h`/`v` boxes).
//! Inverse mappings may fail for points outside a projection; such points are
//! dropped from reports instead of producing errors.

use std::collections::BTreeMap;

use egui::{pos2, Pos2, Rect};
use serde::{Deserialize, Serialize};

use crate::geometry::{BoxRegion, Polygon, Region};

pub mod cartesian;
pub mod geo;
pub mod polar;
pub mod ternary;

pub use cartesian::{Axis, AxisType, CartesianTransform};
pub use geo::{GeoProjection, GeoTransform, MapboxTransform};
pub use polar::PolarTransform;
pub use ternary::TernaryTransform;

/// A point in data space. Its meaning depends on the subplot kind:
/// `(x, y)`, `(r, theta)`, `(a, b)` or `(lon, lat)`.
pub type DataPoint = [f64; 2];

/// Identifier of a subplot (`"xy"`, `"polar"`, `"geo2"`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubplotId(pub String);

impl SubplotId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SubplotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SubplotId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubplotKind {
    Cartesian,
    Polar,
    Ternary,
    Geo,
    Mapbox,
}

// ─────────────────────────────────────────────────────────────────────────────
// Report types
// ─────────────────────────────────────────────────────────────────────────────

/// One entry of a reported box range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RangeEntry {
    /// `[min, max]` along one cartesian axis.
    Span([f64; 2]),
    /// Top-left and bottom-right corner for non-cartesian subplots.
    Corners(Vec<DataPoint>),
}

/// One entry of reported lasso vertices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LassoEntry {
    /// Vertex values along one cartesian axis.
    Values(Vec<f64>),
    /// Vertex pairs for non-cartesian subplots.
    Vertices(Vec<DataPoint>),
}

pub type RangeMap = BTreeMap<String, RangeEntry>;
pub type LassoMap = BTreeMap<String, LassoEntry>;

/// Data-space description of a region.
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectedRegion {
    Range(RangeMap),
    Lasso(LassoMap),
}

// ─────────────────────────────────────────────────────────────────────────────
// SubplotTransform
// ─────────────────────────────────────────────────────────────────────────────

/// Data ↔ screen mapping of one subplot instance.
pub trait SubplotTransform {
    fn id(&self) -> &SubplotId;
    fn kind(&self) -> SubplotKind;

    /// Screen rectangle the subplot draws into.
    fn plot_area(&self) -> Rect;

    /// Map a data point to screen space. `None` for non-finite input or
    /// points the projection cannot show.
    fn to_screen(&self, p: DataPoint) -> Option<Pos2>;

    /// Inverse of [`to_screen`](Self::to_screen). `None` where no inverse
    /// exists.
    fn from_screen(&self, p: Pos2) -> Option<DataPoint>;

    /// Public field values describing a data point (`x`/`y`, `r`/`theta`,
    /// `a`/`b`/`c`, `lon`/`lat`).
    fn describe_point(&self, p: DataPoint) -> Vec<(String, serde_json::Value)>;

    /// Whether a screen position belongs to this subplot.
    fn hit(&self, p: Pos2) -> bool {
        self.plot_area().contains(p)
    }

    /// Data-space range of a box region.
    fn report_box(&self, region: &BoxRegion) -> RangeMap {
        let (tl, br) = region.corners();
        let corners: Vec<DataPoint> = [tl, br]
            .iter()
            .filter_map(|c| self.from_screen(*c))
            .collect();
        let mut map = RangeMap::new();
        map.insert(self.id().0.clone(), RangeEntry::Corners(corners));
        map
    }

    /// Data-space vertices of a lasso polygon.
    fn report_lasso(&self, polygon: &Polygon) -> LassoMap {
        let vertices: Vec<DataPoint> = polygon
            .vertices
            .iter()
            .filter_map(|v| self.from_screen(*v))
            .collect();
        let mut map = LassoMap::new();
        map.insert(self.id().0.clone(), LassoEntry::Vertices(vertices));
        map
    }
}

/// Report what `region` covers in the data space of `transform`.
pub fn project_region(transform: &dyn SubplotTransform, region: &Region) -> ProjectedRegion {
    match region {
        Region::Box(b) => ProjectedRegion::Range(transform.report_box(b)),
        Region::Lasso(poly) => ProjectedRegion::Lasso(transform.report_lasso(poly)),
    }
}

/// Convert a finite `(x, y)` pixel pair computed in f64 into a `Pos2`.
pub(crate) fn finite_pos(x: f64, y: f64) -> Option<Pos2> {
    if x.is_finite() && y.is_finite() {
        Some(pos2(x as f32, y as f32))
    } else {
        None
    }
}

pub(crate) fn is_finite_point(p: DataPoint) -> bool {
    p[0].is_finite() && p[1].is_finite()
}

pub(crate) fn json_number(v: f64) -> serde_json::Value {
    serde_json::Number::from_f64(v)
        .map(serde_json::Value::Number)
        .unwrap_or(serde_json::Value::Null)
}

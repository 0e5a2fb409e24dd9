//! Region geometry: box and lasso shapes in screen space and the containment
//! test used to decide which rendered items fall inside a selection.
//!
//! All coordinates here are screen pixels (`egui::Pos2`, y grows downwards).
//! Data-space reporting lives in [`crate::coords`].

use egui::{pos2, Pos2, Rect};
use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// SelectDirection
// ─────────────────────────────────────────────────────────────────────────────

/// Which constraint a box region applies.
///
/// - `Any`: full 2-D rectangle test.
/// - `H`: only the x-bound applies (full vertical extent is selected).
/// - `V`: only the y-bound applies (full horizontal extent is selected).
/// - `D`: a diagonal band of fixed perpendicular width along the drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectDirection {
    #[default]
    Any,
    H,
    V,
    D,
}

impl std::fmt::Display for SelectDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SelectDirection::Any => "any",
            SelectDirection::H => "h",
            SelectDirection::V => "v",
            SelectDirection::D => "d",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for SelectDirection {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "any" => Ok(SelectDirection::Any),
            "h" => Ok(SelectDirection::H),
            "v" => Ok(SelectDirection::V),
            "d" => Ok(SelectDirection::D),
            other => Err(format!("unknown select direction '{}'", other)),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Box
// ─────────────────────────────────────────────────────────────────────────────

/// A box region spanned by two corners.
///
/// For `H`/`V` boxes the ignored axis is usually stretched over the whole
/// plot area (see [`resolve_box`]) so that the outline covers what is
/// selected, but the containment test ignores it either way.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxRegion {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
    pub direction: SelectDirection,
    /// Full perpendicular width of the band used by `D` boxes (pixels).
    pub band_width: f32,
}

impl BoxRegion {
    pub fn new(a: Pos2, b: Pos2, direction: SelectDirection) -> Self {
        Self {
            x0: a.x,
            y0: a.y,
            x1: b.x,
            y1: b.y,
            direction,
            band_width: 12.0,
        }
    }

    pub fn with_band_width(mut self, width: f32) -> Self {
        self.band_width = width;
        self
    }

    pub fn x_span(&self) -> (f32, f32) {
        (self.x0.min(self.x1), self.x0.max(self.x1))
    }

    pub fn y_span(&self) -> (f32, f32) {
        (self.y0.min(self.y1), self.y0.max(self.y1))
    }

    /// Top-left and bottom-right corner of the axis-aligned hull.
    pub fn corners(&self) -> (Pos2, Pos2) {
        let (xmin, xmax) = self.x_span();
        let (ymin, ymax) = self.y_span();
        (pos2(xmin, ymin), pos2(xmax, ymax))
    }

    /// A box that cannot contain anything meaningful (zero extent along the
    /// axis it tests, or non-finite corners).
    pub fn is_degenerate(&self) -> bool {
        if ![self.x0, self.y0, self.x1, self.y1].iter().all(|v| v.is_finite()) {
            return true;
        }
        let (xmin, xmax) = self.x_span();
        let (ymin, ymax) = self.y_span();
        match self.direction {
            SelectDirection::Any => xmax <= xmin || ymax <= ymin,
            SelectDirection::H => xmax <= xmin,
            SelectDirection::V => ymax <= ymin,
            SelectDirection::D => xmax <= xmin && ymax <= ymin,
        }
    }

    pub fn contains(&self, p: Pos2) -> bool {
        if !(p.x.is_finite() && p.y.is_finite()) {
            return false;
        }
        let (xmin, xmax) = self.x_span();
        let (ymin, ymax) = self.y_span();
        let in_x = xmin <= p.x && p.x <= xmax;
        let in_y = ymin <= p.y && p.y <= ymax;
        match self.direction {
            SelectDirection::Any => in_x && in_y,
            SelectDirection::H => in_x,
            SelectDirection::V => in_y,
            SelectDirection::D => self.in_diagonal_band(p),
        }
    }

    fn in_diagonal_band(&self, p: Pos2) -> bool {
        let (ax, ay) = (self.x0 as f64, self.y0 as f64);
        let (dx, dy) = (self.x1 as f64 - ax, self.y1 as f64 - ay);
        let len_sq = dx * dx + dy * dy;
        if len_sq <= 0.0 {
            return false;
        }
        let (px, py) = (p.x as f64 - ax, p.y as f64 - ay);
        let t = (px * dx + py * dy) / len_sq;
        if !(0.0..=1.0).contains(&t) {
            return false;
        }
        let dist = (px * dy - py * dx).abs() / len_sq.sqrt();
        dist <= self.band_width as f64 / 2.0
    }

    /// Closed outline (first vertex not repeated) in drawing order.
    pub fn outline(&self) -> Vec<Pos2> {
        match self.direction {
            SelectDirection::D => {
                let (dx, dy) = (self.x1 - self.x0, self.y1 - self.y0);
                let len = (dx * dx + dy * dy).sqrt();
                if len <= 0.0 {
                    return vec![pos2(self.x0, self.y0)];
                }
                let h = self.band_width / 2.0;
                let (nx, ny) = (-dy / len * h, dx / len * h);
                vec![
                    pos2(self.x0 + nx, self.y0 + ny),
                    pos2(self.x1 + nx, self.y1 + ny),
                    pos2(self.x1 - nx, self.y1 - ny),
                    pos2(self.x0 - nx, self.y0 - ny),
                ]
            }
            _ => vec![
                pos2(self.x0, self.y0),
                pos2(self.x0, self.y1),
                pos2(self.x1, self.y1),
                pos2(self.x1, self.y0),
            ],
        }
    }
}

/// Turn a raw drag (start corner, current corner) into a box region.
///
/// `Any` collapses to an `H` band when the drag is thinner than
/// `min(dx * 0.6, min_select)` vertically and to a `V` band when it is that
/// thin horizontally; otherwise it stays a full rectangle. `H`/`V` bands are
/// stretched over `area` along the ignored axis.
pub fn resolve_box(
    start: Pos2,
    current: Pos2,
    direction: SelectDirection,
    area: Rect,
    min_select: f32,
    band_width: f32,
) -> BoxRegion {
    let dx = (current.x - start.x).abs();
    let dy = (current.y - start.y).abs();
    let resolved = match direction {
        SelectDirection::Any => {
            if dy < (dx * 0.6).min(min_select) {
                SelectDirection::H
            } else if dx < (dy * 0.6).min(min_select) {
                SelectDirection::V
            } else {
                SelectDirection::Any
            }
        }
        other => other,
    };
    let region = match resolved {
        SelectDirection::H => BoxRegion::new(
            pos2(start.x, area.top()),
            pos2(current.x, area.bottom()),
            SelectDirection::H,
        ),
        SelectDirection::V => BoxRegion::new(
            pos2(area.left(), start.y),
            pos2(area.right(), current.y),
            SelectDirection::V,
        ),
        other => BoxRegion::new(start, current, other),
    };
    region.with_band_width(band_width)
}

// ─────────────────────────────────────────────────────────────────────────────
// Lasso
// ─────────────────────────────────────────────────────────────────────────────

/// An ordered lasso polygon. Treated as closed: the last vertex connects back
/// to the first even if they differ.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub vertices: Vec<Pos2>,
}

impl Polygon {
    pub fn new(vertices: Vec<Pos2>) -> Self {
        Self { vertices }
    }

    pub fn is_degenerate(&self) -> bool {
        if self.vertices.len() < 3 {
            return true;
        }
        if !self.vertices.iter().all(|v| v.x.is_finite() && v.y.is_finite()) {
            return true;
        }
        self.signed_area().abs() <= f64::EPSILON
    }

    fn signed_area(&self) -> f64 {
        let n = self.vertices.len();
        let mut acc = 0.0;
        for i in 0..n {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % n];
            acc += a.x as f64 * b.y as f64 - b.x as f64 * a.y as f64;
        }
        acc / 2.0
    }

    pub fn bounds(&self) -> Option<Rect> {
        let first = *self.vertices.first()?;
        let mut rect = Rect::from_min_max(first, first);
        for v in &self.vertices[1..] {
            rect.extend_with(*v);
        }
        Some(rect)
    }

    /// Ray-casting containment; points on an edge count as inside.
    pub fn contains(&self, p: Pos2) -> bool {
        if !(p.x.is_finite() && p.y.is_finite()) || self.vertices.len() < 3 {
            return false;
        }
        match self.bounds() {
            Some(b) if b.contains(p) => {}
            _ => return false,
        }

        let (px, py) = (p.x as f64, p.y as f64);
        let mut inside = false;
        let mut prev = self.vertices[self.vertices.len() - 1];
        for &cur in &self.vertices {
            let (ax, ay) = (prev.x as f64, prev.y as f64);
            let (bx, by) = (cur.x as f64, cur.y as f64);
            if on_segment(px, py, ax, ay, bx, by) {
                return true;
            }
            if (by > py) != (ay > py) {
                let x_cross = (ax - bx) * (py - by) / (ay - by) + bx;
                if px < x_cross {
                    inside = !inside;
                }
            }
            prev = cur;
        }
        inside
    }
}

fn on_segment(px: f64, py: f64, ax: f64, ay: f64, bx: f64, by: f64) -> bool {
    let (abx, aby) = (bx - ax, by - ay);
    let (apx, apy) = (px - ax, py - ay);
    let cross = abx * apy - aby * apx;
    if cross.abs() > 1e-6 {
        return false;
    }
    let dot = apx * abx + apy * aby;
    dot >= 0.0 && dot <= abx * abx + aby * aby
}

// ─────────────────────────────────────────────────────────────────────────────
// Region
// ─────────────────────────────────────────────────────────────────────────────

/// The shape of one selection gesture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Region {
    Box(BoxRegion),
    Lasso(Polygon),
}

impl Region {
    pub fn contains(&self, p: Pos2) -> bool {
        match self {
            Region::Box(b) => b.contains(p),
            Region::Lasso(poly) => poly.contains(p),
        }
    }

    pub fn is_degenerate(&self) -> bool {
        match self {
            Region::Box(b) => b.is_degenerate(),
            Region::Lasso(poly) => poly.is_degenerate(),
        }
    }

    pub fn is_lasso(&self) -> bool {
        matches!(self, Region::Lasso(_))
    }

    pub fn outline(&self) -> Vec<Pos2> {
        match self {
            Region::Box(b) => b.outline(),
            Region::Lasso(poly) => poly.vertices.clone(),
        }
    }
}

/// Free-function form of [`Region::contains`].
#[inline]
pub fn contains(region: &Region, p: Pos2) -> bool {
    region.contains(p)
}

// ─────────────────────────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────────────────────────

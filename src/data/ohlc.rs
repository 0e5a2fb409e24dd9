//! Financial traces (`ohlc` and `candlestick`). Regions pick a candle by its
//! x position and the middle of its open/close span; clicks hit the whole
//! low-high extent.

use egui::{Pos2, Rect};
use serde_json::{Map, Value};

use super::traces::{coordinate_fields, Hit, HitTarget, PointExtras, Selectable, SelectableItem, TraceMeta};
use crate::coords::{json_number, DataPoint, SubplotTransform};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FinanceStyle {
    /// Open/close ticks on a high-low line.
    #[default]
    Ohlc,
    /// Filled open/close body with wicks.
    Candlestick,
}

#[derive(Debug, Clone)]
pub struct OhlcTrace {
    pub meta: TraceMeta,
    pub x: Vec<f64>,
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
    pub style: FinanceStyle,
    /// Candle width in x data units. Defaults to 0.6 of the smallest gap
    /// between neighbouring candles.
    pub width: Option<f64>,
    pub extras: PointExtras,
}

impl OhlcTrace {
    pub fn new(
        name: &str,
        subplot: &str,
        x: Vec<f64>,
        open: Vec<f64>,
        high: Vec<f64>,
        low: Vec<f64>,
        close: Vec<f64>,
    ) -> Self {
        Self {
            meta: TraceMeta::new(name, subplot),
            x,
            open,
            high,
            low,
            close,
            style: FinanceStyle::Ohlc,
            width: None,
            extras: PointExtras::default(),
        }
    }

    pub fn candlestick(mut self) -> Self {
        self.style = FinanceStyle::Candlestick;
        self
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    pub fn candle_width(&self) -> f64 {
        if let Some(w) = self.width {
            return w;
        }
        let mut xs: Vec<f64> = self.x.iter().copied().filter(|v| v.is_finite()).collect();
        xs.sort_by(|a, b| a.total_cmp(b));
        let gap = xs
            .windows(2)
            .map(|w| w[1] - w[0])
            .filter(|d| *d > 0.0)
            .fold(f64::INFINITY, f64::min);
        if gap.is_finite() {
            gap * 0.6
        } else {
            1.0
        }
    }

    /// Point where regions test a candle.
    fn anchor(&self, i: usize) -> DataPoint {
        [self.x[i], (self.open[i] + self.close[i]) / 2.0]
    }

    /// Screen rectangle spanning the candle from low to high.
    pub fn candle_rect(&self, transform: &dyn SubplotTransform, i: usize) -> Option<Rect> {
        if i >= self.len() {
            return None;
        }
        let half = self.candle_width() / 2.0;
        let a: Pos2 = transform.to_screen([self.x[i] - half, self.low[i]])?;
        let b: Pos2 = transform.to_screen([self.x[i] + half, self.high[i]])?;
        Some(Rect::from_two_pos(a, b))
    }
}

impl Selectable for OhlcTrace {
    fn meta(&self) -> &TraceMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut TraceMeta {
        &mut self.meta
    }

    fn type_name(&self) -> &'static str {
        match self.style {
            FinanceStyle::Ohlc => "ohlc",
            FinanceStyle::Candlestick => "candlestick",
        }
    }

    fn len(&self) -> usize {
        [self.x.len(), self.open.len(), self.high.len(), self.low.len(), self.close.len()]
            .into_iter()
            .min()
            .unwrap_or(0)
    }

    fn items(&self, transform: &dyn SubplotTransform) -> Vec<SelectableItem> {
        (0..self.len())
            .map(|i| SelectableItem::place(transform, self.meta.index, i, self.anchor(i)))
            .collect()
    }

    fn hit_test(&self, transform: &dyn SubplotTransform, pos: Pos2, _radius: f32) -> Option<Hit> {
        (0..self.len())
            .find(|&i| self.candle_rect(transform, i).is_some_and(|r| r.contains(pos)))
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
        let mut fields = coordinate_fields(transform, self.anchor(point));
        fields.remove("y");
        for (key, v) in [
            ("open", self.open[point]),
            ("high", self.high[point]),
            ("low", self.low[point]),
            ("close", self.close[point]),
        ] {
            fields.insert(key.to_string(), json_number(v));
        }
        self.extras.write(point, &mut fields);
        fields
    }
}

//! Normalized input events fed into a chart by the host.
//!
//! Positions are screen pixels, times are milliseconds on any monotonic
//! clock the host chooses. Mouse and touch input share [`PointerEvent`].

use egui::{Modifiers, Pos2, Vec2};

use crate::config::{ClickMode, DragMode};
use crate::coords::SubplotId;
use crate::geometry::SelectDirection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerSource {
    #[default]
    Mouse,
    Touch,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub pos: Pos2,
    pub time_ms: f64,
    pub modifiers: Modifiers,
    pub source: PointerSource,
}

impl PointerEvent {
    pub fn new(pos: Pos2, time_ms: f64) -> Self {
        Self {
            pos,
            time_ms,
            modifiers: Modifiers::NONE,
            source: PointerSource::Mouse,
        }
    }

    pub fn touch(pos: Pos2, time_ms: f64) -> Self {
        Self {
            source: PointerSource::Touch,
            ..Self::new(pos, time_ms)
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn shift(self) -> Self {
        self.with_modifiers(Modifiers::SHIFT)
    }

    pub fn alt(self) -> Self {
        self.with_modifiers(Modifiers::ALT)
    }
}

/// Wheel / trackpad scroll over the chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollEvent {
    pub pos: Pos2,
    pub delta: Vec2,
    pub time_ms: f64,
}

/// Layout changes that affect in-flight gestures and retained regions.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutUpdate {
    /// Axis ranges changed (zoom, pan, autorange). `None` means all subplots.
    Ranges(Option<SubplotId>),
    DragMode(DragMode),
    ClickMode(ClickMode),
    SelectDirection(SelectDirection),
}

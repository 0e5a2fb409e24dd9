//! Drag gesture state machine: `Idle -> Dragging -> Idle`.
//!
//! The tracker only follows the pointer and builds the region; deciding
//! membership and emitting events is left to the chart.

use egui::{Pos2, Rect};

use crate::coords::SubplotId;
use crate::geometry::{resolve_box, Polygon, Region, SelectDirection};
use crate::selection::SelectMode;

/// Shape drawn by a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    Box,
    Lasso,
}

/// Rate limit for region extensions.
#[derive(Debug, Clone, Copy)]
pub struct Throttle {
    interval_ms: f64,
    last_ms: Option<f64>,
}

impl Throttle {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms,
            last_ms: None,
        }
    }

    /// `true` (and the interval restarts) when at least `interval_ms` passed
    /// since the last accepted call.
    pub fn ready(&mut self, now_ms: f64) -> bool {
        match self.last_ms {
            Some(last) if now_ms - last < self.interval_ms => false,
            _ => {
                self.last_ms = Some(now_ms);
                true
            }
        }
    }
}

/// An in-flight drag.
#[derive(Debug, Clone)]
pub struct DragGesture {
    pub subplot: SubplotId,
    pub kind: GestureKind,
    pub start: Pos2,
    pub current: Pos2,
    /// Lasso vertices, starting with the down point.
    pub path: Vec<Pos2>,
    pub mode: SelectMode,
    /// Extend the retained regions of the subplot instead of replacing them.
    pub merge: bool,
    /// Traces taking part (visible and selectable on `subplot`).
    pub traces: Vec<usize>,
    /// Pointer left the click radius.
    pub started: bool,
    /// Processed moves, one `selecting` each.
    pub extensions: usize,
    throttle: Throttle,
    pending: Option<Pos2>,
}

impl DragGesture {
    fn extend(&mut self, pos: Pos2) -> bool {
        let moved = pos != self.current;
        self.current = pos;
        if self.kind == GestureKind::Lasso && self.path.last() != Some(&pos) {
            self.path.push(pos);
        }
        moved || self.kind == GestureKind::Lasso
    }

    /// Region described by the drag so far.
    pub fn region(
        &self,
        direction: SelectDirection,
        area: Rect,
        min_select: f32,
        band_width: f32,
    ) -> Region {
        match self.kind {
            GestureKind::Box => Region::Box(resolve_box(
                self.start,
                self.current,
                direction,
                area,
                min_select,
                band_width,
            )),
            GestureKind::Lasso => Region::Lasso(Polygon::new(self.path.clone())),
        }
    }
}

/// Result of feeding a pointer move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// No drag in flight, or still within the click radius.
    Ignored,
    /// Throttled; the position is kept for the next extension or the release.
    Pending,
    /// The region grew; a `selecting` update is due.
    Extended,
}

/// Result of a pointer release.
#[derive(Debug, Clone)]
pub enum Release {
    /// No drag in flight.
    Idle,
    /// The pointer never left the click radius.
    Click(DragGesture),
    /// A finished drag with its final position applied.
    Drag(DragGesture),
}

#[derive(Debug, Clone, Default)]
pub struct DragTracker {
    active: Option<DragGesture>,
}

pub struct DragStart {
    pub subplot: SubplotId,
    pub kind: GestureKind,
    pub pos: Pos2,
    pub mode: SelectMode,
    pub merge: bool,
    pub traces: Vec<usize>,
    pub throttle_ms: f64,
}

impl DragTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, s: DragStart) {
        self.active = Some(DragGesture {
            subplot: s.subplot,
            kind: s.kind,
            start: s.pos,
            current: s.pos,
            path: vec![s.pos],
            mode: s.mode,
            merge: s.merge,
            traces: s.traces,
            started: false,
            extensions: 0,
            throttle: Throttle::new(s.throttle_ms),
            pending: None,
        });
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    pub fn active(&self) -> Option<&DragGesture> {
        self.active.as_ref()
    }

    pub fn on_move(&mut self, pos: Pos2, time_ms: f64, min_drag: f32) -> MoveOutcome {
        let Some(g) = self.active.as_mut() else {
            return MoveOutcome::Ignored;
        };
        if !g.started {
            if g.start.distance(pos) < min_drag {
                return MoveOutcome::Ignored;
            }
            g.started = true;
        }
        if !g.throttle.ready(time_ms) {
            // Lasso vertices are recorded on every move; only updates wait.
            if g.kind == GestureKind::Lasso {
                g.extend(pos);
            }
            g.pending = Some(pos);
            return MoveOutcome::Pending;
        }
        g.pending = None;
        if g.extend(pos) {
            g.extensions += 1;
            MoveOutcome::Extended
        } else {
            MoveOutcome::Ignored
        }
    }

    /// End the drag. A throttled position and the release position are
    /// always applied.
    pub fn finish(&mut self, pos: Pos2, min_drag: f32) -> Release {
        let Some(mut g) = self.active.take() else {
            return Release::Idle;
        };
        if !g.started && g.start.distance(pos) < min_drag {
            return Release::Click(g);
        }
        g.started = true;
        if let Some(p) = g.pending.take() {
            g.extend(p);
        }
        g.extend(pos);
        Release::Drag(g)
    }

    /// Drop the in-flight drag without committing.
    pub fn cancel(&mut self) -> Option<DragGesture> {
        self.active.take()
    }
}

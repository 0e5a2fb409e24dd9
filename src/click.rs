//! Click interpretation: single vs. double click timing and the toggle rules
//! of click-to-select.

use egui::{Modifiers, Pos2};

use crate::data::Hit;
use crate::selection::{SelectMode, SelectionStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickKind {
    Single,
    /// Second click within the double-click delay of the previous one.
    Double,
}

/// Tracks the previous click to classify the next one.
#[derive(Debug, Clone, Default)]
pub struct ClickTracker {
    last: Option<(Pos2, f64)>,
}

impl ClickTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify a click at `time_ms`. A double click consumes the pending
    /// click, so a third click starts over as a single one.
    pub fn register(&mut self, pos: Pos2, time_ms: f64, delay_ms: f64) -> ClickKind {
        match self.last.take() {
            Some((_, t)) if time_ms - t <= delay_ms => ClickKind::Double,
            _ => {
                self.last = Some((pos, time_ms));
                ClickKind::Single
            }
        }
    }

    /// Forget the pending click (a drag happened in between).
    pub fn reset(&mut self) {
        self.last = None;
    }
}

/// Press that may turn into a click once released.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Press {
    pub pos: Pos2,
    pub time_ms: f64,
    pub moved: bool,
}

impl Press {
    pub fn new(pos: Pos2, time_ms: f64) -> Self {
        Self {
            pos,
            time_ms,
            moved: false,
        }
    }

    /// Record pointer travel; once beyond `min_drag` the press is a drag.
    pub fn track(&mut self, pos: Pos2, min_drag: f32) {
        if self.pos.distance(pos) >= min_drag {
            self.moved = true;
        }
    }

    pub fn is_click(&self, release: Pos2, min_drag: f32) -> bool {
        !self.moved && self.pos.distance(release) < min_drag
    }
}

/// Store change requested by a selecting click.
#[derive(Debug, Clone, PartialEq)]
pub enum ClickAction {
    /// The clicked item was the whole selection: reset everything.
    ClearAll,
    /// Merge per-trace candidates with `mode`.
    Apply {
        mode: SelectMode,
        candidates: Vec<(usize, Vec<usize>)>,
    },
}

/// Decide what a click on `hit` does to the selection of `traces` (the
/// selectable traces of the clicked subplot).
///
/// Clicking the only selected item (or the only selected bin) clears
/// everything, whatever the modifiers. Otherwise `alt` subtracts, `shift`
/// toggles the item in or out, and a plain click replaces the selection of
/// every trace on the subplot.
pub fn resolve_click(
    store: &SelectionStore,
    hit: &Hit,
    traces: &[usize],
    modifiers: Modifiers,
) -> ClickAction {
    let keys = hit.selection_keys();
    let only_this = traces.iter().all(|&t| {
        let sel = store.get(t).as_deref().unwrap_or(&[]);
        if t == hit.trace_index {
            sel == keys.as_slice()
        } else {
            sel.is_empty()
        }
    });
    if only_this && !keys.is_empty() {
        return ClickAction::ClearAll;
    }

    let already = keys.iter().any(|&k| store.is_selected(hit.trace_index, k));
    let mode = match SelectMode::from_modifiers(modifiers) {
        SelectMode::Add if already => SelectMode::Subtract,
        other => other,
    };
    let candidates = traces
        .iter()
        .map(|&t| {
            if t == hit.trace_index {
                (t, keys.clone())
            } else {
                (t, Vec::new())
            }
        })
        .collect();
    ClickAction::Apply { mode, candidates }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::HitTarget;
    use egui::pos2;

    fn hit(trace: usize, point: usize) -> Hit {
        Hit {
            trace_index: trace,
            target: HitTarget::Point {
                point_index: point,
                point_numbers: None,
            },
            distance: 0.0,
        }
    }

    #[test]
    fn double_click_window() {
        let mut c = ClickTracker::new();
        let p = pos2(0.0, 0.0);
        assert_eq!(c.register(p, 0.0, 300.0), ClickKind::Single);
        assert_eq!(c.register(p, 250.0, 300.0), ClickKind::Double);
        assert_eq!(c.register(p, 400.0, 300.0), ClickKind::Single);
        assert_eq!(c.register(p, 800.0, 300.0), ClickKind::Single);
        c.reset();
        assert_eq!(c.register(p, 900.0, 300.0), ClickKind::Single);
    }

    #[test]
    fn press_becomes_drag_after_travel() {
        let mut press = Press::new(pos2(10.0, 10.0), 0.0);
        press.track(pos2(12.0, 12.0), 8.0);
        assert!(press.is_click(pos2(12.0, 12.0), 8.0));
        press.track(pos2(30.0, 10.0), 8.0);
        assert!(!press.is_click(pos2(10.0, 10.0), 8.0));
    }

    #[test]
    fn clicking_the_only_selected_point_clears() {
        let mut store = SelectionStore::new();
        store.set(0, Some(vec![7]));
        assert_eq!(
            resolve_click(&store, &hit(0, 7), &[0], Modifiers::SHIFT),
            ClickAction::ClearAll
        );
    }

    #[test]
    fn shift_toggles_and_plain_replaces() {
        let mut store = SelectionStore::new();
        store.set(0, Some(vec![7, 35]));
        let ClickAction::Apply { mode, .. } = resolve_click(&store, &hit(0, 7), &[0], Modifiers::SHIFT)
        else {
            panic!("expected apply");
        };
        assert_eq!(mode, SelectMode::Subtract);
        let ClickAction::Apply { mode, .. } = resolve_click(&store, &hit(0, 3), &[0], Modifiers::SHIFT)
        else {
            panic!("expected apply");
        };
        assert_eq!(mode, SelectMode::Add);
        let ClickAction::Apply { mode, candidates } =
            resolve_click(&store, &hit(0, 7), &[0, 1], Modifiers::NONE)
        else {
            panic!("expected apply");
        };
        assert_eq!(mode, SelectMode::Replace);
        assert_eq!(candidates, vec![(0, vec![7]), (1, vec![])]);
    }

    #[test]
    fn bin_is_cleared_when_it_is_the_only_selection() {
        let mut store = SelectionStore::new();
        store.set(0, Some(vec![1, 2]));
        let bin = Hit {
            trace_index: 0,
            target: HitTarget::Point {
                point_index: 1,
                point_numbers: Some(vec![1, 2]),
            },
            distance: 0.0,
        };
        assert_eq!(resolve_click(&store, &bin, &[0], Modifiers::NONE), ClickAction::ClearAll);
    }
}

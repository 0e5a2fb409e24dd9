//! Shared fixture for the interaction tests: one cartesian subplot with a
//! 40-point scatter trace and a pointer driver with a fake clock.
#![allow(dead_code)]

use std::sync::mpsc::Receiver;

use egui::{pos2, Modifiers, Pos2, Rect};
use liveselect::{
    CartesianTransform, ClickMode, DragMode, EventKind, Interaction, PointerEvent, ScatterTrace,
    SelectConfig, SelectionChart, SelectionEvent,
};

pub const PLOT_AREA: Rect = Rect {
    min: Pos2 { x: 80.0, y: 100.0 },
    max: Pos2 { x: 700.0, y: 420.0 },
};

/// Thin horizontal drag over points 0 and 1.
pub const SELECT_PATH: [[f32; 2]; 2] = [[93.0, 193.0], [143.0, 193.0]];
/// Lasso around point 10, closed back on its first vertex.
pub const LASSO_PATH: [[f32; 2]; 5] = [
    [316.0, 171.0],
    [318.0, 239.0],
    [335.0, 243.0],
    [328.0, 169.0],
    [316.0, 171.0],
];
/// Square around point 35.
pub const LASSO_35: [[f32; 2]; 5] = [
    [670.0, 330.0],
    [695.0, 330.0],
    [695.0, 350.0],
    [670.0, 350.0],
    [670.0, 330.0],
];
/// Empty spot inside the plot.
pub const EMPTY: [f32; 2] = [250.0, 380.0];

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Screen positions of the 40 mock points: a 10x4 grid with a few points
/// moved out to the left and one to the bottom right corner.
pub fn mock_pixels() -> Vec<[f32; 2]> {
    let mut px: Vec<[f32; 2]> = (0..40)
        .map(|i| [360.0 + (i % 10) as f32 * 30.0, 120.0 + (i / 10) as f32 * 60.0])
        .collect();
    px[0] = [100.0, 150.0];
    px[1] = [134.0, 116.0];
    px[4] = [203.0, 250.0];
    px[7] = [270.0, 160.0];
    px[10] = [324.0, 198.0];
    px[35] = [685.0, 341.0];
    px
}

pub fn px(i: usize) -> [f32; 2] {
    mock_pixels()[i]
}

/// Data coordinates: x runs 0..620 left to right, y 0..320 bottom to top.
pub fn mock_points() -> Vec<[f64; 2]> {
    mock_pixels()
        .iter()
        .map(|p| [(p[0] - 80.0) as f64, (420.0 - p[1]) as f64])
        .collect()
}

pub fn xy_subplot() -> CartesianTransform {
    CartesianTransform::linear("xy", PLOT_AREA, [0.0, 620.0], [0.0, 320.0])
}

pub fn mock_chart(dragmode: DragMode, clickmode: ClickMode) -> SelectionChart {
    init_tracing();
    let mut chart = SelectionChart::new(SelectConfig {
        dragmode,
        clickmode,
        ..Default::default()
    });
    chart.add_subplot(xy_subplot()).unwrap();
    chart
        .add_trace(ScatterTrace::new("mock", "xy", mock_points()))
        .unwrap();
    chart
}

/// Drives pointer input with a fake clock. Gestures are spaced far enough
/// apart that no two clicks pair up unless asked to.
pub struct Pointer {
    pub t: f64,
}

impl Default for Pointer {
    fn default() -> Self {
        Self { t: 1_000.0 }
    }
}

impl Pointer {
    fn ev(&self, p: [f32; 2], modifiers: Modifiers) -> PointerEvent {
        PointerEvent::new(pos2(p[0], p[1]), self.t).with_modifiers(modifiers)
    }

    /// Press at the first vertex, move through the rest 150 ms apart, release
    /// on the last one.
    pub fn drag(&mut self, chart: &mut SelectionChart, path: &[[f32; 2]], modifiers: Modifiers) -> Interaction {
        self.drag_spaced(chart, path, modifiers, 150.0)
    }

    pub fn drag_spaced(
        &mut self,
        chart: &mut SelectionChart,
        path: &[[f32; 2]],
        modifiers: Modifiers,
        spacing_ms: f64,
    ) -> Interaction {
        self.t += 1_000.0;
        chart.pointer_down(self.ev(path[0], modifiers));
        for p in &path[1..] {
            self.t += spacing_ms;
            chart.pointer_move(self.ev(*p, modifiers));
        }
        self.t += 10.0;
        let last = path[path.len() - 1];
        chart.pointer_up(self.ev(last, modifiers))
    }

    pub fn click(&mut self, chart: &mut SelectionChart, p: [f32; 2], modifiers: Modifiers) -> Interaction {
        self.t += 1_000.0;
        self.press(chart, p, modifiers)
    }

    pub fn double_click(&mut self, chart: &mut SelectionChart, p: [f32; 2]) -> Interaction {
        self.click(chart, p, Modifiers::NONE);
        self.t += 100.0;
        self.press(chart, p, Modifiers::NONE)
    }

    fn press(&mut self, chart: &mut SelectionChart, p: [f32; 2], modifiers: Modifiers) -> Interaction {
        chart.pointer_down(self.ev(p, modifiers));
        self.t += 20.0;
        chart.pointer_up(self.ev(p, modifiers))
    }
}

pub fn drain(rx: &Receiver<SelectionEvent>) -> Vec<SelectionEvent> {
    rx.try_iter().collect()
}

pub fn kinds(events: &[SelectionEvent]) -> Vec<EventKind> {
    events.iter().map(|e| e.kinds).collect()
}

pub fn count(events: &[SelectionEvent], kind: EventKind) -> usize {
    events.iter().filter(|e| e.is(kind)).count()
}

/// Payload of the last `SELECTED` event.
pub fn last_selected(events: &[SelectionEvent]) -> Option<&SelectionEvent> {
    events.iter().rev().find(|e| e.is(EventKind::SELECTED))
}

pub fn selected(chart: &SelectionChart, trace: usize) -> Option<Vec<usize>> {
    chart.selected_points(trace).clone()
}

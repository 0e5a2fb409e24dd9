mod common;

use common::*;
use egui::{pos2, vec2, Modifiers};
use liveselect::coords::{LassoEntry, RangeEntry};
use liveselect::{
    ClickMode, DragMode, EventKind, Interaction, LayoutUpdate, PointerEvent, ScatterTrace,
    ScrollEvent, SelectDirection, Visibility,
};

fn approx(a: [f64; 2], b: [f64; 2]) -> bool {
    (a[0] - b[0]).abs() < 1e-6 && (a[1] - b[1]).abs() < 1e-6
}

#[test]
fn box_select_reports_points_and_range() {
    let mut chart = mock_chart(DragMode::Select, ClickMode::EVENT_SELECT);
    let rx = chart.events().subscribe_all();
    let mut ptr = Pointer::default();

    assert_eq!(ptr.drag(&mut chart, &SELECT_PATH, Modifiers::NONE), Interaction::Selected);
    assert_eq!(selected(&chart, 0), Some(vec![0, 1]));

    let events = drain(&rx);
    assert_eq!(kinds(&events), vec![EventKind::SELECTING, EventKind::SELECTED]);
    let sel = events[1].selection.as_ref().expect("selected payload");
    assert_eq!(sel.point_ids(), vec![(0, 0), (0, 1)]);
    assert!(sel.lasso_points.is_none());
    assert_eq!(sel.outline.len(), 1);

    let range = sel.range.as_ref().expect("box range");
    let RangeEntry::Span(x) = &range["x"] else {
        panic!("x should be a span");
    };
    let RangeEntry::Span(y) = &range["y"] else {
        panic!("y should be a span");
    };
    assert!(approx(*x, [13.0, 63.0]), "x range {x:?}");
    assert!(approx(*y, [0.0, 320.0]), "y range {y:?}");

    // Field values follow the axis formatting.
    assert_eq!(sel.points[0].field("x"), Some(&serde_json::json!(20.0)));
}

#[test]
fn selecting_preview_dims_before_release() {
    let mut chart = mock_chart(DragMode::Select, ClickMode::EVENT_SELECT);
    let t = 1_000.0;
    chart.pointer_down(PointerEvent::new(pos2(93.0, 193.0), t));
    chart.pointer_move(PointerEvent::new(pos2(143.0, 193.0), t + 150.0));
    assert!(chart.is_dragging());
    assert_eq!(selected(&chart, 0), None, "nothing is committed mid-drag");

    let opacities = chart.item_opacities(0);
    assert_eq!(opacities.len(), 40);
    assert_eq!(opacities[0], 1.0);
    assert_eq!(opacities[5], 0.2);

    chart.pointer_up(PointerEvent::new(pos2(143.0, 193.0), t + 160.0));
    assert_eq!(chart.point_opacity(0, 1), 1.0);
    assert!(chart.dimmed(0, 2));
}

#[test]
fn lasso_select_emits_one_selecting_per_move() {
    let mut chart = mock_chart(DragMode::Lasso, ClickMode::EVENT_SELECT);
    let rx = chart.events().subscribe_all();
    let mut ptr = Pointer::default();

    assert_eq!(ptr.drag(&mut chart, &LASSO_PATH, Modifiers::NONE), Interaction::Selected);
    assert_eq!(selected(&chart, 0), Some(vec![10]));

    let events = drain(&rx);
    assert_eq!(count(&events, EventKind::SELECTING), 4);
    assert_eq!(count(&events, EventKind::SELECTED), 1);
    let sel = last_selected(&events).unwrap().selection.as_ref().unwrap();
    assert_eq!(sel.point_ids(), vec![(0, 10)]);
    assert!(sel.range.is_none());
    let lasso = sel.lasso_points.as_ref().expect("lasso points");
    let LassoEntry::Values(xs) = &lasso["x"] else {
        panic!("x should be a value list");
    };
    assert_eq!(xs.len(), 5);
    assert!((xs[0] - 236.0).abs() < 1e-6);
}

#[test]
fn throttled_lasso_still_selects_on_release() {
    let mut chart = mock_chart(DragMode::Lasso, ClickMode::EVENT_SELECT);
    let rx = chart.events().subscribe_all();
    let mut ptr = Pointer::default();

    ptr.drag_spaced(&mut chart, &LASSO_PATH, Modifiers::NONE, 10.0);
    assert_eq!(selected(&chart, 0), Some(vec![10]));
    let events = drain(&rx);
    assert_eq!(count(&events, EventKind::SELECTING), 1);
    assert_eq!(count(&events, EventKind::SELECTED), 1);
}

#[test]
fn alt_lasso_subtracts_from_box() {
    let mut chart = mock_chart(DragMode::Select, ClickMode::EVENT_SELECT);
    let rx = chart.events().subscribe_all();
    let mut ptr = Pointer::default();

    ptr.drag(&mut chart, &[[85.0, 105.0], [695.0, 415.0]], Modifiers::NONE);
    assert_eq!(selected(&chart, 0), Some((0..40).collect()));

    chart.set_dragmode(DragMode::Lasso);
    ptr.drag(&mut chart, &LASSO_35, Modifiers::ALT);
    let expected: Vec<usize> = (0..40).filter(|&i| i != 35).collect();
    assert_eq!(selected(&chart, 0), Some(expected));

    let events = drain(&rx);
    let sel = last_selected(&events).unwrap().selection.as_ref().unwrap();
    assert_eq!(sel.points.len(), 39);
    assert_eq!(sel.outline.len(), 2, "subtracting lasso merges with the box");
}

#[test]
fn vertical_direction_ignores_flat_drag() {
    let mut chart = mock_chart(DragMode::Select, ClickMode::EVENT_SELECT);
    chart.set_selectdirection(SelectDirection::V);
    let rx = chart.events().subscribe_all();
    let mut ptr = Pointer::default();

    assert_eq!(ptr.drag(&mut chart, &SELECT_PATH, Modifiers::NONE), Interaction::Cancelled);
    assert_eq!(selected(&chart, 0), None);
    assert_eq!(count(&drain(&rx), EventKind::SELECTED), 0);
}

#[test]
fn horizontal_direction_spans_full_height() {
    let mut chart = mock_chart(DragMode::Select, ClickMode::EVENT_SELECT);
    chart.set_selectdirection(SelectDirection::H);
    let mut ptr = Pointer::default();

    ptr.drag(&mut chart, &[[90.0, 300.0], [150.0, 380.0]], Modifiers::NONE);
    assert_eq!(selected(&chart, 0), Some(vec![0, 1]));
}

#[test]
fn diagonal_band_follows_the_drag() {
    let mut chart = mock_chart(DragMode::Select, ClickMode::EVENT_SELECT);
    chart.set_selectdirection(SelectDirection::D);
    let mut ptr = Pointer::default();

    ptr.drag(&mut chart, &[[95.0, 145.0], [208.0, 255.0]], Modifiers::NONE);
    assert_eq!(selected(&chart, 0), Some(vec![0, 4]));
}

#[test]
fn scroll_drops_retained_regions() {
    let mut chart = mock_chart(DragMode::Select, ClickMode::EVENT_SELECT);
    let rx = chart.events().subscribe_all();
    let mut ptr = Pointer::default();

    ptr.drag(&mut chart, &SELECT_PATH, Modifiers::SHIFT);
    assert_eq!(chart.outline(&"xy".into()).len(), 1);

    chart.scroll(ScrollEvent {
        pos: pos2(300.0, 300.0),
        delta: vec2(0.0, -3.0),
        time_ms: ptr.t,
    });
    assert!(chart.outline(&"xy".into()).is_empty());

    chart.set_dragmode(DragMode::Lasso);
    ptr.drag(&mut chart, &LASSO_PATH, Modifiers::SHIFT);
    assert_eq!(selected(&chart, 0), Some(vec![0, 1, 10]));
    let events = drain(&rx);
    let sel = last_selected(&events).unwrap().selection.as_ref().unwrap();
    assert_eq!(sel.outline.len(), 1, "no merge with the discarded box");
}

#[test]
fn relayout_cancels_drag_in_flight() {
    let mut chart = mock_chart(DragMode::Select, ClickMode::EVENT_SELECT);
    let rx = chart.events().subscribe_all();

    chart.pointer_down(PointerEvent::new(pos2(93.0, 193.0), 0.0));
    chart.pointer_move(PointerEvent::new(pos2(143.0, 193.0), 150.0));
    chart.relayout(LayoutUpdate::Ranges(None));
    assert!(!chart.is_dragging());
    assert_eq!(
        chart.pointer_up(PointerEvent::new(pos2(143.0, 193.0), 160.0)),
        Interaction::Ignored
    );

    assert_eq!(kinds(&drain(&rx)), vec![EventKind::SELECTING]);
    assert_eq!(selected(&chart, 0), None);
}

#[test]
fn switching_select_and_lasso_keeps_geometry_for_merging() {
    let mut chart = mock_chart(DragMode::Select, ClickMode::EVENT_SELECT);
    let rx = chart.events().subscribe_all();
    let mut ptr = Pointer::default();
    let xy = "xy".into();

    ptr.drag(&mut chart, &SELECT_PATH, Modifiers::NONE);
    assert!(chart.outline_visible(&xy));

    chart.set_dragmode(DragMode::Lasso);
    assert!(!chart.outline_visible(&xy));
    assert!(chart.outline(&xy).is_empty());

    ptr.drag(&mut chart, &LASSO_PATH, Modifiers::SHIFT);
    assert_eq!(selected(&chart, 0), Some(vec![0, 1, 10]));
    assert!(chart.outline_visible(&xy));
    let events = drain(&rx);
    let sel = last_selected(&events).unwrap().selection.as_ref().unwrap();
    assert_eq!(sel.outline.len(), 2);
}

#[test]
fn leaving_selection_dragmodes_clears_regions() {
    let mut chart = mock_chart(DragMode::Select, ClickMode::EVENT_SELECT);
    let rx = chart.events().subscribe_all();
    let mut ptr = Pointer::default();

    ptr.drag(&mut chart, &SELECT_PATH, Modifiers::NONE);
    chart.set_dragmode(DragMode::Zoom);
    chart.set_dragmode(DragMode::Select);
    ptr.drag(&mut chart, &[[310.0, 180.0], [340.0, 220.0]], Modifiers::SHIFT);

    assert_eq!(selected(&chart, 0), Some(vec![0, 1, 10]));
    let events = drain(&rx);
    let sel = last_selected(&events).unwrap().selection.as_ref().unwrap();
    assert_eq!(sel.outline.len(), 1);
}

#[test]
fn release_modifiers_decide_the_mode() {
    let mut chart = mock_chart(DragMode::Select, ClickMode::EVENT_SELECT);
    chart.set_selected_points(0, Some(vec![35])).unwrap();

    chart.pointer_down(PointerEvent::new(pos2(93.0, 193.0), 0.0));
    chart.pointer_move(PointerEvent::new(pos2(143.0, 193.0), 150.0));
    chart.pointer_up(PointerEvent::new(pos2(143.0, 193.0), 160.0).shift());

    assert_eq!(selected(&chart, 0), Some(vec![0, 1, 35]));
}

#[test]
fn selection_set_during_drag_is_kept() {
    let mut chart = mock_chart(DragMode::Select, ClickMode::EVENT_SELECT);

    chart.pointer_down(PointerEvent::new(pos2(93.0, 193.0), 0.0).shift());
    chart.pointer_move(PointerEvent::new(pos2(143.0, 193.0), 150.0).shift());
    chart.set_selected_points(0, Some(vec![35])).unwrap();
    assert_eq!(chart.item_opacities(0)[35], 1.0);
    chart.pointer_up(PointerEvent::new(pos2(143.0, 193.0), 160.0).shift());

    assert_eq!(selected(&chart, 0), Some(vec![0, 1, 35]));
}

#[test]
fn short_press_in_select_mode_is_a_click() {
    let mut chart = mock_chart(DragMode::Select, ClickMode::EVENT_SELECT);
    let p = px(7);
    chart.pointer_down(PointerEvent::new(pos2(p[0], p[1]), 0.0));
    chart.pointer_move(PointerEvent::new(pos2(p[0] + 3.0, p[1]), 10.0));
    let outcome = chart.pointer_up(PointerEvent::new(pos2(p[0] + 3.0, p[1]), 20.0));

    assert_eq!(outcome, Interaction::Selected);
    assert_eq!(selected(&chart, 0), Some(vec![7]));
}

#[test]
fn touch_drag_selects_like_mouse() {
    let mut chart = mock_chart(DragMode::Select, ClickMode::EVENT_SELECT);
    chart.touch_start(PointerEvent::touch(pos2(93.0, 193.0), 0.0));
    chart.touch_move(PointerEvent::touch(pos2(143.0, 193.0), 150.0));
    assert_eq!(
        chart.touch_end(PointerEvent::touch(pos2(143.0, 193.0), 160.0)),
        Interaction::Selected
    );
    assert_eq!(selected(&chart, 0), Some(vec![0, 1]));
}

#[test]
fn replacing_subplot_keeps_selection_but_drops_regions() {
    let mut chart = mock_chart(DragMode::Select, ClickMode::EVENT_SELECT);
    let mut ptr = Pointer::default();
    ptr.drag(&mut chart, &SELECT_PATH, Modifiers::NONE);

    chart.replace_subplot(xy_subplot()).unwrap();
    assert!(chart.outline(&"xy".into()).is_empty());
    assert_eq!(selected(&chart, 0), Some(vec![0, 1]));
}

#[test]
fn hidden_traces_take_no_part() {
    let mut chart = mock_chart(DragMode::Select, ClickMode::EVENT_SELECT);
    chart.set_visibility(0, Visibility::LegendOnly).unwrap();
    let rx = chart.events().subscribe_all();
    let mut ptr = Pointer::default();

    ptr.drag(&mut chart, &SELECT_PATH, Modifiers::NONE);
    assert_eq!(selected(&chart, 0), None);
    let events = drain(&rx);
    let sel = last_selected(&events).unwrap().selection.as_ref().unwrap();
    assert!(sel.points.is_empty());
}

#[test]
fn invisible_traces_are_left_out_of_box_and_lasso() {
    let mut chart = mock_chart(DragMode::Select, ClickMode::EVENT_SELECT);
    let hidden = chart
        .add_trace(ScatterTrace::new("copy", "xy", mock_points()))
        .unwrap();
    chart.set_visibility(hidden, Visibility::Hidden).unwrap();
    let rx = chart.events().subscribe_all();
    let mut ptr = Pointer::default();

    ptr.drag(&mut chart, &SELECT_PATH, Modifiers::NONE);
    assert_eq!(selected(&chart, 0), Some(vec![0, 1]));
    assert_eq!(selected(&chart, hidden), None);
    let events = drain(&rx);
    let sel = last_selected(&events).unwrap().selection.as_ref().unwrap();
    assert_eq!(sel.point_ids(), vec![(0, 0), (0, 1)]);

    chart.set_dragmode(DragMode::Lasso);
    ptr.drag(&mut chart, &LASSO_PATH, Modifiers::NONE);
    assert_eq!(selected(&chart, 0), Some(vec![10]));
    assert_eq!(selected(&chart, hidden), None);
    let events = drain(&rx);
    let sel = last_selected(&events).unwrap().selection.as_ref().unwrap();
    assert_eq!(sel.point_ids(), vec![(0, 10)]);
}

#[test]
fn same_region_twice_gives_same_selection() {
    let mut chart = mock_chart(DragMode::Select, ClickMode::EVENT_SELECT);
    let mut ptr = Pointer::default();

    ptr.drag(&mut chart, &SELECT_PATH, Modifiers::NONE);
    let first = selected(&chart, 0);
    ptr.drag(&mut chart, &SELECT_PATH, Modifiers::NONE);
    assert_eq!(selected(&chart, 0), first);

    chart.set_dragmode(DragMode::Lasso);
    ptr.drag(&mut chart, &LASSO_PATH, Modifiers::NONE);
    let first = selected(&chart, 0);
    ptr.drag(&mut chart, &LASSO_PATH, Modifiers::NONE);
    assert_eq!(selected(&chart, 0), first);
    assert_eq!(first, Some(vec![10]));
}

#[test]
fn points_without_coordinates_are_never_selected() {
    let mut chart = mock_chart(DragMode::Select, ClickMode::EVENT_SELECT);
    let gappy = chart
        .add_trace(ScatterTrace::new(
            "gappy",
            "xy",
            vec![[20.0, 270.0], [f64::NAN, 200.0], [40.0, f64::INFINITY], [54.0, 304.0]],
        ))
        .unwrap();
    let mut ptr = Pointer::default();

    ptr.drag(&mut chart, &SELECT_PATH, Modifiers::NONE);
    assert_eq!(selected(&chart, gappy), Some(vec![0, 3]));
    assert_eq!(selected(&chart, 0), Some(vec![0, 1]));
}

#[test]
fn pan_drag_never_selects() {
    let mut chart = mock_chart(DragMode::Pan, ClickMode::EVENT_SELECT);
    let rx = chart.events().subscribe_all();
    let mut ptr = Pointer::default();

    assert_eq!(ptr.drag(&mut chart, &SELECT_PATH, Modifiers::NONE), Interaction::Ignored);
    assert!(!chart.is_dragging());
    assert!(drain(&rx).is_empty());
    assert_eq!(selected(&chart, 0), None);
}

mod common;

use std::sync::Arc;

use common::*;
use egui::{pos2, Modifiers};
use liveselect::{ClickMode, DragMode, EventFilter, EventKind, Interaction, PointerEvent};
use parking_lot::Mutex;

#[test]
fn click_and_shift_click_sequence() {
    let mut chart = mock_chart(DragMode::Select, ClickMode::EVENT_SELECT);
    let rx = chart.events().subscribe_all();
    let mut ptr = Pointer::default();

    assert_eq!(ptr.click(&mut chart, px(35), Modifiers::NONE), Interaction::Selected);
    assert_eq!(selected(&chart, 0), Some(vec![35]));
    let events = drain(&rx);
    assert_eq!(kinds(&events), vec![EventKind::SELECTED, EventKind::CLICK]);
    assert_eq!(events[0].selection.as_ref().unwrap().point_ids(), vec![(0, 35)]);
    let click = events[1].click.as_ref().unwrap();
    assert_eq!(click.points[0].point_number, 35);
    assert_eq!(click.subplot, Some("xy".into()));

    ptr.click(&mut chart, px(7), Modifiers::SHIFT);
    assert_eq!(selected(&chart, 0), Some(vec![7, 35]));

    ptr.click(&mut chart, px(35), Modifiers::SHIFT);
    assert_eq!(selected(&chart, 0), Some(vec![7]));
    drain(&rx);

    // The only selected point: cleared even though shift is held.
    assert_eq!(ptr.click(&mut chart, px(7), Modifiers::SHIFT), Interaction::Deselected);
    assert_eq!(selected(&chart, 0), None);
    assert_eq!(kinds(&drain(&rx)), vec![EventKind::DESELECT, EventKind::CLICK]);

    ptr.click(&mut chart, px(4), Modifiers::NONE);
    assert_eq!(selected(&chart, 0), Some(vec![4]));
    ptr.click(&mut chart, px(4), Modifiers::NONE);
    assert_eq!(selected(&chart, 0), None);
}

#[test]
fn clicks_and_drags_are_interchangeable() {
    let mut chart = mock_chart(DragMode::Select, ClickMode::EVENT_SELECT);
    let rx = chart.events().subscribe_all();
    let mut ptr = Pointer::default();

    ptr.click(&mut chart, px(35), Modifiers::NONE);
    ptr.drag(&mut chart, &SELECT_PATH, Modifiers::SHIFT);
    assert_eq!(selected(&chart, 0), Some(vec![0, 1, 35]));
    let events = drain(&rx);
    assert_eq!(
        last_selected(&events).unwrap().selection.as_ref().unwrap().outline.len(),
        1
    );

    ptr.click(&mut chart, px(7), Modifiers::SHIFT);
    assert_eq!(selected(&chart, 0), Some(vec![0, 1, 7, 35]));

    chart.set_dragmode(DragMode::Lasso);
    ptr.drag(&mut chart, &LASSO_PATH, Modifiers::SHIFT);
    assert_eq!(selected(&chart, 0), Some(vec![0, 1, 7, 10, 35]));
    let events = drain(&rx);
    let sel = last_selected(&events).unwrap().selection.as_ref().unwrap();
    assert_eq!(sel.points.len(), 5);
    assert_eq!(sel.outline.len(), 2);

    ptr.drag(&mut chart, &LASSO_35, Modifiers::ALT);
    assert_eq!(selected(&chart, 0), Some(vec![0, 1, 7, 10]));
    let events = drain(&rx);
    assert_eq!(
        last_selected(&events).unwrap().selection.as_ref().unwrap().outline.len(),
        3
    );
}

#[test]
fn plain_click_drops_retained_regions() {
    let mut chart = mock_chart(DragMode::Select, ClickMode::EVENT_SELECT);
    let mut ptr = Pointer::default();
    let xy = "xy".into();

    ptr.drag(&mut chart, &SELECT_PATH, Modifiers::NONE);
    ptr.click(&mut chart, px(7), Modifiers::SHIFT);
    assert_eq!(chart.outline(&xy).len(), 1);

    ptr.click(&mut chart, px(4), Modifiers::NONE);
    assert!(chart.outline(&xy).is_empty());
    assert_eq!(selected(&chart, 0), Some(vec![4]));
}

#[test]
fn double_click_deselects_once() {
    let mut chart = mock_chart(DragMode::Select, ClickMode::EVENT_SELECT);
    let rx = chart.events().subscribe_all();
    let mut ptr = Pointer::default();

    ptr.click(&mut chart, px(7), Modifiers::NONE);
    drain(&rx);

    assert_eq!(ptr.double_click(&mut chart, EMPTY), Interaction::DoubleClick);
    assert_eq!(selected(&chart, 0), None);
    let events = drain(&rx);
    assert_eq!(
        kinds(&events),
        vec![EventKind::DESELECT, EventKind::DOUBLE_CLICK | EventKind::RELAYOUT]
    );
    assert!(events[1].is(EventKind::RELAYOUT));
    assert!(chart.outline(&"xy".into()).is_empty());
}

#[test]
fn double_click_without_selection_only_relayouts() {
    let mut chart = mock_chart(DragMode::Zoom, ClickMode::EVENT_SELECT);
    let rx = chart.events().subscribe_all();
    let mut ptr = Pointer::default();

    ptr.double_click(&mut chart, EMPTY);
    let events = drain(&rx);
    assert_eq!(count(&events, EventKind::DESELECT), 0);
    assert_eq!(count(&events, EventKind::DOUBLE_CLICK), 1);
}

#[test]
fn zoom_mode_double_click_clears_selection() {
    let mut chart = mock_chart(DragMode::Zoom, ClickMode::EVENT_SELECT);
    let mut ptr = Pointer::default();

    ptr.click(&mut chart, px(7), Modifiers::NONE);
    assert_eq!(selected(&chart, 0), Some(vec![7]));
    ptr.double_click(&mut chart, EMPTY);
    assert_eq!(selected(&chart, 0), None);
}

#[test]
fn pan_mode_keeps_selection_on_double_click() {
    let mut chart = mock_chart(DragMode::Pan, ClickMode::EVENT_SELECT);
    let rx = chart.events().subscribe_all();
    let mut ptr = Pointer::default();

    ptr.click(&mut chart, px(7), Modifiers::NONE);
    assert_eq!(selected(&chart, 0), Some(vec![7]));
    drain(&rx);

    ptr.double_click(&mut chart, EMPTY);
    assert_eq!(selected(&chart, 0), Some(vec![7]));
    let events = drain(&rx);
    assert_eq!(count(&events, EventKind::DESELECT), 0);
    assert_eq!(count(&events, EventKind::DOUBLE_CLICK), 1);
}

#[test]
fn event_only_clickmode_notifies_without_selecting() {
    let mut chart = mock_chart(DragMode::Select, ClickMode::EVENT);
    let rx = chart.events().subscribe_all();
    let mut ptr = Pointer::default();

    assert_eq!(ptr.click(&mut chart, px(7), Modifiers::NONE), Interaction::Click);
    assert_eq!(selected(&chart, 0), None);
    let events = drain(&rx);
    assert_eq!(kinds(&events), vec![EventKind::SELECTED, EventKind::CLICK]);
    assert!(events[0].selection.is_none());
}

#[test]
fn select_only_clickmode_is_silent() {
    let mut chart = mock_chart(DragMode::Select, ClickMode::SELECT);
    let rx = chart.events().subscribe_all();
    let mut ptr = Pointer::default();

    ptr.click(&mut chart, px(7), Modifiers::NONE);
    assert_eq!(selected(&chart, 0), Some(vec![7]));
    assert!(drain(&rx).is_empty());
}

#[test]
fn clickmode_none_does_nothing() {
    let mut chart = mock_chart(DragMode::Select, ClickMode::NONE);
    let rx = chart.events().subscribe_all();
    let mut ptr = Pointer::default();

    ptr.click(&mut chart, px(7), Modifiers::NONE);
    assert_eq!(selected(&chart, 0), None);
    assert!(drain(&rx).is_empty());
}

#[test]
fn click_on_empty_space_emits_nothing() {
    let mut chart = mock_chart(DragMode::Select, ClickMode::EVENT_SELECT);
    let rx = chart.events().subscribe_all();
    let mut ptr = Pointer::default();

    ptr.click(&mut chart, px(7), Modifiers::NONE);
    drain(&rx);
    assert_eq!(ptr.click(&mut chart, EMPTY, Modifiers::NONE), Interaction::Click);
    assert!(drain(&rx).is_empty());
    assert_eq!(selected(&chart, 0), Some(vec![7]));
}

#[test]
fn listeners_follow_subscribers_in_emission_order() {
    let mut chart = mock_chart(DragMode::Select, ClickMode::EVENT_SELECT);
    let seen: Arc<Mutex<Vec<String>>> = Arc::default();
    let sink = seen.clone();
    chart
        .events()
        .add_listener(EventFilter::only(EventKind::SELECTED | EventKind::CLICK), move |ev| {
            sink.lock().push(ev.kinds.to_string());
        });
    let rx = chart.events().subscribe(EventFilter::only(EventKind::CLICK));
    let mut ptr = Pointer::default();

    ptr.click(&mut chart, px(35), Modifiers::NONE);
    ptr.drag(&mut chart, &SELECT_PATH, Modifiers::NONE);

    assert_eq!(*seen.lock(), vec!["SELECTED", "CLICK", "SELECTED"]);
    assert_eq!(drain(&rx).len(), 1);
}

#[test]
fn drag_between_clicks_breaks_double_click() {
    let mut chart = mock_chart(DragMode::Select, ClickMode::EVENT_SELECT);
    let rx = chart.events().subscribe_all();
    let at = |p: [f32; 2], t: f64| PointerEvent::new(pos2(p[0], p[1]), t);

    chart.pointer_down(at(EMPTY, 0.0));
    chart.pointer_up(at(EMPTY, 10.0));
    chart.pointer_down(at(SELECT_PATH[0], 20.0));
    chart.pointer_move(at(SELECT_PATH[1], 40.0));
    chart.pointer_up(at(SELECT_PATH[1], 60.0));
    chart.pointer_down(at(EMPTY, 100.0));

    assert_eq!(chart.pointer_up(at(EMPTY, 110.0)), Interaction::Click);
    assert_eq!(count(&drain(&rx), EventKind::DOUBLE_CLICK), 0);
}

//! Per-chart selection context.
//!
//! A [`SelectionChart`] owns everything one chart needs: its subplots and
//! traces, the selection store, retained regions, the gesture and click
//! trackers and the event controller. Charts share nothing, so any number of
//! them can live side by side.

use egui::Pos2;
use tracing::{debug, trace};

use crate::click::{resolve_click, ClickAction, ClickKind, ClickTracker, Press};
use crate::config::{ClickMode, DragMode, SelectConfig};
use crate::coords::{project_region, ProjectedRegion, SubplotId, SubplotTransform};
use crate::data::{Hit, HitTarget, Selectable, SelectableItem, Visibility};
use crate::error::SelectError;
use crate::events::{
    ClickMeta, EventController, EventKind, PointDescriptor, SelectionEvent, SelectionPayload,
};
use crate::geometry::{Region, SelectDirection};
use crate::gesture::{DragGesture, DragStart, DragTracker, GestureKind, MoveOutcome, Release};
use crate::input::{LayoutUpdate, PointerEvent, PointerSource, ScrollEvent};
use crate::selection::{RegionCache, SelectMode, SelectionSet, SelectionStore};

/// What a pointer release amounted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    /// Nothing selection related (pan/zoom drag, release without press).
    Ignored,
    /// A selection drag ended without effect (degenerate region, subplot gone).
    Cancelled,
    /// A drag or click committed a selection.
    Selected,
    /// A drag or click emptied the selection.
    Deselected,
    /// A click that did not change the selection.
    Click,
    DoubleClick,
}

pub struct SelectionChart {
    config: SelectConfig,
    subplots: Vec<Box<dyn SubplotTransform>>,
    traces: Vec<Box<dyn Selectable>>,
    store: SelectionStore,
    regions: RegionCache,
    drag: DragTracker,
    clicks: ClickTracker,
    press: Option<Press>,
    events: EventController,
}

impl Default for SelectionChart {
    fn default() -> Self {
        Self::new(SelectConfig::default())
    }
}

impl SelectionChart {
    pub fn new(config: SelectConfig) -> Self {
        Self {
            config,
            subplots: Vec::new(),
            traces: Vec::new(),
            store: SelectionStore::new(),
            regions: RegionCache::new(),
            drag: DragTracker::new(),
            clicks: ClickTracker::new(),
            press: None,
            events: EventController::new(),
        }
    }

    /// Use an existing controller, e.g. one shared with other charts.
    pub fn with_events(mut self, events: EventController) -> Self {
        self.events = events;
        self
    }

    pub fn events(&self) -> &EventController {
        &self.events
    }

    pub fn config(&self) -> &SelectConfig {
        &self.config
    }

    // ─────────────────────────────────────────────────────────────────────
    // Subplots and traces
    // ─────────────────────────────────────────────────────────────────────

    pub fn add_subplot(&mut self, transform: impl SubplotTransform + 'static) -> Result<(), SelectError> {
        if self.subplot(transform.id()).is_some() {
            return Err(SelectError::DuplicateSubplot(transform.id().clone()));
        }
        self.subplots.push(Box::new(transform));
        Ok(())
    }

    /// Swap the transform of an existing subplot (new ranges, new size).
    /// Retained regions of that subplot are dropped and a drag on it is
    /// cancelled; selections stay.
    pub fn replace_subplot(
        &mut self,
        transform: impl SubplotTransform + 'static,
    ) -> Result<(), SelectError> {
        let id = transform.id().clone();
        let Some(slot) = self.subplots.iter_mut().find(|s| *s.id() == id) else {
            return Err(SelectError::UnknownSubplot(id));
        };
        *slot = Box::new(transform);
        if self.drag.active().is_some_and(|g| g.subplot == id) {
            self.cancel_drag("subplot replaced");
        }
        self.regions.discard(Some(&id));
        Ok(())
    }

    pub fn subplot(&self, id: &SubplotId) -> Option<&dyn SubplotTransform> {
        self.subplots.iter().find(|s| s.id() == id).map(|s| s.as_ref())
    }

    /// First subplot (in insertion order) under `pos`.
    pub fn subplot_at(&self, pos: Pos2) -> Option<&dyn SubplotTransform> {
        self.subplots.iter().find(|s| s.hit(pos)).map(|s| s.as_ref())
    }

    /// Add a trace; returns its curve number.
    pub fn add_trace(&mut self, trace: impl Selectable) -> Result<usize, SelectError> {
        let mut trace: Box<dyn Selectable> = Box::new(trace);
        if self.subplot(&trace.meta().subplot).is_none() {
            return Err(SelectError::UnknownSubplot(trace.meta().subplot.clone()));
        }
        let index = self.traces.len();
        trace.meta_mut().index = index;
        self.traces.push(trace);
        Ok(index)
    }

    /// Replace the data of trace `index`. Its selection is kept by index;
    /// indices past the new data simply match nothing.
    pub fn replace_trace(&mut self, index: usize, trace: impl Selectable) -> Result<(), SelectError> {
        if index >= self.traces.len() {
            return Err(SelectError::UnknownTrace(index));
        }
        let mut trace: Box<dyn Selectable> = Box::new(trace);
        if self.subplot(&trace.meta().subplot).is_none() {
            return Err(SelectError::UnknownSubplot(trace.meta().subplot.clone()));
        }
        trace.meta_mut().index = index;
        if !trace.supports_selection() {
            self.store.reset(index);
        }
        self.traces[index] = trace;
        Ok(())
    }

    pub fn trace(&self, index: usize) -> Option<&dyn Selectable> {
        self.traces.get(index).map(|t| t.as_ref())
    }

    pub fn trace_mut(&mut self, index: usize) -> Option<&mut dyn Selectable> {
        self.traces.get_mut(index).map(|t| &mut **t as &mut dyn Selectable)
    }

    /// Concrete trace access.
    pub fn trace_as<T: Selectable>(&self, index: usize) -> Option<&T> {
        self.traces.get(index)?.downcast_ref::<T>()
    }

    pub fn trace_count(&self) -> usize {
        self.traces.len()
    }

    pub fn set_visibility(&mut self, index: usize, visible: Visibility) -> Result<(), SelectError> {
        let trace = self
            .traces
            .get_mut(index)
            .ok_or(SelectError::UnknownTrace(index))?;
        trace.meta_mut().visible = visible;
        Ok(())
    }

    /// Current items of a trace, placed through its subplot.
    pub fn items(&self, index: usize) -> Vec<SelectableItem> {
        let Some(trace) = self.traces.get(index) else {
            return Vec::new();
        };
        match self.subplot(&trace.meta().subplot) {
            Some(t) => trace.items(t),
            None => Vec::new(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Selection state
    // ─────────────────────────────────────────────────────────────────────

    /// Committed selection of a trace.
    pub fn selected_points(&self, index: usize) -> &SelectionSet {
        self.store.get(index)
    }

    /// Programmatic selection. No events are emitted; dimming follows at once.
    pub fn set_selected_points(&mut self, index: usize, selection: SelectionSet) -> Result<(), SelectError> {
        let trace = self.traces.get(index).ok_or(SelectError::UnknownTrace(index))?;
        if !trace.supports_selection() {
            return Err(SelectError::NotSelectable(index));
        }
        self.store.set(index, selection);
        Ok(())
    }

    /// Programmatic reset of every trace to "never selected".
    pub fn clear_selection(&mut self) {
        self.store.clear_all();
        self.regions.clear();
    }

    pub fn has_selection(&self) -> bool {
        self.store.has_selection()
    }

    /// Opacity of one point (bins: use [`item_opacities`](Self::item_opacities)).
    pub fn point_opacity(&self, index: usize, point: usize) -> f32 {
        self.store.opacity(index, point, &self.config.dim)
    }

    pub fn dimmed(&self, index: usize, point: usize) -> bool {
        self.point_opacity(index, point) < self.config.dim.selected_opacity
    }

    /// Opacity of every item of a trace, following the live preview while a
    /// drag is in flight.
    pub fn item_opacities(&self, index: usize) -> Vec<f32> {
        let dim = &self.config.dim;
        let set = self.store.current(index);
        self.items(index)
            .iter()
            .map(|item| match set {
                Some(s) if !item.selection_keys().iter().any(|k| s.binary_search(k).is_ok()) => {
                    dim.unselected_opacity
                }
                _ => dim.selected_opacity,
            })
            .collect()
    }

    /// Visible outline of the retained regions of a subplot.
    pub fn outline(&self, subplot: &SubplotId) -> Vec<Vec<Pos2>> {
        self.regions.outline(subplot)
    }

    pub fn outline_visible(&self, subplot: &SubplotId) -> bool {
        self.regions.outline_visible(subplot)
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Layout
    // ─────────────────────────────────────────────────────────────────────

    pub fn set_dragmode(&mut self, dragmode: DragMode) {
        self.relayout(LayoutUpdate::DragMode(dragmode));
    }

    pub fn set_clickmode(&mut self, clickmode: ClickMode) {
        self.relayout(LayoutUpdate::ClickMode(clickmode));
    }

    pub fn set_selectdirection(&mut self, direction: SelectDirection) {
        self.relayout(LayoutUpdate::SelectDirection(direction));
    }

    /// Apply a layout change. Any change cancels a drag in flight.
    pub fn relayout(&mut self, update: LayoutUpdate) {
        self.cancel_drag("relayout");
        match update {
            LayoutUpdate::Ranges(subplot) => self.regions.discard(subplot.as_ref()),
            LayoutUpdate::DragMode(next) => {
                let prev = self.config.dragmode;
                if prev.is_selection() && next.is_selection() {
                    if prev != next {
                        // Geometry is kept for merging; only the outline goes.
                        self.regions.hide_outlines();
                    }
                } else if prev.is_selection() || next.is_selection() {
                    self.regions.clear();
                }
                debug!(from = %prev, to = %next, "dragmode changed");
                self.config.dragmode = next;
            }
            LayoutUpdate::ClickMode(mode) => self.config.clickmode = mode,
            LayoutUpdate::SelectDirection(direction) => self.config.selectdirection = direction,
        }
    }

    /// Wheel zoom over a subplot drops its retained regions.
    pub fn scroll(&mut self, ev: ScrollEvent) {
        self.cancel_drag("scroll");
        if let Some(id) = self.subplot_at(ev.pos).map(|s| s.id().clone()) {
            self.regions.discard(Some(&id));
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Pointer input
    // ─────────────────────────────────────────────────────────────────────

    pub fn pointer_down(&mut self, ev: PointerEvent) {
        if self.drag.is_dragging() {
            // Second pointer while dragging.
            return;
        }
        self.press = Some(Press::new(ev.pos, ev.time_ms));
        let kind = match self.config.dragmode {
            DragMode::Select => GestureKind::Box,
            DragMode::Lasso => GestureKind::Lasso,
            _ => return,
        };
        let Some(subplot) = self.subplot_at(ev.pos).map(|s| s.id().clone()) else {
            return;
        };
        let modified = ev.modifiers.shift || ev.modifiers.alt;
        let merge = self.regions.should_merge(&subplot, modified);
        let traces = self.eligible_traces(&subplot);
        self.drag.start(DragStart {
            subplot,
            kind,
            pos: ev.pos,
            mode: SelectMode::from_modifiers(ev.modifiers),
            merge,
            traces,
            throttle_ms: self.config.constants.select_throttle_ms,
        });
    }

    pub fn pointer_move(&mut self, ev: PointerEvent) {
        let min_drag = self.config.constants.min_drag_px;
        if let Some(press) = self.press.as_mut() {
            press.track(ev.pos, min_drag);
            if press.moved {
                self.clicks.reset();
            }
        }
        if self.drag.on_move(ev.pos, ev.time_ms, min_drag) != MoveOutcome::Extended {
            return;
        }
        let Some(g) = self.drag.active().cloned() else {
            return;
        };
        if !self.store.in_progress() {
            debug!(subplot = %g.subplot, kind = ?g.kind, mode = ?g.mode, merge = g.merge, "selection drag started");
            self.store.begin_selection(g.mode, &g.traces);
        }
        let Some(region) = self.region_for(&g) else {
            return;
        };
        self.apply_region(&g, &region);
        let mut payload = self.payload(&g.subplot);
        self.attach_region(&mut payload, &g.subplot, &region);
        payload.outline = self.regions.preview_outline(&g.subplot, &region, g.merge);
        self.events
            .emit(SelectionEvent::new(EventKind::SELECTING).with_selection(payload));
    }

    pub fn pointer_up(&mut self, ev: PointerEvent) -> Interaction {
        let min_drag = self.config.constants.min_drag_px;
        let press = self.press.take();
        if self.drag.is_dragging() {
            return match self.drag.finish(ev.pos, min_drag) {
                Release::Click(_) => {
                    self.store.discard();
                    self.handle_click(ev)
                }
                Release::Drag(g) => self.finish_drag(g, ev),
                Release::Idle => Interaction::Ignored,
            };
        }
        match press {
            Some(p) if p.is_click(ev.pos, min_drag) => self.handle_click(ev),
            Some(_) => {
                self.clicks.reset();
                Interaction::Ignored
            }
            None => Interaction::Ignored,
        }
    }

    pub fn touch_start(&mut self, ev: PointerEvent) {
        self.pointer_down(PointerEvent {
            source: PointerSource::Touch,
            ..ev
        });
    }

    pub fn touch_move(&mut self, ev: PointerEvent) {
        self.pointer_move(PointerEvent {
            source: PointerSource::Touch,
            ..ev
        });
    }

    pub fn touch_end(&mut self, ev: PointerEvent) -> Interaction {
        self.pointer_up(PointerEvent {
            source: PointerSource::Touch,
            ..ev
        })
    }

    // ─────────────────────────────────────────────────────────────────────
    // Drag handling
    // ─────────────────────────────────────────────────────────────────────

    fn finish_drag(&mut self, mut g: DragGesture, ev: PointerEvent) -> Interaction {
        self.clicks.reset();
        let mode = SelectMode::from_modifiers(ev.modifiers);
        if mode != g.mode || !self.store.in_progress() {
            g.mode = mode;
            g.merge = self
                .regions
                .should_merge(&g.subplot, ev.modifiers.shift || ev.modifiers.alt);
            self.store.begin_selection(mode, &g.traces);
        }

        let Some(region) = self.region_for(&g).filter(|r| !r.is_degenerate()) else {
            self.store.discard();
            debug!(subplot = %g.subplot, "degenerate selection region ignored");
            return Interaction::Cancelled;
        };
        self.apply_region(&g, &region);
        let outcome = self.store.commit();
        self.regions.commit(&g.subplot, region.clone(), g.mode, g.merge);

        if outcome.deselected {
            self.events.emit(SelectionEvent::new(EventKind::DESELECT));
            return Interaction::Deselected;
        }
        let mut payload = self.payload(&g.subplot);
        self.attach_region(&mut payload, &g.subplot, &region);
        payload.outline = self.regions.outline(&g.subplot);
        debug!(subplot = %g.subplot, points = payload.points.len(), "selection drag committed");
        self.events
            .emit(SelectionEvent::new(EventKind::SELECTED).with_selection(payload));
        Interaction::Selected
    }

    fn cancel_drag(&mut self, reason: &str) {
        if let Some(g) = self.drag.cancel() {
            self.store.discard();
            debug!(subplot = %g.subplot, reason, "selection drag cancelled");
        }
    }

    fn region_for(&self, g: &DragGesture) -> Option<Region> {
        let area = self.subplot(&g.subplot)?.plot_area();
        let c = &self.config.constants;
        Some(g.region(
            self.config.selectdirection,
            area,
            c.min_select_px,
            c.diagonal_band_px,
        ))
    }

    /// Feed the items of every gesture trace inside `region` into the store.
    fn apply_region(&mut self, g: &DragGesture, region: &Region) {
        let Some(transform) = self.subplot(&g.subplot) else {
            return;
        };
        let candidates: Vec<(usize, Vec<usize>)> = g
            .traces
            .iter()
            .filter_map(|&i| self.traces.get(i).map(|t| (i, t)))
            .map(|(i, t)| {
                let keys = t
                    .items(transform)
                    .into_iter()
                    .filter(|item| {
                        let inside = item.is_placed() && region.contains(item.screen);
                        #[cfg(feature = "hit_test_debug")]
                        trace!(trace = i, point = item.point_index, inside, "containment");
                        inside
                    })
                    .flat_map(|item| item.selection_keys())
                    .collect();
                (i, keys)
            })
            .collect();
        for (i, keys) in candidates {
            self.store.apply_membership(i, &keys);
        }
    }

    fn attach_region(&self, payload: &mut SelectionPayload, subplot: &SubplotId, region: &Region) {
        let Some(transform) = self.subplot(subplot) else {
            return;
        };
        match project_region(transform, region) {
            ProjectedRegion::Range(r) => payload.range = Some(r),
            ProjectedRegion::Lasso(l) => payload.lasso_points = Some(l),
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Click handling
    // ─────────────────────────────────────────────────────────────────────

    fn handle_click(&mut self, ev: PointerEvent) -> Interaction {
        let delay = self.config.constants.double_click_delay_ms;
        if self.clicks.register(ev.pos, ev.time_ms, delay) == ClickKind::Double {
            return self.handle_double_click(ev);
        }
        let subplot = self.subplot_at(ev.pos).map(|s| s.id().clone());
        let hit = subplot.as_ref().and_then(|id| self.hit_test(id, ev.pos));
        debug!(
            pos = ?ev.pos,
            hit = ?hit.as_ref().map(|h| (h.trace_index, h.point_index())),
            "single click"
        );

        let clickmode = self.config.clickmode;
        let mut result = Interaction::Click;
        if clickmode.select {
            if let (Some(id), Some(h)) = (subplot.as_ref(), hit.as_ref()) {
                if let Some(r) = self.select_on_click(id, h, ev) {
                    result = r;
                }
            }
        } else if clickmode.event && self.config.dragmode.is_selection() {
            // Event-only click mode still notifies `selected` listeners.
            self.events.emit(SelectionEvent::new(EventKind::SELECTED));
        }

        if clickmode.event {
            if let Some(h) = hit.as_ref() {
                let meta = self.click_meta(ev, subplot.as_ref(), Some(h));
                self.events
                    .emit(SelectionEvent::new(EventKind::CLICK).with_click(meta));
            }
        }
        result
    }

    fn select_on_click(&mut self, subplot: &SubplotId, hit: &Hit, ev: PointerEvent) -> Option<Interaction> {
        let trace = self.traces.get(hit.trace_index)?;
        if !trace.supports_selection() || hit.point_index().is_none() {
            trace!(trace = hit.trace_index, "click on non-selectable target");
            return None;
        }
        let traces = self.eligible_traces(subplot);
        let emit = self.config.clickmode.event;
        match resolve_click(&self.store, hit, &traces, ev.modifiers) {
            ClickAction::ClearAll => {
                let had = self.store.clear_all();
                self.regions.clear();
                debug!("click on the only selected item cleared the selection");
                if had && emit {
                    self.events.emit(SelectionEvent::new(EventKind::DESELECT));
                }
                Some(Interaction::Deselected)
            }
            ClickAction::Apply { mode, candidates } => {
                self.store.begin_selection(mode, &traces);
                for (t, keys) in &candidates {
                    self.store.apply_membership(*t, keys);
                }
                let outcome = self.store.commit();
                if !(ev.modifiers.shift || ev.modifiers.alt) {
                    self.regions.discard(Some(subplot));
                }
                if outcome.deselected {
                    if emit {
                        self.events.emit(SelectionEvent::new(EventKind::DESELECT));
                    }
                    return Some(Interaction::Deselected);
                }
                if emit {
                    let mut payload = self.payload(subplot);
                    payload.outline = self.regions.outline(subplot);
                    self.events
                        .emit(SelectionEvent::new(EventKind::SELECTED).with_selection(payload));
                }
                Some(Interaction::Selected)
            }
        }
    }

    fn handle_double_click(&mut self, ev: PointerEvent) -> Interaction {
        debug!(pos = ?ev.pos, dragmode = %self.config.dragmode, "double click");
        if self.config.dragmode != DragMode::Pan {
            let had = self.store.clear_all();
            self.regions.clear();
            if had {
                self.events.emit(SelectionEvent::new(EventKind::DESELECT));
            }
        }
        let subplot = self.subplot_at(ev.pos).map(|s| s.id().clone());
        let meta = self.click_meta(ev, subplot.as_ref(), None);
        self.events.emit(
            SelectionEvent::new(EventKind::DOUBLE_CLICK | EventKind::RELAYOUT).with_click(meta),
        );
        Interaction::DoubleClick
    }

    /// Closest hit across the visible traces of a subplot; ties go to the
    /// lower trace index.
    fn hit_test(&self, subplot: &SubplotId, pos: Pos2) -> Option<Hit> {
        let transform = self.subplot(subplot)?;
        let radius = self.config.constants.hover_distance_px;
        let mut best: Option<Hit> = None;
        for t in self
            .traces
            .iter()
            .filter(|t| t.meta().subplot == *subplot && t.meta().is_visible())
        {
            if let Some(h) = t.hit_test(transform, pos, radius) {
                if best.as_ref().map_or(true, |b| h.distance < b.distance) {
                    best = Some(h);
                }
            }
        }
        best
    }

    fn click_meta(&self, ev: PointerEvent, subplot: Option<&SubplotId>, hit: Option<&Hit>) -> ClickMeta {
        let transform = subplot.and_then(|id| self.subplot(id));
        let points = match (transform, hit) {
            (Some(t), Some(h)) => match h.point_index() {
                Some(p) => self
                    .traces
                    .get(h.trace_index)
                    .map(|tr| {
                        let numbers = match &h.target {
                            HitTarget::Point { point_numbers, .. } => point_numbers.clone(),
                            HitTarget::Element => None,
                        };
                        vec![PointDescriptor {
                            curve_number: h.trace_index,
                            point_number: p,
                            point_numbers: numbers,
                            fields: tr.point_fields(p, t),
                        }]
                    })
                    .unwrap_or_default(),
                None => Vec::new(),
            },
            _ => Vec::new(),
        };
        ClickMeta {
            screen_pos: ev.pos,
            data_pos: transform.and_then(|t| t.from_screen(ev.pos)),
            subplot: subplot.cloned(),
            points,
            modifiers: ev.modifiers,
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Helpers
    // ─────────────────────────────────────────────────────────────────────

    /// Visible, selectable traces of a subplot.
    fn eligible_traces(&self, subplot: &SubplotId) -> Vec<usize> {
        self.traces
            .iter()
            .filter(|t| t.meta().subplot == *subplot)
            .filter(|t| {
                let ok = t.meta().is_visible() && t.supports_selection();
                if !ok {
                    trace!(trace = t.meta().index, kind = t.type_name(), "trace skipped for selection");
                }
                ok
            })
            .map(|t| t.meta().index)
            .collect()
    }

    /// Every selected item of the subplot (live preview during a drag).
    fn payload(&self, subplot: &SubplotId) -> SelectionPayload {
        let mut payload = SelectionPayload {
            subplot: Some(subplot.clone()),
            ..Default::default()
        };
        let Some(transform) = self.subplot(subplot) else {
            return payload;
        };
        for index in self.eligible_traces(subplot) {
            let Some(set) = self.store.current(index).as_ref().filter(|s| !s.is_empty()) else {
                continue;
            };
            let trace = &self.traces[index];
            for item in trace.items(transform) {
                if !item.selection_keys().iter().any(|k| set.binary_search(k).is_ok()) {
                    continue;
                }
                payload.points.push(PointDescriptor {
                    curve_number: index,
                    point_number: item.point_index,
                    fields: trace.point_fields(item.point_index, transform),
                    point_numbers: item.point_numbers,
                });
            }
        }
        payload
    }
}

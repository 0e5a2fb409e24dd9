//! Selection event system.
//!
//! Hosts subscribe to selection events via [`EventController`]. Each event
//! carries a set of [`EventKind`] flags so that a single occurrence can match
//! several categories (a double click is both `DOUBLE_CLICK` and `RELAYOUT`).
//!
//! The caller specifies an [`EventFilter`] to receive only the events they
//! care about. The filter is a simple OR mask: an event is delivered when
//! `(event.kinds & filter) != 0`.

use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;

use egui::Pos2;
use parking_lot::Mutex;
use serde::Serialize;

use crate::coords::{DataPoint, LassoMap, RangeMap, SubplotId};

// ─────────────────────────────────────────────────────────────────────────────
// EventKind – bitflags
// ─────────────────────────────────────────────────────────────────────────────

/// Bitflags describing the *categories* an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventKind(pub u32);

impl EventKind {
    /// Throttled progress update while a selection drag is in flight.
    pub const SELECTING: Self = Self(1 << 0);
    /// A selection gesture (drag or click) was committed.
    pub const SELECTED: Self = Self(1 << 1);
    /// The selection became empty.
    pub const DESELECT: Self = Self(1 << 2);
    /// A click hit a point or element.
    pub const CLICK: Self = Self(1 << 3);
    /// Second click within the double-click delay.
    pub const DOUBLE_CLICK: Self = Self(1 << 4);
    /// The host should reset the view (emitted together with `DOUBLE_CLICK`).
    pub const RELAYOUT: Self = Self(1 << 5);

    /// Wildcard: matches *every* event kind.
    pub const ALL: Self = Self(u32::MAX);

    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Check whether `self` contains all bits in `other`.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// At least one bit in common.
    #[inline]
    pub const fn intersects(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for EventKind {
    type Output = Self;
    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for EventKind {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl std::ops::BitAnd for EventKind {
    type Output = Self;
    #[inline]
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "EMPTY");
        }
        if *self == EventKind::ALL {
            return write!(f, "ALL");
        }

        let pairs: &[(EventKind, &str)] = &[
            (EventKind::SELECTING, "SELECTING"),
            (EventKind::SELECTED, "SELECTED"),
            (EventKind::DESELECT, "DESELECT"),
            (EventKind::CLICK, "CLICK"),
            (EventKind::DOUBLE_CLICK, "DOUBLE_CLICK"),
            (EventKind::RELAYOUT, "RELAYOUT"),
        ];

        let mut names = Vec::new();
        let mut known_bits: u32 = 0;
        for (kind, name) in pairs {
            known_bits |= kind.0;
            if self.contains(*kind) {
                names.push((*name).to_string());
            }
        }

        // Bits that weren't covered by the known list
        let extra = self.0 & !known_bits;
        if extra != 0 {
            names.push(format!("0x{:x}", extra));
        }
        write!(f, "{}", names.join("|"))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Payloads
// ─────────────────────────────────────────────────────────────────────────────

/// Public description of one selected (or clicked) item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointDescriptor {
    /// Trace index.
    pub curve_number: usize,
    /// Item index; for bins, the bin index.
    pub point_number: usize,
    /// Underlying sample indices for aggregated items (histogram bins).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point_numbers: Option<Vec<usize>>,
    /// Trace-type specific fields (`x`, `y`, `id`, `customdata`, ...).
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl PointDescriptor {
    pub fn field(&self, name: &str) -> Option<&serde_json::Value> {
        self.fields.get(name)
    }
}

/// Payload of `SELECTING`/`SELECTED` events.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SelectionPayload {
    /// Subplot the gesture happened on.
    pub subplot: Option<SubplotId>,
    /// Every currently selected item of that subplot, ordered by trace then
    /// point number.
    pub points: Vec<PointDescriptor>,
    /// Box gestures: data range per axis.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<RangeMap>,
    /// Lasso gestures: data-space vertices.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lasso_points: Option<LassoMap>,
    /// Screen outlines of all retained regions of the subplot.
    pub outline: Vec<Vec<Pos2>>,
}

impl SelectionPayload {
    /// `(curve_number, point_number)` pairs, handy for assertions.
    pub fn point_ids(&self) -> Vec<(usize, usize)> {
        self.points
            .iter()
            .map(|p| (p.curve_number, p.point_number))
            .collect()
    }
}

/// Payload of `CLICK`/`DOUBLE_CLICK` events.
#[derive(Debug, Clone, PartialEq)]
pub struct ClickMeta {
    pub screen_pos: Pos2,
    /// Pointer position in data space of `subplot`, when invertible.
    pub data_pos: Option<DataPoint>,
    pub subplot: Option<SubplotId>,
    /// The hit item(s); empty for element hits and empty-space clicks.
    pub points: Vec<PointDescriptor>,
    pub modifiers: egui::Modifiers,
}

// ─────────────────────────────────────────────────────────────────────────────
// SelectionEvent
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct SelectionEvent {
    pub kinds: EventKind,
    /// Seconds since the controller was created.
    pub timestamp: f64,
    /// `None` on `DESELECT`, on legacy event-only click notifications and on
    /// pure click events.
    pub selection: Option<SelectionPayload>,
    pub click: Option<ClickMeta>,
}

impl SelectionEvent {
    pub fn new(kinds: EventKind) -> Self {
        Self {
            kinds,
            timestamp: 0.0, // set by the controller
            selection: None,
            click: None,
        }
    }

    pub fn with_selection(mut self, selection: SelectionPayload) -> Self {
        self.selection = Some(selection);
        self
    }

    pub fn with_click(mut self, click: ClickMeta) -> Self {
        self.click = Some(click);
        self
    }

    pub fn is(&self, kind: EventKind) -> bool {
        self.kinds.contains(kind)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// EventFilter
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
pub struct EventFilter {
    pub mask: EventKind,
}

impl EventFilter {
    pub const fn all() -> Self {
        Self {
            mask: EventKind::ALL,
        }
    }

    pub const fn only(mask: EventKind) -> Self {
        Self { mask }
    }

    #[inline]
    pub fn matches(&self, event: &SelectionEvent) -> bool {
        event.kinds.intersects(self.mask)
    }
}

impl Default for EventFilter {
    fn default() -> Self {
        Self::all()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// EventController
// ─────────────────────────────────────────────────────────────────────────────

pub type Listener = Box<dyn FnMut(&SelectionEvent) + Send>;

struct Subscriber {
    filter: EventFilter,
    sender: Sender<SelectionEvent>,
}

struct ListenerEntry {
    filter: EventFilter,
    callback: Listener,
}

/// Clonable handle; all clones share the same subscriber list.
#[derive(Clone)]
pub struct EventController {
    inner: Arc<Mutex<EventCtrlInner>>,
}

struct EventCtrlInner {
    subscribers: Vec<Subscriber>,
    listeners: Vec<ListenerEntry>,
    start_instant: std::time::Instant,
    emitted: u64,
}

impl EventController {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(EventCtrlInner {
                subscribers: Vec::new(),
                listeners: Vec::new(),
                start_instant: std::time::Instant::now(),
                emitted: 0,
            })),
        }
    }

    pub fn subscribe(&self, filter: EventFilter) -> Receiver<SelectionEvent> {
        let (tx, rx) = std::sync::mpsc::channel();
        self.inner.lock().subscribers.push(Subscriber { filter, sender: tx });
        rx
    }

    pub fn subscribe_all(&self) -> Receiver<SelectionEvent> {
        self.subscribe(EventFilter::all())
    }

    /// Register a callback invoked synchronously for every matching event.
    pub fn add_listener(
        &self,
        filter: EventFilter,
        callback: impl FnMut(&SelectionEvent) + Send + 'static,
    ) {
        self.inner.lock().listeners.push(ListenerEntry {
            filter,
            callback: Box::new(callback),
        });
    }

    /// Total number of events emitted so far.
    pub fn emitted(&self) -> u64 {
        self.inner.lock().emitted
    }

    /// Deliver an event to channel subscribers, then to listeners, each in
    /// registration order.
    pub fn emit(&self, mut event: SelectionEvent) {
        let mut listeners = {
            let mut inner = self.inner.lock();
            event.timestamp = inner.start_instant.elapsed().as_secs_f64();
            inner.emitted += 1;
            // Matching subscribers whose receiver is gone are dropped here.
            inner
                .subscribers
                .retain(|sub| !sub.filter.matches(&event) || sub.sender.send(event.clone()).is_ok());
            std::mem::take(&mut inner.listeners)
        };
        tracing::trace!(kinds = %event.kinds, "emit selection event");

        // Listeners run unlocked so they may subscribe or emit themselves.
        for entry in listeners.iter_mut() {
            if entry.filter.matches(&event) {
                (entry.callback)(&event);
            }
        }

        let mut inner = self.inner.lock();
        let added = std::mem::take(&mut inner.listeners);
        listeners.extend(added);
        inner.listeners = listeners;
    }
}

impl Default for EventController {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("EventController")
            .field("subscribers", &inner.subscribers.len())
            .field("listeners", &inner.listeners.len())
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────────────────────────

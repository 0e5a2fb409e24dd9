//! liveselect crate root: re-exports and module wiring.
//!
//! Box and lasso selection for interactive plots. A host feeds normalized
//! pointer input into a [`SelectionChart`] and reads back per-trace selections,
//! dimming and selection events.
//!
//! The crate is split into cohesive modules:
//! - `geometry`: box regions, lasso polygons and containment
//! - `coords`: data/screen transforms per subplot type
//! - `data`: selectable trace types
//! - `selection`: per-trace selection store and retained regions
//! - `gesture` / `click`: drag and click state machines
//! - `events`: event kinds, payloads and delivery
//! - `config`: dragmode, clickmode and interaction constants
//! - `chart`: the per-chart context tying it all together

pub mod chart;
pub mod click;
pub mod config;
pub mod coords;
pub mod data;
pub mod error;
pub mod events;
pub mod geometry;
pub mod gesture;
pub mod input;
pub mod selection;

// Public re-exports for a compact external API
pub use chart::{Interaction, SelectionChart};
pub use config::{ClickMode, DimStyle, DragMode, InteractionConstants, SelectConfig};
pub use coords::{
    CartesianTransform, DataPoint, GeoProjection, GeoTransform, MapboxTransform, PolarTransform,
    SubplotId, SubplotKind, SubplotTransform, TernaryTransform,
};
pub use data::{
    BarPolarTrace, BarTrace, BoxTrace, CarpetGrid, CarpetTrace, ChoroplethTrace, HistogramTrace,
    OhlcTrace, ScatterCarpetTrace, ScatterTrace, Selectable, SelectableItem, SnapshotTrace,
    Visibility,
};
pub use error::{ConfigError, SelectError};
pub use events::{
    ClickMeta, EventController, EventFilter, EventKind, PointDescriptor, SelectionEvent,
    SelectionPayload,
};
pub use geometry::{BoxRegion, Polygon, Region, SelectDirection};
pub use input::{LayoutUpdate, PointerEvent, PointerSource, ScrollEvent};
pub use selection::{SelectMode, SelectionSet};

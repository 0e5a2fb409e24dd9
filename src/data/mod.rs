pub mod bar;
pub mod bar_polar;
pub mod box_trace;
pub mod carpet;
pub mod choropleth;
pub mod histogram;
pub mod ohlc;
pub mod scatter;
pub mod snapshot;
pub mod traces;

pub use bar::{BarTrace, Orientation};
pub use bar_polar::BarPolarTrace;
pub use box_trace::{BodyShape, BoxTrace, Quartiles};
pub use carpet::{CarpetGrid, ScatterCarpetTrace};
pub use choropleth::ChoroplethTrace;
pub use histogram::{Bin, HistogramTrace};
pub use ohlc::{FinanceStyle, OhlcTrace};
pub use scatter::ScatterTrace;
pub use snapshot::SnapshotTrace;
pub use traces::{
    CarpetTrace, Hit, HitTarget, PointExtras, Selectable, SelectableItem, TraceMeta, Visibility,
};

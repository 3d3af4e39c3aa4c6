//! Shared data models spanning the engine layers.

pub mod bar;
pub mod indicators;
pub mod notification;
pub mod signal;
pub mod timeframe;

pub use bar::Bar;
pub use indicators::{IndicatorParams, IndicatorSnapshot, SnapshotStatus};
pub use notification::Notification;
pub use signal::{
    Direction, SeriesKey, SignalKind, SignalName, SignalSet, Strategy, TransitionEvent,
};
pub use timeframe::Timeframe;

//! Indicator library: pure functions over bar series.

pub mod math;
pub mod resample;
pub mod snapshot;

pub mod momentum;
pub mod trend;
pub mod volatility;

pub use resample::resample;
pub use snapshot::compute_snapshots;

//! Evaluation cycle, series storage and run-mode drivers

pub mod cycle;
pub mod runtime;
pub mod series;

pub use cycle::{CycleOutcome, CycleReport, CycleStage, EvaluationCycle};
pub use runtime::{run_connectivity_test, AlertRuntime};
pub use series::{MergeStats, SeriesStore};

//! Signal evaluation: crossovers, strategy conditions and alert messages.

pub mod crossover;
pub mod engine;
pub mod evaluator;
pub mod message;

pub use crossover::{crosses_above, crosses_below, detect_cross, Cross};
pub use engine::{Evaluation, Insufficient, SignalEngine};
pub use evaluator::{ConditionEvaluator, SignalThresholds};

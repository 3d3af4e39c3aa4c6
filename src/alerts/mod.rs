//! Alert state tracking

pub mod store;
pub mod tracker;

pub use store::{AlertKey, AlertRecord, AlertStore, InMemoryAlertStore, SetupKey};
pub use tracker::AlertStateTracker;

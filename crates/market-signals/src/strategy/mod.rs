//! Decision Rules
//!
//! Band tables, the signal classifier built on them, and the action planner.

pub mod bands;
mod classifier;
mod planner;

pub use bands::{Band, BandTable, Closed};
pub use classifier::SignalClassifier;
pub use planner::{ActionPlanner, PlannerInput};

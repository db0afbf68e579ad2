//! Data model for the storage simulation.
//!
//! [`SimulationParameters`] is the immutable input supplied once per run.
//! [`SimulationState`] is the mutable state the step loop advances, and
//! [`Sample`] is the `(time, voltage)` record emitted after every update.

mod params;
mod state;

pub use params::{SimulationParameters, ARGUMENT_NAMES};
pub use state::{Sample, SimulationState};

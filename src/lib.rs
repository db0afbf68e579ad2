//! # Solarcap Core
//!
//! A fixed-step simulator for a capacitor energy store fed by a solar array.
//!
//! This library provides:
//! - A closed-form node-voltage solve for the array + capacitor + ESR + load topology
//! - Threshold control: array disconnect at open-circuit voltage, undervoltage
//!   lockout of the load and its re-enable
//! - A lazy, re-runnable sequence of `(time, voltage)` samples
//! - CSV output of a finished run
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`model`] - Simulation parameters, step state and samples
//! - [`solver`] - Quadratic-root step, state transition and the simulator
//! - [`output`] - CSV sample log
//! - [`error`] - Unified error type
//!
//! ## Usage
//!
//! ### Native CLI
//!
//! ```bash
//! # sa_m2 eff voc c_f r_esr q0_c p_on_w v_thresh drun_time_track dur_s
//! solarcap 1.0 0.2 5.0 0.01 0.1 0.0 0.0 1.0 0.1 1.0   # writes log.csv
//! ```
//!
//! ### Library
//!
//! ```no_run
//! use solarcap_core::{SimulationParameters, Simulator};
//!
//! let params = SimulationParameters::from_args(&[
//!     "1.0", "0.2", "5.0", "0.01", "0.1", "0.0", "0.0", "1.0", "0.1", "1.0",
//! ])?;
//! let simulator = Simulator::new(params)?;
//! for sample in simulator.samples() {
//!     let sample = sample?;
//!     println!("{} {}", sample.time_s, sample.voltage_v);
//! }
//! # Ok::<(), solarcap_core::CapSimError>(())
//! ```

pub mod error;
pub mod model;
pub mod output;
pub mod solver;

// Re-export main types for convenience
pub use error::{CapSimError, Result};
pub use model::{Sample, SimulationParameters, SimulationState};
pub use solver::{Simulator, SimulatorConfig};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::WasmCapSim;

/// Solar irradiance on the panel in W/m² (solar constant above the atmosphere)
pub const SOLAR_IRRADIANCE_W_PER_M2: f64 = 1336.1;

/// Default sample log written by the CLI
pub const DEFAULT_OUTPUT_FILE: &str = "log.csv";

/// Number of positional command-line values
pub const ARGUMENT_COUNT: usize = 10;

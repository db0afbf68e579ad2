//! Step simulator for the solar-fed capacitor.
//!
//! This module provides the numerical engine of the crate.
//!
//! ## Topology
//!
//! A solar array (modelled as a switched current source at its short-circuit
//! current) charges a capacitor `C` with series resistance `R`. A load draws
//! constant power `P` from the node between them:
//!
//! ```text
//!   array ──┬── node (v) ── load (P)
//!           │
//!           R
//!           │
//!           C  (charge Q)
//!           │
//!          GND
//! ```
//!
//! Each step draws the load current at the previous voltage, integrates the
//! charge, updates the array and load switches, then solves the node-voltage
//! quadratic in closed form (see [`quadratic`]). Two control rules follow
//! every solve:
//!
//! - the array disconnects once the node reaches open-circuit voltage
//! - the load is locked out while the node is below the threshold voltage,
//!   and only re-enabled once the node reaches open-circuit voltage again

pub mod quadratic;
mod simulator;
mod step;

pub use quadratic::Root;
pub use simulator::{Samples, Simulator, SimulatorConfig};
pub use step::StorageModel;

//! WASM bindings for Solarcap Core.
//!
//! This module provides JavaScript-friendly bindings for running the storage
//! simulation in a browser, e.g. to plot the voltage curve.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmCapSim } from 'solarcap_core';
//!
//! await init();
//!
//! const sim = new WasmCapSim(1.0, 0.2, 5.0, 0.01, 0.1, 0.0, 0.0, 1.0, 0.1, 1.0);
//! const times = sim.times();
//! const volts = sim.run();
//! ```

use wasm_bindgen::prelude::*;

use crate::error::CapSimError;
use crate::model::SimulationParameters;
use crate::solver::{Simulator, SimulatorConfig};

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn to_js(err: CapSimError) -> JsValue {
    let err = CapSimError::WasmError {
        message: err.to_string(),
    };
    JsValue::from_str(&err.to_string())
}

/// WASM-compatible storage simulator.
///
/// Wraps the native `Simulator`; every call re-runs the simulation from t = 0.
#[wasm_bindgen]
pub struct WasmCapSim {
    simulator: Simulator,
}

#[wasm_bindgen]
impl WasmCapSim {
    /// Create a new simulator from the ten run parameters.
    ///
    /// # Returns
    /// A new `WasmCapSim` instance or an error if the parameters are invalid.
    #[wasm_bindgen(constructor)]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        panel_area_m2: f64,
        efficiency: f64,
        open_circuit_voltage_v: f64,
        capacitance_f: f64,
        esr_ohm: f64,
        initial_charge_c: f64,
        active_power_w: f64,
        voltage_threshold_v: f64,
        time_step_s: f64,
        duration_s: f64,
    ) -> Result<WasmCapSim, JsValue> {
        let params = SimulationParameters {
            panel_area_m2,
            efficiency,
            open_circuit_voltage_v,
            capacitance_f,
            esr_ohm,
            initial_charge_c,
            active_power_w,
            voltage_threshold_v,
            time_step_s,
            duration_s,
        };
        let simulator = Simulator::new(params).map_err(to_js)?;
        Ok(WasmCapSim { simulator })
    }

    /// Override the solar irradiance (W/m²).
    #[wasm_bindgen]
    pub fn set_irradiance(&mut self, irradiance_w_per_m2: f64) -> Result<(), JsValue> {
        let config = SimulatorConfig::new().with_irradiance(irradiance_w_per_m2);
        self.simulator =
            Simulator::with_config(*self.simulator.params(), config).map_err(to_js)?;
        Ok(())
    }

    /// Run the simulation and return the node voltages.
    ///
    /// # Returns
    /// A Float64Array with one voltage per sample, or an error on a numeric fault.
    #[wasm_bindgen]
    pub fn run(&self) -> Result<Vec<f64>, JsValue> {
        let samples = self.simulator.run().map_err(to_js)?;
        Ok(samples.iter().map(|s| s.voltage_v).collect())
    }

    /// Sample times matching [`WasmCapSim::run`].
    ///
    /// Runs the simulation, so a numeric fault is reported here as well.
    #[wasm_bindgen]
    pub fn times(&self) -> Result<Vec<f64>, JsValue> {
        sample_times(&self.simulator).map_err(to_js)
    }
}

fn sample_times(simulator: &Simulator) -> crate::Result<Vec<f64>> {
    let samples = simulator.run()?;
    Ok(samples.iter().map(|s| s.time_s).collect())
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Get the default solar irradiance.
#[wasm_bindgen]
pub fn default_irradiance() -> f64 {
    crate::SOLAR_IRRADIANCE_W_PER_M2
}

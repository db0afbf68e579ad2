//! Simulation parameters and their derivation.

use crate::error::{CapSimError, Result};
use crate::ARGUMENT_COUNT;

/// Positional argument names, in command-line order.
pub const ARGUMENT_NAMES: [&str; ARGUMENT_COUNT] = [
    "sa_m2",
    "eff",
    "voc",
    "c_f",
    "r_esr",
    "q0_c",
    "p_on_w",
    "v_thresh",
    "drun_time_track",
    "dur_s",
];

/// Physical and run parameters for one simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationParameters {
    /// Solar panel area (m²)
    pub panel_area_m2: f64,
    /// Solar cell efficiency (fraction, not range-checked)
    pub efficiency: f64,
    /// Open-circuit voltage of the array (V)
    pub open_circuit_voltage_v: f64,
    /// Storage capacitance (F)
    pub capacitance_f: f64,
    /// Equivalent series resistance of the capacitor (Ω)
    pub esr_ohm: f64,
    /// Charge held at t = 0 (C)
    pub initial_charge_c: f64,
    /// Load power while the system is on (W)
    pub active_power_w: f64,
    /// Undervoltage lockout threshold (V)
    pub voltage_threshold_v: f64,
    /// Fixed time step (s)
    pub time_step_s: f64,
    /// Run length (s)
    pub duration_s: f64,
}

impl SimulationParameters {
    /// Parse the ten positional command-line values.
    ///
    /// The values are expected in [`ARGUMENT_NAMES`] order. Any other count
    /// fails with [`CapSimError::InvalidArgumentCount`] before anything is
    /// parsed.
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Result<Self> {
        if args.len() != ARGUMENT_COUNT {
            return Err(CapSimError::InvalidArgumentCount {
                expected: ARGUMENT_COUNT,
                found: args.len(),
            });
        }

        let mut values = [0.0; ARGUMENT_COUNT];
        for ((slot, raw), name) in values.iter_mut().zip(args).zip(ARGUMENT_NAMES) {
            let raw: &str = raw.as_ref();
            *slot = raw
                .trim()
                .parse::<f64>()
                .map_err(|_| CapSimError::InvalidArgument {
                    name,
                    value: raw.to_string(),
                })?;
        }

        let [
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
        ] = values;

        Ok(Self {
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
        })
    }

    /// Short-circuit current of the array at the given irradiance (A).
    ///
    /// `I_sc = (irradiance * area * efficiency) / V_oc`
    pub fn short_circuit_current(&self, irradiance_w_per_m2: f64) -> f64 {
        (irradiance_w_per_m2 * self.panel_area_m2 * self.efficiency) / self.open_circuit_voltage_v
    }

    /// Check the preconditions the step loop relies on.
    ///
    /// Every value must be finite, the time step strictly positive and the
    /// duration non-negative. Nothing else is range-checked.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            self.panel_area_m2,
            self.efficiency,
            self.open_circuit_voltage_v,
            self.capacitance_f,
            self.esr_ohm,
            self.initial_charge_c,
            self.active_power_w,
            self.voltage_threshold_v,
            self.time_step_s,
            self.duration_s,
        ];

        if let Some((name, value)) = ARGUMENT_NAMES
            .iter()
            .zip(fields)
            .find(|(_, value)| !value.is_finite())
        {
            return Err(CapSimError::invalid_param(format!(
                "{name} must be finite (got {value})"
            )));
        }

        if self.time_step_s <= 0.0 {
            return Err(CapSimError::invalid_param(format!(
                "time step must be positive (got {})",
                self.time_step_s
            )));
        }

        if self.duration_s < 0.0 {
            return Err(CapSimError::invalid_param(format!(
                "duration must not be negative (got {})",
                self.duration_s
            )));
        }

        Ok(())
    }
}

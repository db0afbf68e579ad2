//! State transition for the solar-fed storage node.

use tracing::{debug, trace};

use crate::error::{CapSimError, Result};
use crate::model::{SimulationParameters, SimulationState};

use super::quadratic::node_voltage;

/// The fixed storage topology with its derived constants.
///
/// Holds the parameters and the array short-circuit current so that
/// [`StorageModel::transition`] can be called on any state in isolation.
#[derive(Debug, Clone, Copy)]
pub struct StorageModel<'a> {
    params: &'a SimulationParameters,
    short_circuit_current_a: f64,
}

impl<'a> StorageModel<'a> {
    /// Create a model for the given parameters and irradiance (W/m²).
    pub fn new(params: &'a SimulationParameters, irradiance_w_per_m2: f64) -> Self {
        Self {
            params,
            short_circuit_current_a: params.short_circuit_current(irradiance_w_per_m2),
        }
    }

    /// Short-circuit current of the array (A).
    pub fn short_circuit_current(&self) -> f64 {
        self.short_circuit_current_a
    }

    /// Parameters this model was built from.
    pub fn params(&self) -> &SimulationParameters {
        self.params
    }

    /// Compute the state at t = 0.
    pub fn initial_state(&self) -> Result<SimulationState> {
        let p = self.params;
        let mut state = SimulationState {
            step_index: 0,
            elapsed_time_s: 0.0,
            charge_c: p.initial_charge_c,
            source_current_a: self.short_circuit_current_a,
            load_power_w: p.active_power_w,
            node_voltage_v: 0.0,
            load_shed: false,
        };

        self.resolve_voltage(&mut state)?;
        self.apply_constraints(&mut state);

        trace!(
            voltage = state.node_voltage_v,
            source_current = state.source_current_a,
            load_power = state.load_power_w,
            "initial state"
        );

        Ok(state)
    }

    /// Advance `state` by one time step.
    ///
    /// The load current is drawn at the voltage of `state`, so a state with
    /// an active load and a node voltage of exactly zero cannot be advanced
    /// and yields [`CapSimError::NumericFault`].
    pub fn transition(&self, state: &SimulationState) -> Result<SimulationState> {
        let p = self.params;
        let previous_voltage = state.node_voltage_v;
        let step_index = state.step_index + 1;
        let time_s = step_index as f64 * p.time_step_s;

        let load_current_a = if state.load_power_w == 0.0 {
            0.0
        } else if previous_voltage == 0.0 {
            return Err(CapSimError::numeric_fault(
                time_s,
                format!(
                    "division by zero: load draws {} W at a node voltage of 0 V",
                    state.load_power_w
                ),
            ));
        } else {
            state.load_power_w / previous_voltage
        };

        let mut next = *state;
        next.step_index = step_index;
        next.elapsed_time_s = time_s;

        next.charge_c += (state.source_current_a - load_current_a) * p.time_step_s;
        next.charge_c = next.charge_c.max(0.0);

        // Array reconnects while the node sits below open-circuit voltage.
        next.source_current_a = if (0.0..p.open_circuit_voltage_v).contains(&previous_voltage) {
            self.short_circuit_current_a
        } else {
            0.0
        };

        if next.load_power_w == 0.0 && previous_voltage >= p.open_circuit_voltage_v {
            next.load_power_w = p.active_power_w;
            debug!(time = time_s, voltage = previous_voltage, "load re-enabled");
        }

        self.resolve_voltage(&mut next)?;
        self.apply_constraints(&mut next);

        trace!(
            step = step_index,
            time = time_s,
            charge = next.charge_c,
            voltage = next.node_voltage_v,
            load_current = load_current_a,
            "step"
        );

        Ok(next)
    }

    /// Run the quadratic-root step on `state` in place.
    fn resolve_voltage(&self, state: &mut SimulationState) -> Result<()> {
        let p = self.params;
        let root = node_voltage(
            state.charge_c,
            p.capacitance_f,
            state.source_current_a,
            p.esr_ohm,
            state.load_power_w,
            state.elapsed_time_s,
        )?;

        if root.load_shed {
            debug!(
                time = state.elapsed_time_s,
                requested_power = state.load_power_w,
                "negative discriminant, load shed"
            );
        }

        state.node_voltage_v = root.voltage_v;
        state.load_power_w = root.load_power_w;
        state.load_shed = root.load_shed;
        Ok(())
    }

    /// Apply the array disconnect and undervoltage lockout rules.
    fn apply_constraints(&self, state: &mut SimulationState) {
        let p = self.params;

        if p.open_circuit_voltage_v <= state.node_voltage_v && state.source_current_a != 0.0 {
            state.source_current_a = 0.0;
            debug!(
                time = state.elapsed_time_s,
                voltage = state.node_voltage_v,
                "array disconnected at open-circuit voltage"
            );
        }

        if state.node_voltage_v < p.voltage_threshold_v {
            if state.load_power_w != 0.0 {
                debug!(
                    time = state.elapsed_time_s,
                    voltage = state.node_voltage_v,
                    threshold = p.voltage_threshold_v,
                    "undervoltage lockout"
                );
            }
            state.load_power_w = 0.0;
        }
    }
}

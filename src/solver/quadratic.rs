//! Closed-form node voltage for the capacitor + ESR + constant-power load.
//!
//! With the capacitor at `Q / C` behind its ESR, an array current `I` into the
//! node and a load drawing constant power `P`, the node voltage `v` satisfies
//!
//! ```text
//! v^2 - b*v + P*R = 0,    b = Q/C + I*R
//! ```
//!
//! The larger root `(b + sqrt(b^2 - 4PR)) / 2` is the physical operating point.
//! When the discriminant is negative the load cannot be supplied at all, so it
//! is shed (`P = 0`) and the root collapses to `b`.

use crate::error::{CapSimError, Result};

/// Result of one quadratic-root step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Root {
    /// Node voltage (V)
    pub voltage_v: f64,
    /// Load power after the step (W), zero if the load was shed
    pub load_power_w: f64,
    /// Whether the discriminant was negative and the load was shed
    pub load_shed: bool,
}

/// Linear coefficient `Q/C + I*R` of the node-voltage quadratic.
pub fn linear_term(charge_c: f64, capacitance_f: f64, source_current_a: f64, esr_ohm: f64) -> f64 {
    charge_c / capacitance_f + source_current_a * esr_ohm
}

/// Discriminant `b^2 - 4PR` of the node-voltage quadratic.
pub fn discriminant(linear_term: f64, load_power_w: f64, esr_ohm: f64) -> f64 {
    linear_term * linear_term - 4.0 * load_power_w * esr_ohm
}

/// Solve for the node voltage, shedding the load if it cannot be supplied.
///
/// `time_s` is only used to label a [`CapSimError::NumericFault`] when the
/// resulting voltage is not finite.
pub fn node_voltage(
    charge_c: f64,
    capacitance_f: f64,
    source_current_a: f64,
    esr_ohm: f64,
    load_power_w: f64,
    time_s: f64,
) -> Result<Root> {
    let mut load_power_w = load_power_w;
    let mut load_shed = false;

    let mut b = linear_term(charge_c, capacitance_f, source_current_a, esr_ohm);
    let mut disc = discriminant(b, load_power_w, esr_ohm);

    if disc < 0.0 {
        // With P = 0 the discriminant is b^2, so this cannot go negative again.
        load_power_w = 0.0;
        load_shed = true;
        b = linear_term(charge_c, capacitance_f, source_current_a, esr_ohm);
        disc = discriminant(b, load_power_w, esr_ohm);
    }

    let voltage_v = (b + disc.sqrt()) / 2.0;

    if !voltage_v.is_finite() {
        return Err(CapSimError::numeric_fault(
            time_s,
            format!(
                "node voltage is not finite (Q = {charge_c} C, C = {capacitance_f} F, I = {source_current_a} A, P = {load_power_w} W)"
            ),
        ));
    }

    Ok(Root {
        voltage_v,
        load_power_w,
        load_shed,
    })
}

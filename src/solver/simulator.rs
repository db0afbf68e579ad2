//! Main simulator interface.

use tracing::{error, info};

use crate::error::Result;
use crate::model::{Sample, SimulationParameters, SimulationState};
use crate::SOLAR_IRRADIANCE_W_PER_M2;

use super::step::StorageModel;

/// Upper bound on the sample buffer reserved up front by [`Simulator::run`].
const MAX_PREALLOCATED_SAMPLES: usize = 1 << 16;

/// Configuration for the simulator.
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// Solar irradiance on the panel (W/m²).
    pub irradiance_w_per_m2: f64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            irradiance_w_per_m2: SOLAR_IRRADIANCE_W_PER_M2,
        }
    }
}

impl SimulatorConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the solar irradiance (in W/m²).
    ///
    /// The default is the solar constant above the atmosphere, 1336.1 W/m².
    pub fn with_irradiance(mut self, irradiance_w_per_m2: f64) -> Self {
        self.irradiance_w_per_m2 = irradiance_w_per_m2;
        self
    }
}

/// The storage-node simulator.
///
/// A `Simulator` is immutable once built; every call to
/// [`Simulator::samples`] starts a fresh run from the initial state.
#[derive(Debug, Clone)]
pub struct Simulator {
    /// Validated run parameters
    params: SimulationParameters,
    /// Simulator configuration
    config: SimulatorConfig,
}

impl Simulator {
    /// Create a new simulator with default configuration.
    pub fn new(params: SimulationParameters) -> Result<Self> {
        Self::with_config(params, SimulatorConfig::default())
    }

    /// Create a new simulator with custom configuration.
    ///
    /// Fails if the parameters violate the step loop's preconditions.
    pub fn with_config(params: SimulationParameters, config: SimulatorConfig) -> Result<Self> {
        params.validate()?;
        Ok(Self { params, config })
    }

    /// Get the run parameters.
    pub fn params(&self) -> &SimulationParameters {
        &self.params
    }

    /// Get the configuration.
    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// The storage model for this run.
    pub fn model(&self) -> StorageModel<'_> {
        StorageModel::new(&self.params, self.config.irradiance_w_per_m2)
    }

    /// Lazily produce the samples of one run.
    pub fn samples(&self) -> Samples<'_> {
        Samples {
            model: self.model(),
            state: None,
            done: false,
        }
    }

    /// Run to completion and collect every sample.
    pub fn run(&self) -> Result<Vec<Sample>> {
        let p = &self.params;
        info!(
            time_step = p.time_step_s,
            duration = p.duration_s,
            short_circuit_current = self.model().short_circuit_current(),
            "starting simulation"
        );

        let capacity = self.expected_sample_count().min(MAX_PREALLOCATED_SAMPLES);
        let mut samples = Vec::with_capacity(capacity);
        for sample in self.samples() {
            match sample {
                Ok(sample) => samples.push(sample),
                Err(e) => {
                    error!(samples = samples.len(), "simulation aborted: {e}");
                    return Err(e);
                }
            }
        }

        info!(samples = samples.len(), "simulation finished");
        Ok(samples)
    }

    /// Number of samples a full run emits, counting the initial one.
    ///
    /// One sample per step up to the first time at or beyond the duration.
    pub fn expected_sample_count(&self) -> usize {
        let p = &self.params;
        let mut steps = (p.duration_s / p.time_step_s).floor();
        // The quotient can round either way; settle on the step time itself.
        if steps * p.time_step_s < p.duration_s {
            steps += 1.0;
        }
        if steps >= 1.0 && (steps - 1.0) * p.time_step_s >= p.duration_s {
            steps -= 1.0;
        }
        // Saturates at usize::MAX for runs too long to count.
        (steps + 1.0) as usize
    }
}

/// Iterator over the samples of one run.
///
/// Yields the initial sample first, then one sample per transition until a
/// sample's time reaches the duration. After an error it yields nothing more.
pub struct Samples<'a> {
    model: StorageModel<'a>,
    state: Option<SimulationState>,
    done: bool,
}

impl Samples<'_> {
    /// State behind the most recently yielded sample.
    pub fn state(&self) -> Option<&SimulationState> {
        self.state.as_ref()
    }
}

impl Iterator for Samples<'_> {
    type Item = Result<Sample>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let next = match &self.state {
            None => self.model.initial_state(),
            Some(state) if state.elapsed_time_s < self.model.params().duration_s => {
                self.model.transition(state)
            }
            Some(_) => {
                self.done = true;
                return None;
            }
        };

        match next {
            Ok(state) => {
                self.state = Some(state);
                Some(Ok(state.sample()))
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl std::iter::FusedIterator for Samples<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CapSimError;
    use approx::assert_relative_eq;

    fn reference_params() -> SimulationParameters {
        SimulationParameters {
            panel_area_m2: 1.0,
            efficiency: 0.2,
            open_circuit_voltage_v: 5.0,
            capacitance_f: 0.01,
            esr_ohm: 0.1,
            initial_charge_c: 0.0,
            active_power_w: 0.0,
            voltage_threshold_v: 1.0,
            time_step_s: 0.1,
            duration_s: 1.0,
        }
    }

    #[test]
    fn test_rejects_bad_time_step() {
        let p = SimulationParameters {
            time_step_s: 0.0,
            ..reference_params()
        };
        assert!(matches!(
            Simulator::new(p),
            Err(CapSimError::InvalidSimulationParam { .. })
        ));
    }

    #[test]
    fn test_sample_count_exact_multiple() {
        let p = SimulationParameters {
            time_step_s: 0.25,
            duration_s: 1.0,
            ..reference_params()
        };
        let sim = Simulator::new(p).unwrap();
        let samples = sim.run().unwrap();
        // floor(1.0 / 0.25) + 1
        assert_eq!(samples.len(), 5);
        assert_eq!(sim.expected_sample_count(), 5);
        assert_eq!(samples.last().unwrap().time_s, 1.0);
    }

    #[test]
    fn test_sample_count_overshoot() {
        let p = SimulationParameters {
            time_step_s: 0.25,
            duration_s: 0.9,
            ..reference_params()
        };
        let sim = Simulator::new(p).unwrap();
        let samples = sim.run().unwrap();
        // floor(0.9 / 0.25) + 2, last sample lands past the duration
        assert_eq!(samples.len(), 5);
        assert_eq!(sim.expected_sample_count(), 5);
        assert_eq!(samples.last().unwrap().time_s, 1.0);
    }

    #[test]
    fn test_zero_duration_emits_initial_sample_only() {
        let p = SimulationParameters {
            duration_s: 0.0,
            ..reference_params()
        };
        let sim = Simulator::new(p).unwrap();
        let samples = sim.run().unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].time_s, 0.0);
        assert_eq!(sim.expected_sample_count(), 1);
    }

    #[test]
    fn test_reference_run_has_eleven_samples() {
        let sim = Simulator::new(reference_params()).unwrap();
        let samples = sim.run().unwrap();
        assert_eq!(samples.len(), 11);
        assert_eq!(sim.expected_sample_count(), 11);
        assert_eq!(samples[0].time_s, 0.0);
        assert_eq!(samples[10].time_s, 1.0);
    }

    #[test]
    fn test_time_steps_are_uniform() {
        let p = SimulationParameters {
            time_step_s: 0.3,
            duration_s: 2.0,
            ..reference_params()
        };
        let sim = Simulator::new(p).unwrap();
        let samples = sim.run().unwrap();
        assert_eq!(samples.len(), sim.expected_sample_count());
        for (i, pair) in samples.windows(2).enumerate() {
            assert!(pair[1].time_s > pair[0].time_s);
            assert_relative_eq!(pair[1].time_s - pair[0].time_s, 0.3, epsilon = 1e-12);
            assert_relative_eq!(pair[1].time_s, (i + 1) as f64 * 0.3, epsilon = 1e-12);
        }
        // Only the last sample may reach the duration
        let (last, rest) = samples.split_last().unwrap();
        assert!(last.time_s >= 2.0);
        assert!(rest.iter().all(|s| s.time_s < 2.0));
    }

    #[test]
    fn test_samples_restartable() {
        let p = SimulationParameters {
            initial_charge_c: 6.0,
            capacitance_f: 1.0,
            active_power_w: 1.0,
            voltage_threshold_v: 2.0,
            panel_area_m2: 0.01,
            time_step_s: 0.5,
            duration_s: 10.0,
            ..reference_params()
        };
        let sim = Simulator::new(p).unwrap();
        let first: Vec<_> = sim.samples().collect::<Result<_>>().unwrap();
        let second: Vec<_> = sim.samples().collect::<Result<_>>().unwrap();
        assert_eq!(first, second);
        assert_eq!(first, sim.run().unwrap());
    }

    #[test]
    fn test_lockout_applies_to_next_step() {
        let p = SimulationParameters {
            panel_area_m2: 0.0,
            capacitance_f: 1.0,
            initial_charge_c: 3.0,
            active_power_w: 2.0,
            voltage_threshold_v: 2.5,
            time_step_s: 0.5,
            duration_s: 3.0,
            ..reference_params()
        };
        let sim = Simulator::new(p).unwrap();
        let mut samples = sim.samples();
        let mut locked = false;
        while let Some(sample) = samples.next() {
            let sample = sample.unwrap();
            let state = *samples.state().unwrap();
            if locked {
                // Load stays off and the node rests at Q/C
                assert_eq!(state.load_power_w, 0.0);
                assert_relative_eq!(sample.voltage_v, state.charge_c, epsilon = 1e-12);
            }
            if sample.voltage_v < p.voltage_threshold_v {
                assert_eq!(state.load_power_w, 0.0);
                locked = true;
            }
        }
        assert!(locked);
    }

    #[test]
    fn test_fault_ends_iteration() {
        let p = SimulationParameters {
            panel_area_m2: 0.0,
            esr_ohm: 0.0,
            initial_charge_c: 0.0,
            active_power_w: 1.0,
            voltage_threshold_v: 0.0,
            ..reference_params()
        };
        let sim = Simulator::new(p).unwrap();
        let items: Vec<_> = sim.samples().collect();
        assert_eq!(items.len(), 2);
        assert!(items[0].is_ok());
        assert!(matches!(items[1], Err(CapSimError::NumericFault { .. })));

        assert!(sim.run().unwrap_err().is_numeric_fault());
    }

    #[test]
    fn test_sample_count_for_very_long_run() {
        let p = SimulationParameters {
            time_step_s: 1.0,
            duration_s: 1e20,
            ..reference_params()
        };
        let sim = Simulator::new(p).unwrap();
        assert_eq!(sim.expected_sample_count(), usize::MAX);

        let head: Vec<_> = sim.samples().take(3).collect::<Result<_>>().unwrap();
        assert_eq!(head.len(), 3);
        assert_eq!(head[2].time_s, 2.0);
    }

    #[test]
    fn test_custom_irradiance() {
        let config = SimulatorConfig::new().with_irradiance(1000.0);
        let sim = Simulator::with_config(reference_params(), config).unwrap();
        // I_sc = 1000 * 1.0 * 0.2 / 5.0 = 40 A, v0 = I_sc * R
        assert_relative_eq!(sim.model().short_circuit_current(), 40.0, epsilon = 1e-12);
        let first = sim.samples().next().unwrap().unwrap();
        assert_relative_eq!(first.voltage_v, 4.0, epsilon = 1e-12);
    }
}

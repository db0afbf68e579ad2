//! Step-loop state and emitted samples.

/// One `(time, voltage)` record of the run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Simulation time (s)
    pub time_s: f64,
    /// Node voltage at that time (V)
    pub voltage_v: f64,
}

impl Sample {
    /// Create a new sample.
    pub fn new(time_s: f64, voltage_v: f64) -> Self {
        Self { time_s, voltage_v }
    }
}

/// Mutable state of the storage node between steps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationState {
    /// Number of transitions applied since the initial state
    pub step_index: u64,
    /// Elapsed simulation time (s)
    pub elapsed_time_s: f64,
    /// Charge on the capacitor (C), never negative
    pub charge_c: f64,
    /// Current delivered by the solar array (A)
    pub source_current_a: f64,
    /// Power drawn by the load (W), zero while the load is off
    pub load_power_w: f64,
    /// Node voltage from the latest quadratic-root step (V)
    pub node_voltage_v: f64,
    /// Whether the latest quadratic-root step had to shed the load
    pub load_shed: bool,
}

impl SimulationState {
    /// The sample this state emits.
    pub fn sample(&self) -> Sample {
        Sample::new(self.elapsed_time_s, self.node_voltage_v)
    }

    /// Whether the load is currently drawing power.
    pub fn load_active(&self) -> bool {
        self.load_power_w != 0.0
    }

    /// Whether the array is currently sourcing current.
    pub fn array_connected(&self) -> bool {
        self.source_current_a != 0.0
    }
}

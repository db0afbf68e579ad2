//! Error types for the Solarcap simulator.
//!
//! This module provides a unified error type [`CapSimError`] that covers
//! argument handling in the command-line wrapper, parameter validation,
//! numeric faults inside the step loop, and CSV output.

use thiserror::Error;

/// Result type alias using [`CapSimError`].
pub type Result<T> = std::result::Result<T, CapSimError>;

/// Unified error type for all Solarcap operations.
#[derive(Error, Debug)]
pub enum CapSimError {
    // ============ Argument Errors ============
    /// Wrong number of positional arguments
    #[error("Incorrect amount of arguments passed through. Recheck command line to ensure the command was entered properly.")]
    InvalidArgumentCount { expected: usize, found: usize },

    /// Positional argument is not a number
    #[error("Invalid value '{value}' for argument '{name}': expected a number")]
    InvalidArgument { name: &'static str, value: String },

    // ============ Simulation Errors ============
    /// Parameter violates the simulator's preconditions
    #[error("Invalid simulation parameter: {message}")]
    InvalidSimulationParam { message: String },

    /// Division by zero or non-finite node voltage during a step
    #[error("Numeric fault at t = {time_s} s: {message}")]
    NumericFault { time_s: f64, message: String },

    // ============ I/O Errors ============
    /// Error writing the sample log
    #[error("Failed to write sample log '{path}': {source}")]
    OutputError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    // ============ WASM Errors ============
    /// WASM-specific error
    #[cfg(feature = "wasm")]
    #[error("WASM error: {message}")]
    WasmError { message: String },
}

impl CapSimError {
    /// Create an invalid simulation parameter error
    pub fn invalid_param(message: impl Into<String>) -> Self {
        Self::InvalidSimulationParam {
            message: message.into(),
        }
    }

    /// Create a numeric fault error
    pub fn numeric_fault(time_s: f64, message: impl Into<String>) -> Self {
        Self::NumericFault {
            time_s,
            message: message.into(),
        }
    }

    /// Create an output error for the given path
    pub fn output(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::OutputError {
            path: path.into(),
            source,
        }
    }

    /// Check if this error came from the numeric core rather than its inputs.
    pub fn is_numeric_fault(&self) -> bool {
        matches!(self, Self::NumericFault { .. })
    }
}

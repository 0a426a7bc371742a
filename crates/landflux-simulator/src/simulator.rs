//! The [`Simulator`] trait: the fixed lifecycle contract every plugged
//! computational unit implements.

use std::error::Error;
use std::fmt;

use landflux_core::ParamsMap;

use crate::context::{DataContext, StepContext};

/// Errors returned by simulator lifecycle methods.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SimulatorError {
    /// The lifecycle call failed.
    ExecutionFailed {
        /// Human-readable description of the failure.
        reason: String,
    },
    /// A required parameter is missing or unparseable.
    BadParameter {
        /// The parameter name.
        name: String,
    },
    /// A variable or store the simulator body needs was not available.
    ///
    /// Reaching this at run time means the signature under-declares the
    /// simulator's dependencies: the consistency checker can only verify
    /// what is declared.
    MissingData {
        /// Description of what was missing.
        what: String,
    },
}

impl SimulatorError {
    /// Convenience constructor for [`SimulatorError::ExecutionFailed`].
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::ExecutionFailed {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for SimulatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExecutionFailed { reason } => write!(f, "execution failed: {reason}"),
            Self::BadParameter { name } => write!(f, "bad or missing parameter '{name}'"),
            Self::MissingData { what } => write!(f, "missing data: {what}"),
        }
    }
}

impl Error for SimulatorError {}

/// A pluggable computational unit with a fixed lifecycle.
///
/// # Contract
///
/// The engine calls the methods in this order, each phase completing for
/// every simulator in pipeline order before the next phase begins:
///
/// 1. [`init_params`](Self::init_params) — once, during pipeline assembly.
/// 2. [`prepare_data`](Self::prepare_data) then
///    [`check_consistency`](Self::check_consistency) — once, conjoined,
///    during consistency checking.
/// 3. [`initialize_run`](Self::initialize_run) — once; must NOT append
///    any step data (the production checker expects empty series after
///    initialization).
/// 4. [`run_step`](Self::run_step) — once per step; must append exactly
///    one value to every series it produces or updates, on every unit of
///    the declared class.
/// 5. [`finalize_run`](Self::finalize_run) — once, after the last step.
///
/// # Object safety
///
/// The trait is object-safe; the engine stores the pipeline as boxed
/// trait objects.
pub trait Simulator {
    /// Consume the parameter mapping from the model configuration.
    fn init_params(&mut self, params: &ParamsMap) -> Result<(), SimulatorError>;

    /// Load or derive whatever data the simulator needs beyond the
    /// spatial repository (default: nothing).
    fn prepare_data(&mut self, _ctx: &mut DataContext<'_>) -> Result<(), SimulatorError> {
        Ok(())
    }

    /// Verify the simulator's own preconditions beyond the declared
    /// signature (default: nothing).
    fn check_consistency(&mut self, _ctx: &mut DataContext<'_>) -> Result<(), SimulatorError> {
        Ok(())
    }

    /// One-time setup before the first step.
    fn initialize_run(&mut self, _ctx: &mut StepContext<'_>) -> Result<(), SimulatorError> {
        Ok(())
    }

    /// Execute one simulation step.
    fn run_step(&mut self, ctx: &mut StepContext<'_>) -> Result<(), SimulatorError>;

    /// One-time teardown after the last step.
    fn finalize_run(&mut self, _ctx: &mut StepContext<'_>) -> Result<(), SimulatorError> {
        Ok(())
    }
}

//! Engine error taxonomy: assembly, consistency, and runtime failures.
//!
//! All variants are unrecoverable at the engine level. The engine
//! records each one in the execution message sink under the `"Engine"`
//! sender before returning it; there is no partial-success mode.

use std::error::Error;
use std::fmt;

use landflux_core::{StatusError, UnitClass, UnitId};
use landflux_io::OutputError;
use landflux_simulator::SimulatorError;
use landflux_space::LandscapeError;

/// The lifecycle phase a runtime failure occurred in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// `init_params` during pipeline assembly.
    Params,
    /// `prepare_data` / `check_consistency` during preparation.
    PrepareData,
    /// `initialize_run`.
    InitializeRun,
    /// `run_step`.
    RunStep,
    /// `finalize_run`.
    FinalizeRun,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Params => "parameter initialization",
            Self::PrepareData => "data preparation",
            Self::InitializeRun => "run initialization",
            Self::RunStep => "step execution",
            Self::FinalizeRun => "run finalization",
        })
    }
}

/// Errors returned by engine operations.
#[derive(Debug)]
pub enum EngineError {
    /// The model names a simulator the registry cannot resolve.
    SimulatorNotFound {
        /// The unresolvable identifier.
        id: String,
    },
    /// A simulator rejected its configured parameters.
    ParamsInitFailed {
        /// The simulator identifier.
        id: String,
        /// The rejection it reported.
        source: SimulatorError,
    },
    /// The model holds no simulator at all.
    EmptyModel,
    /// Topology or process-order construction failed.
    Landscape(LandscapeError),
    /// A required variable is not produced by any earlier pipeline entry.
    MissingRequiredVar {
        /// Display form of the variable name.
        var: String,
        /// The declared distribution.
        class: UnitClass,
        /// First unit of the class lacking the variable.
        unit: UnitId,
        /// The requiring simulator.
        simulator: String,
    },
    /// A produced variable already exists somewhere in its distribution.
    DuplicateProducedVar {
        /// Display form of the variable name.
        var: String,
        /// The declared distribution.
        class: UnitClass,
        /// First unit of the class already holding the variable.
        unit: UnitId,
        /// The producing simulator.
        simulator: String,
    },
    /// A previous-step required variable exists nowhere in the pipeline.
    MissingPrevVar {
        /// Display form of the variable name.
        var: String,
        /// The declared distribution.
        class: UnitClass,
        /// First unit of the class lacking the variable.
        unit: UnitId,
        /// The requiring simulator.
        simulator: String,
    },
    /// A declared variable name violates the naming nomenclature.
    NomenclatureViolation {
        /// The offending name.
        name: String,
        /// The declaring simulator.
        simulator: String,
    },
    /// A required distributed property is missing on some unit.
    MissingProperty {
        /// The property name.
        name: String,
        /// The declared distribution.
        class: UnitClass,
        /// First unit of the class lacking the property.
        unit: UnitId,
        /// The requiring simulator.
        simulator: String,
    },
    /// A required initial condition is missing on some unit.
    MissingIniCondition {
        /// The initial condition name.
        name: String,
        /// The declared distribution.
        class: UnitClass,
        /// First unit of the class lacking the condition.
        unit: UnitId,
        /// The requiring simulator.
        simulator: String,
    },
    /// A declared extra input file does not exist.
    MissingExtraFile {
        /// The file name, relative to the input directory.
        file: String,
        /// The requiring simulator.
        simulator: String,
    },
    /// A series holds the wrong number of values at a checkpoint.
    ProductionCount {
        /// Display form of the variable name.
        var: String,
        /// The unit's class.
        class: UnitClass,
        /// The offending unit.
        unit: UnitId,
        /// Recorded value count.
        found: usize,
        /// Expected value count.
        expected: usize,
    },
    /// A scalar series ends in NaN at a checkpoint.
    ProductionNan {
        /// The variable key.
        var: String,
        /// The unit's class.
        class: UnitClass,
        /// The offending unit.
        unit: UnitId,
    },
    /// A lifecycle call returned failure.
    SimulatorFailed {
        /// The failing simulator identifier.
        id: String,
        /// The phase it failed in.
        phase: Phase,
        /// The failure it reported.
        source: SimulatorError,
    },
    /// The sticky error flag was raised during a lifecycle call, even
    /// though the call itself returned success.
    GlobalError {
        /// The phase the flag was raised in.
        phase: Phase,
    },
    /// The simulated period is invalid.
    Status(StatusError),
    /// A trace or result write failed.
    Output(OutputError),
    /// The operation is not legal in the engine's current state.
    InvalidState {
        /// Short description of the refused operation.
        operation: &'static str,
    },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SimulatorNotFound { id } => write!(f, "simulator '{id}' cannot be loaded"),
            Self::ParamsInitFailed { id, source } => {
                write!(f, "simulator '{id}' rejected its parameters: {source}")
            }
            Self::EmptyModel => write!(f, "no simulator in the model"),
            Self::Landscape(e) => write!(f, "{e}"),
            Self::MissingRequiredVar {
                var,
                class,
                unit,
                simulator,
            } => write!(
                f,
                "{var} variable on {class} {unit} required by {simulator} \
                 is not previously created"
            ),
            Self::DuplicateProducedVar {
                var,
                class,
                unit,
                simulator,
            } => write!(
                f,
                "{var} variable on {class} {unit} produced by {simulator} \
                 cannot be created because it is previously created"
            ),
            Self::MissingPrevVar {
                var,
                class,
                unit,
                simulator,
            } => write!(
                f,
                "{var} variable on {class} {unit} required at previous step \
                 by {simulator} does not exist"
            ),
            Self::NomenclatureViolation { name, simulator } => write!(
                f,
                "variable name '{name}' declared by {simulator} does not \
                 follow the naming nomenclature"
            ),
            Self::MissingProperty {
                name,
                class,
                unit,
                simulator,
            } => write!(
                f,
                "{name} property on {class} {unit} required by {simulator} is missing"
            ),
            Self::MissingIniCondition {
                name,
                class,
                unit,
                simulator,
            } => write!(
                f,
                "{name} initial condition on {class} {unit} required by \
                 {simulator} is missing"
            ),
            Self::MissingExtraFile { file, simulator } => write!(
                f,
                "file '{file}' required by {simulator} not found in the input directory"
            ),
            Self::ProductionCount {
                var,
                class,
                unit,
                found,
                expected,
            } => write!(
                f,
                "{var} variable on {class} {unit} has {found} values but \
                 {expected} were expected"
            ),
            Self::ProductionNan { var, class, unit } => {
                write!(f, "{var} variable on {class} {unit} latest value is NaN")
            }
            Self::SimulatorFailed { id, phase, source } => {
                write!(f, "simulator '{id}' failed during {phase}: {source}")
            }
            Self::GlobalError { phase } => write!(f, "error raised during {phase}"),
            Self::Status(e) => write!(f, "{e}"),
            Self::Output(e) => write!(f, "{e}"),
            Self::InvalidState { operation } => {
                write!(f, "cannot {operation} in the current engine state")
            }
        }
    }
}

impl Error for EngineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ParamsInitFailed { source, .. } | Self::SimulatorFailed { source, .. } => {
                Some(source)
            }
            Self::Landscape(e) => Some(e),
            Self::Status(e) => Some(e),
            Self::Output(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LandscapeError> for EngineError {
    fn from(e: LandscapeError) -> Self {
        Self::Landscape(e)
    }
}

impl From<StatusError> for EngineError {
    fn from(e: StatusError) -> Self {
        Self::Status(e)
    }
}

impl From<OutputError> for EngineError {
    fn from(e: OutputError) -> Self {
        Self::Output(e)
    }
}

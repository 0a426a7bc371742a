//! Lifecycle call contexts.
//!
//! Two borrow scopes: [`DataContext`] for the pre-clock phases (prepare,
//! self-check), [`StepContext`] for the run phases where the simulation
//! clock exists. Both expose the message sink so simulators can raise
//! warnings (non-fatal, surfaced per unit) or errors (fatal through the
//! sticky flag, even when the lifecycle call itself returns `Ok`).

use landflux_core::{ExecutionMessages, SimulationStatus};
use landflux_space::Landscape;

/// Context for [`prepare_data`] and [`check_consistency`]: the spatial
/// repository plus the message sink, before the clock exists.
///
/// [`prepare_data`]: crate::Simulator::prepare_data
/// [`check_consistency`]: crate::Simulator::check_consistency
pub struct DataContext<'a> {
    /// The spatial repository.
    pub landscape: &'a mut Landscape,
    /// The run-scoped message sink.
    pub messages: &'a mut ExecutionMessages,
}

/// Context for the run phases: repository, clock, and message sink.
pub struct StepContext<'a> {
    /// The spatial repository.
    pub landscape: &'a mut Landscape,
    /// The simulation clock (read-only; the engine is its sole writer).
    pub status: &'a SimulationStatus,
    /// The run-scoped message sink.
    pub messages: &'a mut ExecutionMessages,
}

//! The [`OutputHandler`] contract between the engine and its writers.

use chrono::{DateTime, Utc};

use landflux_core::SimulationStatus;
use landflux_space::Landscape;

use crate::error::OutputError;

/// Sink for trace snapshots and end-of-run results.
///
/// The engine calls [`prepare_trace_dir`](Self::prepare_trace_dir) once
/// before the run loop and [`save_trace`](Self::save_trace) after every
/// completed step; [`prepare_output_dir`](Self::prepare_output_dir),
/// [`save_results`](Self::save_results) and
/// [`save_simulation_report`](Self::save_simulation_report) run once
/// after finalization. Every method defaults to a no-op so a handler
/// only implements the outputs it produces.
pub trait OutputHandler {
    /// Create or reset the directory receiving per-step traces.
    fn prepare_trace_dir(&mut self) -> Result<(), OutputError> {
        Ok(())
    }

    /// Record a snapshot of the simulated variables after `step`.
    fn save_trace(
        &mut self,
        _landscape: &Landscape,
        _step: usize,
        _time: DateTime<Utc>,
    ) -> Result<(), OutputError> {
        Ok(())
    }

    /// Create or reset the directory receiving end-of-run results.
    fn prepare_output_dir(&mut self) -> Result<(), OutputError> {
        Ok(())
    }

    /// Write the complete series of every unit.
    fn save_results(
        &mut self,
        _landscape: &Landscape,
        _steps_count: usize,
        _simulation_id: &str,
    ) -> Result<(), OutputError> {
        Ok(())
    }

    /// Write the run summary: period, step size, unit counts.
    fn save_simulation_report(
        &mut self,
        _landscape: &Landscape,
        _status: &SimulationStatus,
        _simulation_id: &str,
    ) -> Result<(), OutputError> {
        Ok(())
    }
}

/// Handler that discards everything. Used for traceless runs and tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullOutput;

impl OutputHandler for NullOutput {}

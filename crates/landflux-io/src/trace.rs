//! Filesystem writer producing tab-separated trace and result files.
//!
//! Layout:
//!
//! * `<trace_dir>/<CLASS><id>.scalars.tab` — one line per traced step,
//!   `step  time  value…`, appended as the run progresses. Vector
//!   series go to a `.vectors.tab` sibling with components joined by
//!   `;`.
//! * `<output_dir>/<simulation_id>/<CLASS><id>.scalars.out` — the full
//!   series after the run, one header line then one row per step.
//! * `<output_dir>/<simulation_id>/simulation.report` — the run
//!   summary.

use std::fmt::Write as _;
use std::fs::{self, File, OpenOptions};
use std::io::Write as _;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::debug;

use landflux_core::{SimulationStatus, UnitClass};
use landflux_space::{Landscape, SpatialUnit};

use crate::error::OutputError;
use crate::handler::OutputHandler;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Tab-separated file writer for traces and end-of-run results.
#[derive(Clone, Debug)]
pub struct TraceFiles {
    trace_dir: PathBuf,
    output_dir: PathBuf,
}

impl TraceFiles {
    /// New writer targeting the given directories. Nothing is touched
    /// on disk until the prepare methods run.
    pub fn new(trace_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            trace_dir: trace_dir.into(),
            output_dir: output_dir.into(),
        }
    }

    fn unit_stem(unit: &SpatialUnit) -> String {
        format!("{}{}", unit.class().tag(), unit.id().0)
    }

    fn append_line(path: &Path, line: &str) -> Result<(), OutputError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| OutputError::new(path, e))?;
        writeln!(file, "{line}").map_err(|e| OutputError::new(path, e))
    }

    fn reset_dir(dir: &Path) -> Result<(), OutputError> {
        if dir.exists() {
            fs::remove_dir_all(dir).map_err(|e| OutputError::new(dir, e))?;
        }
        fs::create_dir_all(dir).map_err(|e| OutputError::new(dir, e))
    }

    fn join_vector(values: &[f64]) -> String {
        let mut out = String::new();
        for (i, v) in values.iter().enumerate() {
            if i > 0 {
                out.push(';');
            }
            let _ = write!(out, "{v}");
        }
        out
    }
}

impl OutputHandler for TraceFiles {
    fn prepare_trace_dir(&mut self) -> Result<(), OutputError> {
        debug!(dir = %self.trace_dir.display(), "preparing trace directory");
        Self::reset_dir(&self.trace_dir)
    }

    fn save_trace(
        &mut self,
        landscape: &Landscape,
        step: usize,
        time: DateTime<Utc>,
    ) -> Result<(), OutputError> {
        let stamp = time.format(TIME_FORMAT);
        for &class in &UnitClass::ALL {
            for unit in landscape.units(class) {
                let stem = Self::unit_stem(unit);

                let mut scalars = String::new();
                for (_, values) in unit.scalar_series() {
                    let _ = match values.last() {
                        Some(v) => write!(scalars, "\t{v}"),
                        None => write!(scalars, "\t-"),
                    };
                }
                if !scalars.is_empty() {
                    let path = self.trace_dir.join(format!("{stem}.scalars.tab"));
                    Self::append_line(&path, &format!("{step}\t{stamp}{scalars}"))?;
                }

                let mut vectors = String::new();
                for (_, values) in unit.vector_series() {
                    let _ = match values.last() {
                        Some(v) => write!(vectors, "\t{}", Self::join_vector(v)),
                        None => write!(vectors, "\t-"),
                    };
                }
                if !vectors.is_empty() {
                    let path = self.trace_dir.join(format!("{stem}.vectors.tab"));
                    Self::append_line(&path, &format!("{step}\t{stamp}{vectors}"))?;
                }
            }
        }
        Ok(())
    }

    fn prepare_output_dir(&mut self) -> Result<(), OutputError> {
        debug!(dir = %self.output_dir.display(), "preparing output directory");
        fs::create_dir_all(&self.output_dir).map_err(|e| OutputError::new(&self.output_dir, e))
    }

    fn save_results(
        &mut self,
        landscape: &Landscape,
        steps_count: usize,
        simulation_id: &str,
    ) -> Result<(), OutputError> {
        let run_dir = self.output_dir.join(simulation_id);
        Self::reset_dir(&run_dir)?;

        for &class in &UnitClass::ALL {
            for unit in landscape.units(class) {
                let stem = Self::unit_stem(unit);

                let scalar_names: Vec<&str> = unit.scalar_series().map(|(k, _)| k).collect();
                if !scalar_names.is_empty() {
                    let path = run_dir.join(format!("{stem}.scalars.out"));
                    let mut file = File::create(&path).map_err(|e| OutputError::new(&path, e))?;
                    writeln!(file, "step\t{}", scalar_names.join("\t"))
                        .map_err(|e| OutputError::new(&path, e))?;
                    for step in 0..steps_count {
                        let mut row = format!("{step}");
                        for (_, values) in unit.scalar_series() {
                            let _ = match values.get(step) {
                                Some(v) => write!(row, "\t{v}"),
                                None => write!(row, "\t-"),
                            };
                        }
                        writeln!(file, "{row}").map_err(|e| OutputError::new(&path, e))?;
                    }
                }

                let vector_names: Vec<&str> = unit.vector_series().map(|(k, _)| k).collect();
                if !vector_names.is_empty() {
                    let path = run_dir.join(format!("{stem}.vectors.out"));
                    let mut file = File::create(&path).map_err(|e| OutputError::new(&path, e))?;
                    writeln!(file, "step\t{}", vector_names.join("\t"))
                        .map_err(|e| OutputError::new(&path, e))?;
                    for step in 0..steps_count {
                        let mut row = format!("{step}");
                        for (_, values) in unit.vector_series() {
                            let _ = match values.get(step) {
                                Some(v) => write!(row, "\t{}", Self::join_vector(v)),
                                None => write!(row, "\t-"),
                            };
                        }
                        writeln!(file, "{row}").map_err(|e| OutputError::new(&path, e))?;
                    }
                }
            }
        }
        debug!(dir = %run_dir.display(), "results saved");
        Ok(())
    }

    fn save_simulation_report(
        &mut self,
        landscape: &Landscape,
        status: &SimulationStatus,
        simulation_id: &str,
    ) -> Result<(), OutputError> {
        let run_dir = self.output_dir.join(simulation_id);
        fs::create_dir_all(&run_dir).map_err(|e| OutputError::new(&run_dir, e))?;
        let path = run_dir.join("simulation.report");

        let mut report = String::new();
        let _ = writeln!(report, "simulation id: {simulation_id}");
        let _ = writeln!(report, "period begin: {}", status.begin().format(TIME_FORMAT));
        let _ = writeln!(report, "period end: {}", status.end().format(TIME_FORMAT));
        let _ = writeln!(report, "delta-t: {}s", status.delta_t().num_seconds());
        let _ = writeln!(report, "steps: {}", status.steps_count());
        for &class in &UnitClass::ALL {
            let _ = writeln!(
                report,
                "{} units: {}",
                class.tag(),
                landscape.units_count(class)
            );
        }

        fs::write(&path, report).map_err(|e| OutputError::new(&path, e))
    }
}

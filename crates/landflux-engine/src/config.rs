//! Engine configuration structs.
//!
//! These are the shapes the configuration collaborator hands over once
//! parsing is done: the ordered model description, the simulated period,
//! and the run environment. File formats live outside the engine.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use landflux_core::ParamsMap;

/// One entry of the model description: a simulator identifier and its
/// parameter mapping, in configuration order.
#[derive(Clone, Debug)]
pub struct SimulatorConfig {
    /// Registry identifier to instantiate.
    pub id: String,
    /// Parameters handed to `init_params`.
    pub params: ParamsMap,
}

impl SimulatorConfig {
    /// Entry with an empty parameter mapping.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            params: ParamsMap::new(),
        }
    }

    /// Add one parameter.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

/// The ordered model description. Configuration order is execution
/// order and dependency-resolution order.
#[derive(Clone, Debug)]
pub struct ModelConfig {
    /// Identifier naming the run in results and reports.
    pub simulation_id: String,
    /// Pipeline entries, in order.
    pub simulators: Vec<SimulatorConfig>,
}

impl ModelConfig {
    /// Empty model with the given simulation identifier.
    pub fn new(simulation_id: impl Into<String>) -> Self {
        Self {
            simulation_id: simulation_id.into(),
            simulators: Vec::new(),
        }
    }

    /// Append one pipeline entry.
    pub fn with_simulator(mut self, config: SimulatorConfig) -> Self {
        self.simulators.push(config);
        self
    }
}

/// The simulated period and step size.
#[derive(Clone, Copy, Debug)]
pub struct RunConfig {
    /// First simulated instant; step 0 falls here.
    pub begin_date: DateTime<Utc>,
    /// Last simulated instant; steps never pass it.
    pub end_date: DateTime<Utc>,
    /// Fixed step duration in whole seconds.
    pub delta_t_seconds: i64,
}

/// Directories and flags scoping one engine run.
#[derive(Clone, Debug)]
pub struct RunEnvironment {
    /// Directory extra input files are resolved against.
    pub input_dir: PathBuf,
    /// Directory receiving end-of-run results.
    pub output_dir: PathBuf,
    /// Directory receiving per-step traces.
    pub trace_dir: PathBuf,
    /// Surface per-simulator warning diagnostics during the run.
    pub verbose: bool,
    /// Suppress progress diagnostics.
    pub quiet: bool,
    /// Persist a trace snapshot after every step.
    pub trace_mode: bool,
    /// Prepare the output directory for end-of-run results.
    pub write_results: bool,
    /// Verify every declared variable name against the nomenclature.
    pub check_var_names: bool,
}

impl RunEnvironment {
    /// Resolve an extra input file name against the input directory.
    pub fn input_full_path(&self, name: &str) -> PathBuf {
        self.input_dir.join(name)
    }

    /// Rebase all three directories under `root` (`input/`, `output/`,
    /// `trace/`), keeping the flags.
    pub fn rooted_at(mut self, root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        self.input_dir = root.join("input");
        self.output_dir = root.join("output");
        self.trace_dir = root.join("trace");
        self
    }
}

impl Default for RunEnvironment {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("."),
            output_dir: PathBuf::from("output"),
            trace_dir: PathBuf::from("trace"),
            verbose: false,
            quiet: false,
            trace_mode: false,
            write_results: false,
            check_var_names: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_paths_resolve_against_input_dir() {
        let env = RunEnvironment::default().rooted_at("/data/run");
        assert_eq!(
            env.input_full_path("rain.series"),
            PathBuf::from("/data/run/input/rain.series")
        );
    }

    #[test]
    fn model_builder_preserves_order() {
        let model = ModelConfig::new("calib-01")
            .with_simulator(SimulatorConfig::new("hydro.rain").with_param("value", "2.5"))
            .with_simulator(SimulatorConfig::new("hydro.runoff"));

        let ids: Vec<_> = model.simulators.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["hydro.rain", "hydro.runoff"]);
        assert_eq!(model.simulators[0].params.get("value").map(String::as_str), Some("2.5"));
    }
}

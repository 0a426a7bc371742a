//! The engine: pipeline assembly, preparation, and the stepped run loop.
//!
//! One [`Engine`] owns the assembled pipeline, the landscape, the
//! message sink, the output handler, and (once prepared) the simulation
//! clock, of which it is the sole writer. Its lifecycle is gated by an
//! explicit [`RunState`]: assemble with
//! [`process_config`](Engine::process_config), validate with
//! [`prepare_data_and_check_consistency`](Engine::prepare_data_and_check_consistency),
//! execute with [`run`](Engine::run). Any failure records one
//! `"Engine"`-sourced message in the sink, moves the engine to
//! [`RunState::Failed`], and refuses further lifecycle work.

use tracing::{debug, error, info, warn};

use landflux_core::{ExecutionMessages, Signature, SimulationStatus};
use landflux_io::OutputHandler;
use landflux_simulator::{DataContext, Simulator, SimulatorError, SimulatorRegistry, StepContext};
use landflux_space::Landscape;

use crate::config::{ModelConfig, RunConfig, RunEnvironment};
use crate::consistency;
use crate::error::{EngineError, Phase};
use crate::production::check_vars_production;

// ── RunState ────────────────────────────────────────────────────

/// Coarse engine lifecycle state gating operation ordering.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    /// No pipeline assembled yet.
    Idle,
    /// Pipeline assembled, not yet validated.
    Assembled,
    /// Consistency checks passed; the clock exists.
    Ready,
    /// The run completed with no error.
    Completed,
    /// An operation failed; no further lifecycle work is accepted.
    Failed,
}

// ── Engine ──────────────────────────────────────────────────────

struct PluggedSimulator {
    id: String,
    simulator: Box<dyn Simulator>,
    signature: Signature,
}

/// The dependency-consistency checker and deterministic stepped
/// scheduler over an ordered simulator pipeline.
pub struct Engine {
    pipeline: Vec<PluggedSimulator>,
    landscape: Landscape,
    messages: ExecutionMessages,
    output: Box<dyn OutputHandler>,
    env: RunEnvironment,
    status: Option<SimulationStatus>,
    state: RunState,
    simulation_id: String,
}

impl Engine {
    /// New idle engine over a loaded landscape.
    pub fn new(landscape: Landscape, env: RunEnvironment, output: Box<dyn OutputHandler>) -> Self {
        Self {
            pipeline: Vec::new(),
            landscape,
            messages: ExecutionMessages::new(),
            output,
            env,
            status: None,
            state: RunState::Idle,
            simulation_id: String::from("simulation"),
        }
    }

    // ── Accessors ──────────────────────────────────────────────

    /// Current lifecycle state.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// The spatial repository.
    pub fn landscape(&self) -> &Landscape {
        &self.landscape
    }

    /// The spatial repository, mutably. Intended for data loading
    /// between assembly and preparation.
    pub fn landscape_mut(&mut self) -> &mut Landscape {
        &mut self.landscape
    }

    /// The run-scoped message sink.
    pub fn messages(&self) -> &ExecutionMessages {
        &self.messages
    }

    /// The simulation clock, once preparation succeeded.
    pub fn status(&self) -> Option<&SimulationStatus> {
        self.status.as_ref()
    }

    /// Pipeline entry identifiers, in execution order.
    pub fn simulator_ids(&self) -> impl Iterator<Item = &str> {
        self.pipeline.iter().map(|p| p.id.as_str())
    }

    /// Record a failure in the sink and make the engine non-runnable.
    fn fail(&mut self, err: EngineError) -> EngineError {
        error!(%err, "engine failure");
        self.messages.set_error("Engine", err.to_string());
        self.state = RunState::Failed;
        err
    }

    // ── Assembly ───────────────────────────────────────────────

    /// Assemble the pipeline from the model description, in
    /// configuration order: instantiate each identifier through the
    /// registry and hand it its parameters.
    ///
    /// A failure leaves the engine non-runnable.
    pub fn process_config(
        &mut self,
        model: &ModelConfig,
        registry: &SimulatorRegistry,
    ) -> Result<(), EngineError> {
        if self.state != RunState::Idle {
            let err = EngineError::InvalidState {
                operation: "assemble a pipeline twice",
            };
            return Err(self.fail(err));
        }
        match self.assemble(model, registry) {
            Ok(()) => {
                self.state = RunState::Assembled;
                if !self.env.quiet {
                    info!(
                        simulation = %self.simulation_id,
                        simulators = self.pipeline.len(),
                        "pipeline assembled"
                    );
                }
                Ok(())
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    fn assemble(
        &mut self,
        model: &ModelConfig,
        registry: &SimulatorRegistry,
    ) -> Result<(), EngineError> {
        self.simulation_id = model.simulation_id.clone();
        for config in &model.simulators {
            let (mut simulator, signature) =
                registry
                    .instantiate(&config.id)
                    .ok_or_else(|| EngineError::SimulatorNotFound {
                        id: config.id.clone(),
                    })?;
            simulator
                .init_params(&config.params)
                .map_err(|source| EngineError::ParamsInitFailed {
                    id: config.id.clone(),
                    source,
                })?;
            debug!(simulator = %config.id, "plugged into the pipeline");
            self.pipeline.push(PluggedSimulator {
                id: config.id.clone(),
                simulator,
                signature,
            });
        }
        Ok(())
    }

    // ── Consistency checking ───────────────────────────────────

    fn signature_entries(&self) -> Vec<(&str, &Signature)> {
        self.pipeline
            .iter()
            .map(|p| (p.id.as_str(), &p.signature))
            .collect()
    }

    /// Phase 1 of the static verifier: settle variable ownership and
    /// create every produced series.
    pub fn check_model_consistency(&mut self) -> Result<(), EngineError> {
        let entries: Vec<(&str, &Signature)> = self
            .pipeline
            .iter()
            .map(|p| (p.id.as_str(), &p.signature))
            .collect();
        let result = consistency::check_model_consistency(&mut self.landscape, &entries);
        result.map_err(|err| self.fail(err))
    }

    /// Phase 2: naming nomenclature and static data availability.
    pub fn check_data_consistency(&mut self) -> Result<(), EngineError> {
        let result = consistency::check_data_consistency(
            &self.landscape,
            &self.signature_entries(),
            self.env.check_var_names,
        );
        result.map_err(|err| self.fail(err))
    }

    /// Phase 3: declared extra input files must exist.
    pub fn check_extra_files_consistency(&mut self) -> Result<(), EngineError> {
        let result =
            consistency::check_extra_files_consistency(&self.signature_entries(), &self.env.input_dir);
        result.map_err(|err| self.fail(err))
    }

    /// Validate the assembled pipeline against the loaded landscape and
    /// make the engine runnable.
    ///
    /// Builds the topology and process orders, runs the three verifier
    /// phases interleaved with each simulator's conjoined
    /// `prepare_data` + `check_consistency` calls, creates the clock,
    /// reserves series capacity, and prepares the output directories
    /// the flags ask for.
    pub fn prepare_data_and_check_consistency(
        &mut self,
        run: &RunConfig,
    ) -> Result<(), EngineError> {
        if self.state != RunState::Assembled {
            let err = EngineError::InvalidState {
                operation: "prepare an engine that is not assembled",
            };
            return Err(self.fail(err));
        }
        match self.prepare(run) {
            Ok(()) => {
                self.state = RunState::Ready;
                if !self.env.quiet {
                    info!("consistency checks passed, engine ready");
                }
                Ok(())
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    fn prepare(&mut self, run: &RunConfig) -> Result<(), EngineError> {
        if self.pipeline.is_empty() {
            return Err(EngineError::EmptyModel);
        }
        self.landscape.build_topology_from_ids()?;
        self.landscape.build_process_orders()?;

        {
            let entries: Vec<(&str, &Signature)> = self
                .pipeline
                .iter()
                .map(|p| (p.id.as_str(), &p.signature))
                .collect();
            consistency::check_model_consistency(&mut self.landscape, &entries)?;
            consistency::check_data_consistency(
                &self.landscape,
                &entries,
                self.env.check_var_names,
            )?;
        }

        // Both must succeed for a simulator to pass.
        self.run_data_phase(Phase::PrepareData, |sim, ctx| {
            sim.prepare_data(ctx)?;
            sim.check_consistency(ctx)
        })?;

        consistency::check_extra_files_consistency(
            &self.signature_entries(),
            &self.env.input_dir,
        )?;

        let status = SimulationStatus::new(run.begin_date, run.end_date, run.delta_t_seconds)?;
        self.landscape.reserve_simulation_vars(status.steps_count());
        if self.env.trace_mode {
            self.output.prepare_trace_dir()?;
        }
        if self.env.write_results {
            self.output.prepare_output_dir()?;
        }
        self.status = Some(status);
        Ok(())
    }

    // ── Run loop ───────────────────────────────────────────────

    /// Execute the stepped run loop to completion.
    ///
    /// Production checkpoints bracket every phase: expected 0 before
    /// and after initialization, `step + 1` after every step, the full
    /// step count after finalization. Any violation, lifecycle failure,
    /// or sticky-error signal aborts immediately with no further
    /// lifecycle calls.
    pub fn run(&mut self) -> Result<(), EngineError> {
        if self.state != RunState::Ready {
            let err = EngineError::InvalidState {
                operation: "run an engine that is not prepared",
            };
            return Err(self.fail(err));
        }
        match self.run_loop() {
            Ok(()) => {
                self.state = RunState::Completed;
                if !self.env.quiet {
                    info!("run completed");
                }
                Ok(())
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    fn run_loop(&mut self) -> Result<(), EngineError> {
        check_vars_production(&self.landscape, 0)?;

        if !self.env.quiet {
            info!("initializing run");
        }
        self.run_step_phase(Phase::InitializeRun, |sim, ctx| sim.initialize_run(ctx))?;
        // Initialization must not have appended any step data.
        check_vars_production(&self.landscape, 0)?;

        loop {
            self.messages.reset_warning_flag();
            let (step, time) = match self.status.as_ref() {
                Some(s) => (s.current_step(), s.current_time()),
                None => {
                    return Err(EngineError::InvalidState {
                        operation: "step without a simulation clock",
                    })
                }
            };
            debug!(step, %time, "running step");

            self.run_step_phase(Phase::RunStep, |sim, ctx| sim.run_step(ctx))?;
            check_vars_production(&self.landscape, step + 1)?;

            if self.env.trace_mode {
                self.output.save_trace(&self.landscape, step, time)?;
            }

            let more = match self.status.as_mut() {
                Some(s) => s.switch_to_next_step(),
                None => false,
            };
            if !more {
                break;
            }
        }

        if !self.env.quiet {
            info!("finalizing run");
        }
        self.run_step_phase(Phase::FinalizeRun, |sim, ctx| sim.finalize_run(ctx))?;
        let steps_count = self.status.as_ref().map_or(0, SimulationStatus::steps_count);
        check_vars_production(&self.landscape, steps_count)?;
        Ok(())
    }

    // ── Phase runners ──────────────────────────────────────────

    /// Apply one pre-clock lifecycle call to every pipeline entry in
    /// order, with the sticky-error gate and per-entry warning reset.
    fn run_data_phase<F>(&mut self, phase: Phase, mut call: F) -> Result<(), EngineError>
    where
        F: FnMut(&mut dyn Simulator, &mut DataContext<'_>) -> Result<(), SimulatorError>,
    {
        for plugged in &mut self.pipeline {
            self.messages.reset_warning_flag();
            let mut ctx = DataContext {
                landscape: &mut self.landscape,
                messages: &mut self.messages,
            };
            let result = call(plugged.simulator.as_mut(), &mut ctx);

            // The sticky flag overrides the local return value: a call
            // returning success can still have signalled a fatal error
            // through the sink.
            if self.messages.is_error_flag() {
                return Err(EngineError::GlobalError { phase });
            }
            result.map_err(|source| EngineError::SimulatorFailed {
                id: plugged.id.clone(),
                phase,
                source,
            })?;
            if self.env.verbose && self.messages.is_warning_flag() {
                warn!(simulator = %plugged.id, %phase, "warnings raised");
            }
        }
        Ok(())
    }

    /// Apply one run-phase lifecycle call to every pipeline entry in
    /// order, with the sticky-error gate and per-entry warning reset.
    fn run_step_phase<F>(&mut self, phase: Phase, mut call: F) -> Result<(), EngineError>
    where
        F: FnMut(&mut dyn Simulator, &mut StepContext<'_>) -> Result<(), SimulatorError>,
    {
        let status = match self.status.as_ref() {
            Some(s) => s,
            None => {
                return Err(EngineError::InvalidState {
                    operation: "run a lifecycle phase without a simulation clock",
                })
            }
        };
        for plugged in &mut self.pipeline {
            self.messages.reset_warning_flag();
            let mut ctx = StepContext {
                landscape: &mut self.landscape,
                status,
                messages: &mut self.messages,
            };
            let result = call(plugged.simulator.as_mut(), &mut ctx);

            if self.messages.is_error_flag() {
                return Err(EngineError::GlobalError { phase });
            }
            result.map_err(|source| EngineError::SimulatorFailed {
                id: plugged.id.clone(),
                phase,
                source,
            })?;
            if self.env.verbose && self.messages.is_warning_flag() {
                warn!(simulator = %plugged.id, %phase, "warnings raised");
            }
        }
        Ok(())
    }

    // ── Output ─────────────────────────────────────────────────

    /// Flush the complete series of every unit through the output
    /// handler.
    pub fn save_results(&mut self) -> Result<(), EngineError> {
        self.messages.reset_warning_flag();
        let steps_count = match self.status.as_ref() {
            Some(s) => s.steps_count(),
            None => {
                let err = EngineError::InvalidState {
                    operation: "save results before preparation",
                };
                return Err(self.fail(err));
            }
        };
        let result = self
            .output
            .save_results(&self.landscape, steps_count, &self.simulation_id);
        result.map_err(|e| self.fail(EngineError::Output(e)))
    }

    /// Flush the run summary through the output handler.
    pub fn save_simulation_report(&mut self) -> Result<(), EngineError> {
        self.messages.reset_warning_flag();
        let result = match self.status.as_ref() {
            Some(status) => {
                self.output
                    .save_simulation_report(&self.landscape, status, &self.simulation_id)
            }
            None => {
                let err = EngineError::InvalidState {
                    operation: "save a report before preparation",
                };
                return Err(self.fail(err));
            }
        };
        result.map_err(|e| self.fail(EngineError::Output(e)))
    }
}

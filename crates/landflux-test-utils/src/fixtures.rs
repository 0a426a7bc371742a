//! Reusable simulator fixtures.
//!
//! Stub simulators for pipeline validation and engine testing:
//!
//! - [`ProducerSimulator`] — appends one scalar per unit per step.
//! - [`ConsumerSimulator`] — reads a required scalar, fails if absent.
//! - [`UpdaterSimulator`] — scales the current-step value in place,
//!   appending it first when no earlier entry produced it.
//! - [`FailingSimulator`] — fails deterministically in a chosen phase.
//! - [`PartialProducerSimulator`] — skips one unit at a chosen step.
//! - [`NanProducerSimulator`] — appends NaN at a chosen step.

use landflux_core::{ParamsExt, ParamsMap, Signature, UnitClass, UnitId, VarName};
use landflux_simulator::{Simulator, SimulatorError, StepContext};
use landflux_space::{Landscape, SpatialUnit};

fn store_error(err: landflux_space::UnitError) -> SimulatorError {
    SimulatorError::MissingData {
        what: err.to_string(),
    }
}

/// Appends `value + step` to one scalar series on every unit of a class.
///
/// The base value can be overridden through the `value` parameter.
pub struct ProducerSimulator {
    pub key: String,
    pub class: UnitClass,
    pub value: f64,
}

impl ProducerSimulator {
    pub fn new(key: impl Into<String>, class: UnitClass) -> Self {
        Self {
            key: key.into(),
            class,
            value: 0.0,
        }
    }

    pub fn signature(&self, name: &str) -> Signature {
        Signature::new(name).produces(VarName::scalar(&self.key), self.class)
    }
}

impl Simulator for ProducerSimulator {
    fn init_params(&mut self, params: &ParamsMap) -> Result<(), SimulatorError> {
        if let Some(value) = params.get_f64("value") {
            self.value = value;
        }
        Ok(())
    }

    fn run_step(&mut self, ctx: &mut StepContext<'_>) -> Result<(), SimulatorError> {
        let value = self.value + ctx.status.current_step() as f64;
        for unit in ctx.landscape.units_mut(self.class) {
            unit.append_scalar(&self.key, value).map_err(store_error)?;
        }
        Ok(())
    }
}

/// Reads the current-step value of a required scalar on every unit.
pub struct ConsumerSimulator {
    pub key: String,
    pub class: UnitClass,
    /// Sum of everything read, for assertions after the run.
    pub total: f64,
}

impl ConsumerSimulator {
    pub fn new(key: impl Into<String>, class: UnitClass) -> Self {
        Self {
            key: key.into(),
            class,
            total: 0.0,
        }
    }

    pub fn signature(&self, name: &str) -> Signature {
        Signature::new(name).requires(VarName::scalar(&self.key), self.class)
    }
}

impl Simulator for ConsumerSimulator {
    fn init_params(&mut self, _params: &ParamsMap) -> Result<(), SimulatorError> {
        Ok(())
    }

    fn run_step(&mut self, ctx: &mut StepContext<'_>) -> Result<(), SimulatorError> {
        let step = ctx.status.current_step();
        for unit in ctx.landscape.units(self.class) {
            let value =
                unit.scalar_at(&self.key, step)
                    .ok_or_else(|| SimulatorError::MissingData {
                        what: format!(
                            "{}{} has no value for {} at step {step}",
                            unit.class().tag(),
                            unit.id(),
                            self.key
                        ),
                    })?;
            self.total += value;
        }
        Ok(())
    }
}

/// Scales the current-step value of a scalar in place.
///
/// When no earlier pipeline entry produced the variable this step, the
/// base value is appended instead, matching the create-if-absent
/// semantics of updated declarations.
pub struct UpdaterSimulator {
    pub key: String,
    pub class: UnitClass,
    pub factor: f64,
    pub base: f64,
}

impl UpdaterSimulator {
    pub fn new(key: impl Into<String>, class: UnitClass, factor: f64) -> Self {
        Self {
            key: key.into(),
            class,
            factor,
            base: 1.0,
        }
    }

    pub fn signature(&self, name: &str) -> Signature {
        Signature::new(name).updates(VarName::scalar(&self.key), self.class)
    }
}

impl Simulator for UpdaterSimulator {
    fn init_params(&mut self, params: &ParamsMap) -> Result<(), SimulatorError> {
        if let Some(base) = params.get_f64("base") {
            self.base = base;
        }
        Ok(())
    }

    fn run_step(&mut self, ctx: &mut StepContext<'_>) -> Result<(), SimulatorError> {
        let step = ctx.status.current_step();
        for unit in ctx.landscape.units_mut(self.class) {
            match unit.scalar_at(&self.key, step) {
                Some(current) => unit
                    .set_scalar_at(&self.key, step, current * self.factor)
                    .map_err(store_error)?,
                None => unit
                    .append_scalar(&self.key, self.base)
                    .map_err(store_error)?,
            }
        }
        Ok(())
    }
}

/// Which lifecycle phase a [`FailingSimulator`] fails in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailPhase {
    PrepareData,
    CheckConsistency,
    InitializeRun,
    RunStep(usize),
    FinalizeRun,
}

/// Fails deterministically in one chosen phase.
///
/// With `through_messages` set, the failure is reported through the
/// sticky error flag while the lifecycle call itself returns `Ok`.
pub struct FailingSimulator {
    pub phase: FailPhase,
    pub through_messages: bool,
}

impl FailingSimulator {
    pub fn new(phase: FailPhase) -> Self {
        Self {
            phase,
            through_messages: false,
        }
    }

    pub fn through_messages(phase: FailPhase) -> Self {
        Self {
            phase,
            through_messages: true,
        }
    }

    pub fn signature(&self, name: &str) -> Signature {
        Signature::new(name)
    }

    fn fail(
        &self,
        hit: bool,
        messages: &mut landflux_core::ExecutionMessages,
    ) -> Result<(), SimulatorError> {
        if !hit {
            return Ok(());
        }
        if self.through_messages {
            messages.set_error("failing.sim", "deliberate failure");
            Ok(())
        } else {
            Err(SimulatorError::failed("deliberate failure"))
        }
    }
}

impl Simulator for FailingSimulator {
    fn init_params(&mut self, _params: &ParamsMap) -> Result<(), SimulatorError> {
        Ok(())
    }

    fn prepare_data(
        &mut self,
        ctx: &mut landflux_simulator::DataContext<'_>,
    ) -> Result<(), SimulatorError> {
        let hit = self.phase == FailPhase::PrepareData;
        self.fail(hit, ctx.messages)
    }

    fn check_consistency(
        &mut self,
        ctx: &mut landflux_simulator::DataContext<'_>,
    ) -> Result<(), SimulatorError> {
        let hit = self.phase == FailPhase::CheckConsistency;
        self.fail(hit, ctx.messages)
    }

    fn initialize_run(&mut self, ctx: &mut StepContext<'_>) -> Result<(), SimulatorError> {
        let hit = self.phase == FailPhase::InitializeRun;
        self.fail(hit, ctx.messages)
    }

    fn run_step(&mut self, ctx: &mut StepContext<'_>) -> Result<(), SimulatorError> {
        let hit = self.phase == FailPhase::RunStep(ctx.status.current_step());
        self.fail(hit, ctx.messages)
    }

    fn finalize_run(&mut self, ctx: &mut StepContext<'_>) -> Result<(), SimulatorError> {
        let hit = self.phase == FailPhase::FinalizeRun;
        self.fail(hit, ctx.messages)
    }
}

/// Produces a scalar on every unit except the first one of the class at
/// one chosen step. Trips the per-step production check.
pub struct PartialProducerSimulator {
    pub key: String,
    pub class: UnitClass,
    pub skip_step: usize,
}

impl PartialProducerSimulator {
    pub fn new(key: impl Into<String>, class: UnitClass, skip_step: usize) -> Self {
        Self {
            key: key.into(),
            class,
            skip_step,
        }
    }

    pub fn signature(&self, name: &str) -> Signature {
        Signature::new(name).produces(VarName::scalar(&self.key), self.class)
    }
}

impl Simulator for PartialProducerSimulator {
    fn init_params(&mut self, _params: &ParamsMap) -> Result<(), SimulatorError> {
        Ok(())
    }

    fn run_step(&mut self, ctx: &mut StepContext<'_>) -> Result<(), SimulatorError> {
        let step = ctx.status.current_step();
        let skip_first = step == self.skip_step;
        for (i, unit) in ctx.landscape.units_mut(self.class).enumerate() {
            if skip_first && i == 0 {
                continue;
            }
            unit.append_scalar(&self.key, step as f64)
                .map_err(store_error)?;
        }
        Ok(())
    }
}

/// Produces a scalar that goes NaN at one chosen step. Trips the
/// per-step production check's value validation.
pub struct NanProducerSimulator {
    pub key: String,
    pub class: UnitClass,
    pub nan_step: usize,
}

impl NanProducerSimulator {
    pub fn new(key: impl Into<String>, class: UnitClass, nan_step: usize) -> Self {
        Self {
            key: key.into(),
            class,
            nan_step,
        }
    }

    pub fn signature(&self, name: &str) -> Signature {
        Signature::new(name).produces(VarName::scalar(&self.key), self.class)
    }
}

impl Simulator for NanProducerSimulator {
    fn init_params(&mut self, _params: &ParamsMap) -> Result<(), SimulatorError> {
        Ok(())
    }

    fn run_step(&mut self, ctx: &mut StepContext<'_>) -> Result<(), SimulatorError> {
        let step = ctx.status.current_step();
        let value = if step == self.nan_step {
            f64::NAN
        } else {
            step as f64
        };
        for unit in ctx.landscape.units_mut(self.class) {
            unit.append_scalar(&self.key, value).map_err(store_error)?;
        }
        Ok(())
    }
}

/// Small connected landscape: `n_su` surface units chained downstream
/// into the first reach segment, `n_rs` chained reach segments, `n_gu`
/// standalone groundwater units. Every unit carries an `area` property
/// and a `level` initial condition. Topology and process orders are
/// already built.
pub fn demo_landscape(n_su: u32, n_rs: u32, n_gu: u32) -> Landscape {
    let mut landscape = Landscape::new();

    for i in 1..=n_su {
        let mut su = SpatialUnit::new(UnitClass::Su, UnitId(i));
        su.set_property("area", 100.0 * i as f64);
        su.set_ini_condition("level", 1.0);
        if i < n_su {
            su.declare_downstream(UnitClass::Su, UnitId(i + 1));
        } else if n_rs > 0 {
            su.declare_downstream(UnitClass::Rs, UnitId(1));
        }
        landscape.add_unit(su).expect("fresh SU id");
    }
    for i in 1..=n_rs {
        let mut rs = SpatialUnit::new(UnitClass::Rs, UnitId(i));
        rs.set_property("area", 10.0 * i as f64);
        rs.set_ini_condition("level", 0.5);
        if i < n_rs {
            rs.declare_downstream(UnitClass::Rs, UnitId(i + 1));
        }
        landscape.add_unit(rs).expect("fresh RS id");
    }
    for i in 1..=n_gu {
        let mut gu = SpatialUnit::new(UnitClass::Gu, UnitId(i));
        gu.set_property("area", 1000.0 * i as f64);
        gu.set_ini_condition("level", 10.0);
        landscape.add_unit(gu).expect("fresh GU id");
    }

    landscape
        .build_topology_from_ids()
        .expect("demo links resolve");
    landscape
        .build_process_orders()
        .expect("demo links are acyclic");
    landscape
}

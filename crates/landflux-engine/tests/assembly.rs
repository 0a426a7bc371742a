//! Pipeline assembly behavior: ordering, unresolvable identifiers,
//! rejected parameters.

use landflux_core::{ParamsExt, ParamsMap, Signature, UnitClass};
use landflux_engine::{Engine, EngineError, ModelConfig, RunEnvironment, RunState, SimulatorConfig};
use landflux_io::NullOutput;
use landflux_simulator::{Simulator, SimulatorError, SimulatorRegistry, StepContext};
use landflux_test_utils::{demo_landscape, ProducerSimulator};

/// Requires a `coeff` parameter; rejects the mapping otherwise.
struct PickySimulator;

impl Simulator for PickySimulator {
    fn init_params(&mut self, params: &ParamsMap) -> Result<(), SimulatorError> {
        params
            .get_f64("coeff")
            .ok_or(SimulatorError::BadParameter {
                name: "coeff".into(),
            })
            .map(|_| ())
    }

    fn run_step(&mut self, _ctx: &mut StepContext<'_>) -> Result<(), SimulatorError> {
        Ok(())
    }
}

fn registry() -> SimulatorRegistry {
    let mut registry = SimulatorRegistry::new();
    registry.register("rain.producer", || {
        let sim = ProducerSimulator::new("rain.atm.down.mm", UnitClass::Su);
        let signature = sim.signature("rain.producer");
        (Box::new(sim) as Box<dyn Simulator>, signature)
    });
    registry.register("flow.producer", || {
        let sim = ProducerSimulator::new("flow.rate.out.m3s", UnitClass::Su);
        let signature = sim.signature("flow.producer");
        (Box::new(sim) as Box<dyn Simulator>, signature)
    });
    registry.register("picky", || {
        (
            Box::new(PickySimulator) as Box<dyn Simulator>,
            Signature::new("picky"),
        )
    });
    registry
}

fn engine() -> Engine {
    Engine::new(
        demo_landscape(2, 0, 0),
        RunEnvironment::default(),
        Box::new(NullOutput),
    )
}

#[test]
fn pipeline_order_follows_configuration_order() {
    let mut engine = engine();
    let model = ModelConfig::new("run")
        .with_simulator(SimulatorConfig::new("flow.producer"))
        .with_simulator(SimulatorConfig::new("rain.producer"));

    engine.process_config(&model, &registry()).unwrap();

    let ids: Vec<_> = engine.simulator_ids().collect();
    assert_eq!(ids, ["flow.producer", "rain.producer"]);
    assert_eq!(engine.state(), RunState::Assembled);
}

#[test]
fn unknown_identifier_aborts_assembly() {
    let mut engine = engine();
    let model = ModelConfig::new("run")
        .with_simulator(SimulatorConfig::new("rain.producer"))
        .with_simulator(SimulatorConfig::new("no.such.simulator"));

    let err = engine.process_config(&model, &registry()).unwrap_err();
    assert!(matches!(err, EngineError::SimulatorNotFound { id } if id == "no.such.simulator"));
    assert_eq!(engine.state(), RunState::Failed);
    assert!(engine.messages().is_error_flag());
    assert_eq!(engine.messages().errors()[0].sender, "Engine");
}

#[test]
fn rejected_parameters_abort_assembly() {
    let mut engine = engine();
    let model = ModelConfig::new("run").with_simulator(SimulatorConfig::new("picky"));

    let err = engine.process_config(&model, &registry()).unwrap_err();
    assert!(matches!(err, EngineError::ParamsInitFailed { id, .. } if id == "picky"));
    assert_eq!(engine.state(), RunState::Failed);
}

#[test]
fn parameters_reach_the_simulator() {
    let mut engine = engine();
    let model = ModelConfig::new("run")
        .with_simulator(SimulatorConfig::new("picky").with_param("coeff", "0.8"));

    engine.process_config(&model, &registry()).unwrap();
    assert_eq!(engine.state(), RunState::Assembled);
}

#[test]
fn assembling_twice_is_refused() {
    let mut engine = engine();
    let model = ModelConfig::new("run").with_simulator(SimulatorConfig::new("rain.producer"));

    engine.process_config(&model, &registry()).unwrap();
    let err = engine.process_config(&model, &registry()).unwrap_err();
    assert!(matches!(err, EngineError::InvalidState { .. }));
}

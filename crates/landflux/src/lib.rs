//! Landflux: a spatially-distributed discrete-time simulation engine
//! for landscape modelling.
//!
//! This is the top-level facade crate re-exporting the public API from
//! all Landflux sub-crates. For most users, adding `landflux` as a
//! single dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use chrono::TimeZone;
//! use landflux::prelude::*;
//!
//! // A minimal simulator producing a rain series on surface units.
//! struct Rain;
//! impl Simulator for Rain {
//!     fn init_params(&mut self, _params: &ParamsMap) -> Result<(), SimulatorError> {
//!         Ok(())
//!     }
//!     fn run_step(&mut self, ctx: &mut StepContext<'_>) -> Result<(), SimulatorError> {
//!         for unit in ctx.landscape.units_mut(UnitClass::Su) {
//!             unit.append_scalar("rain.atm.down.mm", 1.2)
//!                 .map_err(|e| SimulatorError::failed(e.to_string()))?;
//!         }
//!         Ok(())
//!     }
//! }
//!
//! // One surface unit, no links.
//! let mut landscape = Landscape::new();
//! landscape
//!     .add_unit(SpatialUnit::new(UnitClass::Su, UnitId(1)))
//!     .unwrap();
//!
//! let mut registry = SimulatorRegistry::new();
//! registry.register("demo.rain", || {
//!     let signature = Signature::new("demo.rain")
//!         .produces(VarName::scalar("rain.atm.down.mm"), UnitClass::Su);
//!     (Box::new(Rain) as Box<dyn Simulator>, signature)
//! });
//!
//! let model = ModelConfig::new("demo").with_simulator(SimulatorConfig::new("demo.rain"));
//! let run = RunConfig {
//!     begin_date: chrono::Utc.with_ymd_and_hms(2001, 1, 1, 0, 0, 0).unwrap(),
//!     end_date: chrono::Utc.with_ymd_and_hms(2001, 1, 3, 0, 0, 0).unwrap(),
//!     delta_t_seconds: 86_400,
//! };
//!
//! let mut engine = Engine::new(landscape, RunEnvironment::default(), Box::new(NullOutput));
//! engine.process_config(&model, &registry).unwrap();
//! engine.prepare_data_and_check_consistency(&run).unwrap();
//! engine.run().unwrap();
//!
//! let su = engine.landscape().unit(UnitClass::Su, UnitId(1)).unwrap();
//! assert_eq!(su.values_count("rain.atm.down.mm", VarKind::Scalar), Some(3));
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in
//! the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `landflux-core` | IDs, variable names, signatures, messages, clock |
//! | [`space`] | `landflux-space` | Spatial units, landscape, events, topology |
//! | [`simulator`] | `landflux-simulator` | Simulator trait, contexts, registry |
//! | [`engine`] | `landflux-engine` | Consistency checks and the stepped run loop |
//! | [`io`] | `landflux-io` | Trace and result writers |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, signatures, and the simulation clock (`landflux-core`).
pub use landflux_core as types;

/// Spatial units, the landscape repository, and topology
/// (`landflux-space`).
pub use landflux_space as space;

/// The [`simulator::Simulator`] lifecycle trait, call contexts, and
/// registry (`landflux-simulator`).
pub use landflux_simulator as simulator;

/// Pipeline assembly, consistency checking, and the run loop
/// (`landflux-engine`).
pub use landflux_engine as engine;

/// Trace and result writers (`landflux-io`).
pub use landflux_io as io;

/// Common imports for typical Landflux usage.
///
/// ```rust
/// use landflux::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use landflux_core::{
        ExecutionMessages, ParamsExt, ParamsMap, Signature, SimulationStatus, UnitClass, UnitId,
        VarKind, VarName,
    };

    // Space
    pub use landflux_space::{Event, Landscape, SpatialUnit};

    // Simulator
    pub use landflux_simulator::{
        DataContext, Simulator, SimulatorError, SimulatorRegistry, StepContext,
    };

    // Engine
    pub use landflux_engine::{
        Engine, EngineError, ModelConfig, RunConfig, RunEnvironment, RunState, SimulatorConfig,
    };

    // Output
    pub use landflux_io::{NullOutput, OutputHandler, TraceFiles};
}

//! Simulator lifecycle trait and registry for Landflux simulations.
//!
//! A [`Simulator`] is a pluggable computational unit executed by the
//! engine through a fixed lifecycle: parametrize, prepare, self-check,
//! initialize, run one step per clock tick, finalize. Its [`Signature`]
//! (from `landflux-core`) declares the data contract the engine verifies
//! before any step runs. The [`SimulatorRegistry`] is the narrow
//! load/instantiate contract the engine consumes from plugin management.
//!
//! [`Signature`]: landflux_core::Signature

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod context;
pub mod registry;
pub mod simulator;

pub use context::{DataContext, StepContext};
pub use registry::SimulatorRegistry;
pub use simulator::{Simulator, SimulatorError};

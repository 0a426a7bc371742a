//! The Landflux engine: pipeline assembly, dependency-consistency
//! checking, and the deterministic stepped run loop.
//!
//! The engine owns the ordered simulator pipeline and drives it through
//! the fixed lifecycle over a loaded [`Landscape`], enforcing the
//! variable-production invariant at every checkpoint. Configuration
//! parsing, plugin discovery, and output formats live in collaborators;
//! only their narrow contracts appear here.
//!
//! [`Landscape`]: landflux_space::Landscape

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
mod consistency;
pub mod engine;
pub mod error;
mod production;

pub use config::{ModelConfig, RunConfig, RunEnvironment, SimulatorConfig};
pub use engine::{Engine, RunState};
pub use error::{EngineError, Phase};

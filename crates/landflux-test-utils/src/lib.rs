//! Test fixtures and stub simulators for Landflux development.
//!
//! Provides minimal [`Simulator`] implementations exercising each
//! declaration kind (produce, require, update) plus deliberately
//! misbehaving ones for the engine's abort paths, and a
//! [`demo_landscape`] helper building a small connected landscape.
//!
//! [`Simulator`]: landflux_simulator::Simulator

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

mod fixtures;

pub use fixtures::{
    demo_landscape, ConsumerSimulator, FailPhase, FailingSimulator, NanProducerSimulator,
    PartialProducerSimulator, ProducerSimulator, UpdaterSimulator,
};

//! Spatial repository and per-unit data stores for Landflux simulations.
//!
//! This crate owns the [`Landscape`] — the mapping containers holding
//! every spatial unit of the three classes — together with the per-unit
//! named stores (properties, initial conditions, simulated scalar and
//! vector series), the distributed event collections, and the topology
//! linking and process-order computation the engine requires before any
//! consistency check runs.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod event;
pub mod landscape;
pub mod unit;

pub use error::LandscapeError;
pub use event::{Event, EventCollection, EventError};
pub use landscape::Landscape;
pub use unit::{SpatialUnit, UnitError};

//! Core types for the Landflux simulation engine.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental abstractions used throughout the Landflux workspace:
//! unit identifiers and classes, variable names and signatures, the
//! execution message sink, and the simulation clock.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod id;
pub mod messages;
pub mod signature;
pub mod status;
pub mod varname;

pub use id::{UnitClass, UnitId};
pub use messages::{ExecutionMessages, Message};
pub use signature::{ParamsExt, ParamsMap, Signature, VarDecl};
pub use status::{SimulationStatus, StatusError};
pub use varname::{VarKind, VarName, VarNameError};

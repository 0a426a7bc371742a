//! Trace and result writers for Landflux simulation runs.
//!
//! The engine drives output through the [`OutputHandler`] trait at
//! well-defined points of the run loop; the on-disk format is an
//! implementation detail of the handler. [`TraceFiles`] is the stock
//! filesystem handler, [`NullOutput`] the no-op used by tests and
//! traceless runs.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod handler;
pub mod trace;

pub use error::OutputError;
pub use handler::{NullOutput, OutputHandler};
pub use trace::TraceFiles;

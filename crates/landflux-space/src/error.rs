//! Error types for landscape construction and topology building.

use std::error::Error;
use std::fmt;

use landflux_core::{UnitClass, UnitId};

/// Errors from [`Landscape`](crate::Landscape) mutation and topology
/// construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LandscapeError {
    /// A unit with the same ID already exists in the class collection.
    DuplicateUnit {
        /// Class of the colliding unit.
        class: UnitClass,
        /// The duplicated ID.
        id: UnitId,
    },
    /// A declared downstream link points at a unit that does not exist.
    UnknownDownstream {
        /// Class of the linking unit.
        class: UnitClass,
        /// ID of the linking unit.
        id: UnitId,
        /// Class of the missing target.
        target_class: UnitClass,
        /// ID of the missing target.
        target_id: UnitId,
    },
    /// The downstream link graph contains a cycle, so no process order
    /// exists.
    TopologyCycle,
    /// Topology has not been built yet for an operation that needs it.
    TopologyNotBuilt,
}

impl fmt::Display for LandscapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateUnit { class, id } => {
                write!(f, "{class} {id} already exists")
            }
            Self::UnknownDownstream {
                class,
                id,
                target_class,
                target_id,
            } => write!(
                f,
                "{class} {id} links to unknown downstream {target_class} {target_id}"
            ),
            Self::TopologyCycle => write!(f, "downstream links form a cycle"),
            Self::TopologyNotBuilt => write!(f, "topology has not been built"),
        }
    }
}

impl Error for LandscapeError {}

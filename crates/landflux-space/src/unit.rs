//! One spatial unit and its four named data stores.
//!
//! Every unit — whatever its class — owns static properties, initial
//! conditions, and the two simulated series stores (scalar and vector,
//! the two variable namespaces). Series are append-only: one value per
//! completed step, enforced by the engine's production checker rather
//! than by this store.

use std::error::Error;
use std::fmt;

use indexmap::IndexMap;
use smallvec::SmallVec;

use landflux_core::{UnitClass, UnitId, VarKind};

use crate::event::{Event, EventCollection};

/// Errors from per-unit variable access.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UnitError {
    /// The named series does not exist in the addressed namespace.
    UnknownVariable {
        /// The storage key.
        key: String,
        /// The namespace that was addressed.
        kind: VarKind,
    },
    /// An in-place update addressed a step with no recorded value.
    StepOutOfRange {
        /// The storage key.
        key: String,
        /// The addressed step.
        step: usize,
    },
}

impl fmt::Display for UnitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownVariable { key, kind } => {
                let marker = match kind {
                    VarKind::Scalar => "",
                    VarKind::Vector => "[]",
                };
                write!(f, "variable {key}{marker} does not exist")
            }
            Self::StepOutOfRange { key, step } => {
                write!(f, "variable {key} has no value recorded at step {step}")
            }
        }
    }
}

impl Error for UnitError {}

/// A spatial unit of any class, identified by a positive integer ID
/// unique within its class collection.
#[derive(Clone, Debug)]
pub struct SpatialUnit {
    class: UnitClass,
    id: UnitId,
    properties: IndexMap<String, f64>,
    ini_conditions: IndexMap<String, f64>,
    scalar_vars: IndexMap<String, Vec<f64>>,
    vector_vars: IndexMap<String, Vec<Vec<f64>>>,
    events: EventCollection,
    declared_downstream: Option<(UnitClass, UnitId)>,
    upstream: SmallVec<[(UnitClass, UnitId); 4]>,
    process_order: u32,
}

impl SpatialUnit {
    /// New unit with empty stores and no topology.
    pub fn new(class: UnitClass, id: UnitId) -> Self {
        Self {
            class,
            id,
            properties: IndexMap::new(),
            ini_conditions: IndexMap::new(),
            scalar_vars: IndexMap::new(),
            vector_vars: IndexMap::new(),
            events: EventCollection::new(),
            declared_downstream: None,
            upstream: SmallVec::new(),
            process_order: 0,
        }
    }

    /// The unit's class.
    pub fn class(&self) -> UnitClass {
        self.class
    }

    /// The unit's ID.
    pub fn id(&self) -> UnitId {
        self.id
    }

    // ── Properties and initial conditions ──────────────────────────

    /// Set a static property. Load-time only; read-only during runs.
    pub fn set_property(&mut self, name: impl Into<String>, value: f64) {
        self.properties.insert(name.into(), value);
    }

    /// Read a static property.
    pub fn property(&self, name: &str) -> Option<f64> {
        self.properties.get(name).copied()
    }

    /// Whether a property exists.
    pub fn has_property(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    /// Set an initial condition, valid only at step 0.
    pub fn set_ini_condition(&mut self, name: impl Into<String>, value: f64) {
        self.ini_conditions.insert(name.into(), value);
    }

    /// Read an initial condition.
    pub fn ini_condition(&self, name: &str) -> Option<f64> {
        self.ini_conditions.get(name).copied()
    }

    /// Whether an initial condition exists.
    pub fn has_ini_condition(&self, name: &str) -> bool {
        self.ini_conditions.contains_key(name)
    }

    // ── Simulated variables ────────────────────────────────────────

    /// Whether the series `(key, kind)` exists.
    pub fn has_variable(&self, key: &str, kind: VarKind) -> bool {
        match kind {
            VarKind::Scalar => self.scalar_vars.contains_key(key),
            VarKind::Vector => self.vector_vars.contains_key(key),
        }
    }

    /// Create an empty series. Returns `false` if it already exists.
    pub fn create_variable(&mut self, key: &str, kind: VarKind) -> bool {
        if self.has_variable(key, kind) {
            return false;
        }
        match kind {
            VarKind::Scalar => {
                self.scalar_vars.insert(key.to_string(), Vec::new());
            }
            VarKind::Vector => {
                self.vector_vars.insert(key.to_string(), Vec::new());
            }
        }
        true
    }

    /// Append one scalar value to the series for the current step.
    pub fn append_scalar(&mut self, key: &str, value: f64) -> Result<(), UnitError> {
        self.scalar_vars
            .get_mut(key)
            .ok_or_else(|| UnitError::UnknownVariable {
                key: key.to_string(),
                kind: VarKind::Scalar,
            })?
            .push(value);
        Ok(())
    }

    /// Append one vector value to the series for the current step.
    pub fn append_vector(&mut self, key: &str, value: Vec<f64>) -> Result<(), UnitError> {
        self.vector_vars
            .get_mut(key)
            .ok_or_else(|| UnitError::UnknownVariable {
                key: key.to_string(),
                kind: VarKind::Vector,
            })?
            .push(value);
        Ok(())
    }

    /// Replace the scalar value recorded at `step`, for in-place updates.
    pub fn set_scalar_at(&mut self, key: &str, step: usize, value: f64) -> Result<(), UnitError> {
        let serie = self
            .scalar_vars
            .get_mut(key)
            .ok_or_else(|| UnitError::UnknownVariable {
                key: key.to_string(),
                kind: VarKind::Scalar,
            })?;
        match serie.get_mut(step) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(UnitError::StepOutOfRange {
                key: key.to_string(),
                step,
            }),
        }
    }

    /// Scalar value recorded at `step`.
    pub fn scalar_at(&self, key: &str, step: usize) -> Option<f64> {
        self.scalar_vars.get(key)?.get(step).copied()
    }

    /// Most recently appended scalar value.
    pub fn latest_scalar(&self, key: &str) -> Option<f64> {
        self.scalar_vars.get(key)?.last().copied()
    }

    /// Vector value recorded at `step`.
    pub fn vector_at(&self, key: &str, step: usize) -> Option<&[f64]> {
        self.vector_vars.get(key)?.get(step).map(Vec::as_slice)
    }

    /// Number of recorded values in the series, `None` if it does not
    /// exist.
    pub fn values_count(&self, key: &str, kind: VarKind) -> Option<usize> {
        match kind {
            VarKind::Scalar => self.scalar_vars.get(key).map(Vec::len),
            VarKind::Vector => self.vector_vars.get(key).map(Vec::len),
        }
    }

    /// Iterate scalar series as `(key, values)`.
    pub fn scalar_series(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.scalar_vars
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Iterate vector series as `(key, values)`.
    pub fn vector_series(&self) -> impl Iterator<Item = (&str, &[Vec<f64>])> {
        self.vector_vars
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Reserve capacity for `steps_count` future values in every series.
    pub fn reserve_vars(&mut self, steps_count: usize) {
        for serie in self.scalar_vars.values_mut() {
            serie.reserve(steps_count);
        }
        for serie in self.vector_vars.values_mut() {
            serie.reserve(steps_count);
        }
    }

    // ── Events ─────────────────────────────────────────────────────

    /// Attach an event. Load-time only.
    pub fn add_event(&mut self, event: Event) {
        self.events.insert(event);
    }

    /// The unit's chronologically ordered events.
    pub fn events(&self) -> &EventCollection {
        &self.events
    }

    // ── Topology ───────────────────────────────────────────────────

    /// Declare the downstream link by target class and ID. Resolved and
    /// validated by the landscape's topology build.
    pub fn declare_downstream(&mut self, class: UnitClass, id: UnitId) {
        self.declared_downstream = Some((class, id));
    }

    /// The declared downstream target, if any.
    pub fn declared_downstream(&self) -> Option<(UnitClass, UnitId)> {
        self.declared_downstream
    }

    /// Units flowing into this one, filled by the topology build.
    pub fn upstream(&self) -> &[(UnitClass, UnitId)] {
        &self.upstream
    }

    pub(crate) fn add_upstream(&mut self, class: UnitClass, id: UnitId) {
        self.upstream.push((class, id));
    }

    pub(crate) fn clear_upstream(&mut self) {
        self.upstream.clear();
    }

    /// Position of this unit in its class's processing order.
    pub fn process_order(&self) -> u32 {
        self.process_order
    }

    pub(crate) fn set_process_order(&mut self, order: u32) {
        self.process_order = order;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variable_namespaces_are_distinct() {
        let mut unit = SpatialUnit::new(UnitClass::Su, UnitId(3));
        assert!(unit.create_variable("water.depth", VarKind::Scalar));
        assert!(unit.create_variable("water.depth", VarKind::Vector));
        // Same key again in the same namespace is a no-op.
        assert!(!unit.create_variable("water.depth", VarKind::Scalar));

        unit.append_scalar("water.depth", 0.5).unwrap();
        unit.append_vector("water.depth", vec![1.0, 2.0]).unwrap();

        assert_eq!(unit.values_count("water.depth", VarKind::Scalar), Some(1));
        assert_eq!(unit.values_count("water.depth", VarKind::Vector), Some(1));
        assert_eq!(unit.scalar_at("water.depth", 0), Some(0.5));
        assert_eq!(unit.vector_at("water.depth", 0), Some([1.0, 2.0].as_slice()));
    }

    #[test]
    fn append_to_unknown_variable_fails() {
        let mut unit = SpatialUnit::new(UnitClass::Rs, UnitId(1));
        assert!(matches!(
            unit.append_scalar("missing", 1.0),
            Err(UnitError::UnknownVariable { .. })
        ));
    }

    #[test]
    fn in_place_update_overwrites_without_growing() {
        let mut unit = SpatialUnit::new(UnitClass::Su, UnitId(1));
        unit.create_variable("stock", VarKind::Scalar);
        unit.append_scalar("stock", 10.0).unwrap();
        unit.set_scalar_at("stock", 0, 7.5).unwrap();

        assert_eq!(unit.scalar_at("stock", 0), Some(7.5));
        assert_eq!(unit.values_count("stock", VarKind::Scalar), Some(1));
    }

    #[test]
    fn properties_and_iniconds_are_separate_stores() {
        let mut unit = SpatialUnit::new(UnitClass::Gu, UnitId(9));
        unit.set_property("area", 120.0);
        unit.set_ini_condition("level", 4.2);

        assert!(unit.has_property("area"));
        assert!(!unit.has_property("level"));
        assert!(unit.has_ini_condition("level"));
        assert_eq!(unit.property("area"), Some(120.0));
        assert_eq!(unit.ini_condition("level"), Some(4.2));
    }
}

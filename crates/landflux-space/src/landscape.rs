//! The spatial repository: three class-keyed unit collections, topology
//! resolution, process-order computation, and the cross-collection
//! variable primitives the consistency checker builds on.

use indexmap::IndexMap;

use landflux_core::{UnitClass, UnitId, VarKind};

use crate::error::LandscapeError;
use crate::unit::SpatialUnit;

/// The spatial repository holding every unit of the three classes.
///
/// Units are keyed by ID within their class collection; iteration
/// follows insertion order until [`build_process_orders`]
/// (Landscape::build_process_orders) assigns process orders.
#[derive(Debug, Default)]
pub struct Landscape {
    sus: IndexMap<UnitId, SpatialUnit>,
    rss: IndexMap<UnitId, SpatialUnit>,
    gus: IndexMap<UnitId, SpatialUnit>,
    topology_built: bool,
}

impl Landscape {
    /// New empty landscape.
    pub fn new() -> Self {
        Self::default()
    }

    fn collection(&self, class: UnitClass) -> &IndexMap<UnitId, SpatialUnit> {
        match class {
            UnitClass::Su => &self.sus,
            UnitClass::Rs => &self.rss,
            UnitClass::Gu => &self.gus,
        }
    }

    fn collection_mut(&mut self, class: UnitClass) -> &mut IndexMap<UnitId, SpatialUnit> {
        match class {
            UnitClass::Su => &mut self.sus,
            UnitClass::Rs => &mut self.rss,
            UnitClass::Gu => &mut self.gus,
        }
    }

    // ── Unit management ────────────────────────────────────────────

    /// Add a unit to its class collection. IDs are unique per class.
    pub fn add_unit(&mut self, unit: SpatialUnit) -> Result<(), LandscapeError> {
        let class = unit.class();
        let id = unit.id();
        let collection = self.collection_mut(class);
        if collection.contains_key(&id) {
            return Err(LandscapeError::DuplicateUnit { class, id });
        }
        collection.insert(id, unit);
        Ok(())
    }

    /// Look up a unit.
    pub fn unit(&self, class: UnitClass, id: UnitId) -> Option<&SpatialUnit> {
        self.collection(class).get(&id)
    }

    /// Look up a unit mutably.
    pub fn unit_mut(&mut self, class: UnitClass, id: UnitId) -> Option<&mut SpatialUnit> {
        self.collection_mut(class).get_mut(&id)
    }

    /// Iterate the units of one class.
    pub fn units(&self, class: UnitClass) -> impl Iterator<Item = &SpatialUnit> {
        self.collection(class).values()
    }

    /// Iterate the units of one class mutably.
    pub fn units_mut(&mut self, class: UnitClass) -> impl Iterator<Item = &mut SpatialUnit> {
        self.collection_mut(class).values_mut()
    }

    /// Number of units in one class.
    pub fn units_count(&self, class: UnitClass) -> usize {
        self.collection(class).len()
    }

    /// Total number of units across all classes.
    pub fn total_units_count(&self) -> usize {
        UnitClass::ALL
            .iter()
            .map(|&class| self.units_count(class))
            .sum()
    }

    // ── Topology ───────────────────────────────────────────────────

    /// Resolve every declared downstream ID into a checked link and
    /// fill the upstream lists.
    ///
    /// Called once after data load, before consistency checking. An
    /// unknown target fails the whole build.
    pub fn build_topology_from_ids(&mut self) -> Result<(), LandscapeError> {
        // Collect links first: the target may live in another class
        // collection than the source.
        let mut links: Vec<((UnitClass, UnitId), (UnitClass, UnitId))> = Vec::new();
        for &class in &UnitClass::ALL {
            for unit in self.collection(class).values() {
                if let Some((target_class, target_id)) = unit.declared_downstream() {
                    if self.unit(target_class, target_id).is_none() {
                        return Err(LandscapeError::UnknownDownstream {
                            class,
                            id: unit.id(),
                            target_class,
                            target_id,
                        });
                    }
                    links.push(((class, unit.id()), (target_class, target_id)));
                }
            }
        }

        for &class in &UnitClass::ALL {
            for unit in self.collection_mut(class).values_mut() {
                unit.clear_upstream();
            }
        }
        for ((src_class, src_id), (dst_class, dst_id)) in links {
            if let Some(target) = self.unit_mut(dst_class, dst_id) {
                target.add_upstream(src_class, src_id);
            }
        }
        self.topology_built = true;
        Ok(())
    }

    /// Assign every unit a process order placing it after all of its
    /// upstream units.
    ///
    /// Orders start at 1 for units with no upstream; a downstream cycle
    /// makes ordering impossible and fails the build.
    pub fn build_process_orders(&mut self) -> Result<(), LandscapeError> {
        if !self.topology_built {
            return Err(LandscapeError::TopologyNotBuilt);
        }

        // Kahn's algorithm over the downstream link graph.
        let mut in_degree: IndexMap<(UnitClass, UnitId), usize> = IndexMap::new();
        let mut nodes: Vec<(UnitClass, UnitId)> = Vec::new();
        for &class in &UnitClass::ALL {
            for unit in self.collection(class).values() {
                nodes.push((class, unit.id()));
                in_degree.insert((class, unit.id()), unit.upstream().len());
            }
        }

        let mut orders: IndexMap<(UnitClass, UnitId), u32> = IndexMap::new();
        let mut frontier: Vec<(UnitClass, UnitId)> = nodes
            .iter()
            .copied()
            .filter(|node| in_degree[node] == 0)
            .collect();

        while let Some(node) = frontier.pop() {
            let unit = self
                .unit(node.0, node.1)
                .ok_or(LandscapeError::TopologyCycle)?;
            let order = unit
                .upstream()
                .iter()
                .filter_map(|up| orders.get(up).copied())
                .max()
                .unwrap_or(0)
                + 1;
            orders.insert(node, order);

            if let Some(downstream) = unit.declared_downstream() {
                let remaining = in_degree
                    .get_mut(&downstream)
                    .ok_or(LandscapeError::TopologyCycle)?;
                *remaining -= 1;
                if *remaining == 0 {
                    frontier.push(downstream);
                }
            }
        }

        if orders.len() != nodes.len() {
            return Err(LandscapeError::TopologyCycle);
        }

        for (node, order) in orders {
            if let Some(unit) = self.unit_mut(node.0, node.1) {
                unit.set_process_order(order);
            }
        }
        Ok(())
    }

    /// Units of one class sorted by process order (ID breaks ties).
    pub fn units_in_process_order(&self, class: UnitClass) -> Vec<&SpatialUnit> {
        let mut units: Vec<&SpatialUnit> = self.collection(class).values().collect();
        units.sort_by_key(|u| (u.process_order(), u.id()));
        units
    }

    // ── Cross-collection variable primitives ───────────────────────

    /// Check that every unit of `class` holds the series `(key, kind)`.
    /// On failure returns the first unit lacking it.
    pub fn all_units_have_variable(
        &self,
        class: UnitClass,
        key: &str,
        kind: VarKind,
    ) -> Result<(), UnitId> {
        for unit in self.collection(class).values() {
            if !unit.has_variable(key, kind) {
                return Err(unit.id());
            }
        }
        Ok(())
    }

    /// Check that no unit of `class` holds the series `(key, kind)`.
    /// On failure returns the first unit holding it.
    pub fn no_unit_has_variable(
        &self,
        class: UnitClass,
        key: &str,
        kind: VarKind,
    ) -> Result<(), UnitId> {
        for unit in self.collection(class).values() {
            if unit.has_variable(key, kind) {
                return Err(unit.id());
            }
        }
        Ok(())
    }

    /// Create the empty series `(key, kind)` on every unit of `class`.
    pub fn create_variable(&mut self, class: UnitClass, key: &str, kind: VarKind) {
        for unit in self.collection_mut(class).values_mut() {
            unit.create_variable(key, kind);
        }
    }

    /// Create the series on every unit of `class` that lacks it.
    ///
    /// The implicit-produce semantics of updated variables: creating
    /// where absent, leaving existing series untouched.
    pub fn create_variable_if_absent(&mut self, class: UnitClass, key: &str, kind: VarKind) {
        self.create_variable(class, key, kind);
    }

    /// Check that every unit of `class` holds the property `name`.
    pub fn all_units_have_property(&self, class: UnitClass, name: &str) -> Result<(), UnitId> {
        for unit in self.collection(class).values() {
            if !unit.has_property(name) {
                return Err(unit.id());
            }
        }
        Ok(())
    }

    /// Check that every unit of `class` holds the initial condition
    /// `name`.
    pub fn all_units_have_ini_condition(
        &self,
        class: UnitClass,
        name: &str,
    ) -> Result<(), UnitId> {
        for unit in self.collection(class).values() {
            if !unit.has_ini_condition(name) {
                return Err(unit.id());
            }
        }
        Ok(())
    }

    /// Reserve one slot per future step in every series of every unit.
    pub fn reserve_simulation_vars(&mut self, steps_count: usize) {
        for &class in &UnitClass::ALL {
            for unit in self.collection_mut(class).values_mut() {
                unit.reserve_vars(steps_count);
            }
        }
    }
}

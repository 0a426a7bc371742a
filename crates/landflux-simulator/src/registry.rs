//! The simulator registry: identifier-to-factory resolution.
//!
//! This is the narrow contract the engine consumes from plugin
//! management. How factories get registered (static linking, dynamic
//! discovery, generated bindings) is a packaging concern outside the
//! core; the engine only ever resolves an identifier to a fresh
//! instance and its signature.

use indexmap::IndexMap;

use landflux_core::Signature;

use crate::simulator::Simulator;

/// Factory producing a fresh simulator instance and its signature.
pub type SimulatorFactory = Box<dyn Fn() -> (Box<dyn Simulator>, Signature)>;

/// Registry of simulator factories keyed by identifier.
#[derive(Default)]
pub struct SimulatorRegistry {
    factories: IndexMap<String, SimulatorFactory>,
}

impl SimulatorRegistry {
    /// New empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory under `id`, replacing any previous entry.
    pub fn register<F>(&mut self, id: impl Into<String>, factory: F)
    where
        F: Fn() -> (Box<dyn Simulator>, Signature) + 'static,
    {
        self.factories.insert(id.into(), Box::new(factory));
    }

    /// Instantiate a fresh simulator for `id`, or `None` if unknown.
    pub fn instantiate(&self, id: &str) -> Option<(Box<dyn Simulator>, Signature)> {
        self.factories.get(id).map(|factory| factory())
    }

    /// Whether `id` is registered.
    pub fn is_registered(&self, id: &str) -> bool {
        self.factories.contains_key(id)
    }

    /// Registered identifiers, in registration order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::StepContext;
    use crate::simulator::SimulatorError;
    use landflux_core::ParamsMap;

    struct NoopSimulator;

    impl Simulator for NoopSimulator {
        fn init_params(&mut self, _params: &ParamsMap) -> Result<(), SimulatorError> {
            Ok(())
        }

        fn run_step(&mut self, _ctx: &mut StepContext<'_>) -> Result<(), SimulatorError> {
            Ok(())
        }
    }

    #[test]
    fn instantiate_resolves_registered_ids() {
        let mut registry = SimulatorRegistry::new();
        registry.register("noop.sim", || {
            (
                Box::new(NoopSimulator) as Box<dyn Simulator>,
                Signature::new("noop"),
            )
        });

        assert!(registry.is_registered("noop.sim"));
        let (_, signature) = registry.instantiate("noop.sim").unwrap();
        assert_eq!(signature.name, "noop");
        assert!(registry.instantiate("unknown.sim").is_none());
    }

    #[test]
    fn each_instantiation_invokes_the_factory() {
        use std::cell::Cell;
        use std::rc::Rc;

        let calls = Rc::new(Cell::new(0usize));
        let counter = Rc::clone(&calls);

        let mut registry = SimulatorRegistry::new();
        registry.register("noop.sim", move || {
            counter.set(counter.get() + 1);
            (
                Box::new(NoopSimulator) as Box<dyn Simulator>,
                Signature::new("noop"),
            )
        });

        registry.instantiate("noop.sim").unwrap();
        registry.instantiate("noop.sim").unwrap();
        assert_eq!(calls.get(), 2);
    }
}

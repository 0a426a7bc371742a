//! Simulator signatures: the static declaration of what a simulator
//! requires, produces, or updates, and at what spatial distribution.
//!
//! Signatures are declared once at registration and never change. The
//! engine consumes them for pipeline consistency checking; they are the
//! only channel through which variable ownership is expressed.

use indexmap::IndexMap;

use crate::id::UnitClass;
use crate::varname::VarName;

/// One signature entry: a variable (or property, or initial condition)
/// name bound to the unit class it is distributed over.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VarDecl {
    /// The demultiplexed variable name.
    pub name: VarName,
    /// The spatial distribution of the declaration.
    pub class: UnitClass,
}

impl VarDecl {
    /// Convenience constructor.
    pub fn new(name: VarName, class: UnitClass) -> Self {
        Self { name, class }
    }
}

/// Ordered simulator parameter mapping, as read from the model
/// configuration.
pub type ParamsMap = IndexMap<String, String>;

/// Typed accessors over a [`ParamsMap`].
pub trait ParamsExt {
    /// Raw string parameter.
    fn get_str(&self, key: &str) -> Option<&str>;
    /// Parameter parsed as `f64`, `None` if absent or unparseable.
    fn get_f64(&self, key: &str) -> Option<f64>;
    /// Parameter parsed as `i64`, `None` if absent or unparseable.
    fn get_i64(&self, key: &str) -> Option<i64>;
}

impl ParamsExt for ParamsMap {
    fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }

    fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key)?.parse().ok()
    }

    fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key)?.parse().ok()
    }
}

/// A simulator's static dependency declaration.
///
/// Semantics of the variable lists:
///
/// - `produced_vars`: the simulator asserts exclusive ownership of
///   creating the variable on every unit of the class.
/// - `required_vars` / `used_vars`: consumed at the current step; required
///   entries must have been produced by an earlier pipeline entry.
/// - `updated_vars`: mutated in place; created on demand if no earlier
///   entry produced them.
/// - `required_prev_vars` / `used_prev_vars`: consumed at the previous
///   step; must exist somewhere in the pipeline (any position, since
///   production creates the series before the first step runs).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Signature {
    /// Human-readable simulator name for reports.
    pub name: String,
    /// Variables that must already be produced by an earlier entry.
    pub required_vars: Vec<VarDecl>,
    /// Variables this simulator creates, exclusively.
    pub produced_vars: Vec<VarDecl>,
    /// Variables this simulator mutates in place.
    pub updated_vars: Vec<VarDecl>,
    /// Variables read if present (no existence requirement).
    pub used_vars: Vec<VarDecl>,
    /// Previous-step variables that must exist in the pipeline.
    pub required_prev_vars: Vec<VarDecl>,
    /// Previous-step variables read if present.
    pub used_prev_vars: Vec<VarDecl>,
    /// Distributed properties that must exist on every unit of the class.
    pub required_props: Vec<VarDecl>,
    /// Distributed initial conditions that must exist on every unit.
    pub required_iniconds: Vec<VarDecl>,
    /// Extra input files resolved against the input directory.
    pub required_extra_files: Vec<String>,
}

impl Signature {
    /// New empty signature with the given simulator name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Declare a required variable.
    pub fn requires(mut self, name: VarName, class: UnitClass) -> Self {
        self.required_vars.push(VarDecl::new(name, class));
        self
    }

    /// Declare a produced variable.
    pub fn produces(mut self, name: VarName, class: UnitClass) -> Self {
        self.produced_vars.push(VarDecl::new(name, class));
        self
    }

    /// Declare an updated variable.
    pub fn updates(mut self, name: VarName, class: UnitClass) -> Self {
        self.updated_vars.push(VarDecl::new(name, class));
        self
    }

    /// Declare a used variable.
    pub fn uses(mut self, name: VarName, class: UnitClass) -> Self {
        self.used_vars.push(VarDecl::new(name, class));
        self
    }

    /// Declare a previous-step required variable.
    pub fn requires_prev(mut self, name: VarName, class: UnitClass) -> Self {
        self.required_prev_vars.push(VarDecl::new(name, class));
        self
    }

    /// Declare a previous-step used variable.
    pub fn uses_prev(mut self, name: VarName, class: UnitClass) -> Self {
        self.used_prev_vars.push(VarDecl::new(name, class));
        self
    }

    /// Declare a required distributed property.
    pub fn requires_prop(mut self, name: VarName, class: UnitClass) -> Self {
        self.required_props.push(VarDecl::new(name, class));
        self
    }

    /// Declare a required distributed initial condition.
    pub fn requires_inicond(mut self, name: VarName, class: UnitClass) -> Self {
        self.required_iniconds.push(VarDecl::new(name, class));
        self
    }

    /// Declare a required extra input file.
    pub fn requires_extra_file(mut self, path: impl Into<String>) -> Self {
        self.required_extra_files.push(path.into());
        self
    }

    /// Every variable declaration, across all six variable lists, in
    /// declaration order. Used by the nomenclature check; properties and
    /// initial conditions are not variables and are excluded.
    pub fn all_var_decls(&self) -> impl Iterator<Item = &VarDecl> {
        self.produced_vars
            .iter()
            .chain(&self.required_vars)
            .chain(&self.used_vars)
            .chain(&self.updated_vars)
            .chain(&self.required_prev_vars)
            .chain(&self.used_prev_vars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_preserves_declaration_order() {
        let sig = Signature::new("hydro.surf.runoff")
            .produces(VarName::scalar("flow.rate.out.m3s"), UnitClass::Su)
            .requires(VarName::scalar("rain.atm.down.mm"), UnitClass::Su)
            .updates(VarName::vector("water.level.down.m"), UnitClass::Rs);

        assert_eq!(sig.produced_vars.len(), 1);
        assert_eq!(sig.required_vars.len(), 1);
        assert_eq!(sig.updated_vars.len(), 1);
        assert_eq!(sig.produced_vars[0].class, UnitClass::Su);
    }

    #[test]
    fn all_var_decls_covers_every_list() {
        let sig = Signature::new("s")
            .produces(VarName::scalar("a.a.a.a"), UnitClass::Su)
            .requires(VarName::scalar("b.b.b.b"), UnitClass::Su)
            .uses(VarName::scalar("c.c.c.c"), UnitClass::Rs)
            .updates(VarName::scalar("d.d.d.d"), UnitClass::Gu)
            .requires_prev(VarName::scalar("e.e.e.e"), UnitClass::Su)
            .uses_prev(VarName::scalar("f.f.f.f"), UnitClass::Su)
            .requires_prop(VarName::scalar("area"), UnitClass::Su);

        let keys: Vec<_> = sig.all_var_decls().map(|d| d.name.key()).collect();
        assert_eq!(
            keys,
            ["a.a.a.a", "b.b.b.b", "c.c.c.c", "d.d.d.d", "e.e.e.e", "f.f.f.f"]
        );
    }

    #[test]
    fn params_typed_getters() {
        let mut params = ParamsMap::new();
        params.insert("coeff".into(), "0.75".into());
        params.insert("steps".into(), "12".into());
        params.insert("label".into(), "calib".into());

        assert_eq!(params.get_f64("coeff"), Some(0.75));
        assert_eq!(params.get_i64("steps"), Some(12));
        assert_eq!(params.get_str("label"), Some("calib"));
        assert_eq!(params.get_f64("label"), None);
        assert_eq!(params.get_f64("missing"), None);
    }
}

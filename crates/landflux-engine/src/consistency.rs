//! The three-phase static verifier run once over the assembled
//! pipeline, before any simulation step.
//!
//! Phase 1 walks the pipeline in order and settles variable ownership:
//! required entries must already exist, produced entries must not and
//! are created eagerly, updated entries are created where absent. A
//! second full pass then resolves previous-step requirements against
//! the eagerly created series. Phase 2 verifies naming and static data,
//! phase 3 extra file existence. Everything fails fast on the first
//! violation.

use std::path::Path;

use tracing::debug;

use landflux_core::Signature;
use landflux_space::Landscape;

use crate::error::EngineError;

/// Phase 1: variable contract verification and eager series creation.
pub(crate) fn check_model_consistency(
    landscape: &mut Landscape,
    pipeline: &[(&str, &Signature)],
) -> Result<(), EngineError> {
    for (id, signature) in pipeline {
        debug!(simulator = id, "checking variable contract");

        for decl in &signature.required_vars {
            landscape
                .all_units_have_variable(decl.class, decl.name.key(), decl.name.kind())
                .map_err(|unit| EngineError::MissingRequiredVar {
                    var: decl.name.to_string(),
                    class: decl.class,
                    unit,
                    simulator: (*id).to_string(),
                })?;
        }

        for decl in &signature.produced_vars {
            landscape
                .no_unit_has_variable(decl.class, decl.name.key(), decl.name.kind())
                .map_err(|unit| EngineError::DuplicateProducedVar {
                    var: decl.name.to_string(),
                    class: decl.class,
                    unit,
                    simulator: (*id).to_string(),
                })?;
            landscape.create_variable(decl.class, decl.name.key(), decl.name.kind());
        }

        for decl in &signature.updated_vars {
            // Implicit produce; never fails.
            landscape.create_variable_if_absent(decl.class, decl.name.key(), decl.name.kind());
        }
    }

    // Second pass: previous-step requirements see every eagerly created
    // series, whatever the producer's pipeline position.
    for (id, signature) in pipeline {
        for decl in &signature.required_prev_vars {
            landscape
                .all_units_have_variable(decl.class, decl.name.key(), decl.name.kind())
                .map_err(|unit| EngineError::MissingPrevVar {
                    var: decl.name.to_string(),
                    class: decl.class,
                    unit,
                    simulator: (*id).to_string(),
                })?;
        }
    }

    Ok(())
}

/// Phase 2: naming nomenclature, then static data availability.
pub(crate) fn check_data_consistency(
    landscape: &Landscape,
    pipeline: &[(&str, &Signature)],
    check_var_names: bool,
) -> Result<(), EngineError> {
    if check_var_names {
        for (id, signature) in pipeline {
            for decl in signature.all_var_decls() {
                if !decl.name.matches_nomenclature() {
                    return Err(EngineError::NomenclatureViolation {
                        name: decl.name.to_string(),
                        simulator: (*id).to_string(),
                    });
                }
            }
        }
    }

    for (id, signature) in pipeline {
        for decl in &signature.required_props {
            landscape
                .all_units_have_property(decl.class, decl.name.key())
                .map_err(|unit| EngineError::MissingProperty {
                    name: decl.name.key().to_string(),
                    class: decl.class,
                    unit,
                    simulator: (*id).to_string(),
                })?;
        }
        for decl in &signature.required_iniconds {
            landscape
                .all_units_have_ini_condition(decl.class, decl.name.key())
                .map_err(|unit| EngineError::MissingIniCondition {
                    name: decl.name.key().to_string(),
                    class: decl.class,
                    unit,
                    simulator: (*id).to_string(),
                })?;
        }
    }

    Ok(())
}

/// Phase 3: declared extra input files must exist. Touches nothing, so
/// repeated runs against an unchanged filesystem agree.
pub(crate) fn check_extra_files_consistency(
    pipeline: &[(&str, &Signature)],
    input_dir: &Path,
) -> Result<(), EngineError> {
    for (id, signature) in pipeline {
        for file in &signature.required_extra_files {
            if !input_dir.join(file).is_file() {
                return Err(EngineError::MissingExtraFile {
                    file: file.clone(),
                    simulator: (*id).to_string(),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use landflux_core::{UnitClass, UnitId, VarKind, VarName};
    use landflux_space::SpatialUnit;

    fn two_su_landscape() -> Landscape {
        let mut landscape = Landscape::new();
        landscape
            .add_unit(SpatialUnit::new(UnitClass::Su, UnitId(1)))
            .unwrap();
        landscape
            .add_unit(SpatialUnit::new(UnitClass::Su, UnitId(2)))
            .unwrap();
        landscape
    }

    #[test]
    fn producer_before_consumer_passes() {
        let mut landscape = two_su_landscape();
        let producer = Signature::new("rain")
            .produces(VarName::scalar("rain.atm.down.mm"), UnitClass::Su);
        let consumer = Signature::new("runoff")
            .requires(VarName::scalar("rain.atm.down.mm"), UnitClass::Su);

        check_model_consistency(
            &mut landscape,
            &[("rain", &producer), ("runoff", &consumer)],
        )
        .unwrap();

        // Produced series exist, empty, on every SU.
        assert!(landscape
            .all_units_have_variable(UnitClass::Su, "rain.atm.down.mm", VarKind::Scalar)
            .is_ok());
    }

    #[test]
    fn consumer_before_producer_fails() {
        let mut landscape = two_su_landscape();
        let producer = Signature::new("rain")
            .produces(VarName::scalar("rain.atm.down.mm"), UnitClass::Su);
        let consumer = Signature::new("runoff")
            .requires(VarName::scalar("rain.atm.down.mm"), UnitClass::Su);

        let err = check_model_consistency(
            &mut landscape,
            &[("runoff", &consumer), ("rain", &producer)],
        )
        .unwrap_err();

        assert!(matches!(err, EngineError::MissingRequiredVar { .. }));
        assert!(err.to_string().contains("is not previously created"));
    }

    #[test]
    fn double_production_rejected_in_either_order() {
        let a = Signature::new("a").produces(VarName::scalar("flow.rate.out.m3s"), UnitClass::Su);
        let b = Signature::new("b").produces(VarName::scalar("flow.rate.out.m3s"), UnitClass::Su);

        for pipeline in [[("a", &a), ("b", &b)], [("b", &b), ("a", &a)]] {
            let mut landscape = two_su_landscape();
            let err = check_model_consistency(&mut landscape, &pipeline).unwrap_err();
            assert!(matches!(err, EngineError::DuplicateProducedVar { .. }));
        }
    }

    #[test]
    fn scalar_and_vector_namespaces_do_not_collide() {
        let mut landscape = two_su_landscape();
        let a = Signature::new("a").produces(VarName::scalar("water.level.down.m"), UnitClass::Su);
        let b = Signature::new("b").produces(VarName::vector("water.level.down.m"), UnitClass::Su);

        check_model_consistency(&mut landscape, &[("a", &a), ("b", &b)]).unwrap();
    }

    #[test]
    fn prev_requirement_satisfied_by_later_producer() {
        // The producer sits after the prev-consumer: legal, because the
        // series is created eagerly before the second pass.
        let mut landscape = two_su_landscape();
        let consumer = Signature::new("router")
            .requires_prev(VarName::scalar("flow.rate.out.m3s"), UnitClass::Su);
        let producer = Signature::new("runoff")
            .produces(VarName::scalar("flow.rate.out.m3s"), UnitClass::Su);

        check_model_consistency(
            &mut landscape,
            &[("router", &consumer), ("runoff", &producer)],
        )
        .unwrap();
    }

    #[test]
    fn unsatisfied_prev_requirement_fails() {
        let mut landscape = two_su_landscape();
        let consumer = Signature::new("router")
            .requires_prev(VarName::scalar("flow.rate.out.m3s"), UnitClass::Su);

        let err =
            check_model_consistency(&mut landscape, &[("router", &consumer)]).unwrap_err();
        assert!(err.to_string().contains("required at previous step"));
    }

    #[test]
    fn updated_vars_create_where_absent() {
        let mut landscape = two_su_landscape();
        let updater =
            Signature::new("u").updates(VarName::scalar("water.stock.soil.m3"), UnitClass::Su);

        check_model_consistency(&mut landscape, &[("u", &updater)]).unwrap();
        assert!(landscape
            .all_units_have_variable(UnitClass::Su, "water.stock.soil.m3", VarKind::Scalar)
            .is_ok());
        // Idempotent when the series already exists.
        check_model_consistency(&mut landscape, &[("u", &updater)]).unwrap();
    }

    #[test]
    fn bad_name_aborts_before_data_checks() {
        // The later simulator's missing property must not be reported:
        // the naming violation wins.
        let landscape = two_su_landscape();
        let bad = Signature::new("bad").produces(VarName::scalar("a.b"), UnitClass::Su);
        let needs_prop =
            Signature::new("p").requires_prop(VarName::scalar("area"), UnitClass::Su);

        let err = check_data_consistency(
            &landscape,
            &[("bad", &bad), ("p", &needs_prop)],
            true,
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::NomenclatureViolation { .. }));
    }

    #[test]
    fn name_checking_can_be_disabled() {
        let landscape = two_su_landscape();
        let bad = Signature::new("bad").produces(VarName::scalar("a.b"), UnitClass::Su);

        check_data_consistency(&landscape, &[("bad", &bad)], false).unwrap();
    }

    #[test]
    fn missing_property_and_inicond_reported() {
        let mut landscape = two_su_landscape();
        landscape
            .unit_mut(UnitClass::Su, UnitId(1))
            .unwrap()
            .set_property("area", 10.0);
        let sig = Signature::new("s")
            .requires_prop(VarName::scalar("area"), UnitClass::Su)
            .requires_inicond(VarName::scalar("level"), UnitClass::Su);

        // SU 2 lacks the property.
        let err = check_data_consistency(&landscape, &[("s", &sig)], true).unwrap_err();
        assert!(
            matches!(err, EngineError::MissingProperty { unit, .. } if unit == UnitId(2))
        );

        landscape
            .unit_mut(UnitClass::Su, UnitId(2))
            .unwrap()
            .set_property("area", 20.0);
        let err = check_data_consistency(&landscape, &[("s", &sig)], true).unwrap_err();
        assert!(matches!(err, EngineError::MissingIniCondition { .. }));
    }

    #[test]
    fn extra_files_checked_against_input_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("rain.series"), "1 2 3").unwrap();

        let present = Signature::new("s").requires_extra_file("rain.series");
        let absent = Signature::new("s").requires_extra_file("missing.series");

        check_extra_files_consistency(&[("s", &present)], dir.path()).unwrap();
        let err =
            check_extra_files_consistency(&[("s", &absent)], dir.path()).unwrap_err();
        assert!(matches!(err, EngineError::MissingExtraFile { .. }));

        // Idempotent with an unchanged filesystem.
        check_extra_files_consistency(&[("s", &present)], dir.path()).unwrap();
        assert!(check_extra_files_consistency(&[("s", &absent)], dir.path()).is_err());
    }
}

//! The variable-production invariant checker.
//!
//! Validates, at the run loop's checkpoints, that every declared series
//! on every unit of every class holds exactly the expected number of
//! values: one per completed step, uniformly across the whole pipeline.
//! Scalar series additionally must not end in NaN once values exist;
//! vector series are length-checked only.

use landflux_core::UnitClass;
use landflux_space::Landscape;

use crate::error::EngineError;

/// Check the production invariant for an expected count. Fails on the
/// first violation found.
pub(crate) fn check_vars_production(
    landscape: &Landscape,
    expected: usize,
) -> Result<(), EngineError> {
    for &class in &UnitClass::ALL {
        for unit in landscape.units(class) {
            for (key, values) in unit.scalar_series() {
                if values.len() != expected {
                    return Err(EngineError::ProductionCount {
                        var: key.to_string(),
                        class,
                        unit: unit.id(),
                        found: values.len(),
                        expected,
                    });
                }
                if expected > 0 {
                    if let Some(last) = values.last() {
                        if last.is_nan() {
                            return Err(EngineError::ProductionNan {
                                var: key.to_string(),
                                class,
                                unit: unit.id(),
                            });
                        }
                    }
                }
            }
            for (key, values) in unit.vector_series() {
                if values.len() != expected {
                    return Err(EngineError::ProductionCount {
                        var: format!("{key}[]"),
                        class,
                        unit: unit.id(),
                        found: values.len(),
                        expected,
                    });
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use landflux_core::{UnitId, VarKind};
    use landflux_space::SpatialUnit;

    fn landscape_with_series() -> Landscape {
        let mut landscape = Landscape::new();
        let mut su = SpatialUnit::new(UnitClass::Su, UnitId(1));
        su.create_variable("flow.rate.out.m3s", VarKind::Scalar);
        su.create_variable("water.profile.down.m", VarKind::Vector);
        landscape.add_unit(su).unwrap();
        landscape
    }

    #[test]
    fn empty_series_satisfy_expected_zero() {
        let landscape = landscape_with_series();
        check_vars_production(&landscape, 0).unwrap();
        assert!(check_vars_production(&landscape, 1).is_err());
    }

    #[test]
    fn count_mismatch_names_the_offender() {
        let mut landscape = landscape_with_series();
        let su = landscape.unit_mut(UnitClass::Su, UnitId(1)).unwrap();
        su.append_scalar("flow.rate.out.m3s", 1.0).unwrap();
        su.append_vector("water.profile.down.m", vec![1.0]).unwrap();
        su.append_scalar("flow.rate.out.m3s", 2.0).unwrap();

        let err = check_vars_production(&landscape, 2).unwrap_err();
        match err {
            EngineError::ProductionCount {
                var,
                unit,
                found,
                expected,
                ..
            } => {
                assert_eq!(var, "water.profile.down.m[]");
                assert_eq!(unit, UnitId(1));
                assert_eq!(found, 1);
                assert_eq!(expected, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn nan_in_latest_scalar_slot_is_fatal() {
        let mut landscape = landscape_with_series();
        let su = landscape.unit_mut(UnitClass::Su, UnitId(1)).unwrap();
        su.append_scalar("flow.rate.out.m3s", f64::NAN).unwrap();
        su.append_vector("water.profile.down.m", vec![1.0]).unwrap();

        let err = check_vars_production(&landscape, 1).unwrap_err();
        assert!(matches!(err, EngineError::ProductionNan { .. }));
    }

    #[test]
    fn nan_in_earlier_slots_is_tolerated() {
        let mut landscape = landscape_with_series();
        let su = landscape.unit_mut(UnitClass::Su, UnitId(1)).unwrap();
        su.append_scalar("flow.rate.out.m3s", f64::NAN).unwrap();
        su.append_scalar("flow.rate.out.m3s", 3.0).unwrap();
        su.append_vector("water.profile.down.m", vec![]).unwrap();
        su.append_vector("water.profile.down.m", vec![f64::NAN]).unwrap();

        // Only the latest scalar slot is NaN-checked; vectors never are.
        check_vars_production(&landscape, 2).unwrap();
    }
}

//! Strongly-typed unit identifiers and the spatial unit classes.

use std::fmt;

/// Identifies a spatial unit within its class collection.
///
/// IDs are assigned at data-load time and are unique per [`UnitClass`];
/// a surface unit and a reach segment may share the same numeric ID.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitId(pub u32);

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for UnitId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// The three classes of spatial unit a variable or property can be
/// distributed over.
///
/// Every signature entry names one class; the consistency checker and
/// the production checker quantify over all units of that class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnitClass {
    /// Surface unit.
    Su,
    /// Reach segment.
    Rs,
    /// Groundwater unit.
    Gu,
}

impl UnitClass {
    /// All classes, in the order used by checks and reports.
    pub const ALL: [UnitClass; 3] = [UnitClass::Su, UnitClass::Rs, UnitClass::Gu];

    /// The short class tag used in messages (`SU`, `RS`, `GU`).
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Su => "SU",
            Self::Rs => "RS",
            Self::Gu => "GU",
        }
    }
}

impl fmt::Display for UnitClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_tags() {
        assert_eq!(UnitClass::Su.to_string(), "SU");
        assert_eq!(UnitClass::Rs.to_string(), "RS");
        assert_eq!(UnitClass::Gu.to_string(), "GU");
    }

    #[test]
    fn all_covers_every_class() {
        assert_eq!(UnitClass::ALL.len(), 3);
        assert!(UnitClass::ALL.contains(&UnitClass::Su));
        assert!(UnitClass::ALL.contains(&UnitClass::Rs));
        assert!(UnitClass::ALL.contains(&UnitClass::Gu));
    }
}

//! Variable name parsing and the naming nomenclature.
//!
//! Scalar and vector variables live in two distinct namespaces on each
//! spatial unit, disambiguated by a trailing `[]` marker embedded in the
//! configured name string (`"water.depth[]"` is the vector variable keyed
//! `"water.depth"`). [`VarName::parse`] demultiplexes the marker once, so
//! the rest of the engine works with `(key, kind)` pairs instead of
//! re-scanning strings.

use std::error::Error;
use std::fmt;

/// Whether a variable series holds one scalar per step or one
/// variable-length vector per step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VarKind {
    /// One `f64` per step.
    Scalar,
    /// One `Vec<f64>` per step.
    Vector,
}

/// Errors from [`VarName::parse`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VarNameError {
    /// The name is empty, or empty once the `[]` marker is stripped.
    Empty,
    /// A `[` or `]` appears anywhere but as a final `[]` marker.
    MisplacedMarker {
        /// The offending raw name.
        raw: String,
    },
}

impl fmt::Display for VarNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "variable name is empty"),
            Self::MisplacedMarker { raw } => {
                write!(f, "variable name '{raw}' has a misplaced [] marker")
            }
        }
    }
}

impl Error for VarNameError {}

/// A parsed variable name: the storage key plus the namespace it
/// belongs to.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct VarName {
    key: String,
    kind: VarKind,
}

impl VarName {
    /// Parse a raw configured name, demultiplexing the trailing `[]`
    /// vector marker.
    pub fn parse(raw: &str) -> Result<Self, VarNameError> {
        let (key, kind) = match raw.strip_suffix("[]") {
            Some(stripped) => (stripped, VarKind::Vector),
            None => (raw, VarKind::Scalar),
        };
        if key.is_empty() {
            return Err(VarNameError::Empty);
        }
        if key.contains('[') || key.contains(']') {
            return Err(VarNameError::MisplacedMarker { raw: raw.to_string() });
        }
        Ok(Self {
            key: key.to_string(),
            kind,
        })
    }

    /// Build a scalar name from an already-demultiplexed key.
    pub fn scalar(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            kind: VarKind::Scalar,
        }
    }

    /// Build a vector name from an already-demultiplexed key.
    pub fn vector(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            kind: VarKind::Vector,
        }
    }

    /// The storage key (marker stripped).
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The namespace this name belongs to.
    pub fn kind(&self) -> VarKind {
        self.kind
    }

    /// Whether the key follows the four-segment dot-delimited naming
    /// nomenclature: `category.subject.position.unit`.
    ///
    /// Segments allow ASCII alphanumerics and hyphens; the first segment
    /// additionally allows comma lists, the third additionally `#`.
    /// Exactly four non-empty segments are required. This is a dedicated
    /// parser, deliberately stricter than an unanchored pattern search:
    /// extra segments are rejected.
    pub fn matches_nomenclature(&self) -> bool {
        let mut segments = self.key.split('.');
        let seg_ok = |seg: &str, extra: &[char]| {
            !seg.is_empty()
                && seg
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || extra.contains(&c))
        };
        let ok = matches!(
            (
                segments.next(),
                segments.next(),
                segments.next(),
                segments.next(),
            ),
            (Some(s1), Some(s2), Some(s3), Some(s4))
                if seg_ok(s1, &[','])
                    && seg_ok(s2, &[])
                    && seg_ok(s3, &['#'])
                    && seg_ok(s4, &[])
        );
        ok && segments.next().is_none()
    }
}

impl fmt::Display for VarName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            VarKind::Scalar => f.write_str(&self.key),
            VarKind::Vector => write!(f, "{}[]", self.key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn scalar_name_has_no_marker() {
        let name = VarName::parse("flow.rate.out.m3s").unwrap();
        assert_eq!(name.key(), "flow.rate.out.m3s");
        assert_eq!(name.kind(), VarKind::Scalar);
        assert_eq!(name.to_string(), "flow.rate.out.m3s");
    }

    #[test]
    fn trailing_marker_demuxes_to_vector() {
        let name = VarName::parse("water.depth.down.m[]").unwrap();
        assert_eq!(name.key(), "water.depth.down.m");
        assert_eq!(name.kind(), VarKind::Vector);
        assert_eq!(name.to_string(), "water.depth.down.m[]");
    }

    #[test]
    fn empty_names_rejected() {
        assert_eq!(VarName::parse(""), Err(VarNameError::Empty));
        assert_eq!(VarName::parse("[]"), Err(VarNameError::Empty));
    }

    #[test]
    fn misplaced_marker_rejected() {
        assert!(matches!(
            VarName::parse("a[]b"),
            Err(VarNameError::MisplacedMarker { .. })
        ));
        assert!(matches!(
            VarName::parse("a[b]"),
            Err(VarNameError::MisplacedMarker { .. })
        ));
    }

    #[test]
    fn nomenclature_accepts_four_segments() {
        assert!(VarName::scalar("a.b.c.d").matches_nomenclature());
        assert!(VarName::scalar("flow.rate.out.m3s").matches_nomenclature());
        assert!(VarName::scalar("ru,rain.surf.H2O#down.m").matches_nomenclature());
        assert!(VarName::vector("water.level.sat-zone.m").matches_nomenclature());
    }

    #[test]
    fn nomenclature_rejects_wrong_segment_counts() {
        assert!(!VarName::scalar("a.b").matches_nomenclature());
        assert!(!VarName::scalar("a.b.c").matches_nomenclature());
        assert!(!VarName::scalar("a.b.c.d.e").matches_nomenclature());
    }

    #[test]
    fn nomenclature_rejects_bad_characters() {
        assert!(!VarName::scalar("a.b,x.c.d").matches_nomenclature());
        assert!(!VarName::scalar("a.b.c.d!").matches_nomenclature());
        assert!(!VarName::scalar("a..c.d").matches_nomenclature());
        assert!(!VarName::scalar("a.b.c#x.#").matches_nomenclature());
    }

    proptest! {
        #[test]
        fn parse_display_round_trips(key in "[a-z]{1,8}(\\.[a-z]{1,8}){0,4}", vector in any::<bool>()) {
            let raw = if vector { format!("{key}[]") } else { key.clone() };
            let name = VarName::parse(&raw).unwrap();
            prop_assert_eq!(name.key(), key.as_str());
            prop_assert_eq!(name.to_string(), raw);
        }

        #[test]
        fn well_formed_names_match(
            s1 in "[a-z0-9,-]{1,6}",
            s2 in "[a-z0-9-]{1,6}",
            s3 in "[a-z0-9#-]{1,6}",
            s4 in "[a-z0-9-]{1,6}",
        ) {
            let name = VarName::scalar(format!("{s1}.{s2}.{s3}.{s4}"));
            prop_assert!(name.matches_nomenclature());
        }
    }
}

//! Vector feature type enum shared by the map store and the configuration.

use std::str::FromStr;

use crate::CoreError;

/// The geometric kind of a vector feature.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FeatureType {
    Point,
    Line,
    Boundary,
    Centroid,
}

impl FeatureType {
    /// `true` for types that take part in node topology (they have two
    /// endpoints).
    #[inline]
    pub fn is_linear(self) -> bool {
        matches!(self, FeatureType::Line | FeatureType::Boundary)
    }

    /// Lower-case label used in CSV maps and on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            FeatureType::Point    => "point",
            FeatureType::Line     => "line",
            FeatureType::Boundary => "boundary",
            FeatureType::Centroid => "centroid",
        }
    }
}

impl std::fmt::Display for FeatureType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeatureType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "point"    => Ok(FeatureType::Point),
            "line"     => Ok(FeatureType::Line),
            "boundary" => Ok(FeatureType::Boundary),
            "centroid" => Ok(FeatureType::Centroid),
            other => Err(CoreError::Parse(format!(
                "unknown feature type {other:?}: expected point, line, boundary or centroid"
            ))),
        }
    }
}

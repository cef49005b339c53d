//! Spatial and temporal predicate types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box in geographic coordinates (CRS:84 order).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// West bound longitude.
    pub min_x: f64,
    /// South bound latitude.
    pub min_y: f64,
    /// East bound longitude.
    pub max_x: f64,
    /// North bound latitude.
    pub max_y: f64,
}

impl Envelope {
    /// Creates an envelope from its corners.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Returns true if min <= max on both axes and all values are finite.
    pub fn is_valid(&self) -> bool {
        [self.min_x, self.min_y, self.max_x, self.max_y]
            .iter()
            .all(|v| v.is_finite())
            && self.min_x <= self.max_x
            && self.min_y <= self.max_y
    }

    /// The two envelopes share at least one point.
    pub fn intersects(&self, other: &Envelope) -> bool {
        self.min_x <= other.max_x
            && self.max_x >= other.min_x
            && self.min_y <= other.max_y
            && self.max_y >= other.min_y
    }

    /// `other` lies entirely inside `self`.
    pub fn contains(&self, other: &Envelope) -> bool {
        self.min_x <= other.min_x
            && self.max_x >= other.max_x
            && self.min_y <= other.min_y
            && self.max_y >= other.max_y
    }

    /// `self` lies entirely inside `other`.
    pub fn within(&self, other: &Envelope) -> bool {
        other.contains(self)
    }
}

/// Spatial operators of the filter encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpatialOperator {
    /// Envelope intersection (the CSW `BBOX` operator).
    BBox,
    /// Geometries share at least one point.
    Intersects,
    /// The record extent lies inside the query box.
    Within,
    /// The record extent contains the query box.
    Contains,
    /// Geometries share no point.
    Disjoint,
    /// Geometries are identical.
    Equals,
    /// Geometries intersect but neither contains the other.
    Overlaps,
}

impl SpatialOperator {
    /// Evaluates the operator with the record extent on the left.
    pub fn evaluate(&self, extent: &Envelope, query: &Envelope) -> bool {
        match self {
            SpatialOperator::BBox | SpatialOperator::Intersects => extent.intersects(query),
            SpatialOperator::Within => extent.within(query),
            SpatialOperator::Contains => extent.contains(query),
            SpatialOperator::Disjoint => !extent.intersects(query),
            SpatialOperator::Equals => extent == query,
            SpatialOperator::Overlaps => {
                extent.intersects(query) && !extent.contains(query) && !extent.within(query)
            }
        }
    }
}

impl fmt::Display for SpatialOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SpatialOperator::BBox => "BBOX",
            SpatialOperator::Intersects => "Intersects",
            SpatialOperator::Within => "Within",
            SpatialOperator::Contains => "Contains",
            SpatialOperator::Disjoint => "Disjoint",
            SpatialOperator::Equals => "Equals",
            SpatialOperator::Overlaps => "Overlaps",
        };
        f.write_str(name)
    }
}

/// A spatial predicate ready for evaluation against document geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpatialPredicate {
    /// The query envelope.
    pub envelope: Envelope,
    /// The operator.
    pub operator: SpatialOperator,
}

impl SpatialPredicate {
    /// Returns true if any extent satisfies the operator.
    ///
    /// `Disjoint` requires every extent to be disjoint. Records without
    /// geometry never match.
    pub fn matches(&self, extents: &[Envelope]) -> bool {
        if extents.is_empty() {
            return false;
        }
        match self.operator {
            SpatialOperator::Disjoint => extents
                .iter()
                .all(|e| self.operator.evaluate(e, &self.envelope)),
            _ => extents
                .iter()
                .any(|e| self.operator.evaluate(e, &self.envelope)),
        }
    }
}

/// Temporal operators, each carrying its instant(s) as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemporalOperator {
    /// Strictly after the instant.
    After(String),
    /// Strictly before the instant.
    Before(String),
    /// Strictly between two instants.
    During(String, String),
    /// Equal to the instant.
    TEquals(String),
}

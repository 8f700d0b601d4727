//! Store traits consumed by the turn-table pass.
//!
//! The pass reads an input map through [`VectorSource`] (features plus node
//! topology) and writes the output map through [`VectorSink`].  [`VectorMap`]
//! implements both; other backends only need to honour the rewrite contract:
//! **a rewrite may hand back a new id**, and the old id must not be used
//! afterwards.
//!
//! [`VectorMap`]: crate::VectorMap

use tt_core::{DirectedLine, FeatureId, FeatureType, NodeId, Point, Polyline};

use crate::{Cats, VectorResult};

/// A vector feature: type, geometry, and categories.
#[derive(Clone, Debug, PartialEq)]
pub struct Feature {
    pub kind:   FeatureType,
    pub points: Polyline,
    pub cats:   Cats,
}

impl Feature {
    pub fn new(kind: FeatureType, points: Polyline, cats: Cats) -> Self {
        Self { kind, points, cats }
    }

    /// A point feature at `p`.
    pub fn point(p: Point, cats: Cats) -> Self {
        Self::new(FeatureType::Point, Polyline::single(p), cats)
    }
}

/// Read access to a map with node topology.
pub trait VectorSource {
    /// Number of feature slots; ids run `1..=feature_count()`.
    fn feature_count(&self) -> usize;

    /// Read feature `id`.
    fn read(&self, id: FeatureId) -> VectorResult<Feature>;

    /// Number of topological nodes; ids run `1..=node_count()`.
    fn node_count(&self) -> usize;

    /// Half-edges incident to `node`, in topology order.  A loop line
    /// appears twice.
    fn node_lines(&self, node: NodeId) -> VectorResult<&[DirectedLine]>;

    /// Coordinate of `node`.
    fn node_point(&self, node: NodeId) -> VectorResult<Point>;

    /// `(start, end)` nodes of a linear feature.
    fn line_nodes(&self, line: FeatureId) -> VectorResult<(NodeId, NodeId)>;

    /// Number of live features whose type is in `types`.
    fn count_of(&self, types: &[FeatureType]) -> usize;
}

/// Write access to an output map.
pub trait VectorSink {
    /// Append a new feature and return its id.
    fn write(&mut self, kind: FeatureType, points: &Polyline, cats: &Cats) -> VectorResult<FeatureId>;

    /// Replace feature `id`.  The returned id is the one to use from now on.
    fn rewrite(
        &mut self,
        id:     FeatureId,
        kind:   FeatureType,
        points: &Polyline,
        cats:   &Cats,
    ) -> VectorResult<FeatureId>;

    /// Read back a feature previously written.
    fn read(&self, id: FeatureId) -> VectorResult<Feature>;
}

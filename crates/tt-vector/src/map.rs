//! In-memory vector map and its topology builder.
//!
//! # Data layout
//!
//! Features live in a slot vector indexed by `FeatureId`.  A rewrite never
//! edits a slot in place: the old slot is marked dead and the new version is
//! appended, so the rewritten feature gets the next free id.  Callers must
//! keep the id returned by [`VectorMap::rewrite`].
//!
//! Node topology (which half-edges meet at which node) is computed once by
//! [`VectorMapBuilder::build`] and describes the map as built.  Output maps
//! are created with [`VectorMap::new`] and carry no topology.
//!
//! # Spatial index
//!
//! While building, an R-tree (via `rstar`) maps line endpoints to existing
//! nodes so endpoints within the snapping tolerance share one node.

use log::debug;
use rstar::{PointDistance, RTree, RTreeObject, AABB};

use tt_core::{DirectedLine, FeatureId, FeatureType, NodeId, Point, Polyline};

use crate::store::{Feature, VectorSink, VectorSource};
use crate::{Cats, VectorError, VectorResult};

// ── R-tree node entry ─────────────────────────────────────────────────────────

/// Entry stored in the R-tree spatial index: a 2-D `[x, y]` point with the
/// associated `NodeId`.
#[derive(Clone)]
struct NodeEntry {
    point: [f64; 2],
    id:    NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── VectorMap ─────────────────────────────────────────────────────────────────

/// A topological node: its position and the half-edges that meet there.
#[derive(Clone, Debug)]
pub struct Node {
    pub point: Point,
    pub lines: Vec<DirectedLine>,
}

/// Vector map held in memory.  Implements both [`VectorSource`] and
/// [`VectorSink`].
#[derive(Clone, Debug, Default)]
pub struct VectorMap {
    /// `None` marks a dead slot (rewritten feature).
    features:   Vec<Option<Feature>>,
    /// Endpoint nodes per slot; `None` for non-linear or post-build features.
    line_nodes: Vec<Option<(NodeId, NodeId)>>,
    nodes:      Vec<Node>,
}

impl VectorMap {
    /// An empty map without topology, ready to be written to.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of slots, dead ones included.
    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    /// Number of live features.
    pub fn live_count(&self) -> usize {
        self.features.iter().filter(|f| f.is_some()).count()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Borrow feature `id` if it is alive.
    pub fn get(&self, id: FeatureId) -> Option<&Feature> {
        if id.0 == 0 {
            return None;
        }
        self.features.get(id.index()).and_then(Option::as_ref)
    }

    /// Clone feature `id` out of the map.
    pub fn read(&self, id: FeatureId) -> VectorResult<Feature> {
        self.get(id).cloned().ok_or(VectorError::FeatureNotFound(id))
    }

    /// Iterator over all live features in id order.
    pub fn features(&self) -> impl Iterator<Item = (FeatureId, &Feature)> + '_ {
        self.features
            .iter()
            .enumerate()
            .filter_map(|(i, f)| f.as_ref().map(|f| (FeatureId::from_index(i), f)))
    }

    /// Borrow node `id`.
    pub fn node(&self, id: NodeId) -> VectorResult<&Node> {
        if id.0 == 0 {
            return Err(VectorError::NodeNotFound(id));
        }
        self.nodes.get(id.index()).ok_or(VectorError::NodeNotFound(id))
    }

    /// Append a feature and return its id.
    pub fn write(&mut self, kind: FeatureType, points: &Polyline, cats: &Cats) -> FeatureId {
        self.features.push(Some(Feature::new(kind, points.clone(), cats.clone())));
        self.line_nodes.push(None);
        FeatureId::from_index(self.features.len() - 1)
    }

    /// Kill slot `id` and append the replacement; returns the new id.
    pub fn rewrite(
        &mut self,
        id:     FeatureId,
        kind:   FeatureType,
        points: &Polyline,
        cats:   &Cats,
    ) -> VectorResult<FeatureId> {
        if self.get(id).is_none() {
            return Err(VectorError::FeatureNotFound(id));
        }
        self.features[id.index()] = None;
        Ok(self.write(kind, points, cats))
    }
}

impl VectorSource for VectorMap {
    fn feature_count(&self) -> usize {
        self.features.len()
    }

    fn read(&self, id: FeatureId) -> VectorResult<Feature> {
        VectorMap::read(self, id)
    }

    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn node_lines(&self, node: NodeId) -> VectorResult<&[DirectedLine]> {
        Ok(&self.node(node)?.lines)
    }

    fn node_point(&self, node: NodeId) -> VectorResult<Point> {
        Ok(self.node(node)?.point)
    }

    fn line_nodes(&self, line: FeatureId) -> VectorResult<(NodeId, NodeId)> {
        if self.get(line).is_none() {
            return Err(VectorError::FeatureNotFound(line));
        }
        self.line_nodes[line.index()].ok_or(VectorError::NotALine(line))
    }

    fn count_of(&self, types: &[FeatureType]) -> usize {
        self.features().filter(|(_, f)| types.contains(&f.kind)).count()
    }
}

impl VectorSink for VectorMap {
    fn write(&mut self, kind: FeatureType, points: &Polyline, cats: &Cats) -> VectorResult<FeatureId> {
        Ok(VectorMap::write(self, kind, points, cats))
    }

    fn rewrite(
        &mut self,
        id:     FeatureId,
        kind:   FeatureType,
        points: &Polyline,
        cats:   &Cats,
    ) -> VectorResult<FeatureId> {
        VectorMap::rewrite(self, id, kind, points, cats)
    }

    fn read(&self, id: FeatureId) -> VectorResult<Feature> {
        VectorMap::read(self, id)
    }
}

// ── VectorMapBuilder ──────────────────────────────────────────────────────────

/// Collect features, then call [`build`](Self::build) to get a [`VectorMap`]
/// with node topology.
///
/// # Example
///
/// ```
/// use tt_core::{FeatureType, Layer, Point, Polyline};
/// use tt_vector::{Cats, Feature, VectorMapBuilder, VectorSource};
///
/// let mut b = VectorMapBuilder::new();
/// let cats: Cats = [(Layer(1), 1)].into_iter().collect();
/// b.add_feature(Feature::new(
///     FeatureType::Line,
///     Polyline::new(vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)]),
///     cats,
/// ));
/// let map = b.build().unwrap();
/// assert_eq!(map.node_count(), 2);
/// ```
pub struct VectorMapBuilder {
    features: Vec<Feature>,
    snap:     f64,
}

impl VectorMapBuilder {
    pub fn new() -> Self {
        Self { features: Vec::new(), snap: 0.0 }
    }

    /// Pre-allocate for the expected number of features.
    pub fn with_capacity(features: usize) -> Self {
        Self { features: Vec::with_capacity(features), snap: 0.0 }
    }

    /// Endpoints closer than `tolerance` map units share a node.  `0.0`
    /// (the default) requires exact coincidence.
    pub fn snap_tolerance(mut self, tolerance: f64) -> Self {
        self.snap = tolerance.max(0.0);
        self
    }

    /// Add a feature and return the id it will have in the built map.
    pub fn add_feature(&mut self, feature: Feature) -> FeatureId {
        self.features.push(feature);
        FeatureId::from_index(self.features.len() - 1)
    }

    /// Convenience: add a line from raw coordinates.
    pub fn add_line(&mut self, coords: &[(f64, f64)], cats: Cats) -> FeatureId {
        let points = coords.iter().map(|&(x, y)| Point::new(x, y)).collect();
        self.add_feature(Feature::new(FeatureType::Line, Polyline::new(points), cats))
    }

    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    /// Consume the builder and produce a [`VectorMap`] with topology.
    ///
    /// Nodes are numbered in the order endpoints are first seen (feature
    /// order, start before end).  Each node lists its half-edges in the same
    /// order.
    ///
    /// # Errors
    ///
    /// [`VectorError::EmptyGeometry`] if any feature has no vertices.
    pub fn build(self) -> VectorResult<VectorMap> {
        let max_d2 = self.snap * self.snap;
        let mut index: RTree<NodeEntry> = RTree::new();
        let mut nodes: Vec<Node> = Vec::new();
        let mut line_nodes = Vec::with_capacity(self.features.len());

        let mut snap = |p: Point, nodes: &mut Vec<Node>| -> NodeId {
            let key = [p.x, p.y];
            if let Some(hit) = index.nearest_neighbor(&key) {
                if hit.distance_2(&key) <= max_d2 {
                    return hit.id;
                }
            }
            let id = NodeId::from_index(nodes.len());
            nodes.push(Node { point: p, lines: Vec::new() });
            index.insert(NodeEntry { point: key, id });
            id
        };

        for (i, feature) in self.features.iter().enumerate() {
            let id = FeatureId::from_index(i);
            let (Some(first), Some(last)) = (feature.points.first(), feature.points.last()) else {
                return Err(VectorError::EmptyGeometry(id));
            };
            if !feature.kind.is_linear() {
                line_nodes.push(None);
                continue;
            }

            let start = snap(first, &mut nodes);
            nodes[start.index()].lines.push(DirectedLine::outgoing(id));
            let end = snap(last, &mut nodes);
            nodes[end.index()].lines.push(DirectedLine::incoming(id));
            line_nodes.push(Some((start, end)));
        }

        debug!(
            "built topology: {} nodes for {} features",
            nodes.len(),
            self.features.len()
        );

        Ok(VectorMap {
            features: self.features.into_iter().map(Some).collect(),
            line_nodes,
            nodes,
        })
    }
}

impl Default for VectorMapBuilder {
    fn default() -> Self {
        Self::new()
    }
}

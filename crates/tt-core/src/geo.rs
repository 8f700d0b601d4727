//! Planar geometry and turning angles.
//!
//! Coordinates are projected map units (`f64`).  Only the first and last
//! vertex of a line matter for angles: the heading of a line is the direction
//! of its overall start-to-end vector, not of its first segment.
//!
//! # Sign convention
//!
//! `turn_angle` returns radians in `(-π, π]`.  `0` is straight ahead, a
//! positive angle is a turn to the right, a negative angle a turn to the left
//! and `π` a reversal.

use std::f64::consts::PI;

use crate::Direction;

/// A planar vertex.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance, cheap enough for snapping tests.
    #[inline]
    pub fn distance_2(self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// An ordered vertex sequence.  Points carry a single vertex.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Polyline {
    pub points: Vec<Point>,
}

impl Polyline {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn single(p: Point) -> Self {
        Self { points: vec![p] }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<Point> {
        self.points.first().copied()
    }

    pub fn last(&self) -> Option<Point> {
        self.points.last().copied()
    }

    /// First and last vertex coincide exactly (includes single-point lines).
    pub fn is_closed(&self) -> bool {
        match (self.first(), self.last()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// First and last vertex as seen when walking the line in `reversed`
    /// order.
    fn ends(&self, reversed: bool) -> Option<(Point, Point)> {
        let (a, b) = (self.first()?, self.last()?);
        Some(if reversed { (b, a) } else { (a, b) })
    }
}

/// Heading of the start-to-end vector of `line`, walked backwards when
/// `reversed` is set.
///
/// Returns `None` for lines with fewer than two vertices.  A line whose ends
/// coincide has heading `0`, not `None`.
pub fn heading(line: &Polyline, reversed: bool) -> Option<f64> {
    if line.len() < 2 {
        return None;
    }
    let (start, end) = line.ends(reversed)?;
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    if dx == 0.0 && dy == 0.0 {
        Some(0.0)
    } else {
        Some(dy.atan2(dx))
    }
}

/// Signed angle turned when leaving `from` onto `to` at their shared node.
///
/// `from_dir` / `to_dir` say which end of each line touches the node.  `from`
/// is read as pointing into the node and `to` as pointing out of it; the
/// geometry itself is never reordered.
///
/// Returns `None` when either line is closed (first vertex equals last,
/// including single-point lines) or otherwise has no heading.
pub fn turn_angle(
    from:     &Polyline,
    from_dir: Direction,
    to:       &Polyline,
    to_dir:   Direction,
) -> Option<f64> {
    if from.is_empty() || to.is_empty() || from.is_closed() || to.is_closed() {
        return None;
    }

    let heading_from = heading(from, from_dir == Direction::Outgoing)?;
    let heading_to   = heading(to, to_dir == Direction::Incoming)?;

    Some(normalize_angle(heading_from - heading_to))
}

/// Fold a difference of two headings (which lies in `(-2π, 2π)`) into
/// `(-π, π]` with a single `2π` step.
#[inline]
pub fn normalize_angle(angle: f64) -> f64 {
    if angle > PI {
        angle - 2.0 * PI
    } else if angle <= -PI {
        angle + 2.0 * PI
    } else {
        angle
    }
}

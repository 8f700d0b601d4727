//! Half-edges: a physical line seen from one of its endpoint nodes.
//!
//! The vector topology lists, for every node, the lines touching it together
//! with the end of the line that touches.  Instead of packing that into a
//! signed integer, a [`DirectedLine`] pairs the line id with an explicit
//! [`Direction`].

use std::fmt;

use crate::FeatureId;

/// Which end of a line touches the node it is listed under.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    /// The line's first vertex lies on the node: the line leaves it.
    Outgoing,
    /// The line's last vertex lies on the node: the line enters it.
    Incoming,
}

impl Direction {
    #[inline]
    pub fn reversed(self) -> Direction {
        match self {
            Direction::Outgoing => Direction::Incoming,
            Direction::Incoming => Direction::Outgoing,
        }
    }

    /// `+1` for [`Outgoing`](Self::Outgoing), `-1` for
    /// [`Incoming`](Self::Incoming).
    #[inline]
    pub fn sign(self) -> i64 {
        match self {
            Direction::Outgoing => 1,
            Direction::Incoming => -1,
        }
    }
}

/// One traversable orientation of a physical line at a node (a half-edge).
///
/// A loop line whose two endpoints share a node shows up twice at that node,
/// once per direction.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DirectedLine {
    pub line: FeatureId,
    pub dir:  Direction,
}

impl DirectedLine {
    #[inline]
    pub fn new(line: FeatureId, dir: Direction) -> Self {
        Self { line, dir }
    }

    #[inline]
    pub fn outgoing(line: FeatureId) -> Self {
        Self::new(line, Direction::Outgoing)
    }

    #[inline]
    pub fn incoming(line: FeatureId) -> Self {
        Self::new(line, Direction::Incoming)
    }

    /// Same physical line *and* same end.
    #[inline]
    pub fn is_same_half_edge(&self, other: &DirectedLine) -> bool {
        self.line == other.line && self.dir == other.dir
    }

    /// Same physical line, whichever end.
    #[inline]
    pub fn is_same_line(&self, other: &DirectedLine) -> bool {
        self.line == other.line
    }

    /// Signed form used by vector topology dumps: `+id` outgoing, `-id`
    /// incoming.
    #[inline]
    pub fn signed(&self) -> i64 {
        self.dir.sign() * self.line.as_cat()
    }
}

impl fmt::Display for DirectedLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+}", self.signed())
    }
}

/// A turn-graph node: a line's unique category (ucat) plus the direction the
/// line is being looked at from.
///
/// Rendered signed in the turn table: `+ucat` for an outgoing reference,
/// `-ucat` for an incoming one.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnNode {
    pub ucat: i64,
    pub dir:  Direction,
}

impl TurnNode {
    #[inline]
    pub fn new(ucat: i64, dir: Direction) -> Self {
        debug_assert!(ucat > 0, "ucat must be positive, got {ucat}");
        Self { ucat, dir }
    }

    #[inline]
    pub fn signed(&self) -> i64 {
        self.dir.sign() * self.ucat
    }
}

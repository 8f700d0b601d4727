//! Plain data row type written by turn-table sinks.

use std::f64::consts::PI;

/// Column names in their fixed order.
pub const TURN_TABLE_COLUMNS: [&str; 6] = ["cat", "ln_from", "ln_to", "cost", "isec", "angle"];

/// One turn-table row: a transition between two turn-graph nodes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurnRow {
    /// Row id; also the category the two lines carry in the turn layer.
    pub cat:     i64,
    /// Signed ucat of the half-edge the transition starts on.
    pub ln_from: i64,
    /// Signed ucat of the half-edge the transition ends on.
    pub ln_to:   i64,
    /// Placeholder for downstream weighting; always written as `0`.
    pub cost:    f64,
    /// Id of the node point marking the intersection.
    pub isec:    i64,
    /// Turning angle in radians; `None` (SQL `NULL`) for degenerate geometry.
    pub angle:   Option<f64>,
}

impl TurnRow {
    /// `true` for the rows joining a line's two half-edges.
    pub fn is_uturn(&self) -> bool {
        self.ln_from == -self.ln_to && self.angle == Some(PI)
    }
}

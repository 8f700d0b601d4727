//! Counters reported by a finished pass.

use std::fmt;

/// What a successful turn-table pass produced.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TurnTableSummary {
    /// Arc lines given a ucat.
    pub lines:      usize,
    /// Node points written.
    pub nodes:      usize,
    pub uturn_rows: usize,
    pub turn_rows:  usize,
    /// Non-arc features copied through unchanged apart from stripped layers.
    pub copied:     usize,
    /// Output-map rewrites issued while collecting turn categories.
    pub rewrites:   usize,
}

impl TurnTableSummary {
    pub fn rows(&self) -> usize {
        self.uturn_rows + self.turn_rows
    }
}

impl fmt::Display for TurnTableSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} lines, {} nodes, {} rows ({} u-turns, {} turns), {} features copied, {} rewrites",
            self.lines,
            self.nodes,
            self.rows(),
            self.uturn_rows,
            self.turn_rows,
            self.copied,
            self.rewrites,
        )
    }
}

//! Pass observer trait for progress reporting.

use log::info;

use tt_core::{FeatureId, NodeId};
use tt_output::TurnRow;

use crate::TurnTableSummary;

/// Callbacks invoked by [`TurnTable::run`][crate::TurnTable::run] while the
/// pass walks the network.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example: row counter
///
/// ```rust,ignore
/// struct RowCounter(usize);
///
/// impl PassObserver for RowCounter {
///     fn on_row(&mut self, _row: &TurnRow) {
///         self.0 += 1;
///     }
/// }
/// ```
pub trait PassObserver {
    /// Called before the half-edges of `node` are processed.
    fn on_node_start(&mut self, _node: NodeId, _total_nodes: usize, _degree: usize) {}

    /// Called when an input line receives its ucat.
    fn on_line_materialized(&mut self, _line: FeatureId, _ucat: i64) {}

    /// Called after each row is handed to the sink.
    fn on_row(&mut self, _row: &TurnRow) {}

    /// Called once after the sink transaction has been committed.
    fn on_pass_end(&mut self, _summary: &TurnTableSummary) {}
}

/// A [`PassObserver`] that does nothing.
pub struct NoopObserver;

impl PassObserver for NoopObserver {}

/// Logs node progress at `info` level in steps of `step_percent`.
pub struct LogProgress {
    step_percent: usize,
    next_percent: usize,
}

impl LogProgress {
    pub fn new(step_percent: usize) -> Self {
        let step = step_percent.clamp(1, 100);
        Self { step_percent: step, next_percent: step }
    }
}

impl Default for LogProgress {
    fn default() -> Self {
        Self::new(10)
    }
}

impl PassObserver for LogProgress {
    fn on_node_start(&mut self, node: NodeId, total_nodes: usize, _degree: usize) {
        if total_nodes == 0 {
            return;
        }
        let percent = node.0 as usize * 100 / total_nodes;
        if percent >= self.next_percent {
            info!("turntable: {percent}% of {total_nodes} nodes");
            while self.next_percent <= percent {
                self.next_percent += self.step_percent;
            }
        }
    }
}

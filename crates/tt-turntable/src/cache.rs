//! Per-line materialization state.
//!
//! Every input line goes through at most three states:
//!
//! ```text
//! Unmaterialized ──materialize──▶ Written ──update──▶ Rewritten(1) ──update──▶ Rewritten(n)
//! ```
//!
//! Once written, the line lives in the output map and all further reads go
//! there.  The output store may hand back a new id on every rewrite, so the
//! cache records the id returned by each rewrite and never reuses an older
//! one.

use tt_core::{DirectedLine, FeatureId, Layer, TurnNode};
use tt_vector::{Cats, Feature, VectorError, VectorSink, VectorSource};

use crate::{TurnTableError, TurnTableResult};

/// Where one input line currently lives.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LineState {
    /// Not yet written to the output map.
    Unmaterialized,
    /// Written once at `output`.
    Written { output: FeatureId, ucat: i64 },
    /// Rewritten `times` times; `output` is the latest id.
    Rewritten { output: FeatureId, ucat: i64, times: u32 },
}

impl LineState {
    #[inline]
    pub fn is_materialized(&self) -> bool {
        !matches!(self, LineState::Unmaterialized)
    }
}

/// A line held in a scratch slot while its turns are being collected.
#[derive(Clone, Debug)]
pub struct WorkingLine {
    pub line:    DirectedLine,
    pub feature: Feature,
    /// Turn-graph node of the line as seen from the current node; `None`
    /// until the line has a ucat.
    pub node:    Option<TurnNode>,
}

impl WorkingLine {
    /// Attach turn-table row ids to the line.
    pub fn attach(&mut self, layer: Layer, rows: &[i64]) {
        for &row in rows {
            self.feature.cats.set(layer, row);
        }
    }
}

/// Materialization state of every input line, indexed by input id.
pub struct FeatureCache {
    states:     Vec<LineState>,
    turn_layer: Layer,
    ucat_layer: Layer,
    rewrites:   usize,
}

impl FeatureCache {
    pub fn new(feature_count: usize, turn_layer: Layer, ucat_layer: Layer) -> Self {
        Self {
            states: vec![LineState::Unmaterialized; feature_count],
            turn_layer,
            ucat_layer,
            rewrites: 0,
        }
    }

    pub fn state(&self, line: FeatureId) -> TurnTableResult<LineState> {
        Ok(self.states[self.slot(line)?])
    }

    pub fn is_materialized(&self, line: FeatureId) -> TurnTableResult<bool> {
        Ok(self.state(line)?.is_materialized())
    }

    /// Number of lines written to the output map so far.
    pub fn materialized_count(&self) -> usize {
        self.states.iter().filter(|s| s.is_materialized()).count()
    }

    /// Total rewrites issued through [`update`](Self::update).
    pub fn rewrites(&self) -> usize {
        self.rewrites
    }

    /// Drop every category the pass is about to issue fresh.
    pub fn strip(&self, cats: &mut Cats) {
        cats.delete_layer(self.turn_layer);
        cats.delete_layer(self.ucat_layer);
    }

    /// Load `line` into a scratch slot.
    ///
    /// Unmaterialized lines come from `input` with the turn and ucat layers
    /// stripped and no turn node yet.  Materialized lines come from `output`
    /// at their latest id, with the turn node oriented by `line.dir`.
    pub fn resolve<S, O>(&self, input: &S, output: &O, line: DirectedLine) -> TurnTableResult<WorkingLine>
    where
        S: VectorSource + ?Sized,
        O: VectorSink + ?Sized,
    {
        match self.state(line.line)? {
            LineState::Unmaterialized => {
                let mut feature = input.read(line.line)?;
                self.strip(&mut feature.cats);
                Ok(WorkingLine { line, feature, node: None })
            }
            LineState::Written { output: id, ucat } | LineState::Rewritten { output: id, ucat, .. } => {
                let feature = output.read(id)?;
                if feature.cats.get(self.ucat_layer) != Some(ucat) {
                    return Err(TurnTableError::Invariant(format!(
                        "output {id} for {} does not carry ucat {ucat}",
                        line.line
                    )));
                }
                Ok(WorkingLine { line, feature, node: Some(TurnNode::new(ucat, line.dir)) })
            }
        }
    }

    /// First write of `working` to the output map.
    pub fn materialize<O>(&mut self, output: &mut O, working: &WorkingLine, ucat: i64) -> TurnTableResult<FeatureId>
    where
        O: VectorSink + ?Sized,
    {
        let slot = self.slot(working.line.line)?;
        if self.states[slot].is_materialized() {
            return Err(TurnTableError::Invariant(format!(
                "{} materialized twice",
                working.line.line
            )));
        }
        let f = &working.feature;
        let id = output.write(f.kind, &f.points, &f.cats)?;
        self.states[slot] = LineState::Written { output: id, ucat };
        Ok(id)
    }

    /// Rewrite a materialized line with the categories in `working` and
    /// record the id the store hands back.
    pub fn update<O>(&mut self, output: &mut O, working: &WorkingLine) -> TurnTableResult<FeatureId>
    where
        O: VectorSink + ?Sized,
    {
        let slot = self.slot(working.line.line)?;
        let (old, ucat, times) = match self.states[slot] {
            LineState::Unmaterialized => {
                return Err(TurnTableError::Invariant(format!(
                    "{} rewritten before it was written",
                    working.line.line
                )));
            }
            LineState::Written { output, ucat } => (output, ucat, 0),
            LineState::Rewritten { output, ucat, times } => (output, ucat, times),
        };
        let f = &working.feature;
        let id = output.rewrite(old, f.kind, &f.points, &f.cats)?;
        self.states[slot] = LineState::Rewritten { output: id, ucat, times: times + 1 };
        self.rewrites += 1;
        Ok(id)
    }

    fn slot(&self, line: FeatureId) -> TurnTableResult<usize> {
        if line.0 == 0 || line.index() >= self.states.len() {
            return Err(VectorError::FeatureNotFound(line).into());
        }
        Ok(line.index())
    }
}

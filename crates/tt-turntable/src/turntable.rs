//! The turn-table pass.
//!
//! # Pass structure
//!
//! ```text
//! begin transaction
//! for node in 1..=node_count:
//!   for i in incident(node):
//!     resolve line i                      (skip non-arcs)
//!     for j in incident(node)[i..]:
//!       j not yet written → new ucat, two U-turn rows, then
//!                           j == i: share the categories with i
//!                           j != i: turn pair, write j once
//!       j == i            → nothing
//!       j other loop end  → turn pair, categories stay on i
//!       otherwise         → turn pair, rewrite j
//!     rewrite i
//! check ucat count
//! write one point per node              (ucat layer = isec marker)
//! copy every feature not written yet    (turn / ucat layers stripped)
//! commit
//! ```
//!
//! Any error aborts the pass and rolls the sink transaction back.

use std::f64::consts::PI;

use log::{debug, error, info, warn};

use tt_core::{
    normalize_angle, turn_angle, DirectedLine, Direction, FeatureId, FeatureType, NodeId, Polyline,
    TurnNode, TurnTableConfig,
};
use tt_output::{TurnRow, TurnTableSink};
use tt_vector::{Cats, Feature, VectorSink, VectorSource};

use crate::allocator::{Allocators, IsecMarkers};
use crate::cache::{FeatureCache, WorkingLine};
use crate::observer::{NoopObserver, PassObserver};
use crate::{TurnTableBuilder, TurnTableError, TurnTableResult, TurnTableSummary};

/// A configured, ready-to-run turn-table pass over `input`, writing the
/// annotated map to `output` and the rows to `sink`.
///
/// Construct with [`TurnTableBuilder`]; consumed by [`run`](Self::run).
pub struct TurnTable<'a, S, O, T>
where
    S: VectorSource + ?Sized,
    O: VectorSink + ?Sized,
    T: TurnTableSink + ?Sized,
{
    config:    TurnTableConfig,
    input:     &'a S,
    output:    &'a mut O,
    sink:      &'a mut T,
    alloc:     Allocators,
    cache:     FeatureCache,
    isec:      IsecMarkers,
    arc_lines: usize,
    summary:   TurnTableSummary,
}

impl<'a, S, O, T> TurnTable<'a, S, O, T>
where
    S: VectorSource + ?Sized,
    O: VectorSink + ?Sized,
    T: TurnTableSink + ?Sized,
{
    pub(crate) fn new(
        config:    TurnTableConfig,
        input:     &'a S,
        output:    &'a mut O,
        sink:      &'a mut T,
        arc_lines: usize,
    ) -> Self {
        let cache = FeatureCache::new(input.feature_count(), config.turn_layer, config.ucat_layer);
        Self {
            config,
            input,
            output,
            sink,
            alloc: Allocators::new(),
            cache,
            isec: IsecMarkers::new(arc_lines),
            arc_lines,
            summary: TurnTableSummary::default(),
        }
    }

    /// Run the pass to completion.
    ///
    /// On error the sink transaction is rolled back and the error returned;
    /// the output map is left as far as the pass got.
    pub fn run<P: PassObserver>(mut self, observer: &mut P) -> TurnTableResult<TurnTableSummary> {
        match self.populate(&mut *observer) {
            Ok(()) => {
                self.summary.lines = self.cache.materialized_count();
                self.summary.rewrites = self.cache.rewrites();
                observer.on_pass_end(&self.summary);
                info!("populated turntable: {}", self.summary);
                Ok(self.summary)
            }
            Err(e) => {
                if let Err(rb) = self.sink.rollback() {
                    warn!("rolling back the turn-table transaction failed: {rb}");
                }
                error!("unable to populate turntable: {e}");
                Err(e)
            }
        }
    }

    fn populate(&mut self, obs: &mut dyn PassObserver) -> TurnTableResult<()> {
        self.sink.begin()?;

        let input = self.input;
        let node_count = input.node_count();
        for n in 0..node_count {
            let node = NodeId::from_index(n);
            let incident = input.node_lines(node)?;
            obs.on_node_start(node, node_count, incident.len());
            debug!("{node}: {} half-edges", incident.len());
            for i in 0..incident.len() {
                self.process_line(node, incident, i, obs)?;
            }
        }

        self.check_ucats()?;
        self.write_node_points()?;
        self.copy_through()?;

        self.sink.commit()?;
        Ok(())
    }

    // ── Line pass ─────────────────────────────────────────────────────────

    /// Pair half-edge `i` at `node` with itself and every later half-edge.
    fn process_line(
        &mut self,
        node:     NodeId,
        incident: &[DirectedLine],
        i:        usize,
        obs:      &mut dyn PassObserver,
    ) -> TurnTableResult<()> {
        let di = incident[i];
        let mut line_i = self.cache.resolve(self.input, &*self.output, di)?;
        if line_i.node.is_none() && !self.is_arc(&line_i.feature) {
            return Ok(());
        }

        for &dj in &incident[i..] {
            if !self.cache.is_materialized(dj.line)? {
                let mut line_j = self.cache.resolve(self.input, &*self.output, dj)?;
                if !self.is_arc(&line_j.feature) {
                    continue;
                }
                let ucat = self.first_encounter(&mut line_j, obs)?;

                if dj.is_same_half_edge(&di) {
                    self.cache.materialize(&mut *self.output, &line_j, ucat)?;
                    line_i.feature.cats = line_j.feature.cats;
                    line_i.node = line_j.node;
                    continue;
                }

                self.turn_pair(node, &mut line_i, &mut line_j, obs)?;
                self.cache.materialize(&mut *self.output, &line_j, ucat)?;
            } else if dj.is_same_half_edge(&di) {
                continue;
            } else if dj.is_same_line(&di) {
                self.loop_pair(node, &mut line_i, dj, obs)?;
            } else {
                let mut line_j = self.cache.resolve(self.input, &*self.output, dj)?;
                self.turn_pair(node, &mut line_i, &mut line_j, obs)?;
                self.cache.update(&mut *self.output, &line_j)?;
            }
        }

        self.cache.update(&mut *self.output, &line_i)?;
        Ok(())
    }

    /// Give `line` its ucat and insert its two U-turn rows.
    fn first_encounter(
        &mut self,
        line: &mut WorkingLine,
        obs:  &mut dyn PassObserver,
    ) -> TurnTableResult<i64> {
        let id = line.line.line;
        let ucat = self.alloc.ucats.issue();
        let (start, end) = self.input.line_nodes(id)?;

        line.feature.cats.set(self.config.ucat_layer, ucat);
        line.node = Some(TurnNode::new(ucat, line.line.dir));

        // Forward travel reverses at the end node, backward travel at the start.
        let forward = TurnRow {
            cat:     self.alloc.rows.issue(),
            ln_from: ucat,
            ln_to:   -ucat,
            cost:    0.0,
            isec:    self.isec.at(end),
            angle:   Some(PI),
        };
        self.insert(forward, obs)?;
        let backward = TurnRow {
            cat:     self.alloc.rows.issue(),
            ln_from: -ucat,
            ln_to:   ucat,
            cost:    0.0,
            isec:    self.isec.at(start),
            angle:   Some(PI),
        };
        self.insert(backward, obs)?;

        line.attach(self.config.turn_layer, &[forward.cat, backward.cat]);
        self.summary.uturn_rows += 2;
        obs.on_line_materialized(id, ucat);
        debug!("{id}: ucat {ucat}");
        Ok(ucat)
    }

    /// Turn rows between two distinct lines meeting at `node`.
    fn turn_pair(
        &mut self,
        node:   NodeId,
        line_i: &mut WorkingLine,
        line_j: &mut WorkingLine,
        obs:    &mut dyn PassObserver,
    ) -> TurnTableResult<()> {
        let (ni, nj) = (turn_node(line_i)?, turn_node(line_j)?);
        let (from, to, i_first) = orient(ni, nj);
        let (from_line, to_line) = if i_first {
            (&line_i.feature.points, &line_j.feature.points)
        } else {
            (&line_j.feature.points, &line_i.feature.points)
        };
        let angle = turn_angle(from_line, from.dir, to_line, to.dir);

        let rows = self.insert_pair(node, from, to, angle, obs)?;
        line_i.attach(self.config.turn_layer, &rows);
        line_j.attach(self.config.turn_layer, &rows);
        Ok(())
    }

    /// Turn rows between the two ends of a loop line at `node`.  Both ends
    /// share one feature, so the categories only go onto `line_i`.
    fn loop_pair(
        &mut self,
        node:   NodeId,
        line_i: &mut WorkingLine,
        other:  DirectedLine,
        obs:    &mut dyn PassObserver,
    ) -> TurnTableResult<()> {
        let ni = turn_node(line_i)?;
        let (from, to, _) = orient(ni, TurnNode::new(ni.ucat, other.dir));
        let points = &line_i.feature.points;
        let angle = turn_angle(points, from.dir, points, to.dir);

        let rows = self.insert_pair(node, from, to, angle, obs)?;
        line_i.attach(self.config.turn_layer, &rows);
        Ok(())
    }

    /// Insert the row `from → to` and its mirror `to → from` at `node`.  The
    /// mirror carries the negated angle, folded into `(-π, π]`.
    fn insert_pair(
        &mut self,
        node:  NodeId,
        from:  TurnNode,
        to:    TurnNode,
        angle: Option<f64>,
        obs:   &mut dyn PassObserver,
    ) -> TurnTableResult<[i64; 2]> {
        let isec = self.isec.at(node);
        // `from` is travelled into the node, `to` out of it.
        let (ln_from, ln_to) = (-from.signed(), to.signed());

        let there = TurnRow {
            cat: self.alloc.rows.issue(),
            ln_from,
            ln_to,
            cost: 0.0,
            isec,
            angle,
        };
        self.insert(there, obs)?;
        let back = TurnRow {
            cat:     self.alloc.rows.issue(),
            ln_from: -ln_to,
            ln_to:   -ln_from,
            cost:    0.0,
            isec,
            // A reversal stays at π rather than flipping to -π.
            angle:   angle.map(|a| normalize_angle(-a)),
        };
        self.insert(back, obs)?;

        self.summary.turn_rows += 2;
        Ok([there.cat, back.cat])
    }

    fn insert(&mut self, row: TurnRow, obs: &mut dyn PassObserver) -> TurnTableResult<()> {
        self.sink.insert(&row)?;
        debug!(
            "row {}: {:+} -> {:+} at isec {} angle {:?}",
            row.cat, row.ln_from, row.ln_to, row.isec, row.angle
        );
        obs.on_row(&row);
        Ok(())
    }

    fn is_arc(&self, feature: &Feature) -> bool {
        self.config.is_arc_type(feature.kind) && feature.cats.has_layer(self.config.arc_layer)
    }

    // ── After the line pass ───────────────────────────────────────────────

    /// Node point ids start right after the arc-line count, so no line may
    /// hold a ucat above it.
    fn check_ucats(&self) -> TurnTableResult<()> {
        let issued = self.alloc.ucats.issued() as usize;
        if issued > self.arc_lines {
            return Err(TurnTableError::Invariant(format!(
                "{issued} ucats issued for {} arc-type lines; node point ids would collide",
                self.arc_lines
            )));
        }
        if issued < self.arc_lines {
            let types: Vec<&str> = self.config.arc_types.iter().map(|t| t.as_str()).collect();
            warn!(
                "{} of {} {} features have no category in {} and got no ucat",
                self.arc_lines - issued,
                self.arc_lines,
                types.join("/"),
                self.config.arc_layer
            );
        }
        Ok(())
    }

    fn write_node_points(&mut self) -> TurnTableResult<()> {
        let input = self.input;
        self.alloc.ucats.advance_to(self.isec.first());

        for n in 0..input.node_count() {
            let node = NodeId::from_index(n);
            let id = self.alloc.ucats.issue();
            debug_assert_eq!(id, self.isec.at(node));

            let cats: Cats = [(self.config.ucat_layer, id)].into_iter().collect();
            let point = Polyline::single(input.node_point(node)?);
            self.output.write(FeatureType::Point, &point, &cats)?;
            self.summary.nodes += 1;
        }
        Ok(())
    }

    fn copy_through(&mut self) -> TurnTableResult<()> {
        let input = self.input;
        for k in 0..input.feature_count() {
            let id = FeatureId::from_index(k);
            if self.cache.is_materialized(id)? {
                continue;
            }
            let mut feature = input.read(id)?;
            self.cache.strip(&mut feature.cats);
            self.output.write(feature.kind, &feature.points, &feature.cats)?;
            self.summary.copied += 1;
        }
        Ok(())
    }
}

/// Order a turn between half-edges `i` and `j`: returns `(from, to, i_is_from)`.
///
/// The row leaves from `j` only when `i` leaves the node and `j` enters it.
fn orient(i: TurnNode, j: TurnNode) -> (TurnNode, TurnNode, bool) {
    if i.dir == Direction::Outgoing && j.dir == Direction::Incoming {
        (j, i, false)
    } else {
        (i, j, true)
    }
}

fn turn_node(line: &WorkingLine) -> TurnTableResult<TurnNode> {
    line.node
        .ok_or_else(|| TurnTableError::Invariant(format!("{} has no ucat", line.line.line)))
}

/// Build and run a pass with `config` in one call.
pub fn populate_turntable<S, O, T>(
    config: TurnTableConfig,
    input:  &S,
    output: &mut O,
    sink:   &mut T,
) -> TurnTableResult<TurnTableSummary>
where
    S: VectorSource + ?Sized,
    O: VectorSink + ?Sized,
    T: TurnTableSink + ?Sized,
{
    TurnTableBuilder::new(input, output, sink)
        .config(config)
        .build()?
        .run(&mut NoopObserver)
}

//! Tests for the turn-table pass.
//!
//! Networks are built in memory; rows go to a `MemorySink` unless a test
//! exercises a specific backend.

use std::collections::BTreeSet;
use std::f64::consts::{FRAC_PI_2, PI};

use tt_core::{normalize_angle, FeatureType, Layer, TurnTableConfig};
use tt_output::{MemorySink, TurnRow};
use tt_vector::{Cats, Feature, VectorMap, VectorMapBuilder};

use crate::{NoopObserver, TurnTableBuilder, TurnTableSummary};

// ── Helpers ───────────────────────────────────────────────────────────────────

const TURN: Layer = Layer(3);
const UCAT: Layer = Layer(4);

fn arc(cat: i64) -> Cats {
    [(Layer(1), cat)].into_iter().collect()
}

/// One arc line per coordinate list, in order.
fn network(lines: &[&[(f64, f64)]]) -> VectorMap {
    let mut b = VectorMapBuilder::new();
    for (k, coords) in lines.iter().enumerate() {
        b.add_line(coords, arc(k as i64 + 1));
    }
    b.build().unwrap()
}

struct Outcome {
    output:  VectorMap,
    rows:    Vec<TurnRow>,
    summary: TurnTableSummary,
}

fn run_with(config: TurnTableConfig, input: &VectorMap) -> Outcome {
    let mut output = VectorMap::new();
    let mut sink = MemorySink::new();
    let summary = TurnTableBuilder::new(input, &mut output, &mut sink)
        .config(config)
        .build()
        .unwrap()
        .run(&mut NoopObserver)
        .unwrap();
    Outcome { output, rows: sink.into_rows(), summary }
}

fn run(input: &VectorMap) -> Outcome {
    run_with(TurnTableConfig::default(), input)
}

fn row(rows: &[TurnRow], from: i64, to: i64) -> TurnRow {
    *rows
        .iter()
        .find(|r| r.ln_from == from && r.ln_to == to && !r.is_uturn())
        .unwrap_or_else(|| panic!("no turn row {from} -> {to} in {rows:#?}"))
}

fn turn_rows(rows: &[TurnRow]) -> Vec<TurnRow> {
    rows.iter().filter(|r| !r.is_uturn()).copied().collect()
}

fn feature_with_ucat(out: &VectorMap, kind: FeatureType, ucat: i64) -> &Feature {
    out.features()
        .map(|(_, f)| f)
        .find(|f| f.kind == kind && f.cats.get(UCAT) == Some(ucat))
        .unwrap_or_else(|| panic!("no {kind} with ucat {ucat}"))
}

fn turn_cats(f: &Feature) -> BTreeSet<i64> {
    f.cats.cats(TURN).collect()
}

fn assert_angle(angle: Option<f64>, expected: f64) {
    let a = angle.expect("angle must be defined");
    assert!((a - expected).abs() < 1e-12, "angle {a}, expected {expected}");
}

/// Checks every structural property a finished pass must satisfy.
fn check_invariants(out: &Outcome) {
    let mut rows = out.rows.clone();
    rows.sort_by_key(|r| r.cat);

    for (k, r) in rows.iter().enumerate() {
        assert_eq!(r.cat, k as i64 + 1, "row ids must be dense");
        assert_eq!(r.cost, 0.0);
        if let Some(a) = r.angle {
            assert!(a > -PI && a <= PI, "angle {a} out of range");
        }
    }

    // Rows are issued in pairs: two U-turns of one line, or a turn and its
    // mirror.
    for pair in rows.chunks(2) {
        let [a, b] = pair else { panic!("odd number of rows") };
        if a.is_uturn() {
            assert!(b.is_uturn());
            assert_eq!((b.ln_from, b.ln_to), (a.ln_to, a.ln_from));
            continue;
        }
        assert_eq!((b.ln_from, b.ln_to), (-a.ln_to, -a.ln_from));
        assert_eq!(a.isec, b.isec);
        match (a.angle, b.angle) {
            (Some(x), Some(y)) => assert!((normalize_angle(-x) - y).abs() < 1e-12, "{x} vs {y}"),
            (None, None) => {}
            other => panic!("angles must be both defined or both NULL: {other:?}"),
        }
    }

    // A line's turn categories are exactly the rows touching its ucat.
    for (_, f) in out.output.features().filter(|(_, f)| f.kind.is_linear()) {
        let Some(u) = f.cats.get(UCAT) else { continue };
        let expected: BTreeSet<i64> = rows
            .iter()
            .filter(|r| r.ln_from.abs() == u || r.ln_to.abs() == u)
            .map(|r| r.cat)
            .collect();
        assert_eq!(turn_cats(f), expected, "turn categories of ucat {u}");
    }

    // Every isec names a node point.
    let points: BTreeSet<i64> = out
        .output
        .features()
        .filter(|(_, f)| f.kind == FeatureType::Point)
        .filter_map(|(_, f)| f.cats.get(UCAT))
        .collect();
    for r in &rows {
        assert!(points.contains(&r.isec), "isec {} has no node point", r.isec);
    }

    assert_eq!(
        out.output.feature_count() - out.output.live_count(),
        out.summary.rewrites,
        "each rewrite retires exactly one output id"
    );
}

// ── Scenarios ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod scenarios {
    use super::*;

    #[test]
    fn collinear_pair() {
        let input = network(&[&[(0.0, 0.0), (1.0, 0.0)], &[(1.0, 0.0), (2.0, 0.0)]]);
        let out = run(&input);
        check_invariants(&out);

        // Nodes: 1 = (0,0), 2 = (1,0), 3 = (2,0); two arc lines, so isec = node + 2.
        let expected_uturns = [
            (1, 1, -1, 4),
            (2, -1, 1, 3),
            (3, 2, -2, 5),
            (4, -2, 2, 4),
        ];
        for (cat, from, to, isec) in expected_uturns {
            let r = out.rows.iter().find(|r| r.cat == cat).unwrap();
            assert_eq!((r.ln_from, r.ln_to, r.isec), (from, to, isec));
            assert_eq!(r.angle, Some(PI));
        }

        let turns = turn_rows(&out.rows);
        assert_eq!(turns.len(), 2);
        let straight = row(&out.rows, 1, 2);
        assert_eq!(straight.isec, 4);
        assert_angle(straight.angle, 0.0);
        assert_angle(row(&out.rows, -2, -1).angle, 0.0);

        assert_eq!(
            out.summary,
            TurnTableSummary {
                lines:      2,
                nodes:      3,
                uturn_rows: 4,
                turn_rows:  2,
                copied:     0,
                rewrites:   4,
            }
        );

        let l1 = feature_with_ucat(&out.output, FeatureType::Line, 1);
        let l2 = feature_with_ucat(&out.output, FeatureType::Line, 2);
        assert_eq!(turn_cats(l1), BTreeSet::from([1, 2, 5, 6]));
        assert_eq!(turn_cats(l2), BTreeSet::from([3, 4, 5, 6]));
        assert_eq!(l1.cats.get(Layer(1)), Some(1));

        let p = feature_with_ucat(&out.output, FeatureType::Point, 4);
        assert_eq!(p.points.first(), Some(tt_core::Point::new(1.0, 0.0)));
        assert_eq!(out.output.live_count(), 5);
    }

    #[test]
    fn closed_loop() {
        let input = network(&[&[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0), (0.0, 0.0)]]);
        let out = run(&input);
        check_invariants(&out);

        assert_eq!(out.rows.len(), 4);
        assert_eq!(out.rows.iter().filter(|r| r.is_uturn()).count(), 2);
        assert!(out.rows.iter().all(|r| r.isec == 2));

        let there = row(&out.rows, 1, 1);
        let back = row(&out.rows, -1, -1);
        assert_eq!((there.angle, back.angle), (None, None));

        let line = feature_with_ucat(&out.output, FeatureType::Line, 1);
        assert_eq!(turn_cats(line), BTreeSet::from([1, 2, 3, 4]));
        assert_eq!(out.summary.lines, 1);
        assert_eq!(out.summary.nodes, 1);
    }

    #[test]
    fn single_point_line_has_null_angles() {
        let mut b = VectorMapBuilder::new();
        b.add_line(&[(0.0, 0.0), (1.0, 0.0)], arc(1));
        b.add_line(&[(1.0, 0.0)], arc(2));
        let out = run(&b.build().unwrap());
        check_invariants(&out);

        let turns = turn_rows(&out.rows);
        // Node (1,0) holds three half-edges: L1 in, P out, P in.
        assert_eq!(turns.len(), 6);
        assert!(turns.iter().all(|r| r.angle.is_none()), "{turns:#?}");
        assert_eq!(out.rows.iter().filter(|r| r.is_uturn()).count(), 4);
    }

    #[test]
    fn loop_with_stem() {
        let input = network(&[
            &[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0), (0.0, 0.0)],
            &[(0.0, 0.0), (-1.0, 0.0)],
        ]);
        let out = run(&input);
        check_invariants(&out);

        // Three half-edges at the shared node: three turn pairs.
        assert_eq!(turn_rows(&out.rows).len(), 6);
        assert_eq!(out.rows.len(), 10);
        assert!(turn_rows(&out.rows).iter().all(|r| r.angle.is_none()));
    }
}

// ── Orientation of turn rows ──────────────────────────────────────────────────

#[cfg(test)]
mod orientation {
    use super::*;

    #[test]
    fn both_incoming() {
        let out = run(&network(&[&[(0.0, 0.0), (1.0, 0.0)], &[(2.0, 0.0), (1.0, 0.0)]]));
        assert_angle(row(&out.rows, 1, -2).angle, 0.0);
        assert_angle(row(&out.rows, 2, -1).angle, 0.0);
    }

    #[test]
    fn both_outgoing() {
        let out = run(&network(&[&[(1.0, 0.0), (0.0, 0.0)], &[(1.0, 0.0), (2.0, 0.0)]]));
        assert_angle(row(&out.rows, -1, 2).angle, 0.0);
        assert_angle(row(&out.rows, -2, 1).angle, 0.0);
    }

    #[test]
    fn outgoing_then_incoming() {
        let out = run(&network(&[&[(1.0, 0.0), (2.0, 0.0)], &[(0.0, 0.0), (1.0, 0.0)]]));
        assert_angle(row(&out.rows, 2, 1).angle, 0.0);
        assert_angle(row(&out.rows, -1, -2).angle, 0.0);
    }

    #[test]
    fn right_and_left_turns() {
        let right = run(&network(&[&[(0.0, 0.0), (1.0, 0.0)], &[(1.0, 0.0), (1.0, -1.0)]]));
        assert_angle(row(&right.rows, 1, 2).angle, FRAC_PI_2);
        assert_angle(row(&right.rows, -2, -1).angle, -FRAC_PI_2);

        let left = run(&network(&[&[(0.0, 0.0), (1.0, 0.0)], &[(1.0, 0.0), (1.0, 1.0)]]));
        assert_angle(row(&left.rows, 1, 2).angle, -FRAC_PI_2);
    }

    #[test]
    fn doubling_back_is_pi_both_ways() {
        let input = network(&[
            &[(0.0, 0.0), (1.0, 0.0)],
            &[(1.0, 0.0), (0.0, 0.5), (-1.0, 0.0)],
        ]);
        let out = run(&input);
        check_invariants(&out);

        let there = row(&out.rows, 1, 2);
        let back = row(&out.rows, -2, -1);
        assert_eq!(there.isec, 4);
        assert_angle(there.angle, PI);
        assert_angle(back.angle, PI);
    }

    #[test]
    fn star_pairs_every_half_edge() {
        let input = network(&[
            &[(-1.0, 0.0), (0.0, 0.0)],
            &[(0.0, 0.0), (1.0, 0.0)],
            &[(0.0, 0.0), (0.0, 1.0)],
        ]);
        let out = run(&input);
        check_invariants(&out);

        let turns = turn_rows(&out.rows);
        assert_eq!(turns.len(), 6);
        let centre = turns[0].isec;
        assert!(turns.iter().all(|r| r.isec == centre));

        for (a, b) in [(1, 2), (1, 3), (2, 3)] {
            let n = turns
                .iter()
                .filter(|r| {
                    let ends = BTreeSet::from([r.ln_from.abs(), r.ln_to.abs()]);
                    ends == BTreeSet::from([a, b])
                })
                .count();
            assert_eq!(n, 2, "lines {a} and {b}");
        }
        assert_angle(row(&out.rows, 1, 3).angle, -FRAC_PI_2);
    }

    #[test]
    fn grid_network() {
        let mut lines: Vec<Vec<(f64, f64)>> = Vec::new();
        for y in 0..3 {
            for x in 0..2 {
                lines.push(vec![(x as f64, y as f64), (x as f64 + 1.0, y as f64)]);
            }
        }
        for x in 0..3 {
            for y in 0..2 {
                lines.push(vec![(x as f64, y as f64), (x as f64, y as f64 + 1.0)]);
            }
        }
        let refs: Vec<&[(f64, f64)]> = lines.iter().map(Vec::as_slice).collect();
        let out = run(&network(&refs));
        check_invariants(&out);

        // 4 corners of degree 2, 4 edge nodes of degree 3, a centre of degree 4.
        assert_eq!(out.summary.lines, 12);
        assert_eq!(out.summary.nodes, 9);
        assert_eq!(out.summary.uturn_rows, 24);
        assert_eq!(out.summary.turn_rows, 4 * 2 + 4 * 6 + 12);
    }
}

// ── Non-arc features and copy-through ─────────────────────────────────────────

#[cfg(test)]
mod copy_through {
    use super::*;

    use tt_core::{Point, Polyline};

    #[test]
    fn non_arcs_are_copied_with_layers_stripped() {
        let mut b = VectorMapBuilder::new();
        let stale: Cats = "1:1;3:77;4:99".parse().unwrap();
        b.add_line(&[(0.0, 0.0), (1.0, 0.0)], stale);
        b.add_line(&[(1.0, 0.0), (2.0, 0.0)], "2:5".parse().unwrap());
        b.add_feature(Feature::point(Point::new(9.0, 9.0), "1:7;4:3".parse().unwrap()));
        let out = run(&b.build().unwrap());
        check_invariants(&out);

        // Only the first line is an arc; the second still counts toward isec.
        assert_eq!(out.rows.len(), 2);
        assert_eq!(out.rows[0].isec, 2 + 2);
        assert_eq!(out.rows[1].isec, 1 + 2);

        let line = feature_with_ucat(&out.output, FeatureType::Line, 1);
        assert!(!line.cats.contains(TURN, 77));
        assert!(!line.cats.contains(UCAT, 99));

        let copied: Vec<&Feature> = out
            .output
            .features()
            .map(|(_, f)| f)
            .filter(|f| f.cats.get(UCAT).is_none())
            .collect();
        assert_eq!(copied.len(), 2);
        assert_eq!(copied[0].cats.to_string(), "2:5");
        assert_eq!(copied[1].kind, FeatureType::Point);
        assert_eq!(copied[1].cats.to_string(), "1:7");

        assert_eq!(out.summary.copied, 2);
        assert_eq!(out.summary.lines, 1);
        assert_eq!(out.summary.nodes, 3);
    }

    #[test]
    fn excluded_types_keep_their_type() {
        let mut b = VectorMapBuilder::new();
        b.add_line(&[(0.0, 0.0), (1.0, 0.0)], arc(1));
        b.add_feature(Feature::new(
            FeatureType::Boundary,
            Polyline::new(vec![Point::new(1.0, 0.0), Point::new(1.0, 1.0)]),
            arc(2),
        ));
        let config = TurnTableConfig { arc_types: vec![FeatureType::Line], ..Default::default() };
        let out = run_with(config, &b.build().unwrap());
        check_invariants(&out);

        assert_eq!(out.summary.lines, 1);
        assert_eq!(out.summary.copied, 1);
        assert!(turn_rows(&out.rows).is_empty());
        assert!(out.output.features().any(|(_, f)| f.kind == FeatureType::Boundary));
    }

    #[test]
    fn boundaries_are_arcs_by_default() {
        let mut b = VectorMapBuilder::new();
        b.add_line(&[(0.0, 0.0), (1.0, 0.0)], arc(1));
        b.add_feature(Feature::new(
            FeatureType::Boundary,
            Polyline::new(vec![Point::new(1.0, 0.0), Point::new(2.0, 0.0)]),
            arc(2),
        ));
        let out = run(&b.build().unwrap());
        check_invariants(&out);

        assert_eq!(out.summary.lines, 2);
        let boundary = feature_with_ucat(&out.output, FeatureType::Boundary, 2);
        assert_eq!(turn_cats(boundary).len(), 4);
    }
}

// ── Builder, observer, failures ───────────────────────────────────────────────

#[cfg(test)]
mod pass_tests {
    use super::*;

    use tt_core::{DirectedLine, FeatureId, NodeId, Point};
    use tt_output::{OutputError, OutputResult, TurnTableSink};
    use tt_vector::{VectorResult, VectorSource};

    use crate::{PassObserver, TurnTableError};

    fn collinear() -> VectorMap {
        network(&[&[(0.0, 0.0), (1.0, 0.0)], &[(1.0, 0.0), (2.0, 0.0)]])
    }

    /// Fails the `fail_at`-th insert.
    struct FailingSink {
        inner:     MemorySink,
        fail_at:   usize,
        inserted:  usize,
        rollbacks: usize,
    }

    impl TurnTableSink for FailingSink {
        fn begin(&mut self) -> OutputResult<()> {
            self.inner.begin()
        }

        fn insert(&mut self, row: &TurnRow) -> OutputResult<()> {
            self.inserted += 1;
            if self.inserted == self.fail_at {
                return Err(OutputError::Rejected { cat: row.cat, reason: "disk full".into() });
            }
            self.inner.insert(row)
        }

        fn commit(&mut self) -> OutputResult<()> {
            self.inner.commit()
        }

        fn rollback(&mut self) -> OutputResult<()> {
            self.rollbacks += 1;
            self.inner.rollback()
        }
    }

    /// Reports one arc-type feature fewer than the map holds.
    struct Undercounting<'m>(&'m VectorMap);

    impl VectorSource for Undercounting<'_> {
        fn feature_count(&self) -> usize {
            self.0.feature_count()
        }

        fn read(&self, id: FeatureId) -> VectorResult<Feature> {
            self.0.read(id)
        }

        fn node_count(&self) -> usize {
            self.0.node_count()
        }

        fn node_lines(&self, node: NodeId) -> VectorResult<&[DirectedLine]> {
            self.0.node_lines(node)
        }

        fn node_point(&self, node: NodeId) -> VectorResult<Point> {
            self.0.node_point(node)
        }

        fn line_nodes(&self, line: FeatureId) -> VectorResult<(NodeId, NodeId)> {
            self.0.line_nodes(line)
        }

        fn count_of(&self, types: &[FeatureType]) -> usize {
            self.0.count_of(types).saturating_sub(1)
        }
    }

    #[derive(Default)]
    struct Counting {
        nodes: usize,
        lines: usize,
        rows:  usize,
        ends:  usize,
    }

    impl PassObserver for Counting {
        fn on_node_start(&mut self, _node: NodeId, _total: usize, _degree: usize) {
            self.nodes += 1;
        }

        fn on_line_materialized(&mut self, _line: FeatureId, _ucat: i64) {
            self.lines += 1;
        }

        fn on_row(&mut self, _row: &TurnRow) {
            self.rows += 1;
        }

        fn on_pass_end(&mut self, _summary: &TurnTableSummary) {
            self.ends += 1;
        }
    }

    #[test]
    fn default_config_when_none_given() {
        let input = collinear();
        let mut output = VectorMap::new();
        let mut sink = MemorySink::new();
        let summary = TurnTableBuilder::new(&input, &mut output, &mut sink)
            .build()
            .unwrap()
            .run(&mut NoopObserver)
            .unwrap();
        assert_eq!(summary.lines, 2);
        // Layer 3 and 4 received the rows and ucats; isec sits above two lines.
        assert_eq!(sink.rows()[0].isec, 4);
        assert!(output.features().all(|(_, f)| f.cats.has_layer(Layer(4))));
    }

    #[test]
    fn invalid_config_rejected() {
        let input = collinear();
        let mut output = VectorMap::new();
        let mut sink = MemorySink::new();
        let config = TurnTableConfig { turn_layer: Layer(4), ..Default::default() };
        let rejected = matches!(
            TurnTableBuilder::new(&input, &mut output, &mut sink).config(config).build(),
            Err(TurnTableError::Config(_))
        );
        assert!(rejected);
        assert!(!sink.in_transaction());
        assert_eq!(output.feature_count(), 0);
    }

    #[test]
    fn observer_sees_the_whole_pass() {
        let input = collinear();
        let mut output = VectorMap::new();
        let mut sink = MemorySink::new();
        let mut obs = Counting::default();
        let summary = TurnTableBuilder::new(&input, &mut output, &mut sink)
            .build()
            .unwrap()
            .run(&mut obs)
            .unwrap();

        assert_eq!(obs.nodes, 3);
        assert_eq!(obs.lines, summary.lines);
        assert_eq!(obs.rows, summary.rows());
        assert_eq!(obs.ends, 1);
    }

    #[test]
    fn sink_failure_rolls_back() {
        let input = collinear();
        let mut output = VectorMap::new();
        let mut sink = FailingSink { inner: MemorySink::new(), fail_at: 5, inserted: 0, rollbacks: 0 };
        let result = TurnTableBuilder::new(&input, &mut output, &mut sink)
            .build()
            .unwrap()
            .run(&mut NoopObserver);

        assert!(matches!(
            result,
            Err(TurnTableError::Sink(OutputError::Rejected { cat: 5, .. }))
        ));
        assert_eq!(sink.rollbacks, 1);
        assert!(!sink.inner.in_transaction());
        assert!(sink.inner.rows().is_empty());
    }

    #[test]
    fn too_many_ucats_is_an_invariant_error() {
        let map = collinear();
        let input = Undercounting(&map);
        let mut output = VectorMap::new();
        let mut sink = MemorySink::new();
        let result = TurnTableBuilder::new(&input, &mut output, &mut sink)
            .build()
            .unwrap()
            .run(&mut NoopObserver);

        assert!(matches!(result, Err(TurnTableError::Invariant(_))));
        assert!(sink.rows().is_empty());
        assert!(!sink.in_transaction());
    }

    #[test]
    fn empty_network() {
        let input = VectorMapBuilder::new().build().unwrap();
        let out = run(&input);
        assert!(out.rows.is_empty());
        assert_eq!(out.summary, TurnTableSummary::default());
    }

    #[test]
    fn one_call_helper() {
        let input = collinear();
        let mut output = VectorMap::new();
        let mut sink = MemorySink::new();
        let summary =
            crate::populate_turntable(TurnTableConfig::default(), &input, &mut output, &mut sink)
                .unwrap();
        assert_eq!(summary.rows(), 6);
        assert_eq!(sink.rows().len(), 6);
    }
}

// ── Allocators and line cache ─────────────────────────────────────────────────

#[cfg(test)]
mod state_tests {
    use super::*;

    use tt_core::{DirectedLine, Direction, FeatureId, NodeId, TurnNode};

    use crate::{CatSequence, FeatureCache, IsecMarkers, LineState, TurnTableError};

    #[test]
    fn sequence_issues_and_skips() {
        let mut s = CatSequence::new();
        assert_eq!((s.issue(), s.issue()), (1, 2));
        s.advance_to(10);
        s.advance_to(4);
        assert_eq!(s.issue(), 10);
        assert_eq!(s.issued(), 3);
    }

    #[test]
    fn isec_markers_sit_above_ucats() {
        let m = IsecMarkers::new(7);
        assert_eq!(m.first(), 8);
        assert_eq!(m.at(NodeId(3)), 10);
    }

    #[test]
    fn line_state_machine() {
        let mut b = VectorMapBuilder::new();
        b.add_line(&[(0.0, 0.0), (1.0, 0.0)], "1:1;3:8;4:9".parse().unwrap());
        b.add_line(&[(1.0, 0.0), (2.0, 0.0)], arc(2));
        let input = b.build().unwrap();
        let mut output = VectorMap::new();
        let mut cache = FeatureCache::new(2, TURN, UCAT);
        let l1 = FeatureId(1);

        let mut w = cache.resolve(&input, &output, DirectedLine::outgoing(l1)).unwrap();
        assert!(w.node.is_none());
        assert_eq!(w.feature.cats.to_string(), "1:1");

        w.feature.cats.set(UCAT, 1);
        let first = cache.materialize(&mut output, &w, 1).unwrap();
        assert_eq!(cache.state(l1).unwrap(), LineState::Written { output: first, ucat: 1 });
        assert!(matches!(
            cache.materialize(&mut output, &w, 1),
            Err(TurnTableError::Invariant(_))
        ));

        let mut r = cache.resolve(&input, &output, DirectedLine::incoming(l1)).unwrap();
        assert_eq!(r.node, Some(TurnNode::new(1, Direction::Incoming)));
        r.attach(TURN, &[5, 6]);
        let second = cache.update(&mut output, &r).unwrap();
        let third = cache.update(&mut output, &r).unwrap();
        assert!(first != second && second != third);
        assert_eq!(
            cache.state(l1).unwrap(),
            LineState::Rewritten { output: third, ucat: 1, times: 2 }
        );
        assert_eq!(cache.rewrites(), 2);
        assert_eq!(cache.materialized_count(), 1);
        assert_eq!(output.read(third).unwrap().cats.to_string(), "1:1;4:1;3:5;3:6");

        let l2 = cache.resolve(&input, &output, DirectedLine::outgoing(FeatureId(2))).unwrap();
        assert!(matches!(cache.update(&mut output, &l2), Err(TurnTableError::Invariant(_))));
        assert!(matches!(cache.state(FeatureId(3)), Err(TurnTableError::Vector(_))));
    }
}

// ── Backends end to end ───────────────────────────────────────────────────────

#[cfg(test)]
mod backends {
    use std::io::Cursor;

    use super::*;

    use tt_output::{CsvSink, SqliteSink};
    use tt_vector::{load_map_reader, write_map_writer};

    const MAP: &str = "\
kind,cats,coords
line,1:1,0 0;1 0
line,1:2,1 0;2 0
";

    #[test]
    fn csv_map_to_sqlite_table() {
        let input = load_map_reader(Cursor::new(MAP), 0.0).unwrap();
        let config = TurnTableConfig::default();
        let table = config.default_table_name("roads");
        assert_eq!(table, "roads_turntable_t_3_tuc_4_a_1");

        let mut output = VectorMap::new();
        let mut sink = SqliteSink::in_memory(&table).unwrap();
        TurnTableBuilder::new(&input, &mut output, &mut sink)
            .config(config)
            .build()
            .unwrap()
            .run(&mut NoopObserver)
            .unwrap();

        let conn = sink.connection();
        let count: i64 = conn
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 6);
        let uturns: i64 = conn
            .query_row(
                &format!("SELECT COUNT(*) FROM {table} WHERE ln_from = -ln_to"),
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(uturns, 4);

        let mut buf = Vec::new();
        write_map_writer(&mut buf, &output).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("point,4:3,0 0\n"), "{text}");
        assert!(text.contains("line,1:1;4:1;3:1;3:2;3:5;3:6,0 0;1 0\n"), "{text}");
    }

    #[test]
    fn csv_turn_table() {
        let input = load_map_reader(Cursor::new(MAP), 0.0).unwrap();
        let mut output = VectorMap::new();
        let mut sink = CsvSink::from_writer(Vec::new()).unwrap();
        crate::populate_turntable(TurnTableConfig::default(), &input, &mut output, &mut sink)
            .unwrap();

        let text = String::from_utf8(sink.into_inner().unwrap()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "cat,ln_from,ln_to,cost,isec,angle");
        assert_eq!(lines.len(), 7);
        assert!(lines.iter().any(|l| l.starts_with("5,1,2,0,4,")), "{text}");
    }
}

//! CSV map exchange.
//!
//! # CSV format
//!
//! One row per feature, in id order.
//!
//! ```csv
//! kind,cats,coords
//! line,1:1,0 0;1 0
//! line,1:2;5:9,1 0;2 0;2 1
//! point,1:7,5 5
//! ```
//!
//! **`cats`**: `layer:cat` pairs separated by `;` (may be empty).
//! **`coords`**: `x y` vertices separated by `;`; at least one.
//!
//! Dead slots of a rewritten map are skipped on write, so a written map
//! reloads with dense ids.

use std::io::{Read, Write};
use std::path::Path;

use serde::Deserialize;

use tt_core::{FeatureType, Point, Polyline};

use crate::map::{VectorMap, VectorMapBuilder};
use crate::store::Feature;
use crate::{Cats, VectorError, VectorResult};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct FeatureRecord {
    kind:   String,
    cats:   String,
    coords: String,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a map from a CSV file and build its topology.
pub fn load_map_csv(path: &Path, snap_tolerance: f64) -> VectorResult<VectorMap> {
    let file = std::fs::File::open(path)?;
    load_map_reader(file, snap_tolerance)
}

/// Like [`load_map_csv`] but accepts any `Read` source.
pub fn load_map_reader<R: Read>(reader: R, snap_tolerance: f64) -> VectorResult<VectorMap> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut builder = VectorMapBuilder::new().snap_tolerance(snap_tolerance);

    for (row, result) in csv_reader.deserialize::<FeatureRecord>().enumerate() {
        let rec = result?;
        let kind: FeatureType = rec.kind.parse()?;
        let cats: Cats = rec.cats.parse()?;
        let points = parse_coords(&rec.coords)
            .map_err(|e| VectorError::Parse(format!("row {}: {e}", row + 1)))?;
        builder.add_feature(Feature::new(kind, points, cats));
    }

    builder.build()
}

/// Write every live feature of `map` to a CSV file.
pub fn write_map_csv(path: &Path, map: &VectorMap) -> VectorResult<()> {
    let file = std::fs::File::create(path)?;
    write_map_writer(file, map)
}

/// Like [`write_map_csv`] but accepts any `Write` sink.
pub fn write_map_writer<W: Write>(writer: W, map: &VectorMap) -> VectorResult<()> {
    let mut w = csv::Writer::from_writer(writer);
    w.write_record(["kind", "cats", "coords"])?;
    for (_, f) in map.features() {
        w.write_record(&[
            f.kind.as_str().to_string(),
            f.cats.to_string(),
            format_coords(&f.points),
        ])?;
    }
    w.flush()?;
    Ok(())
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn parse_coords(s: &str) -> Result<Polyline, String> {
    let points = s
        .split(';')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| {
            let mut it = v.split_whitespace().map(str::parse::<f64>);
            match (it.next(), it.next(), it.next()) {
                (Some(Ok(x)), Some(Ok(y)), None) => Ok(Point::new(x, y)),
                _ => Err(format!("invalid vertex {v:?}: expected \"x y\"")),
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    if points.is_empty() {
        return Err("feature has no vertices".into());
    }
    Ok(Polyline::new(points))
}

fn format_coords(line: &Polyline) -> String {
    line.points
        .iter()
        .map(|p| format!("{} {}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(";")
}

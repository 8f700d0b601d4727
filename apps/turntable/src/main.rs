//! # turntable
//!
//! Reads a line network from a CSV map, builds its turn table and writes:
//!
//! - the output map: every arc line with its ucat and turn categories, one
//!   point per network node, and every other feature copied through;
//! - the turn table: into an SQLite database (`--db`) or a CSV file
//!   (`--csv`, default `<output dir>/<table>.csv`).
//!
//! ```text
//! turntable --input roads.csv --output roads_tt.csv --db net.db
//! turntable -i roads.csv -o roads_tt.csv --type line --alayer 2 -v
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};

use tt_core::{FeatureType, Layer, TurnTableConfig};
use tt_output::{CsvSink, TurnTableSink};
use tt_turntable::{LogProgress, TurnTableBuilder};
use tt_vector::{load_map_csv, write_map_csv, VectorMap};

#[cfg(feature = "sqlite")]
use tt_output::SqliteSink;

/// Command-line interface for turntable
#[derive(Parser, Debug)]
#[command(name = "turntable")]
#[command(about = "Build the turn table of a line network")]
struct Cli {
    /// Input map (CSV with columns kind,cats,coords)
    #[arg(short, long)]
    input: PathBuf,

    /// Output map, written as CSV
    #[arg(short, long)]
    output: PathBuf,

    /// Layer whose categories mark network arcs
    #[arg(long, default_value_t = 1)]
    alayer: u32,

    /// Layer receiving turn-table row ids
    #[arg(long, default_value_t = 3)]
    tlayer: u32,

    /// Layer receiving line ucats and node point ids
    #[arg(long, default_value_t = 4)]
    tuclayer: u32,

    /// Feature types treated as arcs
    #[arg(long = "type", value_delimiter = ',', default_value = "line,boundary")]
    types: Vec<FeatureType>,

    /// Endpoints closer than this share a node
    #[arg(long, default_value_t = 0.0)]
    snap: f64,

    /// Turn-table name [default: <output>_turntable_t_<tlayer>_tuc_<tuclayer>_a_<alayer>]
    #[arg(long)]
    table: Option<String>,

    /// Write the turn table into this SQLite database
    #[cfg(feature = "sqlite")]
    #[arg(long, conflicts_with = "csv")]
    db: Option<PathBuf>,

    /// Write the turn table to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn config(&self) -> TurnTableConfig {
        TurnTableConfig {
            arc_layer:  Layer(self.alayer),
            arc_types:  self.types.clone(),
            turn_layer: Layer(self.tlayer),
            ucat_layer: Layer(self.tuclayer),
        }
    }

    fn table_name(&self, config: &TurnTableConfig) -> String {
        self.table.clone().unwrap_or_else(|| {
            let stem = self
                .output
                .file_stem()
                .map(|s| s.to_string_lossy())
                .unwrap_or_default();
            config.default_table_name(&identifier(&stem))
        })
    }
}

/// `name` with every character outside `[A-Za-z0-9_]` replaced by `_`,
/// prefixed with `_` if it would not start with a letter or underscore.
fn identifier(name: &str) -> String {
    let mut id: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if !id.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_') {
        id.insert(0, '_');
    }
    id
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .target(env_logger::Target::Stderr)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = cli.config();
    config.validate().context("invalid layer or type options")?;

    let input = load_map_csv(&cli.input, cli.snap)
        .with_context(|| format!("reading {}", cli.input.display()))?;
    info!(
        "{}: {} features, {} nodes",
        cli.input.display(),
        input.feature_count(),
        input.node_count()
    );

    let table = cli.table_name(&config);
    let mut sink = open_sink(cli, &table)?;
    let mut output = VectorMap::new();

    let summary = TurnTableBuilder::new(&input, &mut output, &mut *sink)
        .config(config)
        .build()?
        .run(&mut LogProgress::default())
        .with_context(|| format!("building turn table {table}"))?;

    write_map_csv(&cli.output, &output)
        .with_context(|| format!("writing {}", cli.output.display()))?;

    println!("{table}: {summary}");
    Ok(())
}

fn open_sink(cli: &Cli, table: &str) -> Result<Box<dyn TurnTableSink>> {
    if let Some(sink) = open_db_sink(cli, table)? {
        return Ok(sink);
    }

    let path = match &cli.csv {
        Some(path) => path.clone(),
        None => default_csv_path(&cli.output, table),
    };
    let sink = CsvSink::create(&path).with_context(|| format!("creating {}", path.display()))?;
    info!("turn table: {}", path.display());
    Ok(Box::new(sink))
}

#[cfg(feature = "sqlite")]
fn open_db_sink(cli: &Cli, table: &str) -> Result<Option<Box<dyn TurnTableSink>>> {
    let Some(db) = &cli.db else { return Ok(None) };
    let sink = SqliteSink::open(db, table)
        .with_context(|| format!("opening table {table} in {}", db.display()))?;
    info!("turn table: {} / {table}", db.display());
    Ok(Some(Box::new(sink)))
}

#[cfg(not(feature = "sqlite"))]
fn open_db_sink(_cli: &Cli, _table: &str) -> Result<Option<Box<dyn TurnTableSink>>> {
    Ok(None)
}

fn default_csv_path(output: &Path, table: &str) -> PathBuf {
    output.with_file_name(format!("{table}.csv"))
}

//! `tt-output`: turn-table sinks for the turntable workspace.
//!
//! Three backends are provided:
//!
//! | Feature   | Backend     | Destination                                     |
//! |-----------|-------------|-------------------------------------------------|
//! | *(none)*  | Memory      | `Vec<TurnRow>` inside the sink                  |
//! | *(none)*  | CSV         | one file, header `cat,ln_from,ln_to,cost,isec,angle` |
//! | `sqlite`  | SQLite      | a table in an SQLite database                   |
//!
//! All backends implement [`TurnTableSink`], a minimal transactional
//! interface: `begin`, `insert`, `commit`, `rollback`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use tt_output::{SqliteSink, TurnTableSink};
//!
//! let mut sink = SqliteSink::open(Path::new("net.db"), "roads_turntable")?;
//! sink.begin()?;
//! sink.insert(&row)?;
//! sink.commit()?;
//! ```

pub mod csv;
pub mod error;
pub mod memory;
pub mod row;
pub mod sink;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(test)]
mod tests;

pub use csv::CsvSink;
pub use error::{OutputError, OutputResult};
pub use memory::MemorySink;
pub use row::{TurnRow, TURN_TABLE_COLUMNS};
pub use sink::TurnTableSink;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteSink;

//! SQLite output backend (feature `sqlite`).
//!
//! Creates the turn table if it does not exist:
//!
//! ```sql
//! CREATE TABLE <name> (cat integer, ln_from integer, ln_to integer,
//!                      cost double precision, isec integer, angle double precision)
//! ```
//!
//! The transaction is an ordinary SQLite `BEGIN` / `COMMIT`; a sink dropped
//! with a transaction still open rolls it back.

use std::path::Path;

use log::warn;
use rusqlite::Connection;

use crate::sink::TurnTableSink;
use crate::{OutputError, OutputResult, TurnRow};

/// Writes the turn table into an SQLite database.
pub struct SqliteSink {
    conn:   Connection,
    table:  String,
    in_tx:  bool,
}

impl SqliteSink {
    /// Open (or create) the database at `path` and ensure `table` exists.
    ///
    /// Row ids restart at 1 on every pass, so a table that already holds
    /// rows is refused with [`OutputError::TableNotEmpty`].
    pub fn open(path: &Path, table: &str) -> OutputResult<Self> {
        Self::with_connection(Connection::open(path)?, table)
    }

    /// A private in-memory database, mostly for tests.
    pub fn in_memory(table: &str) -> OutputResult<Self> {
        Self::with_connection(Connection::open_in_memory()?, table)
    }

    pub fn with_connection(conn: Connection, table: &str) -> OutputResult<Self> {
        if !is_identifier(table) {
            return Err(OutputError::InvalidTableName(table.to_owned()));
        }
        conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {table} (
                 cat     integer,
                 ln_from integer,
                 ln_to   integer,
                 cost    double precision,
                 isec    integer,
                 angle   double precision
             );"
        ))?;
        let existing: i64 =
            conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))?;
        if existing > 0 {
            return Err(OutputError::TableNotEmpty { table: table.to_owned(), rows: existing });
        }
        Ok(Self { conn, table: table.to_owned(), in_tx: false })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Borrow the connection, e.g. to query the table after a pass.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl TurnTableSink for SqliteSink {
    fn begin(&mut self) -> OutputResult<()> {
        if self.in_tx {
            return Err(OutputError::TransactionOpen);
        }
        self.conn.execute_batch("BEGIN")?;
        self.in_tx = true;
        Ok(())
    }

    fn insert(&mut self, row: &TurnRow) -> OutputResult<()> {
        if !self.in_tx {
            return Err(OutputError::NoTransaction);
        }
        let mut stmt = self.conn.prepare_cached(&format!(
            "INSERT INTO {} (cat, ln_from, ln_to, cost, isec, angle) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            self.table
        ))?;
        stmt.execute(rusqlite::params![
            row.cat,
            row.ln_from,
            row.ln_to,
            row.cost,
            row.isec,
            row.angle,
        ])?;
        Ok(())
    }

    fn commit(&mut self) -> OutputResult<()> {
        if !self.in_tx {
            return Err(OutputError::NoTransaction);
        }
        self.conn.execute_batch("COMMIT")?;
        self.in_tx = false;
        Ok(())
    }

    fn rollback(&mut self) -> OutputResult<()> {
        if !self.in_tx {
            return Ok(());
        }
        self.in_tx = false;
        self.conn.execute_batch("ROLLBACK")?;
        Ok(())
    }
}

impl Drop for SqliteSink {
    fn drop(&mut self) {
        if self.in_tx {
            if let Err(e) = self.conn.execute_batch("ROLLBACK") {
                warn!("rollback of unfinished turn-table transaction failed: {e}");
            }
        }
    }
}

/// `[A-Za-z_][A-Za-z0-9_]*`; the table name is spliced into SQL text.
fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

//! Error types for tt-output.

use thiserror::Error;

/// Errors that can occur when writing turn-table rows.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("no transaction open on the turn-table sink")]
    NoTransaction,

    #[error("a transaction is already open on the turn-table sink")]
    TransactionOpen,

    #[error("invalid table name {0:?}: expected [A-Za-z_][A-Za-z0-9_]*")]
    InvalidTableName(String),

    #[error("turn table {table} already holds {rows} rows")]
    TableNotEmpty { table: String, rows: i64 },

    #[error("sink rejected row {cat}: {reason}")]
    Rejected { cat: i64, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[cfg(feature = "sqlite")]
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Alias for `Result<T, OutputError>`.
pub type OutputResult<T> = Result<T, OutputError>;

//! CSV output backend.
//!
//! Writes one file with a header row in the fixed column order.  Rows are
//! held back until commit, so a rolled-back pass leaves only the header.
//! A `NULL` angle is written as an empty field.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::Writer;
use log::debug;

use crate::row::TURN_TABLE_COLUMNS;
use crate::sink::TurnTableSink;
use crate::{OutputError, OutputResult, TurnRow};

/// Writes the turn table to a CSV file (or any `Write`).
pub struct CsvSink<W: Write = File> {
    writer:  Writer<W>,
    pending: Option<Vec<TurnRow>>,
}

impl CsvSink<File> {
    /// Create (truncating) the file at `path` and write the header row.
    pub fn create(path: &Path) -> OutputResult<Self> {
        Self::from_writer(File::create(path)?)
    }
}

impl<W: Write> CsvSink<W> {
    pub fn from_writer(inner: W) -> OutputResult<Self> {
        let mut writer = Writer::from_writer(inner);
        writer.write_record(TURN_TABLE_COLUMNS)?;
        writer.flush()?;
        Ok(Self { writer, pending: None })
    }

    /// Flush and hand back the underlying writer.
    pub fn into_inner(self) -> OutputResult<W> {
        self.writer
            .into_inner()
            .map_err(|e| OutputError::Io(e.into_error()))
    }
}

impl<W: Write> TurnTableSink for CsvSink<W> {
    fn begin(&mut self) -> OutputResult<()> {
        if self.pending.is_some() {
            return Err(OutputError::TransactionOpen);
        }
        self.pending = Some(Vec::new());
        Ok(())
    }

    fn insert(&mut self, row: &TurnRow) -> OutputResult<()> {
        self.pending
            .as_mut()
            .ok_or(OutputError::NoTransaction)?
            .push(*row);
        Ok(())
    }

    fn commit(&mut self) -> OutputResult<()> {
        let rows = self.pending.take().ok_or(OutputError::NoTransaction)?;
        for row in &rows {
            self.writer.write_record(&[
                row.cat.to_string(),
                row.ln_from.to_string(),
                row.ln_to.to_string(),
                row.cost.to_string(),
                row.isec.to_string(),
                row.angle.map(|a| a.to_string()).unwrap_or_default(),
            ])?;
        }
        self.writer.flush()?;
        debug!("committed {} turn-table rows to CSV", rows.len());
        Ok(())
    }

    fn rollback(&mut self) -> OutputResult<()> {
        self.pending = None;
        Ok(())
    }
}

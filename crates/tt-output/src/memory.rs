//! In-memory backend, used for tests and for callers that post-process rows
//! themselves.

use crate::sink::TurnTableSink;
use crate::{OutputError, OutputResult, TurnRow};

/// Keeps committed rows in a `Vec`.
#[derive(Debug, Default)]
pub struct MemorySink {
    committed: Vec<TurnRow>,
    pending:   Option<Vec<TurnRow>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows made visible by [`commit`](TurnTableSink::commit).
    pub fn rows(&self) -> &[TurnRow] {
        &self.committed
    }

    pub fn in_transaction(&self) -> bool {
        self.pending.is_some()
    }

    pub fn into_rows(self) -> Vec<TurnRow> {
        self.committed
    }
}

impl TurnTableSink for MemorySink {
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
        self.committed.extend(rows);
        Ok(())
    }

    fn rollback(&mut self) -> OutputResult<()> {
        self.pending = None;
        Ok(())
    }
}

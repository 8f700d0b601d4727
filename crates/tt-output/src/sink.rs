//! The `TurnTableSink` trait implemented by all backend sinks.

use crate::{OutputResult, TurnRow};

/// Transactional destination for turn-table rows.
///
/// The turn-table pass opens one transaction, inserts every row, and commits
/// once at the end.  If the pass fails it calls [`rollback`](Self::rollback)
/// and no row of that pass may become visible.
pub trait TurnTableSink {
    /// Open a transaction.  Fails if one is already open.
    fn begin(&mut self) -> OutputResult<()>;

    /// Insert one row.  Fails if no transaction is open.
    fn insert(&mut self, row: &TurnRow) -> OutputResult<()>;

    /// Make every row inserted since [`begin`](Self::begin) visible.
    fn commit(&mut self) -> OutputResult<()>;

    /// Discard every row inserted since [`begin`](Self::begin).
    ///
    /// A no-op when no transaction is open.
    fn rollback(&mut self) -> OutputResult<()>;
}

impl<S: TurnTableSink + ?Sized> TurnTableSink for &mut S {
    fn begin(&mut self) -> OutputResult<()> {
        (**self).begin()
    }

    fn insert(&mut self, row: &TurnRow) -> OutputResult<()> {
        (**self).insert(row)
    }

    fn commit(&mut self) -> OutputResult<()> {
        (**self).commit()
    }

    fn rollback(&mut self) -> OutputResult<()> {
        (**self).rollback()
    }
}

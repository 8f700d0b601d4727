use thiserror::Error;

use tt_core::CoreError;
use tt_output::OutputError;
use tt_vector::VectorError;

#[derive(Debug, Error)]
pub enum TurnTableError {
    #[error("turn-table configuration error: {0}")]
    Config(#[from] CoreError),

    #[error("vector map error: {0}")]
    Vector(#[from] VectorError),

    #[error("turn-table sink error: {0}")]
    Sink(#[from] OutputError),

    #[error("turn-table invariant violated: {0}")]
    Invariant(String),
}

pub type TurnTableResult<T> = Result<T, TurnTableError>;

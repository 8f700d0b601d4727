//! Vector-store error type.

use thiserror::Error;

use tt_core::{CoreError, FeatureId, NodeId};

/// Errors produced by `tt-vector`.
#[derive(Debug, Error)]
pub enum VectorError {
    #[error("feature {0} not found (never written or already rewritten)")]
    FeatureNotFound(FeatureId),

    #[error("node {0} not found in topology")]
    NodeNotFound(NodeId),

    #[error("{0} is not a line feature and has no endpoints")]
    NotALine(FeatureId),

    #[error("feature {0} has no vertices")]
    EmptyGeometry(FeatureId),

    #[error("map parse error: {0}")]
    Parse(String),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type VectorResult<T> = Result<T, VectorError>;

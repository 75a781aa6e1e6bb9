use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errors returned to proof requests.
#[derive(Debug, Error)]
pub(crate) enum ProofServerError {
    #[error("invalid leaf index: {0}")]
    InvalidLeafIndex(String),

    /// Includes requests for leaves the accumulator does not hold yet.
    #[error("failed to generate proof: {0}")]
    ProofGeneration(String),
}

impl ProofServerError {
    pub(crate) fn status(&self) -> StatusCode {
        match self {
            Self::InvalidLeafIndex(_) => StatusCode::BAD_REQUEST,
            Self::ProofGeneration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ProofServerError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Errors raised while loading leaves into the accumulator replica.
#[derive(Debug, Error)]
pub(crate) enum LeafSourceError {
    #[error("failed to read leaves file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed leaf on line {line}: {reason}")]
    MalformedLeaf { line: usize, reason: String },

    #[error("leaves file holds {found} leaves but {known} are already loaded")]
    Truncated { found: u64, known: u64 },

    #[error("leaf {leaf_index} differs from the one already loaded")]
    Diverged { leaf_index: u64 },

    #[error("accumulator error: {0}")]
    Accumulator(String),

    #[error("the replica changed while the refresh was being built")]
    ConcurrentRefresh,
}

/// Errors in an otherwise well-formed configuration file.
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("refresh_interval_ms must be greater than zero")]
    ZeroRefreshInterval,
}

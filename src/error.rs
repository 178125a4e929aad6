use thiserror::Error;

/// Crate-wide error kinds. Each carries the short machine-readable tag
/// returned to REST callers as `{success:false, error:"<tag>"}`.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("not_found: {0}")]
    NotFound(String),

    #[error("out_of_order: {0}")]
    OutOfOrder(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("upstream: {0}")]
    Upstream(#[from] LcuError),

    #[error("persistence: {0}")]
    Persistence(#[from] anyhow::Error),
}

impl OrchestratorError {
    /// The short tag used on the wire.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::OutOfOrder(_) => "out_of_order",
            Self::Conflict(_) => "conflict",
            Self::Unauthorized(_) => "unauthorized",
            Self::Upstream(_) => "upstream",
            Self::Persistence(_) => "persistence",
        }
    }
}

/// LCU gateway failures.
#[derive(Debug, Error, Clone, Copy)]
pub enum LcuError {
    #[error("LCU_UNREACHABLE")]
    Unreachable,
    #[error("LCU_TIMEOUT")]
    Timeout,
    #[error("LCU_BAD_PAYLOAD")]
    BadPayload,
}

pub type Result<T> = std::result::Result<T, OrchestratorError>;

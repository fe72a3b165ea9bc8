//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`DashboardError`] via `#[from]` at the port boundary.

/// Base error type shared by the application core and its ports.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// Client-side validation rejected the input before any IO happened.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// A referenced device or schedule is not known locally.
    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// The hub answered, but reported `success: false`.
    #[error("request rejected by hub")]
    Rejected(#[from] RejectedError),

    /// The request never produced a usable answer (network, HTTP status, decoding).
    #[error("transport error")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl DashboardError {
    /// Wrap any adapter error as a [`DashboardError::Transport`].
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Box::new(err))
    }
}

/// Input rejected by client-side validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A schedule must repeat on at least one weekday.
    #[error("select at least one day")]
    NoDaySelected,

    /// The value is not one of `lamp` / `cooler`.
    #[error("unknown target `{0}`")]
    UnknownTarget(String),

    /// The value is not one of `on` / `off`.
    #[error("unknown relay state `{0}`")]
    UnknownRelayState(String),

    /// The value is not one of `mon` … `sun`.
    #[error("unknown weekday `{0}`")]
    UnknownWeekday(String),
}

/// A device or schedule looked up by key does not exist.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} `{id}` not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// The hub processed the request and answered `{"success": false}`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("hub reported failure for {operation}")]
pub struct RejectedError {
    pub operation: &'static str,
}

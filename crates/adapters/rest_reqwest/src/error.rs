//! REST adapter error types.

use relaydash_domain::error::DashboardError;

/// Errors specific to the REST adapter.
#[derive(Debug, thiserror::Error)]
pub enum RestError {
    /// The configured base URL cannot carry API paths.
    #[error("invalid schedule api url: {0}")]
    InvalidUrl(String),

    /// The request failed before a usable answer arrived (connect, timeout, body).
    #[error("schedule api request failed")]
    Http(#[source] reqwest::Error),

    /// The hub answered with a non-success status.
    #[error("schedule api answered with status {0}")]
    Status(u16),
}

impl From<RestError> for DashboardError {
    fn from(err: RestError) -> Self {
        Self::transport(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_convert_to_transport_error() {
        let err: DashboardError = RestError::Status(500).into();
        assert!(matches!(err, DashboardError::Transport(_)));
    }
}

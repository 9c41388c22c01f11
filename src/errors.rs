use thiserror::Error;

/// Failure taxonomy for the gateway. Only `InvalidInput` ever reaches the
/// caller as an error status; backend failures are absorbed into 200 replies
/// so the widget always has something displayable.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("backend rejected request with status {status}: {body}")]
    BackendRejected {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("backend unreachable: {0}")]
    BackendUnreachable(#[source] reqwest::Error),
}

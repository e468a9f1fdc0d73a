use thiserror::Error;

/// Failures surfaced by a generation call. No variant is retried locally;
/// callers decide what to present and what to log.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// The endpoint answered with a non-success status. Carries the raw
    /// response body for diagnostics.
    #[error("inference endpoint returned status {status}: {body}")]
    Endpoint { status: u16, body: String },

    #[error("inference response body is empty")]
    EmptyResponse,

    /// The body did not parse as JSON, or the JSON did not have the
    /// expected `[{"generated_text": ...}]` shape.
    #[error("malformed inference response: {0}")]
    MalformedResponse(String),

    #[error("generation was cancelled")]
    Cancelled,

    #[error("model has no endpoints configured")]
    NoEndpoint,

    #[error("failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("request signing failed: {0}")]
    Signing(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

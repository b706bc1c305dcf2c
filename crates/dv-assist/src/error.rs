use thiserror::Error;

/// Result type for assist operations.
pub type AssistResult<T> = Result<T, AssistError>;

/// Failures while asking the text-generation service for suggestions.
#[derive(Debug, Error)]
pub enum AssistError {
    /// Transport failure or timeout.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Non-success HTTP status.
    #[error("service returned {status}: {body}")]
    Status { status: u16, body: String },
    /// Response did not have the expected envelope.
    #[error("unexpected response envelope: {0}")]
    Envelope(String),
    /// Candidate text held no usable JSON object.
    #[error("could not parse suggestion: {0}")]
    Parse(String),
    /// Autofill is not configured.
    #[error("autofill is disabled: {0}")]
    Disabled(String),
}

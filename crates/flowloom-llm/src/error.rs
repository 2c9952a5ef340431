use thiserror::Error;

/// Failure modes of the description → workflow pipeline. All of them are
/// terminal for the request; nothing is retried.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("no JSON object found in model output")]
    NoJsonFound,

    #[error("model output is not valid JSON: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),
}

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Failure expanding a route template such as `/pokemon/[id]`.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum RouteError {
    #[error("missing route parameter `{0}`")]
    MissingParam(String),
    #[error("unterminated placeholder in route `{0}`")]
    Unterminated(String),
}

/// Failure talking to the REST API.
///
/// Travels inside actions, so it stays cloneable and serializable; the
/// underlying `reqwest`/`serde_json` errors are flattened to text.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("unexpected status {status} for {url}")]
    Status { status: u16, url: String },
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error(transparent)]
    InvalidRoute(#[from] RouteError),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FetchError::MalformedResponse(err.to_string())
        } else {
            FetchError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::MalformedResponse(err.to_string())
    }
}

/// Failure loading or playing artwork and cries.
#[derive(thiserror::Error, Debug)]
pub enum MediaError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("audio output unavailable: {0}")]
    Output(String),
    #[error("cannot decode media: {0}")]
    Decode(String),
    #[error("playback task failed: {0}")]
    Task(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_error_converts_into_fetch_error() {
        let err: FetchError = RouteError::MissingParam("id".into()).into();
        assert_eq!(err.to_string(), "missing route parameter `id`");
    }

    #[test]
    fn json_errors_are_malformed_responses() {
        let err = serde_json::from_str::<u8>("{").unwrap_err();
        assert!(matches!(
            FetchError::from(err),
            FetchError::MalformedResponse(_)
        ));
    }
}

//! Wire envelope types for the remote API
//!
//! Every successful response is wrapped in `{ "result": ... }`; error bodies
//! carry a `message` field that is surfaced to the user verbatim.

use serde::Deserialize;

/// Uniform success envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpResponse<T> {
    pub result: T,
}

/// Error response body.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub message: Option<String>,
}

/// Paged listing payload carried inside the envelope.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResult<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub total_count: i64,
}

impl<T> Default for PagedResult<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            total_count: 0,
        }
    }
}

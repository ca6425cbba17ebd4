use thiserror::Error;

/// Failures surfaced by the LMS API boundary. A 404 on the report read is not
/// represented here: absence is modeled as `Ok(None)` by the client.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Failed to send request to {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("API request failed with status {status} for URL {url}\nResponse body: {body}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
        body: String,
    },

    #[error("Failed to parse JSON response from {url}. Response body (first 500 chars): {snippet}")]
    Decode {
        url: String,
        snippet: String,
        #[source]
        source: serde_json::Error,
    },
}

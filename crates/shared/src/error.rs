use thiserror::Error;

/// The one message surfaced to users for any failed fetch cycle. The variants
/// below exist for diagnostics only; none of them is distinguished in the UI.
pub const FETCH_FAILURE_MESSAGE: &str = "An error occurred while fetching data.";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("batch request for page {page} failed: {reason}")]
    BatchRequestFailed { page: u32, reason: String },
    #[error("detail request for {name} failed: {reason}")]
    DetailRequestFailed { name: String, reason: String },
    #[error("malformed payload in {context}: {reason}")]
    MalformedPayload { context: String, reason: String },
}

impl FetchError {
    pub fn user_message(&self) -> &'static str {
        FETCH_FAILURE_MESSAGE
    }
}

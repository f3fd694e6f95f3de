use std::time::Duration;

/// Errors from the publishing platform client.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The platform returned a non-2xx status code.
    #[error("Platform API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// A 2xx response whose body lacked the expected identifier.
    #[error("Unexpected platform response: {0}")]
    Decode(String),

    /// The platform did not answer within the configured deadline.
    #[error("Platform call timed out after {}s", .0.as_secs())]
    Timeout(Duration),
}

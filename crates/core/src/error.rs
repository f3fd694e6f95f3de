#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A required request field is absent or empty (`text`, `file`).
    #[error("Missing {0}")]
    MissingField(&'static str),

    #[error("Validation failed: {0}")]
    Validation(String),

    /// The payload was present but could not be decoded (e.g. bad Base64).
    #[error("Invalid encoding: {0}")]
    InvalidEncoding(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

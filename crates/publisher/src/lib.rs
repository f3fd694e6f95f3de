//! Client side of the publishing platform.
//!
//! [`Publisher`] is the seam the HTTP layer depends on; [`twitter::TwitterClient`]
//! is the production implementation. Tests substitute their own.

pub mod error;
pub mod oauth;
pub mod twitter;

use async_trait::async_trait;
use postbridge_core::types::{MediaId, PostId};

pub use error::PublishError;

/// Media handed to [`Publisher::upload_media`].
#[derive(Debug, Clone)]
pub struct MediaUpload {
    /// Name sent with the multipart part (the staged file's name).
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// The two platform operations the gateway consumes.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Upload binary media and return the platform's identifier for it.
    async fn upload_media(&self, media: &MediaUpload) -> Result<MediaId, PublishError>;

    /// Create a post with `text` that references previously uploaded media.
    async fn create_post(&self, text: &str, media_id: &MediaId) -> Result<PostId, PublishError>;
}

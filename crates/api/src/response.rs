//! Success response bodies.
//!
//! Field names (`tweet_id`, `media_id`) and messages are part of the public
//! contract with existing clients.

use postbridge_core::types::{MediaId, PostId};
use serde::Serialize;

pub const POST_CREATED_MESSAGE: &str = "Tweet posted successfully";
pub const MEDIA_UPLOADED_MESSAGE: &str = "Media uploaded successfully";

/// Body returned by `POST /create`.
#[derive(Debug, Serialize)]
pub struct PostCreatedResponse {
    pub message: &'static str,
    pub tweet_id: PostId,
}

impl PostCreatedResponse {
    pub fn new(tweet_id: PostId) -> Self {
        Self {
            message: POST_CREATED_MESSAGE,
            tweet_id,
        }
    }
}

/// Body returned by `POST /media`.
#[derive(Debug, Serialize)]
pub struct MediaUploadedResponse {
    pub message: &'static str,
    pub media_id: MediaId,
}

impl MediaUploadedResponse {
    pub fn new(media_id: MediaId) -> Self {
        Self {
            message: MEDIA_UPLOADED_MESSAGE,
            media_id,
        }
    }
}

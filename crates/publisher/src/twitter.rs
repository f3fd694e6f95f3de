//! Twitter/X implementation of [`Publisher`].
//!
//! Media goes to the v1.1 upload endpoint as multipart; the post is created
//! through the v2 tweets endpoint with a JSON body. Both requests are signed
//! with the user-context OAuth 1.0a credentials.

use async_trait::async_trait;
use postbridge_core::types::{MediaId, PostId};
use serde::Deserialize;

use crate::error::PublishError;
use crate::oauth::OAuthCredentials;
use crate::{MediaUpload, Publisher};

/// Default media upload endpoint.
pub const DEFAULT_UPLOAD_URL: &str = "https://upload.twitter.com/1.1/media/upload.json";

/// Default post creation endpoint.
pub const DEFAULT_TWEET_URL: &str = "https://api.twitter.com/2/tweets";

/// HTTP client for the platform API.
pub struct TwitterClient {
    client: reqwest::Client,
    credentials: OAuthCredentials,
    upload_url: String,
    tweet_url: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    media_id_string: String,
}

#[derive(Debug, Deserialize)]
struct CreateTweetResponse {
    data: CreatedTweet,
}

#[derive(Debug, Deserialize)]
struct CreatedTweet {
    id: String,
}

impl TwitterClient {
    /// Create a client with explicit endpoints, reusing an existing
    /// [`reqwest::Client`].
    pub fn with_endpoints(
        client: reqwest::Client,
        credentials: OAuthCredentials,
        upload_url: String,
        tweet_url: String,
    ) -> Self {
        Self {
            client,
            credentials,
            upload_url,
            tweet_url,
        }
    }

    // ---- private helpers ----

    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, PublishError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(PublishError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, PublishError> {
        let response = Self::ensure_success(response).await?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| PublishError::Decode(format!("{e}: {body}")))
    }
}

#[async_trait]
impl Publisher for TwitterClient {
    async fn upload_media(&self, media: &MediaUpload) -> Result<MediaId, PublishError> {
        let part = reqwest::multipart::Part::bytes(media.bytes.clone())
            .file_name(media.filename.clone())
            .mime_str(&media.content_type)?;
        let form = reqwest::multipart::Form::new().part("media", part);

        let auth = self
            .credentials
            .authorization_header("POST", &self.upload_url, &[]);

        tracing::debug!(
            filename = %media.filename,
            bytes = media.bytes.len(),
            "Uploading media"
        );

        let response = self
            .client
            .post(&self.upload_url)
            .header(reqwest::header::AUTHORIZATION, auth)
            .multipart(form)
            .send()
            .await?;

        let parsed: UploadResponse = Self::parse_response(response).await?;
        Ok(MediaId(parsed.media_id_string))
    }

    async fn create_post(&self, text: &str, media_id: &MediaId) -> Result<PostId, PublishError> {
        let body = serde_json::json!({
            "text": text,
            "media": { "media_ids": [media_id.0] },
        });

        let auth = self
            .credentials
            .authorization_header("POST", &self.tweet_url, &[]);

        tracing::debug!(media_id = %media_id, "Creating post");

        let response = self
            .client
            .post(&self.tweet_url)
            .header(reqwest::header::AUTHORIZATION, auth)
            .json(&body)
            .send()
            .await?;

        let parsed: CreateTweetResponse = Self::parse_response(response).await?;
        Ok(PostId(parsed.data.id))
    }
}

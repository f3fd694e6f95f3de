//! Handlers for post creation and media-only upload.
//!
//! Both run the same pipeline: authenticate, extract, validate, stage,
//! call the platform, remove the staging file, respond. Validation always
//! completes before the staging file is written, and every platform call runs
//! under the configured upstream deadline.

use std::future::Future;
use std::time::Duration;

use axum::extract::State;
use axum::Json;
use postbridge_core::payload::InboundImage;
use postbridge_core::staging::StagedFile;
use postbridge_core::types::MediaId;
use postbridge_publisher::{MediaUpload, PublishError};

use crate::error::{AppError, AppResult};
use crate::extract::PostSubmission;
use crate::middleware::api_key::RequireApiKey;
use crate::response::{MediaUploadedResponse, PostCreatedResponse};
use crate::state::AppState;

/// POST /create
///
/// Upload the image, then create a post with the caption referencing it.
/// If post creation fails after a successful upload, the media stays on the
/// platform; nothing is rolled back.
pub async fn create_post(
    State(state): State<AppState>,
    _key: RequireApiKey,
    PostSubmission(post): PostSubmission,
) -> AppResult<Json<PostCreatedResponse>> {
    let encoding = post.encoding;
    let caption = post.caption()?.to_string();
    let image = post.into_image(&state.config.upload_policy)?;

    let staged = state.staging.stage(&image).await?;
    tracing::debug!(
        encoding = encoding.as_str(),
        bytes = image.len(),
        path = %staged.path().display(),
        "Staged inbound image"
    );

    let outcome = async {
        let media_id = upload_staged(&state, &staged, &image).await?;
        let post_id = with_deadline(&state, state.publisher.create_post(&caption, &media_id))
            .await
            .inspect_err(|e| {
                tracing::warn!(
                    media_id = %media_id,
                    error = %e,
                    "Post creation failed after media upload; media left on platform"
                );
            })?;
        Ok::<_, AppError>((media_id, post_id))
    }
    .await;

    discard(staged).await;

    let (media_id, post_id) = outcome?;
    tracing::info!(media_id = %media_id, post_id = %post_id, "Post published");

    Ok(Json(PostCreatedResponse::new(post_id)))
}

/// POST /media
///
/// Upload the image without creating a post. A caption, if sent, is ignored.
pub async fn upload_media(
    State(state): State<AppState>,
    _key: RequireApiKey,
    PostSubmission(post): PostSubmission,
) -> AppResult<Json<MediaUploadedResponse>> {
    let encoding = post.encoding;
    let image = post.into_image(&state.config.upload_policy)?;

    let staged = state.staging.stage(&image).await?;
    tracing::debug!(
        encoding = encoding.as_str(),
        bytes = image.len(),
        path = %staged.path().display(),
        "Staged inbound image"
    );

    let outcome = upload_staged(&state, &staged, &image).await;
    discard(staged).await;

    let media_id = outcome?;
    tracing::info!(media_id = %media_id, "Media uploaded");

    Ok(Json(MediaUploadedResponse::new(media_id)))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Send the staged file's contents to the platform.
async fn upload_staged(
    state: &AppState,
    staged: &StagedFile,
    image: &InboundImage,
) -> AppResult<MediaId> {
    let bytes = staged
        .read()
        .await
        .map_err(|e| AppError::InternalError(format!("failed to read staging file: {e}")))?;

    let upload = MediaUpload {
        filename: staged.file_name().to_string(),
        content_type: image.content_type().to_string(),
        bytes,
    };

    Ok(with_deadline(state, state.publisher.upload_media(&upload)).await?)
}

/// Bound a platform call by `upstream_timeout_secs`.
async fn with_deadline<T, F>(state: &AppState, call: F) -> Result<T, PublishError>
where
    F: Future<Output = Result<T, PublishError>>,
{
    let limit = Duration::from_secs(state.config.upstream_timeout_secs);
    tokio::time::timeout(limit, call)
        .await
        .map_err(|_| PublishError::Timeout(limit))?
}

/// Remove the staging file. Failures are logged, never surfaced.
async fn discard(staged: StagedFile) {
    let path = staged.path().to_path_buf();
    if let Err(e) = staged.remove().await {
        tracing::warn!(path = %path.display(), error = %e, "Failed to remove staging file");
    }
}

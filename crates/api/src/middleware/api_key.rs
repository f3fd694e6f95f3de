//! Shared-secret authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use postbridge_core::error::CoreError;

use crate::auth::API_KEY_HEADER;
use crate::error::AppError;
use crate::state::AppState;

/// Proof that the request carried the configured API key.
///
/// Declare it before any body extractor so unauthenticated requests are
/// rejected without reading the body:
///
/// ```ignore
/// async fn my_handler(State(state): State<AppState>, _key: RequireApiKey) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RequireApiKey;

impl FromRequestParts<AppState> for RequireApiKey {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let presented = parts
            .headers
            .get(API_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                tracing::warn!(uri = %parts.uri, "Request without API key");
                AppError::Core(CoreError::Unauthorized("Missing X-API-KEY header".into()))
            })?;

        if !state.config.api_key.verify(presented) {
            tracing::warn!(uri = %parts.uri, "Request with invalid API key");
            return Err(AppError::Core(CoreError::Unauthorized(
                "Invalid API key".into(),
            )));
        }

        Ok(RequireApiKey)
    }
}

use axum::routing::post;
use axum::Router;

use crate::handlers::posts;
use crate::state::AppState;

/// Post submission routes. Both require `X-API-KEY`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(posts::create_post))
        .route("/media", post(posts::upload_media))
}

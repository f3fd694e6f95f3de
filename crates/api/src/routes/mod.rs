pub mod health;
pub mod posts;

use axum::Router;

use crate::state::AppState;

/// Build the authenticated API route tree.
///
/// Route hierarchy:
///
/// ```text
/// /create                                          upload media + create post (POST)
/// /media                                           upload media only (POST)
/// ```
///
/// `/health` is mounted separately via [`health::router`].
pub fn api_routes() -> Router<AppState> {
    Router::new().merge(posts::router())
}

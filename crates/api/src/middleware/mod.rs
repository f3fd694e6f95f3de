//! Request guards implemented as Axum extractors.
//!
//! - [`api_key::RequireApiKey`] -- Requires a valid `X-API-KEY` header.

pub mod api_key;

//! Post submission extractor.
//!
//! Inspects `Content-Type` once, picks a [`PayloadEncoding`], and reads the
//! body with the matching Axum extractor. Every path yields the same
//! [`IncomingPost`]; decoding and validation happen later in
//! `postbridge_core::payload`.

use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use axum::{Form, Json};
use postbridge_core::payload::{IncomingPost, PayloadEncoding, RawPayload};
use serde::Deserialize;

use crate::error::AppError;

/// Multipart field holding the image.
pub const FILE_FIELD: &str = "file";
/// Field holding the caption.
pub const TEXT_FIELD: &str = "text";
/// Optional field naming the image when the encoding has no filename slot.
pub const FILENAME_FIELD: &str = "filename";

/// A post submission in any supported encoding.
#[derive(Debug)]
pub struct PostSubmission(pub IncomingPost);

/// Field layout shared by the form-encoded and JSON bodies. Only the
/// interpretation of `file` differs (Latin-1 string vs. Base64).
#[derive(Debug, Deserialize)]
struct SubmissionFields {
    text: Option<String>,
    file: Option<String>,
    filename: Option<String>,
}

impl<S> FromRequest<S> for PostSubmission
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        let encoding = PayloadEncoding::from_content_type(&content_type).ok_or_else(|| {
            AppError::BadRequest(format!(
                "Unsupported content type '{content_type}'. Expected multipart/form-data, \
                 application/x-www-form-urlencoded or application/json"
            ))
        })?;

        let post = match encoding {
            PayloadEncoding::Multipart => {
                let multipart = Multipart::from_request(req, state)
                    .await
                    .map_err(|e| AppError::from_rejection(e.status(), e.body_text()))?;
                read_multipart(multipart).await?
            }
            PayloadEncoding::FormEncodedBytes => {
                let Form(body) = Form::<SubmissionFields>::from_request(req, state)
                    .await
                    .map_err(|e| AppError::from_rejection(e.status(), e.body_text()))?;
                IncomingPost {
                    encoding,
                    text: body.text,
                    payload: body.file.map(RawPayload::Latin1),
                    filename: body.filename,
                }
            }
            PayloadEncoding::Base64Json => {
                let Json(body) = Json::<SubmissionFields>::from_request(req, state)
                    .await
                    .map_err(|e| AppError::from_rejection(e.status(), e.body_text()))?;
                IncomingPost {
                    encoding,
                    text: body.text,
                    payload: body.file.map(RawPayload::Base64),
                    filename: body.filename,
                }
            }
        };

        Ok(PostSubmission(post))
    }
}

/// Collect `file`, `text` and `filename` from a multipart stream.
///
/// The file part's own filename wins over a separate `filename` field.
/// Unknown fields are skipped.
async fn read_multipart(mut multipart: Multipart) -> Result<IncomingPost, AppError> {
    let mut post = IncomingPost::new(PayloadEncoding::Multipart);
    let mut part_filename: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::from_rejection(e.status(), e.body_text()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            FILE_FIELD => {
                part_filename = field.file_name().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::from_rejection(e.status(), e.body_text()))?;
                post.payload = Some(RawPayload::Bytes(data.to_vec()));
            }
            TEXT_FIELD => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::from_rejection(e.status(), e.body_text()))?;
                post.text = Some(text);
            }
            FILENAME_FIELD => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::from_rejection(e.status(), e.body_text()))?;
                post.filename = Some(text);
            }
            _ => {} // ignore unknown fields
        }
    }

    if part_filename.is_some() {
        post.filename = part_filename;
    }
    Ok(post)
}

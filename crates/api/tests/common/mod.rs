#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use postbridge_api::auth::ApiKey;
use postbridge_api::config::{PlatformConfig, ServerConfig};
use postbridge_api::router::build_app_router;
use postbridge_api::state::AppState;
use postbridge_core::types::{MediaId, PostId};
use postbridge_core::validation::UploadPolicy;
use postbridge_publisher::oauth::OAuthCredentials;
use postbridge_publisher::{MediaUpload, PublishError, Publisher};
use tower::ServiceExt;

pub const TEST_API_KEY: &str = "test-api-key";
pub const BOUNDARY: &str = "postbridge-test-boundary";

/// Bytes that start with the JPEG SOI marker.
pub const JPEG_BYTES: &[u8] = b"\xff\xd8\xff\xe0\0\x10JFIFtest data";

/// Build a test `ServerConfig` that stages files into `upload_dir`.
pub fn test_config(upload_dir: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        request_timeout_secs: 30,
        upstream_timeout_secs: 30,
        max_upload_bytes: 1024 * 1024,
        api_key: ApiKey::new(TEST_API_KEY),
        upload_dir: upload_dir.to_path_buf(),
        upload_policy: UploadPolicy::new(["png", "jpg", "jpeg", "gif"]),
        platform: PlatformConfig {
            credentials: OAuthCredentials {
                consumer_key: "ck".into(),
                consumer_secret: "cs".into(),
                access_token: "at".into(),
                access_token_secret: "ats".into(),
            },
            upload_url: "http://127.0.0.1:9/upload".into(),
            tweet_url: "http://127.0.0.1:9/tweets".into(),
        },
    }
}

// ---------------------------------------------------------------------------
// Mock publisher
// ---------------------------------------------------------------------------

/// A call the mock publisher received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    UploadMedia { content_type: String, bytes: Vec<u8> },
    CreatePost { text: String, media_id: String },
}

/// Records calls and answers with fixed ids, fails on demand, or stalls.
#[derive(Default)]
pub struct MockPublisher {
    pub media_id: String,
    pub post_id: String,
    pub fail_upload: bool,
    pub fail_post: bool,
    /// How long `upload_media` sleeps before answering.
    pub upload_delay: Option<Duration>,
    calls: Mutex<Vec<Call>>,
}

impl MockPublisher {
    pub fn new(media_id: &str, post_id: &str) -> Self {
        Self {
            media_id: media_id.to_string(),
            post_id: post_id.to_string(),
            ..Self::default()
        }
    }

    pub fn failing_upload() -> Self {
        Self {
            fail_upload: true,
            ..Self::new("unused", "unused")
        }
    }

    pub fn failing_post(media_id: &str) -> Self {
        Self {
            fail_post: true,
            ..Self::new(media_id, "unused")
        }
    }

    /// An upload that stalls far beyond any test timeout.
    pub fn hanging_upload() -> Self {
        Self {
            upload_delay: Some(Duration::from_secs(5)),
            ..Self::new("late", "late")
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Publisher for MockPublisher {
    async fn upload_media(&self, media: &MediaUpload) -> Result<MediaId, PublishError> {
        self.calls.lock().unwrap().push(Call::UploadMedia {
            content_type: media.content_type.clone(),
            bytes: media.bytes.clone(),
        });
        if let Some(delay) = self.upload_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_upload {
            return Err(PublishError::Api {
                status: 403,
                body: "media upload forbidden".into(),
            });
        }
        Ok(MediaId(self.media_id.clone()))
    }

    async fn create_post(&self, text: &str, media_id: &MediaId) -> Result<PostId, PublishError> {
        self.calls.lock().unwrap().push(Call::CreatePost {
            text: text.to_string(),
            media_id: media_id.0.clone(),
        });
        if self.fail_post {
            return Err(PublishError::Api {
                status: 429,
                body: "rate limit exceeded".into(),
            });
        }
        Ok(PostId(self.post_id.clone()))
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Everything a test needs: the router, the mock, and the staging dir
/// (kept alive for the test's duration).
pub struct TestApp {
    pub router: Router,
    pub publisher: Arc<MockPublisher>,
    pub upload_dir: tempfile::TempDir,
}

impl TestApp {
    pub fn new(publisher: MockPublisher) -> Self {
        Self::with_config(publisher, |_| {})
    }

    /// Like [`TestApp::new`], with a chance to adjust the config first.
    pub fn with_config(publisher: MockPublisher, adjust: impl FnOnce(&mut ServerConfig)) -> Self {
        let upload_dir = tempfile::tempdir().expect("tempdir should be creatable");
        let publisher = Arc::new(publisher);
        let mut config = test_config(upload_dir.path());
        adjust(&mut config);
        let state = AppState::new(config, Arc::clone(&publisher) as Arc<dyn Publisher>);
        Self {
            router: build_app_router(state),
            publisher,
            upload_dir,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Number of entries left in the staging directory.
    pub fn staged_files(&self) -> usize {
        std::fs::read_dir(self.upload_dir.path()).unwrap().count()
    }
}

// ---------------------------------------------------------------------------
// Request builders
// ---------------------------------------------------------------------------

/// A part of a hand-built multipart body.
pub enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        name: &'a str,
        filename: &'a str,
        content_type: &'a str,
        bytes: &'a [u8],
    },
}

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                name,
                filename,
                content_type,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                         Content-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn multipart_request(uri: &str, api_key: Option<&str>, parts: &[Part<'_>]) -> Request<Body> {
    request(
        uri,
        api_key,
        &format!("multipart/form-data; boundary={BOUNDARY}"),
        multipart_body(parts),
    )
}

pub fn json_request(uri: &str, api_key: Option<&str>, body: serde_json::Value) -> Request<Body> {
    request(
        uri,
        api_key,
        "application/json",
        serde_json::to_vec(&body).unwrap(),
    )
}

/// `pairs` are percent-encoded here; pass raw values.
pub fn form_request(uri: &str, api_key: Option<&str>, pairs: &[(&str, &str)]) -> Request<Body> {
    let body = pairs
        .iter()
        .map(|(k, v)| format!("{}={}", form_encode(k), form_encode(v)))
        .collect::<Vec<_>>()
        .join("&");
    request(
        uri,
        api_key,
        "application/x-www-form-urlencoded",
        body.into_bytes(),
    )
}

pub fn request(
    uri: &str,
    api_key: Option<&str>,
    content_type: &str,
    body: Vec<u8>,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", content_type);
    if let Some(key) = api_key {
        builder = builder.header("x-api-key", key);
    }
    builder.body(Body::from(body)).unwrap()
}

/// Percent-encode every byte outside the unreserved set.
fn form_encode(s: &str) -> String {
    s.bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                (b as char).to_string()
            }
            _ => format!("%{b:02X}"),
        })
        .collect()
}

pub async fn get(router: Router, uri: &str) -> Response {
    router
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn expect_status(response: Response, status: StatusCode) -> serde_json::Value {
    assert_eq!(response.status(), status);
    body_json(response).await
}

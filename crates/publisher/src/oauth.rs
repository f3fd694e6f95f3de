//! OAuth 1.0a request signing (HMAC-SHA1), as required by the platform's
//! user-context endpoints.
//!
//! Only query/form parameters take part in the signature. Multipart and JSON
//! bodies are never signed.

use std::fmt;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use hmac::{Hmac, Mac};
use rand::Rng;
use sha1::Sha1;

type HmacSha1 = Hmac<Sha1>;

/// Length of the random nonce sent with each request.
pub const NONCE_LENGTH: usize = 32;

const SIGNATURE_METHOD: &str = "HMAC-SHA1";
const OAUTH_VERSION: &str = "1.0";

/// User-context credentials for the platform API.
#[derive(Clone)]
pub struct OAuthCredentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_token: String,
    pub access_token_secret: String,
}

impl fmt::Debug for OAuthCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthCredentials")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"[REDACTED]")
            .field("access_token", &self.access_token)
            .field("access_token_secret", &"[REDACTED]")
            .finish()
    }
}

impl OAuthCredentials {
    /// Build an `Authorization` header value with a fresh nonce and the
    /// current timestamp.
    pub fn authorization_header(&self, method: &str, url: &str, params: &[(&str, &str)]) -> String {
        let nonce: String = rand::rng()
            .sample_iter(&rand::distr::Alphanumeric)
            .take(NONCE_LENGTH)
            .map(char::from)
            .collect();
        let timestamp = chrono::Utc::now().timestamp().to_string();
        self.authorization_header_with(method, url, params, &nonce, &timestamp)
    }

    /// Deterministic variant of [`authorization_header`](Self::authorization_header).
    pub fn authorization_header_with(
        &self,
        method: &str,
        url: &str,
        params: &[(&str, &str)],
        nonce: &str,
        timestamp: &str,
    ) -> String {
        let mut oauth_params = vec![
            ("oauth_consumer_key", self.consumer_key.as_str()),
            ("oauth_nonce", nonce),
            ("oauth_signature_method", SIGNATURE_METHOD),
            ("oauth_timestamp", timestamp),
            ("oauth_token", self.access_token.as_str()),
            ("oauth_version", OAUTH_VERSION),
        ];

        let mut all_params = oauth_params.clone();
        all_params.extend_from_slice(params);
        let base = signature_base_string(method, url, &all_params);
        let signature = sign(&base, &self.consumer_secret, &self.access_token_secret);

        oauth_params.push(("oauth_signature", signature.as_str()));
        oauth_params.sort_by(|a, b| a.0.cmp(b.0));

        let fields: Vec<String> = oauth_params
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", percent_encode(k), percent_encode(v)))
            .collect();
        format!("OAuth {}", fields.join(", "))
    }
}

/// RFC 3986 percent-encoding: everything but `A-Z a-z 0-9 - . _ ~`.
pub fn percent_encode(s: &str) -> String {
    urlencoding::encode(s).into_owned()
}

/// `METHOD&enc(url)&enc(sorted, encoded params)`.
pub fn signature_base_string(method: &str, url: &str, params: &[(&str, &str)]) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (percent_encode(k), percent_encode(v)))
        .collect();
    encoded.sort();

    let param_string = encoded
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method.to_ascii_uppercase(),
        percent_encode(url),
        percent_encode(&param_string)
    )
}

/// Base64 HMAC-SHA1 of `base` keyed with `enc(consumer_secret)&enc(token_secret)`.
pub fn sign(base: &str, consumer_secret: &str, token_secret: &str) -> String {
    let key = format!(
        "{}&{}",
        percent_encode(consumer_secret),
        percent_encode(token_secret)
    );
    let mut mac = HmacSha1::new_from_slice(key.as_bytes()).expect("HMAC accepts any key length");
    mac.update(base.as_bytes());
    BASE64.encode(mac.finalize().into_bytes())
}

use std::path::PathBuf;

use postbridge_core::validation::UploadPolicy;
use postbridge_publisher::oauth::OAuthCredentials;
use postbridge_publisher::twitter::{DEFAULT_TWEET_URL, DEFAULT_UPLOAD_URL};

use crate::auth::ApiKey;

/// Default request body limit (5 MiB, the platform's still-image limit).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Errors raised while loading [`ServerConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set in the environment")]
    Missing(&'static str),

    #[error("{name} must be {expected}, got '{value}'")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Platform endpoint and credential settings.
#[derive(Debug, Clone)]
pub struct PlatformConfig {
    pub credentials: OAuthCredentials,
    pub upload_url: String,
    pub tweet_url: String,
}

/// Server configuration, built once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `5000`).
    pub port: u16,
    /// Whole-request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Deadline for each publishing platform call in seconds (default: `20`).
    pub upstream_timeout_secs: u64,
    /// Maximum accepted request body size in bytes.
    pub max_upload_bytes: usize,
    /// Shared secret expected in the `X-API-KEY` header.
    pub api_key: ApiKey,
    /// Directory staging files are written into.
    pub upload_dir: PathBuf,
    /// Extension allow-list applied to client filenames.
    pub upload_policy: UploadPolicy,
    pub platform: PlatformConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                                           |
    /// |------------------------|---------------------------------------------------|
    /// | `HOST`                 | `0.0.0.0`                                         |
    /// | `PORT`                 | `5000`                                            |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                                              |
    /// | `UPSTREAM_TIMEOUT_SECS`| `20`                                              |
    /// | `MAX_UPLOAD_BYTES`     | `5242880`                                         |
    /// | `API_KEY`              | required                                          |
    /// | `UPLOAD_FOLDER`        | `uploads`                                         |
    /// | `ALLOWED_EXTENSIONS`   | `png,jpg,jpeg,gif`                                |
    /// | `CONSUMER_KEY`         | required                                          |
    /// | `CONSUMER_SECRET`      | required                                          |
    /// | `ACCESS_TOKEN`         | required                                          |
    /// | `ACCESS_TOKEN_SECRET`  | required                                          |
    /// | `TWITTER_UPLOAD_URL`   | `https://upload.twitter.com/1.1/media/upload.json` |
    /// | `TWITTER_TWEET_URL`    | `https://api.twitter.com/2/tweets`                |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let required = |name: &'static str| get(name).ok_or(ConfigError::Missing(name));

        let host = get("HOST").unwrap_or_else(|| "0.0.0.0".into());

        let port: u16 = parse_or("PORT", get("PORT"), 5000, "a valid u16")?;

        let request_timeout_secs: u64 = parse_or(
            "REQUEST_TIMEOUT_SECS",
            get("REQUEST_TIMEOUT_SECS"),
            30,
            "a valid u64",
        )?;

        let upstream_timeout_secs: u64 = parse_or(
            "UPSTREAM_TIMEOUT_SECS",
            get("UPSTREAM_TIMEOUT_SECS"),
            20,
            "a valid u64",
        )?;

        let max_upload_bytes: usize = parse_or(
            "MAX_UPLOAD_BYTES",
            get("MAX_UPLOAD_BYTES"),
            DEFAULT_MAX_UPLOAD_BYTES,
            "a valid byte count",
        )?;

        let api_key = ApiKey::new(&required("API_KEY")?);

        let upload_dir = PathBuf::from(get("UPLOAD_FOLDER").unwrap_or_else(|| "uploads".into()));

        let upload_policy = match get("ALLOWED_EXTENSIONS") {
            Some(raw) => UploadPolicy::new(raw.split(',')),
            None => UploadPolicy::default(),
        };
        if upload_policy.allowed_extensions().is_empty() {
            return Err(ConfigError::Invalid {
                name: "ALLOWED_EXTENSIONS",
                expected: "a non-empty comma-separated list",
                value: lookup("ALLOWED_EXTENSIONS").unwrap_or_default(),
            });
        }

        let platform = PlatformConfig {
            credentials: OAuthCredentials {
                consumer_key: required("CONSUMER_KEY")?,
                consumer_secret: required("CONSUMER_SECRET")?,
                access_token: required("ACCESS_TOKEN")?,
                access_token_secret: required("ACCESS_TOKEN_SECRET")?,
            },
            upload_url: get("TWITTER_UPLOAD_URL").unwrap_or_else(|| DEFAULT_UPLOAD_URL.into()),
            tweet_url: get("TWITTER_TWEET_URL").unwrap_or_else(|| DEFAULT_TWEET_URL.into()),
        };

        Ok(Self {
            host,
            port,
            request_timeout_secs,
            upstream_timeout_secs,
            max_upload_bytes,
            api_key,
            upload_dir,
            upload_policy,
            platform,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    name: &'static str,
    raw: Option<String>,
    default: T,
    expected: &'static str,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            name,
            expected,
            value,
        }),
    }
}

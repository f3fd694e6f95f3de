//! Inbound payload normalization.
//!
//! A post can arrive in three wire encodings. The HTTP layer picks the
//! [`PayloadEncoding`] once from the request's content type, collects the raw
//! fields into an [`IncomingPost`], and this module turns that into a single
//! [`InboundImage`] byte buffer.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::error::CoreError;
use crate::validation::{require_caption, UploadPolicy};

/// Extension used for staged files whose format could not be determined.
pub const FALLBACK_EXTENSION: &str = "bin";

/// Content type sent upstream when the image format is unknown.
pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

// ---------------------------------------------------------------------------
// Encoding selection
// ---------------------------------------------------------------------------

/// Wire encodings a post submission may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadEncoding {
    /// `multipart/form-data` with a `file` part and a `text` field.
    Multipart,
    /// `application/x-www-form-urlencoded` where `file` holds the image as a
    /// one-byte-per-character string. Lossy for arbitrary binaries; kept only
    /// as a fallback for clients that cannot send multipart.
    FormEncodedBytes,
    /// `application/json` with `text` and a Base64 `file` field.
    Base64Json,
}

impl PayloadEncoding {
    /// Select the encoding from a `Content-Type` header value.
    ///
    /// Parameters (`boundary=`, `charset=`) are ignored and the essence is
    /// matched case-insensitively. Returns `None` for anything unsupported.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match essence.as_str() {
            "multipart/form-data" => Some(Self::Multipart),
            "application/x-www-form-urlencoded" => Some(Self::FormEncodedBytes),
            "application/json" => Some(Self::Base64Json),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Multipart => "multipart",
            Self::FormEncodedBytes => "form_encoded_bytes",
            Self::Base64Json => "base64_json",
        }
    }
}

// ---------------------------------------------------------------------------
// Raw payload
// ---------------------------------------------------------------------------

/// The `file` field exactly as it was found on the wire, not yet decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawPayload {
    Bytes(Vec<u8>),
    Latin1(String),
    Base64(String),
}

impl RawPayload {
    fn is_empty(&self) -> bool {
        match self {
            Self::Bytes(b) => b.is_empty(),
            Self::Latin1(s) | Self::Base64(s) => s.is_empty(),
        }
    }

    /// Decode into raw image bytes.
    pub fn decode(self) -> Result<Vec<u8>, CoreError> {
        match self {
            Self::Bytes(bytes) => Ok(bytes),
            Self::Latin1(s) => decode_latin1(&s),
            Self::Base64(s) => decode_base64(&s),
        }
    }
}

/// Map each character to the byte with the same code point.
///
/// Characters above U+00FF have no single-byte representation and are
/// rejected rather than silently truncated.
pub fn decode_latin1(s: &str) -> Result<Vec<u8>, CoreError> {
    s.chars()
        .map(|c| {
            u8::try_from(u32::from(c)).map_err(|_| {
                CoreError::Validation(format!(
                    "File string contains character U+{:04X} outside the single-byte range",
                    u32::from(c)
                ))
            })
        })
        .collect()
}

/// Strict standard-alphabet Base64 with canonical padding.
pub fn decode_base64(s: &str) -> Result<Vec<u8>, CoreError> {
    BASE64
        .decode(s)
        .map_err(|e| CoreError::InvalidEncoding(format!("file is not valid base64: {e}")))
}

// ---------------------------------------------------------------------------
// Incoming post
// ---------------------------------------------------------------------------

/// The fields of a post submission, independent of wire encoding.
#[derive(Debug, Clone)]
pub struct IncomingPost {
    pub encoding: PayloadEncoding,
    pub text: Option<String>,
    pub payload: Option<RawPayload>,
    /// Client-supplied filename, if any. Only used for the extension check.
    pub filename: Option<String>,
}

impl IncomingPost {
    pub fn new(encoding: PayloadEncoding) -> Self {
        Self {
            encoding,
            text: None,
            payload: None,
            filename: None,
        }
    }

    /// The caption, required to be present and non-blank.
    pub fn caption(&self) -> Result<&str, CoreError> {
        require_caption(self.text.as_deref())
    }

    /// Validate and decode the image payload.
    ///
    /// Checks run in a fixed order: presence, filename extension, then
    /// decoding. An empty payload counts as missing.
    pub fn into_image(self, policy: &UploadPolicy) -> Result<InboundImage, CoreError> {
        let payload = self
            .payload
            .filter(|p| !p.is_empty())
            .ok_or(CoreError::MissingField("file"))?;

        let extension = match self.filename.as_deref().filter(|f| !f.is_empty()) {
            Some(name) => Some(policy.check_filename(name)?),
            None => None,
        };

        let image = InboundImage {
            bytes: payload.decode()?,
            extension,
        };
        if image.is_empty() {
            return Err(CoreError::MissingField("file"));
        }

        Ok(image)
    }
}

// ---------------------------------------------------------------------------
// Normalized image
// ---------------------------------------------------------------------------

/// A decoded image ready to be staged and uploaded.
#[derive(Debug, Clone)]
pub struct InboundImage {
    pub bytes: Vec<u8>,
    /// Lowercased extension from a validated client filename.
    pub extension: Option<String>,
}

impl InboundImage {
    /// Image format detected from magic bytes, if recognizable.
    pub fn sniffed_format(&self) -> Option<image::ImageFormat> {
        image::guess_format(&self.bytes).ok()
    }

    /// Extension for the staged file: the client's extension if validated,
    /// otherwise the sniffed format's, otherwise [`FALLBACK_EXTENSION`].
    pub fn staging_extension(&self) -> String {
        if let Some(ext) = &self.extension {
            return ext.clone();
        }
        self.sniffed_format()
            .and_then(|f| f.extensions_str().first().copied())
            .unwrap_or(FALLBACK_EXTENSION)
            .to_string()
    }

    /// MIME type to declare upstream.
    pub fn content_type(&self) -> &'static str {
        self.sniffed_format()
            .map(|f| f.to_mime_type())
            .unwrap_or(FALLBACK_CONTENT_TYPE)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

//! Caption and filename validation rules.
//!
//! All checks here run before any file I/O or upstream call, so a rejected
//! request never touches the staging directory.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Image extensions accepted when no allow-list is configured.
pub const DEFAULT_ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif"];

// ---------------------------------------------------------------------------
// Caption
// ---------------------------------------------------------------------------

/// Require a caption that is present and not blank.
///
/// Returns the caption unmodified; surrounding whitespace is only ignored for
/// the emptiness check.
pub fn require_caption(text: Option<&str>) -> Result<&str, CoreError> {
    match text {
        Some(t) if !t.trim().is_empty() => Ok(t),
        _ => Err(CoreError::MissingField("text")),
    }
}

// ---------------------------------------------------------------------------
// Upload policy
// ---------------------------------------------------------------------------

/// Filename rules applied to client-supplied image names.
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    allowed_extensions: Vec<String>,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_ALLOWED_EXTENSIONS.iter().copied())
    }
}

impl UploadPolicy {
    /// Build a policy from an extension allow-list. Entries are lowercased and
    /// a leading dot is tolerated (`".PNG"` and `"png"` are equivalent).
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let allowed_extensions = extensions
            .into_iter()
            .map(|e| e.as_ref().trim().trim_start_matches('.').to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        Self { allowed_extensions }
    }

    pub fn allowed_extensions(&self) -> &[String] {
        &self.allowed_extensions
    }

    /// Check `filename` against the allow-list, case-insensitively.
    ///
    /// Returns the lowercased extension on success. A name without an
    /// extension is rejected.
    pub fn check_filename(&self, filename: &str) -> Result<String, CoreError> {
        let ext = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .filter(|ext| !ext.is_empty())
            .ok_or_else(|| {
                CoreError::Validation(format!("File '{filename}' has no extension"))
            })?;

        if self.allowed_extensions.iter().any(|a| *a == ext) {
            Ok(ext)
        } else {
            Err(CoreError::Validation(format!(
                "Unsupported file type '.{ext}'. Allowed: {}",
                self.allowed_extensions.join(", ")
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn caption_must_be_present_and_not_blank() {
        assert_matches!(require_caption(None), Err(CoreError::MissingField("text")));
        assert_matches!(
            require_caption(Some("   ")),
            Err(CoreError::MissingField("text"))
        );
        assert_eq!(require_caption(Some(" hi ")).unwrap(), " hi ");
    }

    #[test]
    fn extension_check_is_case_insensitive() {
        let policy = UploadPolicy::default();
        assert_eq!(policy.check_filename("photo.JPG").unwrap(), "jpg");
        assert_eq!(policy.check_filename("a.b.Png").unwrap(), "png");
    }

    #[test]
    fn disallowed_or_missing_extension_is_rejected() {
        let policy = UploadPolicy::default();
        assert_matches!(policy.check_filename("doc.pdf"), Err(CoreError::Validation(_)));
        assert_matches!(policy.check_filename("noext"), Err(CoreError::Validation(_)));
        assert_matches!(policy.check_filename("trailing."), Err(CoreError::Validation(_)));
    }

    #[test]
    fn configured_list_is_normalized() {
        let policy = UploadPolicy::new([" .WEBP ", "", "png"]);
        assert_eq!(policy.allowed_extensions(), ["webp", "png"]);
        assert!(policy.check_filename("x.webp").is_ok());
        assert!(policy.check_filename("x.gif").is_err());
    }
}

//! Invoice Documents
//!
//! The document kinds the verification service accepts, the in-memory
//! representation of a file selected for upload, and the summary shape the
//! service returns when listing previously processed invoices.

use serde::{Deserialize, Serialize};

/// Document kinds accepted for upload.
///
/// Anything outside this set is rejected locally, before any network call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Pdf,
    Png,
    Jpeg,
}

impl DocumentKind {
    /// Maps a declared MIME type onto an accepted kind.
    ///
    /// Returns `None` for anything outside the accepted set. `image/jpg` is
    /// tolerated as a common mislabeling of `image/jpeg`.
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "application/pdf" => Some(Self::Pdf),
            "image/png" => Some(Self::Png),
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            _ => None,
        }
    }

    /// Maps a file extension (without the dot) onto an accepted kind.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim().to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            _ => None,
        }
    }

    /// The canonical MIME type for this kind.
    pub fn mime(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }

    /// Short lowercase name ("pdf", "png", "jpeg").
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Png => "png",
            Self::Jpeg => "jpeg",
        }
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A document selected for upload.
///
/// Holds the declared MIME type rather than a validated kind: validating the
/// declaration is the upload coordinator's pre-check, not the file's job.
/// The contents are kept in memory so a duplicate recheck can resubmit the
/// exact same bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceFile {
    /// Original file name, sent as the multipart filename
    pub name: String,
    /// Declared MIME type
    pub mime: String,
    /// Raw file contents
    pub contents: Vec<u8>,
}

impl InvoiceFile {
    /// Create a new file from its parts.
    pub fn new(name: impl Into<String>, mime: impl Into<String>, contents: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            contents,
        }
    }

    /// The accepted kind for this file's declared MIME type, if any.
    pub fn kind(&self) -> Option<DocumentKind> {
        DocumentKind::from_mime(&self.mime)
    }

    /// Size of the file contents in bytes.
    pub fn size(&self) -> usize {
        self.contents.len()
    }
}

/// One row of the invoice listing returned by the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceSummary {
    /// Server-assigned invoice identifier
    pub invoice_id: i64,
    /// Processing status reported by the service
    pub status: String,
    /// SHA-256 of the stored file contents
    pub file_hash: String,
    /// Whether a signature was detected at upload time
    #[serde(default)]
    pub is_signed: Option<bool>,
    /// Whether the signature verified, if one was present
    #[serde(default)]
    pub crypto_valid: Option<bool>,
    /// Fingerprint of the signer's key, if known
    #[serde(default)]
    pub signer_fingerprint: Option<String>,
    /// Upload timestamp (ISO 8601)
    #[serde(default)]
    pub created_at: Option<String>,
}

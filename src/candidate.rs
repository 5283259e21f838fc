//! Upload candidate acquisition.
//!
//! An [`UploadCandidate`] is the one file the user has selected for
//! analysis. It exists only between selection and submission; nothing is
//! retained once the exchange settles. Media type is sniffed from content
//! first (magic bytes), then guessed from the extension.
//!
//! The accepted-type list and the 10 MB ceiling mirror what the backend
//! enforces. The client treats both as guidance: the UI can warn, but the
//! file is submitted regardless and the backend has the final say.

use std::fs;
use std::path::Path;

use thiserror::Error;

/// Media types the analysis service accepts.
pub const ACCEPTED_MEDIA_TYPES: &[&str] = &[
    "application/pdf",
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/tiff",
    "image/bmp",
];

/// Advisory upload ceiling shown to the user (the backend rejects larger).
pub const ADVISORY_MAX_BYTES: u64 = 10 * 1024 * 1024;

/// Errors that can occur while acquiring a candidate from disk.
#[derive(Debug, Error)]
pub enum CandidateError {
    #[error("file not found: {0}")]
    NotFound(String),

    #[error("not a regular file: {0}")]
    NotAFile(String),

    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// A user-selected file awaiting submission.
#[derive(Debug, Clone)]
pub struct UploadCandidate {
    /// Original filename, used as the multipart part filename.
    pub file_name: String,
    /// Declared media type sent with the upload.
    pub media_type: String,
    /// Raw file content.
    pub bytes: Vec<u8>,
}

impl UploadCandidate {
    /// Build a candidate from in-memory content.
    pub fn new(file_name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    /// Read a candidate from disk, sniffing its media type.
    pub fn from_path(path: &Path) -> Result<Self, CandidateError> {
        if !path.exists() {
            return Err(CandidateError::NotFound(path.display().to_string()));
        }
        if !path.is_file() {
            return Err(CandidateError::NotAFile(path.display().to_string()));
        }

        let bytes = fs::read(path).map_err(|source| CandidateError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let media_type = detect_media_type(path, &bytes);
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());

        tracing::debug!(
            file = %file_name,
            media_type = %media_type,
            size = bytes.len(),
            "acquired upload candidate"
        );

        Ok(Self {
            file_name,
            media_type,
            bytes,
        })
    }

    /// Size of the candidate content in bytes.
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Whether the declared type is on the service's accepted list.
    pub fn is_accepted_type(&self) -> bool {
        ACCEPTED_MEDIA_TYPES.contains(&self.media_type.as_str())
    }

    /// Whether the candidate exceeds the advisory 10 MB ceiling.
    pub fn exceeds_advisory_limit(&self) -> bool {
        self.size() > ADVISORY_MAX_BYTES
    }
}

/// Sniff a media type from content, falling back to the file extension.
fn detect_media_type(path: &Path, bytes: &[u8]) -> String {
    if let Some(kind) = infer::get(bytes) {
        return kind.mime_type().to_string();
    }
    mime_guess::from_path(path)
        .first()
        .map(|m| m.essence_str().to_string())
        .unwrap_or_else(|| "application/octet-stream".to_string())
}

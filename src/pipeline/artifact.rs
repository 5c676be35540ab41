//! Artifact store: the reports directory, report file naming, and safe
//! lookup of a stored report by its bare filename.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::models::ArtifactKind;

/// Filename prefix of every generated report.
pub const REPORT_FILE_PREFIX: &str = "Pathology_Report";
const FILE_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("Invalid filename")]
    InvalidFilename,

    #[error("File not found")]
    NotFound,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A report file just written to disk.
#[derive(Debug, Clone)]
pub struct StoredArtifact {
    pub filename: String,
    pub path: PathBuf,
    pub kind: ArtifactKind,
}

/// How a resolved file should be served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServeAs {
    Pdf,
    Html,
    /// Anything else is offered as a download.
    Attachment,
}

#[derive(Debug, Clone)]
pub struct ResolvedArtifact {
    pub filename: String,
    pub path: PathBuf,
    pub serve_as: ServeAs,
}

pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn ensure_dir(&self) -> Result<(), ArtifactError> {
        std::fs::create_dir_all(&self.root)?;
        Ok(())
    }

    /// `Pathology_Report_<sanitized name>_<YYYYmmdd_HHMMSS>.<ext>`
    pub fn file_name(patient_name: &str, kind: ArtifactKind, at: NaiveDateTime) -> String {
        format!(
            "{REPORT_FILE_PREFIX}_{}_{}.{}",
            sanitize_name(patient_name),
            at.format(FILE_TIMESTAMP_FORMAT),
            kind.extension()
        )
    }

    /// Write `bytes` as the report for `patient_name`. Creates the directory if needed.
    pub fn write(
        &self,
        patient_name: &str,
        kind: ArtifactKind,
        bytes: &[u8],
        at: NaiveDateTime,
    ) -> Result<StoredArtifact, ArtifactError> {
        self.ensure_dir()?;
        let filename = Self::file_name(patient_name, kind, at);
        let path = self.root.join(&filename);
        std::fs::write(&path, bytes)?;

        tracing::info!(
            file = %filename,
            kind = %kind,
            bytes = bytes.len(),
            "Report artifact written"
        );
        Ok(StoredArtifact {
            filename,
            path,
            kind,
        })
    }

    /// Look up a stored report by filename. Anything that could escape the
    /// reports directory is rejected before the filesystem is consulted.
    pub fn resolve(&self, filename: &str) -> Result<ResolvedArtifact, ArtifactError> {
        if !is_safe_filename(filename) {
            tracing::warn!(filename, "Rejected artifact filename");
            return Err(ArtifactError::InvalidFilename);
        }

        let path = self.root.join(filename);
        if !path.is_file() {
            return Err(ArtifactError::NotFound);
        }

        let extension = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        let serve_as = match extension.as_deref() {
            Some("pdf") => ServeAs::Pdf,
            Some("html") | Some("htm") => ServeAs::Html,
            _ => ServeAs::Attachment,
        };

        Ok(ResolvedArtifact {
            filename: filename.to_string(),
            path,
            serve_as,
        })
    }
}

/// Replace every character that is not a letter, digit, `_` or `-` with `_`.
/// Letters and digits from any script are kept.
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn is_safe_filename(filename: &str) -> bool {
    !filename.is_empty()
        && !filename.contains("..")
        && !filename.contains(['/', '\\', '\0'])
        && !filename.contains(':')
}

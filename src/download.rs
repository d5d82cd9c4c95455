//! Local download fallback for when sharing is not possible.

use std::path::{Path, PathBuf};

use crate::document::SanitizedHtml;
use crate::error::{Result, ShareError};

/// File name used when the caller does not pick one.
pub const DEFAULT_FILE_NAME: &str = "preview.html";

/// Writes sanitized documents to a local directory.
///
/// Intermediate directories are created automatically. This is the fallback
/// offered when every upload service failed.
///
/// # Example
///
/// ```rust,no_run
/// use html_share::LocalDownload;
///
/// let downloads = LocalDownload::new("/tmp/previews");
/// ```
#[derive(Clone, Debug)]
pub struct LocalDownload {
    base_dir: PathBuf,
}

impl LocalDownload {
    /// Create a new `LocalDownload` rooted at the given directory.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Write `doc` as `name` (or [`DEFAULT_FILE_NAME`]) and return the path.
    ///
    /// `name` must be a plain file name; paths with separators or `..` are
    /// rejected.
    pub async fn save(&self, doc: &SanitizedHtml, name: Option<&str>) -> Result<PathBuf> {
        let name = name.unwrap_or(DEFAULT_FILE_NAME);
        if name.is_empty()
            || name == "."
            || name == ".."
            || name.contains(['/', '\\'])
        {
            return Err(ShareError::InvalidFileName(name.to_string()));
        }

        tokio::fs::create_dir_all(&self.base_dir).await?;

        let path = self.base_dir.join(name);
        tokio::fs::write(&path, doc.as_str()).await?;

        tracing::debug!("Wrote {} bytes to {}", doc.byte_len(), path.display());
        Ok(path)
    }
}

//! Error types for the `html_share` crate.

use std::fmt;

/// Why a remote preview could not be loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchFailureKind {
    /// The paste service answered, but not with the content (expired,
    /// deleted, rate limited or down).
    Unavailable,
    /// No HTTP response was received at all.
    Network,
}

impl fmt::Display for FetchFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchFailureKind::Unavailable => f.write_str(
                "the link may have expired or the service may be temporarily unavailable",
            ),
            FetchFailureKind::Network => {
                f.write_str("a network error occurred, check your connection and retry")
            }
        }
    }
}

/// All errors that can occur while sanitizing, sharing or resolving previews.
#[derive(Debug, thiserror::Error)]
pub enum ShareError {
    /// The HTML input was empty or whitespace only.
    #[error("Preview failed: input is empty, paste some HTML first")]
    EmptyInput,

    /// The sanitizer could not be configured or run.
    #[error("HTML sanitization error: {0}")]
    Sanitization(String),

    /// The inline share URL would exceed the configured length limit.
    #[error(
        "HTML content too large for shareable link even after {reduction_percent}% compression \
         (estimated URL: {estimated_len} chars, max: {max}). Try \"Upload & Share\" instead for large files."
    )]
    TooLarge {
        /// Length of the composed URL.
        url_len: usize,
        /// Estimated encoded payload length (`minified_size * 1.37`, rounded up).
        estimated_len: usize,
        /// Configured maximum URL length.
        max: usize,
        /// Size reduction achieved by minification.
        reduction_percent: f64,
    },

    /// A single paste backend failed. Only logged by the upload chain.
    #[error("Upload to {service} failed: {reason}")]
    Upload {
        service: String,
        reason: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Every configured paste backend failed.
    #[error(
        "All upload services failed ({attempted} tried). Please try again later or use the \
         Download button to save the HTML file."
    )]
    AllServicesFailed { attempted: usize },

    /// Remote preview content could not be fetched, directly or via the relay.
    #[error("Failed to load content: {detail}. {kind}.")]
    Fetch {
        kind: FetchFailureKind,
        detail: String,
    },

    /// An inline preview payload is not valid base64url or not UTF-8.
    #[error("Failed to decode preview link: {0}. The link may be truncated or corrupted.")]
    Decode(String),

    /// The preview URL carries neither or both of `content` and `cloud`.
    #[error("Invalid preview link: {0}")]
    PreviewRequest(String),

    /// An upload for this client is already in flight.
    #[error("An upload is already in progress, wait for it to finish")]
    Busy,

    /// The requested download file name is not a plain file name.
    #[error("Download failed: invalid file name {0:?}, use a plain name such as \"preview.html\"")]
    InvalidFileName(String),

    /// Writing the local download copy failed.
    #[error("Download failed: {0}")]
    Download(#[from] std::io::Error),

    /// The client configuration is invalid.
    #[error("Config error: {0}")]
    Config(String),
}

impl ShareError {
    /// Wrap a backend-specific failure for the named paste service.
    pub fn upload(
        service: impl Into<String>,
        reason: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        ShareError::Upload {
            service: service.into(),
            reason: reason.into(),
        }
    }
}

/// A type alias for `Result<T, ShareError>`.
pub type Result<T> = std::result::Result<T, ShareError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_services_failed_suggests_download() {
        let msg = ShareError::AllServicesFailed { attempted: 3 }.to_string();
        assert!(msg.contains("3 tried"));
        assert!(msg.contains("Download"));
    }

    #[test]
    fn fetch_message_distinguishes_kinds() {
        let expired = ShareError::Fetch {
            kind: FetchFailureKind::Unavailable,
            detail: "HTTP 404".into(),
        }
        .to_string();
        let network = ShareError::Fetch {
            kind: FetchFailureKind::Network,
            detail: "connection refused".into(),
        }
        .to_string();
        assert!(expired.contains("expired"));
        assert!(!network.contains("expired"));
        assert!(network.contains("network"));
    }

    #[test]
    fn invalid_file_name_names_download() {
        let msg = ShareError::InvalidFileName("../x.html".into()).to_string();
        assert!(msg.starts_with("Download failed"));
        assert!(msg.contains("\"../x.html\""));
        assert!(!msg.contains("Config"));
    }

    #[test]
    fn too_large_reports_estimate() {
        let msg = ShareError::TooLarge {
            url_len: 8500,
            estimated_len: 8400,
            max: 8000,
            reduction_percent: 12.5,
        }
        .to_string();
        assert!(msg.contains("12.5%"));
        assert!(msg.contains("8400"));
        assert!(msg.contains("Upload & Share"));
    }
}

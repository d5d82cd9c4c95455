//! Share targets and preview link composition.
//!
//! A share attempt produces exactly one [`ShareTarget`]: either the document
//! is embedded in the link itself ([`inline`]) or it lives on a paste service
//! and the link points at it ([`upload`](crate::upload)).

pub mod inline;

use std::fmt;

use crate::minify::CompressionReport;

/// Path of the viewer route on the share origin.
pub const PREVIEW_PATH: &str = "/preview";

/// How long a remote paste is kept by its service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Expiration {
    Permanent,
    Days(u32),
}

impl fmt::Display for Expiration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expiration::Permanent => f.write_str("permanent"),
            Expiration::Days(1) => f.write_str("1 day"),
            Expiration::Days(n) => write!(f, "{n} days"),
        }
    }
}

/// The result of one successful share.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShareTarget {
    /// The document travels inside the link.
    Inline {
        encoded_payload: String,
        url: String,
        report: CompressionReport,
    },
    /// The document was uploaded and the link references it.
    Remote {
        /// Preview link to hand out (`{origin}/preview?cloud=...`).
        url: String,
        /// Raw-content URL the viewer fetches.
        view_url: String,
        /// Human-facing page on the paste service.
        paste_url: String,
        service: String,
        expiration: Expiration,
    },
}

impl ShareTarget {
    /// The link to hand out.
    pub fn url(&self) -> &str {
        match self {
            ShareTarget::Inline { url, .. } | ShareTarget::Remote { url, .. } => url,
        }
    }

    pub fn is_inline(&self) -> bool {
        matches!(self, ShareTarget::Inline { .. })
    }
}

/// Compose `{origin}/preview?{param}={value}`. `value` must already be
/// URL-safe.
pub(crate) fn preview_url(origin: &str, param: &str, value: &str) -> String {
    format!(
        "{}{PREVIEW_PATH}?{param}={value}",
        origin.trim_end_matches('/')
    )
}

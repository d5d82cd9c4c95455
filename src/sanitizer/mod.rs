//! HTML sanitization for previews.
//!
//! Sanitizers implement the [`Sanitizer`] trait and turn raw, untrusted
//! markup into a [`SanitizedHtml`] document. The built-in
//! [`PreviewSanitizer`] parses the input as a whole document and applies a
//! [`PreviewPolicy`] while serializing it back.
//!
//! The default policy is intentionally permissive: inline scripts, styles,
//! stylesheets and `onclick`/`onload` handlers survive, because the tool
//! re-renders developer-authored pages faithfully. What it always removes is
//! other event handlers, `javascript:`-style and unknown URL protocols and
//! embedding elements.

mod policy;
mod tree;

pub use policy::PreviewPolicy;

use scraper::Html;

use crate::document::SanitizedHtml;
use crate::error::{Result, ShareError};

/// Trait for HTML sanitizers.
///
/// Implementations must be `Send + Sync` so a single instance can be shared
/// by a [`ShareClient`](crate::ShareClient) across tasks.
pub trait Sanitizer: Send + Sync {
    /// Sanitize raw markup. Fails with [`ShareError::EmptyInput`] when the
    /// trimmed input is empty.
    fn sanitize(&self, raw: &str) -> Result<SanitizedHtml>;
}

/// Whole-document sanitizer driven by a [`PreviewPolicy`].
///
/// # Example
///
/// ```
/// use html_share::{PreviewSanitizer, Sanitizer};
///
/// let sanitizer = PreviewSanitizer::default();
/// let doc = sanitizer
///     .sanitize(r#"<a href="javascript:alert(1)" onclick="go()">x</a><script>go()</script>"#)
///     .unwrap();
/// assert!(!doc.as_str().contains("javascript:"));
/// assert!(doc.as_str().contains(r#"onclick="go()""#));
/// assert!(doc.as_str().contains("<script>go()</script>"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct PreviewSanitizer {
    policy: PreviewPolicy,
}

impl PreviewSanitizer {
    pub fn new(policy: PreviewPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &PreviewPolicy {
        &self.policy
    }
}

impl Sanitizer for PreviewSanitizer {
    fn sanitize(&self, raw: &str) -> Result<SanitizedHtml> {
        if raw.trim().is_empty() {
            return Err(ShareError::EmptyInput);
        }

        let document = Html::parse_document(raw);
        if !document.errors.is_empty() {
            tracing::debug!("HTML parsed with {} recoverable errors", document.errors.len());
        }

        let sanitized = tree::serialize_document(&document, &self.policy);
        tracing::debug!(
            "Sanitized {} bytes into {} bytes",
            raw.len(),
            sanitized.len()
        );
        Ok(SanitizedHtml::new(sanitized))
    }
}

/// Sanitize `raw` with the default [`PreviewPolicy`].
pub fn sanitize(raw: &str) -> Result<SanitizedHtml> {
    PreviewSanitizer::default().sanitize(raw)
}

//! The [`ShareClient`]: one object wiring sanitizer, share paths, viewer and
//! clipboard together.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::clipboard::{Clipboard, copy_or_warn};
use crate::document::SanitizedHtml;
use crate::error::{Result, ShareError};
use crate::resolve::{Fetch, PreviewRequest, resolve_preview};
use crate::sanitizer::Sanitizer;
use crate::share::ShareTarget;
use crate::share::inline::encode_inline;
use crate::upload::UploadChain;

/// A successful share.
#[derive(Clone, Debug, PartialEq)]
pub struct ShareOutcome {
    pub target: ShareTarget,
    /// Whether the link made it to the clipboard.
    pub copied: bool,
}

/// What to open when the user asks for a preview in a new tab.
#[derive(Clone, Debug, PartialEq)]
pub enum OpenTarget {
    /// A self-contained preview link.
    Link(String),
    /// The document is too large for a link; render it directly.
    Document(SanitizedHtml),
}

/// Entry point for sharing and viewing previews.
///
/// Created with [`ShareClientBuilder`](crate::ShareClientBuilder). Holds no
/// document state: every call takes its input and returns a fresh result.
/// The only shared state is the in-flight upload flag, which makes a second
/// [`upload_and_share`](Self::upload_and_share) fail with
/// [`ShareError::Busy`] while the first is still running.
pub struct ShareClient {
    origin: String,
    max_url_len: usize,
    cors_proxy: String,
    services: UploadChain,
    fetcher: Box<dyn Fetch>,
    clipboard: Box<dyn Clipboard>,
    sanitizer: Box<dyn Sanitizer>,
    uploading: AtomicBool,
}

impl ShareClient {
    pub(crate) fn new(
        origin: String,
        max_url_len: usize,
        cors_proxy: String,
        services: UploadChain,
        fetcher: Box<dyn Fetch>,
        clipboard: Box<dyn Clipboard>,
        sanitizer: Box<dyn Sanitizer>,
    ) -> Self {
        Self {
            origin,
            max_url_len,
            cors_proxy,
            services,
            fetcher,
            clipboard,
            sanitizer,
            uploading: AtomicBool::new(false),
        }
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn service_count(&self) -> usize {
        self.services.len()
    }

    /// Whether an upload is currently in flight.
    pub fn is_uploading(&self) -> bool {
        self.uploading.load(Ordering::Acquire)
    }

    /// Sanitize raw input for preview.
    pub fn sanitize(&self, raw: &str) -> Result<SanitizedHtml> {
        self.sanitizer.sanitize(raw)
    }

    /// Share `doc` inside the link and copy it to the clipboard.
    pub fn share_inline(&self, doc: &SanitizedHtml) -> Result<ShareOutcome> {
        let target = encode_inline(&self.origin, doc, self.max_url_len)?;
        Ok(self.deliver(target))
    }

    /// Upload `doc` through the service chain and copy the link.
    ///
    /// Fails with [`ShareError::Busy`] if another upload from this client is
    /// still running.
    pub async fn upload_and_share(&self, doc: &SanitizedHtml) -> Result<ShareOutcome> {
        let _in_flight = InFlight::acquire(&self.uploading).ok_or(ShareError::Busy)?;
        let target = self.services.upload_and_share(&self.origin, doc).await?;
        Ok(self.deliver(target))
    }

    /// Share inline when the link fits, otherwise upload.
    pub async fn share(&self, doc: &SanitizedHtml) -> Result<ShareOutcome> {
        match self.share_inline(doc) {
            Err(ShareError::TooLarge { url_len, max, .. }) => {
                tracing::info!(url_len, max, "Falling back to upload");
                self.upload_and_share(doc).await
            }
            other => other,
        }
    }

    /// Pick what to open in a new tab: the inline link if it fits, the
    /// document itself otherwise. Never touches the clipboard.
    pub fn open_target(&self, doc: &SanitizedHtml) -> Result<OpenTarget> {
        match encode_inline(&self.origin, doc, self.max_url_len) {
            Ok(target) => Ok(OpenTarget::Link(target.url().to_string())),
            Err(ShareError::TooLarge { .. }) => Ok(OpenTarget::Document(doc.clone())),
            Err(e) => Err(e),
        }
    }

    /// Resolve a full preview link to a sanitized document.
    pub async fn resolve(&self, link: &str) -> Result<SanitizedHtml> {
        let request = PreviewRequest::from_url(link)?;
        self.resolve_request(&request).await
    }

    /// Resolve an already parsed preview request.
    pub async fn resolve_request(&self, request: &PreviewRequest) -> Result<SanitizedHtml> {
        resolve_preview(
            request,
            self.fetcher.as_ref(),
            &self.cors_proxy,
            self.sanitizer.as_ref(),
        )
        .await
    }

    fn deliver(&self, target: ShareTarget) -> ShareOutcome {
        let copied = copy_or_warn(self.clipboard.as_ref(), target.url());
        ShareOutcome { target, copied }
    }
}

/// Holds the in-flight flag for the lifetime of one upload. Released on
/// drop, so a cancelled upload frees the client too.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlight(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_flight_is_exclusive_and_released_on_drop() {
        let flag = AtomicBool::new(false);
        let first = InFlight::acquire(&flag).unwrap();
        assert!(InFlight::acquire(&flag).is_none());
        drop(first);
        assert!(InFlight::acquire(&flag).is_some());
    }
}

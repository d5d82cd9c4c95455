//! Remote paste backends and the ordered upload fallback chain.
//!
//! The crate ships with three backends, tried in this order by default:
//!
//! - [`Dpaste`] -- dpaste.com, deleted after 7 days.
//! - [`PasteEe`] -- paste.ee, permanent.
//! - [`Rentry`] -- rentry.co, permanent.
//!
//! Short-lived storage comes first so that shared previews expire unless
//! every auto-deleting service is down. Implement [`UploadService`] to add
//! your own backend.

mod dpaste;
mod paste_ee;
mod rentry;

pub use dpaste::Dpaste;
pub use paste_ee::PasteEe;
pub use rentry::Rentry;

use futures::future::BoxFuture;

use crate::document::SanitizedHtml;
use crate::error::{Result, ShareError};
use crate::share::{Expiration, ShareTarget, preview_url};

/// What a paste backend returns after a successful upload.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct UploadReceipt {
    /// Human-facing paste page.
    pub url: String,
    /// URL serving the raw HTML.
    pub view_url: String,
    pub service: String,
    pub expiration: Expiration,
}

/// Trait for remote paste backends.
///
/// Implementations must be `Send + Sync + 'static` so a
/// [`ShareClient`](crate::ShareClient) can hold them as trait objects.
///
/// # Implementing a custom backend
///
/// ```rust,no_run
/// use futures::future::BoxFuture;
/// use html_share::{Expiration, Result, UploadReceipt, UploadService};
///
/// struct MyPaste;
///
/// impl UploadService for MyPaste {
///     fn name(&self) -> &str {
///         "my-paste"
///     }
///
///     fn upload<'a>(&'a self, html: &'a str) -> BoxFuture<'a, Result<UploadReceipt>> {
///         Box::pin(async move {
///             // send html somewhere ...
///             Ok(UploadReceipt {
///                 url: "https://paste.example/1".into(),
///                 view_url: "https://paste.example/1/raw".into(),
///                 service: self.name().into(),
///                 expiration: Expiration::Permanent,
///             })
///         })
///     }
/// }
/// ```
pub trait UploadService: Send + Sync + 'static {
    /// Short service name used in logs and receipts.
    fn name(&self) -> &str;

    /// Create a paste holding `html`.
    fn upload<'a>(&'a self, html: &'a str) -> BoxFuture<'a, Result<UploadReceipt>>;
}

/// Ordered list of [`UploadService`]s tried one after another.
pub struct UploadChain {
    services: Vec<Box<dyn UploadService>>,
}

impl UploadChain {
    /// Create an empty chain.
    pub fn new() -> Self {
        Self {
            services: Vec::new(),
        }
    }

    /// The default chain: dpaste.com, paste.ee, rentry.co.
    pub fn with_defaults(client: reqwest::Client, paste_ee_token: Option<String>) -> Self {
        let mut chain = Self::new();
        chain.add(Dpaste::new(client.clone()));
        let mut paste_ee = PasteEe::new(client.clone());
        if let Some(token) = paste_ee_token {
            paste_ee = paste_ee.with_token(token);
        }
        chain.add(paste_ee);
        chain.add(Rentry::new(client));
        chain
    }

    /// Append a service to the end of the chain.
    pub fn add(&mut self, service: impl UploadService) {
        self.services.push(Box::new(service));
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Upload to the first service that accepts the document.
    ///
    /// Services are tried strictly in order and the first success
    /// short-circuits the rest, so no paste is created on a service that was
    /// not needed. Individual failures are logged and swallowed.
    pub async fn upload(&self, html: &str) -> Result<UploadReceipt> {
        for (attempt, service) in self.services.iter().enumerate() {
            tracing::debug!(service = service.name(), attempt, "Uploading preview");
            match service.upload(html).await {
                Ok(receipt) => {
                    tracing::info!(
                        service = service.name(),
                        url = %receipt.url,
                        "Uploaded preview"
                    );
                    return Ok(receipt);
                }
                Err(e) => {
                    tracing::warn!("Failed to upload to {}: {e}", service.name());
                }
            }
        }

        Err(ShareError::AllServicesFailed {
            attempted: self.services.len(),
        })
    }

    /// Upload `doc` and compose the `{origin}/preview?cloud=...` link.
    ///
    /// The link points at the raw view URL, so the viewer fetches the
    /// content when the link is opened rather than when it is created.
    pub async fn upload_and_share(&self, origin: &str, doc: &SanitizedHtml) -> Result<ShareTarget> {
        let receipt = self.upload(doc.as_str()).await?;
        let url = preview_url(origin, "cloud", &urlencoding::encode(&receipt.view_url));
        Ok(ShareTarget::Remote {
            url,
            view_url: receipt.view_url,
            paste_url: receipt.url,
            service: receipt.service,
            expiration: receipt.expiration,
        })
    }
}

impl Default for UploadChain {
    fn default() -> Self {
        Self::new()
    }
}

/// Turn a non-success response into a [`ShareError::Upload`] carrying the
/// status and body.
async fn ensure_success(service: &str, response: reqwest::Response) -> Result<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(ShareError::upload(
        service,
        format!("[{status}] {}", body.trim()),
    ))
}

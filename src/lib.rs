//! # html_share
//!
//! Sanitize, minify and share HTML previews.
//!
//! ## Overview
//!
//! Raw markup goes through a [`Sanitizer`] and becomes a [`SanitizedHtml`]
//! document. From there a document can be shared two ways:
//!
//! - **Inline**: minified, base64url-encoded and embedded in a
//!   `{origin}/preview?content=...` link, as long as the link stays under the
//!   length limit (8000 characters by default).
//! - **Remote**: uploaded to the first paste service in an [`UploadChain`]
//!   that accepts it, and referenced by a `{origin}/preview?cloud=...` link.
//!
//! On the viewing side, [`ShareClient::resolve`] decodes or fetches the
//! content (falling back to a CORS relay) and sanitizes it again, since
//! links can be forged.
//!
//! The default [`PreviewPolicy`] keeps scripts, styles and `onclick`/`onload`
//! handlers: it exists to re-render developer-authored pages faithfully, not
//! to host third-party content.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use html_share::{ShareClientBuilder, ShareError};
//!
//! # async fn example() -> html_share::Result<()> {
//! let client = ShareClientBuilder::new("https://tools.example").build()?;
//!
//! let doc = client.sanitize("<h1>Hello</h1><script>console.log(1)</script>")?;
//! match client.share(&doc).await {
//!     Ok(outcome) => println!("share link: {}", outcome.target.url()),
//!     Err(ShareError::AllServicesFailed { .. }) => {
//!         // offer a local download instead
//!     }
//!     Err(e) => return Err(e),
//! }
//!
//! let shown = client.resolve("https://tools.example/preview?content=PGgxPkhpPC9oMT4").await?;
//! # let _ = shown;
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `clipboard` | no | Enables [`SystemClipboard`] backed by `arboard`. |
//! | `rustls-tls` | no | Use `rustls` instead of the platform TLS for `reqwest`. |

pub mod client;
pub mod clipboard;
pub mod config;
pub mod document;
pub mod download;
pub mod error;
pub mod minify;
pub mod resolve;
pub mod sanitizer;
pub mod share;
pub mod upload;

pub use client::{OpenTarget, ShareClient, ShareOutcome};
#[cfg(feature = "clipboard")]
pub use clipboard::SystemClipboard;
pub use clipboard::{Clipboard, NoClipboard};
pub use config::{ShareClientBuilder, ShareConfig};
pub use document::SanitizedHtml;
pub use download::LocalDownload;
pub use error::{FetchFailureKind, Result, ShareError};
pub use minify::{CompressionReport, calculate_compression, minify, minify_with_report};
pub use resolve::{Fetch, FetchFailure, PreviewRequest, resolve_remote};
pub use sanitizer::{PreviewPolicy, PreviewSanitizer, Sanitizer, sanitize};
pub use share::inline::{DEFAULT_MAX_URL_LEN, decode_payload, encode_inline};
pub use share::{Expiration, ShareTarget};
pub use upload::{Dpaste, PasteEe, Rentry, UploadChain, UploadReceipt, UploadService};

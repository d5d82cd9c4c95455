//! Viewer-side resolution of preview links.
//!
//! A preview link carries either the document itself (`content`) or a URL
//! to fetch it from (`cloud`). Either way the content is untrusted when it
//! arrives, because anyone can forge a link, so it is sanitized again before
//! it is handed back.

use std::fmt;

use futures::future::BoxFuture;
use url::Url;

use crate::document::SanitizedHtml;
use crate::error::{FetchFailureKind, Result, ShareError};
use crate::sanitizer::Sanitizer;
use crate::share::inline::decode_payload;

/// Relay used when the paste service cannot be fetched directly. The target
/// URL is appended percent-encoded.
pub const DEFAULT_CORS_PROXY: &str = "https://api.allorigins.win/raw?url=";

/// A parsed `/preview` request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PreviewRequest {
    /// `?content=` base64url payload.
    Inline(String),
    /// `?cloud=` raw-content URL on a paste service.
    Remote(String),
}

impl PreviewRequest {
    /// Parse a full preview URL such as
    /// `https://tools.example/preview?cloud=https%3A%2F%2Fpaste.ee%2Fr%2Fabc`.
    pub fn from_url(link: &str) -> Result<Self> {
        let url = Url::parse(link)
            .map_err(|e| ShareError::PreviewRequest(format!("not a valid URL: {e}")))?;
        Self::from_pairs(url.query_pairs())
    }

    /// Parse just the query string, with or without the leading `?`.
    pub fn from_query(query: &str) -> Result<Self> {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self::from_pairs(url::form_urlencoded::parse(query.as_bytes()))
    }

    fn from_pairs<'a>(
        pairs: impl Iterator<Item = (std::borrow::Cow<'a, str>, std::borrow::Cow<'a, str>)>,
    ) -> Result<Self> {
        let mut content = None;
        let mut cloud = None;
        for (key, value) in pairs {
            match key.as_ref() {
                "content" if !value.is_empty() => content = Some(value.into_owned()),
                "cloud" if !value.is_empty() => cloud = Some(value.into_owned()),
                _ => {}
            }
        }

        match (content, cloud) {
            (Some(payload), None) => Ok(PreviewRequest::Inline(payload)),
            (None, Some(reference)) => Ok(PreviewRequest::Remote(reference)),
            (None, None) => Err(ShareError::PreviewRequest(
                "no preview content found in URL".into(),
            )),
            (Some(_), Some(_)) => Err(ShareError::PreviewRequest(
                "link carries both inline content and a cloud reference".into(),
            )),
        }
    }
}

/// Why a single fetch attempt failed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FetchFailure {
    /// The server answered with a non-success status.
    Status(u16),
    /// No response: DNS, TLS, connection or body read error.
    Transport(String),
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchFailure::Status(code) => write!(f, "HTTP {code}"),
            FetchFailure::Transport(msg) => f.write_str(msg),
        }
    }
}

/// Fetches text over HTTP. Implemented for [`reqwest::Client`].
pub trait Fetch: Send + Sync {
    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, std::result::Result<String, FetchFailure>>;
}

impl Fetch for reqwest::Client {
    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, std::result::Result<String, FetchFailure>> {
        Box::pin(async move {
            let response = self
                .get(url)
                .header(reqwest::header::ACCEPT, "text/plain, text/html, */*")
                .send()
                .await
                .map_err(|e| FetchFailure::Transport(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(FetchFailure::Status(status.as_u16()));
            }

            response
                .text()
                .await
                .map_err(|e| FetchFailure::Transport(e.to_string()))
        })
    }
}

/// Wrap `target` in the CORS relay URL.
pub fn proxied_url(proxy_prefix: &str, target: &str) -> String {
    format!("{proxy_prefix}{}", urlencoding::encode(target))
}

/// Decode an inline payload and sanitize it.
pub fn resolve_inline(payload: &str, sanitizer: &dyn Sanitizer) -> Result<SanitizedHtml> {
    let html = decode_payload(payload)?;
    sanitizer.sanitize(&html)
}

/// Fetch a remote preview and sanitize it.
///
/// Tries `reference_url` directly first, then once more through the relay
/// at `proxy_prefix`. Only `http` and `https` URLs are fetched.
pub async fn resolve_remote<F: Fetch + ?Sized>(
    fetcher: &F,
    proxy_prefix: &str,
    reference_url: &str,
    sanitizer: &dyn Sanitizer,
) -> Result<SanitizedHtml> {
    let url = Url::parse(reference_url)
        .map_err(|e| ShareError::PreviewRequest(format!("invalid cloud reference: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ShareError::PreviewRequest(format!(
            "unsupported cloud reference scheme {:?}",
            url.scheme()
        )));
    }

    let direct = match fetcher.fetch(reference_url).await {
        Ok(body) => return sanitizer.sanitize(&body),
        Err(e) => e,
    };
    tracing::warn!("Direct fetch failed ({direct}), trying CORS proxy...");

    let relayed = match fetcher.fetch(&proxied_url(proxy_prefix, reference_url)).await {
        Ok(body) => return sanitizer.sanitize(&body),
        Err(e) => e,
    };
    tracing::error!("Fetch through CORS proxy failed: {relayed}");

    // Any HTTP answer means the service is reachable but the paste is not.
    let kind = match (&direct, &relayed) {
        (FetchFailure::Status(_), _) | (_, FetchFailure::Status(_)) => FetchFailureKind::Unavailable,
        _ => FetchFailureKind::Network,
    };

    Err(ShareError::Fetch {
        kind,
        detail: format!("direct: {direct}; proxy: {relayed}"),
    })
}

/// Resolve any preview request to a sanitized document.
pub async fn resolve_preview<F: Fetch + ?Sized>(
    request: &PreviewRequest,
    fetcher: &F,
    proxy_prefix: &str,
    sanitizer: &dyn Sanitizer,
) -> Result<SanitizedHtml> {
    match request {
        PreviewRequest::Inline(payload) => resolve_inline(payload, sanitizer),
        PreviewRequest::Remote(reference) => {
            resolve_remote(fetcher, proxy_prefix, reference, sanitizer).await
        }
    }
}

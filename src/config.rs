//! Configuration and the builder for [`ShareClient`].

use url::Url;

use crate::client::ShareClient;
use crate::clipboard::{Clipboard, NoClipboard};
use crate::error::{Result, ShareError};
use crate::resolve::{DEFAULT_CORS_PROXY, Fetch};
use crate::sanitizer::{PreviewPolicy, PreviewSanitizer, Sanitizer};
use crate::share::inline::DEFAULT_MAX_URL_LEN;
use crate::upload::{UploadChain, UploadService};

/// Settings that can come from the environment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShareConfig {
    /// Origin the preview links point at, without trailing slash.
    pub origin: String,
    /// Longest inline link before falling back to an upload.
    pub max_url_len: usize,
    /// CORS relay prefix; the target URL is appended percent-encoded.
    pub cors_proxy: String,
    /// Optional paste.ee application key.
    pub paste_ee_token: Option<String>,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            origin: "http://localhost:5173".to_string(),
            max_url_len: DEFAULT_MAX_URL_LEN,
            cors_proxy: DEFAULT_CORS_PROXY.to_string(),
            paste_ee_token: None,
        }
    }
}

impl ShareConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional:
    /// - `HTML_SHARE_ORIGIN`: origin for preview links (default: "http://localhost:5173")
    /// - `HTML_SHARE_MAX_URL_LEN`: inline link limit (default: 8000)
    /// - `HTML_SHARE_CORS_PROXY`: relay prefix (default: allorigins raw endpoint)
    /// - `HTML_SHARE_PASTE_EE_TOKEN`: paste.ee application key
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let origin = std::env::var("HTML_SHARE_ORIGIN")
            .unwrap_or(defaults.origin)
            .trim_end_matches('/')
            .to_string();

        let max_url_len = match std::env::var("HTML_SHARE_MAX_URL_LEN") {
            Ok(raw) => raw.trim().parse::<usize>().map_err(|e| {
                ShareError::Config(format!("HTML_SHARE_MAX_URL_LEN={raw:?}: {e}"))
            })?,
            Err(_) => defaults.max_url_len,
        };

        let cors_proxy =
            std::env::var("HTML_SHARE_CORS_PROXY").unwrap_or(defaults.cors_proxy);

        let paste_ee_token = std::env::var("HTML_SHARE_PASTE_EE_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty());

        tracing::info!(
            origin = %origin,
            max_url_len,
            cors_proxy = %cors_proxy,
            paste_ee_token = paste_ee_token.is_some(),
            "share configuration loaded"
        );

        Ok(Self {
            origin,
            max_url_len,
            cors_proxy,
            paste_ee_token,
        })
    }
}

/// Builder for configuring a [`ShareClient`].
///
/// # Example
///
/// ```rust,no_run
/// use html_share::{ShareClientBuilder, Dpaste, Rentry};
///
/// # fn example() -> html_share::Result<()> {
/// let http = reqwest::Client::new();
/// let client = ShareClientBuilder::new("https://tools.example")
///     .max_url_len(4000)
///     .add_service(Dpaste::new(http.clone()).with_expiry_days(1))
///     .add_service(Rentry::new(http.clone()))
///     .http_client(http)
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ShareClientBuilder {
    config: ShareConfig,
    services: UploadChain,
    http: Option<reqwest::Client>,
    fetcher: Option<Box<dyn Fetch>>,
    clipboard: Box<dyn Clipboard>,
    sanitizer: Box<dyn Sanitizer>,
}

impl ShareClientBuilder {
    /// Create a builder for links on `origin` with default settings and the
    /// default upload chain.
    pub fn new(origin: impl Into<String>) -> Self {
        Self::from_config(ShareConfig {
            origin: origin.into(),
            ..ShareConfig::default()
        })
    }

    pub fn from_config(config: ShareConfig) -> Self {
        Self {
            config,
            services: UploadChain::new(),
            http: None,
            fetcher: None,
            clipboard: Box::new(NoClipboard),
            sanitizer: Box::new(PreviewSanitizer::default()),
        }
    }

    /// Longest inline link before [`ShareError::TooLarge`].
    pub fn max_url_len(mut self, len: usize) -> Self {
        self.config.max_url_len = len;
        self
    }

    pub fn cors_proxy(mut self, prefix: impl Into<String>) -> Self {
        self.config.cors_proxy = prefix.into();
        self
    }

    /// Append a paste backend. Backends are tried in the order they are
    /// added; if none is added the default chain is used.
    pub fn add_service(mut self, service: impl UploadService) -> Self {
        self.services.add(service);
        self
    }

    /// HTTP client shared by the default backends and the fetcher.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http = Some(client);
        self
    }

    /// Replace the fetcher used to resolve remote previews.
    pub fn fetcher(mut self, fetcher: impl Fetch + 'static) -> Self {
        self.fetcher = Some(Box::new(fetcher));
        self
    }

    pub fn clipboard(mut self, clipboard: impl Clipboard + 'static) -> Self {
        self.clipboard = Box::new(clipboard);
        self
    }

    pub fn sanitizer(mut self, sanitizer: impl Sanitizer + 'static) -> Self {
        self.sanitizer = Box::new(sanitizer);
        self
    }

    /// Shorthand for a [`PreviewSanitizer`] with a custom policy.
    pub fn policy(self, policy: PreviewPolicy) -> Self {
        self.sanitizer(PreviewSanitizer::new(policy))
    }

    /// Validate the configuration and create the client.
    pub fn build(self) -> Result<ShareClient> {
        let origin = self.config.origin.trim_end_matches('/').to_string();
        let parsed = Url::parse(&origin)
            .map_err(|e| ShareError::Config(format!("invalid origin {origin:?}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ShareError::Config(format!(
                "origin {origin:?} must use http or https"
            )));
        }
        if self.config.max_url_len == 0 {
            return Err(ShareError::Config("max_url_len must be positive".into()));
        }

        let http = self.http.unwrap_or_default();
        let services = if self.services.is_empty() {
            UploadChain::with_defaults(http.clone(), self.config.paste_ee_token.clone())
        } else {
            self.services
        };
        let fetcher: Box<dyn Fetch> = match self.fetcher {
            Some(fetcher) => fetcher,
            None => Box::new(http),
        };

        Ok(ShareClient::new(
            origin,
            self.config.max_url_len,
            self.config.cors_proxy,
            services,
            fetcher,
            self.clipboard,
            self.sanitizer,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Mutex to serialize config tests that manipulate env vars.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const ENV_KEYS: &[&str] = &[
        "HTML_SHARE_ORIGIN",
        "HTML_SHARE_MAX_URL_LEN",
        "HTML_SHARE_CORS_PROXY",
        "HTML_SHARE_PASTE_EE_TOKEN",
    ];

    /// Run `f` with only the given share variables set.
    fn with_env_vars<F: FnOnce()>(vars: &[(&str, &str)], f: F) {
        let _guard = ENV_MUTEX.lock().unwrap();

        let saved: Vec<_> = ENV_KEYS
            .iter()
            .map(|k| (*k, std::env::var(k).ok()))
            .collect();

        // SAFETY: Serialized by mutex; only test code touches these vars.
        unsafe {
            for k in ENV_KEYS {
                std::env::remove_var(k);
            }
            for (k, v) in vars {
                std::env::set_var(k, v);
            }
        }

        f();

        // SAFETY: Restoring original env state.
        unsafe {
            for (k, v) in &saved {
                match v {
                    Some(val) => std::env::set_var(k, val),
                    None => std::env::remove_var(k),
                }
            }
        }
    }

    #[test]
    fn config_defaults() {
        with_env_vars(&[], || {
            let config = ShareConfig::from_env().unwrap();
            assert_eq!(config, ShareConfig::default());
            assert_eq!(config.max_url_len, 8000);
            assert_eq!(config.cors_proxy, "https://api.allorigins.win/raw?url=");
        });
    }

    #[test]
    fn config_custom_values() {
        with_env_vars(
            &[
                ("HTML_SHARE_ORIGIN", "https://tools.example/"),
                ("HTML_SHARE_MAX_URL_LEN", "2048"),
                ("HTML_SHARE_CORS_PROXY", "https://relay.example/?u="),
                ("HTML_SHARE_PASTE_EE_TOKEN", "secret"),
            ],
            || {
                let config = ShareConfig::from_env().unwrap();
                assert_eq!(config.origin, "https://tools.example");
                assert_eq!(config.max_url_len, 2048);
                assert_eq!(config.cors_proxy, "https://relay.example/?u=");
                assert_eq!(config.paste_ee_token.as_deref(), Some("secret"));
            },
        );
    }

    #[test]
    fn config_invalid_max_len() {
        with_env_vars(&[("HTML_SHARE_MAX_URL_LEN", "lots")], || {
            assert!(matches!(
                ShareConfig::from_env(),
                Err(ShareError::Config(_))
            ));
        });
    }

    #[test]
    fn config_blank_token_ignored() {
        with_env_vars(&[("HTML_SHARE_PASTE_EE_TOKEN", "  ")], || {
            let config = ShareConfig::from_env().unwrap();
            assert!(config.paste_ee_token.is_none());
        });
    }

    #[test]
    fn build_rejects_bad_origin() {
        assert!(matches!(
            ShareClientBuilder::new("not a url").build(),
            Err(ShareError::Config(_))
        ));
        assert!(matches!(
            ShareClientBuilder::new("ftp://files.example").build(),
            Err(ShareError::Config(_))
        ));
    }

    #[test]
    fn build_rejects_zero_limit() {
        assert!(matches!(
            ShareClientBuilder::new("https://tools.example")
                .max_url_len(0)
                .build(),
            Err(ShareError::Config(_))
        ));
    }

    #[test]
    fn build_uses_default_chain() {
        let client = ShareClientBuilder::new("https://tools.example/").build().unwrap();
        assert_eq!(client.origin(), "https://tools.example");
        assert_eq!(client.service_count(), 3);
    }
}

//! The allow-list policy used by [`PreviewSanitizer`](super::PreviewSanitizer).
//!
//! The default policy is deliberately weaker than a general-purpose web
//! sanitizer. It keeps `<script>`, `<style>` and `<link>` elements and the
//! `onclick`/`onload` handlers so that developer-authored pages render the
//! same way they were written. Serving third-party content through this
//! policy would be a security defect.

use std::collections::HashSet;

use crate::error::{Result, ShareError};

/// Attributes whose values are URLs and therefore subject to protocol checks.
const URL_ATTRIBUTES: &[&str] = &[
    "href",
    "src",
    "action",
    "formaction",
    "poster",
    "background",
    "cite",
    "data",
    "ping",
    "longdesc",
    "manifest",
    "codebase",
    "lowsrc",
    "dynsrc",
];

/// Elements allowed to carry `data:` URLs in their `src` attribute.
const DATA_URI_ELEMENTS: &[&str] = &["img", "video", "audio", "source", "track", "input"];

/// Elements whose tag is dropped while their content is kept.
const UNWRAPPED_ELEMENTS: &[&str] = &[
    "iframe", "frame", "frameset", "object", "embed", "applet", "base", "portal",
];

const DEFAULT_HANDLERS: &[&str] = &["onclick", "onload"];

const DEFAULT_PROTOCOLS: &[&str] = &[
    "http", "https", "ftp", "ftps", "mailto", "tel", "callto", "sms", "cid", "xmpp",
];

/// What the sanitizer does with an element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ElementVerdict {
    Keep,
    /// Drop the tag, keep its children.
    Unwrap,
    /// Drop the element and everything inside it.
    Remove,
}

/// Allow-list policy for preview sanitization.
///
/// # Example
///
/// ```
/// use html_share::PreviewPolicy;
///
/// let policy = PreviewPolicy::default()
///     .allow_handler("onmouseover")
///     .allow_protocol("ipfs")
///     .unwrap();
/// assert!(policy.is_handler_allowed("onmouseover"));
/// ```
#[derive(Clone, Debug)]
pub struct PreviewPolicy {
    handlers: HashSet<String>,
    protocols: HashSet<String>,
}

impl PreviewPolicy {
    /// Additionally keep the given `on*` event-handler attribute.
    pub fn allow_handler(mut self, name: &str) -> Self {
        self.handlers.insert(name.to_ascii_lowercase());
        self
    }

    /// Additionally accept URLs with the given scheme (without the `:`).
    ///
    /// Fails with [`ShareError::Sanitization`] if `scheme` is not a valid
    /// URL scheme name, or names one of the script-capable protocols.
    pub fn allow_protocol(mut self, scheme: &str) -> Result<Self> {
        let scheme = scheme.trim_end_matches(':').to_ascii_lowercase();
        if !is_scheme_name(&scheme) {
            return Err(ShareError::Sanitization(format!(
                "invalid protocol name {scheme:?}"
            )));
        }
        if matches!(scheme.as_str(), "javascript" | "vbscript" | "data") {
            return Err(ShareError::Sanitization(format!(
                "protocol {scheme:?} cannot be allowed"
            )));
        }
        self.protocols.insert(scheme);
        Ok(self)
    }

    pub fn is_handler_allowed(&self, name: &str) -> bool {
        self.handlers.contains(&name.to_ascii_lowercase())
    }

    pub(crate) fn element_verdict(&self, tag: &str, attrs: &[(&str, &str)]) -> ElementVerdict {
        if UNWRAPPED_ELEMENTS.contains(&tag) {
            return ElementVerdict::Unwrap;
        }
        if tag == "meta"
            && attrs
                .iter()
                .any(|(k, v)| k.eq_ignore_ascii_case("http-equiv") && v.eq_ignore_ascii_case("refresh"))
        {
            return ElementVerdict::Remove;
        }
        ElementVerdict::Keep
    }

    /// Whether the attribute `name="value"` may stay on element `tag`.
    pub(crate) fn allows_attribute(&self, tag: &str, name: &str, value: &str) -> bool {
        let name = name.to_ascii_lowercase();

        if name.starts_with("on") {
            return self.handlers.contains(&name);
        }

        if URL_ATTRIBUTES.contains(&name.as_str()) {
            return self.allows_url(tag, &name, value);
        }

        true
    }

    fn allows_url(&self, tag: &str, attr: &str, value: &str) -> bool {
        let Some(scheme) = url_scheme(value) else {
            // Relative URL, fragment or empty value.
            return true;
        };

        if scheme == "data" {
            return attr == "src" && DATA_URI_ELEMENTS.contains(&tag);
        }

        self.protocols.contains(&scheme)
    }
}

impl Default for PreviewPolicy {
    fn default() -> Self {
        Self {
            handlers: DEFAULT_HANDLERS.iter().map(|s| s.to_string()).collect(),
            protocols: DEFAULT_PROTOCOLS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

fn is_scheme_name(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Extract the lowercase scheme of `value`, ignoring whitespace and control
/// characters the way browsers do when resolving URLs.
fn url_scheme(value: &str) -> Option<String> {
    let cleaned: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect();
    let (scheme, _) = cleaned.split_once(':')?;
    // A colon after a path, query or fragment does not start a scheme.
    if !is_scheme_name(scheme) {
        return None;
    }
    Some(scheme.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_keeps_onclick_and_onload_only() {
        let policy = PreviewPolicy::default();
        assert!(policy.allows_attribute("button", "onclick", "go()"));
        assert!(policy.allows_attribute("body", "onload", "init()"));
        assert!(!policy.allows_attribute("img", "onerror", "steal()"));
        assert!(!policy.allows_attribute("div", "onMouseOver", "x()"));
    }

    #[test]
    fn javascript_urls_are_rejected() {
        let policy = PreviewPolicy::default();
        assert!(!policy.allows_attribute("a", "href", "javascript:alert(1)"));
        assert!(!policy.allows_attribute("a", "href", "  JaVaScRiPt:alert(1)"));
        assert!(!policy.allows_attribute("a", "href", "java\tscript:alert(1)"));
        assert!(!policy.allows_attribute("a", "href", "vbscript:msgbox"));
    }

    #[test]
    fn unknown_protocols_are_rejected() {
        let policy = PreviewPolicy::default();
        assert!(!policy.allows_attribute("a", "href", "foo:bar"));
        assert!(!policy.allows_attribute("a", "href", "ipfs://cid"));
    }

    #[test]
    fn relative_and_known_urls_are_kept() {
        let policy = PreviewPolicy::default();
        assert!(policy.allows_attribute("a", "href", "/docs/page.html"));
        assert!(policy.allows_attribute("a", "href", "#top"));
        assert!(policy.allows_attribute("a", "href", "page?time=12:30"));
        assert!(policy.allows_attribute("a", "href", "https://example.com"));
        assert!(policy.allows_attribute("a", "href", "mailto:dev@example.com"));
        assert!(policy.allows_attribute("link", "href", "style.css"));
    }

    #[test]
    fn data_urls_only_on_media_src() {
        let policy = PreviewPolicy::default();
        assert!(policy.allows_attribute("img", "src", "data:image/png;base64,AAAA"));
        assert!(!policy.allows_attribute("a", "href", "data:text/html,<script>"));
        assert!(!policy.allows_attribute("script", "src", "data:text/javascript,1"));
    }

    #[test]
    fn non_url_attributes_pass_through() {
        let policy = PreviewPolicy::default();
        assert!(policy.allows_attribute("a", "target", "_blank"));
        assert!(policy.allows_attribute("div", "style", "color: red"));
        assert!(policy.allows_attribute("div", "title", "javascript:is just text here"));
    }

    #[test]
    fn allow_protocol_extends_list() {
        let policy = PreviewPolicy::default().allow_protocol("ipfs:").unwrap();
        assert!(policy.allows_attribute("a", "href", "ipfs://cid"));
    }

    #[test]
    fn allow_protocol_rejects_invalid_and_dangerous() {
        assert!(matches!(
            PreviewPolicy::default().allow_protocol("1abc"),
            Err(ShareError::Sanitization(_))
        ));
        assert!(matches!(
            PreviewPolicy::default().allow_protocol("javascript"),
            Err(ShareError::Sanitization(_))
        ));
    }

    #[test]
    fn embedding_elements_are_unwrapped() {
        let policy = PreviewPolicy::default();
        assert_eq!(policy.element_verdict("iframe", &[]), ElementVerdict::Unwrap);
        assert_eq!(policy.element_verdict("script", &[]), ElementVerdict::Keep);
        assert_eq!(
            policy.element_verdict("meta", &[("http-equiv", "Refresh")]),
            ElementVerdict::Remove
        );
        assert_eq!(
            policy.element_verdict("meta", &[("charset", "utf-8")]),
            ElementVerdict::Keep
        );
    }
}

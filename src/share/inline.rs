//! Inline share links: the whole document base64url-encoded into the URL.

use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};

use crate::document::SanitizedHtml;
use crate::error::{Result, ShareError};
use crate::minify::minify_with_report;
use crate::share::{ShareTarget, preview_url};

/// Longest inline URL produced by default. Browsers and chat clients start
/// truncating or rejecting links past this.
pub const DEFAULT_MAX_URL_LEN: usize = 8000;

/// Base64 output is roughly 37% larger than its input.
const BASE64_EXPANSION: f64 = 1.37;

/// Encode bytes with the URL-safe alphabet (`-`, `_`) and no padding.
pub fn encode_payload(html: &str) -> String {
    URL_SAFE_NO_PAD.encode(html.as_bytes())
}

/// Reverse [`encode_payload`].
///
/// Also accepts payloads that kept their `=` padding.
pub fn decode_payload(payload: &str) -> Result<String> {
    let mut standard: String = payload
        .trim()
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            c => c,
        })
        .collect();
    while standard.len() % 4 != 0 {
        standard.push('=');
    }

    let bytes = STANDARD
        .decode(standard.as_bytes())
        .map_err(|e| ShareError::Decode(format!("invalid base64 payload: {e}")))?;

    String::from_utf8(bytes)
        .map_err(|e| ShareError::Decode(format!("payload is not valid UTF-8: {e}")))
}

/// Minify `doc` and embed it in a `{origin}/preview?content=...` link.
///
/// Fails with [`ShareError::TooLarge`] when the resulting URL is longer than
/// `max_url_len`; callers should fall back to an upload.
pub fn encode_inline(origin: &str, doc: &SanitizedHtml, max_url_len: usize) -> Result<ShareTarget> {
    let (minified, report) = minify_with_report(doc);
    let encoded = encode_payload(minified.as_str());
    let url = preview_url(origin, "content", &encoded);

    if url.len() > max_url_len {
        let estimated_len = (report.minified_size as f64 * BASE64_EXPANSION).ceil() as usize;
        tracing::info!(
            url_len = url.len(),
            max = max_url_len,
            "Inline share link too long"
        );
        return Err(ShareError::TooLarge {
            url_len: url.len(),
            estimated_len,
            max: max_url_len,
            reduction_percent: report.reduction_percent,
        });
    }

    Ok(ShareTarget::Inline {
        encoded_payload: encoded,
        url,
        report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sanitizer::sanitize;

    #[test]
    fn payload_uses_url_safe_alphabet_without_padding() {
        // U+FBFF is EF AF BF in UTF-8, "76+/" in the standard alphabet.
        let html = "\u{fbff}";
        let encoded = encode_payload(html);
        assert!(!encoded.contains('+'));
        assert!(!encoded.contains('/'));
        assert!(!encoded.ends_with('='));
        assert_eq!(decode_payload(&encoded).unwrap(), html);
    }

    #[test]
    fn round_trips_multibyte_text() {
        let html = "<p>héllo wörld 👋 日本語</p>";
        assert_eq!(decode_payload(&encode_payload(html)).unwrap(), html);
    }

    #[test]
    fn decode_accepts_padding() {
        assert_eq!(decode_payload("PHA-").unwrap(), "<p>");
        assert_eq!(decode_payload("YQ==").unwrap(), "a");
        assert_eq!(decode_payload("YQ").unwrap(), "a");
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(matches!(decode_payload("!!!notbase64"), Err(ShareError::Decode(_))));
    }

    #[test]
    fn decode_rejects_invalid_utf8() {
        let encoded = URL_SAFE_NO_PAD.encode([0xff, 0xfe, 0xfd]);
        assert!(matches!(decode_payload(&encoded), Err(ShareError::Decode(_))));
    }

    #[test]
    fn inline_url_shape() {
        let doc = sanitize("<p>Hi</p>").unwrap();
        let target = encode_inline("https://tools.example", &doc, DEFAULT_MAX_URL_LEN).unwrap();
        let ShareTarget::Inline { encoded_payload, url, report } = target else {
            panic!("expected inline target");
        };
        assert_eq!(url, format!("https://tools.example/preview?content={encoded_payload}"));
        assert_eq!(report.original_size, doc.byte_len());
        assert_eq!(
            decode_payload(&encoded_payload).unwrap(),
            "<html><head></head><body><p>Hi</p></body></html>"
        );
    }

    #[test]
    fn limit_is_inclusive_and_estimate_is_exact() {
        let doc = sanitize("<p>Hi</p>").unwrap();
        // 48 minified bytes -> 64 base64url characters.
        let fits = encode_inline("https://tools.example", &doc, 1_000).unwrap();
        let url_len = fits.url().len();
        assert_eq!(url_len, "https://tools.example/preview?content=".len() + 64);

        let at_limit = encode_inline("https://tools.example", &doc, url_len).unwrap();
        assert_eq!(at_limit, fits);

        let err = encode_inline("https://tools.example", &doc, url_len - 1).unwrap_err();
        match err {
            ShareError::TooLarge { url_len: rejected, estimated_len, max, .. } => {
                assert_eq!(rejected, url_len);
                assert_eq!(max, url_len - 1);
                // ceil(48 * 1.37) = ceil(65.76)
                assert_eq!(estimated_len, 66);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn oversized_document_is_rejected() {
        let body: String = (0..2000).map(|i| format!("<p>{i:x}</p>")).collect();
        let doc = sanitize(&body).unwrap();
        let err = encode_inline("https://tools.example", &doc, DEFAULT_MAX_URL_LEN).unwrap_err();
        match err {
            ShareError::TooLarge { url_len, estimated_len, max, .. } => {
                assert!(url_len > 8000);
                assert_eq!(max, 8000);
                assert!(estimated_len > 0);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}

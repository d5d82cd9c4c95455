//! HTML minification and compression reporting.
//!
//! The minifier is a fixed sequence of textual rewrites. Order matters: later
//! steps assume comments are already gone and whitespace already collapsed.
//!
//! 1. HTML comments are removed, except conditional comments
//!    (`<!--[if IE]>...<![endif]-->`, `<!--<![endif]-->`), which are set
//!    aside and restored byte-for-byte at the end.
//! 2. CSS block comments and `//` line comments are removed everywhere.
//! 3. Each `<style>` body is collapsed.
//! 4. Each inline `<script>` body is collapsed. Scripts with a `src`
//!    attribute are left alone.
//! 5. Whitespace between tags and around `=` is removed, other runs of
//!    whitespace collapse to one space.
//!
//! # Limitations
//!
//! The rules do not understand quoting. A `//` inside a string literal or a
//! URL (`https://...`) is treated as a line comment and the rest of that line
//! is dropped, and spaces around `=` are removed from text content too. This
//! is an accepted heuristic: the output is meant for preview links, not for
//! publishing.

mod rules;

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::document::SanitizedHtml;
use rules::RewriteRules;

static HTML_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--(.*?)-->").expect("valid regex"));

/// Stand-in for a set-aside conditional comment. U+E000 is a private-use
/// character, and anything resembling this in the input is an ordinary
/// comment that step 1 removes.
static CONDITIONAL_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("<!--\u{E000}([0-9]+)-->").expect("valid regex"));

static STYLE_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)(<style\b[^>]*>)(.*?)(</style\s*>)").expect("valid regex")
});

static SCRIPT_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)(<script\b[^>]*>)(.*?)(</script\s*>)").expect("valid regex")
});

static SRC_ATTRIBUTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\ssrc\s*=").expect("valid regex"));

static CODE_COMMENTS: LazyLock<RewriteRules> =
    LazyLock::new(|| RewriteRules::new(&[(r"(?s)/\*.*?\*/", ""), (r"(?m)//.*$", "")]));

static CSS_RULES: LazyLock<RewriteRules> = LazyLock::new(|| {
    RewriteRules::new(&[
        (r"\s+", " "),
        (r"\s*\{\s*", "{"),
        (r"\s*\}\s*", "}"),
        (r"\s*:\s*", ":"),
        (r"\s*;\s*", ";"),
        (r"\s*,\s*", ","),
        (r";+\}", "}"),
        (r"\s*>\s*", ">"),
        (r"\s*\+\s*", "+"),
        (r"\s*~\s*", "~"),
    ])
});

static JS_RULES: LazyLock<RewriteRules> = LazyLock::new(|| {
    RewriteRules::new(&[
        (r"\s+", " "),
        (r"\s*\{\s*", "{"),
        (r"\s*\}\s*", "}"),
        (r"\s*\(\s*", "("),
        (r"\s*\)\s*", ")"),
        (r"\s*;\s*", ";"),
        (r"\s*,\s*", ","),
        (r"\s*=\s*", "="),
    ])
});

static MARKUP_RULES: LazyLock<RewriteRules> = LazyLock::new(|| {
    RewriteRules::new(&[
        (r">\s+<", "><"),
        (r"<([^>]+?)\s+>", "<$1>"),
        (r"\s{2,}", " "),
        (r"\s*=\s*", "="),
    ])
});

/// Size statistics for one minification.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct CompressionReport {
    /// Size of the input in UTF-8 bytes.
    pub original_size: usize,
    /// Size of the output in UTF-8 bytes.
    pub minified_size: usize,
    /// Percentage saved, rounded to one decimal.
    pub reduction_percent: f64,
    pub saved_bytes: i64,
}

/// Compare two versions of a document by UTF-8 byte size.
///
/// An empty `original` reports `0.0` percent instead of dividing by zero.
pub fn calculate_compression(original: &str, minified: &str) -> CompressionReport {
    let original_size = original.len();
    let minified_size = minified.len();
    let saved_bytes = original_size as i64 - minified_size as i64;

    let reduction_percent = if original_size == 0 {
        0.0
    } else {
        (saved_bytes as f64 / original_size as f64 * 1000.0).round() / 10.0
    };

    CompressionReport {
        original_size,
        minified_size,
        reduction_percent,
        saved_bytes,
    }
}

/// Minify a sanitized document.
///
/// Never fails; the worst case is the input returned unchanged.
pub fn minify(doc: &SanitizedHtml) -> SanitizedHtml {
    SanitizedHtml::new(minify_str(doc.as_str()))
}

/// Minify a sanitized document and report the savings.
pub fn minify_with_report(doc: &SanitizedHtml) -> (SanitizedHtml, CompressionReport) {
    let minified = minify(doc);
    let report = calculate_compression(doc.as_str(), minified.as_str());
    tracing::debug!(
        original = report.original_size,
        minified = report.minified_size,
        reduction = report.reduction_percent,
        "Minified HTML"
    );
    (minified, report)
}

pub(crate) fn minify_str(html: &str) -> String {
    let mut conditionals: Vec<String> = Vec::new();

    // 1. HTML comments
    let out = HTML_COMMENT.replace_all(html, |caps: &Captures| {
        let body = &caps[1];
        if body.starts_with('[') || body.starts_with("<!") {
            conditionals.push(caps[0].to_string());
            format!("<!--\u{E000}{}-->", conditionals.len() - 1)
        } else {
            String::new()
        }
    });

    // 2. CSS and script comments
    let out = CODE_COMMENTS.apply(&out);

    // 3. <style> bodies
    let out = STYLE_BLOCK.replace_all(&out, |caps: &Captures| {
        format!("{}{}{}", &caps[1], CSS_RULES.apply(&caps[2]).trim(), &caps[3])
    });

    // 4. inline <script> bodies
    let out = SCRIPT_BLOCK.replace_all(&out, |caps: &Captures| {
        if SRC_ATTRIBUTE.is_match(&caps[1]) {
            caps[0].to_string()
        } else {
            format!("{}{}{}", &caps[1], JS_RULES.apply(&caps[2]).trim(), &caps[3])
        }
    });

    // 5. markup whitespace
    let out = MARKUP_RULES.apply(&out);
    let out = out.trim();

    if conditionals.is_empty() {
        return out.to_string();
    }

    CONDITIONAL_PLACEHOLDER
        .replace_all(out, |caps: &Captures| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|i| conditionals.get(i))
                .cloned()
                .unwrap_or_default()
        })
        .into_owned()
}

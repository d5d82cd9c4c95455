//! The [`SanitizedHtml`] document type.

use std::fmt;

/// HTML that has passed through a [`Sanitizer`](crate::Sanitizer).
///
/// Only sanitizers and the minifier can construct this type, so holding one
/// is proof that the markup went through the preview policy. Raw, untrusted
/// input is always a plain `&str`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SanitizedHtml(String);

impl SanitizedHtml {
    pub(crate) fn new(html: String) -> Self {
        Self(html)
    }

    /// The sanitized markup.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Size in UTF-8 bytes.
    pub fn byte_len(&self) -> usize {
        self.0.len()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for SanitizedHtml {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SanitizedHtml {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

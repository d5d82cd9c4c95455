//! Ordered regex rewrite rules.

use regex::Regex;

/// A sequence of regex find-and-replace rules.
///
/// Rules are applied in order; each rule operates on the output of the
/// previous one. Replacements use the `regex` crate syntax, so `$1` refers to
/// the first capture group.
pub(crate) struct RewriteRules {
    rules: Vec<(Regex, String)>,
}

impl RewriteRules {
    /// Build from `(pattern, replacement)` pairs.
    ///
    /// # Panics
    ///
    /// Panics if any pattern is invalid. Only used with constant patterns.
    pub(crate) fn new(rules: &[(&str, &str)]) -> Self {
        let rules = rules
            .iter()
            .map(|(pattern, replacement)| {
                (
                    Regex::new(pattern).expect("invalid minifier pattern"),
                    replacement.to_string(),
                )
            })
            .collect();
        Self { rules }
    }

    pub(crate) fn apply(&self, text: &str) -> String {
        self.rules
            .iter()
            .fold(text.to_string(), |acc, (re, replacement)| {
                re.replace_all(&acc, replacement.as_str()).into_owned()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rules_applied_in_order() {
        let rules = RewriteRules::new(&[(r"\s+", " "), (r"\s*;\s*", ";")]);
        assert_eq!(rules.apply("a  ;\n\n b"), "a;b");
    }

    #[test]
    fn capture_groups_in_replacement() {
        let rules = RewriteRules::new(&[(r"<([^>]+?)\s+>", "<$1>")]);
        assert_eq!(rules.apply(r#"<div class="x"   >"#), r#"<div class="x">"#);
    }

    #[test]
    fn no_rules_returns_original() {
        let rules = RewriteRules::new(&[]);
        assert_eq!(rules.apply("<p> unchanged </p>"), "<p> unchanged </p>");
    }

    #[test]
    #[should_panic(expected = "invalid minifier pattern")]
    fn invalid_pattern_panics() {
        RewriteRules::new(&[("[invalid", "x")]);
    }
}

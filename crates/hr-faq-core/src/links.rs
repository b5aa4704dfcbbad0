//! Link whitelisting for model output.
//!
//! Completion answers may contain links the company does not vouch for.
//! [`LinkPolicy::sanitize`] keeps links whose URL matches a whitelist
//! pattern and replaces every other link with [`LINK_REMOVED`]:
//!
//! 1. Markdown links `[label](https://…)` become `label [link kaldırıldı]`.
//! 2. Bare `http(s)://` URLs become `[link kaldırıldı]`; trailing
//!    punctuation such as `).,;!?` is kept outside the URL.

use std::sync::OnceLock;

use anyhow::{Context, Result};
use regex::{Captures, Regex, RegexBuilder};

/// Placeholder inserted where a link was removed.
pub const LINK_REMOVED: &str = "[link kaldırıldı]";

fn markdown_link_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\[([^\]]+)\]\((https?://[^)]+)\)").expect("markdown link pattern is valid")
    })
}

fn bare_url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(https?://\S+?)([),.;!?]*)(\s|$)").expect("bare url pattern is valid")
    })
}

/// Compiled URL whitelist.
#[derive(Debug, Clone, Default)]
pub struct LinkPolicy {
    patterns: Vec<Regex>,
}

impl LinkPolicy {
    /// Compiles whitelist patterns, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first pattern that is not a valid regex.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| {
                let p = p.as_ref();
                RegexBuilder::new(p)
                    .case_insensitive(true)
                    .build()
                    .with_context(|| format!("invalid whitelist pattern: '{}'", p))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    /// A URL is allowed if any pattern matches anywhere in it.
    pub fn is_allowed(&self, url: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(url))
    }

    pub fn sanitize(&self, text: &str) -> String {
        let text = markdown_link_regex().replace_all(text, |caps: &Captures| {
            if self.is_allowed(&caps[2]) {
                caps[0].to_string()
            } else {
                format!("{} {}", &caps[1], LINK_REMOVED)
            }
        });

        bare_url_regex()
            .replace_all(&text, |caps: &Captures| {
                let url = &caps[1];
                let kept = if self.is_allowed(url) { url } else { LINK_REMOVED };
                format!("{}{}{}", kept, &caps[2], &caps[3])
            })
            .into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(patterns: &[&str]) -> LinkPolicy {
        LinkPolicy::new(patterns).unwrap()
    }

    #[test]
    fn test_bare_url_removed_with_empty_whitelist() {
        let out = policy(&[]).sanitize("see https://evil.example/x");
        assert_eq!(out, format!("see {}", LINK_REMOVED));
    }

    #[test]
    fn test_bare_url_kept_when_whitelisted() {
        let text = "see https://evil.example/x";
        assert_eq!(policy(&[r"evil\.example"]).sanitize(text), text);
    }

    #[test]
    fn test_trailing_punctuation_preserved() {
        let out = policy(&[]).sanitize("Bakınız (https://evil.example/x). Sonra");
        assert_eq!(out, format!("Bakınız ({}). Sonra", LINK_REMOVED));
    }

    #[test]
    fn test_markdown_link_removed_keeps_label() {
        let out = policy(&[r"betaenerji\.com"]).sanitize("Detay: [buraya](https://other.org/a) tıklayın");
        assert_eq!(out, format!("Detay: buraya {} tıklayın", LINK_REMOVED));
    }

    #[test]
    fn test_markdown_link_whitelisted_untouched() {
        let text = "Başvuru: [Kariyer](https://betaenerji.com/kariyer)";
        assert_eq!(policy(&[r"betaenerji\.com"]).sanitize(text), text);
    }

    #[test]
    fn test_whitelist_case_insensitive() {
        let text = "https://BetaEnerji.COM/iletisim adresine yazın";
        assert_eq!(policy(&[r"betaenerji\.com"]).sanitize(text), text);
    }

    #[test]
    fn test_mixed_links() {
        let out = policy(&[r"good\.com"])
            .sanitize("a https://good.com/1 b https://bad.com/2, c");
        assert_eq!(out, format!("a https://good.com/1 b {}, c", LINK_REMOVED));
    }

    #[test]
    fn test_text_without_links_unchanged() {
        let text = "Başvurular kariyer sayfamızdan alınır.";
        assert_eq!(policy(&[]).sanitize(text), text);
        assert_eq!(policy(&[]).sanitize(""), "");
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let err = LinkPolicy::new(&["[oops"]).unwrap_err();
        assert!(err.to_string().contains("[oops"));
    }
}

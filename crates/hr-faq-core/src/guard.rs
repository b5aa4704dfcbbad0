//! Sensitive-topic pre-filter.
//!
//! Questions about pay, pregnancy, religion, age, visas/residence, or
//! interview questions are not answered by the assistant; the client shows
//! a redirect to HR instead and never contacts the backend.

use std::sync::OnceLock;

use regex::Regex;

const SENSITIVE_PATTERN: &str =
    r"(?i)(maaş|salary|pazarlık|hamile|dini|yaş|vize|oturum|mülakat soruları)";

fn sensitive_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(SENSITIVE_PATTERN).expect("sensitive pattern is valid"))
}

/// Returns true if `text` touches a sensitive topic.
pub fn is_sensitive(text: &str) -> bool {
    sensitive_regex().is_match(text)
}

/// The fixed redirect message pointing users at `contact`.
pub fn redirect_message(contact: &str) -> String {
    format!(
        "Bu konu özel değerlendirme/hukuki danışmanlık gerektirebilir. Resmî bilgi için İK: {}",
        contact
    )
}

/// Returns the redirect message if `text` is sensitive, `None` otherwise.
pub fn pre_guard(text: &str, contact: &str) -> Option<String> {
    is_sensitive(text).then(|| redirect_message(contact))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTACT: &str = "https://example.com/iletisim";

    #[test]
    fn test_salary_question_is_redirected() {
        let msg = pre_guard("Başlangıç maaşı ne kadar?", CONTACT).unwrap();
        assert!(msg.contains(CONTACT));
        assert!(msg.starts_with("Bu konu"));
    }

    #[test]
    fn test_case_insensitive() {
        assert!(is_sensitive("What is the SALARY range?"));
        assert!(is_sensitive("VIZE işlemleri"));
        assert!(is_sensitive("Mülakat soruları neler?"));
    }

    #[test]
    fn test_regular_question_passes() {
        assert!(pre_guard("Staj başvurusu nasıl yapılır?", CONTACT).is_none());
        assert!(pre_guard("", CONTACT).is_none());
    }
}

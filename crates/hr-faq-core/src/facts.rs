//! Canonical fact substitution.
//!
//! The completion model sometimes invents the facility size. When an answer
//! talks about a facility or area in square metres, every `N m²` figure is
//! replaced with the configured canonical value.

use std::sync::OnceLock;

use regex::{NoExpand, Regex};

use crate::models::HrConfig;

/// Fact key holding the canonical facility size, e.g. `"15.000 m²"`.
pub const FACILITY_SIZE_FACT: &str = "facility_size_m2";

/// Figures like `12.000 m²`. The boundary and digits are ASCII-only so a
/// Turkish letter directly before a figure still starts a new word.
fn area_figure_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?-u:\b)[0-9]{1,3}(\.[0-9]{3})*(\s*m²)").expect("area pattern is valid")
    })
}

fn unit_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)m²").expect("unit pattern is valid"))
}

fn facility_context_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)tesis|fabrika|alan").expect("context pattern is valid"))
}

/// Replaces square-metre figures with `facility_size` when the text is
/// about a facility or area. Text without both cues is returned unchanged.
pub fn substitute_facility_size(text: &str, facility_size: &str) -> String {
    if facility_size.is_empty()
        || !unit_regex().is_match(text)
        || !facility_context_regex().is_match(text)
    {
        return text.to_string();
    }
    area_figure_regex()
        .replace_all(text, NoExpand(facility_size))
        .into_owned()
}

/// Applies every canonical fact substitution configured in `config`.
pub fn apply_canonical_facts(text: &str, config: &HrConfig) -> String {
    match config
        .facts
        .get(FACILITY_SIZE_FACT)
        .and_then(|v| v.as_text())
    {
        Some(size) => substitute_facility_size(text, size),
        None => text.to_string(),
    }
}

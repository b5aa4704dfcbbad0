//! System prompt construction for the completion fallback.
//!
//! The prompt is rendered once from a template with three placeholders:
//!
//! | Placeholder | Replaced with |
//! |-------------|---------------|
//! | `{brand}`   | [`HrConfig::brand`] |
//! | `{facts}`   | [`flatten_facts`] output |
//! | `{contact}` | the `contact` link |

use crate::models::HrConfig;

/// Built-in system prompt template.
pub const DEFAULT_SYSTEM_PROMPT: &str = "\
Sen {brand} için çalışan dijital insan kaynakları asistanısın.
Kullanıcılara işe alım, staj, başvuru süreci, mülakat, özgeçmiş ve şirket hakkında rehberlik edersin.
Profesyonel bir dille yardımcı olur, motive eder ve doğru kanala yönlendirirsin.

Şirkete ait doğrulanmış bilgiler aşağıdadır; bunları resmi kaynak olarak kullan:
{facts}

Kurallar:
1. Soru doğrudan şirket bilgisiyle ilgiliyse (adres, çalışan sayısı, sektör) yalnızca bu verileri kullan.
2. Soru kariyer, başvuru veya mülakatla ilgiliyse genel İK deneyimine dayanarak rehberlik et.
3. Empatik, saygılı ve motive edici bir dil kullan.
4. Bilgi kesin değilse \"Genellikle\" diyerek sürecin nasıl işlediğini açıkla.
5. Yeni sayı uydurma, yanlış bilgi verme.
6. Gerektiğinde kullanıcıyı resmi kanala yönlendir: {contact}.

Cevaplarını Türkçe, samimi ama profesyonel bir üslupla, 2-4 cümle olarak yaz.
";

/// Flattens facts into `key: value` pairs joined by `"; "`.
///
/// Underscores in keys become spaces; list values are joined by `", "`.
///
/// ```rust
/// # use hr_faq_core::models::{FactValue, HrConfig};
/// # use hr_faq_core::prompt::flatten_facts;
/// let mut cfg: HrConfig = serde_json::from_str(r#"{"brand":"Beta"}"#).unwrap();
/// cfg.facts.insert("employee_count", FactValue::Text("350".into()));
/// assert_eq!(flatten_facts(&cfg), "employee count: 350");
/// ```
pub fn flatten_facts(config: &HrConfig) -> String {
    config
        .facts
        .iter()
        .map(|(k, v)| format!("{}: {}", k.replace('_', " "), v.joined()))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Renders `template` with values from `config`.
pub fn render_system_prompt(template: &str, config: &HrConfig) -> String {
    template
        .replace("{brand}", &config.brand)
        .replace("{facts}", &flatten_facts(config))
        .replace("{contact}", config.contact().unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> HrConfig {
        serde_json::from_str(
            r#"{
                "brand": "Beta Enerji",
                "links": { "contact": "https://example.com/iletisim" },
                "facts": {
                    "facility_size_m2": "15.000 m²",
                    "sectors": ["enerji", "otomotiv"]
                }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_flatten_facts() {
        assert_eq!(
            flatten_facts(&config()),
            "facility size m2: 15.000 m²; sectors: enerji, otomotiv"
        );
    }

    #[test]
    fn test_flatten_keeps_config_order() {
        let cfg: HrConfig = serde_json::from_str(
            r#"{"brand":"x","facts":{"location":"Kocaeli","employee_count":"350"}}"#,
        )
        .unwrap();
        assert_eq!(flatten_facts(&cfg), "location: Kocaeli; employee count: 350");
    }

    #[test]
    fn test_flatten_no_facts() {
        let cfg: HrConfig = serde_json::from_str(r#"{"brand":"x"}"#).unwrap();
        assert_eq!(flatten_facts(&cfg), "");
    }

    #[test]
    fn test_default_prompt_interpolates_everything() {
        let prompt = render_system_prompt(DEFAULT_SYSTEM_PROMPT, &config());
        assert!(prompt.contains("Beta Enerji"));
        assert!(prompt.contains("sectors: enerji, otomotiv"));
        assert!(prompt.contains("https://example.com/iletisim"));
        assert!(!prompt.contains('{'));
    }

    #[test]
    fn test_custom_template() {
        let prompt = render_system_prompt("{brand}|{contact}", &config());
        assert_eq!(prompt, "Beta Enerji|https://example.com/iletisim");
    }
}

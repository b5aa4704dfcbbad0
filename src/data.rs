//! Static JSON data: brand config and FAQ list.
//!
//! Both files are parsed twice over: once into typed values used by the
//! answer pipeline, and once kept as raw JSON so the HTTP endpoints can
//! serve them exactly as written on disk.

use anyhow::{Context, Result};
use serde_json::Value;
use std::path::Path;

use hr_faq_core::models::{validate_faq, FaqEntry, HrConfig};

use crate::config::DataConfig;

/// Loaded, validated static data.
#[derive(Debug, Clone)]
pub struct HrData {
    pub config: HrConfig,
    pub faq: Vec<FaqEntry>,
    /// The config file as written on disk.
    pub config_json: Value,
    /// The FAQ file as written on disk.
    pub faq_json: Value,
}

impl HrData {
    /// Builds data from already-parsed values; raw JSON is derived from them.
    #[cfg(test)]
    pub(crate) fn from_parts(config: HrConfig, faq: Vec<FaqEntry>) -> Result<Self> {
        config.validate()?;
        validate_faq(&faq)?;
        Ok(Self {
            config_json: serde_json::to_value(&config)?,
            faq_json: serde_json::to_value(&faq)?,
            config,
            faq,
        })
    }
}

pub fn load_data(paths: &DataConfig) -> Result<HrData> {
    let config_json = read_json(&paths.config)?;
    let config: HrConfig = serde_json::from_value(config_json.clone())
        .with_context(|| format!("Invalid HR config: {}", paths.config.display()))?;
    config
        .validate()
        .with_context(|| format!("Invalid HR config: {}", paths.config.display()))?;

    let faq_json = read_json(&paths.faq)?;
    let faq: Vec<FaqEntry> = serde_json::from_value(faq_json.clone())
        .with_context(|| format!("Invalid FAQ file: {}", paths.faq.display()))?;
    validate_faq(&faq).with_context(|| format!("Invalid FAQ file: {}", paths.faq.display()))?;

    Ok(HrData {
        config,
        faq,
        config_json,
        faq_json,
    })
}

fn read_json(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read data file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse JSON: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_data(config: &str, faq: &str) -> (tempfile::TempDir, DataConfig) {
        let tmp = tempfile::tempdir().unwrap();
        let cfg_path = tmp.path().join("config.json");
        let faq_path = tmp.path().join("sss.tr.json");
        fs::write(&cfg_path, config).unwrap();
        fs::write(&faq_path, faq).unwrap();
        (
            tmp,
            DataConfig {
                config: cfg_path,
                faq: faq_path,
            },
        )
    }

    const CONFIG: &str = r#"{
        "brand": "Beta Enerji • İK Chat",
        "links": { "contact": "https://example.com/iletisim", "careers_tr": "https://example.com/kariyer" },
        "whitelist": ["example\\.com"],
        "facts": { "facility_size_m2": "15.000 m²" },
        "extra": { "theme": "dark" }
    }"#;

    #[test]
    fn test_load_data() {
        let (_tmp, paths) = write_data(CONFIG, r#"[{"q":"Staj var mı?","a":"Evet."}]"#);
        let data = load_data(&paths).unwrap();
        assert_eq!(data.faq.len(), 1);
        assert_eq!(data.config.contact(), Some("https://example.com/iletisim"));
        // Unknown keys survive in the raw copy.
        assert_eq!(data.config_json["extra"]["theme"], "dark");
    }

    #[test]
    fn test_raw_config_keeps_key_order() {
        let (_tmp, paths) = write_data(CONFIG, "[]");
        let data = load_data(&paths).unwrap();
        let keys: Vec<&String> = data.config_json.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["brand", "links", "whitelist", "facts", "extra"]);
    }

    #[test]
    fn test_invalid_whitelist_fails_fast() {
        let bad = CONFIG.replace(r#"example\\.com"#, "(broken");
        let (_tmp, paths) = write_data(&bad, "[]");
        assert!(load_data(&paths).is_err());
    }

    #[test]
    fn test_faq_entry_without_answer_fails() {
        let (_tmp, paths) = write_data(CONFIG, r#"[{"q":"Staj var mı?"}]"#);
        let err = load_data(&paths).unwrap_err();
        assert!(format!("{:#}", err).contains("Invalid FAQ file"));
    }

    #[test]
    fn test_malformed_json_fails() {
        let (_tmp, paths) = write_data("{ not json", "[]");
        let err = load_data(&paths).unwrap_err();
        assert!(err.to_string().contains("Failed to parse JSON"));
    }
}

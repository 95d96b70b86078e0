use std::collections::BTreeMap;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::models::settings::{PickerConfig, PickerOptions};

/// Shared picker configurations: one `[default]` table plus any number of
/// `[named.<name>]` tables.
///
/// ```toml
/// [default]
/// culture = "en-GB"
///
/// [named.booking]
/// min_span = 2
/// max_span = 14
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigRegistry {
    default: PickerOptions,
    named: BTreeMap<String, PickerOptions>,
}

impl ConfigRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_toml_str(data: &str) -> Result<Self> {
        toml::from_str(data).context("invalid picker config")
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("failed to serialize picker config")
    }

    pub fn default_options(&self) -> &PickerOptions {
        &self.default
    }

    pub fn set_default(&mut self, options: PickerOptions) {
        self.default = options;
    }

    pub fn get(&self, name: &str) -> Option<&PickerOptions> {
        self.named.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, options: PickerOptions) {
        self.named.insert(name.into(), options);
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.named.keys().map(String::as_str)
    }

    /// Resolve a picker configuration.
    ///
    /// Precedence: `explicit` > the named table > the `[default]` table >
    /// hard-coded defaults. An unknown name falls back to `[default]`.
    pub fn resolve(&self, name: Option<&str>, explicit: PickerOptions) -> Result<PickerConfig> {
        let named = match name {
            Some(name) => match self.named.get(name) {
                Some(options) => options.clone(),
                None => {
                    log::warn!("Unknown picker config '{}', using defaults", name);
                    PickerOptions::default()
                }
            },
            None => PickerOptions::default(),
        };

        explicit
            .or(named)
            .or(self.default.clone())
            .resolve()
            .map_err(|e| anyhow!("Invalid picker config '{}': {}", name.unwrap_or("default"), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::settings::{load_registry, save_registry};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"
[default]
culture = "en-GB"
reset_on_clear = false

[named.booking]
min_span = 2
max_span = 14
min_date = "2024-01-01"

[named.report]
date_format = "yyyy-MM-dd"
linked_calendars = false
"#;

    #[test]
    fn test_parse_registry() {
        let registry = ConfigRegistry::from_toml_str(SAMPLE).unwrap();
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["booking", "report"]);
        assert_eq!(registry.get("booking").unwrap().max_span, Some(14));
        assert_eq!(registry.default_options().culture.as_deref(), Some("en-GB"));
    }

    #[test]
    fn test_resolve_precedence() {
        let registry = ConfigRegistry::from_toml_str(SAMPLE).unwrap();
        let explicit = PickerOptions::new().max_span(7);
        let config = registry.resolve(Some("booking"), explicit).unwrap();

        assert_eq!(config.max_span, Some(7));
        assert_eq!(config.min_span, Some(2));
        assert_eq!(config.min_date, NaiveDate::from_ymd_opt(2024, 1, 1));
        // From [default]
        assert_eq!(config.date_format.pattern(), "dd/MM/yyyy");
        assert!(!config.reset_on_clear);
        // Hard-coded
        assert_eq!(config.custom_range_label, "Custom Range");
    }

    #[test]
    fn test_unknown_name_uses_default_table() {
        let registry = ConfigRegistry::from_toml_str(SAMPLE).unwrap();
        let config = registry.resolve(Some("missing"), PickerOptions::new()).unwrap();
        assert_eq!(config.first_day_of_week, 1);
        assert_eq!(config.min_span, None);
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let registry = ConfigRegistry::from_toml_str("[named.bad]\nmin_span = 5\nmax_span = 2\n").unwrap();
        let err = registry.resolve(Some("bad"), PickerOptions::new()).unwrap_err();
        assert!(err.to_string().contains("bad"));
    }

    #[test]
    fn test_malformed_toml_is_an_error() {
        assert!(ConfigRegistry::from_toml_str("[default\nculture = ").is_err());
    }

    #[test]
    fn test_missing_file_is_empty_registry() {
        let temp_dir = TempDir::new().unwrap();
        let registry = load_registry(&temp_dir.path().join("pickers.toml")).unwrap();
        assert_eq!(registry, ConfigRegistry::new());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("pickers.toml");

        let mut registry = ConfigRegistry::new();
        registry.set_default(PickerOptions::new().culture("de-DE"));
        registry.insert("trip", PickerOptions::new().min_span(1).auto_apply(true));
        save_registry(&path, &registry).unwrap();

        let loaded = load_registry(&path).unwrap();
        assert_eq!(loaded, registry);
    }
}

//! Configuration loading and representation.
//!
//! The change feed is configured from a JSON document:
//!
//! ```json
//! {
//!   "targets": { "main": { "enabled": true }, "backup": { "enabled": false } },
//!   "default_locale": "en_US",
//!   "locales": ["en_US", "fr_FR"],
//!   "default_channel": "WEB",
//!   "origin_label": "Catalog Bundle",
//!   "store_name": "Catalog",
//!   "locks": { "lifetime": { "mode": "expiring", "seconds": 30 } }
//! }
//! ```
//!
//! Everything except `default_locale` has a default. `SyncConfig::load` reads
//! a file, `SyncConfig::from_env` reads the path from `COMMITFEED_CONFIG`.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use commitfeed_catalog::{Locale, LocaleSettings, PricingWriter};
use commitfeed_core::TargetId;
use commitfeed_events::ObjectType;

/// Environment variable holding the configuration file path.
pub const CONFIG_PATH_ENV: &str = "COMMITFEED_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// One configured sync target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Display name used in diagnostics.
    #[serde(default)]
    pub name: Option<String>,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            name: None,
        }
    }
}

/// How long an acquired lock suppresses changes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum LockLifetime {
    /// Active until released or cleared by the hosting application.
    #[default]
    UntilReleased,
    /// Active for a fixed number of seconds after acquisition.
    Expiring { seconds: u64 },
}

/// When the change listener takes locks on its own.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LockPolicy {
    pub lifetime: LockLifetime,
    /// Lock a created entity (and its product aggregate) after the create commit.
    pub lock_on_create: bool,
    /// Lock the product aggregate after a product update commit.
    pub lock_after_product_update: bool,
}

impl Default for LockPolicy {
    fn default() -> Self {
        Self {
            lifetime: LockLifetime::UntilReleased,
            lock_on_create: true,
            lock_after_product_update: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(default)]
    pub targets: BTreeMap<TargetId, TargetConfig>,
    pub default_locale: String,
    #[serde(default)]
    pub locales: Vec<String>,
    #[serde(default)]
    pub default_channel: Option<String>,
    #[serde(default = "default_origin_label")]
    pub origin_label: String,
    #[serde(default = "default_store_name")]
    pub store_name: String,
    #[serde(default)]
    pub locks: LockPolicy,
}

impl SyncConfig {
    /// Minimal configuration: one locale, no target.
    pub fn new(default_locale: impl Into<String>) -> Self {
        let default_locale = default_locale.into();
        Self {
            targets: BTreeMap::new(),
            locales: vec![default_locale.clone()],
            default_locale,
            default_channel: None,
            origin_label: default_origin_label(),
            store_name: default_store_name(),
            locks: LockPolicy::default(),
        }
    }

    pub fn with_target(mut self, target: impl Into<TargetId>) -> Self {
        self.targets.insert(target.into(), TargetConfig::default());
        self
    }

    pub fn with_disabled_target(mut self, target: impl Into<TargetId>) -> Self {
        self.targets.insert(
            target.into(),
            TargetConfig {
                enabled: false,
                name: None,
            },
        );
        self
    }

    pub fn with_locks(mut self, locks: LockPolicy) -> Self {
        self.locks = locks;
        self
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: SyncConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading sync configuration from {}", path.display()))?;
        Self::from_json_str(&raw)
            .with_context(|| format!("loading sync configuration from {}", path.display()))
    }

    pub fn from_env() -> anyhow::Result<Self> {
        let path = std::env::var(CONFIG_PATH_ENV)
            .with_context(|| format!("{CONFIG_PATH_ENV} is not set"))?;
        Self::load(path)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_locale.trim().is_empty() {
            return Err(ConfigError::Invalid("default_locale is empty".to_string()));
        }
        if !self.locales.is_empty() && !self.locales.contains(&self.default_locale) {
            return Err(ConfigError::Invalid(format!(
                "default_locale '{}' is not listed in locales",
                self.default_locale
            )));
        }
        if let Some(blank) = self.targets.keys().find(|id| id.as_str().trim().is_empty()) {
            return Err(ConfigError::Invalid(format!("blank target id '{blank}'")));
        }
        if let LockLifetime::Expiring { seconds: 0 } = self.locks.lifetime {
            return Err(ConfigError::Invalid("lock lifetime of 0 seconds".to_string()));
        }
        Ok(())
    }

    /// Enabled targets, in id order.
    pub fn enabled_targets(&self) -> impl Iterator<Item = &TargetId> {
        self.targets
            .iter()
            .filter(|(_, target)| target.enabled)
            .map(|(id, _)| id)
    }

    /// Commit note for an object type.
    pub fn note_for(&self, object_type: ObjectType) -> String {
        commit_note(&self.store_name, object_type)
    }

    pub fn locale_settings(&self) -> LocaleSettings {
        let locales = if self.locales.is_empty() {
            vec![Locale::new(self.default_locale.clone())]
        } else {
            self.locales.iter().cloned().map(Locale::new).collect()
        };
        LocaleSettings::new(self.default_locale.clone(), locales)
    }

    /// Price writer falling back to `default_channel`.
    pub fn pricing_writer(&self) -> PricingWriter {
        match &self.default_channel {
            Some(code) => PricingWriter::new().with_default_channel(code.clone()),
            None => PricingWriter::new(),
        }
    }
}

pub fn commit_note(store_name: &str, object_type: ObjectType) -> String {
    format!("Change committed on {store_name} for {object_type}")
}

fn default_true() -> bool {
    true
}

fn default_origin_label() -> String {
    "Commitfeed".to_string()
}

fn default_store_name() -> String {
    "Store".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"{
        "targets": { "main": { "enabled": true }, "backup": { "enabled": false, "name": "Backup" } },
        "default_locale": "en_US",
        "locales": ["en_US", "fr_FR"],
        "default_channel": "WEB",
        "origin_label": "Catalog Bundle",
        "store_name": "Catalog",
        "locks": { "lifetime": { "mode": "expiring", "seconds": 30 }, "lock_on_create": false }
    }"#;

    #[test]
    fn parses_full_document() {
        let config = SyncConfig::from_json_str(FULL).unwrap();

        assert_eq!(config.targets.len(), 2);
        assert_eq!(config.enabled_targets().collect::<Vec<_>>(), vec![&TargetId::new("main")]);
        assert_eq!(config.default_channel.as_deref(), Some("WEB"));
        assert_eq!(config.pricing_writer().default_channel_code(), Some("WEB"));
        assert_eq!(config.locks.lifetime, LockLifetime::Expiring { seconds: 30 });
        assert!(!config.locks.lock_on_create);
        assert!(config.locks.lock_after_product_update);
        assert_eq!(config.note_for(ObjectType::Order), "Change committed on Catalog for Order");
    }

    #[test]
    fn applies_defaults() {
        let config = SyncConfig::from_json_str(r#"{ "default_locale": "en_US" }"#).unwrap();

        assert!(config.targets.is_empty());
        assert_eq!(config.origin_label, "Commitfeed");
        assert_eq!(config.locks, LockPolicy::default());
        assert_eq!(config.locks.lifetime, LockLifetime::UntilReleased);
        assert_eq!(config.locale_settings().locales().len(), 1);
        assert_eq!(config.pricing_writer(), PricingWriter::new());
    }

    #[test]
    fn rejects_default_locale_outside_locales() {
        let err = SyncConfig::from_json_str(r#"{ "default_locale": "de_DE", "locales": ["en_US"] }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_blank_target_and_empty_locale() {
        assert!(matches!(
            SyncConfig::new("en_US").with_target(" ").validate(),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(SyncConfig::new("").validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = SyncConfig::from_json_str("{ not json").unwrap_err();
        match err {
            ConfigError::Parse(_) => {}
            other => panic!("Expected Parse, got {other:?}"),
        }
    }

    #[test]
    fn load_reports_missing_file_with_path() {
        let err = SyncConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(format!("{err:#}").contains("/definitely/not/here.json"));
    }

    #[test]
    fn load_reads_file() {
        let path = std::env::temp_dir().join(format!("commitfeed-config-{}.json", std::process::id()));
        std::fs::write(&path, FULL).unwrap();

        let config = SyncConfig::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.store_name, "Catalog");
    }
}

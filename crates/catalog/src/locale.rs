use serde::{Deserialize, Serialize};

use commitfeed_core::{Entity, EntityId};

/// A store locale (e.g. "en_US").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locale {
    pub id: Option<EntityId>,
    pub code: String,
}

impl Locale {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            id: None,
            code: code.into(),
        }
    }
}

impl Entity for Locale {
    const KIND: &'static str = "Locale";

    fn id(&self) -> Option<EntityId> {
        self.id
    }
}

/// Default locale plus the list of locales exposed to sync targets.
///
/// Multi-locale fields are exchanged as one field per locale: the default
/// locale uses the bare field name, every other locale appends `_<code>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleSettings {
    default_locale: String,
    locales: Vec<Locale>,
}

impl LocaleSettings {
    pub fn new(default_locale: impl Into<String>, locales: Vec<Locale>) -> Self {
        Self {
            default_locale: default_locale.into(),
            locales,
        }
    }

    pub fn locales(&self) -> &[Locale] {
        &self.locales
    }

    pub fn default_locale_code(&self) -> &str {
        &self.default_locale
    }

    pub fn is_default_locale(&self, locale: &Locale) -> bool {
        locale.code == self.default_locale
    }

    /// The default locale or one of the listed locales.
    pub fn is_supported(&self, locale: &Locale) -> bool {
        self.is_default_locale(locale) || self.locales.iter().any(|known| known.code == locale.code)
    }

    /// Field id suffix for a locale: empty for the default locale.
    pub fn locale_suffix(&self, locale: &Locale) -> String {
        if self.is_default_locale(locale) {
            String::new()
        } else {
            format!("_{}", locale.code)
        }
    }

    /// Base field name of a localized field id, or `None` if the field id does
    /// not belong to `locale`.
    pub fn decode_field_name<'f>(&self, locale: &Locale, field_name: &'f str) -> Option<&'f str> {
        if self.is_default_locale(locale) {
            return Some(field_name);
        }
        field_name
            .strip_suffix(locale.code.as_str())
            .and_then(|rest| rest.strip_suffix('_'))
            .filter(|base| !base.is_empty())
    }
}

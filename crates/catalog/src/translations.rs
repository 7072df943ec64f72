//! Idempotent writes of per-locale product, option and option value texts.
//!
//! Every setter follows the same discipline:
//!
//! 1. ignore locales the store does not expose;
//! 2. locate the translation row for the locale, creating it when absent;
//! 3. compare the stored value with the proposed one;
//! 4. write, and report `true`, only when the value actually changed.
//!
//! A row created on the way keeps its seed values and is not a change by
//! itself, so writing a value equal to the seed reports `false`.

use uuid::Uuid;

use crate::locale::{Locale, LocaleSettings};
use crate::product::{
    OptionTranslation, OptionValueTranslation, Product, ProductOption, ProductOptionValue,
    ProductTranslation, ProductVariant, TranslatedField,
};

/// Reads and writes localized texts of catalog aggregates.
#[derive(Debug, Clone)]
pub struct TranslationWriter {
    settings: LocaleSettings,
}

impl TranslationWriter {
    pub fn new(settings: LocaleSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &LocaleSettings {
        &self.settings
    }

    /// Translated product text, empty when the locale has no translation yet.
    pub fn get_translated<'p>(&self, product: &'p Product, locale: &Locale, field: TranslatedField) -> &'p str {
        if !self.settings.is_supported(locale) {
            return "";
        }
        product
            .translation(&locale.code)
            .map(|translation| field.get(translation))
            .unwrap_or("")
    }

    /// Set a translated product text; returns whether the product changed.
    ///
    /// A missing translation is seeded from `variant` (name = variant code,
    /// unique slug derived from it) so the new row is valid before any real
    /// content arrives. Unsupported locales are ignored.
    pub fn set_translated(
        &self,
        product: &mut Product,
        variant: &ProductVariant,
        locale: &Locale,
        field: TranslatedField,
        value: &str,
    ) -> bool {
        if !self.settings.is_supported(locale) {
            return false;
        }
        let owner = product.id;
        let translation = product
            .translations
            .entry(locale.code.clone())
            .or_insert_with(|| seed_translation(owner, variant, locale));

        if field.get(translation) == value {
            return false;
        }
        field.set(translation, value.to_string());
        true
    }

    /// Set the localized name of a product option.
    pub fn set_option_translation(&self, option: &mut ProductOption, locale: &Locale, value: &str) -> bool {
        if !self.settings.is_supported(locale) {
            return false;
        }
        let translation = option
            .translations
            .entry(locale.code.clone())
            .or_insert_with(|| OptionTranslation {
                locale: locale.code.clone(),
                name: String::new(),
            });

        if translation.name == value {
            return false;
        }
        translation.name = value.to_string();
        true
    }

    /// Set the localized label of a product option value.
    pub fn set_option_value_translation(
        &self,
        option_value: &mut ProductOptionValue,
        locale: &Locale,
        value: &str,
    ) -> bool {
        if !self.settings.is_supported(locale) {
            return false;
        }
        let translation = option_value
            .translations
            .entry(locale.code.clone())
            .or_insert_with(|| OptionValueTranslation {
                locale: locale.code.clone(),
                value: String::new(),
            });

        if translation.value == value {
            return false;
        }
        translation.value = value.to_string();
        true
    }
}

fn seed_translation(
    owner: Option<commitfeed_core::EntityId>,
    variant: &ProductVariant,
    locale: &Locale,
) -> ProductTranslation {
    ProductTranslation {
        id: None,
        locale: locale.code.clone(),
        translatable: owner,
        name: variant.code.clone(),
        slug: unique_slug(&variant.code),
        ..ProductTranslation::default()
    }
}

fn unique_slug(code: &str) -> String {
    format!("{}{}", code, Uuid::now_v7().simple())
}

#[cfg(test)]
mod tests {
    use super::*;
    use commitfeed_core::EntityId;

    fn writer() -> TranslationWriter {
        TranslationWriter::new(LocaleSettings::new(
            "en",
            vec![Locale::new("en"), Locale::new("fr")],
        ))
    }

    fn fixtures() -> (Product, ProductVariant) {
        let product = Product::new(EntityId::new(1), "MUG").with_variants([EntityId::new(10)]);
        let variant = ProductVariant::new(EntityId::new(10), "MUG-RED", EntityId::new(1));
        (product, variant)
    }

    #[test]
    fn first_write_creates_seeded_translation() {
        let (mut product, variant) = fixtures();
        let en = Locale::new("en");

        assert!(writer().set_translated(&mut product, &variant, &en, TranslatedField::Description, "Red mug"));

        let translation = product.translation("en").unwrap();
        assert_eq!(translation.name, "MUG-RED");
        assert!(translation.slug.starts_with("MUG-RED"));
        assert!(translation.slug.len() > "MUG-RED".len());
        assert_eq!(translation.translatable, Some(EntityId::new(1)));
        assert_eq!(translation.description, "Red mug");
    }

    #[test]
    fn identical_value_reports_no_change() {
        let (mut product, variant) = fixtures();
        let en = Locale::new("en");
        let w = writer();

        assert!(w.set_translated(&mut product, &variant, &en, TranslatedField::Name, "Red mug"));
        assert!(!w.set_translated(&mut product, &variant, &en, TranslatedField::Name, "Red mug"));
        assert!(w.set_translated(&mut product, &variant, &en, TranslatedField::Name, "Blue mug"));
        assert_eq!(w.get_translated(&product, &en, TranslatedField::Name), "Blue mug");
    }

    #[test]
    fn value_equal_to_seed_is_not_a_change() {
        let (mut product, variant) = fixtures();
        let fr = Locale::new("fr");

        assert!(!writer().set_translated(&mut product, &variant, &fr, TranslatedField::Name, "MUG-RED"));
        assert_eq!(product.translation("fr").unwrap().name, "MUG-RED");
    }

    #[test]
    fn empty_option_labels_on_fresh_rows_are_not_changes() {
        let w = writer();
        let en = Locale::new("en");
        let mut option = ProductOption::default();
        let mut value = ProductOptionValue::default();

        assert!(!w.set_option_translation(&mut option, &en, ""));
        assert!(!w.set_option_value_translation(&mut value, &en, ""));
        assert_eq!(option.translations["en"].locale, "en");
    }

    #[test]
    fn unsupported_locale_is_ignored() {
        let (mut product, variant) = fixtures();
        let de = Locale::new("de");
        let w = writer();
        let mut option = ProductOption::default();

        assert!(!w.set_translated(&mut product, &variant, &de, TranslatedField::Name, "Becher"));
        assert!(!w.set_option_translation(&mut option, &de, "Größe"));
        assert!(product.translations.is_empty());
        assert!(option.translations.is_empty());
        assert_eq!(w.get_translated(&product, &de, TranslatedField::Name), "");
    }

    #[test]
    fn seeded_slugs_are_unique() {
        let (mut product, variant) = fixtures();
        let w = writer();
        w.set_translated(&mut product, &variant, &Locale::new("en"), TranslatedField::Name, "a");
        w.set_translated(&mut product, &variant, &Locale::new("fr"), TranslatedField::Name, "b");

        assert_ne!(product.translation("en").unwrap().slug, product.translation("fr").unwrap().slug);
    }

    #[test]
    fn missing_translation_reads_as_empty() {
        let (product, _) = fixtures();
        assert_eq!(writer().get_translated(&product, &Locale::new("fr"), TranslatedField::Name), "");
    }

    #[test]
    fn option_and_value_translations_are_idempotent() {
        let w = writer();
        let en = Locale::new("en");
        let mut option = ProductOption { code: "size".to_string(), ..ProductOption::default() };
        let mut value = ProductOptionValue { code: "size_xl".to_string(), ..ProductOptionValue::default() };

        assert!(w.set_option_translation(&mut option, &en, "Size"));
        assert!(!w.set_option_translation(&mut option, &en, "Size"));
        assert_eq!(option.translations["en"].name, "Size");

        assert!(w.set_option_value_translation(&mut value, &en, "XL"));
        assert!(!w.set_option_value_translation(&mut value, &en, "XL"));
        assert_eq!(value.translations["en"].locale, "en");
    }
}

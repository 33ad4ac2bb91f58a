//! Locale selection and translation lookup.
//!
//! Translation content is supplied by the embedding application; this module
//! only decides which strings apply. A [`TranslationRegistry`] is built once at
//! startup and passed to whatever renders the widget.

use std::collections::BTreeMap;

/// Locale used when nothing better matches.
pub const DEFAULT_LOCALE: &str = "en_US";

/// Locale codes the widget ships translations for.
pub const SUPPORTED_LOCALES: &[&str] = &[
    "da_DK", "de_DE", "en_AU", "en_GB", "en_US", "es_ES", "fr_CA", "fr_FR", "id_ID", "it_IT",
    "ja_JP", "ko_KR", "nl_NL", "no_NO", "pl_PL", "pt_BR", "pt_PT", "ru_RU", "sv_SE", "th_TH",
    "zh_CN", "zh_HK", "zh_TW",
];

/// Translation key to display string.
pub type Translations = BTreeMap<String, String>;

/// Registry of translations keyed by locale code.
#[derive(Debug, Clone)]
pub struct TranslationRegistry {
    default_strings: Translations,
    locales: BTreeMap<String, Translations>,
}

impl TranslationRegistry {
    /// Creates a registry whose [`DEFAULT_LOCALE`] strings are `default_strings`.
    #[must_use]
    pub fn new(default_strings: Translations) -> Self {
        Self {
            default_strings,
            locales: BTreeMap::new(),
        }
    }

    /// Creates a registry that knows every code in [`SUPPORTED_LOCALES`] but
    /// carries no strings. Useful for resolving locale codes only.
    #[must_use]
    pub fn supported() -> Self {
        let mut registry = Self::new(Translations::new());
        for code in SUPPORTED_LOCALES {
            registry.register(*code, Translations::new());
        }
        registry
    }

    /// Registers (or replaces) the strings for `locale`.
    pub fn register(&mut self, locale: impl Into<String>, strings: Translations) -> &mut Self {
        self.locales.insert(locale.into(), strings);
        self
    }

    /// Builder-style variant of [`Self::register`].
    #[must_use]
    pub fn with_locale(mut self, locale: impl Into<String>, strings: Translations) -> Self {
        self.register(locale, strings);
        self
    }

    /// Returns `true` if `locale` has registered strings.
    #[must_use]
    pub fn contains(&self, locale: &str) -> bool {
        locale == DEFAULT_LOCALE || self.locales.contains_key(locale)
    }

    /// Resolves a requested locale to a registered code.
    ///
    /// Tries an exact match, then the `_`-separated spelling (`fr-CA` becomes
    /// `fr_CA`), then a locale of the same language: [`DEFAULT_LOCALE`] for
    /// English, the `xx_XX` form when registered, otherwise the first
    /// registered one. Falls back to [`DEFAULT_LOCALE`].
    #[must_use]
    pub fn resolve_locale<'a>(&'a self, requested: Option<&str>) -> &'a str {
        let Some(requested) = requested.map(str::trim).filter(|s| !s.is_empty()) else {
            return DEFAULT_LOCALE;
        };

        let normalized = requested.replace('-', "_");
        if let Some((code, _)) = self.locales.get_key_value(normalized.as_str()) {
            return code;
        }

        let language = normalized
            .split_once('_')
            .map_or(normalized.as_str(), |(lang, _)| lang)
            .to_ascii_lowercase();
        if DEFAULT_LOCALE.starts_with(&format!("{language}_")) {
            return DEFAULT_LOCALE;
        }
        let canonical = format!("{language}_{}", language.to_ascii_uppercase());
        if let Some((code, _)) = self.locales.get_key_value(canonical.as_str()) {
            return code;
        }
        self.locales
            .keys()
            .find(|code| {
                code.split_once('_')
                    .map_or(code.as_str(), |(lang, _)| lang)
                    .eq_ignore_ascii_case(&language)
            })
            .map_or(DEFAULT_LOCALE, String::as_str)
    }

    /// Returns the strings to display for `requested`.
    ///
    /// Default strings are overlaid with the resolved locale's strings and
    /// then with `overrides`.
    #[must_use]
    pub fn translations(&self, requested: Option<&str>, overrides: &Translations) -> Translations {
        let mut strings = self.default_strings.clone();
        if let Some(localized) = self.locales.get(self.resolve_locale(requested)) {
            strings.extend(localized.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        strings.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
        strings
    }
}

impl Default for TranslationRegistry {
    fn default() -> Self {
        Self::supported()
    }
}

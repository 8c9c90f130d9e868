//! UI string lookup.
//!
//! Views never hold display text of their own; they ask a [`Translate`]
//! implementation for it by key. The built-in [`Catalog`] is compiled from
//! `locales/strings.toml`.

use std::collections::HashMap;

use gpa_core::Language;
use thiserror::Error;

const BUILTIN_STRINGS: &str = include_str!("../locales/strings.toml");

/// Language-tagged string lookup.
pub trait Translate {
    fn lookup(
        &self,
        language: Language,
        key: &str,
    ) -> Option<&str>;

    /// The display string for `key`, or the key itself when untranslated.
    fn translate(
        &self,
        language: Language,
        key: &str,
    ) -> String {
        match self.lookup(language, key) {
            Some(text) => text.to_string(),
            None => key.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("string table is not valid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("string table has unknown language '{0}'")]
    UnknownLanguage(String),
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    tables: HashMap<Language, HashMap<String, String>>,
}

impl Catalog {
    /// Parses a TOML document with one `[tag]` table per language.
    pub fn from_toml_str(source: &str) -> Result<Self, CatalogError> {
        let raw: HashMap<String, HashMap<String, String>> = toml::from_str(source)?;

        let mut tables = HashMap::new();
        for (tag, strings) in raw {
            let language =
                Language::parse(&tag).ok_or_else(|| CatalogError::UnknownLanguage(tag.clone()))?;
            tables.insert(language, strings);
        }

        Ok(Self { tables })
    }

    /// The strings shipped with the binary.
    ///
    /// A broken table is logged and yields an empty catalog, which shows keys.
    pub fn builtin() -> Self {
        Self::from_toml_str(BUILTIN_STRINGS).unwrap_or_else(|e| {
            tracing::error!(error = %e, "built-in string table failed to load");
            Self::default()
        })
    }

    pub fn keys(
        &self,
        language: Language,
    ) -> Vec<&str> {
        let mut keys: Vec<&str> = self
            .tables
            .get(&language)
            .map(|table| table.keys().map(String::as_str).collect())
            .unwrap_or_default();
        keys.sort_unstable();
        keys
    }
}

impl Translate for Catalog {
    fn lookup(
        &self,
        language: Language,
        key: &str,
    ) -> Option<&str> {
        self.tables.get(&language)?.get(key).map(String::as_str)
    }
}

/// A translator bound to one language.
#[derive(Clone, Copy)]
pub struct Localizer<'a> {
    translator: &'a dyn Translate,
    language: Language,
}

impl<'a> Localizer<'a> {
    pub fn new(
        translator: &'a dyn Translate,
        language: Language,
    ) -> Self {
        Self {
            translator,
            language,
        }
    }

    pub fn t(
        &self,
        key: &str,
    ) -> String {
        self.translator.translate(self.language, key)
    }
}

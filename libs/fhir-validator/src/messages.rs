//! Message catalog for report findings.
//!
//! Lookup is explicit: the requested locale's table (exact tag, then the
//! primary language subtag), then the built-in English table. Formatting
//! never fails; a missing translation degrades to the default message.

use std::collections::{BTreeMap, HashMap};

use crate::error::ConfigError;

pub const DEFAULT_LOCALE: &str = "en";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MessageKey {
    UnsupportedContentType,
    ContentProcessing,
    ContentParse,
    ContentParsed,
    IgSpecified,
    ProfileSpecified,
}

impl MessageKey {
    pub const ALL: [MessageKey; 6] = [
        Self::UnsupportedContentType,
        Self::ContentProcessing,
        Self::ContentParse,
        Self::ContentParsed,
        Self::IgSpecified,
        Self::ProfileSpecified,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnsupportedContentType => "error.content.type.unsupported",
            Self::ContentProcessing => "error.content.processing",
            Self::ContentParse => "error.content.parse",
            Self::ContentParsed => "info.content.parsed",
            Self::IgSpecified => "info.ig.specified",
            Self::ProfileSpecified => "info.profile.specified",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == key)
    }

    /// Built-in English template.
    pub fn default_template(&self) -> &'static str {
        match self {
            Self::UnsupportedContentType => {
                "Unsupported content type: {0}. Expected application/fhir+json"
            }
            Self::ContentProcessing => "Content processing error: {0}",
            Self::ContentParse => "Failed to parse JSON as FHIR resource: {0}",
            Self::ContentParsed => "JSON successfully parsed as valid FHIR resource",
            Self::IgSpecified => "Implementation Guide specified: {0}",
            Self::ProfileSpecified => "Profile specified: {0}",
        }
    }
}

impl std::fmt::Display for MessageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Turns a message key and its arguments into display text.
pub trait MessageFormatter: Send + Sync {
    fn format(&self, locale: &str, key: MessageKey, args: &[&str]) -> String;
}

/// Per-locale message tables over the built-in English defaults.
#[derive(Debug, Clone, Default)]
pub struct MessageCatalog {
    locales: HashMap<String, HashMap<MessageKey, String>>,
}

impl MessageCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from string-keyed tables, as found in configuration.
    pub fn from_tables(
        tables: &BTreeMap<String, BTreeMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        let mut catalog = Self::new();
        for (locale, table) in tables {
            if locale.trim().is_empty() {
                return Err(ConfigError::EmptyLocale);
            }
            for (key, template) in table {
                let message_key =
                    MessageKey::from_key(key).ok_or_else(|| ConfigError::UnknownMessageKey {
                        locale: locale.clone(),
                        key: key.clone(),
                    })?;
                catalog.insert(locale, message_key, template.clone());
            }
        }
        Ok(catalog)
    }

    pub fn insert(&mut self, locale: &str, key: MessageKey, template: impl Into<String>) {
        self.locales
            .entry(normalize_locale(locale))
            .or_default()
            .insert(key, template.into());
    }

    pub fn with_message(
        mut self,
        locale: &str,
        key: MessageKey,
        template: impl Into<String>,
    ) -> Self {
        self.insert(locale, key, template);
        self
    }

    pub fn has_locale(&self, locale: &str) -> bool {
        self.locales.contains_key(&normalize_locale(locale))
    }

    /// Template for `key` in `locale`, falling back to the default table.
    pub fn template(&self, locale: &str, key: MessageKey) -> &str {
        let tag = normalize_locale(locale);
        let primary = tag.split('-').next().unwrap_or_default();

        for candidate in [tag.as_str(), primary] {
            let found = self
                .locales
                .get(candidate)
                .and_then(|table| table.get(&key));
            if let Some(template) = found {
                return template;
            }
        }
        key.default_template()
    }
}

impl MessageFormatter for MessageCatalog {
    fn format(&self, locale: &str, key: MessageKey, args: &[&str]) -> String {
        render(self.template(locale, key), args)
    }
}

/// Lower-case, with `_` separators folded to `-` (`sv_SE` -> `sv-se`).
fn normalize_locale(locale: &str) -> String {
    locale.trim().replace('_', "-").to_ascii_lowercase()
}

/// Substitute positional `{n}` placeholders. Missing arguments render empty.
pub fn render(template: &str, args: &[&str]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let placeholder = after
            .find('}')
            .and_then(|close| after[..close].parse::<usize>().ok().map(|idx| (idx, close)));

        match placeholder {
            Some((idx, close)) => {
                out.push_str(args.get(idx).copied().unwrap_or_default());
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_matches_plugin_messages() {
        let catalog = MessageCatalog::new();
        assert_eq!(
            catalog.format("en", MessageKey::UnsupportedContentType, &["text/plain"]),
            "Unsupported content type: text/plain. Expected application/fhir+json"
        );
        assert_eq!(
            catalog.format("en", MessageKey::ContentParsed, &[]),
            "JSON successfully parsed as valid FHIR resource"
        );
    }

    #[test]
    fn unknown_locale_falls_back_to_default() {
        let catalog = MessageCatalog::new();
        assert_eq!(
            catalog.format("xx-YY", MessageKey::IgSpecified, &["http://ig"]),
            "Implementation Guide specified: http://ig"
        );
    }

    #[test]
    fn locale_lookup_tries_exact_then_primary_subtag() {
        let catalog = MessageCatalog::new()
            .with_message("sv", MessageKey::ProfileSpecified, "Profil angiven: {0}")
            .with_message("sv-FI", MessageKey::IgSpecified, "IG (FI): {0}");

        assert_eq!(
            catalog.format("sv_SE", MessageKey::ProfileSpecified, &["p"]),
            "Profil angiven: p"
        );
        assert_eq!(catalog.format("sv-FI", MessageKey::IgSpecified, &["g"]), "IG (FI): g");
        // Missing key in the locale table degrades to English.
        assert_eq!(
            catalog.format("sv", MessageKey::IgSpecified, &["g"]),
            "Implementation Guide specified: g"
        );
    }

    #[test]
    fn from_tables_rejects_unknown_keys() {
        let mut tables = BTreeMap::new();
        tables.insert(
            "de".to_string(),
            BTreeMap::from([("info.nope".to_string(), "x".to_string())]),
        );
        let err = MessageCatalog::from_tables(&tables).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownMessageKey { .. }));
    }

    #[test]
    fn render_handles_positional_and_stray_braces() {
        assert_eq!(render("{0} and {1}", &["a", "b"]), "a and b");
        assert_eq!(render("{1}{0}", &["a", "b"]), "ba");
        assert_eq!(render("missing {2}.", &["a"]), "missing .");
        assert_eq!(render("{not a placeholder}", &[]), "{not a placeholder}");
        assert_eq!(render("open { brace", &[]), "open { brace");
    }

    #[test]
    fn keys_round_trip_through_strings() {
        for key in MessageKey::ALL {
            assert_eq!(MessageKey::from_key(key.as_str()), Some(key));
        }
    }
}

//! Validator configuration, loadable from YAML.
//!
//! ```yaml
//! default_locale: en
//! messages:
//!   sv:
//!     info.content.parsed: "JSON tolkad som giltig FHIR-resurs"
//!     info.ig.specified: "Implementationsguide angiven: {0}"
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::messages::{MessageCatalog, MessageKey, DEFAULT_LOCALE};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Locale used when a request carries no `locale` parameter.
    pub default_locale: String,
    /// Extra message tables, keyed by locale tag then message key.
    pub messages: BTreeMap<String, BTreeMap<String, String>>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            default_locale: DEFAULT_LOCALE.to_string(),
            messages: BTreeMap::new(),
        }
    }
}

impl ValidatorConfig {
    pub fn builder() -> ValidatorConfigBuilder {
        ValidatorConfigBuilder::default()
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml(&yaml)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_locale.trim().is_empty() {
            return Err(ConfigError::EmptyLocale);
        }
        self.catalog().map(|_| ())
    }

    /// Message catalog holding the configured tables.
    pub fn catalog(&self) -> Result<MessageCatalog, ConfigError> {
        MessageCatalog::from_tables(&self.messages)
    }
}

#[derive(Debug, Default)]
pub struct ValidatorConfigBuilder {
    config: ValidatorConfig,
}

impl ValidatorConfigBuilder {
    pub fn default_locale(mut self, locale: impl Into<String>) -> Self {
        self.config.default_locale = locale.into();
        self
    }

    pub fn message(
        mut self,
        locale: impl Into<String>,
        key: MessageKey,
        template: impl Into<String>,
    ) -> Self {
        self.config
            .messages
            .entry(locale.into())
            .or_default()
            .insert(key.as_str().to_string(), template.into());
        self
    }

    pub fn build(self) -> ValidatorConfig {
        self.config
    }
}

//! Runtime configuration handed to the orchestrator at startup
//!
//! Nothing in the crate reads process-wide state: hosts detect the locale
//! and pick the catalogs, then pass a [`Config`] into [`crate::app::App`].

use std::sync::Arc;

use garde::Validate;
use serde::{Deserialize, Serialize};

use crate::{catalog::Catalog, constants};

/// Configuration for one application instance
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Config {
    /// Interest, topic and language lists offered by the wizard
    #[garde(dive)]
    #[serde(default)]
    pub catalog: Catalog,
    /// Locale preselected on the details step
    #[garde(length(min = 2))]
    #[serde(default = "default_language")]
    pub default_language: String,
}

fn default_language() -> String {
    constants::language::DEFAULT.to_owned()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog: Catalog::default(),
            default_language: default_language(),
        }
    }
}

/// Errors raised while loading a configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration is not valid JSON for [`Config`]
    #[error("configuration could not be parsed: {0}")]
    Parse(#[from] serde_json::Error),
    /// The configuration parsed but violates a limit
    #[error("configuration is invalid: {0}")]
    Invalid(#[from] garde::Report),
}

impl Config {
    /// Parses and validates a JSON configuration
    ///
    /// Missing fields fall back to the built-in catalog and default locale.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the text is not valid JSON or a catalog
    /// entry breaks a validation rule.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Returns a copy of this configuration with another default locale
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.default_language = language.into();
        self
    }

    pub(crate) fn shared_catalog(&self) -> Arc<Catalog> {
        Arc::new(self.catalog.clone())
    }
}

//! Register configuration

use crate::error::RegistryError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Register service configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Records per list page
    pub page_size: usize,
    /// Attempts at assigning a unique code before giving up
    pub max_code_retries: u32,
    /// Stage given to items moved into the active list
    pub initial_active_stage: String,
    /// Prefix of codes for items created without a block
    pub fallback_code_prefix: String,
    /// Zero-padded width of the fallback ordinal
    pub fallback_code_width: usize,
    /// Reject planned-item writes naming a block outside the user's rank
    pub enforce_block_guard: bool,
}

impl RegistryConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With page size
    #[inline]
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// With code retry budget
    #[inline]
    #[must_use]
    pub fn with_max_code_retries(mut self, retries: u32) -> Self {
        self.max_code_retries = retries;
        self
    }

    /// With block guard on or off
    #[inline]
    #[must_use]
    pub fn with_block_guard(mut self, enforce: bool) -> Self {
        self.enforce_block_guard = enforce;
        self
    }

    /// Parse from TOML; missing keys take their defaults
    ///
    /// # Errors
    /// [`RegistryError::Config`] on malformed TOML or invalid values.
    pub fn from_toml_str(source: &str) -> Result<Self, RegistryError> {
        let config: Self =
            toml::from_str(source).map_err(|e| RegistryError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file
    ///
    /// # Errors
    /// [`RegistryError::Config`] when the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| RegistryError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&source)
    }

    /// Check value ranges
    ///
    /// # Errors
    /// [`RegistryError::Config`] naming the first invalid value.
    pub fn validate(&self) -> Result<(), RegistryError> {
        if self.page_size == 0 {
            return Err(RegistryError::Config("page_size must be positive".into()));
        }
        if self.max_code_retries == 0 {
            return Err(RegistryError::Config(
                "max_code_retries must be positive".into(),
            ));
        }
        if self.initial_active_stage.trim().is_empty() {
            return Err(RegistryError::Config(
                "initial_active_stage must not be empty".into(),
            ));
        }
        Ok(())
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            page_size: 15,
            max_code_retries: 3,
            initial_active_stage: "ТЗ".to_string(),
            fallback_code_prefix: "PL-".to_string(),
            fallback_code_width: 4,
            enforce_block_guard: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = RegistryConfig::from_toml_str("page_size = 50").unwrap();
        assert_eq!(config.page_size, 50);
        assert_eq!(config.max_code_retries, 3);
        assert_eq!(config.initial_active_stage, "ТЗ");
    }

    #[test]
    fn zero_page_size_rejected() {
        assert!(matches!(
            RegistryConfig::from_toml_str("page_size = 0"),
            Err(RegistryError::Config(_))
        ));
    }

    #[test]
    fn malformed_toml_rejected() {
        assert!(RegistryConfig::from_toml_str("page_size = [").is_err());
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_code_retries = 5\nenforce_block_guard = false").unwrap();
        let config = RegistryConfig::load(file.path()).unwrap();
        assert_eq!(config.max_code_retries, 5);
        assert!(!config.enforce_block_guard);
    }

    #[test]
    fn missing_file_is_config_error() {
        assert!(matches!(
            RegistryConfig::load("/nonexistent/normreg.toml"),
            Err(RegistryError::Config(_))
        ));
    }
}

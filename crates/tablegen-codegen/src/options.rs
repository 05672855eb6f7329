// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Compilation options and their merge with the in-source config marker.
//!
//! # Options
//!
//! | Key | Value | Default |
//! |-----|-------|---------|
//! | `tablegen.db-naming-strategy` | selector | `lower-snake-case` |
//! | `tablegen.code-naming-strategy` | selector | `default` |
//! | `tablegen.default-catalog` | name | none |
//! | `tablegen.default-schema` | name | none |
//! | `tablegen.allow-reflection` | `true` / `false` | `false` |
//!
//! Keys outside the `tablegen.` namespace belong to other tools and are
//! skipped. A `#[tablegen_config]` marker overrides every option it sets.

use tracing::trace;

use crate::{
    error::ConfigError,
    naming::{DEFAULT_CODING, LOWER_SNAKE_CASE},
    parse::ConfigAttrs
};

const PREFIX: &str = "tablegen.";

/// Options passed to a generation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodegenOptions {
    /// Database naming strategy selector.
    pub db_naming_strategy:   Option<String>,
    /// Coding naming strategy selector.
    pub code_naming_strategy: Option<String>,
    /// Default catalog of every table.
    pub default_catalog:      Option<String>,
    /// Default schema of every table.
    pub default_schema:       Option<String>,
    /// Allow `from_record` to default non-column fields.
    pub allow_reflection:     Option<bool>
}

impl CodegenOptions {
    /// Options from key/value pairs.
    ///
    /// # Errors
    ///
    /// See [`set`](Self::set).
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>
    {
        let mut options = Self::default();
        for (key, value) in pairs {
            options.set(key.as_ref(), value.as_ref())?;
        }
        Ok(options)
    }

    /// Apply one option.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::UnknownOption`] for an unknown `tablegen.` key
    /// - [`ConfigError::InvalidValue`] for a malformed boolean
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let Some(name) = key.strip_prefix(PREFIX) else {
            trace!(key, "skipping foreign option");
            return Ok(());
        };
        match name {
            "db-naming-strategy" => self.db_naming_strategy = Some(value.to_string()),
            "code-naming-strategy" => self.code_naming_strategy = Some(value.to_string()),
            "default-catalog" => self.default_catalog = Some(value.to_string()),
            "default-schema" => self.default_schema = Some(value.to_string()),
            "allow-reflection" => self.allow_reflection = Some(parse_bool(key, value)?),
            _ => return Err(ConfigError::UnknownOption(key.to_string()))
        }
        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key:      key.to_string(),
            value:    value.to_string(),
            expected: "`true` or `false`"
        })
    }
}

/// Effective configuration of one compilation unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Database naming strategy selector.
    pub db_naming_strategy:   String,
    /// Coding naming strategy selector.
    pub code_naming_strategy: String,
    /// Default catalog.
    pub default_catalog:      Option<String>,
    /// Default schema.
    pub default_schema:       Option<String>,
    /// Allow `from_record` to default non-column fields.
    pub allow_reflection:     bool
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self::merge(&CodegenOptions::default(), None)
    }
}

impl ResolvedConfig {
    /// Merge options with the marker; marker values win.
    #[must_use]
    pub fn merge(options: &CodegenOptions, marker: Option<&ConfigAttrs>) -> Self {
        let marker = marker.cloned().unwrap_or_default();
        Self {
            db_naming_strategy:   marker
                .naming_strategy
                .or_else(|| options.db_naming_strategy.clone())
                .unwrap_or_else(|| LOWER_SNAKE_CASE.to_string()),
            code_naming_strategy: marker
                .coding_naming_strategy
                .or_else(|| options.code_naming_strategy.clone())
                .unwrap_or_else(|| DEFAULT_CODING.to_string()),
            default_catalog:      marker
                .default_catalog
                .or_else(|| options.default_catalog.clone()),
            default_schema:       marker
                .default_schema
                .or_else(|| options.default_schema.clone()),
            allow_reflection:     marker
                .allow_reflection
                .or(options.allow_reflection)
                .unwrap_or(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn foreign_keys_are_skipped() {
        let options = CodegenOptions::from_pairs([("other.flag", "1")]).unwrap();
        assert_eq!(options, CodegenOptions::default());
    }

    #[test]
    fn known_keys() {
        let options = CodegenOptions::from_pairs([
            ("tablegen.db-naming-strategy", "upper-snake-case"),
            ("tablegen.default-schema", "hr"),
            ("tablegen.allow-reflection", "true")
        ])
        .unwrap();
        assert_eq!(options.db_naming_strategy.as_deref(), Some("upper-snake-case"));
        assert_eq!(options.default_schema.as_deref(), Some("hr"));
        assert_eq!(options.allow_reflection, Some(true));
    }

    #[test]
    fn unknown_key() {
        let err = CodegenOptions::from_pairs([("tablegen.naming", "x")]).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownOption(key) if key == "tablegen.naming"));
    }

    #[test]
    fn malformed_bool() {
        let err = CodegenOptions::from_pairs([("tablegen.allow-reflection", "yes")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn defaults() {
        let config = ResolvedConfig::default();
        assert_eq!(config.db_naming_strategy, LOWER_SNAKE_CASE);
        assert_eq!(config.code_naming_strategy, DEFAULT_CODING);
        assert!(!config.allow_reflection);
    }

    #[test]
    fn marker_overrides_options() {
        let options = CodegenOptions {
            db_naming_strategy: Some("upper-snake-case".into()),
            default_schema: Some("hr".into()),
            allow_reflection: Some(true),
            ..CodegenOptions::default()
        };
        let marker = ConfigAttrs {
            naming_strategy: Some("lower-snake-case".into()),
            allow_reflection: Some(false),
            ..ConfigAttrs::default()
        };
        let config = ResolvedConfig::merge(&options, Some(&marker));
        assert_eq!(config.db_naming_strategy, "lower-snake-case");
        assert_eq!(config.default_schema.as_deref(), Some("hr"));
        assert!(!config.allow_reflection);
    }
}

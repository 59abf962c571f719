// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Relation Configuration
//!
//! Settings attached to a base relation and inherited by every relation
//! chained from it.
//!
//! ## Example
//!
//! ```rust,ignore
//! use clausal_relation::RelationConfig;
//!
//! let config = RelationConfig {
//!     max_limit: Some(500),
//!     ..Default::default()
//! };
//! config.validate()?;
//! ```

use serde::Deserialize;
use serde_json::Value;

/// Settings shared by a relation and everything chained from it
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RelationConfig {
    /// Mark statements with association joins as read-only unless an
    /// explicit projection is given
    pub implicit_readonly: bool,

    /// Emit every freshly compiled statement at debug level
    pub log_compiled_ast: bool,

    /// Largest limit the default sanitizer accepts
    pub max_limit: Option<u64>,
}

impl Default for RelationConfig {
    fn default() -> Self {
        Self {
            implicit_readonly: true,
            log_compiled_ast: false,
            max_limit: None,
        }
    }
}

impl RelationConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_limit == Some(0) {
            return Err(ConfigError::InvalidMaxLimit {
                reason: "max_limit must be > 0".to_string(),
            });
        }
        Ok(())
    }

    /// Parse configuration from an application settings payload.
    ///
    /// Expected shape:
    /// {
    ///   "clausal": {
    ///     "implicitReadonly": true,
    ///     "logCompiledAst": false,
    ///     "maxLimit": 1000
    ///   }
    /// }
    ///
    /// Missing keys fall back to their defaults; a missing `clausal` section
    /// yields the default configuration.
    pub fn from_settings(settings: &Value) -> Result<Self, ConfigError> {
        let Some(section) = settings.get("clausal") else {
            return Ok(Self::default());
        };

        let config: Self = serde_json::from_value(section.clone())
            .map_err(|e| ConfigError::InvalidSettings(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Settings payload does not deserialize
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    /// Limit ceiling is unusable
    #[error("Invalid max limit: {reason}")]
    InvalidMaxLimit { reason: String },
}

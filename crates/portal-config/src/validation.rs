// SPDX-FileCopyrightText: 2026 Portal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as the base URL scheme and a non-zero timeout.

use crate::diagnostic::ConfigError;
use crate::model::PortalConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &PortalConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let base_url = config.api.base_url.trim();
    if base_url.is_empty() {
        errors.push(ConfigError::Validation {
            message: "api.base_url must not be empty".to_string(),
        });
    } else {
        let host = base_url
            .strip_prefix("http://")
            .or_else(|| base_url.strip_prefix("https://"));
        match host {
            None => errors.push(ConfigError::Validation {
                message: format!("api.base_url `{base_url}` must start with http:// or https://"),
            }),
            Some(rest) if rest.is_empty() || rest.starts_with('/') => {
                errors.push(ConfigError::Validation {
                    message: format!("api.base_url `{base_url}` has no host"),
                })
            }
            Some(rest) if rest.contains(char::is_whitespace) => {
                errors.push(ConfigError::Validation {
                    message: format!("api.base_url `{base_url}` must not contain whitespace"),
                })
            }
            Some(_) => {}
        }
    }

    if config.api.timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "api.timeout_secs must be greater than 0".to_string(),
        });
    }

    if !LOG_LEVELS.contains(&config.logging.level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "logging.level `{}` is not one of {}",
                config.logging.level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

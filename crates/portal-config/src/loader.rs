// SPDX-FileCopyrightText: 2026 Portal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./portal.toml` > `~/.config/portal/portal.toml` > `/etc/portal/portal.toml`
//! with environment variable overrides via `PORTAL_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::PortalConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/portal/portal.toml` (system-wide)
/// 3. `~/.config/portal/portal.toml` (user XDG config)
/// 4. `./portal.toml` (local directory)
/// 5. `PORTAL_*` environment variables
pub fn load_config() -> Result<PortalConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<PortalConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PortalConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<PortalConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PortalConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for config loading, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(PortalConfig::default()))
        .merge(Toml::file("/etc/portal/portal.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("portal/portal.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("portal.toml"))
        .merge(env_provider())
}

/// Environment provider mapping `PORTAL_<SECTION>_<KEY>` to `section.key`.
///
/// Uses `Env::map()` rather than `Env::split("_")` because keys contain
/// underscores: `PORTAL_API_BASE_URL` is `api.base_url`, not `api.base.url`.
fn env_provider() -> Env {
    Env::prefixed("PORTAL_").map(|key| env_key_to_path(key.as_str()).into())
}

/// Map a lowercased, prefix-stripped env var name to a dotted config path.
pub(crate) fn env_key_to_path(key: &str) -> String {
    key.replacen("api_", "api.", 1)
        .replacen("logging_", "logging.", 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_keep_inner_underscores() {
        assert_eq!(env_key_to_path("api_base_url"), "api.base_url");
        assert_eq!(env_key_to_path("api_timeout_secs"), "api.timeout_secs");
        assert_eq!(env_key_to_path("logging_level"), "logging.level");
    }

    #[test]
    fn env_override_applies_over_toml() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("portal.toml", "[api]\nbase_url = \"http://from-file:8000\"\n")?;
            jail.set_env("PORTAL_API_BASE_URL", "https://api.example.com");

            let config = load_config_from_path(Path::new("portal.toml"))?;
            assert_eq!(config.api.base_url, "https://api.example.com");
            Ok(())
        });
    }
}

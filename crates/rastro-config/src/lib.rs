//! Shared configuration for the rastro server and CLI.
//!
//! Layered loading: serialized defaults → `rastro.toml` → `RASTRO_`-
//! prefixed environment variables (e.g. `RASTRO_CONCURRENCY=8`,
//! `RASTRO_SIMULATION=true`). Credential resolution prefers an env-var
//! indirection over plaintext config, and translation to
//! [`TrackerConfig`] validates the upstream URL.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use rastro_core::TrackerConfig;
use rastro_core::config::DEFAULT_UPSTREAM_URL;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no upstream credential configured (set RASTRO_UPSTREAM_AUTH or run in simulation mode)")]
    NoCredentials,

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Config struct ───────────────────────────────────────────────────

/// Flat configuration surface, mirrored one-to-one by `RASTRO_*` env
/// variables.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Upstream endpoint URL.
    #[serde(default = "default_upstream_url")]
    pub upstream_url: String,

    /// Upstream credential, sent verbatim as the `Authorization` header
    /// (plaintext -- prefer `upstream_auth_env`).
    pub upstream_auth: Option<String>,

    /// Name of an environment variable holding the credential.
    pub upstream_auth_env: Option<String>,

    /// Per-call upstream timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Most codes accepted per batch request.
    #[serde(default = "default_max_codes")]
    pub max_codes: usize,

    /// Concurrent in-flight lookups per batch.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Fabricate envelopes instead of calling the upstream.
    #[serde(default)]
    pub simulation: bool,

    /// Listen address for the HTTP server.
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            upstream_url: default_upstream_url(),
            upstream_auth: None,
            upstream_auth_env: None,
            timeout_ms: default_timeout_ms(),
            max_codes: default_max_codes(),
            concurrency: default_concurrency(),
            simulation: false,
            listen: default_listen(),
        }
    }
}

fn default_upstream_url() -> String {
    DEFAULT_UPSTREAM_URL.into()
}
fn default_timeout_ms() -> u64 {
    15_000
}
fn default_max_codes() -> usize {
    200
}
fn default_concurrency() -> usize {
    1
}
fn default_listen() -> String {
    "0.0.0.0:3000".into()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("dev", "rastro", "rastro").map_or_else(
        || PathBuf::from("rastro.toml"),
        |dirs| dirs.config_dir().join("rastro.toml"),
    )
}

// ── Config loading ──────────────────────────────────────────────────

fn figment(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("RASTRO_"))
}

/// Load the full Config from the canonical file path + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    let config: Config = figment(&config_path()).extract()?;
    Ok(config)
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve the upstream credential: env-var indirection first, then
/// plaintext config.
pub fn resolve_credential(config: &Config) -> Option<SecretString> {
    if let Some(ref env_name) = config.upstream_auth_env {
        if let Ok(val) = std::env::var(env_name) {
            return Some(SecretString::from(val));
        }
    }

    config
        .upstream_auth
        .as_ref()
        .map(|auth| SecretString::from(auth.clone()))
}

// ── Translation to the runtime config ───────────────────────────────

/// Build a [`TrackerConfig`] from loaded configuration.
///
/// Real mode without a resolvable credential is refused here, before
/// anything is constructed.
pub fn to_tracker_config(config: &Config) -> Result<TrackerConfig, ConfigError> {
    let upstream_url = config
        .upstream_url
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "upstream_url".into(),
            reason: format!("invalid URL: {}", config.upstream_url),
        })?;

    let credential = resolve_credential(config);
    if !config.simulation && credential.is_none() {
        return Err(ConfigError::NoCredentials);
    }

    Ok(TrackerConfig {
        upstream_url,
        credential,
        timeout: Duration::from_millis(config.timeout_ms),
        max_codes: config.max_codes,
        concurrency: config.concurrency,
        simulation: config.simulation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // Relative path so the file lookup stays inside the jail directory.
    fn jail_config() -> Result<Config, figment::Error> {
        figment(Path::new("rastro.toml")).extract()
    }

    #[test]
    fn defaults_apply_without_file_or_env() {
        figment::Jail::expect_with(|_jail| {
            let config = jail_config()?;
            assert_eq!(config.timeout_ms, 15_000);
            assert_eq!(config.max_codes, 200);
            assert_eq!(config.concurrency, 1);
            assert!(!config.simulation);
            assert_eq!(config.upstream_url, DEFAULT_UPSTREAM_URL);
            Ok(())
        });
    }

    #[test]
    fn env_variables_override_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("RASTRO_CONCURRENCY", "8");
            jail.set_env("RASTRO_SIMULATION", "true");
            jail.set_env("RASTRO_MAX_CODES", "50");

            let config = jail_config()?;
            assert_eq!(config.concurrency, 8);
            assert!(config.simulation);
            assert_eq!(config.max_codes, 50);
            Ok(())
        });
    }

    #[test]
    fn toml_file_merges_and_env_wins() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "rastro.toml",
                r#"
                    timeout_ms = 5000
                    concurrency = 4
                "#,
            )?;
            jail.set_env("RASTRO_CONCURRENCY", "16");

            let config = jail_config()?;
            assert_eq!(config.timeout_ms, 5000);
            assert_eq!(config.concurrency, 16);
            Ok(())
        });
    }

    #[test]
    fn credential_env_indirection_wins_over_plaintext() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("TRACKING_KEY", "Apikey from-env");

            let config = Config {
                upstream_auth: Some("Apikey plaintext".into()),
                upstream_auth_env: Some("TRACKING_KEY".into()),
                ..Config::default()
            };

            let secret = resolve_credential(&config).expect("credential resolves");
            use secrecy::ExposeSecret;
            assert_eq!(secret.expose_secret(), "Apikey from-env");
            Ok(())
        });
    }

    #[test]
    fn real_mode_without_credential_is_refused() {
        let config = Config::default();
        assert!(matches!(
            to_tracker_config(&config),
            Err(ConfigError::NoCredentials)
        ));
    }

    #[test]
    fn simulation_mode_needs_no_credential() {
        let config = Config {
            simulation: true,
            ..Config::default()
        };
        let tracker = to_tracker_config(&config).expect("simulation mode builds");
        assert!(tracker.simulation);
        assert!(tracker.credential.is_none());
    }

    #[test]
    fn invalid_upstream_url_is_a_validation_error() {
        let config = Config {
            upstream_url: "not a url".into(),
            simulation: true,
            ..Config::default()
        };
        assert!(matches!(
            to_tracker_config(&config),
            Err(ConfigError::Validation { .. })
        ));
    }
}

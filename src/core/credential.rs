//! # Credential Lookup
//!
//! Finds the API key once, before any dispatch. Sources are checked in
//! order and the first non-blank value wins:
//!
//! 1. explicit (`--api-key`)
//! 2. secret store, `~/.sift/secrets.toml` (`OPENAI_API_KEY = "..."`)
//! 3. config file, `[openai] api_key`
//! 4. environment, `OPENAI_API_KEY`

use std::fmt;
use std::fs;
use std::path::PathBuf;

use log::{debug, info, warn};
use serde::Deserialize;

use super::config::{ConfigError, ResolvedConfig, config_dir};
use crate::inference::Credential;

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    Explicit,
    SecretStore,
    ConfigFile,
    Environment,
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CredentialSource::Explicit => "command line",
            CredentialSource::SecretStore => "secret store",
            CredentialSource::ConfigFile => "config file",
            CredentialSource::Environment => "environment",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Deserialize)]
struct SecretsFile {
    #[serde(rename = "OPENAI_API_KEY")]
    api_key: Option<String>,
}

/// Raw values from every source, before precedence is applied.
#[derive(Default)]
pub struct CredentialSources {
    pub explicit: Option<String>,
    pub secret_store: Option<String>,
    pub config_file: Option<String>,
    pub environment: Option<String>,
}

impl CredentialSources {
    /// Reads the secret store and environment; the other two come from the caller.
    pub fn gather(explicit: Option<String>, config: &ResolvedConfig) -> Self {
        Self {
            explicit,
            secret_store: read_secret_store(),
            config_file: config.openai_api_key.clone(),
            environment: std::env::var(API_KEY_ENV).ok(),
        }
    }

    fn ordered(&self) -> [(CredentialSource, Option<&str>); 4] {
        [
            (CredentialSource::Explicit, self.explicit.as_deref()),
            (CredentialSource::SecretStore, self.secret_store.as_deref()),
            (CredentialSource::ConfigFile, self.config_file.as_deref()),
            (CredentialSource::Environment, self.environment.as_deref()),
        ]
    }

    /// First non-blank value in precedence order.
    pub fn resolve(&self) -> Option<(Credential, CredentialSource)> {
        self.ordered().into_iter().find_map(|(source, value)| {
            value
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(|v| (Credential::new(v), source))
        })
    }

    /// Whether each source holds a key. Never exposes the key itself.
    pub fn report(&self) -> Vec<(CredentialSource, bool)> {
        self.ordered()
            .into_iter()
            .map(|(source, value)| (source, value.is_some_and(|v| !v.trim().is_empty())))
            .collect()
    }
}

/// Looks up the credential from every source. `None` if none is set.
pub fn resolve_credential(explicit: Option<String>, config: &ResolvedConfig) -> Option<Credential> {
    match CredentialSources::gather(explicit, config).resolve() {
        Some((credential, source)) => {
            info!("Using API key from {}", source);
            Some(credential)
        }
        None => {
            info!("No API key found in any source");
            None
        }
    }
}

/// Returns the path to `~/.sift/secrets.toml`.
pub fn secrets_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("secrets.toml"))
}

pub fn parse_secrets(contents: &str) -> Result<Option<String>, ConfigError> {
    let secrets: SecretsFile = toml::from_str(contents).map_err(ConfigError::Parse)?;
    Ok(secrets.api_key)
}

/// A missing or unreadable secret store counts as "not set".
fn read_secret_store() -> Option<String> {
    let path = secrets_path()?;
    if !path.exists() {
        debug!("No secret store at {}", path.display());
        return None;
    }
    let parsed = fs::read_to_string(&path)
        .map_err(ConfigError::Io)
        .and_then(|contents| parse_secrets(&contents));
    match parsed {
        Ok(key) => key,
        Err(e) => {
            warn!("Ignoring secret store {}: {}", path.display(), e);
            None
        }
    }
}

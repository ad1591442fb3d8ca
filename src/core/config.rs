//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.sift/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::Provider;
use crate::core::prompt::default_prompts;
use crate::inference::ProviderTable;
use crate::inference::providers::openai::DEFAULT_OPENAI_BASE_URL;
use crate::inference::providers::raw_http::DEFAULT_MAX_TOKENS;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SiftConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub openai: OpenAiConfig,
    #[serde(default)]
    pub prompts: PromptsConfig,
    #[serde(default)]
    pub models: Vec<ModelEntry>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub default_model: Option<String>,
    pub max_tokens: Option<u32>,
    pub system_prompt: Option<String>,
    pub system_prompt_file: Option<String>,
    pub concurrent: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct OpenAiConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct PromptsConfig {
    pub templates: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModelEntry {
    pub name: String,
    #[serde(default)]
    pub provider: Provider,
    pub endpoint: Option<String>,
    pub description: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_MODEL: &str = "gpt-4o";

pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a helpful assistant that analyzes and summarizes texts.";

// ============================================================================
// Resolved Config (concrete values)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub model_name: String,
    pub max_tokens: u32,
    /// `None` when the configured system prompt is blank.
    pub system_prompt: Option<String>,
    pub concurrent: bool,
    pub prompts: Vec<String>,
    /// The config-file credential. Env and secret store are handled in `credential`.
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub models: ProviderTable,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns `~/.sift`.
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".sift"))
}

/// Returns the path to `~/.sift/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load config from `~/.sift/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `SiftConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<SiftConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(SiftConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(SiftConfig::default());
    }

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let config = parse_config(&contents)?;
    info!("Loaded config from {}", path.display());
    Ok(config)
}

pub fn parse_config(contents: &str) -> Result<SiftConfig, ConfigError> {
    let config: SiftConfig = toml::from_str(contents).map_err(ConfigError::Parse)?;
    // Debug output would include api_key; log only the shape.
    debug!(
        "Config: default_model={:?}, models={}, prompts={:?}",
        config.general.default_model,
        config.models.len(),
        config.prompts.templates.as_ref().map(Vec::len)
    );
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# Sift Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# default_model = "gpt-4o"           # Or set SIFT_MODEL env var
# max_tokens = 150                   # Sent on raw-HTTP completion calls
# system_prompt = "You are a helpful assistant that analyzes and summarizes texts."
# system_prompt_file = "system.md"   # Path relative to ~/.sift/
# concurrent = false                 # Send all prompts at once

# [openai]
# api_key = "sk-..."                 # Or ~/.sift/secrets.toml, or OPENAI_API_KEY
# base_url = "https://api.openai.com/v1"

# [prompts]
# templates = [
#     "Summarize the key points of this text.",
#     "Identify the main themes and give a short explanation of each theme.",
#     "Ask three critical questions about the content of this text.",
# ]

# [[models]]
# name = "gpt-4o"
# provider = "native"
# description = "OpenAI chat completions"

# [[models]]
# name = "local-llama"
# provider = "raw_http"
# endpoint = "http://localhost:8080/v1/completions"
# description = "Self-hosted completion server"
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
///
/// `cli_model` is from the `--model` flag (None = not specified).
pub fn resolve(config: &SiftConfig, cli_model: Option<&str>) -> ResolvedConfig {
    // Model: CLI → env → config → default
    let model_name = cli_model
        .map(|s| s.to_string())
        .or_else(|| std::env::var("SIFT_MODEL").ok())
        .or_else(|| config.general.default_model.clone())
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());

    // OpenAI base URL: env → config → default
    let openai_base_url = std::env::var("OPENAI_BASE_URL")
        .ok()
        .or_else(|| config.openai.base_url.clone())
        .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string());

    let prompts = match &config.prompts.templates {
        Some(templates) if !templates.is_empty() => templates.clone(),
        _ => default_prompts(),
    };

    ResolvedConfig {
        model_name,
        max_tokens: config.general.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
        system_prompt: resolve_system_prompt(config),
        concurrent: config.general.concurrent.unwrap_or(false),
        prompts,
        openai_api_key: config.openai.api_key.clone(),
        openai_base_url,
        models: build_table(&config.models),
    }
}

/// Default table extended by `[[models]]` entries; later entries win.
fn build_table(entries: &[ModelEntry]) -> ProviderTable {
    let mut table = ProviderTable::default();
    for entry in entries {
        table.insert(
            &entry.name,
            entry.provider,
            entry.endpoint.clone(),
            entry.description.clone(),
        );
    }
    table
}

/// Resolves the system prompt: inline wins over file, both win over default.
/// A blank result disables the system role.
fn resolve_system_prompt(config: &SiftConfig) -> Option<String> {
    // Inline system_prompt takes priority
    if let Some(ref prompt) = config.general.system_prompt {
        let trimmed = prompt.trim();
        return (!trimmed.is_empty()).then(|| trimmed.to_string());
    }

    // Try loading from system_prompt_file (relative to ~/.sift/)
    if let Some(ref file) = config.general.system_prompt_file {
        if let Some(dir) = config_dir() {
            let prompt_path = dir.join(file);
            match fs::read_to_string(&prompt_path) {
                Ok(contents) => {
                    let trimmed = contents.trim().to_string();
                    if !trimmed.is_empty() {
                        info!("Loaded system prompt from {}", prompt_path.display());
                        return Some(trimmed);
                    }
                    warn!("System prompt file is empty: {}", prompt_path.display());
                }
                Err(e) => {
                    warn!(
                        "Failed to read system prompt file {}: {}",
                        prompt_path.display(),
                        e
                    );
                }
            }
        }
    }

    Some(DEFAULT_SYSTEM_PROMPT.to_string())
}

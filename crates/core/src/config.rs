use std::{
    fs::{self, File},
    io::Write,
    path::PathBuf,
};

use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;
use url::Url;

use crate::assets::{default_config_path, get_default_config};

/// Persona sent with every request unless the config file overrides it.
pub const DEFAULT_SYSTEM_INSTRUCTION: &str = "You are a specialized AI assistant that provides information exclusively about Cornell University. Your knowledge is based on real-time, grounded data. Answer all questions concisely and professionally, as a university expert would. If you are asked about a topic unrelated to Cornell, politely decline and redirect the user to ask about Cornell University instead. If a question is too broad or cannot be answered with the available information, ask for more specific details.";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("File system error: {0}")]
    IO(#[from] std::io::Error),
    #[error("YAML parsing error: {0}")]
    YAMLError(#[from] serde_yaml::Error),
    #[error("Configuration error: {0}")]
    Config(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    /// `generateContent` endpoint, without the `key` query parameter.
    pub endpoint: Url,
    /// Raw key setting, either a literal or `env:NAME`. See [`resolve_api_key`].
    pub api_key: String,
    pub system_instruction: String,
}

#[derive(Deserialize, Debug)]
struct RawConfig {
    endpoint: String,
    api_key: String,
    system_instruction: Option<String>,
}

impl RawConfig {
    #[instrument(skip(self))]
    fn to_config(&self) -> Result<Config, ConfigError> {
        let endpoint = Url::parse(self.endpoint.trim()).map_err(|e| {
            ConfigError::Config(format!("Invalid endpoint '{}': {e}", self.endpoint))
        })?;

        if self.api_key.trim().is_empty() {
            return Err(ConfigError::Config("api_key is required".to_string()));
        }

        let system_instruction = match &self.system_instruction {
            Some(s) if !s.trim().is_empty() => s.clone(),
            _ => DEFAULT_SYSTEM_INSTRUCTION.to_string(),
        };

        Ok(Config {
            endpoint,
            api_key: self.api_key.trim().to_string(),
            system_instruction,
        })
    }
}

/// Resolves the configured key. A value of the form `env:NAME` is read from
/// the environment variable `NAME`; anything else is used verbatim.
pub fn resolve_api_key(value: &str) -> Result<String, ConfigError> {
    let key = match value.strip_prefix("env:") {
        Some(var) => {
            let var = var.trim();
            std::env::var(var).map_err(|_| {
                ConfigError::Config(format!("Environment variable {var} not found"))
            })?
        }
        None => value.to_string(),
    };

    if key.trim().is_empty() {
        return Err(ConfigError::Config("api_key is empty".to_string()));
    }
    Ok(key)
}

#[instrument(skip(config_path))]
pub fn create_or_get_config_file(
    config_path: Option<PathBuf>,
) -> Result<(bool, PathBuf), ConfigError> {
    let actual_path = config_path.unwrap_or_else(default_config_path);

    let parent_dir = actual_path.parent().ok_or_else(|| {
        ConfigError::IO(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "Config path has no parent directory",
        ))
    })?;

    if !parent_dir.exists() {
        fs::create_dir_all(parent_dir)?;
    }

    if actual_path.exists() {
        Ok((true, actual_path))
    } else {
        File::create(&actual_path)?.write_all(get_default_config().as_bytes())?;
        Ok((false, actual_path))
    }
}

#[instrument(skip(config_path))]
pub fn get_config(config_path: Option<PathBuf>) -> Result<Config, ConfigError> {
    let (_, config_file) = create_or_get_config_file(config_path)?;
    let content = fs::read_to_string(&config_file)?;
    let raw: RawConfig = serde_yaml::from_str(&content)?;
    raw.to_config()
}

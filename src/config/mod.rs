mod types;

pub use types::*;

use crate::Result;
use std::env;
use tracing::{debug, info};

pub const CONFIG_PATH_VAR: &str = "CONFIG_PATH";
pub const API_KEY_VAR: &str = "GEMINI_API_KEY";
pub const IMAGE_API_URL_VAR: &str = "IMAGE_API_URL";

const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Loads the YAML config and applies environment overrides.
///
/// An explicit `CONFIG_PATH` must exist. Without it, a missing `config.yaml`
/// falls back to built-in defaults.
pub async fn load() -> Result<Config> {
    let config = match env::var(CONFIG_PATH_VAR) {
        Ok(path) => load_file(&path).await?,
        Err(_) => {
            if tokio::fs::try_exists(DEFAULT_CONFIG_PATH).await? {
                load_file(DEFAULT_CONFIG_PATH).await?
            } else {
                info!("No {} found, using built-in defaults", DEFAULT_CONFIG_PATH);
                Config::default()
            }
        }
    };

    Ok(apply_env_overrides(config, |name| env::var(name).ok()))
}

pub async fn load_file(path: &str) -> Result<Config> {
    debug!("Loading configuration from: {}", path);

    let config_str = tokio::fs::read_to_string(path).await?;
    let config: Config = serde_yaml::from_str(&config_str)?;

    Ok(config)
}

/// `lookup` is `std::env::var` in production and a map in tests.
pub fn apply_env_overrides<F>(mut config: Config, lookup: F) -> Config
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(key) = lookup(API_KEY_VAR).filter(|v| !v.trim().is_empty()) {
        debug!("Using LLM API key from {}", API_KEY_VAR);
        config.llm.api_key = key;
    }

    if let Some(url) = lookup(IMAGE_API_URL_VAR).filter(|v| !v.trim().is_empty()) {
        debug!("Using image classifier URL from {}", IMAGE_API_URL_VAR);
        config.image_classifier.url = Some(url);
    }

    config
}

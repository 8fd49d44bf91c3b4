use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const DEFAULT_ENV_PREFIX: &str = "TRENDYPIX";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub reddit: RedditConfig,
    #[serde(default)]
    pub images: ImagesConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RedditConfig {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for RedditConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            user_agent: default_user_agent(),
        }
    }
}

// Reddit rejects requests with a generic library user agent.
fn default_user_agent() -> String {
    "trendypix/0.1 (image scraper)".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImagesConfig {
    /// Hostnames image urls may point at, in addition to the built-in
    /// Reddit image hosts. Maintained outside the core pipeline.
    #[serde(default = "default_allowed_hosts")]
    pub allowed_hosts: Vec<String>,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            allowed_hosts: default_allowed_hosts(),
            limit: default_limit(),
        }
    }
}

fn default_allowed_hosts() -> Vec<String> {
    vec!["i.imgur.com".into()]
}

fn default_limit() -> u32 {
    25
}

#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    pub config_file: Option<PathBuf>,
    pub env_prefix: Option<String>,
}

pub fn load(options: LoadOptions) -> Result<Config> {
    let mut cfg = Config::default();

    if let Some(path) = options.config_file.as_ref() {
        if path.exists() {
            let from_file = read_config_file(path)?;
            cfg = merge_config(cfg, from_file);
        }
    } else if let Some(default_path) = default_config_path() {
        if default_path.exists() {
            let from_file = read_config_file(&default_path)?;
            cfg = merge_config(cfg, from_file);
        }
    }

    let prefix = options.env_prefix.as_deref().unwrap_or(DEFAULT_ENV_PREFIX);
    cfg = merge_config(cfg, load_env(prefix)?);

    Ok(cfg)
}

fn read_config_file(path: &Path) -> Result<Config> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file at {}", path.display()))?;
    let config: Config = serde_yaml::from_str(&data)
        .with_context(|| format!("Failed to parse config file at {}", path.display()))?;
    Ok(config)
}

fn merge_config(mut base: Config, other: Config) -> Config {
    if !other.reddit.client_id.is_empty() {
        base.reddit.client_id = other.reddit.client_id;
    }
    if !other.reddit.client_secret.is_empty() {
        base.reddit.client_secret = other.reddit.client_secret;
    }
    if !other.reddit.user_agent.is_empty() {
        base.reddit.user_agent = other.reddit.user_agent;
    }

    if !other.images.allowed_hosts.is_empty() {
        base.images.allowed_hosts = other.images.allowed_hosts;
    }
    if other.images.limit != 0 {
        base.images.limit = other.images.limit;
    }

    base
}

fn load_env(prefix: &str) -> Result<Config> {
    let mut map: HashMap<String, String> = HashMap::new();
    let upper_prefix = format!("{}_", prefix.to_uppercase());

    for (key, value) in env::vars() {
        if let Some(stripped) = key.strip_prefix(&upper_prefix) {
            let normalized = stripped.to_ascii_lowercase().replace("__", ".");
            map.insert(normalized, value);
        }
    }

    if map.is_empty() {
        return Ok(Config::default());
    }

    let mut cfg = Config::default();

    for (key, value) in map {
        apply_env_value(&mut cfg, &key, value);
    }

    Ok(cfg)
}

fn apply_env_value(cfg: &mut Config, key: &str, value: String) {
    match key {
        "reddit.client_id" => cfg.reddit.client_id = value,
        "reddit.client_secret" => cfg.reddit.client_secret = value,
        "reddit.user_agent" => cfg.reddit.user_agent = value,
        "images.allowed_hosts" => {
            cfg.images.allowed_hosts = value
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        "images.limit" => {
            if let Ok(parsed) = value.parse::<u32>() {
                cfg.images.limit = parsed;
            }
        }
        _ => {}
    }
}

pub fn default_path() -> Option<PathBuf> {
    default_config_path()
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("trendypix").join("config.yaml"))
}

//! Configuration and catalog factory.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::catalog::QuizCatalog;
use crate::http::HttpCatalog;
use crate::local::LocalCatalog;

/// Where quizzes come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CatalogConfig {
    Local {
        #[serde(default = "default_catalog_dir")]
        dir: PathBuf,
    },
    Http {
        base_url: String,
    },
}

impl Default for CatalogConfig {
    fn default() -> Self {
        CatalogConfig::Local {
            dir: default_catalog_dir(),
        }
    }
}

fn default_catalog_dir() -> PathBuf {
    PathBuf::from("./quizzes")
}

/// Top-level quizloop configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizloopConfig {
    /// Quiz source.
    #[serde(default)]
    pub catalog: CatalogConfig,
    /// Directory holding the persisted session slots.
    #[serde(default = "default_state_dir")]
    pub state_dir: PathBuf,
    /// Timeout for catalog requests, in seconds.
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
}

fn default_state_dir() -> PathBuf {
    PathBuf::from("./.quizloop")
}
fn default_timeout() -> u64 {
    30
}

impl Default for QuizloopConfig {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig::default(),
            state_dir: default_state_dir(),
            request_timeout_secs: default_timeout(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        let var_name = &rest[start + 2..start + end];
        result.push_str(&rest[..start]);
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

fn resolve_path(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(s) => PathBuf::from(resolve_env_vars(s)),
        None => path.to_path_buf(),
    }
}

fn resolve_catalog_config(config: &CatalogConfig) -> CatalogConfig {
    match config {
        CatalogConfig::Local { dir } => CatalogConfig::Local {
            dir: resolve_path(dir),
        },
        CatalogConfig::Http { base_url } => CatalogConfig::Http {
            base_url: resolve_env_vars(base_url),
        },
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `quizloop.toml` in the current directory
/// 2. `~/.config/quizloop/config.toml`
///
/// Environment variable overrides: `QUIZLOOP_CATALOG_URL`, `QUIZLOOP_STATE_DIR`.
pub fn load_config() -> Result<QuizloopConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizloopConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from("quizloop.toml");
            if local.exists() {
                Some(local)
            } else {
                dirs_path()
                    .map(|home| home.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => QuizloopConfig::default(),
    };

    Ok(apply_env_overrides(config))
}

/// Parse a config document and resolve `${VAR}` references in it.
pub fn parse_config(content: &str) -> Result<QuizloopConfig> {
    let mut config: QuizloopConfig = toml::from_str(content)?;
    config.catalog = resolve_catalog_config(&config.catalog);
    config.state_dir = resolve_path(&config.state_dir);
    Ok(config)
}

fn apply_env_overrides(mut config: QuizloopConfig) -> QuizloopConfig {
    if let Ok(url) = std::env::var("QUIZLOOP_CATALOG_URL") {
        if !url.is_empty() {
            config.catalog = CatalogConfig::Http { base_url: url };
        }
    }
    if let Ok(dir) = std::env::var("QUIZLOOP_STATE_DIR") {
        if !dir.is_empty() {
            config.state_dir = PathBuf::from(dir);
        }
    }
    config
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizloop"))
}

/// Create a catalog from its configuration.
pub fn create_catalog(config: &CatalogConfig, timeout_secs: u64) -> Result<Box<dyn QuizCatalog>> {
    match config {
        CatalogConfig::Local { dir } => Ok(Box::new(LocalCatalog::new(dir.clone()))),
        CatalogConfig::Http { base_url } => Ok(Box::new(HttpCatalog::new(
            base_url,
            Duration::from_secs(timeout_secs),
        )?)),
    }
}

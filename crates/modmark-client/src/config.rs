//! Client configuration.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use modmark_core::traits::AuthTokenProvider;

use crate::auth::{EnvToken, StaticToken};

/// Top-level modmark configuration.
///
/// Note: Custom Debug impl masks the token to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
pub struct ModmarkConfig {
    /// Backend base URL, without the `/rubric` prefix.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Bearer token. `${VAR}` references are expanded on load.
    #[serde(default)]
    pub token: Option<String>,
    /// Environment variable to read the token from on every request.
    /// Takes precedence over `token`.
    #[serde(default)]
    pub token_env: Option<String>,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl std::fmt::Debug for ModmarkConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModmarkConfig")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "***"))
            .field("token_env", &self.token_env)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for ModmarkConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            token_env: None,
            timeout_secs: default_timeout(),
        }
    }
}

impl ModmarkConfig {
    /// The token source this config describes.
    pub fn auth_provider(&self) -> Arc<dyn AuthTokenProvider> {
        match &self.token_env {
            Some(var) => Arc::new(EnvToken::new(var.clone())),
            None => Arc::new(StaticToken::new(self.token.clone())),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `modmark.toml` in the current directory
/// 2. `~/.config/modmark/config.toml`
///
/// Environment variable overrides: `MODMARK_BASE_URL`, `MODMARK_TOKEN`.
pub fn load_config() -> Result<ModmarkConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<ModmarkConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("modmark.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<ModmarkConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => ModmarkConfig::default(),
    };

    // Apply env var overrides
    if let Ok(url) = std::env::var("MODMARK_BASE_URL") {
        config.base_url = url;
    }
    if let Ok(token) = std::env::var("MODMARK_TOKEN") {
        config.token = Some(token);
    }

    config.base_url = resolve_env_vars(&config.base_url);
    config.token = config
        .token
        .as_deref()
        .map(resolve_env_vars)
        .filter(|t| !t.is_empty());

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("modmark"))
}

// src/config/app.rs
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::provider::newsapi::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use crate::services::hf::{DEFAULT_HF_BASE_URL, DEFAULT_SENTIMENT_MODEL, DEFAULT_SUMMARY_MODEL};

// --- env defaults & names ---
pub const DEFAULT_CONFIG_PATH: &str = "config/newshub.toml";

pub const ENV_CONFIG_PATH: &str = "NEWSHUB_CONFIG_PATH";
pub const ENV_NEWSAPI_KEY: &str = "NEWSAPI_KEY";
pub const ENV_NEWSAPI_BASE_URL: &str = "NEWSAPI_BASE_URL";
pub const ENV_NEWSAPI_TIMEOUT_SECS: &str = "NEWSAPI_TIMEOUT_SECS";
pub const ENV_HF_API_TOKEN: &str = "HF_API_TOKEN";
pub const ENV_FAVORITES_DB: &str = "NEWSHUB_FAVORITES_DB";

pub const DEFAULT_FAVORITES_DB: &str = "data/favorites.db";

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
fn default_hf_base_url() -> String {
    DEFAULT_HF_BASE_URL.to_string()
}
fn default_summarizer() -> String {
    DEFAULT_SUMMARY_MODEL.to_string()
}
fn default_sentiment() -> String {
    DEFAULT_SENTIMENT_MODEL.to_string()
}
fn default_favorites_db() -> String {
    DEFAULT_FAVORITES_DB.to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub newsapi: NewsApiSection,
    #[serde(default)]
    pub models: ModelsSection,
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub storage: StorageSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsApiSection {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for NewsApiSection {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsSection {
    /// Hosted inference token; without it both services run on fallbacks.
    #[serde(default)]
    pub hf_token: Option<String>,
    #[serde(default = "default_hf_base_url")]
    pub base_url: String,
    #[serde(default = "default_summarizer")]
    pub summarizer: String,
    #[serde(default = "default_sentiment")]
    pub sentiment: String,
}

impl Default for ModelsSection {
    fn default() -> Self {
        Self {
            hf_token: None,
            base_url: default_hf_base_url(),
            summarizer: default_summarizer(),
            sentiment: default_sentiment(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerSection {
    /// CORS origins; empty means permissive.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSection {
    /// SQLite file for saved favorites; `:memory:` keeps them in memory.
    #[serde(default = "default_favorites_db")]
    pub favorites_db: String,
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            favorites_db: default_favorites_db(),
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("parsing {}", path.display()))
    }

    /// Defaults → TOML file (if present) → environment, then validated.
    pub fn load() -> anyhow::Result<Self> {
        let explicit = std::env::var(ENV_CONFIG_PATH).ok().map(PathBuf::from);
        let path = explicit
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

        let mut cfg = if path.exists() {
            Self::load_from_file(&path)?
        } else if explicit.is_some() {
            bail!("{ENV_CONFIG_PATH} points to non-existent path {}", path.display());
        } else {
            Self::default()
        };

        cfg.apply_env(|k| std::env::var(k).ok());
        cfg.validate()?;
        Ok(cfg)
    }

    /// Override fields from an environment lookup. Blank values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |k: &str| lookup(k).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(v) = get(ENV_NEWSAPI_KEY) {
            self.newsapi.api_key = v;
        }
        if let Some(v) = get(ENV_NEWSAPI_BASE_URL) {
            self.newsapi.base_url = v;
        }
        if let Some(v) = get(ENV_NEWSAPI_TIMEOUT_SECS).and_then(|v| v.parse::<u64>().ok()) {
            self.newsapi.timeout_secs = v;
        }
        if let Some(v) = get(ENV_HF_API_TOKEN) {
            self.models.hf_token = Some(v);
        }
        if let Some(v) = get(ENV_FAVORITES_DB) {
            self.storage.favorites_db = v;
        }
    }

    pub fn validate(&mut self) -> anyhow::Result<()> {
        if self.newsapi.api_key.trim().is_empty() {
            bail!("{ENV_NEWSAPI_KEY} not found in environment or config; set it in .env");
        }
        if self.newsapi.timeout_secs == 0 {
            self.newsapi.timeout_secs = DEFAULT_TIMEOUT_SECS;
        }
        if self.storage.favorites_db.trim().is_empty() {
            self.storage.favorites_db = default_favorites_db();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::{env, fs};

    #[test]
    fn toml_sections_fill_defaults() {
        let cfg = AppConfig::from_toml_str(
            r#"
[newsapi]
api_key = "abc"

[server]
allowed_origins = ["http://localhost:5173"]
"#,
        )
        .unwrap();
        assert_eq!(cfg.newsapi.api_key, "abc");
        assert_eq!(cfg.newsapi.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.newsapi.timeout_secs, 10);
        assert_eq!(cfg.models.summarizer, DEFAULT_SUMMARY_MODEL);
        assert_eq!(cfg.server.allowed_origins.len(), 1);
        assert_eq!(cfg.storage.favorites_db, DEFAULT_FAVORITES_DB);
    }

    #[test]
    fn favorites_db_from_toml_and_env() {
        let mut cfg = AppConfig::from_toml_str(
            r#"
[storage]
favorites_db = "/var/lib/newshub/favs.db"
"#,
        )
        .unwrap();
        assert_eq!(cfg.storage.favorites_db, "/var/lib/newshub/favs.db");

        cfg.apply_env(|k| (k == ENV_FAVORITES_DB).then(|| ":memory:".to_string()));
        assert_eq!(cfg.storage.favorites_db, ":memory:");

        cfg.newsapi.api_key = "k".into();
        cfg.storage.favorites_db = "  ".into();
        cfg.validate().unwrap();
        assert_eq!(cfg.storage.favorites_db, DEFAULT_FAVORITES_DB);
    }

    #[test]
    fn env_overrides_and_blank_is_ignored() {
        let vars: HashMap<&str, &str> = [
            (ENV_NEWSAPI_KEY, "from-env"),
            (ENV_NEWSAPI_TIMEOUT_SECS, "3"),
            (ENV_HF_API_TOKEN, "   "),
        ]
        .into_iter()
        .collect();
        let mut cfg = AppConfig::default();
        cfg.apply_env(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(cfg.newsapi.api_key, "from-env");
        assert_eq!(cfg.newsapi.timeout_secs, 3);
        assert_eq!(cfg.models.hf_token, None);
    }

    #[test]
    fn missing_key_fails_validation() {
        let mut cfg = AppConfig::default();
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains(ENV_NEWSAPI_KEY));
    }

    #[serial_test::serial]
    #[test]
    fn load_reads_explicit_path_then_env() {
        let tmp = tempfile::tempdir().unwrap();
        let p = tmp.path().join("newshub.toml");
        fs::write(&p, "[newsapi]\napi_key = \"file-key\"\n").unwrap();

        env::set_var(ENV_CONFIG_PATH, p.display().to_string());
        env::remove_var(ENV_NEWSAPI_KEY);
        let cfg = AppConfig::load().unwrap();
        assert_eq!(cfg.newsapi.api_key, "file-key");

        env::set_var(ENV_NEWSAPI_KEY, "env-key");
        let cfg = AppConfig::load().unwrap();
        assert_eq!(cfg.newsapi.api_key, "env-key");

        env::remove_var(ENV_NEWSAPI_KEY);
        env::remove_var(ENV_CONFIG_PATH);
    }
}

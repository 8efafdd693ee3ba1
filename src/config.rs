//! Deployment configuration.
//!
//! Settings come from an optional JSON file (`truffle.json` in the working
//! directory, then the platform config dir). A missing or unreadable file is
//! not an error: the app logs a warning and runs on defaults. Environment
//! variables override the file for the two knobs people actually tune in
//! dev (`OLLAMA_BASE_URL`, `LLM_MODEL`).

use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "truffle.json";

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/115.0.0.0 Safari/537.36";

fn default_ollama_base_url() -> String {
    "http://127.0.0.1:11434".to_string()
}

fn default_search_endpoint() -> String {
    "https://html.duckduckgo.com/html/".to_string()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_extract_timeout_secs() -> u64 {
    10
}

fn default_max_search_results() -> usize {
    5
}

fn default_model() -> String {
    crate::models::DEFAULT_MODEL.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the local Ollama server.
    #[serde(default = "default_ollama_base_url")]
    pub ollama_base_url: String,
    /// HTML search endpoint queried by the search gateway.
    #[serde(default = "default_search_endpoint")]
    pub search_endpoint: String,
    /// User-agent sent with search and page-extraction requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Per-page download/parse bound so one slow URL cannot stall a search.
    #[serde(default = "default_extract_timeout_secs")]
    pub extract_timeout_secs: u64,
    #[serde(default = "default_max_search_results")]
    pub max_search_results: usize,
    /// Model selected at startup; must be a catalog entry.
    #[serde(default = "default_model")]
    pub default_model: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ollama_base_url: default_ollama_base_url(),
            search_endpoint: default_search_endpoint(),
            user_agent: default_user_agent(),
            extract_timeout_secs: default_extract_timeout_secs(),
            max_search_results: default_max_search_results(),
            default_model: default_model(),
        }
    }
}

impl AppConfig {
    /// Load the first readable config file, falling back to defaults.
    pub fn load() -> Self {
        let mut config = None;
        for path in candidate_paths() {
            if !path.exists() {
                continue;
            }
            match Self::load_from(&path) {
                Ok(loaded) => {
                    tracing::info!(path = %path.display(), "loaded config");
                    config = Some(loaded);
                    break;
                }
                Err(err) => {
                    tracing::warn!(path = %path.display(), %err, "ignoring unreadable config");
                }
            }
        }
        let mut config = config.unwrap_or_else(|| {
            tracing::warn!("no config file found, using defaults");
            Self::default()
        });
        config.apply_env_overrides();
        config
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(base) = env::var("OLLAMA_BASE_URL") {
            self.ollama_base_url = base;
        }
        if let Ok(model) = env::var("LLM_MODEL") {
            self.default_model = model;
        }
    }
}

fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(CONFIG_FILE)];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("truffle").join("config.json"));
    }
    paths
}

// src/config/mod.rs
//! Service configuration.
//!
//! Resolution order:
//! 1) `$FEEDBACK_CONFIG_PATH` (must exist)
//! 2) `config/feedback.toml`
//! 3) built-in defaults
//!
//! ```toml
//! [store]
//! path = "data/feedback.json"
//!
//! [keywords]
//! path = "config/keywords.json"
//!
//! [prioritize]
//! limit_strategy = "before_scoring"   # or "after_scoring"
//! ```

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::prioritize::LimitStrategy;

pub const ENV_CONFIG_PATH: &str = "FEEDBACK_CONFIG_PATH";
pub const DEFAULT_CONFIG_PATH: &str = "config/feedback.toml";

fn default_store_path() -> PathBuf {
    PathBuf::from("data/feedback.json")
}
fn default_keywords_path() -> PathBuf {
    PathBuf::from(crate::classify::DEFAULT_KEYWORDS_PATH)
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ServiceConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub keywords: KeywordsConfig,
    #[serde(default)]
    pub prioritize: PrioritizeConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct StoreConfig {
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct KeywordsConfig {
    #[serde(default = "default_keywords_path")]
    pub path: PathBuf,
}

impl Default for KeywordsConfig {
    fn default() -> Self {
        Self {
            path: default_keywords_path(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct PrioritizeConfig {
    #[serde(default)]
    pub limit_strategy: LimitStrategy,
}

impl ServiceConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("parsing service config")
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading service config from {}", path.display()))?;
        Self::from_toml_str(&raw)
    }

    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
            }
            return Self::load_from(&pb);
        }
        let default = Path::new(DEFAULT_CONFIG_PATH);
        if default.exists() {
            return Self::load_from(default);
        }
        Ok(Self::default())
    }
}

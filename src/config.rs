use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use url::Url;

pub const DEFAULT_API_URL: &str = "http://localhost:8080";
pub const API_URL_ENV: &str = "BETOMESHI_API_URL";

/// Non-secret settings remembered between runs. The token itself lives in the
/// keyring, keyed by `username`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub username: Option<String>,
    pub api_url: Option<String>,
}

impl Settings {
    pub fn get_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "betomeshi", "betomeshi")
            .context("Could not determine config directory")?;
        let config_dir = proj_dirs.config_dir();
        fs::create_dir_all(config_dir)?;
        Ok(config_dir.join("settings.toml"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::get_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path)?;
        toml::from_str(&content).with_context(|| format!("Malformed {}", path.display()))
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::get_path()?;
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn remove() -> Result<()> {
        let path = Self::get_path()?;
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    /// Base URL to talk to: `--api-url`, then the environment, then whatever
    /// was saved at login, then the local default.
    pub fn resolve_api_url(&self, flag: Option<&str>) -> Result<String> {
        let env = std::env::var(API_URL_ENV).ok();
        pick_api_url(flag, env.as_deref(), self.api_url.as_deref())
    }

    /// Records a successful login. Only an explicit `--api-url` is kept;
    /// the environment and the default are re-read every run.
    pub fn remember_login(&mut self, username: &str, flag: Option<&str>) -> Result<()> {
        if let Some(flag) = flag.map(str::trim).filter(|s| !s.is_empty()) {
            self.api_url = Some(pick_api_url(Some(flag), None, None)?);
        }
        self.username = Some(username.to_string());
        Ok(())
    }
}

fn pick_api_url(flag: Option<&str>, env: Option<&str>, saved: Option<&str>) -> Result<String> {
    let raw = [flag, env, saved]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or(DEFAULT_API_URL);

    Url::parse(raw).with_context(|| format!("Invalid API URL: {}", raw))?;
    Ok(raw.trim_end_matches('/').to_string())
}

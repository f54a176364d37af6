//! Layered client configuration.
//!
//! Sources, highest priority first:
//! 1. Command-line flags (`--api-url`, `--session-file`)
//! 2. Environment variables with the `TASKBOARD_` prefix
//!    (`TASKBOARD_API_URL`, `TASKBOARD_SESSION_PATH`, `TASKBOARD_DATE_FORMAT`)
//! 3. `~/.config/taskboard/config.toml`
//! 4. Built-in defaults

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::TaskboardError;

pub const DEFAULT_API_URL: &str = "http://localhost:8080";
pub const DEFAULT_DATE_FORMAT: &str = "%-m/%-d/%Y";
const SESSION_FILE_NAME: &str = "session.json";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Backend base URL.
    pub api_url: String,

    /// Where the session token is persisted. Defaults to the user config dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_path: Option<PathBuf>,

    /// `strftime` pattern for due dates.
    pub date_format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            session_path: None,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

impl Config {
    /// Extracts the layered config. Call [`Config::validate`] after overrides.
    pub fn load() -> Result<Self, TaskboardError> {
        Ok(Self::figment().extract()?)
    }

    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        figment.merge(Env::prefixed("TASKBOARD_").only(&["api_url", "session_path", "date_format"]))
    }

    /// Applies command-line overrides on top of the loaded layers.
    pub fn with_overrides(mut self, api_url: Option<String>, session_path: Option<PathBuf>) -> Self {
        if let Some(url) = api_url {
            self.api_url = url;
        }
        if session_path.is_some() {
            self.session_path = session_path;
        }
        self
    }

    pub fn validate(&self) -> Result<(), TaskboardError> {
        let url = self.api_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(TaskboardError::config(format!(
                "api_url must start with http:// or https://, got '{url}'"
            )));
        }
        if self.date_format.trim().is_empty() {
            return Err(TaskboardError::config("date_format must not be empty"));
        }
        Ok(())
    }

    /// Resolved path of the session file.
    pub fn session_file(&self) -> Result<PathBuf, TaskboardError> {
        if let Some(ref p) = self.session_path {
            return Ok(p.clone());
        }
        dirs::config_dir()
            .map(|d| d.join("taskboard").join(SESSION_FILE_NAME))
            .ok_or_else(|| {
                TaskboardError::config("config directory not found; set TASKBOARD_SESSION_PATH")
            })
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("taskboard").join("config.toml"))
    }
}

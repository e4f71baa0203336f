use std::fs;
use std::path::Path;

use anyhow::Result;
use serde::Deserialize;

use crate::model::mode::SearchMode;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub ui: UiConfig,
}

#[derive(Debug, Deserialize)]
pub struct GeneralConfig {
    /// Stable id of the startup mode. Unknown ids fall back to the
    /// registry default.
    pub default_mode: String,
    /// Pin the mode: the selector renders but refuses interaction.
    pub lock_mode: bool,
}

#[derive(Debug, Deserialize)]
pub struct UiConfig {
    /// Frame widths strictly below this use the bottom-drawer selector.
    pub compact_width: u16,
    /// Session log entries kept in memory.
    pub max_log: usize,
}

impl AppConfig {
    /// Load configuration with layering: defaults → user config.
    pub fn load() -> Result<Self> {
        let user_path = directories::ProjectDirs::from("", "", "searchdesk")
            .map(|d| d.config_dir().join("config.toml"));
        Self::load_from(user_path.as_deref())
    }

    fn load_from(user_path: Option<&Path>) -> Result<Self> {
        let defaults = include_str!("../../config/default.toml");
        let mut config: AppConfig = toml::from_str(defaults)?;

        if let Some(path) = user_path
            && path.exists()
        {
            let user_str = fs::read_to_string(path)?;
            config = toml::from_str(&user_str)?; // TODO: deep merge instead of full replace
        }

        Ok(config)
    }

    /// Startup mode, resolved with the unknown-id fallback.
    pub fn default_mode(&self) -> SearchMode {
        SearchMode::resolve(&self.general.default_mode)
    }
}

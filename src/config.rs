//! Persistent defaults for pdf-audio.

use crate::audio::OutputFormat;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_VOICE: &str = "en";
const DEFAULT_RATE_WPM: u32 = 170;
const DEFAULT_VOLUME: u32 = 100;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertConfig {
    /// eSpeak voice identifier
    #[serde(default = "default_voice")]
    pub voice: String,

    /// Speech rate in words per minute
    #[serde(default = "default_rate")]
    pub rate_wpm: u32,

    /// Volume (0-100)
    #[serde(default = "default_volume")]
    pub volume: u32,

    /// Output container format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

fn default_voice() -> String {
    DEFAULT_VOICE.to_string()
}

fn default_rate() -> u32 {
    DEFAULT_RATE_WPM
}

fn default_volume() -> u32 {
    DEFAULT_VOLUME
}

fn default_format() -> OutputFormat {
    OutputFormat::Mp3
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            voice: default_voice(),
            rate_wpm: default_rate(),
            volume: default_volume(),
            format: default_format(),
        }
    }
}

impl ConvertConfig {
    /// Config file path: ~/.config/cli-programs/pdf-audio.toml
    pub fn config_path() -> anyhow::Result<PathBuf> {
        let home = std::env::var("HOME").or_else(|_| std::env::var("USERPROFILE"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("cli-programs")
            .join("pdf-audio.toml"))
    }

    /// Load config from the defaults file, returning defaults if it
    /// doesn't exist.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: ConvertConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save config as the new defaults.
    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&Self::config_path()?)
    }

    fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

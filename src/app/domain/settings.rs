use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::warn;

use crate::app::infrastructure::error::AppError;

pub const MIN_SPEED_LEVEL: u32 = 1;
pub const MAX_SPEED_LEVEL: u32 = 200;

/// Visual skin for the revealed text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Skin {
    /// Word-processor style page.
    #[default]
    Document,
    /// Code editor with line numbers and highlighting.
    CodeEditor,
}

impl Skin {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Document => "Word",
            Self::CodeEditor => "VSCode",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevealSettings {
    #[serde(default)]
    pub skin: Skin,

    /// Slider position, 1 (slowest) to 200 (fastest).
    #[serde(default = "default_speed_level")]
    pub speed_level: u32,

    #[serde(default = "default_font_family")]
    pub font_family: String,

    #[serde(default = "default_font_size")]
    pub font_size: u32,

    #[serde(default = "default_line_height")]
    pub line_height: f32,

    #[serde(default = "default_margin_px")]
    pub margin_px: u32,

    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    #[serde(default = "default_executor_endpoint")]
    pub executor_endpoint: String,

    /// Seconds the execution service may spend running code.
    #[serde(default = "default_execute_timeout_secs")]
    pub execute_timeout_secs: u64,
}

fn default_speed_level() -> u32 {
    151 // 50ms per character
}

fn default_font_family() -> String {
    "Consolas, 'Courier New', monospace".to_string()
}

fn default_font_size() -> u32 {
    16
}

fn default_line_height() -> f32 {
    1.6
}

fn default_margin_px() -> u32 {
    40
}

fn default_history_limit() -> usize {
    10
}

fn default_executor_endpoint() -> String {
    "http://localhost:5000/api/execute".to_string()
}

fn default_execute_timeout_secs() -> u64 {
    10
}

impl Default for RevealSettings {
    fn default() -> Self {
        Self {
            skin: Skin::default(),
            speed_level: default_speed_level(),
            font_family: default_font_family(),
            font_size: default_font_size(),
            line_height: default_line_height(),
            margin_px: default_margin_px(),
            history_limit: default_history_limit(),
            executor_endpoint: default_executor_endpoint(),
            execute_timeout_secs: default_execute_timeout_secs(),
        }
    }
}

/// Autoplay interval for a slider level: faster levels mean shorter waits.
pub fn speed_level_interval(level: u32) -> Duration {
    let level = level.clamp(MIN_SPEED_LEVEL, MAX_SPEED_LEVEL);
    Duration::from_millis(u64::from(MAX_SPEED_LEVEL + 1 - level))
}

impl RevealSettings {
    pub fn autoplay_interval(&self) -> Duration {
        speed_level_interval(self.speed_level)
    }

    /// Load settings from disk, or create default if not exists
    pub fn load() -> Self {
        Self::load_from(&Self::get_config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(settings) => settings,
                Err(e) => {
                    warn!(error = %e, "failed to parse settings, using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                let default = Self::default();
                if let Err(e) = default.save_to(path) {
                    warn!(error = %e, "could not write default settings");
                }
                default
            }
        }
    }

    pub fn save(&self) -> Result<(), AppError> {
        self.save_to(&Self::get_config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), AppError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Get config file path (cross-platform)
    pub fn get_config_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("revealpad");
        path.push("settings.json");
        path
    }
}

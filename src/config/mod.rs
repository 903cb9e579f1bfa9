use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::users::UserId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceConfig {
    /// Capture lookup/render/memo traces
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Console lines kept in memory
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            capacity: default_capacity(),
        }
    }
}

/// Optional hex color overrides (`#RRGGBB` or `#RGB`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ThemeConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problematic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimized: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accent: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// User selected when the demo starts
    #[serde(default = "default_user")]
    pub initial_user: UserId,

    #[serde(default)]
    pub trace: TraceConfig,

    #[serde(default)]
    pub theme: ThemeConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            initial_user: default_user(),
            trace: TraceConfig::default(),
            theme: ThemeConfig::default(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_capacity() -> usize {
    200
}

fn default_user() -> UserId {
    1
}

/// A loaded config plus anything that went wrong while loading it.
///
/// Loading happens before logging is set up, so problems are collected here
/// and reported by the caller once a subscriber exists.
#[derive(Debug)]
pub struct Loaded {
    pub config: AppConfig,
    pub warnings: Vec<String>,
}

impl Loaded {
    fn fallback(warning: String) -> Self {
        Self {
            config: AppConfig::default(),
            warnings: vec![warning],
        }
    }
}

impl AppConfig {
    /// Get the config file path
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join("rerender");

        Ok(config_dir.join("config.toml"))
    }

    /// Load config from the user config dir. A missing file is written with
    /// defaults only when `create_missing` is set.
    pub fn load(create_missing: bool) -> Loaded {
        match Self::config_path() {
            Ok(path) => Self::load_from(&path, create_missing),
            Err(e) => Loaded::fallback(format!("Using default config: {}", e)),
        }
    }

    pub fn load_from(path: &Path, create_missing: bool) -> Loaded {
        if path.exists() {
            // A broken file is left in place for the user to fix
            return match std::fs::read_to_string(path) {
                Ok(content) => match Self::parse(&content) {
                    Ok(config) => Loaded {
                        config,
                        warnings: Vec::new(),
                    },
                    Err(e) => Loaded::fallback(format!("Failed to parse config {}: {}", path.display(), e)),
                },
                Err(e) => Loaded::fallback(format!("Failed to read config {}: {}", path.display(), e)),
            };
        }

        let mut loaded = Loaded {
            config: AppConfig::default(),
            warnings: Vec::new(),
        };
        if create_missing {
            if let Err(e) = loaded.config.save_to(path) {
                loaded.warnings.push(format!("Could not write default config: {}", e));
            }
        }
        loaded
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }

        // Drop blank color overrides before saving
        let mut clean_config = self.clone();
        for color in [
            &mut clean_config.theme.problematic,
            &mut clean_config.theme.optimized,
            &mut clean_config.theme.accent,
        ] {
            if color.as_ref().map(|s| s.trim().is_empty()).unwrap_or(false) {
                *color = None;
            }
        }

        let content = toml::to_string_pretty(&clean_config)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

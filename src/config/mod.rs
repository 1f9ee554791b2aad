//! Configuration module
//!
//! Handles loading and saving the screen layout configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::screen::{LayoutError, Portal, ScaleTransform, Screen, ScreenLayout};

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Invalid layout: {0}")]
    Layout(#[from] LayoutError),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Location of the config file under the platform config directory
const CONFIG_FILE: &str = "portalmouse/config.toml";

/// Main application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// General settings
    #[serde(default)]
    pub general: GeneralConfig,

    /// DPI normalization
    #[serde(default)]
    pub scale: ScaleConfig,

    /// Screens from left to right
    #[serde(default = "default_screens")]
    pub screens: Vec<ScreenConfig>,

    /// One portal per pair of adjacent screens, left to right
    #[serde(default = "default_portals")]
    pub portals: Vec<PortalConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            scale: ScaleConfig::default(),
            screens: default_screens(),
            portals: default_portals(),
        }
    }
}

/// General configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Enable verbose logging
    #[serde(default)]
    pub verbose: bool,
    /// Log a status line every N movement events (0 = never)
    #[serde(default = "default_status_interval")]
    pub status_interval: u64,
}

fn default_status_interval() -> u64 {
    500
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            status_interval: default_status_interval(),
        }
    }
}

/// Scaling applied to raw X outside the native range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleConfig {
    /// Multiplier from raw to logical coordinates
    #[serde(default = "default_scale_factor")]
    pub factor: f64,
    /// First raw X reported at native density
    #[serde(default)]
    pub native_min: i32,
    /// Last raw X reported at native density
    #[serde(default = "default_native_max")]
    pub native_max: i32,
}

fn default_scale_factor() -> f64 {
    1.5
}

fn default_native_max() -> i32 {
    3839
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self {
            factor: default_scale_factor(),
            native_min: 0,
            native_max: default_native_max(),
        }
    }
}

/// A screen's horizontal extent in logical coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenConfig {
    pub name: String,
    /// Omit on the leftmost screen to leave it unbounded
    pub x_min: Option<i32>,
    /// Omit on the rightmost screen to leave it unbounded
    pub x_max: Option<i32>,
}

/// Corresponding Y-ranges on either side of a boundary
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PortalConfig {
    pub left_min: f64,
    pub left_max: f64,
    pub right_min: f64,
    pub right_max: f64,
}

fn default_screens() -> Vec<ScreenConfig> {
    vec![
        ScreenConfig {
            name: "left".to_string(),
            x_min: None,
            x_max: Some(-1),
        },
        ScreenConfig {
            name: "center".to_string(),
            x_min: Some(0),
            x_max: Some(3839),
        },
        ScreenConfig {
            name: "right".to_string(),
            x_min: Some(5760),
            x_max: None,
        },
    ]
}

fn default_portals() -> Vec<PortalConfig> {
    vec![
        PortalConfig {
            left_min: 1629.0,
            left_max: 3140.0,
            right_min: 685.0,
            right_max: 2160.0,
        },
        PortalConfig {
            left_min: 475.0,
            left_max: 2160.0,
            right_min: 1629.0,
            right_max: 3100.0,
        },
    ]
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from the default location
    pub fn load_default() -> ConfigResult<Self> {
        let config_paths = [
            dirs::config_dir().map(|dir| dir.join(CONFIG_FILE)),
            Some(PathBuf::from("./portalmouse.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                tracing::debug!("Loading configuration from {}", path.display());
                return Self::load(path);
            }
        }

        // Return default config if no file found
        Ok(Self::default())
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let contents = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Validate the configuration and build the screen layout from it
    pub fn build_layout(&self) -> ConfigResult<ScreenLayout> {
        let scale = ScaleTransform::new(
            self.scale.factor,
            self.scale.native_min,
            self.scale.native_max,
        )?;

        let screens = self
            .screens
            .iter()
            .map(|s| Screen::new(s.name.clone(), s.x_min, s.x_max))
            .collect();

        let portals = self
            .portals
            .iter()
            .map(|p| Portal::new(p.left_min, p.left_max, p.right_min, p.right_max))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ScreenLayout::new(screens, portals, scale)?)
    }
}

/// Generate a sample configuration file
pub fn generate_sample_config() -> ConfigResult<String> {
    let config = Config {
        general: GeneralConfig {
            verbose: false,
            status_interval: 1000,
        },
        ..Default::default()
    };

    Ok(toml::to_string_pretty(&config)?)
}

use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::canvas::{Color, color};
use crate::history::DEFAULT_CAPACITY;
use crate::tool::stamp::DEFAULT_MAX_EDGE;

/// Errors that can occur while loading, saving or validating a config
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to serialize config: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to access config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Startup settings for a session.
///
/// Every field has a default, so a config file only needs the keys it
/// overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Size of new documents.
    pub width: u32,
    pub height: u32,
    pub history_capacity: usize,
    pub brush_size: u32,
    /// Largest brush the session accepts; bigger requests are clamped.
    pub max_brush_size: u32,
    /// Initial drawing color as `#RRGGBB` or `#RRGGBBAA`.
    pub color: String,
    /// Bounding box user stamps are shrunk into.
    pub stamp_max_edge: u32,
    pub min_text_size: u32,
    pub max_text_size: u32,
    /// Fonts tried in order by the text tool.
    pub fonts: Vec<PathBuf>,
    /// Directory scanned for `*.png` stamps at startup.
    pub stamps_dir: Option<PathBuf>,
    pub palette: Vec<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            history_capacity: DEFAULT_CAPACITY,
            brush_size: 3,
            max_brush_size: 200,
            color: "#000000".to_string(),
            stamp_max_edge: DEFAULT_MAX_EDGE,
            min_text_size: 8,
            max_text_size: 200,
            fonts: vec![PathBuf::from("arial.ttf"), PathBuf::from("DejaVuSans.ttf")],
            stamps_dir: Some(PathBuf::from("stamps")),
            palette: color::DEFAULT_PALETTE.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl SessionConfig {
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let json = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        info!("Loaded session config from {}", path.display());
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "canvas size {}x{} must be non-zero",
                self.width, self.height
            )));
        }
        if self.history_capacity == 0 {
            return Err(ConfigError::Invalid("history capacity must be at least 1".into()));
        }
        if self.brush_size == 0 || self.brush_size > self.max_brush_size {
            return Err(ConfigError::Invalid(format!(
                "brush size {} is outside 1..={}",
                self.brush_size, self.max_brush_size
            )));
        }
        if self.stamp_max_edge == 0 {
            return Err(ConfigError::Invalid("stamp bounding box must be non-zero".into()));
        }
        if self.min_text_size == 0 || self.min_text_size > self.max_text_size {
            return Err(ConfigError::Invalid(format!(
                "text size range {}..={} is empty",
                self.min_text_size, self.max_text_size
            )));
        }
        self.initial_color()?;
        Ok(())
    }

    pub fn initial_color(&self) -> ConfigResult<Color> {
        color::parse_hex(&self.color).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Palette entries that parse; malformed entries are dropped.
    pub fn palette_colors(&self) -> Vec<Color> {
        self.palette
            .iter()
            .filter_map(|hex| color::parse_hex(hex).ok())
            .collect()
    }

    pub fn clamp_text_size(&self, size: u32) -> u32 {
        size.clamp(self.min_text_size, self.max_text_size)
    }

    pub fn clamp_brush_size(&self, size: u32) -> u32 {
        size.clamp(1, self.max_brush_size.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("raster_paint_{}", uuid::Uuid::new_v4()))
            .join(name)
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = SessionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.initial_color().unwrap(), color::BLACK);
        assert_eq!(config.palette_colors().len(), 16);
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_path("config.json");
        let config = SessionConfig {
            width: 320,
            brush_size: 5,
            stamps_dir: None,
            ..SessionConfig::default()
        };
        config.save(&path).unwrap();
        assert_eq!(SessionConfig::load(&path).unwrap(), config);
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: SessionConfig = serde_json::from_str(r#"{ "height": 100 }"#).unwrap();
        assert_eq!(config.height, 100);
        assert_eq!(config.width, 800);
        assert_eq!(config.history_capacity, 20);
    }

    #[test]
    fn test_validation_failures() {
        let zero = SessionConfig { width: 0, ..SessionConfig::default() };
        assert!(matches!(zero.validate(), Err(ConfigError::Invalid(_))));

        let inverted = SessionConfig {
            min_text_size: 50,
            max_text_size: 10,
            ..SessionConfig::default()
        };
        assert!(inverted.validate().is_err());

        let bad_color = SessionConfig { color: "red".into(), ..SessionConfig::default() };
        assert!(bad_color.validate().is_err());

        let oversized_brush = SessionConfig {
            brush_size: 300,
            max_brush_size: 200,
            ..SessionConfig::default()
        };
        assert!(oversized_brush.validate().is_err());

        let no_brush = SessionConfig { max_brush_size: 0, ..SessionConfig::default() };
        assert!(no_brush.validate().is_err());
    }

    #[test]
    fn test_text_size_clamp() {
        let config = SessionConfig::default();
        assert_eq!(config.clamp_text_size(2), 8);
        assert_eq!(config.clamp_text_size(36), 36);
        assert_eq!(config.clamp_text_size(500), 200);
    }

    #[test]
    fn test_brush_size_clamp() {
        let config = SessionConfig::default();
        assert_eq!(config.clamp_brush_size(0), 1);
        assert_eq!(config.clamp_brush_size(12), 12);
        assert_eq!(config.clamp_brush_size(u32::MAX), 200);
    }
}

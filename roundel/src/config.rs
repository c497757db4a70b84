use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::image::{PngCompression, DEFAULT_SCALE_FACTOR};

/// How encoded bytes are turned into a matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum DecodeMode {
    /// Always three colour channels; alpha is dropped and grey is expanded
    #[default]
    Color,
    /// Keep the source channel layout, narrowed to 8 bits per channel
    Unchanged,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ResampleConfig {
    pub scale_factor: f64,
    pub decode_mode: DecodeMode,
    pub png_compression: PngCompression,
    pub jpeg_quality: u8,
}

impl Default for ResampleConfig {
    fn default() -> Self {
        Self {
            scale_factor: DEFAULT_SCALE_FACTOR,
            decode_mode: DecodeMode::Color,
            png_compression: PngCompression::Default,
            jpeg_quality: 90,
        }
    }
}

impl ResampleConfig {
    pub fn load() -> Option<Self> {
        let config_path = Self::config_path()?;

        fs::read_to_string(&config_path)
            .ok()
            .and_then(|contents| serde_json::from_str(&contents).ok())
    }

    pub fn save(&self) -> Option<()> {
        let config_path = Self::config_path()?;
        self.save_to(&config_path).ok()
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn config_path() -> Option<PathBuf> {
        #[allow(deprecated)]
        let home = std::env::home_dir()?;
        Some(home.join(".config").join("roundel").join("config.json"))
    }

    pub fn validate(&self) -> Result<()> {
        if !self.scale_factor.is_finite() || self.scale_factor <= 0.0 {
            return Err(Error::InvalidScaleFactor(self.scale_factor));
        }
        if self.jpeg_quality > 100 {
            return Err(Error::InvalidArgument {
                arg: "jpeg_quality",
                value: self.jpeg_quality.to_string(),
            });
        }
        Ok(())
    }
}

use std::fs;
use std::path::Path;

use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::error::{MaskError, MaskResult};

pub const DEFAULT_BRUSH_SIZE: u32 = 30;
pub const MIN_BRUSH_SIZE: u32 = 5;
pub const MAX_BRUSH_SIZE: u32 = 100;

/// Width used when the layout around the canvas cannot be measured
pub const FALLBACK_CONTAINER_WIDTH: f32 = 500.0;

/// Settings for a mask canvas.
///
/// Missing fields take their default value when deserializing, so a partial
/// JSON file only needs to name the settings it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskCanvasConfig {
    /// Brush width in display pixels used until the caller changes it
    pub brush_size: u32,
    pub min_brush_size: u32,
    pub max_brush_size: u32,
    /// Unmultiplied RGBA color of the live stroke feedback
    pub overlay_color: [u8; 4],
    pub fallback_container_width: f32,
}

impl Default for MaskCanvasConfig {
    fn default() -> Self {
        Self {
            brush_size: DEFAULT_BRUSH_SIZE,
            min_brush_size: MIN_BRUSH_SIZE,
            max_brush_size: MAX_BRUSH_SIZE,
            // orange at half opacity
            overlay_color: [249, 115, 22, 128],
            fallback_container_width: FALLBACK_CONTAINER_WIDTH,
        }
    }
}

impl MaskCanvasConfig {
    /// Parse a configuration from JSON and validate it
    pub fn from_json_str(json: &str) -> MaskResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file
    pub fn from_path(path: impl AsRef<Path>) -> MaskResult<Self> {
        let path = path.as_ref();
        log::info!("Loading mask canvas config from {}", path.display());
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn to_json_string(&self) -> MaskResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> MaskResult<()> {
        if self.min_brush_size == 0 {
            return Err(MaskError::Config("min_brush_size must be at least 1".to_owned()));
        }
        if self.min_brush_size > self.max_brush_size {
            return Err(MaskError::Config(format!(
                "min_brush_size ({}) is larger than max_brush_size ({})",
                self.min_brush_size, self.max_brush_size
            )));
        }
        if !(self.fallback_container_width.is_finite() && self.fallback_container_width >= 1.0) {
            return Err(MaskError::Config(format!(
                "fallback_container_width must be at least 1, got {}",
                self.fallback_container_width
            )));
        }
        Ok(())
    }

    /// Clamp a brush size into the configured range
    pub fn clamp_brush_size(&self, size: u32) -> u32 {
        size.clamp(self.min_brush_size, self.max_brush_size)
    }

    pub fn overlay_color32(&self) -> Color32 {
        let [r, g, b, a] = self.overlay_color;
        Color32::from_rgba_unmultiplied(r, g, b, a)
    }
}

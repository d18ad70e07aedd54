//! Demo configuration: window settings, effect tuning and RNG seed

use cauldron_core::{CauldronError, Color, Result};
use cauldron_particles::EffectConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Fixed seed for reproducible swarms; entropy when absent
    pub seed: Option<u64>,
    pub window: WindowConfig,
    pub effects: EffectConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
    pub clear_color: Color,
    /// Draw a small marker under the cursor
    pub cursor_marker: bool,
    pub marker_color: Color,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "cauldron".to_string(),
            width: 1200,
            height: 800,
            resizable: false,
            clear_color: Color::new(0.1, 0.1, 0.1, 1.0),
            cursor_marker: true,
            marker_color: Color::new(1.0, 1.0, 1.0, 0.5),
        }
    }
}

impl DemoConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject a zero-sized window and out-of-range effect settings
    pub fn validate(&self) -> Result<()> {
        let WindowConfig { width, height, .. } = self.window;
        if width == 0 || height == 0 {
            return Err(CauldronError::Config(format!(
                "window size must be non-zero, got {width}x{height}"
            )));
        }
        self.effects.validate()
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

//! Practice configuration: savestate toggles, HUD overlays and combo bindings.
//!
//! Loaded from JSON. Every key is optional and falls back to the
//! defaults below; the file is never written back.

use crate::{
    error::ConfigError,
    hud::SpeedFormat,
    input::ComboBindings,
    store::MAX_SAVESTATES,
    types::SlotIndex,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SavestateSettings {
    pub save_camera:  bool,
    pub save_objects: bool,
    /// Capture into the single slot on star collection.
    pub auto_save:    bool,
    pub quick_slot:   SlotIndex,
}

impl Default for SavestateSettings {
    fn default() -> Self {
        Self {
            save_camera:  true,
            save_objects: true,
            auto_save:    false,
            quick_slot:   0,
        }
    }
}

/// Which overlays start enabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HudSettings {
    pub show_igt:       bool,
    pub speed:          bool,
    pub speed_format:   SpeedFormat,
    pub show_max_speed: bool,
    pub input:          bool,
    pub wallkick:       bool,
    pub debug:          bool,
}

impl Default for HudSettings {
    fn default() -> Self {
        Self {
            show_igt:       true,
            speed:          false,
            speed_format:   SpeedFormat::Horizontal,
            show_max_speed: false,
            input:          false,
            wallkick:       false,
            debug:          false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PracticeConfig {
    pub savestates: SavestateSettings,
    pub hud:        HudSettings,
    pub combos:     ComboBindings,
}

impl PracticeConfig {
    /// Load from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&content)?;
        log::debug!("loaded practice config from {}", path.display());
        Ok(config)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: PracticeConfig = serde_json::from_str(json)?;
        config.validate()
    }

    fn validate(self) -> Result<Self, ConfigError> {
        let slot = self.savestates.quick_slot;
        if slot >= MAX_SAVESTATES {
            return Err(ConfigError::InvalidSlot { slot });
        }
        Ok(self)
    }
}

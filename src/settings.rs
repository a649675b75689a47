//! Player preferences
//!
//! Persisted separately from high scores.

use serde::{Deserialize, Serialize};

use crate::persistence::{Storage, load_json, save_json};
use crate::sim::Difficulty;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Sound effects and music on/off
    pub sound_enabled: bool,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Difficulty applied on every reset
    pub difficulty: Difficulty,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            sfx_volume: 0.8,
            music_volume: 0.6,
            difficulty: Difficulty::Normal,
        }
    }
}

impl Settings {
    const STORAGE_KEY: &'static str = "connect_ball_settings";

    /// Load settings, using defaults if nothing usable is stored
    pub fn load(storage: &dyn Storage) -> Self {
        match load_json::<Settings>(storage, Self::STORAGE_KEY) {
            Ok(Some(settings)) => {
                log::info!("Loaded settings");
                settings
            }
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring stored settings: {}", e);
                Self::default()
            }
        }
    }

    pub fn save(&self, storage: &mut dyn Storage) {
        match save_json(storage, Self::STORAGE_KEY, self) {
            Ok(()) => log::debug!("Settings saved"),
            Err(e) => log::warn!("Failed to save settings: {}", e),
        }
    }
}

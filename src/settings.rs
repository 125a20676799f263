//! Player preferences
//!
//! Persisted separately from player records in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::tuning::Variant;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Controls ===
    /// `KeyboardEvent.key` values that flip the actor
    pub flip_keys: Vec<String>,
    /// `KeyboardEvent.key` values that restart after a game over
    pub restart_keys: Vec<String>,
    /// `KeyboardEvent.key` values that toggle sound
    pub mute_keys: Vec<String>,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,

    /// Balance preset for new sessions
    pub variant: Variant,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            flip_keys: vec![" ".to_string(), "ArrowUp".to_string(), "w".to_string()],
            restart_keys: vec!["Enter".to_string(), "r".to_string()],
            mute_keys: vec!["m".to_string()],

            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,

            show_fps: false,

            variant: Variant::Classic,
        }
    }
}

impl Settings {
    /// Whether a key press is a flip
    pub fn matches_flip(&self, key: &str) -> bool {
        matches_key(&self.flip_keys, key)
    }

    /// Whether a key press is a restart
    pub fn matches_restart(&self, key: &str) -> bool {
        matches_key(&self.restart_keys, key)
    }

    pub fn matches_mute(&self, key: &str) -> bool {
        matches_key(&self.mute_keys, key)
    }

    /// Flip the mute flag, returning the new value
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    /// Volume actually applied to sound effects
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "zipzap_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        if let Some(storage) = crate::platform::storage() {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = serde_json::from_str(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        if let Some(storage) = crate::platform::storage() {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

/// Single letters match either case so caps lock doesn't break controls
fn matches_key(keys: &[String], key: &str) -> bool {
    keys.iter()
        .any(|k| k == key || (k.chars().count() == 1 && k.eq_ignore_ascii_case(key)))
}

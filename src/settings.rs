//! Player settings and preferences
//!
//! Persisted separately from level progress in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::consts::{COMPLETION_DELAY, MESSAGE_DURATION, TICK_INTERVAL};

/// Playback speed presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PacingPreset {
    Slow,
    #[default]
    Normal,
    Fast,
}

impl PacingPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            PacingPreset::Slow => "Slow",
            PacingPreset::Normal => "Normal",
            PacingPreset::Fast => "Fast",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "slow" => Some(PacingPreset::Slow),
            "normal" | "default" => Some(PacingPreset::Normal),
            "fast" => Some(PacingPreset::Fast),
            _ => None,
        }
    }

    /// Seconds between executed commands
    pub fn tick_interval(&self) -> f32 {
        match self {
            PacingPreset::Slow => TICK_INTERVAL * 1.5,
            PacingPreset::Normal => TICK_INTERVAL,
            PacingPreset::Fast => TICK_INTERVAL * 0.5,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Playback speed preset
    pub pacing: PacingPreset,
    /// Delay before the completion popup (seconds)
    #[serde(default = "default_completion_delay")]
    pub completion_delay: f32,
    /// How long abort messages stay visible (seconds)
    #[serde(default = "default_message_duration")]
    pub message_duration: f32,
    /// Reduced motion (skip pose interpolation, no bouncing messages)
    #[serde(default)]
    pub reduced_motion: bool,
}

fn default_completion_delay() -> f32 {
    COMPLETION_DELAY
}

fn default_message_duration() -> f32 {
    MESSAGE_DURATION
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pacing: PacingPreset::Normal,
            completion_delay: COMPLETION_DELAY,
            message_duration: MESSAGE_DURATION,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Create settings from a pacing preset
    pub fn from_preset(preset: PacingPreset) -> Self {
        Self {
            pacing: preset,
            ..Self::default()
        }
    }

    /// Effective seconds between commands
    pub fn tick_interval(&self) -> f32 {
        self.pacing.tick_interval()
    }

    /// Effective completion delay (reduced motion shows results at once)
    pub fn effective_completion_delay(&self) -> f32 {
        if self.reduced_motion {
            0.0
        } else {
            self.completion_delay.max(0.0)
        }
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "syntax_saga_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(err) => log::warn!("Ignoring stored settings: {}", err),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pacing_matches_game() {
        let settings = Settings::default();
        assert!((settings.tick_interval() - 1.2).abs() < 1e-6);
        assert!((settings.effective_completion_delay() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_presets() {
        assert_eq!(PacingPreset::parse("FAST"), Some(PacingPreset::Fast));
        assert_eq!(PacingPreset::parse("warp"), None);
        assert!(PacingPreset::Fast.tick_interval() < PacingPreset::Slow.tick_interval());
        assert_eq!(Settings::from_preset(PacingPreset::Slow).pacing, PacingPreset::Slow);
    }

    #[test]
    fn test_reduced_motion_skips_delay() {
        let settings = Settings {
            reduced_motion: true,
            ..Settings::default()
        };
        assert_eq!(settings.effective_completion_delay(), 0.0);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"pacing":"Fast"}"#).unwrap();
        assert_eq!(settings.pacing, PacingPreset::Fast);
        assert!((settings.message_duration - 3.0).abs() < 1e-6);
        assert!(!settings.reduced_motion);
    }
}

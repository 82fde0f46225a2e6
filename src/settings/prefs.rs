//! User preferences
//!
//! Five scalar settings persisted as strings. Reading applies defaults and
//! coerces types; nothing else is validated.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::store::{PreferenceStore, SettingsError, SettingsResult};

pub const KEY_CAMERA_QUALITY: &str = "camera_quality";
pub const KEY_SENSITIVITY: &str = "sensitivity";
pub const KEY_SOUND_ENABLED: &str = "sound_enabled";
pub const KEY_AUTO_HIDE: &str = "auto_hide";
pub const KEY_DARK_MODE: &str = "dark_mode";

pub const KEYS: [&str; 5] = [
    KEY_CAMERA_QUALITY,
    KEY_SENSITIVITY,
    KEY_SOUND_ENABLED,
    KEY_AUTO_HIDE,
    KEY_DARK_MODE,
];

const DEFAULT_SENSITIVITY: u8 = 85;

/// Capture quality preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraQuality {
    Low,
    #[default]
    Medium,
    High,
}

impl CameraQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            CameraQuality::Low => "low",
            CameraQuality::Medium => "medium",
            CameraQuality::High => "high",
        }
    }

    /// JPEG quality used when encoding captures
    pub fn jpeg_quality(&self) -> u8 {
        match self {
            CameraQuality::Low => 60,
            CameraQuality::Medium => 80,
            CameraQuality::High => 92,
        }
    }
}

impl fmt::Display for CameraQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CameraQuality {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(CameraQuality::Low),
            "medium" => Ok(CameraQuality::Medium),
            "high" => Ok(CameraQuality::High),
            _ => Err(()),
        }
    }
}

/// The persisted preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    pub camera_quality: CameraQuality,
    /// 0-100
    pub sensitivity: u8,
    pub sound_enabled: bool,
    pub auto_hide: bool,
    pub dark_mode: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            camera_quality: CameraQuality::Medium,
            sensitivity: DEFAULT_SENSITIVITY,
            sound_enabled: true,
            auto_hide: true,
            dark_mode: false,
        }
    }
}

impl Settings {
    /// Read all five keys, filling in defaults
    pub fn load(store: &dyn PreferenceStore) -> Self {
        let mut settings = Settings::default();
        for key in KEYS {
            if let Some(value) = store.get(key) {
                // Keys are known, so this cannot fail
                let _ = settings.apply(key, &value);
            }
        }
        settings
    }

    /// Write all five keys and flush
    pub fn save(&self, store: &mut dyn PreferenceStore) -> SettingsResult<()> {
        for key in KEYS {
            store.set(key, self.get(key)?);
        }
        store.flush()
    }

    /// The stored string form of one setting
    pub fn get(&self, key: &str) -> SettingsResult<String> {
        Ok(match key {
            KEY_CAMERA_QUALITY => self.camera_quality.as_str().to_string(),
            KEY_SENSITIVITY => self.sensitivity.to_string(),
            KEY_SOUND_ENABLED => self.sound_enabled.to_string(),
            KEY_AUTO_HIDE => self.auto_hide.to_string(),
            KEY_DARK_MODE => self.dark_mode.to_string(),
            other => return Err(SettingsError::UnknownKey(other.to_string())),
        })
    }

    /// Update one setting from its string form.
    ///
    /// Sound and auto-hide are on unless the value is exactly `"false"`;
    /// dark mode is on only for `"true"`.
    pub fn apply(&mut self, key: &str, value: &str) -> SettingsResult<()> {
        match key {
            KEY_CAMERA_QUALITY => {
                self.camera_quality = value.parse().unwrap_or_default();
            }
            KEY_SENSITIVITY => {
                self.sensitivity = value
                    .trim()
                    .parse::<i64>()
                    .map(|v| v.clamp(0, 100) as u8)
                    .unwrap_or(DEFAULT_SENSITIVITY);
            }
            KEY_SOUND_ENABLED => self.sound_enabled = value != "false",
            KEY_AUTO_HIDE => self.auto_hide = value != "false",
            KEY_DARK_MODE => self.dark_mode = value == "true",
            other => return Err(SettingsError::UnknownKey(other.to_string())),
        }
        Ok(())
    }

    pub fn sensitivity_label(&self) -> String {
        format!("{}%", self.sensitivity)
    }
}

/// Global appearance flag; the terminal renderer picks its palette from it
#[derive(Debug, Clone, Default)]
pub struct Appearance {
    dark: Arc<AtomicBool>,
}

impl Appearance {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&self, settings: &Settings) {
        self.set_dark(settings.dark_mode);
    }

    pub fn set_dark(&self, dark: bool) {
        self.dark.store(dark, Ordering::Relaxed);
    }

    pub fn is_dark(&self) -> bool {
        self.dark.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::store::MemoryStore;

    #[test]
    fn test_defaults_on_empty_store() {
        let settings = Settings::load(&MemoryStore::new());
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.camera_quality, CameraQuality::Medium);
        assert_eq!(settings.sensitivity_label(), "85%");
        assert!(settings.sound_enabled);
        assert!(settings.auto_hide);
        assert!(!settings.dark_mode);
    }

    #[test]
    fn test_boolean_coercion() {
        let mut store = MemoryStore::new();
        store.set(KEY_SOUND_ENABLED, "no".to_string());
        store.set(KEY_AUTO_HIDE, "false".to_string());
        store.set(KEY_DARK_MODE, "TRUE".to_string());

        let settings = Settings::load(&store);
        assert!(settings.sound_enabled);
        assert!(!settings.auto_hide);
        assert!(!settings.dark_mode);
    }

    #[test]
    fn test_numeric_and_enum_coercion() {
        let mut store = MemoryStore::new();
        store.set(KEY_SENSITIVITY, "140".to_string());
        store.set(KEY_CAMERA_QUALITY, "ultra".to_string());
        let settings = Settings::load(&store);
        assert_eq!(settings.sensitivity, 100);
        assert_eq!(settings.camera_quality, CameraQuality::Medium);

        store.set(KEY_SENSITIVITY, "abc".to_string());
        store.set(KEY_CAMERA_QUALITY, "High".to_string());
        let settings = Settings::load(&store);
        assert_eq!(settings.sensitivity, 85);
        assert_eq!(settings.camera_quality, CameraQuality::High);
    }

    #[test]
    fn test_save_writes_string_values() {
        let mut store = MemoryStore::new();
        let settings = Settings {
            dark_mode: true,
            sound_enabled: false,
            sensitivity: 70,
            ..Settings::default()
        };
        settings.save(&mut store).unwrap();

        assert_eq!(store.get(KEY_DARK_MODE).as_deref(), Some("true"));
        assert_eq!(store.get(KEY_SOUND_ENABLED).as_deref(), Some("false"));
        assert_eq!(store.get(KEY_SENSITIVITY).as_deref(), Some("70"));
        assert_eq!(store.get(KEY_CAMERA_QUALITY).as_deref(), Some("medium"));
        assert_eq!(Settings::load(&store), settings);
    }

    #[test]
    fn test_unknown_key() {
        let mut settings = Settings::default();
        assert!(matches!(
            settings.apply("volume", "11"),
            Err(SettingsError::UnknownKey(_))
        ));
    }

    #[test]
    fn test_appearance_toggle() {
        let appearance = Appearance::new();
        let shared = appearance.clone();
        appearance.apply(&Settings {
            dark_mode: true,
            ..Settings::default()
        });
        assert!(shared.is_dark());
        appearance.set_dark(false);
        assert!(!shared.is_dark());
    }
}

//! Settings Store
//!
//! Camera quality, sensitivity, sound, auto-hide and dark mode, persisted
//! as string key-value pairs.

mod prefs;
mod store;

pub use prefs::{
    Appearance, CameraQuality, Settings, KEYS, KEY_AUTO_HIDE, KEY_CAMERA_QUALITY, KEY_DARK_MODE,
    KEY_SENSITIVITY, KEY_SOUND_ENABLED,
};
pub use store::{FileStore, MemoryStore, PreferenceStore, SettingsError, SettingsResult};

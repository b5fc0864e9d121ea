//! Local player settings kept between runs

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::audio::DEFAULT_VOLUME_PERCENT;

pub const SETTINGS_FILE: &str = ".cache/player_settings.json";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerSettings {
    pub volume: u8,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            volume: DEFAULT_VOLUME_PERCENT,
        }
    }
}

/// Reads and writes [`PlayerSettings`] as JSON on disk
#[derive(Clone, Debug)]
pub struct SettingsStore {
    path: PathBuf,
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new(SETTINGS_FILE)
    }
}

impl SettingsStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Missing or unreadable files fall back to defaults
    pub fn load(&self) -> PlayerSettings {
        if !self.path.exists() {
            return PlayerSettings::default();
        }
        match fs::read_to_string(&self.path)
            .map_err(anyhow::Error::from)
            .and_then(|content| Ok(serde_json::from_str::<PlayerSettings>(&content)?))
        {
            Ok(mut settings) => {
                settings.volume = settings.volume.min(100);
                settings
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Ignoring unreadable settings file");
                PlayerSettings::default()
            }
        }
    }

    pub fn save(&self, settings: &PlayerSettings) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }
        let content = serde_json::to_string(settings)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

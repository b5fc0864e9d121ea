//! Playback-related types

use crate::audio::DEFAULT_VOLUME_PERCENT;
use super::types::{RepeatMode, Track};

/// The currently playing position within the queue
#[derive(Clone, Debug, PartialEq)]
pub struct PlaybackCursor {
    pub queue_index: usize,
    pub song: Track,
    pub position_secs: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlaybackMode {
    pub shuffled: bool,
    pub repeat: RepeatMode,
}

/// Settings related to playback (shuffle, repeat, volume)
#[derive(Clone, Debug)]
pub struct PlaybackSettings {
    pub shuffle: bool,
    pub repeat: RepeatMode,
    pub volume: u8,
    pub muted: bool,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            shuffle: false,
            repeat: RepeatMode::Off,
            volume: DEFAULT_VOLUME_PERCENT,
            muted: false,
        }
    }
}

/// Complete playback information for rendering the UI
#[derive(Clone, Debug, Default)]
pub struct PlaybackInfo {
    pub track: Option<Track>,
    pub position_secs: f64,
    pub duration_secs: Option<f64>,
    pub is_playing: bool,
    pub settings: PlaybackSettings,
    pub queue: Vec<Track>,
    pub queue_index: usize,
}

impl PlaybackInfo {
    pub fn progress_ratio(&self) -> f64 {
        match self.duration_secs {
            Some(duration) if duration > 0.0 => (self.position_secs / duration).clamp(0.0, 1.0),
            _ => 0.0,
        }
    }
}

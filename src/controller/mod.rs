//! Controller module - Application logic and event handling
//!
//! - `queue_controller`: The playback queue state machine
//! - `persistence`: Throttled position saving and session resume
//! - `playback`: Playback control methods
//! - `favorites`: Favorite toggling for the playing track
//! - `navigation`: Song list / playlist navigation
//! - `playlists`: Playlist management and invitations
//! - `player_events`: Sink event pump
//! - `input`: Key event handling

mod queue_controller;
mod persistence;
mod playback;
mod favorites;
mod navigation;
mod playlists;
mod player_events;
mod input;

pub use queue_controller::{PlaybackController, PlayerUpdates, SeekTarget};
use persistence::PositionThrottle;

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::audio::AudioSink;
use crate::config::Config;
use crate::error::PlayerError;
use crate::model::{AppModel, MusicApi, Notification, PlaybackInfo, SongId};

pub type Player = PlaybackController<Box<dyn AudioSink + Send>>;
pub type SharedPlayer = Arc<Mutex<Player>>;

/// What a player transition left for the UI side
struct PlayerOutput {
    updates: PlayerUpdates,
    notifications: Vec<Notification>,
    current_index: usize,
    favorite: Option<(SongId, bool)>,
}

#[derive(Clone)]
pub struct AppController {
    pub(crate) model: Arc<Mutex<AppModel>>,
    pub(crate) player: SharedPlayer,
    pub(crate) api: Arc<dyn MusicApi>,
    throttle: Arc<Mutex<PositionThrottle>>,
    resume_threshold_secs: f64,
}

impl AppController {
    pub fn new(
        model: Arc<Mutex<AppModel>>,
        player: SharedPlayer,
        api: Arc<dyn MusicApi>,
        config: &Config,
    ) -> Self {
        Self {
            model,
            player,
            api,
            throttle: Arc::new(Mutex::new(PositionThrottle::new(config.save_interval))),
            resume_threshold_secs: config.resume_threshold_secs,
        }
    }

    pub async fn playback_info(&self) -> PlaybackInfo {
        self.player.lock().await.playback_info()
    }

    /// Run a transition on the player and apply what it produced
    pub(crate) async fn with_player<R>(&self, f: impl FnOnce(&mut Player) -> R) -> R {
        let (result, output) = {
            let mut player = self.player.lock().await;
            let result = f(&mut player);
            let updates = player.take_updates();
            let favorite = if updates.favorite_changed {
                player.current_track().map(|t| (t.id, t.is_favorite))
            } else {
                None
            };
            let output = PlayerOutput {
                updates,
                notifications: player.take_notifications(),
                current_index: player.current_index(),
                favorite,
            };
            (result, output)
        };

        self.apply_player_output(output).await;
        result
    }

    async fn apply_player_output(&self, output: PlayerOutput) {
        let PlayerOutput { updates, notifications, current_index, favorite } = output;
        {
            let mut model = self.model.lock().await;
            for notification in notifications {
                model.notify(notification);
            }
            if updates.queue_changed {
                model.follow_queue_cursor(current_index);
            }
            // Listed copies of the playing song follow the player's flag
            if let Some((song_id, is_favorite)) = favorite {
                model.mark_favorite(song_id, is_favorite);
            }
        }

        if let Some(song_id) = updates.track_started {
            self.persist_position(song_id, 0.0).await;
        }
    }

    pub(crate) async fn notify(&self, notification: Notification) {
        self.model.lock().await.notify(notification);
    }

    pub(crate) fn format_error(error: &PlayerError) -> String {
        match error {
            PlayerError::Network(msg) if msg.starts_with("401") => {
                "Session expired. Update the access token and restart.".to_string()
            }
            PlayerError::Network(msg) if msg.starts_with('5') => {
                "The server had a problem. Try again later.".to_string()
            }
            PlayerError::Network(msg) if msg.starts_with('4') => {
                // "<status> <reason from the backend>"
                msg.split_once(' ')
                    .map(|(_, reason)| reason.to_string())
                    .unwrap_or_else(|| msg.clone())
            }
            PlayerError::Network(_) => "Error communicating with the server".to_string(),
            PlayerError::Playback(_) => "Error playing music".to_string(),
            PlayerError::Decode(_) => "Unexpected response from the server".to_string(),
        }
    }
}

//! Playback control methods

use super::{AppController, SeekTarget};

const VOLUME_STEP: u8 = 5;
const SEEK_STEP_SECS: f64 = 5.0;

impl AppController {
    pub async fn toggle_playback(&self) {
        let is_playing = self
            .with_player(|player| {
                player.toggle_play_pause();
                player.is_playing()
            })
            .await;
        tracing::info!(action = if is_playing { "resumed" } else { "paused" }, "Playback toggled");
    }

    pub async fn next_track(&self) {
        tracing::debug!("Skipping to next track");
        self.with_player(|player| player.next()).await;
    }

    pub async fn previous_track(&self) {
        tracing::debug!("Going to previous track");
        self.with_player(|player| player.previous()).await;
    }

    pub async fn toggle_shuffle(&self) {
        self.with_player(|player| player.toggle_shuffle()).await;
    }

    pub async fn cycle_repeat(&self) {
        self.with_player(|player| player.toggle_repeat()).await;
    }

    pub async fn volume_up(&self) {
        self.with_player(|player| player.set_volume(player.volume().saturating_add(VOLUME_STEP)))
            .await;
    }

    pub async fn volume_down(&self) {
        self.with_player(|player| player.set_volume(player.volume().saturating_sub(VOLUME_STEP)))
            .await;
    }

    pub async fn toggle_mute(&self) {
        let muted = self
            .with_player(|player| {
                player.toggle_mute();
                player.is_muted()
            })
            .await;
        tracing::debug!(muted, "Mute toggled");
    }

    /// Seek by `delta` seconds from the current position
    pub async fn seek_relative(&self, delta: f64) {
        let position = self.playback_info().await.position_secs;
        self.with_player(|player| player.seek(SeekTarget::Seconds(position + delta)))
            .await;
    }

    pub async fn seek_forward(&self) {
        self.seek_relative(SEEK_STEP_SECS).await;
    }

    pub async fn seek_backward(&self) {
        self.seek_relative(-SEEK_STEP_SECS).await;
    }
}

//! Throttled position saving and session resume

use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

use crate::model::{Notification, SongId};

use super::AppController;

/// Rate limit for position writes. Position 0 (a track start) always passes.
#[derive(Debug)]
pub struct PositionThrottle {
    interval: Duration,
    last_write: Option<Instant>,
}

impl PositionThrottle {
    pub fn new(interval: Duration) -> Self {
        Self { interval, last_write: None }
    }

    /// Whether a write of `position` at `now` may go out. Admitting records the write.
    pub fn admit(&mut self, position: f64, now: Instant) -> bool {
        if position > 0.0 {
            if let Some(last) = self.last_write {
                if now.saturating_duration_since(last) < self.interval {
                    return false;
                }
            }
        }
        self.last_write = Some(now);
        true
    }
}

impl AppController {
    /// Save the playback position unless a write went out recently.
    ///
    /// The write runs in the background; the handle is returned for callers
    /// that need to wait for it.
    pub async fn persist_position(&self, song_id: SongId, position: f64) -> Option<JoinHandle<()>> {
        if !self.throttle.lock().await.admit(position, Instant::now()) {
            tracing::trace!(song_id, position, "Position save throttled");
            return None;
        }

        let api = self.api.clone();
        let model = self.model.clone();
        Some(tokio::spawn(async move {
            if api.save_playback_state(song_id, position).await.is_err() {
                model
                    .lock()
                    .await
                    .notify(Notification::error("Could not save playback position"));
            }
        }))
    }

    /// Offer the last session's song when it was left far enough in.
    /// Returns whether the player was primed.
    pub async fn resume_from_remote(&self) -> bool {
        let state = match self.api.fetch_playback_state().await {
            Ok(Some(state)) => state,
            Ok(None) => {
                tracing::debug!("No saved playback state");
                return false;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Could not fetch playback state");
                return false;
            }
        };

        if state.position <= self.resume_threshold_secs {
            tracing::debug!(position = state.position, "Saved position too early to resume");
            return false;
        }

        let song_id = state.song.id;
        let position = state.position;
        let last_played_at = state.last_played_at;
        let primed = self
            .with_player(move |player| {
                // The user already started something while the request was in flight
                if player.has_queue() {
                    return false;
                }
                player.prime(state.song, position);
                player.has_queue()
            })
            .await;

        if primed {
            tracing::info!(song_id, position, ?last_played_at, "Resumed saved session");
            self.notify(Notification::info("Last played song is ready - press Space to resume"))
                .await;
        } else {
            tracing::debug!(song_id, "Discarding saved session");
        }
        primed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NotificationLevel;
    use crate::test_support::{MockMusicApi, SinkCall, harness, track, tracks};

    #[test]
    fn throttle_blocks_writes_inside_interval() {
        let mut throttle = PositionThrottle::new(Duration::from_secs(5));
        let start = Instant::now();
        assert!(throttle.admit(10.0, start));
        assert!(!throttle.admit(12.0, start + Duration::from_secs(2)));
        assert!(throttle.admit(16.0, start + Duration::from_secs(6)));
    }

    #[test]
    fn throttle_always_admits_track_start() {
        let mut throttle = PositionThrottle::new(Duration::from_secs(5));
        let start = Instant::now();
        assert!(throttle.admit(10.0, start));
        assert!(throttle.admit(0.0, start + Duration::from_millis(100)));
    }

    #[tokio::test]
    async fn two_quick_saves_make_one_write() {
        let h = harness(MockMusicApi::new());
        let first = h.controller.persist_position(1, 10.0).await;
        let second = h.controller.persist_position(1, 10.0).await;

        first.expect("first write goes out").await.unwrap();
        assert!(second.is_none());
        assert_eq!(h.api.save_count(), 1);
        assert_eq!(*h.api.saved_positions.lock().unwrap(), vec![(1, 10.0)]);
    }

    #[tokio::test]
    async fn failed_save_is_reported() {
        let h = harness(MockMusicApi::offline());
        h.controller.persist_position(1, 10.0).await.unwrap().await.unwrap();

        let model = h.controller.model.lock().await;
        let notification = model.notification().expect("notification");
        assert_eq!(notification.level, NotificationLevel::Error);
    }

    #[tokio::test]
    async fn early_saved_position_is_not_resumed() {
        let h = harness(MockMusicApi::with_playback_state(track(4), 3.0));
        assert!(!h.controller.resume_from_remote().await);

        assert!(h.controller.playback_info().await.queue.is_empty());
        assert!(h.controller.model.lock().await.notification().is_none());
    }

    #[tokio::test]
    async fn saved_position_primes_single_track_queue() {
        let h = harness(MockMusicApi::with_playback_state(track(4), 42.0));
        assert!(h.controller.resume_from_remote().await);

        let info = h.controller.playback_info().await;
        assert_eq!(info.queue.len(), 1);
        assert_eq!(info.track.map(|t| t.id), Some(4));
        assert!(!info.is_playing);
        assert!(!h.sink_calls.lock().unwrap().contains(&SinkCall::Play));

        let model = h.controller.model.lock().await;
        assert_eq!(model.notification().map(|n| n.level), Some(NotificationLevel::Info));
    }

    #[tokio::test]
    async fn resume_is_dropped_when_queue_already_exists() {
        let h = harness(MockMusicApi::with_playback_state(track(9), 42.0));
        h.controller.with_player(|p| p.load_queue(&tracks(3), 0)).await;

        assert!(!h.controller.resume_from_remote().await);
        let info = h.controller.playback_info().await;
        assert_eq!(info.queue.len(), 3);
        assert_eq!(info.track.map(|t| t.id), Some(1));
    }

    #[tokio::test]
    async fn resume_failure_stays_silent() {
        let h = harness(MockMusicApi::offline());
        assert!(!h.controller.resume_from_remote().await);
        assert!(h.controller.model.lock().await.notification().is_none());
    }
}

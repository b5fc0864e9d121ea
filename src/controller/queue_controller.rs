//! Playback queue state machine
//!
//! [`PlaybackController`] owns the queue, cursor, modes and volume, and drives
//! an injected [`AudioSink`]. It never touches the UI or the network: the async
//! layer in [`super::AppController`] feeds it events and drains the
//! notifications and display updates it produces.

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::audio::{AudioSink, DEFAULT_VOLUME_PERCENT, SinkEvent};
use crate::error::PlayerError;
use crate::model::{
    Notification, PlayQueue, PlaybackCursor, PlaybackInfo, PlaybackMode, PlaybackSettings,
    RepeatMode, SongId, Track,
};

/// Where to seek to
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SeekTarget {
    /// Fraction of the duration, `0.0..=1.0`
    Fraction(f64),
    Seconds(f64),
}

/// Display work produced by a transition
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlayerUpdates {
    /// A track started from position 0
    pub track_started: Option<SongId>,
    pub queue_changed: bool,
    pub favorite_changed: bool,
}

pub struct PlaybackController<S: AudioSink> {
    sink: S,
    queue: PlayQueue,
    repeat: RepeatMode,
    is_playing: bool,
    volume: u8,
    is_muted: bool,
    position: f64,
    duration: Option<f64>,
    pending_seek: Option<f64>,
    rng: StdRng,
    updates: PlayerUpdates,
    notifications: Vec<Notification>,
}

impl<S: AudioSink> PlaybackController<S> {
    pub fn new(sink: S) -> Self {
        Self::with_rng(sink, StdRng::from_entropy())
    }

    pub fn with_rng(mut sink: S, rng: StdRng) -> Self {
        sink.set_volume(DEFAULT_VOLUME_PERCENT as f32 / 100.0);
        Self {
            sink,
            queue: PlayQueue::new(),
            repeat: RepeatMode::Off,
            is_playing: false,
            volume: DEFAULT_VOLUME_PERCENT,
            is_muted: false,
            position: 0.0,
            duration: None,
            pending_seek: None,
            rng,
            updates: PlayerUpdates::default(),
            notifications: Vec::new(),
        }
    }

    /// Stop output and drop the queue. The controller can be reused afterwards.
    pub fn dispose(&mut self) {
        tracing::debug!("Disposing playback controller");
        self.sink.pause();
        self.queue.clear();
        self.is_playing = false;
        self.position = 0.0;
        self.duration = None;
        self.pending_seek = None;
        self.updates.queue_changed = true;
    }

    // ========================================================================
    // Queue transitions
    // ========================================================================

    /// Replace the queue with a copy of `tracks` and play `start_index`.
    pub fn load_queue(&mut self, tracks: &[Track], start_index: usize) {
        if start_index >= tracks.len() {
            tracing::debug!(start_index, len = tracks.len(), "Ignoring queue load with bad start index");
            return;
        }
        tracing::info!(len = tracks.len(), start_index, "Loading queue");
        self.queue.replace(tracks.to_vec(), start_index);
        self.updates.queue_changed = true;
        self.play_current(None);
    }

    /// Load `track` into the sink and start it. With a start position the seek
    /// waits until the sink reports the duration.
    pub fn play_track(&mut self, track: &Track, start_position: Option<f64>) {
        let Some(url) = track.file_url.as_deref().filter(|u| !u.is_empty()) else {
            tracing::warn!(song_id = track.id, "Track has no file URL");
            self.is_playing = false;
            self.report(&PlayerError::Playback(format!("\"{}\" has no audio file", track.title)));
            return;
        };

        tracing::info!(song_id = track.id, title = %track.title, ?start_position, "Playing track");
        self.sink.load(url, track.duration);
        self.position = 0.0;
        self.duration = None;
        self.pending_seek = start_position.filter(|p| *p > 0.0);
        self.start_sink();

        if self.pending_seek.is_none() {
            self.updates.track_started = Some(track.id);
        }
        self.updates.favorite_changed = true;
        self.updates.queue_changed = true;
    }

    fn play_current(&mut self, start_position: Option<f64>) {
        if let Some(track) = self.queue.current().cloned() {
            self.play_track(&track, start_position);
        }
    }

    /// Skip ahead. A user skip wraps past the last track whatever the repeat
    /// mode; only a natural track end stops there.
    pub fn next(&mut self) {
        if self.queue.step_forward(&mut self.rng).is_some() {
            self.play_current(None);
        }
    }

    pub fn previous(&mut self) {
        if self.queue.step_back(&mut self.rng).is_some() {
            self.play_current(None);
        }
    }

    /// Jump to a position of the current queue
    pub fn play_from_queue(&mut self, index: usize) {
        if self.queue.set_index(index) {
            self.play_current(None);
        }
    }

    pub fn on_track_end(&mut self) {
        match self.repeat {
            RepeatMode::One => {
                tracing::debug!("Repeating current track");
                self.sink.seek(0.0);
                self.position = 0.0;
                self.start_sink();
                self.updates.track_started = self.queue.current().map(|t| t.id);
            }
            RepeatMode::All => self.next(),
            RepeatMode::Off if !self.queue.is_last() => self.next(),
            RepeatMode::Off => {
                tracing::debug!(len = self.queue.len(), "Reached end of queue");
                self.is_playing = false;
            }
        }
    }

    pub fn toggle_shuffle(&mut self) {
        if self.queue.is_shuffled() {
            self.queue.restore_original();
        } else {
            self.queue.shuffle_keeping_current(&mut self.rng);
        }
        tracing::info!(shuffled = self.queue.is_shuffled(), "Shuffle toggled");
        self.updates.queue_changed = true;
    }

    pub fn toggle_repeat(&mut self) {
        self.repeat = self.repeat.next();
        tracing::info!(repeat = ?self.repeat, "Repeat mode changed");
    }

    /// Resume a saved session: single-track queue, sink primed to `position`,
    /// nothing starts playing.
    pub fn prime(&mut self, track: Track, position: f64) {
        let Some(url) = track.file_url.clone().filter(|u| !u.is_empty()) else {
            tracing::warn!(song_id = track.id, "Saved track has no file URL");
            return;
        };
        tracing::info!(song_id = track.id, position, "Priming saved session");
        self.sink.load(&url, track.duration);
        self.queue.replace(vec![track], 0);
        self.is_playing = false;
        self.position = 0.0;
        self.duration = None;
        self.pending_seek = Some(position).filter(|p| *p > 0.0);
        self.updates.queue_changed = true;
        self.updates.favorite_changed = true;
    }

    // ========================================================================
    // Output control
    // ========================================================================

    pub fn toggle_play_pause(&mut self) {
        if self.queue.current().is_none() {
            return;
        }
        if self.is_playing {
            self.sink.pause();
            self.position = self.sink.position();
            self.is_playing = false;
        } else {
            self.start_sink();
        }
    }

    pub fn seek(&mut self, target: SeekTarget) {
        let seconds = match target {
            SeekTarget::Fraction(fraction) => match self.duration {
                Some(duration) => fraction.clamp(0.0, 1.0) * duration,
                None => return,
            },
            SeekTarget::Seconds(seconds) => match self.duration {
                Some(duration) => seconds.clamp(0.0, duration),
                None => seconds.max(0.0),
            },
        };
        self.sink.seek(seconds);
        self.position = seconds;
    }

    pub fn set_volume(&mut self, level: u8) {
        self.volume = level.min(100);
        if !self.is_muted {
            self.sink.set_volume(self.volume as f32 / 100.0);
        }
    }

    pub fn toggle_mute(&mut self) {
        self.is_muted = !self.is_muted;
        let applied = if self.is_muted { 0.0 } else { self.volume as f32 / 100.0 };
        self.sink.set_volume(applied);
    }

    fn start_sink(&mut self) {
        match self.sink.play() {
            Ok(()) => self.is_playing = true,
            Err(e) => {
                tracing::error!(error = %e, "Sink refused to play");
                self.is_playing = false;
                self.report(&e);
            }
        }
    }

    // ========================================================================
    // Sink events
    // ========================================================================

    pub fn poll_sink(&mut self) -> Vec<SinkEvent> {
        self.sink.poll_events()
    }

    /// Apply one sink event. Returns `(song, position)` when the position
    /// should be considered for saving.
    pub fn handle_sink_event(&mut self, event: SinkEvent) -> Option<(SongId, f64)> {
        match event {
            SinkEvent::MetadataLoaded { duration } => {
                self.on_metadata_loaded(duration);
                None
            }
            SinkEvent::TimeUpdate { position } => {
                self.position = position;
                self.queue.current().map(|t| (t.id, position))
            }
            SinkEvent::Ended => {
                self.on_track_end();
                None
            }
        }
    }

    fn on_metadata_loaded(&mut self, duration: Option<f64>) {
        self.duration = duration;
        if let Some(target) = self.pending_seek.take() {
            match duration {
                Some(d) if target < d => {
                    self.sink.seek(target);
                    self.position = target;
                }
                _ => tracing::debug!(target, ?duration, "Skipping start seek past duration"),
            }
        }
    }

    // ========================================================================
    // Favorites
    // ========================================================================

    pub fn current_song_id(&self) -> Option<SongId> {
        self.queue.current().map(|t| t.id)
    }

    pub fn set_favorite(&mut self, song_id: SongId, is_favorite: bool) {
        if self.queue.set_favorite(song_id, is_favorite) {
            self.updates.favorite_changed = true;
        }
    }

    // ========================================================================
    // Read side
    // ========================================================================

    pub fn current_track(&self) -> Option<&Track> {
        self.queue.current()
    }

    pub fn current_index(&self) -> usize {
        self.queue.index()
    }

    pub fn queue(&self) -> &[Track] {
        self.queue.items()
    }

    #[cfg(test)]
    pub(crate) fn original_queue(&self) -> &[Track] {
        self.queue.original()
    }

    pub fn has_queue(&self) -> bool {
        !self.queue.is_empty()
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn volume(&self) -> u8 {
        self.volume
    }

    pub fn is_muted(&self) -> bool {
        self.is_muted
    }

    pub fn mode(&self) -> PlaybackMode {
        PlaybackMode {
            shuffled: self.queue.is_shuffled(),
            repeat: self.repeat,
        }
    }

    pub fn cursor(&self) -> Option<PlaybackCursor> {
        self.queue.current().map(|song| PlaybackCursor {
            queue_index: self.queue.index(),
            song: song.clone(),
            position_secs: self.position,
        })
    }

    pub fn playback_info(&self) -> PlaybackInfo {
        let mode = self.mode();
        let cursor = self.cursor();
        let position_secs = match &cursor {
            Some(_) if self.is_playing => self.sink.position(),
            Some(cursor) => cursor.position_secs,
            None => 0.0,
        };
        PlaybackInfo {
            track: cursor.map(|c| c.song),
            position_secs,
            duration_secs: self.duration.or_else(|| self.sink.duration()),
            is_playing: self.is_playing,
            settings: PlaybackSettings {
                shuffle: mode.shuffled,
                repeat: mode.repeat,
                volume: self.volume,
                muted: self.is_muted,
            },
            queue: self.queue.items().to_vec(),
            queue_index: self.queue.index(),
        }
    }

    pub fn take_updates(&mut self) -> PlayerUpdates {
        std::mem::take(&mut self.updates)
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    fn report(&mut self, error: &PlayerError) {
        let message = match error {
            PlayerError::Playback(_) => "Error playing music".to_string(),
            other => other.to_string(),
        };
        self.notifications.push(Notification::error(message));
    }

    #[cfg(test)]
    pub(crate) fn sink(&self) -> &S {
        &self.sink
    }
}

//! Audio output sink: the capability interface the playback controller drives,
//! and the wall-clock sink the binary ships with.

use std::time::Instant;

use crate::error::{PlayerError, PlayerResult};

pub const DEFAULT_VOLUME_PERCENT: u8 = 70;

/// Events the sink reports back to the controller
#[derive(Clone, Debug, PartialEq)]
pub enum SinkEvent {
    /// Duration became known for the loaded source (`None` when it never will)
    MetadataLoaded { duration: Option<f64> },
    /// Periodic position report while playing
    TimeUpdate { position: f64 },
    /// The loaded source played to its end
    Ended,
}

/// Media playback primitive consumed by the controller.
///
/// Implementations must not call back into the controller; state changes are
/// reported through [`AudioSink::poll_events`].
pub trait AudioSink {
    fn load(&mut self, url: &str, duration_hint: Option<f64>);
    fn play(&mut self) -> PlayerResult<()>;
    fn pause(&mut self);
    fn seek(&mut self, seconds: f64);
    /// Volume in `0.0..=1.0`
    fn set_volume(&mut self, volume: f32);
    fn duration(&self) -> Option<f64>;
    fn position(&self) -> f64;
    fn poll_events(&mut self) -> Vec<SinkEvent>;
}

impl<S: AudioSink + ?Sized> AudioSink for Box<S> {
    fn load(&mut self, url: &str, duration_hint: Option<f64>) {
        (**self).load(url, duration_hint)
    }

    fn play(&mut self) -> PlayerResult<()> {
        (**self).play()
    }

    fn pause(&mut self) {
        (**self).pause()
    }

    fn seek(&mut self, seconds: f64) {
        (**self).seek(seconds)
    }

    fn set_volume(&mut self, volume: f32) {
        (**self).set_volume(volume)
    }

    fn duration(&self) -> Option<f64> {
        (**self).duration()
    }

    fn position(&self) -> f64 {
        (**self).position()
    }

    fn poll_events(&mut self) -> Vec<SinkEvent> {
        (**self).poll_events()
    }
}

/// A sink that keeps time without producing sound.
///
/// Position advances with the wall clock while playing and `Ended` fires once
/// the duration is reached. A source without a known duration plays until it
/// is replaced.
pub struct ClockSink {
    url: Option<String>,
    duration: Option<f64>,
    position: f64,
    last_update: Instant,
    is_playing: bool,
    volume: f32,
    metadata_pending: bool,
}

impl Default for ClockSink {
    fn default() -> Self {
        Self {
            url: None,
            duration: None,
            position: 0.0,
            last_update: Instant::now(),
            is_playing: false,
            volume: DEFAULT_VOLUME_PERCENT as f32 / 100.0,
            metadata_pending: false,
        }
    }
}

impl ClockSink {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn volume(&self) -> f32 {
        self.volume
    }

    fn position_at(&self, now: Instant) -> f64 {
        if !self.is_playing {
            return self.position;
        }
        let elapsed = now.saturating_duration_since(self.last_update).as_secs_f64();
        let position = self.position + elapsed;
        match self.duration {
            Some(duration) => position.min(duration),
            None => position,
        }
    }

    fn poll_events_at(&mut self, now: Instant) -> Vec<SinkEvent> {
        let mut events = Vec::new();

        // Metadata goes out alone; a start seek may move the clock before the next poll
        if self.metadata_pending {
            self.metadata_pending = false;
            events.push(SinkEvent::MetadataLoaded { duration: self.duration });
            return events;
        }

        if self.is_playing {
            self.position = self.position_at(now);
            self.last_update = now;

            match self.duration {
                Some(duration) if self.position >= duration => {
                    self.is_playing = false;
                    events.push(SinkEvent::Ended);
                }
                _ => events.push(SinkEvent::TimeUpdate { position: self.position }),
            }
        }

        events
    }
}

impl AudioSink for ClockSink {
    fn load(&mut self, url: &str, duration_hint: Option<f64>) {
        tracing::debug!(url, ?duration_hint, "Loading source");
        self.url = Some(url.to_string());
        self.duration = duration_hint.filter(|d| d.is_finite() && *d > 0.0);
        self.position = 0.0;
        self.is_playing = false;
        self.last_update = Instant::now();
        self.metadata_pending = true;
    }

    fn play(&mut self) -> PlayerResult<()> {
        if self.url.is_none() {
            return Err(PlayerError::Playback("no source loaded".to_string()));
        }
        if let Some(duration) = self.duration {
            if self.position >= duration {
                self.position = 0.0;
            }
        }
        self.last_update = Instant::now();
        self.is_playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.position = self.position_at(Instant::now());
        self.last_update = Instant::now();
        self.is_playing = false;
    }

    fn seek(&mut self, seconds: f64) {
        let upper = self.duration.unwrap_or(f64::MAX);
        self.position = seconds.clamp(0.0, upper);
        self.last_update = Instant::now();
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    fn duration(&self) -> Option<f64> {
        self.duration
    }

    fn position(&self) -> f64 {
        self.position_at(Instant::now())
    }

    fn poll_events(&mut self) -> Vec<SinkEvent> {
        self.poll_events_at(Instant::now())
    }
}

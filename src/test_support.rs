// Test support utilities shared by the unit tests

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::audio::{AudioSink, SinkEvent};
use crate::config::Config;
use crate::controller::{AppController, PlaybackController};
use crate::error::{PlayerError, PlayerResult};
use crate::model::{
    FavoriteToggle, InvitationStatus, MusicApi, PlaylistDetail, PlaylistInvitation, PlaylistSummary,
    PublicStatusUpdate, RemotePlaybackState, SongFilter, AppModel, SongId, Track,
};

pub fn track(id: SongId) -> Track {
    Track {
        id,
        title: format!("Song {id}"),
        artist: Some("Tester".to_string()),
        album: None,
        file_url: Some(format!("http://host/media/{id}.mp3")),
        is_favorite: false,
        is_public: false,
        duration: Some(180.0),
        owner: None,
    }
}

/// Tracks with ids `1..=count`
pub fn tracks(count: usize) -> Vec<Track> {
    (1..=count as SongId).map(track).collect()
}

pub fn invitation(id: u64, playlist_id: u64, status: InvitationStatus) -> PlaylistInvitation {
    PlaylistInvitation {
        id,
        playlist_id,
        playlist_name: format!("Shared {playlist_id}"),
        inviter_username: "ali".to_string(),
        inviter_email: Some("ali@dmail.ir".to_string()),
        status,
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum SinkCall {
    Load(String),
    Play,
    Pause,
    Seek(f64),
    SetVolume(f32),
}

/// Sink that records every call instead of producing sound
pub struct RecordingSink {
    calls: Arc<Mutex<Vec<SinkCall>>>,
    events: Arc<Mutex<Vec<SinkEvent>>>,
    fail_play: bool,
    duration: Option<f64>,
    position: f64,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            events: Arc::new(Mutex::new(Vec::new())),
            fail_play: false,
            duration: None,
            position: 0.0,
        }
    }

    pub fn failing_play() -> Self {
        Self {
            fail_play: true,
            ..Self::new()
        }
    }

    /// Shared handle to the call log, usable after the sink was boxed
    pub fn call_log(&self) -> Arc<Mutex<Vec<SinkCall>>> {
        self.calls.clone()
    }

    /// Shared handle to queue events returned by the next poll
    pub fn event_queue(&self) -> Arc<Mutex<Vec<SinkEvent>>> {
        self.events.clone()
    }

    pub fn calls(&self) -> Vec<SinkCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn loaded_urls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                SinkCall::Load(url) => Some(url),
                _ => None,
            })
            .collect()
    }

    pub fn last_volume(&self) -> Option<f32> {
        self.calls().into_iter().rev().find_map(|c| match c {
            SinkCall::SetVolume(v) => Some(v),
            _ => None,
        })
    }

    fn record(&self, call: SinkCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl AudioSink for RecordingSink {
    fn load(&mut self, url: &str, duration_hint: Option<f64>) {
        self.duration = duration_hint;
        self.position = 0.0;
        self.record(SinkCall::Load(url.to_string()));
    }

    fn play(&mut self) -> PlayerResult<()> {
        self.record(SinkCall::Play);
        if self.fail_play {
            Err(PlayerError::Playback("autoplay rejected".to_string()))
        } else {
            Ok(())
        }
    }

    fn pause(&mut self) {
        self.record(SinkCall::Pause);
    }

    fn seek(&mut self, seconds: f64) {
        self.position = seconds;
        self.record(SinkCall::Seek(seconds));
    }

    fn set_volume(&mut self, volume: f32) {
        self.record(SinkCall::SetVolume(volume));
    }

    fn duration(&self) -> Option<f64> {
        self.duration
    }

    fn position(&self) -> f64 {
        self.position
    }

    fn poll_events(&mut self) -> Vec<SinkEvent> {
        std::mem::take(&mut *self.events.lock().unwrap())
    }
}

/// In-memory backend
#[derive(Default)]
pub struct MockMusicApi {
    pub playback_state: Mutex<Option<RemotePlaybackState>>,
    pub saved_positions: Mutex<Vec<(SongId, f64)>>,
    pub songs: Mutex<Vec<Track>>,
    pub playlists: Mutex<Vec<PlaylistDetail>>,
    pub favorites: Mutex<Vec<SongId>>,
    pub invitations: Mutex<Vec<PlaylistInvitation>>,
    pub invitation_responses: Mutex<Vec<(u64, bool)>>,
    /// When set, `toggle_favorite` waits for a permit before answering
    pub favorite_gate: Option<Arc<tokio::sync::Notify>>,
    pub fail_network: bool,
}

impl MockMusicApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offline() -> Self {
        Self {
            fail_network: true,
            ..Self::default()
        }
    }

    pub fn with_playback_state(song: Track, position: f64) -> Self {
        let api = Self::new();
        *api.playback_state.lock().unwrap() = Some(RemotePlaybackState {
            song,
            position,
            last_played_at: None,
        });
        api
    }

    /// A backend whose favorite responses are held until the returned gate is notified
    pub fn with_favorite_gate() -> (Self, Arc<tokio::sync::Notify>) {
        let gate = Arc::new(tokio::sync::Notify::new());
        let api = Self {
            favorite_gate: Some(gate.clone()),
            ..Self::default()
        };
        (api, gate)
    }

    pub fn save_count(&self) -> usize {
        self.saved_positions.lock().unwrap().len()
    }

    fn check_network(&self) -> PlayerResult<()> {
        if self.fail_network {
            Err(PlayerError::Network("connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl MusicApi for MockMusicApi {
    async fn fetch_playback_state(&self) -> PlayerResult<Option<RemotePlaybackState>> {
        self.check_network()?;
        Ok(self.playback_state.lock().unwrap().clone())
    }

    async fn save_playback_state(&self, song_id: SongId, position: f64) -> PlayerResult<()> {
        self.check_network()?;
        self.saved_positions.lock().unwrap().push((song_id, position));
        Ok(())
    }

    async fn toggle_favorite(&self, song_id: SongId) -> PlayerResult<FavoriteToggle> {
        if let Some(gate) = &self.favorite_gate {
            gate.notified().await;
        }
        self.check_network()?;
        let mut favorites = self.favorites.lock().unwrap();
        let is_favorite = if let Some(pos) = favorites.iter().position(|id| *id == song_id) {
            favorites.remove(pos);
            false
        } else {
            favorites.push(song_id);
            true
        };
        let message = if is_favorite {
            "Added to favorites"
        } else {
            "Removed from favorites"
        };
        Ok(FavoriteToggle {
            is_favorite,
            message: Some(message.to_string()),
        })
    }

    async fn list_songs(&self, _filter: SongFilter, search: Option<&str>) -> PlayerResult<Vec<Track>> {
        self.check_network()?;
        let songs = self.songs.lock().unwrap().clone();
        Ok(match search {
            Some(q) => songs.into_iter().filter(|t| t.title.contains(q)).collect(),
            None => songs,
        })
    }

    async fn list_playlists(&self) -> PlayerResult<Vec<PlaylistSummary>> {
        self.check_network()?;
        Ok(self
            .playlists
            .lock()
            .unwrap()
            .iter()
            .map(|p| PlaylistSummary {
                id: p.id,
                name: p.name.clone(),
                songs_count: p.songs.len() as u32,
                members_count: 1,
            })
            .collect())
    }

    async fn get_playlist(&self, playlist_id: u64) -> PlayerResult<PlaylistDetail> {
        self.check_network()?;
        self.playlists
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == playlist_id)
            .cloned()
            .ok_or_else(|| PlayerError::Network("404 Playlist not found".to_string()))
    }

    async fn remove_song_from_playlist(&self, playlist_id: u64, song_id: SongId) -> PlayerResult<String> {
        self.check_network()?;
        let mut playlists = self.playlists.lock().unwrap();
        let playlist = playlists
            .iter_mut()
            .find(|p| p.id == playlist_id)
            .ok_or_else(|| PlayerError::Network("404 Playlist not found".to_string()))?;
        playlist.songs.retain(|t| t.id != song_id);
        Ok("Song removed from playlist".to_string())
    }

    async fn create_playlist(&self, name: &str) -> PlayerResult<PlaylistSummary> {
        self.check_network()?;
        let mut playlists = self.playlists.lock().unwrap();
        let id = playlists.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        playlists.push(PlaylistDetail {
            id,
            name: name.to_string(),
            can_edit: true,
            songs: Vec::new(),
        });
        Ok(PlaylistSummary {
            id,
            name: name.to_string(),
            songs_count: 0,
            members_count: 1,
        })
    }

    async fn rename_playlist(&self, playlist_id: u64, name: &str) -> PlayerResult<PlaylistSummary> {
        self.check_network()?;
        let mut playlists = self.playlists.lock().unwrap();
        let playlist = playlists
            .iter_mut()
            .find(|p| p.id == playlist_id)
            .ok_or_else(|| PlayerError::Network("404 Playlist not found".to_string()))?;
        if !playlist.can_edit {
            return Err(PlayerError::Network("403 You cannot edit this playlist".to_string()));
        }
        playlist.name = name.to_string();
        Ok(PlaylistSummary {
            id: playlist.id,
            name: playlist.name.clone(),
            songs_count: playlist.songs.len() as u32,
            members_count: 1,
        })
    }

    async fn add_song_to_playlist(&self, playlist_id: u64, song_id: SongId) -> PlayerResult<PlaylistDetail> {
        self.check_network()?;
        let song = self
            .songs
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id == song_id)
            .cloned()
            .ok_or_else(|| PlayerError::Network("400 Song not found".to_string()))?;
        let mut playlists = self.playlists.lock().unwrap();
        let playlist = playlists
            .iter_mut()
            .find(|p| p.id == playlist_id)
            .ok_or_else(|| PlayerError::Network("404 Playlist not found".to_string()))?;
        if playlist.songs.iter().any(|t| t.id == song_id) {
            return Err(PlayerError::Network("400 Song is already in this playlist".to_string()));
        }
        playlist.songs.push(song);
        Ok(playlist.clone())
    }

    async fn update_songs_public_status(&self, song_ids: &[SongId], is_public: bool) -> PlayerResult<PublicStatusUpdate> {
        self.check_network()?;
        let mut songs = self.songs.lock().unwrap();
        let mut count = 0;
        for song in songs.iter_mut().filter(|t| song_ids.contains(&t.id)) {
            song.is_public = is_public;
            count += 1;
        }
        if count == 0 {
            return Err(PlayerError::Network("404 No songs found".to_string()));
        }
        Ok(PublicStatusUpdate {
            message: format!("{count} songs updated"),
            count,
            is_public,
        })
    }

    async fn list_invitations(&self) -> PlayerResult<Vec<PlaylistInvitation>> {
        self.check_network()?;
        Ok(self.invitations.lock().unwrap().clone())
    }

    async fn respond_to_invitation(&self, invitation_id: u64, accept: bool) -> PlayerResult<String> {
        self.check_network()?;
        let mut invitations = self.invitations.lock().unwrap();
        let invitation = invitations
            .iter()
            .position(|i| i.id == invitation_id)
            .map(|pos| invitations.remove(pos))
            .ok_or_else(|| PlayerError::Network("400 Invitation not found".to_string()))?;
        self.invitation_responses.lock().unwrap().push((invitation_id, accept));
        if accept {
            self.playlists.lock().unwrap().push(PlaylistDetail {
                id: invitation.playlist_id,
                name: invitation.playlist_name,
                can_edit: true,
                songs: Vec::new(),
            });
        }
        Ok(if accept { "Invitation accepted" } else { "Invitation declined" }.to_string())
    }
}

/// An [`AppController`] wired to a recording sink and an in-memory backend
pub struct Harness {
    pub controller: AppController,
    pub api: Arc<MockMusicApi>,
    pub sink_calls: Arc<Mutex<Vec<SinkCall>>>,
    pub sink_events: Arc<Mutex<Vec<SinkEvent>>>,
}

pub fn harness(api: MockMusicApi) -> Harness {
    harness_with_sink(api, RecordingSink::new())
}

pub fn harness_with_sink(api: MockMusicApi, sink: RecordingSink) -> Harness {
    let sink_calls = sink.call_log();
    let sink_events = sink.event_queue();
    let api = Arc::new(api);
    let boxed: Box<dyn AudioSink + Send> = Box::new(sink);
    let player = PlaybackController::with_rng(boxed, StdRng::seed_from_u64(7));
    let controller = AppController::new(
        Arc::new(tokio::sync::Mutex::new(AppModel::new())),
        Arc::new(tokio::sync::Mutex::new(player)),
        api.clone(),
        &Config::default(),
    );
    Harness {
        controller,
        api,
        sink_calls,
        sink_events,
    }
}

//! REST client for the music backend

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use crate::config::Config;
use crate::error::{PlayerError, PlayerResult};
use crate::{log_api_request, log_api_result};
use super::types::{PlaylistDetail, PlaylistInvitation, PlaylistSummary, SongFilter, SongId, Track};

/// Last saved playback session
#[derive(Clone, Debug, PartialEq)]
pub struct RemotePlaybackState {
    pub song: Track,
    pub position: f64,
    pub last_played_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Result of toggling a song's favorite flag
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct FavoriteToggle {
    pub is_favorite: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Result of a bulk public/private change
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct PublicStatusUpdate {
    pub message: String,
    pub count: u32,
    pub is_public: bool,
}

/// Backend operations used by the player
#[async_trait]
pub trait MusicApi: Send + Sync {
    async fn fetch_playback_state(&self) -> PlayerResult<Option<RemotePlaybackState>>;
    async fn save_playback_state(&self, song_id: SongId, position: f64) -> PlayerResult<()>;
    async fn toggle_favorite(&self, song_id: SongId) -> PlayerResult<FavoriteToggle>;
    async fn list_songs(&self, filter: SongFilter, search: Option<&str>) -> PlayerResult<Vec<Track>>;
    async fn list_playlists(&self) -> PlayerResult<Vec<PlaylistSummary>>;
    async fn get_playlist(&self, playlist_id: u64) -> PlayerResult<PlaylistDetail>;
    /// Returns the backend's confirmation message
    async fn remove_song_from_playlist(&self, playlist_id: u64, song_id: SongId) -> PlayerResult<String>;
    async fn create_playlist(&self, name: &str) -> PlayerResult<PlaylistSummary>;
    async fn rename_playlist(&self, playlist_id: u64, name: &str) -> PlayerResult<PlaylistSummary>;
    async fn add_song_to_playlist(&self, playlist_id: u64, song_id: SongId) -> PlayerResult<PlaylistDetail>;
    /// Only songs the user uploaded are changed; the backend reports how many
    async fn update_songs_public_status(&self, song_ids: &[SongId], is_public: bool) -> PlayerResult<PublicStatusUpdate>;
    async fn list_invitations(&self) -> PlayerResult<Vec<PlaylistInvitation>>;
    async fn respond_to_invitation(&self, invitation_id: u64, accept: bool) -> PlayerResult<String>;
}

/// `{message, data}` on success, `{error}` on failure
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    message: Option<String>,
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    detail: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlaybackStateData {
    song: Option<Track>,
    position: Option<f64>,
    last_played_at: Option<String>,
}

/// Turn a status + body into the decoded payload or a [`PlayerError`]
fn parse_body<T: DeserializeOwned>(status: StatusCode, body: &str) -> PlayerResult<T> {
    if !status.is_success() {
        let reason = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.error.or(b.detail))
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
        return Err(PlayerError::Network(format!("{} {}", status.as_u16(), reason)));
    }
    serde_json::from_str(body).map_err(|e| PlayerError::Decode(e.to_string()))
}

fn require_data<T>(envelope: Envelope<T>, what: &str) -> PlayerResult<T> {
    envelope
        .data
        .ok_or_else(|| PlayerError::Decode(format!("{what} response has no data")))
}

fn parse_playback_state(data: Option<PlaybackStateData>) -> Option<RemotePlaybackState> {
    let data = data?;
    let song = data.song?;
    let last_played_at = data
        .last_played_at
        .as_deref()
        .and_then(|raw| chrono::DateTime::parse_from_rfc3339(raw).ok())
        .map(|t| t.with_timezone(&chrono::Utc));
    Some(RemotePlaybackState {
        song,
        position: data.position.unwrap_or(0.0),
        last_played_at,
    })
}

/// Bearer-token HTTP client for the `/api/music` endpoints
#[derive(Clone)]
pub struct MusicClient {
    http: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl MusicClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: config.api_base.clone(),
            access_token: config.access_token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> PlayerResult<T> {
        let response = self
            .http
            .get(self.url(path))
            .bearer_auth(&self.access_token)
            .query(query)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        parse_body(status, &body)
    }

    async fn post<T: DeserializeOwned>(&self, path: &str, payload: serde_json::Value) -> PlayerResult<T> {
        let response = self
            .http
            .post(self.url(path))
            .bearer_auth(&self.access_token)
            .json(&payload)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        parse_body(status, &body)
    }

    async fn put<T: DeserializeOwned>(&self, path: &str, payload: serde_json::Value) -> PlayerResult<T> {
        let response = self
            .http
            .put(self.url(path))
            .bearer_auth(&self.access_token)
            .json(&payload)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        parse_body(status, &body)
    }
}

#[async_trait]
impl MusicApi for MusicClient {
    async fn fetch_playback_state(&self) -> PlayerResult<Option<RemotePlaybackState>> {
        log_api_request!("fetch_playback_state", path = "playback-state/");
        let result = self
            .get::<Envelope<PlaybackStateData>>("playback-state/", &[])
            .await
            .map(|envelope| parse_playback_state(envelope.data));
        log_api_result!("fetch_playback_state", result);
        result
    }

    async fn save_playback_state(&self, song_id: SongId, position: f64) -> PlayerResult<()> {
        log_api_request!("save_playback_state", song_id, position);
        let result = self
            .post::<serde_json::Value>(
                "playback-state/save/",
                json!({ "song_id": song_id, "position": position }),
            )
            .await
            .map(|_| ());
        log_api_result!("save_playback_state", result);
        result
    }

    async fn toggle_favorite(&self, song_id: SongId) -> PlayerResult<FavoriteToggle> {
        log_api_request!("toggle_favorite", song_id);
        let result = self
            .post::<FavoriteToggle>(&format!("songs/{song_id}/toggle-favorite/"), json!({}))
            .await;
        log_api_result!("toggle_favorite", result);
        result
    }

    async fn list_songs(&self, filter: SongFilter, search: Option<&str>) -> PlayerResult<Vec<Track>> {
        log_api_request!("list_songs", filter = filter.as_query_value(), search = ?search);
        let mut query = vec![("type", filter.as_query_value())];
        if let Some(search) = search.map(str::trim).filter(|s| !s.is_empty()) {
            query.push(("search", search));
        }
        let result = self
            .get::<Envelope<Vec<Track>>>("songs/", &query)
            .await
            .map(|envelope| envelope.data.unwrap_or_default());
        log_api_result!("list_songs", result);
        result
    }

    async fn list_playlists(&self) -> PlayerResult<Vec<PlaylistSummary>> {
        log_api_request!("list_playlists", path = "playlists/");
        let result = self
            .get::<Envelope<Vec<PlaylistSummary>>>("playlists/", &[])
            .await
            .map(|envelope| envelope.data.unwrap_or_default());
        log_api_result!("list_playlists", result);
        result
    }

    async fn get_playlist(&self, playlist_id: u64) -> PlayerResult<PlaylistDetail> {
        log_api_request!("get_playlist", playlist_id);
        let result = self
            .get::<Envelope<PlaylistDetail>>(&format!("playlists/{playlist_id}/"), &[])
            .await
            .and_then(|envelope| require_data(envelope, "playlist"));
        log_api_result!("get_playlist", result);
        result
    }

    async fn remove_song_from_playlist(&self, playlist_id: u64, song_id: SongId) -> PlayerResult<String> {
        log_api_request!("remove_song_from_playlist", playlist_id, song_id);
        let result = self
            .post::<Envelope<serde_json::Value>>(
                &format!("playlists/{playlist_id}/remove-song/"),
                json!({ "song_id": song_id }),
            )
            .await
            .map(|envelope| {
                envelope
                    .message
                    .unwrap_or_else(|| "Song removed from playlist".to_string())
            });
        log_api_result!("remove_song_from_playlist", result);
        result
    }

    async fn create_playlist(&self, name: &str) -> PlayerResult<PlaylistSummary> {
        log_api_request!("create_playlist", name);
        let result = self
            .post::<Envelope<PlaylistSummary>>("playlists/create/", json!({ "name": name }))
            .await
            .and_then(|envelope| require_data(envelope, "create playlist"));
        log_api_result!("create_playlist", result);
        result
    }

    async fn rename_playlist(&self, playlist_id: u64, name: &str) -> PlayerResult<PlaylistSummary> {
        log_api_request!("rename_playlist", playlist_id, name);
        let result = self
            .put::<Envelope<PlaylistSummary>>(
                &format!("playlists/{playlist_id}/update/"),
                json!({ "name": name }),
            )
            .await
            .and_then(|envelope| require_data(envelope, "update playlist"));
        log_api_result!("rename_playlist", result);
        result
    }

    async fn add_song_to_playlist(&self, playlist_id: u64, song_id: SongId) -> PlayerResult<PlaylistDetail> {
        log_api_request!("add_song_to_playlist", playlist_id, song_id);
        let result = self
            .post::<Envelope<PlaylistDetail>>(
                &format!("playlists/{playlist_id}/add-song/"),
                json!({ "song_id": song_id }),
            )
            .await
            .and_then(|envelope| require_data(envelope, "add song"));
        log_api_result!("add_song_to_playlist", result);
        result
    }

    async fn update_songs_public_status(&self, song_ids: &[SongId], is_public: bool) -> PlayerResult<PublicStatusUpdate> {
        log_api_request!("update_songs_public_status", count = song_ids.len(), is_public);
        let result = self
            .post::<PublicStatusUpdate>(
                "songs/update-public-status/",
                json!({ "song_ids": song_ids, "is_public": is_public }),
            )
            .await;
        log_api_result!("update_songs_public_status", result);
        result
    }

    async fn list_invitations(&self) -> PlayerResult<Vec<PlaylistInvitation>> {
        log_api_request!("list_invitations", path = "invitations/");
        let result = self
            .get::<Envelope<Vec<PlaylistInvitation>>>("invitations/", &[])
            .await
            .map(|envelope| envelope.data.unwrap_or_default());
        log_api_result!("list_invitations", result);
        result
    }

    async fn respond_to_invitation(&self, invitation_id: u64, accept: bool) -> PlayerResult<String> {
        log_api_request!("respond_to_invitation", invitation_id, accept);
        let result = self
            .post::<Envelope<serde_json::Value>>(
                &format!("invitations/{invitation_id}/respond/"),
                json!({ "accept": accept }),
            )
            .await
            .map(|envelope| {
                let fallback = if accept { "Invitation accepted" } else { "Invitation declined" };
                envelope.message.unwrap_or_else(|| fallback.to_string())
            });
        log_api_result!("respond_to_invitation", result);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_body_text_is_kept_with_status() {
        let err = parse_body::<serde_json::Value>(
            StatusCode::FORBIDDEN,
            r#"{"error": "You cannot edit this playlist"}"#,
        )
        .unwrap_err();
        match err {
            PlayerError::Network(msg) => assert_eq!(msg, "403 You cannot edit this playlist"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn non_json_error_falls_back_to_reason_phrase() {
        let err = parse_body::<serde_json::Value>(StatusCode::BAD_GATEWAY, "<html>").unwrap_err();
        assert!(matches!(err, PlayerError::Network(msg) if msg == "502 Bad Gateway"));
    }

    #[test]
    fn malformed_success_body_is_a_decode_error() {
        let err = parse_body::<Envelope<Vec<Track>>>(StatusCode::OK, r#"{"data": 3}"#).unwrap_err();
        assert!(matches!(err, PlayerError::Decode(_)));
    }

    #[test]
    fn playback_state_with_song_is_parsed() {
        let envelope: Envelope<PlaybackStateData> = parse_body(
            StatusCode::OK,
            r#"{"data": {"song": {"id": 4, "title": "Rain", "file_url": "http://h/rain.mp3"},
                "position": 42.5, "last_played_at": "2026-02-08T23:17:00Z"}}"#,
        )
        .unwrap();
        let state = parse_playback_state(envelope.data).unwrap();
        assert_eq!(state.song.id, 4);
        assert_eq!(state.position, 42.5);
        assert!(state.last_played_at.is_some());
    }

    #[test]
    fn empty_playback_state_is_none() {
        let envelope: Envelope<PlaybackStateData> =
            parse_body(StatusCode::OK, r#"{"data": {"song": null, "position": 0}}"#).unwrap();
        assert!(parse_playback_state(envelope.data).is_none());

        let envelope: Envelope<PlaybackStateData> =
            parse_body(StatusCode::OK, r#"{"message": "none"}"#).unwrap();
        assert!(parse_playback_state(envelope.data).is_none());
    }

    #[test]
    fn public_status_reply_has_no_data_envelope() {
        let update: PublicStatusUpdate = parse_body(
            StatusCode::OK,
            r#"{"message": "2 songs updated", "count": 2, "is_public": true}"#,
        )
        .unwrap();
        assert_eq!(update.count, 2);
        assert!(update.is_public);
    }

    #[test]
    fn created_playlist_without_data_is_a_decode_error() {
        let envelope: Envelope<PlaylistSummary> =
            parse_body(StatusCode::CREATED, r#"{"message": "created"}"#).unwrap();
        assert!(matches!(require_data(envelope, "create playlist"), Err(PlayerError::Decode(_))));
    }

    #[test]
    fn url_joins_without_double_slash() {
        let client = MusicClient::new(&Config {
            access_token: "t".to_string(),
            ..Config::default()
        })
        .unwrap();
        assert_eq!(
            client.url("/songs/"),
            "http://127.0.0.1:8000/api/music/songs/"
        );
    }
}

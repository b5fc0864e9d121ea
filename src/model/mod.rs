//! Model module - Application state and data types
//!
//! - `types`: Core type definitions (tracks, modes, UI state, notifications)
//! - `queue`: Play queue with shuffle overlay
//! - `playback`: Playback cursor, mode and view snapshot
//! - `content`: Content view data (song lists, playlists, queue view)
//! - `settings`: Local settings persisted between runs
//! - `music_client`: Backend API client
//! - `app_model`: Main application model with state management methods

mod types;
mod queue;
mod playback;
mod content;
mod settings;
mod music_client;
mod app_model;

pub use types::{
    ActiveSection, InvitationStatus, LibraryItem, Notification, NotificationLevel, PlaylistDetail,
    PlaylistInvitation, PlaylistSummary, PromptPurpose, RepeatMode, SongFilter, SongId, TextPrompt,
    Track, UiState,
};

pub use queue::PlayQueue;

pub use playback::{PlaybackCursor, PlaybackInfo, PlaybackMode, PlaybackSettings};

pub use content::{ContentState, ContentView};

pub use settings::{PlayerSettings, SettingsStore};

pub use music_client::{FavoriteToggle, MusicApi, MusicClient, PublicStatusUpdate, RemotePlaybackState};

pub use app_model::AppModel;

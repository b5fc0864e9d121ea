//! Core type definitions for the application

use std::collections::BTreeSet;
use std::time::Instant;

use serde::Deserialize;

pub type SongId = u64;

/// A playable song as returned by the backend catalog
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Track {
    pub id: SongId,
    pub title: String,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub album: Option<String>,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub is_public: bool,
    /// Length in seconds, when the backend knows it
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default, rename = "uploaded_by_username", alias = "added_by_username")]
    pub owner: Option<String>,
}

impl Track {
    pub fn artist_or_unknown(&self) -> &str {
        self.artist.as_deref().unwrap_or("Unknown artist")
    }

    pub fn album_or_unknown(&self) -> &str {
        self.album.as_deref().unwrap_or("Unknown album")
    }
}

/// Repeat mode state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RepeatMode {
    #[default]
    Off,
    All,
    One,
}

impl RepeatMode {
    pub fn next(self) -> Self {
        match self {
            RepeatMode::Off => RepeatMode::All,
            RepeatMode::All => RepeatMode::One,
            RepeatMode::One => RepeatMode::Off,
        }
    }
}

/// Which songs the catalog listing shows
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SongFilter {
    #[default]
    All,
    Mine,
    Public,
}

impl SongFilter {
    pub fn next(self) -> Self {
        match self {
            SongFilter::All => SongFilter::Mine,
            SongFilter::Mine => SongFilter::Public,
            SongFilter::Public => SongFilter::All,
        }
    }

    /// Value of the `type` query parameter
    pub fn as_query_value(self) -> &'static str {
        match self {
            SongFilter::All => "all",
            SongFilter::Mine => "my",
            SongFilter::Public => "public",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SongFilter::All => "All songs",
            SongFilter::Mine => "My songs",
            SongFilter::Public => "Public songs",
        }
    }
}

/// A playlist as listed in the sidebar
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct PlaylistSummary {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub songs_count: u32,
    #[serde(default)]
    pub members_count: u32,
}

/// A playlist with its songs
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct PlaylistDetail {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub can_edit: bool,
    #[serde(default)]
    pub songs: Vec<Track>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvitationStatus {
    Pending,
    Accepted,
    Rejected,
}

/// An invitation to join someone else's playlist
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct PlaylistInvitation {
    pub id: u64,
    #[serde(rename = "playlist")]
    pub playlist_id: u64,
    pub playlist_name: String,
    pub inviter_username: String,
    #[serde(default)]
    pub inviter_email: Option<String>,
    pub status: InvitationStatus,
}

/// Which section of the UI is currently active/focused
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActiveSection {
    Search,
    Library,
    Playlists,
    MainContent,
}

impl ActiveSection {
    pub fn next(self) -> Self {
        match self {
            ActiveSection::Search => ActiveSection::Library,
            ActiveSection::Library => ActiveSection::Playlists,
            ActiveSection::Playlists => ActiveSection::MainContent,
            ActiveSection::MainContent => ActiveSection::Search,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            ActiveSection::Search => ActiveSection::MainContent,
            ActiveSection::Library => ActiveSection::Search,
            ActiveSection::Playlists => ActiveSection::Library,
            ActiveSection::MainContent => ActiveSection::Playlists,
        }
    }
}

/// An entry of the Library section
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LibraryItem {
    Songs,
    Queue,
    Invitations,
}

impl LibraryItem {
    pub const ALL: [LibraryItem; 3] = [LibraryItem::Songs, LibraryItem::Queue, LibraryItem::Invitations];

    pub fn name(self) -> &'static str {
        match self {
            LibraryItem::Songs => "Songs",
            LibraryItem::Queue => "Play queue",
            LibraryItem::Invitations => "Invitations",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

/// Transient message shown to the user
#[derive(Clone, Debug)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
    pub created_at: Instant,
}

impl Notification {
    pub fn new(message: impl Into<String>, level: NotificationLevel) -> Self {
        Self {
            message: message.into(),
            level,
            created_at: Instant::now(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, NotificationLevel::Info)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, NotificationLevel::Success)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, NotificationLevel::Error)
    }
}

/// What a text prompt's input is for
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PromptPurpose {
    CreatePlaylist,
    RenamePlaylist(u64),
}

impl PromptPurpose {
    pub fn title(self) -> &'static str {
        match self {
            PromptPurpose::CreatePlaylist => " New playlist ",
            PromptPurpose::RenamePlaylist(_) => " Rename playlist ",
        }
    }
}

/// Single-line text input shown over the main view
#[derive(Clone, Debug, PartialEq)]
pub struct TextPrompt {
    pub purpose: PromptPurpose,
    pub input: String,
}

/// UI state for the application
#[derive(Clone)]
pub struct UiState {
    pub active_section: ActiveSection,
    pub search_query: String,
    pub song_filter: SongFilter,
    pub library_selected: usize,
    pub playlists: Vec<PlaylistSummary>,
    pub playlist_selected: usize,
    /// Songs marked in the song list for a bulk action
    pub marked_songs: BTreeSet<SongId>,
    pub prompt: Option<TextPrompt>,
    pub show_help_popup: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            active_section: ActiveSection::Library,
            search_query: String::new(),
            song_filter: SongFilter::All,
            library_selected: 0,
            playlists: vec![],
            playlist_selected: 0,
            marked_songs: BTreeSet::new(),
            prompt: None,
            show_help_popup: false,
        }
    }
}

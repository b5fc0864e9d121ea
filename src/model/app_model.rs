//! Main application model with UI state management

use std::time::Duration;

use super::content::{ContentState, ContentView};
use super::types::{
    ActiveSection, InvitationStatus, LibraryItem, Notification, PlaylistDetail, PlaylistInvitation,
    PlaylistSummary, PromptPurpose, SongFilter, SongId, TextPrompt, Track, UiState,
};

/// How long a notification stays on screen
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(4);

/// Everything the view needs apart from playback
#[derive(Default)]
pub struct AppModel {
    pub ui_state: UiState,
    pub content_state: ContentState,
    notification: Option<Notification>,
    should_quit: bool,
}

impl AppModel {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Notifications
    // ========================================================================

    pub fn notify(&mut self, notification: Notification) {
        tracing::debug!(level = ?notification.level, message = %notification.message, "Notification");
        self.notification = Some(notification);
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    pub fn clear_notification(&mut self) {
        self.notification = None;
    }

    pub fn auto_clear_old_notifications(&mut self) {
        if let Some(n) = &self.notification {
            if n.created_at.elapsed() >= NOTIFICATION_TTL {
                self.notification = None;
            }
        }
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn set_should_quit(&mut self, quit: bool) {
        self.should_quit = quit;
    }

    // ========================================================================
    // Sections & selection
    // ========================================================================

    pub fn cycle_section_forward(&mut self) {
        self.ui_state.active_section = self.ui_state.active_section.next();
    }

    pub fn cycle_section_backward(&mut self) {
        self.ui_state.active_section = self.ui_state.active_section.prev();
    }

    pub fn set_active_section(&mut self, section: ActiveSection) {
        self.ui_state.active_section = section;
    }

    pub fn toggle_help_popup(&mut self) {
        self.ui_state.show_help_popup = !self.ui_state.show_help_popup;
    }

    /// Move the selection of the focused section. `queue_len` sizes the
    /// queue view, whose rows live in the player.
    pub fn move_selection(&mut self, delta: isize, queue_len: usize) {
        match self.ui_state.active_section {
            ActiveSection::Library => {
                let last = LibraryItem::ALL.len() as isize - 1;
                let next = (self.ui_state.library_selected as isize + delta).clamp(0, last);
                self.ui_state.library_selected = next as usize;
            }
            ActiveSection::Playlists => {
                let len = self.ui_state.playlists.len();
                if len > 0 {
                    let next = (self.ui_state.playlist_selected as isize + delta)
                        .clamp(0, len as isize - 1);
                    self.ui_state.playlist_selected = next as usize;
                }
            }
            ActiveSection::MainContent => {
                let len = match &self.content_state.view {
                    ContentView::Queue { .. } => queue_len,
                    ContentView::Invitations { invitations, .. } => invitations.len(),
                    _ => self.content_state.listed_tracks().map_or(0, |t| t.len()),
                };
                self.content_state.move_selection(delta, len);
            }
            ActiveSection::Search => {}
        }
    }

    pub fn select_library_item(&mut self, item: LibraryItem) {
        if let Some(index) = LibraryItem::ALL.iter().position(|i| *i == item) {
            self.ui_state.library_selected = index;
        }
    }

    pub fn selected_library_item(&self) -> LibraryItem {
        LibraryItem::ALL
            .get(self.ui_state.library_selected)
            .copied()
            .unwrap_or(LibraryItem::Songs)
    }

    pub fn selected_playlist(&self) -> Option<&PlaylistSummary> {
        self.ui_state.playlists.get(self.ui_state.playlist_selected)
    }

    /// Highlight a playlist in the sidebar by id
    pub fn select_playlist(&mut self, playlist_id: u64) {
        if let Some(index) = self.ui_state.playlists.iter().position(|p| p.id == playlist_id) {
            self.ui_state.playlist_selected = index;
        }
    }

    pub fn cycle_song_filter(&mut self) -> SongFilter {
        self.ui_state.song_filter = self.ui_state.song_filter.next();
        self.ui_state.song_filter
    }

    // ========================================================================
    // Content
    // ========================================================================

    pub fn set_content_loading(&mut self, loading: bool) {
        self.content_state.is_loading = loading;
    }

    pub fn set_songs(&mut self, tracks: Vec<Track>) {
        self.content_state.view = ContentView::Songs { tracks, selected_index: 0 };
        self.content_state.is_loading = false;
        self.ui_state.marked_songs.clear();
    }

    /// Show the invitations still waiting for an answer
    pub fn set_invitations(&mut self, invitations: Vec<PlaylistInvitation>) {
        let pending: Vec<_> = invitations
            .into_iter()
            .filter(|i| i.status == InvitationStatus::Pending)
            .collect();
        let selected_index = match &self.content_state.view {
            ContentView::Invitations { selected_index, .. } => {
                (*selected_index).min(pending.len().saturating_sub(1))
            }
            _ => 0,
        };
        self.content_state.view = ContentView::Invitations { invitations: pending, selected_index };
        self.content_state.is_loading = false;
    }

    pub fn set_playlists(&mut self, playlists: Vec<PlaylistSummary>) {
        self.ui_state.playlist_selected = self
            .ui_state
            .playlist_selected
            .min(playlists.len().saturating_sub(1));
        self.ui_state.playlists = playlists;
    }

    pub fn set_playlist_detail(&mut self, detail: PlaylistDetail) {
        self.content_state.view = ContentView::Playlist {
            detail,
            selected_index: 0,
            pending_removal: None,
        };
        self.content_state.is_loading = false;
    }

    pub fn rename_open_playlist(&mut self, playlist_id: u64, name: &str) {
        if let ContentView::Playlist { detail, .. } = &mut self.content_state.view {
            if detail.id == playlist_id {
                detail.name = name.to_string();
            }
        }
    }

    pub fn show_queue(&mut self, current_index: usize) {
        self.content_state.view = ContentView::Queue { selected_index: current_index };
        self.content_state.is_loading = false;
    }

    /// Keep the queue view's selection on the playing row after the queue changed
    pub fn follow_queue_cursor(&mut self, current_index: usize) {
        if let ContentView::Queue { selected_index } = &mut self.content_state.view {
            *selected_index = current_index;
        }
    }

    pub fn mark_favorite(&mut self, song_id: SongId, is_favorite: bool) {
        self.content_state.mark_favorite(song_id, is_favorite);
    }

    /// Mark or unmark the selected song for a bulk action. Returns the new mark.
    pub fn toggle_mark_selected(&mut self) -> Option<bool> {
        let ContentView::Songs { tracks, selected_index } = &self.content_state.view else {
            return None;
        };
        let song_id = tracks.get(*selected_index)?.id;
        let marked = &mut self.ui_state.marked_songs;
        if marked.remove(&song_id) {
            Some(false)
        } else {
            marked.insert(song_id);
            Some(true)
        }
    }

    // ========================================================================
    // Text prompt
    // ========================================================================

    pub fn open_prompt(&mut self, purpose: PromptPurpose, input: impl Into<String>) {
        self.ui_state.prompt = Some(TextPrompt { purpose, input: input.into() });
    }

    /// Rename prompt for the open playlist, prefilled with its name
    pub fn open_rename_prompt(&mut self) -> Result<(), &'static str> {
        match &self.content_state.view {
            ContentView::Playlist { detail, .. } if detail.can_edit => {
                let (id, name) = (detail.id, detail.name.clone());
                self.open_prompt(PromptPurpose::RenamePlaylist(id), name);
                Ok(())
            }
            ContentView::Playlist { .. } => Err("You don't have permission to edit this playlist"),
            _ => Err("Open a playlist to rename it"),
        }
    }

    pub fn close_prompt(&mut self) {
        self.ui_state.prompt = None;
    }

    /// Close the prompt and hand back its purpose and trimmed input.
    /// An empty input leaves the prompt open.
    pub fn submit_prompt(&mut self) -> Result<Option<(PromptPurpose, String)>, &'static str> {
        let Some(prompt) = &self.ui_state.prompt else {
            return Ok(None);
        };
        let input = prompt.input.trim().to_string();
        if input.is_empty() {
            return Err("Playlist name is required");
        }
        let purpose = prompt.purpose;
        self.ui_state.prompt = None;
        Ok(Some((purpose, input)))
    }

    // ========================================================================
    // Optimistic playlist removal
    // ========================================================================

    /// Mark the selected playlist row as being removed and return the playlist
    /// and song ids. The error is a user-facing reason.
    pub fn begin_playlist_removal(&mut self) -> Result<(u64, SongId), &'static str> {
        match &mut self.content_state.view {
            ContentView::Playlist { detail, selected_index, pending_removal } => {
                if !detail.can_edit {
                    return Err("You don't have permission to edit this playlist");
                }
                if pending_removal.is_some() {
                    return Err("Another removal is still in progress");
                }
                let song = detail.songs.get(*selected_index).ok_or("No song selected")?;
                *pending_removal = Some(song.id);
                Ok((detail.id, song.id))
            }
            _ => Err("Open a playlist to remove songs from it"),
        }
    }

    /// Drop the row once the backend confirmed the removal
    pub fn commit_playlist_removal(&mut self, playlist_id: u64, song_id: SongId) {
        if let ContentView::Playlist { detail, selected_index, pending_removal } =
            &mut self.content_state.view
        {
            if detail.id != playlist_id {
                return;
            }
            detail.songs.retain(|t| t.id != song_id);
            *selected_index = (*selected_index).min(detail.songs.len().saturating_sub(1));
            if *pending_removal == Some(song_id) {
                *pending_removal = None;
            }
        }
    }

    /// Restore the row after a failed removal
    pub fn rollback_playlist_removal(&mut self, playlist_id: u64, song_id: SongId) {
        if let ContentView::Playlist { detail, pending_removal, .. } = &mut self.content_state.view {
            if detail.id == playlist_id && *pending_removal == Some(song_id) {
                *pending_removal = None;
            }
        }
    }
}

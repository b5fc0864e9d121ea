//! Content view state for the main pane

use super::types::{PlaylistDetail, PlaylistInvitation, SongId, Track};

/// What the main content pane shows
#[derive(Clone, Debug, Default)]
pub enum ContentView {
    #[default]
    Empty,
    Songs {
        tracks: Vec<Track>,
        selected_index: usize,
    },
    Queue {
        selected_index: usize,
    },
    Playlist {
        detail: PlaylistDetail,
        selected_index: usize,
        /// Song whose removal is in flight; shown dimmed until the backend answers
        pending_removal: Option<SongId>,
    },
    /// Pending invitations only
    Invitations {
        invitations: Vec<PlaylistInvitation>,
        selected_index: usize,
    },
}

/// Content state for the main view area
#[derive(Clone, Debug, Default)]
pub struct ContentState {
    pub view: ContentView,
    pub is_loading: bool,
}

impl ContentState {
    /// Tracks visible in a list view, if any
    pub fn listed_tracks(&self) -> Option<&[Track]> {
        match &self.view {
            ContentView::Songs { tracks, .. } => Some(tracks),
            ContentView::Playlist { detail, .. } => Some(&detail.songs),
            _ => None,
        }
    }

    pub fn selected_index(&self) -> Option<usize> {
        match &self.view {
            ContentView::Songs { selected_index, .. }
            | ContentView::Queue { selected_index }
            | ContentView::Playlist { selected_index, .. }
            | ContentView::Invitations { selected_index, .. } => Some(*selected_index),
            ContentView::Empty => None,
        }
    }

    /// Move the selection by `delta` within a list of `len` rows
    pub fn move_selection(&mut self, delta: isize, len: usize) {
        let selected = match &mut self.view {
            ContentView::Songs { selected_index, .. }
            | ContentView::Queue { selected_index }
            | ContentView::Playlist { selected_index, .. }
            | ContentView::Invitations { selected_index, .. } => selected_index,
            ContentView::Empty => return,
        };
        if len == 0 {
            *selected = 0;
            return;
        }
        let next = (*selected as isize + delta).clamp(0, len as isize - 1);
        *selected = next as usize;
    }

    pub fn selected_track(&self) -> Option<&Track> {
        let index = self.selected_index()?;
        self.listed_tracks()?.get(index)
    }

    pub fn selected_invitation(&self) -> Option<&PlaylistInvitation> {
        match &self.view {
            ContentView::Invitations { invitations, selected_index } => invitations.get(*selected_index),
            _ => None,
        }
    }

    /// Mirror a favorite flag into listed copies of the song
    pub fn mark_favorite(&mut self, song_id: SongId, is_favorite: bool) {
        let tracks = match &mut self.view {
            ContentView::Songs { tracks, .. } => tracks,
            ContentView::Playlist { detail, .. } => &mut detail.songs,
            _ => return,
        };
        for track in tracks.iter_mut().filter(|t| t.id == song_id) {
            track.is_favorite = is_favorite;
        }
    }
}

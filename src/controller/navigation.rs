//! Navigation-related controller methods (library, playlists, search)

use crate::model::{ActiveSection, ContentView, LibraryItem, Notification};
use super::AppController;

impl AppController {
    /// Reload the song list with the current filter and search query
    pub async fn load_songs(&self) {
        let (filter, query) = {
            let mut model = self.model.lock().await;
            model.set_content_loading(true);
            (model.ui_state.song_filter, model.ui_state.search_query.trim().to_string())
        };
        let search = Some(query.as_str()).filter(|q| !q.is_empty());
        let result = self.api.list_songs(filter, search).await;

        let mut model = self.model.lock().await;
        match result {
            Ok(tracks) => {
                tracing::info!(count = tracks.len(), filter = filter.label(), "Songs loaded");
                model.set_songs(tracks);
            }
            Err(e) => {
                model.set_content_loading(false);
                model.notify(Notification::error(Self::format_error(&e)));
            }
        }
    }

    /// Make every marked song public. The backend skips songs the user
    /// did not upload.
    pub async fn publish_marked_songs(&self) {
        let song_ids: Vec<_> = self.model.lock().await.ui_state.marked_songs.iter().copied().collect();
        if song_ids.is_empty() {
            self.notify(Notification::error("Mark songs with V first")).await;
            return;
        }

        match self.api.update_songs_public_status(&song_ids, true).await {
            Ok(update) => {
                tracing::info!(requested = song_ids.len(), updated = update.count, "Songs made public");
                self.notify(Notification::success(update.message)).await;
                self.load_songs().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to make songs public");
                self.notify(Notification::error(Self::format_error(&e))).await;
            }
        }
    }

    pub async fn perform_search(&self) {
        tracing::debug!("Performing search");
        self.load_songs().await;
        self.model.lock().await.set_active_section(ActiveSection::MainContent);
    }

    pub async fn cycle_song_filter(&self) {
        let filter = self.model.lock().await.cycle_song_filter();
        tracing::debug!(filter = filter.label(), "Song filter changed");
        self.load_songs().await;
    }

    pub async fn load_playlists(&self) {
        let result = self.api.list_playlists().await;

        let mut model = self.model.lock().await;
        match result {
            Ok(playlists) => model.set_playlists(playlists),
            Err(e) => model.notify(Notification::error(Self::format_error(&e))),
        }
    }

    pub async fn open_playlist(&self, playlist_id: u64) {
        self.model.lock().await.set_content_loading(true);
        let result = self.api.get_playlist(playlist_id).await;

        let mut model = self.model.lock().await;
        match result {
            Ok(detail) => {
                tracing::info!(playlist_id, songs = detail.songs.len(), "Playlist opened");
                model.set_playlist_detail(detail);
                model.set_active_section(ActiveSection::MainContent);
            }
            Err(e) => {
                tracing::error!(playlist_id, error = %e, "Failed to open playlist");
                model.set_content_loading(false);
                model.notify(Notification::error(Self::format_error(&e)));
            }
        }
    }

    pub async fn open_selected_playlist(&self) {
        let selected = self.model.lock().await.selected_playlist().map(|p| p.id);
        if let Some(playlist_id) = selected {
            self.open_playlist(playlist_id).await;
        }
    }

    pub async fn open_library_item(&self) {
        let item = self.model.lock().await.selected_library_item();
        match item {
            LibraryItem::Songs => self.load_songs().await,
            LibraryItem::Queue => {
                let current_index = self.player.lock().await.current_index();
                self.model.lock().await.show_queue(current_index);
            }
            LibraryItem::Invitations => self.load_invitations().await,
        }
        self.model.lock().await.set_active_section(ActiveSection::MainContent);
    }

    /// Play the selected row of the main pane. Song lists and playlists
    /// become the new queue; in the queue view the cursor jumps.
    pub async fn play_selected(&self) {
        enum Selection {
            List(Vec<crate::model::Track>, usize),
            QueueIndex(usize),
        }

        let selection = {
            let model = self.model.lock().await;
            match &model.content_state.view {
                ContentView::Songs { tracks, selected_index } => {
                    Selection::List(tracks.clone(), *selected_index)
                }
                ContentView::Playlist { detail, selected_index, .. } => {
                    Selection::List(detail.songs.clone(), *selected_index)
                }
                ContentView::Queue { selected_index } => Selection::QueueIndex(*selected_index),
                ContentView::Empty | ContentView::Invitations { .. } => return,
            }
        };

        match selection {
            Selection::List(tracks, index) => {
                self.with_player(move |player| player.load_queue(&tracks, index)).await;
            }
            Selection::QueueIndex(index) => {
                self.with_player(move |player| player.play_from_queue(index)).await;
            }
        }
    }

    /// Remove the selected song from the open playlist. The row is marked at
    /// once and restored if the backend refuses.
    pub async fn remove_selected_from_playlist(&self) {
        let begun = self.model.lock().await.begin_playlist_removal();
        let (playlist_id, song_id) = match begun {
            Ok(ids) => ids,
            Err(reason) => {
                self.notify(Notification::error(reason)).await;
                return;
            }
        };

        let result = self.api.remove_song_from_playlist(playlist_id, song_id).await;

        let mut model = self.model.lock().await;
        match result {
            Ok(message) => {
                model.commit_playlist_removal(playlist_id, song_id);
                model.notify(Notification::success(message));
            }
            Err(e) => {
                model.rollback_playlist_removal(playlist_id, song_id);
                model.notify(Notification::error(Self::format_error(&e)));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::model::{ContentView, NotificationLevel, PlaylistDetail, SongFilter};
    use crate::test_support::{MockMusicApi, harness, track, tracks};

    fn playlist(can_edit: bool) -> PlaylistDetail {
        PlaylistDetail {
            id: 3,
            name: "Evening".to_string(),
            can_edit,
            songs: tracks(3),
        }
    }

    #[tokio::test]
    async fn search_narrows_song_list() {
        let api = MockMusicApi::new();
        *api.songs.lock().unwrap() = vec![track(1), track(12), track(2)];
        let h = harness(api);
        h.controller.model.lock().await.ui_state.search_query = "Song 1".to_string();

        h.controller.perform_search().await;

        let model = h.controller.model.lock().await;
        let ids: Vec<_> = model.content_state.listed_tracks().unwrap().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 12]);
        assert!(!model.content_state.is_loading);
    }

    #[tokio::test]
    async fn filter_cycles_and_reloads() {
        let api = MockMusicApi::new();
        *api.songs.lock().unwrap() = tracks(2);
        let h = harness(api);

        h.controller.cycle_song_filter().await;

        let model = h.controller.model.lock().await;
        assert_eq!(model.ui_state.song_filter, SongFilter::Mine);
        assert_eq!(model.content_state.listed_tracks().map(|t| t.len()), Some(2));
    }

    #[tokio::test]
    async fn opening_missing_playlist_reports_error() {
        let h = harness(MockMusicApi::new());
        h.controller.open_playlist(99).await;

        let model = h.controller.model.lock().await;
        assert!(!model.content_state.is_loading);
        assert_eq!(model.notification().map(|n| n.level), Some(NotificationLevel::Error));
    }

    #[tokio::test]
    async fn playing_from_list_replaces_queue() {
        let api = MockMusicApi::new();
        api.playlists.lock().unwrap().push(playlist(true));
        let h = harness(api);
        h.controller.open_playlist(3).await;
        h.controller.model.lock().await.content_state.move_selection(2, 3);

        h.controller.play_selected().await;

        let info = h.controller.playback_info().await;
        assert_eq!(info.queue.len(), 3);
        assert_eq!(info.track.map(|t| t.id), Some(3));
        assert!(info.is_playing);
    }

    #[tokio::test]
    async fn playing_from_queue_view_moves_cursor() {
        let h = harness(MockMusicApi::new());
        h.controller.with_player(|p| p.load_queue(&tracks(4), 0)).await;
        {
            let mut model = h.controller.model.lock().await;
            model.show_queue(0);
            model.content_state.move_selection(2, 4);
        }

        h.controller.play_selected().await;

        assert_eq!(h.controller.playback_info().await.queue_index, 2);
        assert_eq!(h.controller.model.lock().await.content_state.selected_index(), Some(2));
    }

    #[tokio::test]
    async fn removal_is_committed_on_success() {
        let api = MockMusicApi::new();
        api.playlists.lock().unwrap().push(playlist(true));
        let h = harness(api);
        h.controller.open_playlist(3).await;

        h.controller.remove_selected_from_playlist().await;

        let model = h.controller.model.lock().await;
        let ids: Vec<_> = model.content_state.listed_tracks().unwrap().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2, 3]);
        assert_eq!(h.api.playlists.lock().unwrap()[0].songs.len(), 2);
    }

    #[tokio::test]
    async fn removal_is_rolled_back_on_failure() {
        let h = harness(MockMusicApi::offline());
        h.controller.model.lock().await.set_playlist_detail(playlist(true));

        h.controller.remove_selected_from_playlist().await;

        let model = h.controller.model.lock().await;
        match &model.content_state.view {
            ContentView::Playlist { detail, pending_removal, .. } => {
                assert_eq!(detail.songs.len(), 3);
                assert!(pending_removal.is_none());
            }
            other => panic!("unexpected view: {other:?}"),
        }
        assert_eq!(model.notification().map(|n| n.level), Some(NotificationLevel::Error));
    }

    #[tokio::test]
    async fn marked_songs_are_made_public_and_marks_cleared() {
        let api = MockMusicApi::new();
        *api.songs.lock().unwrap() = tracks(3);
        let h = harness(api);
        h.controller.load_songs().await;
        {
            let mut model = h.controller.model.lock().await;
            model.toggle_mark_selected();
            model.content_state.move_selection(2, 3);
            model.toggle_mark_selected();
        }

        h.controller.publish_marked_songs().await;

        let public: Vec<_> = h.api.songs.lock().unwrap().iter().filter(|t| t.is_public).map(|t| t.id).collect();
        assert_eq!(public, vec![1, 3]);
        let model = h.controller.model.lock().await;
        assert!(model.ui_state.marked_songs.is_empty());
        assert!(model.content_state.listed_tracks().unwrap()[2].is_public);
        assert_eq!(model.notification().map(|n| n.message.as_str()), Some("2 songs updated"));
    }

    #[tokio::test]
    async fn publishing_nothing_marked_is_refused() {
        let api = MockMusicApi::new();
        *api.songs.lock().unwrap() = tracks(2);
        let h = harness(api);
        h.controller.load_songs().await;

        h.controller.publish_marked_songs().await;

        assert!(h.api.songs.lock().unwrap().iter().all(|t| !t.is_public));
        let model = h.controller.model.lock().await;
        assert_eq!(model.notification().map(|n| n.level), Some(NotificationLevel::Error));
    }

    #[tokio::test]
    async fn read_only_playlist_refuses_removal() {
        let api = MockMusicApi::new();
        api.playlists.lock().unwrap().push(playlist(false));
        let h = harness(api);
        h.controller.open_playlist(3).await;

        h.controller.remove_selected_from_playlist().await;

        assert_eq!(h.api.playlists.lock().unwrap()[0].songs.len(), 3);
        let model = h.controller.model.lock().await;
        assert_eq!(model.content_state.listed_tracks().map(|t| t.len()), Some(3));
    }
}

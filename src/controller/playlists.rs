//! Playlist management: create, rename, add songs, shared-playlist invitations

use crate::model::{ContentView, Notification, PromptPurpose};
use super::AppController;

impl AppController {
    /// Act on the text prompt's input. A blank name keeps the prompt open.
    pub async fn submit_prompt(&self) {
        let submitted = self.model.lock().await.submit_prompt();
        match submitted {
            Ok(Some((PromptPurpose::CreatePlaylist, name))) => self.create_playlist(&name).await,
            Ok(Some((PromptPurpose::RenamePlaylist(playlist_id), name))) => {
                self.rename_playlist(playlist_id, &name).await
            }
            Ok(None) => {}
            Err(reason) => self.notify(Notification::error(reason)).await,
        }
    }

    pub async fn create_playlist(&self, name: &str) {
        match self.api.create_playlist(name).await {
            Ok(created) => {
                tracing::info!(playlist_id = created.id, "Playlist created");
                self.load_playlists().await;
                let mut model = self.model.lock().await;
                model.select_playlist(created.id);
                model.notify(Notification::success(format!("Playlist \"{}\" created", created.name)));
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to create playlist");
                self.notify(Notification::error(Self::format_error(&e))).await;
            }
        }
    }

    pub async fn rename_playlist(&self, playlist_id: u64, name: &str) {
        match self.api.rename_playlist(playlist_id, name).await {
            Ok(renamed) => {
                tracing::info!(playlist_id, "Playlist renamed");
                self.load_playlists().await;
                let mut model = self.model.lock().await;
                model.rename_open_playlist(playlist_id, &renamed.name);
                model.notify(Notification::success(format!("Playlist renamed to \"{}\"", renamed.name)));
            }
            Err(e) => {
                tracing::error!(playlist_id, error = %e, "Failed to rename playlist");
                self.notify(Notification::error(Self::format_error(&e))).await;
            }
        }
    }

    /// Add the selected song of the main pane to the playlist highlighted in the sidebar
    pub async fn add_selected_to_playlist(&self) {
        let (target, song) = {
            let model = self.model.lock().await;
            let target = model.selected_playlist().map(|p| (p.id, p.name.clone()));
            let song = model.content_state.selected_track().map(|t| (t.id, t.title.clone()));
            (target, song)
        };
        let Some((song_id, title)) = song else {
            return;
        };
        let Some((playlist_id, playlist_name)) = target else {
            self.notify(Notification::error("Create or pick a playlist in the sidebar first"))
                .await;
            return;
        };

        match self.api.add_song_to_playlist(playlist_id, song_id).await {
            Ok(detail) => {
                tracing::info!(playlist_id, song_id, songs = detail.songs.len(), "Song added to playlist");
                {
                    let mut model = self.model.lock().await;
                    let showing_target = matches!(
                        &model.content_state.view,
                        ContentView::Playlist { detail: open, .. } if open.id == playlist_id
                    );
                    if showing_target {
                        model.set_playlist_detail(detail);
                    }
                    model.notify(Notification::success(format!("Added \"{title}\" to {playlist_name}")));
                }
                self.load_playlists().await;
            }
            Err(e) => {
                tracing::error!(playlist_id, song_id, error = %e, "Failed to add song to playlist");
                self.notify(Notification::error(Self::format_error(&e))).await;
            }
        }
    }

    pub async fn load_invitations(&self) {
        self.model.lock().await.set_content_loading(true);
        let result = self.api.list_invitations().await;

        let mut model = self.model.lock().await;
        match result {
            Ok(invitations) => {
                tracing::debug!(count = invitations.len(), "Invitations loaded");
                model.set_invitations(invitations);
            }
            Err(e) => {
                model.set_content_loading(false);
                model.notify(Notification::error(Self::format_error(&e)));
            }
        }
    }

    /// Accept or decline the selected invitation. Accepting brings the
    /// shared playlist into the sidebar.
    pub async fn respond_to_selected_invitation(&self, accept: bool) {
        let selected = self.model.lock().await.content_state.selected_invitation().map(|i| i.id);
        let Some(invitation_id) = selected else {
            return;
        };

        match self.api.respond_to_invitation(invitation_id, accept).await {
            Ok(message) => {
                tracing::info!(invitation_id, accept, "Invitation answered");
                let notification = if accept {
                    Notification::success(message)
                } else {
                    Notification::info(message)
                };
                self.notify(notification).await;
                self.load_invitations().await;
                if accept {
                    self.load_playlists().await;
                }
            }
            Err(e) => {
                tracing::error!(invitation_id, error = %e, "Failed to answer invitation");
                self.notify(Notification::error(Self::format_error(&e))).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::model::{ContentView, InvitationStatus, NotificationLevel, PlaylistDetail, PromptPurpose};
    use crate::test_support::{MockMusicApi, harness, invitation, track, tracks};

    fn shared(id: u64, can_edit: bool) -> PlaylistDetail {
        PlaylistDetail {
            id,
            name: format!("List {id}"),
            can_edit,
            songs: vec![],
        }
    }

    #[tokio::test]
    async fn created_playlist_is_listed_and_selected() {
        let api = MockMusicApi::new();
        api.playlists.lock().unwrap().push(shared(1, true));
        let h = harness(api);
        h.controller.model.lock().await.open_prompt(PromptPurpose::CreatePlaylist, "Gym");

        h.controller.submit_prompt().await;

        let model = h.controller.model.lock().await;
        assert!(model.ui_state.prompt.is_none());
        assert_eq!(model.ui_state.playlists.len(), 2);
        assert_eq!(model.selected_playlist().map(|p| p.name.as_str()), Some("Gym"));
        assert_eq!(model.notification().map(|n| n.level), Some(NotificationLevel::Success));
    }

    #[tokio::test]
    async fn blank_name_creates_nothing() {
        let h = harness(MockMusicApi::new());
        h.controller.model.lock().await.open_prompt(PromptPurpose::CreatePlaylist, "  ");

        h.controller.submit_prompt().await;

        assert!(h.api.playlists.lock().unwrap().is_empty());
        let model = h.controller.model.lock().await;
        assert!(model.ui_state.prompt.is_some());
        assert_eq!(model.notification().map(|n| n.level), Some(NotificationLevel::Error));
    }

    #[tokio::test]
    async fn rename_updates_open_playlist_and_sidebar() {
        let api = MockMusicApi::new();
        api.playlists.lock().unwrap().push(shared(4, true));
        let h = harness(api);
        h.controller.open_playlist(4).await;
        h.controller.model.lock().await.open_rename_prompt().unwrap();
        h.controller.model.lock().await.ui_state.prompt.as_mut().unwrap().input = "Late night".to_string();

        h.controller.submit_prompt().await;

        let model = h.controller.model.lock().await;
        assert_eq!(model.ui_state.playlists[0].name, "Late night");
        match &model.content_state.view {
            ContentView::Playlist { detail, .. } => assert_eq!(detail.name, "Late night"),
            other => panic!("unexpected view: {other:?}"),
        }
    }

    #[tokio::test]
    async fn refused_rename_reports_backend_reason() {
        let api = MockMusicApi::new();
        api.playlists.lock().unwrap().push(shared(4, false));
        let h = harness(api);

        h.controller.rename_playlist(4, "Mine now").await;

        assert_eq!(h.api.playlists.lock().unwrap()[0].name, "List 4");
        let model = h.controller.model.lock().await;
        assert_eq!(
            model.notification().map(|n| n.message.as_str()),
            Some("You cannot edit this playlist")
        );
    }

    #[tokio::test]
    async fn selected_song_is_added_to_sidebar_playlist() {
        let api = MockMusicApi::new();
        *api.songs.lock().unwrap() = tracks(3);
        api.playlists.lock().unwrap().push(shared(2, true));
        let h = harness(api);
        h.controller.load_playlists().await;
        h.controller.load_songs().await;
        h.controller.model.lock().await.content_state.move_selection(1, 3);

        h.controller.add_selected_to_playlist().await;

        let songs: Vec<_> = h.api.playlists.lock().unwrap()[0].songs.iter().map(|t| t.id).collect();
        assert_eq!(songs, vec![2]);
        let model = h.controller.model.lock().await;
        assert_eq!(model.ui_state.playlists[0].songs_count, 1);
        assert_eq!(model.notification().map(|n| n.level), Some(NotificationLevel::Success));
    }

    #[tokio::test]
    async fn adding_without_playlists_asks_for_one() {
        let api = MockMusicApi::new();
        *api.songs.lock().unwrap() = vec![track(1)];
        let h = harness(api);
        h.controller.load_songs().await;

        h.controller.add_selected_to_playlist().await;

        let model = h.controller.model.lock().await;
        assert_eq!(model.notification().map(|n| n.level), Some(NotificationLevel::Error));
    }

    #[tokio::test]
    async fn accepting_invitation_loads_shared_playlist() {
        let api = MockMusicApi::new();
        *api.invitations.lock().unwrap() = vec![
            invitation(1, 20, InvitationStatus::Pending),
            invitation(2, 21, InvitationStatus::Pending),
        ];
        let h = harness(api);
        h.controller.load_invitations().await;

        h.controller.respond_to_selected_invitation(true).await;

        assert_eq!(*h.api.invitation_responses.lock().unwrap(), vec![(1, true)]);
        let model = h.controller.model.lock().await;
        assert_eq!(model.ui_state.playlists.iter().map(|p| p.id).collect::<Vec<_>>(), vec![20]);
        match &model.content_state.view {
            ContentView::Invitations { invitations, .. } => {
                assert_eq!(invitations.iter().map(|i| i.id).collect::<Vec<_>>(), vec![2]);
            }
            other => panic!("unexpected view: {other:?}"),
        }
    }

    #[tokio::test]
    async fn declining_invitation_leaves_playlists_alone() {
        let api = MockMusicApi::new();
        *api.invitations.lock().unwrap() = vec![invitation(7, 30, InvitationStatus::Pending)];
        let h = harness(api);
        h.controller.load_invitations().await;

        h.controller.respond_to_selected_invitation(false).await;

        assert_eq!(*h.api.invitation_responses.lock().unwrap(), vec![(7, false)]);
        let model = h.controller.model.lock().await;
        assert!(model.ui_state.playlists.is_empty());
        assert_eq!(model.notification().map(|n| n.level), Some(NotificationLevel::Info));
    }
}

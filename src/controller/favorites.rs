//! Favorite toggling for the playing track

use crate::model::Notification;

use super::AppController;

impl AppController {
    pub async fn toggle_favorite(&self) {
        let Some(song_id) = self.player.lock().await.current_song_id() else {
            tracing::debug!("No current song to favorite");
            return;
        };

        match self.api.toggle_favorite(song_id).await {
            Ok(toggle) => {
                let is_favorite = toggle.is_favorite;
                let mirrored = self
                    .with_player(move |player| {
                        // The user may have skipped while the request was in flight
                        if player.current_song_id() != Some(song_id) {
                            return false;
                        }
                        player.set_favorite(song_id, is_favorite);
                        true
                    })
                    .await;
                if !mirrored {
                    tracing::debug!(song_id, "Favorite response arrived after the song changed");
                }

                let fallback = if is_favorite { "Added to favorites" } else { "Removed from favorites" };
                let message = toggle.message.unwrap_or_else(|| fallback.to_string());
                let mut model = self.model.lock().await;
                model.mark_favorite(song_id, is_favorite);
                model.notify(Notification::success(message));
            }
            Err(e) => {
                tracing::error!(song_id, error = %e, "Toggle favorite failed");
                self.notify(Notification::error(Self::format_error(&e))).await;
            }
        }
    }
}

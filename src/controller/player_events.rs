//! Sink event pump

use std::time::Duration;
use tokio::task::JoinHandle;

use super::AppController;

impl AppController {
    /// Drain the sink's events into the player and save reported positions.
    /// Returns the handles of the position writes that went out.
    pub async fn pump_player_events(&self) -> Vec<JoinHandle<()>> {
        let reports = self
            .with_player(|player| {
                let events = player.poll_sink();
                events
                    .into_iter()
                    .filter_map(|event| {
                        tracing::trace!(?event, "Sink event");
                        player.handle_sink_event(event)
                    })
                    .collect::<Vec<_>>()
            })
            .await;

        let mut writes = Vec::new();
        for (song_id, position) in reports {
            if let Some(handle) = self.persist_position(song_id, position).await {
                writes.push(handle);
            }
        }
        writes
    }

    pub fn start_player_event_listener(&self, tick: Duration) -> JoinHandle<()> {
        let controller = self.clone();
        tracing::info!(tick_ms = tick.as_millis() as u64, "Starting player event listener");

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick);
            loop {
                interval.tick().await;
                if controller.model.lock().await.should_quit() {
                    tracing::debug!("Player event listener shutting down");
                    break;
                }
                controller.pump_player_events().await;
            }
        })
    }
}

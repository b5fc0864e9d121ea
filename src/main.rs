mod audio;
mod config;
mod controller;
mod error;
mod logging;
mod model;
mod view;

#[cfg(test)]
mod test_support;

use std::io;
use std::sync::Arc;
use anyhow::Result;
use std::time::Duration;
use tokio::sync::Mutex;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use audio::{AudioSink, ClockSink};
use config::Config;
use controller::{AppController, PlaybackController};
use model::{AppModel, MusicClient, PlayerSettings, SettingsStore};
use view::AppView;

const PLAYER_TICK: Duration = Duration::from_millis(250);

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = logging::init_logging() {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    tracing::info!("=== dmail player starting ===");

    let config = Config::from_env()?;
    tracing::info!(api_base = %config.api_base, "Configuration loaded");

    let api = Arc::new(MusicClient::new(&config)?);

    let settings_store = SettingsStore::default();
    let settings = settings_store.load();

    let sink: Box<dyn AudioSink + Send> = Box::new(ClockSink::new());
    let mut player = PlaybackController::new(sink);
    player.set_volume(settings.volume);

    let model = Arc::new(Mutex::new(AppModel::new()));
    let player = Arc::new(Mutex::new(player));
    let controller = AppController::new(model.clone(), player.clone(), api, &config);

    let controller_for_init = controller.clone();
    tokio::spawn(async move {
        futures::join!(
            controller_for_init.resume_from_remote(),
            controller_for_init.load_songs(),
            controller_for_init.load_playlists(),
        );
        tracing::debug!("Startup loading finished");
    });

    let listener = controller.start_player_event_listener(PLAYER_TICK);

    tracing::info!("Starting TUI...");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, model.clone(), controller.clone()).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = ?err, "Application error");
    }

    model.lock().await.set_should_quit(true);
    listener.abort();

    let volume = {
        let mut player = player.lock().await;
        let volume = player.volume();
        player.dispose();
        volume
    };
    if let Err(e) = settings_store.save(&PlayerSettings { volume }) {
        tracing::warn!(error = %e, "Could not save player settings");
    }

    tracing::info!("dmail player shutting down");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    model: Arc<Mutex<AppModel>>,
    controller: AppController,
) -> io::Result<()> {
    loop {
        let playback = controller.playback_info().await;

        let should_quit = {
            let mut model_guard = model.lock().await;
            model_guard.auto_clear_old_notifications();

            terminal.draw(|f| {
                AppView::render(f, &playback, &model_guard);
            })?;

            model_guard.should_quit()
        };

        if should_quit {
            break;
        }

        // Short poll keeps the progress bar moving
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Err(e) = controller.handle_key_event(key).await {
                    tracing::warn!(error = %e, "Key handling failed");
                }
            }
        }
    }

    Ok(())
}

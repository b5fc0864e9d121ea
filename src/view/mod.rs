//! View module - UI rendering
//!
//! - `utils`: Shared helpers (duration formatting, scrollable lists)
//! - `layout`: Top bar and sidebar
//! - `content`: Main content area (songs, playlist, queue, invitations)
//! - `progress`: Now-playing bar
//! - `overlays`: Notification toast, text prompt and help popup

mod utils;
mod layout;
mod content;
mod progress;
mod overlays;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::model::{AppModel, PlaybackInfo};

pub struct AppView;

impl AppView {
    pub fn render(frame: &mut Frame, playback: &PlaybackInfo, model: &AppModel) {
        let ui_state = &model.ui_state;

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Search bar + filter
                Constraint::Min(0),    // Sidebar + content
                Constraint::Length(3), // Now playing
            ])
            .split(frame.area());

        layout::render_top_bar(frame, chunks[0], ui_state);

        let main_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
            .split(chunks[1]);

        layout::render_sidebar(frame, main_chunks[0], ui_state);
        content::render_main_content(frame, main_chunks[1], ui_state, &model.content_state, playback);
        progress::render_progress_bar(frame, chunks[2], playback);

        if let Some(notification) = model.notification() {
            overlays::render_notification(frame, notification);
        }

        if let Some(prompt) = &ui_state.prompt {
            overlays::render_prompt(frame, prompt);
        }

        if ui_state.show_help_popup {
            overlays::render_help_popup(frame);
        }
    }
}

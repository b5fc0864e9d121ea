//! Now-playing bar rendering

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Gauge},
    Frame,
};

use crate::model::{PlaybackInfo, RepeatMode};
use super::utils::format_duration;

pub fn render_progress_bar(frame: &mut Frame, area: Rect, playback: &PlaybackInfo) {
    let status_text = match &playback.track {
        None => " No track playing".to_string(),
        Some(track) => {
            let icon = if playback.is_playing { " ▶" } else { "⏸ " };
            let heart = if track.is_favorite { " ♥" } else { "" };
            format!(
                "{} {} | {} ({}){}",
                icon,
                track.title,
                track.artist_or_unknown(),
                track.album_or_unknown(),
                heart
            )
        }
    };

    let shuffle_text = if playback.settings.shuffle { "Shuffle: On" } else { "Shuffle: Off" };
    let repeat_text = match playback.settings.repeat {
        RepeatMode::Off => "Repeat: Off",
        RepeatMode::All => "Repeat: All",
        RepeatMode::One => "Repeat: One",
    };
    let volume_text = if playback.settings.muted {
        "Vol: muted".to_string()
    } else {
        format!("Vol: {}%", playback.settings.volume)
    };

    let time_str = format!(
        "{} / {}",
        format_duration(Some(playback.position_secs)),
        format_duration(playback.duration_secs)
    );

    let controls_info = format!(" {} | {} | {} ", shuffle_text, repeat_text, volume_text);

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("{} ", status_text))
                .title_bottom(Line::from(controls_info).right_aligned()),
        )
        .gauge_style(Style::default().fg(Color::Green))
        .ratio(playback.progress_ratio())
        .label(time_str);

    frame.render_widget(gauge, area);
}

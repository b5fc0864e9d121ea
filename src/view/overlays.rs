//! Overlay rendering (notification toast, text prompt, help popup)

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::model::{Notification, NotificationLevel, TextPrompt};

fn level_style(level: NotificationLevel) -> (Color, &'static str) {
    match level {
        NotificationLevel::Info => (Color::Cyan, " Info "),
        NotificationLevel::Success => (Color::Green, " Done "),
        NotificationLevel::Error => (Color::Red, " Error (Esc to dismiss) "),
    }
}

/// Toast in the top right corner, above the content pane
pub fn render_notification(frame: &mut Frame, notification: &Notification) {
    let area = frame.area();
    let (color, title) = level_style(notification.level);

    let popup_width = 48.min(area.width.saturating_sub(2));
    let inner_width = popup_width.saturating_sub(2).max(1) as usize;
    let line_count = notification.message.chars().count().div_ceil(inner_width).max(1) as u16;
    let popup_height = (line_count + 2).min(area.height.saturating_sub(2));

    let popup_area = Rect {
        x: area.width.saturating_sub(popup_width + 1),
        y: area.y + 1,
        width: popup_width,
        height: popup_height,
    };

    frame.render_widget(Clear, popup_area);

    let toast = Paragraph::new(notification.message.as_str())
        .style(Style::default().fg(color))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .title(title)
                .title_style(Style::default().fg(color).add_modifier(Modifier::BOLD))
                .style(Style::default().bg(Color::Black)),
        );

    frame.render_widget(toast, popup_area);
}

/// Centered single-line input box
pub fn render_prompt(frame: &mut Frame, prompt: &TextPrompt) {
    let area = frame.area();
    let popup_width = 50.min(area.width);
    let popup_area = Rect {
        x: area.width.saturating_sub(popup_width) / 2,
        y: area.height.saturating_sub(3) / 2,
        width: popup_width,
        height: 3.min(area.height),
    };

    frame.render_widget(Clear, popup_area);

    let input = Paragraph::new(format!("{}▏", prompt.input))
        .style(Style::default().fg(Color::White))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .title(prompt.purpose.title())
                .title_bottom(" Enter: Save | Esc: Cancel ")
                .style(Style::default().bg(Color::Black)),
        );

    frame.render_widget(input, popup_area);
}

pub fn render_help_popup(frame: &mut Frame) {
    let area = frame.area();

    let keybindings = [
        ("", "── Navigation ──"),
        ("Tab / Shift+Tab", "Cycle sections"),
        ("↑ / ↓", "Move selection"),
        ("Enter", "Open / Play"),
        ("/ or G", "Focus search"),
        ("L", "Focus playlists"),
        ("T", "Cycle all / my / public songs"),
        ("U", "Show play queue"),
        ("I", "Show playlist invitations"),
        ("", ""),
        ("", "── Playback ──"),
        ("Space", "Play / Pause"),
        ("N / P", "Next / previous track"),
        ("← / →", "Seek 5 seconds"),
        ("S", "Toggle shuffle"),
        ("R", "Cycle repeat (off → all → one)"),
        ("+ / -", "Volume up / down"),
        ("M", "Mute / unmute"),
        ("", ""),
        ("", "── Actions ──"),
        ("X", "Favorite playing song"),
        ("Delete", "Remove from playlist"),
        ("C", "Create playlist"),
        ("E", "Rename open playlist"),
        ("A", "Add song to sidebar playlist"),
        ("V / O", "Mark song / make marked public"),
        ("Enter / Delete", "Accept / decline invitation"),
        ("", ""),
        ("", "── General ──"),
        ("H", "Toggle this help"),
        ("Q", "Quit"),
    ];

    let popup_width = 62.min(area.width);
    let popup_height = (keybindings.len() as u16 + 2).min(area.height.saturating_sub(2));

    let popup_area = Rect {
        x: area.width.saturating_sub(popup_width) / 2,
        y: area.height.saturating_sub(popup_height) / 2,
        width: popup_width,
        height: popup_height,
    };

    frame.render_widget(Clear, popup_area);

    let lines: Vec<Line> = keybindings
        .iter()
        .map(|(key, desc)| {
            if key.is_empty() {
                Line::from(Span::styled(
                    format!("{:^38}", desc),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(vec![
                    Span::styled(
                        format!("{:>18}", key),
                        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw("  "),
                    Span::styled(desc.to_string(), Style::default().fg(Color::White)),
                ])
            }
        })
        .collect();

    let help_text = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Help (H or Esc to close) ")
                .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                .style(Style::default().bg(Color::Black)),
        )
        .style(Style::default().bg(Color::Black));

    frame.render_widget(help_text, popup_area);
}

//! Main content area rendering (song list, playlist detail, queue, invitations)

use std::collections::BTreeSet;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, ListItem, Padding, Paragraph},
    Frame,
};

use crate::model::{
    ActiveSection, ContentState, ContentView, PlaybackInfo, PlaylistDetail, PlaylistInvitation,
    SongId, Track, UiState,
};
use super::utils::{calculate_num_width, format_duration, render_scrollable_list, truncate_string};

pub fn render_main_content(
    frame: &mut Frame,
    area: Rect,
    ui_state: &UiState,
    content_state: &ContentState,
    playback: &PlaybackInfo,
) {
    let is_focused = ui_state.active_section == ActiveSection::MainContent;
    let border_style = if is_focused {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    };

    if content_state.is_loading {
        let loading = Paragraph::new("Loading...")
            .style(Style::default().fg(Color::Yellow))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Content ")
                    .border_style(border_style),
            );
        frame.render_widget(loading, area);
        return;
    }

    let playing_id = playback.track.as_ref().map(|t| t.id);

    match &content_state.view {
        ContentView::Empty => {
            let content = Paragraph::new(
                "Open Songs from the library or pick a playlist\n\nUse Tab to navigate between sections\nUse ↑/↓ to select items\nPress Enter to open or play\nPress H for all keys",
            )
            .style(Style::default().fg(Color::DarkGray))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .padding(Padding::horizontal(1))
                    .border_style(border_style),
            );
            frame.render_widget(content, area);
        }
        ContentView::Songs { tracks, selected_index } => {
            let mut title = if ui_state.search_query.trim().is_empty() {
                format!(" {} ", ui_state.song_filter.label())
            } else {
                format!(" {} matching \"{}\" ", ui_state.song_filter.label(), ui_state.search_query.trim())
            };
            if !ui_state.marked_songs.is_empty() {
                title.push_str(&format!("| {} marked (O: make public) ", ui_state.marked_songs.len()));
            }
            let content_width = area.width.saturating_sub(4) as usize;
            let mut items = render_track_items(
                tracks,
                *selected_index,
                is_focused,
                |_, track| Some(track.id) == playing_id,
                None,
                &ui_state.marked_songs,
                content_width,
            );
            if tracks.is_empty() {
                items.push(ListItem::new("       No songs found").style(Style::default().fg(Color::DarkGray)));
            }
            let block = Block::default()
                .borders(Borders::ALL)
                .title(title)
                .padding(Padding::horizontal(1))
                .border_style(border_style);
            render_scrollable_list(frame, area, items, selected_index + 1, block);
        }
        ContentView::Playlist { detail, selected_index, pending_removal } => {
            render_playlist_detail(
                frame,
                area,
                detail,
                *selected_index,
                *pending_removal,
                is_focused,
                playing_id,
            );
        }
        ContentView::Queue { selected_index } => {
            render_queue(frame, area, playback, *selected_index, is_focused);
        }
        ContentView::Invitations { invitations, selected_index } => {
            render_invitations(frame, area, invitations, *selected_index, is_focused);
        }
    }
}

fn render_playlist_detail(
    frame: &mut Frame,
    area: Rect,
    detail: &PlaylistDetail,
    selected_index: usize,
    pending_removal: Option<SongId>,
    is_focused: bool,
    playing_id: Option<SongId>,
) {
    let border_style = if is_focused {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Header
            Constraint::Min(0),    // Tracks
        ])
        .split(area);

    let edit_hint = if detail.can_edit { " | Delete: Remove song | E: Rename" } else { "" };
    let header_text = format!(
        "📻 {}\n {} songs | Enter: Play from selected{}",
        detail.name,
        detail.songs.len(),
        edit_hint
    );
    let header = Paragraph::new(header_text)
        .style(Style::default().fg(Color::Cyan))
        .block(
            Block::default()
                .padding(Padding::horizontal(1))
                .borders(Borders::ALL)
                .border_style(border_style),
        );
    frame.render_widget(header, chunks[0]);

    let content_width = chunks[1].width.saturating_sub(4) as usize;
    let mut items = render_track_items(
        &detail.songs,
        selected_index,
        is_focused,
        |_, track| Some(track.id) == playing_id,
        pending_removal,
        &BTreeSet::new(),
        content_width,
    );
    if detail.songs.is_empty() {
        items.push(ListItem::new("       This playlist is empty").style(Style::default().fg(Color::DarkGray)));
    }

    let tracks_block = Block::default()
        .borders(Borders::ALL)
        .title(" Songs ")
        .padding(Padding::horizontal(1))
        .border_style(border_style);

    render_scrollable_list(frame, chunks[1], items, selected_index + 1, tracks_block);
}

fn render_queue(
    frame: &mut Frame,
    area: Rect,
    playback: &PlaybackInfo,
    selected_index: usize,
    is_focused: bool,
) {
    let border_style = if is_focused {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Currently playing
            Constraint::Min(0),    // Queue
        ])
        .split(area);

    let cp_text = match &playback.track {
        Some(track) => {
            let favorite = if track.is_favorite { "♥ " } else { "" };
            format!("{}{}  -  {}", favorite, track.title, track.artist_or_unknown())
        }
        None => "No track playing".to_string(),
    };
    let cp_widget = Paragraph::new(cp_text)
        .style(Style::default().fg(Color::Cyan))
        .block(
            Block::default()
                .padding(Padding::horizontal(1))
                .borders(Borders::ALL)
                .title(" 🎵 Now Playing ")
                .border_style(border_style),
        );
    frame.render_widget(cp_widget, chunks[0]);

    let title = if playback.settings.shuffle { " Play Queue (shuffled) " } else { " Play Queue " };
    let content_width = chunks[1].width.saturating_sub(4) as usize;
    let mut items = render_track_items(
        &playback.queue,
        selected_index,
        is_focused,
        |i, _| playback.track.is_some() && i == playback.queue_index,
        None,
        &BTreeSet::new(),
        content_width,
    );
    if playback.queue.is_empty() {
        items.push(ListItem::new("       Queue is empty").style(Style::default().fg(Color::DarkGray)));
    }

    let queue_block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .padding(Padding::horizontal(1))
        .border_style(border_style);

    render_scrollable_list(frame, chunks[1], items, selected_index + 1, queue_block);
}

fn render_invitations(
    frame: &mut Frame,
    area: Rect,
    invitations: &[PlaylistInvitation],
    selected_index: usize,
    is_focused: bool,
) {
    let border_style = if is_focused {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    };

    let mut items: Vec<ListItem> = vec![
        ListItem::new(" Enter: Accept | Delete: Decline")
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
    ];
    items.extend(invitations.iter().enumerate().map(|(i, invitation)| {
        let style = if i == selected_index && is_focused {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        } else if i == selected_index {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let inviter = match &invitation.inviter_email {
            Some(email) => format!("{} ({})", invitation.inviter_username, email),
            None => invitation.inviter_username.clone(),
        };
        ListItem::new(format!(" 📨 {}  -  invited by {}", invitation.playlist_name, inviter)).style(style)
    }));
    if invitations.is_empty() {
        items.push(ListItem::new("       No pending invitations").style(Style::default().fg(Color::DarkGray)));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Playlist invitations ")
        .padding(Padding::horizontal(1))
        .border_style(border_style);
    render_scrollable_list(frame, area, items, selected_index + 1, block);
}

/// Header row plus one row per track. `is_current` marks the playing row;
/// the row of `pending_removal` is dimmed and rows in `marked` get a check.
fn render_track_items(
    tracks: &[Track],
    selected_index: usize,
    is_focused: bool,
    is_current: impl Fn(usize, &Track) -> bool,
    pending_removal: Option<SongId>,
    marked: &BTreeSet<SongId>,
    content_width: usize,
) -> Vec<ListItem<'static>> {
    let num_width = calculate_num_width(tracks.len());
    let favorite_width = 2;
    let duration_width = 8;
    let fixed_width = 1 + num_width + 3 + favorite_width + 3 + 3 + 3 + duration_width;
    let remaining_width = content_width.saturating_sub(fixed_width);
    let title_width = (remaining_width * 55) / 100;
    let artist_width = remaining_width.saturating_sub(title_width);

    let mut items = vec![
        ListItem::new(format!(
            " {:<num_width$}   {}   {:<title_width$}   {:<artist_width$}   {}",
            "#", "  ", "Title", "Artist", "Duration",
        ))
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
    ];

    items.extend(tracks.iter().enumerate().map(|(i, track)| {
        let is_playing = is_current(i, track);
        let style = if pending_removal == Some(track.id) {
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM)
        } else if i == selected_index && is_focused {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        } else if is_playing {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else if i == selected_index {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };

        let favorite_indicator = if track.is_favorite { "♥ " } else { "  " };
        let playing_indicator = if is_playing {
            "▶"
        } else if marked.contains(&track.id) {
            "✓"
        } else {
            " "
        };
        let track_num = format!("{}{:<num_width$}", playing_indicator, i + 1);
        let title_str = truncate_string(&track.title, title_width);
        let artist_str = truncate_string(track.artist_or_unknown(), artist_width);
        let duration = format_duration(track.duration);

        ListItem::new(format!(
            "{}   {}   {}   {}   {}",
            track_num, favorite_indicator, title_str, artist_str, duration
        ))
        .style(style)
    }));

    items
}

//! Layout rendering (top bar, sidebar)

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, ListState, Padding, Paragraph},
    Frame,
};

use crate::model::{ActiveSection, LibraryItem, UiState};

fn border_style(ui_state: &UiState, section: ActiveSection) -> Style {
    if ui_state.active_section == section {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    }
}

fn item_style(selected: bool, focused: bool) -> Style {
    match (selected, focused) {
        (true, true) => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        (true, false) => Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        _ => Style::default().fg(Color::White),
    }
}

pub fn render_top_bar(frame: &mut Frame, area: Rect, ui_state: &UiState) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),     // Search input
            Constraint::Length(20), // Song filter
        ])
        .split(area);

    let searching = ui_state.active_section == ActiveSection::Search;
    let search_text = if ui_state.search_query.is_empty() && !searching {
        "Press / to search..."
    } else {
        &ui_state.search_query
    };

    let search = Paragraph::new(search_text)
        .style(if searching {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::White)
        })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Search ")
                .padding(Padding::horizontal(1))
                .border_style(border_style(ui_state, ActiveSection::Search)),
        );
    frame.render_widget(search, chunks[0]);

    let filter = Paragraph::new(ui_state.song_filter.label())
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL).title(" Filter (t) "));
    frame.render_widget(filter, chunks[1]);
}

pub fn render_sidebar(frame: &mut Frame, area: Rect, ui_state: &UiState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(LibraryItem::ALL.len() as u16 + 2),
            Constraint::Min(0),
        ])
        .split(area);

    let library_focused = ui_state.active_section == ActiveSection::Library;
    let library_items: Vec<ListItem> = LibraryItem::ALL
        .iter()
        .enumerate()
        .map(|(i, item)| {
            ListItem::new(item.name())
                .style(item_style(i == ui_state.library_selected, library_focused))
        })
        .collect();

    let library = List::new(library_items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Library ")
            .padding(Padding::horizontal(1))
            .border_style(border_style(ui_state, ActiveSection::Library)),
    );
    frame.render_widget(library, chunks[0]);

    let playlists_focused = ui_state.active_section == ActiveSection::Playlists;
    let playlist_items: Vec<ListItem> = ui_state
        .playlists
        .iter()
        .enumerate()
        .map(|(i, playlist)| {
            ListItem::new(format!("{} ({})", playlist.name, playlist.songs_count))
                .style(item_style(i == ui_state.playlist_selected, playlists_focused))
        })
        .collect();

    let playlists = List::new(playlist_items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Playlists ")
            .padding(Padding::horizontal(1))
            .border_style(border_style(ui_state, ActiveSection::Playlists)),
    );

    let mut list_state = ListState::default();
    list_state.select(Some(ui_state.playlist_selected));

    frame.render_stateful_widget(playlists, chunks[1], &mut list_state);
}

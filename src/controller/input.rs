//! Key event handling

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::model::{ActiveSection, ContentView, LibraryItem, Notification, PromptPurpose};
use super::AppController;

impl AppController {
    pub async fn handle_key_event(&self, key: KeyEvent) -> Result<()> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }

        let queue_len = self.player.lock().await.queue().len();
        let mut model = self.model.lock().await;

        // Help popup swallows everything until closed
        if model.ui_state.show_help_popup {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('h') | KeyCode::Char('H')) {
                model.toggle_help_popup();
            }
            return Ok(());
        }

        // Text prompt takes all typing
        if model.ui_state.prompt.is_some() {
            match key.code {
                KeyCode::Enter => {
                    drop(model);
                    self.submit_prompt().await;
                }
                KeyCode::Esc => model.close_prompt(),
                KeyCode::Backspace => {
                    if let Some(prompt) = model.ui_state.prompt.as_mut() {
                        prompt.input.pop();
                    }
                }
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    if let Some(prompt) = model.ui_state.prompt.as_mut() {
                        prompt.input.push(c);
                    }
                }
                _ => {}
            }
            return Ok(());
        }

        let active_section = model.ui_state.active_section;

        if active_section == ActiveSection::Search {
            match key.code {
                KeyCode::Tab => {
                    model.cycle_section_forward();
                    return Ok(());
                }
                KeyCode::BackTab => {
                    model.cycle_section_backward();
                    return Ok(());
                }
                KeyCode::Enter => {
                    drop(model);
                    self.perform_search().await;
                    return Ok(());
                }
                KeyCode::Esc => {
                    model.ui_state.search_query.clear();
                    return Ok(());
                }
                KeyCode::Backspace => {
                    model.ui_state.search_query.pop();
                    return Ok(());
                }
                KeyCode::Char(c) => {
                    // Ctrl+Q still quits while typing
                    if (c == 'q' || c == 'Q') && key.modifiers.contains(KeyModifiers::CONTROL) {
                        model.set_should_quit(true);
                    } else {
                        model.ui_state.search_query.push(c);
                    }
                    return Ok(());
                }
                _ => {}
            }
        }

        if active_section == ActiveSection::MainContent {
            let showing_invitations = matches!(model.content_state.view, ContentView::Invitations { .. });
            match key.code {
                KeyCode::Up => {
                    model.move_selection(-1, queue_len);
                    return Ok(());
                }
                KeyCode::Down => {
                    model.move_selection(1, queue_len);
                    return Ok(());
                }
                KeyCode::Enter if showing_invitations => {
                    drop(model);
                    self.respond_to_selected_invitation(true).await;
                    return Ok(());
                }
                KeyCode::Delete if showing_invitations => {
                    drop(model);
                    self.respond_to_selected_invitation(false).await;
                    return Ok(());
                }
                KeyCode::Enter => {
                    drop(model);
                    self.play_selected().await;
                    return Ok(());
                }
                KeyCode::Delete => {
                    drop(model);
                    self.remove_selected_from_playlist().await;
                    return Ok(());
                }
                _ => {}
            }
        }

        // Global keybindings
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                model.set_should_quit(true);
            }
            KeyCode::Tab => {
                model.cycle_section_forward();
            }
            KeyCode::BackTab => {
                model.cycle_section_backward();
            }
            KeyCode::Up => {
                model.move_selection(-1, queue_len);
            }
            KeyCode::Down => {
                model.move_selection(1, queue_len);
            }
            KeyCode::Enter => match active_section {
                ActiveSection::Library => {
                    drop(model);
                    self.open_library_item().await;
                }
                ActiveSection::Playlists => {
                    drop(model);
                    self.open_selected_playlist().await;
                }
                _ => {}
            },
            // Play/Pause toggle
            KeyCode::Char(' ') => {
                drop(model);
                self.toggle_playback().await;
            }
            KeyCode::Char('n') | KeyCode::Char('N') => {
                drop(model);
                self.next_track().await;
            }
            KeyCode::Char('p') | KeyCode::Char('P') => {
                drop(model);
                self.previous_track().await;
            }
            KeyCode::Char('s') | KeyCode::Char('S') => {
                drop(model);
                self.toggle_shuffle().await;
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                drop(model);
                self.cycle_repeat().await;
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                drop(model);
                self.volume_up().await;
            }
            KeyCode::Char('-') => {
                drop(model);
                self.volume_down().await;
            }
            KeyCode::Char('m') | KeyCode::Char('M') => {
                drop(model);
                self.toggle_mute().await;
            }
            KeyCode::Left => {
                drop(model);
                self.seek_backward().await;
            }
            KeyCode::Right => {
                drop(model);
                self.seek_forward().await;
            }
            // Favorite the playing song
            KeyCode::Char('x') | KeyCode::Char('X') => {
                drop(model);
                self.toggle_favorite().await;
            }
            // Cycle all / my / public songs
            KeyCode::Char('t') | KeyCode::Char('T') => {
                drop(model);
                self.cycle_song_filter().await;
            }
            // Show queue
            KeyCode::Char('u') | KeyCode::Char('U') => {
                model.select_library_item(LibraryItem::Queue);
                drop(model);
                self.open_library_item().await;
            }
            // Show invitations
            KeyCode::Char('i') | KeyCode::Char('I') => {
                model.select_library_item(LibraryItem::Invitations);
                drop(model);
                self.open_library_item().await;
            }
            KeyCode::Char('c') | KeyCode::Char('C') => {
                model.open_prompt(PromptPurpose::CreatePlaylist, "");
            }
            KeyCode::Char('e') | KeyCode::Char('E') => {
                if let Err(reason) = model.open_rename_prompt() {
                    model.notify(Notification::error(reason));
                }
            }
            // Add selected song to the sidebar playlist
            KeyCode::Char('a') | KeyCode::Char('A') => {
                drop(model);
                self.add_selected_to_playlist().await;
            }
            KeyCode::Char('v') | KeyCode::Char('V') => {
                model.toggle_mark_selected();
            }
            KeyCode::Char('o') | KeyCode::Char('O') => {
                drop(model);
                self.publish_marked_songs().await;
            }
            // Focus search
            KeyCode::Char('/') | KeyCode::Char('g') | KeyCode::Char('G') => {
                model.set_active_section(ActiveSection::Search);
            }
            KeyCode::Char('l') | KeyCode::Char('L') => {
                model.set_active_section(ActiveSection::Playlists);
            }
            KeyCode::Char('h') | KeyCode::Char('H') => {
                model.toggle_help_popup();
            }
            KeyCode::Esc => {
                model.clear_notification();
            }
            _ => {}
        }
        Ok(())
    }
}

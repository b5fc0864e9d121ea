//! Utility functions for rendering UI components

use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, List, ListItem, ListState},
    Frame,
};

pub fn render_scrollable_list(
    frame: &mut Frame,
    area: Rect,
    items: Vec<ListItem>,
    selected_index: usize,
    block: Block,
) {
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default()); // Highlight handled by item styles

    let mut list_state = ListState::default();
    list_state.select(Some(selected_index));

    frame.render_stateful_widget(list, area, &mut list_state);
}

/// `m:ss` for a length in seconds; unknown lengths render as `--:--`
pub fn format_duration(seconds: Option<f64>) -> String {
    match seconds {
        Some(s) if s.is_finite() && s >= 0.0 => {
            let total = s.floor() as u64;
            format!("{}:{:02}", total / 60, total % 60)
        }
        _ => "--:--".to_string(),
    }
}

/// Width needed for the row number column (digits + padding)
pub fn calculate_num_width(item_count: usize) -> usize {
    item_count.max(1).to_string().len() + 1
}

pub fn truncate_string(s: &str, max_width: usize) -> String {
    if s.chars().count() > max_width {
        let truncated: String = s.chars().take(max_width.saturating_sub(3)).collect();
        format!("{:<width$}", format!("{}...", truncated), width = max_width)
    } else {
        format!("{:<width$}", s, width = max_width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations_render_as_minutes_and_seconds() {
        assert_eq!(format_duration(Some(0.0)), "0:00");
        assert_eq!(format_duration(Some(65.9)), "1:05");
        assert_eq!(format_duration(Some(3600.0)), "60:00");
        assert_eq!(format_duration(None), "--:--");
        assert_eq!(format_duration(Some(f64::NAN)), "--:--");
    }

    #[test]
    fn long_titles_are_cut_with_ellipsis() {
        assert_eq!(truncate_string("abcdefghij", 6), "abc...");
        assert_eq!(truncate_string("abc", 5), "abc  ");
    }

    #[test]
    fn num_width_grows_with_digits() {
        assert_eq!(calculate_num_width(0), 2);
        assert_eq!(calculate_num_width(9), 2);
        assert_eq!(calculate_num_width(10), 3);
        assert_eq!(calculate_num_width(250), 4);
    }
}

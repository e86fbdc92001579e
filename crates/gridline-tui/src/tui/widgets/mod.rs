// TUI widget modules for each screen zone.

pub mod comparison;
pub mod help_bar;
pub mod results;
pub mod search_box;
pub mod status_bar;

use ratatui::style::{Color, Style};

/// Border style for a pane, highlighted when it has focus.
pub fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

// Search box widget: the query being typed, or a dim placeholder.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use super::border_style;
use crate::tui::{Focus, ViewState};

pub const PLACEHOLDER: &str = "Search for an NFL player";

/// Render the search box into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let focused = state.focus == Focus::Search;

    let line = if state.query.is_empty() {
        Line::from(Span::styled(
            PLACEHOLDER,
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::DIM),
        ))
    } else {
        Line::from(Span::styled(
            state.query.as_str(),
            Style::default().fg(Color::White),
        ))
    };

    let paragraph = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Search")
            .border_style(border_style(focused)),
    );
    frame.render_widget(paragraph, area);

    if focused {
        // Cursor after the typed text, inside the border.
        let typed = u16::try_from(state.query.chars().count()).unwrap_or(u16::MAX);
        let x = area
            .x
            .saturating_add(1)
            .saturating_add(typed)
            .min(area.right().saturating_sub(2));
        frame.set_cursor_position((x, area.y.saturating_add(1)));
    }
}

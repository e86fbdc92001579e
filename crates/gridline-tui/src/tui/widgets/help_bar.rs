// Help bar widget: key hints for the focused pane.

use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::tui::{Focus, ViewState};

/// Render the help bar into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let spans: Vec<Span> = hints(state.focus)
        .iter()
        .flat_map(|(key, action)| {
            [
                Span::styled(format!(" {key} "), Style::default().fg(Color::Black).bg(Color::Gray)),
                Span::styled(format!(" {action} "), Style::default().fg(Color::Gray)),
            ]
        })
        .collect();
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// (key, action) pairs shown for each pane.
pub fn hints(focus: Focus) -> &'static [(&'static str, &'static str)] {
    match focus {
        Focus::Search => &[
            ("Enter", "search"),
            ("Down", "results"),
            ("Esc", "clear"),
            ("Tab", "next pane"),
            ("^C", "quit"),
        ],
        Focus::Results => &[
            ("j/k", "move"),
            ("Enter/a", "add"),
            ("Esc", "search"),
            ("Tab", "next pane"),
            ("q", "quit"),
        ],
        Focus::Comparison => &[
            ("h/l", "player"),
            ("j/k", "stat"),
            ("x", "remove"),
            ("Tab", "next pane"),
            ("q", "quit"),
        ],
    }
}

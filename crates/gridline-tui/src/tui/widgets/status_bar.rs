// Status bar widget: session phase, search indicator, latest notice.

use gridline_core::session::Phase;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::tui::ViewState;

/// Render the status bar into the given area.
///
/// Layout: [app name] [phase] [searching] [notice]
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let mut spans = vec![
        Span::styled(
            " gridline ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(
            phase_label(state.comparison.phase, state.comparison.table.columns.len()),
            Style::default().fg(Color::White),
        ),
    ];

    if state.searching {
        spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));
        spans.push(Span::styled("Searching...", Style::default().fg(Color::Yellow)));
    }

    if let Some((message, at)) = &state.notice {
        spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));
        spans.push(Span::styled(
            format!("[{}] {message}", at.format("%H:%M:%S")),
            Style::default().fg(Color::LightRed),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

/// "Idle" or "Comparing N player(s)".
pub fn phase_label(phase: Phase, players: usize) -> String {
    match phase {
        Phase::Idle => "Idle".to_string(),
        Phase::Comparing if players == 1 => "Comparing 1 player".to_string(),
        Phase::Comparing => format!("Comparing {players} players"),
    }
}

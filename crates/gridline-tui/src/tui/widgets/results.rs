// Search results widget: selectable list of matching players.

use gridline_core::player::Player;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use super::border_style;
use crate::tui::{Focus, ViewState};

/// Render the result list into the given area.
///
/// Shows the inline search error in place of the list when the last search
/// failed, and a dim hint when there is nothing to list.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let focused = state.focus == Focus::Results;
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title(state))
        .border_style(border_style(focused));

    if let Some(ref error) = state.search_error {
        let paragraph = Paragraph::new(Line::from(Span::styled(
            error.as_str(),
            Style::default().fg(Color::Red),
        )))
        .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    if state.results.is_empty() {
        let hint = if state.searching {
            "Searching..."
        } else {
            "No players to show"
        };
        let paragraph = Paragraph::new(Line::from(Span::styled(
            hint,
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::DIM),
        )))
        .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = state.results.iter().map(result_item).collect();
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol(">> ");

    let mut list_state = ListState::default();
    if focused {
        list_state.select(Some(state.results_cursor));
    }
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn title(state: &ViewState) -> String {
    if state.results.is_empty() {
        "Results".to_string()
    } else {
        format!("Results ({})", state.results.len())
    }
}

/// One line per player: name, then team/position in gray.
pub fn result_item(player: &Player) -> ListItem<'static> {
    let mut spans = vec![Span::styled(
        player.name.clone(),
        Style::default().fg(Color::White),
    )];
    if let Some(ref team) = player.team {
        spans.push(Span::styled(
            format!("  {team}"),
            Style::default().fg(Color::Gray),
        ));
    }
    ListItem::new(Line::from(spans))
}

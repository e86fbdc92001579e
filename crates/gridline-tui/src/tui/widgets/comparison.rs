// Comparison widget: one row per stat, one column per selected player.
//
// The header marks columns whose stats are still loading or failed. Under the
// table a detail box shows the highlighted stat's description and the
// selected player's top stats.

use gridline_core::compare::{ColumnStatus, ComparisonColumn};
use gridline_core::session::Phase;
use gridline_core::stats::{group_by_category, StatRecord};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap};
use ratatui::Frame;

use super::border_style;
use crate::tui::{Focus, ViewState};

/// Leaders listed in the detail box.
const DETAIL_LEADERS: usize = 3;

/// Render the comparison pane into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let focused = state.focus == Focus::Comparison;

    if state.comparison.phase == Phase::Idle {
        let paragraph = Paragraph::new(Line::from(Span::styled(
            "Add players from the search results to compare them",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::DIM),
        )))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Comparison")
                .border_style(border_style(focused)),
        );
        frame.render_widget(paragraph, area);
        return;
    }

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(4)])
        .split(area);

    render_table(frame, sections[0], state, focused);
    render_detail(frame, sections[1], state);
}

fn render_table(frame: &mut Frame, area: Rect, state: &ViewState, focused: bool) {
    let table = &state.comparison.table;

    let mut header_cells = vec![Cell::from("Stat"), Cell::from("Category")];
    header_cells.extend(table.columns.iter().enumerate().map(|(i, column)| {
        let style = if focused && i == state.selected_column {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };
        Cell::from(column_header(column)).style(style)
    }));
    let header = Row::new(header_cells).style(
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = table
        .rows
        .iter()
        .enumerate()
        .map(|(r, row)| {
            let mut cells = vec![
                Cell::from(row.name.clone()),
                Cell::from(row.category.clone()).style(Style::default().fg(Color::Gray)),
            ];
            cells.extend((0..table.columns.len()).map(|c| {
                match table.cell(r, c) {
                    Some(value) if !value.is_no_data() => {
                        Cell::from(value.render(&state.no_data).to_string())
                    }
                    _ => Cell::from(state.no_data.clone())
                        .style(Style::default().fg(Color::DarkGray)),
                }
            }));
            Row::new(cells)
        })
        .collect();

    let mut widths = vec![Constraint::Min(18), Constraint::Length(10)];
    widths.extend(table.columns.iter().map(|_| Constraint::Length(16)));

    let widget = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Comparison ({} stats)", table.rows.len()))
                .border_style(border_style(focused)),
        )
        .row_highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol(">> ");

    let mut table_state = TableState::default();
    if !table.rows.is_empty() {
        table_state.select(Some(state.row_cursor));
    }
    frame.render_stateful_widget(widget, area, &mut table_state);
}

fn render_detail(frame: &mut Frame, area: Rect, state: &ViewState) {
    let mut lines = Vec::new();

    if let Some(row) = state.comparison.table.rows.get(state.row_cursor) {
        let text = if row.description.is_empty() {
            row.name.clone()
        } else {
            format!("{}: {}", row.name, row.description)
        };
        lines.push(Line::from(Span::styled(text, Style::default().fg(Color::White))));
    }

    if let Some(player) = state.selected_player() {
        let leaders = state
            .comparison
            .leaders
            .get(state.selected_column)
            .map(Vec::as_slice)
            .unwrap_or_default();
        lines.push(Line::from(vec![
            Span::styled(
                format!("Top for {}: ", player.name),
                Style::default().fg(Color::Gray),
            ),
            Span::raw(leaders_summary(leaders, DETAIL_LEADERS)),
        ]));
    }

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Details"));
    frame.render_widget(paragraph, area);
}

/// Player name plus a marker for pending or failed stats.
pub fn column_header(column: &ComparisonColumn) -> String {
    match column.status {
        ColumnStatus::Loaded => column.player.name.clone(),
        ColumnStatus::Loading => format!("{} …", column.player.name),
        ColumnStatus::Failed => format!("{} ✗", column.player.name),
    }
}

/// The first `count` leaders grouped by category, e.g.
/// "Passing: Passing Yards 28,424 · Passing Touchdowns 219 | Rushing: ..."
pub fn leaders_summary(leaders: &[StatRecord], count: usize) -> String {
    if leaders.is_empty() {
        return "no stats".to_string();
    }
    let shown = &leaders[..leaders.len().min(count)];
    group_by_category(shown)
        .iter()
        .map(|(category, stats)| {
            let stats = stats
                .iter()
                .map(|s| format!("{} {}", s.name, s.display_value))
                .collect::<Vec<_>>()
                .join(" · ");
            format!("{category}: {stats}")
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

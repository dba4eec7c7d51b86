//! Entity table widget.
//! Thin TUI wrapper over [`crate::view::build_table_view`].

use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Row, Table};

use crate::browser::{Browser, KindsState, TableStatus};
use crate::tui::navigable::NavigableList;
use crate::tui::state::{AppState, Focus};
use crate::tui::style::Styles;
use crate::view::{CellView, EMPTY_CELL, TableView, truncate_display};

use super::message::{render_error_panel, render_placeholder};

pub fn render_table(
    frame: &mut Frame,
    area: Rect,
    state: &mut AppState,
    browser: &Browser,
    view: &TableView,
) {
    let border = if state.focus == Focus::Table {
        Styles::focused_border()
    } else {
        Styles::unfocused_border()
    };
    let block = Block::default()
        .title(view.title.clone())
        .borders(Borders::ALL)
        .border_style(border);

    if let KindsState::Failed(msg) = browser.selector().state() {
        render_placeholder(frame, area, block, "");
        render_error_panel(frame, area, "Cannot load kinds", msg);
        return;
    }
    match browser.table_status() {
        TableStatus::Empty => {
            let text = match browser.selector().state() {
                KindsState::Loading => "Loading...",
                _ => "No kind selected",
            };
            render_placeholder(frame, area, block, text);
            return;
        }
        TableStatus::Loading => {
            render_placeholder(frame, area, block, &format!("{} Loading...", state.spinner()));
            return;
        }
        TableStatus::Failed(msg) => {
            render_placeholder(frame, area, block, "");
            render_error_panel(frame, area, "Cannot load entities", msg);
            return;
        }
        TableStatus::Ready => {}
    }

    if view.is_empty() {
        render_placeholder(frame, area, block, "No entities");
        return;
    }

    state.table.clamp(view.rows.len());
    if state.table.column >= view.columns.len() {
        state.table.column = view.columns.len().saturating_sub(1);
    }

    // Header with sort indicator and column cursor
    let headers: Vec<Cell> = view
        .columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            let style = if i == state.table.column && state.focus == Focus::Table {
                Styles::column_cursor()
            } else {
                Styles::table_header()
            };
            Cell::from(Span::styled(column.label(), style))
        })
        .collect();
    let header = Row::new(headers).style(Styles::table_header()).height(1);

    let rows: Vec<Row> = view
        .rows
        .iter()
        .map(|cells| {
            let cells = cells
                .iter()
                .zip(&view.widths)
                .map(|(cell, &width)| Cell::from(cell_line(cell, width as usize)));
            Row::new(cells).style(Styles::default()).height(1)
        })
        .collect();

    let mut constraints: Vec<Constraint> =
        view.widths.iter().map(|&w| Constraint::Length(w)).collect();
    constraints.push(Constraint::Fill(1));

    let table = Table::new(rows, constraints)
        .header(header)
        .block(block)
        .column_spacing(1)
        .row_highlight_style(Styles::selected());

    state.table.ratatui_state.select(Some(state.table.selected));
    frame.render_stateful_widget(table, area, &mut state.table.ratatui_state);
}

/// Value truncated to fit next to its badge.
fn cell_line(cell: &CellView, width: usize) -> Line<'static> {
    match &cell.badge {
        Some(badge) => {
            let text_width = width.saturating_sub(badge.width());
            Line::from(vec![
                Span::raw(truncate_display(&cell.text, text_width)),
                Span::raw(" "),
                Span::styled(badge.label.clone(), Styles::badge(badge.class)),
            ])
        }
        None if cell.text == EMPTY_CELL => Line::from(Span::styled(
            truncate_display(&cell.text, width),
            Styles::dim(),
        )),
        None => Line::from(truncate_display(&cell.text, width)),
    }
}

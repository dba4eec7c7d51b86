//! Column visibility popup.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph};

use crate::tui::style::Styles;
use crate::view::ColumnVisibility;

use super::popup::{centered_fixed, hints};

pub fn render_columns(
    frame: &mut Frame,
    area: Rect,
    columns: &[String],
    visibility: &ColumnVisibility,
    selected: usize,
) {
    let width = columns
        .iter()
        .map(|c| c.chars().count() as u16 + 8)
        .max()
        .unwrap_or(0)
        .clamp(36, 60);
    let height = (columns.len() as u16 + 3).clamp(6, area.height.max(6));
    let popup_area = centered_fixed(width, height, area);
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(format!(
            " Columns ({} hidden) ",
            visibility.hidden_count()
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let chunks = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(inner);

    let items: Vec<ListItem> = columns
        .iter()
        .map(|name| {
            let (mark, style) = if visibility.is_visible(name) {
                ("[x] ", Styles::default())
            } else {
                ("[ ] ", Styles::dim())
            };
            ListItem::new(Line::from(vec![
                Span::styled(mark, Styles::field_name()),
                Span::styled(name.clone(), style),
            ]))
        })
        .collect();
    let mut list_state = ListState::default().with_selected(Some(selected));
    let list = List::new(items).highlight_style(Styles::selected());
    frame.render_stateful_widget(list, chunks[0], &mut list_state);

    let footer = hints(&[("Space", "toggle"), ("Esc", "close")]);
    frame.render_widget(Paragraph::new(footer), chunks[1]);
}

//! Kind picker sidebar.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};

use crate::browser::{Browser, KindsState};
use crate::tui::navigable::NavigableList;
use crate::tui::state::{AppState, Focus};
use crate::tui::style::Styles;

pub fn render_kinds(frame: &mut Frame, area: Rect, state: &mut AppState, browser: &Browser) {
    let border = if state.focus == Focus::Kinds {
        Styles::focused_border()
    } else {
        Styles::unfocused_border()
    };
    let title = if state.kind_filter.is_empty() {
        " Kinds ".to_string()
    } else {
        format!(" Kinds /{} ", state.kind_filter)
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border);

    match browser.selector().state() {
        KindsState::Loading => {
            let text = format!("{} Loading...", state.spinner());
            frame.render_widget(Paragraph::new(text).style(Styles::dim()).block(block), area);
            return;
        }
        KindsState::Failed(_) => {
            frame.render_widget(
                Paragraph::new("unavailable").style(Styles::error()).block(block),
                area,
            );
            return;
        }
        KindsState::Loaded => {}
    }

    let kinds = state.filtered_kinds(browser);
    if kinds.is_empty() {
        let text = if browser.selector().kinds().is_empty() {
            "No kinds"
        } else {
            "No match"
        };
        frame.render_widget(Paragraph::new(text).style(Styles::dim()).block(block), area);
        return;
    }

    state.kinds.clamp(kinds.len());
    let selected_kind = browser.selected_kind();
    let items: Vec<ListItem> = kinds
        .iter()
        .map(|kind| {
            let marker = if Some(*kind) == selected_kind { "● " } else { "  " };
            ListItem::new(Line::from(vec![
                Span::styled(marker, Styles::focused_border()),
                Span::raw(kind.to_string()),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .style(Styles::default())
        .highlight_style(Styles::selected());
    state.kinds.ratatui_state.select(Some(state.kinds.selected));
    frame.render_stateful_widget(list, area, &mut state.kinds.ratatui_state);
}

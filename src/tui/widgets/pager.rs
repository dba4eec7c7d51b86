//! Pager footer: `◀ Prev  page 2/3  Next ▶` plus key hints.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::state::AppState;
use crate::tui::style::Styles;
use crate::view::PagerView;

use super::popup::hints;

pub fn render_pager(frame: &mut Frame, area: Rect, state: &AppState, pager: &PagerView) {
    let chunks = Layout::horizontal([Constraint::Min(30), Constraint::Length(44)]).split(area);
    frame.render_widget(Paragraph::new(pager_line(state, pager)), chunks[0]);

    let help = hints(&[("?", "help"), ("s", "sort"), ("c", "columns"), ("q", "quit")]);
    frame.render_widget(
        Paragraph::new(help).alignment(ratatui::layout::Alignment::Right),
        chunks[1],
    );
}

fn pager_line(state: &AppState, pager: &PagerView) -> Line<'static> {
    let enabled = |on: bool| if on { Styles::help_key() } else { Styles::dim() };

    let next = if pager.busy {
        format!("Next {}", state.spinner())
    } else {
        "Next ▶".to_string()
    };
    let mut spans = vec![
        Span::styled(" ◀ Prev", enabled(pager.can_prev)),
        Span::raw("  "),
        Span::styled(pager.page_label.clone(), Styles::default()),
        Span::raw("  "),
        Span::styled(next, enabled(pager.can_next)),
    ];
    if let Some(err) = &pager.error {
        spans.push(Span::styled(
            format!("  next page failed: {err} (r to retry)"),
            Styles::error(),
        ));
    }
    Line::from(spans)
}

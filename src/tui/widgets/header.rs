//! Header widget showing source, location and status.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::browser::{Browser, KindsState, TableStatus};
use crate::tui::state::{AppState, InputMode};
use crate::tui::style::Styles;

/// Renders the header bar.
pub fn render_header(frame: &mut Frame, area: Rect, state: &AppState, browser: &Browser) {
    let chunks = Layout::horizontal([
        Constraint::Length(11), // App name
        Constraint::Min(20),    // Source + location
        Constraint::Length(44), // Status / input
        Constraint::Length(11), // Last fetch
    ])
    .split(area);

    frame.render_widget(Paragraph::new(" kindview ").style(Styles::header()), chunks[0]);

    let location = browser.location().to_query_string();
    let middle = Line::from(vec![
        Span::styled(format!("{} ", state.source_label), Styles::header()),
        Span::styled(location, Styles::header()),
    ]);
    frame.render_widget(Paragraph::new(middle).style(Styles::header()), chunks[1]);

    let (right_content, right_style) = match state.input_mode {
        InputMode::KindFilter => (
            format!("Filter: {}█", state.kind_filter),
            Styles::filter_input(),
        ),
        InputMode::Location => (
            format!("Open: {}█", state.location_input),
            Styles::filter_input(),
        ),
        InputMode::Normal => match &state.status_message {
            Some(msg) => (msg.clone(), Styles::warning()),
            None => (activity(state, browser), Styles::header()),
        },
    };
    frame.render_widget(
        Paragraph::new(right_content).style(right_style),
        chunks[2],
    );

    let fetched = state
        .last_fetch
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "--:--:--".to_string());
    frame.render_widget(
        Paragraph::new(format!(" {fetched} ")).style(Styles::header()),
        chunks[3],
    );
}

/// Short description of what the browser is doing.
fn activity(state: &AppState, browser: &Browser) -> String {
    if *browser.selector().state() == KindsState::Loading {
        return format!("{} loading kinds", state.spinner());
    }
    if *browser.table_status() == TableStatus::Loading || browser.paginator().is_busy() {
        return format!("{} loading", state.spinner());
    }
    match browser.sort().active() {
        Some(sort) => format!("sort: {} {}", sort.field, sort.direction.indicator()),
        None => String::new(),
    }
}

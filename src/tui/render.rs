//! Main rendering logic for TUI.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

use crate::browser::Browser;
use crate::view::TableView;

use super::state::{AppState, InputMode, PopupState};
use super::widgets::{
    render_columns, render_detail, render_header, render_help, render_kinds,
    render_location_input, render_pager, render_quit_confirm, render_table,
};

const SIDEBAR_WIDTH: u16 = 24;

/// Main render function.
pub fn render(frame: &mut Frame, state: &mut AppState, browser: &Browser, view: &TableView) {
    let area = frame.area();

    // Main layout: header, content, pager
    let chunks = Layout::vertical([
        Constraint::Length(1), // Header
        Constraint::Min(3),    // Kinds + table
        Constraint::Length(1), // Pager
    ])
    .split(area);

    render_header(frame, chunks[0], state, browser);

    let content = Layout::horizontal([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(10)])
        .split(chunks[1]);
    render_kinds(frame, content[0], state, browser);
    render_table(frame, content[1], state, browser, view);

    render_pager(frame, chunks[2], state, &view.pager);

    // Popups (rendered last to overlay everything)
    match &mut state.popup {
        PopupState::None => {}
        PopupState::Help { scroll } => render_help(frame, area, scroll),
        PopupState::Detail { row, scroll } => {
            let record = browser
                .current_page()
                .and_then(|page| page.entities.get(*row));
            render_detail(frame, area, record, scroll);
        }
        PopupState::Columns { selected } => {
            render_columns(frame, area, &view.all_columns, &state.visibility, *selected);
        }
        PopupState::QuitConfirm => render_quit_confirm(frame, area),
    }

    if state.input_mode == InputMode::Location && !state.popup.is_open() {
        render_location_input(frame, area, &state.location_input);
    }
}

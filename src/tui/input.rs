//! Input handling and keybindings.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::browser::Browser;
use crate::view::TableView;

use super::navigable::NavigableList;
use super::state::{AppState, Focus, InputMode, PopupState};

const PAGE_STEP: usize = 20;

/// Result of handling a key event. Everything that touches the browser is
/// returned to the app loop; pure UI changes are applied to [`AppState`]
/// directly.
#[derive(Debug, PartialEq, Eq)]
pub enum KeyAction {
    /// No action, continue.
    None,
    /// Quit the application.
    Quit,
    SelectKind(String),
    /// Header click on a column.
    SortBy(String),
    NextPage,
    PrevPage,
    FirstPage,
    LastPage,
    /// Retry what failed, or reload the current kind.
    Reload,
    /// Apply a typed location.
    OpenLocation(String),
}

/// Navigation action for unified scroll/selection dispatch.
enum NavAction {
    Up,
    Down,
    PageUp(usize),
    PageDown(usize),
    Home,
    End,
}

/// Dispatches a navigation action to the open popup or the focused pane.
fn dispatch_navigation(state: &mut AppState, action: NavAction) {
    match &mut state.popup {
        PopupState::Help { scroll } | PopupState::Detail { scroll, .. } => match action {
            NavAction::Up => *scroll = scroll.saturating_sub(1),
            NavAction::Down => *scroll = scroll.saturating_add(1),
            NavAction::PageUp(n) => *scroll = scroll.saturating_sub(n),
            NavAction::PageDown(n) => *scroll = scroll.saturating_add(n),
            NavAction::Home => *scroll = 0,
            NavAction::End => {}
        },
        PopupState::Columns { selected } => match action {
            NavAction::Up => *selected = selected.saturating_sub(1),
            NavAction::Down => *selected = selected.saturating_add(1),
            NavAction::PageUp(n) => *selected = selected.saturating_sub(n),
            NavAction::PageDown(n) => *selected = selected.saturating_add(n),
            NavAction::Home => *selected = 0,
            NavAction::End => *selected = usize::MAX,
        },
        _ => {
            let nav: &mut dyn NavigableList = match state.focus {
                Focus::Kinds => &mut state.kinds,
                Focus::Table => &mut state.table,
            };
            match action {
                NavAction::Up => nav.select_up(),
                NavAction::Down => nav.select_down(),
                NavAction::PageUp(n) => nav.page_up(n),
                NavAction::PageDown(n) => nav.page_down(n),
                NavAction::Home => nav.home(),
                NavAction::End => nav.end(),
            }
        }
    }
}

fn navigation_for(code: KeyCode) -> Option<NavAction> {
    match code {
        KeyCode::Up | KeyCode::Char('k') => Some(NavAction::Up),
        KeyCode::Down | KeyCode::Char('j') => Some(NavAction::Down),
        KeyCode::PageUp => Some(NavAction::PageUp(PAGE_STEP)),
        KeyCode::PageDown => Some(NavAction::PageDown(PAGE_STEP)),
        KeyCode::Home => Some(NavAction::Home),
        KeyCode::End => Some(NavAction::End),
        _ => None,
    }
}

/// Handles key input and updates state.
pub fn handle_key(
    state: &mut AppState,
    browser: &Browser,
    view: &TableView,
    key: KeyEvent,
) -> KeyAction {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return KeyAction::Quit;
    }
    match state.popup {
        PopupState::QuitConfirm => return handle_quit_confirm(state, key),
        PopupState::Help { .. } => return handle_help(state, key),
        PopupState::Detail { .. } => return handle_detail(state, key),
        PopupState::Columns { .. } => return handle_columns(state, view, key),
        PopupState::None => {}
    }
    match state.input_mode {
        InputMode::Normal => handle_normal_mode(state, browser, view, key),
        InputMode::KindFilter => handle_kind_filter_mode(state, key),
        InputMode::Location => handle_location_mode(state, key),
    }
}

fn handle_quit_confirm(state: &mut AppState, key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Enter | KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Char('y') => {
            state.popup = PopupState::None;
            KeyAction::Quit
        }
        KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
            state.popup = PopupState::None;
            KeyAction::None
        }
        _ => KeyAction::None,
    }
}

fn handle_help(state: &mut AppState, key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => {
            state.popup = PopupState::None;
        }
        code => {
            if let Some(nav) = navigation_for(code) {
                dispatch_navigation(state, nav);
            }
        }
    }
    KeyAction::None
}

fn handle_detail(state: &mut AppState, key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Esc | KeyCode::Enter | KeyCode::Char('d') | KeyCode::Char('q') => {
            state.popup = PopupState::None;
        }
        code => {
            if let Some(nav) = navigation_for(code) {
                dispatch_navigation(state, nav);
            }
        }
    }
    KeyAction::None
}

fn handle_columns(state: &mut AppState, view: &TableView, key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Esc | KeyCode::Char('c') | KeyCode::Char('q') => {
            state.popup = PopupState::None;
        }
        KeyCode::Char(' ') | KeyCode::Enter => {
            if let PopupState::Columns { selected } = state.popup
                && let Some(column) = view.all_columns.get(selected)
            {
                state.visibility.toggle(column);
            }
        }
        code => {
            if let Some(nav) = navigation_for(code) {
                dispatch_navigation(state, nav);
                if let PopupState::Columns { selected } = &mut state.popup {
                    *selected = (*selected).min(view.all_columns.len().saturating_sub(1));
                }
            }
        }
    }
    KeyAction::None
}

/// Handles keys in normal mode.
fn handle_normal_mode(
    state: &mut AppState,
    browser: &Browser,
    view: &TableView,
    key: KeyEvent,
) -> KeyAction {
    if let Some(nav) = navigation_for(key.code) {
        dispatch_navigation(state, nav);
        return KeyAction::None;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => {
            state.popup = PopupState::QuitConfirm;
            KeyAction::None
        }

        KeyCode::Tab | KeyCode::BackTab => {
            state.focus = state.focus.toggle();
            KeyAction::None
        }

        KeyCode::Enter => match state.focus {
            Focus::Kinds => state
                .filtered_kinds(browser)
                .get(state.kinds.selected)
                .map(|kind| KeyAction::SelectKind(kind.to_string()))
                .unwrap_or(KeyAction::None),
            Focus::Table => sort_under_cursor(state, view),
        },

        // Column cursor
        KeyCode::Left | KeyCode::Char('h') => {
            state.table.column_left();
            KeyAction::None
        }
        KeyCode::Right | KeyCode::Char('l') => {
            state.table.column_right(view.columns.len());
            KeyAction::None
        }
        KeyCode::Char('s') | KeyCode::Char('S') => sort_under_cursor(state, view),

        // Pagination
        KeyCode::Char('n') | KeyCode::Char(']') => KeyAction::NextPage,
        KeyCode::Char('p') | KeyCode::Char('[') => KeyAction::PrevPage,
        KeyCode::Char('g') => KeyAction::FirstPage,
        KeyCode::Char('G') => KeyAction::LastPage,

        KeyCode::Char('r') | KeyCode::Char('R') => KeyAction::Reload,

        KeyCode::Char('/') => {
            state.input_mode = InputMode::KindFilter;
            state.focus = Focus::Kinds;
            state.kind_filter.clear();
            state.kinds.selected = 0;
            KeyAction::None
        }
        KeyCode::Char('o') => {
            state.input_mode = InputMode::Location;
            state.location_input = browser.location().to_query_string();
            KeyAction::None
        }
        KeyCode::Char('y') => {
            state.set_status(browser.location().to_query_string());
            KeyAction::None
        }

        // Popups
        KeyCode::Char('?') => {
            state.popup = PopupState::Help { scroll: 0 };
            KeyAction::None
        }
        KeyCode::Char('d') | KeyCode::Char('D') => {
            if state.table.selected < view.rows.len() {
                state.popup = PopupState::Detail {
                    row: state.table.selected,
                    scroll: 0,
                };
            } else {
                state.set_status("No record selected");
            }
            KeyAction::None
        }
        KeyCode::Char('c') | KeyCode::Char('C') => {
            if view.all_columns.is_empty() {
                state.set_status("No columns on this page");
            } else {
                state.popup = PopupState::Columns { selected: 0 };
            }
            KeyAction::None
        }

        KeyCode::Esc => {
            state.status_message = None;
            state.kind_filter.clear();
            KeyAction::None
        }

        _ => KeyAction::None,
    }
}

fn sort_under_cursor(state: &mut AppState, view: &TableView) -> KeyAction {
    match view.columns.get(state.table.column) {
        Some(column) => KeyAction::SortBy(column.name.clone()),
        None => {
            state.set_status("No column to sort by");
            KeyAction::None
        }
    }
}

fn handle_kind_filter_mode(state: &mut AppState, key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Esc => {
            state.input_mode = InputMode::Normal;
            state.kind_filter.clear();
            KeyAction::None
        }
        KeyCode::Enter => {
            state.input_mode = InputMode::Normal;
            KeyAction::None
        }
        KeyCode::Backspace => {
            state.kind_filter.pop();
            state.kinds.selected = 0;
            KeyAction::None
        }
        KeyCode::Char(c) => {
            state.kind_filter.push(c);
            state.kinds.selected = 0;
            KeyAction::None
        }
        _ => KeyAction::None,
    }
}

fn handle_location_mode(state: &mut AppState, key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Esc => {
            state.input_mode = InputMode::Normal;
            state.location_input.clear();
            KeyAction::None
        }
        KeyCode::Enter => {
            state.input_mode = InputMode::Normal;
            KeyAction::OpenLocation(std::mem::take(&mut state.location_input))
        }
        KeyCode::Backspace => {
            state.location_input.pop();
            KeyAction::None
        }
        KeyCode::Char(c) => {
            state.location_input.push(c);
            KeyAction::None
        }
        _ => KeyAction::None,
    }
}

//! Application state management.

use chrono::{DateTime, Local};
use ratatui::widgets::{ListState, TableState};

use crate::browser::Browser;
use crate::view::ColumnVisibility;

use super::navigable::NavigableList;

const SPINNER: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Pane receiving navigation keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    Kinds,
    #[default]
    Table,
}

impl Focus {
    pub fn toggle(self) -> Self {
        match self {
            Focus::Kinds => Focus::Table,
            Focus::Table => Focus::Kinds,
        }
    }
}

/// Input mode for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Typing a kind filter (`/`).
    KindFilter,
    /// Typing a location to open (`o`).
    Location,
}

/// Active popup state. Only one popup can be open at a time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PopupState {
    #[default]
    None,
    Help {
        scroll: usize,
    },
    QuitConfirm,
    /// Full values of one record of the current page.
    Detail {
        row: usize,
        scroll: usize,
    },
    /// Column visibility toggles.
    Columns {
        selected: usize,
    },
}

impl PopupState {
    pub fn is_open(&self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Cursor of the kinds sidebar (index into the filtered list).
#[derive(Debug, Default)]
pub struct KindListState {
    pub selected: usize,
    pub ratatui_state: ListState,
}

impl NavigableList for KindListState {
    fn selected(&self) -> usize {
        self.selected
    }
    fn selected_mut(&mut self) -> &mut usize {
        &mut self.selected
    }
}

/// Row and column cursor of the entity table.
#[derive(Debug, Default)]
pub struct TableCursor {
    pub selected: usize,
    /// Index into the visible columns.
    pub column: usize,
    pub ratatui_state: TableState,
}

impl TableCursor {
    pub fn column_left(&mut self) {
        self.column = self.column.saturating_sub(1);
    }

    pub fn column_right(&mut self, columns: usize) {
        if self.column + 1 < columns {
            self.column += 1;
        }
    }

    pub fn reset(&mut self) {
        self.selected = 0;
        self.ratatui_state = TableState::default();
    }
}

impl NavigableList for TableCursor {
    fn selected(&self) -> usize {
        self.selected
    }
    fn selected_mut(&mut self) -> &mut usize {
        &mut self.selected
    }
}

/// Main application state.
#[derive(Debug)]
pub struct AppState {
    pub focus: Focus,
    pub input_mode: InputMode,
    /// Kind filter buffer (`/`).
    pub kind_filter: String,
    /// Location input buffer (`o`).
    pub location_input: String,
    pub kinds: KindListState,
    pub table: TableCursor,
    /// Active popup state. Only one popup can be open at a time.
    pub popup: PopupState,
    /// Temporary status message shown in the header.
    pub status_message: Option<String>,
    /// Local time of the last successful fetch.
    pub last_fetch: Option<DateTime<Local>>,
    pub visibility: ColumnVisibility,
    /// Base URL or `demo`, shown in the header.
    pub source_label: String,
    /// Tick counter for the busy indicator.
    pub tick: usize,
    pub terminal_width: u16,
}

impl AppState {
    pub fn new(source_label: impl Into<String>) -> Self {
        Self {
            focus: Focus::Kinds,
            input_mode: InputMode::Normal,
            kind_filter: String::new(),
            location_input: String::new(),
            kinds: KindListState::default(),
            table: TableCursor::default(),
            popup: PopupState::None,
            status_message: None,
            last_fetch: None,
            visibility: ColumnVisibility::new(),
            source_label: source_label.into(),
            tick: 0,
            terminal_width: 0,
        }
    }

    /// Kinds shown in the sidebar under the current filter.
    pub fn filtered_kinds<'a>(&self, browser: &'a Browser) -> Vec<&'a str> {
        browser.selector().filter(&self.kind_filter)
    }

    /// Moves the sidebar cursor onto the selected kind.
    pub fn sync_kind_cursor(&mut self, browser: &Browser) {
        let Some(selected) = browser.selected_kind() else {
            return;
        };
        if let Some(pos) = self
            .filtered_kinds(browser)
            .iter()
            .position(|k| *k == selected)
        {
            self.kinds.selected = pos;
        }
    }

    /// Called whenever a different page is shown.
    pub fn on_page_changed(&mut self, browser: &Browser) {
        self.table.reset();
        self.visibility.sync_kind(browser.selected_kind());
        if matches!(self.popup, PopupState::Detail { .. } | PopupState::Columns { .. }) {
            self.popup = PopupState::None;
        }
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn spinner(&self) -> char {
        SPINNER[self.tick % SPINNER.len()]
    }
}

//! Color scheme and styles.

use ratatui::style::{Color, Modifier, Style};

use crate::view::BadgeClass;

/// Color palette.
pub struct Theme;

impl Theme {
    pub const BG: Color = Color::Reset;
    pub const HEADER_BG: Color = Color::Blue;
    pub const SELECTED_BG: Color = Color::DarkGray;

    pub const FG: Color = Color::White;
    pub const FG_DIM: Color = Color::DarkGray;
    pub const HEADER_FG: Color = Color::White;

    pub const FOCUS: Color = Color::Cyan;
    pub const WARNING: Color = Color::Yellow;
    pub const ERROR: Color = Color::Red;
}

/// Pre-defined styles.
pub struct Styles;

impl Styles {
    /// Default text style.
    pub fn default() -> Style {
        Style::default().fg(Theme::FG).bg(Theme::BG)
    }

    /// Header bar style.
    pub fn header() -> Style {
        Style::default()
            .fg(Theme::HEADER_FG)
            .bg(Theme::HEADER_BG)
            .add_modifier(Modifier::BOLD)
    }

    /// Selected row style.
    pub fn selected() -> Style {
        Style::default()
            .bg(Theme::SELECTED_BG)
            .add_modifier(Modifier::BOLD)
    }

    /// Table header style.
    pub fn table_header() -> Style {
        Style::default()
            .fg(Theme::HEADER_FG)
            .bg(Theme::HEADER_BG)
            .add_modifier(Modifier::BOLD)
    }

    /// Header cell under the column cursor.
    pub fn column_cursor() -> Style {
        Style::default()
            .fg(Color::Black)
            .bg(Theme::FOCUS)
            .add_modifier(Modifier::BOLD)
    }

    /// Border of the focused pane.
    pub fn focused_border() -> Style {
        Style::default().fg(Theme::FOCUS)
    }

    pub fn unfocused_border() -> Style {
        Style::default().fg(Theme::FG_DIM)
    }

    /// Dimmed text style.
    pub fn dim() -> Style {
        Style::default().fg(Theme::FG_DIM)
    }

    pub fn warning() -> Style {
        Style::default().fg(Theme::WARNING)
    }

    pub fn error() -> Style {
        Style::default()
            .fg(Theme::ERROR)
            .add_modifier(Modifier::BOLD)
    }

    /// Filter input style.
    pub fn filter_input() -> Style {
        Style::default()
            .fg(Theme::FG)
            .add_modifier(Modifier::UNDERLINED)
    }

    /// Section header style for popups.
    pub fn section_header() -> Style {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    }

    /// Field name in key-value popups.
    pub fn field_name() -> Style {
        Style::default().fg(Theme::FOCUS)
    }

    /// Help text style.
    pub fn help() -> Style {
        Style::default().fg(Theme::FG_DIM)
    }

    /// Help key style (highlighted keys in help line).
    pub fn help_key() -> Style {
        Style::default().fg(Theme::FG).add_modifier(Modifier::BOLD)
    }

    /// Maps a UI-agnostic [`BadgeClass`] to a ratatui [`Style`].
    pub fn badge(class: BadgeClass) -> Style {
        let color = match class {
            BadgeClass::Text => Color::Blue,
            BadgeClass::Number => Color::Green,
            BadgeClass::Boolean => Color::Yellow,
            BadgeClass::Null => Color::Red,
            BadgeClass::Structured => Color::Magenta,
            BadgeClass::Generic => Color::Gray,
        };
        Style::default().fg(color).add_modifier(Modifier::DIM)
    }
}

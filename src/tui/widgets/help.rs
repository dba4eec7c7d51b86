//! Help popup widget.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};

use crate::tui::style::Styles;
use crate::view::BadgeClass;

use super::popup::{hints, render_popup_frame, section};

const NAVIGATION: &[(&str, &str)] = &[
    ("Tab", "switch focus between kinds and table"),
    ("↑/↓ j/k", "move selection"),
    ("PgUp/PgDn", "move by 20 rows"),
    ("Home/End", "first / last row"),
    ("Enter", "kinds: open kind / table: sort by column"),
    ("/", "filter kinds"),
];

const TABLE: &[(&str, &str)] = &[
    ("←/→ h/l", "move column cursor"),
    ("s", "sort by column (asc, then toggles asc/desc)"),
    ("n ]", "next page (fetches when on the last page)"),
    ("p [", "previous page"),
    ("g / G", "first / last fetched page"),
    ("d", "record detail"),
    ("c", "show / hide columns"),
];

const GENERAL: &[(&str, &str)] = &[
    ("r", "retry failed request, or reload kind"),
    ("y", "show shareable location"),
    ("o", "open a location"),
    ("?", "this help"),
    ("q", "quit (prints the location)"),
    ("Ctrl-C", "quit immediately"),
];

/// Renders the help popup centered on screen with scroll support.
pub fn render_help(frame: &mut Frame, area: Rect, scroll: &mut usize) {
    let footer = hints(&[("↑/↓", "scroll"), ("?/Esc", "close")]);
    render_popup_frame(frame, area, "Help", help_content(), scroll, footer);
}

fn help_content() -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (title, table) in [("Navigation", NAVIGATION), ("Table", TABLE), ("General", GENERAL)] {
        lines.push(section(title));
        for (key, text) in table {
            lines.push(Line::from(vec![
                Span::styled(format!("{:>12}  ", key), Styles::help_key()),
                Span::raw(*text),
            ]));
        }
        lines.push(Line::from(""));
    }

    lines.push(section("Type badges"));
    for (label, text, class) in [
        ("S", "string", BadgeClass::Text),
        ("N", "int64", BadgeClass::Number),
        ("B", "bool", BadgeClass::Boolean),
        ("N", "nil", BadgeClass::Null),
        ("T", "time", BadgeClass::Structured),
        ("A", "list", BadgeClass::Structured),
    ] {
        lines.push(Line::from(vec![
            Span::styled(format!("{:>12}  ", label), Styles::badge(class)),
            Span::raw(text),
        ]));
    }
    lines.push(Line::from(Span::styled(
        "Other types show their raw type name. Missing values show '-'.",
        Styles::help(),
    )));
    lines
}

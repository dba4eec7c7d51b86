//! Record detail popup: every property of one record, untruncated.

use chrono::{DateTime, FixedOffset, Local};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};

use crate::model::{Record, ValueKind};
use crate::tui::style::Styles;
use crate::view::{Badge, infer_columns, render_cell};

use super::popup::{hints, render_popup_frame, section};

pub fn render_detail(frame: &mut Frame, area: Rect, record: Option<&Record>, scroll: &mut usize) {
    let footer = hints(&[("↑/↓", "scroll"), ("PgUp/PgDn", "page"), ("Esc", "close")]);
    let Some(record) = record else {
        render_popup_frame(
            frame,
            area,
            "Record",
            vec![Line::from("Record is no longer on screen")],
            scroll,
            footer,
        );
        return;
    };
    let title = match record.key() {
        Some(key) => format!("Record {key}"),
        None => "Record".to_string(),
    };
    render_popup_frame(frame, area, &title, build_content(record), scroll, footer);
}

fn build_content(record: &Record) -> Vec<Line<'static>> {
    let columns = infer_columns(std::slice::from_ref(record));
    let name_width = columns.iter().map(|c| c.chars().count()).max().unwrap_or(0);

    let mut lines = vec![section("Properties")];
    for column in &columns {
        let cell = render_cell(record, column);
        let mut spans = vec![
            Span::styled(format!("{:>name_width$}: ", column), Styles::field_name()),
            Span::raw(cell.full_text.clone()),
        ];
        if let Some(badge) = &cell.badge {
            spans.push(Span::raw(" "));
            spans.push(Span::styled(badge.label.clone(), Styles::badge(badge.class)));
        }
        lines.push(Line::from(spans));

        let Some(prop) = record.get(column) else {
            continue;
        };
        let pad = " ".repeat(name_width + 2);
        let mut notes = Vec::new();
        if !prop.kind.is_known() && !prop.kind.as_wire().is_empty() {
            notes.push(format!("type {}", prop.kind));
        }
        if prop.kind == ValueKind::Time
            && let Some(t) = parse_time_value(&prop.value)
        {
            let local = t.with_timezone(&Local);
            notes.push(format!("local {}", local.format("%Y-%m-%d %H:%M:%S %Z")));
        }
        if !prop.indexed {
            notes.push("not indexed".to_string());
        }
        if !notes.is_empty() {
            lines.push(Line::from(Span::styled(
                format!("{pad}{}", notes.join(", ")),
                Styles::help(),
            )));
        }
    }

    lines.push(Line::from(""));
    lines.push(section("Types"));
    let mut legend = Vec::new();
    for kind in [
        ValueKind::String,
        ValueKind::Int64,
        ValueKind::Bool,
        ValueKind::Null,
        ValueKind::Time,
        ValueKind::List,
    ] {
        let badge = Badge::for_kind(&kind);
        legend.push(Span::styled(badge.label, Styles::badge(badge.class)));
        legend.push(Span::styled(format!(" {}  ", kind), Styles::help()));
    }
    lines.push(Line::from(legend));
    lines
}

/// Parses a time value as RFC 3339 or in Go's default `time.Time` layout
/// (`2006-01-02 15:04:05.999999999 -0700 MST`, optional monotonic suffix).
pub fn parse_time_value(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
        return Some(t);
    }
    let raw = raw.split(" m=").next().unwrap_or(raw);
    let mut parts: Vec<&str> = raw.split_whitespace().collect();
    if parts.len() == 4 && parts[3].chars().all(|c| c.is_ascii_alphabetic()) {
        parts.pop();
    }
    if parts.len() != 3 {
        return None;
    }
    DateTime::parse_from_str(&parts.join(" "), "%Y-%m-%d %H:%M:%S%.f %z").ok()
}

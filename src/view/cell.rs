//! Cell rendering and type badges.

use crate::model::{Record, ValueKind};

/// Placeholder shown for absent or empty values.
pub const EMPTY_CELL: &str = "-";

const ELLIPSIS: char = '…';

/// Colour class of a type badge (TUI maps it to a ratatui colour).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeClass {
    /// string (TUI: blue).
    Text,
    /// int64 (TUI: green).
    Number,
    /// bool (TUI: yellow).
    Boolean,
    /// nil (TUI: red).
    Null,
    /// time and list values (TUI: magenta).
    Structured,
    /// Unknown type, raw type string shown.
    Generic,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub label: String,
    pub class: BadgeClass,
}

impl Badge {
    pub fn for_kind(kind: &ValueKind) -> Self {
        let (label, class) = match kind {
            ValueKind::String => ("S", BadgeClass::Text),
            ValueKind::Int64 => ("N", BadgeClass::Number),
            ValueKind::Bool => ("B", BadgeClass::Boolean),
            ValueKind::Null => ("N", BadgeClass::Null),
            ValueKind::Time => ("T", BadgeClass::Structured),
            ValueKind::List => ("A", BadgeClass::Structured),
            ValueKind::Other(raw) => (raw.as_str(), BadgeClass::Generic),
        };
        Self {
            label: label.to_string(),
            class,
        }
    }

    /// Display width including the separating space.
    pub fn width(&self) -> usize {
        self.label.chars().count() + 1
    }
}

/// One rendered table cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellView {
    /// Text to show in the cell (truncated by the frontend).
    pub text: String,
    /// Untruncated value for the detail popup.
    pub full_text: String,
    pub badge: Option<Badge>,
}

impl CellView {
    pub fn empty() -> Self {
        Self {
            text: EMPTY_CELL.to_string(),
            full_text: EMPTY_CELL.to_string(),
            badge: None,
        }
    }

    /// Width needed to show the cell without truncation.
    pub fn width(&self) -> usize {
        self.text.chars().count() + self.badge.as_ref().map_or(0, Badge::width)
    }
}

/// Renders `field` of `record`.
///
/// Absent fields and empty values render as [`EMPTY_CELL`] without a badge;
/// everything else shows the raw value verbatim with its type badge. A
/// property without a type gets no badge.
pub fn render_cell(record: &Record, field: &str) -> CellView {
    match record.get(field) {
        Some(prop) if !prop.value.is_empty() => CellView {
            text: prop.value.clone(),
            full_text: prop.value.clone(),
            badge: (!prop.kind.as_wire().is_empty()).then(|| Badge::for_kind(&prop.kind)),
        },
        _ => CellView::empty(),
    }
}

/// Fits `text` into `width` terminal columns, ending with an ellipsis when
/// cut. Control characters are flattened to spaces.
pub fn truncate_display(text: &str, width: usize) -> String {
    let flat = text.chars().map(|c| if c.is_control() { ' ' } else { c });
    if text.chars().count() <= width {
        return flat.collect();
    }
    if width == 0 {
        return String::new();
    }
    let mut out: String = flat.take(width - 1).collect();
    out.push(ELLIPSIS);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Property;

    fn record() -> Record {
        Record::new()
            .with(Property::new("name", "Ada", ValueKind::String))
            .with(Property::new("age", "36", ValueKind::Int64))
            .with(Property::new("nickname", "", ValueKind::String))
            .with(Property::new("score", "1.5", ValueKind::parse("float64")))
    }

    #[test]
    fn badge_table() {
        let cases = [
            ("string", "S", BadgeClass::Text),
            ("int64", "N", BadgeClass::Number),
            ("bool", "B", BadgeClass::Boolean),
            ("<nil>", "N", BadgeClass::Null),
            ("time.Time", "T", BadgeClass::Structured),
            ("[]interface {}", "A", BadgeClass::Structured),
            ("*datastore.Key", "*datastore.Key", BadgeClass::Generic),
        ];
        for (wire, label, class) in cases {
            let badge = Badge::for_kind(&ValueKind::parse(wire));
            assert_eq!(badge.label, label, "{wire}");
            assert_eq!(badge.class, class, "{wire}");
        }
    }

    #[test]
    fn present_value_is_verbatim_with_badge() {
        let cell = render_cell(&record(), "age");
        assert_eq!(cell.text, "36");
        assert_eq!(cell.badge.unwrap().label, "N");
    }

    #[test]
    fn unknown_type_shows_raw_type() {
        let cell = render_cell(&record(), "score");
        assert_eq!(cell.badge.unwrap().label, "float64");
    }

    #[test]
    fn untyped_value_has_no_badge() {
        let record = Record::new().with(Property::new("note", "hello", ValueKind::parse("")));
        let cell = render_cell(&record, "note");
        assert_eq!(cell.text, "hello");
        assert_eq!(cell.badge, None);
        assert_eq!(cell.width(), 5);
    }

    #[test]
    fn missing_and_empty_values_render_placeholder() {
        for field in ["nickname", "email"] {
            let cell = render_cell(&record(), field);
            assert_eq!(cell.text, EMPTY_CELL);
            assert!(cell.badge.is_none());
        }
    }

    #[test]
    fn truncation() {
        assert_eq!(truncate_display("hello", 10), "hello");
        assert_eq!(truncate_display("hello", 5), "hello");
        assert_eq!(truncate_display("hello world", 6), "hello…");
        assert_eq!(truncate_display("hello", 0), "");
        assert_eq!(truncate_display("a\nb", 5), "a b");
        assert_eq!(truncate_display("привет мир", 4), "при…");
    }
}

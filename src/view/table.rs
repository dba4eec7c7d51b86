//! Entity table view model.

use std::collections::BTreeSet;

use crate::browser::{Browser, SortDirection};

use super::cell::{CellView, render_cell};
use super::columns::infer_columns;

const MIN_COLUMN_WIDTH: usize = 3;
const MAX_COLUMN_WIDTH: usize = 40;

/// Columns hidden by the user, remembered for one kind at a time.
#[derive(Debug, Clone, Default)]
pub struct ColumnVisibility {
    kind: Option<String>,
    hidden: BTreeSet<String>,
}

impl ColumnVisibility {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets hidden columns when the kind changes.
    pub fn sync_kind(&mut self, kind: Option<&str>) {
        if self.kind.as_deref() != kind {
            self.kind = kind.map(str::to_string);
            self.hidden.clear();
        }
    }

    pub fn toggle(&mut self, column: &str) {
        if !self.hidden.remove(column) {
            self.hidden.insert(column.to_string());
        }
    }

    pub fn is_visible(&self, column: &str) -> bool {
        !self.hidden.contains(column)
    }

    pub fn hidden_count(&self) -> usize {
        self.hidden.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnHeader {
    pub name: String,
    /// Direction when this column is the active sort.
    pub sort: Option<SortDirection>,
}

impl ColumnHeader {
    pub fn label(&self) -> String {
        match self.sort {
            Some(direction) => format!("{}{}", self.name, direction.indicator()),
            None => self.name.clone(),
        }
    }
}

/// Pager footer state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PagerView {
    pub page_label: String,
    pub can_prev: bool,
    pub can_next: bool,
    /// A next-page fetch is in flight.
    pub busy: bool,
    /// Last next-page fetch failed.
    pub error: Option<String>,
}

/// Complete table ready to be rendered by any frontend.
#[derive(Debug, Clone, Default)]
pub struct TableView {
    pub title: String,
    /// Visible columns, in display order.
    pub columns: Vec<ColumnHeader>,
    /// Every inferred column, hidden ones included.
    pub all_columns: Vec<String>,
    pub rows: Vec<Vec<CellView>>,
    pub widths: Vec<u16>,
    pub pager: PagerView,
}

impl TableView {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Builds the table for the page currently shown by `browser`.
pub fn build_table_view(browser: &Browser, visibility: &ColumnVisibility) -> TableView {
    let kind = browser.selected_kind().unwrap_or("entities");
    let paginator = browser.paginator();
    let pager = PagerView {
        page_label: if paginator.page_count() == 0 {
            String::new()
        } else {
            format!("page {}/{}", paginator.index() + 1, paginator.page_count())
        },
        can_prev: paginator.can_prev(),
        can_next: paginator.can_next(),
        busy: paginator.is_busy(),
        error: paginator.error().map(str::to_string),
    };

    let Some(page) = browser.current_page() else {
        return TableView {
            title: format!(" {} ", kind),
            pager,
            ..TableView::default()
        };
    };

    let all_columns = infer_columns(&page.entities);
    let sort = browser.sort();
    let columns: Vec<ColumnHeader> = all_columns
        .iter()
        .filter(|name| visibility.is_visible(name))
        .map(|name| ColumnHeader {
            name: name.clone(),
            sort: sort.direction_of(name),
        })
        .collect();

    let rows: Vec<Vec<CellView>> = page
        .entities
        .iter()
        .map(|record| {
            columns
                .iter()
                .map(|column| render_cell(record, &column.name))
                .collect()
        })
        .collect();

    let widths = columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            let header = column.name.chars().count() + 1;
            let content = rows.iter().map(|row| row[i].width()).max().unwrap_or(0);
            header.max(content).clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH) as u16
        })
        .collect();

    TableView {
        title: format!(" {} · page {} ", kind, paginator.index() + 1),
        columns,
        all_columns,
        rows,
        widths,
        pager,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::{FetchRequest, FetchResult, Location};
    use crate::model::{EntitiesPage, KEY_FIELD, Property, Record, ValueKind};

    fn loaded(records: Vec<Record>, cursor: Option<&str>) -> Browser {
        let mut browser = Browser::new(50);
        let req = browser.start(Location::default());
        let first = browser
            .apply(FetchResult::Kinds {
                id: req.id(),
                result: Ok(vec!["user".to_string()]),
            })
            .unwrap();
        let FetchRequest::Page { id, key, purpose, .. } = first else {
            panic!("expected page request");
        };
        browser.apply(FetchResult::Page {
            id,
            key,
            purpose,
            result: Ok(EntitiesPage::new(records, cursor.map(str::to_string))),
        });
        browser
    }

    fn records() -> Vec<Record> {
        vec![
            Record::new()
                .with(Property::new(KEY_FIELD, "u1", ValueKind::String))
                .with(Property::new("name", "Ada Lovelace", ValueKind::String)),
            Record::new()
                .with(Property::new(KEY_FIELD, "u2", ValueKind::String))
                .with(Property::new("age", "36", ValueKind::Int64)),
        ]
    }

    #[test]
    fn rows_follow_inferred_columns() {
        let browser = loaded(records(), Some("c1"));
        let view = build_table_view(&browser, &ColumnVisibility::new());
        let names: Vec<_> = view.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["key", "age", "name"]);
        assert_eq!(view.rows.len(), 2);
        assert_eq!(view.rows[0][1].text, "-");
        assert_eq!(view.rows[1][1].text, "36");
        assert_eq!(view.title, " user · page 1 ");
        assert_eq!(view.pager.page_label, "page 1/1");
        assert!(view.pager.can_next);
        assert!(!view.pager.can_prev);
    }

    #[test]
    fn widths_fit_content_and_badges() {
        let browser = loaded(records(), None);
        let view = build_table_view(&browser, &ColumnVisibility::new());
        // "Ada Lovelace" (12) + " S" badge.
        assert_eq!(view.widths[2], 14);
        // "u1" + badge is shorter than "key" + indicator slot.
        assert_eq!(view.widths[0], 4);
    }

    #[test]
    fn hidden_columns_are_skipped_but_listed() {
        let browser = loaded(records(), None);
        let mut visibility = ColumnVisibility::new();
        visibility.sync_kind(Some("user"));
        visibility.toggle("age");
        let view = build_table_view(&browser, &visibility);
        assert_eq!(view.columns.len(), 2);
        assert_eq!(view.all_columns.len(), 3);
        assert_eq!(view.rows[0].len(), 2);
    }

    #[test]
    fn visibility_resets_on_kind_change() {
        let mut visibility = ColumnVisibility::new();
        visibility.sync_kind(Some("user"));
        visibility.toggle("age");
        visibility.sync_kind(Some("user"));
        assert!(!visibility.is_visible("age"));
        visibility.sync_kind(Some("order"));
        assert!(visibility.is_visible("age"));
        assert_eq!(visibility.hidden_count(), 0);
    }

    #[test]
    fn active_sort_marks_its_header() {
        let mut browser = loaded(records(), None);
        let (_, request) = browser.sort_by("age");
        let Some(FetchRequest::Page { id, key, purpose, .. }) = request else {
            panic!("expected page request");
        };
        browser.apply(FetchResult::Page {
            id,
            key,
            purpose,
            result: Ok(EntitiesPage::new(records(), None)),
        });

        let view = build_table_view(&browser, &ColumnVisibility::new());
        let age = view.columns.iter().find(|c| c.name == "age").unwrap();
        assert_eq!(age.sort, Some(SortDirection::Ascending));
        assert_eq!(age.label(), "age▲");
        let unsorted: Vec<String> = view
            .columns
            .iter()
            .filter(|c| c.name != "age")
            .map(ColumnHeader::label)
            .collect();
        assert_eq!(unsorted, vec!["key", "name"]);
    }

    #[test]
    fn no_page_yields_empty_view() {
        let browser = Browser::new(50);
        let view = build_table_view(&browser, &ColumnVisibility::new());
        assert!(view.is_empty());
        assert!(view.columns.is_empty());
        assert!(view.pager.page_label.is_empty());
    }
}

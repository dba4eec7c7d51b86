//! UI-agnostic view models.
//!
//! Everything here turns browser state into plain presentation data (text,
//! badge classes, widths). The TUI maps these types to ratatui styles and
//! widgets; nothing in this module depends on a rendering framework.

pub mod cell;
pub mod columns;
pub mod table;

pub use cell::{Badge, BadgeClass, CellView, EMPTY_CELL, render_cell, truncate_display};
pub use columns::infer_columns;
pub use table::{ColumnHeader, ColumnVisibility, PagerView, TableView, build_table_view};

//! TUI widgets for kindview.

mod columns;
mod detail;
mod header;
mod help;
mod kinds;
mod location_input;
mod message;
mod pager;
pub mod popup;
mod quit_confirm;
mod table;

pub use columns::render_columns;
pub use detail::{parse_time_value, render_detail};
pub use header::render_header;
pub use help::render_help;
pub use kinds::render_kinds;
pub use location_input::render_location_input;
pub use pager::render_pager;
pub use quit_confirm::render_quit_confirm;
pub use table::render_table;

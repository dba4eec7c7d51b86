//! Terminal User Interface for kindview.
//!
//! Kind sidebar, entity table and pager on top of [`crate::browser::Browser`].
//! Network I/O happens on the fetch worker; the UI thread only applies
//! results as they arrive through the event channel.

mod app;
mod event;
mod input;
mod navigable;
mod render;
mod state;
mod style;
mod widgets;

pub use app::App;
pub use state::{AppState, Focus, InputMode, PopupState};
pub use widgets::parse_time_value;

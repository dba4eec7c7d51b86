//! kindview - terminal browser for schema-less entity backends.
//!
//! The library holds everything except argument parsing:
//! - `model` / `client` - wire types and data sources (HTTP, in-memory)
//! - `browser` - kind selection, sort, pagination and location state
//! - `view` - UI-agnostic table view model
//! - `tui` - interactive terminal frontend

pub mod browser;
pub mod client;
pub mod config;
pub mod fetch;
pub mod model;
pub mod tui;
pub mod view;

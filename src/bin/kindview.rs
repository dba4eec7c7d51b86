//! kindview - interactive terminal browser for entity kinds.
//!
//! Usage:
//!   kindview                                   # browse http://localhost:8080
//!   kindview --base-url http://api:8080        # another backend
//!   kindview --location '/?kind=order&sortKey=createdAt&sortDirection=desc'
//!   kindview --demo                            # built-in sample data
//!
//! On exit the final location is printed so the view can be reopened.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use kindview::browser::Location;
use kindview::client::{DEFAULT_LIMIT, DataSource, HttpDataSource, MockDataSource};
use kindview::config::{Config, DEFAULT_BASE_URL};
use kindview::tui::App;

/// Terminal browser for schema-less entity kinds.
#[derive(Parser)]
#[command(name = "kindview", version, about = "Entity kind browser")]
struct Args {
    /// Base URL of the entity API.
    #[arg(long, env = "KINDVIEW_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Initial location, e.g. '/?kind=order&sortKey=createdAt&sortDirection=asc'.
    /// A full URL or a bare query string works too.
    #[arg(short, long, env = "KINDVIEW_LOCATION", value_name = "LOCATION")]
    location: Option<String>,

    /// Records per page.
    #[arg(long, env = "KINDVIEW_LIMIT", default_value_t = DEFAULT_LIMIT)]
    limit: usize,

    /// Request timeout in seconds.
    #[arg(long, env = "KINDVIEW_TIMEOUT", default_value_t = 30)]
    timeout: u64,

    /// UI tick interval in milliseconds.
    #[arg(long, default_value_t = 250)]
    tick_ms: u64,

    /// Write logs to this file (RUST_LOG controls the level).
    #[arg(long, env = "KINDVIEW_LOG_FILE", value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Browse built-in sample data instead of a backend.
    #[arg(long)]
    demo: bool,
}

impl Args {
    fn into_config(self) -> Config {
        Config {
            base_url: self.base_url,
            location: self
                .location
                .as_deref()
                .map(Location::parse)
                .unwrap_or_default(),
            limit: self.limit,
            timeout: Duration::from_secs(self.timeout),
            tick_rate: Duration::from_millis(self.tick_ms),
            log_file: self.log_file,
            demo: self.demo,
        }
    }
}

fn main() {
    let config = Args::parse().into_config();

    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    match config.open_log_file() {
        Ok(Some(file)) => {
            let filter = EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("kindview=info"));
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_target(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        // The terminal belongs to the TUI; without a file logs are dropped.
        Ok(None) => {}
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }

    let source: Arc<dyn DataSource> = if config.demo {
        Arc::new(MockDataSource::demo())
    } else {
        match HttpDataSource::new(&config.base_url, config.timeout) {
            Ok(source) => Arc::new(source),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    };

    let app = App::new(source, config.limit, config.location);
    match app.run(config.tick_rate) {
        Ok(location) => println!("{}", location),
        Err(e) => {
            eprintln!("Error running TUI: {}", e);
            std::process::exit(1);
        }
    }
}

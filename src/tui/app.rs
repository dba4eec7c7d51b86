//! Main TUI application.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::{debug, info};

use crate::browser::{Browser, FetchRequest, FetchResult, Location, SortSpec};
use crate::client::DataSource;
use crate::fetch::FetchWorker;
use crate::view::build_table_view;

use super::event::{Event, EventHandler};
use super::input::{KeyAction, handle_key};
use super::render::render;
use super::state::{AppState, Focus};

/// What identifies the page on screen; a change resets the row cursor.
#[derive(Debug, PartialEq, Eq)]
struct PageMarker {
    kind: Option<String>,
    sort: Option<SortSpec>,
    index: usize,
    ready: bool,
}

impl PageMarker {
    fn of(browser: &Browser) -> Self {
        Self {
            kind: browser.selected_kind().map(str::to_string),
            sort: browser.sort().active().cloned(),
            index: browser.paginator().index(),
            ready: browser.current_page().is_some(),
        }
    }
}

/// Main TUI application.
pub struct App {
    source: Arc<dyn DataSource>,
    browser: Browser,
    state: AppState,
    initial: Location,
    should_quit: bool,
}

impl App {
    pub fn new(source: Arc<dyn DataSource>, limit: usize, initial: Location) -> Self {
        let state = AppState::new(source.describe());
        Self {
            source,
            browser: Browser::new(limit),
            state,
            initial,
            should_quit: false,
        }
    }

    /// Runs the TUI until the user quits. Returns the final location.
    pub fn run(mut self, tick_rate: Duration) -> io::Result<Location> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let events = EventHandler::new(tick_rate);
        let fetched_tx = events.sender();
        let worker = FetchWorker::spawn(Arc::clone(&self.source), move |result| {
            fetched_tx.send(Event::Fetched(result)).is_ok()
        })?;

        if let Ok(size) = terminal.size() {
            self.state.terminal_width = size.width;
        }

        info!(source = %self.source.describe(), location = %self.initial, "starting");
        let first = self.browser.start(std::mem::take(&mut self.initial));
        worker.submit(first);

        let result = self.event_loop(&mut terminal, &events, &worker);

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result?;
        Ok(self.browser.location())
    }

    fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        events: &EventHandler,
        worker: &FetchWorker,
    ) -> io::Result<()> {
        loop {
            let view = build_table_view(&self.browser, &self.state.visibility);
            terminal.draw(|frame| render(frame, &mut self.state, &self.browser, &view))?;

            match events.next() {
                Ok(Event::Tick) => {
                    self.state.tick = self.state.tick.wrapping_add(1);
                }
                Ok(Event::Key(key)) => {
                    let action = handle_key(&mut self.state, &self.browser, &view, key);
                    self.dispatch(action, worker);
                }
                Ok(Event::Resize(width)) => {
                    self.state.terminal_width = width;
                }
                Ok(Event::Fetched(result)) => self.on_fetched(result, worker),
                Err(_) => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                return Ok(());
            }
        }
    }

    fn dispatch(&mut self, action: KeyAction, worker: &FetchWorker) {
        match action {
            KeyAction::None => {}
            KeyAction::Quit => self.should_quit = true,
            KeyAction::SelectKind(kind) => {
                self.update(worker, |b| b.select_kind(&kind));
                self.state.focus = Focus::Table;
            }
            KeyAction::SortBy(field) => {
                let mut spec = None;
                self.update(worker, |b| {
                    let (applied, request) = b.sort_by(&field);
                    spec = applied;
                    request
                });
                if let Some(spec) = spec {
                    self.state
                        .set_status(format!("sorted by {} {}", spec.field, spec.direction));
                }
            }
            KeyAction::NextPage => {
                let paginator = self.browser.paginator();
                if paginator.is_busy() {
                    self.state.set_status("Next page is loading");
                } else if !paginator.can_next() && paginator.page_count() > 0 {
                    self.state.set_status("No more pages");
                }
                self.update(worker, Browser::next_page);
            }
            KeyAction::PrevPage => {
                self.update(worker, |b| {
                    b.prev_page();
                    None
                });
            }
            KeyAction::FirstPage => {
                self.update(worker, |b| {
                    b.first_page();
                    None
                });
            }
            KeyAction::LastPage => {
                self.update(worker, |b| {
                    b.last_fetched_page();
                    None
                });
            }
            KeyAction::Reload => {
                self.state.status_message = None;
                if self.browser.has_error() {
                    self.update(worker, Browser::retry);
                } else {
                    self.update(worker, Browser::reload);
                }
            }
            KeyAction::OpenLocation(input) => {
                let location = Location::parse(&input);
                let known = location
                    .kind
                    .as_deref()
                    .map(|kind| self.browser.selector().contains(kind));
                match known {
                    None => self.state.set_status("Location has no kind"),
                    Some(false) => {
                        let kind = location.kind.unwrap_or_default();
                        self.state.set_status(format!("Unknown kind: {kind}"));
                    }
                    Some(true) => self.update(worker, |b| b.restore(location)),
                }
            }
        }
    }

    fn on_fetched(&mut self, result: FetchResult, worker: &FetchWorker) {
        let ok = match &result {
            FetchResult::Kinds { result, .. } => result.is_ok(),
            FetchResult::Page { result, .. } => result.is_ok(),
        };
        if ok {
            self.state.last_fetch = Some(Local::now());
        }
        self.update(worker, |b| b.apply(result));
        self.state.sync_kind_cursor(&self.browser);
    }

    /// Runs a browser transition, submits its request and resets the table
    /// cursor when a different page ends up on screen.
    fn update<F>(&mut self, worker: &FetchWorker, f: F)
    where
        F: FnOnce(&mut Browser) -> Option<FetchRequest>,
    {
        let before = PageMarker::of(&self.browser);
        if let Some(request) = f(&mut self.browser) {
            debug!(id = request.id(), "submitting fetch");
            if !worker.submit(request) {
                self.state.set_status("Fetch worker stopped");
            }
        }
        if PageMarker::of(&self.browser) != before {
            self.state.on_page_changed(&self.browser);
        }
    }
}

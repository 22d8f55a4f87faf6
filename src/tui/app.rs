use std::io;
use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Local};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::io::config_io::read_config;
use crate::io::kv_store::{FileStore, KeyValueStore};
use crate::io::lock::WriterLock;
use crate::model::activity::{MAX_LANES, validate_label};
use crate::model::color::ColorSpec;
use crate::model::config::AppConfig;
use crate::model::month::YearMonth;
use crate::ops::check::check_activities;
use crate::ops::month_axis::{build_months, current_month_index};
use crate::ops::store::StoreError;
use crate::ops::timeline::resolve_cell;
use crate::ops::tracker::{Outcome, Tracker};

use super::input;
use super::render;
use super::theme::Theme;

/// Shown when every lane is taken
pub const NO_SLOTS_NOTICE: &str = "There are no slots available";

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    /// Typing the label of a new activity
    Prompt,
}

/// Main application state
pub struct App {
    pub tracker: Tracker<Box<dyn KeyValueStore>>,
    pub theme: Theme,
    /// Month columns, fixed for the session
    pub months: Vec<YearMonth>,
    /// Index of the first visible month
    pub scroll: usize,
    /// How many month columns fit, as of the last render
    pub visible_months: usize,
    /// Scroll so today's month is centered on the next render
    pub center_pending: bool,
    pub selected_lane: u32,
    pub mode: Mode,
    /// Label prompt buffer
    pub input: String,
    /// Blocking message; any key dismisses it
    pub notice: Option<String>,
    /// One-line message in the status row, cleared by the next key
    pub status: Option<String>,
    /// Integrity findings from startup
    pub check_findings: usize,
    pub show_key_hints: bool,
    pub should_quit: bool,
    pinned_now: Option<DateTime<Local>>,
}

impl App {
    pub fn new(
        tracker: Tracker<Box<dyn KeyValueStore>>,
        config: &AppConfig,
        check_findings: usize,
    ) -> Self {
        let months = build_months(&Local::now());
        App {
            tracker,
            theme: Theme::from_config(&config.ui),
            months,
            scroll: 0,
            visible_months: 1,
            center_pending: true,
            selected_lane: 1,
            mode: Mode::Navigate,
            input: String::new(),
            notice: None,
            status: None,
            check_findings,
            show_key_hints: config.ui.show_key_hints,
            should_quit: false,
            pinned_now: None,
        }
    }

    /// Freeze the clock at `now` (month columns are rebuilt around it)
    pub fn with_clock(mut self, now: DateTime<Local>) -> Self {
        self.months = build_months(&now);
        self.pinned_now = Some(now);
        self
    }

    pub fn now(&self) -> DateTime<Local> {
        self.pinned_now.unwrap_or_else(Local::now)
    }

    pub fn current_month(&self) -> YearMonth {
        YearMonth::of(&self.now())
    }

    fn max_scroll(&self) -> usize {
        self.months.len().saturating_sub(self.visible_months.max(1))
    }

    /// Fit the scroll position to `visible` columns, centering today if requested
    pub fn fit_columns(&mut self, visible: usize) {
        self.visible_months = visible.max(1);
        if self.center_pending {
            let now = self.now();
            if let Some(idx) = current_month_index(&self.months, &now) {
                self.scroll = idx.saturating_sub(self.visible_months / 2);
            }
            self.center_pending = false;
        }
        self.scroll = self.scroll.min(self.max_scroll());
    }

    pub fn scroll_by(&mut self, delta: isize) {
        self.scroll = self.scroll.saturating_add_signed(delta).min(self.max_scroll());
    }

    pub fn scroll_page(&mut self, forward: bool) {
        let page = self.visible_months.max(1) as isize;
        self.scroll_by(if forward { page } else { -page });
    }

    pub fn move_lane(&mut self, delta: i32) {
        self.selected_lane = self
            .selected_lane
            .saturating_add_signed(delta)
            .clamp(1, MAX_LANES);
    }

    // -----------------------------------------------------------------------
    // Add flow
    // -----------------------------------------------------------------------

    pub fn open_prompt(&mut self) {
        self.input.clear();
        self.mode = Mode::Prompt;
    }

    pub fn cancel_prompt(&mut self) {
        self.input.clear();
        self.mode = Mode::Navigate;
    }

    /// Create an activity from the prompt buffer. An empty label just
    /// closes the prompt.
    pub fn submit_prompt(&mut self) {
        let raw = std::mem::take(&mut self.input);
        self.mode = Mode::Navigate;
        if validate_label(&raw).is_err() {
            tracing::debug!("empty label, add aborted");
            return;
        }

        let now = self.now();
        let color = ColorSpec::random_pastel(&mut rand::rng());
        match self.tracker.add(&raw, color, &now) {
            Ok(outcome) => {
                self.selected_lane = outcome.lane;
                self.report_persistence(outcome);
            }
            Err(StoreError::Allocation(_)) => {
                self.notice = Some(NO_SLOTS_NOTICE.to_string());
            }
            Err(e) => self.status = Some(e.to_string()),
        }
    }

    // -----------------------------------------------------------------------
    // Finish flow
    // -----------------------------------------------------------------------

    /// Finish whatever offers a finish action on the selected lane this month
    pub fn finish_selected(&mut self) {
        let now = self.now();
        let cell = resolve_cell(
            self.selected_lane,
            YearMonth::of(&now),
            self.tracker.activities(),
            &now,
        );
        let target = match cell.occupant {
            Some(activity) if cell.show_finish => activity.id,
            _ => {
                self.status = Some(format!(
                    "Nothing to finish on lane {} this month",
                    self.selected_lane
                ));
                return;
            }
        };

        match self.tracker.finish(target, &now) {
            Ok(outcome) => self.report_persistence(outcome),
            Err(e) => self.status = Some(e.to_string()),
        }
    }

    fn report_persistence(&mut self, outcome: Outcome) {
        if let Some(e) = outcome.persist_error {
            self.status = Some(format!("Not saved: {e}"));
        }
    }
}

/// Load the (already created) data directory, then run the TUI until the user quits
pub fn run(data_dir: &Path, config_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = read_config(config_path)?;
    let _lock = WriterLock::acquire_default(data_dir)?;

    let store = FileStore::open(data_dir.join(&config.storage.file))?;
    tracing::info!(path = %store.path().display(), "opened activity store");
    let store: Box<dyn KeyValueStore> = Box::new(store);
    let tracker = Tracker::open(store, config.storage.key.clone());

    let check = check_activities(tracker.activities());
    for error in &check.errors {
        tracing::warn!(%error, "stored activities break a lane invariant");
    }
    for warning in &check.warnings {
        tracing::warn!(%warning, "questionable stored activity");
    }

    let mut app = App::new(tracker, &config, check.finding_count());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

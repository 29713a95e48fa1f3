//! TUI application state and event loop.
//!
//! The dashboard owns one [`DashboardSession`]. Every `refresh_rate` the loop
//! asks the session for a new reading (while live); `r` forces one
//! immediately. Refreshing is instantaneous, so it runs on the UI thread.

use std::io;
use std::path::PathBuf;
use std::panic::PanicHookInfo;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;

use aqiwatch_core::{DashboardSession, DashboardView, RandomSource, TILES_PER_ROW, Tile, tile_rows};

/// Fastest automatic refresh the `+` key allows.
pub const MIN_REFRESH_SECS: f64 = 0.5;

/// Slowest automatic refresh the `-` key allows.
pub const MAX_REFRESH_SECS: f64 = 60.0;

/// Halve the refresh interval, bounded below.
pub fn faster(secs: f64) -> f64 {
    (secs / 2.0).max(MIN_REFRESH_SECS)
}

/// Double the refresh interval, bounded above.
pub fn slower(secs: f64) -> f64 {
    (secs * 2.0).min(MAX_REFRESH_SECS)
}

pub type Session = DashboardSession<Box<dyn RandomSource>>;

type PanicHook = Box<dyn Fn(&PanicHookInfo<'_>) + Sync + Send + 'static>;

fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, crossterm::cursor::Show);
}

/// Panic hook that restores the terminal before delegating to the hook that
/// was installed before it. Dropping the guard puts that hook back.
struct TerminalPanicGuard {
    previous: Arc<PanicHook>,
}

impl TerminalPanicGuard {
    fn install() -> Self {
        let previous: Arc<PanicHook> = Arc::new(std::panic::take_hook());
        let chained = Arc::clone(&previous);
        std::panic::set_hook(Box::new(move |info| {
            restore_terminal();
            (**chained)(info);
        }));
        Self { previous }
    }
}

impl Drop for TerminalPanicGuard {
    fn drop(&mut self) {
        // set_hook panics while unwinding.
        if std::thread::panicking() {
            return;
        }
        let previous = Arc::clone(&self.previous);
        std::panic::set_hook(Box::new(move |info| (**previous)(info)));
    }
}

pub struct App {
    session: Session,
    refresh_rate: Duration,
    running: bool,
    last_export: Option<PathBuf>,
    last_error: Option<String>,
}

impl App {
    pub fn new(session: Session) -> Self {
        let refresh_rate = session.config().refresh_interval();
        Self {
            session,
            refresh_rate,
            running: true,
            last_export: None,
            last_error: None,
        }
    }

    pub fn run(&mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let panic_guard = TerminalPanicGuard::install();
        let result = self.run_loop(&mut terminal);
        drop(panic_guard);

        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            crossterm::cursor::Show
        )?;

        if let Some(path) = &self.last_export {
            println!("Last snapshot saved to {}", path.display());
        }

        result
    }

    fn run_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> io::Result<()> {
        let mut last_tick = Instant::now();

        while self.running {
            terminal.draw(|f| super::ui::draw(f, self))?;

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }

            if last_tick.elapsed() >= self.refresh_rate {
                if let Err(e) = self.session.tick() {
                    self.last_error = Some(e.to_string());
                }
                last_tick = Instant::now();
            }
        }

        Ok(())
    }

    pub fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char('r') | KeyCode::Char('R') | KeyCode::Char(' ') => self.refresh_now(),
            KeyCode::Char('p') => {
                self.session.toggle_live();
            }
            KeyCode::Char('s') => self.export_snapshot(),
            KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Char(']') => {
                let secs = faster(self.refresh_rate.as_secs_f64());
                self.refresh_rate = Duration::from_secs_f64(secs);
            }
            KeyCode::Char('-') | KeyCode::Char('[') => {
                let secs = slower(self.refresh_rate.as_secs_f64());
                self.refresh_rate = Duration::from_secs_f64(secs);
            }
            _ => {}
        }
    }

    fn refresh_now(&mut self) {
        match self.session.refresh() {
            Ok(_) => self.last_error = None,
            Err(e) => self.last_error = Some(e.to_string()),
        }
    }

    fn export_snapshot(&mut self) {
        let epoch = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        let path = PathBuf::from(format!("aqiwatch-snapshot-{epoch}.json"));

        let written = self
            .session
            .view()
            .map_err(|e| e.to_string())
            .and_then(|view| serde_json::to_string_pretty(&view).map_err(|e| e.to_string()))
            .and_then(|json| std::fs::write(&path, json).map_err(|e| e.to_string()));

        match written {
            Ok(()) => {
                log::info!("snapshot exported to {}", path.display());
                self.last_export = Some(path);
            }
            Err(e) => self.last_error = Some(format!("export failed: {e}")),
        }
    }

    // --- Accessors for the renderer ---

    pub fn view(&self) -> Option<DashboardView> {
        self.session.view().ok()
    }

    /// Window readings as tiles, four per row.
    pub fn tile_rows(&self) -> Vec<Vec<Tile>> {
        tile_rows(self.session.window(), TILES_PER_ROW)
    }

    pub fn refresh_rate_secs(&self) -> f64 {
        self.refresh_rate.as_secs_f64()
    }

    pub fn is_live(&self) -> bool {
        self.session.is_live()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn last_export(&self) -> Option<&PathBuf> {
        self.last_export.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aqiwatch_core::{DashboardConfig, ScriptedSource};

    fn app() -> App {
        let rng: Box<dyn RandomSource> = Box::new(ScriptedSource::constant(1));
        App::new(DashboardSession::start(DashboardConfig::default(), rng).unwrap())
    }

    #[test]
    fn refresh_rate_starts_from_config() {
        assert_eq!(app().refresh_rate_secs(), 10.0);
    }

    #[test]
    fn refresh_key_takes_a_reading() {
        let mut app = app();
        let before = app.view().unwrap().current;
        app.handle_key(KeyCode::Char('r'));
        let after = app.view().unwrap().current;
        assert_eq!(after.time, before.time + 1);
        assert_eq!(after.aqi, before.aqi + 1);
        assert_eq!(app.view().unwrap().samples.len(), 8);
    }

    #[test]
    fn pause_key_toggles_live() {
        let mut app = app();
        assert!(app.is_live());
        app.handle_key(KeyCode::Char('p'));
        assert!(!app.is_live());
        app.handle_key(KeyCode::Char('p'));
        assert!(app.is_live());
    }

    #[test]
    fn rate_keys_are_bounded() {
        let mut app = app();
        app.handle_key(KeyCode::Char('+'));
        assert_eq!(app.refresh_rate_secs(), 5.0);
        for _ in 0..10 {
            app.handle_key(KeyCode::Char('+'));
        }
        assert_eq!(app.refresh_rate_secs(), MIN_REFRESH_SECS);
        for _ in 0..20 {
            app.handle_key(KeyCode::Char('-'));
        }
        assert_eq!(app.refresh_rate_secs(), MAX_REFRESH_SECS);
    }

    #[test]
    fn quit_keys_stop_loop() {
        let mut app = app();
        app.handle_key(KeyCode::Char('x'));
        assert!(app.is_running());
        app.handle_key(KeyCode::Esc);
        assert!(!app.is_running());
    }

    #[test]
    fn tile_rows_group_the_window() {
        let rows = app().tile_rows();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.len() == TILES_PER_ROW));
        assert_eq!(rows[1][3].text, "140");
    }

    #[test]
    fn panic_guard_restores_previous_hook() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        static CALLS: AtomicUsize = AtomicUsize::new(0);

        std::panic::set_hook(Box::new(|_| {
            CALLS.fetch_add(1, Ordering::SeqCst);
        }));
        drop(TerminalPanicGuard::install());

        let result = std::panic::catch_unwind(|| panic!("after the dashboard exits"));
        assert!(result.is_err());
        assert_eq!(CALLS.load(Ordering::SeqCst), 1);

        let _ = std::panic::take_hook();
    }

    #[test]
    fn faster_and_slower() {
        assert_eq!(faster(10.0), 5.0);
        assert_eq!(faster(0.6), MIN_REFRESH_SECS);
        assert_eq!(slower(10.0), 20.0);
        assert_eq!(slower(45.0), MAX_REFRESH_SECS);
    }
}

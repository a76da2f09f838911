use std::io;

use anyhow::{anyhow, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::prelude::*;
use timbre_core::model::{AudioFeature, AudioFeatures};
use timbre_core::taxonomy::{Genre, YearRange};
use timbre_search::{BrowseSession, Query, Recommendation, Recommender};

pub mod profile;
pub mod results;

/// Application state for the browse TUI.
///
/// Owns the one [`BrowseSession`] of the person at the keyboard; every change
/// to a query parameter re-runs the query and rewinds the session.
#[derive(Debug)]
pub struct App<'a> {
    recommender: Recommender<'a>,
    pub genre_index: usize,
    pub years: YearRange,
    pub target: AudioFeatures,
    pub selected_feature: usize,
    pub selected_track: usize,
    pub session: BrowseSession,
    pub results: Vec<Recommendation>,
    pub error: Option<String>,
    pub should_quit: bool,
}

impl<'a> App<'a> {
    /// Create a new `App` starting from `initial` and run its first query.
    pub fn new(recommender: Recommender<'a>, initial: &Query, page_size: usize) -> Result<Self> {
        let genre_index = recommender.genres().position(&initial.genre).ok_or_else(|| {
            anyhow!(
                "Unsupported genre {:?} (supported: {})",
                initial.genre,
                recommender.genres().joined()
            )
        })?;

        let mut app = Self {
            recommender,
            genre_index,
            years: picker_years(initial.years),
            target: initial.target,
            selected_feature: 0,
            selected_track: 0,
            session: BrowseSession::new(page_size),
            results: Vec::new(),
            error: None,
            should_quit: false,
        };
        app.refresh();
        Ok(app)
    }

    pub fn genre(&self) -> Option<&Genre> {
        self.recommender.genres().get(self.genre_index)
    }

    pub fn feature(&self) -> AudioFeature {
        AudioFeature::ALL[self.selected_feature % AudioFeature::ALL.len()]
    }

    /// Songs visible on the current page.
    pub fn page(&self) -> &[Recommendation] {
        self.session.current_page(&self.results)
    }

    pub fn selected(&self) -> Option<&Recommendation> {
        self.page().get(self.selected_track)
    }

    fn query(&self) -> Query {
        let genre = self.genre().map(|g| g.name().to_string()).unwrap_or_default();
        Query::with_features(genre, self.years, self.target)
    }

    /// Re-run the query if any parameter changed since the last run.
    fn refresh(&mut self) {
        let query = self.query();
        if !self.session.observe(&query) {
            return;
        }
        self.selected_track = 0;
        match self.recommender.recommend(&query) {
            Ok(results) => {
                self.results = results;
                self.error = None;
            }
            Err(e) => {
                self.results.clear();
                self.error = Some(e.to_string());
            }
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('n' | ' ') => {
                self.session.recommend_more(self.results.len());
                self.selected_track = 0;
            }
            KeyCode::Char('j') | KeyCode::Down => {
                if self.selected_track + 1 < self.page().len() {
                    self.selected_track += 1;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.selected_track = self.selected_track.saturating_sub(1);
            }
            KeyCode::Tab => {
                self.selected_feature = (self.selected_feature + 1) % AudioFeature::ALL.len();
            }
            KeyCode::BackTab => {
                self.selected_feature =
                    (self.selected_feature + AudioFeature::ALL.len() - 1) % AudioFeature::ALL.len();
            }
            KeyCode::Char('+' | '=') | KeyCode::Right => self.nudge_feature(1.0),
            KeyCode::Char('-') | KeyCode::Left => self.nudge_feature(-1.0),
            KeyCode::Char('g') => self.cycle_genre(1),
            KeyCode::Char('G') => self.cycle_genre(-1),
            KeyCode::Char('[') => self.move_start_year(-1),
            KeyCode::Char(']') => self.move_start_year(1),
            KeyCode::Char('{') => self.move_end_year(-1),
            KeyCode::Char('}') => self.move_end_year(1),
            _ => {}
        }
    }

    fn nudge_feature(&mut self, direction: f64) {
        let feature = self.feature();
        let (low, high) = feature.range();
        let value = (self.target.get(feature) + direction * feature.step()).clamp(low, high);
        // Snap to the step grid so repeated nudges don't accumulate drift.
        let snapped = (value / feature.step()).round() * feature.step();
        self.target.set(feature, snapped.clamp(low, high));
        self.refresh();
    }

    fn cycle_genre(&mut self, direction: isize) {
        let count = self.recommender.genres().len();
        if count == 0 {
            return;
        }
        self.genre_index = self
            .genre_index
            .checked_add_signed(direction)
            .unwrap_or(count - 1)
            % count;
        self.refresh();
    }

    /// The year window behaves like a two-handled slider: handles stay inside
    /// the picker bounds and never cross.
    fn move_start_year(&mut self, delta: i32) {
        let bounds = YearRange::PICKER_BOUNDS;
        self.years.start = (self.years.start + delta)
            .max(bounds.start)
            .min(self.years.end);
        self.refresh();
    }

    fn move_end_year(&mut self, delta: i32) {
        let bounds = YearRange::PICKER_BOUNDS;
        self.years.end = (self.years.end + delta)
            .min(bounds.end)
            .max(self.years.start);
        self.refresh();
    }
}

/// Fit a window given on the command line onto the year picker: both ends
/// inside [`YearRange::PICKER_BOUNDS`], start not after end.
fn picker_years(years: YearRange) -> YearRange {
    let bounds = YearRange::PICKER_BOUNDS;
    let start = years.start.clamp(bounds.start, bounds.end);
    let end = years.end.clamp(bounds.start, bounds.end);
    YearRange::new(start.min(end), start.max(end))
}

/// Run the browse TUI.
///
/// Sets up the terminal, runs the main event loop, and restores the terminal
/// on exit (including on error).
pub fn run_tui(app: App<'_>) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_event_loop(&mut terminal, app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut app: App<'_>,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, &app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                app.handle_key(key.code);
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn render(frame: &mut Frame, app: &App<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Query bar
            Constraint::Min(10),   // Results and profile
            Constraint::Length(3), // Help bar
        ])
        .split(frame.area());

    results::render_title(frame, app, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[1]);
    results::render_page(frame, app, body[0]);
    profile::render(frame, app, body[1]);

    results::render_help(frame, chunks[2]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use timbre_core::model::SongRecord;
    use timbre_core::CatalogIndex;

    fn catalog() -> CatalogIndex {
        let songs = (0..10).map(|i| {
            SongRecord::new(
                format!("id{i}").as_str(),
                if i % 2 == 0 { "['pop']" } else { "['rock']" },
                2016,
                f64::from(i),
                AudioFeatures::new([0.1, 0.2, 0.3, 0.4, 0.2, 100.0 + f64::from(i)]),
            )
        });
        CatalogIndex::build(songs).unwrap()
    }

    fn app(catalog: &CatalogIndex) -> App<'_> {
        let query = Query::with_features("Pop", YearRange::default(), AudioFeatures::default_target());
        App::new(Recommender::new(catalog), &query, 2).unwrap()
    }

    #[test]
    fn test_initial_query_runs() {
        let catalog = catalog();
        let app = app(&catalog);
        assert_eq!(app.genre().map(Genre::name), Some("Pop"));
        assert_eq!(app.results.len(), 5);
        assert_eq!(app.page().len(), 2);
    }

    #[test]
    fn test_more_pages_then_exhausted() {
        let catalog = catalog();
        let mut app = app(&catalog);
        for _ in 0..3 {
            app.handle_key(KeyCode::Char('n'));
        }
        assert!(app.session.is_exhausted(app.results.len()));
        assert!(app.page().is_empty());
    }

    #[test]
    fn test_changing_genre_rewinds_session() {
        let catalog = catalog();
        let mut app = app(&catalog);
        app.handle_key(KeyCode::Char('n'));
        assert_eq!(app.session.start(), 2);

        app.handle_key(KeyCode::Char('g'));
        assert_eq!(app.genre().map(Genre::name), Some("Pop Rap"));
        assert_eq!(app.session.start(), 0);
        assert!(app.results.is_empty());
    }

    #[test]
    fn test_nudge_feature_clamps_to_range() {
        let catalog = catalog();
        let mut app = app(&catalog);
        for _ in 0..10 {
            app.handle_key(KeyCode::Char('-'));
        }
        assert!(app.target.get(AudioFeature::Acousticness).abs() < f64::EPSILON);

        app.handle_key(KeyCode::BackTab);
        assert_eq!(app.feature(), AudioFeature::Tempo);
        app.handle_key(KeyCode::Char('+'));
        assert!((app.target.get(AudioFeature::Tempo) - 120.0).abs() < 1e-9);
    }

    #[test]
    fn test_year_handles_do_not_cross() {
        let catalog = catalog();
        let mut app = app(&catalog);
        for _ in 0..5 {
            app.handle_key(KeyCode::Char(']'));
        }
        assert_eq!(app.years, YearRange::new(2017, 2017));
        for _ in 0..50 {
            app.handle_key(KeyCode::Char('['));
        }
        assert_eq!(app.years.start, YearRange::PICKER_BOUNDS.start);
    }

    fn app_with_years(catalog: &CatalogIndex, years: YearRange) -> App<'_> {
        let query = Query::with_features("Pop", years, AudioFeatures::default_target());
        App::new(Recommender::new(catalog), &query, 2).unwrap()
    }

    #[test]
    fn test_years_after_picker_bounds_are_fitted() {
        let catalog = catalog();
        let mut app = app_with_years(&catalog, YearRange::new(2021, 2022));
        assert_eq!(app.years, YearRange::new(2019, 2019));

        app.handle_key(KeyCode::Char('}'));
        app.handle_key(KeyCode::Char(']'));
        assert_eq!(app.years, YearRange::new(2019, 2019));
        app.handle_key(KeyCode::Char('['));
        assert_eq!(app.years, YearRange::new(2018, 2019));
    }

    #[test]
    fn test_years_before_picker_bounds_are_fitted() {
        let catalog = catalog();
        let mut app = app_with_years(&catalog, YearRange::new(1980, 1985));
        assert_eq!(app.years, YearRange::new(1990, 1990));

        app.handle_key(KeyCode::Char('['));
        app.handle_key(KeyCode::Char('{'));
        assert_eq!(app.years, YearRange::new(1990, 1990));
        app.handle_key(KeyCode::Char('}'));
        assert_eq!(app.years, YearRange::new(1990, 1991));
    }

    #[test]
    fn test_inverted_years_are_ordered() {
        let catalog = catalog();
        let mut app = app_with_years(&catalog, YearRange::new(2017, 2015));
        assert_eq!(app.years, YearRange::new(2015, 2017));
        assert_eq!(app.results.len(), 5);

        app.handle_key(KeyCode::Char('{'));
        app.handle_key(KeyCode::Char(']'));
        assert_eq!(app.years, YearRange::new(2016, 2016));
    }

    #[test]
    fn test_unsupported_initial_genre() {
        let catalog = catalog();
        let query = Query::with_features("Polka", YearRange::default(), AudioFeatures::default_target());
        assert!(App::new(Recommender::new(&catalog), &query, 6).is_err());
    }
}

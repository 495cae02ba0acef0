//! Main TUI application state machine.
//!
//! Handles:
//! - Screen navigation
//! - Input event handling
//! - Service integration

use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};

use crate::application::PredictionError;
use crate::config::AppConfig;
use crate::DefaultService;

use super::ui::{
    dashboard::{render_dashboard, DashboardState},
    patient::{render_patient_form, PatientFormState},
    records::{render_records, RecordsState},
    render_disclaimer,
    result::{render_result, ResultState},
};

/// Current screen/view in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Dashboard,
    PatientForm,
    Result,
    Records,
}

/// Main application state
pub struct App {
    screen: Screen,
    should_quit: bool,
    service: DefaultService,
    dashboard_state: DashboardState,
    patient_form_state: PatientFormState,
    result_state: ResultState,
    records_state: RecordsState,
}

impl App {
    /// Create the application from configuration.
    ///
    /// Loads the model and opens the record store. Both are fatal on failure.
    ///
    /// # Errors
    /// Returns error if the model cannot be loaded or the database cannot be opened.
    pub fn new(config: &AppConfig) -> Result<Self> {
        let service = crate::open_service(config)?;
        Ok(Self::with_service(service))
    }

    /// Create application around an existing service (composition root for tests).
    #[must_use]
    pub fn with_service(service: DefaultService) -> Self {
        let mut app = Self {
            screen: Screen::Dashboard,
            should_quit: false,
            service,
            dashboard_state: DashboardState::default(),
            patient_form_state: PatientFormState::default(),
            result_state: ResultState::default(),
            records_state: RecordsState::default(),
        };
        app.update_dashboard_state();
        app
    }

    #[must_use]
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            terminal.draw(|f| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(0), Constraint::Length(3)])
                    .split(f.area());

                match self.screen {
                    Screen::Dashboard => render_dashboard(f, chunks[0], &self.dashboard_state),
                    Screen::PatientForm => {
                        render_patient_form(f, chunks[0], &self.patient_form_state);
                    }
                    Screen::Result => render_result(f, chunks[0], &self.result_state),
                    Screen::Records => render_records(f, chunks[0], &self.records_state),
                }

                render_disclaimer(f, chunks[1]);
            })?;

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    // Windows terminals report releases too.
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, key.modifiers);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        if key == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.screen {
            Screen::Dashboard => self.handle_dashboard_key(key),
            Screen::PatientForm => self.handle_patient_form_key(key),
            Screen::Result => self.handle_result_key(key),
            Screen::Records => self.handle_records_key(key),
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('n' | 'N') => self.open_form(),
            KeyCode::Char('r' | 'R') => self.open_records(),
            KeyCode::Char('q' | 'Q') => self.should_quit = true,
            _ => {}
        }
    }

    fn handle_patient_form_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                self.patient_form_state.clear_sensitive();
                self.screen = Screen::Dashboard;
            }
            KeyCode::Up | KeyCode::BackTab => self.patient_form_state.prev_field(),
            KeyCode::Down | KeyCode::Tab => self.patient_form_state.next_field(),
            KeyCode::Left => self.patient_form_state.cycle_choice(false),
            KeyCode::Right => self.patient_form_state.cycle_choice(true),
            KeyCode::Char('s' | 'S') => self.patient_form_state.load_sample_data(),
            KeyCode::Char(c) => self.patient_form_state.input_char(c),
            KeyCode::Backspace => self.patient_form_state.delete_char(),
            KeyCode::Delete => self.patient_form_state.clear_field(),
            KeyCode::Enter => self.submit_patient_form(),
            _ => {}
        }
    }

    fn handle_result_key(&mut self, key: KeyCode) {
        let is_error = matches!(self.result_state, ResultState::Error { .. });
        match (is_error, key) {
            (true, KeyCode::Enter) => self.screen = Screen::PatientForm,
            (_, KeyCode::Enter | KeyCode::Esc) => {
                self.update_dashboard_state();
                self.screen = Screen::Dashboard;
            }
            (_, KeyCode::Char('n' | 'N')) => self.open_form(),
            (_, KeyCode::Char('r' | 'R')) => self.open_records(),
            _ => {}
        }
    }

    fn handle_records_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                self.update_dashboard_state();
                self.screen = Screen::Dashboard;
            }
            KeyCode::Up => self.records_state.scroll_up(),
            KeyCode::Down => self.records_state.scroll_down(),
            KeyCode::Char('r' | 'R') => self.load_records(),
            _ => {}
        }
    }

    fn open_form(&mut self) {
        self.patient_form_state = PatientFormState::default();
        self.screen = Screen::PatientForm;
    }

    fn open_records(&mut self) {
        self.load_records();
        self.screen = Screen::Records;
    }

    fn submit_patient_form(&mut self) {
        let input = match self.patient_form_state.to_patient_input() {
            Ok(input) => input,
            Err(errors) => {
                self.patient_form_state.error_message = Some(errors.to_string());
                return;
            }
        };

        let result = self.service.predict(&input);
        if let Err(e) = &result {
            match e {
                PredictionError::Unsaved { .. } => tracing::error!("{}", e),
                _ => tracing::warn!("Prediction failed: {}", e),
            }
        }

        // Form text is only needed for inputs that were rejected before classification.
        if !matches!(result, Err(PredictionError::Validation(_))) {
            self.patient_form_state.clear_sensitive();
        }

        self.result_state = ResultState::from_prediction(result);
        self.screen = Screen::Result;
    }

    fn update_dashboard_state(&mut self) {
        self.dashboard_state.model_fingerprint = self.service.model_fingerprint().to_string();
        match self.service.summary() {
            Ok(summary) => {
                self.dashboard_state.summary = summary;
                self.dashboard_state.storage_error = None;
            }
            Err(e) => {
                tracing::error!("Failed to read record summary: {}", e);
                self.dashboard_state.storage_error = Some(e.to_string());
            }
        }
    }

    fn load_records(&mut self) {
        match self.service.list_all() {
            Ok(records) => self.records_state.set_records(records),
            Err(e) => {
                tracing::error!("Failed to load records: {}", e);
                self.records_state.set_error(e.to_string());
            }
        }
    }
}

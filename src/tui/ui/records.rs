//! Saved records view: every stored prediction in insertion order.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::domain::{PredictionRecord, FEATURE_NAMES};
use crate::tui::styles::ClinicalTheme;

/// Records view state
#[derive(Debug, Clone, Default)]
pub struct RecordsState {
    pub records: Vec<PredictionRecord>,
    pub selected: usize,
    pub error: Option<String>,
}

impl RecordsState {
    /// Replace the loaded records, keeping the selection in range.
    pub fn set_records(&mut self, records: Vec<PredictionRecord>) {
        self.records = records;
        self.error = None;
        self.selected = self.selected.min(self.records.len().saturating_sub(1));
    }

    pub fn set_error(&mut self, message: String) {
        self.records.clear();
        self.selected = 0;
        self.error = Some(message);
    }

    pub fn scroll_down(&mut self) {
        if self.selected + 1 < self.records.len() {
            self.selected += 1;
        }
    }

    pub fn scroll_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }
}

/// Table cells for one record, in column order.
fn record_cells(record: &PredictionRecord) -> Vec<String> {
    let input = &record.input;
    vec![
        input.age.to_string(),
        input.sex.to_string(),
        input.chest_pain_type.to_string(),
        input.resting_blood_pressure.to_string(),
        input.cholesterol.to_string(),
        u8::from(input.fasting_blood_sugar_high).to_string(),
        input.resting_ecg.to_string(),
        input.max_heart_rate.to_string(),
        u8::from(input.exercise_induced_angina).to_string(),
        format!("{:.1}", input.st_depression),
        input.st_slope.to_string(),
        input.major_vessels_count.to_string(),
        input.thalassemia.to_string(),
    ]
}

/// Render the records view
pub fn render_records(f: &mut Frame, area: Rect, state: &RecordsState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Table
            Constraint::Length(3), // Footer
        ])
        .split(area);

    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", ClinicalTheme::text()),
        Span::styled("Saved Patient Records", ClinicalTheme::title()),
        Span::styled(
            format!(" │ {} total", state.records.len()),
            ClinicalTheme::text_secondary(),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(ClinicalTheme::border()),
    );
    f.render_widget(header, chunks[0]);

    if let Some(err) = &state.error {
        render_message(f, chunks[1], "! Cannot load records", err, true);
    } else if state.records.is_empty() {
        render_message(
            f,
            chunks[1],
            "No patient records found",
            "Submit a prediction to create the first record.",
            false,
        );
    } else {
        render_table(f, chunks[1], state);
    }

    let footer = Paragraph::new(Line::from(vec![
        Span::styled("[↑↓] ", ClinicalTheme::key_hint()),
        Span::styled("Scroll ", ClinicalTheme::key_desc()),
        Span::styled("[R] ", ClinicalTheme::key_hint()),
        Span::styled("Refresh ", ClinicalTheme::key_desc()),
        Span::styled("[Esc] ", ClinicalTheme::key_hint()),
        Span::styled("Back", ClinicalTheme::key_desc()),
    ]))
    .block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(ClinicalTheme::border()),
    );
    f.render_widget(footer, chunks[2]);
}

fn render_table(f: &mut Frame, area: Rect, state: &RecordsState) {
    let header = Row::new(
        FEATURE_NAMES
            .iter()
            .copied()
            .chain(std::iter::once("prediction"))
            .map(Cell::from),
    )
    .style(ClinicalTheme::header());

    let rows = state.records.iter().map(|record| {
        let mut cells: Vec<Cell> = record_cells(record).into_iter().map(Cell::from).collect();
        cells.push(
            Cell::from(record.outcome.label()).style(ClinicalTheme::outcome(record.outcome)),
        );
        Row::new(cells).style(ClinicalTheme::text())
    });

    let widths: Vec<Constraint> = FEATURE_NAMES
        .iter()
        .map(|name| Constraint::Length(name.len().max(5) as u16 + 1))
        .chain(std::iter::once(Constraint::Min(10)))
        .collect();

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(ClinicalTheme::border()),
        )
        .row_highlight_style(ClinicalTheme::selected());

    let mut table_state = TableState::default().with_selected(Some(state.selected));
    f.render_stateful_widget(table, area, &mut table_state);
}

fn render_message(f: &mut Frame, area: Rect, title: &str, detail: &str, is_error: bool) {
    let (title_style, border_style) = if is_error {
        (ClinicalTheme::danger(), ClinicalTheme::danger())
    } else {
        (ClinicalTheme::text_secondary(), ClinicalTheme::border())
    };

    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(title.to_string(), title_style)),
        Line::from(""),
        Line::from(Span::styled(detail.to_string(), ClinicalTheme::text_muted())),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style),
    );

    f.render_widget(content, area);
}

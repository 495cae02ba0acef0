//! Prediction result view.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::application::PredictionError;
use crate::domain::PredictionRecord;
use crate::tui::styles::ClinicalTheme;

/// Outcome of the last submission
#[derive(Debug, Clone, Default)]
pub enum ResultState {
    #[default]
    Idle,
    /// Predicted and stored
    Saved { record: PredictionRecord },
    /// Predicted but the store rejected the record
    Unsaved {
        record: PredictionRecord,
        reason: String,
    },
    /// No prediction was made
    Error { message: String },
}

impl ResultState {
    #[must_use]
    pub fn from_prediction(result: Result<PredictionRecord, PredictionError>) -> Self {
        match result {
            Ok(record) => Self::Saved { record },
            Err(PredictionError::Unsaved { record, source }) => Self::Unsaved {
                record,
                reason: source.to_string(),
            },
            Err(e) => Self::Error {
                message: e.to_string(),
            },
        }
    }
}

/// Render the result view
pub fn render_result(f: &mut Frame, area: Rect, state: &ResultState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Footer
        ])
        .split(area);

    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", ClinicalTheme::text()),
        Span::styled("Prediction Result", ClinicalTheme::title()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(ClinicalTheme::border()),
    );
    f.render_widget(header, chunks[0]);

    match state {
        ResultState::Idle => {
            let idle = Paragraph::new(Line::from(Span::styled(
                "No prediction yet",
                ClinicalTheme::text_muted(),
            )))
            .alignment(Alignment::Center);
            f.render_widget(idle, chunks[1]);
        }
        ResultState::Saved { record } => render_outcome(f, chunks[1], record, None),
        ResultState::Unsaved { record, reason } => {
            render_outcome(f, chunks[1], record, Some(reason));
        }
        ResultState::Error { message } => render_error(f, chunks[1], message),
    }

    render_footer(f, chunks[2], state);
}

fn render_outcome(f: &mut Frame, area: Rect, record: &PredictionRecord, unsaved: Option<&str>) {
    let border = if unsaved.is_some() {
        ClinicalTheme::warning()
    } else {
        ClinicalTheme::border_focused()
    };
    let block = Block::default()
        .title(Span::styled(" Heart Disease Risk ", ClinicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(border);

    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            record.outcome.label(),
            ClinicalTheme::outcome(record.outcome),
        )),
        Line::from(Span::styled(
            record.outcome.description(),
            ClinicalTheme::text_secondary(),
        )),
        Line::from(""),
    ];

    match unsaved {
        None => lines.push(Line::from(Span::styled(
            "Record saved",
            ClinicalTheme::success(),
        ))),
        Some(reason) => {
            lines.push(Line::from(Span::styled(
                "UNSAVED: this result was not written to the records database",
                ClinicalTheme::warning(),
            )));
            lines.push(Line::from(Span::styled(
                reason.to_string(),
                ClinicalTheme::text_muted(),
            )));
        }
    }

    let content = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(content, inner);
}

fn render_error(f: &mut Frame, area: Rect, message: &str) {
    // Validation messages are joined with "; "; show one per line.
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled("! No prediction made", ClinicalTheme::danger())),
        Line::from(""),
    ];
    lines.extend(
        message
            .split("; ")
            .map(|part| Line::from(Span::styled(part.to_string(), ClinicalTheme::text()))),
    );

    let content = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(ClinicalTheme::danger()),
        );

    f.render_widget(content, area);
}

fn render_footer(f: &mut Frame, area: Rect, state: &ResultState) {
    let content = match state {
        ResultState::Error { .. } => Line::from(vec![
            Span::styled("[Enter] ", ClinicalTheme::key_hint()),
            Span::styled("Edit Input ", ClinicalTheme::key_desc()),
            Span::styled("[Esc] ", ClinicalTheme::key_hint()),
            Span::styled("Dashboard", ClinicalTheme::key_desc()),
        ]),
        _ => Line::from(vec![
            Span::styled("[Enter] ", ClinicalTheme::key_hint()),
            Span::styled("Dashboard ", ClinicalTheme::key_desc()),
            Span::styled("[N] ", ClinicalTheme::key_hint()),
            Span::styled("New Prediction ", ClinicalTheme::key_desc()),
            Span::styled("[R] ", ClinicalTheme::key_hint()),
            Span::styled("Records", ClinicalTheme::key_desc()),
        ]),
    };

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(ClinicalTheme::border()),
    );

    f.render_widget(footer, area);
}

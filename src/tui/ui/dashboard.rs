//! Dashboard view: Main overview screen.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use crate::application::RecordSummary;
use crate::domain::{Outcome, FEATURE_COUNT};
use crate::tui::styles::ClinicalTheme;

/// Dashboard state for rendering.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub model_fingerprint: String,
    pub summary: RecordSummary,
    /// Set when the record counts could not be read.
    pub storage_error: Option<String>,
}

impl DashboardState {
    /// Share of stored records with a high-risk outcome, in `[0, 1]`.
    #[must_use]
    pub fn high_risk_ratio(&self) -> f64 {
        if self.summary.total == 0 {
            0.0
        } else {
            self.summary.high_risk as f64 / self.summary.total as f64
        }
    }
}

/// Render the main dashboard view.
pub fn render_dashboard(f: &mut Frame, area: Rect, state: &DashboardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Main content
        ])
        .split(area);

    render_header(f, chunks[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[1]);

    render_status_panels(f, columns[0], state);
    render_record_summary(f, columns[1], state);
}

fn render_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", ClinicalTheme::text()),
        Span::styled("Heartcheck", ClinicalTheme::title()),
        Span::styled(" │ ", ClinicalTheme::text_muted()),
        Span::styled("Heart Disease Risk Screening", ClinicalTheme::text_secondary()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(ClinicalTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_status_panels(f: &mut Frame, area: Rect, state: &DashboardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // Model status
            Constraint::Min(0),    // Quick actions
        ])
        .margin(1)
        .split(area);

    let storage_line = match &state.storage_error {
        None => Line::from(vec![
            Span::styled("  OK ", ClinicalTheme::success()),
            Span::styled("Record store", ClinicalTheme::text()),
        ]),
        Some(err) => Line::from(vec![
            Span::styled("  FAIL ", ClinicalTheme::danger()),
            Span::styled(err.clone(), ClinicalTheme::text_muted()),
        ]),
    };

    let status_items = vec![
        Line::from(vec![
            Span::styled("  OK ", ClinicalTheme::success()),
            Span::styled("Model loaded", ClinicalTheme::text()),
        ]),
        Line::from(vec![
            Span::styled("  Fingerprint: ", ClinicalTheme::text_secondary()),
            Span::styled(state.model_fingerprint.clone(), ClinicalTheme::text_muted()),
        ]),
        Line::from(vec![
            Span::styled("  Features: ", ClinicalTheme::text_secondary()),
            Span::styled(FEATURE_COUNT.to_string(), ClinicalTheme::text()),
        ]),
        storage_line,
    ];

    let status = Paragraph::new(status_items).block(
        Block::default()
            .title(Span::styled(" System Status ", ClinicalTheme::subtitle()))
            .borders(Borders::ALL)
            .border_style(ClinicalTheme::border()),
    );
    f.render_widget(status, chunks[0]);

    let actions = vec![
        Line::from(vec![
            Span::styled("[N] ", ClinicalTheme::key_hint()),
            Span::styled("New Prediction", ClinicalTheme::key_desc()),
        ]),
        Line::from(vec![
            Span::styled("[R] ", ClinicalTheme::key_hint()),
            Span::styled("Saved Records", ClinicalTheme::key_desc()),
        ]),
        Line::from(vec![
            Span::styled("[Q] ", ClinicalTheme::key_hint()),
            Span::styled("Quit", ClinicalTheme::key_desc()),
        ]),
    ];

    let actions = Paragraph::new(actions).block(
        Block::default()
            .title(Span::styled(" Quick Actions ", ClinicalTheme::subtitle()))
            .borders(Borders::ALL)
            .border_style(ClinicalTheme::border()),
    );
    f.render_widget(actions, chunks[1]);
}

fn render_record_summary(f: &mut Frame, area: Rect, state: &DashboardState) {
    let block = Block::default()
        .title(Span::styled(" Saved Records ", ClinicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(ClinicalTheme::border());

    let summary = state.summary;
    if summary.total == 0 {
        let empty = Paragraph::new(Line::from(Span::styled(
            "No predictions saved yet. Press [N] to start.",
            ClinicalTheme::text_muted(),
        )))
        .block(block);
        f.render_widget(empty, area);
        return;
    }

    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Length(3), Constraint::Min(0)])
        .margin(1)
        .split(inner);

    let lines = vec![
        Line::from(vec![
            Span::styled("Total: ", ClinicalTheme::text_secondary()),
            Span::styled(summary.total.to_string(), ClinicalTheme::text()),
        ]),
        Line::from(vec![
            Span::styled(format!("{}: ", Outcome::HighRisk), ClinicalTheme::text_secondary()),
            Span::styled(
                summary.high_risk.to_string(),
                ClinicalTheme::outcome(Outcome::HighRisk),
            ),
            Span::styled("  ", ClinicalTheme::text()),
            Span::styled(format!("{}: ", Outcome::LowRisk), ClinicalTheme::text_secondary()),
            Span::styled(
                summary.low_risk.to_string(),
                ClinicalTheme::outcome(Outcome::LowRisk),
            ),
        ]),
    ];
    f.render_widget(Paragraph::new(lines), chunks[0]);

    let ratio = state.high_risk_ratio().clamp(0.0, 1.0);
    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(Span::styled(" High risk share ", ClinicalTheme::text_secondary()))
                .borders(Borders::ALL)
                .border_style(ClinicalTheme::border()),
        )
        .gauge_style(ClinicalTheme::danger())
        .ratio(ratio)
        .label(format!("{:.0}%", ratio * 100.0));
    f.render_widget(gauge, chunks[1]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_high_risk_ratio() {
        let mut state = DashboardState::default();
        assert_eq!(state.high_risk_ratio(), 0.0);

        state.summary = RecordSummary {
            total: 4,
            high_risk: 1,
            low_risk: 3,
        };
        assert!((state.high_risk_ratio() - 0.25).abs() < f64::EPSILON);
    }
}

//! UI module: View components for the TUI.

pub mod dashboard;
pub mod patient;
pub mod records;
pub mod result;

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::tui::styles::ClinicalTheme;

pub fn render_disclaimer(f: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(Span::styled(
            "DISCLAIMER: This screening tool gives an indicative model output and is not a medical diagnosis.",
            ClinicalTheme::text_muted(),
        )),
        Line::from(Span::styled(
            "Consult a qualified clinician before acting on any result.",
            ClinicalTheme::text_muted(),
        )),
    ];

    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(ClinicalTheme::border());

    let p = Paragraph::new(text).block(block).wrap(Wrap { trim: true });

    f.render_widget(p, area);
}

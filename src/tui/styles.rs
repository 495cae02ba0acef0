//! Color palette and preset styles for the terminal UI.

use ratatui::style::{Color, Modifier, Style};

use crate::domain::Outcome;

/// Clinical theme color palette.
pub struct ClinicalTheme;

impl ClinicalTheme {
    /// Deep rose - Primary color
    pub const PRIMARY: Color = Color::Rgb(190, 18, 60); // #BE123C

    /// Lighter rose for highlights and the cursor
    pub const PRIMARY_LIGHT: Color = Color::Rgb(251, 113, 133); // #FB7185

    pub const PRIMARY_DARK: Color = Color::Rgb(136, 19, 55); // #881337

    /// Light slate for borders
    pub const BORDER: Color = Color::Rgb(148, 163, 184); // #94A3B8

    /// Emerald - low risk
    pub const SUCCESS: Color = Color::Rgb(16, 185, 129); // #10B981

    /// Amber - unsaved results, notices
    pub const WARNING: Color = Color::Rgb(251, 191, 36); // #FBBF24

    /// Red - high risk, errors
    pub const DANGER: Color = Color::Rgb(239, 68, 68); // #EF4444

    pub const BG_DARK: Color = Color::Rgb(15, 23, 42); // #0F172A

    pub const TEXT_PRIMARY: Color = Color::Rgb(248, 250, 252); // #F8FAFC
    pub const TEXT_SECONDARY: Color = Color::Rgb(148, 163, 184); // #94A3B8
    pub const TEXT_MUTED: Color = Color::Rgb(100, 116, 139); // #64748B

    #[must_use]
    pub fn title() -> Style {
        Style::default()
            .fg(Self::TEXT_PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn subtitle() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn text() -> Style {
        Style::default().fg(Self::TEXT_PRIMARY)
    }

    #[must_use]
    pub fn text_secondary() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    #[must_use]
    pub fn text_muted() -> Style {
        Style::default().fg(Self::TEXT_MUTED)
    }

    #[must_use]
    pub fn success() -> Style {
        Style::default().fg(Self::SUCCESS)
    }

    #[must_use]
    pub fn warning() -> Style {
        Style::default().fg(Self::WARNING)
    }

    #[must_use]
    pub fn danger() -> Style {
        Style::default().fg(Self::DANGER)
    }

    /// Style for the highlighted table row
    #[must_use]
    pub fn selected() -> Style {
        Style::default()
            .fg(Self::BG_DARK)
            .bg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn focused() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn border() -> Style {
        Style::default().fg(Self::BORDER)
    }

    #[must_use]
    pub fn border_focused() -> Style {
        Style::default().fg(Self::PRIMARY)
    }

    /// Style for table headers
    #[must_use]
    pub fn header() -> Style {
        Style::default()
            .fg(Self::TEXT_PRIMARY)
            .bg(Self::PRIMARY_DARK)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn key_hint() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn key_desc() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    #[must_use]
    pub fn cursor() -> Style {
        Style::default().fg(Self::PRIMARY_LIGHT)
    }

    /// Style for an outcome label
    #[must_use]
    pub fn outcome(outcome: Outcome) -> Style {
        match outcome {
            Outcome::HighRisk => Self::danger().add_modifier(Modifier::BOLD),
            Outcome::LowRisk => Self::success().add_modifier(Modifier::BOLD),
        }
    }
}

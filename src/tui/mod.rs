//! TUI module: Terminal User Interface using Ratatui.
//!
//! Screens:
//! - Dashboard with model and record status
//! - Patient data input
//! - Prediction result
//! - Saved records table

mod app;
mod styles;
mod ui;

pub use app::{App, Screen};
pub use styles::ClinicalTheme;

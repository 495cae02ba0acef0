//! Patient data input form.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use zeroize::{Zeroize, Zeroizing};

use crate::domain::{Field, PatientInput, ValidationErrors};
use crate::tui::styles::ClinicalTheme;

/// Form field state
#[derive(Debug, Clone)]
pub struct FormField {
    pub field: Field,
    /// Typed text for numeric fields
    pub value: String,
    /// Selected option index for choice fields
    pub choice: Option<usize>,
}

impl FormField {
    fn new(field: Field) -> Self {
        Self {
            field,
            value: String::new(),
            choice: field.options().map(|_| 0),
        }
    }

    /// Text handed to the coercion step.
    fn submitted_text(&self) -> Zeroizing<String> {
        let text = match (self.choice, self.field.options()) {
            (Some(idx), Some(options)) if self.field == Field::Sex => {
                options.get(idx).copied().unwrap_or_default().to_string()
            }
            (Some(idx), Some(_)) => idx.to_string(),
            _ => self.value.clone(),
        };
        Zeroizing::new(text)
    }

    fn display_value(&self) -> Option<String> {
        match (self.choice, self.field.options()) {
            (Some(idx), Some(options)) => options.get(idx).map(|name| {
                if self.field == Field::Sex || self.field == Field::MajorVesselsCount {
                    format!("◀ {name} ▶")
                } else {
                    format!("◀ {idx}: {name} ▶")
                }
            }),
            _ if self.value.is_empty() => None,
            _ => Some(self.value.clone()),
        }
    }

    fn cycle(&mut self, forward: bool) {
        let (Some(idx), Some(options)) = (self.choice, self.field.options()) else {
            return;
        };
        let len = options.len();
        self.choice = Some(if forward {
            (idx + 1) % len
        } else {
            (idx + len - 1) % len
        });
    }
}

/// Patient form state
pub struct PatientFormState {
    pub fields: Vec<FormField>,
    pub selected_field: usize,
    pub error_message: Option<String>,
}

impl Default for PatientFormState {
    fn default() -> Self {
        Self {
            fields: Field::ALL.iter().copied().map(FormField::new).collect(),
            selected_field: 0,
            error_message: None,
        }
    }
}

impl PatientFormState {
    pub fn next_field(&mut self) {
        self.selected_field = (self.selected_field + 1) % self.fields.len();
    }

    pub fn prev_field(&mut self) {
        if self.selected_field == 0 {
            self.selected_field = self.fields.len() - 1;
        } else {
            self.selected_field -= 1;
        }
    }

    /// Add a character to the current numeric field
    pub fn input_char(&mut self, c: char) {
        let current = &mut self.fields[self.selected_field];
        if current.choice.is_none() && (c.is_ascii_digit() || c == '.' || c == '-') {
            current.value.push(c);
            self.error_message = None;
        }
    }

    pub fn delete_char(&mut self) {
        self.fields[self.selected_field].value.pop();
    }

    pub fn clear_field(&mut self) {
        self.fields[self.selected_field].value.zeroize();
    }

    /// Cycle the option of the current choice field
    pub fn cycle_choice(&mut self, forward: bool) {
        self.fields[self.selected_field].cycle(forward);
        self.error_message = None;
    }

    /// Wipe all field buffers and reset choices.
    ///
    /// Called right after a submission so measurements do not persist in the
    /// UI state.
    pub fn clear_sensitive(&mut self) {
        for field in self.fields.iter_mut() {
            field.value.zeroize();
            if field.choice.is_some() {
                field.choice = Some(0);
            }
        }
        self.error_message = None;
        self.selected_field = 0;
    }

    /// Coerce the form contents into a typed input.
    ///
    /// # Errors
    /// Returns every missing, unparseable or out-of-domain field.
    pub fn to_patient_input(&self) -> Result<PatientInput, ValidationErrors> {
        let texts: Vec<(Field, Zeroizing<String>)> = self
            .fields
            .iter()
            .map(|f| (f.field, f.submitted_text()))
            .collect();

        PatientInput::from_fields(texts.iter().map(|(field, text)| (*field, text.as_str())))
    }

    /// Load a typical patient for demonstration
    pub fn load_sample_data(&mut self) {
        for form_field in self.fields.iter_mut() {
            match form_field.field {
                Field::Age => form_field.value = "50".into(),
                Field::RestingBloodPressure => form_field.value = "120".into(),
                Field::Cholesterol => form_field.value = "200".into(),
                Field::MaxHeartRate => form_field.value = "150".into(),
                Field::StDepression => form_field.value = "1.0".into(),
                _ => form_field.choice = Some(0),
            }
        }
        self.error_message = None;
    }
}

/// Render the patient data input form
pub fn render_patient_form(f: &mut Frame, area: Rect, state: &PatientFormState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Form
            Constraint::Length(3), // Footer/error
        ])
        .split(area);

    render_form_header(f, chunks[0]);
    render_form_fields(f, chunks[1], state);
    render_form_footer(f, chunks[2], state);
}

fn render_form_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", ClinicalTheme::text()),
        Span::styled("Patient Data Entry", ClinicalTheme::title()),
        Span::styled(" │ 13 clinical measurements", ClinicalTheme::text_secondary()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(ClinicalTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_form_fields(f: &mut Frame, area: Rect, state: &PatientFormState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .margin(1)
        .split(area);

    let mid = state.fields.len().div_ceil(2);

    render_field_column(f, columns[0], &state.fields[..mid], 0, state.selected_field);
    render_field_column(f, columns[1], &state.fields[mid..], mid, state.selected_field);
}

fn render_field_column(
    f: &mut Frame,
    area: Rect,
    fields: &[FormField],
    offset: usize,
    selected: usize,
) {
    let constraints: Vec<Constraint> = fields
        .iter()
        .map(|_| Constraint::Length(3))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (i, form_field) in fields.iter().enumerate() {
        let is_selected = offset + i == selected;
        let (border_style, title_style) = if is_selected {
            (ClinicalTheme::border_focused(), ClinicalTheme::focused())
        } else {
            (ClinicalTheme::border(), ClinicalTheme::text_secondary())
        };

        let block = Block::default()
            .title(Span::styled(format!(" {} ", form_field.field.label()), title_style))
            .borders(Borders::ALL)
            .border_style(border_style);

        let value = match form_field.display_value() {
            Some(text) => Span::styled(text, ClinicalTheme::text()),
            None => Span::styled(form_field.field.domain(), ClinicalTheme::text_muted()),
        };

        let cursor = if is_selected && form_field.choice.is_none() {
            Span::styled("▌", ClinicalTheme::cursor())
        } else {
            Span::raw("")
        };

        let content = Paragraph::new(Line::from(vec![Span::raw(" "), value, cursor])).block(block);
        f.render_widget(content, chunks[i]);
    }
}

fn render_form_footer(f: &mut Frame, area: Rect, state: &PatientFormState) {
    let content = if let Some(err) = &state.error_message {
        Line::from(vec![
            Span::styled("! ", ClinicalTheme::danger()),
            Span::styled(err.clone(), ClinicalTheme::danger()),
        ])
    } else {
        Line::from(vec![
            Span::styled("[↑↓] ", ClinicalTheme::key_hint()),
            Span::styled("Navigate ", ClinicalTheme::key_desc()),
            Span::styled("[←→] ", ClinicalTheme::key_hint()),
            Span::styled("Choose ", ClinicalTheme::key_desc()),
            Span::styled("[Enter] ", ClinicalTheme::key_hint()),
            Span::styled("Predict ", ClinicalTheme::key_desc()),
            Span::styled("[S] ", ClinicalTheme::key_hint()),
            Span::styled("Sample Data ", ClinicalTheme::key_desc()),
            Span::styled("[Esc] ", ClinicalTheme::key_hint()),
            Span::styled("Cancel", ClinicalTheme::key_desc()),
        ])
    };

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(ClinicalTheme::border()),
    );

    f.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Sex;

    fn select(state: &mut PatientFormState, field: Field) {
        state.selected_field = field.index();
    }

    #[test]
    fn test_sample_data_converts() {
        let mut state = PatientFormState::default();
        state.load_sample_data();

        let input = state.to_patient_input().expect("sample should be valid");
        assert_eq!(input.age, 50);
        assert_eq!(input.sex, Sex::Male);
        assert_eq!(input.resting_blood_pressure, 120);
        assert_eq!(input.st_depression, 1.0);
        assert!(!input.exercise_induced_angina);
    }

    #[test]
    fn test_empty_numeric_fields_are_reported() {
        let state = PatientFormState::default();
        let errors = state.to_patient_input().unwrap_err();

        assert_eq!(
            errors.fields(),
            vec![
                Field::Age,
                Field::RestingBloodPressure,
                Field::Cholesterol,
                Field::MaxHeartRate,
                Field::StDepression,
            ]
        );
    }

    #[test]
    fn test_choice_cycling() {
        let mut state = PatientFormState::default();
        state.load_sample_data();

        select(&mut state, Field::Sex);
        state.cycle_choice(true);
        select(&mut state, Field::Thalassemia);
        state.cycle_choice(false);
        select(&mut state, Field::ExerciseInducedAngina);
        state.cycle_choice(true);

        let input = state.to_patient_input().expect("valid");
        assert_eq!(input.sex, Sex::Female);
        assert_eq!(input.thalassemia, 3);
        assert!(input.exercise_induced_angina);
    }

    #[test]
    fn test_typing_ignores_choice_fields_and_letters() {
        let mut state = PatientFormState::default();
        select(&mut state, Field::Sex);
        state.input_char('7');
        assert!(state.fields[Field::Sex.index()].value.is_empty());

        select(&mut state, Field::Age);
        for c in "6x3".chars() {
            state.input_char(c);
        }
        assert_eq!(state.fields[Field::Age.index()].value, "63");
    }

    #[test]
    fn test_out_of_domain_text_is_rejected() {
        let mut state = PatientFormState::default();
        state.load_sample_data();
        state.fields[Field::Cholesterol.index()].value = "50".into();

        let errors = state.to_patient_input().unwrap_err();
        assert!(errors.contains(Field::Cholesterol));
    }

    #[test]
    fn test_clear_sensitive_wipes_values() {
        let mut state = PatientFormState::default();
        state.load_sample_data();
        select(&mut state, Field::ChestPainType);
        state.cycle_choice(true);

        state.clear_sensitive();

        assert!(state.fields.iter().all(|f| f.value.is_empty()));
        assert_eq!(state.fields[Field::ChestPainType.index()].choice, Some(0));
        assert_eq!(state.selected_field, 0);
    }
}

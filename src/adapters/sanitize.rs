//! Log sanitization for patient measurements.
//!
//! The pipeline only logs outcomes and counts, but formatted `Debug` output
//! of a `PatientInput` or a feature vector can still reach a log line through
//! an error message. Every formatted log line is passed through [`sanitize`],
//! which redacts:
//! - Clinical `field: value` / `field=value` pairs (column names and struct
//!   field names)
//! - Values following a form label, as in validation messages
//!   (`Serum Cholesterol (mg/dl): 700 is outside 100-600`)
//! - 13-element numeric arrays (assembled feature vectors)
//! - Email addresses and phone numbers
//!
//! # Performance / DoS
//!
//! `sanitize()` caps the input size (see `HEARTCHECK_SANITIZE_MAX_BYTES`) so a
//! huge log line cannot stall the writer.

use regex::{Regex, RegexSet};
use std::sync::OnceLock;
use tracing_subscriber::fmt::MakeWriter;

use crate::domain::Field;

static PATTERNS: OnceLock<RedactionPatterns> = OnceLock::new();

/// Default per-line sanitization cap (16 KiB).
const DEFAULT_SANITIZE_MAX_BYTES: usize = 16 * 1024;

/// Names that identify a clinical measurement in log text.
const CLINICAL_KEYS: &str = concat!(
    r"age|sex|cp|trestbps|chol|fbs|restecg|thalach|exang|oldpeak|slope|ca|thal|",
    r"chest_pain_type|resting_blood_pressure|cholesterol|fasting_blood_sugar_high|",
    r"resting_ecg|max_heart_rate|exercise_induced_angina|st_depression|st_slope|",
    r"major_vessels_count|thalassemia"
);

struct RedactionPattern {
    regex: Regex,
    replacement: &'static str,
}

struct RedactionPatterns {
    set: RegexSet,
    patterns: Vec<RedactionPattern>,
}

fn truncate_to_char_boundary(input: &str, max_bytes: usize) -> (&str, bool) {
    if input.len() <= max_bytes {
        return (input, false);
    }

    let mut end = max_bytes.min(input.len());
    while end > 0 && !input.is_char_boundary(end) {
        end -= 1;
    }
    (&input[..end], true)
}

fn max_sanitize_bytes() -> usize {
    std::env::var("HEARTCHECK_SANITIZE_MAX_BYTES")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|&v| v > 0)
        .unwrap_or(DEFAULT_SANITIZE_MAX_BYTES)
}

fn get_patterns() -> &'static RedactionPatterns {
    PATTERNS.get_or_init(|| {
        let clinical = format!(r"(?i)\b({CLINICAL_KEYS})\b(\s*[:=]\s*)[A-Za-z0-9.+-]+");

        let labels = Field::ALL
            .iter()
            .map(|field| regex::escape(field.label()))
            .collect::<Vec<_>>()
            .join("|");
        let labelled = format!(r"({labels})(:\s*)(?:'[^']*'|[-+]?(?:inf|NaN|[0-9][0-9.]*))");

        let rules: Vec<(String, &'static str)> = vec![
            (clinical, "${1}${2}[REDACTED]"),
            (labelled, "${1}${2}[REDACTED]"),
            // 13 comma-separated numbers in brackets: an assembled feature vector
            (
                r"\[\s*-?\d+(?:\.\d+)?(?:\s*,\s*-?\d+(?:\.\d+)?){12}\s*\]".to_string(),
                "[REDACTED-FEATURES]",
            ),
            (
                r"(?i)\b[a-z0-9](?:[a-z0-9._%+-]{0,62}[a-z0-9])?@(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z]{2,}\b"
                    .to_string(),
                "[REDACTED-EMAIL]",
            ),
            (
                r"\b(?:\+?1[-.\s]?)?\(?[0-9]{3}\)?[-.\s][0-9]{3}[-.\s][0-9]{4}\b".to_string(),
                "[REDACTED-PHONE]",
            ),
        ];

        let set = RegexSet::new(rules.iter().map(|(p, _)| p.as_str())).expect("Valid regex set");
        let patterns = rules
            .into_iter()
            .map(|(pattern, replacement)| RedactionPattern {
                regex: Regex::new(&pattern).expect("Valid regex"),
                replacement,
            })
            .collect();

        RedactionPatterns { set, patterns }
    })
}

/// Redact clinical values and contact details from a log line.
#[must_use]
pub fn sanitize(input: &str) -> String {
    sanitize_with_limit(input, max_sanitize_bytes())
}

fn sanitize_with_limit(input: &str, max_bytes: usize) -> String {
    let patterns = get_patterns();
    let (prefix, truncated) = truncate_to_char_boundary(input, max_bytes);

    let mut result = prefix.to_string();
    for idx in patterns.set.matches(prefix).into_iter() {
        let pattern = &patterns.patterns[idx];
        result = pattern
            .regex
            .replace_all(&result, pattern.replacement)
            .into_owned();
    }

    if truncated {
        result.push_str(" [TRUNCATED]");
    }
    result
}

/// A `tracing_subscriber` writer wrapper that sanitizes formatted log output
/// before it is written to the underlying sink.
#[derive(Debug, Clone)]
pub struct SanitizingMakeWriter<M> {
    inner: M,
}

impl<M> SanitizingMakeWriter<M> {
    #[must_use]
    pub fn new(inner: M) -> Self {
        Self { inner }
    }
}

/// Line-buffering writer produced by [`SanitizingMakeWriter`].
pub struct SanitizingWriter<W: std::io::Write> {
    inner: W,
    buffer: Vec<u8>,
}

impl<W> SanitizingWriter<W>
where
    W: std::io::Write,
{
    fn new(inner: W) -> Self {
        Self {
            inner,
            buffer: Vec::new(),
        }
    }

    fn flush_lines(&mut self) -> std::io::Result<()> {
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            let mut sanitized = sanitize(&String::from_utf8_lossy(&line));
            // Truncation cuts the newline off an over-long line.
            if !sanitized.ends_with('\n') {
                sanitized.push('\n');
            }
            self.inner.write_all(sanitized.as_bytes())?;
        }
        Ok(())
    }
}

impl<W> std::io::Write for SanitizingWriter<W>
where
    W: std::io::Write,
{
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.extend_from_slice(buf);

        // Bound buffering when a formatter emits a huge line without newlines.
        let hard_cap = max_sanitize_bytes().saturating_mul(2);
        if self.buffer.len() > hard_cap {
            let sanitized = sanitize(&String::from_utf8_lossy(&self.buffer));
            self.inner.write_all(sanitized.as_bytes())?;
            self.inner.write_all(b"\n")?;
            self.buffer.clear();
            return Ok(buf.len());
        }

        self.flush_lines()?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_lines()?;

        if !self.buffer.is_empty() {
            let sanitized = sanitize(&String::from_utf8_lossy(&self.buffer));
            self.inner.write_all(sanitized.as_bytes())?;
            self.buffer.clear();
        }

        self.inner.flush()
    }
}

impl<W> Drop for SanitizingWriter<W>
where
    W: std::io::Write,
{
    fn drop(&mut self) {
        // tracing creates one writer per event; push out a trailing partial line.
        let _ = std::io::Write::flush(self);
    }
}

impl<'a, M> MakeWriter<'a> for SanitizingMakeWriter<M>
where
    M: MakeWriter<'a>,
{
    type Writer = SanitizingWriter<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        SanitizingWriter::new(self.inner.make_writer())
    }
}

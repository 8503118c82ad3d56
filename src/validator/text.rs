//! Style and branding checks for markdown text
//!
//! `lint_cell` runs on every markdown cell the cursor hands out.
//! `check_heading_case` runs once, on the notebook title.

use crate::models::{Cell, ErrorCode, Violation};
use crate::report::ErrorSession;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

static FIRST_PERSON_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(we|let's|let’s)\b").expect("valid regex"));

static FUTURE_TENSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(will|would)\b").expect("valid regex"));

/// Deprecated or incorrect product names and their canonical replacement
pub const BRANDING: &[(&str, &str)] = &[
    ("Vertex SDK", "Vertex AI SDK"),
    ("Vertex Training", "Vertex AI Training"),
    ("Vertex Prediction", "Vertex AI Prediction"),
    ("Vertex Batch Prediction", "Vertex AI Batch Prediction"),
    ("Vertex XAI", "Vertex Explainable AI"),
    ("Vertex Explainability", "Vertex Explainable AI"),
    ("Vertex AI Explainability", "Vertex Explainable AI"),
    ("Vertex Pipelines", "Vertex AI Pipelines"),
    ("Vertex Experiments", "Vertex AI Experiments"),
    ("Vertex TensorBoard", "Vertex AI TensorBoard"),
    ("Vertex Hyperparameter Tuning", "Vertex AI Hyperparameter Tuning"),
    ("Vertex Metadata", "Vertex ML Metadata"),
    ("Vertex AI Metadata", "Vertex ML Metadata"),
    ("Vertex AI ML Metadata", "Vertex ML Metadata"),
    ("Vertex Vizier", "Vertex AI Vizier"),
    ("Vertex Feature Store", "Vertex AI Feature Store"),
    ("Vertex Forecasting", "Vertex AI Forecasting"),
    ("Vertex Matching Engine", "Vertex AI Matching Engine"),
    ("Vertex TabNet", "Vertex AI TabNet"),
    ("Tabnet", "TabNet"),
    ("Vertex Two Towers", "Vertex AI Two-Towers"),
    ("Vertex Two-Towers", "Vertex AI Two-Towers"),
    ("Vertex Dataset", "Vertex AI Dataset"),
    ("Vertex Model", "Vertex AI Model"),
    ("Vertex Endpoint", "Vertex AI Endpoint"),
    ("Vertex Private Endpoint", "Vertex AI Private Endpoint"),
    ("Automl", "AutoML"),
    ("AutoML Tables", "AutoML Tabular"),
    ("AutoML Vision", "AutoML Image"),
    ("AutoML Language", "AutoML Text"),
    ("Tensorflow", "TensorFlow"),
    ("Tensorboard", "TensorBoard"),
    ("Google Cloud Notebooks", "Vertex AI Workbench Notebooks"),
    ("BQ", "BigQuery"),
    ("Bigquery", "BigQuery"),
    ("BQML", "BigQuery ML"),
    ("GCS", "Cloud Storage"),
    ("Google Cloud Storage", "Cloud Storage"),
    ("Pytorch", "PyTorch"),
    ("Sklearn", "scikit-learn"),
    ("sklearn", "scikit-learn"),
];

/// Fully upper-case words that are allowed in a sentence-case heading
pub const HEADING_ALLOW_LIST: &[&str] = &[
    "E2E", "Vertex", "AutoML", "ML", "AI", "GCP", "API", "R", "CMEK", "TF", "TFX", "TFDV", "SDK",
    "VM", "CPR", "NVIDIA", "ID", "DASK", "ARIMA_PLUS", "KFP", "I/O", "GPU", "Google", "TensorFlow",
    "PyTorch",
];

/// Run the per-line style rules over a markdown cell
pub fn lint_cell(path: &Path, cell: &Cell, session: &mut ErrorSession) {
    for line in &cell.source {
        for violation in lint_line(path, line) {
            session.report(violation);
        }
    }
}

/// Style rules for one line; a line may break several at once
pub fn lint_line(path: &Path, line: &str) -> Vec<Violation> {
    let mut violations = Vec::new();

    if line.contains("TODO") {
        violations.push(Violation::new(path, ErrorCode::TodoMarker, "TODO in cell").with_line(line));
    }
    if FIRST_PERSON_RE.is_match(line) {
        violations.push(
            Violation::new(
                path,
                ErrorCode::WrongPerson,
                "Do not use first person (e.g., we), replace with 2nd person (you)",
            )
            .with_line(line),
        );
    }
    if FUTURE_TENSE_RE.is_match(line) {
        violations.push(
            Violation::new(
                path,
                ErrorCode::WrongTense,
                "Do not use future tense (e.g., will), replace with present tense",
            )
            .with_line(line),
        );
    }
    for brand in branding_mistakes(line) {
        violations.push(
            Violation::new(path, ErrorCode::BrandingError, format!("Branding {}", brand))
                .with_line(line),
        );
    }

    violations
}

/// Canonical name for each deprecated term in `line`, once per term.
///
/// An occurrence lying inside a longer matched term is ignored, so
/// `BQML` reports `BigQuery ML` only. Two different terms with the same
/// replacement are reported separately.
pub fn branding_mistakes(line: &str) -> Vec<&'static str> {
    let mut spans: Vec<(usize, usize, usize)> = Vec::new();
    for (idx, (mistake, _)) in BRANDING.iter().enumerate() {
        for (start, matched) in line.match_indices(mistake) {
            spans.push((start, start + matched.len(), idx));
        }
    }

    let mut terms: Vec<usize> = Vec::new();
    for &(start, end, idx) in &spans {
        let covered = spans
            .iter()
            .any(|&(s, e, other)| other != idx && s <= start && end <= e && e - s > end - start);
        if !covered && !terms.contains(&idx) {
            terms.push(idx);
        }
    }
    terms.sort_unstable();
    terms.into_iter().map(|idx| BRANDING[idx].1).collect()
}

/// Check that a title heading is in sentence case
pub fn check_heading_case(path: &Path, heading: &str, session: &mut ErrorSession) {
    for violation in heading_case_violations(path, heading) {
        session.report(violation);
    }
}

pub fn heading_case_violations(path: &Path, heading: &str) -> Vec<Violation> {
    let mut violations = Vec::new();

    let first = heading.split(' ').next().unwrap_or("");
    if !first.chars().next().is_some_and(char::is_uppercase) {
        violations.push(Violation::new(
            path,
            ErrorCode::HeadingCapitalization,
            format!("heading must start with capitalized word: {}", first),
        ));
    }

    for (i, word) in heading.split(' ').enumerate() {
        let word: String = word.chars().filter(|c| !matches!(c, ':' | '(' | ')')).collect();
        if HEADING_ALLOW_LIST.contains(&word.as_str()) {
            continue;
        }
        // a single capital letter is a normal sentence start ("A guide to ...")
        if i == 0 && word.chars().filter(|c| c.is_alphabetic()).count() < 2 {
            continue;
        }
        if is_all_caps(&word) {
            violations.push(Violation::new(
                path,
                ErrorCode::HeadingSentenceCase,
                format!("heading is not sentence case: {}", word),
            ));
        }
    }

    violations
}

/// At least one cased letter and no lower-case ones
fn is_all_caps(word: &str) -> bool {
    word.chars().any(char::is_uppercase) && !word.chars().any(char::is_lowercase)
}

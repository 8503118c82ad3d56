// nbreview - Notebook template reviewer
// Checks tutorial notebooks against the standard section template

pub mod cli;
pub mod models;
pub mod parser;
pub mod render;
pub mod report;
pub mod validator;

pub use anyhow::{Context, Result};
pub use colored::Colorize;

// Re-export commonly used types
pub use models::{ErrorCode, Notebook, ReviewConfig, ReviewError, Violation};
pub use report::{BatchOutcome, ErrorSession, ReportOptions};
pub use validator::{review_notebook, LinkProbe, NotebookReview};

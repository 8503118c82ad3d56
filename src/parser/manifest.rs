//! Notebook manifest files
//!
//! A manifest is a CSV file whose first row is a header. Every other row
//! names a tag, a notebook path and, optionally, a linkback path.

use crate::models::ReviewError;
use std::path::{Path, PathBuf};

/// One manifest row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// Grouping tag, possibly comma-joined
    pub tag: String,
    pub notebook: PathBuf,
    pub linkback: Option<String>,
}

pub fn load_manifest(path: &Path) -> Result<Vec<ManifestEntry>, ReviewError> {
    let content = std::fs::read_to_string(path).map_err(|source| ReviewError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_manifest(path, &content)
}

pub fn parse_manifest(path: &Path, content: &str) -> Result<Vec<ManifestEntry>, ReviewError> {
    let mut entries = Vec::new();

    for (idx, line) in content.lines().enumerate().skip(1) {
        if line.trim().is_empty() {
            continue;
        }
        let fields = split_row(line);
        if fields.len() < 2 || fields[1].trim().is_empty() {
            return Err(ReviewError::Manifest {
                path: path.to_path_buf(),
                reason: format!("row {} needs a tag and a notebook path", idx + 1),
            });
        }

        let linkback = fields
            .get(2)
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .map(str::to_string);
        entries.push(ManifestEntry {
            tag: fields[0].clone(),
            notebook: PathBuf::from(fields[1].trim()),
            linkback,
        });
    }

    Ok(entries)
}

/// Split one CSV row; double-quoted fields may hold commas and `""` escapes
fn split_row(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }
    fields.push(field);
    fields
}

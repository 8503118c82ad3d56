//! Notebook document model
//!
//! A notebook is loaded once from its JSON form and never mutated afterwards.
//! Only the parts the reviewer needs are kept: the ordered cells, their kind
//! and their source lines.

use crate::models::ReviewError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Kind of a notebook cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellKind {
    Markdown,
    Code,
    Raw,
}

/// One content unit of a notebook
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub kind: CellKind,
    /// Source lines, each keeping its trailing newline (if any)
    pub source: Vec<String>,
}

impl Cell {
    pub fn new(kind: CellKind, source: Vec<String>) -> Self {
        Self { kind, source }
    }

    pub fn markdown<S: AsRef<str>>(lines: &[S]) -> Self {
        Self::new(
            CellKind::Markdown,
            lines.iter().map(|l| l.as_ref().to_string()).collect(),
        )
    }

    pub fn code<S: AsRef<str>>(lines: &[S]) -> Self {
        Self::new(
            CellKind::Code,
            lines.iter().map(|l| l.as_ref().to_string()).collect(),
        )
    }

    /// A cell with no source lines; a single blank line still counts as content
    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    pub fn is_code(&self) -> bool {
        self.kind == CellKind::Code
    }

    pub fn is_markdown(&self) -> bool {
        self.kind == CellKind::Markdown
    }

    /// First source line, or `None` for an empty cell
    pub fn first_line(&self) -> Option<&str> {
        self.source.first().map(String::as_str)
    }

    /// First source line, or `""` for an empty cell
    pub fn heading(&self) -> &str {
        self.first_line().unwrap_or("")
    }

    pub fn line_count(&self) -> usize {
        self.source.len()
    }

    /// Whole cell text, lines concatenated as stored
    pub fn text(&self) -> String {
        self.source.concat()
    }
}

/// A loaded notebook document
#[derive(Debug, Clone)]
pub struct Notebook {
    pub path: PathBuf,
    pub cells: Vec<Cell>,
}

impl Notebook {
    pub fn new(path: impl Into<PathBuf>, cells: Vec<Cell>) -> Self {
        Self {
            path: path.into(),
            cells,
        }
    }

    /// Load a notebook from disk.
    ///
    /// Unreadable files surface as `ReviewError::Io`; anything that is not a
    /// well-formed notebook surfaces as `ReviewError::Corrupted`.
    pub fn load(path: &Path) -> Result<Self, ReviewError> {
        let content = std::fs::read_to_string(path).map_err(|source| ReviewError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &content)
    }

    /// Parse notebook JSON that was already read into memory
    pub fn parse(path: &Path, content: &str) -> Result<Self, ReviewError> {
        let raw: RawNotebook =
            serde_json::from_str(content).map_err(|e| ReviewError::Corrupted {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        let cells = raw
            .cells
            .into_iter()
            .map(|cell| Cell::new(cell.cell_type, cell.source.into_lines()))
            .collect();

        Ok(Self::new(path, cells))
    }

    /// Bounds-checked access to a cell
    pub fn cell(&self, position: usize) -> Option<&Cell> {
        self.cells.get(position)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[derive(Deserialize)]
struct RawNotebook {
    cells: Vec<RawCell>,
}

#[derive(Deserialize)]
struct RawCell {
    cell_type: CellKind,
    #[serde(default)]
    source: RawSource,
}

/// Notebook sources are either a list of lines or one multi-line string
#[derive(Deserialize)]
#[serde(untagged)]
enum RawSource {
    Lines(Vec<String>),
    Text(String),
}

impl Default for RawSource {
    fn default() -> Self {
        RawSource::Lines(Vec::new())
    }
}

impl RawSource {
    fn into_lines(self) -> Vec<String> {
        match self {
            RawSource::Lines(lines) => lines,
            RawSource::Text(text) => text.split_inclusive('\n').map(str::to_string).collect(),
        }
    }
}

use crate::models::{Cell, ErrorCode, Notebook, ReviewError, Violation};
use crate::report::ErrorSession;
use crate::validator::text;

/// Forward-only position in a notebook's cell list.
///
/// Empty cells are reported and stepped over; markdown cells are linted as
/// they are handed out. The position never moves backwards.
#[derive(Debug, Default)]
pub struct Cursor {
    position: usize,
}

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the next cell to inspect
    pub fn position(&self) -> usize {
        self.position
    }

    /// Return the next non-empty cell.
    ///
    /// Fails with `SequenceExhausted` when the notebook has no cells left.
    pub fn next<'a>(
        &mut self,
        notebook: &'a Notebook,
        session: &mut ErrorSession,
    ) -> Result<&'a Cell, ReviewError> {
        loop {
            let cell = notebook
                .cell(self.position)
                .ok_or_else(|| ReviewError::SequenceExhausted {
                    path: notebook.path.clone(),
                    position: self.position,
                })?;

            if cell.is_empty() {
                session.report(Violation::new(
                    &notebook.path,
                    ErrorCode::EmptyCell,
                    format!("empty cell: cell #{}", self.position),
                ));
                self.position += 1;
                continue;
            }

            if cell.is_markdown() {
                text::lint_cell(&notebook.path, cell, session);
            }
            self.position += 1;
            return Ok(cell);
        }
    }
}

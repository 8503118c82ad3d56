//! Section grammar engine
//!
//! A template is an ordered list of [`SectionRule`]s. The matcher walks the
//! rules once, in order, pulling cells through a [`Pass`]. Optional rules
//! only consume a cell when their heading matches. Required rules always
//! consume one, reporting a violation when it is the wrong cell, so the rest
//! of the notebook is still checked in the same pass.

use crate::models::{
    Cell, ErrorCode, ExtractedFields, LinkConfig, Links, Notebook, ReviewError, Violation,
};
use crate::report::ErrorSession;
use crate::validator::cursor::Cursor;
use crate::validator::links::{LinkProbe, LinkValidator};
use crate::validator::sections::TEMPLATE;

/// Predicate over a cell's first line
#[derive(Debug, Clone, Copy)]
pub enum Heading {
    /// First line starts with any of these (case-sensitive)
    Prefix(&'static [&'static str]),
    /// First line contains this text
    Contains(&'static str),
}

impl Heading {
    pub fn matches(&self, cell: &Cell) -> bool {
        let first = cell.heading();
        match self {
            Heading::Prefix(prefixes) => prefixes.iter().any(|p| first.starts_with(p)),
            Heading::Contains(needle) => first.contains(needle),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Presence {
    Required {
        code: ErrorCode,
        message: &'static str,
    },
    Optional,
}

/// A heading that is right in text but at the wrong level
#[derive(Debug, Clone, Copy)]
pub struct WrongLevel {
    pub prefix: &'static str,
    pub code: ErrorCode,
    pub message: &'static str,
}

/// Side action run on a rule's cell
pub type SectionAction = for<'a> fn(&mut Pass<'a>, &'a Cell) -> Result<(), ReviewError>;

/// Action run before a rule looks at its cell
pub type SectionGuard = for<'a> fn(&mut Pass<'a>) -> Result<(), ReviewError>;

/// One entry of the template grammar
#[derive(Clone, Copy)]
pub struct SectionRule {
    pub name: &'static str,
    pub heading: Heading,
    pub presence: Presence,
    pub wrong_level: Option<WrongLevel>,
    pub guard: Option<SectionGuard>,
    pub on_match: Option<SectionAction>,
    pub on_mismatch: Option<SectionAction>,
}

impl SectionRule {
    pub const fn required(
        name: &'static str,
        heading: Heading,
        code: ErrorCode,
        message: &'static str,
    ) -> Self {
        Self {
            name,
            heading,
            presence: Presence::Required { code, message },
            wrong_level: None,
            guard: None,
            on_match: None,
            on_mismatch: None,
        }
    }

    pub const fn optional(name: &'static str, heading: Heading) -> Self {
        Self {
            name,
            heading,
            presence: Presence::Optional,
            wrong_level: None,
            guard: None,
            on_match: None,
            on_mismatch: None,
        }
    }

    pub const fn on_match(mut self, action: SectionAction) -> Self {
        self.on_match = Some(action);
        self
    }

    pub const fn on_mismatch(mut self, action: SectionAction) -> Self {
        self.on_mismatch = Some(action);
        self
    }

    pub const fn guard(mut self, guard: SectionGuard) -> Self {
        self.guard = Some(guard);
        self
    }

    pub const fn wrong_level(
        mut self,
        prefix: &'static str,
        code: ErrorCode,
        message: &'static str,
    ) -> Self {
        self.wrong_level = Some(WrongLevel {
            prefix,
            code,
            message,
        });
        self
    }

    pub fn is_required(&self) -> bool {
        matches!(self.presence, Presence::Required { .. })
    }
}

/// State of one review of one notebook
pub struct Pass<'a> {
    pub notebook: &'a Notebook,
    session: &'a mut ErrorSession,
    links: LinkValidator<'a>,
    cursor: Cursor,
    pending: Option<&'a Cell>,
    pub fields: ExtractedFields,
}

impl<'a> Pass<'a> {
    pub fn new(
        notebook: &'a Notebook,
        config: &'a LinkConfig,
        probe: &'a dyn LinkProbe,
        session: &'a mut ErrorSession,
    ) -> Self {
        Self {
            notebook,
            session,
            links: LinkValidator::new(config, probe),
            cursor: Cursor::new(),
            pending: None,
            fields: ExtractedFields::default(),
        }
    }

    /// Current cell, fetched from the cursor if none is pending
    pub fn peek(&mut self) -> Result<&'a Cell, ReviewError> {
        if let Some(cell) = self.pending {
            return Ok(cell);
        }
        let cell = self.cursor.next(self.notebook, self.session)?;
        self.pending = Some(cell);
        Ok(cell)
    }

    /// Mark the current cell as used
    pub fn consume(&mut self) {
        self.pending = None;
    }

    /// Current cell, consumed
    pub fn take(&mut self) -> Result<&'a Cell, ReviewError> {
        let cell = self.peek()?;
        self.consume();
        Ok(cell)
    }

    /// Consume the current cell only when its heading matches
    pub fn take_if(&mut self, heading: Heading) -> Result<Option<&'a Cell>, ReviewError> {
        let cell = self.peek()?;
        if heading.matches(cell) {
            self.consume();
            Ok(Some(cell))
        } else {
            Ok(None)
        }
    }

    pub fn position(&self) -> usize {
        self.cursor.position()
    }

    pub fn report(&mut self, code: ErrorCode, message: impl Into<String>) {
        self.session
            .report(Violation::new(&self.notebook.path, code, message));
    }

    pub fn report_line(&mut self, code: ErrorCode, message: impl Into<String>, line: &str) {
        self.session
            .report(Violation::new(&self.notebook.path, code, message).with_line(line));
    }

    pub fn session(&mut self) -> &mut ErrorSession {
        &mut *self.session
    }

    pub fn validate_links(&mut self, cell: &Cell) -> Links {
        self.links.validate(&self.notebook.path, cell, self.session)
    }

    /// Evaluate one rule against the current cell
    pub fn apply(&mut self, rule: &SectionRule) -> Result<(), ReviewError> {
        if let Some(guard) = rule.guard {
            guard(self)?;
        }

        let cell = self.peek()?;
        let matched = rule.heading.matches(cell);
        tracing::trace!(section = rule.name, matched, position = self.position(), "section");

        match rule.presence {
            Presence::Optional => {
                if matched {
                    self.consume();
                    if let Some(action) = rule.on_match {
                        action(self, cell)?;
                    }
                }
            }
            Presence::Required { code, message } => {
                self.consume();
                if matched {
                    if let Some(action) = rule.on_match {
                        action(self, cell)?;
                    }
                } else {
                    let (code, message) = match rule.wrong_level {
                        Some(w) if cell.heading().starts_with(w.prefix) => (w.code, w.message),
                        _ => (code, message),
                    };
                    self.report(code, message);
                    if let Some(action) = rule.on_mismatch {
                        action(self, cell)?;
                    }
                }
            }
        }

        Ok(())
    }

    /// Evaluate every rule in order
    pub fn run(&mut self, rules: &[SectionRule]) -> Result<(), ReviewError> {
        for rule in rules {
            self.apply(rule)?;
        }
        Ok(())
    }
}

/// Result of reviewing one notebook
#[derive(Debug)]
pub struct NotebookReview {
    pub fields: ExtractedFields,
    /// Set when the review stopped before the end of the template
    pub aborted: Option<ReviewError>,
}

/// Check a notebook against the standard template.
///
/// Violations go to `session`. Fields extracted before an abort are kept.
pub fn review_notebook(
    notebook: &Notebook,
    config: &LinkConfig,
    probe: &dyn LinkProbe,
    session: &mut ErrorSession,
) -> NotebookReview {
    review_with_rules(notebook, TEMPLATE, config, probe, session)
}

pub fn review_with_rules(
    notebook: &Notebook,
    rules: &[SectionRule],
    config: &LinkConfig,
    probe: &dyn LinkProbe,
    session: &mut ErrorSession,
) -> NotebookReview {
    tracing::debug!(path = %notebook.path.display(), cells = notebook.len(), "reviewing notebook");
    let mut pass = Pass::new(notebook, config, probe, session);
    let aborted = pass.run(rules).err();
    NotebookReview {
        fields: pass.fields,
        aborted,
    }
}

//! Batch-wide violation accumulator
//!
//! One `ErrorSession` lives for a whole command invocation. Violations that
//! pass the report filter are written to the sink and counted. By default
//! every violation is also kept in memory for inspection; a streaming
//! session (`without_history`) keeps only the count.

use crate::models::{ErrorCode, Violation};
use std::io::Write;
use std::path::PathBuf;

/// How violations are reported
#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    /// Report violations at all
    pub enabled: bool,
    /// Emit `<path>,<code>` rows instead of text lines
    pub csv: bool,
    /// Only report these numeric codes (empty = all)
    pub codes: Vec<u16>,
}

impl ReportOptions {
    /// Whether a violation with this code is emitted
    pub fn accepts(&self, code: ErrorCode) -> bool {
        self.enabled && (self.codes.is_empty() || self.codes.contains(&code.code()))
    }
}

/// A notebook whose review was abandoned
#[derive(Debug, Clone)]
pub struct SkippedDocument {
    pub path: PathBuf,
    pub reason: String,
}

/// Final tally of a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Violations actually emitted
    pub violations: usize,
    /// Notebooks that could not be reviewed
    pub skipped: usize,
}

impl BatchOutcome {
    pub fn is_clean(&self) -> bool {
        self.violations == 0 && self.skipped == 0
    }

    /// Process exit status for this outcome
    pub fn exit_code(&self) -> i32 {
        if self.violations > 0 {
            self.violations.min(255) as i32
        } else if self.skipped > 0 {
            1
        } else {
            0
        }
    }
}

pub struct ErrorSession {
    options: ReportOptions,
    sink: Option<Box<dyn Write>>,
    recorded: Vec<Violation>,
    retain: bool,
    emitted: usize,
    skipped: Vec<SkippedDocument>,
    last_tag: Option<Vec<String>>,
}

impl ErrorSession {
    /// Session that records violations without writing them anywhere
    pub fn new(options: ReportOptions) -> Self {
        Self {
            options,
            sink: None,
            recorded: Vec::new(),
            retain: true,
            emitted: 0,
            skipped: Vec::new(),
            last_tag: None,
        }
    }

    /// Stream emitted violations to `sink` as they are found
    pub fn with_sink(mut self, sink: Box<dyn Write>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Stop keeping violations in memory; only the emitted count remains
    pub fn without_history(mut self) -> Self {
        self.retain = false;
        self
    }

    pub fn options(&self) -> &ReportOptions {
        &self.options
    }

    /// Emit one violation when the report filter accepts it, and keep it
    /// unless the session streams without history
    pub fn report(&mut self, violation: Violation) {
        if self.options.accepts(violation.code) {
            if let Some(sink) = self.sink.as_mut() {
                let line = if self.options.csv {
                    violation.format_csv()
                } else {
                    violation.format()
                };
                if let Err(e) = writeln!(sink, "{}", line) {
                    tracing::warn!("failed to write violation: {}", e);
                }
            }
            self.emitted += 1;
        }
        if self.retain {
            self.recorded.push(violation);
        }
    }

    pub fn skip(&mut self, path: impl Into<PathBuf>, reason: impl Into<String>) {
        let skipped = SkippedDocument {
            path: path.into(),
            reason: reason.into(),
        };
        tracing::debug!(path = %skipped.path.display(), "skipped notebook: {}", skipped.reason);
        self.skipped.push(skipped);
    }

    /// Every violation found, filtered or not (empty without history)
    pub fn violations(&self) -> &[Violation] {
        &self.recorded
    }

    /// Violations found in one notebook
    pub fn violations_for(&self, path: &std::path::Path) -> Vec<&Violation> {
        self.recorded.iter().filter(|v| v.path == path).collect()
    }

    pub fn emitted_count(&self) -> usize {
        self.emitted
    }

    pub fn skipped(&self) -> &[SkippedDocument] {
        &self.skipped
    }

    pub fn last_tag(&self) -> Option<&[String]> {
        self.last_tag.as_deref()
    }

    /// Remember `tags`; returns true when they differ from the last ones seen
    pub fn update_last_tag(&mut self, tags: Vec<String>) -> bool {
        if self.last_tag.as_ref() == Some(&tags) {
            return false;
        }
        self.last_tag = Some(tags);
        true
    }

    pub fn outcome(&self) -> BatchOutcome {
        BatchOutcome {
            violations: self.emitted,
            skipped: self.skipped.len(),
        }
    }

    pub fn flush(&mut self) {
        if let Some(sink) = self.sink.as_mut() {
            let _ = sink.flush();
        }
    }
}

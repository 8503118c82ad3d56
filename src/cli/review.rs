//! Batch driver: enumerate notebooks, review each one, emit the index

use crate::models::{IndexEntry, Notebook, ReviewConfig};
use crate::parser::load_manifest;
use crate::render::{markdown, IndexFormat, IndexOptions};
use crate::report::{BatchOutcome, ErrorSession};
use crate::validator::{review_notebook, LinkProbe};
use crate::Result;
use anyhow::{bail, Context};
use colored::Colorize;
use std::io::Write;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// What to review
#[derive(Debug, Clone)]
pub enum Target {
    /// Every notebook under a directory
    Directory(PathBuf),
    /// A single notebook
    Notebook(PathBuf),
    /// Notebooks listed in a CSV manifest
    Manifest(PathBuf),
}

pub struct BatchReviewer<'a> {
    config: &'a ReviewConfig,
    probe: &'a dyn LinkProbe,
    index: &'a IndexOptions,
    out: &'a mut dyn Write,
}

impl<'a> BatchReviewer<'a> {
    pub fn new(
        config: &'a ReviewConfig,
        probe: &'a dyn LinkProbe,
        index: &'a IndexOptions,
        out: &'a mut dyn Write,
    ) -> Self {
        Self {
            config,
            probe,
            index,
            out,
        }
    }

    /// Review every notebook of `target`, one after another
    pub fn run(&mut self, target: &Target, session: &mut ErrorSession) -> Result<BatchOutcome> {
        if let Some(header) = self.index.header() {
            write!(self.out, "{}", header)?;
        }

        match target {
            Target::Directory(dir) => {
                if !dir.is_dir() {
                    bail!("not a directory: {}", dir.display());
                }
                self.review_directory(dir, session)?;
            }
            Target::Notebook(path) => {
                if !path.is_file() {
                    bail!("not a notebook: {}", path.display());
                }
                self.review_document(path, "", None, session)?;
            }
            Target::Manifest(path) => {
                if !path.is_file() {
                    bail!("file does not exist: {}", path.display());
                }
                let entries = load_manifest(path)
                    .with_context(|| format!("Failed to load manifest {}", path.display()))?;
                for entry in entries {
                    self.review_document(
                        &entry.notebook,
                        &entry.tag,
                        entry.linkback.as_deref(),
                        session,
                    )?;
                }
            }
        }

        if let Some(footer) = self.index.footer() {
            write!(self.out, "{}", footer)?;
        }
        self.out.flush()?;
        session.flush();

        let outcome = session.outcome();
        tracing::info!(
            violations = outcome.violations,
            skipped = outcome.skipped,
            "batch finished"
        );
        Ok(outcome)
    }

    fn review_directory(&mut self, root: &Path, session: &mut ErrorSession) -> Result<()> {
        let config = self.config;
        let reserved = &config.batch.reserved_dirs;
        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_excluded(e, reserved));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("skipping unreadable entry: {}", e);
                    continue;
                }
            };

            if entry.file_type().is_dir() {
                if entry.depth() > 0 && self.index.format == Some(IndexFormat::Markdown) {
                    let name = entry.file_name().to_string_lossy();
                    write!(self.out, "{}", markdown::directory_heading(&name))?;
                }
                continue;
            }

            let is_notebook = entry
                .path()
                .extension()
                .is_some_and(|ext| ext == config.batch.extension.as_str());
            if is_notebook {
                self.review_document(entry.path(), "", None, session)?;
            }
        }
        Ok(())
    }

    /// Review one notebook; document-level failures are recorded, not returned
    pub fn review_document(
        &mut self,
        path: &Path,
        tag: &str,
        linkback: Option<&str>,
        session: &mut ErrorSession,
    ) -> Result<()> {
        let notebook = match Notebook::load(path) {
            Ok(notebook) => notebook,
            Err(e) if e.is_document_fatal() => {
                eprintln!("{}", e.to_string().yellow());
                session.skip(path, e.to_string());
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        let review = review_notebook(&notebook, &self.config.links, self.probe, session);
        if let Some(e) = &review.aborted {
            eprintln!("{}", e.to_string().yellow());
            session.skip(path, e.to_string());
        }

        if self.index.is_enabled() {
            if let Some(entry) = IndexEntry::from_fields(&review.fields, tag, linkback) {
                if let Some(text) = self.index.render(&entry, session) {
                    write!(self.out, "{}", text)?;
                }
            }
        }
        Ok(())
    }
}

/// Hidden entries and reserved directories are never visited
fn is_excluded(entry: &DirEntry, reserved: &[String]) -> bool {
    let name = entry.file_name().to_string_lossy();
    if name.starts_with('.') {
        return true;
    }
    entry.file_type().is_dir() && reserved.iter().any(|r| r.as_str() == name)
}

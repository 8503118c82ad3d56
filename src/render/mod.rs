//! Index rendering for reviewed notebooks
//!
//! Renderers only format fields that the review already extracted; they
//! never look at notebook content themselves.

pub mod html;
pub mod markdown;

use crate::models::IndexEntry;
use crate::report::ErrorSession;

/// Output layout of the notebook index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexFormat {
    /// One `<tr>` per notebook
    Html,
    /// Listing grouped by tag
    Markdown,
    /// Selected fields only
    Plain,
}

/// What to render for each notebook
#[derive(Debug, Clone, Default)]
pub struct IndexOptions {
    pub format: Option<IndexFormat>,
    pub title: bool,
    pub description: bool,
    pub uses: bool,
    pub steps: bool,
}

impl IndexOptions {
    pub fn is_enabled(&self) -> bool {
        self.format.is_some()
    }

    /// Text printed before the first entry
    pub fn header(&self) -> Option<String> {
        match self.format {
            Some(IndexFormat::Html) => Some(html::table_header()),
            _ => None,
        }
    }

    /// Text printed after the last entry
    pub fn footer(&self) -> Option<String> {
        match self.format {
            Some(IndexFormat::Html) => Some(html::table_footer()),
            _ => None,
        }
    }

    /// Render one entry; the markdown layout tracks the session's last tag
    pub fn render(&self, entry: &IndexEntry, session: &mut ErrorSession) -> Option<String> {
        match self.format? {
            IndexFormat::Html => Some(html::render_row(entry, self)),
            IndexFormat::Markdown => Some(markdown::render_entry(entry, self, session)),
            IndexFormat::Plain => Some(render_plain(entry, self)),
        }
    }
}

fn render_plain(entry: &IndexEntry, options: &IndexOptions) -> String {
    let mut out = String::new();
    if options.title {
        out.push_str(&entry.display_title());
        out.push('\n');
    }
    if options.description {
        out.push_str(&entry.description);
    }
    if options.uses {
        out.push_str(&entry.uses);
    }
    if options.steps {
        out.push_str(&entry.steps);
    }
    out
}

use crate::models::IndexEntry;
use crate::render::IndexOptions;
use crate::report::ErrorSession;

/// Heading printed when a batch directory is entered
pub fn directory_heading(name: &str) -> String {
    format!("\n## {} \n", name)
}

/// Listing entry for a notebook, preceded by a tag heading when the tag changes
pub fn render_entry(entry: &IndexEntry, options: &IndexOptions, session: &mut ErrorSession) -> String {
    let mut out = String::new();

    if !entry.tag.is_empty() {
        let tags: Vec<String> = entry.tags().into_iter().map(|t| t.replace('\'', "")).collect();
        let heading = tags.join(" ");
        if session.update_last_tag(tags) {
            out.push_str(&format!("\n### {}\n\n", heading));
        }
    }

    let link = entry.links.github.as_deref().unwrap_or("");
    out.push_str(&format!("\n[{}]({})\n\n", entry.display_title(), link));

    if options.description {
        out.push_str(&entry.description);
        out.push('\n');
    }
    if options.uses {
        out.push_str(&entry.uses);
        out.push('\n');
    }
    if options.steps {
        out.push_str(&entry.steps);
        out.push('\n');
    }
    out
}

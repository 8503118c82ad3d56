use crate::models::IndexEntry;
use crate::render::IndexOptions;

pub fn table_header() -> String {
    [
        "<table>",
        "    <th>Vertex AI Feature</th>",
        "    <th>Description</th>",
        "    <th>Open in</th>",
        "",
    ]
    .join("\n")
}

pub fn table_footer() -> String {
    "</table>\n".to_string()
}

/// One table row for a notebook
pub fn render_row(entry: &IndexEntry, options: &IndexOptions) -> String {
    let tags = entry.tags();
    let title = entry.display_title().replace('`', "");
    let mut out = String::new();

    out.push_str("    <tr>\n");
    out.push_str("        <td>\n");
    for tag in &tags {
        out.push_str(&format!("            {}<br/>\n\n", tag));
    }
    out.push_str("        </td>\n");
    out.push_str("        <td>\n");
    out.push_str(&format!("            {}<br/>\n\n", title));
    if options.description {
        out.push_str(&format!(
            "            {}<br/>\n\n",
            entry.description.trim_end().replace('`', "")
        ));
    }
    if let Some(linkback) = &entry.linkback {
        out.push_str(&format!(
            "            Learn more about <a href=\"https://cloud.google.com/{}\">{}</a><br/>\n\n",
            linkback,
            tags.join(" ")
        ));
    }
    out.push_str("        </td>\n");
    out.push_str("        <td>\n");
    for (link, label) in [
        (&entry.links.colab, "Colab"),
        (&entry.links.github, "GitHub"),
        (&entry.links.workbench, "Vertex AI Workbench"),
    ] {
        if let Some(link) = link {
            out.push_str(&format!("            <a href=\"{}\">{}</a><br/>\n\n", link, label));
        }
    }
    out.push_str("        </td>\n");
    out.push_str("    </tr>\n\n");
    out
}

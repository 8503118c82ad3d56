use crate::models::LinkKind;
use serde::Serialize;
use std::collections::BTreeSet;

/// Billable service inferred from an Objective section
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum CostCategory {
    BigQuery,
    Vertex,
    Dataflow,
}

impl CostCategory {
    pub const ALL: [CostCategory; 3] = [
        CostCategory::BigQuery,
        CostCategory::Vertex,
        CostCategory::Dataflow,
    ];

    /// Keyword that marks the service in section text
    pub fn keyword(&self) -> &'static str {
        match self {
            CostCategory::BigQuery => "BigQuery",
            CostCategory::Vertex => "Vertex",
            CostCategory::Dataflow => "Dataflow",
        }
    }
}

/// The three launch links found in a title cell
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Links {
    pub github: Option<String>,
    pub colab: Option<String>,
    pub workbench: Option<String>,
}

impl Links {
    pub fn get(&self, kind: LinkKind) -> Option<&str> {
        match kind {
            LinkKind::GitHub => self.github.as_deref(),
            LinkKind::Colab => self.colab.as_deref(),
            LinkKind::Workbench => self.workbench.as_deref(),
        }
    }

    pub fn set(&mut self, kind: LinkKind, url: String) {
        match kind {
            LinkKind::GitHub => self.github = Some(url),
            LinkKind::Colab => self.colab = Some(url),
            LinkKind::Workbench => self.workbench = Some(url),
        }
    }
}

/// Output of the Objective section parser
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Objective {
    pub description: String,
    pub uses: String,
    pub steps: String,
    pub costs: BTreeSet<CostCategory>,
}

/// Fields collected while one notebook is reviewed
#[derive(Debug, Clone, Default)]
pub struct ExtractedFields {
    pub title: String,
    pub links: Links,
    /// `None` until the Objective section has been matched
    pub objective: Option<Objective>,
}

impl ExtractedFields {
    pub fn costs(&self) -> BTreeSet<CostCategory> {
        self.objective
            .as_ref()
            .map(|o| o.costs.clone())
            .unwrap_or_default()
    }
}

/// Everything the index renderers need about one notebook
#[derive(Debug, Clone, Default, Serialize)]
pub struct IndexEntry {
    /// Grouping tag, possibly comma-joined
    pub tag: String,
    pub title: String,
    pub description: String,
    pub uses: String,
    pub steps: String,
    pub links: Links,
    /// Path under cloud.google.com to link back to
    pub linkback: Option<String>,
}

impl IndexEntry {
    /// Build an entry from a finished pass; `None` when no Objective was found
    pub fn from_fields(fields: &ExtractedFields, tag: &str, linkback: Option<&str>) -> Option<Self> {
        let objective = fields.objective.as_ref()?;
        Some(Self {
            tag: tag.to_string(),
            title: fields.title.clone(),
            description: objective.description.clone(),
            uses: objective.uses.clone(),
            steps: objective.steps.clone(),
            links: fields.links.clone(),
            linkback: linkback.map(str::to_string),
        })
    }

    /// Tags split on commas and trimmed
    pub fn tags(&self) -> Vec<String> {
        self.tag.split(',').map(|t| t.trim().to_string()).collect()
    }

    /// Title with any `Prefix:` dropped and the first letter upper-cased
    pub fn display_title(&self) -> String {
        let title = self.title.rsplit(':').next().unwrap_or("").trim();
        let mut chars = title.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

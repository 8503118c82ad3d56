use crate::models::{LinkKind, ReviewError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default config file looked up in the current directory
pub const CONFIG_FILE: &str = "nbreview.toml";

/// Reviewer configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReviewConfig {
    /// Launch link settings
    #[serde(default)]
    pub links: LinkConfig,

    /// Batch enumeration settings
    #[serde(default)]
    pub batch: BatchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// Root that GitHub links are derived from
    pub github_base: String,
    /// Root that Colab links are derived from
    pub colab_base: String,
    /// Root that Workbench links are derived from
    pub workbench_base: String,
    /// Path prefix dropped from a notebook path before deriving links
    pub strip_prefix: Option<String>,
    /// Probe links over the network before falling back to derived links
    pub check: bool,
    pub timeout_secs: u64,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            github_base: "https://github.com/GoogleCloudPlatform/vertex-ai-samples/blob/main/notebooks/".to_string(),
            colab_base: "https://colab.research.google.com/github/GoogleCloudPlatform/vertex-ai-samples/blob/main/notebooks".to_string(),
            workbench_base: "https://console.cloud.google.com/vertex-ai/workbench/deploy-notebook?download_url=https://raw.githubusercontent.com/GoogleCloudPlatform/vertex-ai-samples/main/notebooks/".to_string(),
            strip_prefix: None,
            check: true,
            timeout_secs: 30,
        }
    }
}

impl LinkConfig {
    pub fn base(&self, kind: LinkKind) -> &str {
        match kind {
            LinkKind::GitHub => &self.github_base,
            LinkKind::Colab => &self.colab_base,
            LinkKind::Workbench => &self.workbench_base,
        }
    }

    /// Link a notebook at `path` is expected to have once it is published
    pub fn canonical_url(&self, kind: LinkKind, path: &Path) -> String {
        let path = path.to_string_lossy().replace('\\', "/");
        let mut relative = path.trim_start_matches("./");
        if let Some(prefix) = &self.strip_prefix {
            let prefix = prefix.trim_start_matches("./");
            if let Some(rest) = relative.strip_prefix(prefix) {
                relative = rest.trim_start_matches('/');
            }
        }
        format!("{}/{}", self.base(kind).trim_end_matches('/'), relative)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Directory names never descended into
    pub reserved_dirs: Vec<String>,
    /// Extension of notebook files
    pub extension: String,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            reserved_dirs: vec![
                "src".to_string(),
                "images".to_string(),
                "sample_data".to_string(),
            ],
            extension: "ipynb".to_string(),
        }
    }
}

impl ReviewConfig {
    /// Load config from an explicit file
    pub fn load(path: &Path) -> Result<Self, ReviewError> {
        let content = std::fs::read_to_string(path).map_err(|source| ReviewError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|e| ReviewError::Config(e.to_string()))
    }

    /// Load `nbreview.toml` from `dir`, or defaults when there is none
    pub fn discover(dir: &Path) -> Result<Self, ReviewError> {
        let config_path = dir.join(CONFIG_FILE);
        if !config_path.exists() {
            return Ok(Self::default());
        }
        Self::load(&config_path)
    }
}

//! Launch link block validation
//!
//! The title cell of every notebook carries three anchors (GitHub, Colab,
//! Workbench). Each found link is probed; an unreachable link is still
//! accepted when it equals the link derived from the notebook's own path,
//! which is the case for notebooks that are not published yet.

use crate::models::{Cell, ErrorCode, LinkConfig, LinkKind, Links, Violation};
use crate::report::ErrorSession;
use std::path::Path;

const HREF: &str = "<a href=\"";

/// Outcome of a reachability check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reachability {
    Reachable,
    Unreachable,
}

/// Capability to check whether a URL answers
pub trait LinkProbe {
    fn probe(&self, url: &str) -> Reachability;
}

impl<F> LinkProbe for F
where
    F: Fn(&str) -> Reachability,
{
    fn probe(&self, url: &str) -> Reachability {
        self(url)
    }
}

/// Probe that never touches the network
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineProbe;

impl LinkProbe for OfflineProbe {
    fn probe(&self, _url: &str) -> Reachability {
        Reachability::Unreachable
    }
}

/// Blocking HTTP GET probe
#[cfg(feature = "http-probe")]
pub struct HttpProbe {
    client: reqwest::blocking::Client,
}

#[cfg(feature = "http-probe")]
impl HttpProbe {
    pub fn new(timeout_secs: u64) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self { client })
    }
}

#[cfg(feature = "http-probe")]
impl LinkProbe for HttpProbe {
    fn probe(&self, url: &str) -> Reachability {
        match self.client.get(url).send() {
            Ok(response) if response.status().is_success() => Reachability::Reachable,
            Ok(response) => {
                tracing::debug!(url, status = %response.status(), "link probe failed");
                Reachability::Unreachable
            }
            Err(e) => {
                tracing::debug!(url, "link probe failed: {}", e);
                Reachability::Unreachable
            }
        }
    }
}

impl LinkKind {
    /// Start of the anchor that carries this link
    pub fn anchor(&self) -> &'static str {
        match self {
            LinkKind::GitHub => "<a href=\"https://github.com",
            LinkKind::Colab => "<a href=\"https://colab.research.google.com/",
            LinkKind::Workbench => "<a href=\"https://console.cloud.google.com/vertex-ai/workbench/",
        }
    }

    /// Button text that must accompany the anchor
    pub fn phrase(&self) -> &'static str {
        match self {
            LinkKind::GitHub => "View on GitHub",
            LinkKind::Colab => "Run in Colab",
            LinkKind::Workbench => "Open in Vertex AI Workbench",
        }
    }

    /// URL to probe for a link of this kind.
    ///
    /// Colab and Workbench pages answer for any path, so the notebook source
    /// they point at is probed instead.
    pub fn probe_url(&self, link: &str) -> String {
        match self {
            LinkKind::GitHub => link.to_string(),
            LinkKind::Colab => match link.split_once("colab.research.google.com/github/") {
                Some((_, rest)) => format!("https://github.com/{}", rest),
                None => link.to_string(),
            },
            LinkKind::Workbench => match link.split_once("download_url=") {
                Some((_, target)) => target.to_string(),
                None => link.to_string(),
            },
        }
    }
}

/// Pull the URL out of `line` if it holds the anchor for `kind`
pub fn extract_link(line: &str, kind: LinkKind) -> Option<String> {
    let start = line.find(kind.anchor())? + HREF.len();
    let rest = &line[start..];
    let url = match rest.find('"') {
        Some(end) => &rest[..end],
        None => rest.trim_end().trim_end_matches('>'),
    };
    Some(url.to_string())
}

pub struct LinkValidator<'a> {
    config: &'a LinkConfig,
    probe: &'a dyn LinkProbe,
}

impl<'a> LinkValidator<'a> {
    pub fn new(config: &'a LinkConfig, probe: &'a dyn LinkProbe) -> Self {
        Self { config, probe }
    }

    /// Validate the link block of a title cell and return the links found
    pub fn validate(&self, path: &Path, cell: &Cell, session: &mut ErrorSession) -> Links {
        let mut links = Links::default();

        for line in &cell.source {
            for kind in LinkKind::ALL {
                if let Some(link) = extract_link(line, kind) {
                    if let Some(violation) = self.check_link(path, kind, &link) {
                        session.report(violation);
                    }
                    links.set(kind, link);
                }
            }
        }

        let text = cell.text();
        for kind in LinkKind::ALL {
            if !text.contains(kind.phrase()) || links.get(kind).is_none() {
                session.report(Violation::new(
                    path,
                    ErrorCode::MissingLink(kind),
                    format!("Missing link for {}", kind.name()),
                ));
            }
        }

        links
    }

    /// Probe one link, falling back to the derived link when it does not answer
    fn check_link(&self, path: &Path, kind: LinkKind, link: &str) -> Option<Violation> {
        if self.config.check {
            let url = kind.probe_url(link);
            if self.probe.probe(&url) == Reachability::Reachable {
                return None;
            }
            tracing::debug!(url = %url, "{} link unreachable", kind.name());
        }

        let derived = self.config.canonical_url(kind, path);
        if link == derived {
            tracing::debug!(link, "accepting derived {} link", kind.name());
            return None;
        }

        Some(Violation::new(
            path,
            ErrorCode::BadLink(kind),
            format!("bad {} link: {}", kind.name(), link),
        ))
    }
}

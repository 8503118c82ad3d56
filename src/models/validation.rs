use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Which of the three launch links a violation is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LinkKind {
    GitHub,
    Colab,
    Workbench,
}

impl LinkKind {
    pub const ALL: [LinkKind; 3] = [LinkKind::GitHub, LinkKind::Colab, LinkKind::Workbench];

    /// Get display name for link kind
    pub fn name(&self) -> &'static str {
        match self {
            LinkKind::GitHub => "GitHub",
            LinkKind::Colab => "Colab",
            LinkKind::Workbench => "Workbench",
        }
    }
}

/// Every template violation the reviewer can report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorCode {
    MissingCopyright,
    TitleHeading,
    HeadingSentenceCase,
    HeadingCapitalization,
    MissingLink(LinkKind),
    BadLink(LinkKind),
    EmptyCell,
    MissingOverview,
    MissingObjective,
    MissingDataset,
    MissingCosts,
    WrongPerson,
    WrongTense,
    MissingDescription,
    MissingUses,
    MissingSteps,
    MissingCostReference,
    MissingInstallation,
    MissingInstallationCode,
    WrongPipBinary,
    MissingQuietFlag,
    MissingUserFlag,
    OutdatedInstallTemplate,
    PipNotIsolated,
    MissingRestartKernel,
    InstallationHeadingLevel,
    MissingRestartKernelCode,
    MissingBeforeYouBegin,
    IncompleteBeforeYouBegin,
    MissingProjectId,
    MissingProjectIdCode,
    ProjectIdTemplate,
    TodoMarker,
    BrandingError,
}

impl ErrorCode {
    /// Numeric code as printed and as accepted by `--errors-codes`
    pub fn code(&self) -> u16 {
        match self {
            ErrorCode::MissingCopyright => 0,
            ErrorCode::TitleHeading => 1,
            ErrorCode::HeadingSentenceCase => 2,
            ErrorCode::HeadingCapitalization => 3,
            ErrorCode::MissingLink(LinkKind::GitHub) => 4,
            ErrorCode::MissingLink(LinkKind::Colab) => 5,
            ErrorCode::MissingLink(LinkKind::Workbench) => 6,
            ErrorCode::BadLink(LinkKind::GitHub) => 7,
            ErrorCode::BadLink(LinkKind::Colab) => 8,
            ErrorCode::BadLink(LinkKind::Workbench) => 9,
            ErrorCode::EmptyCell => 10,
            ErrorCode::MissingOverview => 11,
            ErrorCode::MissingObjective => 12,
            ErrorCode::MissingDataset => 13,
            ErrorCode::MissingCosts => 14,
            ErrorCode::WrongPerson => 15,
            ErrorCode::WrongTense => 16,
            ErrorCode::MissingDescription => 17,
            ErrorCode::MissingUses => 18,
            ErrorCode::MissingSteps => 19,
            ErrorCode::MissingCostReference => 20,
            ErrorCode::MissingInstallation => 21,
            ErrorCode::MissingInstallationCode => 22,
            ErrorCode::WrongPipBinary | ErrorCode::MissingQuietFlag | ErrorCode::MissingUserFlag => 23,
            ErrorCode::OutdatedInstallTemplate => 24,
            ErrorCode::PipNotIsolated => 25,
            ErrorCode::MissingRestartKernel => 26,
            ErrorCode::InstallationHeadingLevel => 27,
            ErrorCode::MissingRestartKernelCode => 28,
            ErrorCode::MissingBeforeYouBegin => 29,
            ErrorCode::IncompleteBeforeYouBegin => 30,
            ErrorCode::MissingProjectId => 31,
            ErrorCode::MissingProjectIdCode => 32,
            ErrorCode::ProjectIdTemplate => 33,
            ErrorCode::TodoMarker => 40,
            ErrorCode::BrandingError => 41,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// One reported deviation from the template
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Notebook the violation was found in
    pub path: PathBuf,
    pub code: ErrorCode,
    /// Human-readable description
    pub message: String,
    /// Offending source line, if the violation is about one
    pub line: Option<String>,
}

impl Violation {
    pub fn new(path: impl Into<PathBuf>, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            code,
            message: message.into(),
            line: None,
        }
    }

    pub fn with_line(mut self, line: impl Into<String>) -> Self {
        self.line = Some(line.into());
        self
    }

    /// `<path>: ERROR (<code>): <message>`
    pub fn format(&self) -> String {
        match &self.line {
            Some(line) => format!(
                "{}: ERROR ({}): {}: {}",
                self.path.display(),
                self.code,
                self.message,
                line.trim_end()
            ),
            None => format!(
                "{}: ERROR ({}): {}",
                self.path.display(),
                self.code,
                self.message
            ),
        }
    }

    /// `<path>,<code>`
    pub fn format_csv(&self) -> String {
        format!("{},{}", self.path.display(), self.code)
    }
}

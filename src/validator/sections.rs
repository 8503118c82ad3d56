//! The notebook template, section by section

use crate::models::{Cell, ErrorCode, ReviewError};
use crate::parser::parse_objective;
use crate::validator::template::{Heading, Pass, SectionRule};
use crate::validator::text;

const PROJECT_ID_ASSIGN: &str = "PROJECT_ID = \"[your-project-id]\"";
const PROJECT_ID_GUARD: &str = "or PROJECT_ID == \"[your-project-id]\":";
const PROJECT_ID_SET: &str = "! gcloud config set project";
const WORKBENCH_CONDITIONAL: &str = "if IS_WORKBENCH_NOTEBOOK:";

/// Sections every notebook must follow, in order
pub static TEMPLATE: &[SectionRule] = &[
    SectionRule::required(
        "copyright",
        Heading::Contains("Copyright"),
        ErrorCode::MissingCopyright,
        "missing copyright cell",
    ),
    SectionRule::optional("notice", Heading::Prefix(&["This notebook"])),
    SectionRule::required(
        "title",
        Heading::Prefix(&["# "]),
        ErrorCode::TitleHeading,
        "title cell must start with H1 heading",
    )
    .on_match(title_and_links)
    .on_mismatch(links_only),
    SectionRule::required(
        "overview",
        Heading::Prefix(&["## Overview"]),
        ErrorCode::MissingOverview,
        "Overview section not found",
    ),
    SectionRule::required(
        "objective",
        Heading::Prefix(&["### Objective"]),
        ErrorCode::MissingObjective,
        "Objective section not found",
    )
    .on_match(objective),
    SectionRule::optional("recommendations", Heading::Prefix(&["### Recommendations"])),
    SectionRule::required(
        "dataset",
        Heading::Prefix(&["### Dataset", "### Model", "### Embedding"]),
        ErrorCode::MissingDataset,
        "Dataset/Model section not found",
    ),
    SectionRule::required(
        "costs",
        Heading::Prefix(&["### Costs"]),
        ErrorCode::MissingCosts,
        "Costs section not found",
    )
    .on_match(costs),
    SectionRule::optional(
        "local environment",
        Heading::Prefix(&["### Set up your local development environment"]),
    )
    .on_match(local_environment),
    SectionRule::optional("helper functions", Heading::Contains("helper")).on_match(one_more_cell),
    SectionRule::required(
        "installation",
        Heading::Prefix(&["## Install"]),
        ErrorCode::MissingInstallation,
        "Installation section not found",
    )
    .wrong_level(
        "### Install",
        ErrorCode::InstallationHeadingLevel,
        "Installation section needs to be H2 heading",
    )
    .on_match(installation),
    SectionRule::required(
        "restart kernel",
        Heading::Prefix(&["### Restart the kernel"]),
        ErrorCode::MissingRestartKernel,
        "Restart the kernel section not found",
    )
    .guard(stray_pip_cells)
    .on_match(restart_kernel),
    SectionRule::optional(
        "package versions",
        Heading::Prefix(&["#### Check package versions"]),
    )
    .on_match(one_more_cell),
    SectionRule::required(
        "before you begin",
        Heading::Prefix(&["## Before you begin"]),
        ErrorCode::MissingBeforeYouBegin,
        "Before you begin section not found",
    )
    .on_match(before_you_begin),
    SectionRule::optional("enable apis", Heading::Prefix(&["### Enable APIs"])).on_match(one_more_cell),
    SectionRule::required(
        "project id",
        Heading::Prefix(&["#### Set your project ID"]),
        ErrorCode::MissingProjectId,
        "Set project ID section not found",
    )
    .on_match(project_id),
];

fn title_and_links<'a>(pass: &mut Pass<'a>, cell: &'a Cell) -> Result<(), ReviewError> {
    let title = cell.heading().strip_prefix("# ").unwrap_or("").trim().to_string();
    let path = pass.notebook.path.clone();
    text::check_heading_case(&path, &title, pass.session());
    pass.fields.title = title;

    // a bare H1 cell keeps its links in the next cell
    let links_cell = if cell.line_count() == 1 {
        pass.take()?
    } else {
        cell
    };
    pass.fields.links = pass.validate_links(links_cell);
    Ok(())
}

fn links_only<'a>(pass: &mut Pass<'a>, cell: &'a Cell) -> Result<(), ReviewError> {
    pass.fields.links = pass.validate_links(cell);
    Ok(())
}

fn objective<'a>(pass: &mut Pass<'a>, cell: &'a Cell) -> Result<(), ReviewError> {
    let path = pass.notebook.path.clone();
    let objective = parse_objective(&path, cell, pass.session());
    pass.fields.objective = Some(objective);
    Ok(())
}

fn costs<'a>(pass: &mut Pass<'a>, cell: &'a Cell) -> Result<(), ReviewError> {
    let text = cell.text();
    for category in pass.fields.costs() {
        if !text.contains(category.keyword()) {
            pass.report(
                ErrorCode::MissingCostReference,
                format!("Costs section missing reference to {}", category.keyword()),
            );
        }
    }
    Ok(())
}

fn local_environment<'a>(pass: &mut Pass<'a>, _cell: &'a Cell) -> Result<(), ReviewError> {
    pass.take_if(Heading::Prefix(&[
        "**Otherwise**, make sure your environment meets",
    ]))?;
    Ok(())
}

/// Sections made of a heading cell followed by one code cell
fn one_more_cell<'a>(pass: &mut Pass<'a>, _cell: &'a Cell) -> Result<(), ReviewError> {
    pass.take()?;
    Ok(())
}

fn installation<'a>(pass: &mut Pass<'a>, _cell: &'a Cell) -> Result<(), ReviewError> {
    let mut code = pass.take()?;
    if !code.is_code() {
        pass.report(
            ErrorCode::MissingInstallationCode,
            "Installation code section not found",
        );
        return Ok(());
    }

    if code.heading().starts_with("! mkdir") {
        code = pass.take()?;
    }
    if code.heading().contains("requirements.txt") {
        code = pass.take()?;
    }

    check_install_cell(pass, code);
    Ok(())
}

/// Lines that run pip
fn is_pip_invocation(line: &str) -> bool {
    line.contains("pip ") || line.contains("pip3 ")
}

fn check_install_cell(pass: &mut Pass<'_>, cell: &Cell) {
    for line in &cell.source {
        if !is_pip_invocation(line) {
            continue;
        }
        if !line.contains("pip3") {
            pass.report_line(
                ErrorCode::WrongPipBinary,
                "Installation code section: use pip3",
                line,
            );
        }
        // flags of a continued command are on its last line
        if line.trim_end_matches(['\n', '\r']).ends_with('\\') {
            continue;
        }
        if !line.contains("-q") {
            pass.report_line(
                ErrorCode::MissingQuietFlag,
                "Installation code section: use -q with pip3",
                line,
            );
        }
        if !line.contains("USER_FLAG") && !line.contains("sh(") {
            pass.report_line(
                ErrorCode::MissingUserFlag,
                "Installation code section: use {USER_FLAG} with pip3",
                line,
            );
        }
    }

    if !cell.text().contains(WORKBENCH_CONDITIONAL) {
        pass.report(
            ErrorCode::OutdatedInstallTemplate,
            "Installation code section out of date (see template)",
        );
    }
}

/// Every pip call belongs in the installation cell
fn stray_pip_cells(pass: &mut Pass<'_>) -> Result<(), ReviewError> {
    loop {
        let cell = pass.peek()?;
        match cell.source.iter().find(|line| line.contains("pip")) {
            Some(line) => {
                pass.report_line(
                    ErrorCode::PipNotIsolated,
                    "All pip installations must be in a single code cell",
                    line,
                );
                pass.consume();
            }
            None => return Ok(()),
        }
    }
}

fn restart_kernel<'a>(pass: &mut Pass<'a>, _cell: &'a Cell) -> Result<(), ReviewError> {
    if !pass.take()?.is_code() {
        pass.report(
            ErrorCode::MissingRestartKernelCode,
            "Restart the kernel code section not found",
        );
    }
    Ok(())
}

fn before_you_begin<'a>(pass: &mut Pass<'a>, cell: &'a Cell) -> Result<(), ReviewError> {
    // the project setup may live in its own cell
    if cell.line_count() < 2 {
        let next = pass.take()?;
        if !next.heading().starts_with("### Set up your Google Cloud project") {
            pass.report(
                ErrorCode::IncompleteBeforeYouBegin,
                "Before you begin section incomplete",
            );
        }
    }
    Ok(())
}

fn project_id<'a>(pass: &mut Pass<'a>, _cell: &'a Cell) -> Result<(), ReviewError> {
    let assign = pass.take()?;
    if !assign.is_code() {
        pass.report(
            ErrorCode::MissingProjectIdCode,
            "Set project ID code section not found",
        );
    } else if !assign.heading().starts_with(PROJECT_ID_ASSIGN) {
        pass.report_line(
            ErrorCode::ProjectIdTemplate,
            "Set project ID not match template",
            assign.heading(),
        );
    }

    for expected in [PROJECT_ID_GUARD, PROJECT_ID_SET] {
        let cell = pass.take()?;
        if !cell.is_code() || !cell.heading().contains(expected) {
            pass.report_line(
                ErrorCode::ProjectIdTemplate,
                "Set project ID not match template",
                cell.heading(),
            );
        }
    }
    Ok(())
}

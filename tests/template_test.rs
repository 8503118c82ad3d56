//! Integration tests for reviewing a notebook against the standard template
//!
//! Every test starts from a fully conformant notebook and breaks one thing.

use nbreview::models::{Cell, CostCategory, ErrorCode, LinkConfig, LinkKind, Notebook};
use nbreview::report::{ErrorSession, ReportOptions};
use nbreview::validator::{review_notebook, NotebookReview, OfflineProbe};
use nbreview::ReviewError;
use std::path::Path;

const PATH: &str = "official/tabular/train.ipynb";

fn title_cell(config: &LinkConfig, title: &str) -> Cell {
    let path = Path::new(PATH);
    Cell::markdown(&[
        format!("# {}\n", title),
        "\n".to_string(),
        "<table align=\"left\">\n".to_string(),
        "  <td>\n".to_string(),
        format!(
            "    <a href=\"{}\">\n",
            config.canonical_url(LinkKind::Colab, path)
        ),
        "      <img src=\"colab-logo-32px.png\" alt=\"Colab logo\"> Run in Colab\n".to_string(),
        "    </a>\n".to_string(),
        "  </td>\n".to_string(),
        "  <td>\n".to_string(),
        format!(
            "    <a href=\"{}\">\n",
            config.canonical_url(LinkKind::GitHub, path)
        ),
        "      <img src=\"github-logo-32px.png\" alt=\"GitHub logo\"> View on GitHub\n".to_string(),
        "    </a>\n".to_string(),
        "  </td>\n".to_string(),
        "  <td>\n".to_string(),
        format!(
            "    <a href=\"{}\">\n",
            config.canonical_url(LinkKind::Workbench, path)
        ),
        "      <img src=\"workbench-logo-32px.png\" alt=\"Workbench logo\"> Open in Vertex AI Workbench\n"
            .to_string(),
        "    </a>\n".to_string(),
        "  </td>\n".to_string(),
        "</table>\n".to_string(),
    ])
}

/// The launch link table of a title cell, without its heading
fn links_cell(config: &LinkConfig) -> Cell {
    let title = title_cell(config, "unused");
    Cell::markdown(&title.source[2..])
}

fn install_cell() -> Cell {
    Cell::code(&[
        "import os\n",
        "\n",
        "USER_FLAG = \"\"\n",
        "if IS_WORKBENCH_NOTEBOOK:\n",
        "    USER_FLAG = \"--user\"\n",
        "\n",
        "! pip3 install --upgrade google-cloud-aiplatform {USER_FLAG} -q\n",
    ])
}

fn conformant_cells(config: &LinkConfig) -> Vec<Cell> {
    vec![
        Cell::code(&["# Copyright 2024 Google LLC\n", "#\n", "# Licensed under the Apache License\n"]),
        title_cell(config, "Train a tabular model with Vertex AI"),
        Cell::markdown(&[
            "## Overview\n",
            "\n",
            "This tutorial shows how to train a tabular model.\n",
        ]),
        Cell::markdown(&[
            "### Objective\n",
            "\n",
            "In this tutorial, you learn how to train an AutoML tabular model.\n",
            "\n",
            "This tutorial uses the following Google Cloud ML services:\n",
            "\n",
            "- Vertex AI Training\n",
            "- BigQuery\n",
            "\n",
            "The steps performed include:\n",
            "\n",
            "- Create a dataset.\n",
            "- Train a model.\n",
        ]),
        Cell::markdown(&["### Dataset\n", "\n", "The dataset is a public table.\n"]),
        Cell::markdown(&[
            "### Costs\n",
            "\n",
            "This tutorial uses billable components of Google Cloud:\n",
            "\n",
            "* Vertex AI\n",
            "* BigQuery\n",
        ]),
        Cell::markdown(&["## Installation\n", "\n", "Install the packages.\n"]),
        install_cell(),
        Cell::markdown(&[
            "### Restart the kernel\n",
            "\n",
            "Restart the kernel after installing the packages.\n",
        ]),
        Cell::code(&[
            "import IPython\n",
            "\n",
            "app = IPython.Application.instance()\n",
            "app.kernel.do_shutdown(True)\n",
        ]),
        Cell::markdown(&[
            "## Before you begin\n",
            "\n",
            "### Set up your Google Cloud project\n",
        ]),
        Cell::markdown(&["#### Set your project ID\n", "\n", "Set your project ID below.\n"]),
        Cell::code(&["PROJECT_ID = \"[your-project-id]\"  # @param {type:\"string\"}\n"]),
        Cell::code(&[
            "if PROJECT_ID == \"\" or PROJECT_ID is None or PROJECT_ID == \"[your-project-id]\":\n",
            "    PROJECT_ID = \"my-project\"\n",
        ]),
        Cell::code(&["! gcloud config set project $PROJECT_ID\n"]),
    ]
}

fn review(cells: Vec<Cell>, config: &LinkConfig) -> (NotebookReview, ErrorSession) {
    let notebook = Notebook::new(PATH, cells);
    let mut session = ErrorSession::new(ReportOptions::default());
    let review = review_notebook(&notebook, config, &OfflineProbe, &mut session);
    (review, session)
}

fn codes(session: &ErrorSession) -> Vec<ErrorCode> {
    session.violations().iter().map(|v| v.code).collect()
}

fn position_of(cells: &[Cell], heading: &str) -> usize {
    cells
        .iter()
        .position(|c| c.heading().starts_with(heading))
        .unwrap()
}

#[test]
fn test_conformant_notebook_has_no_violations() {
    let config = LinkConfig::default();
    let (review, session) = review(conformant_cells(&config), &config);

    assert!(review.aborted.is_none(), "{:?}", review.aborted);
    assert!(session.violations().is_empty(), "{:?}", session.violations());

    assert_eq!(review.fields.title, "Train a tabular model with Vertex AI");
    assert!(review.fields.links.github.is_some());
    assert!(review.fields.links.colab.is_some());
    assert!(review.fields.links.workbench.is_some());

    let objective = review.fields.objective.unwrap();
    assert_eq!(objective.description, "How to train an AutoML tabular model.\n");
    assert!(objective.uses.contains("- BigQuery\n"));
    assert!(objective.steps.contains("- Train a model.\n"));
    assert!(objective.costs.contains(&CostCategory::BigQuery));
    assert!(objective.costs.contains(&CostCategory::Vertex));
}

#[test]
fn test_missing_github_anchor() {
    let config = LinkConfig::default();
    let mut cells = conformant_cells(&config);
    let github = config.canonical_url(LinkKind::GitHub, Path::new(PATH));
    cells[1]
        .source
        .retain(|l| !l.contains(&github) && !l.contains("View on GitHub"));

    let (review, session) = review(cells, &config);
    assert!(review.aborted.is_none());
    assert_eq!(codes(&session), vec![ErrorCode::MissingLink(LinkKind::GitHub)]);
    assert_eq!(session.violations()[0].code.code(), 4);
}

#[test]
fn test_all_caps_title_word() {
    let config = LinkConfig::default();
    let mut cells = conformant_cells(&config);
    cells[1] = title_cell(&config, "BAD Heading");

    let (_, session) = review(cells, &config);
    assert_eq!(codes(&session), vec![ErrorCode::HeadingSentenceCase]);
    assert!(session.violations()[0].message.ends_with("BAD"));
}

#[test]
fn test_costs_missing_service_reference() {
    let config = LinkConfig::default();
    let mut cells = conformant_cells(&config);
    let costs = position_of(&cells, "### Costs");
    cells[costs] = Cell::markdown(&[
        "### Costs\n",
        "\n",
        "This tutorial uses billable components of Google Cloud:\n",
        "\n",
        "* Vertex AI\n",
    ]);

    let (_, session) = review(cells, &config);
    assert_eq!(codes(&session), vec![ErrorCode::MissingCostReference]);
    assert!(session.violations()[0].message.contains("BigQuery"));
}

#[test]
fn test_stray_pip_cell_before_restart() {
    let config = LinkConfig::default();
    let mut cells = conformant_cells(&config);
    let restart = position_of(&cells, "### Restart the kernel");
    cells.insert(restart, Cell::code(&["! pip3 install extra-package -q\n"]));

    let (review, session) = review(cells, &config);
    assert!(review.aborted.is_none());
    assert_eq!(codes(&session), vec![ErrorCode::PipNotIsolated]);
    assert_eq!(
        session.violations()[0].line.as_deref(),
        Some("! pip3 install extra-package -q\n")
    );
}

#[test]
fn test_install_cell_flags() {
    let config = LinkConfig::default();
    let mut cells = conformant_cells(&config);
    let install = position_of(&cells, "import os");
    cells[install] = Cell::code(&[
        "USER_FLAG = \"\"\n",
        "if IS_WORKBENCH_NOTEBOOK:\n",
        "    USER_FLAG = \"--user\"\n",
        "! pip install google-cloud-aiplatform {USER_FLAG}\n",
    ]);

    let (_, session) = review(cells, &config);
    assert_eq!(
        codes(&session),
        vec![ErrorCode::WrongPipBinary, ErrorCode::MissingQuietFlag]
    );
    assert!(session.violations().iter().all(|v| v.code.code() == 23));
}

#[test]
fn test_install_cell_continuation_lines() {
    let config = LinkConfig::default();
    let mut cells = conformant_cells(&config);
    let install = position_of(&cells, "import os");
    cells[install] = Cell::code(&[
        "if IS_WORKBENCH_NOTEBOOK:\n",
        "    USER_FLAG = \"--user\"\n",
        "! pip3 install google-cloud-aiplatform \\\n",
        "    google-cloud-bigquery {USER_FLAG} -q\n",
    ]);

    let (_, session) = review(cells, &config);
    assert!(session.violations().is_empty(), "{:?}", session.violations());
}

#[test]
fn test_installation_heading_level() {
    let config = LinkConfig::default();
    let mut cells = conformant_cells(&config);
    let install = position_of(&cells, "## Installation");
    cells[install] = Cell::markdown(&["### Installation\n", "\n", "Install the packages.\n"]);

    let (_, session) = review(cells, &config);
    assert!(codes(&session).contains(&ErrorCode::InstallationHeadingLevel));
    assert!(!codes(&session).contains(&ErrorCode::MissingInstallation));
}

#[test]
fn test_project_id_not_from_template() {
    let config = LinkConfig::default();
    let mut cells = conformant_cells(&config);
    let assign = position_of(&cells, "PROJECT_ID = ");
    cells[assign] = Cell::code(&["PROJECT_ID = \"my-project\"\n"]);

    let (review, session) = review(cells, &config);
    assert!(review.aborted.is_none());
    assert_eq!(codes(&session), vec![ErrorCode::ProjectIdTemplate]);
    assert_eq!(
        session.violations()[0].line.as_deref(),
        Some("PROJECT_ID = \"my-project\"\n")
    );
}

#[test]
fn test_empty_cell_is_reported_and_skipped() {
    let config = LinkConfig::default();
    let mut cells = conformant_cells(&config);
    cells.insert(2, Cell::code::<&str>(&[]));

    let (review, session) = review(cells, &config);
    assert!(review.aborted.is_none());
    assert_eq!(codes(&session), vec![ErrorCode::EmptyCell]);
    assert!(session.violations()[0].message.ends_with("cell #2"));
}

#[test]
fn test_first_person_and_future_tense_in_overview() {
    let config = LinkConfig::default();
    let mut cells = conformant_cells(&config);
    cells[2] = Cell::markdown(&["## Overview\n", "\n", "We will train a tabular model.\n"]);

    let (_, session) = review(cells, &config);
    assert_eq!(
        codes(&session),
        vec![ErrorCode::WrongPerson, ErrorCode::WrongTense]
    );
}

#[test]
fn test_optional_sections_are_accepted() {
    let config = LinkConfig::default();
    let mut cells = conformant_cells(&config);
    let restart_code = position_of(&cells, "import IPython");
    cells.insert(
        restart_code + 1,
        Cell::markdown(&["#### Check package versions\n"]),
    );
    cells.insert(
        restart_code + 2,
        Cell::code(&["import google.cloud.aiplatform as aip\n", "print(aip.__version__)\n"]),
    );
    cells.insert(1, Cell::markdown(&["This notebook is maintained by the samples team.\n"]));

    let (review, session) = review(cells, &config);
    assert!(review.aborted.is_none());
    assert!(session.violations().is_empty(), "{:?}", session.violations());
}

#[test]
fn test_truncated_notebook_keeps_extracted_fields() {
    let config = LinkConfig::default();
    let mut cells = conformant_cells(&config);
    cells.truncate(position_of(&cells, "## Installation"));

    let (review, _) = review(cells, &config);
    assert!(matches!(
        review.aborted,
        Some(ReviewError::SequenceExhausted { .. })
    ));
    assert_eq!(review.fields.title, "Train a tabular model with Vertex AI");
    assert!(review.fields.objective.is_some());
}

#[test]
fn test_code_filter_limits_emitted_count() {
    let config = LinkConfig::default();
    let mut cells = conformant_cells(&config);
    cells[2] = Cell::markdown(&["## Overview\n", "\n", "We will train a tabular model.\n"]);

    let notebook = Notebook::new(PATH, cells);
    let options = ReportOptions {
        enabled: true,
        csv: false,
        codes: vec![16],
    };
    let mut session = ErrorSession::new(options);
    review_notebook(&notebook, &config, &OfflineProbe, &mut session);

    assert_eq!(session.violations().len(), 2);
    assert_eq!(session.emitted_count(), 1);
    assert_eq!(session.outcome().exit_code(), 1);
}

#[test]
fn test_bare_title_takes_links_from_next_cell() {
    let config = LinkConfig::default();
    let mut cells = conformant_cells(&config);
    cells[1] = Cell::markdown(&["# Train a tabular model with Vertex AI\n"]);
    cells.insert(2, links_cell(&config));

    let (review, session) = review(cells, &config);
    assert!(review.aborted.is_none());
    assert!(session.violations().is_empty(), "{:?}", session.violations());
    assert_eq!(review.fields.title, "Train a tabular model with Vertex AI");
    assert!(review.fields.links.github.is_some());
    assert!(review.fields.links.workbench.is_some());
}

#[test]
fn test_missing_title_still_checks_links() {
    let config = LinkConfig::default();
    let mut cells = conformant_cells(&config);
    cells[1] = links_cell(&config);

    let (review, session) = review(cells, &config);
    assert!(review.aborted.is_none());
    assert_eq!(codes(&session), vec![ErrorCode::TitleHeading]);
    assert_eq!(session.violations()[0].code.code(), 1);
    assert!(review.fields.title.is_empty());
    assert_eq!(
        review.fields.links.github.as_deref(),
        Some(config.canonical_url(LinkKind::GitHub, Path::new(PATH)).as_str())
    );
}

#[test]
fn test_recommendations_section_is_optional() {
    let config = LinkConfig::default();
    let mut cells = conformant_cells(&config);
    let objective = position_of(&cells, "### Objective");
    cells.insert(
        objective + 1,
        Cell::markdown(&[
            "### Recommendations\n",
            "\n",
            "Run this tutorial on a machine with a GPU.\n",
        ]),
    );

    let (review, session) = review(cells, &config);
    assert!(review.aborted.is_none());
    assert!(session.violations().is_empty(), "{:?}", session.violations());
}

#[test]
fn test_local_environment_with_otherwise_cell() {
    let config = LinkConfig::default();
    let mut cells = conformant_cells(&config);
    let install = position_of(&cells, "## Installation");
    cells.insert(
        install,
        Cell::markdown(&[
            "### Set up your local development environment\n",
            "\n",
            "If you are using Colab or Vertex AI Workbench, skip this step.\n",
        ]),
    );
    cells.insert(
        install + 1,
        Cell::markdown(&["**Otherwise**, make sure your environment meets this notebook's requirements.\n"]),
    );

    let (review, session) = review(cells, &config);
    assert!(review.aborted.is_none());
    assert!(session.violations().is_empty(), "{:?}", session.violations());
}

#[test]
fn test_local_environment_without_otherwise_cell() {
    let config = LinkConfig::default();
    let mut cells = conformant_cells(&config);
    let install = position_of(&cells, "## Installation");
    cells.insert(
        install,
        Cell::markdown(&["### Set up your local development environment\n"]),
    );

    let (_, session) = review(cells, &config);
    assert!(session.violations().is_empty(), "{:?}", session.violations());
}

#[test]
fn test_helper_functions_take_two_cells() {
    let config = LinkConfig::default();
    let mut cells = conformant_cells(&config);
    let install = position_of(&cells, "## Installation");
    cells.insert(install, Cell::markdown(&["### Define helper functions\n"]));
    cells.insert(
        install + 1,
        Cell::code(&["def show(value):\n", "    print(value)\n"]),
    );

    let (review, session) = review(cells, &config);
    assert!(review.aborted.is_none());
    assert!(session.violations().is_empty(), "{:?}", session.violations());
}

#[test]
fn test_enable_apis_take_two_cells() {
    let config = LinkConfig::default();
    let mut cells = conformant_cells(&config);
    let project = position_of(&cells, "#### Set your project ID");
    cells.insert(project, Cell::markdown(&["### Enable APIs\n"]));
    cells.insert(
        project + 1,
        Cell::code(&["! gcloud services enable aiplatform.googleapis.com\n"]),
    );

    let (review, session) = review(cells, &config);
    assert!(review.aborted.is_none());
    assert!(session.violations().is_empty(), "{:?}", session.violations());
}

#[test]
fn test_mkdir_and_requirements_cells_precede_install() {
    let config = LinkConfig::default();
    let mut cells = conformant_cells(&config);
    let install = position_of(&cells, "import os");
    cells.insert(install, Cell::code(&["! mkdir -p src\n"]));
    cells.insert(
        install + 1,
        Cell::code(&["%%writefile requirements.txt\n", "pandas\n"]),
    );

    let (review, session) = review(cells, &config);
    assert!(review.aborted.is_none());
    assert!(session.violations().is_empty(), "{:?}", session.violations());
}

#[test]
fn test_installation_without_code_cell() {
    let config = LinkConfig::default();
    let mut cells = conformant_cells(&config);
    let install = position_of(&cells, "import os");
    cells[install] = Cell::markdown(&["Run the next cell to install the packages.\n"]);

    let (review, session) = review(cells, &config);
    assert!(review.aborted.is_none());
    assert_eq!(codes(&session), vec![ErrorCode::MissingInstallationCode]);
    assert_eq!(session.violations()[0].code.code(), 22);
}

#[test]
fn test_install_cell_without_workbench_conditional() {
    let config = LinkConfig::default();
    let mut cells = conformant_cells(&config);
    let install = position_of(&cells, "import os");
    cells[install] = Cell::code(&["! pip3 install google-cloud-aiplatform {USER_FLAG} -q\n"]);

    let (_, session) = review(cells, &config);
    assert_eq!(codes(&session), vec![ErrorCode::OutdatedInstallTemplate]);
    assert_eq!(session.violations()[0].code.code(), 24);
}

#[test]
fn test_install_cell_user_flag() {
    let config = LinkConfig::default();
    let mut cells = conformant_cells(&config);
    let install = position_of(&cells, "import os");
    cells[install] = Cell::code(&[
        "if IS_WORKBENCH_NOTEBOOK:\n",
        "    print(\"workbench\")\n",
        "! pip3 install google-cloud-aiplatform -q\n",
    ]);

    let (_, session) = review(cells, &config);
    assert_eq!(codes(&session), vec![ErrorCode::MissingUserFlag]);
    assert_eq!(session.violations()[0].code.code(), 23);

    // a shell helper call stands in for the flag
    let mut cells = conformant_cells(&config);
    cells[install] = Cell::code(&[
        "if IS_WORKBENCH_NOTEBOOK:\n",
        "    sh(\"pip3 install google-cloud-aiplatform -q\")\n",
    ]);
    let (_, session) = review(cells, &config);
    assert!(session.violations().is_empty(), "{:?}", session.violations());
}

#[test]
fn test_restart_kernel_without_code_cell() {
    let config = LinkConfig::default();
    let mut cells = conformant_cells(&config);
    let restart = position_of(&cells, "import IPython");
    cells[restart] = Cell::markdown(&["Restart the kernel from the menu.\n"]);

    let (review, session) = review(cells, &config);
    assert!(review.aborted.is_none());
    assert_eq!(codes(&session), vec![ErrorCode::MissingRestartKernelCode]);
    assert_eq!(session.violations()[0].code.code(), 28);
}

#[test]
fn test_before_you_begin_split_across_cells() {
    let config = LinkConfig::default();
    let mut cells = conformant_cells(&config);
    let begin = position_of(&cells, "## Before you begin");
    cells[begin] = Cell::markdown(&["## Before you begin\n"]);
    cells.insert(
        begin + 1,
        Cell::markdown(&["### Set up your Google Cloud project\n"]),
    );

    let (_, session) = review(cells, &config);
    assert!(session.violations().is_empty(), "{:?}", session.violations());
}

#[test]
fn test_before_you_begin_incomplete() {
    let config = LinkConfig::default();
    let mut cells = conformant_cells(&config);
    let begin = position_of(&cells, "## Before you begin");
    cells[begin] = Cell::markdown(&["## Before you begin\n"]);
    cells.insert(begin + 1, Cell::markdown(&["Follow these steps first.\n"]));

    let (review, session) = review(cells, &config);
    assert!(review.aborted.is_none());
    assert_eq!(codes(&session), vec![ErrorCode::IncompleteBeforeYouBegin]);
    assert_eq!(session.violations()[0].code.code(), 30);
}

#[test]
fn test_project_id_assignment_not_code() {
    let config = LinkConfig::default();
    let mut cells = conformant_cells(&config);
    let assign = position_of(&cells, "PROJECT_ID = ");
    cells[assign] = Cell::markdown(&["PROJECT_ID = \"[your-project-id]\"\n"]);

    let (review, session) = review(cells, &config);
    assert!(review.aborted.is_none());
    assert_eq!(codes(&session), vec![ErrorCode::MissingProjectIdCode]);
    assert_eq!(session.violations()[0].code.code(), 32);
}

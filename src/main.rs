use clap::{ArgGroup, Parser};
use colored::Colorize;
use nbreview::cli::{BatchReviewer, Target};
use nbreview::models::ReviewConfig;
use nbreview::render::{IndexFormat, IndexOptions};
use nbreview::report::{ErrorSession, ReportOptions};
use nbreview::validator::{LinkProbe, OfflineProbe};
use nbreview::{Context, Result};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "nbreview")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Review tutorial notebooks against the notebook template", long_about = None)]
#[command(group(
    ArgGroup::new("target")
        .required(true)
        .args(["notebook_dir", "notebook", "notebook_file"]),
))]
struct Cli {
    /// Notebook directory
    #[arg(long)]
    notebook_dir: Option<PathBuf>,

    /// Notebook to review
    #[arg(long)]
    notebook: Option<PathBuf>,

    /// CSV file with the list of notebooks to review
    #[arg(long)]
    notebook_file: Option<PathBuf>,

    /// Report errors
    #[arg(long)]
    errors: bool,

    /// Report errors as CSV
    #[arg(long)]
    errors_csv: bool,

    /// Report only these error codes (e.g., "4,5,6")
    #[arg(long, value_delimiter = ',')]
    errors_codes: Vec<u16>,

    /// Output title
    #[arg(long)]
    title: bool,

    /// Output description
    #[arg(long)]
    desc: bool,

    /// Output uses (resources)
    #[arg(long)]
    uses: bool,

    /// Output steps
    #[arg(long)]
    steps: bool,

    /// Output format in HTML
    #[arg(long, conflicts_with = "repo")]
    web: bool,

    /// Output format in Markdown
    #[arg(long)]
    repo: bool,

    /// Config file (default: ./nbreview.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Do not probe links over the network
    #[arg(long)]
    offline: bool,

    /// Verbose logging (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn target(&self) -> Option<Target> {
        if let Some(dir) = &self.notebook_dir {
            return Some(Target::Directory(dir.clone()));
        }
        if let Some(path) = &self.notebook {
            return Some(Target::Notebook(path.clone()));
        }
        self.notebook_file.clone().map(Target::Manifest)
    }

    fn report_options(&self) -> ReportOptions {
        ReportOptions {
            enabled: self.errors || self.errors_csv || !self.errors_codes.is_empty(),
            csv: self.errors_csv,
            codes: self.errors_codes.clone(),
        }
    }

    fn index_options(&self) -> IndexOptions {
        let format = if self.web {
            Some(IndexFormat::Html)
        } else if self.repo {
            Some(IndexFormat::Markdown)
        } else if self.title || self.desc || self.uses || self.steps {
            Some(IndexFormat::Plain)
        } else {
            None
        };
        IndexOptions {
            format,
            title: self.title,
            description: self.desc,
            uses: self.uses,
            steps: self.steps,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    match run(&cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{}", format!("Error: {:#}", e).red());
            std::process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> Result<i32> {
    let mut config = match &cli.config {
        Some(path) => ReviewConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ReviewConfig::discover(&std::env::current_dir()?)?,
    };
    if cli.offline {
        config.links.check = false;
    }

    let target = cli
        .target()
        .context("must specify a directory, notebook or notebook list")?;
    let report = cli.report_options();
    let index = cli.index_options();

    let sink: Box<dyn io::Write> = if report.csv {
        Box::new(io::stdout())
    } else {
        Box::new(io::stderr())
    };
    let mut session = ErrorSession::new(report)
        .with_sink(sink)
        .without_history();

    let probe = build_probe(&config)?;
    let mut stdout = io::stdout();
    let outcome = BatchReviewer::new(&config, probe.as_ref(), &index, &mut stdout)
        .run(&target, &mut session)?;

    if session.options().enabled && !session.options().csv {
        let summary = format!(
            "{} violation(s), {} notebook(s) skipped",
            outcome.violations, outcome.skipped
        );
        if outcome.is_clean() {
            eprintln!("{}", summary.green());
        } else {
            eprintln!("{}", summary.red());
        }
    }

    Ok(outcome.exit_code())
}

#[cfg(feature = "http-probe")]
fn build_probe(config: &ReviewConfig) -> Result<Box<dyn LinkProbe>> {
    if !config.links.check {
        return Ok(Box::new(OfflineProbe));
    }
    let probe = nbreview::validator::HttpProbe::new(config.links.timeout_secs)
        .context("Failed to build HTTP client")?;
    Ok(Box::new(probe))
}

#[cfg(not(feature = "http-probe"))]
fn build_probe(_config: &ReviewConfig) -> Result<Box<dyn LinkProbe>> {
    Ok(Box::new(OfflineProbe))
}

//! Create a Microreact demo project and attach a Newick tree to it.
//!
//! Connection settings come from `MICROREACT_*` environment variables. The
//! created project's identifier and address are written to stdout; logs go
//! to stderr as JSON.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use ortho_config::OrthoConfig;
use project_document::{
    DEFAULT_LABEL_FIELD, DEFAULT_PROJECT_NAME, DEFAULT_TREE_FILE_NAME, DEMO_NEWICK,
    TreeAttachment, demo_project,
};
use thiserror::Error;
use tokio::runtime::Builder;
use tracing::{error, warn};
use tracing_subscriber::{EnvFilter, fmt};
use tree_publisher::config::{PublisherSettings, SettingsError};
use tree_publisher::domain::{
    PublicationError, PublicationOutcome, PublicationRequest, TreePublicationService,
};
use tree_publisher::outbound::microreact::MicroreactHttpClient;
use tree_publisher::tree_source::{TreeSourceError, load_tree_file};

/// `publish-tree` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "publish-tree",
    about = "Create a Microreact demo project and attach a phylogenetic tree",
    version
)]
struct CliArgs {
    /// Name given to the created project.
    #[arg(long = "project-name", value_name = "name", default_value = DEFAULT_PROJECT_NAME)]
    project_name: String,
    /// Newick file to attach. The bundled demo tree is used when omitted.
    #[arg(long = "tree-file", value_name = "path")]
    tree_file: Option<PathBuf>,
    /// Display name of the tree file. Defaults to the file's own name.
    #[arg(long = "tree-name", value_name = "name")]
    tree_name: Option<String>,
    /// Metadata column matched against tree leaf labels.
    #[arg(long = "label-field", value_name = "column", default_value = DEFAULT_LABEL_FIELD)]
    label_field: String,
}

#[derive(Debug, Error)]
enum RunError {
    #[error("create Tokio runtime: {0}")]
    Runtime(#[source] io::Error),
    #[error("load settings: {0}")]
    Settings(String),
    #[error(transparent)]
    Endpoint(#[from] SettingsError),
    #[error(transparent)]
    TreeSource(#[from] TreeSourceError),
    #[error("build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
    #[error(transparent)]
    Publication(#[from] PublicationError),
}

fn main() -> ExitCode {
    init_tracing();
    match run() {
        Ok(outcome) => {
            write_outcome(&outcome);
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "tree publication failed");
            if let Err(write_err) = writeln!(io::stderr().lock(), "{err}") {
                drop(write_err);
            }
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .with_writer(io::stderr)
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }
}

fn run() -> Result<PublicationOutcome, RunError> {
    let args = CliArgs::parse();
    let settings = PublisherSettings::load_from_iter([OsString::from("publish-tree")])
        .map_err(|error| RunError::Settings(error.to_string()))?;
    let endpoint = settings.endpoint()?;
    let request = build_request(&args)?;

    let client = Arc::new(MicroreactHttpClient::new(endpoint)?);
    let service = TreePublicationService::new(client);

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(RunError::Runtime)?;
    Ok(runtime.block_on(service.publish(&request))?)
}

fn build_request(args: &CliArgs) -> Result<PublicationRequest, TreeSourceError> {
    let (newick, file_name) = match &args.tree_file {
        Some(path) => {
            let source = load_tree_file(path)?;
            (source.newick, source.file_name)
        }
        None => (DEMO_NEWICK.to_owned(), DEFAULT_TREE_FILE_NAME.to_owned()),
    };
    let display_name = args.tree_name.clone().unwrap_or(file_name);
    let tree = TreeAttachment::new(newick)
        .with_file_name(display_name)
        .with_label_field(args.label_field.as_str());

    Ok(PublicationRequest {
        initial_document: demo_project(&args.project_name),
        tree,
    })
}

fn write_outcome(outcome: &PublicationOutcome) {
    let mut out = io::stdout().lock();
    if let Err(err) = writeln!(out, "project_id={}", outcome.project_id)
        .and_then(|()| writeln!(out, "url={}", outcome.url))
    {
        drop(err);
    }
}

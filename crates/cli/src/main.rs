use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::error;
use wfd_api::{ClientConfig, DEFAULT_API_BASE, GithubClient};
use wfd_engine::{DispatchArgs, DispatchReport, dispatch_from_args};
use wfd_types::{InvocationContext, RepositorySlug};

mod outputs;

use outputs::OutputSink;

/// Trigger a GitHub Actions workflow and report the run it started.
///
/// Every option can also be supplied through the `INPUT_*` variables the
/// Actions runner sets for action inputs.
#[derive(Debug, Parser)]
#[command(name = "workflow-dispatch", version, about)]
struct Cli {
    /// Workflow name, numeric id or filename (path suffix).
    #[arg(long, env = "INPUT_WORKFLOW")]
    workflow: String,

    /// Token used to call the API.
    #[arg(long, env = "INPUT_TOKEN", hide_env_values = true)]
    token: String,

    /// Branch, tag or commit to run against. Defaults to the invoking ref.
    #[arg(long = "ref", env = "INPUT_REF")]
    git_ref: Option<String>,

    /// Repository as owner/repo. Defaults to the invoking repository.
    #[arg(long, env = "INPUT_REPO")]
    repo: Option<String>,

    /// Workflow inputs as a JSON object.
    #[arg(long, env = "INPUT_INPUTS")]
    inputs: Option<String>,

    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_BASE)]
    api_url: String,

    #[arg(long, env = "GITHUB_OUTPUT")]
    output_file: Option<PathBuf>,

    #[arg(long, env = "GITHUB_REF", hide = true)]
    context_ref: Option<String>,

    #[arg(long, env = "GITHUB_REPOSITORY", hide = true)]
    context_repository: Option<String>,

    #[arg(long, env = "RUNNER_DEBUG", hide = true)]
    runner_debug: Option<String>,

    #[arg(long, env = "ACTIONS_STEP_DEBUG", hide = true)]
    step_debug: Option<String>,
}

impl Cli {
    /// The runner's debug signal: `RUNNER_DEBUG=1` or `ACTIONS_STEP_DEBUG=true`.
    fn debug_enabled(&self) -> bool {
        [&self.runner_debug, &self.step_debug]
            .into_iter()
            .flatten()
            .any(|value| is_truthy(value))
    }

    fn invocation_context(&self) -> Result<InvocationContext> {
        let repository = self
            .context_repository
            .as_deref()
            .filter(|value| !value.trim().is_empty())
            .map(str::parse::<RepositorySlug>)
            .transpose()
            .context("GITHUB_REPOSITORY is malformed")?;
        Ok(InvocationContext {
            git_ref: self.context_ref.clone().filter(|value| !value.trim().is_empty()),
            repository,
        })
    }

    fn dispatch_args(&self) -> DispatchArgs {
        DispatchArgs {
            workflow: self.workflow.clone(),
            git_ref: self.git_ref.clone(),
            repository: self.repo.clone(),
            inputs: self.inputs.clone(),
        }
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes")
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug_enabled());

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let message = wfd_util::redact_sensitive(&format!("{err:#}"));
            error!(error = %message, "workflow dispatch failed");
            outputs::error(&message);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(debug: bool) {
    let default_filter = if debug { "debug" } else { "info" };
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

async fn run(cli: &Cli) -> Result<()> {
    let context = cli.invocation_context()?;
    let client = GithubClient::new(ClientConfig::new(&cli.api_url, &cli.token))?;

    let report = dispatch_from_args(&client, cli.dispatch_args(), &context, cli.debug_enabled()).await?;
    match &report {
        DispatchReport::Disabled { workflow, message } => {
            outputs::notice(&format!("Workflow '{}' is disabled and was not dispatched: {}", workflow.name, message));
        }
        DispatchReport::Dispatched { status, run: None, .. } => {
            outputs::notice(&format!("Workflow dispatch accepted with status '{}'; no run id available", status.as_str()));
        }
        DispatchReport::Dispatched { run: Some(_), .. } => {}
    }

    OutputSink::new(cli.output_file.clone()).publish(&report)
}

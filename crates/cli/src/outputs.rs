//! Step outputs and workflow-command annotations for the Actions runner.
//!
//! Outputs are appended as `name=value` lines to the file named by
//! `GITHUB_OUTPUT`. Outside a runner they are printed to stdout instead.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use wfd_engine::DispatchReport;

pub struct OutputSink {
    path: Option<PathBuf>,
}

impl OutputSink {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    pub fn set(&self, name: &str, value: &str) -> Result<()> {
        let line = format!("{name}={value}\n");
        match &self.path {
            Some(path) => {
                let mut file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .with_context(|| format!("open output file {}", path.display()))?;
                file.write_all(line.as_bytes())
                    .with_context(|| format!("write output '{name}'"))?;
            }
            None => io::stdout().write_all(line.as_bytes())?,
        }
        Ok(())
    }

    /// Emit `workflowId` always and the run outputs only when a run was correlated.
    pub fn publish(&self, report: &DispatchReport) -> Result<()> {
        self.set("workflowId", &report.workflow_id().to_string())?;
        if let Some(run) = report.run() {
            self.set("runId", &run.id.to_string())?;
            if let Some(url) = &run.url {
                self.set("runUrl", url)?;
            }
            if let Some(html_url) = &run.html_url {
                self.set("runUrlHtml", html_url)?;
            }
        }
        Ok(())
    }
}

pub fn notice(message: &str) {
    println!("::notice::{}", escape_command_data(message));
}

pub fn error(message: &str) {
    println!("::error::{}", escape_command_data(message));
}

fn escape_command_data(message: &str) -> String {
    message.replace('%', "%25").replace('\r', "%0D").replace('\n', "%0A")
}

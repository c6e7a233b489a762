//! Command line front end
//!
//! Runs the pipeline on one local file and prints progress, summaries and
//! MCQs to stdout.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;

use crate::config::Config;
use crate::pipeline::{format_text_report, Pipeline, PipelineEvent};
use crate::summarize::{build_backend, Summarizer};

pub const USAGE: &str = "Usage: chapterwise <path_to_pdf_or_txt>";

/// Summarize a book chapter by chapter and generate MCQs
#[derive(Parser, Debug)]
#[command(name = "chapterwise", version)]
pub struct Cli {
    /// PDF or TXT file to process
    pub path: PathBuf,
}

/// Why the CLI stopped before processing
#[derive(Debug, PartialEq, Eq)]
pub enum CliExit {
    /// Help or version was requested; print it and succeed
    Info(String),
    /// Wrong arguments
    Usage,
    /// The input path does not exist
    MissingFile(PathBuf),
}

impl CliExit {
    pub fn report(&self) -> ExitCode {
        match self {
            Self::Info(text) => {
                print!("{}", text);
                ExitCode::SUCCESS
            }
            Self::Usage => {
                println!("{}", USAGE);
                ExitCode::from(1)
            }
            Self::MissingFile(path) => {
                println!("File {} does not exist.", path.display());
                ExitCode::from(1)
            }
        }
    }
}

impl Cli {
    /// Parse arguments and check that the input exists
    pub fn from_args<I, T>(args: I) -> std::result::Result<Self, CliExit>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli = Cli::try_parse_from(args).map_err(|e| match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => CliExit::Info(e.to_string()),
            _ => CliExit::Usage,
        })?;

        if !cli.path.exists() {
            return Err(CliExit::MissingFile(cli.path));
        }
        Ok(cli)
    }

    /// Process the file and print the report
    pub async fn run(self, config: &Config) -> Result<()> {
        let backend = build_backend(&config.summarizer)
            .context("Failed to set up the summarization backend")?;
        let pipeline = Pipeline::new(Summarizer::new(backend));

        let results = pipeline
            .run_with_progress(&self.path, |event| {
                if !matches!(event, PipelineEvent::Finished { .. }) {
                    println!("{}", event);
                }
            })
            .await?;

        print!("{}", format_text_report(&results));
        Ok(())
    }
}

//! Command-line interface
//!
//! Wires the run context (settings, oracle client, retry policy, progress
//! sink) and drives the pipeline: load taxonomy -> render prompt -> classify
//! batch -> write CSV.

use crate::application::use_cases::batch_runner::{BatchRunner, ProgressSink};
use crate::application::use_cases::classifier::ClassifyUseCase;
use crate::application::use_cases::prompt_builder::PromptBuilder;
use crate::domain::error::Result;
use crate::infrastructure::config::Settings;
use crate::infrastructure::llm_clients::{LLMClient, RouterClient};
use crate::infrastructure::tabular::{comments_loader, results_writer, taxonomy_loader};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "tabulador", version, about = "Classify NPS comments against a closed taxonomy")]
pub struct Cli {
    /// Taxonomy file (.xlsx or .csv) with the permitted categories
    #[arg(long)]
    pub taxonomy: PathBuf,
    /// Comments file (.xlsx or .csv) to classify
    #[arg(long)]
    pub comments: PathBuf,
    /// Output CSV path
    #[arg(long, default_value = "classified_comments.csv")]
    pub output: PathBuf,
    /// Validate and prompt per audience segment (TIPO_NPS); disable to
    /// validate against the whole taxonomy
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub segmentation: bool,
    /// Override the configured retry attempts per comment
    #[arg(long)]
    pub max_attempts: Option<u32>,
}

/// Progress sink that logs each step through tracing.
struct LogProgressSink;

impl ProgressSink for LogProgressSink {
    fn report(&self, fraction: f64, status: &str) {
        info!(progress = format!("{:.0}%", fraction * 100.0).as_str(), "{}", status);
    }
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load()?;
    settings.segmentation = cli.segmentation;
    if let Some(max_attempts) = cli.max_attempts {
        settings.max_attempts = max_attempts;
    }

    let taxonomy = taxonomy_loader::load_taxonomy(&cli.taxonomy, settings.segmentation)?;
    let comment_rows = comments_loader::load_comments(&cli.comments)?;

    let system_prompt = PromptBuilder::new(settings.segmentation).build(&taxonomy);

    let llm_client: Arc<dyn LLMClient + Send + Sync> = Arc::new(RouterClient::new());
    let classifier = ClassifyUseCase::new(
        llm_client,
        settings.llm_config(),
        settings.retry_policy(),
        settings.segmentation,
    );

    let comments: Vec<_> = comment_rows.iter().map(|r| r.comment.clone()).collect();
    let sink = LogProgressSink;
    let results = BatchRunner::new(&classifier, &sink)
        .run(&comments, &system_prompt, &taxonomy)
        .await;

    let output_rows: Vec<_> = comment_rows
        .iter()
        .zip(&results)
        .map(|(row, result)| (row.tipo_nps.clone(), result))
        .collect();
    results_writer::write_csv(&cli.output, &output_rows)?;

    info!(output = %cli.output.display(), "Done");
    Ok(())
}

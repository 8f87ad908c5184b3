use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use resume_screening::environment::EnvironmentConfig;
use resume_screening::extract::{DocumentKind, RawDocument};
use resume_screening::oracle::OpenAiOracle;
use resume_screening::store::ResultStore;
use resume_screening::{export, pipeline, start_web_server};
use std::path::PathBuf;
use tracing::{info, warn};

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "screenr", about = "AI-assisted resume screening service")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP API server
    Serve,
    /// Screen local resume files against a job description file
    Screen {
        /// Path to a plain-text job description
        #[arg(long)]
        job_description: PathBuf,
        /// Resume files (.pdf or .docx)
        #[arg(required = true)]
        resumes: Vec<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or(EnvFilter::new("resume_screening=info,screenr=info,rocket=warn")),
        )
        .init();

    let cli = Cli::parse();

    let environment = EnvironmentConfig::load()?;
    environment.ensure_directories().await?;

    // The oracle credential is a startup requirement: without it no
    // document can be processed, so fail before accepting any work.
    let oracle = OpenAiOracle::from_env(
        environment.oracle_base_url.clone(),
        environment.oracle_model.clone(),
    )?;

    match cli.command {
        Command::Serve => {
            info!(
                "Starting resume screening server on port {}",
                environment.listen_port
            );
            start_web_server(environment, oracle).await
        }
        Command::Screen {
            job_description,
            resumes,
        } => run_local_batch(environment, oracle, job_description, resumes).await,
    }
}

/// One-shot batch over local files: same pipeline as the server, summary
/// printed to stdout.
async fn run_local_batch(
    environment: EnvironmentConfig,
    oracle: OpenAiOracle,
    job_description_path: PathBuf,
    resume_paths: Vec<PathBuf>,
) -> Result<()> {
    let job_description = tokio::fs::read_to_string(&job_description_path)
        .await
        .with_context(|| {
            format!(
                "Failed to read job description: {}",
                job_description_path.display()
            )
        })?;

    if job_description.trim().is_empty() {
        anyhow::bail!(
            "Job description is empty: {}",
            job_description_path.display()
        );
    }

    let mut documents = Vec::new();
    for path in resume_paths {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("resume")
            .to_string();

        let kind = match DocumentKind::from_file_name(&name) {
            Ok(kind) => kind,
            Err(e) => {
                warn!("Skipping {}: {}", name, e);
                continue;
            }
        };

        let bytes = tokio::fs::read(&path)
            .await
            .with_context(|| format!("Failed to read resume: {}", path.display()))?;
        documents.push(RawDocument::new(name, kind, bytes));
    }

    let store = ResultStore::new(&environment.database_path).await?;
    let summary = pipeline::run_batch(&oracle, &store, &documents, &job_description).await;

    for row in &summary.rows {
        println!(
            "{} | score {} | {} | {}",
            row.resume_name, row.job_match_score, row.category, row.decision
        );
    }
    for failure in &summary.failures {
        println!(
            "{} failed during {}: {}",
            failure.resume_name, failure.stage, failure.reason
        );
        if let Some(preview) = &failure.raw_text_preview {
            println!("  extracted text preview:\n{}", preview);
        }
    }
    for warning in &summary.persistence_warnings {
        println!("warning: {}", warning);
    }

    if !summary.rows.is_empty() {
        let export_path = export::write_batch_csv(&environment.export_path, &summary.rows)?;
        println!("Results exported to {}", export_path.display());
    }

    Ok(())
}

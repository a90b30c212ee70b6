use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use quotr_channels::CliChannel;
use quotr_core::Channel;
use quotr_core::bootstrap::AppBuilder;
use quotr_core::session::{Session, TriggerOutcome};
use quotr_document::UploadedDocument;

const ABOUT: &str = "\
Welcome to the Best Quotation Recommender!

This AI-powered application helps you analyze and compare quotation PDFs
to identify the most suitable one based on your query.

Key Features:
  1. Upload one or multiple quotation PDF documents.
  2. Enter a query such as \"Which quotation offers better pricing and delivery terms?\"
  3. The AI analyzes the uploaded quotations and provides a context-based recommendation.
  4. Friendly, clear, and professional explanations.

Usage:
  quotr -f quote-a.pdf -f quote-b.pdf -q \"Which quotation is the best value?\"
  quotr -f quote-a.pdf -f quote-b.pdf        (ask queries interactively)";

/// Compare PDF quotations and get a recommendation from a hosted model.
#[derive(Parser)]
#[command(name = "quotr", version, about)]
struct Cli {
    /// Path to the TOML config file.
    #[arg(
        long,
        env = "QUOTR_CONFIG",
        default_value = "config/default.toml",
        global = true
    )]
    config: PathBuf,

    /// Quotation PDF to compare. Repeat for several files.
    #[arg(short = 'f', long = "file", value_name = "PDF")]
    files: Vec<PathBuf>,

    /// Ask a single query and exit instead of prompting.
    #[arg(short, long)]
    query: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Describe what Quotr does.
    About,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    if matches!(cli.command, Some(Command::About)) {
        println!("{ABOUT}");
        return Ok(ExitCode::SUCCESS);
    }

    let dotenv = dotenvy::dotenv();
    init_subscriber();
    match dotenv {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!("failed to load .env: {e}"),
    }

    let app = AppBuilder::from_path(&cli.config).await?;
    let provider = app.build_provider()?;
    let pipeline = app.build_pipeline(provider)?;

    let mut channel = CliChannel::new();
    let documents = read_documents(&cli.files, &mut channel).await?;
    let mut session = Session::new(channel, pipeline);

    if let Some(query) = cli.query {
        let outcome = session.trigger(&documents, &query).await?;
        return Ok(match outcome {
            TriggerOutcome::Recommendation(_) => ExitCode::SUCCESS,
            TriggerOutcome::Warning(_) | TriggerOutcome::Failed(_) => ExitCode::FAILURE,
        });
    }

    println!("💬 Best Quotation Recommender");
    println!(
        "{} document(s) loaded. Type a query, or 'exit' to quit.\n",
        documents.len()
    );
    session.run(&documents).await?;
    Ok(ExitCode::SUCCESS)
}

/// Read every named file once. Unreadable files are reported and skipped.
async fn read_documents(
    paths: &[PathBuf],
    channel: &mut impl Channel,
) -> anyhow::Result<Vec<UploadedDocument>> {
    let mut documents = Vec::with_capacity(paths.len());
    for path in paths {
        match UploadedDocument::from_path(path).await {
            Ok(doc) => documents.push(doc),
            Err(e) => {
                tracing::warn!(path = %path.display(), "failed to read file: {e}");
                channel
                    .send_error(&format!("Could not read '{}': {e}", display_name(path)))
                    .await?;
            }
        }
    }
    Ok(documents)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}

fn init_subscriber() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_files_and_query() {
        let cli = Cli::try_parse_from([
            "quotr", "-f", "a.pdf", "--file", "b.pdf", "-q", "cheapest?",
        ])
        .unwrap();
        assert_eq!(cli.files, vec![PathBuf::from("a.pdf"), PathBuf::from("b.pdf")]);
        assert_eq!(cli.query.as_deref(), Some("cheapest?"));
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_about_subcommand() {
        let cli = Cli::try_parse_from(["quotr", "about"]).unwrap();
        assert!(matches!(cli.command, Some(Command::About)));
    }

    #[test]
    fn display_name_uses_file_name() {
        assert_eq!(display_name(Path::new("/tmp/quotes/a.pdf")), "a.pdf");
    }
}

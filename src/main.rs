//! Reduct CLI entry point.

use anyhow::Result;
use clap::Parser;
use reduct::cli::commands::{self, CrawlArgs};
use reduct::cli::{Cli, Commands};
use reduct::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&Settings::expand_path(path)))?,
        None => Settings::load()?,
    };
    if let Some(dir) = &cli.sources_dir {
        settings.general.sources_dir = dir.clone();
    }

    // Initialize logging; -v flags win over the configured level
    let log_level = cli.log_level(&settings.general.log_level);

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("reduct={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Execute command
    match &cli.command {
        Commands::Add { url, skip_content } => {
            commands::run_add(url, *skip_content, &settings).await?;
        }

        Commands::AddBatch {
            urls,
            file,
            skip_content,
        } => {
            commands::run_add_batch(urls.as_deref(), file.as_deref(), *skip_content, &settings)
                .await?;
        }

        Commands::Transcribe { input, output } => {
            commands::run_transcribe(input, output.as_deref(), &settings).await?;
        }

        Commands::Summarize { source, output } => {
            commands::run_summarize(source, output.as_deref(), &settings).await?;
        }

        Commands::SummarizeAll => {
            commands::run_summarize_all(&settings).await?;
        }

        Commands::Status { detailed } => {
            commands::run_status(*detailed, &settings)?;
        }

        Commands::Models { filter } => {
            commands::run_models(filter.as_deref(), &settings).await?;
        }

        Commands::Crawl {
            url,
            max_depth,
            max_pages,
            delay,
            skip_content,
        } => {
            let args = CrawlArgs {
                max_depth: *max_depth,
                max_pages: *max_pages,
                delay: *delay,
                skip_content: *skip_content,
            };
            commands::run_crawl(url, args, &settings).await?;
        }

        Commands::Serve { host, port } => {
            commands::run_serve(host.as_deref(), *port, &settings).await?;
        }

        Commands::Doctor => {
            commands::run_doctor(&settings)?;
        }

        Commands::Config { action } => {
            commands::run_config(action, cli.config.as_deref(), &settings)?;
        }
    }

    Ok(())
}

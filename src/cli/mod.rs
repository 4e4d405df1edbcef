//! CLI module for Reduct.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Reduct - collect, extract and summarize videos and articles
///
/// Sources are stored one directory each, with metadata, extracted content
/// and an optional LLM summary.
#[derive(Parser, Debug)]
#[command(name = "reduct")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Sources directory (overrides config and REDUCT_SOURCES_DIR)
    #[arg(short = 'd', long, global = true)]
    pub sources_dir: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a single video or article by URL
    Add {
        url: String,

        /// Store metadata only, without extracting content
        #[arg(long)]
        skip_content: bool,
    },

    /// Add several sources from a comma-separated list or a file
    AddBatch {
        /// Comma-separated URLs
        #[arg(short, long, conflicts_with = "file", required_unless_present = "file")]
        urls: Option<String>,

        /// File with one URL per line ('#' starts a comment)
        #[arg(short, long)]
        file: Option<String>,

        /// Store metadata only, without extracting content
        #[arg(long)]
        skip_content: bool,
    },

    /// Transcribe a URL or local audio/video file
    Transcribe {
        /// Video URL or local file path
        input: String,

        /// Write the transcript to this file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Summarize one source's content with the LLM
    Summarize {
        /// Source directory name or title
        source: String,

        /// Write the summary here instead of the source's summary.md
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Summarize every source that has content but no summary
    SummarizeAll,

    /// Show how many sources have content and summaries
    Status {
        /// List every source, newest first
        #[arg(long)]
        detailed: bool,
    },

    /// List available LLM models grouped by provider
    Models {
        /// Only show models whose id contains this text
        filter: Option<String>,
    },

    /// Crawl a site and add every page as a source
    Crawl {
        /// Seed URL
        url: String,

        /// Maximum link depth from the seed
        #[arg(long)]
        max_depth: Option<usize>,

        /// Maximum number of pages to add
        #[arg(long)]
        max_pages: Option<usize>,

        /// Seconds to wait between pages
        #[arg(long)]
        delay: Option<f64>,

        /// Store metadata only, without extracting content
        #[arg(long)]
        skip_content: bool,
    },

    /// Start the text reduction HTTP server
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Check system requirements and configuration
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Write the current configuration to the config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show configuration file path
    Path,
}

impl Cli {
    /// Log level for the `-v` count; without `-v` the configured level is used.
    pub fn log_level<'a>(&self, configured: &'a str) -> &'a str {
        match self.verbose {
            0 => configured,
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

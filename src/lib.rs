//! Reduct - collect, extract and summarize videos and articles
//!
//! A CLI tool that keeps a local directory of "sources" (YouTube videos and
//! web articles), extracts their transcript or text, and summarizes them with
//! an LLM. It also ships a small HTTP server that shrinks arbitrary text.
//!
//! # Architecture
//!
//! - `config` - Settings and prompt templates
//! - `source` - URL classification and metadata extraction
//! - `content` - Article text extraction and video transcription
//! - `audio` - Audio download and processing
//! - `transcription` - Speech-to-text
//! - `store` - Directory-per-source storage
//! - `crawl` - Breadth-first site crawler
//! - `llm` - LLM providers, completion, model listing
//! - `reduce` - Text reduction and its statistics
//! - `server` - HTTP API for reduction
//! - `orchestrator` - Pipeline coordination
//!
//! # Example
//!
//! ```rust,no_run
//! use reduct::config::Settings;
//! use reduct::orchestrator::Orchestrator;
//! use reduct::store::SourceStore;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let orchestrator = Orchestrator::new(&settings)?;
//!     let store = SourceStore::new(settings.sources_dir());
//!
//!     let added = orchestrator
//!         .add("https://www.youtube.com/watch?v=LCEmiRjPEtQ", &store, false)
//!         .await?;
//!     println!("Stored '{}' in {}", added.record.title, added.dir.path().display());
//!
//!     Ok(())
//! }
//! ```

pub mod audio;
pub mod cli;
pub mod config;
pub mod content;
pub mod crawl;
pub mod error;
pub mod llm;
pub mod orchestrator;
pub mod reduce;
pub mod server;
pub mod source;
pub mod store;
pub mod transcription;

pub use error::{ReductError, Result};

//! CLI command implementations.

mod add;
mod config;
mod crawl;
mod doctor;
mod models;
mod serve;
mod status;
mod summarize;
mod transcribe;

pub use add::{run_add, run_add_batch};
pub use config::run_config;
pub use crawl::{run_crawl, CrawlArgs};
pub use doctor::run_doctor;
pub use models::run_models;
pub use serve::run_serve;
pub use status::run_status;
pub use summarize::{run_summarize, run_summarize_all};
pub use transcribe::run_transcribe;

//! Audio acquisition for transcription.

mod downloader;

pub use downloader::{download_audio, normalize_to_mp3, split_audio};

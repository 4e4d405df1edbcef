//! Pipeline orchestrator for Reduct.
//!
//! Coordinates metadata extraction, content extraction, storage and
//! summarization for single sources and batches.

use crate::config::{Prompts, Settings};
use crate::content::{is_error_content, ContentExtractor};
use crate::crawl::SourceSink;
use crate::error::{ReductError, Result};
use crate::llm::{Completer, OpenAICompleter};
use crate::source::{MetadataExtractor, SourceRecord};
use crate::store::{SourceDir, SourceStore};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Result of adding one source.
#[derive(Debug, Clone)]
pub struct AddedSource {
    pub dir: SourceDir,
    pub record: SourceRecord,
    /// Whether content extraction ran and its output was stored.
    pub content_saved: bool,
    /// Placeholder text stored when content extraction failed.
    pub content_error: Option<String>,
}

impl AddedSource {
    /// Metadata and (if requested) content were both extracted.
    pub fn is_success(&self) -> bool {
        self.record.error.is_none() && self.content_error.is_none()
    }
}

/// Success/failure counts for a batch operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchTally {
    pub succeeded: usize,
    pub failed: usize,
    /// Items not attempted, e.g. sources without content during summarize-all.
    pub skipped: usize,
}

impl BatchTally {
    pub fn total(&self) -> usize {
        self.succeeded + self.failed + self.skipped
    }
}

/// The main orchestrator for the Reduct pipeline.
pub struct Orchestrator {
    metadata: MetadataExtractor,
    content: ContentExtractor,
    completer: std::result::Result<Arc<dyn Completer>, String>,
    prompts: Prompts,
}

impl Orchestrator {
    /// Create an orchestrator from settings.
    ///
    /// An unconfigured LLM is not an error here; commands that need it fail later.
    pub fn new(settings: &Settings) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let completer = OpenAICompleter::from_settings(&settings.llm)
            .map(|c| Arc::new(c) as Arc<dyn Completer>)
            .map_err(|e| e.to_string());

        Ok(Self {
            metadata: MetadataExtractor::new(&settings.fetch)?,
            content: ContentExtractor::new(settings)?,
            completer,
            prompts,
        })
    }

    /// Create an orchestrator with custom components.
    pub fn with_components(
        metadata: MetadataExtractor,
        content: ContentExtractor,
        completer: Option<Arc<dyn Completer>>,
        prompts: Prompts,
    ) -> Self {
        Self {
            metadata,
            content,
            completer: completer.ok_or_else(|| "No LLM configured".to_string()),
            prompts,
        }
    }

    /// The completer, or a configuration error if none could be built.
    pub fn completer(&self) -> Result<Arc<dyn Completer>> {
        self.completer
            .as_ref()
            .map(Arc::clone)
            .map_err(|e| ReductError::Config(e.clone()))
    }

    /// Extract metadata for `url`, store it, and optionally store its content.
    ///
    /// Extraction failures are stored on the record rather than returned;
    /// only storage errors are returned.
    #[instrument(skip(self, store))]
    pub async fn add(&self, url: &str, store: &SourceStore, skip_content: bool) -> Result<AddedSource> {
        let extraction = self.metadata.extract(url).await;
        let complete = extraction.is_complete();
        let record = extraction.into_record();

        let dir = store.add(&record)?;
        info!("Added '{}' at {}", record.title, dir.path().display());

        let mut added = AddedSource {
            dir,
            record,
            content_saved: false,
            content_error: None,
        };

        if skip_content || !complete {
            return Ok(added);
        }

        let content = self.content.extract(&added.record).await;
        added.dir.write_content(&content)?;
        added.content_saved = true;
        if is_error_content(&content) {
            added.content_error = Some(content);
        }

        Ok(added)
    }

    /// Add every URL, continuing past failures.
    pub async fn add_batch(&self, urls: &[String], store: &SourceStore, skip_content: bool) -> BatchTally {
        let mut tally = BatchTally::default();

        for (i, url) in urls.iter().enumerate() {
            info!("[{}/{}] Adding {}", i + 1, urls.len(), url);
            match self.add(url, store, skip_content).await {
                Ok(added) if added.is_success() => tally.succeeded += 1,
                Ok(added) => {
                    let reason = added
                        .record
                        .error
                        .as_deref()
                        .or(added.content_error.as_deref())
                        .unwrap_or("unknown error");
                    warn!("Failed to add {}: {}", url, reason);
                    tally.failed += 1;
                }
                Err(e) => {
                    warn!("Failed to add {}: {}", url, e);
                    tally.failed += 1;
                }
            }
        }

        info!(
            "Batch complete: {} succeeded, {} failed, {} total",
            tally.succeeded,
            tally.failed,
            tally.total()
        );
        tally
    }

    /// Summarize a source's stored content, writing to `output` or the source's summary file.
    #[instrument(skip(self, dir, output), fields(source = %dir.name()))]
    pub async fn summarize(&self, dir: &SourceDir, output: Option<&Path>) -> Result<PathBuf> {
        let completer = self.completer()?;
        let content = dir.content()?;
        if is_error_content(&content) {
            return Err(ReductError::Store(format!(
                "Stored content for '{}' is an extraction error",
                dir.name()
            )));
        }

        info!("Summarizing {} with {}", dir.name(), completer.model());
        let summary = completer
            .complete(&content, &self.prompts.summary_prompt())
            .await?;

        let path = match output {
            Some(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(path, &summary)?;
                path.to_path_buf()
            }
            None => dir.write_summary(&summary)?,
        };

        info!("Summary written to {}", path.display());
        Ok(path)
    }

    /// Summarize every source that has usable content and no summary yet.
    ///
    /// Fails up front only when no LLM is configured.
    pub async fn summarize_all(&self, store: &SourceStore) -> Result<BatchTally> {
        self.completer()?;

        let mut tally = BatchTally::default();
        let pending: Vec<SourceDir> = store
            .sources()?
            .into_iter()
            .filter(|d| !d.has_summary())
            .collect();

        for dir in &pending {
            if !dir.has_content() {
                info!("Skipping {}: no content", dir.name());
                tally.skipped += 1;
                continue;
            }

            match self.summarize(dir, None).await {
                Ok(_) => tally.succeeded += 1,
                Err(e) => {
                    warn!("Failed to summarize {}: {}", dir.name(), e);
                    tally.failed += 1;
                }
            }
        }

        info!(
            "Summarized {} of {} pending sources ({} failed, {} skipped)",
            tally.succeeded,
            pending.len(),
            tally.failed,
            tally.skipped
        );
        Ok(tally)
    }

    /// Transcribe a URL or local media file.
    pub async fn transcribe(&self, input: &str) -> Result<String> {
        self.content.transcribe(input).await
    }
}

#[async_trait]
impl SourceSink for Orchestrator {
    /// Pages whose metadata could not be extracted are stored but reported
    /// as errors so the crawler does not follow their links.
    async fn add_source(&self, url: &str, store: &SourceStore, skip_content: bool) -> Result<SourceDir> {
        let added = self.add(url, store, skip_content).await?;
        match added.record.error {
            Some(e) => Err(ReductError::Extraction(e)),
            None => Ok(added.dir),
        }
    }
}

/// URLs from a comma-separated list.
pub fn parse_url_csv(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// URLs from newline-delimited text; blank lines and `#` comments are ignored.
pub fn parse_url_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{PageFetcher, SourceKind, VideoInfo, VideoProbe};
    use std::sync::Mutex;

    struct Pages;

    #[async_trait]
    impl PageFetcher for Pages {
        async fn fetch(&self, url: &str) -> Result<String> {
            match url {
                "https://example.com/one" => Ok(page("One")),
                "https://example.com/two" => Ok(page("Two")),
                _ => Err(ReductError::Extraction(format!("404 for {}", url))),
            }
        }
    }

    fn page(title: &str) -> String {
        format!(
            "<html><head><title>{}</title></head><body><main><p>{} body</p></main></body></html>",
            title, title
        )
    }

    struct NoVideo;

    #[async_trait]
    impl VideoProbe for NoVideo {
        async fn probe(&self, _url: &str) -> Result<VideoInfo> {
            Err(ReductError::ToolNotFound("yt-dlp".to_string()))
        }
    }

    struct Summarizer {
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Completer for Summarizer {
        async fn complete(&self, content: &str, _instruction: &str) -> Result<String> {
            self.seen.lock().unwrap().push(content.to_string());
            Ok(format!("summary of {}", content))
        }

        fn model(&self) -> &str {
            "test/summarizer"
        }
    }

    fn orchestrator(tmp: &Path, completer: Option<Arc<dyn Completer>>) -> Orchestrator {
        let fetcher: Arc<dyn PageFetcher> = Arc::new(Pages);
        Orchestrator::with_components(
            MetadataExtractor::with_components(fetcher.clone(), Arc::new(NoVideo)),
            ContentExtractor::with_components(fetcher, None, tmp.join("tmp")),
            completer,
            Prompts::default(),
        )
    }

    #[test]
    fn test_parse_url_lists() {
        assert_eq!(
            parse_url_csv(" https://a.example , ,https://b.example"),
            vec!["https://a.example", "https://b.example"]
        );
        assert_eq!(
            parse_url_lines("# reading list\n\nhttps://a.example\n  https://b.example  \n#skip\n"),
            vec!["https://a.example", "https://b.example"]
        );
    }

    #[tokio::test]
    async fn test_add_stores_record_and_content() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SourceStore::new(tmp.path().join("sources"));
        let orch = orchestrator(tmp.path(), None);

        let added = orch.add("https://example.com/one", &store, false).await.unwrap();

        assert!(added.is_success());
        assert_eq!(added.dir.name(), "one");
        assert_eq!(added.record.kind, SourceKind::Article);
        assert_eq!(added.dir.content().unwrap(), "One body");
    }

    #[tokio::test]
    async fn test_add_skip_content() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SourceStore::new(tmp.path());
        let orch = orchestrator(tmp.path(), None);

        let added = orch.add("https://example.com/two", &store, true).await.unwrap();
        assert!(added.is_success());
        assert!(!added.content_saved);
        assert!(!added.dir.has_content());
    }

    #[tokio::test]
    async fn test_batch_tally_with_one_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SourceStore::new(tmp.path().join("sources"));
        let orch = orchestrator(tmp.path(), None);

        let urls = parse_url_lines(
            "https://example.com/one\n# comment\nhttps://example.com/missing\n\nhttps://example.com/two\n",
        );
        let tally = orch.add_batch(&urls, &store, false).await;

        assert_eq!(tally.succeeded, 2);
        assert_eq!(tally.failed, 1);
        assert_eq!(tally.total(), 3);

        // The failed source is still stored, with its error recorded
        let failed = store.find("Web Page").unwrap().record().unwrap();
        assert!(failed.error.unwrap().contains("404"));
    }

    #[tokio::test]
    async fn test_source_sink_rejects_failed_extraction() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SourceStore::new(tmp.path());
        let orch = orchestrator(tmp.path(), None);

        assert!(orch.add_source("https://example.com/one", &store, true).await.is_ok());
        assert!(orch.add_source("https://example.com/nope", &store, true).await.is_err());
    }

    #[tokio::test]
    async fn test_summarize_requires_llm() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SourceStore::new(tmp.path().join("sources"));
        let orch = orchestrator(tmp.path(), None);

        let added = orch.add("https://example.com/one", &store, false).await.unwrap();
        let err = orch.summarize(&added.dir, None).await.unwrap_err();
        assert!(matches!(err, ReductError::Config(_)));
        assert!(orch.summarize_all(&store).await.is_err());
    }

    #[tokio::test]
    async fn test_summarize_and_summarize_all() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SourceStore::new(tmp.path().join("sources"));
        let summarizer = Arc::new(Summarizer {
            seen: Mutex::new(Vec::new()),
        });
        let orch = orchestrator(tmp.path(), Some(summarizer.clone()));

        let one = orch.add("https://example.com/one", &store, false).await.unwrap();
        orch.add("https://example.com/two", &store, false).await.unwrap();
        orch.add("https://example.com/gone", &store, false).await.unwrap();

        // Explicit output path leaves the source's own summary untouched
        let out = tmp.path().join("out").join("one.md");
        let written = orch.summarize(&one.dir, Some(&out)).await.unwrap();
        assert_eq!(written, out);
        assert_eq!(std::fs::read_to_string(&out).unwrap(), "summary of One body");
        assert!(!one.dir.has_summary());

        let tally = orch.summarize_all(&store).await.unwrap();
        assert_eq!(tally.succeeded, 2);
        // "gone" failed extraction and has no content
        assert_eq!(tally.skipped, 1);
        assert!(one.dir.has_summary());

        // Nothing left to do on a second pass
        let again = orch.summarize_all(&store).await.unwrap();
        assert_eq!(again.succeeded, 0);
        assert_eq!(summarizer.seen.lock().unwrap().len(), 3);
    }
}

//! Directory-per-source storage.
//!
//! Layout under the store root:
//!
//! ```text
//! {root}/{slug}/data.yaml    metadata record
//! {root}/{slug}/content.md   transcript or article text
//! {root}/{slug}/summary.md   LLM summary
//! ```
//!
//! The slug is derived from the record title, so two sources with titles that
//! normalize to the same slug share a directory and the last write wins.
//! Nothing is ever deleted. There is no locking; a single writer is assumed.

mod slug;
mod status;

pub use slug::{slugify, FALLBACK_SLUG, MAX_SLUG_LEN};
pub use status::{SourceStatus, StoreStatus};

use crate::error::{ReductError, Result};
use crate::source::SourceRecord;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const RECORD_FILE: &str = "data.yaml";
pub const CONTENT_FILE: &str = "content.md";
pub const SUMMARY_FILE: &str = "summary.md";

/// A root directory holding one subdirectory per source.
#[derive(Debug, Clone)]
pub struct SourceStore {
    root: PathBuf,
}

impl SourceStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// A store nested under this one, in a directory named by the slug of `name`.
    pub fn scoped(&self, name: &str) -> SourceStore {
        SourceStore::new(self.root.join(slugify(name)))
    }

    /// Persist a record into its slug-named directory, creating it if needed.
    pub fn add(&self, record: &SourceRecord) -> Result<SourceDir> {
        let dir = SourceDir::new(self.root.join(slugify(&record.title)));
        std::fs::create_dir_all(dir.path())?;

        let yaml = serde_yaml::to_string(record)?;
        std::fs::write(dir.record_path(), yaml)?;

        debug!("Saved record to {}", dir.path().display());
        Ok(dir)
    }

    /// All immediate subdirectories of the root, sorted by name.
    /// A missing root is an empty store.
    pub fn list(&self) -> Result<Vec<SourceDir>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut dirs: Vec<SourceDir> = std::fs::read_dir(&self.root)?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|t| t.is_dir()).unwrap_or(false))
            .map(|entry| SourceDir::new(entry.path()))
            .collect();

        dirs.sort_by(|a, b| a.path().cmp(b.path()));
        Ok(dirs)
    }

    /// Subdirectories that hold a metadata record.
    pub fn sources(&self) -> Result<Vec<SourceDir>> {
        Ok(self.list()?.into_iter().filter(SourceDir::has_record).collect())
    }

    /// Look up a source by directory name, falling back to the slug of `name`.
    pub fn find(&self, name: &str) -> Result<SourceDir> {
        let direct = self.root.join(name);
        if direct.is_dir() && !name.contains(['/', '\\']) {
            return Ok(SourceDir::new(direct));
        }

        let slugged = self.root.join(slugify(name));
        if slugged.is_dir() {
            return Ok(SourceDir::new(slugged));
        }

        Err(ReductError::SourceNotFound(format!(
            "'{}' in {}",
            name,
            self.root.display()
        )))
    }

    /// Aggregate content/summary counts over all sources.
    pub fn status(&self) -> Result<StoreStatus> {
        StoreStatus::collect(&self.sources()?)
    }
}

/// Handle to one source directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDir {
    path: PathBuf,
}

impl SourceDir {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory name (the slug).
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    pub fn record_path(&self) -> PathBuf {
        self.path.join(RECORD_FILE)
    }

    pub fn content_path(&self) -> PathBuf {
        self.path.join(CONTENT_FILE)
    }

    pub fn summary_path(&self) -> PathBuf {
        self.path.join(SUMMARY_FILE)
    }

    pub fn has_record(&self) -> bool {
        self.record_path().is_file()
    }

    pub fn has_content(&self) -> bool {
        self.content_path().is_file()
    }

    pub fn has_summary(&self) -> bool {
        self.summary_path().is_file()
    }

    pub fn record(&self) -> Result<SourceRecord> {
        let yaml = std::fs::read_to_string(self.record_path())?;
        Ok(serde_yaml::from_str(&yaml)?)
    }

    pub fn content(&self) -> Result<String> {
        if !self.has_content() {
            return Err(ReductError::Store(format!(
                "No content for '{}'",
                self.name()
            )));
        }
        Ok(std::fs::read_to_string(self.content_path())?)
    }

    pub fn write_content(&self, text: &str) -> Result<PathBuf> {
        let path = self.content_path();
        std::fs::write(&path, text)?;
        Ok(path)
    }

    pub fn write_summary(&self, text: &str) -> Result<PathBuf> {
        let path = self.summary_path();
        std::fs::write(&path, text)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceKind;
    use tokio_test::assert_ok;

    fn record(title: &str, url: &str) -> SourceRecord {
        SourceRecord::new(url, SourceKind::Article, title)
    }

    #[test]
    fn test_add_writes_record() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SourceStore::new(tmp.path());

        let rec = record("Hello World", "https://example.com/hello");
        let dir = assert_ok!(store.add(&rec));

        assert_eq!(dir.name(), "hello-world");
        assert!(dir.has_record());
        assert!(!dir.has_content());
        assert_eq!(dir.record().unwrap(), rec);
    }

    #[test]
    fn test_add_is_idempotent_and_last_write_wins() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SourceStore::new(tmp.path());

        let first = store.add(&record("Rust Tips", "https://a.example/1")).unwrap();
        first.write_content("first content").unwrap();
        let second = store.add(&record("rust: tips!", "https://b.example/2")).unwrap();

        assert_eq!(first, second);
        assert_eq!(store.list().unwrap().len(), 1);
        assert_eq!(second.record().unwrap().url, "https://b.example/2");
        assert_eq!(second.content().unwrap(), "first content");
    }

    #[test]
    fn test_list_and_find() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SourceStore::new(tmp.path());
        assert!(store.list().unwrap().is_empty());

        store.add(&record("Beta", "https://example.com/b")).unwrap();
        store.add(&record("Alpha", "https://example.com/a")).unwrap();
        std::fs::write(tmp.path().join("stray.txt"), "not a dir").unwrap();

        let names: Vec<String> = store.list().unwrap().iter().map(SourceDir::name).collect();
        assert_eq!(names, vec!["alpha", "beta"]);

        assert_eq!(store.find("alpha").unwrap().name(), "alpha");
        assert_eq!(store.find("Alpha").unwrap().name(), "alpha");
        assert!(matches!(
            store.find("gamma"),
            Err(ReductError::SourceNotFound(_))
        ));
    }

    #[test]
    fn test_missing_root_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SourceStore::new(tmp.path().join("nope"));
        assert!(store.list().unwrap().is_empty());
        assert_eq!(store.status().unwrap().total, 0);
    }

    #[test]
    fn test_scoped_store() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SourceStore::new(tmp.path()).scoped("docs.example.com");
        let dir = store.add(&record("Intro", "https://docs.example.com/")).unwrap();

        assert_eq!(dir.path(), tmp.path().join("docs-example-com").join("intro"));
    }

    #[test]
    fn test_write_artifacts() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SourceStore::new(tmp.path());
        let dir = store.add(&record("Post", "https://example.com/p")).unwrap();

        assert!(dir.content().is_err());
        dir.write_content("body").unwrap();
        dir.write_summary("short").unwrap();

        assert!(dir.has_content());
        assert!(dir.has_summary());
        assert_eq!(std::fs::read_to_string(dir.summary_path()).unwrap(), "short");
    }
}

//! Aggregate status over a store.

use super::SourceDir;
use crate::error::Result;
use crate::source::SourceKind;
use chrono::{DateTime, Utc};

/// Per-source status line.
#[derive(Debug, Clone)]
pub struct SourceStatus {
    pub name: String,
    pub title: Option<String>,
    pub kind: Option<SourceKind>,
    pub date_added: Option<DateTime<Utc>>,
    pub has_content: bool,
    pub has_summary: bool,
    /// Extraction error recorded on the source, or why its record could not be read.
    pub error: Option<String>,
}

/// Counts across all sources, with entries newest first.
#[derive(Debug, Clone, Default)]
pub struct StoreStatus {
    pub total: usize,
    pub with_content: usize,
    pub with_summary: usize,
    pub entries: Vec<SourceStatus>,
}

impl StoreStatus {
    pub fn collect(dirs: &[SourceDir]) -> Result<Self> {
        let mut entries: Vec<SourceStatus> = dirs
            .iter()
            .map(|dir| {
                let (title, kind, date_added, error) = match dir.record() {
                    Ok(r) => (Some(r.title), Some(r.kind), Some(r.date_added), r.error),
                    Err(e) => (None, None, None, Some(format!("Unreadable record: {}", e))),
                };
                SourceStatus {
                    name: dir.name(),
                    title,
                    kind,
                    date_added,
                    has_content: dir.has_content(),
                    has_summary: dir.has_summary(),
                    error,
                }
            })
            .collect();

        // Newest first; undated entries last
        entries.sort_by(|a, b| b.date_added.cmp(&a.date_added));

        Ok(Self {
            total: entries.len(),
            with_content: entries.iter().filter(|e| e.has_content).count(),
            with_summary: entries.iter().filter(|e| e.has_summary).count(),
            entries,
        })
    }

    /// Share of sources with a summary, as a percentage.
    pub fn completion_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.with_summary as f64 / self.total as f64 * 100.0
        }
    }

    /// Sources with content but no summary yet.
    pub fn pending_summaries(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.has_content && !e.has_summary)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use crate::source::{SourceKind, SourceRecord};
    use crate::store::SourceStore;
    use chrono::{Duration, Utc};

    #[test]
    fn test_status_counts_and_order() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SourceStore::new(tmp.path());

        let mut old = SourceRecord::new("https://example.com/old", SourceKind::Article, "Old");
        old.date_added = Utc::now() - Duration::days(3);
        let new = SourceRecord::new("https://youtu.be/new", SourceKind::Video, "New");

        let old_dir = store.add(&old).unwrap();
        let new_dir = store.add(&new).unwrap();
        old_dir.write_content("text").unwrap();
        old_dir.write_summary("sum").unwrap();
        new_dir.write_content("text").unwrap();

        // A directory without a record is not a source
        std::fs::create_dir_all(tmp.path().join("site-example-com")).unwrap();

        let status = store.status().unwrap();
        assert_eq!(status.total, 2);
        assert_eq!(status.with_content, 2);
        assert_eq!(status.with_summary, 1);
        assert_eq!(status.pending_summaries(), 1);
        assert!((status.completion_rate() - 50.0).abs() < f64::EPSILON);

        let names: Vec<&str> = status.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["new", "old"]);
        assert_eq!(status.entries[0].kind, Some(SourceKind::Video));
    }

    #[test]
    fn test_unreadable_record() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("broken");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("data.yaml"), ": : not yaml [").unwrap();

        let status = SourceStore::new(tmp.path()).status().unwrap();
        assert_eq!(status.total, 1);
        assert!(status.entries[0].title.is_none());
        assert!(status.entries[0].error.as_deref().unwrap().starts_with("Unreadable record"));
    }
}

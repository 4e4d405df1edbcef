//! BFS frontier and visited set.

use std::collections::{HashSet, VecDeque};

/// FIFO of `(url, depth)` pairs plus the set of visited URLs.
///
/// A URL is enqueued at most once: `enqueue` refuses URLs that are already
/// visited or currently queued.
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<(String, usize)>,
    queued: HashSet<String>,
    visited: HashSet<String>,
}

impl Frontier {
    /// A frontier holding only the seed at depth 0.
    pub fn new(seed: &str) -> Self {
        let mut frontier = Self::default();
        frontier.enqueue(seed.to_string(), 0);
        frontier
    }

    /// Queue `url` at `depth`. Returns false if it was already seen.
    pub fn enqueue(&mut self, url: String, depth: usize) -> bool {
        if self.contains(&url) {
            return false;
        }
        self.queued.insert(url.clone());
        self.queue.push_back((url, depth));
        true
    }

    pub fn pop(&mut self) -> Option<(String, usize)> {
        let (url, depth) = self.queue.pop_front()?;
        self.queued.remove(&url);
        Some((url, depth))
    }

    pub fn mark_visited(&mut self, url: &str) {
        self.visited.insert(url.to_string());
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    /// Visited or queued.
    pub fn contains(&self, url: &str) -> bool {
        self.visited.contains(url) || self.queued.contains(url)
    }

    /// Number of URLs waiting in the queue.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }
}

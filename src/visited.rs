use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;

/// The visited store shared between the session and the driver task.
pub type SharedVisited = Arc<Mutex<VisitedStore>>;

/// Insertion-ordered set of visited URLs. Exact-match, case-sensitive,
/// growing for the lifetime of the process.
#[derive(Debug, Default)]
pub struct VisitedStore {
    order: Vec<String>,
    seen: HashSet<String>,
}

impl VisitedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a URL. Returns false when it was already present.
    pub fn add(&mut self, url: &str) -> bool {
        if self.seen.contains(url) {
            return false;
        }
        self.seen.insert(url.to_string());
        self.order.push(url.to_string());
        true
    }

    pub fn contains(&self, url: &str) -> bool {
        self.seen.contains(url)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Membership view for the extractor's filter.
    pub fn set(&self) -> &HashSet<String> {
        &self.seen
    }

    /// Snapshot in insertion order.
    pub fn list(&self) -> Vec<String> {
        self.order.clone()
    }

    /// Export body: one URL per line, no header, no trailing newline.
    pub fn to_text(&self) -> String {
        self.order.join("\n")
    }
}

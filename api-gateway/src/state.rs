//! Shared application state and the pending-request queue.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;

use watermark::JsonFileRegistry;

/// Lifecycle of a queued semantic-integrity request.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Processed,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Processed => "processed",
        }
    }
}

/// One candidate/reference image pair awaiting (or finished with)
/// external semantic-integrity evaluation.
#[derive(Clone, Debug)]
pub struct PendingEntry {
    pub candidate_image_path: String,
    pub reference_image_path: String,
    pub status: RequestStatus,
}

/// In-memory queue of evaluation requests.
///
/// HTTP handlers append pairs; the external evaluator lists pending
/// pairs and posts results, which flips the matching entry to
/// `Processed`. Duplicate pairs are suppressed regardless of status.
#[derive(Default)]
pub struct PendingQueue {
    entries: Vec<PendingEntry>,
}

impl PendingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries still waiting for a result.
    pub fn pending(&self) -> Vec<PendingEntry> {
        self.entries
            .iter()
            .filter(|e| e.status == RequestStatus::Pending)
            .cloned()
            .collect()
    }

    /// Adds a pair as pending.
    ///
    /// Returns the existing status instead when the pair is already
    /// queued in any state.
    pub fn enqueue(&mut self, candidate: &str, reference: &str) -> Option<RequestStatus> {
        if let Some(existing) = self.find(candidate, reference) {
            return Some(existing.status);
        }
        self.entries.push(PendingEntry {
            candidate_image_path: candidate.to_string(),
            reference_image_path: reference.to_string(),
            status: RequestStatus::Pending,
        });
        None
    }

    /// Marks a pending pair as processed.
    ///
    /// Returns `false` when no matching entry is still pending.
    pub fn mark_processed(&mut self, candidate: &str, reference: &str) -> bool {
        match self.entries.iter_mut().find(|e| {
            e.candidate_image_path == candidate
                && e.reference_image_path == reference
                && e.status == RequestStatus::Pending
        }) {
            Some(entry) => {
                entry.status = RequestStatus::Processed;
                true
            }
            None => false,
        }
    }

    fn find(&self, candidate: &str, reference: &str) -> Option<&PendingEntry> {
        self.entries
            .iter()
            .find(|e| e.candidate_image_path == candidate && e.reference_image_path == reference)
    }
}

/// Shared state held by the API handlers.
///
/// This is wrapped in an [`Arc`] and passed to request handlers via
/// Axum's `State` extractor.
pub struct AppState {
    /// Persistent watermark registration ledger.
    pub registry: Mutex<JsonFileRegistry>,
    /// Queue of candidate/reference pairs for the external evaluator.
    pub pending: Mutex<PendingQueue>,
}

/// Thread-safe alias for `AppState`.
pub type SharedState = Arc<AppState>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enqueue_then_list_pending() {
        let mut queue = PendingQueue::new();
        assert!(queue.enqueue("cand.png", "ref.png").is_none());

        let pending = queue.pending();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].candidate_image_path, "cand.png");
    }

    #[test]
    fn duplicates_are_suppressed_with_their_status() {
        let mut queue = PendingQueue::new();
        queue.enqueue("cand.png", "ref.png");

        assert_eq!(
            queue.enqueue("cand.png", "ref.png"),
            Some(RequestStatus::Pending)
        );

        queue.mark_processed("cand.png", "ref.png");
        assert_eq!(
            queue.enqueue("cand.png", "ref.png"),
            Some(RequestStatus::Processed)
        );
    }

    #[test]
    fn processing_removes_the_pair_from_pending() {
        let mut queue = PendingQueue::new();
        queue.enqueue("a.png", "b.png");

        assert!(queue.mark_processed("a.png", "b.png"));
        assert!(queue.pending().is_empty());

        // A processed pair cannot be processed again.
        assert!(!queue.mark_processed("a.png", "b.png"));
    }

    #[test]
    fn unknown_pairs_cannot_be_processed() {
        let mut queue = PendingQueue::new();
        assert!(!queue.mark_processed("nope.png", "ref.png"));
    }
}

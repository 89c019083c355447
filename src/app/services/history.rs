//! Throttled, bounded version history.
//!
//! Snapshots are independent deep copies of the document; restoring one hands
//! out another copy, so nothing in the ring ever aliases the live document.

use std::collections::VecDeque;
use std::time::Duration;

use crate::app::domain::Document;
use crate::app::infrastructure::clock::local_time_label;

#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Capture time in milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub document: Document,
}

/// One row of the version list shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub timestamp: i64,
    pub label: String,
    pub title: String,
}

/// Fixed-capacity ring of snapshots, oldest evicted first.
#[derive(Debug, Clone)]
pub struct SnapshotRing {
    entries: VecDeque<Snapshot>,
    capacity: usize,
    throttle_millis: i64,
}

impl SnapshotRing {
    pub fn new(capacity: usize, throttle: Duration) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            throttle_millis: throttle.as_millis() as i64,
        }
    }

    /// True when the ring is empty or the newest snapshot is at least one
    /// throttle window old.
    pub fn is_due(&self, now: i64) -> bool {
        match self.entries.back() {
            Some(last) => now - last.timestamp >= self.throttle_millis,
            None => true,
        }
    }

    /// Capture `doc` if the throttle allows it. Returns whether a snapshot was taken.
    pub fn capture(&mut self, doc: &Document, now: i64) -> bool {
        if !self.is_due(now) {
            return false;
        }
        self.push(Snapshot {
            timestamp: now,
            document: doc.clone(),
        });
        true
    }

    pub fn push(&mut self, snapshot: Snapshot) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(snapshot);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn newest_first(&self) -> impl Iterator<Item = &Snapshot> {
        self.entries.iter().rev()
    }

    /// Snapshot at `index` in newest-first order.
    pub fn get(&self, index: usize) -> Option<&Snapshot> {
        self.newest_first().nth(index)
    }

    pub fn listing(&self) -> Vec<HistoryEntry> {
        self.newest_first()
            .map(|s| HistoryEntry {
                timestamp: s.timestamp,
                label: local_time_label(s.timestamp),
                title: s.document.display_title().to_string(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titled(title: &str) -> Document {
        let mut doc = Document::default();
        doc.meta.title = title.to_string();
        doc
    }

    #[test]
    fn test_first_capture_always_allowed() {
        let mut ring = SnapshotRing::new(10, Duration::from_secs(60));
        assert!(ring.capture(&titled("a"), 0));
        assert_eq!(ring.len(), 1);
    }

    #[test]
    fn test_capture_is_throttled() {
        let mut ring = SnapshotRing::new(10, Duration::from_secs(60));
        assert!(ring.capture(&titled("a"), 1_000));
        assert!(!ring.capture(&titled("b"), 30_000));
        assert!(!ring.capture(&titled("c"), 60_999));
        assert!(ring.capture(&titled("d"), 61_000));
        assert_eq!(ring.len(), 2);
        assert_eq!(ring.get(0).unwrap().document.meta.title, "d");
    }

    #[test]
    fn test_oldest_evicted_at_capacity() {
        let mut ring = SnapshotRing::new(3, Duration::ZERO);
        for (i, title) in ["a", "b", "c", "d"].iter().enumerate() {
            ring.capture(&titled(title), i as i64);
        }
        assert_eq!(ring.len(), 3);
        let titles: Vec<_> = ring
            .newest_first()
            .map(|s| s.document.meta.title.as_str())
            .collect();
        assert_eq!(titles, vec!["d", "c", "b"]);
    }

    #[test]
    fn test_snapshot_is_independent_copy() {
        let mut ring = SnapshotRing::new(2, Duration::ZERO);
        let mut doc = titled("before");
        ring.capture(&doc, 0);
        doc.meta.title = "after".to_string();
        assert_eq!(ring.get(0).unwrap().document.meta.title, "before");
    }

    #[test]
    fn test_listing_uses_untitled_fallback() {
        let mut ring = SnapshotRing::new(2, Duration::ZERO);
        ring.capture(&titled(""), 0);
        ring.capture(&titled("Plan"), 1);
        let listing = ring.listing();
        assert_eq!(listing[0].title, "Plan");
        assert_eq!(listing[1].title, "Untitled");
        assert_eq!(listing[0].label.len(), 8);
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let ring = SnapshotRing::new(0, Duration::ZERO);
        assert_eq!(ring.capacity(), 1);
    }
}

//! Ordered store of pending requests
//!
//! Entries are kept in insertion order. Reads never reorder; every removal is
//! final and the store has no way to put an entry back.

use crate::deferred::Settler;
use crate::types::{EntryId, FutureId, PendingRequest};
use std::collections::VecDeque;

/// A pending request together with the settler for its future
#[derive(Debug)]
pub struct QueuedRequest {
    pub request: PendingRequest,
    pub settler: Settler,
}

/// FIFO queue of outstanding requests
#[derive(Debug, Default)]
pub struct QueueStore {
    entries: VecDeque<QueuedRequest>,
}

impl QueueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn append(&mut self, entry: QueuedRequest) {
        self.entries.push_back(entry);
    }

    /// Remove the entry at `index` (0 is the oldest).
    pub fn remove_at(&mut self, index: usize) -> Option<QueuedRequest> {
        self.entries.remove(index)
    }

    pub fn remove_oldest(&mut self) -> Option<QueuedRequest> {
        self.entries.pop_front()
    }

    pub fn remove_by_future(&mut self, id: FutureId) -> Option<QueuedRequest> {
        let index = self
            .entries
            .iter()
            .position(|e| e.request.future_id() == id)?;
        self.remove_at(index)
    }

    pub fn remove_by_entry(&mut self, id: EntryId) -> Option<QueuedRequest> {
        let index = self.entries.iter().position(|e| e.request.id == id)?;
        self.remove_at(index)
    }

    pub fn peek_newest(&self) -> Option<&PendingRequest> {
        self.entries.back().map(|e| &e.request)
    }

    /// Newest entry whose url is exactly `url`
    pub fn find_newest_by_url(&self, url: &str) -> Option<&PendingRequest> {
        self.find_newest(|r| r.url.as_deref() == Some(url))
    }

    /// Newest entry satisfying `predicate`
    pub fn find_newest<P>(&self, mut predicate: P) -> Option<&PendingRequest>
    where
        P: FnMut(&PendingRequest) -> bool,
    {
        self.entries
            .iter()
            .rev()
            .map(|e| &e.request)
            .find(|r| predicate(r))
    }

    /// Pending requests, oldest first
    pub fn snapshot(&self) -> Vec<PendingRequest> {
        self.entries.iter().map(|e| e.request.clone()).collect()
    }

    /// Empty the store. Settlers are dropped unsettled.
    pub fn clear_all(&mut self) -> usize {
        let dropped = self.entries.len();
        self.entries.clear();
        dropped
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::deferred::deferred;
    use crate::types::{Method, RequestConfig};

    fn entry(url: &str) -> QueuedRequest {
        let (settler, future) = deferred();
        let config = RequestConfig::new().with_url(url);
        QueuedRequest {
            request: PendingRequest {
                id: EntryId::new(),
                method: Method::Get,
                url: config.url.clone(),
                data: None,
                config,
                future,
            },
            settler,
        }
    }

    fn store_with(urls: &[&str]) -> QueueStore {
        let mut store = QueueStore::new();
        for url in urls {
            store.append(entry(url));
        }
        store
    }

    #[test]
    fn test_remove_oldest_drains_fifo() {
        let mut store = store_with(&["/a", "/b", "/c"]);
        let mut order = Vec::new();
        while let Some(e) = store.remove_oldest() {
            order.push(e.request.url.unwrap());
        }
        assert_eq!(order, ["/a", "/b", "/c"]);
        assert!(store.remove_oldest().is_none());
    }

    #[test]
    fn test_remove_by_identity() {
        let mut store = store_with(&["/a", "/b", "/c"]);
        let middle = store.snapshot()[1].clone();

        let removed = store.remove_by_future(middle.future_id()).unwrap();
        assert_eq!(removed.request.id, middle.id);
        assert_eq!(store.len(), 2);

        assert!(store.remove_by_future(middle.future_id()).is_none());
        assert!(store.remove_by_entry(middle.id).is_none());
        assert_eq!(store.len(), 2);

        let first = store.snapshot()[0].id;
        assert_eq!(store.remove_by_entry(first).unwrap().request.id, first);
        assert_eq!(store.snapshot()[0].url.as_deref(), Some("/c"));
    }

    #[test]
    fn test_find_newest_by_url_does_not_mutate() {
        let store = store_with(&["/users/1", "/users/2", "/users/1"]);
        let snapshot = store.snapshot();

        let found = store.find_newest_by_url("/users/1").unwrap();
        assert_eq!(found.id, snapshot[2].id);
        assert!(store.find_newest_by_url("/users").is_none());

        let after: Vec<EntryId> = store.snapshot().iter().map(|r| r.id).collect();
        let before: Vec<EntryId> = snapshot.iter().map(|r| r.id).collect();
        assert_eq!(after, before);
    }

    #[test]
    fn test_remove_at_out_of_range() {
        let mut store = store_with(&["/a"]);
        assert!(store.remove_at(3).is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_clear_all_on_empty_and_full() {
        let mut store = QueueStore::new();
        assert_eq!(store.clear_all(), 0);
        assert!(store.peek_newest().is_none());

        let mut store = store_with(&["/a", "/b"]);
        assert_eq!(store.peek_newest().unwrap().url.as_deref(), Some("/b"));
        assert_eq!(store.clear_all(), 2);
        assert!(store.is_empty());
    }
}

//! Selecting which pending request an operation applies to

use crate::deferred::ResponseFuture;
use crate::store::{QueueStore, QueuedRequest};
use crate::types::{EntryId, FutureId, PendingRequest};

/// Which pending request to take
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Selector {
    /// A specific request entry
    Entry(EntryId),
    /// The entry owning a specific future
    Future(FutureId),
    /// The oldest pending request
    #[default]
    Oldest,
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Entry(id) => write!(f, "entry {id}"),
            Self::Future(id) => write!(f, "future {id}"),
            Self::Oldest => f.write_str("oldest"),
        }
    }
}

impl From<&PendingRequest> for Selector {
    fn from(request: &PendingRequest) -> Self {
        Self::Entry(request.id)
    }
}

impl From<&ResponseFuture> for Selector {
    fn from(future: &ResponseFuture) -> Self {
        Self::Future(future.id())
    }
}

impl From<EntryId> for Selector {
    fn from(id: EntryId) -> Self {
        Self::Entry(id)
    }
}

impl From<FutureId> for Selector {
    fn from(id: FutureId) -> Self {
        Self::Future(id)
    }
}

/// Find and remove the entry `selector` names.
pub fn locate(store: &mut QueueStore, selector: Selector) -> Option<QueuedRequest> {
    match selector {
        Selector::Entry(id) => store.remove_by_entry(id),
        Selector::Future(id) => store.remove_by_future(id),
        Selector::Oldest => store.remove_oldest(),
    }
}

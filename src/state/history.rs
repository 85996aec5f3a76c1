/// Session history of successful edits
///
/// Entries are kept newest-first in a capped deque. Nothing here is
/// persisted; the buffer lives exactly as long as the application.

use super::image::ImagePayload;
use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Maximum number of entries kept
pub const HISTORY_CAPACITY: usize = 10;

static NEXT_HISTORY_ID: AtomicU64 = AtomicU64::new(1);

/// Unique id of a history entry. Later entries always get larger ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HistoryId(u64);

impl HistoryId {
    fn next() -> Self {
        Self(NEXT_HISTORY_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for HistoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Snapshot of one successful edit
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    id: HistoryId,
    original: ImagePayload,
    modified: ImagePayload,
    prompt: String,
    created_at: DateTime<Utc>,
}

impl HistoryEntry {
    /// Capture a finished edit, stamping it with a fresh id and the current time
    pub fn new(original: ImagePayload, modified: ImagePayload, prompt: impl Into<String>) -> Self {
        Self {
            id: HistoryId::next(),
            original,
            modified,
            prompt: prompt.into(),
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> HistoryId {
        self.id
    }

    pub fn original(&self) -> &ImagePayload {
        &self.original
    }

    pub fn modified(&self) -> &ImagePayload {
        &self.modified
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Newest-first list of edits, never longer than [`HISTORY_CAPACITY`]
#[derive(Debug, Clone, Default)]
pub struct HistoryBuffer {
    entries: VecDeque<HistoryEntry>,
}

impl HistoryBuffer {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(HISTORY_CAPACITY + 1),
        }
    }

    /// Put `entry` at the front, dropping the oldest entry if the buffer
    /// would grow past capacity
    pub fn record(&mut self, entry: HistoryEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(HISTORY_CAPACITY);
    }

    /// Forget everything
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn get(&self, id: HistoryId) -> Option<&HistoryEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Entries from newest to oldest
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

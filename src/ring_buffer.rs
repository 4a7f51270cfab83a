//! Ring buffer sink for bounded trace capture.
//!
//! Keeps the most recent trace records in memory with a fixed footprint.
//! Useful in tests, and in long-running control loops where a post-mortem
//! of the last few exceptions is wanted without a logging backend.
//!
//! # Design Principles
//!
//! - **Bounded memory**: fixed number of entries, each capped in bytes
//! - **FIFO eviction**: oldest records are dropped first
//! - **RwLock-based**: concurrent readers, exclusive writers
//! - **Shared clones**: every clone sees the same storage
//!
//! # Example
//!
//! ```rust
//! use dynamic_graph_exceptions::{logging, factory_err, FactoryErrorCode, TraceBuffer};
//! use std::sync::Arc;
//!
//! let buffer = TraceBuffer::new(100, 512);
//! logging::with_sink(Arc::new(buffer.clone()), || {
//!     let _ = factory_err!(FactoryErrorCode::ReadFile, "cannot read ", "{}", "robot.yaml");
//! });
//!
//! let newest = &buffer.get_recent(1)[0];
//! assert_eq!(newest.text.as_ref(), "Throw exception Factory[#409]: <cannot read robot.yaml>.");
//! ```

use crate::logging::{TraceRecord, TraceSink};
use std::borrow::Cow;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{SystemTime, UNIX_EPOCH};

/// One captured trace record.
///
/// Uses `Arc<str>` so that `get_recent()` clones are refcount bumps.
#[derive(Clone, Debug)]
pub struct TraceEntry {
    /// Unix timestamp of capture
    pub timestamp: u64,
    /// Capture order, starting at 0 for each buffer
    pub sequence: u64,
    /// Verbosity level of the record
    pub level: u8,
    /// Exception category name
    pub exception: &'static str,
    /// Numeric error code, when the record carried one
    pub code: Option<u16>,
    /// Rendered message, possibly truncated
    pub text: Arc<str>,
}

/// Fixed-size ring buffer with exact allocation (no growth).
struct RingBuffer {
    entries: Box<[Option<TraceEntry>]>,
    /// Write position
    tail: usize,
    /// Oldest entry
    head: usize,
    len: usize,
}

impl RingBuffer {
    fn new(capacity: usize) -> Self {
        Self {
            entries: std::iter::repeat_with(|| None)
                .take(capacity)
                .collect::<Box<[Option<TraceEntry>]>>(),
            tail: 0,
            head: 0,
            len: 0,
        }
    }

    fn push(&mut self, entry: TraceEntry) -> Option<TraceEntry> {
        let evicted = self.entries[self.tail].replace(entry);
        self.tail = (self.tail + 1) % self.entries.len();

        if self.len < self.entries.len() {
            self.len += 1;
        } else {
            self.head = (self.head + 1) % self.entries.len();
        }

        evicted
    }

    #[inline]
    fn len(&self) -> usize {
        self.len
    }

    fn iter(&self) -> impl DoubleEndedIterator<Item = &TraceEntry> {
        let head = self.head;
        let len = self.len;
        let cap = self.entries.len();

        (0..len).filter_map(move |i| {
            let idx = (head + i) % cap;
            self.entries[idx].as_ref()
        })
    }

    fn clear(&mut self) {
        for entry in self.entries.iter_mut() {
            *entry = None;
        }
        self.head = 0;
        self.tail = 0;
        self.len = 0;
    }
}

/// Bounded in-memory [`TraceSink`].
pub struct TraceBuffer {
    buffer: Arc<RwLock<RingBuffer>>,
    max_entries: usize,
    max_entry_bytes: usize,
    sequence: Arc<AtomicU64>,
    eviction_count: Arc<AtomicU64>,
}

impl TraceBuffer {
    /// Create a trace buffer.
    ///
    /// # Arguments
    ///
    /// * `max_entries` - Entries kept before FIFO eviction (at least 1)
    /// * `max_entry_bytes` - Cap on each entry's rendered text
    pub fn new(max_entries: usize, max_entry_bytes: usize) -> Self {
        let bounded_entries = max_entries.max(1);
        Self {
            buffer: Arc::new(RwLock::new(RingBuffer::new(bounded_entries))),
            max_entries: bounded_entries,
            max_entry_bytes,
            sequence: Arc::new(AtomicU64::new(0)),
            eviction_count: Arc::new(AtomicU64::new(0)),
        }
    }

    #[inline]
    fn read_buffer(&self) -> RwLockReadGuard<'_, RingBuffer> {
        match self.buffer.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    #[inline]
    fn write_buffer(&self) -> RwLockWriteGuard<'_, RingBuffer> {
        match self.buffer.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn create_entry(&self, record: &TraceRecord<'_>) -> TraceEntry {
        let rendered = record.to_string();
        let text = truncate_to_bytes(&rendered, self.max_entry_bytes);

        TraceEntry {
            timestamp: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map_or(0, |d| d.as_secs()),
            sequence: self.sequence.fetch_add(1, Ordering::Relaxed),
            level: record.level(),
            exception: record.exception(),
            code: record.code(),
            text: Arc::from(text.as_ref()),
        }
    }

    /// Get the N most recent entries, newest first.
    pub fn get_recent(&self, count: usize) -> Vec<TraceEntry> {
        let buffer = self.read_buffer();
        buffer.iter().rev().take(count).cloned().collect()
    }

    /// Get all entries, newest first.
    pub fn get_all(&self) -> Vec<TraceEntry> {
        let buffer = self.read_buffer();
        buffer.iter().rev().cloned().collect()
    }

    /// Get entries matching a predicate, oldest first.
    ///
    /// ```rust
    /// # use dynamic_graph_exceptions::TraceBuffer;
    /// # let buffer = TraceBuffer::new(100, 512);
    /// let summaries = buffer.get_filtered(|entry| entry.level <= 1);
    /// ```
    pub fn get_filtered<F>(&self, predicate: F) -> Vec<TraceEntry>
    where
        F: Fn(&TraceEntry) -> bool,
    {
        let buffer = self.read_buffer();
        buffer.iter().filter(|e| predicate(e)).cloned().collect()
    }

    /// Number of stored entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.read_buffer().len()
    }

    /// Check whether no entry is stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get total number of evictions since creation.
    #[inline]
    pub fn eviction_count(&self) -> u64 {
        self.eviction_count.load(Ordering::Relaxed)
    }

    /// Drop every entry. Sequence numbers keep counting.
    pub fn clear(&self) {
        self.write_buffer().clear();
    }

    /// Maximum number of entries kept.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.max_entries
    }

    /// Check whether the next record evicts the oldest one.
    pub fn is_full(&self) -> bool {
        self.len() >= self.max_entries
    }
}

impl TraceSink for TraceBuffer {
    fn record(&self, record: &TraceRecord<'_>) {
        // Render before taking the lock.
        let entry = self.create_entry(record);

        let mut buffer = self.write_buffer();
        if buffer.push(entry).is_some() {
            self.eviction_count.fetch_add(1, Ordering::Relaxed);
        }
    }
}

impl Clone for TraceBuffer {
    fn clone(&self) -> Self {
        Self {
            buffer: Arc::clone(&self.buffer),
            max_entries: self.max_entries,
            max_entry_bytes: self.max_entry_bytes,
            sequence: Arc::clone(&self.sequence),
            eviction_count: Arc::clone(&self.eviction_count),
        }
    }
}

/// Truncate string to maximum byte length, respecting UTF-8 boundaries.
///
/// Returns Cow to avoid allocation when no truncation is needed.
fn truncate_to_bytes(s: &str, max_bytes: usize) -> Cow<'_, str> {
    if max_bytes == 0 {
        return Cow::Borrowed("");
    }
    if s.len() <= max_bytes {
        return Cow::Borrowed(s);
    }

    let indicator = "...[TRUNC]";
    if max_bytes <= indicator.len() {
        return Cow::Borrowed(&indicator[..max_bytes]);
    }
    let max_content = max_bytes - indicator.len();

    let mut idx = max_content;
    while idx > 0 && !s.is_char_boundary(idx) {
        idx -= 1;
    }

    if idx == 0 {
        return Cow::Borrowed(indicator);
    }

    let mut out = String::with_capacity(idx + indicator.len());
    out.push_str(&s[..idx]);
    out.push_str(indicator);
    Cow::Owned(out)
}

//! Bounded list of generated clips, newest first.

use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::fmt;

use crate::audio::DecodedAudioBuffer;
use crate::synthesis::{Emotion, Voice};

/// Number of clips kept; older ones are dropped silently
pub const HISTORY_CAPACITY: usize = 10;

/// Length of generated entry ids
const ENTRY_ID_LEN: usize = 9;

/// Short identifier of a history entry
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntryId(String);

impl EntryId {
    /// Fresh random id of lowercase hex characters
    pub fn generate() -> Self {
        let simple = uuid::Uuid::new_v4().simple().to_string();
        Self(simple[..ENTRY_ID_LEN].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EntryId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A synthesized clip and what produced it
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub id: EntryId,
    pub text: String,
    pub voice: Voice,
    pub emotion: Emotion,
    pub buffer: DecodedAudioBuffer,
    pub created_at: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(text: String, voice: Voice, emotion: Emotion, buffer: DecodedAudioBuffer) -> Self {
        Self {
            id: EntryId::generate(),
            text,
            voice,
            emotion,
            buffer,
            created_at: Utc::now(),
        }
    }
}

/// Newest-first FIFO bounded to a fixed capacity
#[derive(Debug)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Add `entry` at the front, evicting the oldest beyond capacity
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(self.capacity);
    }

    pub fn get(&self, id: &EntryId) -> Option<&HistoryEntry> {
        self.entries.iter().find(|e| &e.id == id)
    }

    /// Most recent entry
    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.front()
    }

    /// Entries, newest first
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

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(text: &str) -> HistoryEntry {
        let buffer = DecodedAudioBuffer::from_channels(24000, vec![vec![0.0; 10]]).unwrap();
        HistoryEntry::new(text.to_string(), Voice::Kore, Emotion::Neutral, buffer)
    }

    #[test]
    fn test_generated_ids() {
        let a = EntryId::generate();
        let b = EntryId::generate();
        assert_eq!(a.as_str().len(), 9);
        assert!(a.as_str().chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
    }

    #[test]
    fn test_newest_first() {
        let mut history = History::new();
        history.push(entry("one"));
        history.push(entry("two"));

        let texts: Vec<&str> = history.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["two", "one"]);
        assert_eq!(history.latest().map(|e| e.text.as_str()), Some("two"));
    }

    #[test]
    fn test_bounded_to_ten() {
        let mut history = History::new();
        let mut first_id = None;
        for i in 0..12 {
            let e = entry(&i.to_string());
            if i == 0 {
                first_id = Some(e.id.clone());
            }
            history.push(e);
        }

        assert_eq!(history.len(), HISTORY_CAPACITY);
        assert_eq!(history.latest().map(|e| e.text.as_str()), Some("11"));
        assert_eq!(history.iter().last().map(|e| e.text.as_str()), Some("2"));
        assert!(history.get(&first_id.unwrap()).is_none());
    }

    #[test]
    fn test_lookup_by_id() {
        let mut history = History::new();
        let e = entry("hello");
        let id = e.id.clone();
        history.push(e);

        assert_eq!(history.get(&id).map(|e| e.text.as_str()), Some("hello"));
        assert!(history.get(&EntryId::from("missing")).is_none());
    }
}

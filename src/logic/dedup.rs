//! Deduplicator - seen-key set over (url, mime, body prefix hash)
//!
//! The key only hashes the first `DEDUP_PREFIX_CHARS` characters, so bodies
//! that differ past that prefix collapse into one sample. DJB2 is not
//! collision resistant; url and mime in the key keep unrelated resources apart.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::DEDUP_PREFIX_CHARS;

/// `"{url}|{mime}|{djb2(prefix)}"`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DedupKey(String);

impl DedupKey {
    pub fn derive(source_url: &str, mime_type: &str, body: &str) -> Self {
        let prefix_hash = cheap_hash(body.chars().take(DEDUP_PREFIX_CHARS));
        DedupKey(format!("{}|{}|{}", source_url, mime_type, prefix_hash))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DedupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// DJB2 over UTF-16 code units: `h = h * 33 + unit`, wrapped to u32
pub fn cheap_hash<I>(chars: I) -> u32
where
    I: IntoIterator<Item = char>,
{
    let mut h: u32 = 5381;
    let mut buf = [0u16; 2];
    for c in chars {
        for &unit in c.encode_utf16(&mut buf).iter() {
            h = h.wrapping_mul(33).wrapping_add(unit as u32);
        }
    }
    h
}

/// Set of keys seen since the last reset
#[derive(Debug, Default)]
pub struct Deduplicator {
    seen: HashSet<DedupKey>,
}

impl Deduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seen(&self, key: &DedupKey) -> bool {
        self.seen.contains(key)
    }

    pub fn remember(&mut self, key: DedupKey) {
        self.seen.insert(key);
    }

    /// Membership test and insert as one step. Returns true for a duplicate.
    pub fn check_and_remember(&mut self, key: DedupKey) -> bool {
        !self.seen.insert(key)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    pub fn clear(&mut self) {
        self.seen.clear();
    }
}

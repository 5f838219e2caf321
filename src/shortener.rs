//! Short ids: the shortest right-aligned suffix that is unique within a
//! working set of identifiers.
//!
//! All suffixes in a working set share one length `k`, the smallest length at
//! which every suffix is distinct. Short ids are lowercase and are matched
//! case-insensitively.
//!
//! A short id only means something relative to the working set it was
//! computed from. Adding an identifier that shares a suffix changes `k`, so
//! short ids are valid for a single render of a working set and must not be
//! persisted or reused across mutating operations.

use std::collections::{HashMap, HashSet};

use crate::error::{Error, Result};
use crate::fulid::FULID_LEN;

/// Bidirectional short id index over one working set.
#[derive(Debug, Clone, Default)]
pub struct ShortIdIndex {
    entries: Vec<(String, String)>,
    by_id: HashMap<String, usize>,
    by_short: HashMap<String, usize>,
    suffix_len: usize,
}

impl ShortIdIndex {
    /// Compute short ids for `ids`.
    ///
    /// Ids are expected to be unique. Ids that repeat (ignoring case) are
    /// collapsed onto their first occurrence.
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut originals = Vec::new();
        let mut reversed = Vec::new();
        for id in ids {
            let id = id.as_ref();
            let folded = id.to_lowercase();
            if !seen.insert(folded.clone()) {
                continue;
            }
            originals.push(id.to_string());
            reversed.push(folded.chars().rev().collect::<Vec<char>>());
        }

        let suffix_len = unique_prefix_len(&reversed);
        let mut index = Self {
            entries: Vec::with_capacity(originals.len()),
            by_id: HashMap::with_capacity(originals.len()),
            by_short: HashMap::with_capacity(originals.len()),
            suffix_len,
        };

        for (slot, (original, rev)) in originals.into_iter().zip(reversed).enumerate() {
            let short: String = rev.iter().take(suffix_len).rev().collect();
            index.by_id.insert(original.to_lowercase(), slot);
            index.by_short.insert(short.clone(), slot);
            index.entries.push((original, short));
        }

        tracing::trace!(ids = index.entries.len(), suffix_len, "computed short ids");
        index
    }

    /// Length shared by every short id in the index.
    pub fn suffix_len(&self) -> usize {
        self.suffix_len
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Full identifier for a short id.
    pub fn resolve(&self, short: &str) -> Result<&str> {
        let key = short.trim().to_lowercase();
        self.by_short
            .get(&key)
            .map(|slot| self.entries[*slot].0.as_str())
            .ok_or_else(|| Error::NotFound(short.trim().to_string()))
    }

    /// Short id of a full identifier.
    pub fn contract(&self, id: &str) -> Result<&str> {
        let key = id.trim().to_lowercase();
        self.by_id
            .get(&key)
            .map(|slot| self.entries[*slot].1.as_str())
            .ok_or_else(|| Error::NotFound(id.trim().to_string()))
    }

    /// `(id, short id)` pairs in working set order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(id, short)| (id.as_str(), short.as_str()))
    }

    pub fn into_map(self) -> HashMap<String, String> {
        self.entries.into_iter().collect()
    }
}

/// Smallest `k` such that the first `k` characters of every entry differ.
///
/// Entries must be distinct. Entries shorter than `k` take part whole.
fn unique_prefix_len(reversed: &[Vec<char>]) -> usize {
    let longest = reversed.iter().map(Vec::len).max().unwrap_or(0);
    for k in 1..=longest {
        let mut prefixes = HashSet::with_capacity(reversed.len());
        let distinct = reversed
            .iter()
            .all(|rev| prefixes.insert(&rev[..k.min(rev.len())]));
        if distinct {
            return k;
        }
    }
    longest
}

/// Map every id to its short id within `ids`.
pub fn shorten<I, S>(ids: I) -> HashMap<String, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    ShortIdIndex::new(ids).into_map()
}

/// Full identifier for `short` within `ids`.
pub fn resolve<I, S>(short: &str, ids: I) -> Result<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    ShortIdIndex::new(ids).resolve(short).map(str::to_string)
}

/// Short id for `id` within `ids`.
pub fn contract<I, S>(id: &str, ids: I) -> Result<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    ShortIdIndex::new(ids).contract(id).map(str::to_string)
}

/// Accept either a full identifier or a short id typed by a user.
///
/// Inputs at least as long as a full identifier skip resolution and come back
/// uppercased; shorter inputs are resolved against `ids`.
pub fn expand<I, S>(input: &str, ids: I) -> Result<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidArgument("id cannot be empty".to_string()));
    }
    if trimmed.chars().count() >= FULID_LEN {
        return Ok(trimmed.to_uppercase());
    }
    resolve(trimmed, ids)
}

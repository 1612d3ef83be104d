//! Insertion-ordered frequency counter.
//!
//! A [`Tally`] maps keys to play counts and remembers the order in which
//! each key was first seen. Merging two tallies is associative: shared
//! keys have their counts summed, and keys only present on the right-hand
//! side are appended in their original first-seen order.

use std::collections::HashMap;
use std::hash::Hash;

/// Play counts keyed by `K`, iterated in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tally<K: Eq + Hash> {
    index: HashMap<K, usize>,
    entries: Vec<(K, u64)>,
}

impl<K: Eq + Hash> Default for Tally<K> {
    fn default() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }
}

impl<K: Eq + Hash + Clone> Tally<K> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `count` plays to `key`, registering it if unseen.
    pub fn add(&mut self, key: K, count: u64) {
        match self.index.get(&key) {
            Some(&slot) => self.entries[slot].1 += count,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, count));
            }
        }
    }

    pub fn increment(&mut self, key: K) {
        self.add(key, 1);
    }

    /// Folds `other` into `self`.
    pub fn merge(&mut self, other: &Self) {
        for (key, count) in &other.entries {
            self.add(key.clone(), *count);
        }
    }

    #[must_use]
    pub fn get(&self, key: &K) -> u64 {
        self.index.get(key).map_or(0, |&slot| self.entries[slot].1)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    /// Entries in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, u64)> + '_ {
        self.entries.iter().map(|(key, count)| (key, *count))
    }

    /// Entries sorted by count descending. Equal counts keep first-seen order.
    #[must_use]
    pub fn ranked(&self) -> Vec<(K, u64)> {
        let mut ranked = self.entries.clone();
        // stable sort keeps insertion order among ties
        ranked.sort_by(|(_, a), (_, b)| b.cmp(a));
        ranked
    }
}

impl<K: Eq + Hash + Clone + Ord> Tally<K> {
    /// The `n` most played keys. Equal counts are broken by key order so
    /// the cutoff never depends on insertion order.
    #[must_use]
    pub fn top_keys(&self, n: usize) -> Vec<&K> {
        let mut keys: Vec<(&K, u64)> = self.iter().collect();
        keys.sort_by(|(ka, a), (kb, b)| b.cmp(a).then_with(|| ka.cmp(kb)));
        keys.into_iter().take(n).map(|(key, _)| key).collect()
    }
}

impl<K: Eq + Hash + Clone> FromIterator<K> for Tally<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut tally = Self::new();
        for key in iter {
            tally.increment(key);
        }
        tally
    }
}

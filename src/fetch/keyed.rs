use std::fmt;
use std::sync::Arc;

/// Key equality predicate.
pub type AreEqual<K> = Arc<dyn Fn(&K, &K) -> bool + Send + Sync + 'static>;

/// Associative list keyed by a caller-supplied equality predicate.
///
/// Lookups scan linearly, so keys need neither `Hash` nor `Ord` and two
/// structurally equal keys built independently resolve to the same entry.
/// Caches in front of data providers hold a handful of entries per dataset,
/// which keeps the scan cheap.
pub struct KeyedEntries<K, V> {
    entries: Vec<(K, V)>,
    are_equal: AreEqual<K>,
}

impl<K, V> KeyedEntries<K, V> {
    #[must_use]
    pub fn new(are_equal: AreEqual<K>) -> Self {
        Self {
            entries: Vec::new(),
            are_equal,
        }
    }

    fn position(&self, key: &K) -> Option<usize> {
        self.entries
            .iter()
            .position(|(existing, _)| (self.are_equal)(existing, key))
    }

    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.position(key).is_some()
    }

    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.position(key).map(|index| &self.entries[index].1)
    }

    /// Stores `value` under `key`, returning the previous value.
    ///
    /// An existing entry keeps its original key.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.position(&key) {
            Some(index) => Some(std::mem::replace(&mut self.entries[index].1, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.position(key)
            .map(|index| self.entries.swap_remove(index).1)
    }

    /// Keeps only entries for which `keep` returns `true`; returns how many were removed.
    pub fn retain<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&K, &V) -> bool,
    {
        let before = self.entries.len();
        self.entries.retain(|(key, value)| keep(key, value));
        before - self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter().map(|(key, value)| (key, value))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: fmt::Debug, V> fmt::Debug for KeyedEntries<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|(key, _)| key))
            .finish()
    }
}

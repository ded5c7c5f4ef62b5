use rustc_hash::FxHashMap;

use super::types::LightsIndicesRange;

/// Outcome of [`CombinationCache::intern`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interned {
    /// The set was already stored; no index was appended.
    Cached(LightsIndicesRange),
    /// The set was appended to the shared index array.
    Appended(LightsIndicesRange),
}

impl Interned {
    pub fn range(self) -> LightsIndicesRange {
        match self {
            Interned::Cached(range) | Interned::Appended(range) => range,
        }
    }
}

/// Deduplicated storage of ordered light index sets.
///
/// Sets live back to back in one append-only `u16` array, so previously
/// returned offsets stay valid until [`CombinationCache::clear`]. The key is the
/// exact sequence: the same lights in another order are a different set.
#[derive(Debug, Clone)]
pub struct CombinationCache {
    indices: Vec<u16>,
    ranges: FxHashMap<Vec<u16>, LightsIndicesRange>,
    capacity: usize,
}

impl CombinationCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            indices: Vec::with_capacity(capacity),
            ranges: FxHashMap::default(),
            capacity,
        }
    }

    /// Returns the range holding `set`, appending it on first sight.
    ///
    /// # Panics
    /// When appending would grow the index array past its capacity.
    pub fn intern(&mut self, set: &[u16]) -> Interned {
        if set.is_empty() {
            return Interned::Cached(LightsIndicesRange::EMPTY);
        }
        if let Some(range) = self.ranges.get(set) {
            return Interned::Cached(*range);
        }

        let offset = self.indices.len();
        assert!(
            offset + set.len() <= self.capacity,
            "light combination buffer overflow: {} + {} entries exceed capacity {}",
            offset,
            set.len(),
            self.capacity
        );

        self.indices.extend_from_slice(set);
        let range = LightsIndicesRange::new(offset as u32, set.len() as u32);
        self.ranges.insert(set.to_vec(), range);
        Interned::Appended(range)
    }

    pub fn clear(&mut self) {
        self.indices.clear();
        self.ranges.clear();
    }

    /// The shared index array, laid out for the GPU.
    pub fn indices(&self) -> &[u16] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Number of distinct sets stored.
    pub fn combination_count(&self) -> usize {
        self.ranges.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

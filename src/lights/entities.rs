use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Identity of a light entity. The generation tells a recycled index apart
/// from the entity that used it before.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct LightId {
    index: u16,
    generation: u32,
}

impl LightId {
    pub fn index(&self) -> u16 {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

/// Dense slot table of live light entities.
///
/// Freed indices are reused smallest-first so the index space stays compact;
/// only the generation counter keeps growing.
#[derive(Debug, Clone)]
pub struct LightEntities {
    generations: Vec<u32>,
    live: Vec<bool>,
    free: BTreeSet<u16>,
    capacity: usize,
}

impl LightEntities {
    pub fn new(capacity: usize) -> Self {
        Self {
            generations: Vec::new(),
            live: Vec::new(),
            free: BTreeSet::new(),
            capacity,
        }
    }

    /// Allocates an entity id.
    ///
    /// # Panics
    /// When all `capacity` indices are live.
    pub fn add(&mut self) -> LightId {
        if let Some(index) = self.free.pop_first() {
            let slot = usize::from(index);
            assert!(!self.live[slot], "light index {index} is already live");
            self.live[slot] = true;
            return LightId {
                index,
                generation: self.generations[slot],
            };
        }

        let slot = self.live.len();
        assert!(
            slot < self.capacity,
            "light entity capacity ({}) exhausted",
            self.capacity
        );
        self.live.push(true);
        self.generations.push(0);
        LightId {
            index: slot as u16,
            generation: 0,
        }
    }

    /// Releases an entity id. The caller guarantees no frame in flight still
    /// reads it.
    ///
    /// # Panics
    /// When `id` is not live (never added, already removed, or stale).
    pub fn remove(&mut self, id: LightId) {
        assert!(self.is_live(id), "removing light {id:?} which is not live");
        let slot = usize::from(id.index);
        self.live[slot] = false;
        self.generations[slot] = self.generations[slot].wrapping_add(1);
        self.free.insert(id.index);
    }

    pub fn is_live(&self, id: LightId) -> bool {
        let slot = usize::from(id.index);
        self.live.get(slot).copied().unwrap_or(false) && self.generations[slot] == id.generation
    }

    pub fn is_index_live(&self, index: u16) -> bool {
        self.live.get(usize::from(index)).copied().unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.live.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_grow_monotonically() {
        let mut entities = LightEntities::new(8);
        let ids: Vec<u16> = (0..4).map(|_| entities.add().index()).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
        assert_eq!(entities.len(), 4);
    }

    #[test]
    fn smallest_free_index_is_reused_with_new_generation() {
        let mut entities = LightEntities::new(8);
        let a = entities.add();
        let b = entities.add();
        let c = entities.add();
        entities.remove(c);
        entities.remove(a);

        let reused = entities.add();
        assert_eq!(reused.index(), a.index());
        assert_eq!(reused.generation(), a.generation() + 1);
        assert!(!entities.is_live(a));
        assert!(entities.is_live(reused));
        assert!(entities.is_live(b));
        assert_eq!(entities.add().index(), c.index());
    }

    #[test]
    #[should_panic(expected = "not live")]
    fn double_remove_panics() {
        let mut entities = LightEntities::new(4);
        let id = entities.add();
        entities.remove(id);
        entities.remove(id);
    }

    #[test]
    #[should_panic(expected = "not live")]
    fn stale_id_remove_panics() {
        let mut entities = LightEntities::new(4);
        let stale = entities.add();
        entities.remove(stale);
        let _fresh = entities.add();
        entities.remove(stale);
    }

    #[test]
    #[should_panic(expected = "capacity")]
    fn capacity_is_enforced() {
        let mut entities = LightEntities::new(2);
        entities.add();
        entities.add();
        entities.add();
    }

    #[test]
    fn removed_index_is_not_live() {
        let mut entities = LightEntities::new(4);
        let a = entities.add();
        let b = entities.add();
        entities.remove(a);
        assert!(!entities.is_index_live(a.index()));
        assert!(entities.is_index_live(b.index()));
        assert_eq!(entities.len(), 1);
    }
}

//! Random photo selection without replacement

use crate::scene::ObjectId;
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::HashSet;
use tracing::debug;

/// Photos already brought into focus since the last reset.
#[derive(Debug, Clone, Default)]
pub struct ViewedSet {
    viewed: HashSet<ObjectId>,
}

impl ViewedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Choose a photo from `pool` that has not been viewed yet and mark it viewed.
    ///
    /// Once every photo has been shown the history is cleared and the pick is
    /// made from the whole pool; the chosen photo is recorded straight away so
    /// its siblings come first in the next round. Returns `None` for an empty pool.
    pub fn pick<R: Rng + ?Sized>(&mut self, pool: &[ObjectId], rng: &mut R) -> Option<ObjectId> {
        if pool.is_empty() {
            return None;
        }

        let mut candidates: Vec<ObjectId> = pool
            .iter()
            .copied()
            .filter(|id| !self.viewed.contains(id))
            .collect();
        if candidates.is_empty() {
            debug!("All {} photos viewed, starting a new round", pool.len());
            self.viewed.clear();
            candidates = pool.to_vec();
        }

        let chosen = *candidates.choose(rng)?;
        self.viewed.insert(chosen);
        Some(chosen)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.viewed.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.viewed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.viewed.is_empty()
    }

    pub fn clear(&mut self) {
        self.viewed.clear();
    }
}

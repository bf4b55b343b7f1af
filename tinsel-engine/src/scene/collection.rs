//! A complete generation of scene objects

use crate::scene::object::{ObjectId, SceneObject};

/// All scene objects of one generation.
///
/// An `ObjectSet` is never edited in place; a photo change builds a new set
/// and the owner swaps it in whole.
#[derive(Debug, Clone, Default)]
pub struct ObjectSet {
    generation: u32,
    objects: Vec<SceneObject>,
    photo_ids: Vec<ObjectId>,
}

impl ObjectSet {
    pub fn new(generation: u32, objects: Vec<SceneObject>) -> Self {
        let photo_ids = objects
            .iter()
            .filter(|o| o.is_photo())
            .map(|o| o.id)
            .collect();
        Self {
            generation,
            objects,
            photo_ids,
        }
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    /// Ids of every photo object, in layout order.
    pub fn photo_ids(&self) -> &[ObjectId] {
        &self.photo_ids
    }

    /// Look up an object of this generation.
    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        if id.generation != self.generation {
            return None;
        }
        self.objects
            .get(id.index as usize)
            .filter(|object| object.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SceneObject> {
        self.objects.iter()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

use rustc_hash::FxHashMap;

use super::TrackedEntity;

/// Every entity the player currently knows about, keyed by runtime ID.
///
/// Pure state store: entries are changed only by the owning player's packet
/// handlers and acknowledgement callbacks.
#[derive(Debug, Default)]
pub struct EntityRegistry {
    entities: FxHashMap<u64, TrackedEntity>,
}

impl EntityRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entity, returning the one it replaced.
    pub fn add(&mut self, entity: TrackedEntity) -> Option<TrackedEntity> {
        self.entities.insert(entity.runtime_id, entity)
    }

    /// Looks up an entity.
    #[must_use]
    pub fn find(&self, runtime_id: u64) -> Option<&TrackedEntity> {
        self.entities.get(&runtime_id)
    }

    /// Looks up an entity mutably.
    pub fn find_mut(&mut self, runtime_id: u64) -> Option<&mut TrackedEntity> {
        self.entities.get_mut(&runtime_id)
    }

    /// Removes an entity.
    pub fn remove(&mut self, runtime_id: u64) -> Option<TrackedEntity> {
        self.entities.remove(&runtime_id)
    }

    /// Forgets every entity, used when the player changes servers.
    pub fn clear(&mut self) {
        self.entities.clear();
    }

    /// Number of tracked entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether no entity is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Iterates over all tracked entities.
    pub fn iter(&self) -> impl Iterator<Item = &TrackedEntity> {
        self.entities.values()
    }

    /// Advances every entity by one tick.
    pub fn tick(&mut self) {
        for entity in self.entities.values_mut() {
            entity.tick();
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::DVec3;
    use vigil_utils::Aabb;

    use super::*;

    #[test]
    fn add_find_remove() {
        let mut registry = EntityRegistry::new();
        let entity = TrackedEntity::new(1, DVec3::ONE, Aabb::from_dimensions(0.6, 1.8), true);
        assert!(registry.add(entity).is_none());
        assert_eq!(registry.len(), 1);
        assert!(registry.find(1).is_some());
        assert!(registry.find(2).is_none());
        registry.find_mut(1).expect("present").velocity = DVec3::X;
        assert_eq!(registry.remove(1).expect("present").velocity, DVec3::X);
        assert!(registry.is_empty());
    }

    #[test]
    fn tick_ages_every_entity() {
        let mut registry = EntityRegistry::new();
        for id in 0..3 {
            registry.add(TrackedEntity::new(
                id,
                DVec3::ZERO,
                Aabb::from_dimensions(0.6, 1.8),
                false,
            ));
        }
        registry.tick();
        registry.tick();
        assert!(registry.iter().all(|entity| entity.ticks_since_teleport == 2));
        registry.clear();
        assert!(registry.is_empty());
    }
}

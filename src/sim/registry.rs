//! Live enemy collection
//!
//! Enemies are kept sorted by id so every pass over them happens in the same
//! order. Inactive enemies stay in place until `prune` runs at the end of a tick.

use glam::Vec2;

use super::state::{Archetype, Enemy, EnemyKind};

#[derive(Debug, Clone)]
pub struct EnemyRegistry {
    enemies: Vec<Enemy>,
    /// Next entity ID
    next_id: u32,
}

impl EnemyRegistry {
    pub fn new() -> Self {
        Self {
            enemies: Vec::new(),
            next_id: 1,
        }
    }

    /// Insert a new active enemy and return its id
    pub fn spawn(&mut self, pos: Vec2, vel: Vec2, kind: EnemyKind) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        // Ids only grow, so pushing keeps the vec sorted
        self.enemies.push(Enemy::new(id, pos, vel, kind));
        id
    }

    pub fn get(&self, id: u32) -> Option<&Enemy> {
        self.enemies
            .binary_search_by_key(&id, |e| e.id)
            .ok()
            .map(|i| &self.enemies[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Enemy> {
        self.enemies.iter_mut()
    }

    /// Active enemies of one archetype
    pub fn live_count(&self, archetype: Archetype) -> usize {
        self.enemies
            .iter()
            .filter(|e| e.active && e.archetype() == archetype)
            .count()
    }

    pub fn has_live(&self, archetype: Archetype) -> bool {
        self.enemies
            .iter()
            .any(|e| e.active && e.archetype() == archetype)
    }

    /// Drop inactive enemies, returning how many were removed
    pub fn prune(&mut self) -> usize {
        let before = self.enemies.len();
        self.enemies.retain(|e| e.active);
        before - self.enemies.len()
    }

    /// Remove everything. Ids keep counting up.
    pub fn clear(&mut self) {
        self.enemies.clear();
    }

    pub fn len(&self) -> usize {
        self.enemies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty()
    }
}

impl Default for EnemyRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_assigns_increasing_ids() {
        let mut registry = EnemyRegistry::new();
        let a = registry.spawn(Vec2::ZERO, Vec2::X, EnemyKind::Missile);
        let b = registry.spawn(Vec2::ZERO, Vec2::X, EnemyKind::OrbitalBullet);
        assert!(b > a);
        assert_eq!(registry.get(b).map(|e| e.archetype()), Some(Archetype::OrbitalBullet));
        assert!(registry.get(999).is_none());
    }

    #[test]
    fn test_prune_drops_only_inactive() {
        let mut registry = EnemyRegistry::new();
        let a = registry.spawn(Vec2::ZERO, Vec2::X, EnemyKind::Missile);
        let b = registry.spawn(Vec2::ZERO, Vec2::X, EnemyKind::Missile);
        for e in registry.iter_mut().filter(|e| e.id == a) {
            e.deactivate();
        }
        // Still present, but not live
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.live_count(Archetype::Missile), 1);

        assert_eq!(registry.prune(), 1);
        assert_eq!(registry.len(), 1);
        assert!(registry.get(a).is_none());
        assert!(registry.get(b).is_some());
    }

    #[test]
    fn test_has_live_by_archetype() {
        let mut registry = EnemyRegistry::new();
        assert!(!registry.has_live(Archetype::FastMissile));
        registry.spawn(
            Vec2::ZERO,
            Vec2::X,
            EnemyKind::FastMissile { telegraphed_at: 1.0 },
        );
        assert!(registry.has_live(Archetype::FastMissile));
        assert!(!registry.has_live(Archetype::Orbital));
        registry.clear();
        assert!(registry.is_empty());
    }
}

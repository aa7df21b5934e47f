//! Read-only frame data for the rendering layer
//!
//! Everything a renderer needs is copied out of `GameState` so it never has
//! to reach into simulation internals.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Hitbox;
use super::motion::heading;
use super::state::{Archetype, GamePhase, GameState};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntityView {
    pub id: u32,
    pub archetype: Archetype,
    pub pos: Vec2,
    /// Facing angle (radians)
    pub heading: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TelegraphView {
    pub pos: Vec2,
    /// Seconds until the fast missile appears
    pub remaining: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub center: Vec2,
    pub shield_angle: f32,
    pub shield_arc_width: f32,
    pub shield_radius: f32,
    pub hitbox: Hitbox,
    pub entities: Vec<EntityView>,
    /// Consumed flags, left to right
    pub lives: Vec<bool>,
    pub score: u64,
    pub high_score: u64,
    pub wave: u32,
    pub elapsed: f32,
    pub paused: bool,
    pub game_over: bool,
    pub telegraph: Option<TelegraphView>,
}

impl GameState {
    pub fn snapshot(&self) -> FrameSnapshot {
        let now = self.clock.elapsed_secs();
        FrameSnapshot {
            center: self.tuning.center(),
            shield_angle: self.shield.start_angle,
            shield_arc_width: self.tuning.shield_arc_width,
            shield_radius: self.tuning.shield_radius,
            hitbox: self.hitbox,
            entities: self
                .registry
                .iter()
                .filter(|e| e.active)
                .map(|e| EntityView {
                    id: e.id,
                    archetype: e.archetype(),
                    pos: e.pos,
                    heading: heading(e.vel),
                })
                .collect(),
            lives: self.lives.slots().to_vec(),
            score: self.score,
            high_score: self.high_score,
            wave: self.scheduler.wave_count(),
            elapsed: now,
            paused: self.phase == GamePhase::Paused,
            game_over: self.phase == GamePhase::GameOver,
            telegraph: self.scheduler.telegraph().map(|t| TelegraphView {
                pos: t.pos,
                remaining: t.remaining(now, &self.tuning),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::MemoryStore;
    use crate::sim::clock::ManualSource;
    use crate::sim::state::EnemyKind;
    use crate::tuning::Tuning;

    #[test]
    fn test_snapshot_lists_active_entities() {
        let mut state = GameState::new(
            1,
            Tuning::default(),
            Box::new(ManualSource::new()),
            Box::new(MemoryStore::with_score(40)),
        );
        let a = state
            .registry
            .spawn(Vec2::new(0.0, 300.0), Vec2::new(100.0, 0.0), EnemyKind::Missile);
        let b = state
            .registry
            .spawn(Vec2::new(800.0, 300.0), Vec2::new(-100.0, 0.0), EnemyKind::OrbitalBullet);
        for e in state.registry.iter_mut().filter(|e| e.id == b) {
            e.deactivate();
        }

        let snap = state.snapshot();
        assert_eq!(snap.entities.len(), 1);
        assert_eq!(snap.entities[0].id, a);
        assert_eq!(snap.entities[0].archetype, Archetype::Missile);
        assert!(snap.entities[0].heading.abs() < 1e-6);
        assert_eq!(snap.lives, vec![false; 3]);
        assert_eq!(snap.high_score, 40);
        assert!(!snap.paused && !snap.game_over);
        assert!(snap.telegraph.is_none());
    }

    #[test]
    fn test_snapshot_serializes() {
        let state = GameState::new(
            1,
            Tuning::default(),
            Box::new(ManualSource::new()),
            Box::new(MemoryStore::new()),
        );
        let json = serde_json::to_string(&state.snapshot()).unwrap();
        let back: FrameSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.center, state.tuning.center());
    }
}

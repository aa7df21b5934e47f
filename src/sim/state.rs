//! Game state and core simulation types

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::arc::ShieldArc;
use super::clock::{GameClock, TickSource};
use super::collision::Hitbox;
use super::registry::EnemyRegistry;
use super::spawner::WaveScheduler;
use crate::highscores::RecordStore;
use crate::tuning::Tuning;
use crate::wrap_angle;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Clock frozen, nothing moves
    Paused,
    /// Every life consumed; only a restart leaves this phase
    GameOver,
}

/// Archetype tag without payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Archetype {
    Missile,
    FastMissile,
    Orbital,
    OrbitalBullet,
}

/// Polar state of a spiraling enemy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitalState {
    pub radius: f32,
    pub angle: f32,
    /// Radians per second
    pub angular_speed: f32,
    /// Units per second, negative spirals inward
    pub radial_rate: f32,
    pub spawned_at: f32,
    pub last_fired: f32,
}

/// Archetype plus its own payload
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EnemyKind {
    Missile,
    FastMissile {
        /// When the warning that preceded this missile began
        telegraphed_at: f32,
    },
    Orbital(OrbitalState),
    OrbitalBullet,
}

impl EnemyKind {
    pub fn archetype(&self) -> Archetype {
        match self {
            EnemyKind::Missile => Archetype::Missile,
            EnemyKind::FastMissile { .. } => Archetype::FastMissile,
            EnemyKind::Orbital(_) => Archetype::Orbital,
            EnemyKind::OrbitalBullet => Archetype::OrbitalBullet,
        }
    }
}

/// Any inbound entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub active: bool,
    pub kind: EnemyKind,
}

impl Enemy {
    pub fn new(id: u32, pos: Vec2, vel: Vec2, kind: EnemyKind) -> Self {
        Self {
            id,
            pos,
            vel,
            active: true,
            kind,
        }
    }

    pub fn archetype(&self) -> Archetype {
        self.kind.archetype()
    }

    /// Mark for pruning. Returns true only for the call that did it.
    pub fn deactivate(&mut self) -> bool {
        std::mem::replace(&mut self.active, false)
    }
}

/// The player's rotating shield
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shield {
    /// Start of the arc (radians, wrapped to [0, 2π))
    pub start_angle: f32,
}

impl Shield {
    /// Arc starts centered on +y
    pub const INITIAL_ANGLE: f32 = std::f32::consts::FRAC_PI_4;

    pub fn new() -> Self {
        Self {
            start_angle: Self::INITIAL_ANGLE,
        }
    }

    /// Apply held directions. Left is counter-clockwise; both held cancel.
    pub fn rotate(&mut self, left: bool, right: bool, rate: f32, dt: f32) {
        let direction = left as i32 - right as i32;
        if direction != 0 {
            self.start_angle = wrap_angle(self.start_angle + direction as f32 * rate * dt);
        }
    }

    pub fn as_arc(&self, tuning: &Tuning) -> ShieldArc {
        ShieldArc::new(
            tuning.center(),
            tuning.shield_radius,
            self.start_angle,
            tuning.shield_arc_width,
        )
    }
}

impl Default for Shield {
    fn default() -> Self {
        Self::new()
    }
}

/// Life slots, consumed left to right
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifeTrack {
    slots: Vec<bool>,
}

impl LifeTrack {
    pub fn new(count: usize) -> Self {
        Self {
            slots: vec![false; count],
        }
    }

    /// Consume the first unconsumed slot. Returns true when none remain.
    pub fn consume(&mut self) -> bool {
        if let Some(slot) = self.slots.iter_mut().find(|consumed| !**consumed) {
            *slot = true;
        }
        self.is_exhausted()
    }

    pub fn is_exhausted(&self) -> bool {
        self.slots.iter().all(|&consumed| consumed)
    }

    pub fn consumed(&self) -> usize {
        self.slots.iter().filter(|&&consumed| consumed).count()
    }

    pub fn remaining(&self) -> usize {
        self.slots.len() - self.consumed()
    }

    pub fn total(&self) -> usize {
        self.slots.len()
    }

    pub fn slots(&self) -> &[bool] {
        &self.slots
    }
}

/// Something the presentation layer may want to react to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A plain missile, fast missile or orbital entered the field
    Spawned { id: u32, archetype: Archetype },
    /// Warning shown where a fast missile will appear
    TelegraphStarted { pos: Vec2 },
    /// Wave count increased
    WaveCleared { wave: u32, missile_count: u32 },
    /// Shield stopped an entity
    Intercepted { id: u32, archetype: Archetype, points: u64 },
    /// Something reached the hitbox
    LifeLost { id: u32, remaining: usize },
    NewHighScore { score: u64 },
    GameOver { score: u64 },
    Paused,
    Resumed,
    Restarted,
}

/// Complete session state
pub struct GameState {
    pub tuning: Tuning,
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub clock: GameClock,
    pub scheduler: WaveScheduler,
    pub registry: EnemyRegistry,
    pub shield: Shield,
    pub hitbox: Hitbox,
    pub lives: LifeTrack,
    pub score: u64,
    pub high_score: u64,
    pub phase: GamePhase,
    pub(crate) events: Vec<GameEvent>,
    pub(crate) store: Box<dyn RecordStore>,
}

impl GameState {
    /// Start a session. Reads the high score once from `store`.
    pub fn new(
        seed: u64,
        tuning: Tuning,
        source: Box<dyn TickSource>,
        mut store: Box<dyn RecordStore>,
    ) -> Self {
        let tuning = tuning.validated();
        let mut rng = Pcg32::seed_from_u64(seed);
        let scheduler = WaveScheduler::new(&tuning, &mut rng);
        let high_score = store.load_high_score();
        log::info!("Session started (seed {}, high score {})", seed, high_score);

        Self {
            hitbox: Hitbox::centered(tuning.center(), tuning.hitbox_half_size),
            lives: LifeTrack::new(tuning.lives),
            seed,
            rng,
            clock: GameClock::new(source),
            scheduler,
            registry: EnemyRegistry::new(),
            shield: Shield::new(),
            score: 0,
            high_score,
            phase: GamePhase::Playing,
            events: Vec::new(),
            store,
            tuning,
        }
    }

    /// Back to a fresh session. The high score survives.
    pub fn reset(&mut self) {
        self.scheduler = WaveScheduler::new(&self.tuning, &mut self.rng);
        self.clock.reset();
        self.registry.clear();
        self.lives = LifeTrack::new(self.tuning.lives);
        self.shield = Shield::new();
        self.score = 0;
        self.phase = GamePhase::Playing;
        self.events.clear();
        self.events.push(GameEvent::Restarted);
        log::info!("Session reset (high score {})", self.high_score);
    }

    pub fn is_paused(&self) -> bool {
        self.phase == GamePhase::Paused
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Current shield arc in world space
    pub fn shield_arc(&self) -> ShieldArc {
        self.shield.as_arc(&self.tuning)
    }

    /// Drain events produced since the last call
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

impl std::fmt::Debug for GameState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameState")
            .field("seed", &self.seed)
            .field("phase", &self.phase)
            .field("score", &self.score)
            .field("high_score", &self.high_score)
            .field("wave", &self.scheduler.wave_count())
            .field("lives", &self.lives.remaining())
            .field("enemies", &self.registry.len())
            .field("clock", &self.clock)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::MemoryStore;
    use crate::sim::clock::ManualSource;
    use std::f32::consts::TAU;

    #[test]
    fn test_deactivate_only_once() {
        let mut enemy = Enemy::new(1, Vec2::ZERO, Vec2::ZERO, EnemyKind::Missile);
        assert!(enemy.deactivate());
        assert!(!enemy.deactivate());
        assert!(!enemy.active);
    }

    #[test]
    fn test_life_track_left_to_right() {
        let mut lives = LifeTrack::new(3);
        assert!(!lives.consume());
        assert_eq!(lives.slots(), &[true, false, false]);
        assert!(!lives.consume());
        assert!(lives.consume());
        assert!(lives.is_exhausted());
        // Consuming past the end stays exhausted
        assert!(lives.consume());
        assert_eq!(lives.consumed(), 3);
    }

    #[test]
    fn test_shield_rotation_wraps() {
        let mut shield = Shield { start_angle: 0.1 };
        shield.rotate(false, true, 1.0, 0.2);
        assert!((shield.start_angle - (TAU - 0.1)).abs() < 1e-4);
        shield.rotate(true, false, 1.0, 0.2);
        assert!((shield.start_angle - 0.1).abs() < 1e-4);
    }

    #[test]
    fn test_shield_both_directions_cancel() {
        let mut shield = Shield::new();
        shield.rotate(true, true, 4.0, 1.0);
        assert_eq!(shield.start_angle, Shield::INITIAL_ANGLE);
    }

    #[test]
    fn test_new_state_reads_high_score() {
        let state = GameState::new(
            7,
            Tuning::default(),
            Box::new(ManualSource::new()),
            Box::new(MemoryStore::with_score(250)),
        );
        assert_eq!(state.high_score, 250);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.lives.remaining(), Tuning::default().lives);
    }
}

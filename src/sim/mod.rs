//! Simulation module
//!
//! All gameplay logic lives here. No rendering, audio or platform code:
//! - Time comes from an injected, pause-aware clock
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)

pub mod arc;
pub mod clock;
pub mod collision;
pub mod motion;
pub mod registry;
pub mod snapshot;
pub mod spawner;
pub mod state;
pub mod tick;

pub use arc::ShieldArc;
pub use clock::{GameClock, ManualSource, MonotonicSource, TickSource};
pub use collision::{Contact, Hitbox, classify, shield_hit, shield_hit_exact, shield_hit_sampled};
pub use motion::MotionOutcome;
pub use registry::EnemyRegistry;
pub use snapshot::{EntityView, FrameSnapshot, TelegraphView};
pub use spawner::{Telegraph, WaveScheduler};
pub use state::{
    Archetype, Enemy, EnemyKind, GameEvent, GamePhase, GameState, LifeTrack, OrbitalState, Shield,
};
pub use tick::{TickInput, autopilot, tick};

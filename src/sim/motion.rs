//! Per-archetype motion laws
//!
//! Linear projectiles keep the velocity they spawned with. Orbitals integrate
//! polar state and derive their cartesian velocity analytically.

use glam::Vec2;

use super::state::{Enemy, EnemyKind, OrbitalState};
use crate::polar_to_cartesian;
use crate::tuning::Tuning;

/// Side effects of advancing one enemy
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MotionOutcome {
    /// Bullet fired this tick: (spawn position, velocity)
    pub fired: Option<(Vec2, Vec2)>,
    /// Orbital reached its minimum radius or lifetime; deactivates after collisions
    pub expiring: bool,
}

/// Straight-line step
#[inline]
pub fn advance_linear(pos: Vec2, vel: Vec2, dt: f32) -> Vec2 {
    pos + vel * dt
}

/// Velocity from `from` toward `to` at `speed`
#[inline]
pub fn aim_at(from: Vec2, to: Vec2, speed: f32) -> Vec2 {
    (to - from).normalize_or_zero() * speed
}

/// World position of an orbital
#[inline]
pub fn orbital_position(orbit: &OrbitalState, center: Vec2) -> Vec2 {
    center + polar_to_cartesian(orbit.radius, orbit.angle)
}

/// Analytic derivative of the spiral
pub fn orbital_velocity(orbit: &OrbitalState) -> Vec2 {
    let (sin, cos) = orbit.angle.sin_cos();
    Vec2::new(
        -orbit.radius * sin * orbit.angular_speed - cos * orbit.radial_rate,
        orbit.radius * cos * orbit.angular_speed - sin * orbit.radial_rate,
    )
}

/// Advance polar state by `dt`, returning the new (position, velocity)
pub fn advance_orbital(orbit: &mut OrbitalState, center: Vec2, dt: f32) -> (Vec2, Vec2) {
    orbit.angle += orbit.angular_speed * dt;
    orbit.radius = (orbit.radius + orbit.radial_rate * dt).max(0.0);
    (orbital_position(orbit, center), orbital_velocity(orbit))
}

/// Minimum radius reached or lifetime used up
pub fn orbital_expired(orbit: &OrbitalState, now: f32, tuning: &Tuning) -> bool {
    orbit.radius <= tuning.orbital_min_radius || now - orbit.spawned_at >= tuning.orbital_lifetime
}

/// Fire at the center if the interval has elapsed, returning the bullet velocity
pub fn orbital_fire(
    orbit: &mut OrbitalState,
    pos: Vec2,
    center: Vec2,
    now: f32,
    tuning: &Tuning,
) -> Option<Vec2> {
    if now - orbit.last_fired < tuning.orbital_fire_interval {
        return None;
    }
    orbit.last_fired = now;
    Some(aim_at(pos, center, tuning.bullet_speed))
}

/// Advance any enemy by one tick
pub fn advance_enemy(enemy: &mut Enemy, center: Vec2, now: f32, dt: f32, tuning: &Tuning) -> MotionOutcome {
    if !enemy.active {
        return MotionOutcome::default();
    }

    match &mut enemy.kind {
        EnemyKind::Missile | EnemyKind::FastMissile { .. } | EnemyKind::OrbitalBullet => {
            enemy.pos = advance_linear(enemy.pos, enemy.vel, dt);
            MotionOutcome::default()
        }
        EnemyKind::Orbital(orbit) => {
            let (pos, vel) = advance_orbital(orbit, center, dt);
            enemy.pos = pos;
            enemy.vel = vel;

            if orbital_expired(orbit, now, tuning) {
                return MotionOutcome {
                    fired: None,
                    expiring: true,
                };
            }
            MotionOutcome {
                fired: orbital_fire(orbit, pos, center, now, tuning).map(|v| (pos, v)),
                expiring: false,
            }
        }
    }
}

/// Facing angle for rendering
#[inline]
pub fn heading(vel: Vec2) -> f32 {
    vel.y.atan2(vel.x)
}

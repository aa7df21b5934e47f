//! Wave scheduling
//!
//! Plain missiles arrive in waves: the first spawn of a wave is immediate,
//! the rest are paced by `min_spawn_interval`. Once the wave's quota is out
//! the wave closes, the count may escalate, and the next wave is delayed.
//!
//! Fast missiles and orbitals are gated on the wave count. A fast missile is
//! preceded by a telegraph at the spot it will appear. All timing compares
//! against the pause-aware elapsed time handed in by the caller.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::motion::{aim_at, orbital_position, orbital_velocity};
use super::registry::EnemyRegistry;
use super::state::{Archetype, EnemyKind, GameEvent, OrbitalState};
use crate::tuning::Tuning;

/// Pending fast missile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Telegraph {
    pub pos: Vec2,
    pub started_at: f32,
}

impl Telegraph {
    /// Seconds until the missile appears (0 once due)
    pub fn remaining(&self, now: f32, tuning: &Tuning) -> f32 {
        (self.started_at + tuning.telegraph_duration - now).max(0.0)
    }
}

/// Screen edge a spawn point sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

impl Side {
    fn random(rng: &mut Pcg32) -> Self {
        match rng.random_range(0..4u32) {
            0 => Side::Top,
            1 => Side::Bottom,
            2 => Side::Left,
            _ => Side::Right,
        }
    }
}

/// Uniform in [lo, hi], tolerating an empty range
fn uniform(rng: &mut Pcg32, lo: f32, hi: f32) -> f32 {
    lo + rng.random::<f32>() * (hi - lo).max(0.0)
}

/// Random point on a screen edge.
///
/// `along_margin` keeps the point away from the corners; `depth` pushes it
/// outside the screen when positive and inside when negative.
fn edge_point(rng: &mut Pcg32, tuning: &Tuning, along_margin: f32, depth: f32) -> Vec2 {
    let (w, h) = (tuning.screen_width, tuning.screen_height);
    match Side::random(rng) {
        Side::Top => Vec2::new(uniform(rng, along_margin, w - along_margin), -depth),
        Side::Bottom => Vec2::new(uniform(rng, along_margin, w - along_margin), h + depth),
        Side::Left => Vec2::new(-depth, uniform(rng, along_margin, h - along_margin)),
        Side::Right => Vec2::new(w + depth, uniform(rng, along_margin, h - along_margin)),
    }
}

/// Where inside a wave the scheduler is
#[derive(Debug, Clone)]
pub struct WaveScheduler {
    wave_count: u32,
    missile_count: u32,
    waves_until_increase: u32,
    spawned_in_wave: u32,
    next_spawn_time: f32,
    last_spawn_time: f32,
    telegraph: Option<Telegraph>,
    /// Wave on which the fast-missile gate last fired
    fast_wave: Option<u32>,
    /// Wave on which the orbital gate last fired
    orbital_wave: Option<u32>,
}

impl WaveScheduler {
    pub fn new(tuning: &Tuning, rng: &mut Pcg32) -> Self {
        let lo = tuning.waves_until_increase_min.max(1);
        let hi = tuning.waves_until_increase_max.max(lo);
        Self {
            wave_count: 0,
            missile_count: tuning.initial_missile_count,
            waves_until_increase: rng.random_range(lo..=hi),
            spawned_in_wave: 0,
            next_spawn_time: tuning.first_wave_delay,
            last_spawn_time: f32::NEG_INFINITY,
            telegraph: None,
            fast_wave: None,
            orbital_wave: None,
        }
    }

    pub fn wave_count(&self) -> u32 {
        self.wave_count
    }

    pub fn missile_count(&self) -> u32 {
        self.missile_count
    }

    pub fn waves_until_increase(&self) -> u32 {
        self.waves_until_increase
    }

    pub fn spawned_in_wave(&self) -> u32 {
        self.spawned_in_wave
    }

    pub fn next_spawn_time(&self) -> f32 {
        self.next_spawn_time
    }

    pub fn last_spawn_time(&self) -> Option<f32> {
        self.last_spawn_time.is_finite().then_some(self.last_spawn_time)
    }

    pub fn telegraph(&self) -> Option<&Telegraph> {
        self.telegraph.as_ref()
    }

    /// Run one scheduling step at effective time `now`
    pub fn update(
        &mut self,
        now: f32,
        rng: &mut Pcg32,
        registry: &mut EnemyRegistry,
        tuning: &Tuning,
        events: &mut Vec<GameEvent>,
    ) {
        self.update_missiles(now, rng, registry, tuning, events);
        self.update_fast_missile(now, rng, registry, tuning, events);
        self.update_orbital(now, rng, registry, tuning, events);
    }

    fn spawn_gate_open(&self, now: f32, tuning: &Tuning) -> bool {
        now - self.last_spawn_time >= tuning.min_spawn_interval
    }

    fn update_missiles(
        &mut self,
        now: f32,
        rng: &mut Pcg32,
        registry: &mut EnemyRegistry,
        tuning: &Tuning,
        events: &mut Vec<GameEvent>,
    ) {
        if now < self.next_spawn_time {
            return;
        }

        if self.spawned_in_wave < self.missile_count {
            let first_of_wave = self.spawned_in_wave == 0;
            if !first_of_wave && !self.spawn_gate_open(now, tuning) {
                return;
            }
            let pos = edge_point(rng, tuning, 0.0, tuning.spawn_margin);
            let vel = aim_at(pos, tuning.center(), tuning.base_speed);
            let id = registry.spawn(pos, vel, EnemyKind::Missile);
            self.spawned_in_wave += 1;
            self.last_spawn_time = now;
            log::debug!(
                "Missile {} spawned at ({:.0}, {:.0}), {}/{} of wave {}",
                id,
                pos.x,
                pos.y,
                self.spawned_in_wave,
                self.missile_count,
                self.wave_count
            );
            events.push(GameEvent::Spawned {
                id,
                archetype: Archetype::Missile,
            });
        } else if self.spawn_gate_open(now, tuning) {
            self.close_wave(now, rng, tuning, events);
        }
    }

    fn close_wave(&mut self, now: f32, rng: &mut Pcg32, tuning: &Tuning, events: &mut Vec<GameEvent>) {
        self.wave_count += 1;
        if self.wave_count % self.waves_until_increase == 0 {
            self.missile_count = (self.missile_count + 1).min(tuning.missile_count_cap);
        }
        let delay = tuning.base_wave_delay + rng.random::<f32>() * tuning.wave_delay_jitter;
        self.next_spawn_time = now + delay;
        self.spawned_in_wave = 0;
        log::info!(
            "Wave {} cleared, next wave of {} in {:.2}s",
            self.wave_count,
            self.missile_count,
            delay
        );
        events.push(GameEvent::WaveCleared {
            wave: self.wave_count,
            missile_count: self.missile_count,
        });
    }

    /// Wave count sits on a `start + k * interval` boundary
    fn wave_gate(wave: u32, start: u32, interval: u32) -> bool {
        wave >= start && (wave - start) % interval.max(1) == 0
    }

    fn update_fast_missile(
        &mut self,
        now: f32,
        rng: &mut Pcg32,
        registry: &mut EnemyRegistry,
        tuning: &Tuning,
        events: &mut Vec<GameEvent>,
    ) {
        if let Some(telegraph) = self.telegraph {
            if now - telegraph.started_at >= tuning.telegraph_duration {
                self.telegraph = None;
                let speed = tuning.base_speed * tuning.fast_missile_multiplier;
                let vel = aim_at(telegraph.pos, tuning.center(), speed);
                let id = registry.spawn(
                    telegraph.pos,
                    vel,
                    EnemyKind::FastMissile {
                        telegraphed_at: telegraph.started_at,
                    },
                );
                log::debug!("Fast missile {} launched", id);
                events.push(GameEvent::Spawned {
                    id,
                    archetype: Archetype::FastMissile,
                });
            }
            return;
        }

        let gate = Self::wave_gate(
            self.wave_count,
            tuning.fast_missile_start_wave,
            tuning.fast_missile_interval,
        );
        if !gate || self.fast_wave == Some(self.wave_count) || registry.has_live(Archetype::FastMissile) {
            return;
        }

        let pos = edge_point(rng, tuning, tuning.telegraph_inset, -tuning.telegraph_inset);
        self.telegraph = Some(Telegraph { pos, started_at: now });
        self.fast_wave = Some(self.wave_count);
        log::info!(
            "Fast missile telegraphed at ({:.0}, {:.0}) on wave {}",
            pos.x,
            pos.y,
            self.wave_count
        );
        events.push(GameEvent::TelegraphStarted { pos });
    }

    fn update_orbital(
        &mut self,
        now: f32,
        rng: &mut Pcg32,
        registry: &mut EnemyRegistry,
        tuning: &Tuning,
        events: &mut Vec<GameEvent>,
    ) {
        let gate = Self::wave_gate(self.wave_count, tuning.orbital_start_wave, tuning.orbital_interval);
        if !gate
            || self.orbital_wave == Some(self.wave_count)
            || registry.live_count(Archetype::Orbital) >= tuning.max_orbitals
        {
            return;
        }

        let orbit = OrbitalState {
            radius: tuning.orbital_radius,
            angle: rng.random::<f32>() * std::f32::consts::TAU,
            angular_speed: tuning.orbital_angular_speed,
            radial_rate: tuning.orbital_radial_rate,
            spawned_at: now,
            last_fired: now,
        };
        let center = tuning.center();
        let id = registry.spawn(
            orbital_position(&orbit, center),
            orbital_velocity(&orbit),
            EnemyKind::Orbital(orbit),
        );
        self.orbital_wave = Some(self.wave_count);
        log::info!("Orbital {} spawned on wave {}", id, self.wave_count);
        events.push(GameEvent::Spawned {
            id,
            archetype: Archetype::Orbital,
        });
    }
}

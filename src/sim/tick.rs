//! Per-frame simulation step
//!
//! Order within a tick: pause/restart handling, shield rotation, wave
//! scheduling, motion, collisions (shield before hitbox), orbital expiry,
//! bullet spawns from surviving orbitals, pruning.

use super::collision::{Contact, classify};
use super::motion::advance_enemy;
use super::state::{EnemyKind, GameEvent, GamePhase, GameState};
use crate::highscores::{RecordStore, StoreError};
use crate::{cartesian_to_polar, normalize_angle};

/// Player intents for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Rotate shield counter-clockwise (held)
    pub rotate_left: bool,
    /// Rotate shield clockwise (held)
    pub rotate_right: bool,
    /// Pause toggle (edge-triggered)
    pub toggle_pause: bool,
    /// Start over; only honored after game over
    pub restart: bool,
    /// Idle/demo mode - autopilot steers the shield
    pub idle_mode: bool,
}

/// Reject NaN, infinite and negative frame times
fn sanitize_dt(dt: f32) -> f32 {
    if dt.is_finite() && dt >= 0.0 {
        dt
    } else {
        log::warn!("Ignoring invalid dt {}", dt);
        0.0
    }
}

/// Save the high score, keeping only the first failure of the tick
fn save_high_score(store: &mut dyn RecordStore, score: u64, first_error: &mut Option<StoreError>) {
    if let Err(e) = store.save_high_score(score) {
        log::warn!("Failed to save high score {}: {}", score, e);
        if first_error.is_none() {
            *first_error = Some(e);
        }
    }
}

/// Steer the shield's middle toward the most urgent threat.
///
/// Returns (rotate_left, rotate_right).
pub fn autopilot(state: &GameState, dt: f32) -> (bool, bool) {
    let center = state.tuning.center();

    // Closest live enemy first, then a pending telegraph
    let target = state
        .registry
        .iter()
        .filter(|e| e.active)
        .min_by(|a, b| {
            a.pos
                .distance_squared(center)
                .partial_cmp(&b.pos.distance_squared(center))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|e| e.pos)
        .or_else(|| state.scheduler.telegraph().map(|t| t.pos));

    let Some(target) = target else {
        return (false, false);
    };

    let (_, target_angle) = cartesian_to_polar(target - center);
    let delta = normalize_angle(target_angle - state.shield_arc().mid_angle());

    // Dead zone of one step keeps it from jittering around the target
    let dead_zone = state.tuning.shield_rotation_speed * dt;
    (delta > dead_zone, delta < -dead_zone)
}

/// Advance the game by one step of `dt` seconds.
///
/// High-score save failures are returned after the whole tick has run; the
/// simulation itself never stops because of them.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> Result<(), StoreError> {
    let dt = sanitize_dt(dt);

    // Handle pause toggle
    if input.toggle_pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                state.clock.pause();
                state.events.push(GameEvent::Paused);
                log::info!("Paused at {:.2}s", state.clock.elapsed_secs());
                return Ok(());
            }
            GamePhase::Paused => {
                state.clock.resume();
                state.phase = GamePhase::Playing;
                state.events.push(GameEvent::Resumed);
                log::info!("Resumed at {:.2}s", state.clock.elapsed_secs());
            }
            GamePhase::GameOver => {}
        }
    }

    match state.phase {
        GamePhase::GameOver => {
            if input.restart {
                state.reset();
            }
            return Ok(());
        }
        GamePhase::Paused => return Ok(()),
        GamePhase::Playing => {}
    }

    let now = state.clock.elapsed_secs();
    let center = state.tuning.center();

    // Shield
    let (left, right) = if input.idle_mode {
        autopilot(state, dt)
    } else {
        (input.rotate_left, input.rotate_right)
    };
    state
        .shield
        .rotate(left, right, state.tuning.shield_rotation_speed, dt);

    // Spawns
    state.scheduler.update(
        now,
        &mut state.rng,
        &mut state.registry,
        &state.tuning,
        &mut state.events,
    );

    // Motion
    let mut fired = Vec::new();
    let mut expiring = Vec::new();
    for enemy in state.registry.iter_mut() {
        let outcome = advance_enemy(enemy, center, now, dt, &state.tuning);
        if let Some((pos, vel)) = outcome.fired {
            fired.push((enemy.id, pos, vel));
        }
        if outcome.expiring {
            expiring.push(enemy.id);
        }
    }

    // Collisions
    let arc = state.shield_arc();
    let mut store_error = None;
    for enemy in state.registry.iter_mut() {
        if !enemy.active {
            continue;
        }
        match classify(&arc, &state.hitbox, enemy.pos, &state.tuning) {
            Contact::Miss => {}
            Contact::Shield => {
                enemy.deactivate();
                let archetype = enemy.archetype();
                let points = state.tuning.score_for(archetype);
                state.score += points;
                log::debug!("{:?} {} intercepted (+{})", archetype, enemy.id, points);
                state.events.push(GameEvent::Intercepted {
                    id: enemy.id,
                    archetype,
                    points,
                });

                if state.score > state.high_score {
                    state.high_score = state.score;
                    state.events.push(GameEvent::NewHighScore {
                        score: state.high_score,
                    });
                    save_high_score(state.store.as_mut(), state.high_score, &mut store_error);
                }
            }
            Contact::Hitbox => {
                enemy.deactivate();
                let exhausted = state.lives.consume();
                log::debug!(
                    "{:?} {} reached the core, {} lives left",
                    enemy.archetype(),
                    enemy.id,
                    state.lives.remaining()
                );
                state.events.push(GameEvent::LifeLost {
                    id: enemy.id,
                    remaining: state.lives.remaining(),
                });

                if exhausted {
                    state.phase = GamePhase::GameOver;
                    log::info!(
                        "Game over: score {}, wave {}, high score {}",
                        state.score,
                        state.scheduler.wave_count(),
                        state.high_score
                    );
                    state.events.push(GameEvent::GameOver { score: state.score });
                    save_high_score(state.store.as_mut(), state.high_score, &mut store_error);
                    break;
                }
            }
        }
    }

    if state.phase == GamePhase::Playing {
        // Orbitals that ran out and were not claimed by a collision
        for enemy in state.registry.iter_mut() {
            if expiring.contains(&enemy.id) && enemy.deactivate() {
                log::debug!("Orbital {} expired", enemy.id);
            }
        }

        // Shots from orbitals destroyed this tick never leave the barrel
        fired.retain(|(shooter, _, _)| {
            state
                .registry
                .get(*shooter)
                .is_some_and(|e| e.active)
        });
        for (_, pos, vel) in fired {
            state.registry.spawn(pos, vel, EnemyKind::OrbitalBullet);
        }
    }

    state.registry.prune();

    match store_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

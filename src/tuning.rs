//! Data-driven game balance
//!
//! Every gameplay constant lives here so a JSON file can retune a session
//! without rebuilding. Missing fields fall back to their defaults.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::SIM_DT;
use crate::sim::Archetype;

/// Orbitals may not fire faster than once per simulation step
const SIM_FIRE_FLOOR: f32 = SIM_DT;

/// How the shield arc is tested against an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ShieldModel {
    /// Sample points along the arc at a fixed angular step
    #[default]
    Sampled,
    /// Closed-form nearest point on the arc
    Exact,
}

impl ShieldModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShieldModel::Sampled => "sampled",
            ShieldModel::Exact => "exact",
        }
    }
}

/// Game balance and geometry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === World ===
    /// Playfield width (world units)
    pub screen_width: f32,
    /// Playfield height (world units)
    pub screen_height: f32,
    /// Half extent of the protected hitbox around the center
    pub hitbox_half_size: f32,

    // === Shield ===
    /// Distance from the center to the shield arc
    pub shield_radius: f32,
    /// Angular width of the arc (radians)
    pub shield_arc_width: f32,
    /// Rotation rate per held direction (radians/second)
    pub shield_rotation_speed: f32,
    /// Angular step between sampled arc points (radians)
    pub shield_sample_step: f32,
    /// Squared distance at which an arc point touches an entity
    pub shield_hit_threshold_sq: f32,
    pub shield_model: ShieldModel,

    // === Lives ===
    pub lives: usize,

    // === Waves ===
    /// Plain missile speed (units/second)
    pub base_speed: f32,
    /// How far outside the screen edge missiles appear
    pub spawn_margin: f32,
    /// Minimum gap between spawns inside one wave (seconds)
    pub min_spawn_interval: f32,
    /// Delay before the very first wave (seconds)
    pub first_wave_delay: f32,
    /// Fixed delay between waves (seconds)
    pub base_wave_delay: f32,
    /// Random extra delay between waves, uniform in [0, jitter)
    pub wave_delay_jitter: f32,
    pub initial_missile_count: u32,
    pub missile_count_cap: u32,
    /// Waves between missile count increases, drawn per session
    pub waves_until_increase_min: u32,
    pub waves_until_increase_max: u32,

    // === Fast missiles ===
    pub fast_missile_start_wave: u32,
    pub fast_missile_interval: u32,
    pub fast_missile_multiplier: f32,
    /// Warning time before a fast missile appears (seconds)
    pub telegraph_duration: f32,
    /// Telegraph positions are inset this far from the screen edge
    pub telegraph_inset: f32,

    // === Orbital enemies ===
    pub orbital_start_wave: u32,
    pub orbital_interval: u32,
    pub max_orbitals: usize,
    pub orbital_radius: f32,
    pub orbital_angular_speed: f32,
    /// Negative spirals inward (units/second)
    pub orbital_radial_rate: f32,
    pub orbital_min_radius: f32,
    /// Seconds before an orbital gives up
    pub orbital_lifetime: f32,
    pub orbital_fire_interval: f32,
    pub bullet_speed: f32,

    // === Score ===
    pub score_missile: u64,
    pub score_fast_missile: u64,
    pub score_orbital: u64,
    pub score_bullet: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            screen_width: 800.0,
            screen_height: 600.0,
            hitbox_half_size: 25.0,

            shield_radius: 60.0,
            shield_arc_width: std::f32::consts::FRAC_PI_2,
            shield_rotation_speed: 4.0,
            shield_sample_step: 0.05,
            shield_hit_threshold_sq: 144.0,
            shield_model: ShieldModel::Sampled,

            lives: 3,

            base_speed: 100.0,
            spawn_margin: 20.0,
            min_spawn_interval: 0.3,
            first_wave_delay: 1.0,
            base_wave_delay: 2.0,
            wave_delay_jitter: 1.0,
            initial_missile_count: 1,
            missile_count_cap: 8,
            waves_until_increase_min: 2,
            waves_until_increase_max: 4,

            fast_missile_start_wave: 3,
            fast_missile_interval: 3,
            fast_missile_multiplier: 2.5,
            telegraph_duration: 1.5,
            telegraph_inset: 30.0,

            orbital_start_wave: 5,
            orbital_interval: 4,
            max_orbitals: 2,
            orbital_radius: 300.0,
            orbital_angular_speed: 1.0,
            orbital_radial_rate: -20.0,
            orbital_min_radius: 20.0,
            orbital_lifetime: 20.0,
            orbital_fire_interval: 2.0,
            bullet_speed: 120.0,

            score_missile: 10,
            score_fast_missile: 25,
            score_orbital: 50,
            score_bullet: 5,
        }
    }
}

impl Tuning {
    /// Center of the playfield, where everything converges
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.screen_width / 2.0, self.screen_height / 2.0)
    }

    /// Parse tuning from JSON, then clamp it into a playable range
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let tuning: Tuning = serde_json::from_str(json)?;
        Ok(tuning.validated())
    }

    /// Load tuning from a JSON file. Missing or invalid files use defaults.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {:?}", path);
                    tuning
                }
                Err(e) => {
                    log::warn!("Invalid tuning at {:?}: {}, using defaults", path, e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read tuning at {:?}: {}, using defaults", path, e);
                Self::default()
            }
        }
    }

    /// Clamp values that would stall or break the simulation
    pub fn validated(mut self) -> Self {
        self.lives = self.lives.max(1);
        self.initial_missile_count = self.initial_missile_count.max(1);
        self.missile_count_cap = self.missile_count_cap.max(self.initial_missile_count);
        self.waves_until_increase_min = self.waves_until_increase_min.max(1);
        self.waves_until_increase_max = self
            .waves_until_increase_max
            .max(self.waves_until_increase_min);
        self.fast_missile_interval = self.fast_missile_interval.max(1);
        self.orbital_interval = self.orbital_interval.max(1);
        self.min_spawn_interval = self.min_spawn_interval.max(0.0);
        self.wave_delay_jitter = self.wave_delay_jitter.max(0.0);
        self.shield_sample_step = self.shield_sample_step.max(1e-3);
        self.shield_hit_threshold_sq = self.shield_hit_threshold_sq.max(0.0);
        self.orbital_fire_interval = self.orbital_fire_interval.max(SIM_FIRE_FLOOR);
        self
    }

    /// Score awarded for intercepting an archetype with the shield
    pub fn score_for(&self, archetype: Archetype) -> u64 {
        match archetype {
            Archetype::Missile => self.score_missile,
            Archetype::FastMissile => self.score_fast_missile,
            Archetype::Orbital => self.score_orbital,
            Archetype::OrbitalBullet => self.score_bullet,
        }
    }
}

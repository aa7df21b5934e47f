//! Collision predicates
//!
//! Entities are points. The shield is an arc that "touches" a point when some
//! part of it comes within a squared-distance threshold; the hitbox is a
//! closed axis-aligned rectangle.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::arc::ShieldArc;
use crate::tuning::{ShieldModel, Tuning};

/// The protected rectangle at the world center
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hitbox {
    pub min: Vec2,
    pub max: Vec2,
}

impl Hitbox {
    pub fn centered(center: Vec2, half_size: f32) -> Self {
        let half = Vec2::splat(half_size.abs());
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Inclusive on all four edges
    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }
}

/// What an entity touched this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    Shield,
    Hitbox,
    Miss,
}

/// Sampled arc test: any sample within the threshold is a hit
pub fn shield_hit_sampled(arc: &ShieldArc, point: Vec2, step: f32, threshold_sq: f32) -> bool {
    arc.sample_points(step)
        .any(|p| p.distance_squared(point) <= threshold_sq)
}

/// Exact arc test against the nearest point on the arc
pub fn shield_hit_exact(arc: &ShieldArc, point: Vec2, threshold_sq: f32) -> bool {
    arc.nearest_point(point).distance_squared(point) <= threshold_sq
}

/// Shield test using the configured model
pub fn shield_hit(arc: &ShieldArc, point: Vec2, tuning: &Tuning) -> bool {
    match tuning.shield_model {
        ShieldModel::Sampled => shield_hit_sampled(
            arc,
            point,
            tuning.shield_sample_step,
            tuning.shield_hit_threshold_sq,
        ),
        ShieldModel::Exact => shield_hit_exact(arc, point, tuning.shield_hit_threshold_sq),
    }
}

/// Shield first, then hitbox
pub fn classify(arc: &ShieldArc, hitbox: &Hitbox, point: Vec2, tuning: &Tuning) -> Contact {
    if shield_hit(arc, point, tuning) {
        Contact::Shield
    } else if hitbox.contains(point) {
        Contact::Hitbox
    } else {
        Contact::Miss
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polar_to_cartesian;
    use proptest::prelude::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    fn arc() -> ShieldArc {
        ShieldArc::new(Vec2::new(400.0, 300.0), 60.0, 0.0, FRAC_PI_2)
    }

    #[test]
    fn test_hitbox_edges_inclusive() {
        let hitbox = Hitbox::centered(Vec2::new(400.0, 300.0), 25.0);
        assert!(hitbox.contains(Vec2::new(375.0, 300.0)));
        assert!(hitbox.contains(Vec2::new(425.0, 325.0)));
        assert!(hitbox.contains(Vec2::new(400.0, 275.0)));
        assert!(!hitbox.contains(Vec2::new(374.9, 300.0)));
        assert!(!hitbox.contains(Vec2::new(400.0, 325.1)));
    }

    #[test]
    fn test_sampled_hit_on_arc() {
        let arc = arc();
        let on_arc = arc.center + polar_to_cartesian(60.0, PI / 4.0);
        assert!(shield_hit_sampled(&arc, on_arc, 0.05, 144.0));
        // Same radius, opposite side
        let behind = arc.center + polar_to_cartesian(60.0, PI + PI / 4.0);
        assert!(!shield_hit_sampled(&arc, behind, 0.05, 144.0));
    }

    #[test]
    fn test_exact_hit_threshold() {
        let arc = arc();
        let near = arc.center + polar_to_cartesian(71.9, 0.3);
        let far = arc.center + polar_to_cartesian(72.1, 0.3);
        assert!(shield_hit_exact(&arc, near, 144.0));
        assert!(!shield_hit_exact(&arc, far, 144.0));
    }

    #[test]
    fn test_exact_hit_near_end_cap() {
        let arc = arc();
        // 10 units beyond the start, tangentially
        let start = arc.point_at(0.0);
        assert!(shield_hit_exact(&arc, start + Vec2::new(0.0, -10.0), 144.0));
        assert!(!shield_hit_exact(&arc, start + Vec2::new(0.0, -13.0), 144.0));
    }

    #[test]
    fn test_classify_order() {
        let tuning = Tuning::default();
        let center = tuning.center();
        let arc = ShieldArc::new(center, 60.0, 0.0, FRAC_PI_2);
        let hitbox = Hitbox::centered(center, 25.0);

        let on_shield = arc.point_at(0.5);
        assert_eq!(classify(&arc, &hitbox, on_shield, &tuning), Contact::Shield);
        assert_eq!(classify(&arc, &hitbox, center, &tuning), Contact::Hitbox);
        assert_eq!(
            classify(&arc, &hitbox, Vec2::new(0.0, 0.0), &tuning),
            Contact::Miss
        );

        // A shield big enough to overlap the hitbox still wins
        let wide = ShieldArc::new(center, 10.0, 0.0, std::f32::consts::TAU);
        assert_eq!(
            classify(&wide, &hitbox, center + Vec2::new(10.0, 0.0), &tuning),
            Contact::Shield
        );
    }

    proptest! {
        /// Sampling can only miss hits the exact test finds, never invent them
        #[test]
        fn sampled_hits_are_exact_hits(r in 0.0f32..200.0, theta in -7.0f32..7.0, start in 0.0f32..6.28) {
            let arc = ShieldArc::new(Vec2::new(400.0, 300.0), 60.0, start, FRAC_PI_2);
            let p = arc.center + polar_to_cartesian(r, theta);
            if shield_hit_sampled(&arc, p, 0.05, 144.0) {
                prop_assert!(shield_hit_exact(&arc, p, 144.0 + 1e-2));
            }
        }
    }
}

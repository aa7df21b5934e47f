//! Shield arc geometry
//!
//! In polar coordinates around the world center, the shield is defined by:
//! - radius: distance from center
//! - theta_start: angle where the arc begins (wrapped to [0, 2π))
//! - width: angular extent, measured counter-clockwise from theta_start

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::{cartesian_to_polar, polar_to_cartesian, wrap_angle};

/// A thin arc around a world-space center
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShieldArc {
    pub center: Vec2,
    pub radius: f32,
    pub theta_start: f32,
    pub width: f32,
}

impl ShieldArc {
    pub fn new(center: Vec2, radius: f32, theta_start: f32, width: f32) -> Self {
        Self {
            center,
            radius,
            theta_start: wrap_angle(theta_start),
            width: width.clamp(0.0, std::f32::consts::TAU),
        }
    }

    /// End angle (not wrapped, may exceed 2π)
    #[inline]
    pub fn theta_end(&self) -> f32 {
        self.theta_start + self.width
    }

    /// Counter-clockwise offset of `theta` past the start, in [0, 2π)
    #[inline]
    fn offset_of(&self, theta: f32) -> f32 {
        wrap_angle(theta - self.theta_start)
    }

    /// Check if an angle is within the arc's angular extent
    pub fn contains_angle(&self, theta: f32) -> bool {
        self.offset_of(theta) <= self.width
    }

    /// Point on the arc at a given angle
    #[inline]
    pub fn point_at(&self, theta: f32) -> Vec2 {
        self.center + polar_to_cartesian(self.radius, theta)
    }

    /// Points every `step` radians from start to end, end point included
    pub fn sample_points(&self, step: f32) -> impl Iterator<Item = Vec2> + '_ {
        let step = step.max(1e-4);
        let count = (self.width / step).ceil() as usize;
        (0..=count).map(move |i| {
            let theta = (self.theta_start + i as f32 * step).min(self.theta_end());
            self.point_at(theta)
        })
    }

    /// Closest point on the arc to `point`
    pub fn nearest_point(&self, point: Vec2) -> Vec2 {
        let (r, theta) = cartesian_to_polar(point - self.center);
        if r * r < f32::EPSILON {
            // Every arc point is equidistant from the center
            return self.point_at(self.theta_start);
        }
        let offset = self.offset_of(theta);
        let clamped = if self.contains_angle(theta) {
            offset
        } else {
            // Outside the span: snap to whichever end is angularly closer
            let past_end = offset - self.width;
            let before_start = std::f32::consts::TAU - offset;
            if past_end < before_start { self.width } else { 0.0 }
        };
        self.point_at(self.theta_start + clamped)
    }

    /// Mid-arc angle (wrapped)
    pub fn mid_angle(&self) -> f32 {
        wrap_angle(self.theta_start + self.width / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_arc_contains_angle_no_wrap() {
        let arc = ShieldArc::new(Vec2::ZERO, 100.0, 0.0, FRAC_PI_2);
        assert!(arc.contains_angle(0.1));
        assert!(arc.contains_angle(PI / 4.0));
        assert!(!arc.contains_angle(PI));
        assert!(!arc.contains_angle(-PI / 4.0));
    }

    #[test]
    fn test_arc_contains_angle_wraparound() {
        // Arc from 350° through 10°
        let arc = ShieldArc::new(Vec2::ZERO, 100.0, 350.0_f32.to_radians(), 20.0_f32.to_radians());
        assert!(arc.contains_angle(0.0));
        assert!(arc.contains_angle(5.0_f32.to_radians()));
        assert!(arc.contains_angle(-5.0_f32.to_radians()));
        assert!(!arc.contains_angle(PI));
    }

    #[test]
    fn test_sample_points_cover_both_ends() {
        let center = Vec2::new(400.0, 300.0);
        let arc = ShieldArc::new(center, 60.0, 0.0, FRAC_PI_2);
        let points: Vec<Vec2> = arc.sample_points(0.05).collect();
        let first = points.first().unwrap();
        let last = points.last().unwrap();
        assert!((*first - Vec2::new(460.0, 300.0)).length() < 1e-3);
        assert!((*last - Vec2::new(400.0, 360.0)).length() < 1e-3);
        for p in &points {
            assert!(((*p - center).length() - 60.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_nearest_point_inside_span() {
        let arc = ShieldArc::new(Vec2::ZERO, 100.0, 0.0, FRAC_PI_2);
        let p = arc.nearest_point(polar_to_cartesian(150.0, PI / 4.0));
        assert!((p - polar_to_cartesian(100.0, PI / 4.0)).length() < 1e-3);
    }

    #[test]
    fn test_nearest_point_snaps_to_closer_end() {
        let arc = ShieldArc::new(Vec2::ZERO, 100.0, 0.0, FRAC_PI_2);
        // Just below the start
        let p = arc.nearest_point(polar_to_cartesian(100.0, -0.2));
        assert!((p - Vec2::new(100.0, 0.0)).length() < 1e-3);
        // Just past the end
        let p = arc.nearest_point(polar_to_cartesian(100.0, FRAC_PI_2 + 0.2));
        assert!((p - Vec2::new(0.0, 100.0)).length() < 1e-3);
    }
}

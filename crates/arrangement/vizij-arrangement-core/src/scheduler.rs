//! Timing policies over batches of movement plans.
//!
//! Every function takes plans by reference and returns a new batch in the same
//! order; input plans are never modified in place.

use std::f32::consts::TAU;

use glam::{Quat, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::easing::Easing;
use crate::element::ElementTransform;
use crate::plan::{MovementPlan, TIME_EPSILON};

/// Floor for distance-based denominators.
pub const DISTANCE_EPSILON: f32 = 1e-4;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimultaneousCfg {
    pub duration: f32,
    /// Scale each plan's duration by its travel distance relative to the farthest one.
    pub consistent_speed: bool,
}

impl Default for SimultaneousCfg {
    fn default() -> Self {
        Self {
            duration: 0.5,
            consistent_speed: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialCfg {
    pub duration: f32,
    pub consistent_speed: bool,
    /// Fraction of each plan's own duration inserted before it. Negative values overlap.
    pub spacing_pct: f32,
}

impl Default for SerialCfg {
    fn default() -> Self {
        Self {
            duration: 1.0,
            consistent_speed: false,
            spacing_pct: 0.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcceleratingCfg {
    pub initial_delay: f32,
    /// Fraction removed from the delay after each element.
    pub delay_reduction_rate: f32,
    pub element_duration: f32,
}

impl Default for AcceleratingCfg {
    fn default() -> Self {
        Self {
            initial_delay: 0.2,
            delay_reduction_rate: 0.1,
            element_duration: 0.3,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MussCfg {
    /// Maximum planar translation added to the end position.
    pub radius: f32,
    /// Maximum rotation about Z added to the end rotation, in degrees either way.
    pub max_degrees: f32,
}

impl Default for MussCfg {
    fn default() -> Self {
        Self {
            radius: 0.1,
            max_degrees: 10.0,
        }
    }
}

/// All plans start together.
pub fn schedule_simultaneous<K: Copy>(
    plans: &[MovementPlan<K>],
    cfg: &SimultaneousCfg,
) -> Vec<MovementPlan<K>> {
    if !cfg.consistent_speed {
        return plans
            .iter()
            .map(|p| p.with_window(0.0, cfg.duration))
            .collect();
    }
    let farthest = plans
        .iter()
        .map(MovementPlan::distance)
        .fold(0.0f32, f32::max)
        .max(DISTANCE_EPSILON);
    plans
        .iter()
        .map(|p| p.with_window(0.0, cfg.duration * p.distance() / farthest))
        .collect()
}

/// One plan after another, optionally overlapping or separated by gaps.
///
/// Start times are non-decreasing for any `spacing_pct`.
pub fn schedule_serial<K: Copy>(plans: &[MovementPlan<K>], cfg: &SerialCfg) -> Vec<MovementPlan<K>> {
    if plans.is_empty() {
        return Vec::new();
    }
    let slices: Vec<f32> = if cfg.consistent_speed {
        let total = plans
            .iter()
            .map(MovementPlan::distance)
            .sum::<f32>()
            .max(DISTANCE_EPSILON);
        plans
            .iter()
            .map(|p| cfg.duration * p.distance() / total)
            .collect()
    } else {
        vec![cfg.duration / plans.len() as f32; plans.len()]
    };

    let mut out = Vec::with_capacity(plans.len());
    let mut previous_end = 0.0f32;
    let mut running_start = 0.0f32;
    for (i, (plan, slice)) in plans.iter().zip(slices).enumerate() {
        let start = if i == 0 {
            0.0
        } else {
            (previous_end + cfg.spacing_pct * slice).max(running_start)
        };
        let end = start + slice;
        out.push(plan.with_window(start, end));
        previous_end = end;
        running_start = start;
    }
    out
}

/// Geometrically shrinking delays between consecutive starts.
pub fn schedule_accelerating<K: Copy>(
    plans: &[MovementPlan<K>],
    cfg: &AcceleratingCfg,
) -> Vec<MovementPlan<K>> {
    let mut delay = cfg.initial_delay;
    let mut start = 0.0f32;
    let mut out = Vec::with_capacity(plans.len());
    for (i, plan) in plans.iter().enumerate() {
        if i > 0 {
            start += delay;
            delay *= 1.0 - cfg.delay_reduction_rate;
        }
        out.push(plan.with_window(start, start + cfg.element_duration));
    }
    out
}

/// Remap start times through `easing`, keeping every plan's own duration.
pub fn ease_timings<K: Copy>(plans: &[MovementPlan<K>], easing: Easing) -> Vec<MovementPlan<K>> {
    let latest = plans.iter().map(|p| p.start_time).fold(0.0f32, f32::max);
    if latest <= TIME_EPSILON {
        return plans.to_vec();
    }
    plans
        .iter()
        .map(|p| {
            let start = easing.ease(p.start_time / latest) * latest;
            p.with_window(start, start + p.duration())
        })
        .collect()
}

/// Randomly displace the end state of each target's plan.
///
/// `targets` pairs each element with its live transform. Elements without a
/// plan in `plans` get a zero-duration hold at their live transform first.
/// Timing is left untouched. Output follows `targets` order.
pub fn muss<K: Copy + PartialEq, R: Rng>(
    plans: &[MovementPlan<K>],
    targets: &[(K, ElementTransform)],
    cfg: &MussCfg,
    rng: &mut R,
) -> Vec<MovementPlan<K>> {
    targets
        .iter()
        .map(|(key, live)| {
            let base = plans
                .iter()
                .find(|p| p.element == *key)
                .copied()
                .unwrap_or_else(|| MovementPlan::hold(*key, *live));
            perturb(&base, cfg, rng)
        })
        .collect()
}

fn perturb<K: Copy, R: Rng>(
    plan: &MovementPlan<K>,
    cfg: &MussCfg,
    rng: &mut R,
) -> MovementPlan<K> {
    let radius = cfg.radius.max(0.0);
    let offset = if radius > 0.0 {
        let angle = rng.random_range(0.0..TAU);
        let r = radius * rng.random_range(0.0f32..=1.0).sqrt();
        Vec3::new(angle.cos() * r, angle.sin() * r, 0.0)
    } else {
        Vec3::ZERO
    };
    let degrees = cfg.max_degrees.abs();
    let spin = if degrees > 0.0 {
        rng.random_range(-degrees..=degrees).to_radians()
    } else {
        0.0
    };
    let mut end = plan.end;
    end.position += offset;
    end.rotation = (Quat::from_rotation_z(spin) * end.rotation).normalize();
    plan.with_end(end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn moving(id: u32, dx: f32) -> MovementPlan<u32> {
        crate::plan::create_plan(
            id,
            ElementTransform::IDENTITY,
            ElementTransform::from_position(Vec3::new(dx, 0.0, 0.0)),
            0.0,
            0.0,
            0,
            Easing::Linear,
        )
    }

    #[test]
    fn simultaneous_without_consistent_speed_shares_end() {
        let out = schedule_simultaneous(
            &[moving(0, 1.0), moving(1, 9.0)],
            &SimultaneousCfg {
                duration: 2.0,
                consistent_speed: false,
            },
        );
        assert!(out.iter().all(|p| p.start_time == 0.0 && p.end_time == 2.0));
    }

    #[test]
    fn simultaneous_with_zero_distances_does_not_divide_by_zero() {
        let out = schedule_simultaneous(
            &[moving(0, 0.0), moving(1, 0.0)],
            &SimultaneousCfg {
                duration: 1.0,
                consistent_speed: true,
            },
        );
        assert!(out.iter().all(|p| p.end_time == 0.0));
    }

    #[test]
    fn serial_equal_slices_back_to_back() {
        let out = schedule_serial(
            &[moving(0, 1.0), moving(1, 1.0), moving(2, 1.0), moving(3, 1.0)],
            &SerialCfg {
                duration: 2.0,
                ..Default::default()
            },
        );
        let starts: Vec<f32> = out.iter().map(|p| p.start_time).collect();
        assert_eq!(starts, vec![0.0, 0.5, 1.0, 1.5]);
        assert_eq!(out[3].end_time, 2.0);
    }

    #[test]
    fn serial_gap_adds_fraction_of_slice() {
        let out = schedule_serial(
            &[moving(0, 1.0), moving(1, 1.0)],
            &SerialCfg {
                duration: 2.0,
                spacing_pct: 0.5,
                ..Default::default()
            },
        );
        assert_eq!(out[1].start_time, 1.5);
        assert_eq!(out[1].end_time, 2.5);
    }

    #[test]
    fn ease_timings_keeps_durations() {
        let plans = schedule_accelerating(
            &[moving(0, 1.0), moving(1, 1.0), moving(2, 1.0)],
            &AcceleratingCfg {
                initial_delay: 1.0,
                delay_reduction_rate: 0.0,
                element_duration: 0.25,
            },
        );
        let eased = ease_timings(&plans, Easing::QuadIn);
        assert_eq!(eased[0].start_time, 0.0);
        assert!((eased[1].start_time - 0.5).abs() < 1e-6);
        assert!((eased[2].start_time - 2.0).abs() < 1e-6);
        for p in &eased {
            assert!((p.duration() - 0.25).abs() < 1e-6);
        }
    }

    #[test]
    fn muss_stays_within_bounds_and_keeps_timing() {
        let mut rng = StdRng::seed_from_u64(7);
        let plans = schedule_simultaneous(&[moving(0, 2.0)], &SimultaneousCfg::default());
        let targets = [(0u32, ElementTransform::IDENTITY)];
        let cfg = MussCfg {
            radius: 0.5,
            max_degrees: 15.0,
        };
        for _ in 0..50 {
            let out = muss(&plans, &targets, &cfg, &mut rng);
            let p = out[0];
            assert_eq!(p.start_time, plans[0].start_time);
            assert_eq!(p.end_time, plans[0].end_time);
            let d = p.end.position - plans[0].end.position;
            assert!(d.length() <= 0.5 + 1e-5);
            assert!(d.z.abs() < 1e-6);
            let (_, angle) = p.end.rotation.to_axis_angle();
            assert!(angle.min(TAU - angle) <= 15f32.to_radians() + 1e-4);
        }
    }

    #[test]
    fn muss_synthesizes_hold_for_missing_plan() {
        let mut rng = StdRng::seed_from_u64(3);
        let live = ElementTransform::from_position(Vec3::new(1.0, 2.0, 3.0));
        let out = muss::<u32, _>(&[], &[(5, live)], &MussCfg::default(), &mut rng);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].element, 5);
        assert_eq!(out[0].start, live);
        assert_eq!(out[0].duration(), 0.0);
        assert!((out[0].end.position.z - 3.0).abs() < 1e-6);
    }
}
